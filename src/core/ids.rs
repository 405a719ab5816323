//! Identifier newtypes and the fixed skill/currency sets.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// A repeatable skill action (tree, ore, recipe, obstacle).
    ActionId
);
string_id!(ItemId);
string_id!(MonsterId);
string_id!(
    /// A dungeon: an ordered monster sequence.
    DungeonId
);

/// Obstacles are ordinary Agility actions, so they share the action id space
/// (and with it the mastery book).
pub type ObstacleId = ActionId;

/// Every trainable skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Woodcutting,
    Fishing,
    Mining,
    Smithing,
    Cooking,
    Agility,
    Attack,
    Strength,
    Defence,
    Hitpoints,
}

impl Skill {
    pub const ALL: [Skill; 10] = [
        Skill::Woodcutting,
        Skill::Fishing,
        Skill::Mining,
        Skill::Smithing,
        Skill::Cooking,
        Skill::Agility,
        Skill::Attack,
        Skill::Strength,
        Skill::Defence,
        Skill::Hitpoints,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Woodcutting => "Woodcutting",
            Skill::Fishing => "Fishing",
            Skill::Mining => "Mining",
            Skill::Smithing => "Smithing",
            Skill::Cooking => "Cooking",
            Skill::Agility => "Agility",
            Skill::Attack => "Attack",
            Skill::Strength => "Strength",
            Skill::Defence => "Defence",
            Skill::Hitpoints => "Hitpoints",
        }
    }

    /// Combat skills have no actions and therefore no mastery pool.
    pub fn has_mastery(&self) -> bool {
        !matches!(
            self,
            Skill::Attack | Skill::Strength | Skill::Defence | Skill::Hitpoints
        )
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Gold,
    SlayerCoins,
}

impl Currency {
    pub fn name(&self) -> &'static str {
        match self {
            Currency::Gold => "GP",
            Currency::SlayerCoins => "Slayer Coins",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ActionId::new("oak_tree")).unwrap();
        assert_eq!(json, "\"oak_tree\"");
        let back: ActionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "oak_tree");
    }

    #[test]
    fn test_combat_skills_have_no_mastery() {
        assert!(Skill::Woodcutting.has_mastery());
        assert!(Skill::Agility.has_mastery());
        assert!(!Skill::Hitpoints.has_mastery());
        assert!(!Skill::Attack.has_mastery());
    }

    #[test]
    fn test_skill_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Skill::Woodcutting).unwrap(),
            "\"woodcutting\""
        );
    }
}
