use crate::core::ids::Skill;
use serde::{Deserialize, Serialize};

/// Which melee skill receives combat XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStyle {
    #[default]
    Attack,
    Strength,
    Defence,
}

impl CombatStyle {
    pub fn skill(&self) -> Skill {
        match self {
            CombatStyle::Attack => Skill::Attack,
            CombatStyle::Strength => Skill::Strength,
            CombatStyle::Defence => Skill::Defence,
        }
    }
}

/// Player vitals that persist between fights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVitals {
    pub hp: u32,
    /// Combat ticks until the next regeneration pulse.
    pub regen_ticks_remaining: u32,
}

/// Player combat ratings for one tick, with modifiers already folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerCombatStats {
    pub accuracy: f64,
    pub evasion: f64,
    pub max_hit: u32,
    pub attack_interval_ticks: u32,
    pub damage_reduction_percent: f64,
}
