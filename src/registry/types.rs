use crate::core::ids::{ActionId, Currency, DungeonId, ItemId, MonsterId, Skill};
use crate::items::ItemStack;

/// One way of performing an action: what it consumes and what it yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub inputs: Vec<ItemStack>,
    pub outputs: Vec<ItemStack>,
}

impl Recipe {
    pub fn gather(output: ItemStack) -> Self {
        Self {
            inputs: Vec::new(),
            outputs: vec![output],
        }
    }

    pub fn produce(inputs: Vec<ItemStack>, output: ItemStack) -> Self {
        Self {
            inputs,
            outputs: vec![output],
        }
    }
}

/// A repeatable skill action. Agility obstacles are actions with no recipes.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDef {
    pub id: ActionId,
    pub name: String,
    pub skill: Skill,
    pub level_required: u32,
    pub base_ticks: u32,
    pub skill_xp: u64,
    /// 1..=4, scales the mastery pool cap this action contributes.
    pub mastery_tier: u8,
    pub recipes: Vec<Recipe>,
    pub currency_rewards: Vec<(Currency, i64)>,
}

impl ActionDef {
    /// Recipe for `selected`, defaulting to the first. `None` when the index
    /// is out of range or the action has no recipes (obstacles).
    pub fn recipe(&self, selected: Option<usize>) -> Option<&Recipe> {
        self.recipes.get(selected.unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    pub item: ItemId,
    pub weight: u32,
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterDef {
    pub id: MonsterId,
    pub name: String,
    pub hitpoints: u32,
    pub attack_interval_ticks: u32,
    pub max_hit: u32,
    /// Attack and defence ratings in monster points (scaled when compared).
    pub accuracy: u32,
    pub evasion: u32,
    /// Inclusive gold range dropped on death.
    pub gold: (i64, i64),
    /// Chance in percent that the loot table is rolled at all.
    pub loot_chance_percent: u32,
    pub loot: Vec<LootEntry>,
    /// Always dropped in addition to the loot roll.
    pub bones: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DungeonDef {
    pub id: DungeonId,
    pub name: String,
    pub monsters: Vec<MonsterId>,
    pub completion_rewards: Vec<ItemStack>,
    pub completion_gold: i64,
}
