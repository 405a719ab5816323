//! Loot and death-penalty rolls, consumed by combat as an opaque collaborator.

use crate::core::ids::ItemId;
use crate::items::ItemStack;
use crate::registry::MonsterDef;
use rand::{Rng, RngCore};

/// Probabilistic side of combat the resolver does not own.
///
/// Implementations must draw randomness only from `rng` so replays stay
/// deterministic.
pub trait CombatCollaborator {
    /// Items dropped by `monster` on death (bones excluded; the resolver adds those).
    fn roll_drops(&self, monster: &MonsterDef, rng: &mut dyn RngCore) -> Vec<ItemStack>;

    /// Which equipped item, if any, is lost when the player dies.
    fn death_penalty(&self, equipment: &[ItemId], rng: &mut dyn RngCore) -> Option<ItemId>;
}

/// Rolls each monster's own weighted loot table; death costs one random
/// equipped item.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDrops;

impl CombatCollaborator for StandardDrops {
    fn roll_drops(&self, monster: &MonsterDef, rng: &mut dyn RngCore) -> Vec<ItemStack> {
        let total_weight: u32 = monster.loot.iter().map(|entry| entry.weight).sum();
        if total_weight == 0 {
            return Vec::new();
        }
        if rng.gen_range(0..100) >= monster.loot_chance_percent {
            return Vec::new();
        }

        let mut roll = rng.gen_range(0..total_weight);
        for entry in &monster.loot {
            if roll < entry.weight {
                let quantity = rng.gen_range(entry.min..=entry.max.max(entry.min));
                return vec![ItemStack::new(entry.item.clone(), quantity)];
            }
            roll -= entry.weight;
        }
        Vec::new()
    }

    fn death_penalty(&self, equipment: &[ItemId], rng: &mut dyn RngCore) -> Option<ItemId> {
        if equipment.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..equipment.len());
        Some(equipment[index].clone())
    }
}

/// No loot and no death penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDrops;

impl CombatCollaborator for NoDrops {
    fn roll_drops(&self, _monster: &MonsterDef, _rng: &mut dyn RngCore) -> Vec<ItemStack> {
        Vec::new()
    }

    fn death_penalty(&self, _equipment: &[ItemId], _rng: &mut dyn RngCore) -> Option<ItemId> {
        None
    }
}
