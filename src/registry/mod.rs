//! Static game data: actions, obstacles, monsters and dungeons.

mod data;
pub mod types;

pub use types::*;

use crate::core::ids::{ActionId, DungeonId, MonsterId, Skill};
use std::collections::BTreeMap;

/// Lookup tables for everything an activity can reference.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    actions: BTreeMap<ActionId, ActionDef>,
    monsters: BTreeMap<MonsterId, MonsterDef>,
    dungeons: BTreeMap<DungeonId, DungeonDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The data set the game ships with.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for action in data::actions() {
            registry.add_action(action);
        }
        for monster in data::monsters() {
            registry.add_monster(monster);
        }
        for dungeon in data::dungeons() {
            registry.add_dungeon(dungeon);
        }
        registry
    }

    pub fn add_action(&mut self, action: ActionDef) -> &mut Self {
        self.actions.insert(action.id.clone(), action);
        self
    }

    pub fn add_monster(&mut self, monster: MonsterDef) -> &mut Self {
        self.monsters.insert(monster.id.clone(), monster);
        self
    }

    pub fn add_dungeon(&mut self, dungeon: DungeonDef) -> &mut Self {
        self.dungeons.insert(dungeon.id.clone(), dungeon);
        self
    }

    pub fn action(&self, id: &ActionId) -> Option<&ActionDef> {
        self.actions.get(id)
    }

    pub fn monster(&self, id: &MonsterId) -> Option<&MonsterDef> {
        self.monsters.get(id)
    }

    pub fn dungeon(&self, id: &DungeonId) -> Option<&DungeonDef> {
        self.dungeons.get(id)
    }

    pub fn actions_for_skill(&self, skill: Skill) -> impl Iterator<Item = &ActionDef> {
        self.actions.values().filter(move |a| a.skill == skill)
    }
}
