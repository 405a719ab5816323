use super::table::level_for_xp;
use crate::core::ids::{ActionId, Skill};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mastery progress for every action plus each skill's shared pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryBook {
    #[serde(default)]
    actions: BTreeMap<ActionId, u64>,
    #[serde(default)]
    pools: BTreeMap<Skill, u64>,
}

impl MasteryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action_xp(&self, action: &ActionId) -> u64 {
        self.actions.get(action).copied().unwrap_or(0)
    }

    pub fn action_level(&self, action: &ActionId) -> u32 {
        level_for_xp(self.action_xp(action))
    }

    pub fn pool_xp(&self, skill: Skill) -> u64 {
        self.pools.get(&skill).copied().unwrap_or(0)
    }

    /// Sets an action's XP outright. Used by pool spending and fixtures.
    pub fn set_action_xp(&mut self, action: &ActionId, xp: u64) {
        self.actions.insert(action.clone(), xp);
    }

    pub fn set_pool_xp(&mut self, skill: Skill, xp: u64) {
        self.pools.insert(skill, xp);
    }

    /// Adds action XP and returns the level after the gain.
    pub fn add_action_xp(&mut self, action: &ActionId, xp: u64) -> u32 {
        let entry = self.actions.entry(action.clone()).or_insert(0);
        *entry = entry.saturating_add(xp);
        level_for_xp(*entry)
    }

    /// Adds pool XP without exceeding `cap`. Returns the amount actually added.
    pub fn add_pool_xp(&mut self, skill: Skill, xp: u64, cap: u64) -> u64 {
        let entry = self.pools.entry(skill).or_insert(0);
        let before = *entry;
        *entry = before.saturating_add(xp).min(cap.max(before));
        *entry - before
    }

    pub fn iter_actions(&self) -> impl Iterator<Item = (&ActionId, u64)> {
        self.actions.iter().map(|(id, xp)| (id, *xp))
    }
}
