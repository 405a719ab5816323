use super::constants::{
    HP_PER_HITPOINTS_LEVEL, PLAYER_REGEN_INTERVAL_TICKS, STARTING_HITPOINTS_LEVEL,
};
use super::ids::{Currency, ItemId, Skill};
use crate::activity::ActivityState;
use crate::combat::types::{CombatStyle, PlayerVitals};
use crate::items::Inventory;
use crate::mastery::{level_for_xp, xp_for_level, MasteryBook};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals accumulated over the life of the save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub ticks_simulated: u64,
    pub actions_completed: u64,
    pub monster_kills: u64,
    pub dungeon_completions: u64,
    pub deaths: u64,
}

/// Main game state containing all player progress.
///
/// One instance exists per session. Ticks take it by value and hand back the
/// next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub skill_xp: BTreeMap<Skill, u64>,
    #[serde(default)]
    pub mastery: MasteryBook,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub currencies: BTreeMap<Currency, i64>,
    /// Equipped items; the death penalty takes from here.
    #[serde(default)]
    pub equipment: Vec<ItemId>,
    #[serde(default)]
    pub combat_style: CombatStyle,
    pub player: PlayerVitals,
    #[serde(default)]
    pub activity: Option<ActivityState>,
    #[serde(default)]
    pub stats: LifetimeStats,
    /// Wall-clock time the last simulated tick accounts for, ms since epoch.
    pub last_tick_at: i64,
}

impl GameState {
    /// A fresh save: every skill at level 1 except Hitpoints.
    pub fn new(now_ms: i64) -> Self {
        let mut skill_xp = BTreeMap::new();
        skill_xp.insert(Skill::Hitpoints, xp_for_level(STARTING_HITPOINTS_LEVEL));
        let max_hp = STARTING_HITPOINTS_LEVEL * HP_PER_HITPOINTS_LEVEL;

        Self {
            skill_xp,
            mastery: MasteryBook::new(),
            inventory: Inventory::default(),
            currencies: BTreeMap::new(),
            equipment: Vec::new(),
            combat_style: CombatStyle::default(),
            player: PlayerVitals {
                hp: max_hp,
                regen_ticks_remaining: PLAYER_REGEN_INTERVAL_TICKS,
            },
            activity: None,
            stats: LifetimeStats::default(),
            last_tick_at: now_ms,
        }
    }

    pub fn skill_xp(&self, skill: Skill) -> u64 {
        self.skill_xp.get(&skill).copied().unwrap_or(0)
    }

    pub fn skill_level(&self, skill: Skill) -> u32 {
        level_for_xp(self.skill_xp(skill))
    }

    /// Adds skill XP. Returns the new level if the gain crossed one.
    pub fn add_skill_xp(&mut self, skill: Skill, xp: u64) -> Option<u32> {
        let before = self.skill_level(skill);
        let entry = self.skill_xp.entry(skill).or_insert(0);
        *entry = entry.saturating_add(xp);
        let after = level_for_xp(*entry);
        (after > before).then_some(after)
    }

    pub fn max_hp(&self) -> u32 {
        self.skill_level(Skill::Hitpoints) * HP_PER_HITPOINTS_LEVEL
    }

    pub fn currency(&self, currency: Currency) -> i64 {
        self.currencies.get(&currency).copied().unwrap_or(0)
    }

    pub fn add_currency(&mut self, currency: Currency, amount: i64) {
        *self.currencies.entry(currency).or_insert(0) += amount;
    }

    pub fn is_active(&self) -> bool {
        self.activity.is_some()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1_000);
        assert_eq!(state.skill_level(Skill::Hitpoints), 10);
        assert_eq!(state.skill_level(Skill::Woodcutting), 1);
        assert_eq!(state.max_hp(), 100);
        assert_eq!(state.player.hp, 100);
        assert_eq!(state.last_tick_at, 1_000);
        assert!(!state.is_active());
    }

    #[test]
    fn test_add_skill_xp_reports_level_up() {
        let mut state = GameState::new(0);
        assert_eq!(state.add_skill_xp(Skill::Mining, 82), None);
        assert_eq!(state.add_skill_xp(Skill::Mining, 1), Some(2));
        assert_eq!(state.skill_xp(Skill::Mining), 83);
    }

    #[test]
    fn test_max_hp_tracks_hitpoints_level() {
        let mut state = GameState::new(0);
        state.skill_xp.insert(Skill::Hitpoints, xp_for_level(20));
        assert_eq!(state.max_hp(), 200);
    }

    #[test]
    fn test_currency_can_go_negative() {
        let mut state = GameState::new(0);
        state.add_currency(Currency::Gold, -5);
        assert_eq!(state.currency(Currency::Gold), -5);
    }
}
