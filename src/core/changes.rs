//! Additive deltas produced by ticks.
//!
//! A `Changes` value never carries a zero entry, so two deltas with the
//! same totals compare equal regardless of how they were assembled.

use super::ids::{ActionId, Currency, DungeonId, ItemId, MonsterId, Skill};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skill_xp: BTreeMap<Skill, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mastery_xp: BTreeMap<ActionId, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mastery_pool_xp: BTreeMap<Skill, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub items: BTreeMap<ItemId, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub currencies: BTreeMap<Currency, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monster_kills: BTreeMap<MonsterId, u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dungeon_completions: BTreeMap<DungeonId, u64>,
    /// Items that did not fit in the inventory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub items_lost: BTreeMap<ItemId, u64>,
    /// Equipment taken by the death penalty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lost_on_death: BTreeMap<ItemId, u64>,
    #[serde(default)]
    pub deaths: u64,
    #[serde(default)]
    pub actions_completed: u64,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn add_skill_xp(&mut self, skill: Skill, xp: u64) {
        bump(&mut self.skill_xp, skill, xp);
    }

    pub fn add_mastery_xp(&mut self, action: &ActionId, xp: u64) {
        bump(&mut self.mastery_xp, action.clone(), xp);
    }

    pub fn add_pool_xp(&mut self, skill: Skill, xp: u64) {
        bump(&mut self.mastery_pool_xp, skill, xp);
    }

    pub fn add_item(&mut self, item: &ItemId, delta: i64) {
        bump_signed(&mut self.items, item.clone(), delta);
    }

    pub fn add_currency(&mut self, currency: Currency, delta: i64) {
        bump_signed(&mut self.currencies, currency, delta);
    }

    pub fn add_kill(&mut self, monster: &MonsterId) {
        bump(&mut self.monster_kills, monster.clone(), 1);
    }

    pub fn add_dungeon_completion(&mut self, dungeon: &DungeonId) {
        bump(&mut self.dungeon_completions, dungeon.clone(), 1);
    }

    pub fn add_item_lost(&mut self, item: &ItemId, quantity: u64) {
        bump(&mut self.items_lost, item.clone(), quantity);
    }

    pub fn add_lost_on_death(&mut self, item: &ItemId) {
        bump(&mut self.lost_on_death, item.clone(), 1);
    }

    pub fn total_skill_xp(&self) -> u64 {
        self.skill_xp.values().sum()
    }

    pub fn total_kills(&self) -> u64 {
        self.monster_kills.values().sum()
    }

    /// Entry-wise sum of two deltas.
    pub fn merge(mut self, other: &Changes) -> Changes {
        self += other;
        self
    }
}

impl AddAssign<&Changes> for Changes {
    fn add_assign(&mut self, other: &Changes) {
        merge_unsigned(&mut self.skill_xp, &other.skill_xp);
        merge_unsigned(&mut self.mastery_xp, &other.mastery_xp);
        merge_unsigned(&mut self.mastery_pool_xp, &other.mastery_pool_xp);
        merge_signed(&mut self.items, &other.items);
        merge_signed(&mut self.currencies, &other.currencies);
        merge_unsigned(&mut self.monster_kills, &other.monster_kills);
        merge_unsigned(&mut self.dungeon_completions, &other.dungeon_completions);
        merge_unsigned(&mut self.items_lost, &other.items_lost);
        merge_unsigned(&mut self.lost_on_death, &other.lost_on_death);
        self.deaths += other.deaths;
        self.actions_completed += other.actions_completed;
    }
}

impl AddAssign for Changes {
    fn add_assign(&mut self, other: Changes) {
        *self += &other;
    }
}

impl Add for Changes {
    type Output = Changes;

    fn add(mut self, other: Changes) -> Changes {
        self += &other;
        self
    }
}

fn bump<K: Ord>(map: &mut BTreeMap<K, u64>, key: K, amount: u64) {
    if amount == 0 {
        return;
    }
    *map.entry(key).or_insert(0) += amount;
}

fn bump_signed<K: Ord>(map: &mut BTreeMap<K, i64>, key: K, delta: i64) {
    if delta == 0 {
        return;
    }
    match map.entry(key) {
        Entry::Occupied(mut entry) => {
            *entry.get_mut() += delta;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(delta);
        }
    }
}

fn merge_unsigned<K: Ord + Clone>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, amount) in from {
        bump(into, key.clone(), *amount);
    }
}

fn merge_signed<K: Ord + Clone>(into: &mut BTreeMap<K, i64>, from: &BTreeMap<K, i64>) {
    for (key, delta) in from {
        bump_signed(into, key.clone(), *delta);
    }
}
