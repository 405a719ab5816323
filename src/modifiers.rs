//! Numeric bonuses resolved outside the simulation core.
//!
//! Equipment, passives and upgrades all reduce to named percentage
//! modifiers. The tick resolver only ever asks "how much of modifier X
//! applies to scope Y" and treats the answer as fixed for the tick.

use crate::core::ids::{ActionId, Currency, ItemId, MonsterId, Skill};
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

/// Named multipliers, all expressed in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKind {
    SkillXp,
    MasteryXp,
    /// Reduction of an action's interval.
    ActionInterval,
    /// Chance to receive double output.
    DoubleItems,
    /// Chance for a production action not to consume its inputs.
    Preservation,
    CurrencyGain,
    Damage,
    Accuracy,
    Evasion,
    /// Reduction of incoming damage.
    DamageReduction,
    /// Reduction of the player's attack interval.
    AttackInterval,
}

/// What a modifier lookup is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierScope<'a> {
    Global,
    Skill(Skill),
    Action(Skill, &'a ActionId),
    Item(&'a ItemId),
    Currency(Currency),
    Monster(&'a MonsterId),
}

/// The injected provider. Must be pure for the duration of a tick.
pub trait ModifierProvider {
    fn modifier(&self, kind: ModifierKind, scope: ModifierScope<'_>) -> f64;
}

/// A provider with every modifier at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModifiers;

impl ModifierProvider for NoModifiers {
    fn modifier(&self, _kind: ModifierKind, _scope: ModifierScope<'_>) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ScopeKey {
    Global,
    Skill(Skill),
    Action(ActionId),
    Item(ItemId),
    Currency(Currency),
    Monster(MonsterId),
}

/// Table-backed provider.
///
/// A scoped lookup sums the global entry, the skill entry (for skill and
/// action scopes) and the entry for the exact scope.
#[derive(Debug, Clone, Default)]
pub struct ModifierTable {
    entries: BTreeMap<(ModifierKind, ScopeKey), f64>,
}

impl ModifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(mut self, kind: ModifierKind, value: f64) -> Self {
        self.add(kind, ScopeKey::Global, value);
        self
    }

    pub fn skill(mut self, kind: ModifierKind, skill: Skill, value: f64) -> Self {
        self.add(kind, ScopeKey::Skill(skill), value);
        self
    }

    pub fn action(mut self, kind: ModifierKind, action: impl Into<ActionId>, value: f64) -> Self {
        self.add(kind, ScopeKey::Action(action.into()), value);
        self
    }

    pub fn item(mut self, kind: ModifierKind, item: impl Into<ItemId>, value: f64) -> Self {
        self.add(kind, ScopeKey::Item(item.into()), value);
        self
    }

    pub fn currency(mut self, kind: ModifierKind, currency: Currency, value: f64) -> Self {
        self.add(kind, ScopeKey::Currency(currency), value);
        self
    }

    pub fn monster(
        mut self,
        kind: ModifierKind,
        monster: impl Into<MonsterId>,
        value: f64,
    ) -> Self {
        self.add(kind, ScopeKey::Monster(monster.into()), value);
        self
    }

    fn add(&mut self, kind: ModifierKind, key: ScopeKey, value: f64) {
        *self.entries.entry((kind, key)).or_insert(0.0) += value;
    }

    fn get(&self, kind: ModifierKind, key: ScopeKey) -> f64 {
        self.entries.get(&(kind, key)).copied().unwrap_or(0.0)
    }
}

impl ModifierProvider for ModifierTable {
    fn modifier(&self, kind: ModifierKind, scope: ModifierScope<'_>) -> f64 {
        let global = self.get(kind, ScopeKey::Global);
        let scoped = match scope {
            ModifierScope::Global => 0.0,
            ModifierScope::Skill(skill) => self.get(kind, ScopeKey::Skill(skill)),
            ModifierScope::Action(skill, action) => {
                self.get(kind, ScopeKey::Skill(skill))
                    + self.get(kind, ScopeKey::Action(action.clone()))
            }
            ModifierScope::Item(item) => self.get(kind, ScopeKey::Item(item.clone())),
            ModifierScope::Currency(currency) => self.get(kind, ScopeKey::Currency(currency)),
            ModifierScope::Monster(monster) => self.get(kind, ScopeKey::Monster(monster.clone())),
        };
        global + scoped
    }
}

/// Applies a percent bonus to an integer amount, rounding down.
pub fn apply_percent(amount: u64, percent: f64) -> u64 {
    if percent == 0.0 {
        return amount;
    }
    (amount as f64 * (1.0 + percent / 100.0)).max(0.0) as u64
}

/// Applies a percent reduction to a tick interval, never below one tick.
pub fn reduce_ticks(ticks: u32, reduction_percent: f64) -> u32 {
    let reduced = ticks as f64 * (1.0 - reduction_percent / 100.0);
    (reduced as u32).max(1)
}

/// Applies a percent bonus to a currency amount. Costs (negative amounts)
/// are left untouched.
pub fn scale_currency(amount: i64, percent: f64) -> i64 {
    if amount <= 0 {
        return amount;
    }
    apply_percent(amount as u64, percent).min(i64::MAX as u64) as i64
}

/// Rolls a percent chance. Non-positive chances never draw from `rng`.
pub fn roll_percent(rng: &mut dyn RngCore, percent: f64) -> bool {
    if percent.is_nan() || percent <= 0.0 {
        return false;
    }
    rng.gen_bool((percent / 100.0).min(1.0))
}
