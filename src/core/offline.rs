//! Offline progression summary.
//!
//! Catch-up replays the real ticks; this module turns the gap into a tick
//! budget and folds the resulting deltas into the `TimeAway` report shown
//! when the player returns.

use super::batch::BatchResult;
use super::changes::Changes;
use super::constants::{MAX_OFFLINE_TICKS, TICK_INTERVAL_MS};
use super::ids::{Currency, ItemId, MonsterId, Skill};
use super::tick::StopReason;
use crate::activity::ActivityState;
use serde::Serialize;
use std::collections::BTreeMap;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Whole ticks between `last_tick_at` and `now_ms`, capped at the offline limit.
pub fn elapsed_ticks(last_tick_at: i64, now_ms: i64) -> u64 {
    if now_ms <= last_tick_at {
        return 0;
    }
    (((now_ms - last_tick_at) / TICK_INTERVAL_MS) as u64).min(MAX_OFFLINE_TICKS)
}

/// Folds per-tick or per-chunk deltas into one.
#[derive(Debug, Clone, Default)]
pub struct ChangeAggregator {
    total: Changes,
    folded: u64,
}

impl ChangeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, changes: &Changes) {
        self.total += changes;
        self.folded += 1;
    }

    /// Number of deltas folded so far.
    pub fn folded(&self) -> u64 {
        self.folded
    }

    pub fn total(&self) -> &Changes {
        &self.total
    }

    pub fn into_total(self) -> Changes {
        self.total
    }
}

impl<'a> FromIterator<&'a Changes> for ChangeAggregator {
    fn from_iter<I: IntoIterator<Item = &'a Changes>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        for changes in iter {
            aggregator.push(changes);
        }
        aggregator
    }
}

/// Aggregates divided by the real time that passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rates {
    pub skill_xp_per_hour: BTreeMap<Skill, f64>,
    pub items_per_hour: BTreeMap<ItemId, f64>,
    pub currencies_per_hour: BTreeMap<Currency, f64>,
    pub kills_per_hour: BTreeMap<MonsterId, f64>,
}

impl Rates {
    pub fn from_changes(changes: &Changes, elapsed_ms: i64) -> Self {
        Self {
            skill_xp_per_hour: per_hour_map(&changes.skill_xp, elapsed_ms, |v: u64| v as f64),
            items_per_hour: per_hour_map(&changes.items, elapsed_ms, |v: i64| v as f64),
            currencies_per_hour: per_hour_map(&changes.currencies, elapsed_ms, |v: i64| v as f64),
            kills_per_hour: per_hour_map(&changes.monster_kills, elapsed_ms, |v: u64| v as f64),
        }
    }
}

/// `value` per hour of `elapsed_ms`; zero for an empty interval.
pub fn per_hour(value: f64, elapsed_ms: i64) -> f64 {
    if elapsed_ms <= 0 {
        return 0.0;
    }
    value * MS_PER_HOUR / elapsed_ms as f64
}

fn per_hour_map<K: Ord + Clone, V: Copy>(
    values: &BTreeMap<K, V>,
    elapsed_ms: i64,
    widen: impl Fn(V) -> f64,
) -> BTreeMap<K, f64> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), per_hour(widen(*v), elapsed_ms)))
        .collect()
}

/// Everything that happened while the player was away.
#[derive(Debug, Clone, Serialize)]
pub struct TimeAway {
    pub started_at_ms: i64,
    pub resumed_at_ms: i64,
    pub elapsed_ms: i64,
    pub ticks_requested: u64,
    pub ticks_simulated: u64,
    pub cancelled: bool,
    /// What was running when the player came back, before catch-up.
    pub activity: Option<ActivityState>,
    pub stop_reason: Option<StopReason>,
    pub changes: Changes,
    pub rates: Rates,
}

impl TimeAway {
    pub fn from_batch(
        started_at_ms: i64,
        resumed_at_ms: i64,
        activity: Option<ActivityState>,
        result: &BatchResult,
    ) -> Self {
        let elapsed_ms = (resumed_at_ms - started_at_ms).max(0);
        Self {
            started_at_ms,
            resumed_at_ms,
            elapsed_ms,
            ticks_requested: result.ticks_requested,
            ticks_simulated: result.ticks_simulated,
            cancelled: result.cancelled,
            activity,
            stop_reason: result.stop_reason,
            changes: result.changes.clone(),
            rates: Rates::from_changes(&result.changes, elapsed_ms),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Human-readable report, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let seconds = self.elapsed_ms / 1000;
        lines.push(format!(
            "Away for {}h {}m",
            seconds / 3600,
            (seconds % 3600) / 60
        ));
        if let Some(activity) = &self.activity {
            lines.push(format!("Activity: {}", activity.describe()));
        }
        if self.cancelled {
            lines.push(format!(
                "Catch-up cancelled after {} of {} ticks",
                self.ticks_simulated, self.ticks_requested
            ));
        }
        if let Some(reason) = self.stop_reason {
            lines.push(format!("Stopped: {}", reason));
        }

        for (skill, xp) in &self.changes.skill_xp {
            lines.push(format!(
                "+{} {} XP ({}/h)",
                format_number_short(*xp),
                skill,
                format_number_short(self.rates.skill_xp_per_hour[skill] as u64)
            ));
        }
        for (item, count) in &self.changes.items {
            lines.push(format!("{:+} {}", count, item));
        }
        for (currency, amount) in &self.changes.currencies {
            lines.push(format!("{:+} {}", amount, currency.name()));
        }
        for (monster, kills) in &self.changes.monster_kills {
            lines.push(format!("Killed {} x{}", monster, kills));
        }
        for (dungeon, runs) in &self.changes.dungeon_completions {
            lines.push(format!("Completed {} x{}", dungeon, runs));
        }
        for (item, lost) in &self.changes.items_lost {
            lines.push(format!("Lost {} {} (inventory full)", lost, item));
        }
        if self.changes.deaths > 0 {
            lines.push(format!("Died {} time(s)", self.changes.deaths));
        }
        for (item, lost) in &self.changes.lost_on_death {
            lines.push(format!("Lost {} x{} on death", item, lost));
        }
        if self.is_empty() {
            lines.push("Nothing happened".to_string());
        }
        lines
    }

    pub fn to_text(&self) -> String {
        self.summary_lines().join("\n")
    }
}

/// Format a number with abbreviated suffixes (K, M, B).
pub fn format_number_short(n: u64) -> String {
    // (threshold, divisor, suffix)
    const TIERS: &[(u64, f64, &str)] = &[
        (1_000_000_000, 1e9, "B"),
        (1_000_000, 1e6, "M"),
        (10_000, 1e3, "K"),
    ];

    for &(threshold, divisor, suffix) in TIERS {
        if n >= threshold {
            return format!("{:.1}{}", n as f64 / divisor, suffix);
        }
    }
    n.to_string()
}
