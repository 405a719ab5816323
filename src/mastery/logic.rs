//! Mastery economy: level costs, pool spending, checkpoints and accrual.
//!
//! Every operation is synchronous and either returns a fresh value or
//! reports "nothing happened" with `None`; no operation fails half-way.

use super::table::{level_for_xp, xp_for_level};
use super::types::MasteryBook;
use crate::core::constants::{
    CHECKPOINT_DOUBLE_ITEMS_BONUS, CHECKPOINT_INTERVAL_REDUCTION, CHECKPOINT_MASTERY_XP_BONUS,
    CHECKPOINT_SKILL_XP_BONUS, MASTERY_CHECKPOINTS, MASTERY_POOL_CAP_PER_TIER,
    MASTERY_POOL_SHARE_MAXED_PERCENT, MASTERY_POOL_SHARE_PERCENT, MAX_LEVEL,
};
use crate::core::ids::{ActionId, Skill};
use crate::modifiers::ModifierKind;
use crate::registry::Registry;

impl MasteryBook {
    /// XP needed to take `action` to its next level, `None` at the cap.
    pub fn cost_to_next_level(&self, action: &ActionId) -> Option<u64> {
        let level = self.action_level(action);
        if level >= MAX_LEVEL {
            return None;
        }
        Some(xp_for_level(level + 1).saturating_sub(self.action_xp(action)))
    }

    /// Total XP for `levels` successive level-ups, stopping at the cap.
    pub fn cost_for_levels(&self, action: &ActionId, levels: u32) -> u64 {
        let level = self.action_level(action);
        let target = level.saturating_add(levels).min(MAX_LEVEL);
        if target <= level {
            return 0;
        }
        xp_for_level(target).saturating_sub(self.action_xp(action))
    }

    /// Spends pool XP from `skill` to raise `action` by `levels`.
    ///
    /// Returns the new book, or `None` (and no change) when the action is
    /// already capped, `levels` is zero, or the pool cannot cover the cost.
    /// The action lands exactly on the target level's threshold.
    pub fn spend_pool_xp(
        &self,
        skill: Skill,
        action: &ActionId,
        levels: u32,
    ) -> Option<MasteryBook> {
        let level = self.action_level(action);
        if levels == 0 || level >= MAX_LEVEL {
            return None;
        }
        let target = level.saturating_add(levels).min(MAX_LEVEL);
        let cost = self.cost_for_levels(action, levels);
        let pool = self.pool_xp(skill);
        if pool < cost {
            return None;
        }

        let mut next = self.clone();
        next.set_pool_xp(skill, pool - cost);
        next.set_action_xp(action, xp_for_level(target));
        Some(next)
    }

    /// Highest checkpoint that spending `xp` from the pool would drop below.
    ///
    /// A checkpoint counts as crossed when the pool is at or above it now and
    /// strictly below it afterwards. This is only a confirmation signal; it
    /// never blocks a spend.
    pub fn checkpoint_crossed(&self, skill: Skill, pool_max: u64, xp: u64) -> Option<u32> {
        if pool_max == 0 {
            return None;
        }
        let pool = self.pool_xp(skill);
        let current = pool as u128 * 100;
        let after = pool.saturating_sub(xp) as u128 * 100;
        MASTERY_CHECKPOINTS
            .iter()
            .rev()
            .copied()
            .find(|&checkpoint| {
                let threshold = checkpoint as u128 * pool_max as u128;
                current >= threshold && after < threshold
            })
    }

    /// Checkpoints the pool currently sits at or above, ascending.
    pub fn active_checkpoints(&self, skill: Skill, pool_max: u64) -> Vec<u32> {
        if pool_max == 0 {
            return Vec::new();
        }
        let current = self.pool_xp(skill) as u128 * 100;
        MASTERY_CHECKPOINTS
            .iter()
            .copied()
            .filter(|&checkpoint| current >= checkpoint as u128 * pool_max as u128)
            .collect()
    }

    /// Skill-wide bonus, in percent, granted by the checkpoints currently held.
    pub fn checkpoint_bonus(&self, skill: Skill, pool_max: u64, kind: ModifierKind) -> f64 {
        self.active_checkpoints(skill, pool_max)
            .into_iter()
            .map(|checkpoint| match (checkpoint, kind) {
                (10, ModifierKind::MasteryXp) => CHECKPOINT_MASTERY_XP_BONUS,
                (25, ModifierKind::SkillXp) => CHECKPOINT_SKILL_XP_BONUS,
                (50, ModifierKind::ActionInterval) => CHECKPOINT_INTERVAL_REDUCTION,
                (95, ModifierKind::DoubleItems) => CHECKPOINT_DOUBLE_ITEMS_BONUS,
                _ => 0.0,
            })
            .sum()
    }

    pub fn pool_percent(&self, skill: Skill, pool_max: u64) -> f64 {
        if pool_max == 0 {
            return 0.0;
        }
        self.pool_xp(skill) as f64 * 100.0 / pool_max as f64
    }
}

/// Pool capacity of `skill`: each action unlocked at `skill_level`
/// contributes according to its tier.
pub fn pool_max(registry: &Registry, skill: Skill, skill_level: u32) -> u64 {
    registry
        .actions_for_skill(skill)
        .filter(|action| action.level_required <= skill_level)
        .map(|action| {
            let tier = action.mastery_tier.clamp(1, 4) as usize;
            MASTERY_POOL_CAP_PER_TIER[tier - 1]
        })
        .sum()
}

/// Mastery XP granted for one completion of an action.
///
/// Scales with the action's length and the current mastery level.
pub fn mastery_xp_for_completion(base_ticks: u32, mastery_xp: u64) -> u64 {
    let level = level_for_xp(mastery_xp) as u64;
    (base_ticks as u64 * (10 + level) / 20).max(1)
}

/// Portion of a mastery gain that flows into the skill pool.
pub fn pool_share(mastery_gain: u64, action_level: u32) -> u64 {
    let percent = if action_level >= MAX_LEVEL {
        MASTERY_POOL_SHARE_MAXED_PERCENT
    } else {
        MASTERY_POOL_SHARE_PERCENT
    };
    mastery_gain * percent / 100
}
