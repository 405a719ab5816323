//! XP, mastery and currency awards shared by every skill action.
//!
//! Gathering, production and obstacles all complete the same way: skill XP
//! with modifiers, mastery XP for the action, a share of it into the skill's
//! pool, and any fixed currency reward.

use super::game_state::GameState;
use super::ids::{Currency, Skill};
use super::tick::{TickContext, TickEvent, TickOutput};
use crate::items::ItemStack;
use crate::mastery::{mastery_xp_for_completion, pool_max, pool_share};
use crate::modifiers::{apply_percent, reduce_ticks, scale_currency, ModifierKind, ModifierScope};
use crate::registry::ActionDef;

/// Skill XP with a percent bonus, recording level-ups.
pub fn grant_skill_xp(
    state: &mut GameState,
    skill: Skill,
    base_xp: u64,
    percent: f64,
    out: &mut TickOutput,
) -> u64 {
    let xp = apply_percent(base_xp, percent);
    if let Some(level) = state.add_skill_xp(skill, xp) {
        out.emit(TickEvent::SkillLevelUp { skill, level });
    }
    out.changes.add_skill_xp(skill, xp);
    xp
}

/// Awards one completion of `action`. Returns the skill XP granted.
pub fn award_completion(
    state: &mut GameState,
    ctx: &TickContext<'_>,
    action: &ActionDef,
    out: &mut TickOutput,
) -> u64 {
    let skill = action.skill;
    let scope = ModifierScope::Action(skill, &action.id);
    let cap = pool_max(ctx.registry, skill, state.skill_level(skill));

    let skill_bonus = ctx.modifiers.modifier(ModifierKind::SkillXp, scope)
        + state.mastery.checkpoint_bonus(skill, cap, ModifierKind::SkillXp);
    let xp = grant_skill_xp(state, skill, action.skill_xp, skill_bonus, out);

    if skill.has_mastery() {
        let mastery_bonus = ctx.modifiers.modifier(ModifierKind::MasteryXp, scope)
            + state.mastery.checkpoint_bonus(skill, cap, ModifierKind::MasteryXp);
        let mastery_xp = state.mastery.action_xp(&action.id);
        let base = mastery_xp_for_completion(action.base_ticks, mastery_xp);
        let gain = apply_percent(base, mastery_bonus);

        let level_before = state.mastery.action_level(&action.id);
        let level = state.mastery.add_action_xp(&action.id, gain);
        if level > level_before {
            out.emit(TickEvent::MasteryLevelUp {
                action_id: action.id.clone(),
                level,
            });
        }
        out.changes.add_mastery_xp(&action.id, gain);

        // A skill level-up may have unlocked more actions.
        let cap = pool_max(ctx.registry, skill, state.skill_level(skill));
        let added = state.mastery.add_pool_xp(skill, pool_share(gain, level), cap);
        out.changes.add_pool_xp(skill, added);
    }

    for &(currency, amount) in &action.currency_rewards {
        grant_currency(state, ctx, currency, amount, out);
    }

    state.stats.actions_completed += 1;
    out.changes.actions_completed += 1;
    xp
}

/// Currency after the gain modifier. Returns the amount granted.
pub fn grant_currency(
    state: &mut GameState,
    ctx: &TickContext<'_>,
    currency: Currency,
    amount: i64,
    out: &mut TickOutput,
) -> i64 {
    let percent = ctx
        .modifiers
        .modifier(ModifierKind::CurrencyGain, ModifierScope::Currency(currency));
    let amount = scale_currency(amount, percent);
    state.add_currency(currency, amount);
    out.changes.add_currency(currency, amount);
    amount
}

/// Puts a stack in the inventory, counting whatever does not fit as lost.
/// Returns true if everything fit.
pub fn grant_items(state: &mut GameState, stack: &ItemStack, out: &mut TickOutput) -> bool {
    let lost = state.inventory.add(stack);
    let kept = stack.quantity - lost;
    if kept > 0 {
        out.changes.add_item(&stack.item, kept as i64);
    }
    if lost > 0 {
        out.changes.add_item_lost(&stack.item, lost);
        out.emit(TickEvent::ItemsLost {
            item: stack.item.clone(),
            quantity: lost,
        });
    }
    lost == 0
}

/// Interval of the next repetition of `action`.
pub fn action_interval(state: &GameState, ctx: &TickContext<'_>, action: &ActionDef) -> u32 {
    let skill = action.skill;
    let cap = pool_max(ctx.registry, skill, state.skill_level(skill));
    let reduction = ctx
        .modifiers
        .modifier(ModifierKind::ActionInterval, ModifierScope::Action(skill, &action.id))
        + state.mastery.checkpoint_bonus(skill, cap, ModifierKind::ActionInterval);
    reduce_ticks(action.base_ticks, reduction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{ActionId, ItemId};
    use crate::drops::NoDrops;
    use crate::modifiers::{ModifierTable, NoModifiers};
    use crate::registry::Registry;

    #[test]
    fn test_award_completion_grants_xp_mastery_and_pool() {
        let registry = Registry::builtin();
        let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
        let mut state = GameState::new(0);
        let mut out = TickOutput::default();
        let oak = ActionId::new("normal_tree");
        let action = registry.action(&oak).unwrap();

        let xp = award_completion(&mut state, &ctx, action, &mut out);

        assert_eq!(xp, action.skill_xp);
        assert_eq!(state.skill_xp(Skill::Woodcutting), action.skill_xp);
        let mastery = state.mastery.action_xp(&oak);
        assert_eq!(mastery, mastery_xp_for_completion(action.base_ticks, 0));
        assert_eq!(state.mastery.pool_xp(Skill::Woodcutting), mastery / 4);
        assert_eq!(out.changes.actions_completed, 1);
        assert_eq!(out.changes.mastery_xp[&oak], mastery);
    }

    #[test]
    fn test_skill_modifier_applies_once() {
        let registry = Registry::builtin();
        let modifiers =
            ModifierTable::new().skill(ModifierKind::SkillXp, Skill::Woodcutting, 100.0);
        let ctx = TickContext::new(&registry, &modifiers, &NoDrops);
        let mut state = GameState::new(0);
        let mut out = TickOutput::default();
        let action = registry.action(&ActionId::new("normal_tree")).unwrap();

        let xp = award_completion(&mut state, &ctx, action, &mut out);
        assert_eq!(xp, action.skill_xp * 2);
    }

    #[test]
    fn test_grant_items_counts_overflow() {
        let mut state = GameState::new(0);
        state.inventory = crate::items::Inventory::new(1);
        let mut out = TickOutput::default();

        assert!(grant_items(&mut state, &ItemStack::new("logs", 2), &mut out));
        assert!(!grant_items(&mut state, &ItemStack::new("ore", 3), &mut out));
        assert_eq!(out.changes.items_lost[&ItemId::new("ore")], 3);
        assert_eq!(out.changes.items[&ItemId::new("logs")], 2);
    }

    #[test]
    fn test_action_interval_applies_reduction() {
        let registry = Registry::builtin();
        let modifiers =
            ModifierTable::new().action(ModifierKind::ActionInterval, "normal_tree", 10.0);
        let ctx = TickContext::new(&registry, &modifiers, &NoDrops);
        let state = GameState::new(0);
        let action = registry.action(&ActionId::new("normal_tree")).unwrap();
        assert_eq!(action_interval(&state, &ctx, action), 27);
    }
}
