//! Gathering and production tick processing.
//!
//! A repetition completes when progress reaches the interval. Production
//! recipes consume their inputs first; if any input is short nothing is
//! consumed and the activity stops.

use crate::activity::{ActivityState, GatheringActivity};
use crate::core::game_state::GameState;
use crate::core::progression::{action_interval, award_completion, grant_items};
use crate::core::tick::{StopReason, TickContext, TickEvent, TickOutput};
use crate::items::ItemStack;
use crate::mastery::pool_max;
use crate::modifiers::{roll_percent, ModifierKind, ModifierScope};
use rand::RngCore;
use std::ops::ControlFlow;

/// Advances a gathering activity by one tick.
pub fn tick(
    state: &mut GameState,
    mut activity: GatheringActivity,
    ctx: &TickContext<'_>,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) -> ControlFlow<StopReason, ActivityState> {
    let Some(action) = ctx.registry.action(&activity.action_id) else {
        tracing::warn!(action = %activity.action_id, "gathering unknown action");
        return ControlFlow::Break(StopReason::UnknownDefinition);
    };
    let Some(recipe) = action.recipe(activity.selected_recipe_index) else {
        return ControlFlow::Break(StopReason::UnknownDefinition);
    };

    activity.progress_ticks += 1;
    if activity.progress_ticks < activity.total_ticks {
        return ControlFlow::Continue(ActivityState::Gathering(activity));
    }

    let skill = action.skill;
    let scope = ModifierScope::Action(skill, &action.id);

    if !recipe.inputs.is_empty() {
        if !state.inventory.has_all(&recipe.inputs) {
            return ControlFlow::Break(StopReason::MissingInputs);
        }
        let preservation = ctx.modifiers.modifier(ModifierKind::Preservation, scope);
        if roll_percent(rng, preservation) {
            out.emit(TickEvent::InputsPreserved {
                action_id: action.id.clone(),
            });
        } else {
            state.inventory.remove_all(&recipe.inputs);
            for input in &recipe.inputs {
                out.changes.add_item(&input.item, -(input.quantity as i64));
            }
        }
    }

    let cap = pool_max(ctx.registry, skill, state.skill_level(skill));
    let double_chance = ctx.modifiers.modifier(ModifierKind::DoubleItems, scope)
        + state.mastery.checkpoint_bonus(skill, cap, ModifierKind::DoubleItems);
    let doubled = roll_percent(rng, double_chance);
    if doubled {
        out.emit(TickEvent::DoubledOutput {
            action_id: action.id.clone(),
        });
    }

    let mut all_fit = true;
    for output in &recipe.outputs {
        let quantity = if doubled {
            output.quantity * 2
        } else {
            output.quantity
        };
        all_fit &= grant_items(state, &ItemStack::new(output.item.clone(), quantity), out);
    }

    let xp = award_completion(state, ctx, action, out);
    out.emit(TickEvent::ActionCompleted {
        action_id: action.id.clone(),
        skill,
        xp,
    });

    if !all_fit {
        return ControlFlow::Break(StopReason::InventoryFull);
    }

    activity.progress_ticks = 0;
    activity.total_ticks = action_interval(state, ctx, action);
    ControlFlow::Continue(ActivityState::Gathering(activity))
}
