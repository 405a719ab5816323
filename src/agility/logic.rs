//! Obstacle course tick processing.
//!
//! Each obstacle pays out like any other skill action. Clearing the last one
//! adds a completion bonus worth half of the course's summed base XP and
//! currency, then ends the activity.

use crate::activity::{ActivityState, ObstacleCourseActivity};
use crate::core::constants::COURSE_COMPLETION_BONUS_PERCENT;
use crate::core::game_state::GameState;
use crate::core::ids::{Currency, ObstacleId, Skill};
use crate::core::progression::{action_interval, award_completion, grant_currency, grant_skill_xp};
use crate::core::tick::{StopReason, TickContext, TickEvent, TickOutput};
use crate::modifiers::{ModifierKind, ModifierScope};
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::ops::ControlFlow;

/// Summed base XP and currency of every obstacle in a course.
pub fn course_totals(
    registry: &Registry,
    obstacles: &[ObstacleId],
) -> (u64, BTreeMap<Currency, i64>) {
    let mut xp = 0;
    let mut currencies = BTreeMap::new();
    for obstacle in obstacles.iter().filter_map(|id| registry.action(id)) {
        xp += obstacle.skill_xp;
        for &(currency, amount) in &obstacle.currency_rewards {
            *currencies.entry(currency).or_insert(0) += amount;
        }
    }
    (xp, currencies)
}

/// Advances an obstacle course by one tick.
pub fn tick(
    state: &mut GameState,
    mut course: ObstacleCourseActivity,
    ctx: &TickContext<'_>,
    out: &mut TickOutput,
) -> ControlFlow<StopReason, ActivityState> {
    let Some(obstacle) = course
        .current_obstacle_id()
        .and_then(|id| ctx.registry.action(id))
    else {
        tracing::warn!(index = course.current_obstacle_index, "course references unknown obstacle");
        return ControlFlow::Break(StopReason::UnknownDefinition);
    };

    course.progress_ticks += 1;
    if course.progress_ticks < course.total_ticks {
        return ControlFlow::Continue(ActivityState::ObstacleCourse(course));
    }

    award_completion(state, ctx, obstacle, out);
    out.emit(TickEvent::ObstacleCleared {
        obstacle_id: obstacle.id.clone(),
        index: course.current_obstacle_index,
    });

    if course.is_last_obstacle() {
        complete_course(state, ctx, &course, out);
        return ControlFlow::Break(StopReason::CourseCompleted);
    }

    course.current_obstacle_index += 1;
    let Some(next) = course
        .current_obstacle_id()
        .and_then(|id| ctx.registry.action(id))
    else {
        return ControlFlow::Break(StopReason::UnknownDefinition);
    };
    course.progress_ticks = 0;
    course.total_ticks = action_interval(state, ctx, next);
    ControlFlow::Continue(ActivityState::ObstacleCourse(course))
}

fn complete_course(
    state: &mut GameState,
    ctx: &TickContext<'_>,
    course: &ObstacleCourseActivity,
    out: &mut TickOutput,
) {
    let (xp, currencies) = course_totals(ctx.registry, &course.obstacle_ids);
    let percent = ctx
        .modifiers
        .modifier(ModifierKind::SkillXp, ModifierScope::Skill(Skill::Agility));
    let bonus_xp = grant_skill_xp(
        state,
        Skill::Agility,
        xp * COURSE_COMPLETION_BONUS_PERCENT / 100,
        percent,
        out,
    );

    let mut bonus_gold = 0;
    for (currency, amount) in currencies {
        let bonus = amount * COURSE_COMPLETION_BONUS_PERCENT as i64 / 100;
        let granted = grant_currency(state, ctx, currency, bonus, out);
        if currency == Currency::Gold {
            bonus_gold = granted;
        }
    }

    tracing::debug!(bonus_xp, bonus_gold, obstacles = course.obstacle_count(), "course completed");
    out.emit(TickEvent::CourseCompleted {
        bonus_xp,
        bonus_gold,
    });
}
