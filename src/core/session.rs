//! The owner of the single game state.
//!
//! `GameSession` validates player toggles, drives live ticks, and runs the
//! catch-up state machine that replays the time the player was away:
//!
//! ```text
//! Idle ──begin──▶ Running ──finish──▶ Completed | Cancelled ──acknowledge──▶ Idle
//!                    ▲                          │
//!                    └──────────begin───────────┘
//! ```
//!
//! While a catch-up is `Running` the live loop is suspended. Ticking live or
//! starting a second catch-up in that phase is a caller bug and panics.

use super::batch::{BatchResult, BatchSimulator};
use super::changes::Changes;
use super::constants::TICK_INTERVAL_MS;
use super::game_state::GameState;
use super::ids::{ActionId, DungeonId, MonsterId, ObstacleId, Skill};
use super::offline::{elapsed_ticks, TimeAway};
use super::progression::action_interval;
use super::snapshot::Snapshot;
use super::tick::{resolve_tick, StopReason, TickContext, TickEvent};
use crate::activity::{
    ActivityState, CombatActivity, CombatContext, GatheringActivity, ObstacleCourseActivity,
};
use crate::combat::start_fight;
use crate::drops::CombatCollaborator;
use crate::mastery::pool_max;
use crate::modifiers::ModifierProvider;
use crate::registry::Registry;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;

/// Catch-up control phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatchUpPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Why an activity could not be started or stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("unknown action `{0}`")]
    UnknownAction(ActionId),
    #[error("unknown monster `{0}`")]
    UnknownMonster(MonsterId),
    #[error("unknown dungeon `{0}`")]
    UnknownDungeon(DungeonId),
    #[error("`{action}` requires {skill} level {required} (have {current})")]
    LevelTooLow {
        action: ActionId,
        skill: Skill,
        required: u32,
        current: u32,
    },
    #[error("`{0}` has nothing to gather or produce")]
    NotGatherable(ActionId),
    #[error("`{0}` is not an agility obstacle")]
    NotAnObstacle(ObstacleId),
    #[error("an obstacle course needs at least one obstacle")]
    EmptyCourse,
    #[error("dungeon `{0}` has no monsters")]
    EmptyDungeon(DungeonId),
    #[error("`{action}` has no recipe #{index} (it has {available})")]
    RecipeOutOfRange {
        action: ActionId,
        index: usize,
        available: usize,
    },
    #[error("activities cannot change while catch-up is running")]
    CatchUpInProgress,
}

/// What a live tick did, minus the state the session keeps.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub changes: Changes,
    pub events: Vec<TickEvent>,
    pub stop_reason: Option<StopReason>,
}

/// Result of a successful pool spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterySpend {
    pub new_level: u32,
    /// Highest pool checkpoint the spend dropped below, if any.
    pub checkpoint_lost: Option<u32>,
}

#[derive(Debug, Clone)]
struct PendingCatchUp {
    started_at_ms: i64,
    resumed_at_ms: i64,
    activity: Option<ActivityState>,
}

pub struct GameSession {
    state: GameState,
    registry: Registry,
    modifiers: Box<dyn ModifierProvider>,
    combat: Box<dyn CombatCollaborator>,
    phase: CatchUpPhase,
    pending: Option<PendingCatchUp>,
    time_away: Option<TimeAway>,
}

impl GameSession {
    pub fn new(
        state: GameState,
        registry: Registry,
        modifiers: Box<dyn ModifierProvider>,
        combat: Box<dyn CombatCollaborator>,
    ) -> Self {
        Self {
            state,
            registry,
            modifiers,
            combat,
            phase: CatchUpPhase::Idle,
            pending: None,
            time_away: None,
        }
    }

    /// A fresh save stamped with the current wall-clock time.
    pub fn new_game(
        registry: Registry,
        modifiers: Box<dyn ModifierProvider>,
        combat: Box<dyn CombatCollaborator>,
    ) -> Self {
        let state = GameState::new(Utc::now().timestamp_millis());
        tracing::info!(last_tick_at = state.last_tick_at, "new game");
        Self::new(state, registry, modifiers, combat)
    }

    pub fn from_snapshot(
        snapshot: Snapshot,
        registry: Registry,
        modifiers: Box<dyn ModifierProvider>,
        combat: Box<dyn CombatCollaborator>,
    ) -> Self {
        Self::new(snapshot.state, registry, modifiers, combat)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn phase(&self) -> CatchUpPhase {
        self.phase
    }

    /// The report of the last finished catch-up, until acknowledged.
    pub fn time_away(&self) -> Option<&TimeAway> {
        self.time_away.as_ref()
    }

    /// Read-only collaborators for a tick or batch.
    pub fn context(&self) -> TickContext<'_> {
        TickContext::new(&self.registry, self.modifiers.as_ref(), self.combat.as_ref())
    }

    /// Versioned copy of the state for the persistence layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state.clone())
    }

    // ── Toggles ─────────────────────────────────────────────────

    pub fn start_gathering(
        &mut self,
        action_id: &ActionId,
        recipe: Option<usize>,
    ) -> Result<(), ToggleError> {
        self.ensure_not_running()?;
        let action = self
            .registry
            .action(action_id)
            .ok_or_else(|| ToggleError::UnknownAction(action_id.clone()))?;
        if action.recipes.is_empty() {
            return Err(ToggleError::NotGatherable(action_id.clone()));
        }
        if let Some(index) = recipe {
            if index >= action.recipes.len() {
                return Err(ToggleError::RecipeOutOfRange {
                    action: action_id.clone(),
                    index,
                    available: action.recipes.len(),
                });
            }
        }
        let current = self.state.skill_level(action.skill);
        if current < action.level_required {
            return Err(ToggleError::LevelTooLow {
                action: action_id.clone(),
                skill: action.skill,
                required: action.level_required,
                current,
            });
        }

        let total = action_interval(&self.state, &self.context(), action);
        let activity = GatheringActivity::new(action_id.clone(), total, recipe);
        self.replace_activity(ActivityState::Gathering(activity));
        Ok(())
    }

    pub fn start_course(&mut self, obstacle_ids: Vec<ObstacleId>) -> Result<(), ToggleError> {
        self.ensure_not_running()?;
        let agility = self.state.skill_level(Skill::Agility);
        for id in &obstacle_ids {
            let obstacle = self
                .registry
                .action(id)
                .ok_or_else(|| ToggleError::UnknownAction(id.clone()))?;
            if obstacle.skill != Skill::Agility {
                return Err(ToggleError::NotAnObstacle(id.clone()));
            }
            if agility < obstacle.level_required {
                return Err(ToggleError::LevelTooLow {
                    action: id.clone(),
                    skill: Skill::Agility,
                    required: obstacle.level_required,
                    current: agility,
                });
            }
        }

        let Some(first) = obstacle_ids.first().and_then(|id| self.registry.action(id)) else {
            return Err(ToggleError::EmptyCourse);
        };
        let total = action_interval(&self.state, &self.context(), first);
        let course =
            ObstacleCourseActivity::new(obstacle_ids, total).ok_or(ToggleError::EmptyCourse)?;
        self.replace_activity(ActivityState::ObstacleCourse(course));
        Ok(())
    }

    pub fn start_monster(&mut self, monster_id: &MonsterId) -> Result<(), ToggleError> {
        self.ensure_not_running()?;
        let monster = self
            .registry
            .monster(monster_id)
            .ok_or_else(|| ToggleError::UnknownMonster(monster_id.clone()))?;
        let fight = start_fight(
            &self.state,
            self.modifiers.as_ref(),
            CombatContext::single(monster_id.clone()),
            monster,
        );
        self.replace_activity(ActivityState::Combat(fight));
        Ok(())
    }

    pub fn start_dungeon(&mut self, dungeon_id: &DungeonId) -> Result<(), ToggleError> {
        self.ensure_not_running()?;
        let dungeon = self
            .registry
            .dungeon(dungeon_id)
            .ok_or_else(|| ToggleError::UnknownDungeon(dungeon_id.clone()))?;
        if let Some(missing) = dungeon
            .monsters
            .iter()
            .find(|id| self.registry.monster(id).is_none())
        {
            return Err(ToggleError::UnknownMonster(missing.clone()));
        }

        let context = CombatContext::sequence(dungeon_id.clone(), dungeon.monsters.clone())
            .ok_or_else(|| ToggleError::EmptyDungeon(dungeon_id.clone()))?;
        let first = context
            .current_monster_id()
            .and_then(|id| self.registry.monster(id))
            .ok_or_else(|| ToggleError::EmptyDungeon(dungeon_id.clone()))?;
        let fight: CombatActivity =
            start_fight(&self.state, self.modifiers.as_ref(), context, first);
        self.replace_activity(ActivityState::Combat(fight));
        Ok(())
    }

    /// Stops whatever is running and returns it.
    pub fn stop_activity(&mut self) -> Result<Option<ActivityState>, ToggleError> {
        self.ensure_not_running()?;
        let stopped = self.state.activity.take();
        if let Some(activity) = &stopped {
            tracing::info!(activity = %activity.describe(), "activity stopped by player");
        }
        Ok(stopped)
    }

    fn replace_activity(&mut self, activity: ActivityState) {
        tracing::info!(
            activity = %activity.describe(),
            replaced = self.state.activity.is_some(),
            "activity started"
        );
        self.state.activity = Some(activity);
    }

    fn ensure_not_running(&self) -> Result<(), ToggleError> {
        if self.phase == CatchUpPhase::Running {
            return Err(ToggleError::CatchUpInProgress);
        }
        Ok(())
    }

    // ── Mastery ─────────────────────────────────────────────────

    /// Spends pool XP of the action's skill to raise its mastery by `levels`.
    ///
    /// Returns `None`, leaving the state untouched, for unknown actions,
    /// capped actions, or an insufficient pool.
    ///
    /// # Panics
    ///
    /// Panics while a catch-up is running.
    pub fn spend_pool_xp(&mut self, action_id: &ActionId, levels: u32) -> Option<MasterySpend> {
        assert_ne!(
            self.phase,
            CatchUpPhase::Running,
            "mastery spent while catch-up is running"
        );
        let skill = self.registry.action(action_id)?.skill;
        let cost = self.state.mastery.cost_for_levels(action_id, levels);
        let max = pool_max(&self.registry, skill, self.state.skill_level(skill));
        let checkpoint_lost = self.state.mastery.checkpoint_crossed(skill, max, cost);

        let next = self.state.mastery.spend_pool_xp(skill, action_id, levels)?;
        self.state.mastery = next;
        let new_level = self.state.mastery.action_level(action_id);
        tracing::info!(action = %action_id, cost, new_level, "mastery pool spent");
        Some(MasterySpend {
            new_level,
            checkpoint_lost,
        })
    }

    // ── Live loop ───────────────────────────────────────────────

    /// Resolves one live tick and advances `last_tick_at` by one interval.
    ///
    /// # Panics
    ///
    /// Panics while a catch-up is running.
    pub fn live_tick<R: Rng>(&mut self, rng: &mut R) -> TickReport {
        assert_ne!(
            self.phase,
            CatchUpPhase::Running,
            "live tick while catch-up is running"
        );
        let ctx = TickContext::new(&self.registry, self.modifiers.as_ref(), self.combat.as_ref());
        let state = std::mem::take(&mut self.state);
        let outcome = resolve_tick(state, &ctx, rng);
        self.state = outcome.state;
        self.state.last_tick_at += TICK_INTERVAL_MS;
        TickReport {
            changes: outcome.changes,
            events: outcome.events,
            stop_reason: outcome.stop_reason,
        }
    }

    // ── Catch-up ────────────────────────────────────────────────

    /// Enters `Running` and returns a simulator over the time since the last
    /// tick. The caller drives it (with [`GameSession::context`]) and hands
    /// the result to [`GameSession::finish_catch_up`].
    ///
    /// # Panics
    ///
    /// Panics if a catch-up is already running.
    pub fn begin_catch_up<R: Rng>(&mut self, now_ms: i64, rng: R) -> BatchSimulator<R> {
        assert_ne!(self.phase, CatchUpPhase::Running, "catch-up already running");

        let ticks = elapsed_ticks(self.state.last_tick_at, now_ms);
        tracing::info!(
            ticks,
            last_tick_at = self.state.last_tick_at,
            now_ms,
            activity = self.state.activity.as_ref().map(|a| a.kind()).unwrap_or("none"),
            "catch-up started"
        );
        self.phase = CatchUpPhase::Running;
        self.time_away = None;
        self.pending = Some(PendingCatchUp {
            started_at_ms: self.state.last_tick_at,
            resumed_at_ms: now_ms,
            activity: self.state.activity.clone(),
        });
        BatchSimulator::new(self.state.clone(), rng, ticks)
    }

    /// Adopts the simulated state and builds the away report.
    ///
    /// `last_tick_at` moves forward by exactly the ticks the batch accounted
    /// for, so the sub-tick remainder carries into the next catch-up.
    ///
    /// # Panics
    ///
    /// Panics unless a catch-up is running.
    pub fn finish_catch_up(&mut self, result: BatchResult) -> &TimeAway {
        assert_eq!(self.phase, CatchUpPhase::Running, "no catch-up is running");
        let pending = self.pending.take().unwrap_or(PendingCatchUp {
            started_at_ms: self.state.last_tick_at,
            resumed_at_ms: self.state.last_tick_at,
            activity: None,
        });

        let away = TimeAway::from_batch(
            pending.started_at_ms,
            pending.resumed_at_ms,
            pending.activity,
            &result,
        );
        let accounted = result.ticks_accounted();
        self.phase = if result.cancelled {
            CatchUpPhase::Cancelled
        } else {
            CatchUpPhase::Completed
        };
        self.state = result.state;
        self.state.last_tick_at = pending.started_at_ms + accounted as i64 * TICK_INTERVAL_MS;

        tracing::info!(
            ticks_simulated = away.ticks_simulated,
            ticks_requested = away.ticks_requested,
            cancelled = away.cancelled,
            stop_reason = ?away.stop_reason,
            "catch-up finished"
        );
        self.time_away.insert(away)
    }

    /// Runs a whole catch-up synchronously.
    pub fn catch_up<R: Rng>(&mut self, now_ms: i64, rng: R) -> &TimeAway {
        let simulator = self.begin_catch_up(now_ms, rng);
        let result = simulator.run(&self.context());
        self.finish_catch_up(result)
    }

    /// Dismisses the away report and returns to `Idle`.
    ///
    /// # Panics
    ///
    /// Panics while a catch-up is running.
    pub fn acknowledge(&mut self) -> Option<TimeAway> {
        assert_ne!(
            self.phase,
            CatchUpPhase::Running,
            "acknowledge while catch-up is running"
        );
        self.phase = CatchUpPhase::Idle;
        self.time_away.take()
    }
}
