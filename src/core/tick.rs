//! Per-tick orchestration.
//!
//! `resolve_tick()` advances the active activity by one 100 ms tick. It takes
//! the game state by value and hands back the next state together with the
//! delta it applied and the events it produced, so the presentation layer can
//! react without the simulation knowing about any UI.

use super::changes::Changes;
use super::game_state::GameState;
use super::ids::{ActionId, DungeonId, ItemId, MonsterId, ObstacleId, Skill};
use crate::activity::ActivityState;
use crate::drops::CombatCollaborator;
use crate::modifiers::ModifierProvider;
use crate::registry::Registry;
use crate::{agility, combat, gathering};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;

/// Everything a tick reads but never writes.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub registry: &'a Registry,
    pub modifiers: &'a dyn ModifierProvider,
    pub combat: &'a dyn CombatCollaborator,
}

impl<'a> TickContext<'a> {
    pub fn new(
        registry: &'a Registry,
        modifiers: &'a dyn ModifierProvider,
        combat: &'a dyn CombatCollaborator,
    ) -> Self {
        Self {
            registry,
            modifiers,
            combat,
        }
    }
}

/// Why an activity ended on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The selected recipe's inputs ran out.
    MissingInputs,
    /// Output did not fit in the inventory.
    InventoryFull,
    CourseCompleted,
    DungeonCompleted,
    PlayerDied,
    /// The activity references an id the registry does not know.
    UnknownDefinition,
}

impl StopReason {
    /// Natural completions, as opposed to interruptions.
    pub fn is_completion(&self) -> bool {
        matches!(self, StopReason::CourseCompleted | StopReason::DungeonCompleted)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::MissingInputs => "ran out of materials",
            StopReason::InventoryFull => "inventory full",
            StopReason::CourseCompleted => "course completed",
            StopReason::DungeonCompleted => "dungeon completed",
            StopReason::PlayerDied => "player died",
            StopReason::UnknownDefinition => "unknown action or monster",
        };
        f.write_str(text)
    }
}

/// A single event produced by a tick, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Skilling ────────────────────────────────────────────────
    /// One repetition of a gathering or production action finished.
    ActionCompleted {
        action_id: ActionId,
        skill: Skill,
        xp: u64,
    },
    /// Inputs were kept thanks to a preservation roll.
    InputsPreserved { action_id: ActionId },
    /// Output was doubled.
    DoubledOutput { action_id: ActionId },
    SkillLevelUp { skill: Skill, level: u32 },
    MasteryLevelUp { action_id: ActionId, level: u32 },

    // ── Agility ─────────────────────────────────────────────────
    ObstacleCleared {
        obstacle_id: ObstacleId,
        index: usize,
    },
    CourseCompleted { bonus_xp: u64, bonus_gold: i64 },

    // ── Combat ──────────────────────────────────────────────────
    MonsterSpawned { monster_id: MonsterId },
    PlayerHit { damage: u32 },
    PlayerMissed,
    MonsterHit { damage: u32 },
    MonsterMissed,
    PlayerRegenerated { amount: u32 },
    MonsterKilled { monster_id: MonsterId, xp: u64 },
    DungeonCompleted { dungeon_id: DungeonId },
    PlayerDied {
        monster_id: MonsterId,
        item_lost: Option<ItemId>,
    },

    // ── Inventory ───────────────────────────────────────────────
    /// Part of a gain did not fit in the inventory.
    ItemsLost { item: ItemId, quantity: u64 },

    /// The activity ended this tick.
    ActivityStopped { reason: StopReason },
}

/// Result of processing a single tick.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub state: GameState,
    pub changes: Changes,
    pub events: Vec<TickEvent>,
    pub stop_reason: Option<StopReason>,
}

/// Accumulates what a tick did while the variant resolvers run.
#[derive(Debug, Default)]
pub struct TickOutput {
    pub changes: Changes,
    pub events: Vec<TickEvent>,
}

impl TickOutput {
    pub fn emit(&mut self, event: TickEvent) {
        self.events.push(event);
    }
}

/// Processes a single 100 ms tick.
///
/// With no activity the tick is a no-op and the state comes back unchanged.
/// Resource shortages end the activity with a [`StopReason`]; they are never
/// errors. `rng` is the only source of randomness, so a seeded generator
/// makes the result reproducible.
pub fn resolve_tick<R: Rng>(
    mut state: GameState,
    ctx: &TickContext<'_>,
    rng: &mut R,
) -> TickOutcome {
    let Some(activity) = state.activity.take() else {
        return TickOutcome {
            state,
            changes: Changes::new(),
            events: Vec::new(),
            stop_reason: None,
        };
    };

    let rng: &mut dyn RngCore = rng;
    let mut out = TickOutput::default();
    state.stats.ticks_simulated += 1;

    let step = match activity {
        ActivityState::Gathering(a) => gathering::logic::tick(&mut state, a, ctx, rng, &mut out),
        ActivityState::ObstacleCourse(a) => agility::logic::tick(&mut state, a, ctx, &mut out),
        ActivityState::Combat(a) => combat::logic::tick(&mut state, a, ctx, rng, &mut out),
    };

    let stop_reason = match step {
        ControlFlow::Continue(next) => {
            state.activity = Some(next);
            None
        }
        ControlFlow::Break(reason) => {
            tracing::debug!(%reason, "activity stopped");
            out.emit(TickEvent::ActivityStopped { reason });
            Some(reason)
        }
    };

    TickOutcome {
        state,
        changes: out.changes,
        events: out.events,
        stop_reason,
    }
}
