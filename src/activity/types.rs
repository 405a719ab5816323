//! What the player is currently doing.
//!
//! Exactly one activity runs at a time. The tick resolver is its only writer;
//! everything else reads it or replaces it wholesale. Derived queries are
//! computed from the stored index on every call because the index moves
//! every few ticks.

use crate::core::clock::ProgressClock;
use crate::core::ids::{ActionId, DungeonId, MonsterId, ObstacleId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityState {
    Gathering(GatheringActivity),
    ObstacleCourse(ObstacleCourseActivity),
    Combat(CombatActivity),
}

impl ActivityState {
    /// The record discriminator for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityState::Gathering(_) => "gathering",
            ActivityState::ObstacleCourse(_) => "obstacle_course",
            ActivityState::Combat(_) => "combat",
        }
    }

    pub fn progress_ticks(&self) -> u32 {
        match self {
            ActivityState::Gathering(a) => a.progress_ticks,
            ActivityState::ObstacleCourse(a) => a.progress_ticks,
            ActivityState::Combat(a) => a.progress_ticks,
        }
    }

    pub fn total_ticks(&self) -> u32 {
        match self {
            ActivityState::Gathering(a) => a.total_ticks,
            ActivityState::ObstacleCourse(a) => a.total_ticks,
            ActivityState::Combat(a) => a.total_ticks,
        }
    }

    /// Progress of the current repetition, anchored at `reference_ms`.
    pub fn clock(&self, reference_ms: i64) -> ProgressClock {
        ProgressClock::new(self.progress_ticks(), self.total_ticks(), reference_ms)
    }

    /// One-line description for logs and summaries.
    pub fn describe(&self) -> String {
        match self {
            ActivityState::Gathering(a) => format!("gathering {}", a.action_id),
            ActivityState::ObstacleCourse(a) => format!(
                "agility course, obstacle {}/{}",
                a.current_obstacle_index + 1,
                a.obstacle_count()
            ),
            ActivityState::Combat(a) => match &a.context {
                CombatContext::SingleMonster { monster_id } => format!("fighting {}", monster_id),
                CombatContext::Sequence {
                    sequence_id,
                    current_monster_index,
                    monster_ids,
                } => format!(
                    "dungeon {} ({}/{})",
                    sequence_id,
                    current_monster_index + 1,
                    monster_ids.len()
                ),
            },
        }
    }
}

/// A single repeatable action, looping until stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct GatheringActivity {
    pub action_id: ActionId,
    pub progress_ticks: u32,
    pub total_ticks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_recipe_index: Option<usize>,
}

impl GatheringActivity {
    pub fn new(
        action_id: ActionId,
        total_ticks: u32,
        selected_recipe_index: Option<usize>,
    ) -> Self {
        Self {
            action_id,
            progress_ticks: 0,
            total_ticks,
            selected_recipe_index,
        }
    }
}

/// An ordered run of obstacles, completed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ObstacleCourseActivity {
    pub obstacle_ids: Vec<ObstacleId>,
    pub current_obstacle_index: usize,
    pub progress_ticks: u32,
    pub total_ticks: u32,
}

impl ObstacleCourseActivity {
    /// `None` for an empty course.
    pub fn new(obstacle_ids: Vec<ObstacleId>, first_total_ticks: u32) -> Option<Self> {
        if obstacle_ids.is_empty() {
            return None;
        }
        Some(Self {
            obstacle_ids,
            current_obstacle_index: 0,
            progress_ticks: 0,
            total_ticks: first_total_ticks,
        })
    }

    pub fn current_obstacle_id(&self) -> Option<&ObstacleId> {
        self.obstacle_ids.get(self.current_obstacle_index)
    }

    pub fn is_last_obstacle(&self) -> bool {
        self.current_obstacle_index + 1 == self.obstacle_ids.len()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacle_ids.len()
    }

    pub(crate) fn index_in_range(&self) -> bool {
        self.current_obstacle_index < self.obstacle_ids.len()
    }
}

/// Fighting one monster on repeat, or a dungeon's monsters in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct CombatActivity {
    pub context: CombatContext,
    pub progress: CombatProgressState,
    /// Player swing progress, for the attack bar.
    pub progress_ticks: u32,
    pub total_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatContext {
    SingleMonster {
        monster_id: MonsterId,
    },
    Sequence {
        sequence_id: DungeonId,
        current_monster_index: usize,
        monster_ids: Vec<MonsterId>,
    },
}

impl CombatContext {
    pub fn single(monster_id: MonsterId) -> Self {
        CombatContext::SingleMonster { monster_id }
    }

    /// `None` for an empty sequence.
    pub fn sequence(sequence_id: DungeonId, monster_ids: Vec<MonsterId>) -> Option<Self> {
        if monster_ids.is_empty() {
            return None;
        }
        Some(CombatContext::Sequence {
            sequence_id,
            current_monster_index: 0,
            monster_ids,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CombatContext::SingleMonster { .. } => "single_monster",
            CombatContext::Sequence { .. } => "sequence",
        }
    }

    pub fn current_monster_id(&self) -> Option<&MonsterId> {
        match self {
            CombatContext::SingleMonster { monster_id } => Some(monster_id),
            CombatContext::Sequence {
                current_monster_index,
                monster_ids,
                ..
            } => monster_ids.get(*current_monster_index),
        }
    }

    /// A single monster respawns forever, so it is never the last.
    pub fn is_last_monster(&self) -> bool {
        match self {
            CombatContext::SingleMonster { .. } => false,
            CombatContext::Sequence {
                current_monster_index,
                monster_ids,
                ..
            } => *current_monster_index + 1 == monster_ids.len(),
        }
    }

    pub(crate) fn index_in_range(&self) -> bool {
        match self {
            CombatContext::SingleMonster { .. } => true,
            CombatContext::Sequence {
                current_monster_index,
                monster_ids,
                ..
            } => *current_monster_index < monster_ids.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct CombatProgressState {
    pub monster_hp: u32,
    pub player_attack_ticks_remaining: u32,
    pub monster_attack_ticks_remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_ticks_remaining: Option<u32>,
}

impl CombatProgressState {
    /// A monster that is still spawning in.
    pub fn spawning(monster_hp: u32, spawn_ticks: u32) -> Self {
        Self {
            monster_hp,
            player_attack_ticks_remaining: 0,
            monster_attack_ticks_remaining: 0,
            spawn_ticks_remaining: Some(spawn_ticks),
        }
    }

    pub fn is_spawning(&self) -> bool {
        matches!(self.spawn_ticks_remaining, Some(ticks) if ticks > 0)
    }
}
