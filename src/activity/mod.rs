//! The currently running activity and its persisted form.

pub mod record;
pub mod types;

pub use record::ActivityError;
pub use types::{
    ActivityState, CombatActivity, CombatContext, CombatProgressState, GatheringActivity,
    ObstacleCourseActivity,
};
