//! Idle-game tick engine.
//!
//! Every activity advances in discrete 100 ms ticks. The same resolver runs
//! the live loop and the offline catch-up, so time away is replayed tick by
//! tick rather than estimated.

pub mod activity;
pub mod agility;
pub mod combat;
pub mod core;
pub mod drops;
pub mod gathering;
pub mod items;
pub mod mastery;
pub mod modifiers;
pub mod registry;

pub use crate::core::{
    BatchResult, BatchSimulator, CancelToken, Changes, GameSession, GameState, Snapshot,
    StopReason, TickContext, TimeAway,
};
