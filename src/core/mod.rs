//! Core state, tick resolution and the catch-up machinery.

pub mod batch;
pub mod changes;
pub mod clock;
pub mod constants;
pub mod game_state;
pub mod ids;
pub mod offline;
pub mod progression;
pub mod session;
pub mod snapshot;
pub mod tick;

pub use batch::{BatchProgress, BatchResult, BatchSimulator, CancelToken};
pub use changes::Changes;
pub use clock::ProgressClock;
pub use game_state::{GameState, LifetimeStats};
pub use ids::{ActionId, Currency, DungeonId, ItemId, MonsterId, ObstacleId, Skill};
pub use offline::{elapsed_ticks, ChangeAggregator, Rates, TimeAway};
pub use session::{CatchUpPhase, GameSession, MasterySpend, TickReport, ToggleError};
pub use snapshot::{Snapshot, SnapshotError};
pub use tick::{resolve_tick, StopReason, TickContext, TickEvent, TickOutcome};
