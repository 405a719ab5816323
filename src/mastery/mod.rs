//! Action mastery and per-skill mastery pools.

pub mod logic;
pub mod table;
pub mod types;

pub use logic::{mastery_xp_for_completion, pool_max, pool_share};
pub use table::{level_for_xp, xp_for_level};
pub use types::MasteryBook;
