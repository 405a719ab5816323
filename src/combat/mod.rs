//! Combat system: player ratings, the fight tick and its rewards.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
