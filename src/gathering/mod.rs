//! Gathering and production skills: repeat one action until stopped.

pub mod logic;

pub use logic::*;
