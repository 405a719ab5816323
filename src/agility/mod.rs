//! Agility courses: a fixed run of obstacles completed once.

pub mod logic;

pub use logic::*;
