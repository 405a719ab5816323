//! Progress of the current repetition as a plain value.
//!
//! The simulation advances in whole ticks; displays run faster than 10 Hz and
//! interpolate between ticks. `ProgressClock` carries what the UI needs to do
//! that without polling the engine.

use super::constants::TICK_INTERVAL_MS;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressClock {
    pub progress_ticks: u32,
    pub total_ticks: u32,
    /// When `progress_ticks` was last updated, ms since the Unix epoch.
    pub reference_ms: i64,
}

impl ProgressClock {
    pub fn new(progress_ticks: u32, total_ticks: u32, reference_ms: i64) -> Self {
        Self {
            progress_ticks,
            total_ticks,
            reference_ms,
        }
    }

    pub fn at(progress_ticks: u32, total_ticks: u32, reference: DateTime<Utc>) -> Self {
        Self::new(progress_ticks, total_ticks, reference.timestamp_millis())
    }

    /// Completion at the reference instant, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        (self.progress_ticks as f64 / self.total_ticks as f64).clamp(0.0, 1.0)
    }

    /// Interpolated completion at `now_ms`, clamped to `[0, 1]`.
    pub fn fraction_at(&self, now_ms: i64) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        let elapsed_ms = (now_ms - self.reference_ms).max(0) as f64;
        let elapsed_ticks = elapsed_ms / TICK_INTERVAL_MS as f64;
        let ticks = self.progress_ticks as f64 + elapsed_ticks;
        (ticks / self.total_ticks as f64).clamp(0.0, 1.0)
    }

    pub fn fraction_now(&self) -> f64 {
        self.fraction_at(Utc::now().timestamp_millis())
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.total_ticks.saturating_sub(self.progress_ticks)
    }
}
