//! Replays many ticks in bounded chunks.
//!
//! Chunking only decides where the driver may pause: the simulator carries
//! its state, RNG and running delta across chunks, so any chunk size yields
//! the same final state and the same `Changes`.

use super::changes::Changes;
use super::constants::CATCH_UP_CHUNK_TICKS;
use super::game_state::GameState;
use super::offline::ChangeAggregator;
use super::tick::{resolve_tick, StopReason, TickContext};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked at the top of each chunk.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub ticks_done: u64,
    pub ticks_total: u64,
}

impl BatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.ticks_total == 0 {
            return 1.0;
        }
        self.ticks_done as f64 / self.ticks_total as f64
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub state: GameState,
    pub changes: Changes,
    pub ticks_requested: u64,
    /// Ticks actually resolved with an activity running.
    pub ticks_simulated: u64,
    pub cancelled: bool,
    pub stop_reason: Option<StopReason>,
}

impl BatchResult {
    /// Ticks of wall-clock time this batch has accounted for. Idle ticks
    /// after the activity ended count; ticks skipped by cancellation do not.
    pub fn ticks_accounted(&self) -> u64 {
        if self.cancelled {
            self.ticks_simulated
        } else {
            self.ticks_requested
        }
    }
}

pub struct BatchSimulator<R> {
    state: GameState,
    rng: R,
    changes: ChangeAggregator,
    chunk_size: u64,
    ticks_total: u64,
    /// Budget consumed, including idle ticks skipped after the activity ended.
    ticks_done: u64,
    ticks_simulated: u64,
    cancel: CancelToken,
    cancelled: bool,
    stop_reason: Option<StopReason>,
}

impl<R: Rng> BatchSimulator<R> {
    pub fn new(state: GameState, rng: R, ticks: u64) -> Self {
        Self {
            state,
            rng,
            changes: ChangeAggregator::new(),
            chunk_size: CATCH_UP_CHUNK_TICKS,
            ticks_total: ticks,
            ticks_done: 0,
            ticks_simulated: 0,
            cancel: CancelToken::new(),
            cancelled: false,
            stop_reason: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn changes(&self) -> &Changes {
        self.changes.total()
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            ticks_done: self.ticks_done,
            ticks_total: self.ticks_total,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.ticks_done >= self.ticks_total
    }

    /// Runs the next chunk. Returns `None` once finished or cancelled.
    pub fn next_chunk(&mut self, ctx: &TickContext<'_>) -> Option<BatchProgress> {
        if self.is_finished() {
            return None;
        }
        if self.cancel.is_cancelled() {
            tracing::info!(
                ticks_done = self.ticks_done,
                ticks_total = self.ticks_total,
                "catch-up cancelled"
            );
            self.cancelled = true;
            return None;
        }

        let remaining = self.ticks_total - self.ticks_done;
        self.step(ctx, remaining.min(self.chunk_size));
        tracing::debug!(ticks_done = self.ticks_done, ticks_total = self.ticks_total, "chunk done");
        Some(self.progress())
    }

    /// Resolves up to `ticks` ticks without checking the cancel flag.
    /// Once the activity ends the rest of the budget is consumed as idle time.
    pub fn step(&mut self, ctx: &TickContext<'_>, ticks: u64) {
        let ticks = ticks.min(self.ticks_total - self.ticks_done);
        let mut state = std::mem::take(&mut self.state);
        for _ in 0..ticks {
            if state.activity.is_none() {
                self.ticks_done = self.ticks_total;
                break;
            }
            let outcome = resolve_tick(state, ctx, &mut self.rng);
            state = outcome.state;
            self.changes.push(&outcome.changes);
            self.ticks_done += 1;
            self.ticks_simulated += 1;
            if outcome.stop_reason.is_some() {
                self.stop_reason = outcome.stop_reason;
            }
        }
        if state.activity.is_none() {
            self.ticks_done = self.ticks_total;
        }
        self.state = state;
    }

    /// Drives every chunk synchronously.
    pub fn run(self, ctx: &TickContext<'_>) -> BatchResult {
        self.run_with(ctx, |_| {})
    }

    pub fn run_with(
        mut self,
        ctx: &TickContext<'_>,
        mut on_progress: impl FnMut(BatchProgress),
    ) -> BatchResult {
        while let Some(progress) = self.next_chunk(ctx) {
            on_progress(progress);
        }
        self.finish()
    }

    /// Drives every chunk, yielding to the runtime between chunks.
    #[cfg(feature = "async")]
    pub async fn run_async(
        mut self,
        ctx: &TickContext<'_>,
        mut on_progress: impl FnMut(BatchProgress),
    ) -> BatchResult {
        while let Some(progress) = self.next_chunk(ctx) {
            on_progress(progress);
            tokio::task::yield_now().await;
        }
        self.finish()
    }

    pub fn finish(self) -> BatchResult {
        BatchResult {
            state: self.state,
            changes: self.changes.into_total(),
            ticks_requested: self.ticks_total,
            ticks_simulated: self.ticks_simulated,
            cancelled: self.cancelled,
            stop_reason: self.stop_reason,
        }
    }
}
