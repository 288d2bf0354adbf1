//! Progress tracking and cancellation support.
//!
//! This module provides [`ProgressCounter`], the thread-safe completed/total
//! counter shared by all workers, [`ProgressSnapshot`] for atomic reads with
//! derived throughput and ETA, [`ProgressCallback`] for observing completions,
//! and [`CancellationToken`] for cooperative cancellation.
//!
//! # Example
//!
//! ```
//! use scaleup::ProgressCounter;
//!
//! let counter = ProgressCounter::new(10);
//! counter.record_completion();
//! counter.record_completion();
//!
//! let snapshot = counter.snapshot();
//! assert_eq!(snapshot.completed, 2);
//! assert_eq!(snapshot.total, 10);
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::{Duration, Instant};

/// Thread-safe counter of completed work items.
///
/// One counter is created per pipeline run with a fixed `total` and is shared
/// by reference across all workers. [`record_completion`](ProgressCounter::record_completion)
/// is an atomic increment, so concurrent workers never lose updates; the
/// classic read-modify-write race on a shared counter cannot occur.
///
/// The counter only ever grows: `0 <= completed <= total` holds at every
/// observable point during a run.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicU64,
    total: u64,
    started: Instant,
}

impl ProgressCounter {
    /// Create a counter for a run of `total` work items.
    ///
    /// The elapsed clock starts now.
    pub fn new(total: u64) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total,
            started: Instant::now(),
        }
    }

    /// Atomically record one completed item.
    ///
    /// Returns the new completed count. Callers must not record more
    /// completions than the `total` the counter was created with.
    pub fn record_completion(&self) -> u64 {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(completed <= self.total, "completed exceeded total");
        completed
    }

    /// The total number of work items in this run.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Atomically read the current progress.
    ///
    /// The snapshot derives whole-run throughput (`completed / elapsed`) and
    /// an ETA from it. Both are `None` until the first item completes, since
    /// there is no throughput to extrapolate from yet.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let completed = self.completed.load(Ordering::Acquire);
        let elapsed = self.started.elapsed();

        let frames_per_second = if completed > 0 && elapsed.as_secs_f64() > 0.0 {
            Some(completed as f64 / elapsed.as_secs_f64())
        } else {
            None
        };

        let estimated_remaining = frames_per_second.map(|rate| {
            let remaining = self.total.saturating_sub(completed);
            Duration::from_secs_f64(remaining as f64 / rate)
        });

        ProgressSnapshot {
            completed,
            total: self.total,
            elapsed,
            frames_per_second,
            estimated_remaining,
        }
    }
}

/// An atomic snapshot of pipeline progress.
///
/// Produced by [`ProgressCounter::snapshot`] and delivered to
/// [`ProgressCallback::on_progress`] after each completed frame.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    /// How many frames have been upscaled so far.
    pub completed: u64,
    /// Total frames in this run.
    pub total: u64,
    /// Wall-clock time elapsed since the run started.
    pub elapsed: Duration,
    /// Observed throughput, if at least one frame has completed.
    pub frames_per_second: Option<f64>,
    /// Estimated time remaining, based on observed throughput. `None` while
    /// no frame has completed (the ETA is unknown, not zero).
    pub estimated_remaining: Option<Duration>,
}

impl ProgressSnapshot {
    /// Completion percentage (0.0 – 100.0). Reports 100.0 for an empty run.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }
}

/// Trait for receiving progress updates during a pipeline run.
///
/// Implementations must be [`Send`] and [`Sync`] because the callback is
/// invoked from worker threads, potentially concurrently.
///
/// Progress callbacks are **infallible** — they observe but cannot halt the
/// run. Use [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called after each frame completes.
    fn on_progress(&self, snapshot: &ProgressSnapshot);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to request
/// cancellation. Workers check [`is_cancelled`](CancellationToken::is_cancelled)
/// before dequeuing each frame, stop promptly once it fires, and the pipeline
/// reports a [`Cancelled`](crate::RunOutcome::Cancelled) outcome.
///
/// # Example
///
/// ```
/// use scaleup::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// // From another thread (or a signal handler, etc.):
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    ///
    /// All clones of this token will observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
