//! Pipeline configuration.
//!
//! [`PipelineOptions`] is a builder that threads the worker count, progress
//! callback, and cancellation token through a pipeline run without polluting
//! every function signature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use scaleup::{CancellationToken, PipelineOptions, ProgressCallback, ProgressSnapshot};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, snapshot: &ProgressSnapshot) {
//!         println!("{}/{} done", snapshot.completed, snapshot.total);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = PipelineOptions::new()
//!     .with_workers(4)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Configuration for a pipeline run.
///
/// All fields have sensible defaults — a default-constructed value runs a
/// single sequential worker with no progress reporting and no cancellation,
/// matching the most conservative GPU-contention profile.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Number of concurrent upscale workers. Clamped to a minimum of 1.
    pub(crate) workers: usize,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for PipelineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PipelineOptions")
            .field("workers", &self.workers)
            .field("has_progress", &true)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineOptions {
    /// Create a new configuration with default settings.
    ///
    /// Defaults: 1 worker, no progress callback, no cancellation.
    pub fn new() -> Self {
        Self {
            workers: 1,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Set the number of concurrent upscale workers.
    ///
    /// Clamped to a minimum of 1. Worker count is a throughput/GPU-contention
    /// knob only: any value produces the same set of output frames. A count
    /// larger than the number of pending frames is fine — surplus workers
    /// exit as soon as the queue drains.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked from worker threads after each completed
    /// frame with a fresh [`ProgressSnapshot`](crate::ProgressSnapshot).
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, workers stop dequeuing new frames and
    /// the run reports a [`Cancelled`](crate::RunOutcome::Cancelled) outcome.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
