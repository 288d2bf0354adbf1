//! The pipeline coordinator.
//!
//! [`UpscalePipeline`] wires the pieces together for one run: scan the frame
//! directories, short-circuit if everything is already done, hand the pending
//! set to the worker pool, and fold the result into a [`RunReport`].
//!
//! # Example
//!
//! ```no_run
//! use scaleup::{PipelineOptions, RealesrganUpscaler, UpscalePipeline};
//!
//! let upscaler = RealesrganUpscaler::new("realesr-animevideov3-x4", 4, 0);
//! let report = UpscalePipeline::new("tmp_frames", "out_frames", &upscaler)
//!     .with_options(PipelineOptions::new().with_workers(4))
//!     .run()?;
//!
//! if report.is_success() {
//!     println!("Upscaled {} frame(s) in {:?}", report.frames_processed, report.elapsed);
//! }
//! # Ok::<(), scaleup::ScaleupError>(())
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::enumerate::scan_frames;
use crate::error::ScaleupError;
use crate::options::PipelineOptions;
use crate::pool::{ItemFailure, run_workers};
use crate::progress::ProgressCounter;
use crate::upscale::FrameUpscaler;

/// Terminal state of a pipeline run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every pending frame was upscaled. Also reported on the resume fast
    /// path, when the scan finds nothing left to do.
    Complete,
    /// The queue was drained but one or more frames failed. The already
    /// produced frames are left intact so the next run retries only these.
    PartialFailure(Vec<ItemFailure>),
    /// The run was cancelled before the queue drained.
    Cancelled,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Frames upscaled during this run.
    pub frames_processed: u64,
    /// Frames skipped because a previous run had already produced them.
    pub frames_skipped: u64,
    /// Frames in the source directory.
    pub total_frames: u64,
    /// Wall-clock duration of the processing phase.
    pub elapsed: std::time::Duration,
}

impl RunReport {
    /// `true` when the run completed with zero failures and no cancellation.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Complete)
    }
}

/// Coordinates one upscaling run over a pair of frame directories.
///
/// The coordinator is the only component that may abort the whole pipeline,
/// and it does so solely on setup errors (missing directories, empty input,
/// I/O). A single frame's upscale failure never stops the run.
pub struct UpscalePipeline<'a> {
    source_dir: PathBuf,
    destination_dir: PathBuf,
    upscaler: &'a dyn FrameUpscaler,
    options: PipelineOptions,
}

impl<'a> UpscalePipeline<'a> {
    /// Create a pipeline reading extracted frames from `source_dir` and
    /// writing upscaled frames to `destination_dir`.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
        upscaler: &'a dyn FrameUpscaler,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            upscaler,
            options: PipelineOptions::new(),
        }
    }

    /// Replace the default [`PipelineOptions`].
    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the pipeline to completion.
    ///
    /// The destination directory is created if missing, the pending set is
    /// enumerated, and the worker pool drains it. Returns a [`RunReport`];
    /// per-frame failures are part of the report, not an `Err`.
    ///
    /// # Errors
    ///
    /// Only setup errors: [`ScaleupError::DirectoryNotFound`],
    /// [`ScaleupError::EmptyInput`], or I/O failures creating the
    /// destination directory.
    pub fn run(self) -> Result<RunReport, ScaleupError> {
        fs::create_dir_all(&self.destination_dir)?;

        let scan = scan_frames(&self.source_dir, &self.destination_dir)?;
        let frames_skipped = scan.skipped();

        if scan.is_complete() {
            log::info!(
                "All {} frame(s) already upscaled, nothing to do",
                scan.total_frames
            );
            return Ok(RunReport {
                outcome: RunOutcome::Complete,
                frames_processed: 0,
                frames_skipped,
                total_frames: scan.total_frames,
                elapsed: std::time::Duration::ZERO,
            });
        }

        log::info!(
            "Upscaling {} of {} frame(s) with {} worker(s)",
            scan.pending.len(),
            scan.total_frames,
            self.options.workers,
        );

        let counter = ProgressCounter::new(scan.pending.len() as u64);
        let started = Instant::now();

        let failures = run_workers(scan.pending, self.upscaler, &counter, &self.options);

        let elapsed = started.elapsed();
        let frames_processed = counter.snapshot().completed;

        // A clean drain is Complete even if the token was cancelled after
        // the last frame finished; Cancelled means work was actually left
        // undone.
        let outcome = if failures.is_empty() && frames_processed == counter.total() {
            RunOutcome::Complete
        } else if self.options.is_cancelled() {
            RunOutcome::Cancelled
        } else {
            RunOutcome::PartialFailure(failures)
        };

        Ok(RunReport {
            outcome,
            frames_processed,
            frames_skipped,
            total_frames: scan.total_frames,
            elapsed,
        })
    }
}
