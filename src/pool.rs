//! The worker pool.
//!
//! Distributes [`WorkItem`]s over a bounded set of scoped threads that share
//! one MPMC channel. Frame upscaling is embarrassingly parallel — items carry
//! no shared mutable state — so the only synchronised structures are the
//! channel itself and the [`ProgressCounter`].
//!
//! A frame that fails to upscale does not stop the pool: the failure is
//! recorded with enough context for a manual retry and sibling workers keep
//! draining the queue. All failures are surfaced together once the queue is
//! empty.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::thread;

use crate::enumerate::WorkItem;
use crate::options::PipelineOptions;
use crate::progress::ProgressCounter;
use crate::upscale::FrameUpscaler;

/// One frame's upscale failure, reported after the run completes.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// 1-based index of the failing frame.
    pub index: u64,
    /// Path of the frame that could not be upscaled.
    pub source: PathBuf,
    /// The upscaler's diagnostic, typically the tool's exit status and stderr.
    pub reason: String,
}

impl Display for ItemFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "frame {} ({}): {}",
            self.index,
            self.source.display(),
            self.reason
        )
    }
}

/// Run `items` to completion over the configured number of workers.
///
/// The queue is fully populated and closed before the workers start, so a
/// worker terminates as soon as `recv` reports the channel empty and
/// disconnected. Each item is delivered to exactly one worker. Returns the
/// accumulated failures sorted by frame index; an empty vector means every
/// frame succeeded.
///
/// Cancellation is checked before each dequeue: once the token fires,
/// workers stop taking new items and return promptly, leaving the rest of
/// the queue unprocessed.
pub(crate) fn run_workers(
    items: Vec<WorkItem>,
    upscaler: &dyn FrameUpscaler,
    counter: &ProgressCounter,
    options: &PipelineOptions,
) -> Vec<ItemFailure> {
    // Surplus workers would exit immediately; don't spawn them at all.
    let worker_count = options.workers.min(items.len()).max(1);

    let (sender, receiver) = crossbeam_channel::unbounded::<WorkItem>();
    for item in items {
        // Cannot fail: the receiver outlives this loop.
        let _ = sender.send(item);
    }
    drop(sender);

    log::debug!("Starting {worker_count} upscale worker(s)");

    let mut failures = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);

        for _ in 0..worker_count {
            let receiver = receiver.clone();
            handles.push(scope.spawn(move || {
                let mut worker_failures = Vec::new();

                while let Ok(item) = receiver.recv() {
                    if options.is_cancelled() {
                        break;
                    }

                    match upscaler.upscale(&item.source, &item.destination) {
                        Ok(()) => {
                            counter.record_completion();
                            options.progress.on_progress(&counter.snapshot());
                        }
                        Err(error) => {
                            log::warn!(
                                "Frame {} failed: {} ({})",
                                item.index,
                                error,
                                item.source.display(),
                            );
                            worker_failures.push(ItemFailure {
                                index: item.index,
                                source: item.source,
                                reason: error.to_string(),
                            });
                        }
                    }
                }

                worker_failures
            }));
        }

        let mut merged = Vec::new();
        for handle in handles {
            merged.extend(handle.join().expect("upscale worker panicked"));
        }
        merged
    });

    failures.sort_by_key(|failure| failure.index);
    failures
}
