//! End-to-end pipeline tests over mock upscalers.
//!
//! No GPU or external binary is involved: the mock copies the source frame
//! to its destination, and the fault-injecting variant refuses configured
//! frames so partial-failure behavior can be observed deterministically.

use std::collections::BTreeSet;
use std::fs;
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

use scaleup::{
    CancellationToken, FrameUpscaler, PipelineOptions, RunOutcome, ScaleupError, UpscalePipeline,
};
use tempfile::TempDir;

/// Pretends to upscale by copying the source file to the destination.
struct CopyUpscaler;

impl FrameUpscaler for CopyUpscaler {
    fn upscale(&self, source: &Path, destination: &Path) -> Result<(), ScaleupError> {
        fs::copy(source, destination)?;
        Ok(())
    }
}

/// Fails for the configured frame file names, succeeds otherwise.
struct FaultyUpscaler {
    failing_names: Vec<String>,
}

impl FrameUpscaler for FaultyUpscaler {
    fn upscale(&self, source: &Path, destination: &Path) -> Result<(), ScaleupError> {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_names.contains(&name) {
            return Err(ScaleupError::Io(IoError::other("injected fault")));
        }
        fs::copy(source, destination)?;
        Ok(())
    }
}

/// Copies frames like [`CopyUpscaler`] but cancels the shared token right
/// after finishing the frame named `trigger`.
struct CancellingUpscaler {
    token: CancellationToken,
    trigger: String,
}

impl FrameUpscaler for CancellingUpscaler {
    fn upscale(&self, source: &Path, destination: &Path) -> Result<(), ScaleupError> {
        fs::copy(source, destination)?;
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name == self.trigger {
            self.token.cancel();
        }
        Ok(())
    }
}

fn write_frames(dir: &Path, count: u64) {
    for index in 1..=count {
        fs::write(dir.join(frame_name(index)), b"jpg").expect("write frame");
    }
}

fn frame_name(index: u64) -> String {
    format!("frame{index:08}.jpg")
}

fn output_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

// ── Success paths ──────────────────────────────────────────────────

#[test]
fn ten_frames_four_workers() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 10);

    let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .with_options(PipelineOptions::new().with_workers(4))
        .run()
        .expect("run");

    assert!(report.is_success());
    assert_eq!(report.frames_processed, 10);
    assert_eq!(report.frames_skipped, 0);
    assert_eq!(report.total_frames, 10);
    assert_eq!(output_names(destination.path()).len(), 10);
}

#[test]
fn resume_processes_only_the_tail() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 10);
    write_frames(destination.path(), 7);

    let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .run()
        .expect("run");

    assert!(report.is_success());
    assert_eq!(report.frames_processed, 3);
    assert_eq!(report.frames_skipped, 7);
    assert_eq!(output_names(destination.path()).len(), 10);
}

#[test]
fn second_run_is_a_no_op() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 5);

    let first = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .run()
        .expect("first run");
    assert_eq!(first.frames_processed, 5);

    let second = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .run()
        .expect("second run");
    assert!(second.is_success());
    assert_eq!(second.frames_processed, 0);
    assert_eq!(second.frames_skipped, 5);
    assert_eq!(output_names(destination.path()).len(), 5);
}

#[test]
fn result_set_is_independent_of_worker_count() {
    let source = TempDir::new().expect("tempdir");
    write_frames(source.path(), 12);

    let mut result_sets = Vec::new();
    for workers in [1_usize, 4, 16] {
        let destination = TempDir::new().expect("tempdir");
        let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
            .with_options(PipelineOptions::new().with_workers(workers))
            .run()
            .expect("run");
        assert!(report.is_success(), "workers={workers}");
        result_sets.push(output_names(destination.path()));
    }

    assert_eq!(result_sets[0], result_sets[1]);
    assert_eq!(result_sets[1], result_sets[2]);
    assert_eq!(result_sets[0].len(), 12);
}

#[test]
fn more_workers_than_frames() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 3);

    let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .with_options(PipelineOptions::new().with_workers(32))
        .run()
        .expect("run");

    assert!(report.is_success());
    assert_eq!(report.frames_processed, 3);
}

#[test]
fn destination_dir_is_created() {
    let source = TempDir::new().expect("tempdir");
    let workspace = TempDir::new().expect("tempdir");
    write_frames(source.path(), 2);
    let destination: PathBuf = workspace.path().join("out_frames");

    let report = UpscalePipeline::new(source.path(), &destination, &CopyUpscaler)
        .run()
        .expect("run");
    assert!(report.is_success());
    assert_eq!(output_names(&destination).len(), 2);
}

// ── Failure paths ──────────────────────────────────────────────────

#[test]
fn missing_source_dir_aborts_before_any_work() {
    let workspace = TempDir::new().expect("tempdir");
    let result = UpscalePipeline::new(
        workspace.path().join("nope"),
        workspace.path().join("out"),
        &CopyUpscaler,
    )
    .run();
    assert!(matches!(
        result,
        Err(ScaleupError::DirectoryNotFound { .. })
    ));
}

#[test]
fn one_bad_frame_does_not_stop_the_rest() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 10);

    let upscaler = FaultyUpscaler {
        failing_names: vec![frame_name(5)],
    };
    let report = UpscalePipeline::new(source.path(), destination.path(), &upscaler)
        .with_options(PipelineOptions::new().with_workers(4))
        .run()
        .expect("run");

    assert!(!report.is_success());
    assert_eq!(report.frames_processed, 9);
    match &report.outcome {
        RunOutcome::PartialFailure(failures) => {
            let indices: Vec<u64> = failures.iter().map(|failure| failure.index).collect();
            assert_eq!(indices, vec![5]);
            assert!(failures[0].reason.contains("injected fault"));
        }
        other => panic!("Expected PartialFailure, got: {other:?}"),
    }

    // The nine good frames are on disk; frame 5 is not.
    let names = output_names(destination.path());
    assert_eq!(names.len(), 9);
    assert!(!names.contains(&frame_name(5)));
}

#[test]
fn failed_frames_are_retried_on_the_next_run() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 6);

    let upscaler = FaultyUpscaler {
        failing_names: vec![frame_name(2), frame_name(4)],
    };
    let first = UpscalePipeline::new(source.path(), destination.path(), &upscaler)
        .run()
        .expect("first run");
    match &first.outcome {
        RunOutcome::PartialFailure(failures) => assert_eq!(failures.len(), 2),
        other => panic!("Expected PartialFailure, got: {other:?}"),
    }

    // Retry with a healthy upscaler: exactly the two failed frames remain.
    let second = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .run()
        .expect("second run");
    assert!(second.is_success());
    assert_eq!(second.frames_processed, 2);
    assert_eq!(second.frames_skipped, 4);
    assert_eq!(output_names(destination.path()).len(), 6);
}

#[test]
fn failures_are_sorted_by_index() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 8);

    let upscaler = FaultyUpscaler {
        failing_names: vec![frame_name(7), frame_name(1), frame_name(4)],
    };
    let report = UpscalePipeline::new(source.path(), destination.path(), &upscaler)
        .with_options(PipelineOptions::new().with_workers(3))
        .run()
        .expect("run");

    match &report.outcome {
        RunOutcome::PartialFailure(failures) => {
            let indices: Vec<u64> = failures.iter().map(|failure| failure.index).collect();
            assert_eq!(indices, vec![1, 4, 7]);
        }
        other => panic!("Expected PartialFailure, got: {other:?}"),
    }
}

// ── Cancellation ───────────────────────────────────────────────────

#[test]
fn pre_cancelled_run_reports_cancelled() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 10);

    let token = CancellationToken::new();
    token.cancel();

    let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .with_options(
            PipelineOptions::new()
                .with_workers(2)
                .with_cancellation(token),
        )
        .run()
        .expect("run");

    assert!(matches!(report.outcome, RunOutcome::Cancelled));
    assert_eq!(report.frames_processed, 0);
}

#[test]
fn cancellation_mid_run_stops_remaining_frames() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 5);

    let token = CancellationToken::new();
    let upscaler = CancellingUpscaler {
        token: token.clone(),
        trigger: frame_name(2),
    };

    // One worker: frames run in order, so cancelling after frame 2 must
    // leave frames 3..=5 untouched.
    let report = UpscalePipeline::new(source.path(), destination.path(), &upscaler)
        .with_options(
            PipelineOptions::new()
                .with_workers(1)
                .with_cancellation(token),
        )
        .run()
        .expect("run");

    assert!(matches!(report.outcome, RunOutcome::Cancelled));
    assert_eq!(report.frames_processed, 2);
    assert_eq!(output_names(destination.path()).len(), 2);
}

#[test]
fn cancellation_after_the_last_frame_is_still_complete() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 3);

    let token = CancellationToken::new();
    let upscaler = CancellingUpscaler {
        token: token.clone(),
        trigger: frame_name(3),
    };

    // The token flips only once the queue has drained cleanly, so the run
    // counts as Complete, not Cancelled.
    let report = UpscalePipeline::new(source.path(), destination.path(), &upscaler)
        .with_options(
            PipelineOptions::new()
                .with_workers(1)
                .with_cancellation(token),
        )
        .run()
        .expect("run");

    assert!(report.is_success());
    assert_eq!(report.frames_processed, 3);
    assert_eq!(output_names(destination.path()).len(), 3);
}

#[test]
fn cancelled_empty_pending_set_still_short_circuits_to_success() {
    let source = TempDir::new().expect("tempdir");
    let destination = TempDir::new().expect("tempdir");
    write_frames(source.path(), 3);
    write_frames(destination.path(), 3);

    let token = CancellationToken::new();
    token.cancel();

    // Nothing to do: the resume fast path wins regardless of the token.
    let report = UpscalePipeline::new(source.path(), destination.path(), &CopyUpscaler)
        .with_options(PipelineOptions::new().with_cancellation(token))
        .run()
        .expect("run");
    assert!(report.is_success());
}
