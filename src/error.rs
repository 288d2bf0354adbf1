//! Error types for the `scaleup` crate.
//!
//! This module defines [`ScaleupError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry rich context to aid debugging,
//! including directory paths, tool names, exit statuses, and captured stderr.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `scaleup` operations.
///
/// Every public function that can fail returns `Result<T, ScaleupError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
///
/// Setup errors (`DirectoryNotFound`, `EmptyInput`, `InputNotFound`) abort a
/// run before any work starts. A single frame's upscale failure is *not* an
/// error at this level — the worker pool records it as an
/// [`ItemFailure`](crate::ItemFailure) and keeps processing sibling frames.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScaleupError {
    /// A required directory does not exist.
    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// The source frame directory exists but contains no frame files.
    #[error("No frames found in {}", .path.display())]
    EmptyInput {
        /// The directory that was scanned.
        path: PathBuf,
    },

    /// The input video file does not exist.
    #[error("Input video not found: {}", .path.display())]
    InputNotFound {
        /// Path that was passed on the command line.
        path: PathBuf,
    },

    /// An external tool could not be started at all (missing binary,
    /// permission denied, etc.).
    #[error("Failed to launch {tool}: {reason}")]
    ToolLaunch {
        /// Name of the tool that failed to start.
        tool: String,
        /// Underlying reason the spawn failed.
        reason: String,
    },

    /// An external tool ran but exited with a non-zero status.
    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailure {
        /// Name of the failing tool.
        tool: String,
        /// The exit status, or `signal` when the process was killed.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// ffprobe produced output this crate could not interpret.
    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The run was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}
