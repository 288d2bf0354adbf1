//! Work item enumeration and resume logic.
//!
//! [`scan_frames`] compares the extracted-frame directory against the
//! upscaled-frame directory and produces the ordered set of frames that still
//! need processing. A frame whose destination file already exists — written by
//! a previous partial run — is skipped, which is the whole of the resume
//! mechanism: "what still needs doing" is a pure function of two directory
//! listings, independently testable without running any worker.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaleupError;

/// One frame requiring upscale processing.
///
/// Created by [`scan_frames`], consumed exactly once by exactly one worker,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// 1-based position of this frame in the sorted source listing.
    pub index: u64,
    /// Path of the extracted frame to read.
    pub source: PathBuf,
    /// Path the upscaled frame will be written to. Carries the same file
    /// name as the source so the remux frame pattern holds.
    pub destination: PathBuf,
}

/// The result of scanning the frame directories.
#[derive(Debug, Clone)]
pub struct FrameScan {
    /// Number of frames in the source directory.
    pub total_frames: u64,
    /// Frames whose destination file does not exist yet, in ascending
    /// index order.
    pub pending: Vec<WorkItem>,
}

impl FrameScan {
    /// Number of frames skipped because they were already upscaled.
    pub fn skipped(&self) -> u64 {
        self.total_frames - self.pending.len() as u64
    }

    /// `true` when every frame has already been upscaled.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Enumerate the frames that still need upscaling.
///
/// Lists `source_dir` in file-name order (ffmpeg's zero-padded
/// `frame%08d.jpg` naming makes lexicographic order the frame order) and
/// keeps every frame whose file name is absent from `destination_dir`.
///
/// This is a pure scan: calling it again returns the same set as long as the
/// directories have not changed, and it performs no writes.
///
/// # Errors
///
/// - [`ScaleupError::DirectoryNotFound`] if either directory is missing.
/// - [`ScaleupError::EmptyInput`] if `source_dir` yields zero frames.
pub fn scan_frames(source_dir: &Path, destination_dir: &Path) -> Result<FrameScan, ScaleupError> {
    for dir in [source_dir, destination_dir] {
        if !dir.is_dir() {
            return Err(ScaleupError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }
    }

    // Names stay as OsString end to end: a lossy UTF-8 conversion would
    // corrupt unusual file names and yield paths that do not exist.
    let mut names: Vec<OsString> = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort_unstable();

    if names.is_empty() {
        return Err(ScaleupError::EmptyInput {
            path: source_dir.to_path_buf(),
        });
    }

    let total_frames = names.len() as u64;
    let mut pending = Vec::new();

    for (position, name) in names.iter().enumerate() {
        let destination = destination_dir.join(name);
        if destination.exists() {
            continue;
        }
        pending.push(WorkItem {
            index: position as u64 + 1,
            source: source_dir.join(name),
            destination,
        });
    }

    log::debug!(
        "Scanned {}: {} frame(s), {} pending, {} already upscaled",
        source_dir.display(),
        total_frames,
        pending.len(),
        total_frames - pending.len() as u64,
    );

    Ok(FrameScan {
        total_frames,
        pending,
    })
}
