//! Frame extraction via ffmpeg.
//!
//! Decomposes the input video into a deterministically numbered sequence of
//! still images, one per frame, that the pipeline then upscales.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::command::run_checked;
use crate::error::ScaleupError;

/// File-name pattern for extracted and remuxed frames.
///
/// Zero-padded so lexicographic order equals frame order.
pub const FRAME_PATTERN: &str = "frame%08d.jpg";

/// Extract every frame of `input_video` into `frames_dir`.
///
/// Frames are written as `frame00000001.jpg`, `frame00000002.jpg`, … at the
/// highest JPEG quality ffmpeg offers (`-qscale:v 1`), with `-vsync 0` to
/// keep a one-to-one packet/frame mapping. The directory is created if
/// missing.
///
/// # Errors
///
/// [`ScaleupError::InputNotFound`] if the video is missing, or a
/// [`ScaleupError::ToolLaunch`]/[`ScaleupError::ToolFailure`] from ffmpeg.
pub fn extract_frames(input_video: &Path, frames_dir: &Path) -> Result<(), ScaleupError> {
    if !input_video.is_file() {
        return Err(ScaleupError::InputNotFound {
            path: input_video.to_path_buf(),
        });
    }
    fs::create_dir_all(frames_dir)?;

    let mut command = Command::new("ffmpeg");
    command
        .arg("-i")
        .arg(input_video)
        .arg("-qscale:v")
        .arg("1")
        .arg("-qmin")
        .arg("1")
        .arg("-qmax")
        .arg("1")
        .arg("-vsync")
        .arg("0")
        .arg(frames_dir.join(FRAME_PATTERN));

    run_checked("ffmpeg", &mut command)?;
    log::info!(
        "Extracted frames from {} into {}",
        input_video.display(),
        frames_dir.display(),
    );
    Ok(())
}
