//! Frame/audio remuxing via ffmpeg.
//!
//! Reassembles the upscaled frame sequence into a video container at the
//! probed frame rate, reattaching the audio track of the original input.

use std::path::Path;
use std::process::Command;

use crate::command::run_checked;
use crate::error::ScaleupError;
use crate::extract::FRAME_PATTERN;

/// Encode the frames in `frames_dir` into `output_video`, taking the audio
/// track from `original_video`.
///
/// The frame sequence is read via the shared [`FRAME_PATTERN`] at
/// `frame_rate` frames per second and encoded as H.264/AAC. `-shortest`
/// trims whichever of the two inputs runs longer, matching the original
/// video's duration.
///
/// # Errors
///
/// [`ScaleupError::DirectoryNotFound`] / [`ScaleupError::InputNotFound`] for
/// missing inputs, or a tool error from ffmpeg.
pub fn remux_frames(
    frames_dir: &Path,
    original_video: &Path,
    frame_rate: f64,
    output_video: &Path,
) -> Result<(), ScaleupError> {
    if !frames_dir.is_dir() {
        return Err(ScaleupError::DirectoryNotFound {
            path: frames_dir.to_path_buf(),
        });
    }
    if !original_video.is_file() {
        return Err(ScaleupError::InputNotFound {
            path: original_video.to_path_buf(),
        });
    }

    let mut command = Command::new("ffmpeg");
    command
        .arg("-framerate")
        .arg(frame_rate.to_string())
        .arg("-i")
        .arg(frames_dir.join(FRAME_PATTERN))
        .arg("-i")
        .arg(original_video)
        .arg("-c:v")
        .arg("libx264")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-c:a")
        .arg("aac")
        .arg("-shortest")
        .arg("-y")
        .arg(output_video);

    run_checked("ffmpeg", &mut command)?;
    log::info!("Wrote {}", output_video.display());
    Ok(())
}
