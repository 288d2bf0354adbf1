//! Video stream probing via ffprobe.
//!
//! The remux step needs the source frame rate so the rebuilt video plays at
//! the original speed; width and height come along for free and feed the CLI
//! summary.

use std::path::Path;
use std::process::Command;

use crate::command::run_checked;
use crate::error::ScaleupError;

/// Basic properties of the first video stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frame rate, e.g. `29.97` for an NTSC source.
    pub frames_per_second: f64,
}

/// Probe the first video stream of `input_video`.
///
/// Runs `ffprobe` and parses its `width x height x avg_frame_rate` csv line.
///
/// # Errors
///
/// [`ScaleupError::InputNotFound`] if the video is missing, a tool error
/// from ffprobe, or [`ScaleupError::ProbeParse`] when the output line does
/// not have the expected shape.
pub fn probe_video(input_video: &Path) -> Result<VideoProperties, ScaleupError> {
    if !input_video.is_file() {
        return Err(ScaleupError::InputNotFound {
            path: input_video.to_path_buf(),
        });
    }

    let mut command = Command::new("ffprobe");
    command
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=width,height,avg_frame_rate")
        .arg("-of")
        .arg("csv=s=x:p=0")
        .arg(input_video);

    let output = run_checked("ffprobe", &mut command)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .next()
        .ok_or_else(|| ScaleupError::ProbeParse("empty ffprobe output".to_string()))?;

    let properties = parse_probe_line(line)?;
    log::debug!(
        "{}: {}x{} @ {:.3} fps",
        input_video.display(),
        properties.width,
        properties.height,
        properties.frames_per_second,
    );
    Ok(properties)
}

/// Parse one `width x height x num/den` line as emitted by
/// `ffprobe -of csv=s=x:p=0`.
fn parse_probe_line(line: &str) -> Result<VideoProperties, ScaleupError> {
    let parts: Vec<&str> = line.trim().split('x').collect();
    if parts.len() != 3 {
        return Err(ScaleupError::ProbeParse(format!(
            "expected 'width x height x rate', got '{line}'"
        )));
    }

    let width: u32 = parts[0]
        .parse()
        .map_err(|_| ScaleupError::ProbeParse(format!("bad width '{}'", parts[0])))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| ScaleupError::ProbeParse(format!("bad height '{}'", parts[1])))?;
    let frames_per_second = parse_frame_rate(parts[2])?;

    Ok(VideoProperties {
        width,
        height,
        frames_per_second,
    })
}

/// Parse an ffprobe rational frame rate (`30000/1001`, `25/1`, or plain `30`).
fn parse_frame_rate(value: &str) -> Result<f64, ScaleupError> {
    let rate = match value.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator
                .parse()
                .map_err(|_| ScaleupError::ProbeParse(format!("bad frame rate '{value}'")))?;
            let denominator: f64 = denominator
                .parse()
                .map_err(|_| ScaleupError::ProbeParse(format!("bad frame rate '{value}'")))?;
            if denominator == 0.0 {
                return Err(ScaleupError::ProbeParse(format!(
                    "zero denominator in frame rate '{value}'"
                )));
            }
            numerator / denominator
        }
        None => value
            .parse()
            .map_err(|_| ScaleupError::ProbeParse(format!("bad frame rate '{value}'")))?,
    };

    if rate <= 0.0 {
        return Err(ScaleupError::ProbeParse(format!(
            "non-positive frame rate '{value}'"
        )));
    }
    Ok(rate)
}
