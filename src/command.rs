//! Checked execution of external tools.
//!
//! All three collaborators (ffmpeg, ffprobe, realesrgan-ncnn-vulkan) are
//! driven as opaque subprocesses. This module centralises the spawn and
//! exit-status handling so every wrapper surfaces failures the same way.

use std::process::{Command, Output};

use crate::error::ScaleupError;

/// Run a command to completion, capturing its output.
///
/// A failed spawn maps to [`ScaleupError::ToolLaunch`]; a non-zero exit
/// status maps to [`ScaleupError::ToolFailure`] carrying the trimmed stderr
/// so the underlying tool's diagnostic reaches the user verbatim.
pub(crate) fn run_checked(tool: &str, command: &mut Command) -> Result<Output, ScaleupError> {
    log::debug!("Running {tool}: {command:?}");

    let output = command.output().map_err(|error| ScaleupError::ToolLaunch {
        tool: tool.to_string(),
        reason: error.to_string(),
    })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        };
        return Err(ScaleupError::ToolFailure {
            tool: tool.to_string(),
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
