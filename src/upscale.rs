//! The frame upscaler collaborator.
//!
//! [`FrameUpscaler`] is the seam between the worker pool and whatever
//! actually turns one image into a bigger image. Production code uses
//! [`RealesrganUpscaler`], which shells out to `realesrgan-ncnn-vulkan`;
//! tests substitute their own implementations to simulate work and inject
//! faults without a GPU in sight.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::command::run_checked;
use crate::error::ScaleupError;

/// Upscales a single frame from `source` to `destination`.
///
/// Implementations must be [`Send`] and [`Sync`]: the pool calls `upscale`
/// from several worker threads at once, one frame per call, with no shared
/// state between calls.
pub trait FrameUpscaler: Send + Sync {
    /// Upscale one frame.
    ///
    /// On success the destination file must exist; on failure it must not,
    /// so a later run's resume scan re-attempts exactly the failed frames.
    fn upscale(&self, source: &Path, destination: &Path) -> Result<(), ScaleupError>;
}

/// A [`FrameUpscaler`] backed by the `realesrgan-ncnn-vulkan` binary.
///
/// Each call runs the binary once with the configured model, scale factor,
/// and GPU. The binary is treated as a black box that consumes a file path
/// and produces a file path.
///
/// # Example
///
/// ```
/// use scaleup::RealesrganUpscaler;
///
/// let upscaler = RealesrganUpscaler::new("realesr-animevideov3-x4", 4, 0);
/// ```
#[derive(Debug, Clone)]
pub struct RealesrganUpscaler {
    binary: PathBuf,
    model: String,
    scale: u32,
    gpu_id: u32,
}

impl RealesrganUpscaler {
    /// Create an upscaler using `realesrgan-ncnn-vulkan` from `PATH`.
    pub fn new(model: impl Into<String>, scale: u32, gpu_id: u32) -> Self {
        Self {
            binary: PathBuf::from("realesrgan-ncnn-vulkan"),
            model: model.into(),
            scale,
            gpu_id,
        }
    }

    /// Use an explicit path to the `realesrgan-ncnn-vulkan` binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl FrameUpscaler for RealesrganUpscaler {
    fn upscale(&self, source: &Path, destination: &Path) -> Result<(), ScaleupError> {
        let mut command = Command::new(&self.binary);
        command
            .arg("-i")
            .arg(source)
            .arg("-o")
            .arg(destination)
            .arg("-n")
            .arg(&self.model)
            .arg("-s")
            .arg(self.scale.to_string())
            .arg("-f")
            .arg("png")
            .arg("-g")
            .arg(self.gpu_id.to_string());

        // Report the configured binary, not a fixed name, so failures under
        // a custom --upscaler-bin point at the right executable.
        run_checked(&self.binary.to_string_lossy(), &mut command)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{FrameUpscaler, RealesrganUpscaler};
    use crate::error::ScaleupError;

    #[test]
    fn launch_failure_reports_the_configured_binary() {
        let upscaler = RealesrganUpscaler::new("realesr-animevideov3-x4", 4, 0)
            .with_binary("/definitely/not/an/upscaler");

        let result = upscaler.upscale(Path::new("in.jpg"), Path::new("out.jpg"));
        match result {
            Err(ScaleupError::ToolLaunch { tool, .. }) => {
                assert_eq!(tool, "/definitely/not/an/upscaler");
            }
            other => panic!("Expected ToolLaunch, got: {other:?}"),
        }
    }
}
