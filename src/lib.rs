//! # scaleup
//!
//! Upscale videos frame by frame — extract frames with ffmpeg, upscale them
//! concurrently with Real-ESRGAN, and remux the result with the original
//! audio track.
//!
//! `scaleup` drives three external tools as black boxes (`ffmpeg`, `ffprobe`,
//! and `realesrgan-ncnn-vulkan`) and owns the part between them: enumerating
//! the frames that still need work, scheduling them onto a bounded pool of
//! worker threads, tracking progress and ETA thread-safely, and aggregating
//! per-frame failures so one bad frame never wastes the work done on its
//! siblings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scaleup::{
//!     PipelineOptions, RealesrganUpscaler, UpscalePipeline,
//!     extract_frames, probe_video, remux_frames,
//! };
//! use std::path::Path;
//!
//! let input = Path::new("input.mp4");
//! let properties = probe_video(input)?;
//!
//! extract_frames(input, Path::new("tmp_frames"))?;
//!
//! let upscaler = RealesrganUpscaler::new("realesr-animevideov3-x4", 4, 0);
//! let report = UpscalePipeline::new("tmp_frames", "out_frames", &upscaler)
//!     .with_options(PipelineOptions::new().with_workers(4))
//!     .run()?;
//!
//! if report.is_success() {
//!     remux_frames(
//!         Path::new("out_frames"),
//!         input,
//!         properties.frames_per_second,
//!         Path::new("output.mp4"),
//!     )?;
//! }
//! # Ok::<(), scaleup::ScaleupError>(())
//! ```
//!
//! ## Resume
//!
//! The pending set is recomputed from the two frame directories on every
//! run: a frame whose upscaled file already exists is skipped. Interrupt a
//! run, start it again, and only the remaining frames are processed — a
//! fully upscaled video short-circuits to success without touching the GPU.
//!
//! ## Failure policy
//!
//! A frame whose upscale invocation fails is recorded and reported at the
//! end ([`RunOutcome::PartialFailure`]) while the rest of the queue keeps
//! draining. The produced frames stay on disk, so the next run retries
//! exactly the failed ones.
//!
//! ## Requirements
//!
//! `ffmpeg`, `ffprobe`, and `realesrgan-ncnn-vulkan` must be reachable on
//! `PATH` (or configured explicitly via
//! [`RealesrganUpscaler::with_binary`]).

mod command;
pub mod enumerate;
pub mod error;
pub mod extract;
pub mod options;
pub mod pipeline;
mod pool;
pub mod probe;
pub mod progress;
pub mod remux;
pub mod upscale;

pub use enumerate::{FrameScan, WorkItem, scan_frames};
pub use error::ScaleupError;
pub use extract::{FRAME_PATTERN, extract_frames};
pub use options::PipelineOptions;
pub use pipeline::{RunOutcome, RunReport, UpscalePipeline};
pub use pool::ItemFailure;
pub use probe::{VideoProperties, probe_video};
pub use progress::{CancellationToken, ProgressCallback, ProgressCounter, ProgressSnapshot};
pub use remux::remux_frames;
pub use upscale::{FrameUpscaler, RealesrganUpscaler};
