use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use scaleup::{
    PipelineOptions, ProgressCallback, ProgressSnapshot, RealesrganUpscaler, RunOutcome,
    UpscalePipeline, extract_frames, probe_video, remux_frames,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  scaleup -i input.mp4 -o output.mp4\n  scaleup -i input.mp4 -o output.mp4 -w 4 -g 0 -s 4\n  scaleup -i input.mp4 -o output.mp4 --reset --yes\n  scaleup -i input.mp4 -o output.mp4 --json > report.json";

#[derive(Debug, Parser)]
#[command(
    name = "scaleup",
    version,
    about = "Upscale a video frame by frame with Real-ESRGAN and remux it with the original audio",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output video file.
    #[arg(short, long)]
    output: PathBuf,

    /// GPU ID passed to the upscaler.
    #[arg(short, long, default_value_t = 0)]
    gpu_id: u32,

    /// Real-ESRGAN model to use for upscaling.
    #[arg(short, long, default_value = "realesr-animevideov3-x4")]
    model: String,

    /// Upscale factor.
    #[arg(short, long, default_value_t = 4)]
    scale: u32,

    /// Delete extracted and upscaled frames (and the output file) before starting.
    #[arg(short, long)]
    reset: bool,

    /// Skip the confirmation prompt for --reset.
    #[arg(long)]
    yes: bool,

    /// Directory for extracted frames.
    #[arg(long, default_value = "tmp_frames")]
    tmp_frames: PathBuf,

    /// Directory for upscaled frames.
    #[arg(long, default_value = "out_frames")]
    out_frames: PathBuf,

    /// Number of concurrent upscale workers. Tune to your GPU's capacity.
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Path to the realesrgan-ncnn-vulkan binary.
    #[arg(long, default_value = "realesrgan-ncnn-vulkan")]
    upscaler_bin: PathBuf,

    /// Show additional logging output.
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as machine-readable JSON.
    #[arg(long)]
    json: bool,
}

/// Drives an indicatif bar from worker-thread progress snapshots.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(total: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        // set_position rather than inc: snapshots from concurrent workers
        // may arrive out of order.
        self.bar.set_position(snapshot.completed);
        if let Some(remaining) = snapshot.estimated_remaining {
            self.bar.set_message(format!("ETA {}", format_duration(remaining)));
        }
    }
}

/// Print a status line for humans.
///
/// Under `--json` stdout must carry exactly the JSON summary document, so
/// status lines are routed to stderr instead.
fn status(cli: &Cli, message: String) {
    if cli.json {
        eprintln!("{message}");
    } else {
        println!("{message}");
    }
}

/// Format a duration as `HH:MM:SS`.
fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Prompt for the literal answer "yes" before a destructive reset.
fn confirm_reset() -> Result<bool, Box<dyn std::error::Error>> {
    eprintln!(
        "{} {}",
        "warning:".yellow().bold(),
        "resetting will delete the extracted and upscaled frames".yellow()
    );
    eprint!("Are you sure? This cannot be undone (yes/no): ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

fn reset_workspace(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.yes {
        let frames_exist = cli.tmp_frames.exists() || cli.out_frames.exists();
        if frames_exist && !confirm_reset()? {
            return Err("reset cancelled".into());
        }
    }

    for dir in [&cli.tmp_frames, &cli.out_frames] {
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
    }
    if cli.output.exists() {
        fs::remove_file(&cli.output)?;
    }
    Ok(())
}

fn outcome_label(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Complete => "complete",
        RunOutcome::PartialFailure(_) => "partial_failure",
        RunOutcome::Cancelled => "cancelled",
    }
}

fn summary_payload(report: &scaleup::RunReport, failed_indices: &[u64]) -> serde_json::Value {
    json!({
        "outcome": outcome_label(&report.outcome),
        "total_frames": report.total_frames,
        "frames_processed": report.frames_processed,
        "frames_skipped": report.frames_skipped,
        "elapsed_seconds": report.elapsed.as_secs_f64(),
        "failed_frames": failed_indices,
    })
}

fn print_summary(
    cli: &Cli,
    report: &scaleup::RunReport,
    failed_indices: &[u64],
) -> Result<(), Box<dyn std::error::Error>> {
    if cli.json {
        let payload = summary_payload(report, failed_indices);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "Processed {} frame(s) ({} skipped from a previous run) in {}",
            report.frames_processed,
            report.frames_skipped,
            format_duration(report.elapsed),
        );
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.reset {
        reset_workspace(&cli)?;
    }

    if cli.verbose {
        eprintln!("probing {}", cli.input.display());
    }
    let properties = probe_video(&cli.input)?;
    status(
        &cli,
        format!(
            "{}x{} @ {:.3} fps, {} worker(s)",
            properties.width, properties.height, properties.frames_per_second, cli.workers,
        ),
    );

    // A populated tmp directory is a previous run's extraction; reuse it.
    if !cli.tmp_frames.exists() {
        status(
            &cli,
            format!("Extracting frames from {}...", cli.input.display()),
        );
        extract_frames(&cli.input, &cli.tmp_frames)?;
    } else if cli.verbose {
        eprintln!("reusing extracted frames in {}", cli.tmp_frames.display());
    }

    let upscaler = RealesrganUpscaler::new(cli.model.clone(), cli.scale, cli.gpu_id)
        .with_binary(cli.upscaler_bin.clone());

    fs::create_dir_all(&cli.out_frames)?;
    let scan = scaleup::scan_frames(&cli.tmp_frames, &cli.out_frames)?;
    if scan.skipped() > 0 {
        status(
            &cli,
            format!(
                "Skipping {} frame(s) already upscaled by a previous run",
                scan.skipped()
            ),
        );
    }

    let progress = Arc::new(TerminalProgress::new(scan.pending.len() as u64)?);
    let options = PipelineOptions::new()
        .with_workers(cli.workers)
        .with_progress(progress.clone());

    let report = UpscalePipeline::new(&cli.tmp_frames, &cli.out_frames, &upscaler)
        .with_options(options)
        .run()?;
    progress.finish();

    match &report.outcome {
        RunOutcome::Complete => {
            status(&cli, "Merging video with audio...".to_string());
            remux_frames(
                &cli.out_frames,
                &cli.input,
                properties.frames_per_second,
                &cli.output,
            )?;

            print_summary(&cli, &report, &[])?;
            status(
                &cli,
                format!(
                    "{} {}",
                    "success:".green().bold(),
                    format!("wrote {}", cli.output.display()).green()
                ),
            );
            Ok(())
        }
        RunOutcome::PartialFailure(failures) => {
            let failed_indices: Vec<u64> = failures.iter().map(|failure| failure.index).collect();
            for failure in failures {
                eprintln!("{} {}", "failed:".red().bold(), failure);
            }
            print_summary(&cli, &report, &failed_indices)?;
            Err(format!(
                "{} frame(s) failed to upscale; run again to retry only those",
                failures.len()
            )
            .into())
        }
        RunOutcome::Cancelled => {
            print_summary(&cli, &report, &[])?;
            Err(scaleup::ScaleupError::Cancelled.into())
        }
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use scaleup::{ItemFailure, RunOutcome, RunReport};

    use super::{format_duration, outcome_label, summary_payload};

    fn report(outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            frames_processed: 9,
            frames_skipped: 2,
            total_frames: 12,
            elapsed: Duration::from_secs(90),
        }
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(outcome_label(&RunOutcome::Complete), "complete");
        assert_eq!(
            outcome_label(&RunOutcome::PartialFailure(Vec::new())),
            "partial_failure"
        );
        assert_eq!(outcome_label(&RunOutcome::Cancelled), "cancelled");
    }

    #[test]
    fn summary_payload_is_a_single_json_document() {
        let failure = ItemFailure {
            index: 5,
            source: PathBuf::from("tmp_frames/frame00000005.jpg"),
            reason: "boom".to_string(),
        };
        let report = report(RunOutcome::PartialFailure(vec![failure]));
        let payload = summary_payload(&report, &[5]);

        assert_eq!(payload["outcome"], "partial_failure");
        assert_eq!(payload["total_frames"], 12);
        assert_eq!(payload["frames_processed"], 9);
        assert_eq!(payload["frames_skipped"], 2);
        assert_eq!(payload["failed_frames"], serde_json::json!([5]));

        // The pretty-printed document round-trips: stdout under --json
        // carries exactly this and nothing else.
        let text = serde_json::to_string_pretty(&payload).expect("serialize");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, payload);
    }

    #[test]
    fn summary_payload_success_has_no_failures() {
        let payload = summary_payload(&report(RunOutcome::Complete), &[]);
        assert_eq!(payload["outcome"], "complete");
        assert_eq!(payload["failed_frames"], serde_json::json!([]));
    }

    #[test]
    fn format_duration_zero() {
        assert_eq!(format_duration(Duration::ZERO), "00:00:00");
    }

    #[test]
    fn format_duration_hours() {
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
    }

    #[test]
    fn format_duration_rolls_minutes() {
        assert_eq!(format_duration(Duration::from_secs(119)), "00:01:59");
    }
}
