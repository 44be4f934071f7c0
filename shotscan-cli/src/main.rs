// shotscan-cli/src/main.rs
//
// Command-line interface for the shotscan shot boundary detection system.
//
// Responsibilities include:
// - Defining CLI argument structures (`Cli`, `Commands`, per-command args).
// - Checking for required external tools (ffmpeg, ffprobe).
// - Configuring shotscan-core from CLI arguments and defaults.
// - Running streaming scene detection, saving kept frames as PNGs and
//   writing a JSON manifest of boundaries.
// - Probing stream properties and sampling single frames at fixed offsets.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use shotscan_core::{
    BoundaryInfo, SegmenterConfig, ShotscanError, external, frame_at_time, probe_video,
    scan_scene_boundaries,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "shotscan",
    version,
    about = "Shot boundary detection for video files",
    long_about = "Scans a video for scene changes and extracts one representative \
                  frame per shot, with subtitle-aware signature cropping and \
                  debounced cut detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detects scene boundaries and saves representative frames
    Detect(DetectArgs),
    /// Prints the probed properties of the first video stream
    Probe(ProbeArgs),
    /// Extracts the single frame nearest a time offset
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT")]
    input: PathBuf,

    /// Directory where scene frames and the manifest will be saved
    #[arg(short, long, value_name = "OUT_DIR", default_value = "scenes")]
    output_dir: PathBuf,

    /// Detection sensitivity, 0-100; higher requires a stronger change
    #[arg(short, long, default_value_t = 30.0)]
    threshold: f64,

    /// Decoded frames to skip between comparison candidates
    #[arg(long, value_name = "FRAMES", default_value_t = 15)]
    sample_stride: u32,

    /// Minimum seconds between two emitted boundaries
    #[arg(long, value_name = "SECONDS", default_value_t = 1.5)]
    min_gap: f64,

    /// Fraction of the frame height (from the top) used for comparison
    #[arg(long, value_name = "FRACTION", default_value_t = 0.8)]
    crop_fraction: f64,

    /// Compare full frames, including the bottom subtitle band
    #[arg(long)]
    no_crop: bool,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT")]
    input: PathBuf,

    /// Emit machine-readable JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input video file
    #[arg(required = true, value_name = "INPUT")]
    input: PathBuf,

    /// Time offset in seconds
    #[arg(long, value_name = "SECONDS")]
    at: f64,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE", default_value = "frame.png")]
    output: PathBuf,
}

/// One manifest entry: boundary metadata plus the saved image filename.
#[derive(Debug, Serialize)]
struct SceneRecord {
    image: String,
    #[serde(flatten)]
    info: BoundaryInfo,
}

fn run_detect(args: DetectArgs) -> Result<()> {
    external::check_dependency("ffmpeg")?;
    if let Err(e) = external::check_dependency("ffprobe") {
        // Detection still works without ffprobe; timestamps fall back to
        // the default frame rate.
        log::warn!("{e}; frame rate probing disabled");
    }

    let config = SegmenterConfig {
        threshold: args.threshold,
        sample_stride: args.sample_stride,
        min_gap_seconds: args.min_gap,
        subtitle_crop_fraction: if args.no_crop { 1.0 } else { args.crop_fraction },
        ..Default::default()
    };

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .expect("valid progress template"),
    );
    progress.enable_steady_tick(Duration::from_millis(120));
    progress.set_message(format!("Scanning {}", args.input.display()));

    let mut records: Vec<SceneRecord> = Vec::new();
    let output_dir = args.output_dir.clone();
    let summary = scan_scene_boundaries(&args.input, &config, |boundary| {
        let filename = format!("scene_{:03}.png", records.len());
        let path = output_dir.join(&filename);
        let info = boundary.info;
        let image = boundary
            .frame
            .into_image()
            .ok_or_else(|| ShotscanError::Other("frame buffer size mismatch".to_string()))?;
        image
            .save(&path)
            .map_err(|e| ShotscanError::Other(format!("failed to write {}: {e}", path.display())))?;
        progress.set_message(format!(
            "{} scene(s), last cut at {:.2}s",
            records.len() + 1,
            info.timestamp_secs
        ));
        records.push(SceneRecord {
            image: filename,
            info,
        });
        Ok(())
    })
    .with_context(|| format!("Scene detection failed for {}", args.input.display()))?;

    progress.finish_and_clear();

    let manifest_path = args.output_dir.join("scenes.json");
    let manifest = File::create(&manifest_path)
        .with_context(|| format!("Failed to create {}", manifest_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(manifest), &records)?;

    println!(
        "Detected {} scene boundaries across {} decoded frames ({:.3} fps)",
        summary.boundaries_emitted, summary.frames_decoded, summary.effective_fps
    );
    println!(
        "Wrote {} frame(s) and {} to {}",
        records.len(),
        manifest_path.display(),
        args.output_dir.display()
    );

    Ok(())
}

fn run_probe(args: ProbeArgs) -> Result<()> {
    let info = probe_video(&args.input)
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Resolution:   {}x{}", info.width, info.height);
        match info.duration_secs {
            Some(duration) => println!("Duration:     {duration:.2}s"),
            None => println!("Duration:     unknown"),
        }
        match info.frame_rate {
            Some(fps) => println!("Frame rate:   {fps:.3} fps"),
            None => println!("Frame rate:   unknown (fallback will be used)"),
        }
        match info.total_frames {
            Some(frames) => println!("Total frames: {frames}"),
            None => println!("Total frames: unknown"),
        }
    }

    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<()> {
    external::check_dependency("ffmpeg")?;

    let frame = frame_at_time(&args.input, args.at).with_context(|| {
        format!("Failed to sample {} at {:.3}s", args.input.display(), args.at)
    })?;
    let (width, height) = (frame.width(), frame.height());
    let image = frame
        .into_image()
        .ok_or_else(|| anyhow!("frame buffer size mismatch"))?;
    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Saved {}x{} frame at {:.3}s to {}",
        width,
        height,
        args.at,
        args.output.display()
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => run_detect(args),
        Commands::Probe(args) => run_probe(args),
        Commands::Sample(args) => run_sample(args),
    }
}
