//! fingergun replay tool — run a recorded hand-landmark capture through
//! the aim/fire pipeline and log the resulting activity.
//!
//! Captures are JSON lines, one per camera frame:
//! `{"t": <ms>, "landmarks": [[x, y, z]; 21]}` or `{"t": <ms>,
//! "landmarks": null}` for frames with no detected hand.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use fingergun::tracking::{HandTracker, Landmark, LandmarkFrame, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "fingergun-replay", about = "Replay a hand-landmark capture through the aim/fire pipeline")]
struct Cli {
    /// Path to a JSON-lines landmark capture
    #[arg(long)]
    input: PathBuf,

    /// Fire cooldown in milliseconds
    #[arg(long, default_value_t = 300.0)]
    cooldown_ms: f64,

    /// Only print the final stats summary
    #[arg(long)]
    quiet: bool,
}

/// One capture line: frame timestamp plus the raw landmark set, if any.
#[derive(Debug, Deserialize)]
struct CaptureRecord {
    t: f64,
    landmarks: Option<Vec<[f32; 3]>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fingergun=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open capture {}", cli.input.display()))?;

    let config = TrackerConfig {
        cooldown_ms: cli.cooldown_ms,
        ..TrackerConfig::default()
    };
    let mut tracker = HandTracker::with_config(config);

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: CaptureRecord = serde_json::from_str(&line)
            .with_context(|| format!("bad capture record on line {}", line_no + 1))?;

        let frame = match record.landmarks {
            Some(points) => Some(
                LandmarkFrame::from_points(
                    points
                        .iter()
                        .map(|[x, y, z]| Landmark::new(*x, *y, *z))
                        .collect(),
                )
                .with_context(|| format!("bad landmark set on line {}", line_no + 1))?,
            ),
            None => None,
        };

        let output = tracker.process_frame(frame.as_ref(), record.t);

        if let Some(fire) = output.fire {
            info!(
                "fire at ({:.3}, {:.3}) t={:.0}ms",
                fire.position.x, fire.position.y, fire.timestamp_ms,
            );
        }
        if !cli.quiet {
            match output.aim {
                Some(aim) => info!(
                    "t={:.0}ms aim=({:.3}, {:.3}) aiming={}",
                    record.t,
                    aim.x,
                    aim.y,
                    tracker.is_aiming(),
                ),
                None => info!("t={:.0}ms no hand", record.t),
            }
        }
    }

    let stats = tracker.stats();
    info!(
        "replay done: {} frames, {} rejected, {} gaps, {} shots",
        stats.frames_processed, stats.frames_rejected, stats.tracking_gaps, stats.shots_fired,
    );
    Ok(())
}
