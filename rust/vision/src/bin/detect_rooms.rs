// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: detect rooms in a blueprint image and print the result as JSON
//!
//! Usage:
//!   detect-rooms <IMAGE> [--config <JSON>] [--min-confidence <F>] [--pretty] [--pixels]
//!
//! The JSON result goes to stdout; logs go to stderr (`RUST_LOG` controls
//! verbosity).

use anyhow::{Context, Result};
use blueprint_rooms_core::{to_pixel_rect, RoomDetector};
use blueprint_rooms_vision::{decode_image, ClassicalDetector, DetectionConfig};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "detect-rooms")]
#[command(about = "Detect room bounding boxes in a raster blueprint")]
#[command(version)]
struct Cli {
    /// Blueprint image (PNG, JPEG or TIFF)
    image: PathBuf,

    /// JSON file with detection parameters; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop rooms scoring below this confidence
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Also print each room's box in source pixels (to stderr)
    #[arg(long)]
    pixels: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DetectionConfig::default(),
    };
    if cli.min_confidence.is_some() {
        config.min_confidence = cli.min_confidence;
    }

    let detector = ClassicalDetector::new(config).context("Invalid detection config")?;
    tracing::debug!(config = ?detector.config(), "Detection config");

    tracing::info!("Loading image: {}", cli.image.display());
    let bytes = fs::read(&cli.image)
        .with_context(|| format!("Failed to read {}", cli.image.display()))?;

    let result = detector
        .detect(&bytes)
        .with_context(|| format!("Room detection failed for {}", cli.image.display()))?;

    if cli.pixels {
        // Decoding again keeps the detector API byte-oriented
        let image = decode_image(&bytes)?;
        let (width, height) = (image.width(), image.height());
        for room in &result.rooms {
            let rect = to_pixel_rect(&room.bounding_box, width, height);
            eprintln!(
                "{}: x={:.1} y={:.1} w={:.1} h={:.1} confidence={:.2}",
                room.id, rect.x, rect.y, rect.width, rect.height, room.confidence
            );
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}

fn load_config(path: &Path) -> Result<DetectionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: DetectionConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    tracing::info!("Loaded detection config from {}", path.display());
    Ok(config)
}
