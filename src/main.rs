// src/main.rs

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use glyph_field::config::Config;
use glyph_field::pipeline;

/// Command-line options. Anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "glyph-field", version, about = "Render the harmonic field around a glyph as a PNG")]
struct Args {
    /// JSON config file. Missing sections use their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Glyph stroke width in pixels.
    #[arg(long)]
    stroke_width: Option<u32>,

    /// Grid resolution N (even). Output is N x N pixels.
    #[arg(short = 'n', long)]
    resolution: Option<u32>,

    /// Spline basis degree.
    #[arg(long)]
    degree: Option<u32>,

    /// Bisection depth for cells cut by the glyph boundary.
    #[arg(long)]
    max_refine: Option<u32>,

    /// Output PNG path.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(w) = self.stroke_width {
            config.glyph.stroke_width = w;
        }
        if let Some(n) = self.resolution {
            config.field.resolution = n;
        }
        if let Some(p) = self.degree {
            config.field.degree = p;
        }
        if let Some(depth) = self.max_refine {
            config.field.max_refine = depth;
        }
        if let Some(path) = self.output {
            config.output.path = path;
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();

    // --- Configuration ---
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    info!("Configuration: {:?}", config);

    // --- Render ---
    pipeline::run(&config).with_context(|| {
        format!(
            "Failed to render glyph field to {}",
            config.output.path.display()
        )
    })?;

    info!("Done.");
    Ok(())
}
