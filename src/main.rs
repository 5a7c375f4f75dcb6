//! skafos - A chunk-streamed 2D sandbox world
//!
//! Headless driver: loads a TOML config, replays a scripted input file, and reports the run.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use config::{SimConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the skafos sandbox world headless", long_about = None)]
struct Args {
    /// TOML run configuration
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// JSON input script replayed from the first tick
    #[arg(long)]
    script: Option<PathBuf>,
    /// Number of ticks to simulate (overrides the config)
    #[arg(long)]
    ticks: Option<u64>,
    /// Seconds per tick (overrides the config)
    #[arg(long)]
    dt: Option<f32>,
    /// World seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
    /// Write a JSON summary here (overrides the config)
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Fail instead of falling back to defaults when the config cannot be loaded
    #[arg(long)]
    strict_config: bool,
    /// Stop once the script has played out
    #[arg(long)]
    exit_when_script_finished: bool,
    /// Write the resolved configuration as TOML to this path and exit without simulating
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting skafos v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut sim = if args.strict_config {
        SimConfig::load_strict(&args.config)?
    } else {
        SimConfig::load_lenient(&args.config)
    };
    if let Some(ticks) = args.ticks {
        sim.ticks = ticks;
    }
    if let Some(dt) = args.dt {
        sim.dt = dt;
    }
    if args.seed.is_some() {
        sim.world.world_seed = args.seed;
    }
    if args.summary.is_some() {
        sim.summary = args.summary;
    }
    sim.validate()?;

    if let Some(path) = args.write_config {
        sim.save_to_path(&path)?;
        info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let print_summary = sim.summary.is_none();

    let summary = headless::run(HeadlessConfig {
        sim,
        scripted_input: args.script,
        exit_when_script_finished: args.exit_when_script_finished,
    })?;

    if print_summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
