#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Invader Wave round.

mod config;
mod hazard;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use simulation::Simulation;

/// Command-line arguments accepted by the headless driver.
#[derive(Debug, Parser)]
#[command(name = "invader-wave", about = "Plays a scripted enemy wave without a renderer")]
struct Args {
    /// TOML file overriding the default wave configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Duration of a single frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between scripted kills; zero never shoots back.
    #[arg(long, default_value_t = 400)]
    kill_every_ms: u64,
}

/// Entry point for the Invader Wave command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    log::info!(
        "starting a {}x{} wave with seed {}",
        config.layout.columns,
        config.layout.rows,
        config.rng_seed
    );

    let mut simulation = Simulation::new(&config, Duration::from_millis(args.kill_every_ms));
    let summary = simulation.run(args.frames, Duration::from_millis(args.frame_ms));
    println!("{summary}");
    Ok(())
}
