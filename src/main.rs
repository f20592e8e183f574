/*
 * Boid Flocking Simulation - Headless Runner
 *
 * Runs the flocking engine without a window for a fixed number of frames and
 * logs a summary of the flock as it evolves. Parameters come from an optional
 * YAML file, with a few command line overrides.
 *
 *   RUST_LOG=info torus_boids --config flock.yaml --frames 2000 --log-every 100
 */

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use torus_boids::{Flock, SimulationParams};

#[derive(Parser, Debug)]
#[command(about = "Run the boid flocking simulation without a window")]
struct Args {
    /// YAML file with simulation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the population size
    #[arg(short, long)]
    boids: Option<usize>,

    /// Override the RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Compute steering on one thread
    #[arg(long)]
    sequential: bool,

    /// Log a summary every N frames (0 disables periodic logging)
    #[arg(long, default_value_t = 60)]
    log_every: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => SimulationParams::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationParams::default(),
    };
    if let Some(boids) = args.boids {
        params.num_boids = boids;
    }
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    if args.sequential {
        params.enable_parallel = false;
    }

    let mut flock = Flock::new(params)?;
    let started = Instant::now();

    for _ in 0..args.frames {
        let stats = flock.step();
        if args.log_every > 0 && stats.frame % args.log_every == 0 {
            info!(
                frame = stats.frame,
                mean_speed = stats.mean_speed,
                separation = stats.mean_separation_neighbors,
                alignment = stats.mean_alignment_neighbors,
                cohesion = stats.mean_cohesion_neighbors,
                candidates = stats.neighbor_candidates,
                max_cell = stats.max_cell_occupancy,
                step_ms = stats.elapsed.as_secs_f64() * 1000.0,
                "flock summary"
            );
        }
    }

    let elapsed = started.elapsed();
    info!(
        frames = args.frames,
        boids = flock.boids().len(),
        seed = flock.seed(),
        total_ms = elapsed.as_secs_f64() * 1000.0,
        "simulation finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
