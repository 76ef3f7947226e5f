/*
 * Boid Flocking Simulation
 *
 * Boids flock by separation, obstacle avoidance, cohesion and alignment, and
 * can be told to follow the pointer. The simulation ticks on its own clock,
 * independently of how fast frames are drawn.
 */

use std::time::Duration;

use anyhow::{Context, Result};
use boids::app::{self, AppConfig};
use boids::SimulationParams;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive boid flocking simulation", long_about = None)]
struct Args {
    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Milliseconds between spawns while a mouse button is held
    #[arg(long, default_value_t = 15)]
    spawn_repeat_ms: u64,

    /// Maximum boid speed in world units per tick
    #[arg(long)]
    max_speed: Option<f64>,

    /// Number of boids placed at random when the window opens
    #[arg(long, default_value_t = 0)]
    initial_boids: usize,

    /// Window width in points (defaults to 80% of the monitor)
    #[arg(long, requires = "height", value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Window height in points (defaults to 80% of the monitor)
    #[arg(long, requires = "width", value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,

    /// Start with follow mode on
    #[arg(short, long)]
    follow: bool,

    /// Start with hitboxes shown
    #[arg(long)]
    hitboxes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn params(&self) -> SimulationParams {
        let defaults = SimulationParams::default();
        SimulationParams {
            tick_interval: Duration::from_millis(self.tick_ms),
            spawn_repeat_interval: Duration::from_millis(self.spawn_repeat_ms),
            max_speed: self.max_speed.unwrap_or(defaults.max_speed),
            initial_boids: self.initial_boids,
            follow_mode: self.follow,
            show_hitboxes: self.hitboxes,
            ..defaults
        }
    }

    fn config(&self) -> AppConfig {
        AppConfig {
            params: self.params(),
            window_size: self.width.zip(self.height),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    let config = args.config();
    config.validate().context("invalid configuration")?;

    log::info!("Boids starting...");
    log::info!("Tick interval: {:?}", config.params.tick_interval);

    app::run(config);

    Ok(())
}
