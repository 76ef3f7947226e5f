/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every tunable
 * constant of the flocking model and the scheduling cadences. The defaults
 * reproduce the reference behavior; the command line can override a subset.
 */

use std::time::Duration;

use anyhow::ensure;

// Parameters for the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    // Flocking model
    pub neighbor_radius: f64,
    pub separation_radius: f64,
    pub obstacle_radius: f64,
    pub separation_strength: f64,
    pub separation_falloff: f64,
    pub obstacle_strength: f64,
    pub cohesion_weight: f64,
    pub alignment_weight: f64,
    pub follow_weight: f64,
    pub max_speed: f64,
    pub min_spawn_speed_factor: f64,
    pub density_saturation: usize,

    // Scheduling
    pub tick_interval: Duration,
    pub spawn_repeat_interval: Duration,
    pub tps_window: Duration,
    pub fps_window: Duration,

    // Start-up state
    pub initial_boids: usize,
    pub follow_mode: bool,
    pub show_hitboxes: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            neighbor_radius: 0.2,
            separation_radius: 0.11,
            obstacle_radius: 0.16,
            separation_strength: 0.00002,
            separation_falloff: 2.2,
            obstacle_strength: 0.0001,
            cohesion_weight: 0.005,
            alignment_weight: 0.1,
            follow_weight: 0.02,
            max_speed: 0.01,
            min_spawn_speed_factor: 0.01,
            density_saturation: 30,

            tick_interval: Duration::from_millis(20),
            spawn_repeat_interval: Duration::from_millis(15),
            tps_window: Duration::from_millis(500),
            fps_window: Duration::from_millis(200),

            initial_boids: 0,
            follow_mode: false,
            show_hitboxes: false,
        }
    }
}

impl SimulationParams {
    /// Reject combinations the update rule cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.max_speed.is_finite() && self.max_speed > 0.0,
            "max speed must be positive and finite, got {}",
            self.max_speed
        );
        ensure!(
            self.neighbor_radius > 0.0,
            "neighbor radius must be positive, got {}",
            self.neighbor_radius
        );
        ensure!(
            self.separation_radius < self.neighbor_radius,
            "separation radius {} must be smaller than neighbor radius {}",
            self.separation_radius,
            self.neighbor_radius
        );
        ensure!(self.obstacle_radius > 0.0, "obstacle radius must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.min_spawn_speed_factor),
            "minimum spawn speed factor must lie in 0..=1"
        );
        ensure!(self.density_saturation > 0, "density saturation must be at least one neighbor");
        ensure!(!self.tick_interval.is_zero(), "tick interval must be non-zero");
        ensure!(!self.spawn_repeat_interval.is_zero(), "spawn repeat interval must be non-zero");
        ensure!(!self.tps_window.is_zero() && !self.fps_window.is_zero(), "rate windows must be non-zero");
        Ok(())
    }

    #[inline]
    pub fn obstacle_radius_squared(&self) -> f64 {
        self.obstacle_radius * self.obstacle_radius
    }
}
