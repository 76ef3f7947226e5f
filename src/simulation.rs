/*
 * Simulation Module
 *
 * The core facade shared by the input handlers, the tick clock and the
 * renderer. It owns the entity registry and the user toggles, runs one tick
 * at a time from snapshots of the pre-tick state, and hands out read-only
 * frame snapshots for drawing.
 *
 * A tick:
 * 1. captures the current boid list (later spawns wait for the next tick)
 * 2. builds the neighbor map from the captured states
 * 3. applies the update rule to every captured boid in parallel
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use nannou::color::Rgb;
use rand::Rng;
use rayon::prelude::*;

use crate::bounds::WorldBounds;
use crate::boid::{Boid, BoidId};
use crate::params::SimulationParams;
use crate::physics::{self, UpdateContext};
use crate::registry::{lock_boid, EntityRegistry, ObstacleList};
use crate::snapshot::{BoidState, NeighborMap};
use crate::vector::Vector2D;

/// What a tick worked on, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub boids: usize,
    pub neighbor_pairs: usize,
}

/// A boid as the renderer sees it.
#[derive(Debug, Clone)]
pub struct BoidView {
    pub id: BoidId,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    // Velocity angle from the y axis
    pub heading: f64,
    pub color: Rgb<u8>,
    pub density: f64,
}

impl From<&Boid> for BoidView {
    fn from(boid: &Boid) -> Self {
        Self {
            id: boid.id(),
            position: boid.position,
            velocity: boid.velocity,
            acceleration: boid.acceleration,
            heading: boid.velocity.angle(),
            color: boid.color,
            density: boid.density,
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub boids: Vec<BoidView>,
    pub obstacles: ObstacleList,
    pub show_hitboxes: bool,
    pub follow_mode: bool,
}

#[derive(Debug)]
pub struct Simulation {
    registry: EntityRegistry,
    params: SimulationParams,
    bounds: WorldBounds,
    follow_mode: AtomicBool,
    show_hitboxes: AtomicBool,
    target: Mutex<Option<Vector2D>>,
}

impl Simulation {
    pub fn new(params: SimulationParams, bounds: WorldBounds) -> Self {
        let follow_mode = AtomicBool::new(params.follow_mode);
        let show_hitboxes = AtomicBool::new(params.show_hitboxes);

        Self {
            registry: EntityRegistry::new(),
            params,
            bounds,
            follow_mode,
            show_hitboxes,
            target: Mutex::new(None),
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn spawn_boid_at(&self, position: Vector2D) -> BoidId {
        let id = self.registry.spawn_boid(position, None, &self.params, &mut rand::thread_rng());
        log::debug!("spawned {} at {}", id, position);
        id
    }

    pub fn spawn_boid_with_velocity(&self, position: Vector2D, velocity: Vector2D) -> BoidId {
        self.registry.spawn_boid(position, Some(velocity), &self.params, &mut rand::thread_rng())
    }

    /// Spawn `count` boids at uniformly random positions inside the world.
    pub fn populate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) {
        for _ in 0..count {
            let position = Vector2D::new(
                rng.gen_range(self.bounds.x_min..=self.bounds.x_max),
                rng.gen_range(self.bounds.y_min..=self.bounds.y_max),
            );
            self.registry.spawn_boid(position, None, &self.params, rng);
        }
        if count > 0 {
            log::info!("populated the world with {} boids", count);
        }
    }

    pub fn spawn_obstacle_at(&self, position: Vector2D) {
        self.registry.spawn_obstacle(position);
        log::debug!("spawned obstacle at {}", position);
    }

    pub fn reset_boids(&self) {
        log::debug!("resetting {} boids", self.registry.count());
        self.registry.clear_boids();
    }

    pub fn clear_obstacles(&self) {
        log::debug!("clearing {} obstacles", self.registry.obstacle_count());
        self.registry.clear_obstacles();
    }

    pub fn set_hitbox_display(&self, enabled: bool) {
        self.show_hitboxes.store(enabled, Ordering::Relaxed);
    }

    pub fn hitbox_display(&self) -> bool {
        self.show_hitboxes.load(Ordering::Relaxed)
    }

    pub fn set_follow_mode(&self, enabled: bool) {
        self.follow_mode.store(enabled, Ordering::Relaxed);
        log::debug!("follow mode {}", if enabled { "on" } else { "off" });
    }

    pub fn follow_mode(&self) -> bool {
        self.follow_mode.load(Ordering::Relaxed)
    }

    /// Point the flock seeks while follow mode is on, usually the pointer.
    pub fn set_target(&self, target: Option<Vector2D>) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = target;
    }

    pub fn target(&self) -> Option<Vector2D> {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advance every registered boid by one step.
    pub fn tick(&self) -> TickSummary {
        let boids = self.registry.boids();
        let states: Vec<BoidState> = boids.iter().map(|cell| BoidState::from(&*lock_boid(cell))).collect();
        let neighbors = NeighborMap::build(&states, self.params.neighbor_radius);

        let obstacles = self.registry.obstacles();
        let target = if self.follow_mode() { self.target() } else { None };
        let ctx = UpdateContext {
            params: &self.params,
            bounds: self.bounds,
            obstacles: &obstacles,
            target,
        };

        // Every boid reads only the pre-tick snapshots, so order is irrelevant
        boids.par_iter().for_each(|cell| {
            let mut boid = lock_boid(cell);
            if let Some(list) = neighbors.get(boid.id()) {
                physics::update_boid(&mut boid, list, &ctx);
            }
        });

        let summary = TickSummary {
            boids: states.len(),
            neighbor_pairs: neighbors.pair_count(),
        };
        log::trace!("tick: {:?}", summary);
        summary
    }

    pub fn frame(&self) -> FrameSnapshot {
        let boids = self.registry.boids();
        FrameSnapshot {
            boids: boids.iter().map(|cell| BoidView::from(&*lock_boid(cell))).collect(),
            obstacles: self.registry.obstacles(),
            show_hitboxes: self.hitbox_display(),
            follow_mode: self.follow_mode(),
        }
    }
}
