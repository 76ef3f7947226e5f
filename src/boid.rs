/*
 * Boid Module
 *
 * This module defines the Boid record and its identity. A boid owns its
 * kinematic state plus two derived values (density and color) recomputed by
 * the update rule every tick. The flocking forces themselves live in the
 * physics module.
 */

use std::fmt;

use nannou::color::{rgb, Rgb};
use rand::Rng;

use crate::params::SimulationParams;
use crate::vector::Vector2D;

/// Color of a boid with no neighbors.
pub fn open_color() -> Rgb<u8> {
    rgb(0, 255, 0)
}

/// Color of a boid whose neighborhood is saturated.
pub fn dense_color() -> Rgb<u8> {
    rgb(255, 0, 0)
}

/// Opaque identity of a boid, allocated by the registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoidId(u64);

impl BoidId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boid#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Boid {
    id: BoidId,
    pub position: Vector2D,
    pub velocity: Vector2D,
    // Last computed acceleration, kept for diagnostics
    pub acceleration: Vector2D,
    pub color: Rgb<u8>,
    pub density: f64,
}

impl Boid {
    pub fn new(id: BoidId, position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: Vector2D::ZERO,
            color: open_color(),
            density: 0.0,
        }
    }

    /// Spawn a boid at `position`. Without an explicit velocity it gets a
    /// random heading and a random speed between the minimum spawn fraction
    /// and the maximum speed.
    pub fn spawn<R: Rng + ?Sized>(
        id: BoidId,
        position: Vector2D,
        velocity: Option<Vector2D>,
        params: &SimulationParams,
        rng: &mut R,
    ) -> Self {
        let velocity = velocity.unwrap_or_else(|| random_velocity(params, rng));
        Self::new(id, position, velocity)
    }

    pub fn id(&self) -> BoidId {
        self.id
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}

/// A uniformly random direction: both components drawn from `[-1, 1)` and
/// normalized. The zero draw is rejected and drawn again.
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vector2D {
    loop {
        let candidate = Vector2D::new(rng.gen::<f64>() * 2.0 - 1.0, rng.gen::<f64>() * 2.0 - 1.0);
        if let Some(heading) = candidate.try_normalize() {
            return heading;
        }
    }
}

pub fn random_velocity<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Vector2D {
    let min = params.min_spawn_speed_factor;
    let factor = rng.gen::<f64>() * (1.0 - min) + min;
    random_heading(rng) * (params.max_speed * factor)
}

/// Per-channel linear blend between the open and dense colors.
pub fn density_color(density: f64) -> Rgb<u8> {
    let blend = |dense: u8, open: u8| -> u8 {
        let value = dense as f64 * density + open as f64 * (1.0 - density);
        value.clamp(0.0, 255.0) as u8
    };

    let (dense, open) = (dense_color(), open_color());
    rgb(
        blend(dense.red, open.red),
        blend(dense.green, open.green),
        blend(dense.blue, open.blue),
    )
}
