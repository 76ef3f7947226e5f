/*
 * Physics Module
 *
 * This module implements the per-boid flocking update rule:
 * 1. Separation: push away from very close neighbors (steeper than inverse square)
 * 2. Obstacle avoidance: push away from nearby obstacles (inverse square)
 * 3. Cohesion: pull towards the center of mass of the neighborhood
 * 4. Alignment: follow the average heading of the neighborhood
 * 5. Follow: optionally pull towards a target point
 *
 * The forces read only neighbor snapshots taken before the tick, so boids can
 * be updated in any order, including in parallel.
 */

use crate::bounds::WorldBounds;
use crate::boid::{density_color, Boid};
use crate::params::SimulationParams;
use crate::snapshot::NeighborSnapshot;
use crate::vector::Vector2D;

/// Everything the update rule reads besides the boid and its neighbors.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    pub params: &'a SimulationParams,
    pub bounds: WorldBounds,
    pub obstacles: &'a [Vector2D],
    // Only set while follow mode is on
    pub target: Option<Vector2D>,
}

pub fn separation(position: Vector2D, neighbors: &[NeighborSnapshot], params: &SimulationParams) -> Vector2D {
    neighbors
        .iter()
        // Coincident boids have no direction to separate along
        .filter(|n| n.distance > 0.0 && n.distance <= params.separation_radius)
        .fold(Vector2D::ZERO, |force, n| {
            let strength = params.separation_strength / n.distance.powf(params.separation_falloff);
            force + (position - n.position) * strength
        })
}

pub fn obstacle_avoidance(position: Vector2D, obstacles: &[Vector2D], params: &SimulationParams) -> Vector2D {
    let radius_sq = params.obstacle_radius_squared();

    obstacles.iter().fold(Vector2D::ZERO, |force, &obstacle| {
        let offset = position - obstacle;
        let dist_sq = offset.magnitude_squared();
        if dist_sq > 0.0 && dist_sq <= radius_sq {
            force + offset * (params.obstacle_strength / dist_sq)
        } else {
            force
        }
    })
}

/// The boid itself counts as one of the averaged points.
pub fn cohesion(position: Vector2D, neighbors: &[NeighborSnapshot], params: &SimulationParams) -> Vector2D {
    let sum = neighbors.iter().fold(position, |sum, n| sum + n.position);
    let center_of_mass = sum * (1.0 / (1 + neighbors.len()) as f64);
    (center_of_mass - position) * params.cohesion_weight
}

/// The boid's own velocity counts as one of the averaged headings.
pub fn alignment(velocity: Vector2D, neighbors: &[NeighborSnapshot], params: &SimulationParams) -> Vector2D {
    let sum = neighbors.iter().fold(velocity, |sum, n| sum + n.velocity);
    let average_heading = sum * (1.0 / (1 + neighbors.len()) as f64);
    average_heading * params.alignment_weight
}

pub fn follow(position: Vector2D, target: Vector2D, params: &SimulationParams) -> Vector2D {
    (target - position) * params.follow_weight
}

/// Sum of every force acting on a boid this tick.
pub fn acceleration(boid: &Boid, neighbors: &[NeighborSnapshot], ctx: &UpdateContext<'_>) -> Vector2D {
    let mut total = separation(boid.position, neighbors, ctx.params)
        + obstacle_avoidance(boid.position, ctx.obstacles, ctx.params)
        + cohesion(boid.position, neighbors, ctx.params)
        + alignment(boid.velocity, neighbors, ctx.params);

    if let Some(target) = ctx.target {
        total = total + follow(boid.position, target, ctx.params);
    }

    total
}

/// Rescale to exactly `max_speed` when faster, keeping the direction.
pub fn limit_speed(velocity: Vector2D, max_speed: f64) -> Vector2D {
    let speed_sq = velocity.magnitude_squared();
    if speed_sq > max_speed * max_speed {
        velocity * (max_speed / speed_sq.sqrt())
    } else {
        velocity
    }
}

pub fn density(neighbor_count: usize, saturation: usize) -> f64 {
    (neighbor_count as f64 / saturation as f64).min(1.0)
}

/// Apply one tick of the update rule to `boid`.
pub fn update_boid(boid: &mut Boid, neighbors: &[NeighborSnapshot], ctx: &UpdateContext<'_>) {
    let acceleration = acceleration(boid, neighbors, ctx);

    boid.acceleration = acceleration;
    boid.velocity = limit_speed(boid.velocity + acceleration, ctx.params.max_speed);
    boid.position = ctx.bounds.wrap(boid.position + boid.velocity);

    boid.density = density(neighbors.len(), ctx.params.density_saturation);
    boid.color = density_color(boid.density);
}
