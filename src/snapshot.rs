/*
 * Neighbor Snapshot Module
 *
 * Builds, from the boid states captured at the start of a tick, the list of
 * neighbors every boid sees during that tick. Snapshots copy the neighbor's
 * position and velocity so that no boid ever observes another boid's
 * already-updated state.
 *
 * Each unordered pair is visited once: the distance is computed a single time
 * and recorded in both boids' lists.
 */

use std::collections::HashMap;

use crate::boid::{Boid, BoidId};
use crate::vector::Vector2D;

/// Kinematic state of a boid captured before any boid in the tick is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidState {
    pub id: BoidId,
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl From<&Boid> for BoidState {
    fn from(boid: &Boid) -> Self {
        Self {
            id: boid.id(),
            position: boid.position,
            velocity: boid.velocity,
        }
    }
}

/// Another boid as seen from a neighbor at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSnapshot {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub distance: f64,
}

impl NeighborSnapshot {
    fn of(state: &BoidState, distance: f64) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            distance,
        }
    }
}

/// Neighbor lists keyed by boid identity. Every captured boid has an entry.
#[derive(Debug, Default)]
pub struct NeighborMap {
    neighbors: HashMap<BoidId, Vec<NeighborSnapshot>>,
}

impl NeighborMap {
    /// Pairwise scan over `(i, j), i < j`.
    pub fn build(states: &[BoidState], neighbor_radius: f64) -> Self {
        let mut lists: Vec<Vec<NeighborSnapshot>> = vec![Vec::new(); states.len()];

        for i in 0..states.len() {
            let a = &states[i];
            for j in (i + 1)..states.len() {
                let b = &states[j];
                let distance = a.position.distance(b.position);
                if distance <= neighbor_radius {
                    lists[i].push(NeighborSnapshot::of(b, distance));
                    lists[j].push(NeighborSnapshot::of(a, distance));
                }
            }
        }

        let neighbors = states.iter().map(|state| state.id).zip(lists).collect();
        Self { neighbors }
    }

    pub fn get(&self, id: BoidId) -> Option<&[NeighborSnapshot]> {
        self.neighbors.get(&id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoidId, &[NeighborSnapshot])> {
        self.neighbors.iter().map(|(id, list)| (*id, list.as_slice()))
    }

    /// Number of unordered neighbor pairs.
    pub fn pair_count(&self) -> usize {
        self.neighbors.values().map(Vec::len).sum::<usize>() / 2
    }
}
