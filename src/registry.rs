/*
 * Entity Registry Module
 *
 * Owns every boid and obstacle. Both collections are copy-on-write: readers
 * clone an Arc to the current list and iterate it without holding any lock,
 * while spawns and clears swap in a new list. An iteration therefore never
 * sees the collection change under it; it may only be slightly stale.
 *
 * Each boid additionally sits behind its own mutex so the tick can mutate it
 * in place while the renderer reads it, without either side seeing a torn
 * record.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use crate::boid::{Boid, BoidId};
use crate::params::SimulationParams;
use crate::vector::Vector2D;

pub type BoidCell = Arc<Mutex<Boid>>;

/// Immutable view of the boid list at the moment it was taken.
pub type BoidList = Arc<Vec<BoidCell>>;

pub type ObstacleList = Arc<Vec<Vector2D>>;

#[derive(Debug, Default)]
pub struct EntityRegistry {
    boids: RwLock<BoidList>,
    obstacles: RwLock<ObstacleList>,
    next_id: AtomicU64,
}

// A panic inside a tick must not make the registry unusable, so poisoned
// locks are recovered rather than propagated.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

pub fn lock_boid(cell: &Mutex<Boid>) -> MutexGuard<'_, Boid> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> BoidId {
        BoidId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a boid built by `make` from a freshly allocated id.
    pub fn insert_boid(&self, make: impl FnOnce(BoidId) -> Boid) -> BoidId {
        let id = self.allocate_id();
        let cell = Arc::new(Mutex::new(make(id)));

        let mut boids = write(&self.boids);
        Arc::make_mut(&mut *boids).push(cell);
        id
    }

    pub fn spawn_boid<R: Rng + ?Sized>(
        &self,
        position: Vector2D,
        velocity: Option<Vector2D>,
        params: &SimulationParams,
        rng: &mut R,
    ) -> BoidId {
        self.insert_boid(|id| Boid::spawn(id, position, velocity, params, rng))
    }

    pub fn spawn_obstacle(&self, position: Vector2D) {
        let mut obstacles = write(&self.obstacles);
        Arc::make_mut(&mut *obstacles).push(position);
    }

    pub fn clear_boids(&self) {
        *write(&self.boids) = Arc::default();
    }

    pub fn clear_obstacles(&self) {
        *write(&self.obstacles) = Arc::default();
    }

    /// Capture the current boid list.
    pub fn boids(&self) -> BoidList {
        Arc::clone(&read(&self.boids))
    }

    /// Capture the current obstacle list.
    pub fn obstacles(&self) -> ObstacleList {
        Arc::clone(&read(&self.obstacles))
    }

    pub fn for_each_boid(&self, mut f: impl FnMut(&Boid)) {
        for cell in self.boids().iter() {
            f(&lock_boid(cell));
        }
    }

    pub fn for_each_obstacle(&self, mut f: impl FnMut(Vector2D)) {
        for &obstacle in self.obstacles().iter() {
            f(obstacle);
        }
    }

    pub fn count(&self) -> usize {
        read(&self.boids).len()
    }

    pub fn obstacle_count(&self) -> usize {
        read(&self.obstacles).len()
    }
}
