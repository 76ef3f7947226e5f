/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the boid simulation. The core
 * (vector, boid, snapshot, physics, registry, simulation, clock) has no
 * dependency on the window; app, input, renderer and ui are the nannou glue
 * that feeds it events and draws its state.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidId};
pub use bounds::{Viewport, WorldBounds};
pub use clock::{PeriodicTask, RateCounter, SimulationClock};
pub use debug::DebugInfo;
pub use params::SimulationParams;
pub use registry::EntityRegistry;
pub use simulation::{BoidView, FrameSnapshot, Simulation, TickSummary};
pub use snapshot::{BoidState, NeighborMap, NeighborSnapshot};
pub use vector::Vector2D;

// Define modules
pub mod app;
pub mod boid;
pub mod bounds;
pub mod clock;
pub mod debug;
pub mod input;
pub mod params;
pub mod physics;
pub mod registry;
pub mod renderer;
pub mod simulation;
pub mod snapshot;
pub mod ui;
pub mod vector;
