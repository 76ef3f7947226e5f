/*
 * Input Module
 *
 * This module turns window events into simulation commands.
 *
 * Keys:
 * - B: spawn a boid at the pointer      - R: reset all boids
 * - O: spawn an obstacle at the pointer - C: clear all obstacles
 * - H: toggle hitboxes                  - F: toggle follow mode
 *
 * Holding the left mouse button keeps spawning boids at the pointer, the
 * right button obstacles, until the button is released.
 */

use std::sync::Arc;

use nannou::prelude::*;
use nannou::winit::event::MouseButton;

use crate::app::Model;
use crate::bounds::Viewport;
use crate::clock::PeriodicTask;
use crate::simulation::Simulation;
use crate::vector::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SpawnBoid,
    ResetBoids,
    SpawnObstacle,
    ClearObstacles,
    ToggleHitboxes,
    ToggleFollow,
}

impl Command {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::B => Some(Self::SpawnBoid),
            Key::R => Some(Self::ResetBoids),
            Key::O => Some(Self::SpawnObstacle),
            Key::C => Some(Self::ClearObstacles),
            Key::H => Some(Self::ToggleHitboxes),
            Key::F => Some(Self::ToggleFollow),
            _ => None,
        }
    }

    /// Apply the command with the pointer at `pointer` (simulation space).
    pub fn apply(self, simulation: &Simulation, pointer: Vector2D) {
        match self {
            Self::SpawnBoid => {
                simulation.spawn_boid_at(pointer);
            }
            Self::ResetBoids => simulation.reset_boids(),
            Self::SpawnObstacle => simulation.spawn_obstacle_at(pointer),
            Self::ClearObstacles => simulation.clear_obstacles(),
            Self::ToggleHitboxes => simulation.set_hitbox_display(!simulation.hitbox_display()),
            Self::ToggleFollow => simulation.set_follow_mode(!simulation.follow_mode()),
        }
    }
}

/// What a held mouse button keeps spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Boid,
    Obstacle,
}

impl SpawnKind {
    pub fn from_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Boid),
            MouseButton::Right => Some(Self::Obstacle),
            _ => None,
        }
    }

    fn command(self) -> Command {
        match self {
            Self::Boid => Command::SpawnBoid,
            Self::Obstacle => Command::SpawnObstacle,
        }
    }
}

/// Spawn `kind` at the current pointer every `period` until the returned
/// task is cancelled. The pointer is read from the simulation target on each
/// run so the spawns follow the mouse; `fallback` is used until it is known.
pub fn start_repeating_spawn(
    simulation: Arc<Simulation>,
    kind: SpawnKind,
    period: std::time::Duration,
    fallback: Vector2D,
) -> anyhow::Result<PeriodicTask> {
    PeriodicTask::spawn("spawn-repeat", period, move || {
        let at = simulation.target().unwrap_or(fallback);
        kind.command().apply(&simulation, at);
    })
}

fn stop_repeating_spawn(model: &mut Model) {
    if let Some(mut spawner) = model.spawner.take() {
        spawner.cancel();
    }
}

/// Convert a window-space pointer position and publish it as the follow
/// target, so follow mode always has a point to steer toward.
pub fn track_pointer(simulation: &Simulation, viewport: &Viewport, x: f32, y: f32) -> Vector2D {
    let pointer = viewport.centered_to_world(x as f64, y as f64);
    simulation.set_target(Some(pointer));
    pointer
}

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.pointer = track_pointer(&model.simulation, &model.viewport, pos.x, pos.y);
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }
    let Some(kind) = SpawnKind::from_button(button) else {
        return;
    };

    // A second button replaces the running repeat
    stop_repeating_spawn(model);

    let period = model.simulation.params().spawn_repeat_interval;
    match start_repeating_spawn(Arc::clone(&model.simulation), kind, period, model.pointer) {
        Ok(task) => model.spawner = Some(task),
        Err(err) => log::error!("could not start spawning {:?}: {:#}", kind, err),
    }
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if SpawnKind::from_button(button).is_some() {
        stop_repeating_spawn(model);
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }
    if let Some(command) = Command::from_key(key) {
        log::debug!("{:?}", command);
        command.apply(&model.simulation, model.pointer);
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::WorldBounds;
    use crate::params::SimulationParams;
    use std::thread;
    use std::time::Duration;

    fn simulation() -> Arc<Simulation> {
        Arc::new(Simulation::new(SimulationParams::default(), WorldBounds::new(-2.0, 2.0, -1.0, 1.0)))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(Key::B), Some(Command::SpawnBoid));
        assert_eq!(Command::from_key(Key::R), Some(Command::ResetBoids));
        assert_eq!(Command::from_key(Key::O), Some(Command::SpawnObstacle));
        assert_eq!(Command::from_key(Key::C), Some(Command::ClearObstacles));
        assert_eq!(Command::from_key(Key::H), Some(Command::ToggleHitboxes));
        assert_eq!(Command::from_key(Key::F), Some(Command::ToggleFollow));
        assert_eq!(Command::from_key(Key::Space), None);
    }

    #[test]
    fn test_commands_drive_simulation() {
        let sim = simulation();
        let pointer = Vector2D::new(0.25, -0.5);

        Command::SpawnBoid.apply(&sim, pointer);
        Command::SpawnObstacle.apply(&sim, pointer);
        assert_eq!(sim.frame().boids[0].position, pointer);
        assert_eq!(sim.frame().obstacles[0], pointer);

        Command::ToggleFollow.apply(&sim, pointer);
        Command::ToggleHitboxes.apply(&sim, pointer);
        assert!(sim.follow_mode());
        assert!(sim.hitbox_display());
        Command::ToggleFollow.apply(&sim, pointer);
        assert!(!sim.follow_mode());

        Command::ResetBoids.apply(&sim, pointer);
        Command::ClearObstacles.apply(&sim, pointer);
        assert_eq!(sim.registry().count(), 0);
        assert_eq!(sim.registry().obstacle_count(), 0);
    }

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(SpawnKind::from_button(MouseButton::Left), Some(SpawnKind::Boid));
        assert_eq!(SpawnKind::from_button(MouseButton::Right), Some(SpawnKind::Obstacle));
        assert_eq!(SpawnKind::from_button(MouseButton::Middle), None);
    }

    #[test]
    fn test_follow_works_before_pointer_moves() {
        let sim = simulation();
        let viewport = Viewport::new(1600.0, 800.0);

        // Start-up seeding with the pointer at the window center
        let pointer = track_pointer(&sim, &viewport, 0.0, 0.0);
        assert_eq!(pointer, Vector2D::ZERO);
        assert_eq!(sim.target(), Some(Vector2D::ZERO));

        let id = sim.spawn_boid_with_velocity(Vector2D::new(1.0, 0.5), Vector2D::ZERO);
        sim.set_follow_mode(true);
        sim.tick();

        let boid = sim.frame().boids.into_iter().find(|b| b.id == id).unwrap();
        assert!(boid.velocity.x < 0.0);
        assert!(boid.velocity.y < 0.0);
    }

    #[test]
    fn test_track_pointer_converts_window_coordinates() {
        let sim = simulation();
        let viewport = Viewport::new(1600.0, 800.0);
        let pointer = track_pointer(&sim, &viewport, 400.0, -200.0);
        assert_eq!(pointer, Vector2D::new(1.0, -0.5));
        assert_eq!(sim.target(), Some(pointer));
    }

    #[test]
    fn test_repeating_spawn_stops_on_cancel() {
        let sim = simulation();
        sim.set_target(Some(Vector2D::new(0.1, 0.1)));

        let mut task =
            start_repeating_spawn(Arc::clone(&sim), SpawnKind::Obstacle, Duration::from_millis(2), Vector2D::ZERO)
                .unwrap();
        thread::sleep(Duration::from_millis(30));
        task.cancel();

        let spawned = sim.registry().obstacle_count();
        assert!(spawned > 0);
        assert!(sim.frame().obstacles.iter().all(|&o| o == Vector2D::new(0.1, 0.1)));

        thread::sleep(Duration::from_millis(20));
        assert_eq!(sim.registry().obstacle_count(), spawned);
    }
}
