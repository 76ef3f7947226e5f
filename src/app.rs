/*
 * Application Module
 *
 * This module defines the nannou model and wires the simulation core to the
 * platform: it creates the window, derives the world bounds from its initial
 * size, starts the tick clock and the frame rate counter, and shuts every
 * periodic task down when the application exits.
 *
 * Ticking happens on the clock's own thread, so the frame loop below only
 * samples the shared state and never advances the simulation itself.
 */

use std::sync::{Arc, OnceLock};

use anyhow::ensure;

use nannou::prelude::*;
use nannou_egui::Egui;

use crate::bounds::Viewport;
use crate::clock::{PeriodicTask, RateCounter, SimulationClock};
use crate::debug::DebugInfo;
use crate::input::{key_pressed, mouse_moved, mouse_pressed, mouse_released, raw_window_event, track_pointer};
use crate::params::SimulationParams;
use crate::renderer::view;
use crate::simulation::Simulation;
use crate::ui;
use crate::vector::Vector2D;

/// Start-up settings handed from `main` to the nannou model function.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub params: SimulationParams,
    // Window size in points; 80% of the primary monitor when unset
    pub window_size: Option<(u32, u32)>,
}

impl AppConfig {
    /// Reject settings that would give a degenerate world.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.params.validate()?;
        if let Some((width, height)) = self.window_size {
            ensure!(width > 0 && height > 0, "window size must be non-zero, got {width}x{height}");
        }
        Ok(())
    }
}

// nannou builds the model from a plain fn pointer, so the configuration is
// parked here by `run` before the event loop starts.
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub simulation: Arc<Simulation>,
    pub clock: Option<SimulationClock>,
    pub egui: Egui,
    pub viewport: Viewport,
    pub debug_info: DebugInfo,
    pub frame_rate: Arc<RateCounter>,
    pub frame_rate_task: Option<PeriodicTask>,
    // Active while a mouse button is held down
    pub spawner: Option<PeriodicTask>,
    pub pointer: Vector2D,
}

/// Run the application until its window is closed.
pub fn run(config: AppConfig) {
    if CONFIG.set(config).is_err() {
        log::warn!("application already configured, keeping the first configuration");
    }

    nannou::app(model).update(update).exit(exit).run();
}

fn default_window_size(app: &App) -> (u32, u32) {
    match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            ((size.width as f32 * 0.8) as u32, (size.height as f32 * 0.8) as u32)
        }
        None => (1280, 720),
    }
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = CONFIG.get().cloned().unwrap_or_default();
    let (width, height) = config.window_size.unwrap_or_else(|| default_window_size(app));

    let window_id = app
        .new_window()
        .title("Boids")
        .size(width, height)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("main window vanished after creation");
    let egui = Egui::from_window(&window);

    // The world is fixed from the initial size for the rest of the run
    let rect = window.rect();
    let viewport = Viewport::new(rect.w() as f64, rect.h() as f64);
    let bounds = viewport.world_bounds();
    log::info!(
        "world bounds x: [{:.3}, {:.3}] y: [{:.3}, {:.3}]",
        bounds.x_min,
        bounds.x_max,
        bounds.y_min,
        bounds.y_max
    );

    let params = config.params;
    let simulation = Arc::new(Simulation::new(params.clone(), bounds));
    simulation.populate(params.initial_boids, &mut rand::thread_rng());

    let clock = {
        let simulation = Arc::clone(&simulation);
        SimulationClock::start(params.tick_interval, params.tps_window, move || {
            simulation.tick();
        })
    };
    let clock = match clock {
        Ok(clock) => Some(clock),
        Err(err) => {
            log::error!("simulation clock failed to start: {:#}", err);
            None
        }
    };

    // Follow mode may be on before the first mouse event
    let pointer = track_pointer(&simulation, &viewport, app.mouse.x, app.mouse.y);

    let frame_rate = Arc::new(RateCounter::new());
    let frame_rate_task = {
        let frame_rate = Arc::clone(&frame_rate);
        PeriodicTask::spawn("frame-rate", params.fps_window, move || {
            frame_rate.recompute();
        })
    };
    let frame_rate_task = match frame_rate_task {
        Ok(task) => Some(task),
        Err(err) => {
            log::error!("frame rate counter failed to start: {:#}", err);
            None
        }
    };

    Model {
        simulation,
        clock,
        egui,
        viewport,
        debug_info: DebugInfo::default(),
        frame_rate,
        frame_rate_task,
        spawner: None,
        pointer,
    }
}

// Update the model
pub fn update(_app: &App, model: &mut Model, update: Update) {
    model.egui.set_elapsed_time(update.since_start);

    model.debug_info.frame_time = update.since_last;
    model.debug_info.fps = model.frame_rate.rate();
    model.debug_info.tps = model.clock.as_ref().map_or(0, SimulationClock::ticks_per_second);
    model.debug_info.boid_count = model.simulation.registry().count();
    model.debug_info.obstacle_count = model.simulation.registry().obstacle_count();

    ui::update_ui(&mut model.egui, &model.simulation, &model.debug_info);
}

// Stop every periodic task before the shared state is dropped
pub fn exit(_app: &App, mut model: Model) {
    if let Some(mut spawner) = model.spawner.take() {
        spawner.cancel();
    }
    if let Some(mut task) = model.frame_rate_task.take() {
        task.cancel();
    }
    if let Some(clock) = model.clock.take() {
        clock.stop();
    }
    log::info!("shut down with {} boids", model.simulation.registry().count());
}
