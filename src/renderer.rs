/*
 * Renderer Module
 *
 * This module draws one frame from a snapshot of the simulation: obstacles
 * as white squares, boids as triangles colored by their local density and
 * pointing along their velocity, optional hitboxes, and the rate / count
 * readouts.
 */

use std::f64::consts::PI;

use nannou::prelude::*;

use crate::app::Model;
use crate::simulation::BoidView;
use crate::ui;

pub const OBSTACLE_SIZE: f32 = 20.0;
pub const HITBOX_RADIUS: f32 = 20.0;
// Velocity is drawn this many ticks ahead
const VELOCITY_LOOKAHEAD: f64 = 10.0;

/// Counter-clockwise rotation for a boid whose velocity angle (measured
/// from the y axis) is `heading`. This is the `3π/2 + heading` turn of a
/// y-down screen, mirrored for nannou's y-up coordinates.
pub fn heading_rotation(heading: f64) -> f32 {
    -(3.0 * PI / 2.0 + heading) as f32
}

// Triangle pointing along +x before rotation
fn boid_points() -> [Point2; 3] {
    [pt2(20.0, 0.0), pt2(-10.0, 10.0), pt2(-10.0, -10.0)]
}

fn draw_boid(draw: &Draw, model: &Model, boid: &BoidView, show_hitbox: bool) {
    let (x, y) = model.viewport.world_to_centered(boid.position);
    let center = pt2(x as f32, y as f32);

    draw.polygon()
        .color(boid.color)
        .points(boid_points().iter().cloned())
        .xy(center)
        .rotate(heading_rotation(boid.heading));

    if show_hitbox {
        draw.ellipse()
            .xy(center)
            .radius(HITBOX_RADIUS)
            .no_fill()
            .stroke(WHITE)
            .stroke_weight(1.0);

        let (ahead_x, ahead_y) = model
            .viewport
            .world_to_centered(boid.position + boid.velocity * VELOCITY_LOOKAHEAD);
        draw.line()
            .start(center)
            .end(pt2(ahead_x as f32, ahead_y as f32))
            .weight(1.0)
            .color(RED);
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    model.frame_rate.record();

    let draw = app.draw();
    draw.background().color(BLACK);

    let snapshot = model.simulation.frame();

    for &obstacle in snapshot.obstacles.iter() {
        let (x, y) = model.viewport.world_to_centered(obstacle);
        // The obstacle point is the square's top-left corner
        draw.rect()
            .x_y(x as f32 + OBSTACLE_SIZE / 2.0, y as f32 - OBSTACLE_SIZE / 2.0)
            .w_h(OBSTACLE_SIZE, OBSTACLE_SIZE)
            .color(WHITE);
    }

    for boid in &snapshot.boids {
        draw_boid(&draw, model, boid, snapshot.show_hitboxes);
    }

    ui::draw_counters(&draw, &model.debug_info, app.window_rect());

    if let Err(err) = draw.to_frame(app, &frame) {
        log::error!("failed to draw frame: {:?}", err);
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::error!("failed to draw ui: {:?}", err);
    }
}
