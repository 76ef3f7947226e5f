/*
 * UI Module
 *
 * This module contains the egui control panel (key command help, follow and
 * hitbox toggles, reset / clear buttons, statistics) and the on-canvas
 * readouts of frame rate, tick rate and entity counts.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::simulation::Simulation;

const KEY_COMMANDS: [(&str, &str); 6] = [
    ("B", "spawn a boid at the pointer"),
    ("R", "reset boids"),
    ("O", "spawn an obstacle at the pointer"),
    ("C", "clear obstacles"),
    ("H", "toggle hitboxes"),
    ("F", "toggle follow mode"),
];

// Update the control panel and forward any change to the simulation
pub fn update_ui(egui: &mut Egui, simulation: &Simulation, debug_info: &DebugInfo) {
    let ctx = egui.begin_frame();

    egui::Window::new("Boids")
        .default_pos([10.0, 120.0])
        .default_open(false)
        .show(&ctx, |ui| {
            ui.collapsing("Key Commands", |ui| {
                for (key, action) in KEY_COMMANDS {
                    ui.label(format!("{key}: {action}"));
                }
                ui.label("Left mouse: hold to spawn boids");
                ui.label("Right mouse: hold to spawn obstacles");
            });

            let mut follow = simulation.follow_mode();
            if ui.checkbox(&mut follow, "Follow Pointer").changed() {
                simulation.set_follow_mode(follow);
            }

            let mut hitboxes = simulation.hitbox_display();
            if ui.checkbox(&mut hitboxes, "Show Hitboxes").changed() {
                simulation.set_hitbox_display(hitboxes);
            }

            ui.horizontal(|ui| {
                if ui.button("Reset Boids").clicked() {
                    simulation.reset_boids();
                }
                if ui.button("Clear Obstacles").clicked() {
                    simulation.clear_obstacles();
                }
            });

            ui.separator();

            ui.label(format!("FPS: {}", debug_info.fps));
            ui.label(format!("TPS: {}", debug_info.tps));
            ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time_ms()));
            ui.label(format!("Boids: {}", debug_info.boid_count));
            ui.label(format!("Obstacles: {}", debug_info.obstacle_count));
        });
}

// Draw the rate and count readouts in the window corners
pub fn draw_counters(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let margin = 40.0;
    let line_height = 40.0;
    let font_size = 28;

    let left = window_rect.left() + margin;
    let right = window_rect.right() - margin;
    let top = window_rect.top() - margin;

    let readouts = [
        (debug_info.fps.to_string(), left, top, nannou::color::YELLOW),
        (debug_info.tps.to_string(), left, top - line_height, nannou::color::CYAN),
        (debug_info.boid_count.to_string(), right, top, nannou::color::GREEN),
        (debug_info.obstacle_count.to_string(), right, top - line_height, nannou::color::WHITE),
    ];

    for (text, x, y, color) in readouts {
        draw.text(&text).x_y(x, y).color(color).font_size(font_size);
    }
}
