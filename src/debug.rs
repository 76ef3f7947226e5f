/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct holding the per-frame readouts
 * shown on screen: measured frame and tick rates, frame time and entity
 * counts. It is refreshed by the update loop and only read by the UI.
 */

use std::time::Duration;

// Debug information to display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    pub fps: u32,
    pub tps: u32,
    pub frame_time: Duration,
    pub boid_count: usize,
    pub obstacle_count: usize,
}

impl DebugInfo {
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time.as_secs_f64() * 1000.0
    }
}
