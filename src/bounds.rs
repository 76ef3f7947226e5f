/*
 * Bounds Module
 *
 * Coordinate mapping between device space (pixels, origin top-left, y down)
 * and simulation space (origin at the viewport center, y up, the shorter
 * viewport side spanning 2 units), and the fixed world rectangle derived
 * from it.
 */

use crate::vector::Vector2D;

/// Pixel dimensions of the rendering surface the world was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    // Pixels per simulation unit
    #[inline]
    fn scale(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    pub fn device_to_world(&self, x: f64, y: f64) -> Vector2D {
        let len = self.scale();
        Vector2D::new((x - self.width / 2.0) / len, -(y - self.height / 2.0) / len)
    }

    /// Map a point given relative to the viewport center with y up (the
    /// convention of nannou's window coordinates) into simulation space.
    pub fn centered_to_world(&self, x: f64, y: f64) -> Vector2D {
        self.device_to_world(x + self.width / 2.0, self.height / 2.0 - y)
    }

    /// Inverse of [`Viewport::centered_to_world`].
    pub fn world_to_centered(&self, point: Vector2D) -> (f64, f64) {
        let len = self.scale();
        (point.x * len, point.y * len)
    }

    pub fn world_bounds(&self) -> WorldBounds {
        let top_left = self.device_to_world(0.0, 0.0);
        let bottom_right = self.device_to_world(self.width, self.height);
        WorldBounds {
            x_min: top_left.x,
            x_max: bottom_right.x,
            y_min: bottom_right.y,
            y_max: top_left.y,
        }
    }
}

/// The toroidal world rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl WorldBounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }

    /// Wrap each axis independently: leaving through one edge re-enters on
    /// the opposite edge with the other coordinate unchanged.
    pub fn wrap(&self, position: Vector2D) -> Vector2D {
        let x = if position.x < self.x_min {
            self.x_max
        } else if position.x > self.x_max {
            self.x_min
        } else {
            position.x
        };

        let y = if position.y < self.y_min {
            self.y_max
        } else if position.y > self.y_max {
            self.y_min
        } else {
            position.y
        };

        Vector2D::new(x, y)
    }
}
