/*
 * Vector Module
 *
 * This module defines Vector2D, the immutable double precision vector used for
 * every position, velocity and force in the simulation. All operations return
 * a new value; nothing is mutated in place.
 */

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D vector used for position, velocity and acceleration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Self) -> Self {
        self.add(other.negate())
    }

    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    pub fn negate(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn try_normalize(self) -> Option<Self> {
        let magnitude = self.magnitude();
        if magnitude > 0.0 && magnitude.is_finite() {
            Some(self.scale(1.0 / magnitude))
        } else {
            None
        }
    }

    pub fn distance(self, other: Self) -> f64 {
        self.subtract(other).magnitude()
    }

    pub fn distance_squared(self, other: Self) -> f64 {
        self.subtract(other).magnitude_squared()
    }

    /// Heading measured from the positive y axis: `atan2(x, y)`.
    ///
    /// The renderer rotates by `3π/2 + angle`, so the argument order matters.
    pub fn angle(self) -> f64 {
        self.x.atan2(self.y)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector2D::add(self, other)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.subtract(other)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector_operations() {
        let a = Vector2D::new(1.0, 2.0);
        let b = Vector2D::new(3.0, 4.0);

        assert_eq!(a + b, Vector2D::new(4.0, 6.0));
        assert_eq!(b - a, Vector2D::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vector2D::new(2.0, 4.0));
        assert_eq!(-a, Vector2D::new(-1.0, -2.0));
        assert_eq!(a.subtract(b), a - b);
    }

    #[test]
    fn test_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.magnitude_squared(), 25.0);
        assert_eq!(Vector2D::ZERO.distance(v), 5.0);
    }

    #[test]
    fn test_normalize_is_guarded() {
        assert!(Vector2D::ZERO.try_normalize().is_none());

        let unit = Vector2D::new(3.0, 4.0).try_normalize().unwrap();
        assert!((unit.magnitude() - 1.0).abs() < 1e-12);
        assert!((unit.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_angle_is_measured_from_y_axis() {
        assert_eq!(Vector2D::new(0.0, 1.0).angle(), 0.0);
        assert!((Vector2D::new(1.0, 0.0).angle() - FRAC_PI_2).abs() < 1e-12);
        assert!((Vector2D::new(0.0, -1.0).angle() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector2D::new(0.5, -1.0).to_string(), "<0.5,-1>");
    }
}
