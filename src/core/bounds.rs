//! Axis-aligned environment bounds.
//!
//! [`EnvironmentBounds`] is derived once per planning request from the
//! environment model's origin and metric size, and bounds the position
//! component of the planning state space.
//!
//! ```rust
//! use marga::core::{EnvironmentBounds, Point2D};
//!
//! let bounds = EnvironmentBounds::from_extents(Point2D::new(-1.0, 2.0), 10.0, 8.0);
//! assert_eq!(bounds.x_max, 9.0);
//! assert!(bounds.contains(Point2D::new(0.0, 2.0)));
//! assert!(!bounds.contains(Point2D::new(0.0, 10.5)));
//! ```

use super::point::Point2D;

/// Rectangular extent of the environment model in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentBounds {
    /// Smallest x coordinate (meters).
    pub x_min: f64,
    /// Largest x coordinate (meters).
    pub x_max: f64,
    /// Smallest y coordinate (meters).
    pub y_min: f64,
    /// Largest y coordinate (meters).
    pub y_max: f64,
}

impl EnvironmentBounds {
    /// Create bounds from explicit limits.
    #[inline]
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Derive bounds from a map origin (lower-left corner) and its size in meters.
    #[inline]
    pub fn from_extents(origin: Point2D, size_x: f64, size_y: f64) -> Self {
        Self::new(origin.x, origin.x + size_x, origin.y, origin.y + size_y)
    }

    /// Width of the bounds (x extent).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the bounds (y extent).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Length of the diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Whether both axes have a strictly positive, finite extent.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }

    /// Exact (inclusive, no tolerance) containment test.
    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }

    /// Clamp a point to be inside the bounds.
    #[inline]
    pub fn clamp(&self, point: Point2D) -> Point2D {
        Point2D::new(
            point.x.clamp(self.x_min, self.x_max),
            point.y.clamp(self.y_min, self.y_max),
        )
    }
}
