//! 2D pose type for robot position and orientation.
//!
//! Coordinate frame follows ROS REP-103:
//! - X-forward, Y-left, Z-up (right-handed)
//! - Counter-clockwise positive rotation

use super::math::{angle_diff, angles_approx_equal, normalize_angle};
use super::point::Point2D;

/// A planar pose: position plus heading.
///
/// - Position: (x, y) in meters
/// - Theta: heading angle in radians, counter-clockwise from X-axis,
///   kept in (-π, π] by every constructor
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading angle in radians (-π, π].
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose; `theta` is normalized to (-π, π].
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Identity pose (origin, facing forward).
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position component.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Planar distance to another pose, ignoring heading.
    #[inline]
    pub fn planar_distance(self, other: Pose2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Transform a point from this pose's local frame to world frame.
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }

    /// Linear interpolation between poses.
    ///
    /// Heading follows the shortest angular arc.
    #[inline]
    pub fn lerp(self, other: Pose2D, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.theta + angle_diff(self.theta, other.theta) * t,
        )
    }

    /// Check if this pose is approximately equal to another.
    #[inline]
    pub fn approx_eq(self, other: Pose2D, pos_epsilon: f64, angle_epsilon: f64) -> bool {
        (self.x - other.x).abs() <= pos_epsilon
            && (self.y - other.y).abs() <= pos_epsilon
            && angles_approx_equal(self.theta, other.theta, angle_epsilon)
    }
}

/// Total planar length of a pose sequence.
pub fn path_length(path: &[Pose2D]) -> f64 {
    path.windows(2).map(|w| w[0].planar_distance(w[1])).sum()
}
