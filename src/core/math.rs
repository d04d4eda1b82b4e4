//! Angle utilities.
//!
//! All angles are in radians. Coordinate frame follows ROS REP-103:
//! - X-forward, Y-left, Z-up
//! - Counter-clockwise positive rotation

use std::f64::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f64 = 2.0 * PI;

/// Normalize angle to (-π, π].
///
/// # Example
/// ```
/// use marga::core::math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-9);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-9);
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    // Map into [0, 2π) first, then fold the upper half down.
    let positive = ((angle % TWO_PI) + TWO_PI) % TWO_PI;
    if positive > PI {
        positive - TWO_PI
    } else {
        positive
    }
}

/// Signed shortest angular difference from `from` to `to`, in (-π, π].
///
/// Positive result means counter-clockwise rotation from `from` to `to`.
#[inline]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Check if two angles are approximately equal, handling wrap-around at ±π.
#[inline]
pub fn angles_approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
    angle_diff(a, b).abs() <= tolerance
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_range() {
        assert_relative_eq!(normalize_angle(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(PI), PI, epsilon = 1e-12);
        // -π is outside the half-open range and folds onto +π
        assert_relative_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(TWO_PI), 0.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(-PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(5.0 * PI / 2.0), PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normalize_angle_sweep_stays_in_range() {
        let mut angle = -20.0;
        while angle < 20.0 {
            let a = normalize_angle(angle);
            assert!(a > -PI && a <= PI, "{} normalized to {}", angle, a);
            angle += 0.137;
        }
    }

    #[test]
    fn test_angle_diff() {
        assert_relative_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(PI / 2.0, 0.0), -PI / 2.0, epsilon = 1e-12);

        // Crossing the ±π boundary takes the short way round
        assert_relative_eq!(angle_diff(-0.9 * PI, 0.9 * PI), -0.2 * PI, epsilon = 1e-9);
        assert_relative_eq!(angle_diff(0.9 * PI, -0.9 * PI), 0.2 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_angles_approx_equal() {
        assert!(angles_approx_equal(PI - 0.001, -PI + 0.001, 0.01));
        assert!(!angles_approx_equal(0.0, PI, 0.1));
    }

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(deg_to_rad(180.0), PI, epsilon = 1e-12);
        assert_relative_eq!(deg_to_rad(90.0), PI / 2.0, epsilon = 1e-12);
    }
}
