//! Bounded SE(2) state space.
//!
//! Positions are bounded by the environment extents; heading covers the
//! full circle. Distances weight the heading component by
//! [`BoundedStateSpace::HEADING_WEIGHT`], so a half turn costs as much as
//! `0.5 * π` meters of travel.

use std::f64::consts::PI;

use rand::Rng;

use crate::core::math::angle_diff;
use crate::core::{EnvironmentBounds, Pose2D};

/// SE(2) space with position bounds equal to the environment extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundedStateSpace {
    bounds: EnvironmentBounds,
}

impl BoundedStateSpace {
    /// Weight of the heading term in [`BoundedStateSpace::distance`].
    pub const HEADING_WEIGHT: f64 = 0.5;

    pub fn new(bounds: EnvironmentBounds) -> Self {
        Self { bounds }
    }

    #[inline]
    pub fn bounds(&self) -> &EnvironmentBounds {
        &self.bounds
    }

    /// Exact membership test: inclusive position bounds, finite heading.
    #[inline]
    pub fn contains(&self, pose: &Pose2D) -> bool {
        pose.theta.is_finite() && self.bounds.contains(pose.position())
    }

    /// Planar distance plus weighted absolute heading difference.
    #[inline]
    pub fn distance(&self, a: &Pose2D, b: &Pose2D) -> f64 {
        a.planar_distance(*b) + Self::HEADING_WEIGHT * angle_diff(a.theta, b.theta).abs()
    }

    /// Largest possible distance between two states of the space.
    #[inline]
    pub fn maximum_extent(&self) -> f64 {
        self.bounds.diagonal() + Self::HEADING_WEIGHT * PI
    }

    /// State at fraction `t` along the segment from `from` to `to`.
    #[inline]
    pub fn interpolate(&self, from: &Pose2D, to: &Pose2D, t: f64) -> Pose2D {
        from.lerp(*to, t)
    }

    /// Clamp position into the bounds and normalize the heading.
    #[inline]
    pub fn enforce_bounds(&self, pose: &Pose2D) -> Pose2D {
        let position = self.bounds.clamp(pose.position());
        Pose2D::new(position.x, position.y, pose.theta)
    }

    /// Uniform sample over the whole space.
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Pose2D {
        Pose2D::new(
            rng.random_range(self.bounds.x_min..=self.bounds.x_max),
            rng.random_range(self.bounds.y_min..=self.bounds.y_max),
            rng.random_range(-PI..PI),
        )
    }

    /// Uniform sample within `distance` of `near` along every component,
    /// clamped to the bounds.
    pub fn sample_uniform_near<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        near: &Pose2D,
        distance: f64,
    ) -> Pose2D {
        let b = &self.bounds;
        let x_lo = (near.x - distance).max(b.x_min);
        let x_hi = (near.x + distance).min(b.x_max);
        let y_lo = (near.y - distance).max(b.y_min);
        let y_hi = (near.y + distance).min(b.y_max);
        let dtheta = distance.min(PI);

        Pose2D::new(
            sample_interval(rng, x_lo, x_hi),
            sample_interval(rng, y_lo, y_hi),
            near.theta + sample_interval(rng, -dtheta, dtheta),
        )
    }

    /// Move from `from` toward `to`, stopping after at most `max_step`.
    pub fn steer(&self, from: &Pose2D, to: &Pose2D, max_step: f64) -> Pose2D {
        let d = self.distance(from, to);
        if d <= max_step {
            *to
        } else {
            self.interpolate(from, to, max_step / d)
        }
    }
}

/// Uniform sample in `[lo, hi]`, tolerating an empty or inverted interval.
#[inline]
fn sample_interval<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn space() -> BoundedStateSpace {
        BoundedStateSpace::new(EnvironmentBounds::new(0.0, 4.0, 0.0, 3.0))
    }

    #[test]
    fn test_contains_is_exact() {
        let space = space();
        assert!(space.contains(&Pose2D::new(0.0, 0.0, 0.0)));
        assert!(space.contains(&Pose2D::new(4.0, 3.0, PI)));
        assert!(!space.contains(&Pose2D::new(4.0 + 1e-12, 1.0, 0.0)));
        assert!(!space.contains(&Pose2D::new(1.0, -1e-12, 0.0)));
    }

    #[test]
    fn test_distance_and_extent() {
        let space = space();
        let a = Pose2D::new(0.0, 0.0, 0.0);
        let b = Pose2D::new(3.0, 4.0, PI / 2.0);
        assert_relative_eq!(space.distance(&a, &b), 5.0 + 0.25 * PI, epsilon = 1e-12);
        assert_relative_eq!(space.maximum_extent(), 5.0 + 0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_samples_stay_in_bounds() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let s = space.sample_uniform(&mut rng);
            assert!(space.contains(&s));

            let near = space.sample_uniform_near(&mut rng, &Pose2D::new(3.9, 0.1, 3.0), 0.5);
            assert!(space.contains(&near));
            assert!((near.x - 3.9).abs() <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_steer_limits_step() {
        let space = space();
        let from = Pose2D::new(0.0, 0.0, 0.0);
        let to = Pose2D::new(4.0, 0.0, 0.0);

        let stepped = space.steer(&from, &to, 1.0);
        assert_relative_eq!(stepped.x, 1.0, epsilon = 1e-12);
        assert_eq!(space.steer(&from, &to, 10.0), to);
    }

    #[test]
    fn test_enforce_bounds() {
        let space = space();
        let pose = space.enforce_bounds(&Pose2D::new(-1.0, 5.0, 0.5));
        assert_eq!(pose.x, 0.0);
        assert_eq!(pose.y, 3.0);
        assert_relative_eq!(pose.theta, 0.5);
    }
}
