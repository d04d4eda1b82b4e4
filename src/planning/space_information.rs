//! State space plus validity checker, as seen by a planner.

use crate::core::Pose2D;

use super::state_space::BoundedStateSpace;
use super::validity::StateValidityChecker;

/// Everything a planner needs to reason about states and motions.
///
/// Motions are checked by sampling states along the segment no further
/// apart than the longest valid segment, which is a fixed fraction of the
/// space's maximum extent.
pub struct SpaceInformation<'a> {
    space: BoundedStateSpace,
    checker: &'a dyn StateValidityChecker,
    longest_valid_segment: f64,
}

impl<'a> SpaceInformation<'a> {
    /// Attach `checker` to `space`.
    ///
    /// `relative_resolution` is the motion-check step as a fraction of
    /// [`BoundedStateSpace::maximum_extent`].
    pub fn new(
        space: BoundedStateSpace,
        checker: &'a dyn StateValidityChecker,
        relative_resolution: f64,
    ) -> Self {
        let longest_valid_segment = relative_resolution * space.maximum_extent();
        Self {
            space,
            checker,
            longest_valid_segment,
        }
    }

    #[inline]
    pub fn space(&self) -> &BoundedStateSpace {
        &self.space
    }

    /// Largest distance between two consecutive states of a motion check.
    #[inline]
    pub fn longest_valid_segment(&self) -> f64 {
        self.longest_valid_segment
    }

    #[inline]
    pub fn distance(&self, a: &Pose2D, b: &Pose2D) -> f64 {
        self.space.distance(a, b)
    }

    /// A state is valid when it is inside the bounds and the checker accepts it.
    #[inline]
    pub fn is_valid(&self, pose: &Pose2D) -> bool {
        self.space.contains(pose) && self.checker.is_valid(pose)
    }

    /// Check the motion from `from` to `to`.
    ///
    /// `from` is assumed valid. The end state is checked first, then
    /// intermediate states at most [`Self::longest_valid_segment`] apart.
    pub fn check_motion(&self, from: &Pose2D, to: &Pose2D) -> bool {
        if !self.is_valid(to) {
            return false;
        }

        let steps = self.motion_steps(from, to);
        (1..steps).all(|i| {
            let state = self.space.interpolate(from, to, i as f64 / steps as f64);
            self.is_valid(&state)
        })
    }

    /// Number of segments a motion check splits `from -> to` into.
    #[inline]
    pub fn motion_steps(&self, from: &Pose2D, to: &Pose2D) -> usize {
        let distance = self.distance(from, to);
        if self.longest_valid_segment > 0.0 {
            ((distance / self.longest_valid_segment).ceil() as usize).max(1)
        } else {
            1
        }
    }
}
