//! Planner capability shared by every search strategy.

use std::time::{Duration, Instant};

use crate::core::Pose2D;

use super::kind::PlannerKind;
use super::space_information::SpaceInformation;

/// Distance under which a state counts as the goal.
pub const GOAL_THRESHOLD: f64 = 1e-9;

/// Fraction of samples drawn at the goal.
pub const DEFAULT_GOAL_BIAS: f64 = 0.05;

/// Default extension range as a fraction of the space's maximum extent.
pub const DEFAULT_RANGE_FRACTION: f64 = 0.2;

/// Start and goal for one query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProblemDefinition {
    pub start: Pose2D,
    pub goal: Pose2D,
}

impl ProblemDefinition {
    pub fn new(start: Pose2D, goal: Pose2D) -> Self {
        Self { start, goal }
    }
}

/// Wall-clock termination condition.
#[derive(Clone, Copy, Debug)]
pub struct Termination {
    /// `None` when the budget reaches past the clock's range.
    deadline: Option<Instant>,
}

impl Termination {
    /// Terminate `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(budget),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// A sampling-based motion planner.
///
/// `solve` runs until a path from start to goal is found or `termination`
/// is reached. A returned path starts at the start state, ends at the goal
/// state, and every consecutive motion passed [`SpaceInformation::check_motion`].
pub trait Planner: Send {
    fn kind(&self) -> PlannerKind;

    fn solve(
        &mut self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
    ) -> Option<Vec<Pose2D>>;
}

/// Extension range for `si`, unless overridden.
#[inline]
pub(crate) fn resolve_range(range: Option<f64>, si: &SpaceInformation<'_>) -> f64 {
    range
        .filter(|r| *r > 0.0)
        .unwrap_or(DEFAULT_RANGE_FRACTION * si.space().maximum_extent())
}
