//! One-shot planning setup: space information, problem, planner.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::Pose2D;

use super::kind::PlannerKind;
use super::planner::{Planner, ProblemDefinition, Termination};
use super::simplify::PathSimplifier;
use super::space_information::SpaceInformation;

/// Bundles everything needed to answer a single query and keeps the result.
pub struct SearchSetup<'a> {
    si: SpaceInformation<'a>,
    problem: ProblemDefinition,
    planner: Box<dyn Planner>,
    seed: u64,
    solution: Option<Vec<Pose2D>>,
    last_plan_computation_time: Duration,
    last_simplification_time: Duration,
}

impl<'a> SearchSetup<'a> {
    pub fn new(
        si: SpaceInformation<'a>,
        problem: ProblemDefinition,
        planner: Box<dyn Planner>,
        seed: u64,
    ) -> Self {
        Self {
            si,
            problem,
            planner,
            seed,
            solution: None,
            last_plan_computation_time: Duration::ZERO,
            last_simplification_time: Duration::ZERO,
        }
    }

    pub fn space_information(&self) -> &SpaceInformation<'a> {
        &self.si
    }

    pub fn planner_kind(&self) -> PlannerKind {
        self.planner.kind()
    }

    /// Run the planner for at most `budget`. Returns whether a path was found.
    pub fn solve(&mut self, budget: Duration) -> bool {
        let started = Instant::now();
        let termination = Termination::after(budget);

        self.solution = self.planner.solve(&self.si, &self.problem, &termination);
        self.last_plan_computation_time = started.elapsed();

        debug!(
            "[SearchSetup] {} {} in {:.3}s",
            self.planner.kind(),
            if self.solution.is_some() { "solved" } else { "gave up" },
            self.last_plan_computation_time.as_secs_f64()
        );

        self.solution.is_some()
    }

    /// Shorten the stored solution, spending at most `budget`.
    pub fn simplify_solution(&mut self, budget: Duration) {
        let Some(path) = self.solution.as_deref() else {
            return;
        };

        let started = Instant::now();
        let mut simplifier = PathSimplifier::with_defaults(&self.si, self.seed);
        let simplified = simplifier.simplify(path, &Termination::after(budget));

        debug!(
            "[SearchSetup] Simplified {} -> {} states",
            path.len(),
            simplified.len()
        );

        self.solution = Some(simplified);
        self.last_simplification_time = started.elapsed();
    }

    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    pub fn solution(&self) -> Option<&[Pose2D]> {
        self.solution.as_deref()
    }

    /// Take ownership of the solution.
    pub fn into_solution(self) -> Option<Vec<Pose2D>> {
        self.solution
    }

    /// Wall time spent in the last [`SearchSetup::solve`].
    pub fn last_plan_computation_time(&self) -> Duration {
        self.last_plan_computation_time
    }

    /// Wall time spent in the last [`SearchSetup::simplify_solution`].
    pub fn last_simplification_time(&self) -> Duration {
        self.last_simplification_time
    }
}
