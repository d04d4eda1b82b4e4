//! Bidirectional RRT with greedy connection.
//!
//! One tree grows from the start and one from the goal. Each iteration
//! extends one tree a single step toward a random sample, then tries to
//! connect the other tree to the new state by repeated extension. Trees
//! swap roles every iteration.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::Pose2D;

use super::kind::PlannerKind;
use super::planner::{GOAL_THRESHOLD, Planner, ProblemDefinition, Termination, resolve_range};
use super::space_information::SpaceInformation;
use super::tree::Tree;

/// Outcome of extending a tree toward a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Extension {
    /// The target itself was added.
    Reached(usize),
    /// A state part of the way was added.
    Advanced(usize),
    /// The motion was invalid; nothing added.
    Trapped,
}

/// RRT-Connect.
pub struct RrtConnect {
    rng: StdRng,
    range: Option<f64>,
}

impl RrtConnect {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range: None,
        }
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    fn extend(
        si: &SpaceInformation<'_>,
        tree: &mut Tree,
        target: &Pose2D,
        range: f64,
    ) -> Extension {
        let space = si.space();
        let Some(near_id) = tree.nearest(space, target) else {
            return Extension::Trapped;
        };
        let near = tree.state(near_id);

        let reached = space.distance(&near, target) <= range;
        let new_state = space.steer(&near, target, range);
        if !si.check_motion(&near, &new_state) {
            return Extension::Trapped;
        }

        let id = tree.add(new_state, near_id, true);
        if reached {
            Extension::Reached(id)
        } else {
            Extension::Advanced(id)
        }
    }

    /// Extend `tree` toward `target` until it is reached or blocked.
    fn connect(
        si: &SpaceInformation<'_>,
        tree: &mut Tree,
        target: &Pose2D,
        range: f64,
        termination: &Termination,
    ) -> Extension {
        loop {
            match Self::extend(si, tree, target, range) {
                Extension::Advanced(_) if !termination.is_reached() => continue,
                other => return other,
            }
        }
    }
}

impl Planner for RrtConnect {
    fn kind(&self) -> PlannerKind {
        PlannerKind::RrtConnect
    }

    fn solve(
        &mut self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
    ) -> Option<Vec<Pose2D>> {
        let space = si.space();
        let range = resolve_range(self.range, si);

        if space.distance(&problem.start, &problem.goal) <= GOAL_THRESHOLD {
            return Some(vec![problem.start, problem.goal]);
        }

        let mut start_tree = Tree::new(problem.start);
        let mut goal_tree = Tree::new(problem.goal);
        let mut grow_start = true;

        while !termination.is_reached() {
            let sample = space.sample_uniform(&mut self.rng);

            let (tree, other) = if grow_start {
                (&mut start_tree, &mut goal_tree)
            } else {
                (&mut goal_tree, &mut start_tree)
            };

            let new_id = match Self::extend(si, tree, &sample, range) {
                Extension::Reached(id) | Extension::Advanced(id) => id,
                Extension::Trapped => {
                    grow_start = !grow_start;
                    continue;
                }
            };
            let new_state = tree.state(new_id);

            if let Extension::Reached(other_id) =
                Self::connect(si, other, &new_state, range, termination)
            {
                let (start_id, goal_id) = if grow_start {
                    (new_id, other_id)
                } else {
                    (other_id, new_id)
                };

                let mut path = start_tree.path_to(start_id);
                let mut tail = goal_tree.path_to(goal_id);
                tail.reverse();
                // Both trees hold the meeting state
                path.pop();
                path.extend(tail);
                return Some(path);
            }

            grow_start = !grow_start;
        }

        None
    }
}
