//! Rapidly-exploring random trees.
//!
//! - [`Rrt`]: single tree grown from the start, every motion checked on
//!   insertion; with more than one thread it becomes pRRT, workers sharing
//!   one tree behind a mutex
//! - [`LazyRrt`]: grows without motion checks and validates only the
//!   branch that reaches the goal, pruning the first invalid motion found

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Pose2D;

use super::kind::PlannerKind;
use super::planner::{
    DEFAULT_GOAL_BIAS, GOAL_THRESHOLD, Planner, ProblemDefinition, Termination, resolve_range,
};
use super::space_information::SpaceInformation;
use super::tree::Tree;

/// Sample the goal with probability `goal_bias`, otherwise the whole space.
#[inline]
fn sample_target<R: Rng + ?Sized>(
    rng: &mut R,
    si: &SpaceInformation<'_>,
    goal: &Pose2D,
    goal_bias: f64,
) -> Pose2D {
    if rng.random::<f64>() < goal_bias {
        *goal
    } else {
        si.space().sample_uniform(rng)
    }
}

/// Search state shared by pRRT workers.
struct SharedTree {
    tree: Mutex<Tree>,
    solution: Mutex<Option<Vec<Pose2D>>>,
    done: AtomicBool,
}

/// RRT, or pRRT when run with several threads.
pub struct Rrt {
    seed: u64,
    threads: usize,
    range: Option<f64>,
    goal_bias: f64,
}

impl Rrt {
    pub fn new(seed: u64) -> Self {
        Self::parallel(seed, 1)
    }

    /// Tree shared between `threads` workers.
    pub fn parallel(seed: u64, threads: usize) -> Self {
        Self {
            seed,
            threads: threads.max(1),
            range: None,
            goal_bias: DEFAULT_GOAL_BIAS,
        }
    }

    /// Override the maximum extension length.
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    /// Grow the shared tree until a worker reaches the goal.
    fn worker(
        &self,
        worker_id: usize,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
        shared: &SharedTree,
    ) {
        let SharedTree {
            tree,
            solution,
            done,
        } = shared;
        let space = si.space();
        let range = resolve_range(self.range, si);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(worker_id as u64));

        while !done.load(Ordering::Relaxed) && !termination.is_reached() {
            let sample = sample_target(&mut rng, si, &problem.goal, self.goal_bias);

            let Some((near_id, near)) = ({
                let tree = tree.lock();
                tree.nearest(space, &sample).map(|id| (id, tree.state(id)))
            }) else {
                return;
            };

            let target = space.steer(&near, &sample, range);
            if !si.check_motion(&near, &target) {
                continue;
            }

            let mut tree = tree.lock();
            let id = tree.add(target, near_id, true);

            if space.distance(&target, &problem.goal) <= GOAL_THRESHOLD {
                if !done.swap(true, Ordering::Relaxed) {
                    *solution.lock() = Some(tree.path_to(id));
                }
                return;
            }
        }
    }
}

impl Planner for Rrt {
    fn kind(&self) -> PlannerKind {
        if self.threads > 1 {
            PlannerKind::PRrt
        } else {
            PlannerKind::Rrt
        }
    }

    fn solve(
        &mut self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
    ) -> Option<Vec<Pose2D>> {
        let shared = SharedTree {
            tree: Mutex::new(Tree::new(problem.start)),
            solution: Mutex::new(None),
            done: AtomicBool::new(false),
        };

        if self.threads == 1 {
            self.worker(0, si, problem, termination, &shared);
        } else {
            let this = &*self;
            let shared = &shared;
            std::thread::scope(|scope| {
                for worker_id in 0..this.threads {
                    scope.spawn(move || this.worker(worker_id, si, problem, termination, shared));
                }
            });
        }

        self.seed = self.seed.wrapping_add(self.threads as u64);
        shared.solution.into_inner()
    }
}

/// Lazy RRT: motion checks are deferred until a branch reaches the goal.
pub struct LazyRrt {
    rng: StdRng,
    range: Option<f64>,
    goal_bias: f64,
}

impl LazyRrt {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range: None,
            goal_bias: DEFAULT_GOAL_BIAS,
        }
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    /// Check the unvalidated motions on the branch to `id`, from the root
    /// down. Returns the first invalid node, which is pruned with its subtree.
    fn validate_branch(si: &SpaceInformation<'_>, tree: &mut Tree, id: usize) -> Option<usize> {
        for node_id in tree.branch(id) {
            let node = *tree.node(node_id);
            let Some(parent) = node.parent else {
                continue;
            };
            if node.validated {
                continue;
            }

            if si.check_motion(&tree.state(parent), &node.state) {
                tree.mark_validated(node_id);
            } else {
                tree.remove_subtree(node_id);
                return Some(node_id);
            }
        }
        None
    }
}

impl Planner for LazyRrt {
    fn kind(&self) -> PlannerKind {
        PlannerKind::LazyRrt
    }

    fn solve(
        &mut self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
    ) -> Option<Vec<Pose2D>> {
        let space = si.space();
        let range = resolve_range(self.range, si);
        let mut tree = Tree::new(problem.start);

        while !termination.is_reached() {
            let sample = sample_target(&mut self.rng, si, &problem.goal, self.goal_bias);
            let near_id = tree.nearest(space, &sample)?;
            let near = tree.state(near_id);

            let target = space.steer(&near, &sample, range);
            if !space.contains(&target) {
                continue;
            }
            let id = tree.add(target, near_id, false);

            if space.distance(&target, &problem.goal) <= GOAL_THRESHOLD
                && Self::validate_branch(si, &mut tree, id).is_none()
            {
                return Some(tree.path_to(id));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EnvironmentBounds;
    use crate::planning::state_space::BoundedStateSpace;
    use crate::planning::validity::StateValidityChecker;
    use std::time::Duration;

    /// Wall at 4 < x < 6 with a gap at y > 8.
    struct WallWithGap;

    impl StateValidityChecker for WallWithGap {
        fn is_valid(&self, pose: &Pose2D) -> bool {
            !(pose.x > 4.0 && pose.x < 6.0 && pose.y < 8.0)
        }
    }

    fn assert_valid_solution(
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        path: &[Pose2D],
    ) {
        assert_eq!(path.first(), Some(&problem.start));
        assert_eq!(path.last(), Some(&problem.goal));
        for pair in path.windows(2) {
            assert!(si.check_motion(&pair[0], &pair[1]));
        }
    }

    fn setup() -> (BoundedStateSpace, ProblemDefinition) {
        (
            BoundedStateSpace::new(EnvironmentBounds::new(0.0, 10.0, 0.0, 10.0)),
            ProblemDefinition::new(Pose2D::new(1.0, 1.0, 0.0), Pose2D::new(9.0, 1.0, 1.0)),
        )
    }

    #[test]
    fn test_rrt_finds_path_around_wall() {
        let (space, problem) = setup();
        let si = SpaceInformation::new(space, &WallWithGap, 0.01);
        let mut planner = Rrt::new(42);

        let path = planner
            .solve(&si, &problem, &Termination::after(Duration::from_secs(5)))
            .expect("RRT should solve");
        assert_valid_solution(&si, &problem, &path);
        assert_eq!(planner.kind(), PlannerKind::Rrt);
    }

    #[test]
    fn test_parallel_rrt_finds_path_around_wall() {
        let (space, problem) = setup();
        let si = SpaceInformation::new(space, &WallWithGap, 0.01);
        let mut planner = Rrt::parallel(42, 3);

        let path = planner
            .solve(&si, &problem, &Termination::after(Duration::from_secs(5)))
            .expect("pRRT should solve");
        assert_valid_solution(&si, &problem, &path);
        assert_eq!(planner.kind(), PlannerKind::PRrt);
    }

    #[test]
    fn test_lazy_rrt_finds_path_around_wall() {
        let (space, problem) = setup();
        let si = SpaceInformation::new(space, &WallWithGap, 0.01);
        let mut planner = LazyRrt::new(42);

        let path = planner
            .solve(&si, &problem, &Termination::after(Duration::from_secs(5)))
            .expect("LazyRRT should solve");
        assert_valid_solution(&si, &problem, &path);
    }

    #[test]
    fn test_expired_budget_returns_none() {
        let (space, problem) = setup();
        let si = SpaceInformation::new(space, &WallWithGap, 0.01);
        let mut planner = Rrt::new(1);

        assert!(
            planner
                .solve(&si, &problem, &Termination::after(Duration::ZERO))
                .is_none()
        );
    }
}
