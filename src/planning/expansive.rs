//! Expansive-space tree planners.
//!
//! These planners grow trees by picking an existing node, biased toward
//! sparsely covered regions of a coarse grid, and sampling a new state
//! near it. One engine covers five configurations:
//!
//! | Planner  | Cell selection | Trees | Motion checks    | Threads |
//! |----------|----------------|-------|------------------|---------|
//! | EST      | density        | 1     | on insertion     | 1       |
//! | KPIECE   | importance     | 1     | on insertion     | 1       |
//! | SBL      | density        | 2     | lazy, on connect | 1       |
//! | pSBL     | density        | 2     | lazy, on connect | several |
//! | LBKPIECE | importance     | 2     | lazy, on connect | 1       |
//!
//! Bidirectional variants grow one tree from the start and one from the
//! goal and try to join them whenever a new node lands within range of the
//! other tree. Lazy variants check the motions of a candidate path only
//! when the trees meet, pruning the subtree below the first invalid motion.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Pose2D;

use super::discretization::{CellSelection, Discretization};
use super::kind::PlannerKind;
use super::planner::{
    DEFAULT_GOAL_BIAS, GOAL_THRESHOLD, Planner, ProblemDefinition, Termination, resolve_range,
};
use super::space_information::SpaceInformation;
use super::tree::Tree;

/// Cells per side of the bounds used for the selection grid.
const GRID_CELLS_PER_SIDE: f64 = 20.0;

/// A tree together with its selection grid.
struct GrowingTree {
    tree: Tree,
    grid: Discretization,
}

impl GrowingTree {
    fn new(root: Pose2D, cell_size: f64) -> Self {
        let mut grid = Discretization::new(cell_size);
        grid.add(0, &root);
        Self {
            tree: Tree::new(root),
            grid,
        }
    }

    fn add(&mut self, state: Pose2D, parent: usize, validated: bool) -> usize {
        let id = self.tree.add(state, parent, validated);
        self.grid.add(id, &state);
        id
    }

    fn remove_subtree(&mut self, id: usize) {
        for removed in self.tree.remove_subtree(id) {
            let state = self.tree.state(removed);
            self.grid.remove(removed, &state);
        }
    }
}

/// A motion on a candidate path that still has to be checked.
#[derive(Clone, Copy, Debug)]
struct PendingMotion {
    from: Pose2D,
    to: Pose2D,
    /// Tree and node owning the motion; `None` for the bridge between trees.
    owner: Option<(usize, usize)>,
}

/// Search state shared by all workers of one `solve` call.
struct SharedSearch {
    trees: Mutex<Vec<GrowingTree>>,
    solution: Mutex<Option<Vec<Pose2D>>>,
    done: AtomicBool,
}

impl SharedSearch {
    fn finish(&self, path: Vec<Pose2D>) {
        if !self.done.swap(true, Ordering::Relaxed) {
            *self.solution.lock() = Some(path);
        }
    }
}

/// Configurable expansive-space planner; see the module docs for the
/// named configurations.
pub struct Expansive {
    kind: PlannerKind,
    seed: u64,
    selection: CellSelection,
    bidirectional: bool,
    lazy: bool,
    threads: usize,
    range: Option<f64>,
    goal_bias: f64,
}

impl Expansive {
    fn configured(
        kind: PlannerKind,
        seed: u64,
        selection: CellSelection,
        bidirectional: bool,
        lazy: bool,
        threads: usize,
    ) -> Self {
        Self {
            kind,
            seed,
            selection,
            bidirectional,
            lazy,
            threads: threads.max(1),
            range: None,
            goal_bias: DEFAULT_GOAL_BIAS,
        }
    }

    /// Expansive Space Trees.
    pub fn est(seed: u64) -> Self {
        Self::configured(PlannerKind::Est, seed, CellSelection::Density, false, false, 1)
    }

    /// Kinodynamic Planning by Interior-Exterior Cell Exploration.
    pub fn kpiece(seed: u64) -> Self {
        Self::configured(PlannerKind::Kpiece, seed, CellSelection::Importance, false, false, 1)
    }

    /// Lazy bidirectional KPIECE.
    pub fn lbkpiece(seed: u64) -> Self {
        Self::configured(PlannerKind::Lbkpiece, seed, CellSelection::Importance, true, true, 1)
    }

    /// Single-query Bidirectional Lazy planner.
    pub fn sbl(seed: u64) -> Self {
        Self::configured(PlannerKind::Sbl, seed, CellSelection::Density, true, true, 1)
    }

    /// SBL with `threads` workers sharing both trees.
    pub fn psbl(seed: u64, threads: usize) -> Self {
        Self::configured(PlannerKind::PSbl, seed, CellSelection::Density, true, true, threads)
    }

    /// Override the maximum extension length.
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = Some(range);
        self
    }

    fn worker(
        &self,
        worker_id: usize,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
        shared: &SharedSearch,
    ) {
        let space = si.space();
        let range = resolve_range(self.range, si);
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(worker_id as u64));
        let mut grow = worker_id % 2;

        while !shared.done.load(Ordering::Relaxed) && !termination.is_reached() {
            let t = if self.bidirectional {
                grow ^= 1;
                grow
            } else {
                0
            };

            let Some((parent_id, parent)) = ({
                let mut trees = shared.trees.lock();
                let growing = &mut trees[t];
                growing
                    .grid
                    .select(&mut rng, self.selection)
                    .map(|id| (id, growing.tree.state(id)))
            }) else {
                return;
            };

            let target = if !self.bidirectional && rng.random::<f64>() < self.goal_bias {
                space.steer(&parent, &problem.goal, range)
            } else {
                space.sample_uniform_near(&mut rng, &parent, range)
            };

            if !si.is_valid(&target) {
                continue;
            }
            if !self.lazy && !si.check_motion(&parent, &target) {
                continue;
            }

            let id = {
                let mut trees = shared.trees.lock();
                if trees[t].tree.node(parent_id).removed {
                    continue;
                }
                trees[t].add(target, parent_id, !self.lazy)
            };

            if self.bidirectional {
                self.try_connect(si, shared, t, id, range);
            } else {
                self.try_reach_goal(si, problem, shared, id, range);
            }
        }
    }

    /// Unidirectional success test: the new node is the goal, or the goal
    /// is within range and reachable by a valid motion.
    fn try_reach_goal(
        &self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        shared: &SharedSearch,
        id: usize,
        range: f64,
    ) {
        let space = si.space();
        let state = shared.trees.lock()[0].tree.state(id);
        let distance = space.distance(&state, &problem.goal);

        if distance <= GOAL_THRESHOLD {
            let path = shared.trees.lock()[0].tree.path_to(id);
            shared.finish(path);
        } else if distance <= range && si.check_motion(&state, &problem.goal) {
            let mut trees = shared.trees.lock();
            let goal_id = trees[0].add(problem.goal, id, true);
            let path = trees[0].tree.path_to(goal_id);
            drop(trees);
            shared.finish(path);
        }
    }

    /// Bidirectional success test: join the node just added to tree `t`
    /// with the nearest node of the other tree.
    fn try_connect(
        &self,
        si: &SpaceInformation<'_>,
        shared: &SharedSearch,
        t: usize,
        id: usize,
        range: f64,
    ) {
        let space = si.space();
        let other = 1 - t;

        let (start_node, goal_node, pending) = {
            let trees = shared.trees.lock();
            let state = trees[t].tree.state(id);
            let Some(other_id) = trees[other].tree.nearest(space, &state) else {
                return;
            };
            let other_state = trees[other].tree.state(other_id);
            if space.distance(&state, &other_state) > range {
                return;
            }

            let (start_node, goal_node) = if t == 0 { (id, other_id) } else { (other_id, id) };
            let pending = Self::pending_motions(&trees, start_node, goal_node);
            (start_node, goal_node, pending)
        };

        // Motion checks run without holding the tree lock
        for motion in &pending {
            if !si.check_motion(&motion.from, &motion.to) {
                if let Some((tree, node)) = motion.owner {
                    shared.trees.lock()[tree].remove_subtree(node);
                }
                return;
            }
        }

        let mut trees = shared.trees.lock();
        for motion in &pending {
            if let Some((tree, node)) = motion.owner {
                trees[tree].tree.mark_validated(node);
            }
        }

        let start_branch = trees[0].tree.branch(start_node);
        let goal_branch = trees[1].tree.branch(goal_node);
        let pruned = start_branch.iter().any(|&n| trees[0].tree.node(n).removed)
            || goal_branch.iter().any(|&n| trees[1].tree.node(n).removed);
        if pruned {
            return;
        }

        let mut path = trees[0].tree.path_to(start_node);
        path.extend(goal_branch.iter().rev().map(|&n| trees[1].tree.state(n)));
        drop(trees);
        shared.finish(path);
    }

    /// Unchecked motions on the path start → `start_node` → `goal_node` → goal.
    fn pending_motions(
        trees: &[GrowingTree],
        start_node: usize,
        goal_node: usize,
    ) -> Vec<PendingMotion> {
        let mut pending = Vec::new();

        let mut collect = |tree_index: usize, node: usize| {
            let tree = &trees[tree_index].tree;
            for id in tree.branch(node) {
                let n = tree.node(id);
                if let (Some(parent), false) = (n.parent, n.validated) {
                    pending.push(PendingMotion {
                        from: tree.state(parent),
                        to: n.state,
                        owner: Some((tree_index, id)),
                    });
                }
            }
        };
        collect(0, start_node);
        collect(1, goal_node);

        pending.push(PendingMotion {
            from: trees[0].tree.state(start_node),
            to: trees[1].tree.state(goal_node),
            owner: None,
        });
        pending
    }
}

impl Planner for Expansive {
    fn kind(&self) -> PlannerKind {
        self.kind
    }

    fn solve(
        &mut self,
        si: &SpaceInformation<'_>,
        problem: &ProblemDefinition,
        termination: &Termination,
    ) -> Option<Vec<Pose2D>> {
        let space = si.space();
        if space.distance(&problem.start, &problem.goal) <= GOAL_THRESHOLD {
            return Some(vec![problem.start, problem.goal]);
        }

        let bounds = space.bounds();
        let cell_size = bounds.width().max(bounds.height()) / GRID_CELLS_PER_SIDE;

        let mut trees = vec![GrowingTree::new(problem.start, cell_size)];
        if self.bidirectional {
            trees.push(GrowingTree::new(problem.goal, cell_size));
        }

        let shared = SharedSearch {
            trees: Mutex::new(trees),
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

    fn solve_with(mut planner: Expansive) -> Vec<Pose2D> {
        let space = BoundedStateSpace::new(EnvironmentBounds::new(0.0, 10.0, 0.0, 10.0));
        let si = SpaceInformation::new(space, &WallWithGap, 0.01);
        let problem =
            ProblemDefinition::new(Pose2D::new(1.0, 1.0, 0.0), Pose2D::new(9.0, 1.0, -2.0));

        let path = planner
            .solve(&si, &problem, &Termination::after(Duration::from_secs(5)))
            .unwrap_or_else(|| panic!("{} should solve", planner.kind()));

        assert_eq!(path.first(), Some(&problem.start));
        assert_eq!(path.last(), Some(&problem.goal));
        for pair in path.windows(2) {
            assert!(si.check_motion(&pair[0], &pair[1]), "invalid motion {:?}", pair);
        }
        path
    }

    #[test]
    fn test_est() {
        solve_with(Expansive::est(1));
    }

    #[test]
    fn test_kpiece() {
        solve_with(Expansive::kpiece(2));
    }

    #[test]
    fn test_sbl() {
        solve_with(Expansive::sbl(3));
    }

    #[test]
    fn test_psbl() {
        solve_with(Expansive::psbl(4, 3));
    }

    #[test]
    fn test_lbkpiece() {
        solve_with(Expansive::lbkpiece(5));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Expansive::est(0).kind(), PlannerKind::Est);
        assert_eq!(Expansive::kpiece(0).kind(), PlannerKind::Kpiece);
        assert_eq!(Expansive::lbkpiece(0).kind(), PlannerKind::Lbkpiece);
        assert_eq!(Expansive::sbl(0).kind(), PlannerKind::Sbl);
        assert_eq!(Expansive::psbl(0, 2).kind(), PlannerKind::PSbl);
    }
}
