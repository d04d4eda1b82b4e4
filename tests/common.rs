//! Test utilities for planner integration tests.
//!
//! Environments are 10 m x 10 m at 0.1 m resolution in the "map" frame with
//! a 0.3 m square robot.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use marga::core::{Point2D, Pose2D, PoseStamped};
use marga::diagnostics::MemorySink;
use marga::environment::{
    EnvironmentModel, Footprint, FootprintCostModel, GridCostmap, StaticEnvironment, costs,
};
use marga::{GlobalPlanner, PlannerConfig, PlanningRequest};

pub const FRAME: &str = "map";
pub const SIZE: f64 = 10.0;
pub const RESOLUTION: f64 = 0.1;

/// Start and goal on opposite sides of the wall in [`walled_env`].
pub const START: Pose2D = Pose2D {
    x: 1.0,
    y: 1.0,
    theta: 0.0,
};
pub const GOAL: Pose2D = Pose2D {
    x: 9.0,
    y: 1.0,
    theta: 1.0,
};

pub fn robot_footprint() -> Footprint {
    Footprint::rectangle(0.3, 0.3)
}

fn empty_costmap() -> GridCostmap {
    let cells = (SIZE / RESOLUTION).round() as usize;
    GridCostmap::new(cells, cells, RESOLUTION, Point2D::ZERO)
}

/// Obstacle-free environment.
pub fn open_env() -> StaticEnvironment {
    StaticEnvironment::new(FRAME, empty_costmap(), robot_footprint())
}

/// Vertical wall at x = 5 with a 2 m gap between y = 7 and y = 9.
pub fn walled_env() -> StaticEnvironment {
    let mut costmap = empty_costmap();
    costmap.fill_rect(Point2D::new(4.9, 0.0), Point2D::new(5.1, 7.0), costs::LETHAL);
    costmap.fill_rect(Point2D::new(4.9, 9.0), Point2D::new(5.1, SIZE), costs::LETHAL);
    StaticEnvironment::new(FRAME, costmap, robot_footprint())
}

/// Free pocket around (7, 7) closed off by a lethal ring.
pub fn enclosed_env() -> StaticEnvironment {
    let mut costmap = empty_costmap();
    costmap.fill_rect(Point2D::new(6.0, 6.0), Point2D::new(8.0, 8.0), costs::LETHAL);
    costmap.fill_rect(Point2D::new(6.3, 6.3), Point2D::new(7.7, 7.7), costs::FREE);
    StaticEnvironment::new(FRAME, costmap, robot_footprint())
}

/// Counts footprint cost queries made against the wrapped environment.
pub struct CountingEnv {
    inner: StaticEnvironment,
    queries: AtomicUsize,
}

impl CountingEnv {
    pub fn new(inner: StaticEnvironment) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl FootprintCostModel for CountingEnv {
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64 {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.footprint_cost(pose, footprint)
    }
}

impl EnvironmentModel for CountingEnv {
    fn global_frame(&self) -> &str {
        self.inner.global_frame()
    }

    fn size_in_meters(&self) -> (f64, f64) {
        self.inner.size_in_meters()
    }

    fn origin(&self) -> Point2D {
        self.inner.origin()
    }

    fn robot_footprint(&self) -> Footprint {
        self.inner.robot_footprint()
    }
}

/// Reports zero cost everywhere, including outside its extent.
pub struct UnboundedFreeEnv;

impl FootprintCostModel for UnboundedFreeEnv {
    fn footprint_cost(&self, _pose: &Pose2D, _footprint: &Footprint) -> f64 {
        0.0
    }
}

impl EnvironmentModel for UnboundedFreeEnv {
    fn global_frame(&self) -> &str {
        FRAME
    }

    fn size_in_meters(&self) -> (f64, f64) {
        (SIZE, SIZE)
    }

    fn origin(&self) -> Point2D {
        Point2D::ZERO
    }

    fn robot_footprint(&self) -> Footprint {
        robot_footprint()
    }
}

/// Initialized planner over `env` recording into a fresh [`MemorySink`].
pub fn planner_for<M: EnvironmentModel>(env: M) -> (GlobalPlanner<M>, Arc<M>, Arc<MemorySink>) {
    let env = Arc::new(env);
    let sink = Arc::new(MemorySink::new());
    let planner = GlobalPlanner::with_model("test_planner", env.clone(), sink.clone());
    (planner, env, sink)
}

/// Seeded configuration for `planner_type` with a generous time budget.
pub fn config(planner_type: &str) -> PlannerConfig {
    PlannerConfig {
        global_planner_type: planner_type.to_string(),
        solver_maxtime: 5.0,
        random_seed: Some(42),
        ..Default::default()
    }
}

pub fn request(start: Pose2D, goal: Pose2D) -> PlanningRequest {
    PlanningRequest::new(
        PoseStamped::from_pose2d(FRAME, start),
        PoseStamped::from_pose2d(FRAME, goal),
    )
}
