//! Global planner: validates a request, runs a sampling-based search, and
//! turns the result into a dense, stamped plan.
//!
//! # Request pipeline
//!
//! 1. Reject uninitialized use and goals outside the environment frame,
//!    then resolve the configured planner kind
//! 2. Derive state-space bounds from the environment extent
//! 3. Classify goal, then start, with the validity oracle
//! 4. Check start, then goal, against the bounds
//! 5. Attach the oracle with a motion-check step relative to the space extent
//! 6. Solve within `solver_maxtime`
//! 7. On failure: publish failure diagnostics, return an unsolved outcome
//! 8. On success: simplify, publish diagnostics, densify, stamp, publish
//!    the plan and statistics
//!
//! A search that runs out of time is reported through
//! [`PlanOutcome::solved`], not as an error.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::PlannerConfig;
use crate::core::{Pose2D, PoseStamped, path_length};
use crate::densify::densify;
use crate::diagnostics::{
    DiagnosticsSink, PlannerDiagnostics, PlannerStats, emit_diagnostics, emit_stats,
};
use crate::environment::EnvironmentModel;
use crate::error::{PlanError, Result};
use crate::planning::{
    BoundedStateSpace, ProblemDefinition, SearchSetup, SpaceInformation, ValidityOracle,
};

/// Start and goal of a planning request.
///
/// The goal's frame must match the environment frame. The start's frame is
/// not checked.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanningRequest {
    pub start: PoseStamped,
    pub goal: PoseStamped,
}

impl PlanningRequest {
    pub fn new(start: PoseStamped, goal: PoseStamped) -> Self {
        Self { start, goal }
    }
}

/// Result of a planning request that passed validation.
#[derive(Clone, Debug)]
pub struct PlanOutcome {
    /// Whether the search found a path within its time budget.
    pub solved: bool,
    /// Planar output path; empty when unsolved.
    pub path: Vec<Pose2D>,
    /// `path` stamped in the environment frame.
    pub plan: Vec<PoseStamped>,
    /// Record of the solve attempt.
    pub diagnostics: PlannerDiagnostics,
    /// Present only when solved.
    pub stats: Option<PlannerStats>,
}

struct Initialized<M> {
    name: String,
    model: Arc<M>,
    sink: Arc<dyn DiagnosticsSink>,
}

/// Sampling-based global planner over an environment model.
pub struct GlobalPlanner<M: EnvironmentModel> {
    state: Option<Initialized<M>>,
}

impl<M: EnvironmentModel> Default for GlobalPlanner<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EnvironmentModel> GlobalPlanner<M> {
    /// Create an uninitialized planner.
    pub fn new() -> Self {
        Self { state: None }
    }

    /// Create and initialize in one step.
    pub fn with_model(
        name: impl Into<String>,
        model: Arc<M>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let mut planner = Self::new();
        planner.initialize(name, model, sink);
        planner
    }

    /// Bind the planner to its environment model and diagnostics sink.
    ///
    /// Only the first call has an effect.
    pub fn initialize(
        &mut self,
        name: impl Into<String>,
        model: Arc<M>,
        sink: Arc<dyn DiagnosticsSink>,
    ) {
        if self.state.is_some() {
            warn!("This planner has already been initialized... doing nothing");
            return;
        }

        let name = name.into();
        info!("[GlobalPlanner] Initialized '{}' in frame '{}'", name, model.global_frame());
        self.state = Some(Initialized { name, model, sink });
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Name given at initialization.
    pub fn name(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.name.as_str())
    }

    /// Plan from `request.start` to `request.goal`.
    pub fn make_plan(
        &self,
        request: &PlanningRequest,
        config: &PlannerConfig,
    ) -> Result<PlanOutcome> {
        let started = Instant::now();

        let Some(ctx) = &self.state else {
            error!("The planner has not been initialized, call initialize() before planning");
            return Err(PlanError::NotInitialized);
        };
        let model = ctx.model.as_ref();
        let sink = ctx.sink.as_ref();
        let config = config.sanitized();

        let start = request.start.to_pose2d();
        let goal = request.goal.to_pose2d();
        debug!(
            "Got a start: {:.2}, {:.2}, and a goal: {:.2}, {:.2}",
            start.x, start.y, goal.x, goal.y
        );

        if request.goal.frame_id() != model.global_frame() {
            error!(
                "The goal pose passed to this planner must be in the {} frame. \
                 It is instead in the {} frame.",
                model.global_frame(),
                request.goal.frame_id()
            );
            return Err(PlanError::FrameMismatch {
                goal: request.goal.frame_id().to_string(),
                expected: model.global_frame().to_string(),
            });
        }

        let kind = config.planner_kind().inspect_err(|e| {
            error!("Fatal configuration error: {}", e);
        })?;
        config.validate()?;

        // Bounds
        let bounds = model.bounds();
        if !bounds.is_valid() {
            error!("Environment extent is degenerate: {:?}", bounds);
            return Err(PlanError::DegenerateMap {
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        debug!(
            "State space bounds: x [{:.2}, {:.2}], y [{:.2}, {:.2}]",
            bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
        );
        let space = BoundedStateSpace::new(bounds);

        // Endpoint validity, goal first
        let oracle = ValidityOracle::new(model, model.robot_footprint(), config.max_footprint_cost);

        let verdict = oracle.classify(&goal);
        if !verdict.is_free() {
            error!("Goal pose ({:.2}, {:.2}) is not free: {:?}", goal.x, goal.y, verdict);
            return Err(PlanError::GoalNotFree { verdict });
        }
        let verdict = oracle.classify(&start);
        if !verdict.is_free() {
            error!("Start pose ({:.2}, {:.2}) is not free: {:?}", start.x, start.y, verdict);
            return Err(PlanError::StartNotFree { verdict });
        }

        // Bounds membership, start first
        if !space.contains(&start) {
            error!("Start pose ({:.2}, {:.2}) is outside the map bounds", start.x, start.y);
            return Err(PlanError::StartOutOfBounds);
        }
        if !space.contains(&goal) {
            error!("Goal pose ({:.2}, {:.2}) is outside the map bounds", goal.x, goal.y);
            return Err(PlanError::GoalOutOfBounds);
        }

        // Planner
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let si = SpaceInformation::new(space, &oracle, config.relative_validity_check_resolution);
        let mut setup = SearchSetup::new(
            si,
            ProblemDefinition::new(start, goal),
            kind.instantiate(seed),
            seed,
        );

        let budget = config.solver_budget();
        let solved = setup.solve(budget);
        let planning_time = setup.last_plan_computation_time();

        if !solved {
            warn!("No path found by {} within {:.2}s", kind, config.solver_maxtime);
            let diagnostics = PlannerDiagnostics::failure(kind, planning_time);
            emit_diagnostics(sink, config.publish_diagnostics, &diagnostics);
            return Ok(PlanOutcome {
                solved: false,
                path: Vec::new(),
                plan: Vec::new(),
                diagnostics,
                stats: None,
            });
        }

        setup.simplify_solution(budget);
        let raw = setup
            .into_solution()
            .ok_or(PlanError::MissingSolution)
            .inspect_err(|e| error!("Post-processing failed: {}", e))?;

        let diagnostics = PlannerDiagnostics::success(kind, planning_time, raw.len());
        emit_diagnostics(sink, config.publish_diagnostics, &diagnostics);

        let path = if config.interpolate_path {
            let dense = densify(&raw, config.max_dist_between_pathframes).inspect_err(|e| {
                error!("Interpolation failed: {}", e);
            })?;
            debug!("Interpolated path from {} to {} frames", raw.len(), dense.len());
            dense
        } else {
            raw
        };

        let frame = model.global_frame();
        let plan: Vec<PoseStamped> = path
            .iter()
            .map(|pose| PoseStamped::from_pose2d(frame, *pose))
            .collect();

        info!(
            "Global planning finished: {} found a path with {} frames",
            kind,
            plan.len()
        );
        if !plan.is_empty() {
            sink.publish_plan(&plan);
        }

        let stats = PlannerStats {
            start,
            goal,
            start_goal_distance: start.planar_distance(goal),
            path_length: path_length(&path),
            total_planning_time: started.elapsed(),
        };
        emit_stats(sink, config.publish_diagnostics, &stats);

        Ok(PlanOutcome {
            solved: true,
            path,
            plan,
            diagnostics,
            stats: Some(stats),
        })
    }
}
