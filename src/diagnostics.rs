//! Planner diagnostics, statistics and plan publication.
//!
//! Every planning request that reaches the solver produces one
//! [`PlannerDiagnostics`] record; successful requests additionally produce a
//! [`PlannerStats`] record and publish the stamped plan. Records go to a
//! [`DiagnosticsSink`]:
//!
//! - [`TracingSink`]: structured `tracing` events
//! - [`MemorySink`]: keeps every record, for tests and tooling
//! - [`NullSink`]: discards everything

use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

use crate::core::{Pose2D, PoseStamped};
use crate::planning::PlannerKind;

/// Diagnostics group every record belongs to.
pub const DIAGNOSTICS_GROUP: &str = "base";

/// Outcome of one solve attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerDiagnostics {
    /// "Planning success" or "Planning Failed"
    pub summary: String,
    pub group: String,
    /// Planner kind name, e.g. "LBKPIECE"
    pub planner: String,
    /// "success" or "failed"
    pub result: String,
    /// Time spent inside the planner (excludes simplification)
    pub planning_time: Duration,
    /// Number of frames in the simplified solution, 0 on failure
    pub trajectory_size: usize,
    /// Always 0: paths carry no timing
    pub trajectory_duration: f64,
}

impl PlannerDiagnostics {
    pub fn success(kind: PlannerKind, planning_time: Duration, trajectory_size: usize) -> Self {
        Self {
            summary: "Planning success".to_string(),
            group: DIAGNOSTICS_GROUP.to_string(),
            planner: kind.name().to_string(),
            result: "success".to_string(),
            planning_time,
            trajectory_size,
            trajectory_duration: 0.0,
        }
    }

    pub fn failure(kind: PlannerKind, planning_time: Duration) -> Self {
        Self {
            summary: "Planning Failed".to_string(),
            group: DIAGNOSTICS_GROUP.to_string(),
            planner: kind.name().to_string(),
            result: "failed".to_string(),
            planning_time,
            trajectory_size: 0,
            trajectory_duration: 0.0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

/// Statistics of a successful request.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerStats {
    pub start: Pose2D,
    pub goal: Pose2D,
    /// Straight-line distance between start and goal
    pub start_goal_distance: f64,
    /// Planar length of the returned path
    pub path_length: f64,
    /// Wall time from request entry to path extraction
    pub total_planning_time: Duration,
}

/// Receiver for diagnostics, statistics and plans.
pub trait DiagnosticsSink: Send + Sync {
    fn publish_diagnostics(&self, diagnostics: &PlannerDiagnostics);

    fn publish_stats(&self, stats: &PlannerStats);

    /// Publish a computed plan for visualization.
    fn publish_plan(&self, plan: &[PoseStamped]);
}

/// Logs every record as a structured `tracing` event.
#[derive(Clone, Debug)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DiagnosticsSink for TracingSink {
    fn publish_diagnostics(&self, d: &PlannerDiagnostics) {
        info!(
            target: "marga::diagnostics",
            sink = %self.name,
            group = %d.group,
            planner = %d.planner,
            result = %d.result,
            planning_time = d.planning_time.as_secs_f64(),
            trajectory_size = d.trajectory_size,
            trajectory_duration = d.trajectory_duration,
            "{}",
            d.summary
        );
    }

    fn publish_stats(&self, s: &PlannerStats) {
        info!(
            target: "marga::statistics",
            sink = %self.name,
            start_x = s.start.x,
            start_y = s.start.y,
            start_theta = s.start.theta,
            goal_x = s.goal.x,
            goal_y = s.goal.y,
            goal_theta = s.goal.theta,
            start_goal_distance = s.start_goal_distance,
            path_length = s.path_length,
            total_planning_time = s.total_planning_time.as_secs_f64(),
            "Planner statistics"
        );
    }

    fn publish_plan(&self, plan: &[PoseStamped]) {
        let frame = plan.first().map(PoseStamped::frame_id).unwrap_or_default();
        info!(
            target: "marga::plan",
            sink = %self.name,
            frame = %frame,
            frames = plan.len(),
            "Plan published"
        );
    }
}

/// Keeps every published record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<PlannerDiagnostics>>,
    stats: Mutex<Vec<PlannerStats>>,
    plans: Mutex<Vec<Vec<PoseStamped>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<PlannerDiagnostics> {
        self.diagnostics.lock().clone()
    }

    pub fn stats(&self) -> Vec<PlannerStats> {
        self.stats.lock().clone()
    }

    pub fn plans(&self) -> Vec<Vec<PoseStamped>> {
        self.plans.lock().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.diagnostics.lock().clear();
        self.stats.lock().clear();
        self.plans.lock().clear();
    }
}

impl DiagnosticsSink for MemorySink {
    fn publish_diagnostics(&self, diagnostics: &PlannerDiagnostics) {
        self.diagnostics.lock().push(diagnostics.clone());
    }

    fn publish_stats(&self, stats: &PlannerStats) {
        self.stats.lock().push(stats.clone());
    }

    fn publish_plan(&self, plan: &[PoseStamped]) {
        self.plans.lock().push(plan.to_vec());
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn publish_diagnostics(&self, _diagnostics: &PlannerDiagnostics) {}

    fn publish_stats(&self, _stats: &PlannerStats) {}

    fn publish_plan(&self, _plan: &[PoseStamped]) {}
}

/// Publish `diagnostics` when enabled.
pub(crate) fn emit_diagnostics(
    sink: &dyn DiagnosticsSink,
    enabled: bool,
    diagnostics: &PlannerDiagnostics,
) {
    if enabled {
        sink.publish_diagnostics(diagnostics);
    }
}

/// Publish `stats` when enabled.
pub(crate) fn emit_stats(sink: &dyn DiagnosticsSink, enabled: bool, stats: &PlannerStats) {
    if enabled {
        sink.publish_stats(stats);
    }
}
