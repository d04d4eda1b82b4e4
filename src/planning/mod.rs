//! Sampling-based motion planning in a bounded SE(2) space.
//!
//! # Structure
//!
//! - [`BoundedStateSpace`]: position bounds plus full-circle heading
//! - [`ValidityOracle`]: footprint-cost based state classification
//! - [`SpaceInformation`]: state space + validity checker + motion checks
//! - [`PlannerKind`]: the nine planners and their factory
//! - [`SearchSetup`]: solve and simplify a single query
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use marga::core::{EnvironmentBounds, Pose2D};
//! use marga::planning::{
//!     BoundedStateSpace, PlannerKind, ProblemDefinition, SearchSetup, SpaceInformation,
//!     StateValidityChecker,
//! };
//!
//! struct Open;
//! impl StateValidityChecker for Open {
//!     fn is_valid(&self, _pose: &Pose2D) -> bool {
//!         true
//!     }
//! }
//!
//! let space = BoundedStateSpace::new(EnvironmentBounds::new(0.0, 4.0, 0.0, 4.0));
//! let si = SpaceInformation::new(space, &Open, 0.01);
//! let problem = ProblemDefinition::new(Pose2D::new(0.5, 0.5, 0.0), Pose2D::new(3.5, 3.5, 0.0));
//!
//! let mut setup = SearchSetup::new(si, problem, PlannerKind::RrtConnect.instantiate(1), 1);
//! assert!(setup.solve(Duration::from_secs(1)));
//! ```

mod discretization;
mod expansive;
mod kind;
mod planner;
mod rrt;
mod rrt_connect;
mod setup;
mod simplify;
mod space_information;
mod state_space;
mod tree;
mod validity;

pub use discretization::CellSelection;
pub use expansive::Expansive;
pub use kind::{PARALLEL_THREADS, PlannerKind};
pub use planner::{
    DEFAULT_GOAL_BIAS, DEFAULT_RANGE_FRACTION, GOAL_THRESHOLD, Planner, ProblemDefinition,
    Termination,
};
pub use rrt::{LazyRrt, Rrt};
pub use rrt_connect::RrtConnect;
pub use setup::SearchSetup;
pub use simplify::{PathSimplifier, SimplifierConfig};
pub use space_information::SpaceInformation;
pub use state_space::BoundedStateSpace;
pub use validity::{StateValidityChecker, ValidityOracle, ValidityVerdict};
