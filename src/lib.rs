//! Marga: sampling-based 2D global planner.
//!
//! Plans a collision-free path for a robot footprint from a start pose to a
//! goal pose over an environment model, using one of nine sampling-based
//! planners, then simplifies and densifies the result.
//!
//! # Modules
//!
//! - [`core`]: planar poses, stamped 3D poses, environment bounds
//! - [`environment`]: footprint cost models and a grid cost map
//! - [`planning`]: state space, validity oracle, planners, simplification
//! - [`densify`]: fixed-spacing path interpolation
//! - [`diagnostics`]: per-request diagnostics, statistics and plan sinks
//! - [`global_planner`]: request validation and the solve pipeline
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use marga::core::{Point2D, Pose2D, PoseStamped};
//! use marga::diagnostics::MemorySink;
//! use marga::environment::{Footprint, GridCostmap, StaticEnvironment};
//! use marga::{GlobalPlanner, PlannerConfig, PlanningRequest};
//!
//! let costmap = GridCostmap::new(40, 40, 0.1, Point2D::ZERO);
//! let env = Arc::new(StaticEnvironment::new("map", costmap, Footprint::rectangle(0.2, 0.2)));
//! let sink = Arc::new(MemorySink::new());
//! let planner = GlobalPlanner::with_model("global", env, sink.clone());
//!
//! let config = PlannerConfig {
//!     global_planner_type: "RRTConnect".into(),
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let request = PlanningRequest::new(
//!     PoseStamped::from_pose2d("map", Pose2D::new(0.5, 0.5, 0.0)),
//!     PoseStamped::from_pose2d("map", Pose2D::new(3.5, 3.5, 0.0)),
//! );
//!
//! let outcome = planner.make_plan(&request, &config).unwrap();
//! assert!(outcome.solved);
//! assert_eq!(sink.plans().len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod densify;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod global_planner;
pub mod planning;

pub use config::{MargaConfig, PlannerConfig};
pub use error::{ConfigError, DensifyError, MapError, PlanError, Result};
pub use global_planner::{GlobalPlanner, PlanOutcome, PlanningRequest};
pub use planning::PlannerKind;
