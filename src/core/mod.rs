//! Core types for the marga planner.
//!
//! - [`Point2D`] and [`Pose2D`]: planar geometry used by the search
//! - [`Pose`], [`PoseStamped`]: 3D pose messages exchanged with callers
//! - [`EnvironmentBounds`]: metric extent of the environment model

mod bounds;
mod geometry;
pub mod math;
mod point;
mod pose;

pub use bounds::EnvironmentBounds;
pub use geometry::{Header, Pose, PoseStamped};
pub use math::normalize_angle;
pub use point::Point2D;
pub use pose::{Pose2D, path_length};
