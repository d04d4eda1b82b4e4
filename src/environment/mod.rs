//! Environment models queried by the planner.
//!
//! The planner needs two things from its environment: a footprint cost
//! query ([`FootprintCostModel`]) and the model's frame, extent and robot
//! footprint ([`EnvironmentModel`]).
//!
//! - [`GridCostmap`]: in-memory cost grid with inflation and ASCII loading
//! - [`StaticEnvironment`]: a cost map bound to a frame and a footprint
//! - [`SerializedModel`]: adapter for models whose cost query needs `&mut`

mod costmap;
mod footprint;
mod serialized;
mod static_env;

pub use costmap::{GridCoord, GridCostmap, costs};
pub use footprint::Footprint;
pub use serialized::{ExclusiveCostModel, SerializedModel};
pub use static_env::StaticEnvironment;

use crate::core::{EnvironmentBounds, Point2D, Pose2D};

/// Cost of placing the robot footprint at a pose.
///
/// A negative cost means the placement is undefined: in collision, off the
/// map, or over unobserved space.
pub trait FootprintCostModel: Send + Sync {
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64;
}

/// Full environment description used for one planning request.
pub trait EnvironmentModel: FootprintCostModel {
    /// Frame every pose in the model is expressed in.
    fn global_frame(&self) -> &str;

    /// Metric extent (width, height).
    fn size_in_meters(&self) -> (f64, f64);

    /// World position of the lower-left corner.
    fn origin(&self) -> Point2D;

    /// Current robot footprint polygon.
    fn robot_footprint(&self) -> Footprint;

    /// Axis-aligned extent derived from origin and size.
    fn bounds(&self) -> EnvironmentBounds {
        let (size_x, size_y) = self.size_in_meters();
        EnvironmentBounds::from_extents(self.origin(), size_x, size_y)
    }
}

impl<T: FootprintCostModel + ?Sized> FootprintCostModel for std::sync::Arc<T> {
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64 {
        (**self).footprint_cost(pose, footprint)
    }
}
