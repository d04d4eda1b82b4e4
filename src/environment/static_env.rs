//! Cost map environment with a fixed frame and footprint.

use crate::core::{Point2D, Pose2D};

use super::costmap::GridCostmap;
use super::footprint::Footprint;
use super::{EnvironmentModel, FootprintCostModel};

/// A [`GridCostmap`] bound to a frame id and a robot footprint.
#[derive(Clone, Debug)]
pub struct StaticEnvironment {
    frame_id: String,
    costmap: GridCostmap,
    footprint: Footprint,
}

impl StaticEnvironment {
    pub fn new(frame_id: impl Into<String>, costmap: GridCostmap, footprint: Footprint) -> Self {
        Self {
            frame_id: frame_id.into(),
            costmap,
            footprint,
        }
    }

    pub fn costmap(&self) -> &GridCostmap {
        &self.costmap
    }

    pub fn costmap_mut(&mut self) -> &mut GridCostmap {
        &mut self.costmap
    }

    /// Replace the robot footprint.
    pub fn set_footprint(&mut self, footprint: Footprint) {
        self.footprint = footprint;
    }
}

impl FootprintCostModel for StaticEnvironment {
    #[inline]
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64 {
        self.costmap.footprint_cost(pose, footprint)
    }
}

impl EnvironmentModel for StaticEnvironment {
    fn global_frame(&self) -> &str {
        &self.frame_id
    }

    fn size_in_meters(&self) -> (f64, f64) {
        self.costmap.size_in_meters()
    }

    fn origin(&self) -> Point2D {
        self.costmap.origin()
    }

    fn robot_footprint(&self) -> Footprint {
        self.footprint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_costmap() {
        let costmap = GridCostmap::new(100, 50, 0.1, Point2D::new(-5.0, -2.5));
        let env = StaticEnvironment::new("map", costmap, Footprint::circle(0.2));

        let bounds = env.bounds();
        assert_eq!(env.global_frame(), "map");
        assert!((bounds.x_min - -5.0).abs() < 1e-12);
        assert!((bounds.x_max - 5.0).abs() < 1e-9);
        assert!((bounds.y_min - -2.5).abs() < 1e-12);
        assert!((bounds.y_max - 2.5).abs() < 1e-9);
    }
}
