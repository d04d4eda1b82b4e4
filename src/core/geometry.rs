//! Full 3D pose messages and their planar projection.
//!
//! Requests arrive and plans leave as stamped 3D poses (position plus
//! orientation quaternion). Planning happens on [`Pose2D`]; the conversions
//! here keep x, y and the yaw component and drop everything else.

use std::time::SystemTime;

use nalgebra::{Point3, UnitQuaternion};

use super::math::normalize_angle;
use super::pose::Pose2D;

/// Position and orientation in 3D space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in meters.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub orientation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

impl Pose {
    /// Create a pose on the ground plane with the given yaw.
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            position: Point3::new(x, y, 0.0),
            orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        }
    }

    /// Yaw (rotation about Z) of the orientation, in (-π, π].
    pub fn yaw(&self) -> f64 {
        let (_roll, _pitch, yaw) = self.orientation.euler_angles();
        normalize_angle(yaw)
    }
}

impl From<&Pose> for Pose2D {
    fn from(pose: &Pose) -> Self {
        Pose2D::new(pose.position.x, pose.position.y, pose.yaw())
    }
}

impl From<Pose> for Pose2D {
    fn from(pose: Pose) -> Self {
        Pose2D::from(&pose)
    }
}

impl From<Pose2D> for Pose {
    fn from(pose: Pose2D) -> Self {
        Pose::planar(pose.x, pose.y, pose.theta)
    }
}

/// Frame and timestamp attached to a pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Coordinate frame the pose is expressed in.
    pub frame_id: String,
    /// Acquisition or creation time.
    pub stamp: SystemTime,
}

impl Header {
    /// Header for `frame_id` stamped with the current time.
    pub fn now(frame_id: impl Into<String>) -> Self {
        Self {
            frame_id: frame_id.into(),
            stamp: SystemTime::now(),
        }
    }
}

/// A pose with frame and timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseStamped {
    /// Frame and time.
    pub header: Header,
    /// The pose itself.
    pub pose: Pose,
}

impl PoseStamped {
    /// Stamp a planar pose in `frame_id` with the current time.
    pub fn from_pose2d(frame_id: impl Into<String>, pose: Pose2D) -> Self {
        Self {
            header: Header::now(frame_id),
            pose: pose.into(),
        }
    }

    /// Planar projection of the pose.
    pub fn to_pose2d(&self) -> Pose2D {
        Pose2D::from(&self.pose)
    }

    /// Frame the pose is expressed in.
    pub fn frame_id(&self) -> &str {
        &self.header.frame_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_roundtrip_preserves_position_and_heading() {
        for &theta in &[0.0, 0.3, FRAC_PI_2, -2.5, PI, 3.0] {
            let pose2d = Pose2D::new(1.5, -2.25, theta);
            let pose: Pose = pose2d.into();

            assert_eq!(pose.position.z, 0.0);

            let back = Pose2D::from(&pose);
            assert_relative_eq!(back.x, 1.5, epsilon = 1e-12);
            assert_relative_eq!(back.y, -2.25, epsilon = 1e-12);
            assert!(
                back.approx_eq(pose2d, 1e-12, 1e-9),
                "heading {} came back as {}",
                pose2d.theta,
                back.theta
            );
        }
    }

    #[test]
    fn test_unnormalized_yaw_is_normalized() {
        let pose = Pose::planar(0.0, 0.0, 2.0 * PI + 0.5);
        let pose2d = Pose2D::from(pose);
        assert_relative_eq!(pose2d.theta, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_roll_and_pitch_are_dropped() {
        let pose = Pose {
            position: Point3::new(2.0, 3.0, 1.0),
            orientation: UnitQuaternion::from_euler_angles(0.1, -0.2, 0.7),
        };
        let pose2d = Pose2D::from(&pose);
        assert_relative_eq!(pose2d.x, 2.0);
        assert_relative_eq!(pose2d.y, 3.0);
        assert_relative_eq!(pose2d.theta, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_pose_stamped_from_pose2d() {
        let stamped = PoseStamped::from_pose2d("map", Pose2D::new(1.0, 2.0, -1.0));
        assert_eq!(stamped.frame_id(), "map");
        assert!(stamped.to_pose2d().approx_eq(Pose2D::new(1.0, 2.0, -1.0), 1e-12, 1e-9));
    }
}
