//! Path densification.
//!
//! Inserts linearly interpolated frames so that no two consecutive frames
//! are further apart (in the plane) than a maximum spacing. Original frames
//! are emitted unchanged; only inserted frames are computed.
//!
//! ```rust
//! use marga::core::Pose2D;
//! use marga::densify::densify;
//!
//! let path = [Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(10.0, 0.0, 0.0)];
//! let dense = densify(&path, 3.0).unwrap();
//!
//! let xs: Vec<f64> = dense.iter().map(|p| p.x).collect();
//! assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
//! ```

use crate::core::Pose2D;
use crate::core::math::{angle_diff, normalize_angle};
use crate::error::DensifyError;

/// Densify `path` so consecutive frames are at most `max_spacing` apart.
///
/// For each consecutive pair at planar distance `d > max_spacing`,
/// `n = ceil(d / max_spacing)` frames are inserted, splitting the pair into
/// `n + 1` equal steps in x, y and the shortest-arc heading change. Heading
/// is ignored when measuring `d`. An infinite spacing returns the path as is.
pub fn densify(path: &[Pose2D], max_spacing: f64) -> Result<Vec<Pose2D>, DensifyError> {
    if path.len() < 2 {
        return Err(DensifyError::TooShort(path.len()));
    }
    if !(max_spacing > 0.0) {
        return Err(DensifyError::InvalidSpacing(max_spacing));
    }

    let mut dense = Vec::with_capacity(path.len());
    dense.push(path[0]);

    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);

        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let dtheta = angle_diff(from.theta, to.theta);
        let distance = dx.hypot(dy);

        if distance > max_spacing {
            let inserted = (distance / max_spacing).ceil() as usize;
            let steps = (inserted + 1) as f64;

            for k in 1..=inserted {
                let t = k as f64 / steps;
                dense.push(Pose2D {
                    x: from.x + dx * t,
                    y: from.y + dy * t,
                    theta: normalize_angle(from.theta + dtheta * t),
                });
            }
        }

        dense.push(to);
    }

    Ok(dense)
}
