//! Robot footprint polygon for collision checking.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D};

/// Robot footprint: a polygon in the robot frame plus its derived radii.
///
/// The inscribed radius is the distance from the robot center to the
/// closest footprint edge; the circumscribed radius is the distance to the
/// farthest vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Footprint {
    vertices: Vec<Point2D>,
    inscribed_radius: f64,
    circumscribed_radius: f64,
}

impl Footprint {
    /// Number of vertices used by [`Footprint::circle`].
    pub const CIRCLE_SEGMENTS: usize = 16;

    /// Create a footprint from an ordered polygon in the robot frame.
    pub fn from_polygon(vertices: Vec<Point2D>) -> Self {
        let (inscribed_radius, circumscribed_radius) = min_and_max_distances(&vertices);
        Self {
            vertices,
            inscribed_radius,
            circumscribed_radius,
        }
    }

    /// Regular polygon approximating a circular robot of `radius`.
    pub fn circle(radius: f64) -> Self {
        let vertices = (0..Self::CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 * 2.0 * PI / Self::CIRCLE_SEGMENTS as f64;
                Point2D::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::from_polygon(vertices)
    }

    /// Axis-aligned rectangle centered on the robot.
    pub fn rectangle(length: f64, width: f64) -> Self {
        let hl = length / 2.0;
        let hw = width / 2.0;
        Self::from_polygon(vec![
            Point2D::new(hl, hw),
            Point2D::new(-hl, hw),
            Point2D::new(-hl, -hw),
            Point2D::new(hl, -hw),
        ])
    }

    /// Polygon vertices in the robot frame.
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Whether the footprint has enough vertices to form a polygon.
    pub fn is_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Distance from the center to the closest edge.
    pub fn inscribed_radius(&self) -> f64 {
        self.inscribed_radius
    }

    /// Distance from the center to the farthest vertex.
    pub fn circumscribed_radius(&self) -> f64 {
        self.circumscribed_radius
    }

    /// Footprint vertices placed at `pose` in world coordinates.
    pub fn oriented(&self, pose: &Pose2D) -> Vec<Point2D> {
        self.vertices
            .iter()
            .map(|&v| pose.transform_point(v))
            .collect()
    }
}

impl From<Vec<[f64; 2]>> for Footprint {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::from_polygon(points.into_iter().map(|[x, y]| Point2D::new(x, y)).collect())
    }
}

impl From<Footprint> for Vec<[f64; 2]> {
    fn from(footprint: Footprint) -> Self {
        footprint.vertices.iter().map(|p| [p.x, p.y]).collect()
    }
}

/// Minimum edge distance and maximum vertex distance from the origin.
fn min_and_max_distances(vertices: &[Point2D]) -> (f64, f64) {
    if vertices.is_empty() {
        return (0.0, 0.0);
    }

    let max_dist = vertices.iter().map(Point2D::length).fold(0.0, f64::max);

    let n = vertices.len();
    let min_dist = (0..n)
        .map(|i| distance_to_segment(Point2D::ZERO, vertices[i], vertices[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min);

    (min_dist, max_dist)
}

fn distance_to_segment(point: Point2D, start: Point2D, end: Point2D) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-18 {
        return point.distance(&start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    point.distance(&Point2D::new(start.x + t * dx, start.y + t * dy))
}
