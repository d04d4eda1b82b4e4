//! Grid cost map with obstacle inflation and footprint cost queries.
//!
//! Cells hold `u8` costs on the usual navigation scale (see [`costs`]).
//! Maps can be built programmatically or loaded from a small ASCII format:
//!
//! ```text
//! ##########
//! #........#
//! #...##...#
//! #........#
//! ##########
//! ```
//!
//! - `.` or space: free
//! - `#`: lethal obstacle
//! - `?`: no information
//! - `0`-`9`: graded cost (`digit * 25`)
//!
//! The first text line is the top row (largest y).

use std::collections::VecDeque;
use std::f64::consts::SQRT_2;
use std::path::Path;

use crate::core::{Point2D, Pose2D};
use crate::error::MapError;

use super::FootprintCostModel;
use super::footprint::Footprint;

/// Cost values for grid cells
pub mod costs {
    /// Safe to traverse, no penalty
    pub const FREE: u8 = 0;
    /// Robot center here puts the footprint in collision
    pub const INSCRIBED: u8 = 253;
    /// Obstacle cell
    pub const LETHAL: u8 = 254;
    /// Never observed
    pub const NO_INFORMATION: u8 = 255;
}

/// Integer cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cost grid in world coordinates.
#[derive(Clone, Debug)]
pub struct GridCostmap {
    /// Grid dimensions
    width: usize,
    height: usize,
    /// Resolution in meters per cell
    resolution: f64,
    /// World position of the lower-left corner of cell (0, 0)
    origin: Point2D,
    /// Row-major cost values, row 0 at the bottom
    costs: Vec<u8>,
}

impl GridCostmap {
    /// Create a map with every cell set to [`costs::FREE`].
    pub fn new(width: usize, height: usize, resolution: f64, origin: Point2D) -> Self {
        Self::filled(width, height, resolution, origin, costs::FREE)
    }

    /// Create a map with every cell set to `cost`.
    pub fn filled(width: usize, height: usize, resolution: f64, origin: Point2D, cost: u8) -> Self {
        Self {
            width,
            height,
            resolution,
            origin,
            costs: vec![cost; width * height],
        }
    }

    /// Parse an ASCII map.
    pub fn from_ascii(text: &str, resolution: f64, origin: Point2D) -> Result<Self, MapError> {
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(MapError::InvalidResolution(resolution));
        }

        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }
        let height = rows.len();

        let mut map = Self::new(width, height, resolution, origin);

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            // Text rows run top to bottom
            let y = height - 1 - row;
            for (column, symbol) in line.chars().enumerate() {
                let cost = match symbol {
                    '.' | ' ' => costs::FREE,
                    '#' => costs::LETHAL,
                    '?' => costs::NO_INFORMATION,
                    '0'..='9' => (symbol as u8 - b'0') * 25,
                    _ => {
                        return Err(MapError::InvalidCell {
                            symbol,
                            row,
                            column,
                        });
                    }
                };
                map.costs[y * width + column] = cost;
            }
        }

        Ok(map)
    }

    /// Load an ASCII map from a file.
    pub fn load_ascii<P: AsRef<Path>>(
        path: P,
        resolution: f64,
        origin: Point2D,
    ) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ascii(&text, resolution, origin)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resolution in meters per cell.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// World position of the map's lower-left corner.
    #[inline]
    pub fn origin(&self) -> Point2D {
        self.origin
    }

    /// Metric size of the map (width, height).
    #[inline]
    pub fn size_in_meters(&self) -> (f64, f64) {
        (
            self.width as f64 * self.resolution,
            self.height as f64 * self.resolution,
        )
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Cost at a grid coordinate; off-map cells read as [`costs::NO_INFORMATION`].
    #[inline]
    pub fn cost(&self, coord: GridCoord) -> u8 {
        self.index(coord)
            .map_or(costs::NO_INFORMATION, |idx| self.costs[idx])
    }

    /// Set the cost of a cell. Off-map coordinates are ignored.
    #[inline]
    pub fn set_cost(&mut self, coord: GridCoord, cost: u8) {
        if let Some(idx) = self.index(coord) {
            self.costs[idx] = cost;
        }
    }

    /// Set every cell whose center lies in the world rectangle `[min, max]`.
    pub fn fill_rect(&mut self, min: Point2D, max: Point2D, cost: u8) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let center = self.map_to_world(GridCoord::new(x, y));
                if center.x >= min.x
                    && center.x <= max.x
                    && center.y >= min.y
                    && center.y <= max.y
                {
                    self.set_cost(GridCoord::new(x, y), cost);
                }
            }
        }
    }

    /// Convert world coordinates to the containing cell, `None` if off the map.
    #[inline]
    pub fn world_to_map(&self, point: Point2D) -> Option<GridCoord> {
        let fx = (point.x - self.origin.x) / self.resolution;
        let fy = (point.y - self.origin.y) / self.resolution;
        if !(fx >= 0.0 && fy >= 0.0) {
            return None;
        }
        let coord = GridCoord::new(fx.floor() as i32, fy.floor() as i32);
        self.index(coord).map(|_| coord)
    }

    /// Convert a cell to the world position of its center.
    #[inline]
    pub fn map_to_world(&self, coord: GridCoord) -> Point2D {
        Point2D::new(
            self.origin.x + (coord.x as f64 + 0.5) * self.resolution,
            self.origin.y + (coord.y as f64 + 0.5) * self.resolution,
        )
    }

    /// Inflate lethal cells by the robot radius and a decaying cost band.
    ///
    /// Cells within `inscribed_radius` of an obstacle become
    /// [`costs::INSCRIBED`]; cells out to `inflation_radius` get
    /// `(INSCRIBED - 1) * exp(-cost_scaling * (d - inscribed_radius))`.
    /// Inflation only raises costs and never overwrites unknown cells.
    pub fn inflate(&mut self, inscribed_radius: f64, inflation_radius: f64, cost_scaling: f64) {
        let distance_field = self.obstacle_distance_field();

        for (idx, &cells) in distance_field.iter().enumerate() {
            let current = self.costs[idx];
            if current == costs::LETHAL || current == costs::NO_INFORMATION {
                continue;
            }

            let distance = cells * self.resolution;
            let inflated = if distance <= inscribed_radius {
                costs::INSCRIBED
            } else if distance <= inflation_radius {
                let factor = (-cost_scaling * (distance - inscribed_radius)).exp();
                ((costs::INSCRIBED - 1) as f64 * factor) as u8
            } else {
                continue;
            };

            self.costs[idx] = current.max(inflated);
        }
    }

    /// Distance (in cells) from every cell to the nearest lethal cell.
    ///
    /// Brushfire expansion over 8-connected neighbors.
    fn obstacle_distance_field(&self) -> Vec<f64> {
        let mut distance_field = vec![f64::MAX; self.costs.len()];
        let mut queue = VecDeque::with_capacity(self.costs.len() / 10);

        for (idx, &cost) in self.costs.iter().enumerate() {
            if cost == costs::LETHAL {
                distance_field[idx] = 0.0;
                queue.push_back(((idx % self.width) as i32, (idx / self.width) as i32));
            }
        }

        let neighbors = [
            (-1, 0, 1.0),
            (1, 0, 1.0),
            (0, -1, 1.0),
            (0, 1, 1.0),
            (-1, -1, SQRT_2),
            (1, -1, SQRT_2),
            (-1, 1, SQRT_2),
            (1, 1, SQRT_2),
        ];

        while let Some((x, y)) = queue.pop_front() {
            let current_dist = distance_field[(y as usize) * self.width + (x as usize)];

            for &(dx, dy, step) in &neighbors {
                let Some(neighbor_idx) = self.index(GridCoord::new(x + dx, y + dy)) else {
                    continue;
                };

                let new_dist = current_dist + step;
                if new_dist < distance_field[neighbor_idx] {
                    distance_field[neighbor_idx] = new_dist;
                    queue.push_back((x + dx, y + dy));
                }
            }
        }

        distance_field
    }

    /// Cost of a single cell as a footprint query sees it: -1 for lethal or
    /// unknown cells.
    #[inline]
    fn point_cost(&self, coord: GridCoord) -> f64 {
        match self.cost(coord) {
            costs::LETHAL | costs::NO_INFORMATION => -1.0,
            cost => cost as f64,
        }
    }

    /// Maximum cost along a rasterized line, -1 as soon as a cell is lethal
    /// or unknown.
    ///
    /// Uses Bresenham's line algorithm to visit every cell on the line.
    pub fn line_cost(&self, from: GridCoord, to: GridCoord) -> f64 {
        let mut x0 = from.x;
        let mut y0 = from.y;
        let x1 = to.x;
        let y1 = to.y;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut line_cost: f64 = 0.0;

        loop {
            let point_cost = self.point_cost(GridCoord::new(x0, y0));
            if point_cost < 0.0 {
                return -1.0;
            }
            line_cost = line_cost.max(point_cost);

            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }

        line_cost
    }
}

impl FootprintCostModel for GridCostmap {
    /// Cost of placing `footprint` at `pose`.
    ///
    /// Polygons are checked along their outline. Returns -1 when the
    /// center or any outline cell is off the map, lethal or unknown.
    /// Footprints with fewer than three vertices are treated as a point
    /// robot, for which inscribed cells also count as collisions.
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64 {
        let Some(center) = self.world_to_map(pose.position()) else {
            return -1.0;
        };

        if !footprint.is_polygon() {
            return match self.cost(center) {
                costs::LETHAL | costs::INSCRIBED | costs::NO_INFORMATION => -1.0,
                cost => cost as f64,
            };
        }

        let oriented = footprint.oriented(pose);
        let mut footprint_cost: f64 = 0.0;

        for (i, &start) in oriented.iter().enumerate() {
            let end = oriented[(i + 1) % oriented.len()];
            let (Some(from), Some(to)) = (self.world_to_map(start), self.world_to_map(end)) else {
                return -1.0;
            };

            let line_cost = self.line_cost(from, to);
            if line_cost < 0.0 {
                return -1.0;
            }
            footprint_cost = footprint_cost.max(line_cost);
        }

        footprint_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_map() -> GridCostmap {
        let mut map = GridCostmap::new(20, 20, 0.05, Point2D::ZERO);

        // Horizontal wall across the middle
        for x in 5..15 {
            map.set_cost(GridCoord::new(x, 10), costs::LETHAL);
        }

        map
    }

    #[test]
    fn test_world_map_transforms() {
        let map = GridCostmap::new(10, 8, 0.5, Point2D::new(-1.0, 2.0));
        assert_eq!(map.size_in_meters(), (5.0, 4.0));

        assert_eq!(map.world_to_map(Point2D::new(-1.0, 2.0)), Some(GridCoord::new(0, 0)));
        assert_eq!(map.world_to_map(Point2D::new(0.3, 3.2)), Some(GridCoord::new(2, 2)));
        assert_eq!(map.world_to_map(Point2D::new(-1.01, 2.0)), None);
        assert_eq!(map.world_to_map(Point2D::new(4.0, 2.0)), None);

        let center = map.map_to_world(GridCoord::new(2, 2));
        assert_eq!(center, Point2D::new(0.25, 3.25));
    }

    #[test]
    fn test_from_ascii() {
        let text = "\
#####
#..?#
#.5.#
#####
";
        let map = GridCostmap::from_ascii(text, 0.1, Point2D::ZERO).unwrap();
        assert_eq!(map.width(), 5);
        assert_eq!(map.height(), 4);

        // Bottom text row is y = 0
        assert_eq!(map.cost(GridCoord::new(1, 0)), costs::LETHAL);
        assert_eq!(map.cost(GridCoord::new(2, 1)), 125);
        assert_eq!(map.cost(GridCoord::new(3, 2)), costs::NO_INFORMATION);
        assert_eq!(map.cost(GridCoord::new(1, 2)), costs::FREE);
    }

    #[test]
    fn test_from_ascii_errors() {
        assert!(matches!(
            GridCostmap::from_ascii("\n\n", 0.1, Point2D::ZERO),
            Err(MapError::Empty)
        ));
        assert!(matches!(
            GridCostmap::from_ascii("###\n##\n", 0.1, Point2D::ZERO),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            GridCostmap::from_ascii("#x#\n", 0.1, Point2D::ZERO),
            Err(MapError::InvalidCell {
                symbol: 'x',
                row: 0,
                column: 1
            })
        ));
        assert!(matches!(
            GridCostmap::from_ascii("...\n", 0.0, Point2D::ZERO),
            Err(MapError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_inflation() {
        let mut map = create_test_map();
        map.inflate(0.10, 0.30, 5.0);

        // Obstacles stay lethal
        assert_eq!(map.cost(GridCoord::new(10, 10)), costs::LETHAL);

        // Within the inscribed radius (2 cells)
        assert_eq!(map.cost(GridCoord::new(10, 9)), costs::INSCRIBED);
        assert_eq!(map.cost(GridCoord::new(10, 12)), costs::INSCRIBED);

        // Decaying band
        let near = map.cost(GridCoord::new(10, 7));
        let farther = map.cost(GridCoord::new(10, 5));
        assert!(near > farther, "{} should exceed {}", near, farther);
        assert!(near < costs::INSCRIBED);

        // Beyond the inflation radius
        assert_eq!(map.cost(GridCoord::new(10, 0)), costs::FREE);
    }

    #[test]
    fn test_inflation_keeps_unknown() {
        let mut map = create_test_map();
        map.set_cost(GridCoord::new(10, 11), costs::NO_INFORMATION);
        map.inflate(0.10, 0.30, 5.0);
        assert_eq!(map.cost(GridCoord::new(10, 11)), costs::NO_INFORMATION);
    }

    #[test]
    fn test_line_cost() {
        let map = create_test_map();

        // Line that doesn't cross the wall
        assert_eq!(map.line_cost(GridCoord::new(0, 0), GridCoord::new(5, 5)), 0.0);

        // Line that crosses the wall
        assert_eq!(map.line_cost(GridCoord::new(10, 5), GridCoord::new(10, 15)), -1.0);
    }

    #[test]
    fn test_footprint_cost() {
        let mut map = GridCostmap::new(40, 40, 0.05, Point2D::ZERO);
        map.fill_rect(Point2D::new(1.0, 0.0), Point2D::new(1.1, 2.0), costs::LETHAL);
        let footprint = Footprint::rectangle(0.3, 0.3);

        // Clear of everything
        assert_eq!(map.footprint_cost(&Pose2D::new(0.5, 1.0, 0.0), &footprint), 0.0);

        // Outline crosses the wall
        assert_eq!(map.footprint_cost(&Pose2D::new(0.9, 1.0, 0.0), &footprint), -1.0);

        // Center off the map
        assert_eq!(map.footprint_cost(&Pose2D::new(-0.5, 1.0, 0.0), &footprint), -1.0);

        // Outline partly off the map
        assert_eq!(map.footprint_cost(&Pose2D::new(0.05, 1.0, 0.0), &footprint), -1.0);
    }

    #[test]
    fn test_footprint_cost_reports_max_outline_cost() {
        let mut map = GridCostmap::new(40, 40, 0.05, Point2D::ZERO);
        map.fill_rect(Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0), 40);
        // Single column of cells spanning x in [1.10, 1.15)
        map.fill_rect(Point2D::new(1.1, 0.0), Point2D::new(1.15, 2.0), 120);
        let footprint = Footprint::rectangle(0.3, 0.3);

        assert_eq!(map.footprint_cost(&Pose2D::new(0.975, 1.0, 0.0), &footprint), 120.0);
        assert_eq!(map.footprint_cost(&Pose2D::new(0.5, 1.0, 0.0), &footprint), 40.0);
    }

    #[test]
    fn test_point_footprint() {
        let mut map = create_test_map();
        map.inflate(0.10, 0.30, 5.0);
        let point = Footprint::from_polygon(Vec::new());

        let free = map.map_to_world(GridCoord::new(10, 0));
        assert_eq!(map.footprint_cost(&Pose2D::new(free.x, free.y, 0.0), &point), 0.0);

        let inscribed = map.map_to_world(GridCoord::new(10, 9));
        assert_eq!(
            map.footprint_cost(&Pose2D::new(inscribed.x, inscribed.y, 0.0), &point),
            -1.0
        );
    }
}
