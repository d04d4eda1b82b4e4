//! Coarse grid over tree positions used to pick expansion nodes.
//!
//! The expansive planners bias growth toward regions the tree has not
//! covered yet by choosing a cell first and a node inside it second.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::core::Pose2D;

/// How a cell is chosen for expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellSelection {
    /// Random cell weighted by the inverse of its node count.
    Density,
    /// Cell with the highest importance, mostly; favors cells that are
    /// sparse and rarely selected.
    Importance,
}

#[derive(Clone, Debug, Default)]
struct Cell {
    nodes: Vec<usize>,
    selections: u32,
}

impl Cell {
    #[inline]
    fn importance(&self) -> f64 {
        1.0 / ((1.0 + self.selections as f64) * self.nodes.len() as f64)
    }
}

/// Grid of (x, y) cells holding node ids.
#[derive(Clone, Debug)]
pub struct Discretization {
    cell_size: f64,
    cells: HashMap<(i64, i64), Cell>,
}

impl Discretization {
    /// Probability of picking the most important cell rather than a random one.
    const EXPLOIT_PROBABILITY: f64 = 0.9;

    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(f64::EPSILON),
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn key(&self, pose: &Pose2D) -> (i64, i64) {
        (
            (pose.x / self.cell_size).floor() as i64,
            (pose.y / self.cell_size).floor() as i64,
        )
    }

    pub fn add(&mut self, id: usize, pose: &Pose2D) {
        let key = self.key(pose);
        self.cells.entry(key).or_default().nodes.push(id);
    }

    pub fn remove(&mut self, id: usize, pose: &Pose2D) {
        let key = self.key(pose);
        if let Some(cell) = self.cells.get_mut(&key) {
            cell.nodes.retain(|&n| n != id);
            if cell.nodes.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Node ids sharing a cell with `pose` or one of its eight neighbors.
    pub fn neighborhood(&self, pose: &Pose2D) -> Vec<usize> {
        let (cx, cy) = self.key(pose);
        let mut ids = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                    ids.extend_from_slice(&cell.nodes);
                }
            }
        }
        ids
    }

    /// Pick a node to expand.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        selection: CellSelection,
    ) -> Option<usize> {
        let key = match selection {
            CellSelection::Density => self.select_by_density(rng)?,
            CellSelection::Importance => self.select_by_importance(rng)?,
        };

        let cell = self.cells.get_mut(&key)?;
        cell.selections += 1;
        cell.nodes.choose(rng).copied()
    }

    fn select_by_density<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(i64, i64)> {
        let total: f64 = self.cells.values().map(|c| 1.0 / c.nodes.len() as f64).sum();
        if total <= 0.0 {
            return None;
        }

        let mut pick = rng.random_range(0.0..total);
        for (key, cell) in &self.cells {
            let weight = 1.0 / cell.nodes.len() as f64;
            if pick < weight {
                return Some(*key);
            }
            pick -= weight;
        }
        self.cells.keys().next().copied()
    }

    fn select_by_importance<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(i64, i64)> {
        if rng.random_bool(Self::EXPLOIT_PROBABILITY) {
            self.cells
                .iter()
                .max_by(|a, b| a.1.importance().total_cmp(&b.1.importance()))
                .map(|(key, _)| *key)
        } else {
            let keys: Vec<_> = self.cells.keys().copied().collect();
            keys.choose(rng).copied()
        }
    }
}
