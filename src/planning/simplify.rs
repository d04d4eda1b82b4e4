//! Path simplification.
//!
//! Shortens raw planner output without leaving the valid region:
//! - Line-of-sight shortcutting
//! - Random vertex reduction
//! - Close-vertex collapsing
//!
//! Every change replaces a run of vertices with a single motion, and only
//! after [`SpaceInformation::check_motion`] accepts it. Endpoints never move.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Pose2D;

use super::planner::Termination;
use super::space_information::SpaceInformation;

/// Path simplifier configuration
#[derive(Clone, Debug)]
pub struct SimplifierConfig {
    /// Consecutive failed random reductions before giving up
    pub max_failed_reductions: usize,
    /// Vertices closer than this many longest-valid-segments are collapsed
    pub snap_segments: f64,
    /// Maximum simplification rounds
    pub max_rounds: usize,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            max_failed_reductions: 20,
            snap_segments: 2.0,
            max_rounds: 10,
        }
    }
}

/// Path simplifier
pub struct PathSimplifier<'s, 'a> {
    si: &'s SpaceInformation<'a>,
    config: SimplifierConfig,
    rng: StdRng,
}

impl<'s, 'a> PathSimplifier<'s, 'a> {
    /// Create a new path simplifier
    pub fn new(si: &'s SpaceInformation<'a>, config: SimplifierConfig, seed: u64) -> Self {
        Self {
            si,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with default configuration
    pub fn with_defaults(si: &'s SpaceInformation<'a>, seed: u64) -> Self {
        Self::new(si, SimplifierConfig::default(), seed)
    }

    /// Replace runs of waypoints by the furthest directly reachable one.
    pub fn shortcut(&self, path: &[Pose2D]) -> Vec<Pose2D> {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let mut shortened = vec![path[0]];
        let mut i = 0;

        while i < path.len() - 1 {
            // Find the furthest reachable point from current
            let mut furthest = i + 1;

            for j in (i + 2)..path.len() {
                if self.si.check_motion(&path[i], &path[j]) {
                    furthest = j;
                }
            }

            shortened.push(path[furthest]);
            i = furthest;
        }

        shortened
    }

    /// Try connecting random non-adjacent vertex pairs directly.
    pub fn reduce_vertices(&mut self, path: &[Pose2D]) -> Vec<Pose2D> {
        let mut path = path.to_vec();
        let mut failures = 0;

        while path.len() > 2 && failures < self.config.max_failed_reductions {
            let i = self.rng.random_range(0..path.len() - 2);
            let j = self.rng.random_range(i + 2..path.len());

            if self.si.check_motion(&path[i], &path[j]) {
                path.drain(i + 1..j);
                failures = 0;
            } else {
                failures += 1;
            }
        }

        path
    }

    /// Drop vertices between pairs that lie within the snap distance.
    pub fn collapse_close_vertices(&self, path: &[Pose2D]) -> Vec<Pose2D> {
        let mut path = path.to_vec();
        let snap = self.config.snap_segments * self.si.longest_valid_segment();

        let mut i = 0;
        while i + 2 < path.len() {
            let collapse_to = ((i + 2)..path.len())
                .rev()
                .find(|&j| {
                    self.si.distance(&path[i], &path[j]) < snap
                        && self.si.check_motion(&path[i], &path[j])
                });

            if let Some(j) = collapse_to {
                path.drain(i + 1..j);
            }
            i += 1;
        }

        path
    }

    /// Run all strategies until nothing changes, the round limit is hit, or
    /// `termination` is reached.
    pub fn simplify(&mut self, path: &[Pose2D], termination: &Termination) -> Vec<Pose2D> {
        let mut current = path.to_vec();

        for _ in 0..self.config.max_rounds {
            if current.len() <= 2 || termination.is_reached() {
                break;
            }

            let before = current.len();
            current = self.reduce_vertices(&current);
            current = self.collapse_close_vertices(&current);
            current = self.shortcut(&current);

            if current.len() == before {
                break;
            }
        }

        current
    }
}
