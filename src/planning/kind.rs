//! Planner strategy selection.
//!
//! ```rust
//! use marga::planning::PlannerKind;
//!
//! let kind: PlannerKind = "RRTConnect".parse().unwrap();
//! assert_eq!(kind, PlannerKind::RrtConnect);
//! assert!("rrtconnect".parse::<PlannerKind>().is_err());
//! assert_eq!(PlannerKind::default(), PlannerKind::Lbkpiece);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

use super::expansive::Expansive;
use super::planner::Planner;
use super::rrt::{LazyRrt, Rrt};
use super::rrt_connect::RrtConnect;

/// Worker threads used by the parallel planners.
pub const PARALLEL_THREADS: usize = 2;

/// The supported sampling-based planners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlannerKind {
    /// Expansive Space Trees
    Est,
    /// Kinodynamic Planning by Interior-Exterior Cell Exploration
    Kpiece,
    /// Lazy Bidirectional KPIECE
    #[default]
    Lbkpiece,
    /// Lazy Rapidly-exploring Random Trees
    LazyRrt,
    /// Parallel RRT
    PRrt,
    /// Rapidly-exploring Random Trees
    Rrt,
    /// Bidirectional RRT with greedy connection
    RrtConnect,
    /// Parallel SBL
    PSbl,
    /// Single-query Bidirectional Lazy collision checking
    Sbl,
}

impl PlannerKind {
    /// Every supported kind.
    pub const ALL: [PlannerKind; 9] = [
        PlannerKind::Est,
        PlannerKind::Kpiece,
        PlannerKind::Lbkpiece,
        PlannerKind::LazyRrt,
        PlannerKind::PRrt,
        PlannerKind::Rrt,
        PlannerKind::RrtConnect,
        PlannerKind::PSbl,
        PlannerKind::Sbl,
    ];

    /// Configuration spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            PlannerKind::Est => "EST",
            PlannerKind::Kpiece => "KPIECE",
            PlannerKind::Lbkpiece => "LBKPIECE",
            PlannerKind::LazyRrt => "LazyRRT",
            PlannerKind::PRrt => "pRRT",
            PlannerKind::Rrt => "RRT",
            PlannerKind::RrtConnect => "RRTConnect",
            PlannerKind::PSbl => "pSBL",
            PlannerKind::Sbl => "SBL",
        }
    }

    /// Whether the planner runs several worker threads.
    pub fn is_parallel(self) -> bool {
        matches!(self, PlannerKind::PRrt | PlannerKind::PSbl)
    }

    /// Create a planner of this kind seeded with `seed`.
    pub fn instantiate(self, seed: u64) -> Box<dyn Planner> {
        match self {
            PlannerKind::Est => Box::new(Expansive::est(seed)),
            PlannerKind::Kpiece => Box::new(Expansive::kpiece(seed)),
            PlannerKind::Lbkpiece => Box::new(Expansive::lbkpiece(seed)),
            PlannerKind::LazyRrt => Box::new(LazyRrt::new(seed)),
            PlannerKind::PRrt => Box::new(Rrt::parallel(seed, PARALLEL_THREADS)),
            PlannerKind::Rrt => Box::new(Rrt::new(seed)),
            PlannerKind::RrtConnect => Box::new(RrtConnect::new(seed)),
            PlannerKind::PSbl => Box::new(Expansive::psbl(seed, PARALLEL_THREADS)),
            PlannerKind::Sbl => Box::new(Expansive::sbl(seed)),
        }
    }
}

impl FromStr for PlannerKind {
    type Err = ConfigError;

    /// Exact, case-sensitive match on the configuration spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlannerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnsupportedPlanner(s.to_string()))
    }
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_spelling() {
        for kind in PlannerKind::ALL {
            assert_eq!(kind.name().parse::<PlannerKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_parse_is_exact() {
        for bad in ["Bogus", "rrt", "RRT ", "", "LBKPiece", "prrt"] {
            match bad.parse::<PlannerKind>() {
                Err(ConfigError::UnsupportedPlanner(name)) => assert_eq!(name, bad),
                other => panic!("'{}' parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_instantiate_reports_kind() {
        for kind in PlannerKind::ALL {
            assert_eq!(kind.instantiate(0).kind(), kind);
        }
    }

    #[test]
    fn test_parallel_kinds() {
        let parallel: Vec<_> = PlannerKind::ALL.into_iter().filter(|k| k.is_parallel()).collect();
        assert_eq!(parallel, vec![PlannerKind::PRrt, PlannerKind::PSbl]);
    }
}
