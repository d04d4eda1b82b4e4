//! State validity oracle backed by an environment footprint cost query.
//!
//! The oracle is shared by every planner thread for one request. It holds
//! a borrowed cost model plus an immutable snapshot of the robot footprint,
//! so concurrent queries never mutate shared state.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::error;

use crate::core::Pose2D;
use crate::environment::{Footprint, FootprintCostModel};

/// Result of classifying a single pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidityVerdict {
    /// The footprint fits at this pose.
    Free,
    /// The footprint collides, leaves the map, or is too costly.
    Occupied,
    /// The pose cannot be evaluated.
    Unknown,
}

impl ValidityVerdict {
    #[inline]
    pub fn is_free(self) -> bool {
        self == ValidityVerdict::Free
    }
}

/// Validity predicate used by the planners.
pub trait StateValidityChecker: Send + Sync {
    fn is_valid(&self, pose: &Pose2D) -> bool;
}

/// Classifies poses by querying the footprint cost of the environment model.
pub struct ValidityOracle<'a, C: FootprintCostModel + ?Sized> {
    model: &'a C,
    footprint: Footprint,
    max_footprint_cost: u32,
    reported_degenerate: AtomicBool,
}

impl<'a, C: FootprintCostModel + ?Sized> ValidityOracle<'a, C> {
    /// Create an oracle over `model`.
    ///
    /// Poses whose footprint cost reaches `max_footprint_cost` are occupied.
    pub fn new(model: &'a C, footprint: Footprint, max_footprint_cost: u32) -> Self {
        Self {
            model,
            footprint,
            max_footprint_cost,
            reported_degenerate: AtomicBool::new(false),
        }
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Classify a pose.
    ///
    /// A footprint with fewer than three vertices makes every pose
    /// [`ValidityVerdict::Unknown`] without querying the model.
    pub fn classify(&self, pose: &Pose2D) -> ValidityVerdict {
        if !self.footprint.is_polygon() {
            if !self.reported_degenerate.swap(true, Ordering::Relaxed) {
                error!(
                    "[ValidityOracle] Footprint has {} vertices, need at least 3 for a cost query",
                    self.footprint.vertices().len()
                );
            }
            return ValidityVerdict::Unknown;
        }

        let cost = self.model.footprint_cost(pose, &self.footprint);
        if cost.is_nan() || cost < 0.0 || cost >= f64::from(self.max_footprint_cost) {
            ValidityVerdict::Occupied
        } else {
            ValidityVerdict::Free
        }
    }
}

impl<C: FootprintCostModel + ?Sized> StateValidityChecker for ValidityOracle<'_, C> {
    #[inline]
    fn is_valid(&self, pose: &Pose2D) -> bool {
        self.classify(pose).is_free()
    }
}
