//! Adapter for environment models whose cost query is not reentrant.
//!
//! Parallel planners issue validity queries from several threads at once.
//! A model that caches or mutates internal state while answering a query
//! implements [`ExclusiveCostModel`] instead of [`FootprintCostModel`], and
//! [`SerializedModel`] serializes access to it with a mutex held only for
//! the duration of the raw query.

use parking_lot::Mutex;

use crate::core::Pose2D;

use super::FootprintCostModel;
use super::footprint::Footprint;

/// Footprint cost query that needs exclusive access to the model.
pub trait ExclusiveCostModel: Send {
    fn footprint_cost(&mut self, pose: &Pose2D, footprint: &Footprint) -> f64;
}

/// Mutex wrapper turning an [`ExclusiveCostModel`] into a shareable
/// [`FootprintCostModel`].
#[derive(Debug)]
pub struct SerializedModel<M> {
    inner: Mutex<M>,
}

impl<M: ExclusiveCostModel> SerializedModel<M> {
    pub fn new(model: M) -> Self {
        Self {
            inner: Mutex::new(model),
        }
    }

    /// Unwrap the model.
    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }
}

impl<M: ExclusiveCostModel> FootprintCostModel for SerializedModel<M> {
    fn footprint_cost(&self, pose: &Pose2D, footprint: &Footprint) -> f64 {
        self.inner.lock().footprint_cost(pose, footprint)
    }
}
