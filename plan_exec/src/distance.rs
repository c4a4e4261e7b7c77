//! # Distance Metrics
//!
//! Distance metrics defined over discrete planning states. A metric borrows the state space it
//! operates in, since the geometric meaning of a [`GridPose`] depends on the space's
//! quantisation configuration.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::state_space::{GridPose, StateSpace};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A distance metric between two discrete planning states.
pub trait Distance {
    /// Get the distance between the two states.
    fn distance(&self, state_0: &GridPose, state_1: &GridPose) -> f64;
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Translation distance metric.
///
/// The distance between two states is the euclidean distance between their cell centre
/// positions in meters. Heading is ignored.
pub struct Translation<'a> {
    state_space: &'a StateSpace,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<'a> Translation<'a> {
    /// Create a new translation metric over the given state space.
    pub fn new(state_space: &'a StateSpace) -> Self {
        Self { state_space }
    }
}

impl<'a> Distance for Translation<'a> {
    fn distance(&self, state_0: &GridPose, state_1: &GridPose) -> f64 {
        let pose_0 = self.state_space.grid_to_pose(state_0);
        let pose_1 = self.state_space.grid_to_pose(state_1);

        (pose_0.translation.vector - pose_1.translation.vector).norm()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
