//! # State Space Parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the discretised pose state space
#[derive(Debug, Clone, Deserialize)]
pub struct StateSpaceParams {
    /// The linear size of one grid cell in meters.
    pub cell_size_m: f64,

    /// The number of discrete heading bins. Must be even and greater than
    /// zero.
    pub num_heading_bins: usize,
}
