//! # Planning library.
//!
//! This library provides the discretised pose state space consumed by the motion planner, plus
//! distance metrics defined over its states.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// State space module - discretises continuous poses into grid states for the planner
pub mod state_space;

/// Distance metrics defined over discrete states
pub mod distance;
