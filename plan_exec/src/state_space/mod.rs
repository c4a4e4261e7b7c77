//! # State Space
//!
//! This module discretises continuous SE(2) poses into a grid of states for the motion planner.
//! A continuous pose (2D position plus heading) quantises into a [`GridPose`], an integer triple
//! of cell indices and a heading bin. Grid poses are interned into a state table which assigns
//! each distinct pose a dense, stable state id, used by the planner's search and resolved back
//! into poses when reconstructing a path.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
pub use params::StateSpaceParams;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;
use std::f64::consts::TAU;

// External
use nalgebra::{Isometry2, Vector2};
use serde::{Deserialize, Serialize};

// Internal
use util::maths::norm_angle_2pi;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A pose on the discretised planning grid.
///
/// `x` and `y` are grid cell indices. The grid is unbounded in position so these may be any
/// integer, including negative ones. `heading_bin` indexes one of the state space's discrete
/// heading bins, and is only guaranteed to be in range for poses passing
/// [`StateSpace::is_valid_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPose {
    pub x: i32,
    pub y: i32,
    pub heading_bin: i32,
}

/// The discretised pose state space used by the planner.
///
/// Owns the quantisation configuration and the table of all states seen so far. State ids are
/// assigned in creation order starting from 0 and are never reused or reassigned, so id `i`
/// always resolves to the `i`-th interned pose.
pub struct StateSpace {
    /// The linear size of one grid cell in meters
    cell_size_m: f64,

    /// The number of discrete heading bins
    num_heading_bins: usize,

    /// All known states, indexed by state id.
    ///
    /// Kept in lock-step with `state_ids` by [`StateSpace::intern`], which is the only writer of
    /// either.
    states: Vec<GridPose>,

    /// Reverse lookup from pose to state id
    state_ids: HashMap<GridPose, usize>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StateSpaceError {
    #[error("Grid cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("Number of heading bins must be even and greater than zero, got {0}")]
    InvalidNumHeadingBins(usize),

    #[error("State id {0} is not in the state table ({1} states)")]
    UnknownStateId(usize, usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StateSpace {
    /// Create a new empty state space with the given parameters.
    pub fn new(params: &StateSpaceParams) -> Result<Self, StateSpaceError> {
        if !params.cell_size_m.is_finite() || params.cell_size_m <= 0.0 {
            return Err(StateSpaceError::InvalidCellSize(params.cell_size_m));
        }

        // The heading discretisation offsets by half a bin width, which only lands back on a bin
        // boundary for an even bin count.
        if params.num_heading_bins == 0 || params.num_heading_bins % 2 != 0 {
            return Err(StateSpaceError::InvalidNumHeadingBins(
                params.num_heading_bins,
            ));
        }

        Ok(Self {
            cell_size_m: params.cell_size_m,
            num_heading_bins: params.num_heading_bins,
            states: Vec::new(),
            state_ids: HashMap::new(),
        })
    }

    /// Intern the given pose, returning its state id.
    ///
    /// If the pose is already in the state table its existing id is returned, otherwise the pose
    /// is appended and the newly assigned id returned. The heading bin is not range checked
    /// here: an out-of-range pose can be interned, but will fail the validity check whenever it
    /// is read back.
    pub fn intern(&mut self, pose: GridPose) -> usize {
        match self.state_ids.get(&pose) {
            Some(&id) => id,
            None => {
                let id = self.states.len();
                self.states.push(pose);
                self.state_ids.insert(pose, id);
                id
            }
        }
    }

    /// Discretise the given continuous pose and intern it, returning its state id.
    pub fn intern_continuous(&mut self, pose: &Isometry2<f64>) -> usize {
        let grid_pose = self.pose_to_grid(pose);
        self.intern(grid_pose)
    }

    /// Look up the state id of the given pose without interning it.
    pub fn get_state_id(&self, pose: &GridPose) -> Option<usize> {
        self.state_ids.get(pose).copied()
    }

    /// Get the pose at the given state id, along with whether it passes the validity check.
    pub fn get_state(&self, state_id: usize) -> Result<(GridPose, bool), StateSpaceError> {
        match self.states.get(state_id) {
            Some(&pose) => Ok((pose, self.is_valid_state(&pose))),
            None => Err(StateSpaceError::UnknownStateId(
                state_id,
                self.states.len(),
            )),
        }
    }

    /// True if the pose's heading bin is in range.
    ///
    /// The cell indices are unconstrained since the grid is unbounded in position.
    pub fn is_valid_state(&self, pose: &GridPose) -> bool {
        pose.heading_bin >= 0 && pose.heading_bin < self.num_heading_bins as i32
    }

    /// Resolve a sequence of state ids, as produced by the planner's search, into grid poses.
    ///
    /// Poses failing the validity check are skipped, so the output may be shorter than the
    /// input. An id outside the state table is an error.
    pub fn reconstruct_path(
        &self,
        state_ids: &[usize],
    ) -> Result<Vec<GridPose>, StateSpaceError> {
        let mut poses = Vec::with_capacity(state_ids.len());

        for &state_id in state_ids {
            let (pose, valid) = self.get_state(state_id)?;
            if valid {
                poses.push(pose);
            }
        }

        Ok(poses)
    }

    /// Discretise a continuous pose into a grid pose.
    ///
    /// The position components are scaled by the cell size and truncated towards zero to get the
    /// enclosing cell, the heading is rounded to the nearest bin.
    pub fn pose_to_grid(&self, pose: &Isometry2<f64>) -> GridPose {
        let position = pose.translation.vector;

        GridPose {
            x: (position.x / self.cell_size_m) as i32,
            y: (position.y / self.cell_size_m) as i32,
            heading_bin: self.heading_to_bin(pose.rotation.angle()),
        }
    }

    /// Continuousise a grid pose, placing the position at the centre of its cell.
    ///
    /// The heading maps to the lower edge of its bin (bin 0 is exactly heading 0), not the bin
    /// centre. This asymmetry with [`StateSpace::pose_to_grid`] is relied upon by downstream
    /// consumers and must be kept.
    pub fn grid_to_pose(&self, pose: &GridPose) -> Isometry2<f64> {
        Isometry2::new(
            Vector2::new(
                (pose.x as f64) * self.cell_size_m + self.cell_size_m / 2.0,
                (pose.y as f64) * self.cell_size_m + self.cell_size_m / 2.0,
            ),
            self.bin_to_heading(pose.heading_bin),
        )
    }

    /// Get the number of states in the state table.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    // --------------------------------------------------------------------------------------------
    // PRIVATE FUNCTIONS
    // --------------------------------------------------------------------------------------------

    /// Round the given heading to the nearest heading bin.
    ///
    /// Adding half a bin width before normalising implements round-to-nearest via a floor, with
    /// a heading exactly on a bin boundary rounding up to the next bin. A heading within half a
    /// bin width below 2pi crosses 2pi when offset, normalises to just above zero and so wraps
    /// to bin 0, which is why no modulo is needed after the truncation.
    fn heading_to_bin(&self, heading_rad: f64) -> i32 {
        let bin_width_rad = TAU / (self.num_heading_bins as f64);
        (norm_angle_2pi(heading_rad + bin_width_rad / 2.0) / bin_width_rad) as i32
    }

    /// Get the heading of the lower edge of the given bin.
    fn bin_to_heading(&self, heading_bin: i32) -> f64 {
        (heading_bin as f64) * (TAU / (self.num_heading_bins as f64))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::f64::consts::FRAC_PI_8;

    use super::*;

    fn state_space(cell_size_m: f64, num_heading_bins: usize) -> StateSpace {
        StateSpace::new(&StateSpaceParams {
            cell_size_m,
            num_heading_bins,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            StateSpace::new(&StateSpaceParams {
                cell_size_m: 0.0,
                num_heading_bins: 8
            }),
            Err(StateSpaceError::InvalidCellSize(_))
        ));
        assert!(matches!(
            StateSpace::new(&StateSpaceParams {
                cell_size_m: -0.1,
                num_heading_bins: 8
            }),
            Err(StateSpaceError::InvalidCellSize(_))
        ));
        assert!(matches!(
            StateSpace::new(&StateSpaceParams {
                cell_size_m: f64::NAN,
                num_heading_bins: 8
            }),
            Err(StateSpaceError::InvalidCellSize(_))
        ));
        assert!(matches!(
            StateSpace::new(&StateSpaceParams {
                cell_size_m: 0.1,
                num_heading_bins: 0
            }),
            Err(StateSpaceError::InvalidNumHeadingBins(0))
        ));
        assert!(matches!(
            StateSpace::new(&StateSpaceParams {
                cell_size_m: 0.1,
                num_heading_bins: 7
            }),
            Err(StateSpaceError::InvalidNumHeadingBins(7))
        ));
        assert!(StateSpace::new(&StateSpaceParams {
            cell_size_m: 0.1,
            num_heading_bins: 8
        })
        .is_ok());
    }

    #[test]
    fn test_intern_dedup() {
        let mut ss = state_space(0.1, 8);
        let pose = GridPose {
            x: 3,
            y: -2,
            heading_bin: 5,
        };

        // First intern appends, second returns the same id without growing the table
        let id = ss.intern(pose);
        assert_eq!(id, 0);
        assert_eq!(ss.num_states(), 1);
        assert_eq!(ss.intern(pose), id);
        assert_eq!(ss.num_states(), 1);
    }

    #[test]
    fn test_id_density() {
        let mut ss = state_space(0.1, 8);

        let poses: Vec<GridPose> = (0..10)
            .map(|i| GridPose {
                x: i,
                y: -i,
                heading_bin: i % 8,
            })
            .collect();

        for (i, pose) in poses.iter().enumerate() {
            assert_eq!(ss.intern(*pose), i);
        }
        assert_eq!(ss.num_states(), poses.len());

        // Every id resolves to the pose inserted under it
        for (i, pose) in poses.iter().enumerate() {
            let (resolved, valid) = ss.get_state(i).unwrap();
            assert_eq!(resolved, *pose);
            assert!(valid);
        }
    }

    #[test]
    fn test_lookup() {
        let mut ss = state_space(0.1, 8);
        let pose = GridPose {
            x: 1,
            y: 1,
            heading_bin: 1,
        };
        let other = GridPose {
            x: 2,
            y: 2,
            heading_bin: 2,
        };

        let id = ss.intern(pose);

        assert_eq!(ss.get_state_id(&pose), Some(id));

        // Lookup of an unknown pose reports not-found and doesn't mutate the table
        assert_eq!(ss.get_state_id(&other), None);
        assert_eq!(ss.num_states(), 1);
    }

    #[test]
    fn test_unknown_state_id() {
        let ss = state_space(0.1, 8);
        assert!(matches!(
            ss.get_state(0),
            Err(StateSpaceError::UnknownStateId(0, 0))
        ));
    }

    #[test]
    fn test_heading_binning() {
        let ss = state_space(0.1, 8);

        // Zero heading is bin 0, as is a heading just below 2pi (which must wrap, not saturate)
        assert_eq!(ss.heading_to_bin(0.0), 0);
        assert_eq!(ss.heading_to_bin(TAU - 0.01), 0);

        // A heading exactly on a bin boundary (half a bin width) rounds up
        assert_eq!(ss.heading_to_bin(FRAC_PI_8), 1);

        // Negative headings, as produced by Isometry2's rotation angle, wrap into range
        assert_eq!(ss.heading_to_bin(-FRAC_PI_8 * 2.0), 7);

        // Discretising the continuousised heading of every bin is the identity
        for num_heading_bins in &[8usize, 16] {
            let ss = state_space(0.1, *num_heading_bins);
            for bin in 0..(*num_heading_bins as i32) {
                assert_eq!(ss.heading_to_bin(ss.bin_to_heading(bin)), bin);
            }
        }
    }

    #[test]
    fn test_quantisation() {
        let ss = state_space(0.1, 8);

        let pose = Isometry2::new(Vector2::new(0.25, 0.37), 0.0);
        let grid_pose = ss.pose_to_grid(&pose);

        // Positions truncate, not round
        assert_eq!(grid_pose.x, 2);
        assert_eq!(grid_pose.y, 3);
        assert_eq!(grid_pose.heading_bin, 0);

        // Truncation is towards zero for negative positions too
        let pose = Isometry2::new(Vector2::new(-0.25, -0.05), 0.0);
        let grid_pose = ss.pose_to_grid(&pose);
        assert_eq!(grid_pose.x, -2);
        assert_eq!(grid_pose.y, 0);
    }

    #[test]
    fn test_cell_centre() {
        let ss = state_space(0.1, 8);

        let pose = ss.grid_to_pose(&GridPose {
            x: 2,
            y: 3,
            heading_bin: 2,
        });

        assert!((pose.translation.vector.x - 0.25).abs() < 1e-9);
        assert!((pose.translation.vector.y - 0.35).abs() < 1e-9);

        // Bin 2 of 8 is the lower bin edge pi/2, not the bin centre
        assert!((pose.rotation.angle() - FRAC_PI_8 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_continuous_intern() {
        let mut ss = state_space(0.1, 8);

        // Two continuous poses in the same cell and heading bin intern to the same state
        let id_a = ss.intern_continuous(&Isometry2::new(Vector2::new(0.21, 0.34), 0.01));
        let id_b = ss.intern_continuous(&Isometry2::new(Vector2::new(0.29, 0.38), -0.02));
        assert_eq!(id_a, id_b);
        assert_eq!(ss.num_states(), 1);

        // A pose one cell over interns to a new state
        let id_c = ss.intern_continuous(&Isometry2::new(Vector2::new(0.31, 0.34), 0.0));
        assert_ne!(id_a, id_c);
        assert_eq!(ss.num_states(), 2);
    }

    #[test]
    fn test_validity() {
        let ss = state_space(0.1, 16);

        let valid = GridPose {
            x: 1,
            y: 1,
            heading_bin: 15,
        };
        let out_of_range = GridPose {
            x: 1,
            y: 1,
            heading_bin: 16,
        };
        let negative = GridPose {
            x: 1,
            y: 1,
            heading_bin: -1,
        };

        assert!(ss.is_valid_state(&valid));
        assert!(!ss.is_valid_state(&out_of_range));
        assert!(!ss.is_valid_state(&negative));
    }

    #[test]
    fn test_reconstruct_path() {
        let mut ss = state_space(0.1, 8);

        let start = GridPose {
            x: 0,
            y: 0,
            heading_bin: 0,
        };
        // Interning doesn't range check, so this lands in the table but is invalid on read
        let invalid = GridPose {
            x: 1,
            y: 0,
            heading_bin: 8,
        };
        let end = GridPose {
            x: 2,
            y: 0,
            heading_bin: 1,
        };

        let ids = vec![ss.intern(start), ss.intern(invalid), ss.intern(end)];

        let path = ss.reconstruct_path(&ids).unwrap();
        assert_eq!(path, vec![start, end]);

        // An id outside the table is an error, not a skip
        assert!(matches!(
            ss.reconstruct_path(&[0, 10]),
            Err(StateSpaceError::UnknownStateId(10, 3))
        ));
    }
}
