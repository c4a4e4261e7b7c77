//! # Simple State Space Test
//!
//! Interns a sweep of continuous poses into the state space, then reconstructs and saves the
//! resulting path.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Result};
use log::info;
use nalgebra::{Isometry2, Vector2};
use plan_lib::state_space::{StateSpace, StateSpaceParams};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Create the session and logger
    let session =
        Session::new("statespace_test", "sessions").wrap_err("Failed to create the session")?;
    logger_init(LevelFilter::Trace, &session.log_file_path)
        .wrap_err("Failed to initialise the logger")?;

    // Load the state space parameters
    let params: StateSpaceParams =
        util::params::load("statespace.toml").wrap_err("Failed to load state space params")?;
    info!(
        "State space: {} m cells, {} heading bins",
        params.cell_size_m, params.num_heading_bins
    );

    let mut state_space = StateSpace::new(&params)?;

    // Intern a sweep of continuous poses along an arc of unit radius
    let num_poses = 20;
    let mut state_ids = Vec::with_capacity(num_poses);

    for i in 0..num_poses {
        let angle_rad = (i as f64) * 0.1;
        let pose = Isometry2::new(
            Vector2::new(angle_rad.cos(), angle_rad.sin()),
            angle_rad,
        );
        state_ids.push(state_space.intern_continuous(&pose));
    }

    info!(
        "Interned {} poses into {} unique states",
        num_poses,
        state_space.num_states()
    );

    // Reconstruct the path from the ids and save it for inspection
    let path = state_space.reconstruct_path(&state_ids)?;
    info!("Reconstructed path of {} grid poses", path.len());

    session.save("statespace/path.json", &path)?;

    Ok(())
}
