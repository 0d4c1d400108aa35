//! Errors surfaced by a run.

use toroid_comm::{CommError, LaunchError};
use toroid_core::ConfigError;
use toroid_space::SpaceError;

use crate::input::InputError;

/// Any failure of a run, on the coordinator or a worker.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration rejected before or at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The input stream could not supply a run header.
    #[error(transparent)]
    Input(#[from] InputError),
    /// A communication call failed.
    #[error(transparent)]
    Comm(#[from] CommError),
    /// A rank could not be mapped onto the grid.
    #[error(transparent)]
    Space(#[from] SpaceError),
    /// Worker threads could not be started or joined.
    #[error(transparent)]
    Launch(#[from] LaunchError),
    /// Writing answers or reading input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The coordinator cancelled the run at startup.
    #[error("run aborted by the coordinator")]
    Aborted,
    /// Rank 0 started without a session to coordinate.
    #[error("coordinator has no session")]
    MissingSession,
}
