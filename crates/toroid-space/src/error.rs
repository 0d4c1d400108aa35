//! Error types for topology lookups.

use thiserror::Error;
use toroid_core::WorkerId;

/// Errors arising from rank-to-coordinate lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// A worker identifier outside `[0, X * Y)`.
    #[error("worker {worker} out of range for a grid of {workers} cells")]
    WorkerOutOfRange {
        /// The offending identifier.
        worker: WorkerId,
        /// Number of cells in the grid.
        workers: usize,
    },
}
