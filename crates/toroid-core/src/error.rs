//! Configuration errors shared across the workspace.
//!
//! Every variant is fatal: it is raised once at startup, before the
//! first communication round, and never retried.

use thiserror::Error;

/// Errors detected while validating a run's shape and parameters.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A grid axis has zero extent.
    #[error("grid {axis} must be at least 1")]
    EmptyGrid {
        /// Which axis was empty.
        axis: &'static str,
    },
    /// A grid axis exceeds the supported extent.
    #[error("grid {axis} {value} exceeds maximum of {max}")]
    DimensionTooLarge {
        /// Which axis overflowed.
        axis: &'static str,
        /// The configured extent.
        value: u32,
        /// The largest accepted extent.
        max: u32,
    },
    /// Diffusion coefficient outside `[0, 1]` or not finite.
    #[error("diffusion coefficient must be finite and within [0, 1], got {value}")]
    InvalidCoefficient {
        /// The rejected coefficient.
        value: f64,
    },
    /// The launcher started a different number of workers than there are cells.
    #[error("the number of workers ({workers}) is different than the size of the matrix ({cells})")]
    WorkerCountMismatch {
        /// Workers started by the launcher.
        workers: usize,
        /// Cells in the grid, `X * Y`.
        cells: usize,
    },
    /// `progress_interval` was zero.
    #[error("progress interval must be at least 1")]
    ZeroProgressInterval,
}
