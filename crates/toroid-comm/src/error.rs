//! Error types for worker communication and launching.

use thiserror::Error;
use toroid_core::WorkerId;

/// Errors from a single communication call.
///
/// A peer that is alive but never issues its matching call is not an
/// error: the caller blocks indefinitely.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommError {
    /// The peer's inbox is gone (its worker exited or panicked).
    #[error("worker {peer} disconnected")]
    Disconnected {
        /// Peer that could not be reached.
        peer: WorkerId,
    },
    /// A peer identifier outside `[0, size)`.
    #[error("worker {peer} out of range for {size} workers")]
    PeerOutOfRange {
        /// The offending identifier.
        peer: WorkerId,
        /// Number of workers in the world.
        size: usize,
    },
    /// A message arrived with a payload of the wrong type.
    #[error("expected {expected} payload, received {found}")]
    PayloadMismatch {
        /// Payload kind the call expected.
        expected: &'static str,
        /// Payload kind that arrived.
        found: &'static str,
    },
    /// The root of a collective was called without its value.
    #[error("root worker {root} has no value to distribute")]
    MissingRootValue {
        /// Root of the collective.
        root: WorkerId,
    },
    /// Scatter input length differs from the worker count.
    #[error("scatter needs {expected} values, got {got}")]
    ScatterLength {
        /// Number of workers.
        expected: usize,
        /// Values supplied by the root.
        got: usize,
    },
}

/// Errors from starting or joining the worker threads.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// Asked to launch zero workers.
    #[error("at least one worker is required")]
    NoWorkers,
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker {rank}: {reason}")]
    SpawnFailed {
        /// Rank that could not be started.
        rank: WorkerId,
        /// OS error text.
        reason: String,
    },
    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank that panicked.
        rank: WorkerId,
    },
}
