//! Control messages the coordinator broadcasts to every worker.

use crate::id::Coord;
use crate::params::RunHeader;

/// One step of the operator-power query protocol.
///
/// Every worker receives the same request and acts on it in lockstep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    /// Superpose an impulse of `magnitude` at `target`.
    Inject {
        /// Where the impulse lands (normalized by the topology).
        target: Coord,
        /// Scale of the impulse.
        magnitude: f64,
    },
    /// Gather the accumulators and report the value at `target`.
    Get {
        /// Queried coordinate.
        target: Coord,
    },
    /// No more requests; every worker leaves the loop.
    Stop,
}

/// The coordinator's first broadcast of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Startup {
    /// Configuration is valid; every worker proceeds with this header.
    Run {
        /// Grid shape and parameters.
        header: RunHeader,
        /// Whether the coordinator redraws a viewer during the run, which
        /// adds gathers every worker must join.
        live_view: bool,
    },
    /// Configuration is invalid; every worker returns without running.
    Abort,
}
