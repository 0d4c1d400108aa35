//! Toroid: distributed diffusion on a toroidal grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all toroid sub-crates, and ships the `toroid` command-line binary.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::VecDeque;
//! use toroid::prelude::*;
//!
//! // A 4-cell ring with a unit impulse, one round at p = 0.5.
//! let header = RunHeader::new(GridDims::new(4, 1)?, SimulationParameters::new(0.5, 1)?);
//! let records: VecDeque<Record> =
//!     vec![Record::free(Coord::ORIGIN, 1.0), Record::get(Coord::ORIGIN)].into();
//!
//! let mut out = Vec::new();
//! let report = toroid::run(&EngineConfig::default(), 4, Session::new(header, records, &mut out))?;
//! assert_eq!(report.answers[0].value, 0.75);
//! assert_eq!(String::from_utf8(out)?, "Value of case (0, 0) is 0.750000.\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `toroid-core` | IDs, coordinates, cells, parameters, requests |
//! | [`space`] | `toroid-space` | Torus topology and exchange peers |
//! | [`comm`] | `toroid-comm` | Communicator, channel transport, launcher |
//! | [`engine`] | `toroid-engine` | Relaxation, operator power, coordinator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`toroid-core`).
pub use toroid_core as types;

/// Torus topology (`toroid-space`).
pub use toroid_space as space;

/// Worker communication (`toroid-comm`).
///
/// [`comm::Communicator`] is the contract; [`comm::launch`] starts one
/// thread per rank over a [`comm::Transport`].
pub use toroid_comm as comm;

/// Engines and the coordinator (`toroid-engine`).
pub use toroid_engine as engine;

pub use toroid_engine::run;

/// Common imports for typical toroid usage.
pub mod prelude {
    // Core types
    pub use toroid_core::{
        Cell, CellKind, ConfigError, Coord, GridDims, RunHeader, SimulationParameters, WorkerId,
    };

    // Topology
    pub use toroid_space::Torus;

    // Communication
    pub use toroid_comm::{launch, Communicator, Transport};

    // Engine
    pub use toroid_engine::{
        Answer, Canvas, EngineConfig, EngineError, Event, Matrix, OperatorPower, Record,
        RecordSource, Relaxation, Report, RunMetrics, Session, Strategy, Superposition,
        TextRecords, Viewer,
    };
}
