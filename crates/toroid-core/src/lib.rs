//! Core types for the toroid diffusion engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: worker and
//! coordinate identifiers, grid dimensions, cells, run parameters,
//! coordinator requests, and configuration errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;
pub mod params;
pub mod request;

pub use cell::{Cell, CellKind};
pub use error::ConfigError;
pub use id::{Coord, GridDims, WorkerId};
pub use params::{RunHeader, SimulationParameters};
pub use request::{Request, Startup};
