//! Distributed diffusion engine for toroid.
//!
//! One worker per grid cell relaxes toward the average of its four
//! toroidal neighbours, communicating only through a
//! [`Communicator`](toroid_comm::Communicator). Two strategies are
//! selected at configuration time:
//!
//! - [`Strategy::Relaxation`]: `t` rounds of the 4-neighbour rule, with
//!   free and fixed cells.
//! - [`Strategy::OperatorPower`]: raises the relaxation operator to the
//!   `t`-th power by distributed repeated squaring, then answers impulse
//!   queries by superposition.
//!
//! # Run shape
//!
//! ```text
//! coordinator (rank 0)                  every worker
//!   read records until first Get
//!   check workers == X * Y
//!   broadcast Startup  ---------------> learn header, own coordinate
//!   scatter cells      ---------------> own cell
//!                                       relax / raise operator
//!   gather values      <---------------
//!   answer queries
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod matrix;
pub mod metrics;
pub mod power;
pub mod relax;
pub mod simulation;
pub mod view;

pub use config::{EngineConfig, Strategy};
pub use coordinator::{Answer, Report, Session};
pub use error::EngineError;
pub use input::{InputError, Record, RecordKind, RecordSource, TextRecords};
pub use matrix::Matrix;
pub use metrics::RunMetrics;
pub use power::{OperatorPower, Superposition};
pub use relax::Relaxation;
pub use simulation::run;
pub use view::{gray_level, Canvas, Event, Viewer, CELL_PIXELS};
