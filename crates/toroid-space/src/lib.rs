//! Toroidal grid topology for toroid.
//!
//! This crate defines [`Torus`], the bidirectional mapping between grid
//! coordinates (with periodic wraparound on both axes) and flat worker
//! identifiers. Every neighbour lookup in the engine goes through it:
//!
//! ```text
//! neighbour = worker_of(normalize(my_coord + offset))
//! ```
//!
//! The mapping is row-major: `WorkerId = x * Y + y`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod torus;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::SpaceError;
pub use torus::{ExchangePair, Torus, CARDINALS};
