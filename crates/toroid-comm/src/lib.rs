//! Communication between toroid workers.
//!
//! Every worker owns one cell and talks to the rest of the grid only
//! through a [`Communicator`]: a paired point-to-point
//! [`exchange`](Communicator::exchange) plus the `broadcast`, `scatter`,
//! and `gather` collectives the coordinator needs. There is no ambient
//! communicator handle; each worker receives its own context from
//! [`launch`].
//!
//! # Transport
//!
//! [`ChannelComm`] is backed by one crossbeam inbox per worker. The
//! [`Transport`] chooses the inbox capacity. `Transport::Bounded(0)` is a
//! zero-buffer rendezvous: a send completes only when the receiver takes
//! the message. Exchange stays deadlock-free on it because every blocked
//! send also offers a receive on the sender's own inbox.
//!
//! ```text
//! worker A                       worker B
//!   |--select{send B, recv A}--->|--select{send A, recv B}
//!   |<---------------------------|
//!   |  stash out-of-order msgs   |  stash out-of-order msgs
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod comm;
pub mod error;
pub mod launch;
pub mod message;
pub mod transport;

pub use channel::ChannelComm;
pub use comm::{CommStats, Communicator};
pub use error::{CommError, LaunchError};
pub use launch::launch;
pub use message::{Payload, Tag, Wire};
pub use transport::Transport;
