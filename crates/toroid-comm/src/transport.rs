//! Inbox capacity for [`ChannelComm`](crate::ChannelComm).

use crossbeam_channel::{Receiver, Sender};

/// How much a worker's inbox buffers before a sender blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Transport {
    /// Sends never block.
    #[default]
    Unbounded,
    /// At most `n` messages in flight per inbox. `Bounded(0)` is a
    /// rendezvous: every send waits for the matching receive.
    Bounded(usize),
}

impl Transport {
    /// Zero-buffer rendezvous transport.
    pub const RENDEZVOUS: Transport = Transport::Bounded(0);

    /// Create one inbox under this transport.
    pub(crate) fn channel<T>(self) -> (Sender<T>, Receiver<T>) {
        match self {
            Self::Unbounded => crossbeam_channel::unbounded(),
            Self::Bounded(cap) => crossbeam_channel::bounded(cap),
        }
    }
}
