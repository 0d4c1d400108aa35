//! The [`Communicator`] contract every engine component is written against.

use toroid_core::WorkerId;

use crate::error::CommError;
use crate::message::Wire;

/// Per-worker counters of completed communication calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommStats {
    /// Point-to-point exchanges.
    pub exchanges: u64,
    /// Broadcasts joined, as root or receiver.
    pub broadcasts: u64,
    /// Scatters joined.
    pub scatters: u64,
    /// Gathers joined.
    pub gathers: u64,
    /// Messages handed to a peer's inbox (self-deliveries excluded).
    pub messages_sent: u64,
}

/// Explicit communication context owned by one worker.
///
/// Every call is a synchronization point: it blocks until the matching
/// calls of the peers involved have been issued. All workers must join
/// every collective in the same order; a worker that skips one stalls
/// the grid.
pub trait Communicator: Send {
    /// This worker's identifier.
    fn rank(&self) -> WorkerId;

    /// Number of workers in the world.
    fn size(&self) -> usize;

    /// Send `value` to `send_to` and return the value `recv_from` sent to
    /// this worker, as one combined operation.
    ///
    /// Completes regardless of transport buffering: it never requires a
    /// global send-first or receive-first ordering.
    fn exchange(
        &mut self,
        send_to: WorkerId,
        recv_from: WorkerId,
        value: f64,
    ) -> Result<f64, CommError>;

    /// Distribute `value` from `root` to every worker.
    ///
    /// The root passes `Some(value)`; the others pass `None`. Every worker
    /// returns the root's value.
    fn broadcast<T: Wire>(&mut self, root: WorkerId, value: Option<T>) -> Result<T, CommError>;

    /// Hand `values[i]` from `root` to worker `i`.
    ///
    /// The root passes `Some(values)` with exactly [`size`](Self::size)
    /// entries; the others pass `None`.
    fn scatter<T: Wire>(&mut self, root: WorkerId, values: Option<Vec<T>>)
        -> Result<T, CommError>;

    /// Collect one value from every worker at `root`, in rank order.
    ///
    /// Returns `Some(values)` on the root and `None` elsewhere.
    fn gather<T: Wire>(&mut self, root: WorkerId, value: T) -> Result<Option<Vec<T>>, CommError>;

    /// Counters for the calls completed so far.
    fn stats(&self) -> CommStats;

    /// Whether this worker is `root`.
    fn is_root(&self, root: WorkerId) -> bool {
        self.rank() == root
    }
}
