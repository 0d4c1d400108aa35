//! Thread-per-worker launcher.
//!
//! Stands in for a process launcher: it builds a connected set of
//! [`ChannelComm`]s, runs `body` once per rank on a named thread, and
//! joins them all. Results come back in rank order.

use std::thread;

use tracing::debug;

use crate::channel::ChannelComm;
use crate::comm::Communicator;
use crate::error::LaunchError;
use crate::transport::Transport;

/// Run `body` on `size` workers and collect their results by rank.
///
/// A worker that panics or returns early disconnects, so peers waiting
/// on it fail with [`CommError::Disconnected`](crate::CommError) instead
/// of blocking. A live peer that never issues its matching call still
/// keeps this function from returning.
///
/// # Examples
///
/// ```
/// use toroid_comm::{launch, Communicator, Transport};
///
/// let ranks = launch(3, Transport::Unbounded, |comm| comm.rank().index()).unwrap();
/// assert_eq!(ranks, vec![0, 1, 2]);
/// ```
pub fn launch<F, R>(size: usize, transport: Transport, body: F) -> Result<Vec<R>, LaunchError>
where
    F: Fn(ChannelComm) -> R + Sync,
    R: Send,
{
    if size == 0 {
        return Err(LaunchError::NoWorkers);
    }
    debug!(size, ?transport, "launching workers");
    let comms = ChannelComm::world(size, transport);
    let body = &body;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(size);
        for comm in comms {
            let rank = comm.rank();
            let handle = thread::Builder::new()
                .name(format!("toroid-worker-{rank}"))
                .spawn_scoped(scope, move || body(comm))
                .map_err(|e| LaunchError::SpawnFailed {
                    rank,
                    reason: e.to_string(),
                })?;
            handles.push((rank, handle));
        }

        handles
            .into_iter()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .map_err(|_| LaunchError::WorkerPanicked { rank })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toroid_core::WorkerId;

    #[test]
    fn zero_workers_rejected() {
        let err = launch(0, Transport::Unbounded, |_comm| ()).unwrap_err();
        assert_eq!(err, LaunchError::NoWorkers);
    }

    #[test]
    fn results_in_rank_order() {
        let got = launch(8, Transport::RENDEZVOUS, |comm| {
            (comm.rank(), comm.size(), thread::current().name().map(str::to_owned))
        })
        .unwrap();
        for (i, (rank, size, name)) in got.into_iter().enumerate() {
            assert_eq!(rank, WorkerId(i));
            assert_eq!(size, 8);
            assert_eq!(name.as_deref(), Some(format!("toroid-worker-{i}").as_str()));
        }
    }

    #[test]
    fn panicking_worker_reported() {
        let err = launch(2, Transport::Unbounded, |comm| {
            if comm.rank() == WorkerId(1) {
                panic!("boom");
            }
        })
        .unwrap_err();
        assert_eq!(err, LaunchError::WorkerPanicked { rank: WorkerId(1) });
    }
}
