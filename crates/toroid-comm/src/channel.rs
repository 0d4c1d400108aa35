//! Crossbeam-backed [`Communicator`].
//!
//! Each worker owns one inbox receiver and a sender to every inbox. A
//! receive for `(source, tag)` drains the inbox, stashing anything that
//! does not match until a later call asks for it. A send to a busy peer
//! selects between completing the send and draining its own inbox, so no
//! worker ever sits in a pure blocking send.
//!
//! Every worker also holds the only sender of a liveness channel that
//! never carries a message. Dropping the communicator, on return or
//! during a panic, disconnects it, which wakes any peer waiting to
//! receive from that worker.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Select, Sender};
use indexmap::IndexMap;
use toroid_core::WorkerId;

use crate::comm::{CommStats, Communicator};
use crate::error::CommError;
use crate::message::{Envelope, Payload, Tag, Wire};
use crate::transport::Transport;

/// Uninhabited: liveness channels only ever disconnect.
enum Never {}

/// Outcome of one select round inside a send.
enum Progress {
    Sent,
    Received { incoming: Envelope, unsent: Envelope },
}

/// In-process communicator for one worker thread.
///
/// Created in full sets by [`ChannelComm::world`]; each instance is moved
/// to its own thread.
pub struct ChannelComm {
    rank: WorkerId,
    inbox: Receiver<Envelope>,
    outboxes: Arc<[Sender<Envelope>]>,
    /// Dropped with this communicator.
    _alive: Sender<Never>,
    liveness: Arc<[Receiver<Never>]>,
    /// Received but not yet consumed, keyed by source.
    pending: IndexMap<WorkerId, VecDeque<Envelope>>,
    stats: CommStats,
}

impl ChannelComm {
    /// Build connected communicators for `size` workers, indexed by rank.
    pub fn world(size: usize, transport: Transport) -> Vec<ChannelComm> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| transport.channel::<Envelope>()).unzip();
        let outboxes: Arc<[Sender<Envelope>]> = senders.into();
        let (alive, liveness): (Vec<_>, Vec<_>) =
            (0..size).map(|_| crossbeam_channel::bounded::<Never>(0)).unzip();
        let liveness: Arc<[Receiver<Never>]> = liveness.into();
        receivers
            .into_iter()
            .zip(alive)
            .enumerate()
            .map(|(rank, (inbox, alive))| ChannelComm {
                rank: WorkerId(rank),
                inbox,
                outboxes: Arc::clone(&outboxes),
                _alive: alive,
                liveness: Arc::clone(&liveness),
                pending: IndexMap::new(),
                stats: CommStats::default(),
            })
            .collect()
    }

    fn check_peer(&self, peer: WorkerId) -> Result<(), CommError> {
        if peer.index() < self.outboxes.len() {
            Ok(())
        } else {
            Err(CommError::PeerOutOfRange {
                peer,
                size: self.outboxes.len(),
            })
        }
    }

    fn envelope(&self, tag: Tag, payload: Payload) -> Envelope {
        Envelope {
            source: self.rank,
            tag,
            payload,
        }
    }

    fn stash(&mut self, envelope: Envelope) {
        self.pending
            .entry(envelope.source)
            .or_default()
            .push_back(envelope);
    }

    fn take_stashed(&mut self, source: WorkerId, tag: Tag) -> Option<Payload> {
        let queue = self.pending.get_mut(&source)?;
        let pos = queue.iter().position(|e| e.tag == tag)?;
        queue.remove(pos).map(|e| e.payload)
    }

    /// Deliver `envelope` to `dest`, draining our own inbox while blocked.
    fn post(&mut self, dest: WorkerId, envelope: Envelope) -> Result<(), CommError> {
        self.check_peer(dest)?;
        if dest == self.rank {
            self.stash(envelope);
            return Ok(());
        }
        let mut outgoing = envelope;
        loop {
            match self.send_or_receive(dest, outgoing)? {
                Progress::Sent => {
                    self.stats.messages_sent += 1;
                    return Ok(());
                }
                Progress::Received { incoming, unsent } => {
                    self.stash(incoming);
                    outgoing = unsent;
                }
            }
        }
    }

    fn send_or_receive(&self, dest: WorkerId, envelope: Envelope) -> Result<Progress, CommError> {
        let tx = &self.outboxes[dest.index()];
        let mut sel = Select::new();
        let send_op = sel.send(tx);
        sel.recv(&self.inbox);
        let oper = sel.select();
        if oper.index() == send_op {
            oper.send(tx, envelope)
                .map_err(|_| CommError::Disconnected { peer: dest })?;
            Ok(Progress::Sent)
        } else {
            let incoming = oper
                .recv(&self.inbox)
                .map_err(|_| CommError::Disconnected { peer: self.rank })?;
            Ok(Progress::Received {
                incoming,
                unsent: envelope,
            })
        }
    }

    /// Wait for the next inbox message, or `None` once `source` is gone.
    ///
    /// Waiting on ourselves never reports a disconnect.
    fn next_or_gone(&self, source: WorkerId) -> Result<Option<Envelope>, CommError> {
        let disconnected = CommError::Disconnected { peer: source };
        if source == self.rank {
            return self.inbox.recv().map(Some).map_err(|_| disconnected);
        }
        let gone = &self.liveness[source.index()];
        let mut sel = Select::new();
        let recv_op = sel.recv(&self.inbox);
        sel.recv(gone);
        let oper = sel.select();
        if oper.index() == recv_op {
            oper.recv(&self.inbox).map(Some).map_err(|_| disconnected)
        } else {
            match oper.recv(gone) {
                Ok(never) => match never {},
                Err(_) => Ok(None),
            }
        }
    }

    /// Block until `source` has sent a message tagged `tag`.
    ///
    /// Messages `source` sent before exiting are still delivered; only
    /// then does its exit surface as [`CommError::Disconnected`].
    fn take(&mut self, source: WorkerId, tag: Tag) -> Result<Payload, CommError> {
        self.check_peer(source)?;
        if let Some(payload) = self.take_stashed(source, tag) {
            return Ok(payload);
        }
        loop {
            let Some(envelope) = self.next_or_gone(source)? else {
                while let Ok(envelope) = self.inbox.try_recv() {
                    if envelope.source == source && envelope.tag == tag {
                        return Ok(envelope.payload);
                    }
                    self.stash(envelope);
                }
                return Err(CommError::Disconnected { peer: source });
            };
            if envelope.source == source && envelope.tag == tag {
                return Ok(envelope.payload);
            }
            self.stash(envelope);
        }
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> WorkerId {
        self.rank
    }

    fn size(&self) -> usize {
        self.outboxes.len()
    }

    fn exchange(
        &mut self,
        send_to: WorkerId,
        recv_from: WorkerId,
        value: f64,
    ) -> Result<f64, CommError> {
        let envelope = self.envelope(Tag::Exchange, Payload::Scalar(value));
        self.post(send_to, envelope)?;
        let received = f64::from_payload(self.take(recv_from, Tag::Exchange)?)?;
        self.stats.exchanges += 1;
        Ok(received)
    }

    fn broadcast<T: Wire>(&mut self, root: WorkerId, value: Option<T>) -> Result<T, CommError> {
        self.check_peer(root)?;
        let out = if self.rank == root {
            let value = value.ok_or(CommError::MissingRootValue { root })?;
            for peer in (0..self.size()).map(WorkerId).filter(|&p| p != root) {
                let envelope = self.envelope(Tag::Broadcast, value.clone().into_payload());
                self.post(peer, envelope)?;
            }
            value
        } else {
            T::from_payload(self.take(root, Tag::Broadcast)?)?
        };
        self.stats.broadcasts += 1;
        Ok(out)
    }

    fn scatter<T: Wire>(
        &mut self,
        root: WorkerId,
        values: Option<Vec<T>>,
    ) -> Result<T, CommError> {
        self.check_peer(root)?;
        let out = if self.rank == root {
            let values = values.ok_or(CommError::MissingRootValue { root })?;
            if values.len() != self.size() {
                return Err(CommError::ScatterLength {
                    expected: self.size(),
                    got: values.len(),
                });
            }
            let mut own = None;
            for (i, value) in values.into_iter().enumerate() {
                let peer = WorkerId(i);
                if peer == root {
                    own = Some(value);
                } else {
                    let envelope = self.envelope(Tag::Scatter, value.into_payload());
                    self.post(peer, envelope)?;
                }
            }
            own.ok_or(CommError::MissingRootValue { root })?
        } else {
            T::from_payload(self.take(root, Tag::Scatter)?)?
        };
        self.stats.scatters += 1;
        Ok(out)
    }

    fn gather<T: Wire>(&mut self, root: WorkerId, value: T) -> Result<Option<Vec<T>>, CommError> {
        self.check_peer(root)?;
        let out = if self.rank == root {
            let mut own = Some(value);
            let mut values = Vec::with_capacity(self.size());
            for peer in (0..self.size()).map(WorkerId) {
                if peer == root {
                    values.extend(own.take());
                } else {
                    values.push(T::from_payload(self.take(peer, Tag::Gather)?)?);
                }
            }
            Some(values)
        } else {
            let envelope = self.envelope(Tag::Gather, value.into_payload());
            self.post(root, envelope)?;
            None
        };
        self.stats.gathers += 1;
        Ok(out)
    }

    fn stats(&self) -> CommStats {
        self.stats
    }
}
