//! An unreliable in-process network.
//!
//! Deltas handed to the [`Network`] reach every other replica eventually, but
//! in shuffled order and sometimes twice. Nothing is dropped or corrupted.

use std::collections::BTreeMap;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace, warn};

use crate::crdt::ReplicaId;

/// Deltas held back before a partial, shuffled release.
const HOLD_BACK: usize = 16;

/// A serialized delta on its way out of a replica.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub from: ReplicaId,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub sent: usize,
    pub delivered: usize,
    pub duplicated: usize,
}

pub struct Network {
    inboxes: BTreeMap<ReplicaId, UnboundedSender<String>>,
    pending: Vec<(ReplicaId, String)>,
    duplicate_rate: f64,
    rng: StdRng,
    stats: NetworkStats,
}

impl Network {
    pub fn new(
        inboxes: BTreeMap<ReplicaId, UnboundedSender<String>>,
        duplicate_rate: f64,
        rng: StdRng,
    ) -> Self {
        Network {
            inboxes,
            pending: Vec::new(),
            duplicate_rate,
            rng,
            stats: NetworkStats::default(),
        }
    }

    /// Relays envelopes until every sender is gone, then flushes what is
    /// left and closes the inboxes.
    pub async fn run(mut self, mut outbound: UnboundedReceiver<Envelope>) -> NetworkStats {
        while let Some(envelope) = outbound.recv().await {
            self.stats.sent += 1;
            for &peer in self.inboxes.keys() {
                if peer != envelope.from {
                    self.pending.push((peer, envelope.payload.clone()));
                }
            }
            if self.pending.len() >= HOLD_BACK && self.rng.random_bool(0.5) {
                let keep = self.pending.len() / 2;
                self.release(keep);
            }
        }
        self.release(0);
        debug!(stats = ?self.stats, "network drained");
        self.stats
    }

    /// Delivers pending deltas in random order until `keep` remain.
    fn release(&mut self, keep: usize) {
        self.pending.shuffle(&mut self.rng);
        let batch = self.pending.split_off(keep);
        for (peer, payload) in batch {
            let copies = if self.rng.random_bool(self.duplicate_rate) {
                self.stats.duplicated += 1;
                2
            } else {
                1
            };
            for _ in 0..copies {
                self.deliver(peer, payload.clone());
            }
        }
    }

    fn deliver(&mut self, peer: ReplicaId, payload: String) {
        let Some(inbox) = self.inboxes.get(&peer) else {
            return;
        };
        if inbox.send(payload).is_err() {
            warn!(peer, "inbox closed, delta dropped");
            return;
        }
        trace!(peer, "delivered delta");
        self.stats.delivered += 1;
    }
}
