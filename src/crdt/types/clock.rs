//! Thread-safe Lamport clock and the identifier-source capability.
//!
//! Mutators never mint identifiers themselves; they ask an [`IdSource`]. The
//! [`LamportClock`] here is the source every replica uses unless the caller
//! injects another one.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::crdt::types::replica::ReplicaId;
use crate::crdt::types::timestamp::LamportTimestamp;
use crate::crdt::types::vertex_id::VertexId;

/// Supplies unique, totally ordered vertex identifiers.
///
/// Implementations must guarantee that:
/// - identifiers are unique across every replica,
/// - successive [`IdSource::next_id`] calls are strictly increasing,
/// - after [`IdSource::observe`]`(x)`, every identifier handed out is greater than `x`.
///
/// The last rule is what makes a freshly minted vertex sort above its anchor
/// and above everything the minting replica has seen.
pub trait IdSource {
    /// Records an identifier seen locally or received from another replica.
    fn observe(&self, id: VertexId);

    /// Mints the next identifier.
    fn next_id(&self) -> VertexId;
}

/// A thread-safe clock for generating Lamport timestamps
#[derive(Debug)]
pub struct LamportClock {
    counter: AtomicU64,
    replica_id: ReplicaId,
}

impl LamportClock {
    /// Creates a new Lamport clock
    pub fn new(replica_id: ReplicaId) -> Self {
        LamportClock {
            counter: AtomicU64::new(0),
            replica_id,
        }
    }

    /// Generates the next timestamp for this replica
    pub fn tick(&self) -> LamportTimestamp {
        let counter = self.counter.fetch_add(1, AtomicOrdering::SeqCst) + 1;

        LamportTimestamp {
            counter,
            replica_id: self.replica_id,
        }
    }

    /// Updates the clock based on a received timestamp (for causal consistency)
    pub fn update(&self, received_timestamp: LamportTimestamp) {
        self.counter
            .fetch_max(received_timestamp.counter, AtomicOrdering::SeqCst);
    }

    /// Gets the current counter value (for debugging)
    pub fn current_counter(&self) -> u64 {
        self.counter.load(AtomicOrdering::SeqCst)
    }

    /// Gets the replica ID
    pub fn replica_id(&self) -> ReplicaId {
        self.replica_id
    }
}

impl IdSource for LamportClock {
    fn observe(&self, id: VertexId) {
        self.update(id.timestamp());
    }

    fn next_id(&self) -> VertexId {
        VertexId::from(self.tick())
    }
}
