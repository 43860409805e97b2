//! Lamport timestamp implementation for causal ordering in distributed systems.
//!
//! This module contains the LamportTimestamp struct which provides a total ordering
//! of events across replicas in the CRDT system.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::crdt::types::replica::ReplicaId;

/// A Lamport timestamp, consisting of a logical counter and the originating replica's ID.
///
/// This allows for a total ordering of events across replicas, which is essential for
/// ensuring convergence in the CRDT. The combination of counter and replica_id ensures
/// that no two operations will have the same timestamp.
///
/// # Ordering
///
/// Lamport timestamps are ordered first by counter, then by replica_id. This ensures
/// a deterministic global ordering of all operations across all replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LamportTimestamp {
    /// The logical clock value when this timestamp was created
    pub counter: u64,
    /// The ID of the replica that created this timestamp
    pub replica_id: ReplicaId,
}

impl PartialOrd for LamportTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LamportTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.counter
            .cmp(&other.counter)
            .then_with(|| self.replica_id.cmp(&other.replica_id))
    }
}
