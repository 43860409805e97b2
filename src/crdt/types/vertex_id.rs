//! Vertex identifiers.
//!
//! This module contains the VertexId struct which serves as a globally unique
//! identifier for each vertex of the RGA, providing both identity and ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::replica::ReplicaId;
use crate::crdt::types::timestamp::LamportTimestamp;

/// A unique identifier for each vertex (list element) in the RGA.
///
/// This is derived directly from the Lamport timestamp, ensuring global uniqueness and ordering.
/// The identifier is assigned once when the vertex is minted and never reused.
///
/// # Design Notes
///
/// The VertexId is a newtype wrapper around LamportTimestamp to provide type safety and
/// make the API clearer. It inherits all the ordering properties of LamportTimestamp,
/// which join relies on to place concurrent insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub LamportTimestamp);

impl VertexId {
    /// Creates a new VertexId from a counter and replica_id
    pub fn new(counter: u64, replica_id: ReplicaId) -> Self {
        VertexId(LamportTimestamp {
            counter,
            replica_id,
        })
    }

    /// Gets the underlying LamportTimestamp
    pub fn timestamp(&self) -> LamportTimestamp {
        self.0
    }

    /// Gets the counter value from the timestamp
    pub fn counter(&self) -> u64 {
        self.0.counter
    }

    /// Gets the replica_id from the timestamp
    pub fn replica_id(&self) -> ReplicaId {
        self.0.replica_id
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.counter, self.0.replica_id)
    }
}

impl From<LamportTimestamp> for VertexId {
    fn from(timestamp: LamportTimestamp) -> Self {
        VertexId(timestamp)
    }
}

impl From<VertexId> for LamportTimestamp {
    fn from(id: VertexId) -> Self {
        id.0
    }
}
