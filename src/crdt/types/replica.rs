//! Replica identifier type.
//!
//! This module contains the definition of ReplicaId, which uniquely identifies
//! each participant in the distributed CRDT system.

/// A unique identifier for each replica (collaborator) in the distributed system.
///
/// Vertex identifiers are only unique if no two live replicas share a replica ID.
pub type ReplicaId = u64;
