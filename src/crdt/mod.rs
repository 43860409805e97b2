//! CRDT (Conflict-free Replicated Data Type) implementation module.
//!
//! This module contains the RGA (Replicated Growable Array) engine: the state
//! triple, join, the linearizer, the mutators, and a replica handle tying them
//! to a Lamport clock.

pub mod error;
pub mod join;
pub mod linearize;
pub mod mutators;
pub mod ordering;
pub mod rga;
pub mod state;
pub mod types;

// Re-export the main public API
pub use error::{ChainDefect, Result, RgaError};
pub use join::join;
pub use linearize::{Chain, value};
pub use mutators::DeltaBatch;
pub use rga::Rga;
pub use state::{Edges, State};
pub use types::{Anchor, IdSource, LamportClock, LamportTimestamp, ReplicaId, VertexId};
