//! Type definitions for the RGA CRDT.
//!
//! This module contains all the fundamental types used throughout the RGA implementation,
//! organized into focused submodules.

pub mod anchor;
pub mod clock;
pub mod replica;
pub mod timestamp;
pub mod vertex_id;

pub use anchor::Anchor;
pub use clock::{IdSource, LamportClock};
pub use replica::ReplicaId;
pub use timestamp::LamportTimestamp;
pub use vertex_id::VertexId;
