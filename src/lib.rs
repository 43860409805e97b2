//! # Delta RGA - Replicated Growable Array
//!
//! A delta-state Conflict-free Replicated Data Type (CRDT) for ordered
//! sequences. Replicas edit independently, exchange small delta-states over
//! any channel that may reorder or duplicate them, and converge to the same
//! sequence once every delta has been delivered.
//!
//! ## Features
//!
//! - **Pure engine**: [`initial`], [`join`], [`value`] and the [`mutators`]
//!   are functions over immutable [`State`] values
//! - **Semilattice join**: commutative, associative and idempotent
//! - **Out-of-order delivery**: vertices whose anchor has not arrived yet wait
//!   in detached chains and are spliced in once it does
//! - **Tombstone-based deletion**: removed vertices stay so later edits can
//!   still anchor on them
//!
//! ## Example
//!
//! ```rust
//! use delta_rga::{LamportClock, State, join, mutators, value};
//!
//! let clock = LamportClock::new(1);
//! let mut state: State<char> = delta_rga::initial();
//! for ch in "abc".chars() {
//!     let delta = mutators::push(&state, &clock, ch).unwrap();
//!     state = join(&state, &delta).unwrap();
//! }
//! assert_eq!(value(&state).unwrap(), vec!['a', 'b', 'c']);
//! ```

pub mod config;
pub mod crdt;
pub mod sim;

pub use crdt::mutators;
pub use crdt::{
    Anchor, Chain, ChainDefect, DeltaBatch, Edges, IdSource, LamportClock, LamportTimestamp,
    ReplicaId, Result, Rga, RgaError, State, VertexId, join, value,
};

/// The canonical starting state: the empty sequence.
pub fn initial<T>() -> State<T> {
    State::initial()
}
