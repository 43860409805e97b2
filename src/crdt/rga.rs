//! Replica handle around the pure RGA engine.
//!
//! [`Rga`] owns one replica's authoritative [`State`] and its Lamport clock.
//! Local edits run a mutator, join the resulting deltas straight away and
//! hand them back so the caller can broadcast them; remote deltas go through
//! [`Rga::apply_remote`].

use parking_lot::RwLock;
use tracing::debug;

use crate::crdt::error::Result;
use crate::crdt::join::join;
use crate::crdt::linearize::value;
use crate::crdt::mutators::{self, DeltaBatch};
use crate::crdt::state::State;
use crate::crdt::types::{
    Anchor, IdSource, LamportClock, LamportTimestamp, ReplicaId, VertexId,
};

/// A replica of a Replicated Growable Array.
///
/// # Design
///
/// - The state is an immutable value; edits swap in a new one under a write lock
/// - Mutation and the local join happen under the same lock, so concurrent
///   local edits never mint against a stale state
/// - The clock is advanced past every identifier received from other replicas
pub struct Rga<T> {
    /// The unique identifier for this replica
    replica_id: ReplicaId,
    /// Thread-safe Lamport clock used as this replica's identifier source
    clock: LamportClock,
    /// The authoritative state
    state: RwLock<State<T>>,
}

impl<T: Clone + PartialEq> Rga<T> {
    /// Creates a new replica holding the empty sequence.
    pub fn new(replica_id: ReplicaId) -> Self {
        Rga {
            replica_id,
            clock: LamportClock::new(replica_id),
            state: RwLock::new(State::initial()),
        }
    }

    /// Gets the replica ID for this RGA instance.
    pub fn replica_id(&self) -> ReplicaId {
        self.replica_id
    }

    /// Gets the current clock value (for debugging/testing).
    pub fn current_clock(&self) -> u64 {
        self.clock.current_counter()
    }

    /// A snapshot of the current state. Cheap: the containers are shared.
    pub fn state(&self) -> State<T> {
        self.state.read().clone()
    }

    /// Runs `edit` against the current state and joins every delta it
    /// produces, in order. Returns the deltas for broadcasting.
    fn edit<F>(&self, edit: F) -> Result<DeltaBatch<T>>
    where
        F: FnOnce(&State<T>, &LamportClock) -> Result<DeltaBatch<T>>,
    {
        let mut state = self.state.write();
        let deltas = edit(&*state, &self.clock)?;
        let mut next = state.clone();
        for delta in &deltas {
            next = join(&next, delta)?;
        }
        *state = next;
        debug!(replica = self.replica_id, deltas = deltas.len(), "applied local edit");
        Ok(deltas)
    }

    fn edit_one<F>(&self, edit: F) -> Result<State<T>>
    where
        F: FnOnce(&State<T>, &LamportClock) -> Result<State<T>>,
    {
        let mut batch = self.edit(|state, clock| edit(state, clock).map(|delta| vec![delta]))?;
        Ok(batch.remove(0))
    }

    /// Appends `value` at the end of the sequence.
    pub fn push(&self, value: T) -> Result<State<T>> {
        self.edit_one(|state, clock| mutators::push(state, clock, value))
    }

    /// Inserts `value` right after `anchor`.
    pub fn insert_after(&self, anchor: Anchor, value: T) -> Result<State<T>> {
        self.edit_one(|state, clock| mutators::add_right(state, clock, anchor, value))
    }

    /// Tombstones the live element at `position`.
    pub fn remove_at(&self, position: usize) -> Result<State<T>> {
        self.edit_one(|state, _| mutators::remove_at(state, position))
    }

    /// Tombstones `vertex`; `None` if it is unknown or already removed.
    pub fn remove(&self, vertex: VertexId) -> Result<Option<State<T>>> {
        let mut batch =
            self.edit(|state, _| Ok(mutators::remove(state, vertex).into_iter().collect()))?;
        Ok(batch.pop())
    }

    /// Merges a delta (or any state) received from another replica.
    ///
    /// Deltas may arrive in any order and more than once.
    pub fn apply_remote(&self, delta: &State<T>) -> Result<()> {
        if let Some(max) = delta.max_vertex() {
            self.clock.observe(max);
        }
        let mut state = self.state.write();
        *state = join(&*state, delta)?;
        debug!(
            replica = self.replica_id,
            vertices = delta.added().len(),
            tombstones = delta.removed().len(),
            "applied remote delta"
        );
        Ok(())
    }

    /// The live values, in order.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        value(&*self.state.read())
    }

    /// Number of live elements.
    pub fn len(&self) -> Result<usize> {
        self.state.read().len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of vertices ever added, tombstones included.
    pub fn total_vertex_count(&self) -> usize {
        self.state.read().added().len()
    }
}

impl<T: Clone + PartialEq + Default> Rga<T> {
    /// Inserts `value` at live position `position`, padding with
    /// `T::default()` if the sequence is shorter.
    pub fn insert_at(&self, position: usize, value: T) -> Result<DeltaBatch<T>> {
        self.edit(|state, clock| mutators::insert_at(state, clock, position, value))
    }

    /// Replaces the element at live position `position`.
    pub fn set(&self, position: usize, value: T) -> Result<DeltaBatch<T>> {
        self.edit(|state, clock| mutators::set(state, clock, position, value))
    }
}

impl Rga<char> {
    /// The live characters as a string.
    pub fn text(&self) -> Result<String> {
        Ok(self.to_vec()?.into_iter().collect())
    }
}

/// The copy keeps the replica ID and starts its clock where the original's
/// stands. Only one of the two should keep editing if their deltas can meet.
impl<T> Clone for Rga<T> {
    fn clone(&self) -> Self {
        let clock = LamportClock::new(self.replica_id);
        clock.update(LamportTimestamp {
            counter: self.clock.current_counter(),
            replica_id: self.replica_id,
        });
        Rga {
            replica_id: self.replica_id,
            clock,
            state: RwLock::new(self.state.read().clone()),
        }
    }
}
