//! Delta-producing edits.
//!
//! Every mutator reads the caller's current [`State`] and returns the delta
//! (or the ordered batch of deltas) describing one logical edit. Nothing is
//! applied: the caller joins each delta into its authoritative state, in the
//! order produced, and ships the same deltas to the other replicas.

use tracing::debug;

use crate::crdt::error::{Result, RgaError};
use crate::crdt::state::State;
use crate::crdt::types::{Anchor, IdSource, VertexId};

/// Deltas that must be joined in order: later ones anchor on vertices minted
/// by earlier ones.
pub type DeltaBatch<T> = Vec<State<T>>;

/// Mints an identifier greater than everything `state` knows.
fn mint<T>(state: &State<T>, ids: &impl IdSource) -> VertexId {
    if let Some(max) = state.max_vertex() {
        ids.observe(max);
    }
    ids.next_id()
}

/// The last vertex of the HEAD chain, live or tombstoned.
fn terminus<T>(state: &State<T>) -> Result<Anchor> {
    state
        .chain()
        .try_fold(Anchor::Head, |_, step| step.map(Anchor::Vertex))
}

/// Appends `value` after the last vertex of the chain.
pub fn push<T: Clone>(state: &State<T>, ids: &impl IdSource, value: T) -> Result<State<T>> {
    let anchor = terminus(state)?;
    let id = mint(state, ids);
    debug!(%id, after = %anchor, "push");
    Ok(State::insertion(anchor, id, value))
}

/// Inserts `value` immediately after `anchor`.
///
/// The anchor must be HEAD or a vertex of `state`; tombstoned anchors are
/// fine. Existing successors are left where they are; join places the new
/// vertex among any concurrent insertions at the same anchor.
pub fn add_right<T: Clone>(
    state: &State<T>,
    ids: &impl IdSource,
    anchor: Anchor,
    value: T,
) -> Result<State<T>> {
    if !state.has_anchor(&anchor) {
        return Err(RgaError::UnknownAnchor { anchor });
    }
    let id = mint(state, ids);
    debug!(%id, after = %anchor, "add right");
    Ok(State::insertion(anchor, id, value))
}

/// Tombstones `vertex`. Returns `None` when the vertex is unknown or already
/// removed; that is not an error.
pub fn remove<T>(state: &State<T>, vertex: VertexId) -> Option<State<T>> {
    if state.contains(&vertex) && !state.is_removed(&vertex) {
        debug!(%vertex, "remove");
        Some(State::removal(vertex))
    } else {
        None
    }
}

/// The live vertex at `position`, counting from 0 and skipping tombstones.
pub fn vertex_at<T>(state: &State<T>, position: usize) -> Result<VertexId> {
    let mut len = 0;
    for step in state.live() {
        let id = step?;
        if len == position {
            return Ok(id);
        }
        len += 1;
    }
    Err(RgaError::PositionOutOfRange { position, len })
}

/// Tombstones the live vertex at `position`.
pub fn remove_at<T>(state: &State<T>, position: usize) -> Result<State<T>> {
    let vertex = vertex_at(state, position)?;
    debug!(%vertex, position, "remove at");
    Ok(State::removal(vertex))
}

/// Where a positional insertion lands: the anchor to insert after, or, when
/// the sequence is too short, the chain end plus the number of live
/// positions still missing before the insertion point.
enum Reach {
    After(Anchor),
    Short { terminus: Anchor, missing: usize },
}

/// Finds the anchor for an insertion at live position `position`.
fn reach<T>(state: &State<T>, position: usize) -> Result<Reach> {
    let mut anchor = Anchor::Head;
    let mut live = 0;
    for step in state.chain() {
        if live == position {
            return Ok(Reach::After(anchor));
        }
        let id = step?;
        anchor = Anchor::Vertex(id);
        if !state.is_removed(&id) {
            live += 1;
        }
    }
    if live == position {
        return Ok(Reach::After(anchor));
    }
    Ok(Reach::Short {
        terminus: anchor,
        missing: position - live,
    })
}

/// Chains `count` default-valued filler vertices after `anchor`.
fn fillers<T: Default>(
    state: &State<T>,
    ids: &impl IdSource,
    mut anchor: Anchor,
    count: usize,
    batch: &mut DeltaBatch<T>,
) -> Anchor {
    for _ in 0..count {
        let id = mint(state, ids);
        batch.push(State::insertion(anchor, id, T::default()));
        anchor = Anchor::Vertex(id);
    }
    if count > 0 {
        debug!(count, "synthesized filler vertices");
    }
    anchor
}

/// Inserts `value` so that it ends up at live position `position`.
///
/// Positions past the end are reached by first appending `T::default()`
/// filler vertices. The batch is: fillers, then the insertion.
pub fn insert_at<T: Clone + Default>(
    state: &State<T>,
    ids: &impl IdSource,
    position: usize,
    value: T,
) -> Result<DeltaBatch<T>> {
    let mut batch = Vec::new();
    let anchor = match reach(state, position)? {
        Reach::After(anchor) => anchor,
        Reach::Short { terminus, missing } => fillers(state, ids, terminus, missing, &mut batch),
    };
    let id = mint(state, ids);
    debug!(%id, after = %anchor, position, "insert at");
    batch.push(State::insertion(anchor, id, value));
    Ok(batch)
}

/// Replaces the live element at `position` with `value`.
///
/// When `position` holds an element, the batch is its removal followed by
/// the new vertex inserted right after it. Past the end, fillers are appended
/// up to `position` and the value inserted there, with no removal.
pub fn set<T: Clone + Default>(
    state: &State<T>,
    ids: &impl IdSource,
    position: usize,
    value: T,
) -> Result<DeltaBatch<T>> {
    let mut batch = Vec::new();
    let anchor = match vertex_at(state, position) {
        Ok(current) => {
            batch.push(State::removal(current));
            Anchor::Vertex(current)
        }
        Err(RgaError::PositionOutOfRange { len, .. }) => {
            let terminus = terminus(state)?;
            fillers(state, ids, terminus, position - len, &mut batch)
        }
        Err(err) => return Err(err),
    };
    let id = mint(state, ids);
    debug!(%id, after = %anchor, position, "set");
    batch.push(State::insertion(anchor, id, value));
    Ok(batch)
}
