//! Deterministic processing order for the edges of a state.
//!
//! Every state keeps its Edge map in one canonical shape: the insertion tree
//! (each vertex hangs under the anchor it was inserted after) flattened
//! depth-first, siblings in descending identifier order. Vertices whose anchor
//! is not known yet hang in detached chains that start at the missing anchor
//! and end at TAIL.
//!
//! Because a vertex always sorts above its anchor, that shape can be read
//! back: inside a chain, the anchor of a vertex is the closest vertex before
//! it with a smaller identifier, or the chain root when there is none.
//! [`insertions`] does that decoding and returns the facts sorted by vertex,
//! which is an order where every anchor comes before the vertices hung on it.

use std::collections::BTreeSet;

use crate::crdt::state::State;
use crate::crdt::types::{Anchor, VertexId};

/// One "vertex was inserted after anchor" fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub anchor: Anchor,
    pub vertex: VertexId,
}

/// Decodes the insertion facts of `state`, ordered by vertex identifier.
///
/// Only vertices present in Added-Vertices produce a fact. The result depends
/// on the contents of the state alone, never on container iteration order,
/// and lists each vertex at most once.
pub fn insertions<T>(state: &State<T>) -> Vec<Insertion> {
    let edges = state.edges();
    let targets: BTreeSet<VertexId> = edges.values().flatten().copied().collect();
    let roots = edges.keys().filter(|anchor| match anchor {
        Anchor::Head => true,
        Anchor::Vertex(id) => !targets.contains(id),
    });

    let mut facts = Vec::with_capacity(state.added().len());
    // Ancestors of the current position, identifiers strictly increasing.
    let mut spine: Vec<VertexId> = Vec::new();
    for &root in roots {
        spine.clear();
        let mut cursor = state.successor(&root).flatten();
        let mut steps = 0;
        while let Some(vertex) = cursor {
            if !state.contains(&vertex) || steps > edges.len() {
                break;
            }
            while spine.last().is_some_and(|top| *top > vertex) {
                spine.pop();
            }
            let anchor = spine.last().map_or(root, |top| Anchor::Vertex(*top));
            facts.push(Insertion { anchor, vertex });
            spine.push(vertex);
            steps += 1;
            cursor = state.successor(&Anchor::Vertex(vertex)).flatten();
        }
    }

    facts.sort_by_key(|fact| fact.vertex);
    facts.dedup_by_key(|fact| fact.vertex);
    facts
}
