//! Merging two states.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::crdt::error::{ChainDefect, Result, RgaError};
use crate::crdt::ordering::{Insertion, insertions};
use crate::crdt::state::{Edges, State};
use crate::crdt::types::Anchor;

/// Merges `s2` into `s1`, returning a new state. Neither input is modified.
///
/// Added-Vertices and Removed-Vertices are plain unions. For the Edge map,
/// the insertions carried by `s2` that `s1` does not have yet are replayed, in
/// the order given by [`insertions`], on top of `s1`'s chain.
///
/// The result is the same whichever side is `s1`, whatever the grouping of
/// repeated joins, and joining a state with itself returns it unchanged.
pub fn join<T: Clone + PartialEq>(s1: &State<T>, s2: &State<T>) -> Result<State<T>> {
    for (id, value) in s2.added.iter() {
        if s1.get(id).is_some_and(|existing| existing != value) {
            return Err(RgaError::IdentifierCollision { id: *id });
        }
    }

    let mut result = s1.clone();

    let fresh: Vec<Insertion> = insertions(s2)
        .into_iter()
        .filter(|fact| !s1.contains(&fact.vertex))
        .collect();
    if !fresh.is_empty() || !result.edges.contains_key(&Anchor::Head) {
        let edges = Arc::make_mut(&mut result.edges);
        edges.entry(Anchor::Head).or_insert(None);
        for fact in &fresh {
            splice(edges, *fact)?;
        }
    }

    let mut new_vertices = s2
        .added
        .iter()
        .filter(|(id, _)| !s1.contains(id))
        .peekable();
    if new_vertices.peek().is_some() {
        Arc::make_mut(&mut result.added).extend(new_vertices.map(|(id, v)| (*id, v.clone())));
    }

    if !s2.removed.is_subset(&s1.removed) {
        Arc::make_mut(&mut result.removed).extend(s2.removed.iter().copied());
    }

    debug!(
        spliced = fresh.len(),
        vertices = result.added.len(),
        tombstones = result.removed.len(),
        "joined states"
    );
    Ok(result)
}

/// Places one insertion into `edges`.
///
/// Starting at the anchor, walks past every successor with a greater
/// identifier, then links the vertex in front of the first smaller one (or
/// TAIL). Greater identifiers are newer siblings or their descendants, so the
/// walk never lands inside another sibling's subtree.
fn splice(edges: &mut Edges, Insertion { anchor, vertex }: Insertion) -> Result<()> {
    let limit = edges.len();

    // A detached chain already hanging on `vertex` moves with it.
    let mut last = vertex;
    let mut steps = 0;
    while let Some(Some(next)) = edges.get(&Anchor::Vertex(last)) {
        last = *next;
        steps += 1;
        if steps > limit {
            return Err(RgaError::malformed(Anchor::Vertex(vertex), ChainDefect::Cycle));
        }
    }

    let mut left = anchor;
    let mut right = edges.get(&left).copied().flatten();
    steps = 0;
    while let Some(next) = right {
        if next == vertex {
            // Already linked.
            return Ok(());
        }
        if next < vertex {
            break;
        }
        left = Anchor::Vertex(next);
        right = edges.get(&left).copied().flatten();
        steps += 1;
        if steps > limit {
            return Err(RgaError::malformed(anchor, ChainDefect::Cycle));
        }
    }

    trace!(%vertex, after = %left, "splicing vertex");
    edges.insert(left, Some(vertex));
    edges.insert(Anchor::Vertex(last), right);
    Ok(())
}
