//! Projection of a [`State`] into the observable sequence.

use crate::crdt::error::{ChainDefect, Result, RgaError};
use crate::crdt::state::State;
use crate::crdt::types::{Anchor, VertexId};

/// Walks the Edge map from HEAD to TAIL, yielding every vertex on the way,
/// tombstones included.
///
/// The walk never silently stops early: a dangling edge, a vertex without a
/// successor entry or a loop is yielded as [`RgaError::MalformedChain`] and
/// ends the iteration.
pub struct Chain<'a, T> {
    state: &'a State<T>,
    at: Anchor,
    steps: usize,
    done: bool,
}

impl<'a, T> Chain<'a, T> {
    fn fail(&mut self, defect: ChainDefect) -> Option<Result<VertexId>> {
        self.done = true;
        Some(Err(RgaError::malformed(self.at, defect)))
    }
}

impl<T> Iterator for Chain<'_, T> {
    type Item = Result<VertexId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(next) = self.state.successor(&self.at) else {
            return self.fail(ChainDefect::Truncated);
        };
        let Some(id) = next else {
            self.done = true;
            return None;
        };
        if !self.state.contains(&id) {
            return self.fail(ChainDefect::MissingVertex);
        }
        // A loop-free walk visits each added vertex at most once.
        self.steps += 1;
        if self.steps > self.state.added.len() {
            return self.fail(ChainDefect::Cycle);
        }
        self.at = Anchor::Vertex(id);
        Some(Ok(id))
    }
}

impl<T> State<T> {
    /// Iterates the chain reachable from HEAD.
    pub fn chain(&self) -> Chain<'_, T> {
        Chain {
            state: self,
            at: Anchor::Head,
            steps: 0,
            done: false,
        }
    }

    /// Iterates the live (non-tombstoned) vertices in sequence order.
    pub fn live(&self) -> impl Iterator<Item = Result<VertexId>> + '_ {
        self.chain().filter(|step| match step {
            Ok(id) => !self.is_removed(id),
            Err(_) => true,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> Result<usize> {
        self.live().try_fold(0, |n, step| step.map(|_| n + 1))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Materializes the live values of `state`, in order.
pub fn value<T: Clone>(state: &State<T>) -> Result<Vec<T>> {
    state
        .live()
        .map(|step| {
            let id = step?;
            // Chain only yields ids present in Added-Vertices.
            state
                .get(&id)
                .cloned()
                .ok_or_else(|| RgaError::malformed(Anchor::Vertex(id), ChainDefect::MissingVertex))
        })
        .collect()
}
