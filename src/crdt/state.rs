//! The RGA state triple.
//!
//! A [`State`] is the unit of storage, of merging and of delta transport:
//!
//! - **Added-Vertices**: every vertex ever created, tombstoned or not, with its value
//! - **Removed-Vertices**: the tombstones
//! - **Edge map**: the successor of each vertex (or of HEAD); `None` is TAIL
//!
//! States are immutable values. The three containers sit behind `Arc`s, so a
//! clone is three reference-count bumps and [`crate::join`] only copies a
//! container when it actually has something to add to it.
//!
//! The HEAD sentinel is implicit in Added-Vertices (it has no value) and
//! always present in the Edge map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crdt::types::{Anchor, VertexId};

/// Successor function over the chain. A key missing from the map means
/// "unknown", a `None` value means TAIL.
pub type Edges = BTreeMap<Anchor, Option<VertexId>>;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct State<T> {
    #[serde(with = "pairs")]
    pub(crate) added: Arc<BTreeMap<VertexId, T>>,
    pub(crate) removed: Arc<BTreeSet<VertexId>>,
    #[serde(with = "pairs")]
    pub(crate) edges: Arc<Edges>,
}

impl<T> State<T> {
    /// The empty sequence: no vertices, no tombstones, `HEAD -> TAIL`.
    pub fn initial() -> Self {
        State {
            added: Arc::new(BTreeMap::new()),
            removed: Arc::new(BTreeSet::new()),
            edges: Arc::new(BTreeMap::from([(Anchor::Head, None)])),
        }
    }

    /// A single-vertex delta: `anchor -> id -> TAIL`.
    pub(crate) fn insertion(anchor: Anchor, id: VertexId, value: T) -> Self {
        let mut edges = BTreeMap::from([(Anchor::Head, None)]);
        edges.insert(anchor, Some(id));
        edges.insert(Anchor::Vertex(id), None);

        State {
            added: Arc::new(BTreeMap::from([(id, value)])),
            removed: Arc::new(BTreeSet::new()),
            edges: Arc::new(edges),
        }
    }

    /// A delta that only tombstones `id`.
    pub(crate) fn removal(id: VertexId) -> Self {
        State {
            removed: Arc::new(BTreeSet::from([id])),
            ..State::initial()
        }
    }

    pub fn added(&self) -> &BTreeMap<VertexId, T> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<VertexId> {
        &self.removed
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// True if `id` was ever added, whether or not it has been removed since.
    pub fn contains(&self, id: &VertexId) -> bool {
        self.added.contains_key(id)
    }

    pub fn is_removed(&self, id: &VertexId) -> bool {
        self.removed.contains(id)
    }

    /// True if new vertices may be anchored on `anchor` in this state.
    pub fn has_anchor(&self, anchor: &Anchor) -> bool {
        match anchor {
            Anchor::Head => true,
            Anchor::Vertex(id) => self.contains(id),
        }
    }

    pub fn get(&self, id: &VertexId) -> Option<&T> {
        self.added.get(id)
    }

    /// `Some(None)` means the anchor is followed by TAIL, `None` that the
    /// anchor has no edge at all.
    pub fn successor(&self, anchor: &Anchor) -> Option<Option<VertexId>> {
        self.edges.get(anchor).copied()
    }

    /// The greatest identifier this state knows about.
    pub fn max_vertex(&self) -> Option<VertexId> {
        self.added.keys().next_back().copied()
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        State {
            added: Arc::clone(&self.added),
            removed: Arc::clone(&self.removed),
            edges: Arc::clone(&self.edges),
        }
    }
}

impl<T> Default for State<T> {
    fn default() -> Self {
        State::initial()
    }
}

/// Maps travel as sequences of pairs: the keys are structs and enums, which
/// JSON cannot use as object keys.
mod pairs {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<K, V, S>(map: &Arc<BTreeMap<K, V>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<Arc<BTreeMap<K, V>>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(Arc::new(pairs.into_iter().collect()))
    }
}
