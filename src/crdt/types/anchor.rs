//! Edge endpoints: the HEAD sentinel or a real vertex.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::vertex_id::VertexId;

/// The source side of an edge, and the thing new vertices are inserted after.
///
/// `Head` is the virtual predecessor of the first element. The TAIL sentinel
/// never appears as an anchor; edge targets use `None` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Head,
    Vertex(VertexId),
}

impl Anchor {
    /// Returns the vertex behind this anchor, or `None` for HEAD.
    pub fn vertex(&self) -> Option<VertexId> {
        match self {
            Anchor::Head => None,
            Anchor::Vertex(id) => Some(*id),
        }
    }

    pub fn is_head(&self) -> bool {
        matches!(self, Anchor::Head)
    }
}

impl From<VertexId> for Anchor {
    fn from(id: VertexId) -> Self {
        Anchor::Vertex(id)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Head => f.write_str("HEAD"),
            Anchor::Vertex(id) => id.fmt(f),
        }
    }
}
