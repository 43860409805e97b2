//! Errors surfaced by the RGA engine.

use std::fmt;

use thiserror::Error;

use crate::crdt::types::{Anchor, VertexId};

pub type Result<T, E = RgaError> = std::result::Result<T, E>;

/// What went wrong while walking the chain from HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDefect {
    /// An edge points at a vertex that has no entry in Added-Vertices.
    MissingVertex,
    /// A vertex reached from HEAD has no outgoing edge, not even to TAIL.
    Truncated,
    /// The walk revisited a vertex.
    Cycle,
}

impl fmt::Display for ChainDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainDefect::MissingVertex => "edge targets an unknown vertex",
            ChainDefect::Truncated => "chain stops before TAIL",
            ChainDefect::Cycle => "chain loops back on itself",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RgaError {
    #[error("nothing at position {position} (sequence has {len} live elements)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("malformed chain at {anchor}: {defect}")]
    MalformedChain { anchor: Anchor, defect: ChainDefect },

    #[error("vertex {id} carries different values on the two sides of a join")]
    IdentifierCollision { id: VertexId },

    #[error("cannot insert after {anchor}: vertex not known to this state")]
    UnknownAnchor { anchor: Anchor },
}

impl RgaError {
    pub(crate) fn malformed(anchor: Anchor, defect: ChainDefect) -> Self {
        RgaError::MalformedChain { anchor, defect }
    }
}
