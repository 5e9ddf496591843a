//! History tree node representation
//!
//! Node = (id, name, ordered children)
//! Position in the tree is decided by id alone; names are labels.

use std::fmt;

#[cfg(feature = "visualize")]
use serde::Serialize;

/// Opaque node identity, unique for the lifetime of a tree instance.
///
/// Ordering follows issue order: a larger id was registered later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(Serialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One link of an insertion chain: an id and the name it was registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(Serialize))]
pub struct PathSegment {
    /// Node id
    pub id: NodeId,

    /// Path segment name
    pub name: String,
}

impl PathSegment {
    /// Pair an id with its name
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Tree node stored in the history arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Immutable identity
    pub id: NodeId,

    /// Segment name
    pub name: String,

    /// Parent link (`None` only for the root)
    pub parent: Option<NodeId>,

    /// Children in insertion order
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create a childless node
    pub fn new(id: NodeId, name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
        }
    }

    /// Check if root (no parent)
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if childless
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Branch point: more than one child hangs below this node
    #[inline]
    pub fn is_branch_point(&self) -> bool {
        self.children.len() > 1
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}
