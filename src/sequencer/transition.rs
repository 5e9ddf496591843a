//! Planned transition: the before/after diff handed to the sequencer

use crate::tree::{NodeId, PathSegment};

/// How a path request was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Tail already in the tree; selection only
    Reselect,

    /// Breadcrumb mode, tail already in the tree; the chain below it is dropped
    BreadcrumbReplace,

    /// Tail not yet in the tree; a chain is merged in (possibly evicting a branch)
    Extend,
}

/// Structural diff plus the selection to apply once it has settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Classification of the request
    pub kind: TransitionKind,

    /// New current path, root first
    pub path: Vec<NodeId>,

    /// Names of `path`, in the same order
    pub names: Vec<String>,

    /// Root-to-tail chain to add (present for `Extend`)
    pub add: Option<Vec<PathSegment>>,

    /// Root of the subtree to remove
    pub remove: Option<NodeId>,

    /// Whether observers hear about this change on completion
    pub announce: bool,
}

impl Transition {
    /// Selection-only transition
    pub fn reselect(path: Vec<NodeId>, names: Vec<String>) -> Self {
        Self {
            kind: TransitionKind::Reselect,
            path,
            names,
            add: None,
            remove: None,
            announce: true,
        }
    }

    /// True if the tree shape changes
    pub fn is_structural(&self) -> bool {
        self.add.is_some() || self.remove.is_some()
    }

    /// Tail of the new current path
    pub fn tail(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}
