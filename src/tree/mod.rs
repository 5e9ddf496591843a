//! History tree
//!
//! Arena of identity-keyed nodes under a single fixed root.
//! Insertion merges by id: a chain that repeats known ids reuses those
//! nodes and only materialises the diverging suffix.

mod node;
mod traversal;

pub use node::{Node, NodeId, PathSegment};
pub use traversal::{Ancestors, Descendants};

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "visualize")]
use serde::Serialize;
use tracing::trace;

use crate::HopTreeError;

/// Rooted navigation tree (explicit arena)
#[derive(Debug)]
pub struct HistoryTree {
    /// Root id, fixed at construction
    root: NodeId,

    /// All live nodes keyed by id
    nodes: HashMap<NodeId, Node>,
}

impl HistoryTree {
    /// Create a tree holding only `root`
    pub fn new(root: PathSegment) -> Self {
        let mut nodes = HashMap::new();
        let id = root.id;
        nodes.insert(id, Node::new(id, root.name, None));
        Self { root: id, nodes }
    }

    /// Root id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check whether `id` is a live node
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Children of `id` in insertion order (empty if absent)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of `id` (`None` for the root or an absent id)
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root lives as long as the tree
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `id` up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(&self.nodes, id)
    }

    /// Pre-order walk of the subtree under `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(&self.nodes, id)
    }

    /// Root-to-node chain, or `None` if `id` is absent
    pub fn path(&self, id: NodeId) -> Option<Vec<NodeId>> {
        if !self.has_node(id) {
            return None;
        }
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        Some(chain)
    }

    /// Childless nodes, in pre-order
    pub fn tips(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|id| self.children(*id).is_empty())
            .collect()
    }

    /// Insert a parent-rooted chain; `chain[0]` is the attachment point.
    ///
    /// Ids already present are reused in place (prefix merge). Missing ids
    /// are appended as the last child of the previous link. Returns the
    /// ids that were actually created.
    pub fn insert_chain(&mut self, chain: &[PathSegment]) -> Result<Vec<NodeId>, HopTreeError> {
        let Some(anchor) = chain.first() else {
            return Ok(Vec::new());
        };
        if !self.has_node(anchor.id) {
            return Err(HopTreeError::NotFound(anchor.id));
        }

        let mut created = Vec::new();
        let mut previous = anchor.id;
        for segment in &chain[1..] {
            if self.has_node(segment.id) {
                if self.parent(segment.id) != Some(previous) {
                    trace!(id = %segment.id, "reusing node at its existing position");
                }
            } else {
                self.nodes.insert(
                    segment.id,
                    Node::new(segment.id, segment.name.clone(), Some(previous)),
                );
                if let Some(parent) = self.nodes.get_mut(&previous) {
                    parent.children.push(segment.id);
                }
                created.push(segment.id);
            }
            previous = segment.id;
        }

        Ok(created)
    }

    /// Remove `start` and everything beneath it.
    ///
    /// Returns the removed nodes in pre-order. Removing the root is a
    /// caller bug and panics.
    pub fn remove_chain(&mut self, start: NodeId) -> Result<Vec<Node>, HopTreeError> {
        assert!(start != self.root, "the history root cannot be removed");
        let parent = self.parent(start).ok_or(HopTreeError::NotFound(start))?;

        let doomed: Vec<NodeId> = self.descendants(start).collect();
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|child| *child != start);
        }

        Ok(doomed
            .into_iter()
            .filter_map(|id| self.nodes.remove(&id))
            .collect())
    }

    /// Nested, ordered copy of the whole tree
    pub fn snapshot(&self) -> TreeSnapshot {
        self.snapshot_from(self.root)
    }

    fn snapshot_from(&self, id: NodeId) -> TreeSnapshot {
        let node = &self.nodes[&id];
        TreeSnapshot {
            id,
            name: node.name.clone(),
            children: node
                .children
                .iter()
                .map(|child| self.snapshot_from(*child))
                .collect(),
        }
    }

    /// Structural fingerprint (ids, names and child order)
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for id in self.descendants(self.root) {
            let node = &self.nodes[&id];
            hasher.update(&id.0.to_le_bytes());
            hasher.update(node.name.as_bytes());
            hasher.update(&(node.children.len() as u64).to_le_bytes());
        }
        hasher.finalize()
    }
}

/// Owned nested view of the tree, for display and comparison
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(Serialize))]
pub struct TreeSnapshot {
    /// Node id
    pub id: NodeId,
    /// Node name
    pub name: String,
    /// Children in insertion order
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    /// Child names, in order
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&TreeSnapshot> {
        self.children.iter().find(|c| c.name == name)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.name, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u64, name: &str) -> PathSegment {
        PathSegment::new(NodeId(id), name)
    }

    #[test]
    fn test_insert_chain_appends_suffix_only() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        let created = tree
            .insert_chain(&[seg(0, "R"), seg(1, "A"), seg(2, "B")])
            .unwrap();
        assert_eq!(created, vec![NodeId(1), NodeId(2)]);

        let created = tree
            .insert_chain(&[seg(0, "R"), seg(1, "A"), seg(3, "C")])
            .unwrap();
        assert_eq!(created, vec![NodeId(3)]);
        assert_eq!(tree.children(NodeId(1)), &[NodeId(2), NodeId(3)]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_insert_known_chain_is_noop() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        tree.insert_chain(&[seg(0, "R"), seg(1, "A")]).unwrap();
        let before = tree.fingerprint();

        let created = tree.insert_chain(&[seg(0, "R"), seg(1, "A")]).unwrap();
        assert!(created.is_empty());
        assert_eq!(tree.fingerprint(), before);
    }

    #[test]
    fn test_insert_requires_anchor() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        let err = tree.insert_chain(&[seg(7, "X"), seg(8, "Y")]).unwrap_err();
        assert!(matches!(err, HopTreeError::NotFound(NodeId(7))));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_path_and_remove_chain() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        tree.insert_chain(&[seg(0, "R"), seg(1, "A"), seg(2, "B")])
            .unwrap();
        tree.insert_chain(&[seg(0, "R"), seg(3, "C")]).unwrap();

        assert_eq!(tree.path(NodeId(2)), Some(vec![NodeId(0), NodeId(1), NodeId(2)]));

        let removed = tree.remove_chain(NodeId(1)).unwrap();
        let removed_ids: Vec<_> = removed.iter().map(|n| n.id).collect();
        assert_eq!(removed_ids, vec![NodeId(1), NodeId(2)]);
        assert_eq!(tree.children(NodeId(0)), &[NodeId(3)]);
        assert_eq!(tree.path(NodeId(2)), None);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        let err = tree.remove_chain(NodeId(5)).unwrap_err();
        assert!(matches!(err, HopTreeError::NotFound(NodeId(5))));
    }

    #[test]
    #[should_panic(expected = "root cannot be removed")]
    fn test_remove_root_panics() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        let _ = tree.remove_chain(NodeId(0));
    }

    #[test]
    fn test_snapshot_display() {
        let mut tree = HistoryTree::new(seg(0, "R"));
        tree.insert_chain(&[seg(0, "R"), seg(1, "A"), seg(2, "B")])
            .unwrap();
        tree.insert_chain(&[seg(0, "R"), seg(3, "C")]).unwrap();

        assert_eq!(tree.snapshot().to_string(), "R\n  A\n    B\n  C\n");
        assert_eq!(tree.tips(), vec![NodeId(2), NodeId(3)]);
    }
}
