//! Upward and downward walks over the history arena
//!
//! Both walks borrow the arena and yield ids lazily; neither allocates
//! beyond an explicit work stack for the descendant walk.

use std::collections::HashMap;

use super::{Node, NodeId};

/// Walk from a node to the root, yielding the starting node first.
#[derive(Debug)]
pub struct Ancestors<'a> {
    nodes: &'a HashMap<NodeId, Node>,
    next: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(super) fn new(nodes: &'a HashMap<NodeId, Node>, start: NodeId) -> Self {
        let next = nodes.contains_key(&start).then_some(start);
        Self { nodes, next }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.nodes.get(&current).and_then(|node| node.parent);
        Some(current)
    }
}

/// Pre-order walk of a subtree; children are visited in insertion order.
#[derive(Debug)]
pub struct Descendants<'a> {
    nodes: &'a HashMap<NodeId, Node>,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(super) fn new(nodes: &'a HashMap<NodeId, Node>, start: NodeId) -> Self {
        let stack = if nodes.contains_key(&start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { nodes, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        if let Some(node) = self.nodes.get(&current) {
            // reversed so the first child is popped first
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> HashMap<NodeId, Node> {
        // 0 -> {1 -> {3}, 2}
        let mut nodes = HashMap::new();
        let mut root = Node::new(NodeId(0), "R", None);
        root.children = vec![NodeId(1), NodeId(2)];
        let mut a = Node::new(NodeId(1), "A", Some(NodeId(0)));
        a.children = vec![NodeId(3)];
        nodes.insert(NodeId(0), root);
        nodes.insert(NodeId(1), a);
        nodes.insert(NodeId(2), Node::new(NodeId(2), "B", Some(NodeId(0))));
        nodes.insert(NodeId(3), Node::new(NodeId(3), "C", Some(NodeId(1))));
        nodes
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let nodes = arena();
        let chain: Vec<_> = Ancestors::new(&nodes, NodeId(3)).collect();
        assert_eq!(chain, vec![NodeId(3), NodeId(1), NodeId(0)]);
    }

    #[test]
    fn test_descendants_preorder() {
        let nodes = arena();
        let order: Vec<_> = Descendants::new(&nodes, NodeId(0)).collect();
        assert_eq!(order, vec![NodeId(0), NodeId(1), NodeId(3), NodeId(2)]);
    }

    #[test]
    fn test_missing_start_is_empty() {
        let nodes = arena();
        assert_eq!(Ancestors::new(&nodes, NodeId(9)).count(), 0);
        assert_eq!(Descendants::new(&nodes, NodeId(9)).count(), 0);
    }
}
