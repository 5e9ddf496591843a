//! In-memory renderer
//!
//! Mirrors the drawn tree, keeps per-node selection styling state and
//! logs every call. Runs either synchronously or with every asynchronous
//! operation left pending until the owner signals completion.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::{Completion, Renderer};
use crate::tree::{NodeId, PathSegment};

/// One logged renderer call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Initial root drawn
    Load(NodeId),
    /// Chain merged (full chain ids, root first)
    Add(Vec<NodeId>),
    /// Subtree faded
    FadeOut(NodeId),
    /// Subtree removed
    Remove(NodeId),
    /// Selection applied
    Select(Vec<NodeId>),
    /// Property animation started
    Animate,
    /// Hover toggled
    Hover(NodeId, bool),
}

/// Drawn node with its selection styling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeVisual {
    /// Label
    pub name: String,
    /// Parent in the drawing
    pub parent: Option<NodeId>,
    /// Children in draw order
    pub children: Vec<NodeId>,
    /// Part of the current selection
    pub highlighted: bool,
    /// Selections since this node was last highlighted
    pub age: u32,
    /// Pointer over the label
    pub hovered: bool,
    /// Faded out, awaiting removal
    pub faded: bool,
}

/// Renderer that records instead of drawing
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    nodes: HashMap<NodeId, NodeVisual>,
    root: Option<NodeId>,
    ops: Vec<RenderOp>,
    deferred: bool,
}

impl RecordingRenderer {
    /// Every operation completes before returning
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Every asynchronous operation stays pending
    pub fn deferred() -> Self {
        Self {
            deferred: true,
            ..Self::default()
        }
    }

    fn completion(&self) -> Completion {
        if self.deferred {
            Completion::Pending
        } else {
            Completion::Done
        }
    }

    /// Logged calls, oldest first
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Drain the call log
    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// Drawn state of `id`
    pub fn visual(&self, id: NodeId) -> Option<&NodeVisual> {
        self.nodes.get(&id)
    }

    /// Number of drawn nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Currently highlighted ids, in draw order
    pub fn highlighted(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_highlighted(root, &mut out);
        }
        out
    }

    fn collect_highlighted(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&id) {
            if node.highlighted {
                out.push(id);
            }
            for child in &node.children {
                self.collect_highlighted(*child, out);
            }
        }
    }

    /// Indented text drawing; selected nodes are starred
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.write_node(root, 0, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let marker = if node.highlighted { "*" } else { " " };
        let _ = writeln!(out, "{}{:indent$}{}", marker, "", node.name, indent = depth * 2);
        for child in &node.children {
            self.write_node(*child, depth + 1, out);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn load(&mut self, root: &PathSegment) {
        self.nodes.clear();
        self.nodes.insert(
            root.id,
            NodeVisual {
                name: root.name.clone(),
                parent: None,
                children: Vec::new(),
                highlighted: false,
                age: 0,
                hovered: false,
                faded: false,
            },
        );
        self.root = Some(root.id);
        self.ops.push(RenderOp::Load(root.id));
    }

    fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn add_subtree(&mut self, chain: &[PathSegment]) -> Completion {
        let mut previous: Option<NodeId> = None;
        for segment in chain {
            if !self.nodes.contains_key(&segment.id) {
                if let Some(parent) = previous.and_then(|p| self.nodes.get_mut(&p)) {
                    parent.children.push(segment.id);
                }
                self.nodes.insert(
                    segment.id,
                    NodeVisual {
                        name: segment.name.clone(),
                        parent: previous,
                        children: Vec::new(),
                        highlighted: false,
                        age: 0,
                        hovered: false,
                        faded: false,
                    },
                );
            }
            previous = Some(segment.id);
        }
        self.ops
            .push(RenderOp::Add(chain.iter().map(|s| s.id).collect()));
        self.completion()
    }

    fn fade_out(&mut self, id: NodeId) -> Completion {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.faded = true;
                stack.extend(node.children.iter().copied());
            }
        }
        self.ops.push(RenderOp::FadeOut(id));
        self.completion()
    }

    fn remove_subtree(&mut self, id: NodeId) -> Completion {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| *child != id);
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        self.ops.push(RenderOp::Remove(id));
        self.completion()
    }

    fn select(&mut self, path: &[NodeId]) {
        for (id, node) in self.nodes.iter_mut() {
            if path.contains(id) {
                node.highlighted = true;
                node.age = 0;
            } else {
                node.highlighted = false;
                node.age += 1;
            }
        }
        self.ops.push(RenderOp::Select(path.to_vec()));
    }

    fn animate(&mut self) -> Completion {
        self.ops.push(RenderOp::Animate);
        self.completion()
    }

    fn set_hover(&mut self, id: NodeId, hovered: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.hovered = hovered;
        }
        self.ops.push(RenderOp::Hover(id, hovered));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u64, name: &str) -> PathSegment {
        PathSegment::new(NodeId(id), name)
    }

    #[test]
    fn test_add_and_remove_mirror_structure() {
        let mut renderer = RecordingRenderer::immediate();
        renderer.load(&seg(0, "R"));
        assert_eq!(
            renderer.add_subtree(&[seg(0, "R"), seg(1, "A"), seg(2, "B")]),
            Completion::Done
        );
        renderer.add_subtree(&[seg(0, "R"), seg(3, "C")]);
        assert_eq!(renderer.node_count(), 4);

        renderer.remove_subtree(NodeId(1));
        assert_eq!(renderer.node_count(), 2);
        assert_eq!(renderer.render_text(), " R\n   C\n");
    }

    #[test]
    fn test_select_tracks_age() {
        let mut renderer = RecordingRenderer::immediate();
        renderer.load(&seg(0, "R"));
        renderer.add_subtree(&[seg(0, "R"), seg(1, "A")]);
        renderer.add_subtree(&[seg(0, "R"), seg(2, "B")]);

        renderer.select(&[NodeId(0), NodeId(1)]);
        renderer.select(&[NodeId(0), NodeId(2)]);

        let a = renderer.visual(NodeId(1)).unwrap();
        assert!(!a.highlighted);
        assert_eq!(a.age, 1);
        assert_eq!(renderer.highlighted(), vec![NodeId(0), NodeId(2)]);
        assert_eq!(renderer.render_text(), "*R\n   A\n*  B\n");
    }

    #[test]
    fn test_deferred_reports_pending() {
        let mut renderer = RecordingRenderer::deferred();
        renderer.load(&seg(0, "R"));
        assert_eq!(renderer.animate(), Completion::Pending);
        assert_eq!(renderer.fade_out(NodeId(0)), Completion::Pending);
        assert!(renderer.visual(NodeId(0)).unwrap().faded);
    }
}
