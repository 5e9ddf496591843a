//! Shared helpers for history tree tests

#![allow(dead_code)]

use hoptree::{EventLog, HopTree, HopTreeConfig, NodeId, RecordingRenderer};

/// Synchronous tree rooted at `R` with the given capacity
pub fn tree_with_capacity(max_leaves: usize) -> HopTree<RecordingRenderer> {
    HopTree::init(
        HopTreeConfig::new("R").with_max_leaves(max_leaves),
        RecordingRenderer::immediate(),
    )
    .expect("valid config")
}

/// Synchronous breadcrumb tree rooted at `R`
pub fn breadcrumb_tree() -> HopTree<RecordingRenderer> {
    HopTree::init(
        HopTreeConfig::new("R").with_breadcrumb(true),
        RecordingRenderer::immediate(),
    )
    .expect("valid config")
}

/// Tree whose renderer leaves every async step pending, plus its event log
pub fn deferred_tree(max_leaves: usize) -> (HopTree<RecordingRenderer>, EventLog) {
    let log = EventLog::new();
    let tree = HopTree::init(
        HopTreeConfig::new("R").with_max_leaves(max_leaves),
        RecordingRenderer::deferred(),
    )
    .expect("valid config")
    .with_listener(log.clone());
    (tree, log)
}

/// Id of a live name
pub fn id_of(tree: &HopTree<RecordingRenderer>, name: &str) -> NodeId {
    tree.registry()
        .lookup(name)
        .unwrap_or_else(|| panic!("{name} is not registered"))
}

/// Ledger contents as names, oldest first
pub fn ledger_names(tree: &HopTree<RecordingRenderer>) -> Vec<String> {
    tree.ledger()
        .iter()
        .map(|id| tree.registry().resolve(id).unwrap_or("?").to_string())
        .collect()
}

/// Child names of a named node
pub fn child_names(tree: &HopTree<RecordingRenderer>, name: &str) -> Vec<String> {
    tree.tree()
        .children(id_of(tree, name))
        .iter()
        .map(|id| tree.registry().resolve(*id).unwrap_or("?").to_string())
        .collect()
}
