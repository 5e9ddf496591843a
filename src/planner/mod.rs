//! Path planner
//!
//! Classifies a requested path against the current history and mutates
//! registry, tree and ledger accordingly:
//!
//! 1. Tail already present, breadcrumb off: pure reselect
//! 2. Tail already present, breadcrumb on: drop the chain below the tail
//! 3. Tail absent: merge the chain in, update the ledger, evict the
//!    oldest branch if the ledger overflows
//!
//! Eviction walks upward from the evicted tip and stops at the first node
//! that is a branch point or lies on the path just inserted. Everything
//! strictly below that node on the walked chain is pruned.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::ledger::LeafLedger;
use crate::registry::IdentityRegistry;
use crate::sequencer::{Transition, TransitionKind};
use crate::tree::{HistoryTree, Node, NodeId, PathSegment};
use crate::HopTreeError;

/// Registry, tree and ledger for one history instance
#[derive(Debug)]
pub struct PathPlanner {
    registry: IdentityRegistry,
    tree: HistoryTree,
    ledger: LeafLedger,

    /// Root-to-node chain recorded when each node was last inserted
    paths_by_node: HashMap<NodeId, Vec<NodeId>>,

    root_name: String,
    breadcrumb: bool,
}

impl PathPlanner {
    /// Create a history holding only the root.
    ///
    /// `capacity` is the leaf capacity already adjusted for breadcrumb mode.
    pub fn new(root_name: &str, capacity: usize, breadcrumb: bool) -> Self {
        let mut registry = IdentityRegistry::new();
        let root = registry.lookup_or_register(root_name);
        let tree = HistoryTree::new(PathSegment::new(root, root_name));

        // The root is the first remembered tip
        let mut ledger = LeafLedger::new(capacity);
        ledger.push(root);

        let mut paths_by_node = HashMap::new();
        paths_by_node.insert(root, vec![root]);

        Self {
            registry,
            tree,
            ledger,
            paths_by_node,
            root_name: root_name.to_string(),
            breadcrumb,
        }
    }

    /// History tree
    pub fn tree(&self) -> &HistoryTree {
        &self.tree
    }

    /// Leaf ledger
    pub fn ledger(&self) -> &LeafLedger {
        &self.ledger
    }

    /// Identity registry
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Root segment name
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Path recorded for `id`, falling back to its current tree position
    pub fn path_of(&self, id: NodeId) -> Option<Vec<NodeId>> {
        match self.paths_by_node.get(&id) {
            Some(path) if path.iter().all(|step| self.tree.has_node(*step)) => Some(path.clone()),
            _ => self.tree.path(id),
        }
    }

    /// Names for a sequence of ids (unknown ids are skipped)
    pub fn names_of(&self, path: &[NodeId]) -> Vec<String> {
        path.iter()
            .filter_map(|id| self.registry.resolve(*id))
            .map(str::to_string)
            .collect()
    }

    /// Classify `names` and apply the resulting structural change.
    ///
    /// Validation happens before any mutation: an empty request or one not
    /// starting at the root leaves every structure untouched.
    pub fn plan(&mut self, names: Vec<String>) -> Result<Transition, HopTreeError> {
        let first = names.first().ok_or(HopTreeError::EmptyPath)?;
        if *first != self.root_name {
            return Err(HopTreeError::InvalidRoot {
                expected: self.root_name.clone(),
                found: first.clone(),
            });
        }

        let issued_before = self.registry.next_id();
        let requested: Vec<NodeId> = names
            .iter()
            .map(|name| self.registry.lookup_or_register(name))
            .collect();

        let path = self.canonicalize(&requested);
        if path != requested {
            debug!(?requested, ?path, "request rewritten to known node positions");
            for (name, id) in names.iter().zip(&requested) {
                if *id >= issued_before && !path.contains(id) {
                    self.registry.unregister(name);
                }
            }
        }
        let names = self.names_of(&path);
        let Some(&tail) = path.last() else {
            return Err(HopTreeError::EmptyPath);
        };

        if self.tree.has_node(tail) {
            if self.breadcrumb {
                self.replace_breadcrumb(path, names, tail)
            } else {
                trace!(%tail, "tail already present, reselecting");
                Ok(Transition::reselect(path, names))
            }
        } else {
            self.extend(path, names, tail)
        }
    }

    /// Rewrite a requested id sequence so every known id sits at its tree
    /// position.
    ///
    /// A known id replaces everything before it with its own root-to-node
    /// chain; an id repeated within the request cuts the path back to its
    /// first occurrence. Unknown ids extend the path in order.
    fn canonicalize(&self, requested: &[NodeId]) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = Vec::with_capacity(requested.len());
        for &id in requested {
            if let Some(pos) = path.iter().position(|step| *step == id) {
                path.truncate(pos + 1);
            } else if let Some(position) = self.tree.path(id) {
                path = position;
            } else {
                path.push(id);
            }
        }
        path
    }

    fn replace_breadcrumb(
        &mut self,
        path: Vec<NodeId>,
        names: Vec<String>,
        tail: NodeId,
    ) -> Result<Transition, HopTreeError> {
        let children = self.tree.children(tail);
        if children.len() > 1 {
            warn!(%tail, count = children.len(), "breadcrumb tail has several children, dropping the first");
        }

        let remove = children.first().copied();
        if let Some(child) = remove {
            let pruned = self.prune(child)?;
            debug!(%tail, pruned = pruned.len(), "breadcrumb trimmed below tail");
        }
        self.ledger.reset_to(tail);

        Ok(Transition {
            kind: TransitionKind::BreadcrumbReplace,
            path,
            names,
            add: None,
            remove,
            announce: true,
        })
    }

    fn extend(
        &mut self,
        path: Vec<NodeId>,
        names: Vec<String>,
        tail: NodeId,
    ) -> Result<Transition, HopTreeError> {
        let chain: Vec<PathSegment> = path
            .iter()
            .zip(&names)
            .map(|(id, name)| PathSegment::new(*id, name.as_str()))
            .collect();

        for (idx, id) in path.iter().enumerate() {
            self.paths_by_node.insert(*id, path[..=idx].to_vec());
        }

        let created = self.tree.insert_chain(&chain)?;
        let replaced = self.ledger.extend_branch(&path, tail);
        debug!(%tail, created = created.len(), ?replaced, "extended history");

        let mut remove = None;
        if let Some(old_leaf) = self.ledger.pop_overflow() {
            remove = self.eviction_root(old_leaf, &path);
            match remove {
                Some(root) => {
                    let pruned = self.prune(root)?;
                    debug!(%old_leaf, %root, pruned = pruned.len(), "evicted oldest branch");
                }
                None => debug!(%old_leaf, "evicted tip shares every node with live branches"),
            }
        }

        Ok(Transition {
            kind: TransitionKind::Extend,
            path,
            names,
            add: Some(chain),
            remove,
            announce: true,
        })
    }

    /// Highest node that can go when `old_leaf` is forgotten.
    ///
    /// Walks upward while the current node has at most one child and is not
    /// on `path`. The check runs before advancing, so a tip that is itself on
    /// `path` yields nothing. `path` runs from the root, so any path node
    /// below the tip puts the tip on `path` as well.
    fn eviction_root(&self, old_leaf: NodeId, path: &[NodeId]) -> Option<NodeId> {
        let mut candidate = None;
        let mut current = old_leaf;
        loop {
            if self.tree.children(current).len() > 1 || path.contains(&current) {
                break;
            }
            candidate = Some(current);
            match self.tree.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        candidate
    }

    /// Remove the subtree at `start` and free every name it held
    fn prune(&mut self, start: NodeId) -> Result<Vec<Node>, HopTreeError> {
        let removed = self.tree.remove_chain(start)?;
        for node in &removed {
            if self.registry.lookup(&node.name) == Some(node.id) {
                self.registry.unregister(&node.name);
            }
            self.ledger.forget(node.id);
            self.paths_by_node.remove(&node.id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        text.split('/').map(str::to_string).collect()
    }

    fn id(planner: &PathPlanner, name: &str) -> NodeId {
        planner.registry().lookup(name).unwrap()
    }

    #[test]
    fn test_invalid_root_leaves_state_untouched() {
        let mut planner = PathPlanner::new("R", 2, false);
        let err = planner.plan(names("X/A")).unwrap_err();

        assert!(matches!(err, HopTreeError::InvalidRoot { ref found, .. } if found == "X"));
        assert_eq!(planner.registry().len(), 1);
        assert_eq!(planner.tree().len(), 1);
    }

    #[test]
    fn test_empty_request_rejected() {
        let mut planner = PathPlanner::new("R", 2, false);
        assert!(matches!(planner.plan(Vec::new()), Err(HopTreeError::EmptyPath)));
    }

    #[test]
    fn test_first_extension_replaces_root_tip() {
        let mut planner = PathPlanner::new("R", 2, false);
        let t = planner.plan(names("R/A")).unwrap();

        assert_eq!(t.kind, TransitionKind::Extend);
        assert_eq!(t.remove, None);
        assert_eq!(planner.ledger().to_vec(), vec![id(&planner, "A")]);
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut planner = PathPlanner::new("R", 2, false);
        planner.plan(names("R/A/B")).unwrap();
        let fingerprint = planner.tree().fingerprint();
        let ledger = planner.ledger().to_vec();

        let t = planner.plan(names("R/A")).unwrap();
        assert_eq!(t.kind, TransitionKind::Reselect);
        assert!(!t.is_structural());
        assert_eq!(planner.tree().fingerprint(), fingerprint);
        assert_eq!(planner.ledger().to_vec(), ledger);
    }

    #[test]
    fn test_eviction_prunes_unshared_chain() {
        let mut planner = PathPlanner::new("R", 2, false);
        planner.plan(names("R/A/B/C")).unwrap();
        planner.plan(names("R/D")).unwrap();
        let a = id(&planner, "A");

        let t = planner.plan(names("R/E")).unwrap();
        assert_eq!(t.remove, Some(a));
        assert_eq!(planner.tree().len(), 3);
        for gone in ["A", "B", "C"] {
            assert_eq!(planner.registry().lookup(gone), None, "{gone} should be freed");
        }
    }

    #[test]
    fn test_eviction_stops_at_branch_point() {
        let mut planner = PathPlanner::new("R", 2, false);
        planner.plan(names("R/A/X")).unwrap();
        planner.plan(names("R/A/Y")).unwrap();
        let a = id(&planner, "A");
        let x = id(&planner, "X");

        let t = planner.plan(names("R/B")).unwrap();
        assert_eq!(t.remove, Some(x));
        assert!(planner.tree().has_node(a));
        assert_eq!(planner.tree().children(a), &[id(&planner, "Y")]);
    }

    #[test]
    fn test_extension_through_tip_replaces_it() {
        let mut planner = PathPlanner::new("R", 1, false);
        planner.plan(names("R/A")).unwrap();
        let a = id(&planner, "A");

        let t = planner.plan(names("R/A/B")).unwrap();
        assert_eq!(t.remove, None);
        assert!(planner.tree().has_node(a));
        assert_eq!(planner.ledger().to_vec(), vec![id(&planner, "B")]);
    }

    #[test]
    fn test_eviction_walk_spares_new_path() {
        let mut planner = PathPlanner::new("R", 3, false);
        planner.plan(names("R/A/B")).unwrap();
        let r = planner.tree().root();
        let a = id(&planner, "A");
        let b = id(&planner, "B");

        // tip on the path: nothing may go
        assert_eq!(planner.eviction_root(b, &[r, a, b]), None);
        // tip below a path node: walk stops at that node
        assert_eq!(planner.eviction_root(b, &[r, a]), Some(b));
        // a path node below the tip pins the whole chain
        assert_eq!(planner.eviction_root(a, &[r, a, b]), None);
        assert_eq!(planner.eviction_root(b, &[r]), Some(a));
    }

    #[test]
    fn test_breadcrumb_replace_frees_names() {
        let mut planner = PathPlanner::new("R", 1, true);
        planner.plan(names("R/A")).unwrap();
        planner.plan(names("R/A/B")).unwrap();
        let b = id(&planner, "B");

        let t = planner.plan(names("R/A")).unwrap();
        assert_eq!(t.kind, TransitionKind::BreadcrumbReplace);
        assert_eq!(t.remove, Some(b));
        assert_eq!(planner.registry().lookup("B"), None);
        assert_eq!(planner.ledger().to_vec(), vec![id(&planner, "A")]);
    }

    #[test]
    fn test_known_node_keeps_its_position() {
        let mut planner = PathPlanner::new("R", 3, false);
        planner.plan(names("R/A/B")).unwrap();

        // Z is new but B already lives under A
        let t = planner.plan(names("R/Z/B")).unwrap();
        assert_eq!(t.kind, TransitionKind::Reselect);
        assert_eq!(t.names, names("R/A/B"));
        assert_eq!(planner.registry().lookup("Z"), None);

        // X hangs under B at B's real position
        let t = planner.plan(names("R/Q/B/X")).unwrap();
        assert_eq!(t.names, names("R/A/B/X"));
        assert_eq!(planner.tree().children(id(&planner, "R")), &[id(&planner, "A")]);
    }

    #[test]
    fn test_repeated_segment_cuts_back() {
        let mut planner = PathPlanner::new("R", 3, false);
        let t = planner.plan(names("R/A/B/A/C")).unwrap();
        assert_eq!(t.names, names("R/A/C"));
        assert_eq!(planner.registry().lookup("B"), None);
        assert_eq!(planner.tree().len(), 3);
    }

    #[test]
    fn test_path_of_uses_recorded_chain() {
        let mut planner = PathPlanner::new("R", 3, false);
        planner.plan(names("R/A/B")).unwrap();
        let path = planner.path_of(id(&planner, "B")).unwrap();
        assert_eq!(planner.names_of(&path), names("R/A/B"));
    }
}
