//! Leaf ledger
//!
//! Ordered record of remembered branch tips, oldest first.
//! Length is bounded by the configured capacity; exceeding it is the
//! only trigger for eviction.

use std::collections::VecDeque;

use crate::tree::NodeId;

/// Bounded, duplicate-free queue of branch tips
#[derive(Debug, Clone)]
pub struct LeafLedger {
    /// Tips, oldest at the front
    leaves: VecDeque<NodeId>,

    /// Maximum number of tips retained after eviction
    capacity: usize,
}

impl LeafLedger {
    /// Create an empty ledger holding at most `capacity` tips
    pub fn new(capacity: usize) -> Self {
        Self {
            leaves: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tracked tips
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True when no tip is tracked
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Check if `id` is a tracked tip
    pub fn contains(&self, id: NodeId) -> bool {
        self.leaves.contains(&id)
    }

    /// Record `id` as the newest tip.
    ///
    /// An id already tracked is moved to the newest position rather than
    /// duplicated.
    pub fn push(&mut self, id: NodeId) {
        self.forget(id);
        self.leaves.push_back(id);
    }

    /// Record `tip` as the newest tip, replacing the first tracked entry
    /// found on `path` (the branch being extended).
    ///
    /// Returns the replaced entry, or `None` if `tip` was appended as a
    /// brand-new branch.
    pub fn extend_branch(&mut self, path: &[NodeId], tip: NodeId) -> Option<NodeId> {
        let replaced = path
            .iter()
            .find_map(|id| self.leaves.iter().position(|leaf| leaf == id))
            .and_then(|idx| self.leaves.remove(idx));
        self.push(tip);
        replaced
    }

    /// True when more tips are tracked than the capacity allows
    pub fn over_capacity(&self) -> bool {
        self.leaves.len() > self.capacity
    }

    /// Pop the oldest tip if over capacity
    pub fn pop_overflow(&mut self) -> Option<NodeId> {
        if self.over_capacity() {
            self.leaves.pop_front()
        } else {
            None
        }
    }

    /// Replace the whole ledger with the single tip `id`
    pub fn reset_to(&mut self, id: NodeId) {
        self.leaves.clear();
        self.leaves.push_back(id);
    }

    /// Drop `id` if tracked; returns whether it was
    pub fn forget(&mut self, id: NodeId) -> bool {
        match self.leaves.iter().position(|leaf| *leaf == id) {
            Some(idx) => {
                self.leaves.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Tips oldest-first
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.leaves.iter().copied()
    }

    /// Owned copy of the tips, oldest-first
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.leaves.iter().copied().collect()
    }
}
