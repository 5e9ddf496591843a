//! Identity registry
//!
//! Bidirectional name <-> id binding. Ids come from a monotonically
//! increasing counter and are never handed out twice, even after the
//! name they were bound to has been released.

use std::collections::HashMap;

use tracing::trace;

use crate::tree::NodeId;
use crate::HopTreeError;

/// Sole source of node identity.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    name_to_id: HashMap<String, NodeId>,
    id_to_name: HashMap<NodeId, String>,
    next_id: u64,
}

impl IdentityRegistry {
    /// Create an empty registry. The first id issued is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a fresh id.
    ///
    /// Fails with [`HopTreeError::DuplicateName`] if `name` is already bound.
    pub fn register(&mut self, name: &str) -> Result<NodeId, HopTreeError> {
        if self.name_to_id.contains_key(name) {
            return Err(HopTreeError::DuplicateName(name.to_string()));
        }
        Ok(self.bind(name))
    }

    /// Release both bindings for `name`. No-op if `name` is unbound.
    pub fn unregister(&mut self, name: &str) {
        if let Some(id) = self.name_to_id.remove(name) {
            self.id_to_name.remove(&id);
            trace!(name, %id, "name released");
        }
    }

    /// Idempotent lookup: the bound id, or a freshly registered one.
    pub fn lookup_or_register(&mut self, name: &str) -> NodeId {
        match self.lookup(name) {
            Some(id) => id,
            None => self.bind(name),
        }
    }

    fn bind(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.name_to_id.insert(name.to_string(), id);
        self.id_to_name.insert(id, name.to_string());
        trace!(name, %id, "name registered");
        id
    }

    /// Id currently bound to `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Name currently bound to `id`.
    pub fn resolve(&self, id: NodeId) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// True when no name is bound.
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// The id the next registration will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }
}
