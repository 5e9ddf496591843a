//! # Bounded navigation-history tree
//!
//! This library keeps a user's navigation history as a branching tree and
//! lets the embedding UI set the current path, growing or pruning the tree
//! to match.
//!
//! ## Core Algorithm
//!
//! 1. **Identity registry**: every path segment name gets a stable id on first sight
//! 2. **Prefix merge**: inserting a path reuses every node whose id is already present
//! 3. **Leaf ledger**: at most `max_leaves` branch tips are remembered, oldest first
//! 4. **Eviction walk**: the oldest branch is pruned up to the nearest node still
//!    needed by another branch or by the path being inserted
//! 5. **Sequenced transitions**: removal, then addition, then selection, one at a time
//!
//! ## Usage Example
//!
//! ```
//! use hoptree::{HopTree, HopTreeConfig, RecordingRenderer};
//!
//! let config = HopTreeConfig::new("Root").with_max_leaves(2);
//! let mut tree = HopTree::init(config, RecordingRenderer::immediate())?;
//! tree.set_path("Root/docs/api")?;
//! tree.set_path("Root/blog")?;
//! assert_eq!(tree.current_path_string(), "Root/blog");
//! # Ok::<(), hoptree::HopTreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each implements one component of the history widget
pub mod registry;   // Name <-> id binding
pub mod tree;       // Identity-keyed history arena
pub mod ledger;     // Bounded branch-tip queue
pub mod planner;    // Request classification, merge and eviction
pub mod sequencer;  // Remove/add/select state machine
pub mod render;     // Renderer contract and in-memory renderer
pub mod observer;   // UI notifications
pub mod util;       // Path text helpers

// Re-exports for convenience
pub use ledger::LeafLedger;
pub use observer::{EventLog, HopEvent, Listener};
pub use planner::PathPlanner;
pub use registry::IdentityRegistry;
pub use render::{Completion, RecordingRenderer, RenderOp, Renderer};
pub use sequencer::{Phase, Sequencer, Transition, TransitionKind};
pub use tree::{HistoryTree, NodeId, PathSegment, TreeSnapshot};
pub use util::PathRequest;

use std::fmt;

#[cfg(feature = "visualize")]
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration parameters for a history tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(Serialize))]
pub struct HopTreeConfig {
    /// Branch-tip capacity
    pub max_leaves: usize,

    /// Keep a single branch; each new path replaces the previous one
    pub breadcrumb: bool,

    /// Clicking a node re-issues `set_path` for it
    pub refocus_on_click: bool,

    /// Name every accepted path must start with
    pub root_name: String,
}

impl Default for HopTreeConfig {
    fn default() -> Self {
        Self {
            max_leaves: 3,
            breadcrumb: false,
            refocus_on_click: true,
            root_name: "Root".to_string(),
        }
    }
}

impl HopTreeConfig {
    /// Default configuration rooted at `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Self::default()
        }
    }

    /// Set branch-tip capacity
    pub fn with_max_leaves(mut self, max_leaves: usize) -> Self {
        self.max_leaves = max_leaves;
        self
    }

    /// Enable breadcrumb mode
    pub fn with_breadcrumb(mut self, enabled: bool) -> Self {
        self.breadcrumb = enabled;
        self
    }

    /// Enable refocus on click
    pub fn with_refocus_on_click(mut self, enabled: bool) -> Self {
        self.refocus_on_click = enabled;
        self
    }

    /// Capacity actually enforced: breadcrumb mode forces 1
    pub fn effective_max_leaves(&self) -> usize {
        if self.breadcrumb {
            1
        } else {
            self.max_leaves
        }
    }

    /// Reject unusable settings
    pub fn validate(&self) -> Result<(), HopTreeError> {
        if self.effective_max_leaves() == 0 {
            return Err(HopTreeError::InvalidConfig(
                "max_leaves must be > 0".to_string(),
            ));
        }
        if self.root_name.is_empty() {
            return Err(HopTreeError::InvalidConfig(
                "root name must not be empty".to_string(),
            ));
        }
        if self.root_name.contains(util::SEPARATOR) {
            return Err(HopTreeError::InvalidConfig(format!(
                "root name {:?} must not contain '{}'",
                self.root_name,
                util::SEPARATOR
            )));
        }
        Ok(())
    }
}

/// Errors reported by history operations
#[derive(Error, Debug)]
pub enum HopTreeError {
    /// First path segment is not the root name
    #[error("illegal root: expected {expected:?}, found {found:?}")]
    InvalidRoot {
        /// Configured root name
        expected: String,
        /// First segment of the rejected path
        found: String,
    },

    /// No segments after parsing
    #[error("empty path")]
    EmptyPath,

    /// Name already bound in the identity registry
    #[error("name {0:?} is already registered")]
    DuplicateName(String),

    /// Node absent from the history tree
    #[error("node {0} not found in history tree")]
    NotFound(NodeId),

    /// A transition is still in flight
    #[error("history tree is busy ({0})")]
    Busy(Phase),

    /// Configuration rejected at init
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Navigation history widget core
///
/// Owns the planner state, the transition sequencer and the renderer, and
/// exposes the operations an embedding UI calls.
pub struct HopTree<R: Renderer> {
    config: HopTreeConfig,
    planner: PathPlanner,
    sequencer: Sequencer,
    renderer: R,
    listener: Box<dyn Listener>,
    busy: Option<Box<dyn Fn() -> bool>>,

    /// Current selection, root first
    current: Vec<NodeId>,

    /// Node clicks accepted so far
    navigations: u64,
}

impl<R: Renderer + fmt::Debug> fmt::Debug for HopTree<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HopTree")
            .field("config", &self.config)
            .field("planner", &self.planner)
            .field("sequencer", &self.sequencer)
            .field("renderer", &self.renderer)
            .field("current", &self.current)
            .field("navigations", &self.navigations)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> HopTree<R> {
    /// Validate `config`, create the root and draw it selected
    pub fn init(config: HopTreeConfig, mut renderer: R) -> Result<Self, HopTreeError> {
        config.validate()?;

        let planner = PathPlanner::new(
            &config.root_name,
            config.effective_max_leaves(),
            config.breadcrumb,
        );
        let root = planner.tree().root();
        renderer.load(&PathSegment::new(root, config.root_name.as_str()));
        renderer.select(&[root]);

        info!(root = %config.root_name, max_leaves = config.effective_max_leaves(), breadcrumb = config.breadcrumb, "history tree initialised");

        Ok(Self {
            config,
            planner,
            sequencer: Sequencer::new(),
            renderer,
            listener: Box::new(()),
            busy: None,
            current: vec![root],
            navigations: 0,
        })
    }

    /// Attach the observer for path and hover notifications
    pub fn with_listener(mut self, listener: impl Listener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Attach the UI's busy predicate; clicks and hovers are ignored while it holds
    pub fn with_busy_predicate(mut self, busy: impl Fn() -> bool + 'static) -> Self {
        self.busy = Some(Box::new(busy));
        self
    }

    /// Set the current path, growing or pruning the tree to match.
    ///
    /// Fails with [`HopTreeError::Busy`] while a transition is in flight.
    /// Returns the sequencer phase afterwards: [`Phase::Idle`] if the
    /// renderer completed everything synchronously.
    pub fn set_path(&mut self, request: impl Into<PathRequest>) -> Result<Phase, HopTreeError> {
        self.request_path(request.into(), false)
    }

    /// Plan and start a path change; `force_announce` keeps the
    /// notification for a reselect of the current path.
    fn request_path(
        &mut self,
        request: PathRequest,
        force_announce: bool,
    ) -> Result<Phase, HopTreeError> {
        if !self.sequencer.is_idle() {
            return Err(HopTreeError::Busy(self.sequencer.phase()));
        }

        let names = request.into_names()?;
        let mut transition = self.planner.plan(names)?;
        if !force_announce
            && transition.kind == TransitionKind::Reselect
            && transition.path == self.current
        {
            transition.announce = false;
        }
        debug!(path = %util::stringify_path(&transition.names), kind = ?transition.kind, "path requested");

        if let Some(finished) = self.sequencer.begin(transition, &mut self.renderer)? {
            self.settle(finished);
        }
        Ok(self.sequencer.phase())
    }

    /// Signal that the renderer finished the operation it reported as pending
    pub fn transition_complete(&mut self) -> Phase {
        if let Some(finished) = self.sequencer.complete(&mut self.renderer) {
            self.settle(finished);
        }
        self.sequencer.phase()
    }

    fn settle(&mut self, finished: Transition) {
        self.current = finished.path;
        if finished.announce {
            let text = util::stringify_path(&finished.names);
            self.listener.path_changed(&text, &finished.names);
        }
    }

    /// Node label clicked.
    ///
    /// Ignored (returns `Ok(false)`) while the busy predicate holds. With
    /// `refocus_on_click` the node's path is re-issued through
    /// [`set_path`](Self::set_path) and announced on completion, even when it
    /// is already current; otherwise the listener is told directly. Only
    /// accepted clicks count as navigations.
    pub fn click_node(&mut self, id: NodeId) -> Result<bool, HopTreeError> {
        if self.ui_busy() {
            return Ok(false);
        }
        let path = self.planner.path_of(id).ok_or(HopTreeError::NotFound(id))?;
        let names = self.planner.names_of(&path);

        if self.config.refocus_on_click {
            self.request_path(PathRequest::Names(names), true)?;
        } else {
            let text = util::stringify_path(&names);
            self.listener.path_changed(&text, &names);
        }
        self.navigations += 1;
        Ok(true)
    }

    /// Pointer entered (`entering`) or left a node label.
    ///
    /// Ignored (returns `false`) while the busy predicate holds.
    pub fn hover_node(&mut self, name: &str, entering: bool) -> bool {
        if self.ui_busy() {
            return false;
        }
        if let Some(id) = self.planner.registry().lookup(name) {
            if self.planner.tree().has_node(id) {
                self.renderer.set_hover(id, entering);
            }
        }
        if entering {
            self.listener.mouse_enter(name);
        } else {
            self.listener.mouse_leave(name);
        }
        true
    }

    fn ui_busy(&self) -> bool {
        self.busy.as_ref().is_some_and(|busy| busy())
    }

    /// True while a transition is in flight or the busy predicate holds
    pub fn is_busy(&self) -> bool {
        !self.sequencer.is_idle() || self.ui_busy()
    }

    /// Sequencer phase
    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Active configuration
    pub fn config(&self) -> &HopTreeConfig {
        &self.config
    }

    /// History tree
    pub fn tree(&self) -> &HistoryTree {
        self.planner.tree()
    }

    /// Leaf ledger
    pub fn ledger(&self) -> &LeafLedger {
        self.planner.ledger()
    }

    /// Identity registry
    pub fn registry(&self) -> &IdentityRegistry {
        self.planner.registry()
    }

    /// Renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer access
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current selection ids, root first
    pub fn current_path(&self) -> &[NodeId] {
        &self.current
    }

    /// Current selection as names
    pub fn current_names(&self) -> Vec<String> {
        self.planner.names_of(&self.current)
    }

    /// Current selection as `/`-joined text
    pub fn current_path_string(&self) -> String {
        util::stringify_path(&self.current_names())
    }

    /// Node clicks accepted so far
    pub fn navigation_count(&self) -> u64 {
        self.navigations
    }
}
