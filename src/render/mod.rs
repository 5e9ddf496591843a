//! Renderer contract
//!
//! Drawing, styling and animation live outside this crate. The core only
//! needs a renderer that mirrors tree structure by id and reports when each
//! asynchronous operation has finished.

mod recording;

pub use recording::{NodeVisual, RecordingRenderer, RenderOp};

use crate::tree::{NodeId, PathSegment};

/// Outcome of issuing an asynchronous render operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Finished before returning
    Done,

    /// Still running; the owner will be told via `HopTree::transition_complete`
    Pending,
}

/// Visual collaborator driven by the transition sequencer.
///
/// Every method returning [`Completion`] must eventually complete exactly
/// once: either by returning [`Completion::Done`] or, after returning
/// [`Completion::Pending`], by a single completion signal.
pub trait Renderer {
    /// Draw the initial single-node tree
    fn load(&mut self, root: &PathSegment);

    /// Whether the renderer currently shows `id`
    fn has_node(&self, id: NodeId) -> bool;

    /// Merge a root-to-tail chain into the drawing (known ids are reused)
    fn add_subtree(&mut self, chain: &[PathSegment]) -> Completion;

    /// Fade out the subtree at `id` ahead of its removal
    fn fade_out(&mut self, _id: NodeId) -> Completion {
        Completion::Done
    }

    /// Remove `id` and everything below it
    fn remove_subtree(&mut self, id: NodeId) -> Completion;

    /// Mark `path` as the current selection (synchronous)
    fn select(&mut self, path: &[NodeId]);

    /// Interpolate visual properties toward the latest selection
    fn animate(&mut self) -> Completion;

    /// Hover highlight on or off
    fn set_hover(&mut self, _id: NodeId, _hovered: bool) {}
}
