//! Transition sequencer
//!
//! Drives one planned transition against the renderer:
//!
//! Idle → Removing → Adding → Selecting → Idle
//!
//! Removal always precedes addition, and selection follows both. Each
//! asynchronous renderer call suspends the sequencer until the owner
//! reports completion. The sequencer never queues a second transition.

mod transition;

pub use transition::{Transition, TransitionKind};

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::render::{Completion, Renderer};
use crate::tree::NodeId;
use crate::HopTreeError;

/// Externally visible sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No transition in flight
    Idle,

    /// Fading and removing the evicted subtree
    Removing,

    /// Adding the new chain
    Adding,

    /// Applying and animating the new selection
    Selecting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Removing => "removing",
            Phase::Adding => "adding",
            Phase::Selecting => "selecting",
        };
        f.write_str(label)
    }
}

/// One renderer call awaited by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Fade(NodeId),
    Remove(NodeId),
    Add,
    Select,
}

impl Step {
    fn phase(self) -> Phase {
        match self {
            Step::Fade(_) | Step::Remove(_) => Phase::Removing,
            Step::Add => Phase::Adding,
            Step::Select => Phase::Selecting,
        }
    }
}

/// Single-flight state machine over render steps
#[derive(Debug)]
pub struct Sequencer {
    phase: Phase,

    /// Transition in flight
    current: Option<Transition>,

    /// Steps not yet issued
    pending: VecDeque<Step>,

    /// Step issued and not yet reported complete
    awaiting: Option<Step>,
}

impl Sequencer {
    /// Create an idle sequencer
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            current: None,
            pending: VecDeque::new(),
            awaiting: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when no transition is in flight
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Transition in flight, if any
    pub fn in_flight(&self) -> Option<&Transition> {
        self.current.as_ref()
    }

    /// Start `transition`.
    ///
    /// Returns the finished transition if every step completed synchronously,
    /// `None` if the sequencer is now suspended on the renderer.
    pub fn begin<R: Renderer + ?Sized>(
        &mut self,
        transition: Transition,
        renderer: &mut R,
    ) -> Result<Option<Transition>, HopTreeError> {
        if !self.is_idle() {
            return Err(HopTreeError::Busy(self.phase));
        }

        let mut steps = VecDeque::new();
        if let Some(id) = transition.remove {
            if renderer.has_node(id) {
                steps.push_back(Step::Fade(id));
                steps.push_back(Step::Remove(id));
            } else {
                warn!(%id, "renderer does not show the subtree to remove, skipping");
            }
        }
        if transition.add.is_some() {
            steps.push_back(Step::Add);
        }
        steps.push_back(Step::Select);

        debug!(kind = ?transition.kind, steps = steps.len(), "transition started");
        self.pending = steps;
        self.current = Some(transition);
        Ok(self.drive(renderer))
    }

    /// Report completion of the awaited renderer call.
    ///
    /// Returns the finished transition once the sequencer is back to idle.
    pub fn complete<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Option<Transition> {
        match self.awaiting.take() {
            Some(step) => {
                trace!(?step, "render step completed");
                self.drive(renderer)
            }
            None => {
                warn!(phase = %self.phase, "completion reported with nothing in flight");
                None
            }
        }
    }

    fn drive<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Option<Transition> {
        while let Some(step) = self.pending.pop_front() {
            if self.phase != step.phase() {
                trace!(from = %self.phase, to = %step.phase(), "phase change");
                self.phase = step.phase();
            }
            if self.issue(step, renderer) == Completion::Pending {
                self.awaiting = Some(step);
                return None;
            }
        }

        self.phase = Phase::Idle;
        let finished = self.current.take();
        debug!("transition settled");
        finished
    }

    fn issue<R: Renderer + ?Sized>(&self, step: Step, renderer: &mut R) -> Completion {
        let Some(transition) = self.current.as_ref() else {
            return Completion::Done;
        };
        match step {
            Step::Fade(id) => renderer.fade_out(id),
            Step::Remove(id) => renderer.remove_subtree(id),
            Step::Add => match transition.add.as_deref() {
                Some(chain) => renderer.add_subtree(chain),
                None => Completion::Done,
            },
            Step::Select => {
                renderer.select(&transition.path);
                renderer.animate()
            }
        }
    }
}
