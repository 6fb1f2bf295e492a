//! Lifecycle of a single recommendation request.
//!
//! ```text
//! Idle -> Validating -> Detecting -> Suggesting -> LookingUp -> [Translating] -> Assembling -> Success
//!             |                          |             |
//!             +-------------> Failed <---+-------------+
//! ```
//!
//! The graph has no cycles, so every arrow is taken at most once. Detection,
//! translation and the poster check only ever move forward.

use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Validating,
    Detecting,
    Suggesting,
    LookingUp,
    Translating,
    Assembling,
    Success,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Success | PipelineState::Failed)
    }

    /// Whether `self -> next` is an arrow of the state machine.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (*self, next),
            (Idle, Validating)
                | (Validating, Detecting)
                | (Validating, Failed)
                | (Detecting, Suggesting)
                | (Suggesting, LookingUp)
                | (Suggesting, Failed)
                | (LookingUp, Translating)
                | (LookingUp, Assembling)
                | (LookingUp, Failed)
                | (Translating, Assembling)
                | (Assembling, Success)
        )
    }

    /// Short label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Validating => "validating mood",
            PipelineState::Detecting => "detecting language",
            PipelineState::Suggesting => "asking for a title",
            PipelineState::LookingUp => "looking up metadata",
            PipelineState::Translating => "translating plot",
            PipelineState::Assembling => "assembling card",
            PipelineState::Success => "done",
            PipelineState::Failed => "failed",
        }
    }
}

/// Walks one request through the state machine and publishes each step.
pub(crate) struct StateTracker<'a> {
    current: PipelineState,
    trail: Vec<PipelineState>,
    progress: Option<&'a watch::Sender<PipelineState>>,
    started: Instant,
}

impl<'a> StateTracker<'a> {
    pub(crate) fn new(progress: Option<&'a watch::Sender<PipelineState>>) -> Self {
        Self {
            current: PipelineState::Idle,
            trail: Vec::new(),
            progress,
            started: Instant::now(),
        }
    }

    pub(crate) fn advance(&mut self, next: PipelineState) {
        if !self.current.can_transition_to(next) {
            // Only reachable through a bug in the orchestrator
            error!("Illegal pipeline transition {:?} -> {:?}", self.current, next);
            debug_assert!(false, "illegal transition {:?} -> {:?}", self.current, next);
        }
        debug!(
            "Pipeline {:?} -> {:?} after {:.2?}",
            self.current,
            next,
            self.started.elapsed()
        );
        self.current = next;
        self.trail.push(next);
        if let Some(progress) = self.progress {
            progress.send_replace(next);
        }
        if next.is_terminal() {
            info!(
                "Pipeline finished in state {:?} after {:.2?} ({:?})",
                next,
                self.started.elapsed(),
                self.trail
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn trail(&self) -> &[PipelineState] {
        &self.trail
    }
}
