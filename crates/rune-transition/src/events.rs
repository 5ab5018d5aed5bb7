//! Transition lifecycle events.
//!
//! The controller pushes an event whenever a run changes state; hosts poll
//! them after each update, commit or tick.
//!
//! ```ignore
//! use rune_transition::{TransitionController, TransitionEvent};
//!
//! controller.apply(&style);
//! controller.tick(16.0);
//!
//! for event in controller.drain_events() {
//!     if let TransitionEvent::Ended { run_id } = event {
//!         println!("transition {run_id} ended");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::AnimationId;

/// Event emitted when a transition run changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// The run's clock was started.
    Started {
        run_id: AnimationId,
        /// Properties that changed and are being transitioned.
        properties: Vec<String>,
    },
    /// The run was superseded by a newer one before completing.
    Replaced {
        run_id: AnimationId,
        /// The run that took over.
        replaced_by: AnimationId,
    },
    /// The run's clock reached progress 1.
    Ended { run_id: AnimationId },
    /// The run was stopped by teardown.
    Cancelled { run_id: AnimationId },
}

impl TransitionEvent {
    /// The run this event concerns.
    pub fn run_id(&self) -> AnimationId {
        match self {
            Self::Started { run_id, .. }
            | Self::Replaced { run_id, .. }
            | Self::Ended { run_id }
            | Self::Cancelled { run_id } => *run_id,
        }
    }

    /// Whether this is a `Started` event.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    /// Whether the run finished on its own.
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }

    /// True for both replacement and teardown.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Replaced { .. } | Self::Cancelled { .. })
    }
}

/// Queue for collecting transition events between polls.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event behind any already pending.
    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drain all events in the order they were pushed.
    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }
}
