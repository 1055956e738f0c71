//! Events emitted by the stage session for asynchronous subscribers.
//!
//! The advisory consultant is the main consumer: every resolved decision
//! becomes a [`FeedbackRequest`] carrying a ticket, and replies are only
//! accepted back while that ticket is still the newest one.

use serde::{Deserialize, Serialize};

use crate::result::GameStatus;
use crate::stage::Stage;

/// Identifies one advisory request within one session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisoryTicket {
    /// Bumped on every session reset.
    pub epoch: u32,
    /// Per-epoch decision counter (1-based).
    pub sequence: u32,
    /// Stage the decision was made on.
    pub stage: Stage,
}

impl AdvisoryTicket {
    #[must_use]
    pub const fn new(epoch: u32, sequence: u32, stage: Stage) -> Self {
        Self {
            epoch,
            sequence,
            stage,
        }
    }
}

/// Payload handed to the advisory client after a decision resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub ticket: AdvisoryTicket,
    /// Stage number, 1 through 8.
    pub stage: u8,
    pub choice: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted { epoch: u32 },
    DecisionResolved(FeedbackRequest),
    Concluded { status: GameStatus },
    SessionReset { epoch: u32 },
}

impl SessionEvent {
    /// The feedback request carried by the event, if any.
    #[must_use]
    pub const fn feedback_request(&self) -> Option<&FeedbackRequest> {
        match self {
            Self::DecisionResolved(request) => Some(request),
            _ => None,
        }
    }
}
