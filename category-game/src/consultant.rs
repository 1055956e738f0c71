//! Consultant panel state: cosmetic message plus the stale-reply guard.
use serde::{Deserialize, Serialize};

use crate::constants::{CONSULTANT_BOOT_MESSAGE, CONSULTANT_GREETING};
use crate::event::AdvisoryTicket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultantDesk {
    message: String,
    pending: Option<AdvisoryTicket>,
}

impl Default for ConsultantDesk {
    fn default() -> Self {
        Self {
            message: CONSULTANT_BOOT_MESSAGE.to_string(),
            pending: None,
        }
    }
}

impl ConsultantDesk {
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// A reply is outstanding; callers show a thinking indicator.
    #[must_use]
    pub const fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<AdvisoryTicket> {
        self.pending
    }

    pub fn greet(&mut self) {
        self.message = CONSULTANT_GREETING.to_string();
        self.pending = None;
    }

    /// Wait on `ticket`. Any reply for an earlier ticket becomes stale.
    pub const fn await_reply(&mut self, ticket: AdvisoryTicket) {
        self.pending = Some(ticket);
    }

    /// Accept `text` only if it answers the newest outstanding request.
    pub fn deliver(&mut self, ticket: AdvisoryTicket, text: impl Into<String>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!(
                "dropping stale consultant reply (epoch {}, sequence {})",
                ticket.epoch,
                ticket.sequence
            );
            return false;
        }
        self.message = text.into();
        self.pending = None;
        true
    }
}
