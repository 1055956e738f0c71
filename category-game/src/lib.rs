//! Category of One Stage Engine
//!
//! Deterministic core for the Category of One business simulation: eight
//! decision sectors, cash and brand resources, win/loss resolution and the
//! operations log. This crate carries no UI, network or platform dependencies;
//! advisory feedback is requested through [`SessionEvent`]s and handed back via
//! [`StageSession::deliver_feedback`].

pub mod constants;
pub mod consultant;
pub mod decision;
pub mod event;
pub mod hunt;
pub mod logbook;
pub mod offer;
pub mod result;
pub mod session;
pub mod stage;
pub mod state;

// Re-export commonly used types
pub use consultant::ConsultantDesk;
pub use decision::{
    CloseChoice, ContentChoice, Decision, Effects, FortressChoice, HiringChoice, MessagingChoice,
    PositioningChoice, Resolution, choices_for,
};
pub use event::{AdvisoryTicket, FeedbackRequest, SessionEvent};
pub use hunt::{EnergyAllocation, EnergyChannel, HuntBlockReason};
pub use logbook::{LogBook, LogEntry, LogKind};
pub use offer::ValueEquation;
pub use result::{Ending, GameStatus, ResultSummary, resolve_status, result_summary, select_ending};
pub use session::{DecisionError, DecisionOutcome, StageSession};
pub use stage::{DECISION_STAGE_COUNT, Stage};
pub use state::GameState;
