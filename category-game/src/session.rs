use thiserror::Error;

use crate::constants::{
    LOG_ADVANCE_PREFIX, LOG_BANKRUPT, LOG_CATEGORY_KING, LOG_COMMODITIZED, LOG_GAME_COMPLETE,
    LOG_SESSION_STARTED,
};
use crate::consultant::ConsultantDesk;
use crate::decision::{Decision, Effects};
use crate::event::{AdvisoryTicket, FeedbackRequest, SessionEvent};
use crate::hunt::{EnergyAllocation, HuntBlockReason};
use crate::logbook::LogKind;
use crate::offer::ValueEquation;
use crate::result::{Ending, GameStatus, ResultSummary, result_summary, select_ending};
use crate::stage::Stage;
use crate::state::GameState;

/// Reasons a decision is refused before any state changes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecisionError {
    #[error("the session has not been started")]
    NotStarted,
    #[error("the run is over ({0})")]
    NotPlaying(GameStatus),
    #[error("decision belongs to stage {expected} but the session is on stage {actual}")]
    StageMismatch { expected: Stage, actual: Stage },
    #[error("energy allocation totals {total}, which exceeds the budget of 100")]
    EnergyOverBudget { total: i64 },
}

impl From<HuntBlockReason> for DecisionError {
    fn from(reason: HuntBlockReason) -> Self {
        match reason {
            HuntBlockReason::OverBudget { total } => Self::EnergyOverBudget { total },
        }
    }
}

/// What a single resolved decision did to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub stage: Stage,
    pub effects: Effects,
    pub result_label: &'static str,
    pub status: GameStatus,
    pub advanced: bool,
    pub ticket: AdvisoryTicket,
}

/// Stage engine for one player: authoritative game state, the two stage
/// scratch pads, and the cosmetic consultant panel. A scratch pad returns to
/// its defaults once the decision that reads it resolves.
///
/// All mutation is synchronous. Advisory work is requested by emitting
/// [`SessionEvent::DecisionResolved`]; replies come back through
/// [`StageSession::deliver_feedback`], which discards anything stale.
#[derive(Debug, Clone, Default)]
pub struct StageSession {
    state: GameState,
    offer: ValueEquation,
    energy: EnergyAllocation,
    consultant: ConsultantDesk,
    epoch: u32,
    sequence: u32,
    events: Vec<SessionEvent>,
}

impl StageSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the authoritative game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.state.stage
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.state.status
    }

    #[must_use]
    pub const fn offer(&self) -> &ValueEquation {
        &self.offer
    }

    pub const fn offer_mut(&mut self) -> &mut ValueEquation {
        &mut self.offer
    }

    #[must_use]
    pub const fn energy(&self) -> &EnergyAllocation {
        &self.energy
    }

    pub const fn energy_mut(&mut self) -> &mut EnergyAllocation {
        &mut self.energy
    }

    #[must_use]
    pub const fn consultant(&self) -> &ConsultantDesk {
        &self.consultant
    }

    /// Summary panels are shown once the player has left the intro.
    #[must_use]
    pub const fn intro_finished(&self) -> bool {
        !matches!(self.state.stage, Stage::Intro)
    }

    #[must_use]
    pub const fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Decisions resolved since the last reset.
    #[must_use]
    pub const fn decisions_made(&self) -> u32 {
        self.sequence
    }

    /// Leave the intro for the first sector. Returns `false` unless the
    /// session is sitting on the intro screen.
    pub fn start_session(&mut self) -> bool {
        if self.state.stage != Stage::Intro || !self.state.is_playing() {
            log::warn!("start ignored: session is on stage {}", self.state.stage);
            return false;
        }
        self.state.stage = Stage::Positioning;
        self.consultant.greet();
        self.state.append_log(LOG_SESSION_STARTED, LogKind::Success);
        self.events.push(SessionEvent::SessionStarted { epoch: self.epoch });
        log::info!("session {} started", self.epoch);
        true
    }

    /// Throw away the run and return to the intro. Outstanding advisory
    /// replies become stale because the epoch changes.
    pub fn reset_session(&mut self) {
        self.state.reset();
        self.offer = ValueEquation::default();
        self.energy = EnergyAllocation::default();
        self.consultant = ConsultantDesk::default();
        self.epoch = self.epoch.wrapping_add(1);
        self.sequence = 0;
        self.events.clear();
        self.events.push(SessionEvent::SessionReset { epoch: self.epoch });
        log::info!("session reset to epoch {}", self.epoch);
    }

    /// Raw resource update, see [`GameState::apply_choice`].
    pub fn apply_choice(&mut self, cash_delta: i64, brand_delta: i64) -> bool {
        self.state.apply_choice(cash_delta, brand_delta)
    }

    /// Raw stage advance, see [`GameState::advance_stage`].
    pub fn advance_stage(&mut self) -> bool {
        self.state.advance_stage()
    }

    pub fn append_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.state.append_log(message, kind);
    }

    /// Resolve a decision on the current stage: apply its effects, advance if
    /// the run is still live, log the outcome, and queue an advisory request.
    ///
    /// # Errors
    ///
    /// Fails without changing anything when the session is not started, the
    /// run is over, the decision belongs to another stage, or the hunt's
    /// energy allocation is over budget.
    pub fn decide(&mut self, decision: Decision) -> Result<DecisionOutcome, DecisionError> {
        let stage = self.state.stage;
        if !self.state.is_playing() {
            return Err(DecisionError::NotPlaying(self.state.status));
        }
        if stage == Stage::Intro {
            return Err(DecisionError::NotStarted);
        }
        if decision.stage() != stage {
            return Err(DecisionError::StageMismatch {
                expected: decision.stage(),
                actual: stage,
            });
        }

        let resolution = decision.resolve(&self.offer, &self.energy)?;
        match decision {
            Decision::DeployOffer => self.offer = ValueEquation::default(),
            Decision::Hunt => self.energy = EnergyAllocation::default(),
            _ => {}
        }
        self.state.apply_effects(resolution.effects);
        let status = self.state.status;
        let advanced = status == GameStatus::Playing && self.state.advance_stage();

        let outcome_kind = if resolution.effects.is_gain() {
            LogKind::Success
        } else {
            LogKind::Warning
        };
        self.state.append_log(
            format!(
                "{}: {} ({:+} cash, {:+} brand)",
                decision.choice_label(),
                resolution.result_label,
                resolution.effects.cash,
                resolution.effects.brand
            ),
            outcome_kind,
        );
        if advanced {
            self.state.append_log(
                format!("{LOG_ADVANCE_PREFIX} {}", self.state.stage.index()),
                LogKind::Info,
            );
        }
        self.record_conclusion();

        self.sequence = self.sequence.wrapping_add(1);
        let ticket = AdvisoryTicket::new(self.epoch, self.sequence, stage);
        self.consultant.await_reply(ticket);
        self.events
            .push(SessionEvent::DecisionResolved(FeedbackRequest {
                ticket,
                stage: stage.index(),
                choice: decision.choice_label().to_string(),
                result: resolution.result_label.to_string(),
            }));

        Ok(DecisionOutcome {
            decision,
            stage,
            effects: resolution.effects,
            result_label: resolution.result_label,
            status,
            advanced,
            ticket,
        })
    }

    fn record_conclusion(&mut self) {
        let Some(ending) = select_ending(&self.state) else {
            return;
        };
        let (message, kind) = match ending {
            Ending::Bankrupt => (LOG_BANKRUPT, LogKind::Error),
            Ending::Commoditized => (LOG_COMMODITIZED, LogKind::Error),
            Ending::CategoryKing => (LOG_CATEGORY_KING, LogKind::Success),
            Ending::Survivor => (LOG_GAME_COMPLETE, LogKind::Warning),
        };
        self.state.append_log(message, kind);
        self.events.push(SessionEvent::Concluded {
            status: self.state.status,
        });
        log::info!(
            "session {} concluded: {} (cash {}, brand {})",
            self.epoch,
            self.state.status,
            self.state.cash,
            self.state.brand
        );
    }

    /// Hand a consultant reply back to the session. Returns `false` when the
    /// reply belongs to an earlier decision or a previous session.
    pub fn deliver_feedback(&mut self, ticket: AdvisoryTicket, text: impl Into<String>) -> bool {
        if ticket.epoch != self.epoch {
            log::debug!(
                "dropping consultant reply from epoch {} (current {})",
                ticket.epoch,
                self.epoch
            );
            return false;
        }
        self.consultant.deliver(ticket, text)
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// End-of-run summary once the run is over or past the final sector.
    #[must_use]
    pub fn summary(&self) -> Option<ResultSummary> {
        result_summary(&self.state, self.sequence)
    }
}
