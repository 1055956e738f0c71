use serde::{Deserialize, Serialize};

use crate::constants::{STARTING_BRAND, STARTING_CASH};
use crate::decision::Effects;
use crate::logbook::{LogBook, LogKind};
use crate::result::{GameStatus, resolve_status};
use crate::stage::Stage;

/// Authoritative state of one venture. Presentation concerns (consultant
/// copy, intro flags) live on the session, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub cash: i64,
    pub brand: i64,
    pub stage: Stage,
    pub status: GameStatus,
    #[serde(default)]
    pub logs: LogBook,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            cash: STARTING_CASH,
            brand: STARTING_BRAND,
            stage: Stage::Intro,
            status: GameStatus::Playing,
            logs: LogBook::new(),
        }
    }
}

impl GameState {
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.status, GameStatus::Playing)
    }

    /// Apply resource deltas and recompute status against the current stage.
    /// Returns `false` without touching anything once the run is terminal.
    pub fn apply_choice(&mut self, cash_delta: i64, brand_delta: i64) -> bool {
        if !self.is_playing() {
            log::warn!(
                "rejected resource update ({cash_delta:+}, {brand_delta:+}): run is {}",
                self.status
            );
            return false;
        }
        self.cash = self.cash.saturating_add(cash_delta);
        self.brand = self.brand.saturating_add(brand_delta);
        self.status = resolve_status(self.cash, self.brand, self.stage);
        log::debug!(
            "stage {} update ({cash_delta:+}, {brand_delta:+}) -> cash {} brand {} status {}",
            self.stage.index(),
            self.cash,
            self.brand,
            self.status
        );
        true
    }

    pub fn apply_effects(&mut self, effects: Effects) -> bool {
        self.apply_choice(effects.cash, effects.brand)
    }

    /// Move to the next stage. Rejected once the run is terminal or already
    /// past the final sector.
    pub fn advance_stage(&mut self) -> bool {
        if !self.is_playing() {
            log::warn!("rejected stage advance: run is {}", self.status);
            return false;
        }
        let Some(next) = self.stage.next() else {
            log::warn!("rejected stage advance: no stage after {}", self.stage);
            return false;
        };
        self.stage = next;
        true
    }

    pub fn append_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.logs.push(kind, message);
    }

    /// Restore every field to its starting value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
