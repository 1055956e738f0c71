//! Win/loss resolution and the end-of-run summary.
use serde::{Deserialize, Serialize};

use crate::constants::{BRAND_LOSS_CEILING, CASH_LOSS_CEILING, WIN_BRAND_FLOOR, WIN_CASH_FLOOR};
use crate::stage::Stage;
use crate::state::GameState;

/// Status of the venture. Anything other than `Playing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// Cash hit zero or below
    Bankrupt,
    /// Brand sank to the loss ceiling
    Commoditized,
    /// Closed with enough cash and brand to own the category
    CategoryKing,
    /// Survived all eight sectors without claiming the category
    Survivor,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ending::Bankrupt => write!(f, "bankrupt"),
            Ending::Commoditized => write!(f, "commoditized"),
            Ending::CategoryKing => write!(f, "category_king"),
            Ending::Survivor => write!(f, "survivor"),
        }
    }
}

/// Derive the venture status from resource totals and the stage the update
/// happened on. Loss conditions are checked first, cash before brand, so a
/// simultaneous win and loss resolves to `Lost`.
#[must_use]
pub const fn resolve_status(cash: i64, brand: i64, stage: Stage) -> GameStatus {
    if cash <= CASH_LOSS_CEILING {
        return GameStatus::Lost;
    }
    if brand <= BRAND_LOSS_CEILING {
        return GameStatus::Lost;
    }
    if matches!(stage, Stage::Close) && cash >= WIN_CASH_FLOOR && brand >= WIN_BRAND_FLOOR {
        return GameStatus::Won;
    }
    GameStatus::Playing
}

/// Classify a run. `None` while the run is still in progress.
#[must_use]
pub const fn select_ending(gs: &GameState) -> Option<Ending> {
    match gs.status {
        GameStatus::Lost if gs.cash <= CASH_LOSS_CEILING => Some(Ending::Bankrupt),
        GameStatus::Lost => Some(Ending::Commoditized),
        GameStatus::Won => Some(Ending::CategoryKing),
        GameStatus::Playing if matches!(gs.stage, Stage::Complete) => Some(Ending::Survivor),
        GameStatus::Playing => None,
    }
}

/// Summary of a finished run for an end screen or report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: Ending,
    pub status: GameStatus,
    pub headline: String,
    pub epilogue: String,
    pub cash: i64,
    pub brand: i64,
    /// Last stage reached, 0 through 9.
    pub stage: u8,
    pub decisions: u32,
}

/// Build the end-of-run summary, or `None` while the run is in progress.
#[must_use]
pub fn result_summary(gs: &GameState, decisions: u32) -> Option<ResultSummary> {
    let ending = select_ending(gs)?;
    let (headline, epilogue) = match ending {
        Ending::Bankrupt => ("BANKRUPT", "The market shows no mercy to commodities."),
        Ending::Commoditized => (
            "BANKRUPT",
            "Your brand is worth less than nothing. Buyers only ask for discounts.",
        ),
        Ending::CategoryKing => ("CATEGORY KING", "You are the only choice."),
        Ending::Survivor => (
            "COMMODITY",
            "You survived, but survival is not a category. Run it again.",
        ),
    };
    Some(ResultSummary {
        ending,
        status: gs.status,
        headline: headline.to_string(),
        epilogue: epilogue.to_string(),
        cash: gs.cash,
        brand: gs.brand,
        stage: gs.stage.index(),
        decisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_at_zero_loses() {
        assert_eq!(resolve_status(0, 10, Stage::Hunt), GameStatus::Lost);
        assert_eq!(resolve_status(-1, 10, Stage::Hunt), GameStatus::Lost);
        assert_eq!(resolve_status(1, 10, Stage::Hunt), GameStatus::Playing);
    }

    #[test]
    fn brand_at_minus_fifty_loses() {
        assert_eq!(resolve_status(5_000, -50, Stage::Offer), GameStatus::Lost);
        assert_eq!(resolve_status(5_000, -49, Stage::Offer), GameStatus::Playing);
    }

    #[test]
    fn win_requires_close_stage() {
        assert_eq!(resolve_status(110_000, 70, Stage::Close), GameStatus::Won);
        assert_eq!(resolve_status(110_000, 70, Stage::Hiring), GameStatus::Playing);
        assert_eq!(resolve_status(110_000, 70, Stage::Complete), GameStatus::Playing);
        assert_eq!(resolve_status(100_000, 50, Stage::Close), GameStatus::Won);
        assert_eq!(resolve_status(99_999, 50, Stage::Close), GameStatus::Playing);
        assert_eq!(resolve_status(100_000, 49, Stage::Close), GameStatus::Playing);
    }

    #[test]
    fn resolution_is_idempotent() {
        for (cash, brand, stage) in [
            (10_000, 0, Stage::Positioning),
            (0, 60, Stage::Close),
            (120_000, 80, Stage::Close),
            (5, -50, Stage::Messaging),
        ] {
            let first = resolve_status(cash, brand, stage);
            let second = resolve_status(cash, brand, stage);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn ending_tracks_status_and_stage() {
        let mut gs = GameState::default();
        assert_eq!(select_ending(&gs), None);
        assert!(result_summary(&gs, 0).is_none());

        gs.stage = Stage::Complete;
        assert_eq!(select_ending(&gs), Some(Ending::Survivor));

        gs.status = GameStatus::Lost;
        gs.cash = -500;
        let summary = result_summary(&gs, 4).expect("terminal summary");
        assert_eq!(summary.ending, Ending::Bankrupt);
        assert_eq!(summary.headline, "BANKRUPT");
        assert_eq!(summary.decisions, 4);

        gs.cash = 900;
        gs.brand = -55;
        assert_eq!(select_ending(&gs), Some(Ending::Commoditized));

        gs.status = GameStatus::Won;
        let summary = result_summary(&gs, 8).expect("terminal summary");
        assert_eq!(summary.headline, "CATEGORY KING");
    }
}
