//! Ordered stage progression for a single venture.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decision stages between the intro and the debrief.
pub const DECISION_STAGE_COUNT: u8 = 8;

/// Every screen the engine can be on. Decision stages are numbered 1 through 8;
/// `Intro` precedes them and `Complete` follows a non-terminal close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Intro,
    Positioning,
    Offer,
    Messaging,
    Content,
    Hunt,
    Fortress,
    Hiring,
    Close,
    Complete,
}

impl Stage {
    pub const DECISIONS: [Self; DECISION_STAGE_COUNT as usize] = [
        Self::Positioning,
        Self::Offer,
        Self::Messaging,
        Self::Content,
        Self::Hunt,
        Self::Fortress,
        Self::Hiring,
        Self::Close,
    ];

    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Intro => 0,
            Self::Positioning => 1,
            Self::Offer => 2,
            Self::Messaging => 3,
            Self::Content => 4,
            Self::Hunt => 5,
            Self::Fortress => 6,
            Self::Hiring => 7,
            Self::Close => 8,
            Self::Complete => 9,
        }
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Intro),
            1 => Some(Self::Positioning),
            2 => Some(Self::Offer),
            3 => Some(Self::Messaging),
            4 => Some(Self::Content),
            5 => Some(Self::Hunt),
            6 => Some(Self::Fortress),
            7 => Some(Self::Hiring),
            8 => Some(Self::Close),
            9 => Some(Self::Complete),
            _ => None,
        }
    }

    /// The stage that follows this one, or `None` once the run is complete.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Complete => None,
            other => Self::from_index(other.index() + 1),
        }
    }

    /// Whether the stage presents a decision screen.
    #[must_use]
    pub const fn is_decision(self) -> bool {
        !matches!(self, Self::Intro | Self::Complete)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Positioning => "positioning",
            Self::Offer => "offer",
            Self::Messaging => "messaging",
            Self::Content => "content",
            Self::Hunt => "hunt",
            Self::Fortress => "fortress",
            Self::Hiring => "hiring",
            Self::Close => "close",
            Self::Complete => "complete",
        }
    }

    /// Screen heading for the stage.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Intro => "CATEGORY OF ONE",
            Self::Positioning => "Sector 1: Positioning",
            Self::Offer => "Sector 2: The Offer",
            Self::Messaging => "Sector 3: Messaging",
            Self::Content => "Sector 4: Content",
            Self::Hunt => "Sector 5: The Hunt",
            Self::Fortress => "Sector 6: Money",
            Self::Hiring => "Sector 7: Hiring",
            Self::Close => "Sector 8: Closing",
            Self::Complete => "Debrief",
        }
    }

    /// Scenario text shown above the choices.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Intro => {
                "In 8 sectors, you will either become Category King or be ground down into a commodity."
            }
            Self::Positioning => "A competitor launches a product 10% cheaper than yours.",
            Self::Offer => "Tune the value equation before you take the offer to market.",
            Self::Messaging => "Pick the line that goes on the homepage.",
            Self::Content => "Pick the headline for this quarter's content push.",
            Self::Hunt => "Split 100 points of energy across warm, cold, content and ads.",
            Self::Fortress => "The first real profits land. Where do they go?",
            Self::Hiring => "You need a first key hire.",
            Self::Close => "\"It's too expensive.\"",
            Self::Complete => "The runway held, but the category is still contested.",
        }
    }

    /// Fraction of the eight decision sectors behind this stage, in `[0, 1]`.
    #[must_use]
    pub fn progress(self) -> f64 {
        let done = self.index().min(DECISION_STAGE_COUNT);
        f64::from(done) / f64::from(DECISION_STAGE_COUNT)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intro" => Ok(Self::Intro),
            "positioning" => Ok(Self::Positioning),
            "offer" => Ok(Self::Offer),
            "messaging" => Ok(Self::Messaging),
            "content" => Ok(Self::Content),
            "hunt" => Ok(Self::Hunt),
            "fortress" => Ok(Self::Fortress),
            "hiring" => Ok(Self::Hiring),
            "close" => Ok(Self::Close),
            "complete" => Ok(Self::Complete),
            _ => s
                .parse::<u8>()
                .ok()
                .and_then(Self::from_index)
                .ok_or(()),
        }
    }
}

impl From<Stage> for u8 {
    fn from(value: Stage) -> Self {
        value.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrips_for_every_stage() {
        for index in 0..=9 {
            let stage = Stage::from_index(index).expect("stage in range");
            assert_eq!(stage.index(), index);
        }
        assert!(Stage::from_index(10).is_none());
    }

    #[test]
    fn next_walks_one_step_and_stops_at_complete() {
        let mut stage = Stage::Intro;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert_eq!(next.index(), stage.index() + 1);
            stage = next;
            visited.push(stage);
        }
        assert_eq!(stage, Stage::Complete);
        assert_eq!(visited.len(), 10);
    }

    #[test]
    fn decision_stages_exclude_intro_and_complete() {
        assert!(!Stage::Intro.is_decision());
        assert!(!Stage::Complete.is_decision());
        assert!(Stage::DECISIONS.iter().all(|stage| stage.is_decision()));
    }

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("hunt".parse::<Stage>(), Ok(Stage::Hunt));
        assert_eq!("8".parse::<Stage>(), Ok(Stage::Close));
        assert!("sector-eleven".parse::<Stage>().is_err());
    }

    #[test]
    fn progress_saturates_after_close() {
        assert!(Stage::Intro.progress().abs() < f64::EPSILON);
        assert!((Stage::Hiring.progress() - 0.875).abs() < f64::EPSILON);
        assert!((Stage::Complete.progress() - 1.0).abs() < f64::EPSILON);
    }
}
