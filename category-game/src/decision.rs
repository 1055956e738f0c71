//! Decision catalog: every discrete choice the player can make and what it does.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hunt::{EnergyAllocation, HuntBlockReason};
use crate::offer::ValueEquation;
use crate::stage::Stage;

/// Resource changes applied when a decision resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub cash: i64,
    #[serde(default)]
    pub brand: i64,
}

impl Effects {
    #[must_use]
    pub const fn new(cash: i64, brand: i64) -> Self {
        Self { cash, brand }
    }

    /// True when neither resource goes down.
    #[must_use]
    pub const fn is_gain(&self) -> bool {
        self.cash >= 0 && self.brand >= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositioningChoice {
    PriceDrop,
    MoreFeatures,
    NicheDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagingChoice {
    Jargon,
    OutcomePromise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentChoice {
    HardSell,
    InsiderGuide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FortressChoice {
    Rolex,
    Reinvest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiringChoice {
    Mercenary,
    Patriot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseChoice {
    Discount,
    Reframe,
}

/// A decision offered on one of the eight decision stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", content = "choice", rename_all = "snake_case")]
pub enum Decision {
    Positioning(PositioningChoice),
    /// Ship the offer as currently tuned on the value equation.
    DeployOffer,
    Messaging(MessagingChoice),
    Content(ContentChoice),
    /// Run the hunt with the current energy allocation.
    Hunt,
    Fortress(FortressChoice),
    Hiring(HiringChoice),
    Close(CloseChoice),
}

/// Outcome of evaluating a decision against the current scratch inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub effects: Effects,
    pub result_label: &'static str,
}

const POSITIONING: [Decision; 3] = [
    Decision::Positioning(PositioningChoice::PriceDrop),
    Decision::Positioning(PositioningChoice::MoreFeatures),
    Decision::Positioning(PositioningChoice::NicheDown),
];
const OFFER: [Decision; 1] = [Decision::DeployOffer];
const MESSAGING: [Decision; 2] = [
    Decision::Messaging(MessagingChoice::Jargon),
    Decision::Messaging(MessagingChoice::OutcomePromise),
];
const CONTENT: [Decision; 2] = [
    Decision::Content(ContentChoice::HardSell),
    Decision::Content(ContentChoice::InsiderGuide),
];
const HUNT: [Decision; 1] = [Decision::Hunt];
const FORTRESS: [Decision; 2] = [
    Decision::Fortress(FortressChoice::Rolex),
    Decision::Fortress(FortressChoice::Reinvest),
];
const HIRING: [Decision; 2] = [
    Decision::Hiring(HiringChoice::Mercenary),
    Decision::Hiring(HiringChoice::Patriot),
];
const CLOSE: [Decision; 2] = [
    Decision::Close(CloseChoice::Discount),
    Decision::Close(CloseChoice::Reframe),
];

/// Decisions available on `stage`, in on-screen order. Empty for the intro
/// and the debrief.
#[must_use]
pub const fn choices_for(stage: Stage) -> &'static [Decision] {
    match stage {
        Stage::Intro | Stage::Complete => &[],
        Stage::Positioning => &POSITIONING,
        Stage::Offer => &OFFER,
        Stage::Messaging => &MESSAGING,
        Stage::Content => &CONTENT,
        Stage::Hunt => &HUNT,
        Stage::Fortress => &FORTRESS,
        Stage::Hiring => &HIRING,
        Stage::Close => &CLOSE,
    }
}

impl Decision {
    #[must_use]
    pub const fn stage(self) -> Stage {
        match self {
            Self::Positioning(_) => Stage::Positioning,
            Self::DeployOffer => Stage::Offer,
            Self::Messaging(_) => Stage::Messaging,
            Self::Content(_) => Stage::Content,
            Self::Hunt => Stage::Hunt,
            Self::Fortress(_) => Stage::Fortress,
            Self::Hiring(_) => Stage::Hiring,
            Self::Close(_) => Stage::Close,
        }
    }

    /// Stable identifier, `stage.choice`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Positioning(PositioningChoice::PriceDrop) => "positioning.price_drop",
            Self::Positioning(PositioningChoice::MoreFeatures) => "positioning.more_features",
            Self::Positioning(PositioningChoice::NicheDown) => "positioning.niche_down",
            Self::DeployOffer => "offer.deploy",
            Self::Messaging(MessagingChoice::Jargon) => "messaging.jargon",
            Self::Messaging(MessagingChoice::OutcomePromise) => "messaging.outcome_promise",
            Self::Content(ContentChoice::HardSell) => "content.hard_sell",
            Self::Content(ContentChoice::InsiderGuide) => "content.insider_guide",
            Self::Hunt => "hunt.run",
            Self::Fortress(FortressChoice::Rolex) => "fortress.rolex",
            Self::Fortress(FortressChoice::Reinvest) => "fortress.reinvest",
            Self::Hiring(HiringChoice::Mercenary) => "hiring.mercenary",
            Self::Hiring(HiringChoice::Patriot) => "hiring.patriot",
            Self::Close(CloseChoice::Discount) => "close.discount",
            Self::Close(CloseChoice::Reframe) => "close.reframe",
        }
    }

    /// Button text shown to the player.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positioning(PositioningChoice::PriceDrop) => "A: Lower prices to match.",
            Self::Positioning(PositioningChoice::MoreFeatures) => {
                "B: Add features to justify price."
            }
            Self::Positioning(PositioningChoice::NicheDown) => {
                "C: Niche down and rename category."
            }
            Self::DeployOffer => "DEPLOY OFFER",
            Self::Messaging(MessagingChoice::Jargon) => "\"We leverage synergistic paradigms.\"",
            Self::Messaging(MessagingChoice::OutcomePromise) => "\"We get your weekends back.\"",
            Self::Content(ContentChoice::HardSell) => "\"Buy our great product.\"",
            Self::Content(ContentChoice::InsiderGuide) => "\"The Insider's Guide to [Niche].\"",
            Self::Hunt => "HUNT",
            Self::Fortress(FortressChoice::Rolex) => "Buy a Rolex (Liabilities)",
            Self::Fortress(FortressChoice::Reinvest) => "Reinvest in Ads (Assets)",
            Self::Hiring(HiringChoice::Mercenary) => "The Mercenary ($150k, 9-5)",
            Self::Hiring(HiringChoice::Patriot) => "The Patriot (Mission-driven)",
            Self::Close(CloseChoice::Discount) => "\"I'll give you a discount.\"",
            Self::Close(CloseChoice::Reframe) => "\"Money aside, does it solve the problem?\"",
        }
    }

    /// Short name of the move, as sent to the consultant.
    #[must_use]
    pub const fn choice_label(self) -> &'static str {
        match self {
            Self::Positioning(PositioningChoice::PriceDrop) => "Price Drop",
            Self::Positioning(PositioningChoice::MoreFeatures) => "More Features",
            Self::Positioning(PositioningChoice::NicheDown) => "Niche Down",
            Self::DeployOffer => "Deploy Offer",
            Self::Messaging(MessagingChoice::Jargon) => "Corporate Jargon",
            Self::Messaging(MessagingChoice::OutcomePromise) => "Outcome Promise",
            Self::Content(ContentChoice::HardSell) => "Hard Sell",
            Self::Content(ContentChoice::InsiderGuide) => "Insider's Guide",
            Self::Hunt => "Run the Hunt",
            Self::Fortress(FortressChoice::Rolex) => "Buy a Rolex",
            Self::Fortress(FortressChoice::Reinvest) => "Reinvest in Ads",
            Self::Hiring(HiringChoice::Mercenary) => "Hire the Mercenary",
            Self::Hiring(HiringChoice::Patriot) => "Hire the Patriot",
            Self::Close(CloseChoice::Discount) => "Offer a Discount",
            Self::Close(CloseChoice::Reframe) => "Reframe the Value",
        }
    }

    /// Effects for decisions that do not depend on scratch inputs.
    #[must_use]
    pub const fn fixed_effects(self) -> Option<Effects> {
        let effects = match self {
            Self::DeployOffer | Self::Hunt => return None,
            Self::Positioning(PositioningChoice::PriceDrop) => Effects::new(-2_000, -15),
            Self::Positioning(PositioningChoice::MoreFeatures) => Effects::new(-4_000, 5),
            Self::Positioning(PositioningChoice::NicheDown) => Effects::new(0, 25),
            Self::Messaging(MessagingChoice::Jargon) => Effects::new(-1_500, -15),
            Self::Messaging(MessagingChoice::OutcomePromise) => Effects::new(4_000, 10),
            Self::Content(ContentChoice::HardSell) => Effects::new(-1_000, 0),
            Self::Content(ContentChoice::InsiderGuide) => Effects::new(3_000, 20),
            Self::Fortress(FortressChoice::Rolex) => Effects::new(-20_000, 20),
            Self::Fortress(FortressChoice::Reinvest) => Effects::new(-10_000, 10),
            Self::Hiring(HiringChoice::Mercenary) => Effects::new(-12_000, -5),
            Self::Hiring(HiringChoice::Patriot) => Effects::new(-6_000, 20),
            Self::Close(CloseChoice::Discount) => Effects::new(-10_000, -20),
            Self::Close(CloseChoice::Reframe) => Effects::new(40_000, 30),
        };
        Some(effects)
    }

    /// Evaluate the decision against the stage scratch inputs.
    ///
    /// # Errors
    ///
    /// Returns the hunt block reason when the energy allocation is over budget.
    pub fn resolve(
        self,
        offer: &ValueEquation,
        energy: &EnergyAllocation,
    ) -> Result<Resolution, HuntBlockReason> {
        let resolution = match self {
            Self::DeployOffer => {
                let result_label = if offer.is_irresistible() {
                    "Irresistible offer. Buyers line up."
                } else {
                    "Commodity offer. Nobody bites."
                };
                Resolution {
                    effects: offer.effects(),
                    result_label,
                }
            }
            Self::Hunt => {
                let effects = energy.effects()?;
                let result_label = if effects.cash >= 0 {
                    "Pipeline filled."
                } else {
                    "Ad spend ate the margin."
                };
                Resolution {
                    effects,
                    result_label,
                }
            }
            fixed => Resolution {
                effects: fixed.fixed_effects().unwrap_or_default(),
                result_label: fixed.fixed_result_label(),
            },
        };
        Ok(resolution)
    }

    const fn fixed_result_label(self) -> &'static str {
        match self {
            Self::Positioning(PositioningChoice::PriceDrop) => "Race to the bottom.",
            Self::Positioning(PositioningChoice::MoreFeatures) => "Complexity kills.",
            Self::Positioning(PositioningChoice::NicheDown) => "Blue Ocean Strategy.",
            Self::Messaging(MessagingChoice::Jargon) => "Nobody understood a word.",
            Self::Messaging(MessagingChoice::OutcomePromise) => "The outcome sold itself.",
            Self::Content(ContentChoice::HardSell) => "Ignored in the feed.",
            Self::Content(ContentChoice::InsiderGuide) => "Became the reference in the niche.",
            Self::Fortress(FortressChoice::Rolex) => "Bought a liability.",
            Self::Fortress(FortressChoice::Reinvest) => "Bought an asset.",
            Self::Hiring(HiringChoice::Mercenary) => "Paid for hours, not outcomes.",
            Self::Hiring(HiringChoice::Patriot) => "Hired for the mission.",
            Self::Close(CloseChoice::Discount) => "Trained the buyer to haggle.",
            Self::Close(CloseChoice::Reframe) => "Price stopped being the question.",
            Self::DeployOffer | Self::Hunt => "",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_fixed(decision: Decision) -> Effects {
        decision
            .resolve(&ValueEquation::default(), &EnergyAllocation::default())
            .expect("fixed decisions always resolve")
            .effects
    }

    #[test]
    fn every_decision_belongs_to_its_stage() {
        for stage in Stage::DECISIONS {
            let choices = choices_for(stage);
            assert!(!choices.is_empty(), "{stage} has no choices");
            assert!(choices.iter().all(|d| d.stage() == stage));
        }
        assert!(choices_for(Stage::Intro).is_empty());
        assert!(choices_for(Stage::Complete).is_empty());
    }

    #[test]
    fn fixed_table_matches_balance_sheet() {
        let table = [
            (Decision::Positioning(PositioningChoice::PriceDrop), (-2_000, -15)),
            (Decision::Positioning(PositioningChoice::MoreFeatures), (-4_000, 5)),
            (Decision::Positioning(PositioningChoice::NicheDown), (0, 25)),
            (Decision::Messaging(MessagingChoice::Jargon), (-1_500, -15)),
            (Decision::Messaging(MessagingChoice::OutcomePromise), (4_000, 10)),
            (Decision::Content(ContentChoice::HardSell), (-1_000, 0)),
            (Decision::Content(ContentChoice::InsiderGuide), (3_000, 20)),
            (Decision::Fortress(FortressChoice::Rolex), (-20_000, 20)),
            (Decision::Fortress(FortressChoice::Reinvest), (-10_000, 10)),
            (Decision::Hiring(HiringChoice::Mercenary), (-12_000, -5)),
            (Decision::Hiring(HiringChoice::Patriot), (-6_000, 20)),
            (Decision::Close(CloseChoice::Discount), (-10_000, -20)),
            (Decision::Close(CloseChoice::Reframe), (40_000, 30)),
        ];
        for (decision, (cash, brand)) in table {
            assert_eq!(resolve_fixed(decision), Effects::new(cash, brand), "{decision}");
        }
    }

    #[test]
    fn offer_and_hunt_depend_on_scratch() {
        assert!(Decision::DeployOffer.fixed_effects().is_none());
        assert!(Decision::Hunt.fixed_effects().is_none());

        let strong = ValueEquation::new(10, 10, 1, 1);
        let energy = EnergyAllocation::new(20, 10, 10, 10);
        let offer = Decision::DeployOffer.resolve(&strong, &energy).unwrap();
        assert_eq!(offer.effects, Effects::new(7_000, 15));

        let hunt = Decision::Hunt.resolve(&strong, &energy).unwrap();
        assert_eq!(hunt.effects, Effects::new(3_000, 10));
        assert_eq!(hunt.result_label, "Pipeline filled.");
    }

    #[test]
    fn over_budget_hunt_fails_to_resolve() {
        let energy = EnergyAllocation::new(30, 30, 30, 30);
        let err = Decision::Hunt
            .resolve(&ValueEquation::default(), &energy)
            .unwrap_err();
        assert_eq!(err, HuntBlockReason::OverBudget { total: 120 });
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<&str> = Stage::DECISIONS
            .iter()
            .flat_map(|stage| choices_for(*stage).iter().map(|d| d.key()))
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 15);
    }

    #[test]
    fn serializes_with_stage_tag() {
        let json =
            serde_json::to_string(&Decision::Close(CloseChoice::Reframe)).unwrap();
        assert_eq!(json, r#"{"stage":"close","choice":"reframe"}"#);
    }
}
