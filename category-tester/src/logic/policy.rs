use std::fmt;

use category_game::{
    Decision, Effects, EnergyAllocation, FortressChoice, Stage, StageSession, ValueEquation,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub decision: Decision,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(decision: Decision, rationale: Option<String>) -> Self {
        Self {
            decision,
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Set the value-equation sliders before the offer is deployed.
    fn tune_offer(&mut self, _offer: &mut ValueEquation) {}

    /// Split hunt energy before the hunt runs.
    fn allocate_energy(&mut self, _energy: &mut EnergyAllocation) {}

    /// Select one of `choices` for the session's current stage.
    fn pick_decision(&mut self, session: &StageSession, choices: &[Decision]) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    /// Plays every sector the way the curriculum teaches.
    CategoryKing,
    /// Takes the commodity move everywhere.
    Commodity,
    /// Protects the runway: highest cash outcome, untuned sliders.
    Cautious,
    /// Chases brand at any price.
    BrandFirst,
    /// Seeded random play.
    RandomWalk,
}

impl GameplayStrategy {
    pub const ALL: [Self; 5] = [
        Self::CategoryKing,
        Self::Commodity,
        Self::Cautious,
        Self::BrandFirst,
        Self::RandomWalk,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CategoryKing => "Category King",
            Self::Commodity => "Commodity",
            Self::Cautious => "Cautious",
            Self::BrandFirst => "Brand First",
            Self::RandomWalk => "Random Walk",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::CategoryKing => Box::new(CategoryKingPolicy),
            Self::Commodity => Box::new(CommodityPolicy),
            Self::Cautious => Box::new(CautiousPolicy),
            Self::BrandFirst => Box::new(BrandFirstPolicy),
            Self::RandomWalk => Box::new(RandomWalkPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CategoryKingPolicy;
struct CommodityPolicy;
struct CautiousPolicy;
struct BrandFirstPolicy;

struct RandomWalkPolicy {
    rng: ChaCha20Rng,
}

impl RandomWalkPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Effects `decision` would have with the session's current sliders.
fn preview(session: &StageSession, decision: Decision) -> Option<Effects> {
    decision
        .resolve(session.offer(), session.energy())
        .ok()
        .map(|resolution| resolution.effects)
}

fn best_by<K: Ord>(
    session: &StageSession,
    choices: &[Decision],
    key: impl Fn(Effects) -> K,
) -> Option<(Decision, Effects)> {
    choices
        .iter()
        .filter_map(|&decision| preview(session, decision).map(|effects| (decision, effects)))
        .max_by_key(|(_, effects)| key(*effects))
}

fn fallback_pick(choices: &[Decision]) -> PolicyDecision {
    let decision = choices.first().copied().unwrap_or(Decision::Hunt);
    PolicyDecision::new(decision, Some("no previewable choice".to_string()))
}

impl PlayerPolicy for CategoryKingPolicy {
    fn name(&self) -> &'static str {
        "CategoryKing"
    }

    fn tune_offer(&mut self, offer: &mut ValueEquation) {
        *offer = ValueEquation::new(10, 10, 1, 1);
    }

    fn allocate_energy(&mut self, energy: &mut EnergyAllocation) {
        *energy = EnergyAllocation::new(40, 30, 30, 0);
    }

    fn pick_decision(&mut self, session: &StageSession, choices: &[Decision]) -> PolicyDecision {
        // One brand point is worth 500 cash.
        best_by(session, choices, |effects| {
            effects.cash.saturating_add(effects.brand.saturating_mul(500))
        })
        .map_or_else(
            || fallback_pick(choices),
            |(decision, effects)| {
                PolicyDecision::new(
                    decision,
                    Some(format!("value {:+}/{:+}", effects.cash, effects.brand)),
                )
            },
        )
    }
}

impl PlayerPolicy for CommodityPolicy {
    fn name(&self) -> &'static str {
        "Commodity"
    }

    fn allocate_energy(&mut self, energy: &mut EnergyAllocation) {
        *energy = EnergyAllocation::new(0, 0, 0, 100);
    }

    fn pick_decision(&mut self, session: &StageSession, choices: &[Decision]) -> PolicyDecision {
        let pick = match session.stage() {
            Stage::Fortress => choices
                .iter()
                .copied()
                .find(|decision| *decision == Decision::Fortress(FortressChoice::Rolex)),
            _ => choices.first().copied(),
        };
        pick.map_or_else(
            || fallback_pick(choices),
            |decision| PolicyDecision::new(decision, Some("the obvious move".to_string())),
        )
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_decision(&mut self, session: &StageSession, choices: &[Decision]) -> PolicyDecision {
        best_by(session, choices, |effects| (effects.cash, effects.brand)).map_or_else(
            || fallback_pick(choices),
            |(decision, effects)| {
                PolicyDecision::new(decision, Some(format!("cash {:+}", effects.cash)))
            },
        )
    }
}

impl PlayerPolicy for BrandFirstPolicy {
    fn name(&self) -> &'static str {
        "BrandFirst"
    }

    fn tune_offer(&mut self, offer: &mut ValueEquation) {
        *offer = ValueEquation::new(10, 10, 1, 1);
    }

    fn allocate_energy(&mut self, energy: &mut EnergyAllocation) {
        *energy = EnergyAllocation::new(0, 0, 100, 0);
    }

    fn pick_decision(&mut self, session: &StageSession, choices: &[Decision]) -> PolicyDecision {
        best_by(session, choices, |effects| (effects.brand, effects.cash)).map_or_else(
            || fallback_pick(choices),
            |(decision, effects)| {
                PolicyDecision::new(decision, Some(format!("brand {:+}", effects.brand)))
            },
        )
    }
}

impl PlayerPolicy for RandomWalkPolicy {
    fn name(&self) -> &'static str {
        "RandomWalk"
    }

    fn tune_offer(&mut self, offer: &mut ValueEquation) {
        *offer = ValueEquation::new(
            self.rng.gen_range(1..=10),
            self.rng.gen_range(1..=10),
            self.rng.gen_range(1..=10),
            self.rng.gen_range(1..=10),
        );
    }

    fn allocate_energy(&mut self, energy: &mut EnergyAllocation) {
        let warm = self.rng.gen_range(0..=100);
        let cold = self.rng.gen_range(0..=100 - warm);
        let content = self.rng.gen_range(0..=100 - warm - cold);
        let ads = 100 - warm - cold - content;
        *energy = EnergyAllocation::new(warm, cold, content, ads);
    }

    fn pick_decision(&mut self, _session: &StageSession, choices: &[Decision]) -> PolicyDecision {
        if choices.is_empty() {
            return fallback_pick(choices);
        }
        let idx = self.rng.gen_range(0..choices.len());
        PolicyDecision::new(choices[idx], Some(format!("roll {idx}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use category_game::{EnergyChannel, PositioningChoice, choices_for};

    fn started() -> StageSession {
        let mut session = StageSession::new();
        session.start_session();
        session
    }

    #[test]
    fn category_king_niches_down() {
        let session = started();
        let mut policy = GameplayStrategy::CategoryKing.create_policy(1);
        let pick = policy.pick_decision(&session, choices_for(session.stage()));
        assert_eq!(
            pick.decision,
            Decision::Positioning(PositioningChoice::NicheDown)
        );
    }

    #[test]
    fn commodity_drops_price() {
        let session = started();
        let mut policy = GameplayStrategy::Commodity.create_policy(1);
        let pick = policy.pick_decision(&session, choices_for(session.stage()));
        assert_eq!(
            pick.decision,
            Decision::Positioning(PositioningChoice::PriceDrop)
        );
    }

    #[test]
    fn random_walk_energy_stays_within_budget() {
        let mut policy = RandomWalkPolicy::new(99);
        for _ in 0..200 {
            let mut energy = EnergyAllocation::default();
            policy.allocate_energy(&mut energy);
            assert_eq!(energy.total(), 100);
            assert!(energy.can_hunt());
            assert!(
                EnergyChannel::ALL
                    .iter()
                    .all(|channel| energy.get(*channel) >= 0)
            );
        }
    }

    #[test]
    fn random_walk_is_seed_deterministic() {
        let session = started();
        let choices = choices_for(session.stage());
        let mut a = GameplayStrategy::RandomWalk.create_policy(7);
        let mut b = GameplayStrategy::RandomWalk.create_policy(7);
        for _ in 0..10 {
            assert_eq!(
                a.pick_decision(&session, choices).decision,
                b.pick_decision(&session, choices).decision
            );
        }
    }
}
