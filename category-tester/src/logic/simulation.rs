use category_game::{
    DecisionError, GameState, GameStatus, SessionEvent, Stage, StageSession, choices_for,
};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub max_decisions: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_decisions: u32::MAX,
        }
    }

    #[must_use]
    pub const fn with_max_decisions(mut self, max_decisions: u32) -> Self {
        self.max_decisions = max_decisions;
        self
    }
}

/// Snapshot of a resolved decision.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub stage: u8,
    pub decision_key: String,
    pub choice_label: String,
    pub result_label: String,
    pub policy_name: String,
    pub rationale: Option<String>,
    pub cash_after: i64,
    pub brand_after: i64,
}

/// Result of one policy turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub stage: Stage,
    pub decision: Option<DecisionRecord>,
    pub rejection: Option<DecisionError>,
    pub status: GameStatus,
    pub game_ended: bool,
}

/// Drives a [`StageSession`] with a player policy, one sector per turn.
pub struct SimulationSession {
    session: StageSession,
    config: SimulationConfig,
    decisions: u32,
    events: Vec<SessionEvent>,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let mut session = StageSession::new();
        session.start_session();
        Self {
            session,
            config,
            decisions: 0,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.session.state()
    }

    #[must_use]
    pub const fn session(&self) -> &StageSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut StageSession {
        &mut self.session
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.session.state().is_playing()
            || self.session.stage() == Stage::Complete
            || self.decisions >= self.config.max_decisions
    }

    /// Play the current sector with `policy`. Returns `None` once the run is
    /// over or the decision budget is spent.
    pub fn step(&mut self, policy: &mut (dyn PlayerPolicy + Send)) -> Option<TurnOutcome> {
        if self.is_finished() {
            return None;
        }
        let stage = self.session.stage();
        match stage {
            Stage::Offer => policy.tune_offer(self.session.offer_mut()),
            Stage::Hunt => policy.allocate_energy(self.session.energy_mut()),
            _ => {}
        }

        let choices = choices_for(stage);
        let PolicyDecision {
            decision,
            rationale,
        } = policy.pick_decision(&self.session, choices);
        self.decisions = self.decisions.saturating_add(1);

        let turn = match self.session.decide(decision) {
            Ok(outcome) => {
                let state = self.session.state();
                TurnOutcome {
                    stage,
                    decision: Some(DecisionRecord {
                        stage: stage.index(),
                        decision_key: decision.key().to_string(),
                        choice_label: decision.choice_label().to_string(),
                        result_label: outcome.result_label.to_string(),
                        policy_name: policy.name().to_string(),
                        rationale,
                        cash_after: state.cash,
                        brand_after: state.brand,
                    }),
                    rejection: None,
                    status: outcome.status,
                    game_ended: outcome.status.is_terminal() || state.stage == Stage::Complete,
                }
            }
            Err(err) => {
                log::warn!(
                    "{} policy decision {} rejected on stage {}: {err}",
                    policy.name(),
                    decision.key(),
                    stage.index()
                );
                // A rejected decision leaves the stage unchanged; stop rather
                // than loop on it.
                self.config.max_decisions = self.decisions;
                TurnOutcome {
                    stage,
                    decision: None,
                    rejection: Some(err),
                    status: self.session.status(),
                    game_ended: false,
                }
            }
        };
        self.events.extend(self.session.drain_events());
        Some(turn)
    }

    /// Every session event seen so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_parts(mut self) -> (StageSession, Vec<SessionEvent>) {
        self.events.extend(self.session.drain_events());
        (self.session, self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(strategy: GameplayStrategy, seed: u64) -> (SimulationSession, Vec<TurnOutcome>) {
        let mut sim = SimulationSession::new(SimulationConfig::new(strategy, seed));
        let mut policy = strategy.create_policy(seed);
        let mut turns = Vec::new();
        while let Some(turn) = sim.step(policy.as_mut()) {
            turns.push(turn);
        }
        (sim, turns)
    }

    #[test]
    fn category_king_reaches_the_debrief() {
        let (sim, turns) = play(GameplayStrategy::CategoryKing, 1);
        assert_eq!(turns.len(), 8);
        assert_eq!(sim.state().stage, Stage::Complete);
        assert_eq!(sim.state().cash, 58_000);
        assert_eq!(sim.state().brand, 140);
        assert!(turns.last().is_some_and(|turn| turn.game_ended));
    }

    #[test]
    fn commodity_goes_bankrupt_in_the_hunt() {
        let (sim, turns) = play(GameplayStrategy::Commodity, 1);
        assert_eq!(turns.len(), 5);
        assert_eq!(sim.state().status, GameStatus::Lost);
        assert_eq!(sim.state().stage, Stage::Hunt);
        assert_eq!(sim.state().cash, -7_500);
    }

    #[test]
    fn decision_budget_stops_early() {
        let mut sim = SimulationSession::new(
            SimulationConfig::new(GameplayStrategy::Cautious, 3).with_max_decisions(2),
        );
        let mut policy = GameplayStrategy::Cautious.create_policy(3);
        let mut steps = 0;
        while sim.step(policy.as_mut()).is_some() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(sim.state().stage, Stage::Messaging);
        let (_, events) = sim.into_parts();
        assert!(matches!(
            events.first(),
            Some(SessionEvent::SessionStarted { .. })
        ));
    }

    #[test]
    fn random_walk_runs_terminate() {
        for seed in 0..25 {
            let (sim, turns) = play(GameplayStrategy::RandomWalk, seed);
            assert!(turns.len() <= 8);
            assert!(sim.is_finished());
            assert!(turns.iter().all(|turn| turn.rejection.is_none()));
        }
    }
}
