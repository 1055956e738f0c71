use std::sync::Arc;

use anyhow::Result;
use category_game::{
    GameState, GameStatus, ResultSummary, SessionEvent, Stage, StageSession, resolve_status,
};
use colored::Colorize;

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{DecisionRecord, SimulationConfig, SimulationSession, TurnOutcome};

/// Aggregated metrics captured for each simulation run.
#[derive(Debug, Clone, Default)]
pub struct PlayabilityMetrics {
    pub decisions_made: u32,
    pub final_stage: u8,
    pub final_cash: i64,
    pub final_brand: i64,
    pub peak_cash: i64,
    pub lowest_cash: i64,
    pub peak_brand: i64,
    pub ending_type: String,
    pub reached_close: bool,
    pub won: bool,
    pub bankrupt: bool,
    pub commoditized: bool,
    pub advisory_requests: usize,
    pub decision_log: Vec<DecisionRecord>,
}

impl PlayabilityMetrics {
    fn start(state: &GameState) -> Self {
        Self {
            final_stage: state.stage.index(),
            final_cash: state.cash,
            final_brand: state.brand,
            peak_cash: state.cash,
            lowest_cash: state.cash,
            peak_brand: state.brand,
            ending_type: "In Progress".to_string(),
            ..Self::default()
        }
    }

    fn record_turn(&mut self, turn: &TurnOutcome) {
        let Some(record) = &turn.decision else {
            return;
        };
        self.decisions_made += 1;
        self.peak_cash = self.peak_cash.max(record.cash_after);
        self.lowest_cash = self.lowest_cash.min(record.cash_after);
        self.peak_brand = self.peak_brand.max(record.brand_after);
        if turn.stage == Stage::Close {
            self.reached_close = true;
        }
        self.decision_log.push(record.clone());
    }

    fn finalize(
        &mut self,
        state: &GameState,
        summary: Option<&ResultSummary>,
        events: &[SessionEvent],
    ) {
        self.final_stage = state.stage.index();
        self.final_cash = state.cash;
        self.final_brand = state.brand;
        self.won = state.status == GameStatus::Won;
        self.bankrupt = state.status == GameStatus::Lost && state.cash <= 0;
        self.commoditized = state.status == GameStatus::Lost && state.cash > 0;
        self.ending_type = summary.map_or_else(
            || "In Progress".to_string(),
            |summary| summary.headline.clone(),
        );
        self.advisory_requests = events
            .iter()
            .filter(|event| event.feedback_request().is_some())
            .count();
    }
}

/// Everything needed to run and judge one automated playthrough.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub max_decisions: Option<u32>,
    pub setup: Option<fn(&mut StageSession)>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            max_decisions: None,
            setup: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_decisions(mut self, max_decisions: u32) -> Self {
        self.max_decisions = Some(max_decisions);
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut StageSession)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub turns: Vec<TurnOutcome>,
    pub metrics: PlayabilityMetrics,
    pub final_state: GameState,
    pub result: Option<ResultSummary>,
    pub events: Vec<SessionEvent>,
    pub ending_message: String,
    pub game_ended: bool,
}

/// Headless deterministic runner for the stage engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let mut config = SimulationConfig::new(plan.strategy, seed);
        if let Some(max) = plan.max_decisions {
            config = config.with_max_decisions(max);
        }
        let mut sim = SimulationSession::new(config);
        if let Some(setup) = plan.setup {
            setup(sim.session_mut());
        }

        if self.verbose {
            log_initial_state(seed, plan, sim.state());
        }

        let mut policy = plan.strategy.create_policy(seed);
        let mut metrics = PlayabilityMetrics::start(sim.state());
        let mut turns = Vec::new();
        while let Some(turn) = sim.step(policy.as_mut()) {
            if self.verbose {
                log_turn(&turn);
            }
            metrics.record_turn(&turn);
            turns.push(turn);
        }

        let (session, events) = sim.into_parts();
        let result = session.summary();
        let final_state = session.state().clone();
        metrics.finalize(&final_state, result.as_ref(), &events);
        let game_ended = result.is_some();
        let ending_message = result.as_ref().map_or_else(
            || format!("Stopped on stage {}", final_state.stage.index()),
            |summary| format!("{}: {}", summary.headline, summary.epilogue),
        );

        SimulationSummary {
            seed,
            strategy: plan.strategy,
            turns,
            metrics,
            final_state,
            result,
            events,
            ending_message,
            game_ended,
        }
    }
}

fn log_initial_state(seed: u64, plan: &SimulationPlan, state: &GameState) {
    println!(
        "  {} seed {} strategy {} | cash {} brand {} stage {}",
        "▶".cyan(),
        seed,
        plan.strategy.label(),
        state.cash,
        state.brand,
        state.stage.index()
    );
}

fn log_turn(turn: &TurnOutcome) {
    match (&turn.decision, &turn.rejection) {
        (Some(record), _) => println!(
            "    sector {} {} -> {} | cash {} brand {}",
            record.stage,
            record.choice_label,
            record.result_label.dimmed(),
            record.cash_after,
            record.brand_after
        ),
        (None, Some(err)) => println!("    sector {} rejected: {}", turn.stage.index(), err),
        (None, None) => {}
    }
}

/// Checks every run must pass regardless of strategy.
pub fn engine_invariants(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    anyhow::ensure!(
        state.stage.index() <= 9,
        "stage index {} exceeds 9",
        state.stage.index()
    );
    anyhow::ensure!(
        state.logs.len() <= category_game::constants::LOG_CAPACITY,
        "log book holds {} entries",
        state.logs.len()
    );
    let mut previous: u8 = 1;
    for turn in &summary.turns {
        let Some(record) = &turn.decision else {
            continue;
        };
        anyhow::ensure!(
            record.stage == previous,
            "decision on stage {} followed stage {}",
            record.stage,
            previous.saturating_sub(1)
        );
        let expected = resolve_status(record.cash_after, record.brand_after, turn.stage);
        anyhow::ensure!(
            expected == turn.status,
            "stage {} reported {} but resources resolve to {}",
            record.stage,
            turn.status,
            expected
        );
        previous += 1;
    }
    if state.status.is_terminal() {
        anyhow::ensure!(
            summary.result.is_some(),
            "terminal run produced no result summary"
        );
    }
    Ok(())
}
