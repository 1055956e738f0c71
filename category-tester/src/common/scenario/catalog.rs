use anyhow::{Result, anyhow};

use super::TestScenario;
use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GameTester, GameplayStrategy, SimulationPlan};
use category_game::{
    CloseChoice, ContentChoice, Decision, DecisionError, Effects, EnergyAllocation, GameStatus,
    LogKind, MessagingChoice, PositioningChoice, Stage, StageSession, ValueEquation, constants,
};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Value Equation Scoring",
            base_plan().with_expectation(value_equation_expectation),
        ),
        TestScenario::simulation(
            "Hunt Budget Gate",
            base_plan().with_expectation(hunt_budget_expectation),
        ),
        TestScenario::simulation(
            "Stage Mismatch Rejection",
            base_plan().with_expectation(stage_mismatch_expectation),
        ),
        TestScenario::simulation(
            "Log Book Capacity",
            base_plan().with_expectation(log_capacity_expectation),
        ),
        TestScenario::simulation(
            "Terminal Freeze",
            base_plan().with_expectation(terminal_freeze_expectation),
        ),
        TestScenario::simulation(
            "Session Reset",
            base_plan().with_expectation(session_reset_expectation),
        ),
        TestScenario::simulation(
            "Stale Advisory Replies",
            base_plan().with_expectation(stale_reply_expectation),
        ),
        TestScenario::simulation(
            "Deterministic Playthrough Verification",
            SimulationPlan::new(GameplayStrategy::RandomWalk)
                .with_expectation(deterministic_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn base_plan() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Cautious).with_max_decisions(0)
}

fn started() -> StageSession {
    let mut session = StageSession::new();
    session.start_session();
    session
}

/// Play the first four sectors with their strongest fixed choices and an
/// untuned offer, leaving the session on the hunt.
fn walk_to_hunt() -> Result<StageSession> {
    let mut session = started();
    for decision in [
        Decision::Positioning(PositioningChoice::NicheDown),
        Decision::DeployOffer,
        Decision::Messaging(MessagingChoice::OutcomePromise),
        Decision::Content(ContentChoice::InsiderGuide),
    ] {
        session
            .decide(decision)
            .map_err(|err| anyhow!("{} rejected: {err}", decision.key()))?;
    }
    anyhow::ensure!(
        session.stage() == Stage::Hunt,
        "Walk should stop on the hunt, got stage {}",
        session.stage().index()
    );
    Ok(session)
}

fn value_equation_expectation(_summary: &SimulationSummary) -> Result<()> {
    let strong = ValueEquation::new(10, 10, 1, 1);
    anyhow::ensure!(
        (strong.score() - 100.0).abs() < f64::EPSILON,
        "Score for 10,10,1,1 should be 100, got {}",
        strong.score()
    );
    anyhow::ensure!(
        strong.effects() == Effects::new(constants::OFFER_HIT_CASH, constants::OFFER_HIT_BRAND),
        "Irresistible offer should pay the hit effects"
    );

    let default = ValueEquation::default();
    anyhow::ensure!(
        !default.is_irresistible(),
        "Default sliders should not clear the threshold (score {})",
        default.score()
    );

    let threshold = ValueEquation::new(5, 5, 5, 1);
    anyhow::ensure!(
        threshold.is_irresistible(),
        "A score of exactly 5 should count as irresistible"
    );

    let clamped = ValueEquation::new(0, 11, 0, 200);
    anyhow::ensure!(
        (clamped.dream(), clamped.likelihood(), clamped.time_delay(), clamped.effort())
            == (1, 10, 1, 10),
        "Sliders should clamp into 1..=10, got {clamped:?}"
    );
    Ok(())
}

fn hunt_budget_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = walk_to_hunt()?;
    let before = session.state().clone();

    *session.energy_mut() = EnergyAllocation::new(50, 50, 50, 0);
    match session.decide(Decision::Hunt) {
        Err(DecisionError::EnergyOverBudget { total: 150 }) => {}
        other => anyhow::bail!("Over-budget hunt should be refused, got {other:?}"),
    }
    anyhow::ensure!(
        session.state() == &before,
        "A refused hunt must not touch the run"
    );

    *session.energy_mut() = EnergyAllocation::default();
    let outcome = session
        .decide(Decision::Hunt)
        .map_err(|err| anyhow!("default hunt rejected: {err}"))?;
    anyhow::ensure!(
        outcome.effects == Effects::new(5_000, constants::HUNT_BRAND_GAIN),
        "Default split should hunt for 5000 cash, got {:?}",
        outcome.effects
    );
    anyhow::ensure!(
        session.stage() == Stage::Fortress,
        "Hunt should advance to the fortress"
    );
    Ok(())
}

fn stage_mismatch_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = StageSession::new();
    anyhow::ensure!(
        session.decide(Decision::Positioning(PositioningChoice::NicheDown))
            == Err(DecisionError::NotStarted),
        "Deciding on the intro should be refused"
    );

    let mut session_started = started();
    let result = session_started.decide(Decision::Close(CloseChoice::Reframe));
    anyhow::ensure!(
        result
            == Err(DecisionError::StageMismatch {
                expected: Stage::Close,
                actual: Stage::Positioning,
            }),
        "Out-of-stage decision should be refused, got {result:?}"
    );
    anyhow::ensure!(
        session_started.state().cash == constants::STARTING_CASH,
        "Refused decision must not move cash"
    );
    Ok(())
}

fn log_capacity_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = started();
    for i in 0..75 {
        session.append_log(format!("entry {i}"), LogKind::Info);
    }
    let logs = &session.state().logs;
    anyhow::ensure!(
        logs.len() == constants::LOG_CAPACITY,
        "Log book should cap at {}, holds {}",
        constants::LOG_CAPACITY,
        logs.len()
    );
    anyhow::ensure!(
        logs.latest().map(|entry| entry.message.as_str()) == Some("entry 74"),
        "Newest entry should lead the log"
    );
    anyhow::ensure!(
        !logs.contains_message("SIMULATION STARTED"),
        "Oldest entries should be evicted first"
    );
    Ok(())
}

fn terminal_freeze_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = started();
    session.apply_choice(-20_000, 0);
    anyhow::ensure!(
        session.status() == GameStatus::Lost,
        "Negative cash should lose the run"
    );
    let frozen = session.state().clone();

    anyhow::ensure!(
        !session.apply_choice(50_000, 50),
        "Resource updates after a loss should be refused"
    );
    anyhow::ensure!(
        !session.advance_stage(),
        "Stage advances after a loss should be refused"
    );
    let result = session.decide(Decision::Positioning(PositioningChoice::NicheDown));
    anyhow::ensure!(
        result == Err(DecisionError::NotPlaying(GameStatus::Lost)),
        "Decisions after a loss should be refused, got {result:?}"
    );
    anyhow::ensure!(
        session.state() == &frozen,
        "Terminal state should stay frozen"
    );
    Ok(())
}

fn session_reset_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = started();
    session
        .decide(Decision::Positioning(PositioningChoice::PriceDrop))
        .map_err(|err| anyhow!("price drop rejected: {err}"))?;
    session.reset_session();

    let state = session.state();
    anyhow::ensure!(state.stage == Stage::Intro, "Reset should return to the intro");
    anyhow::ensure!(
        state.cash == constants::STARTING_CASH && state.brand == constants::STARTING_BRAND,
        "Reset should restore starting resources"
    );
    anyhow::ensure!(state.logs.is_empty(), "Reset should clear the log book");
    anyhow::ensure!(session.epoch() == 1, "Reset should bump the epoch");

    anyhow::ensure!(session.start_session(), "A reset session should start again");
    let outcome = session
        .decide(Decision::Positioning(PositioningChoice::NicheDown))
        .map_err(|err| anyhow!("niche down rejected: {err}"))?;
    anyhow::ensure!(
        outcome.ticket.epoch == 1 && outcome.ticket.sequence == 1,
        "First ticket after reset should be epoch 1 sequence 1, got {:?}",
        outcome.ticket
    );
    Ok(())
}

fn stale_reply_expectation(_summary: &SimulationSummary) -> Result<()> {
    let mut session = started();
    let first = session
        .decide(Decision::Positioning(PositioningChoice::NicheDown))
        .map_err(|err| anyhow!("niche down rejected: {err}"))?
        .ticket;
    let second = session
        .decide(Decision::DeployOffer)
        .map_err(|err| anyhow!("offer rejected: {err}"))?
        .ticket;

    anyhow::ensure!(
        !session.deliver_feedback(first, "late advice"),
        "Reply to a superseded decision should be dropped"
    );
    anyhow::ensure!(
        session.consultant().is_thinking(),
        "Consultant should still wait on the newest decision"
    );
    anyhow::ensure!(
        session.deliver_feedback(second, "fresh advice"),
        "Reply to the newest decision should land"
    );
    anyhow::ensure!(
        session.consultant().message() == "fresh advice",
        "Consultant should show the delivered advice"
    );

    let pending = session
        .decide(Decision::Messaging(MessagingChoice::Jargon))
        .map_err(|err| anyhow!("jargon rejected: {err}"))?
        .ticket;
    session.reset_session();
    anyhow::ensure!(
        !session.deliver_feedback(pending, "advice from a dead run"),
        "Replies from before a reset should be dropped"
    );
    Ok(())
}

fn deterministic_expectation(summary: &SimulationSummary) -> Result<()> {
    let plan = SimulationPlan::new(summary.strategy);
    let replay = GameTester::new(false).run_plan(&plan, summary.seed);

    anyhow::ensure!(
        replay.final_state.cash == summary.final_state.cash
            && replay.final_state.brand == summary.final_state.brand
            && replay.final_state.stage == summary.final_state.stage
            && replay.final_state.status == summary.final_state.status,
        "Replay of seed {} diverged: {}/{} vs {}/{}",
        summary.seed,
        replay.final_state.cash,
        replay.final_state.brand,
        summary.final_state.cash,
        summary.final_state.brand
    );
    let keys = |s: &SimulationSummary| {
        s.metrics
            .decision_log
            .iter()
            .map(|record| record.decision_key.clone())
            .collect::<Vec<_>>()
    };
    anyhow::ensure!(
        keys(&replay) == keys(summary),
        "Replay of seed {} chose different decisions",
        summary.seed
    );
    Ok(())
}
