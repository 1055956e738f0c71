use anyhow::Result;

use super::TestScenario;
use crate::logic::game_tester::{SimulationExpectation, SimulationSummary, engine_invariants};
use crate::logic::{GameplayStrategy, SimulationPlan};
use category_game::{Ending, GameStatus, StageSession};

/// Seed capital injected by the close-win scenario before the first sector.
const SEED_CAPITAL: i64 = 60_000;

pub fn full_game_scenario(strategy: GameplayStrategy) -> TestScenario {
    TestScenario::simulation(
        format!("Full Game - {strategy}"),
        full_game_plan(strategy).with_expectation(full_game_expectation(strategy)),
    )
}

pub fn close_win_scenario() -> TestScenario {
    TestScenario::simulation(
        "Close With Seed Capital",
        full_game_plan(GameplayStrategy::CategoryKing)
            .with_setup(inject_seed_capital)
            .with_expectation(engine_invariants)
            .with_expectation(close_win_expectation),
    )
}

pub fn full_game_plan(strategy: GameplayStrategy) -> SimulationPlan {
    SimulationPlan::new(strategy)
}

/// Engine checks plus the outcome each built-in strategy is known to reach.
pub fn full_game_expectation(strategy: GameplayStrategy) -> SimulationExpectation {
    SimulationExpectation::from(move |summary: &SimulationSummary| {
        engine_invariants(summary)?;
        ensure_basic_progress(summary)?;
        match strategy {
            GameplayStrategy::CategoryKing => category_king_expectation(summary),
            GameplayStrategy::Commodity => commodity_expectation(summary),
            GameplayStrategy::Cautious => cautious_expectation(summary),
            GameplayStrategy::BrandFirst => brand_first_expectation(summary),
            GameplayStrategy::RandomWalk => Ok(()),
        }
    })
}

fn inject_seed_capital(session: &mut StageSession) {
    session.apply_choice(SEED_CAPITAL, 0);
}

fn ensure_basic_progress(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(!summary.turns.is_empty(), "Simulation produced no turns");
    anyhow::ensure!(
        summary.turns.iter().all(|turn| turn.rejection.is_none()),
        "Policy made a decision the engine rejected"
    );
    anyhow::ensure!(
        summary.game_ended,
        "Full game should end, stopped on stage {}",
        summary.final_state.stage.index()
    );
    anyhow::ensure!(
        summary.metrics.advisory_requests == summary.turns.len(),
        "Expected one advisory request per decision, saw {} for {} turns",
        summary.metrics.advisory_requests,
        summary.turns.len()
    );
    Ok(())
}

fn ensure_survived(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.metrics.final_stage == 9 && summary.final_state.status == GameStatus::Playing,
        "Run should reach the debrief, ended {} on stage {}",
        summary.final_state.status,
        summary.metrics.final_stage
    );
    anyhow::ensure!(
        summary.result.as_ref().map(|r| r.ending) == Some(Ending::Survivor),
        "Surviving without the win should classify as a survivor"
    );
    Ok(())
}

fn category_king_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure_survived(summary)?;
    let metrics = &summary.metrics;
    anyhow::ensure!(
        metrics.final_cash == 58_000 && metrics.final_brand == 140,
        "Category King line should close at 58000/140, got {}/{}",
        metrics.final_cash,
        metrics.final_brand
    );
    anyhow::ensure!(
        metrics.lowest_cash >= 10_000,
        "Category King line dipped to {}",
        metrics.lowest_cash
    );
    Ok(())
}

fn commodity_expectation(summary: &SimulationSummary) -> Result<()> {
    let metrics = &summary.metrics;
    anyhow::ensure!(
        metrics.bankrupt,
        "Commodity line should go bankrupt, ended {}",
        metrics.ending_type
    );
    anyhow::ensure!(
        !metrics.reached_close,
        "Commodity line should never reach the close"
    );
    anyhow::ensure!(
        metrics.final_stage == 5,
        "Commodity line should fail in the hunt, failed on stage {}",
        metrics.final_stage
    );
    Ok(())
}

fn cautious_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure_survived(summary)?;
    anyhow::ensure!(
        summary.metrics.lowest_cash > 0,
        "Cautious line should never touch zero, low was {}",
        summary.metrics.lowest_cash
    );
    Ok(())
}

fn brand_first_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure_survived(summary)?;
    anyhow::ensure!(
        summary.metrics.final_brand >= 150,
        "Brand First line should finish with brand 150 or more, got {}",
        summary.metrics.final_brand
    );
    Ok(())
}

fn close_win_expectation(summary: &SimulationSummary) -> Result<()> {
    let metrics = &summary.metrics;
    anyhow::ensure!(
        metrics.won,
        "Seed capital should carry the close, ended {} with {}/{}",
        summary.final_state.status,
        metrics.final_cash,
        metrics.final_brand
    );
    anyhow::ensure!(
        metrics.final_stage == 8,
        "A won run freezes on the close, found stage {}",
        metrics.final_stage
    );
    anyhow::ensure!(
        metrics.ending_type == "CATEGORY KING",
        "Unexpected ending {}",
        metrics.ending_type
    );
    Ok(())
}
