use anyhow::Result;

use super::TestScenario;
use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GameplayStrategy, SimulationPlan};
use category_game::{GameStatus, SessionEvent, Stage, constants};

pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation("Smoke Test", plan())
}

fn plan() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Cautious)
        .with_max_decisions(0)
        .with_expectation(smoke_expectation)
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;

    anyhow::ensure!(
        state.stage == Stage::Positioning,
        "Session should open on Positioning, got stage {}",
        state.stage.index()
    );
    anyhow::ensure!(
        state.cash == constants::STARTING_CASH,
        "Starting cash should be {}, got {}",
        constants::STARTING_CASH,
        state.cash
    );
    anyhow::ensure!(
        state.brand == constants::STARTING_BRAND,
        "Starting brand should be {}, got {}",
        constants::STARTING_BRAND,
        state.brand
    );
    anyhow::ensure!(
        state.status == GameStatus::Playing,
        "Fresh session should be playing, got {}",
        state.status
    );
    anyhow::ensure!(
        state.logs.len() == 1,
        "Start should write exactly one log entry, found {}",
        state.logs.len()
    );
    anyhow::ensure!(
        matches!(
            summary.events.first(),
            Some(SessionEvent::SessionStarted { .. })
        ),
        "Start should emit a SessionStarted event"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;

    fn base_summary() -> SimulationSummary {
        GameTester::new(false).run_plan(&plan(), 1)
    }

    #[test]
    fn smoke_plan_sets_expectations() {
        let plan = plan();
        assert_eq!(plan.strategy, GameplayStrategy::Cautious);
        assert_eq!(plan.max_decisions, Some(0));
        assert_eq!(plan.expectations.len(), 1);
    }

    #[test]
    fn smoke_expectation_accepts_fresh_session() {
        smoke_expectation(&base_summary()).expect("smoke ok");
    }

    #[test]
    fn smoke_expectation_rejects_wrong_stage() {
        let mut summary = base_summary();
        summary.final_state.stage = Stage::Intro;
        let err = smoke_expectation(&summary).expect_err("intro should fail");
        assert!(err.to_string().contains("Positioning"));
    }

    #[test]
    fn smoke_expectation_rejects_spent_cash() {
        let mut summary = base_summary();
        summary.final_state.cash = 9_000;
        let err = smoke_expectation(&summary).expect_err("cash should fail");
        assert!(err.to_string().contains("Starting cash"));
    }

    #[test]
    fn smoke_expectation_requires_start_event() {
        let mut summary = base_summary();
        summary.events.clear();
        let err = smoke_expectation(&summary).expect_err("missing event should fail");
        assert!(err.to_string().contains("SessionStarted"));
    }
}
