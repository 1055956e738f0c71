use crate::logic::{GameplayStrategy, SimulationPlan};

pub mod catalog;
pub mod full_game;
pub mod smoke;

use catalog::find_catalog_scenario;

/// A named simulation plan the logic tester can run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke::smoke_scenario()),

        "full-game-category-king" | "category-king" | "king" => Some(
            full_game::full_game_scenario(GameplayStrategy::CategoryKing),
        ),
        "full-game-commodity" | "commodity" => {
            Some(full_game::full_game_scenario(GameplayStrategy::Commodity))
        }
        "full-game-cautious" | "cautious" => {
            Some(full_game::full_game_scenario(GameplayStrategy::Cautious))
        }
        "full-game-brand-first" | "brand-first" => {
            Some(full_game::full_game_scenario(GameplayStrategy::BrandFirst))
        }
        "full-game-random-walk" | "random-walk" | "random" => {
            Some(full_game::full_game_scenario(GameplayStrategy::RandomWalk))
        }
        "close-win" | "win" => Some(full_game::close_win_scenario()),

        // Engine checks
        "value-equation" | "offer" => find_catalog_scenario("Value Equation Scoring"),
        "hunt-budget" | "hunt" => find_catalog_scenario("Hunt Budget Gate"),
        "stage-mismatch" | "mismatch" => find_catalog_scenario("Stage Mismatch Rejection"),
        "log-capacity" | "logs" => find_catalog_scenario("Log Book Capacity"),
        "terminal-freeze" | "terminal" => find_catalog_scenario("Terminal Freeze"),
        "session-reset" | "reset" => find_catalog_scenario("Session Reset"),
        "stale-replies" | "advisory" => find_catalog_scenario("Stale Advisory Replies"),
        "deterministic" | "deterministic-verification" => {
            find_catalog_scenario("Deterministic Playthrough Verification")
        }
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("full-game-category-king", "Full Game - Category King"),
        ("full-game-commodity", "Full Game - Commodity"),
        ("full-game-cautious", "Full Game - Cautious"),
        ("full-game-brand-first", "Full Game - Brand First"),
        ("full-game-random-walk", "Full Game - Random Walk"),
        ("close-win", "Close With Seed Capital"),
        ("value-equation", "Value Equation Scoring"),
        ("hunt-budget", "Hunt Budget Gate"),
        ("stage-mismatch", "Stage Mismatch Rejection"),
        ("log-capacity", "Log Book Capacity"),
        ("terminal-freeze", "Terminal Freeze"),
        ("session-reset", "Session Reset"),
        ("stale-replies", "Stale Advisory Replies"),
        ("deterministic", "Deterministic Playthrough Verification"),
    ]
}
