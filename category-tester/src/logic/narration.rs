//! Narrated playthrough: one automated run with the consultant answering
//! every decision through the advisory dispatcher.

use anyhow::Result;
use category_advisor::{
    Advisor, AdvisorConfig, AdvisoryDispatcher, FallbackAdvisor, build_advisor, deliver_pending,
};
use category_game::ResultSummary;
use clap::ValueEnum;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{SimulationConfig, SimulationSession};

/// Where consultant commentary comes from during a narrated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ConsultantMode {
    /// No narrated run
    #[default]
    Off,
    /// Canned fallback copy, no network
    Offline,
    /// Gemini when a credential is set in the environment
    Live,
}

impl ConsultantMode {
    /// Advisor backing this mode, `None` when narration is off.
    ///
    /// # Errors
    ///
    /// Fails when a live credential is present but the advisor config is
    /// unusable.
    pub fn advisor(self) -> Result<Option<Arc<dyn Advisor>>> {
        match self {
            Self::Off => Ok(None),
            Self::Offline => Ok(Some(Arc::new(FallbackAdvisor))),
            Self::Live => Ok(Some(build_advisor(&AdvisorConfig::from_env())?)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NarrationReport {
    pub advisor_id: String,
    pub decisions: usize,
    pub replies_accepted: usize,
    pub final_message: String,
    pub result: Option<ResultSummary>,
}

/// Play one run with `strategy`, printing each decision and the consultant's
/// answer to `out`.
pub async fn narrate_playthrough(
    out: &mut impl Write,
    advisor: Arc<dyn Advisor>,
    strategy: GameplayStrategy,
    seed: u64,
) -> Result<NarrationReport> {
    let (dispatcher, mut replies) = AdvisoryDispatcher::new(advisor);
    let mut sim = SimulationSession::new(SimulationConfig::new(strategy, seed));
    let mut policy = strategy.create_policy(seed);

    writeln!(
        out,
        "{} {} (consultant: {})",
        "🎙️  Narrated run:".bright_cyan().bold(),
        strategy,
        dispatcher.advisor_id()
    )?;
    writeln!(out, "   {}", sim.session().consultant().message().dimmed())?;

    let mut seen_events = sim.events().len();
    let mut decisions = 0;
    let mut replies_accepted = 0;

    while let Some(turn) = sim.step(policy.as_mut()) {
        let Some(record) = &turn.decision else {
            if let Some(err) = &turn.rejection {
                writeln!(out, "   sector {} rejected: {}", turn.stage.index(), err)?;
            }
            continue;
        };
        decisions += 1;
        writeln!(
            out,
            "   sector {} {} -> {} | cash {} brand {}",
            record.stage,
            record.choice_label.bold(),
            record.result_label,
            record.cash_after,
            record.brand_after
        )?;

        let handles = dispatcher.dispatch_events(&sim.events()[seen_events..]);
        seen_events = sim.events().len();
        for handle in handles {
            if let Err(err) = handle.await {
                log::warn!("advisory task failed: {err}");
            }
        }
        replies_accepted += deliver_pending(sim.session_mut(), &mut replies);
        writeln!(
            out,
            "   {} {}",
            "consultant:".magenta(),
            sim.session().consultant().message()
        )?;
    }

    let final_message = sim.session().consultant().message().to_string();
    let result = sim.session().summary();
    if let Some(summary) = &result {
        writeln!(
            out,
            "   {} {} | cash {} brand {}",
            "ending:".bright_white().bold(),
            summary.headline,
            summary.cash,
            summary.brand
        )?;
    }

    Ok(NarrationReport {
        advisor_id: dispatcher.advisor_id().to_string(),
        decisions,
        replies_accepted,
        final_message,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use category_advisor::FALLBACK_ON_ERROR;
    use category_game::{AdvisoryTicket, FeedbackRequest, Stage};

    struct EchoAdvisor;

    #[async_trait]
    impl Advisor for EchoAdvisor {
        fn id(&self) -> &str {
            "echo"
        }

        async fn request_feedback(&self, request: &FeedbackRequest) -> String {
            format!("{} noted", request.choice)
        }
    }

    #[test]
    fn off_mode_has_no_advisor() {
        assert!(ConsultantMode::Off.advisor().expect("off").is_none());
    }

    #[test]
    fn offline_mode_answers_with_fallback_copy() {
        let advisor = ConsultantMode::Offline
            .advisor()
            .expect("offline")
            .expect("advisor present");
        assert_eq!(advisor.id(), "offline");
        let request = FeedbackRequest {
            ticket: AdvisoryTicket::new(0, 1, Stage::Positioning),
            stage: 1,
            choice: "Niche Down".to_string(),
            result: "Blue Ocean Strategy.".to_string(),
        };
        let text = tokio_test::block_on(advisor.request_feedback(&request));
        assert_eq!(text, FALLBACK_ON_ERROR);
    }

    #[tokio::test]
    async fn narration_delivers_one_reply_per_decision() {
        let mut out = Vec::new();
        let report = narrate_playthrough(
            &mut out,
            Arc::new(EchoAdvisor),
            GameplayStrategy::CategoryKing,
            1,
        )
        .await
        .expect("narration runs");

        assert_eq!(report.advisor_id, "echo");
        assert_eq!(report.decisions, 8);
        assert_eq!(report.replies_accepted, 8);
        assert!(report.final_message.ends_with("noted"));
        assert_eq!(
            report.result.map(|summary| summary.headline),
            Some("COMMODITY".to_string())
        );

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Narrated run"));
        assert!(text.contains("consultant:"));
    }

    #[tokio::test]
    async fn narration_stops_when_the_run_is_lost() {
        let mut out = Vec::new();
        let report = narrate_playthrough(
            &mut out,
            Arc::new(FallbackAdvisor),
            GameplayStrategy::Commodity,
            1,
        )
        .await
        .expect("narration runs");
        assert_eq!(report.decisions, 5);
        assert_eq!(report.replies_accepted, 5);
        assert_eq!(report.final_message, FALLBACK_ON_ERROR);
        assert_eq!(
            report.result.map(|summary| summary.headline),
            Some("BANKRUPT".to_string())
        );
    }
}
