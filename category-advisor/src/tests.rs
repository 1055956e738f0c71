use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use category_game::{
    AdvisoryTicket, Decision, FeedbackRequest, PositioningChoice, SessionEvent, Stage,
    StageSession,
};
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use crate::advisor::Advisor;
use crate::config::AdvisorConfig;
use crate::dispatch::{AdvisoryDispatcher, deliver_pending};
use crate::error::AdvisorError;
use crate::factory::build_advisor;
use crate::gemini::GeminiAdvisor;
use crate::prompt::{FALLBACK_ON_EMPTY, FALLBACK_ON_ERROR};

const MODEL_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

fn sample_request() -> FeedbackRequest {
    FeedbackRequest {
        ticket: AdvisoryTicket::new(0, 1, Stage::Positioning),
        stage: 1,
        choice: "Niche Down".to_string(),
        result: "Blue Ocean Strategy.".to_string(),
    }
}

fn advisor_for(server: &MockServer) -> GeminiAdvisor {
    GeminiAdvisor::new(&AdvisorConfig {
        api_key: Some("test-key".to_string()),
        base_url: Some(format!("{}/v1beta", server.base_url())),
        timeout_ms: 5_000,
        ..AdvisorConfig::default()
    })
    .expect("gemini advisor should initialize")
}

#[tokio::test]
async fn gemini_advisor_builds_expected_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(MODEL_PATH)
            .query_param("key", "test-key")
            .header("content-type", "application/json")
            .body_contains("\"systemInstruction\"")
            .body_contains("The Consultant")
            .body_contains("Current Stage: 1. User made the choice: \\\"Niche Down\\\"")
            .body_contains("\"temperature\":0.8")
            .body_contains("\"topP\":0.95");
        then.status(200).json_body(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Good. " },
                        { "text": "Now charge like you mean it." }
                    ]
                }
            }]
        }));
    });

    let advisor = advisor_for(&server);
    let text = advisor.request_feedback(&sample_request()).await;

    mock.assert();
    assert_eq!(text, "Good. Now charge like you mean it.");
}

#[tokio::test]
async fn server_error_falls_back() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(500).body("upstream exploded");
    });

    let advisor = advisor_for(&server);
    let err = advisor
        .generate(&sample_request())
        .await
        .expect_err("500 is an error");
    assert!(matches!(err, AdvisorError::Request(_)));
    assert_eq!(
        advisor.request_feedback(&sample_request()).await,
        FALLBACK_ON_ERROR
    );
}

#[tokio::test]
async fn rejected_credential_is_an_auth_error() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(403)
            .json_body(json!({ "error": { "status": "PERMISSION_DENIED" } }));
    });

    let advisor = advisor_for(&server);
    let err = advisor
        .generate(&sample_request())
        .await
        .expect_err("403 is an error");
    assert!(matches!(err, AdvisorError::Auth(_)));
    assert_eq!(
        advisor.request_feedback(&sample_request()).await,
        FALLBACK_ON_ERROR
    );
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200).body("not json");
    });

    let advisor = advisor_for(&server);
    let err = advisor
        .generate(&sample_request())
        .await
        .expect_err("invalid json");
    assert!(matches!(err, AdvisorError::InvalidResponse(_)));
    assert_eq!(
        advisor.request_feedback(&sample_request()).await,
        FALLBACK_ON_ERROR
    );
}

#[tokio::test]
async fn empty_candidates_use_execution_fallback() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200).json_body(json!({ "candidates": [] }));
    });

    let advisor = advisor_for(&server);
    assert_eq!(
        advisor.request_feedback(&sample_request()).await,
        FALLBACK_ON_EMPTY
    );
}

#[tokio::test]
async fn unreachable_host_falls_back() {
    let advisor = GeminiAdvisor::new(&AdvisorConfig {
        api_key: Some("test-key".to_string()),
        base_url: Some("http://127.0.0.1:9/v1beta".to_string()),
        timeout_ms: 500,
        ..AdvisorConfig::default()
    })
    .expect("gemini advisor should initialize");
    assert_eq!(
        advisor.request_feedback(&sample_request()).await,
        FALLBACK_ON_ERROR
    );
}

#[test]
fn missing_key_selects_offline_advisor() {
    let advisor = build_advisor(&AdvisorConfig::default()).expect("offline advisor");
    assert_eq!(advisor.id(), "offline");

    let blank = AdvisorConfig {
        api_key: Some("   ".to_string()),
        ..AdvisorConfig::default()
    };
    assert_eq!(build_advisor(&blank).expect("offline advisor").id(), "offline");
}

#[test]
fn key_selects_gemini_advisor() {
    let config = AdvisorConfig {
        api_key: Some("k".to_string()),
        ..AdvisorConfig::default()
    };
    assert_eq!(build_advisor(&config).expect("gemini advisor").id(), "gemini");

    let broken = AdvisorConfig {
        model: " ".to_string(),
        ..config
    };
    assert!(matches!(
        build_advisor(&broken),
        Err(AdvisorError::Config(_))
    ));
}

/// Answers with the choice name, after a delay that shrinks with the
/// sequence number so older requests finish last.
struct EchoAdvisor;

#[async_trait]
impl Advisor for EchoAdvisor {
    fn id(&self) -> &str {
        "echo"
    }

    async fn request_feedback(&self, request: &FeedbackRequest) -> String {
        let delay = 40_u64.saturating_sub(u64::from(request.ticket.sequence) * 20);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        format!("on {}", request.choice)
    }
}

#[tokio::test]
async fn dispatcher_replies_only_land_for_newest_ticket() {
    let (dispatcher, mut replies) = AdvisoryDispatcher::new(Arc::new(EchoAdvisor));
    let mut session = StageSession::new();
    session.start_session();
    session
        .decide(Decision::Positioning(PositioningChoice::NicheDown))
        .expect("positioning");
    session.decide(Decision::DeployOffer).expect("offer");

    let events = session.drain_events();
    let handles = dispatcher.dispatch_events(&events);
    assert_eq!(handles.len(), 2);
    for handle in handles {
        handle.await.expect("advisory task");
    }

    assert_eq!(deliver_pending(&mut session, &mut replies), 1);
    assert_eq!(session.consultant().message(), "on Deploy Offer");
    assert!(!session.consultant().is_thinking());
}

#[tokio::test]
async fn replies_after_reset_are_discarded() {
    let (dispatcher, mut replies) = AdvisoryDispatcher::new(Arc::new(EchoAdvisor));
    let mut session = StageSession::new();
    session.start_session();
    session
        .decide(Decision::Positioning(PositioningChoice::PriceDrop))
        .expect("positioning");
    let events = session.drain_events();
    session.reset_session();

    for handle in dispatcher.dispatch_events(&events) {
        handle.await.expect("advisory task");
    }
    assert_eq!(deliver_pending(&mut session, &mut replies), 0);
    assert!(
        session
            .drain_events()
            .iter()
            .all(|event| !matches!(event, SessionEvent::DecisionResolved(_)))
    );
}
