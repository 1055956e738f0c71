use async_trait::async_trait;
use category_game::FeedbackRequest;

use crate::advisor::Advisor;
use crate::prompt::FALLBACK_ON_ERROR;

/// Offline consultant used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAdvisor;

#[async_trait]
impl Advisor for FallbackAdvisor {
    fn id(&self) -> &str {
        "offline"
    }

    async fn request_feedback(&self, request: &FeedbackRequest) -> String {
        log::debug!(
            "offline consultant answering stage {} ({})",
            request.stage,
            request.choice
        );
        FALLBACK_ON_ERROR.to_string()
    }
}
