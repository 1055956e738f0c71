use async_trait::async_trait;
use category_game::FeedbackRequest;

/// A source of consultant commentary on resolved decisions.
///
/// Implementations never fail: transport and model errors are logged and
/// replaced with fallback copy, so callers can always show something.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Short identifier for logs and reports.
    fn id(&self) -> &str;

    async fn request_feedback(&self, request: &FeedbackRequest) -> String;
}
