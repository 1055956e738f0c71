use std::sync::Arc;

use crate::advisor::Advisor;
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::fallback::FallbackAdvisor;
use crate::gemini::GeminiAdvisor;

/// Pick the consultant for `config`: Gemini when a credential is present,
/// the offline advisor otherwise.
///
/// # Errors
///
/// Returns an error when a credential is present but the rest of the config
/// is unusable.
pub fn build_advisor(config: &AdvisorConfig) -> Result<Arc<dyn Advisor>, AdvisorError> {
    if config.effective_api_key().is_none() {
        log::info!("no consultant credential configured; using offline advisor");
        return Ok(Arc::new(FallbackAdvisor));
    }
    let advisor = GeminiAdvisor::new(config)?;
    log::info!("consultant online via Gemini model {}", advisor.model());
    Ok(Arc::new(advisor))
}
