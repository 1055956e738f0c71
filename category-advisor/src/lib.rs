//! Category of One Advisory Client
//!
//! Turns resolved decisions into consultant commentary. The stage engine never
//! waits on this crate: requests come from [`category_game::SessionEvent`]s and
//! replies go back through ticket-checked delivery, so slow or failed calls
//! cannot touch game state.

pub mod advisor;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod fallback;
pub mod gemini;
pub mod prompt;

#[cfg(test)]
mod tests;

pub use advisor::Advisor;
pub use config::AdvisorConfig;
pub use dispatch::{AdvisoryDispatcher, AdvisoryReply, deliver_pending};
pub use error::AdvisorError;
pub use factory::build_advisor;
pub use fallback::FallbackAdvisor;
pub use gemini::GeminiAdvisor;
pub use prompt::{FALLBACK_ON_EMPTY, FALLBACK_ON_ERROR};
