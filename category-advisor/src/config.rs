use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Credential variables, checked in order.
pub const API_KEY_ENV_VARS: [&str; 3] = ["API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];
pub const MODEL_ENV_VAR: &str = "CATEGORY_ADVISOR_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_ms: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AdvisorConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source. Blank values are
    /// ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(key) = API_KEY_ENV_VARS.into_iter().find_map(|name| non_blank(name)) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_blank(MODEL_ENV_VAR) {
            self.model = model;
        }
    }

    /// Trimmed credential, if one is configured.
    #[must_use]
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    /// # Errors
    ///
    /// Rejects an empty model, a zero timeout, and sampling parameters
    /// outside their valid ranges.
    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.model.trim().is_empty() {
            return Err(AdvisorError::Config(
                "advisor model cannot be empty".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(AdvisorError::Config(
                "advisor timeout must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AdvisorError::Config(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(AdvisorError::Config(format!(
                "top_p {} is outside 0.0..=1.0",
                self.top_p
            )));
        }
        Ok(())
    }
}
