use std::time::Duration;

use async_trait::async_trait;
use category_game::FeedbackRequest;
use serde::{Deserialize, Serialize};

use crate::advisor::Advisor;
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::prompt::{FALLBACK_ON_EMPTY, FALLBACK_ON_ERROR, SYSTEM_INSTRUCTION, user_prompt};

/// Consultant backed by the Gemini `generateContent` endpoint.
pub struct GeminiAdvisor {
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    top_p: f32,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdvisor")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl GeminiAdvisor {
    /// # Errors
    ///
    /// Fails when no credential is configured, the config is invalid, or the
    /// HTTP client cannot be built.
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = config.effective_api_key().ok_or_else(|| {
            AdvisorError::Config(
                "gemini advisor requires an api key (set API_KEY or GEMINI_API_KEY)".to_string(),
            )
        })?;
        config.validate()?;

        Ok(Self {
            model: config.model.trim().to_string(),
            api_key,
            base_url: config.effective_base_url().to_string(),
            temperature: config.temperature,
            top_p: config.top_p,
            timeout_ms: config.timeout_ms,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|error| AdvisorError::Request(error.to_string()))?,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        let model_resource = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model_resource
        )
    }

    /// Ask the model for feedback. Returns an empty string when the model
    /// produced no text.
    ///
    /// # Errors
    ///
    /// Connection failures, timeouts, non-success statuses and unparseable
    /// bodies are reported as [`AdvisorError`].
    pub async fn generate(&self, request: &FeedbackRequest) -> Result<String, AdvisorError> {
        let prompt = user_prompt(request);
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![TextPart {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_p: self.top_p,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                if error.is_connect() {
                    AdvisorError::Request(format!(
                        "could not reach Gemini at {}: {error}",
                        self.base_url
                    ))
                } else if error.is_timeout() {
                    AdvisorError::Timeout(format!(
                        "Gemini request timed out after {} ms",
                        self.timeout_ms
                    ))
                } else {
                    AdvisorError::Request(error.to_string())
                }
            })?;

        let status = response.status();
        let payload = response.text().await?;

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AdvisorError::Auth(
                "Gemini authentication failed. Check API_KEY or GEMINI_API_KEY".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AdvisorError::Request(format!(
                "Gemini API returned {status}: {payload}"
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&payload)?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn request_feedback(&self, request: &FeedbackRequest) -> String {
        match self.generate(request).await {
            Ok(text) if text.trim().is_empty() => FALLBACK_ON_EMPTY.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(error) => {
                log::warn!(
                    "consultant request for stage {} failed: {error}",
                    request.stage
                );
                FALLBACK_ON_ERROR.to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
