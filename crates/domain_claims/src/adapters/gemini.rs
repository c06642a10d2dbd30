//! Gemini Extraction Adapter
//!
//! Implements [`ClaimExtractor`] on top of the Gemini REST API
//! (`POST {base_url}/models/{model}:generateContent`). The full prompt is sent
//! as a single user turn; the reply text of the first candidate is returned
//! untouched for the parser.
//!
//! # Error Handling
//!
//! API errors are mapped to `PortError` variants:
//! - 400 -> `PortError::Validation`
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound` (unknown model)
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Other -> `PortError::Internal`
//!
//! Nothing is retried here.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use core_kernel::{DomainPort, PortError};

use crate::ports::ClaimExtractor;
use crate::prompt::{build_prompt, GenerationConfig};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Seconds to wait after a 429 when the API gives no hint
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the Gemini adapter
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root, without a trailing `/models`
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            generation: GenerationConfig::default(),
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn new(prompt: String, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Maps a non-success API status to a port error
pub fn map_status(status: StatusCode, body: &str) -> PortError {
    let detail = || format!("Gemini API returned {status}: {}", truncate(body, 300));
    match status.as_u16() {
        400 => PortError::validation(detail()),
        401 | 403 => PortError::Unauthorized { message: detail() },
        404 => PortError::not_found("Model", detail()),
        429 => PortError::RateLimited {
            retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
        },
        500..=599 => PortError::ServiceUnavailable {
            service: format!("gemini ({status})"),
        },
        _ => PortError::internal(detail()),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Adapter
// ============================================================================

/// Claim extractor backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    config: GeminiConfig,
    client: Client,
}

impl GeminiExtractor {
    /// Builds the HTTP client; fails when no API key is configured
    pub fn new(config: GeminiConfig) -> Result<Self, PortError> {
        if config.api_key.trim().is_empty() {
            return Err(PortError::Unauthorized {
                message: "Gemini API key is not configured".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "generate_content".to_string(),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else if error.is_connect() {
            PortError::Connection {
                message: "could not reach the Gemini API".to_string(),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: "Gemini request failed".to_string(),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for GeminiExtractor {}

#[async_trait]
impl ClaimExtractor for GeminiExtractor {
    async fn extract(&self, claim_text: &str) -> Result<String, PortError> {
        let body = GenerateContentRequest::new(build_prompt(claim_text), self.config.generation);

        let started = Instant::now();
        debug!(model = %self.config.model, "Sending generateContent request");
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "Gemini request rejected");
            return Err(map_status(status, &body));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PortError::transformation(format!("invalid generateContent payload: {e}")))?;

        let finish_reason = payload
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone())
            .unwrap_or_default();
        let text = payload.text().ok_or_else(|| {
            PortError::transformation(format!(
                "model returned no text (finish reason: {finish_reason})"
            ))
        })?;

        info!(
            model = %self.config.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = text.chars().count(),
            "Gemini reply received"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("key")
            .base_url("http://localhost:9000/v1beta/")
            .model("gemini-test");
        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = GeminiExtractor::new(GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, PortError::Unauthorized { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest::new("prompt".to_string(), GenerationConfig::default());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["generationConfig"]["topP"].as_f64().map(|v| (v * 10.0).round()), Some(8.0));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let payload: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(payload.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(GenerateContentResponse::default().text(), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            PortError::Unauthorized { .. }
        ));
        assert!(map_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(map_status(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(!map_status(StatusCode::BAD_REQUEST, "bad").is_transient());
    }
}
