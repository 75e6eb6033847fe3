//! Gemini text-generation backend.
//!
//! One [`TextBackend::invoke`] call maps to one `generateContent` request
//! with one credential; rotation and retries live a layer up in
//! [`super::invoker::TextGenerator`].

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::keys::redacted_suffix;
use super::{Outcome, TextBackend};

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini backend configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub api_base: String,
}

pub struct GeminiTextBackend {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextBackend {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

#[async_trait]
impl TextBackend for GeminiTextBackend {
    async fn invoke(&self, credential: &SecretString, prompt: &str) -> Outcome {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![ContentPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            key = %redacted_suffix(credential),
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = match self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", credential.expose_secret().as_str())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Outcome::Error(format!("request failed: {}", e)),
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Outcome::Error(format!("Gemini API error {}: {}", status, error_text));
        }

        let api_response: GenerateContentResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::Error(format!("unreadable response body: {}", e)),
        };

        let block_reason = api_response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);

        let filtered = api_response
            .candidates
            .first()
            .is_some_and(|c| c.finish_reason.as_deref() == Some("SAFETY"));

        let text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string());

        match text {
            Some(text) if !text.is_empty() && !filtered => Outcome::Success(text),
            _ => Outcome::Empty { block_reason },
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
