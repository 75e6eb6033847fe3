//! Veo video-generation backend.
//!
//! Veo jobs are long-running operations: submission returns an operation
//! name, and the operation resource is re-fetched until `done` is set.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::keys::redacted_suffix;
use super::{GenAiError, JobHandle, JobStatus, VideoBackend};

/// Veo backend configuration.
#[derive(Debug, Clone)]
pub struct VeoConfig {
    pub model: String,
    pub api_base: String,
}

pub struct VeoClient {
    config: VeoConfig,
    credential: SecretString,
    client: Client,
}

impl VeoClient {
    pub fn new(config: VeoConfig, credential: SecretString) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            credential,
            client,
        }
    }

    fn submit_url(&self) -> String {
        format!(
            "{}/models/{}:predictLongRunning",
            self.config.api_base, self.config.model
        )
    }

    fn operation_url(&self, handle: &JobHandle) -> String {
        format!("{}/{}", self.config.api_base, handle.0)
    }
}

#[async_trait]
impl VideoBackend for VeoClient {
    async fn submit(&self, prompt: &str) -> Result<JobHandle, GenAiError> {
        let request = PredictRequest {
            instances: vec![Instance {
                prompt: prompt.to_string(),
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            key = %redacted_suffix(&self.credential),
            "Submitting video generation job"
        );

        let response = self
            .client
            .post(self.submit_url())
            .header("x-goog-api-key", self.credential.expose_secret().as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenAiError::Submission(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenAiError::Submission(format!(
                "backend rejected the job ({}): {}",
                status, error_text
            )));
        }

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| GenAiError::Submission(format!("unreadable response body: {}", e)))?;

        Ok(JobHandle(operation.name))
    }

    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, GenAiError> {
        let response = self
            .client
            .get(self.operation_url(handle))
            .header("x-goog-api-key", self.credential.expose_secret().as_str())
            .send()
            .await
            .map_err(|e| GenAiError::Polling(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenAiError::Polling(format!(
                "status check failed ({}): {}",
                status, error_text
            )));
        }

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| GenAiError::Polling(format!("unreadable response body: {}", e)))?;

        if !operation.done {
            return Ok(JobStatus::Pending);
        }

        if let Some(error) = operation.error {
            return Ok(JobStatus::Failed {
                error: error.message,
            });
        }

        match operation.result_uri() {
            Some(uri) => Ok(JobStatus::Done { result_uri: uri }),
            None => Ok(JobStatus::Failed {
                error: "operation finished without a media reference".to_string(),
            }),
        }
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, GenAiError> {
        let response = self
            .client
            .get(uri)
            .header("x-goog-api-key", self.credential.expose_secret().as_str())
            .send()
            .await
            .map_err(|e| GenAiError::Polling(format!("media download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GenAiError::Polling(format!(
                "media download failed ({})",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenAiError::Polling(format!("media download failed: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

// ============================================================================
// Veo API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<Instance>,
}

#[derive(Debug, Serialize)]
struct Instance {
    prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<OperationResponse>,
}

impl Operation {
    fn result_uri(&self) -> Option<String> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()
            .map(|v| v.uri.clone())
    }
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    #[serde(default)]
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    #[serde(default)]
    video: Option<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    uri: String,
}
