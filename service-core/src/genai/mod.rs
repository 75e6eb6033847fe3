//! Client layer for the external generative-language backend.
//!
//! Every service talks to the backend through the same three pieces:
//! a [`keys::KeyRotator`] cycling through the configured API credentials,
//! a [`TextBackend`] implementation performing one call with one credential,
//! and an [`invoker::TextGenerator`] that composes the two into a bounded
//! retry loop. The video path adds a [`VideoBackend`] plus the long-poll
//! orchestration in [`video::VideoGenerator`]. Loosely formatted model
//! output is turned into fixed shapes by [`response`].

pub mod gemini;
pub mod invoker;
pub mod keys;
pub mod mock;
pub mod response;
pub mod veo;
pub mod video;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::config::get_env;
use crate::error::AppError;

/// Error type for the generative-backend layer.
///
/// Callers can tell configuration problems (fix the deployment) from
/// transient exhaustion (retry later, alert) from content problems
/// (the backend answered, but not usefully).
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Generative backend not configured: {0}")]
    Configuration(String),

    #[error("No API credentials available to attempt the call")]
    NoCredentials,

    #[error("No usable response from the generative backend after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    #[error("Generative backend returned no text")]
    EmptyText,

    #[error("Unrecognized label in structured response: {0}")]
    UnrecognizedLabel(String),

    #[error("Video job submission rejected: {0}")]
    Submission(String),

    #[error("Video job polling failed: {0}")]
    Polling(String),
}

/// The tri-state result of one call attempt against the backend.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The backend returned non-empty text.
    Success(String),
    /// The call completed but produced no usable content (safety filtering,
    /// declined prompt). Distinct from transport or auth failure.
    Empty { block_reason: Option<String> },
    /// Transport, auth, or backend-side failure.
    Error(String),
}

/// One synchronous text-generation call with one credential.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn invoke(&self, credential: &SecretString, prompt: &str) -> Outcome;
}

/// Opaque reference to an asynchronous generation job on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(pub String);

/// Status reported by the backend for an asynchronous job.
#[derive(Debug, Clone)]
pub enum JobStatus {
    Pending,
    Done { result_uri: String },
    Failed { error: String },
}

/// Asynchronous video-generation job API.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<JobHandle, GenAiError>;
    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus, GenAiError>;
    /// Download the finished media referenced by a completed job.
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, GenAiError>;
}

/// Environment-driven settings for the generative backend, shared by all
/// services.
#[derive(Debug, Clone)]
pub struct GenAiSettings {
    /// Ordered credential list, rotated across call attempts.
    pub api_keys: Vec<String>,
    pub model: String,
    pub api_base: String,
    pub max_attempts: u32,
}

impl GenAiSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            api_keys: get_env("GEMINI_API_KEYS", Some(""))?
                .split(',')
                .map(str::to_string)
                .collect(),
            model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"))?,
            api_base: get_env("GEMINI_API_BASE", Some(gemini::GEMINI_API_BASE))?,
            max_attempts: get_env("GENAI_MAX_ATTEMPTS", Some("2"))?
                .parse()
                .unwrap_or(invoker::DEFAULT_MAX_ATTEMPTS),
        })
    }

    /// First non-blank credential, for single-key call paths (video jobs).
    pub fn primary_key(&self) -> Result<SecretString, GenAiError> {
        self.api_keys
            .iter()
            .map(|k| k.trim())
            .find(|k| !k.is_empty())
            .map(|k| SecretString::new(k.to_string()))
            .ok_or_else(|| GenAiError::Configuration("no usable API keys configured".to_string()))
    }
}
