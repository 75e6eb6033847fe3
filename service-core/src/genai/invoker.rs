//! Bounded-retry text generation with credential rotation.

use std::sync::Arc;

use super::keys::{redacted_suffix, KeyRotator};
use super::{GenAiError, GenAiSettings, Outcome, TextBackend};
use crate::genai::gemini::{GeminiConfig, GeminiTextBackend};

/// Default number of call attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Composes a [`KeyRotator`] and a [`TextBackend`] into a retrying call.
///
/// Each attempt takes the next credential in rotation order and stops at
/// the first success. Attempts are strictly sequential and there is no
/// backoff sleep between them; the rotation to a fresh credential *is*
/// the recovery strategy.
pub struct TextGenerator {
    backend: Arc<dyn TextBackend>,
    rotator: Arc<KeyRotator>,
    max_attempts: u32,
}

impl TextGenerator {
    pub fn new(backend: Arc<dyn TextBackend>, rotator: Arc<KeyRotator>) -> Self {
        Self {
            backend,
            rotator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Build the production generator (Gemini backend) from settings.
    pub fn from_settings(settings: &GenAiSettings) -> Result<Self, GenAiError> {
        let rotator = KeyRotator::new(settings.api_keys.clone())?;
        let backend = GeminiTextBackend::new(GeminiConfig {
            model: settings.model.clone(),
            api_base: settings.api_base.clone(),
        });

        Ok(Self::new(Arc::new(backend), Arc::new(rotator)).with_max_attempts(settings.max_attempts))
    }

    /// Generate text for a prompt, rotating credentials across attempts.
    ///
    /// `Empty` and `Error` outcomes both advance to the next credential;
    /// exhausting all attempts without a success fails with
    /// [`GenAiError::ExhaustedRetries`]. A rotator that cannot produce a
    /// credential at all fails with [`GenAiError::NoCredentials`] without
    /// consuming an attempt.
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        for attempt in 1..=self.max_attempts {
            let credential = self.rotator.try_next().ok_or(GenAiError::NoCredentials)?;

            match self.backend.invoke(credential, prompt).await {
                Outcome::Success(text) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "generation succeeded after retry");
                    }
                    return Ok(text);
                }
                Outcome::Empty { block_reason } => {
                    tracing::warn!(
                        attempt,
                        key = %redacted_suffix(credential),
                        block_reason = ?block_reason,
                        "backend returned no usable content"
                    );
                }
                Outcome::Error(cause) => {
                    tracing::warn!(
                        attempt,
                        key = %redacted_suffix(credential),
                        %cause,
                        "generation attempt failed"
                    );
                }
            }
        }

        Err(GenAiError::ExhaustedRetries {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::mock::MockTextBackend;

    fn rotator(n: usize) -> Arc<KeyRotator> {
        let keys = (0..n).map(|i| format!("test-key-{}", i)).collect();
        Arc::new(KeyRotator::new(keys).unwrap())
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let backend = Arc::new(MockTextBackend::with_response("answer"));
        let generator = TextGenerator::new(backend.clone(), rotator(3)).with_max_attempts(5);

        let text = generator.generate("prompt").await.unwrap();

        assert_eq!(text, "answer");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn always_failing_backend_exhausts_exactly_max_attempts() {
        let backend = Arc::new(MockTextBackend::with_outcomes(vec![Outcome::Error(
            "boom".to_string(),
        )]));
        let generator = TextGenerator::new(backend.clone(), rotator(2)).with_max_attempts(4);

        let err = generator.generate("prompt").await.unwrap_err();

        assert!(matches!(err, GenAiError::ExhaustedRetries { attempts: 4 }));
        assert_eq!(backend.calls(), 4);
    }

    #[tokio::test]
    async fn empty_response_advances_to_next_credential() {
        let backend = Arc::new(MockTextBackend::with_outcomes(vec![
            Outcome::Empty { block_reason: Some("SAFETY".to_string()) },
            Outcome::Success("second try".to_string()),
        ]));
        let generator = TextGenerator::new(backend.clone(), rotator(2));

        let text = generator.generate("prompt").await.unwrap();

        assert_eq!(text, "second try");
        assert_eq!(backend.calls(), 2);
        assert_eq!(
            backend.credentials_seen(),
            vec!["test-key-0".to_string(), "test-key-1".to_string()]
        );
    }

    #[tokio::test]
    async fn rotation_wraps_past_the_last_credential() {
        let backend = Arc::new(MockTextBackend::with_outcomes(vec![Outcome::Error(
            "down".to_string(),
        )]));
        let generator = TextGenerator::new(backend.clone(), rotator(2)).with_max_attempts(3);

        let _ = generator.generate("prompt").await;

        assert_eq!(
            backend.credentials_seen(),
            vec![
                "test-key-0".to_string(),
                "test-key-1".to_string(),
                "test-key-0".to_string(),
            ]
        );
    }
}
