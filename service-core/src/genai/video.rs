//! Long-poll orchestration for asynchronous video generation jobs.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

use super::{GenAiError, JobHandle, JobStatus, VideoBackend};

/// Default interval between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A finished generation job, ready for the caller to store.
#[derive(Debug, Clone)]
pub struct VideoResult {
    /// Where the backend parked the finished media.
    pub result_uri: String,
    /// Collision-free name for file-based storage of the artifact.
    pub artifact_name: String,
}

/// Submits a generation job and polls it to completion.
///
/// The wait is unbounded unless the caller supplies a deadline; any
/// transport error while polling is terminal and is never retried.
pub struct VideoGenerator {
    backend: Arc<dyn VideoBackend>,
    poll_interval: Duration,
}

impl VideoGenerator {
    pub fn new(backend: Arc<dyn VideoBackend>) -> Self {
        Self {
            backend,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn submit(&self, prompt: &str) -> Result<JobHandle, GenAiError> {
        let handle = self.backend.submit(prompt).await?;
        tracing::info!(job = %handle.0, "video generation job submitted");
        Ok(handle)
    }

    /// Poll until the job settles, sleeping `poll_interval` between checks.
    ///
    /// With `deadline: None` the loop runs as long as the backend keeps
    /// reporting `Pending`; a deadline turns a still-pending job into a
    /// [`GenAiError::Polling`] failure once it elapses.
    #[tracing::instrument(skip(self), fields(job = %handle.0))]
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        deadline: Option<Duration>,
    ) -> Result<VideoResult, GenAiError> {
        let started = Instant::now();

        loop {
            match self.backend.poll(handle).await? {
                JobStatus::Pending => {
                    tracing::info!("waiting for video generation to complete");
                }
                JobStatus::Done { result_uri } => {
                    tracing::info!("video generation completed");
                    return Ok(VideoResult {
                        result_uri,
                        artifact_name: format!("{}.mp4", Uuid::new_v4()),
                    });
                }
                JobStatus::Failed { error } => {
                    return Err(GenAiError::Polling(error));
                }
            }

            if let Some(cap) = deadline {
                if started.elapsed() >= cap {
                    return Err(GenAiError::Polling(format!(
                        "job {} still pending after {:?}",
                        handle.0, cap
                    )));
                }
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Download the finished media for storage by the caller.
    pub async fn fetch(&self, uri: &str) -> Result<Vec<u8>, GenAiError> {
        self.backend.fetch(uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::mock::MockVideoBackend;

    #[tokio::test(start_paused = true)]
    async fn returns_payload_after_pending_sequence() {
        let backend = Arc::new(MockVideoBackend::with_statuses(vec![
            JobStatus::Pending,
            JobStatus::Pending,
            JobStatus::Done {
                result_uri: "https://media.example/video-x".to_string(),
            },
        ]));
        let generator =
            VideoGenerator::new(backend.clone()).with_poll_interval(Duration::from_secs(10));

        let handle = generator.submit("a cat surfing").await.unwrap();
        let result = generator.await_completion(&handle, None).await.unwrap();

        // exactly three status checks, sleeping between each
        assert_eq!(backend.polls(), 3);
        assert_eq!(result.result_uri, "https://media.example/video-x");
        assert!(result.artifact_name.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn failed_job_surfaces_polling_error() {
        let backend = Arc::new(MockVideoBackend::with_statuses(vec![JobStatus::Failed {
            error: "quota exceeded".to_string(),
        }]));
        let generator = VideoGenerator::new(backend);

        let handle = generator.submit("prompt").await.unwrap();
        let err = generator.await_completion(&handle, None).await.unwrap_err();

        assert!(matches!(err, GenAiError::Polling(message) if message == "quota exceeded"));
    }

    #[tokio::test]
    async fn rejected_submission_surfaces_submission_error() {
        let backend = Arc::new(MockVideoBackend::rejecting("malformed prompt"));
        let generator = VideoGenerator::new(backend);

        let err = generator.submit("").await.unwrap_err();
        assert!(matches!(err, GenAiError::Submission(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_caps_an_endlessly_pending_job() {
        let backend = Arc::new(MockVideoBackend::with_statuses(vec![JobStatus::Pending]));
        let generator =
            VideoGenerator::new(backend.clone()).with_poll_interval(Duration::from_secs(10));

        let handle = generator.submit("prompt").await.unwrap();
        let err = generator
            .await_completion(&handle, Some(Duration::from_secs(25)))
            .await
            .unwrap_err();

        assert!(matches!(err, GenAiError::Polling(_)));
        assert!(backend.polls() >= 3);
    }

    #[tokio::test]
    async fn artifact_names_do_not_collide() {
        let backend = Arc::new(MockVideoBackend::with_statuses(vec![JobStatus::Done {
            result_uri: "https://media.example/v".to_string(),
        }]));
        let generator = VideoGenerator::new(backend);

        let handle = generator.submit("prompt").await.unwrap();
        let a = generator.await_completion(&handle, None).await.unwrap();
        let b = generator.await_completion(&handle, None).await.unwrap();

        assert_ne!(a.artifact_name, b.artifact_name);
    }
}
