//! Mock backends for tests and local development.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::{GenAiError, JobHandle, JobStatus, Outcome, TextBackend, VideoBackend};

/// Scripted text backend. Plays back a fixed outcome sequence, repeating
/// the last entry once the script runs out, and records every call.
pub struct MockTextBackend {
    outcomes: Vec<Outcome>,
    calls: AtomicU32,
    credentials: Mutex<Vec<String>>,
}

impl MockTextBackend {
    /// Always succeed with the given text.
    pub fn with_response(text: &str) -> Self {
        Self::with_outcomes(vec![Outcome::Success(text.to_string())])
    }

    pub fn with_outcomes(outcomes: Vec<Outcome>) -> Self {
        assert!(!outcomes.is_empty(), "mock script cannot be empty");
        Self {
            outcomes,
            calls: AtomicU32::new(0),
            credentials: Mutex::new(Vec::new()),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Exposed credentials, in invocation order.
    pub fn credentials_seen(&self) -> Vec<String> {
        self.credentials.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl TextBackend for MockTextBackend {
    async fn invoke(&self, credential: &SecretString, _prompt: &str) -> Outcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        self.credentials
            .lock()
            .expect("mock lock poisoned")
            .push(credential.expose_secret().clone());

        let idx = call.min(self.outcomes.len() - 1);
        self.outcomes[idx].clone()
    }
}

/// Scripted video backend. `poll` plays back the given status sequence,
/// holding on the last entry.
pub struct MockVideoBackend {
    statuses: Vec<JobStatus>,
    reject_submission: Option<String>,
    polls: AtomicU32,
    media: Vec<u8>,
}

impl MockVideoBackend {
    pub fn with_statuses(statuses: Vec<JobStatus>) -> Self {
        assert!(!statuses.is_empty(), "mock script cannot be empty");
        Self {
            statuses,
            reject_submission: None,
            polls: AtomicU32::new(0),
            media: b"mock-video-bytes".to_vec(),
        }
    }

    /// Reject every submission with the given message.
    pub fn rejecting(message: &str) -> Self {
        Self {
            statuses: vec![JobStatus::Pending],
            reject_submission: Some(message.to_string()),
            polls: AtomicU32::new(0),
            media: Vec::new(),
        }
    }

    /// Number of status checks so far.
    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoBackend for MockVideoBackend {
    async fn submit(&self, _prompt: &str) -> Result<JobHandle, GenAiError> {
        match &self.reject_submission {
            Some(message) => Err(GenAiError::Submission(message.clone())),
            None => Ok(JobHandle("operations/mock-job".to_string())),
        }
    }

    async fn poll(&self, _handle: &JobHandle) -> Result<JobStatus, GenAiError> {
        let poll = self.polls.fetch_add(1, Ordering::SeqCst) as usize;
        let idx = poll.min(self.statuses.len() - 1);
        Ok(self.statuses[idx].clone())
    }

    async fn fetch(&self, _uri: &str) -> Result<Vec<u8>, GenAiError> {
        Ok(self.media.clone())
    }
}
