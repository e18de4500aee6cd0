//! Mock provider implementation for testing.

use super::{ChatRequest, TextProvider};
use crate::services::PipelineError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock text provider that replies with a fixed document and records the
/// requests it receives.
pub struct MockTextProvider {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockTextProvider {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail as if the upstream could not be reached.
    pub fn unavailable() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.reply.clone().ok_or_else(|| {
            PipelineError::UpstreamUnavailable("mock provider is unavailable".to_string())
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
