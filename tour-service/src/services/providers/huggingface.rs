//! Hugging Face inference provider.
//!
//! Talks to the OpenAI-compatible `/v1/chat/completions` route of the hosted
//! inference API. One blocking round trip per request, no streaming, no retry.

use super::{ChatMessage, ChatRequest, TextProvider};
use crate::services::PipelineError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Duration;

/// Upstream error bodies are truncated to this many characters.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub model: String,
    pub timeout: Duration,
}

pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TextProvider for HuggingFaceProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PipelineError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&text, ERROR_BODY_LIMIT),
                "Chat completion request rejected"
            );
            return Err(PipelineError::UpstreamRejected(format!(
                "{}: {}",
                status,
                truncate(&text, ERROR_BODY_LIMIT)
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| PipelineError::UpstreamMalformed(format!("invalid JSON: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::UpstreamMalformed(
                    "response has no choices[0].message.content".to_string(),
                )
            })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Chat Completions API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
