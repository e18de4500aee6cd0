//! Generative text providers.
//!
//! The pipeline talks to the model through [`TextProvider`], so the hosted
//! chat-completions backend can be swapped for the mock in tests.

pub mod huggingface;
pub mod mock;

use crate::services::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A chat-style generation request. The model id belongs to the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    /// Maximum output tokens.
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
}

/// Trait for chat-completion providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send one request and return the first choice's message text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, PipelineError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
