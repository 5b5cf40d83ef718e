//! Base trait for LLM providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider call timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProviderError {
    /// Short machine-readable name of the error kind, used in error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::HttpError(_) => "http",
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::JsonError(_) => "json",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::ApiError(_) => "api",
            ProviderError::ConfigError(_) => "config",
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A message in the chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM provider
///
/// `content` carries the structured reply text when the provider returned
/// one; `raw` always carries the full response payload so a caller can
/// fall back to rendering it when `content` is absent. Callers handle the
/// two arms explicitly instead of probing fields.
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: Option<String>,
    pub raw: serde_json::Value,
}

impl LLMResponse {
    /// The reply text: structured content, or a rendering of the raw payload
    pub fn reply_text(&self) -> String {
        match &self.content {
            Some(text) => text.clone(),
            None => self.raw.to_string(),
        }
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one chat completion request: the full conversation in, one
    /// reply (or a typed failure) out. Exactly one outbound call, no
    /// retries.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> ProviderResult<LLMResponse>;

    /// Get the default model for this provider
    fn default_model(&self) -> String;
}
