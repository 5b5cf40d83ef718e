//! OpenAI-compatible HTTP client
//!
//! Speaks the `/chat/completions` format shared by most hosted model
//! gateways. One synchronous request per chat call, with a bounded
//! timeout; expiry surfaces as a distinct `Timeout` error.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::base::{
    ChatMessage, ChatProvider, LLMResponse, ProviderError, ProviderResult,
};
use async_trait::async_trait;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Chat completions API request format
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

/// Chat completions API response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible provider client
pub struct CompatibleClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    default_model: String,
}

impl CompatibleClient {
    /// Create a new client.
    ///
    /// `timeout` bounds a whole provider call; construction fails only if
    /// the underlying HTTP client cannot be built.
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        default_model: String,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let api_base = api_base
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::ConfigError(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            default_model,
        })
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        req_builder
    }

    /// Extract the structured reply text, keeping the raw payload for the
    /// fallback arm when the expected shape is absent.
    fn parse_response(&self, raw: serde_json::Value) -> LLMResponse {
        let content = serde_json::from_value::<ChatCompletionResponse>(raw.clone())
            .ok()
            .and_then(|parsed| parsed.choices.into_iter().next())
            .and_then(|choice| choice.message.content);

        LLMResponse { content, raw }
    }
}

#[async_trait]
impl ChatProvider for CompatibleClient {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> ProviderResult<LLMResponse> {
        let model = model.unwrap_or_else(|| self.default_model.clone());

        let request = ChatCompletionRequest {
            model: model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(
            "Sending chat request to {} with model {}",
            self.api_base, model
        );

        let url = format!("{}/chat/completions", self.api_base);
        let req_builder = self.apply_headers(self.client.post(&url).json(&request));

        let started = Instant::now();
        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    elapsed: started.elapsed(),
                }
            } else {
                ProviderError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    elapsed: started.elapsed(),
                }
            } else {
                ProviderError::HttpError(e)
            }
        })?;
        let raw: serde_json::Value = serde_json::from_str(&body)?;

        Ok(self.parse_response(raw))
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }
}
