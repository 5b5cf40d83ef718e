//! Conversation orchestration: one provider round per chat call

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use parley_core::config::ChatConfig;
use parley_core::session::{Message, SessionRegistry};
use parley_providers::{ChatMessage, ChatProvider, ProviderError};

/// Result of one successful chat round
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub message_count: usize,
    pub processing_time: f64,
    pub request_id: String,
}

/// Failure modes of a chat round
///
/// Input errors are the caller's fault and carry no diagnostics; provider
/// errors carry the correlation id and elapsed time that also appear in
/// the logs for this request.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Provider call failed: {source}")]
    Provider {
        request_id: String,
        processing_time: f64,
        #[source]
        source: ProviderError,
    },
}

/// Drives the single outbound model call for a session
pub struct ChatOrchestrator {
    provider: Arc<dyn ChatProvider>,
    registry: Arc<SessionRegistry>,
    system_prompt: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ChatOrchestrator {
    /// Create an orchestrator over a provider and session registry
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        registry: Arc<SessionRegistry>,
        chat: &ChatConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            system_prompt: chat.system_prompt.clone(),
            model: chat.model.clone(),
            temperature: chat.temperature,
            max_tokens: chat.max_tokens,
        }
    }

    /// Run one chat round: append the user message and the reply to the
    /// session transcript and return the reply.
    ///
    /// The transcript is only mutated after the provider call succeeds, so
    /// a failed round leaves the session exactly as it was.
    pub async fn converse(&self, session_id: &str, user_text: &str) -> Result<ChatReply, ChatError> {
        // Input validation happens before the session is resolved: a bad
        // request must not create a session as a side effect.
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        info!(
            "[{}] Processing message for session {}: '{}'",
            request_id,
            session_id,
            preview(trimmed, 50)
        );

        let session = self.registry.resolve(session_id);
        let _turn = session.lock_turn().await;

        let context = self.build_context(session.snapshot(), trimmed);
        debug!("[{}] Invoking provider with {} messages", request_id, context.len());

        let response = match self
            .provider
            .chat(
                context,
                Some(self.model.clone()),
                self.max_tokens,
                self.temperature,
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let processing_time = started.elapsed().as_secs_f64();
                error!(
                    "[{}] Chat request failed after {:.2}s ({}): {:?}",
                    request_id,
                    processing_time,
                    e.kind(),
                    e
                );
                return Err(ChatError::Provider {
                    request_id,
                    processing_time,
                    source: e,
                });
            }
        };

        let reply = response.reply_text();
        debug!("[{}] Reply generated: '{}'", request_id, preview(&reply, 50));

        // User message first, then the reply, as one completed round.
        session.append_turn(Message::user(trimmed), Message::assistant(&reply));

        if session.durable {
            self.registry.history().save(&session.snapshot());
        }

        let processing_time = started.elapsed().as_secs_f64();
        info!(
            "[{}] Request processed successfully in {:.2}s",
            request_id, processing_time
        );

        Ok(ChatReply {
            response: reply,
            session_id: session_id.to_string(),
            message_count: session.message_count(),
            processing_time,
            request_id,
        })
    }

    /// Fixed instruction preamble, then the session's prior turns, then
    /// the new user message.
    fn build_context(&self, transcript: Vec<Message>, user_text: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(ChatMessage::system(&self.system_prompt));
        for message in &transcript {
            messages.push(ChatMessage {
                role: message.role.to_string(),
                content: message.content.clone(),
            });
        }
        messages.push(ChatMessage::user(user_text));
        messages
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
