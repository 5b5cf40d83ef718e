//! LLM provider integrations for parley
//!
//! This crate provides the abstraction and HTTP implementation for the
//! single outbound model call the chat service makes per request.

pub mod base;
pub mod compatible;

pub use base::{ChatMessage, ChatProvider, LLMResponse, ProviderError, ProviderResult};
pub use compatible::CompatibleClient;
