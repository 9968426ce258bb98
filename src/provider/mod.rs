//! LLM provider layer
//!
//! The production `LanguageModel` implementation: an OpenAI-compatible
//! client that works against any API implementing the chat completions
//! spec (LM Studio, Ollama, vLLM, the hosted services).

mod client;
mod config;

pub use client::*;
pub use config::*;
