//! Provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for an OpenAI-compatible text-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name for the provider
    pub name: String,
    /// API base URL (e.g., "http://localhost:1234/v1")
    pub base_url: String,
    /// Environment variable holding the API key. Local servers that don't
    /// check one leave this unset.
    pub api_key_env: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Token cap applied when the caller doesn't pass one
    pub max_tokens: u32,
    /// Bound on the full request round trip, in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Local Ollama server
    pub fn ollama() -> Self {
        Self {
            name: "Ollama".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            api_key_env: None,
            default_model: "llama3".to_string(),
            max_tokens: 500,
            timeout_secs: 120,
        }
    }

    /// Local LM Studio server
    pub fn lm_studio() -> Self {
        Self {
            name: "LM Studio".to_string(),
            base_url: "http://localhost:1234/v1".to_string(),
            api_key_env: None,
            default_model: "gpt-oss-20b".to_string(),
            max_tokens: 500,
            timeout_secs: 120,
        }
    }

    /// OpenAI
    pub fn openai() -> Self {
        Self {
            name: "OpenAI".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            default_model: "gpt-4o".to_string(),
            max_tokens: 500,
            timeout_secs: 120,
        }
    }

    /// Custom endpoint (vLLM, llama.cpp, any OpenAI-compatible server)
    pub fn custom(
        name: impl Into<String>,
        base_url: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key_env: None,
            default_model: default_model.into(),
            max_tokens: 500,
            timeout_secs: 120,
        }
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
