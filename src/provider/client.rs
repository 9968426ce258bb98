//! OpenAI-compatible provider client
//!
//! Single-shot chat completions only; the team loop has no use for
//! streaming. The HTTP client carries the configured timeout so a slow
//! backend surfaces as a distinguishable timeout error.

use super::ProviderConfig;
use crate::agent::{LanguageModel, LlmError};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use std::time::Duration;

/// Placeholder key sent to local servers that don't check one.
const LOCAL_API_KEY: &str = "not-needed";

/// OpenAI-compatible client wrapper
#[derive(Clone)]
pub struct ProviderClient {
    config: ProviderConfig,
    client: Client<OpenAIConfig>,
}

impl ProviderClient {
    /// Create a new provider client from config
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = Self::get_api_key(&config);

        let openai_config = OpenAIConfig::new()
            .with_api_key(&api_key)
            .with_api_base(&config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        let client = Client::with_config(openai_config).with_http_client(http_client);

        Ok(Self { config, client })
    }

    /// API key from the configured environment variable, falling back to
    /// the local-server placeholder.
    fn get_api_key(config: &ProviderConfig) -> String {
        let _ = dotenvy::dotenv();

        config
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .unwrap_or_else(|| LOCAL_API_KEY.to_string())
    }

    /// Get the provider config
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn map_error(&self, err: OpenAIError) -> LlmError {
        match err {
            OpenAIError::Reqwest(e) if e.is_timeout() => {
                LlmError::Timeout(Duration::from_secs(self.config.timeout_secs))
            }
            OpenAIError::Reqwest(e) => LlmError::Unavailable(e.to_string()),
            OpenAIError::ApiError(e) => LlmError::Unavailable(e.message),
            OpenAIError::JSONDeserialize(e) => LlmError::InvalidResponse(e.to_string()),
            other => LlmError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for ProviderClient {
    async fn generate(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, LlmError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::InvalidResponse(format!("failed to build request: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.default_model)
            .messages(vec![message.into()])
            .max_tokens(max_tokens.unwrap_or(self.config.max_tokens))
            .build()
            .map_err(|e| LlmError::InvalidResponse(format!("failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| self.map_error(e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("completion contained no text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_without_env_key() {
        let client = ProviderClient::new(ProviderConfig::lm_studio()).unwrap();
        assert_eq!(client.config().name, "LM Studio");
    }

    #[test]
    fn test_api_key_falls_back_to_placeholder() {
        let config = ProviderConfig::lm_studio();
        assert_eq!(ProviderClient::get_api_key(&config), LOCAL_API_KEY);
    }
}
