//! OpenAI-compatible provider adapter.
//!
//! Covers both OpenAI itself and Groq, which speaks the same chat-completion
//! protocol behind a different base URL.

use super::{CompletionParams, ProviderError, ProviderKind, SummarizationProvider};
use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Adapter for OpenAI-compatible chat completion backends.
pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    kind: ProviderKind,
}

impl OpenAIProvider {
    /// Adapter talking to the OpenAI API.
    pub fn openai(api_key: &str, timeout: Duration) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: create_client(config, timeout),
            kind: ProviderKind::OpenAI,
        }
    }

    /// Adapter talking to Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: &str, timeout: Duration) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(GROQ_API_BASE);
        Self {
            client: create_client(config, timeout),
            kind: ProviderKind::Groq,
        }
    }
}

/// Create a chat client with a configured request timeout.
fn create_client(config: OpenAIConfig, timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(config).with_http_client(http_client)
}

#[async_trait]
impl SummarizationProvider for OpenAIProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| ProviderError::Upstream(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_text)
                .build()
                .map_err(|e| ProviderError::Upstream(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&params.model)
            .messages(messages)
            .temperature(params.temperature)
            .frequency_penalty(params.frequency_penalty)
            .seed(params.seed)
            .max_completion_tokens(params.max_tokens)
            .n(1)
            .build()
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        debug!(model = %params.model, max_tokens = params.max_tokens, "Requesting completion");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_error)?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        Ok(text)
    }
}

/// Classify an API failure from its machine-readable error code, not its
/// human-readable message.
fn classify_error(err: OpenAIError) -> ProviderError {
    match err {
        OpenAIError::ApiError(api) => classify_api_error(&api),
        OpenAIError::Reqwest(e) => ProviderError::Transport(e),
        other => ProviderError::Upstream(other.to_string()),
    }
}

fn classify_api_error(api: &ApiError) -> ProviderError {
    match api.code.as_deref() {
        Some("invalid_api_key") | Some("invalid_organization") => ProviderError::InvalidCredential,
        Some("rate_limit_exceeded") | Some("insufficient_quota") => ProviderError::RateLimited,
        Some("context_length_exceeded") | Some("string_above_max_length") => {
            ProviderError::ContextTooLong
        }
        _ => ProviderError::Upstream(api.message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: Option<&str>) -> ApiError {
        ApiError {
            message: "upstream message".to_string(),
            r#type: None,
            param: None,
            code: code.map(|c| c.to_string()),
        }
    }

    #[test]
    fn test_classify_credential_error() {
        assert!(matches!(
            classify_api_error(&api_error(Some("invalid_api_key"))),
            ProviderError::InvalidCredential
        ));
    }

    #[test]
    fn test_classify_rate_limit_error() {
        assert!(matches!(
            classify_api_error(&api_error(Some("rate_limit_exceeded"))),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            classify_api_error(&api_error(Some("insufficient_quota"))),
            ProviderError::RateLimited
        ));
    }

    #[test]
    fn test_classify_context_error() {
        assert!(matches!(
            classify_api_error(&api_error(Some("context_length_exceeded"))),
            ProviderError::ContextTooLong
        ));
    }

    #[test]
    fn test_unknown_code_passes_message_through() {
        match classify_api_error(&api_error(None)) {
            ProviderError::Upstream(msg) => assert_eq!(msg, "upstream message"),
            other => panic!("expected upstream, got {:?}", other),
        }
    }
}
