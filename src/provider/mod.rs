//! Summarization provider abstraction.
//!
//! Each hosted LLM backend implements [`SummarizationProvider`], so the
//! pipeline stays provider-agnostic. Adapters classify failures into
//! [`ProviderError`] from structured response fields (HTTP status codes and
//! machine-readable error codes), never by pattern-matching error prose.

mod gemini;
mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;

use crate::error::KortError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for provider API requests.
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Hosted LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Groq,
    Gemini,
}

impl ProviderKind {
    /// Model used when the caller does not pick one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::Gemini => "gemini-2.0-flash",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// Sampling and budget parameters for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub model: String,
    /// Upper bound on generated tokens, from the length tier.
    pub max_tokens: u32,
    /// Low temperature keeps summaries close to the source.
    pub temperature: f32,
    /// Mild penalty to reduce repetition in longer summaries.
    pub frequency_penalty: f32,
    /// Per-call seed, for providers that accept one.
    pub seed: i64,
}

impl CompletionParams {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature: 0.2,
            frequency_penalty: 0.3,
            seed: random_seed(),
        }
    }
}

/// Derive a per-call seed from random UUID bytes.
fn random_seed() -> i64 {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&bytes[..8]);
    // Keep it non-negative; some backends reject negative seeds
    i64::from_le_bytes(seed) & i64::MAX
}

/// Structured failure classification for provider adapters.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid or malformed API credential")]
    InvalidCredential,

    #[error("missing API credential")]
    MissingCredential,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("input exceeds the model's context window")]
    ContextTooLong,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("empty completion from provider")]
    EmptyCompletion,

    #[error("{0}")]
    Upstream(String),
}

impl From<ProviderError> for KortError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidCredential => KortError::InvalidCredential,
            ProviderError::MissingCredential => KortError::MissingCredential,
            ProviderError::RateLimited => KortError::RateLimited,
            ProviderError::ContextTooLong => KortError::ContextTooLong,
            ProviderError::Transport(e) if e.is_connect() || e.is_timeout() => {
                KortError::NoInternet
            }
            ProviderError::Transport(e) => KortError::Http(e),
            ProviderError::EmptyCompletion => {
                KortError::Unclassified("Provider returned an empty completion".to_string())
            }
            ProviderError::Upstream(msg) => KortError::Unclassified(msg),
        }
    }
}

/// Trait for summarization backends.
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Run a single chat completion: system instruction plus source text in,
    /// trimmed completion text out.
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        params: &CompletionParams,
    ) -> std::result::Result<String, ProviderError>;
}

/// Construct the provider adapter for the given backend.
pub fn create_provider(kind: ProviderKind, api_key: &str) -> Arc<dyn SummarizationProvider> {
    create_provider_with_timeout(
        kind,
        api_key,
        Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
    )
}

/// Construct a provider adapter with a custom request timeout.
pub fn create_provider_with_timeout(
    kind: ProviderKind,
    api_key: &str,
    timeout: Duration,
) -> Arc<dyn SummarizationProvider> {
    match kind {
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::openai(api_key, timeout)),
        ProviderKind::Groq => Arc::new(OpenAIProvider::groq(api_key, timeout)),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, timeout)),
    }
}
