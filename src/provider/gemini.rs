//! Gemini provider adapter.
//!
//! Gemini has no OpenAI-compatible endpoint, so this talks to the
//! `generateContent` REST API directly with reqwest.

use super::{CompletionParams, ProviderError, ProviderKind, SummarizationProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Adapter for Google's Gemini generateContent API.
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    candidate_count: u32,
    frequency_penalty: f32,
    seed: i64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize, Default)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
    /// Present on `BadRequest` details when a request field is malformed.
    #[serde(rename = "fieldViolations", default)]
    field_violations: Vec<serde_json::Value>,
}

#[async_trait]
impl SummarizationProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        params: &CompletionParams,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, params.model);

        let request = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_prompt,
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: user_text }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                candidate_count: 1,
                frequency_penalty: params.frequency_penalty,
                seed: params.seed,
            },
        };

        debug!(model = %params.model, max_tokens = params.max_tokens, "Requesting completion");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Upstream(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        Ok(text)
    }
}

/// Classify a failed response from its HTTP status and the structured
/// `status`/`details[].reason` fields of the error body.
fn classify_failure(status: StatusCode, body: &str) -> ProviderError {
    let error = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_default();

    let key_rejected = error.details.iter().any(|d| d.reason == "API_KEY_INVALID");
    // Malformed requests carry a BadRequest detail naming the offending field
    let malformed_request = error.details.iter().any(|d| !d.field_violations.is_empty());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::InvalidCredential,
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ if key_rejected => ProviderError::InvalidCredential,
        _ if error.status == "RESOURCE_EXHAUSTED" => ProviderError::RateLimited,
        // Gemini reports an oversized request as INVALID_ARGUMENT; with bad
        // keys and malformed fields ruled out via the structured details,
        // payload size is the remaining cause
        _ if error.status == "INVALID_ARGUMENT" && !malformed_request => {
            ProviderError::ContextTooLong
        }
        _ if !error.message.is_empty() => ProviderError::Upstream(error.message),
        _ => ProviderError::Upstream(format!("Gemini request failed with status {}", status)),
    }
}
