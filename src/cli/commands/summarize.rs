//! Summarize command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::content::WebResolver;
use crate::prompt::SummaryLength;
use crate::provider::{self, ProviderKind};
use crate::summarizer::{Summarizer, SummaryRequest};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;

/// Run the summarize command.
#[allow(clippy::too_many_arguments)]
pub async fn run_summarize(
    input: &str,
    length: Option<String>,
    language: Option<String>,
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    settings: Settings,
) -> Result<()> {
    let provider_kind: ProviderKind = provider
        .unwrap_or_else(|| settings.provider.provider.clone())
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let length: SummaryLength = length
        .unwrap_or_else(|| settings.summary.length.clone())
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let language = language.unwrap_or_else(|| settings.summary.language.clone());
    let model = model.or_else(|| settings.provider.model.clone());
    let api_key = api_key
        .or_else(|| settings.provider.api_key.clone())
        .unwrap_or_default();

    let provider = provider::create_provider(provider_kind, &api_key);
    let resolver = Arc::new(WebResolver::with_timeout(Duration::from_secs(
        settings.http.timeout_secs,
    ))?);
    let summarizer =
        Summarizer::with_cache_capacity(provider, resolver, settings.cache.capacity);

    let request = SummaryRequest {
        input: input.to_string(),
        length,
        language,
        api_key,
        model,
    };

    let spinner = Output::spinner("Summarizing...");

    match summarizer.summarize(&request).await {
        Ok(result) => {
            spinner.finish_and_clear();
            Output::summary(
                result.title.as_deref(),
                result.author.as_deref(),
                &result.summary,
            );
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}
