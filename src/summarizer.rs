//! The summarization pipeline.
//!
//! Classifies an input, resolves it to source text (through the cache for
//! URLs), selects an instruction and token budget, and dispatches to the
//! configured provider. Each call runs start to finish with no retries; every
//! failure maps to one variant of [`crate::error::KortError`].

use crate::cache::{CachedResolution, ResolutionCache, DEFAULT_CACHE_CAPACITY};
use crate::content::{ContentKind, ContentResolver, ResolvedContent};
use crate::error::{KortError, Result};
use crate::input::{self, Classification};
use crate::prompt::{self, SummaryLength};
use crate::provider::{CompletionParams, SummarizationProvider};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One summarization request. Immutable per call.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// URL, raw text, or `Document:`-prefixed document text.
    pub input: String,
    pub length: SummaryLength,
    /// Output language, or [`prompt::SOURCE_LANGUAGE`] to match the source.
    pub language: String,
    pub api_key: String,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
}

/// The outcome of a successful summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub title: Option<String>,
    pub author: Option<String>,
    pub summary: String,
}

/// Pipeline coordinator: classification, cache gate, resolution, prompt
/// selection, and dispatch.
pub struct Summarizer {
    provider: Arc<dyn SummarizationProvider>,
    resolver: Arc<dyn ContentResolver>,
    cache: ResolutionCache,
}

impl Summarizer {
    pub fn new(
        provider: Arc<dyn SummarizationProvider>,
        resolver: Arc<dyn ContentResolver>,
    ) -> Self {
        Self::with_cache_capacity(provider, resolver, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(
        provider: Arc<dyn SummarizationProvider>,
        resolver: Arc<dyn ContentResolver>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            provider,
            resolver,
            cache: ResolutionCache::new(cache_capacity),
        }
    }

    /// Run one request through the pipeline.
    #[instrument(skip(self, request), fields(length = %request.length))]
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult> {
        let classification = input::classify(&request.input)?;
        info!("Classified input as {}", classification.kind());

        if request.api_key.trim().is_empty() {
            return Err(KortError::MissingCredential);
        }

        let content = self.resolve(&classification).await?;
        self.dispatch(&content, request).await
    }

    /// Resolve classified input to source text, going through the cache for
    /// URL inputs. Raw text and documents bypass the cache; their identity is
    /// the full input string.
    async fn resolve(&self, classification: &Classification) -> Result<ResolvedContent> {
        match classification {
            Classification::RawText(text) => Ok(ResolvedContent {
                kind: ContentKind::RawText,
                source_text: text.clone(),
                title: None,
                author: None,
            }),
            Classification::RawDocument(text) => Ok(ResolvedContent {
                kind: ContentKind::RawDocument,
                source_text: text.clone(),
                title: None,
                author: None,
            }),
            Classification::Video { url, video_id } => {
                if let Some(hit) = self.cached(url, ContentKind::Video) {
                    return Ok(hit);
                }
                let content = self.resolver.resolve_video(video_id).await?;
                self.store(url, &content);
                Ok(content)
            }
            Classification::Article { url } => {
                if let Some(hit) = self.cached(url, ContentKind::Article) {
                    return Ok(hit);
                }
                let content = self.resolver.resolve_article(url).await?;
                self.store(url, &content);
                Ok(content)
            }
        }
    }

    fn cached(&self, url: &str, kind: ContentKind) -> Option<ResolvedContent> {
        let hit = self.cache.get(url)?;
        debug!("Cache hit for {}", url);
        Some(ResolvedContent {
            kind,
            source_text: hit.source_text,
            title: hit.title,
            author: hit.author,
        })
    }

    fn store(&self, url: &str, content: &ResolvedContent) {
        self.cache.insert(
            url,
            CachedResolution {
                title: content.title.clone(),
                author: content.author.clone(),
                source_text: content.source_text.clone(),
            },
        );
    }

    /// Select the prompt and hand the source text to the provider. A fresh
    /// seed per call means cache hits still produce new phrasings.
    async fn dispatch(
        &self,
        content: &ResolvedContent,
        request: &SummaryRequest,
    ) -> Result<SummaryResult> {
        let selection = prompt::select(
            content.kind,
            request.length,
            content.title.as_deref(),
            &request.language,
            self.provider.kind(),
        );

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.kind().default_model().to_string());
        let params = CompletionParams::new(model, selection.max_tokens);

        debug!(
            kind = %content.kind,
            chars = content.source_text.len(),
            "Dispatching to {}", self.provider.kind()
        );

        let summary = self
            .provider
            .complete(&selection.instruction, &content.source_text, &params)
            .await?;

        Ok(SummaryResult {
            title: content.title.clone(),
            author: content.author.clone(),
            summary: summary.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderError, ProviderKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider that records calls and replies with a canned summary.
    struct MockProvider {
        calls: AtomicUsize,
        last_instruction: Mutex<Option<String>>,
        fail_with: Mutex<Option<ProviderError>>,
    }

    impl MockProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_instruction: Mutex::new(None),
                fail_with: Mutex::new(None),
            })
        }

        fn failing(error: ProviderError) -> Arc<Self> {
            let mock = Self::new();
            *mock.fail_with.lock().unwrap() = Some(error);
            mock
        }
    }

    #[async_trait]
    impl SummarizationProvider for MockProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAI
        }

        async fn complete(
            &self,
            system_prompt: &str,
            _user_text: &str,
            _params: &CompletionParams,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_instruction.lock().unwrap() = Some(system_prompt.to_string());
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            Ok("a canned summary".to_string())
        }
    }

    /// Resolver that counts fetches and returns fixed content.
    struct MockResolver {
        video_fetches: AtomicUsize,
        article_fetches: AtomicUsize,
    }

    impl MockResolver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                video_fetches: AtomicUsize::new(0),
                article_fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentResolver for MockResolver {
        async fn resolve_video(&self, video_id: &str) -> Result<ResolvedContent> {
            self.video_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(ResolvedContent {
                kind: ContentKind::Video,
                source_text: format!("transcript of {}", video_id),
                title: Some("A Video".to_string()),
                author: Some("A Channel".to_string()),
            })
        }

        async fn resolve_article(&self, url: &str) -> Result<ResolvedContent> {
            self.article_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(ResolvedContent {
                kind: ContentKind::Article,
                source_text: format!("body of {}", url),
                title: Some("An Article".to_string()),
                author: None,
            })
        }
    }

    fn request(input: &str) -> SummaryRequest {
        SummaryRequest {
            input: input.to_string(),
            length: SummaryLength::Medium,
            language: "English".to_string(),
            api_key: "test-key".to_string(),
            model: None,
        }
    }

    fn long_text() -> String {
        "word ".repeat(30)
    }

    #[tokio::test]
    async fn test_empty_input_fails_before_any_fetch() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider.clone(), resolver.clone());

        let result = summarizer.summarize(&request("")).await;
        assert!(matches!(result, Err(KortError::NoContent)));
        assert_eq!(resolver.video_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.article_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_resolution() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider, resolver.clone());

        let mut req = request("https://example.com/article");
        req.api_key = "  ".to_string();

        let result = summarizer.summarize(&req).await;
        assert!(matches!(result, Err(KortError::MissingCredential)));
        assert_eq!(resolver.article_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_raw_text_skips_resolution() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider.clone(), resolver.clone());

        let result = summarizer.summarize(&request(&long_text())).await.unwrap();
        assert_eq!(result.summary, "a canned summary");
        assert_eq!(result.title, None);
        assert_eq!(resolver.article_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_video_summary_carries_metadata() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider.clone(), resolver);

        let result = summarizer
            .summarize(&request("https://youtu.be/dQw4w9WgXcQ"))
            .await
            .unwrap();

        assert_eq!(result.title.as_deref(), Some("A Video"));
        assert_eq!(result.author.as_deref(), Some("A Channel"));
        let instruction = provider.last_instruction.lock().unwrap().clone().unwrap();
        assert!(instruction.contains("video transcript"));
        assert!(instruction.contains("titled \"A Video\""));
    }

    #[tokio::test]
    async fn test_second_call_hits_cache_and_summarizes_again() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider.clone(), resolver.clone());

        let req = request("https://example.com/cached-article");
        let first = summarizer.summarize(&req).await.unwrap();
        let second = summarizer.summarize(&req).await.unwrap();

        // One fetch, two completions, identical metadata
        assert_eq!(resolver.article_fetches.load(Ordering::SeqCst), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.title, second.title);
        assert_eq!(first.author, second.author);
    }

    #[tokio::test]
    async fn test_raw_document_bypasses_cache() {
        let provider = MockProvider::new();
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider.clone(), resolver.clone());

        let doc = format!("Document: {}", long_text());
        summarizer.summarize(&request(&doc)).await.unwrap();
        summarizer.summarize(&request(&doc)).await.unwrap();

        assert!(summarizer.cache.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_is_classified() {
        let provider = MockProvider::failing(ProviderError::RateLimited);
        let resolver = MockResolver::new();
        let summarizer = Summarizer::new(provider, resolver);

        let result = summarizer.summarize(&request(&long_text())).await;
        assert!(matches!(result, Err(KortError::RateLimited)));
    }
}
