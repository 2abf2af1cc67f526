//! Content resolution: turning URLs into source text plus metadata.
//!
//! Provides a trait-based seam so the pipeline can be tested without the
//! network, and a web-backed implementation covering YouTube transcripts and
//! article extraction.

mod article;
mod video;

pub use article::{detect_paywall, extract_article};
pub use video::extract_video_page;

use crate::error::{KortError, Result};
use crate::net;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Classification of an input into one of four content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Article,
    RawText,
    RawDocument,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Video => write!(f, "video"),
            ContentKind::Article => write!(f, "article"),
            ContentKind::RawText => write!(f, "text"),
            ContentKind::RawDocument => write!(f, "document"),
        }
    }
}

/// Source text and metadata produced by a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub kind: ContentKind,
    pub source_text: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Trait for turning URLs into resolved content.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Resolve a YouTube video to its transcript and metadata.
    async fn resolve_video(&self, video_id: &str) -> Result<ResolvedContent>;

    /// Resolve a non-video URL to article text and metadata.
    async fn resolve_article(&self, url: &str) -> Result<ResolvedContent>;
}

/// Web-backed resolver. Probes connectivity before each fetch so offline
/// failures classify cleanly instead of surfacing as opaque transport errors.
pub struct WebResolver {
    client: reqwest::Client,
}

impl WebResolver {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(net::DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: net::build_client(timeout)?,
        })
    }

    async fn ensure_online(&self) -> Result<()> {
        if net::check_connectivity(&self.client).await {
            Ok(())
        } else {
            Err(KortError::NoInternet)
        }
    }
}

#[async_trait]
impl ContentResolver for WebResolver {
    async fn resolve_video(&self, video_id: &str) -> Result<ResolvedContent> {
        self.ensure_online().await?;
        info!("Resolving video {}", video_id);
        video::fetch_video(&self.client, video_id).await
    }

    async fn resolve_article(&self, url: &str) -> Result<ResolvedContent> {
        self.ensure_online().await?;
        info!("Resolving article {}", url);
        article::fetch_article(&self.client, url).await
    }
}
