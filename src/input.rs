//! Input classification.
//!
//! Decides what an input string represents before anything touches the
//! network: a YouTube video URL, an article URL, pasted raw text, or an
//! already-extracted document.

use crate::content::ContentKind;
use crate::error::{KortError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix marking an input as pre-extracted document text.
pub const DOCUMENT_PREFIX: &str = "Document:";

/// Non-URL inputs at or below this many characters are rejected as too short.
const MIN_RAW_TEXT_LEN: usize = 100;

static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    // ID follows either the youtu.be short form or the watch?v= query
    Regex::new(r"(?:youtu\.be/|watch\?v=)([\w-]+)").expect("Invalid regex")
});

/// A classified input, carrying whatever the pipeline needs next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A YouTube video URL with its extracted video ID.
    Video { url: String, video_id: String },
    /// Any other HTTP(S) URL.
    Article { url: String },
    /// Raw text pasted by the user, summarized verbatim.
    RawText(String),
    /// Pre-extracted document text (marked with the `Document:` prefix).
    RawDocument(String),
}

impl Classification {
    pub fn kind(&self) -> ContentKind {
        match self {
            Classification::Video { .. } => ContentKind::Video,
            Classification::Article { .. } => ContentKind::Article,
            Classification::RawText(_) => ContentKind::RawText,
            Classification::RawDocument(_) => ContentKind::RawDocument,
        }
    }

    /// The cache key for URL inputs. Raw inputs have no cache identity.
    pub fn url(&self) -> Option<&str> {
        match self {
            Classification::Video { url, .. } | Classification::Article { url } => Some(url),
            _ => None,
        }
    }
}

/// Classify an input string without any network access.
///
/// Priority order: empty input is rejected outright; non-URL input must be
/// long enough to be worth summarizing; URL input is split into video vs.
/// article by YouTube ID extraction.
pub fn classify(input: &str) -> Result<Classification> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(KortError::NoContent);
    }

    if !is_http_url(trimmed) {
        // Characters, not bytes; multibyte text must clear the same bar
        if trimmed.chars().count() <= MIN_RAW_TEXT_LEN {
            return Err(KortError::InputTooShort);
        }
        // Raw inputs become the source text verbatim, untrimmed
        if trimmed.starts_with(DOCUMENT_PREFIX) {
            return Ok(Classification::RawDocument(input.to_string()));
        }
        return Ok(Classification::RawText(input.to_string()));
    }

    match extract_video_id(trimmed) {
        Some(video_id) => Ok(Classification::Video {
            url: trimmed.to_string(),
            video_id,
        }),
        None => Ok(Classification::Article {
            url: trimmed.to_string(),
        }),
    }
}

/// Extract a YouTube video ID from a URL, if present.
///
/// Matches the run of word characters and hyphens after `youtu.be/` or
/// `watch?v=`, so trailing query parameters never leak into the ID.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_http_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
