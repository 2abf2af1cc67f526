//! Error types for Kort.

use thiserror::Error;

/// Library-level error type for Kort operations.
///
/// The first group of variants is the closed vocabulary the summarization
/// pipeline surfaces to callers; the rest are ambient conversions.
#[derive(Error, Debug)]
pub enum KortError {
    #[error("No content to summarize")]
    NoContent,

    #[error("No internet connection")]
    NoInternet,

    #[error("Input is too short to summarize")]
    InputTooShort,

    #[error("No transcript or subtitles found for this video")]
    NoTranscript,

    #[error("The provided link is invalid")]
    InvalidLink,

    #[error("Content is behind a paywall")]
    PaywallDetected,

    #[error("The API key is incorrect or invalid")]
    InvalidCredential,

    #[error("No API key is configured")]
    MissingCredential,

    #[error("API rate limit exceeded, try again later")]
    RateLimited,

    #[error("The content is too long for the selected model")]
    ContextTooLong,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Unclassified(String),
}

/// Result type alias for Kort operations.
pub type Result<T> = std::result::Result<T, KortError>;
