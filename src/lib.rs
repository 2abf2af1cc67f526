//! Kort - Content Summarization
//!
//! A CLI tool and library for summarizing YouTube videos, web articles, and
//! raw text with hosted LLM providers (OpenAI, Groq, Gemini).
//!
//! The name "Kort" comes from the Norwegian/Scandinavian word for "short."
//!
//! # Overview
//!
//! Kort allows you to:
//! - Summarize a YouTube video from its caption transcript
//! - Summarize a web article after readability-style extraction
//! - Summarize pasted text or pre-extracted documents
//! - Pick a summary length tier and output language
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `input` - Input classification (video, article, raw text, document)
//! - `content` - Content resolution (transcripts, article extraction)
//! - `cache` - Bounded cache of URL resolutions
//! - `prompt` - Instruction and token-budget selection
//! - `provider` - LLM provider adapters
//! - `summarizer` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kort::content::WebResolver;
//! use kort::prompt::SummaryLength;
//! use kort::provider::{create_provider, ProviderKind};
//! use kort::summarizer::{Summarizer, SummaryRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = create_provider(ProviderKind::OpenAI, "sk-...");
//!     let resolver = Arc::new(WebResolver::new()?);
//!     let summarizer = Summarizer::new(provider, resolver);
//!
//!     let result = summarizer
//!         .summarize(&SummaryRequest {
//!             input: "https://youtu.be/dQw4w9WgXcQ".to_string(),
//!             length: SummaryLength::Medium,
//!             language: "auto".to_string(),
//!             api_key: "sk-...".to_string(),
//!             model: None,
//!         })
//!         .await?;
//!     println!("{}", result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod input;
pub mod net;
pub mod prompt;
pub mod provider;
pub mod summarizer;

pub use error::{KortError, Result};
