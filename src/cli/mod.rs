//! CLI module for Kort.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kort - Summaries for videos, articles, and text
///
/// Feeds a YouTube video, web article, or pasted text to a hosted LLM and
/// prints a summary. The name "Kort" comes from the Norwegian/Scandinavian
/// word for "short."
#[derive(Parser, Debug)]
#[command(name = "kort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a URL, raw text, or document
    Summarize {
        /// YouTube URL, article URL, or raw text to summarize
        input: String,

        /// Summary length (short, medium, long)
        #[arg(short, long)]
        length: Option<String>,

        /// Output language, or "auto" to match the source language
        #[arg(long)]
        language: Option<String>,

        /// LLM provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use instead of the provider's default
        #[arg(short, long)]
        model: Option<String>,

        /// API key for the selected provider
        #[arg(long, env = "KORT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
