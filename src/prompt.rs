//! Prompt selection.
//!
//! A pure function of (content kind, length tier, title presence, output
//! language, provider) producing the system instruction and the output-token
//! budget for a summarization call. One templating function covers all
//! combinations; provider-specific phrasing exists only where a backend
//! needs different emphasis.

use crate::content::ContentKind;
use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

/// Sentinel language value meaning "use the same language as the source".
pub const SOURCE_LANGUAGE: &str = "auto";

/// Summary verbosity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// A few tight bullet points.
    Short,
    /// One medium-length paragraph.
    #[default]
    Medium,
    /// A comprehensive summary, conclusion included.
    Long,
}

impl std::str::FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" | "0" => Ok(SummaryLength::Short),
            "medium" | "1" => Ok(SummaryLength::Medium),
            "long" | "2" => Ok(SummaryLength::Long),
            _ => Err(format!("Unknown summary length: {}", s)),
        }
    }
}

impl std::fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryLength::Short => write!(f, "short"),
            SummaryLength::Medium => write!(f, "medium"),
            SummaryLength::Long => write!(f, "long"),
        }
    }
}

/// A selected instruction with its output-token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSelection {
    pub instruction: String,
    pub max_tokens: u32,
}

/// Build the system instruction and token budget for a summarization call.
pub fn select(
    kind: ContentKind,
    length: SummaryLength,
    title: Option<&str>,
    language: &str,
    provider: ProviderKind,
) -> PromptSelection {
    PromptSelection {
        instruction: build_instruction(kind, length, title, language, provider),
        max_tokens: token_budget(provider, length),
    }
}

/// Output-token ceiling per provider and tier. Strictly increasing with the
/// tier; Groq gets the smallest ceilings.
pub fn token_budget(provider: ProviderKind, length: SummaryLength) -> u32 {
    match (provider, length) {
        (ProviderKind::OpenAI, SummaryLength::Short) => 256,
        (ProviderKind::OpenAI, SummaryLength::Medium) => 512,
        (ProviderKind::OpenAI, SummaryLength::Long) => 1536,
        (ProviderKind::Groq, SummaryLength::Short) => 200,
        (ProviderKind::Groq, SummaryLength::Medium) => 400,
        (ProviderKind::Groq, SummaryLength::Long) => 1024,
        (ProviderKind::Gemini, SummaryLength::Short) => 300,
        (ProviderKind::Gemini, SummaryLength::Medium) => 600,
        (ProviderKind::Gemini, SummaryLength::Long) => 1800,
    }
}

/// The noun used to refer to the source content inside instructions.
fn content_noun(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Video => "video transcript",
        ContentKind::Article => "article",
        ContentKind::RawText => "text",
        ContentKind::RawDocument => "document",
    }
}

fn build_instruction(
    kind: ContentKind,
    length: SummaryLength,
    title: Option<&str>,
    language: &str,
    provider: ProviderKind,
) -> String {
    let noun = content_noun(kind);

    let title_clause = match title {
        Some(t) if !t.trim().is_empty() => format!(" titled \"{}\"", t.trim()),
        _ => String::new(),
    };

    let language_clause = if language == SOURCE_LANGUAGE {
        format!("Write the summary in the same language as the {}.", noun)
    } else {
        format!("Write the summary in {}.", language)
    };

    let shape_clause = match length {
        SummaryLength::Short => format!(
            "Summarize the following {}{} in at most three short bullet points. \
             Keep each bullet under fifteen words and skip any preamble.",
            noun, title_clause
        ),
        SummaryLength::Medium => format!(
            "Summarize the following {}{} in a single medium-length paragraph. \
             Stick to the main points and skip any preamble.",
            noun, title_clause
        ),
        SummaryLength::Long => format!(
            "Write a comprehensive summary of the following {}{}. \
             Cover every major point in order, and include the conclusion if the {} reaches one.",
            noun, title_clause, noun
        ),
    };

    let mut instruction = format!("{} {}", shape_clause, language_clause);

    // Gemini tends to decorate output with headings unless told otherwise
    if provider == ProviderKind::Gemini {
        instruction.push_str(" Respond with plain text, without markdown headings.");
    }

    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDERS: [ProviderKind; 3] =
        [ProviderKind::OpenAI, ProviderKind::Groq, ProviderKind::Gemini];

    #[test]
    fn test_budget_scales_with_tier() {
        for provider in PROVIDERS {
            let short = token_budget(provider, SummaryLength::Short);
            let medium = token_budget(provider, SummaryLength::Medium);
            let long = token_budget(provider, SummaryLength::Long);
            assert!(short < medium, "{} short vs medium", provider);
            assert!(medium < long, "{} medium vs long", provider);
        }
    }

    #[test]
    fn test_title_is_interpolated_when_known() {
        let with_title = select(
            ContentKind::Article,
            SummaryLength::Medium,
            Some("The Border of the Map"),
            "English",
            ProviderKind::OpenAI,
        );
        assert!(with_title
            .instruction
            .contains("titled \"The Border of the Map\""));

        let without_title = select(
            ContentKind::Article,
            SummaryLength::Medium,
            None,
            "English",
            ProviderKind::OpenAI,
        );
        assert!(!without_title.instruction.contains("titled"));
    }

    #[test]
    fn test_blank_title_is_omitted() {
        let selection = select(
            ContentKind::Article,
            SummaryLength::Short,
            Some("   "),
            "English",
            ProviderKind::OpenAI,
        );
        assert!(!selection.instruction.contains("titled"));
    }

    #[test]
    fn test_source_language_sentinel_names_the_content_kind() {
        let video = select(
            ContentKind::Video,
            SummaryLength::Medium,
            None,
            SOURCE_LANGUAGE,
            ProviderKind::OpenAI,
        );
        assert!(video
            .instruction
            .contains("same language as the video transcript"));

        let document = select(
            ContentKind::RawDocument,
            SummaryLength::Medium,
            None,
            SOURCE_LANGUAGE,
            ProviderKind::OpenAI,
        );
        assert!(document.instruction.contains("same language as the document"));
    }

    #[test]
    fn test_explicit_language_is_used() {
        let selection = select(
            ContentKind::RawText,
            SummaryLength::Long,
            None,
            "German",
            ProviderKind::Groq,
        );
        assert!(selection.instruction.contains("in German"));
    }

    #[test]
    fn test_tier_shapes() {
        let short = select(
            ContentKind::Video,
            SummaryLength::Short,
            None,
            "English",
            ProviderKind::OpenAI,
        );
        assert!(short.instruction.contains("bullet points"));

        let medium = select(
            ContentKind::Video,
            SummaryLength::Medium,
            None,
            "English",
            ProviderKind::OpenAI,
        );
        assert!(medium.instruction.contains("paragraph"));

        let long = select(
            ContentKind::Video,
            SummaryLength::Long,
            None,
            "English",
            ProviderKind::OpenAI,
        );
        assert!(long.instruction.contains("conclusion"));
    }

    #[test]
    fn test_length_parsing_accepts_tier_numbers() {
        assert_eq!("0".parse::<SummaryLength>().unwrap(), SummaryLength::Short);
        assert_eq!("medium".parse::<SummaryLength>().unwrap(), SummaryLength::Medium);
        assert_eq!("2".parse::<SummaryLength>().unwrap(), SummaryLength::Long);
        assert!("gigantic".parse::<SummaryLength>().is_err());
    }
}
