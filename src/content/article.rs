//! Article resolution.
//!
//! A readability-style pass over the fetched page: paywall detection on the
//! raw markup first, then structured content selection (article, main, the
//! densest section, common content containers), falling back to the whole
//! body when no structured region exists.

use super::{ContentKind, ResolvedContent};
use crate::error::{KortError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static PAYWALL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Schema.org free-access flag, quoted or bare, either spelling
    Regex::new(r#"(?i)"(is|isAccessibleFor)Free"\s*:\s*"?false"?"#).expect("Invalid regex")
});

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Invalid selector"));

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("Invalid selector"));

static MAIN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("main").expect("Invalid selector"));

static SECTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("section").expect("Invalid selector"));

static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "#content, .content, #main, .main, #main-content, #article, .article, #post-body, .post-body",
    )
    .expect("Invalid selector")
});

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Invalid selector"));

static META_AUTHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="author"]"#).expect("Invalid selector"));

static META_ARTICLE_AUTHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:author"]"#).expect("Invalid selector"));

static ITEMPROP_AUTHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[itemprop="author"]"#).expect("Invalid selector"));

/// Elements whose text never belongs in extracted body content.
const EXCLUDED_ELEMENTS: [&str; 7] = [
    "script", "style", "noscript", "header", "footer", "nav", "aside",
];

/// Check the raw markup for a free-access-false paywall marker.
pub fn detect_paywall(html: &str) -> bool {
    PAYWALL_REGEX.is_match(html)
}

/// Title, author, and body text pulled from an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub author: Option<String>,
    pub text: String,
}

/// Extract article content from page markup.
///
/// Fails with [`KortError::PaywallDetected`] before any text extraction when
/// the paywall marker is present, and with [`KortError::InvalidLink`] when no
/// body text can be extracted.
pub fn extract_article(html: &str) -> Result<ExtractedArticle> {
    if detect_paywall(html) {
        return Err(KortError::PaywallDetected);
    }

    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let author = select_author(&doc);

    let text = extract_body_text(&doc);
    if text.is_empty() {
        return Err(KortError::InvalidLink);
    }

    Ok(ExtractedArticle {
        title,
        author,
        text,
    })
}

/// Pick the first qualifying author from the candidate list: non-empty with
/// at least one whitespace-delimited token.
fn select_author(doc: &Html) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();

    for el in doc.select(&META_AUTHOR_SELECTOR) {
        if let Some(content) = el.value().attr("content") {
            candidates.push(content.to_string());
        }
    }
    for el in doc.select(&META_ARTICLE_AUTHOR_SELECTOR) {
        if let Some(content) = el.value().attr("content") {
            candidates.push(content.to_string());
        }
    }
    for el in doc.select(&ITEMPROP_AUTHOR_SELECTOR) {
        match el.value().attr("content") {
            Some(content) => candidates.push(content.to_string()),
            None => candidates.push(el.text().collect::<String>()),
        }
    }

    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .find(|c| c.split_whitespace().next().is_some())
}

/// Structured content selection with a whole-body fallback.
fn extract_body_text(doc: &Html) -> String {
    let region = doc
        .select(&ARTICLE_SELECTOR)
        .next()
        .or_else(|| doc.select(&MAIN_SELECTOR).next())
        .or_else(|| densest(doc, &SECTION_SELECTOR))
        .or_else(|| densest(doc, &CONTAINER_SELECTOR));

    let text = match region {
        Some(el) => collect_text(el),
        None => {
            debug!("No structured content region, falling back to body text");
            doc.select(&BODY_SELECTOR)
                .next()
                .map(collect_text)
                .unwrap_or_default()
        }
    };

    text
}

/// The matching element carrying the most text.
fn densest<'a>(doc: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    doc.select(selector)
        .max_by_key(|el| el.text().map(str::len).sum::<usize>())
}

/// Collect whitespace-collapsed text, skipping boilerplate elements.
fn collect_text(root: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let excluded = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| EXCLUDED_ELEMENTS.contains(&el.name()))
        });
        if !excluded {
            parts.push(&**text);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetch a page and extract its article content.
pub async fn fetch_article(client: &reqwest::Client, url: &str) -> Result<ResolvedContent> {
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|_| KortError::InvalidLink)?
        .text()
        .await?;

    let article = extract_article(&html)?;

    Ok(ResolvedContent {
        kind: ContentKind::Article,
        source_text: article.text,
        title: article.title,
        author: article.author,
    })
}
