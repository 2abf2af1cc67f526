//! YouTube video resolution.
//!
//! Everything comes off the public watch page: the `<title>` tag, the channel
//! `<link itemprop="name">` tag, and the caption track list embedded in the
//! player response JSON. The first track in source order is fetched in json3
//! format and its segments joined into one transcript string.

use super::{ContentKind, ResolvedContent};
use crate::error::{KortError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

static TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title>(.*?)</title>").expect("Invalid regex"));

static CHANNEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<link itemprop="name" content="([^"]*)""#).expect("Invalid regex")
});

const CAPTION_TRACKS_ANCHOR: &str = "\"captionTracks\":";

/// One caption track as listed in the watch page player response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "languageCode", default)]
    pub language_code: String,
}

/// Metadata and caption tracks parsed from a watch page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPage {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub caption_tracks: Vec<CaptionTrack>,
}

/// Parse title, channel, and caption tracks out of watch page HTML.
pub fn extract_video_page(html: &str) -> VideoPage {
    VideoPage {
        title: extract_title(html),
        channel: extract_channel(html),
        caption_tracks: extract_caption_tracks(html),
    }
}

fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_REGEX.captures(html)?.get(1)?.as_str();
    let title = unescape_html(raw);
    let title = title
        .strip_suffix(" - YouTube")
        .unwrap_or(&title)
        .trim()
        .to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn extract_channel(html: &str) -> Option<String> {
    let raw = CHANNEL_REGEX.captures(html)?.get(1)?.as_str();
    let channel = unescape_html(raw).trim().to_string();
    // The page reports "unknown" when the channel name is unavailable
    if channel.is_empty() || channel.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(channel)
    }
}

fn extract_caption_tracks(html: &str) -> Vec<CaptionTrack> {
    let Some(start) = html
        .find(CAPTION_TRACKS_ANCHOR)
        .map(|i| i + CAPTION_TRACKS_ANCHOR.len())
    else {
        return Vec::new();
    };
    let Some(json) = balanced_array(&html[start..]) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<CaptionTrack>>(json) {
        Ok(tracks) => tracks,
        Err(e) => {
            warn!("Failed to parse caption track list: {}", e);
            Vec::new()
        }
    }
}

/// Slice the bracket-balanced JSON array at the start of `s`. Track objects
/// can nest arrays (localized name runs), so a non-greedy match up to the
/// first `]` is not enough.
fn balanced_array(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Turn an escaped caption `baseUrl` into a fetchable json3 transcript URL.
fn transcript_url(base_url: &str) -> String {
    let url = base_url.replace("\\u0026", "&");
    if url.contains("fmt=srv3") {
        url.replace("fmt=srv3", "fmt=json3")
    } else if url.contains("fmt=json3") {
        url
    } else if url.contains('?') {
        format!("{}&fmt=json3", url)
    } else {
        format!("{}?fmt=json3", url)
    }
}

#[derive(Deserialize)]
struct TranscriptBody {
    #[serde(default)]
    events: Vec<TranscriptEvent>,
}

#[derive(Deserialize)]
struct TranscriptEvent {
    #[serde(default)]
    segs: Vec<TranscriptSegment>,
}

#[derive(Deserialize)]
struct TranscriptSegment {
    #[serde(default)]
    utf8: String,
}

/// Join the line segments of a json3 transcript into one string.
pub fn parse_transcript(json: &str) -> Result<String> {
    let body: TranscriptBody = serde_json::from_str(json)?;

    let joined: String = body
        .events
        .iter()
        .flat_map(|event| event.segs.iter())
        .map(|seg| seg.utf8.as_str())
        .collect();

    // Segment boundaries arrive as newlines; normalize everything to spaces
    let text = joined
        .replace('\n', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(text)
}

fn unescape_html(text: &str) -> String {
    // `&amp;` goes last so pre-escaped sequences like `&amp;lt;` come out as
    // `&lt;`, not `<`
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Fetch and resolve a video: watch page for metadata and track listing,
/// then the first caption track for the transcript.
pub async fn fetch_video(client: &reqwest::Client, video_id: &str) -> Result<ResolvedContent> {
    let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
    let html = client
        .get(&watch_url)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let page = extract_video_page(&html);
    debug!(
        tracks = page.caption_tracks.len(),
        "Parsed watch page for {}", video_id
    );

    let Some(track) = page.caption_tracks.first() else {
        return Err(KortError::NoTranscript);
    };

    let transcript_json = client
        .get(transcript_url(&track.base_url))
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let source_text = parse_transcript(&transcript_json)?;
    if source_text.is_empty() {
        return Err(KortError::NoTranscript);
    }

    Ok(ResolvedContent {
        kind: ContentKind::Video,
        source_text,
        title: page.title,
        author: page.channel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATCH_PAGE: &str = r#"<html><head>
        <title>Rust in Ten Minutes - YouTube</title>
        <link itemprop="name" content="Systems Weekly">
        </head><body><script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","languageCode":"en"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=de","languageCode":"de"}]}}};</script></body></html>"#;

    #[test]
    fn test_extract_title_strips_suffix() {
        let page = extract_video_page(WATCH_PAGE);
        assert_eq!(page.title.as_deref(), Some("Rust in Ten Minutes"));
    }

    #[test]
    fn test_extract_channel() {
        let page = extract_video_page(WATCH_PAGE);
        assert_eq!(page.channel.as_deref(), Some("Systems Weekly"));
    }

    #[test]
    fn test_unknown_channel_is_absent() {
        let html = r#"<title>Clip - YouTube</title><link itemprop="name" content="unknown">"#;
        let page = extract_video_page(html);
        assert_eq!(page.channel, None);
    }

    #[test]
    fn test_caption_tracks_keep_source_order() {
        let page = extract_video_page(WATCH_PAGE);
        assert_eq!(page.caption_tracks.len(), 2);
        assert_eq!(page.caption_tracks[0].language_code, "en");
        assert_eq!(page.caption_tracks[1].language_code, "de");
    }

    #[test]
    fn test_no_caption_tracks() {
        let page = extract_video_page("<title>Nothing here - YouTube</title>");
        assert!(page.caption_tracks.is_empty());
    }

    #[test]
    fn test_caption_tracks_with_nested_arrays() {
        // Track objects carry nested arrays (localized name runs) and the
        // list is followed by sibling keys
        let html = r#"{"captionTracks":[{"baseUrl":"https://yt/api?v=x&lang=en","name":{"runs":[{"text":"English"}]},"languageCode":"en"}],"audioTracks":[{"captionTrackIndices":[0]}]}"#;
        let tracks = extract_caption_tracks(html);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
    }

    #[test]
    fn test_caption_tracks_ignore_brackets_inside_strings() {
        let html = r#"{"captionTracks":[{"baseUrl":"https://yt/api?note=[1]","languageCode":"en"}]}"#;
        let tracks = extract_caption_tracks(html);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].base_url, "https://yt/api?note=[1]");
    }

    #[test]
    fn test_transcript_url_unescapes_and_adds_format() {
        assert_eq!(
            transcript_url("https://yt/api?v=abc\\u0026lang=en"),
            "https://yt/api?v=abc&lang=en&fmt=json3"
        );
        assert_eq!(transcript_url("https://yt/api"), "https://yt/api?fmt=json3");
        assert_eq!(
            transcript_url("https://yt/api?fmt=srv3"),
            "https://yt/api?fmt=json3"
        );
        assert_eq!(
            transcript_url("https://yt/api?fmt=json3"),
            "https://yt/api?fmt=json3"
        );
    }

    #[test]
    fn test_parse_transcript_joins_segments() {
        let json = r#"{"events":[
            {"segs":[{"utf8":"Hello"},{"utf8":" world"}]},
            {"tStartMs":1200},
            {"segs":[{"utf8":"\n"},{"utf8":"again"}]}
        ]}"#;
        assert_eq!(parse_transcript(json).unwrap(), "Hello world again");
    }

    #[test]
    fn test_parse_transcript_empty() {
        assert_eq!(parse_transcript(r#"{"events":[]}"#).unwrap(), "");
    }

    #[test]
    fn test_title_entities_unescaped() {
        let html = "<title>Q&amp;A: Borrowing &#39;n Lifetimes - YouTube</title>";
        let page = extract_video_page(html);
        assert_eq!(page.title.as_deref(), Some("Q&A: Borrowing 'n Lifetimes"));
    }

    #[test]
    fn test_pre_escaped_entities_unescape_once() {
        let html = "<title>Generics &amp;lt;T&amp;gt; explained - YouTube</title>";
        let page = extract_video_page(html);
        assert_eq!(page.title.as_deref(), Some("Generics &lt;T&gt; explained"));
    }
}
