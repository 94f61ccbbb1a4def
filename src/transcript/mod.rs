//! YouTube transcript retrieval.
//!
//! Extracts a video id from a URL, discovers the available caption tracks
//! through the watch-page player response, and fetches the caption text in
//! `json3` format. All failures degrade to returned diagnostic strings so
//! the agent always gets an observation back.

use crate::error::{Result, SvarError};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

/// Fixed usage hint for unrecognized URLs.
pub const USAGE_HINT: &str = "Please provide a valid YouTube URL (e.g., https://www.youtube.com/watch?v=VIDEO_ID or https://youtu.be/VIDEO_ID)";

/// Marker appended when a transcript is cut at the length limit.
pub const TRUNCATION_MARKER: &str = "... [transcript truncated due to length]";

/// One timestamped caption fragment of a video's text track.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Offset of the fragment from the start of the video.
    pub start_ms: u64,
    /// Caption text.
    pub text: String,
}

/// A caption track advertised by the player response.
#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Client for fetching YouTube video transcripts.
pub struct TranscriptClient {
    http: reqwest::Client,
    video_id_regex: Regex,
    language: String,
    max_chars: usize,
}

impl TranscriptClient {
    /// Create a new transcript client.
    pub fn new(http: reqwest::Client, language: &str, max_chars: usize) -> Self {
        // Two recognized URL shapes: watch?v=ID (id ends at &) and
        // youtu.be/ID (id ends at ?).
        let video_id_regex = Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]+)")
            .expect("Invalid regex");

        Self {
            http,
            video_id_regex,
            language: language.to_string(),
            max_chars,
        }
    }

    /// Extract a video id from a URL, if the shape is recognized.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        self.video_id_regex
            .captures(input.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Fetch the transcript for a video URL.
    ///
    /// Never fails past this boundary: unrecognized URLs get the fixed usage
    /// hint without any network call, and every other failure maps to a
    /// diagnostic string.
    pub async fn fetch(&self, url: &str) -> String {
        let Some(video_id) = self.extract_video_id(url) else {
            return USAGE_HINT.to_string();
        };

        info!("Fetching transcript for video {}", video_id);

        match self.fetch_transcript(&video_id).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Transcript retrieval failed for {}: {}", video_id, e);
                let msg = e.to_string();
                if msg.contains("no element found") {
                    format!(
                        "Could not retrieve transcript for video ID: {}. The video might not have captions or they might be disabled.",
                        video_id
                    )
                } else {
                    format!(
                        "Error retrieving transcript for video ID: {}. Error: {}",
                        video_id, msg
                    )
                }
            }
        }
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let tracks = self.caption_tracks(video_id).await?;

        if tracks.is_empty() {
            return Ok(format!(
                "No transcripts available for this video (ID: {}). The video might not have captions enabled.",
                video_id
            ));
        }

        // Prefer the configured language, otherwise take the first track.
        let track = tracks
            .iter()
            .find(|t| t.language_code == self.language)
            .unwrap_or(&tracks[0]);

        if track.language_code != self.language {
            info!(
                "No '{}' captions for {}, using '{}'",
                self.language, video_id, track.language_code
            );
        }

        let segments = self.fetch_segments(track).await?;
        debug!("Retrieved {} transcript segments", segments.len());

        Ok(render_transcript(&segments, self.max_chars))
    }

    /// List the caption tracks advertised for a video.
    async fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let html = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Transcript(format!("Watch page request failed: {}", e)))?
            .text()
            .await?;

        let Some(json) = extract_json_array(&html, "\"captionTracks\":") else {
            // The player response omits the array entirely for videos
            // without captions.
            return Ok(Vec::new());
        };

        let tracks: Vec<CaptionTrack> = serde_json::from_str(json)
            .map_err(|e| SvarError::Transcript(format!("Malformed caption track list: {}", e)))?;
        Ok(tracks)
    }

    /// Fetch and parse the segments of a caption track.
    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let mut url = Url::parse(&track.base_url)
            .map_err(|e| SvarError::Transcript(format!("Bad caption track URL: {}", e)))?;
        url.query_pairs_mut().append_pair("fmt", "json3");

        let body: Json3Response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SvarError::Transcript(format!("Caption request failed: {}", e)))?
            .json()
            .await?;

        let mut segments = Vec::new();
        for event in body.events {
            let Some(segs) = event.segs else { continue };
            let text: String = segs.into_iter().filter_map(|s| s.utf8).collect();
            let text = text.trim().replace('\n', " ");
            if !text.is_empty() {
                segments.push(TranscriptSegment {
                    start_ms: event.t_start_ms.unwrap_or(0),
                    text,
                });
            }
        }

        Ok(segments)
    }
}

/// `json3` caption payload shapes.
#[derive(Debug, Deserialize)]
struct Json3Response {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs")]
    t_start_ms: Option<u64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    utf8: Option<String>,
}

/// Join segment texts with single spaces and apply the length limit.
fn render_transcript(segments: &[TranscriptSegment], max_chars: usize) -> String {
    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}{}", truncated, TRUNCATION_MARKER)
    } else {
        text
    }
}

/// Extract the balanced JSON array following `key` in a blob of HTML.
fn extract_json_array<'a>(html: &'a str, key: &str) -> Option<&'a str> {
    let start = html.find(key)? + key.len();
    let rest = &html[start..];
    let open = rest.find('[')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in rest[open..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[open..open + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TranscriptClient {
        TranscriptClient::new(crate::http::create_client(), "en", 10_000)
    }

    #[test]
    fn test_extract_video_id_watch_url() {
        let c = client();
        assert_eq!(
            c.extract_video_id("https://www.youtube.com/watch?v=ABC123&t=5"),
            Some("ABC123".to_string())
        );
        assert_eq!(
            c.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        let c = client();
        assert_eq!(
            c.extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=42"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_unrecognized() {
        let c = client();
        assert_eq!(c.extract_video_id("https://vimeo.com/12345"), None);
        assert_eq!(c.extract_video_id("not a url"), None);
        assert_eq!(c.extract_video_id(""), None);
    }

    #[tokio::test]
    async fn test_unrecognized_url_returns_usage_hint() {
        // No network call happens for an unrecognized shape, so this is
        // safe to run offline.
        let c = client();
        assert_eq!(c.fetch("https://example.com/video").await, USAGE_HINT);
    }

    #[test]
    fn test_render_transcript_joins_with_spaces() {
        let segments = vec![
            TranscriptSegment { start_ms: 0, text: "hello".into() },
            TranscriptSegment { start_ms: 1200, text: "world".into() },
        ];
        assert_eq!(render_transcript(&segments, 10_000), "hello world");
    }

    #[test]
    fn test_render_transcript_truncates() {
        let segments: Vec<TranscriptSegment> = (0..600)
            .map(|i| TranscriptSegment {
                start_ms: i,
                text: "0123456789012345678".into(),
            })
            .collect();

        let rendered = render_transcript(&segments, 10_000);
        assert!(rendered.ends_with(TRUNCATION_MARKER));
        let content_len = rendered.chars().count() - TRUNCATION_MARKER.chars().count();
        assert_eq!(content_len, 10_000);
    }

    #[test]
    fn test_extract_json_array() {
        let html = r#"stuff "captionTracks":[{"baseUrl":"https://x/y?a=[1]","languageCode":"en"}],"other":1"#;
        let json = extract_json_array(html, "\"captionTracks\":").unwrap();
        let tracks: Vec<CaptionTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
    }

    #[test]
    fn test_extract_json_array_missing_key() {
        assert!(extract_json_array("<html></html>", "\"captionTracks\":").is_none());
    }
}
