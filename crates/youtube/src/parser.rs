//! Parsing of YouTube watch pages and json3 timedtext.
//!
//! The watch page embeds a `ytInitialPlayerResponse` JSON object that carries
//! both the caption track list and the `videoDetails` block. Caption bodies are
//! requested in the json3 timedtext format.

use crate::source::{CaptionFragment, MetadataValue, TranscriptTrack, VideoMetadata};
use serde::Deserialize;
use serde_json::Value;
use tubecap_core::{AppError, AppResult};
use url::Url;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

/// The subset of the player response tubecap uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    captions: Option<Captions>,
    #[serde(default)]
    video_details: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    name: Option<RawName>,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawRun {
    text: String,
}

impl RawName {
    fn text(&self) -> String {
        match &self.simple_text {
            Some(text) => text.clone(),
            None => self.runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

impl PlayerResponse {
    /// Check that the video can be played at all.
    ///
    /// Unplayable videos (private, removed, age-gated) are source failures,
    /// unlike playable videos that merely lack captions.
    pub fn ensure_playable(&self) -> AppResult<()> {
        match &self.playability_status {
            Some(status) if !status.status.is_empty() && status.status != "OK" => {
                Err(AppError::Source(format!(
                    "Video is unavailable ({}): {}",
                    status.status,
                    status.reason.as_deref().unwrap_or("no reason given")
                )))
            }
            _ => Ok(()),
        }
    }

    /// Caption tracks in the order the page lists them.
    pub fn caption_tracks(&self) -> Vec<TranscriptTrack> {
        let Some(renderer) = self
            .captions
            .as_ref()
            .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
        else {
            return Vec::new();
        };

        renderer
            .caption_tracks
            .iter()
            .map(|raw| {
                TranscriptTrack::new(
                    raw.language_code.clone(),
                    raw.name.as_ref().map(RawName::text).unwrap_or_default(),
                    raw.kind.as_deref() == Some("asr"),
                    raw.base_url.clone(),
                )
            })
            .collect()
    }

    /// The raw `videoDetails` block, if present.
    pub fn video_details(&self) -> Option<&Value> {
        self.video_details.as_ref()
    }
}

/// Extract the player response embedded in a watch page.
pub fn extract_player_response(html: &str) -> AppResult<PlayerResponse> {
    let Some(start) = html.find(PLAYER_RESPONSE_MARKER) else {
        if html.contains(RECAPTCHA_MARKER) {
            return Err(AppError::Source(
                "YouTube answered with a captcha; too many requests from this address".to_string(),
            ));
        }
        return Err(AppError::Source(
            "Watch page has no player response".to_string(),
        ));
    };

    let rest = &html[start + PLAYER_RESPONSE_MARKER.len()..];

    // The object is followed by arbitrary script; stop after the first value.
    let value = serde_json::Deserializer::from_str(rest)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| AppError::Source("Player response is empty".to_string()))??;

    Ok(serde_json::from_value(value)?)
}

/// Copy the requested scalar keys out of a `videoDetails` block.
///
/// Strings and booleans become text, integers stay integers; nulls,
/// nested objects and missing keys are skipped.
pub fn select_metadata(details: &Value, keys: &[String]) -> VideoMetadata {
    let mut metadata = VideoMetadata::new();

    for key in keys {
        let value = match details.get(key) {
            Some(Value::String(s)) => MetadataValue::Text(s.clone()),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => MetadataValue::Integer(i),
                None => MetadataValue::Text(n.to_string()),
            },
            Some(Value::Bool(b)) => MetadataValue::Text(b.to_string()),
            Some(Value::Null) | None => continue,
            Some(other) => {
                tracing::debug!("Skipping non-scalar metadata key '{}': {}", key, other);
                continue;
            }
        };
        metadata.insert(key.clone(), value);
    }

    metadata
}

/// Build the json3 download URL for a track's base URL.
pub fn json3_url(base_url: &str) -> AppResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AppError::Source(format!("Invalid caption URL '{}': {}", base_url, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("fmt", "json3");

    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct Json3Body {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 timedtext body into ordered caption fragments.
///
/// Events without text (window setup, bare line breaks) are dropped and
/// line breaks inside a caption become spaces.
pub fn parse_json3(body: &str) -> AppResult<Vec<CaptionFragment>> {
    let parsed: Json3Body = serde_json::from_str(body)?;

    let fragments: Vec<CaptionFragment> = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ");
            if text.trim().is_empty() {
                return None;
            }
            Some(CaptionFragment::new(
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
                text,
            ))
        })
        .collect();

    tracing::debug!("Parsed {} caption fragments", fragments.len());

    Ok(fragments)
}
