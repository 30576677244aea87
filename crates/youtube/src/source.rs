//! Transcript and metadata source abstractions.
//!
//! These traits are the seams between the caption chunker and whatever
//! actually talks to the video platform.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tubecap_core::AppResult;

/// A single timestamped snippet of caption text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    /// Offset from the start of the video, in seconds
    pub start_seconds: f64,

    /// How long the fragment stays on screen, in seconds
    pub duration_seconds: f64,

    /// Caption text as published
    pub text: String,
}

impl CaptionFragment {
    /// Create a new fragment.
    pub fn new(start_seconds: f64, duration_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            duration_seconds,
            text: text.into(),
        }
    }

    /// Time at which the fragment leaves the screen.
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// One language/quality variant of captions for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Language tag as published (e.g. "en", "en-GB")
    pub language_code: String,

    /// Human readable language name (e.g. "English (auto-generated)")
    pub language_name: String,

    /// True for speech-recognition captions, false for human-edited ones
    pub is_generated: bool,

    /// Where the source fetches this track's fragments from
    pub fetch_url: String,
}

impl TranscriptTrack {
    /// Create a new track description.
    pub fn new(
        language_code: impl Into<String>,
        language_name: impl Into<String>,
        is_generated: bool,
        fetch_url: impl Into<String>,
    ) -> Self {
        Self {
            language_code: language_code.into(),
            language_name: language_name.into(),
            is_generated,
            fetch_url: fetch_url.into(),
        }
    }
}

impl fmt::Display for TranscriptTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_generated {
            "generated"
        } else {
            "edited"
        };
        write!(f, "{} ({})", self.language_code, kind)
    }
}

/// A metadata value attached to caption documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Text(String),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Integer(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

/// Video-level metadata, keyed by field name.
pub type VideoMetadata = BTreeMap<String, MetadataValue>;

/// Trait for transcript sources.
///
/// A source lists the tracks a video has and fetches the ordered
/// fragments of one of them on demand.
#[async_trait::async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Get the source name (e.g., "youtube", "mock").
    fn provider_name(&self) -> &str;

    /// List the caption tracks available for a video.
    ///
    /// A video with captions disabled yields an empty list, not an error.
    async fn list_tracks(&self, media_id: &str) -> AppResult<Vec<TranscriptTrack>>;

    /// Fetch the fragments of a track, ordered by start time.
    async fn fetch_fragments(&self, track: &TranscriptTrack) -> AppResult<Vec<CaptionFragment>>;
}

/// Trait for video metadata sources.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Look up the requested keys for a video.
    ///
    /// Keys the video doesn't have (or has as null) are omitted.
    async fn video_metadata(&self, media_id: &str, keys: &[String]) -> AppResult<VideoMetadata>;
}

/// A source that serves both transcripts and video metadata.
pub trait CaptionProvider: TranscriptSource + MetadataSource {}

impl<T: TranscriptSource + MetadataSource> CaptionProvider for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_end() {
        let fragment = CaptionFragment::new(100.0, 30.5, "b");
        assert_eq!(fragment.end_seconds(), 130.5);
    }

    #[test]
    fn test_track_display() {
        let track = TranscriptTrack::new("en-GB", "English (UK)", false, "");
        assert_eq!(track.to_string(), "en-GB (edited)");
    }

    #[test]
    fn test_metadata_value_serializes_untagged() {
        let mut metadata = VideoMetadata::new();
        metadata.insert("start_seconds".to_string(), 120i64.into());
        metadata.insert("title".to_string(), "When Love Comes To Town".into());

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(
            json,
            r#"{"start_seconds":120,"title":"When Love Comes To Town"}"#
        );

        let back: VideoMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }
}
