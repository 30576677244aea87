//! In-memory source for tests and offline runs.

use crate::source::{
    CaptionFragment, MetadataSource, MetadataValue, TranscriptSource, TranscriptTrack,
    VideoMetadata,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tubecap_core::{AppError, AppResult};

/// Mock source serving fixed tracks and metadata.
///
/// Every video id sees the same tracks. Tracks are keyed by their
/// `fetch_url`, so give each one a distinct URL.
#[derive(Debug, Default)]
pub struct MockSource {
    tracks: Vec<(TranscriptTrack, Vec<CaptionFragment>)>,
    metadata: VideoMetadata,
    failure: Option<String>,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Create an empty source (a video with captions disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track with its fragments.
    pub fn with_track(mut self, track: TranscriptTrack, fragments: Vec<CaptionFragment>) -> Self {
        self.tracks.push((track, fragments));
        self
    }

    /// Add a video metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Make every call fail with a source error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of fragment downloads served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> AppResult<()> {
        match &self.failure {
            Some(message) => Err(AppError::Source(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl TranscriptSource for MockSource {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn list_tracks(&self, _media_id: &str) -> AppResult<Vec<TranscriptTrack>> {
        self.check_failure()?;
        Ok(self.tracks.iter().map(|(track, _)| track.clone()).collect())
    }

    async fn fetch_fragments(&self, track: &TranscriptTrack) -> AppResult<Vec<CaptionFragment>> {
        self.check_failure()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        self.tracks
            .iter()
            .find(|(t, _)| t.fetch_url == track.fetch_url)
            .map(|(_, fragments)| fragments.clone())
            .ok_or_else(|| AppError::Source(format!("Unknown track: {}", track)))
    }
}

#[async_trait::async_trait]
impl MetadataSource for MockSource {
    async fn video_metadata(&self, _media_id: &str, keys: &[String]) -> AppResult<VideoMetadata> {
        self.check_failure()?;
        Ok(keys
            .iter()
            .filter_map(|k| self.metadata.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack::new(code, code, generated, format!("mock://{}/{}", code, generated))
    }

    #[tokio::test]
    async fn test_lists_and_fetches_tracks() {
        let source = MockSource::new()
            .with_track(track("en", true), vec![CaptionFragment::new(0.0, 1.0, "auto")])
            .with_track(track("en", false), vec![CaptionFragment::new(0.0, 1.0, "edited")]);

        let tracks = source.list_tracks("anything").await.unwrap();
        assert_eq!(tracks.len(), 2);

        let fragments = source.fetch_fragments(&tracks[1]).await.unwrap();
        assert_eq!(fragments[0].text, "edited");
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_track() {
        let source = MockSource::new();
        let result = source.fetch_fragments(&track("fr", false)).await;
        assert!(matches!(result, Err(AppError::Source(_))));
    }

    #[tokio::test]
    async fn test_metadata_omits_missing_keys() {
        let source = MockSource::new().with_metadata("title", "Town");
        let keys = vec!["title".to_string(), "author".to_string()];

        let metadata = source.video_metadata("id", &keys).await.unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["title"], MetadataValue::from("Town"));
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = MockSource::new().failing("network down");
        let err = source.list_tracks("id").await.unwrap_err();
        assert_eq!(err.to_string(), "Transcript source error: network down");
    }
}
