//! YouTube source implementation.
//!
//! Reads the caption track list and `videoDetails` from the watch page and
//! downloads caption bodies from the timedtext endpoint in json3 format.

use crate::parser::{extract_player_response, json3_url, parse_json3, select_metadata, PlayerResponse};
use crate::source::{CaptionFragment, MetadataSource, TranscriptSource, TranscriptTrack, VideoMetadata};
use std::time::Duration;
use tubecap_core::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// YouTube transcript and metadata source.
pub struct YouTubeSource {
    /// Base URL for watch pages
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl YouTubeSource {
    /// Create a source for www.youtube.com with the given request timeout.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a source with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the watch page for a video.
    fn watch_url(&self, media_id: &str) -> String {
        format!("{}/watch?v={}", self.base_url, media_id)
    }

    /// GET a URL and return the body, mapping failures to source errors.
    async fn get_text(&self, url: &str) -> AppResult<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .map_err(|e| AppError::Source(format!("Failed to send request to YouTube: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Source(format!(
                "YouTube error ({}) for {}: {}",
                status,
                url,
                error_text.chars().take(200).collect::<String>()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Source(format!("Failed to read YouTube response: {}", e)))
    }

    /// Fetch and parse the player response for a video.
    async fn player_response(&self, media_id: &str) -> AppResult<PlayerResponse> {
        let url = self.watch_url(media_id);
        tracing::debug!("Fetching watch page {}", url);

        let html = self.get_text(&url).await?;
        let response = extract_player_response(&html)?;
        response.ensure_playable()?;

        Ok(response)
    }
}

#[async_trait::async_trait]
impl TranscriptSource for YouTubeSource {
    fn provider_name(&self) -> &str {
        "youtube"
    }

    async fn list_tracks(&self, media_id: &str) -> AppResult<Vec<TranscriptTrack>> {
        let tracks = self.player_response(media_id).await?.caption_tracks();

        if tracks.is_empty() {
            tracing::info!("Captions are disabled for video {}", media_id);
        } else {
            tracing::debug!("Video {} has {} caption tracks", media_id, tracks.len());
        }

        Ok(tracks)
    }

    async fn fetch_fragments(&self, track: &TranscriptTrack) -> AppResult<Vec<CaptionFragment>> {
        tracing::info!("Downloading {} captions", track);

        let url = json3_url(&track.fetch_url)?;
        let body = self.get_text(&url).await?;

        if body.trim().is_empty() {
            return Err(AppError::Source(format!(
                "YouTube returned an empty caption body for {}",
                track
            )));
        }

        parse_json3(&body)
    }
}

#[async_trait::async_trait]
impl MetadataSource for YouTubeSource {
    async fn video_metadata(&self, media_id: &str, keys: &[String]) -> AppResult<VideoMetadata> {
        if keys.is_empty() {
            return Ok(VideoMetadata::new());
        }

        let response = self
            .player_response(media_id)
            .await
            .map_err(|e| AppError::Metadata(format!("Failed to load video details: {}", e)))?;

        let metadata = match response.video_details() {
            Some(details) => select_metadata(details, keys),
            None => {
                tracing::warn!("Watch page for {} has no videoDetails", media_id);
                VideoMetadata::new()
            }
        };

        tracing::debug!("Collected {} of {} metadata keys", metadata.len(), keys.len());

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let source =
            YouTubeSource::with_base_url("http://localhost:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.watch_url("7mCE73j59Zs"),
            "http://localhost:9/watch?v=7mCE73j59Zs"
        );
    }

    #[test]
    fn test_provider_name() {
        let source = YouTubeSource::new(Duration::from_secs(1)).unwrap();
        assert_eq!(source.provider_name(), "youtube");
    }

    #[tokio::test]
    async fn test_empty_metadata_keys_skip_network() {
        // Port 9 (discard) is never serving HTTP; no request must be made.
        let source =
            YouTubeSource::with_base_url("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let metadata = source.video_metadata("7mCE73j59Zs", &[]).await.unwrap();
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_source_error() {
        let source =
            YouTubeSource::with_base_url("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let result = source.list_tracks("7mCE73j59Zs").await;
        assert!(matches!(result, Err(AppError::Source(_))));
    }
}
