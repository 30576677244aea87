//! Chunk metadata assembly.

use super::TimedChunk;
use crate::template::SourceUrlTemplate;
use tubecap_youtube::{MetadataValue, VideoMetadata};

/// Tag recorded on every chunk for the caption format it was built from.
pub const CAPTION_FORMAT_TAG: &str = "youtube-json3";

pub const KEY_SOURCE: &str = "source";
pub const KEY_START_SECONDS: &str = "start_seconds";
pub const KEY_START_TIMESTAMP: &str = "start_timestamp";
pub const KEY_MEDIA_ID: &str = "media_id";
pub const KEY_LANGUAGE_CODE: &str = "caption_language_code";
pub const KEY_CAPTION_FORMAT: &str = "caption_format";

/// Format whole seconds as `HH:MM:SS`.
pub fn format_timestamp(seconds: u64) -> String {
    let (m, s) = (seconds / 60, seconds % 60);
    let (h, m) = (m / 60, m % 60);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Metadata shared by every chunk of one load.
///
/// Video keys come first; the loader's own keys overwrite any video key of
/// the same name.
pub fn static_metadata(
    video: VideoMetadata,
    media_id: &str,
    language_code: &str,
) -> VideoMetadata {
    let mut metadata = video;
    metadata.insert(KEY_MEDIA_ID.to_string(), media_id.into());
    metadata.insert(KEY_LANGUAGE_CODE.to_string(), language_code.into());
    metadata.insert(KEY_CAPTION_FORMAT.to_string(), CAPTION_FORMAT_TAG.into());
    metadata
}

/// Full metadata for one chunk.
pub fn chunk_metadata(
    chunk: &TimedChunk,
    template: &SourceUrlTemplate,
    media_id: &str,
    shared: &VideoMetadata,
) -> VideoMetadata {
    let mut metadata = shared.clone();
    metadata.insert(
        KEY_SOURCE.to_string(),
        template.render(media_id, chunk.start_seconds).into(),
    );
    metadata.insert(
        KEY_START_SECONDS.to_string(),
        MetadataValue::from(chunk.start_seconds),
    );
    metadata.insert(
        KEY_START_TIMESTAMP.to_string(),
        format_timestamp(chunk.start_seconds).into(),
    );
    metadata
}
