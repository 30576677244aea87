//! YouTube collaborators for tubecap.
//!
//! This crate provides the transcript and metadata sources that feed the
//! caption chunker. Sources are trait objects so the chunker can run
//! against the live site or a deterministic in-memory fixture.
//!
//! # Sources
//! - **YouTube**: watch page + timedtext (json3) over HTTP (default)
//! - **Mock**: in-memory tracks for tests and offline runs
//!
//! # Example
//! ```no_run
//! use tubecap_youtube::{extract_media_id, TranscriptSource, providers::YouTubeSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = YouTubeSource::new(std::time::Duration::from_secs(30))?;
//! let media_id = extract_media_id("https://youtu.be/7mCE73j59Zs")?;
//! for track in source.list_tracks(&media_id).await? {
//!     println!("{} generated={}", track.language_code, track.is_generated);
//! }
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod media;
pub mod parser;
pub mod providers;
pub mod source;

// Re-export main types
pub use factory::create_source;
pub use media::extract_media_id;
pub use providers::{MockSource, YouTubeSource};
pub use source::{
    CaptionFragment, CaptionProvider, MetadataSource, MetadataValue, TranscriptSource,
    TranscriptTrack, VideoMetadata,
};
