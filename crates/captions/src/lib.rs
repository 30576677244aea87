//! Caption chunking for retrieval.
//!
//! Picks the best caption track of a video and cuts its fragments into
//! fixed-width time windows, each emitted as a document with a source
//! timestamp and video metadata.
//!
//! # Example
//! ```no_run
//! use tubecap_captions::{CaptionLoader, LoaderConfig};
//! use tubecap_youtube::YouTubeSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = CaptionLoader::new(
//!     LoaderConfig::new("https://www.youtube.com/watch?v=7mCE73j59Zs").with_chunk_seconds(60),
//! )?;
//! let source = YouTubeSource::new(std::time::Duration::from_secs(30))?;
//! for document in loader.load(&source).await? {
//!     println!("{}", document.page_content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod loader;
pub mod selector;
pub mod sink;
pub mod template;

// Re-export commonly used types
pub use chunk::{ChunkAccumulator, ChunkPartitioner, TimedChunk};
pub use loader::{CaptionLoader, LoaderConfig};
pub use selector::{select_track, LanguageMatch, Selection};
pub use sink::{CaptionDocument, DocumentSink, JsonLinesSink};
pub use template::SourceUrlTemplate;
