//! Caption loader.
//!
//! All settings are validated in [`CaptionLoader::new`], before any network
//! access. A load then lists the video's tracks, selects one, fetches its
//! fragments, partitions them and attaches metadata to every chunk.

use crate::chunk::metadata::{chunk_metadata, static_metadata};
use crate::chunk::{ChunkPartitioner, TimedChunk};
use crate::selector::{select_track, LanguageMatch, Selection};
use crate::sink::{CaptionDocument, DocumentSink};
use crate::template::SourceUrlTemplate;
use tubecap_core::config::{
    AppConfig, DEFAULT_CHUNK_SECONDS, DEFAULT_LANGUAGES, DEFAULT_METADATA_KEYS,
    DEFAULT_URL_TEMPLATE,
};
use tubecap_core::{AppError, AppResult};
use tubecap_youtube::{
    extract_media_id, MetadataSource, TranscriptSource, TranscriptTrack, VideoMetadata,
};

/// Unvalidated loader settings.
///
/// `new` fills every field with its named default; chain `with_*` calls to
/// change them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Watch/embed/short URL or bare video id
    pub media_url: String,

    /// Template for chunk `source` URLs
    pub url_template: String,

    /// Chunk width, in seconds
    pub chunk_seconds: u32,

    /// Caption languages, most preferred first
    pub languages: Vec<String>,

    /// How requested languages are compared with track tags
    pub language_match: LanguageMatch,

    /// Video metadata keys copied onto every chunk
    pub metadata_keys: Vec<String>,
}

impl LoaderConfig {
    pub fn new(media_url: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            chunk_seconds: DEFAULT_CHUNK_SECONDS,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            language_match: LanguageMatch::default(),
            metadata_keys: DEFAULT_METADATA_KEYS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build settings for a video from the application configuration.
    pub fn from_app_config(media_url: impl Into<String>, config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            media_url: media_url.into(),
            url_template: config.url_template.clone(),
            chunk_seconds: config.chunk_seconds,
            languages: config.languages.clone(),
            language_match: config.language_match.parse()?,
            metadata_keys: config.metadata_keys.clone(),
        })
    }

    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn with_chunk_seconds(mut self, seconds: u32) -> Self {
        self.chunk_seconds = seconds;
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language_match(mut self, mode: LanguageMatch) -> Self {
        self.language_match = mode;
        self
    }

    pub fn with_metadata_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Loads chunked caption documents for one video.
#[derive(Debug, Clone)]
pub struct CaptionLoader {
    media_id: String,
    template: SourceUrlTemplate,
    partitioner: ChunkPartitioner,
    languages: Vec<String>,
    language_match: LanguageMatch,
    metadata_keys: Vec<String>,
}

impl CaptionLoader {
    /// Validate settings and create a loader.
    ///
    /// # Errors
    /// `AppError::Config` for an empty or unrecognized media reference, an
    /// empty or malformed URL template, a zero chunk width, or an empty
    /// language list.
    pub fn new(config: LoaderConfig) -> AppResult<Self> {
        let media_id = extract_media_id(&config.media_url)?;
        let template = SourceUrlTemplate::parse(&config.url_template)?;
        let partitioner = ChunkPartitioner::new(config.chunk_seconds)?;

        let languages: Vec<String> = config
            .languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if languages.is_empty() {
            return Err(AppError::Config(
                "languages must name at least one language code".to_string(),
            ));
        }

        tracing::debug!(
            "Caption loader for {}: {}s chunks, languages {:?} ({} match)",
            media_id,
            config.chunk_seconds,
            languages,
            config.language_match
        );

        Ok(Self {
            media_id,
            template,
            partitioner,
            languages,
            language_match: config.language_match,
            metadata_keys: config.metadata_keys,
        })
    }

    pub fn media_id(&self) -> &str {
        &self.media_id
    }

    pub fn chunk_seconds(&self) -> u64 {
        self.partitioner.width_seconds()
    }

    /// Apply this loader's language policy to a track list.
    pub fn select<'a>(&self, tracks: &'a [TranscriptTrack]) -> Selection<'a> {
        select_track(tracks, &self.languages, self.language_match)
    }

    /// Load all caption documents, in chunk order.
    ///
    /// A video without a usable track yields an empty list.
    pub async fn load<S>(&self, source: &S) -> AppResult<Vec<CaptionDocument>>
    where
        S: TranscriptSource + MetadataSource + ?Sized,
    {
        let mut documents = Vec::new();
        self.load_into(source, &mut documents).await?;
        Ok(documents)
    }

    /// Load caption documents into a sink, returning how many were sent.
    pub async fn load_into<S, K>(&self, source: &S, sink: &mut K) -> AppResult<usize>
    where
        S: TranscriptSource + MetadataSource + ?Sized,
        K: DocumentSink + ?Sized,
    {
        tracing::info!(
            "Loading captions for {} from {}",
            self.media_id,
            source.provider_name()
        );

        let tracks = source.list_tracks(&self.media_id).await?;
        if tracks.is_empty() {
            tracing::info!("Video {} has no captions", self.media_id);
            return Ok(0);
        }

        let track = match self.select(&tracks) {
            Selection::Found(track) => track,
            Selection::NotFound => {
                let available: Vec<String> = tracks.iter().map(|t| t.to_string()).collect();
                tracing::info!(
                    "No caption track for {} in languages {:?}; available: {}",
                    self.media_id,
                    self.languages,
                    available.join(", ")
                );
                return Ok(0);
            }
        };

        tracing::info!("Using caption track {}", track);

        let video = source
            .video_metadata(&self.media_id, &self.metadata_keys)
            .await?;
        let shared = static_metadata(video, &self.media_id, &track.language_code);

        let fragments = source.fetch_fragments(track).await?;
        let chunks = self.partitioner.partition(&fragments);

        let count = chunks.len();
        for chunk in chunks {
            sink.accept(self.document(chunk, &shared))?;
        }

        tracing::info!(
            "Loaded {} caption chunks from {} fragments",
            count,
            fragments.len()
        );

        Ok(count)
    }

    fn document(&self, chunk: TimedChunk, shared: &VideoMetadata) -> CaptionDocument {
        let metadata = chunk_metadata(&chunk, &self.template, &self.media_id, shared);
        CaptionDocument::new(chunk.text, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::metadata::{CAPTION_FORMAT_TAG, KEY_CAPTION_FORMAT, KEY_LANGUAGE_CODE};
    use tubecap_youtube::{CaptionFragment, MetadataValue, MockSource};

    const WATCH_URL: &str = "https://www.youtube.com/watch?v=7mCE73j59Zs";

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack::new(code, code, generated, format!("mock://{}/{}", code, generated))
    }

    fn fragments(texts: &[(f64, f64, &str)]) -> Vec<CaptionFragment> {
        texts
            .iter()
            .map(|(s, d, t)| CaptionFragment::new(*s, *d, *t))
            .collect()
    }

    fn sample_source() -> MockSource {
        MockSource::new()
            .with_track(
                track("en", true),
                fragments(&[(0.0, 5.0, "auto")]),
            )
            .with_track(
                track("en", false),
                fragments(&[(0.0, 5.0, "a"), (100.0, 30.0, "b"), (125.0, 10.0, "c")]),
            )
            .with_metadata("title", "When Love Comes To Town")
            .with_metadata("author", "U2")
            .with_metadata("lengthSeconds", 259i64)
    }

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::new(WATCH_URL);
        assert_eq!(config.chunk_seconds, 120);
        assert_eq!(config.url_template, DEFAULT_URL_TEMPLATE);
        assert_eq!(config.languages[0], "en-us");
        assert_eq!(config.language_match, LanguageMatch::Exact);
        assert_eq!(config.metadata_keys, vec!["title", "author"]);

        let loader = CaptionLoader::new(config).unwrap();
        assert_eq!(loader.media_id(), "7mCE73j59Zs");
        assert_eq!(loader.chunk_seconds(), 120);
    }

    #[test]
    fn test_rejects_bad_config() {
        let cases = vec![
            LoaderConfig::new(""),
            LoaderConfig::new("https://example.com/video"),
            LoaderConfig::new(WATCH_URL).with_url_template(""),
            LoaderConfig::new(WATCH_URL).with_url_template("https://youtu.be/{mediaId}"),
            LoaderConfig::new(WATCH_URL).with_url_template("{mediaId}{startSeconds}{extra}"),
            LoaderConfig::new(WATCH_URL).with_chunk_seconds(0),
            LoaderConfig::new(WATCH_URL).with_languages(Vec::<String>::new()),
            LoaderConfig::new(WATCH_URL).with_languages([" "]),
        ];

        for config in cases {
            let result = CaptionLoader::new(config.clone());
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "expected config error for {:?}",
                config
            );
        }
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig {
            chunk_seconds: 30,
            language_match: "prefix".to_string(),
            languages: vec!["fr".to_string()],
            ..Default::default()
        };
        let config = LoaderConfig::from_app_config("qGulvsKFyvo", &app).unwrap();
        assert_eq!(config.chunk_seconds, 30);
        assert_eq!(config.language_match, LanguageMatch::Prefix);
        assert_eq!(config.languages, vec!["fr"]);

        let bad = AppConfig {
            language_match: "fuzzy".to_string(),
            ..Default::default()
        };
        assert!(LoaderConfig::from_app_config("qGulvsKFyvo", &bad).is_err());
    }

    #[tokio::test]
    async fn test_load_documents() {
        let loader = CaptionLoader::new(LoaderConfig::new(WATCH_URL)).unwrap();
        let source = sample_source();

        let documents = loader.load(&source).await.unwrap();
        assert_eq!(documents.len(), 2);

        assert_eq!(documents[0].page_content, "a");
        assert_eq!(documents[0].start_seconds(), Some(0));
        assert_eq!(
            documents[0].source(),
            Some("https://www.youtube.com/watch?v=7mCE73j59Zs&t=0s")
        );

        let second = &documents[1];
        assert_eq!(second.page_content, "b c");
        assert_eq!(second.start_seconds(), Some(120));
        assert_eq!(
            second.metadata["start_timestamp"],
            MetadataValue::from("00:02:00")
        );
        assert_eq!(second.metadata["media_id"], MetadataValue::from("7mCE73j59Zs"));
        assert_eq!(second.metadata[KEY_LANGUAGE_CODE], MetadataValue::from("en"));
        assert_eq!(
            second.metadata[KEY_CAPTION_FORMAT],
            MetadataValue::from(CAPTION_FORMAT_TAG)
        );
        assert_eq!(
            second.metadata["title"],
            MetadataValue::from("When Love Comes To Town")
        );
        assert_eq!(second.metadata["author"], MetadataValue::from("U2"));
        // Only requested keys are copied
        assert!(!second.metadata.contains_key("lengthSeconds"));
    }

    #[tokio::test]
    async fn test_generated_fallback_and_language_code() {
        let source = MockSource::new().with_track(
            track("en-US", true),
            fragments(&[(1.0, 2.0, "auto captions")]),
        );
        let loader = CaptionLoader::new(LoaderConfig::new(WATCH_URL)).unwrap();

        let documents = loader.load(&source).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].page_content, "auto captions");
        assert_eq!(
            documents[0].metadata[KEY_LANGUAGE_CODE],
            MetadataValue::from("en-US")
        );
    }

    #[tokio::test]
    async fn test_no_matching_track_is_empty() {
        let source = MockSource::new().with_track(track("fr", false), fragments(&[(0.0, 1.0, "salut")]));
        let loader = CaptionLoader::new(LoaderConfig::new(WATCH_URL)).unwrap();

        let documents = loader.load(&source).await.unwrap();
        assert!(documents.is_empty());
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_captions_disabled_is_empty() {
        let loader = CaptionLoader::new(LoaderConfig::new(WATCH_URL)).unwrap();
        let documents = loader.load(&MockSource::new()).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_mode_reaches_dialect() {
        let source = MockSource::new().with_track(track("en-GB", false), fragments(&[(0.0, 1.0, "cheers")]));

        let exact = CaptionLoader::new(LoaderConfig::new(WATCH_URL).with_languages(["en"])).unwrap();
        assert!(exact.load(&source).await.unwrap().is_empty());

        let prefix = CaptionLoader::new(
            LoaderConfig::new(WATCH_URL)
                .with_languages(["en"])
                .with_language_match(LanguageMatch::Prefix),
        )
        .unwrap();
        let documents = prefix.load(&source).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].page_content, "cheers");
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let loader = CaptionLoader::new(LoaderConfig::new(WATCH_URL)).unwrap();
        let source = MockSource::new().failing("connection reset");

        let result = loader.load(&source).await;
        assert!(matches!(result, Err(AppError::Source(_))));
    }

    #[tokio::test]
    async fn test_load_into_counts_and_is_repeatable() {
        let loader = CaptionLoader::new(
            LoaderConfig::new(WATCH_URL)
                .with_chunk_seconds(60)
                .with_metadata_keys(Vec::<String>::new()),
        )
        .unwrap();
        let source = sample_source();

        let mut first: Vec<CaptionDocument> = Vec::new();
        let count = loader.load_into(&source, &mut first).await.unwrap();
        assert_eq!(count, first.len());
        assert!(!first[0].metadata.contains_key("title"));

        let second = loader.load(&source).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_through_trait_object() {
        use std::sync::Arc;
        use tubecap_youtube::CaptionProvider;

        let source: Arc<dyn CaptionProvider> = Arc::new(sample_source());
        let loader = CaptionLoader::new(LoaderConfig::new("7mCE73j59Zs")).unwrap();

        let documents = loader.load(source.as_ref()).await.unwrap();
        assert_eq!(documents.len(), 2);
    }
}
