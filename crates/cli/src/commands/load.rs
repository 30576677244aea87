//! Load command handler.
//!
//! Chunks a video's captions and prints the documents on stdout.

use super::build_source;
use clap::Args;
use tubecap_captions::{CaptionLoader, JsonLinesSink, LanguageMatch, LoaderConfig};
use tubecap_core::{config::AppConfig, AppResult};

/// Chunk a video's captions into timestamped documents
#[derive(Args, Debug)]
pub struct LoadCommand {
    /// Video URL (watch, embed, shorts, youtu.be) or bare video id
    pub media: String,

    /// Chunk width in seconds
    #[arg(short = 's', long)]
    pub chunk_seconds: Option<u32>,

    /// Preferred caption language, most preferred first (repeatable, comma-separated)
    #[arg(short, long = "language", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Let a language match its dialects (e.g. "en" matches "en-GB")
    #[arg(long)]
    pub prefix_match: bool,

    /// Template for source URLs, with {mediaId} and {startSeconds}
    #[arg(long)]
    pub url_template: Option<String>,

    /// Video metadata key to copy onto each chunk (repeatable, comma-separated)
    #[arg(long = "metadata-key", value_delimiter = ',')]
    pub metadata_keys: Vec<String>,

    /// Caption source (youtube, mock)
    #[arg(long, default_value = "youtube")]
    pub source: String,

    /// Output one pretty-printed JSON array instead of JSON lines
    #[arg(long)]
    pub json: bool,
}

impl LoadCommand {
    /// Merge command flags over the configured defaults.
    pub fn loader_config(&self, config: &AppConfig) -> AppResult<LoaderConfig> {
        let mut loader_config = LoaderConfig::from_app_config(&self.media, config)?;

        if let Some(secs) = self.chunk_seconds {
            loader_config = loader_config.with_chunk_seconds(secs);
        }
        if !self.languages.is_empty() {
            loader_config = loader_config.with_languages(self.languages.clone());
        }
        if self.prefix_match {
            loader_config = loader_config.with_language_match(LanguageMatch::Prefix);
        }
        if let Some(ref template) = self.url_template {
            loader_config = loader_config.with_url_template(template.clone());
        }
        if !self.metadata_keys.is_empty() {
            loader_config = loader_config.with_metadata_keys(self.metadata_keys.clone());
        }

        Ok(loader_config)
    }

    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing load command for '{}'", self.media);
        tracing::debug!("Load options: {:?}", self);

        // Validate everything before touching the network
        let loader = CaptionLoader::new(self.loader_config(config)?)?;
        let source = build_source(&self.source, config)?;

        let count = if self.json {
            let documents = loader.load(source.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&documents)?);
            documents.len()
        } else {
            let mut sink = JsonLinesSink::new(std::io::stdout().lock());
            let count = loader.load_into(source.as_ref(), &mut sink).await?;
            sink.into_inner()?;
            count
        };

        if count == 0 {
            tracing::warn!("No usable captions for {}", loader.media_id());
        } else {
            tracing::info!("Wrote {} caption documents", count);
        }

        Ok(())
    }
}
