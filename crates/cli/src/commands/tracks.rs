//! Tracks command handler.
//!
//! Lists a video's caption tracks and marks the one `load` would use.

use super::build_source;
use clap::Args;
use tubecap_captions::{CaptionLoader, LanguageMatch, LoaderConfig};
use tubecap_core::{config::AppConfig, AppResult};
use tubecap_youtube::TranscriptSource;

/// List available caption tracks
#[derive(Args, Debug)]
pub struct TracksCommand {
    /// Video URL or bare video id
    pub media: String,

    /// Preferred caption language (repeatable, comma-separated)
    #[arg(short, long = "language", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Let a language match its dialects
    #[arg(long)]
    pub prefix_match: bool,

    /// Caption source (youtube, mock)
    #[arg(long, default_value = "youtube")]
    pub source: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl TracksCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing tracks command for '{}'", self.media);

        let mut loader_config = LoaderConfig::from_app_config(&self.media, config)?;
        if !self.languages.is_empty() {
            loader_config = loader_config.with_languages(self.languages.clone());
        }
        if self.prefix_match {
            loader_config = loader_config.with_language_match(LanguageMatch::Prefix);
        }

        let loader = CaptionLoader::new(loader_config)?;
        let source = build_source(&self.source, config)?;

        let tracks = source.list_tracks(loader.media_id()).await?;
        let selected = loader.select(&tracks).track();

        if self.json {
            let output = serde_json::json!({
                "mediaId": loader.media_id(),
                "tracks": tracks
                    .iter()
                    .map(|t| serde_json::json!({
                        "languageCode": t.language_code,
                        "languageName": t.language_name,
                        "isGenerated": t.is_generated,
                        "selected": selected == Some(t),
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if tracks.is_empty() {
            println!("No captions available for {}", loader.media_id());
        } else {
            println!("Caption tracks for {}:", loader.media_id());
            for track in &tracks {
                let marker = if selected == Some(track) { "*" } else { " " };
                println!("{} {:<28} {}", marker, track.to_string(), track.language_name);
            }
            if selected.is_none() {
                println!("No track matches the requested languages");
            }
        }

        Ok(())
    }
}
