//! Configuration management for tubecap.
//!
//! Settings are layered, later sources winning:
//! - Built-in defaults (the `DEFAULT_*` constants below)
//! - Config file (`TUBECAP_CONFIG` or `.tubecap/config.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default chunk width, in seconds.
pub const DEFAULT_CHUNK_SECONDS: u32 = 120;

/// Default template for the `source` metadata of each chunk.
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.youtube.com/watch?v={mediaId}&t={startSeconds}s";

/// English dialects (ISO 639-1 with region), ordered by similarity to `en-us`.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "en-us", "en", "en-ca", "en-gb", "en-ie", "en-au", "en-nz", "en-bz", "en-jm", "en-ph",
    "en-tt", "en-za", "en-zw",
];

/// Video metadata keys copied onto every chunk.
pub const DEFAULT_METADATA_KEYS: &[&str] = &["title", "author"];

/// Default language matching mode ("exact" or "prefix").
pub const DEFAULT_LANGUAGE_MATCH: &str = "exact";

/// Default HTTP request timeout, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const KNOWN_LANGUAGE_MATCH: &[&str] = &["exact", "prefix"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Width of each caption chunk, in seconds
    pub chunk_seconds: u32,

    /// Template for chunk source URLs, with `{mediaId}` and `{startSeconds}`
    pub url_template: String,

    /// Caption languages, most preferred first
    pub languages: Vec<String>,

    /// Language matching mode ("exact" or "prefix")
    pub language_match: String,

    /// Video metadata keys to copy onto chunks
    pub metadata_keys: Vec<String>,

    /// HTTP request timeout for the transcript source
    pub http_timeout_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    captions: Option<CaptionsSection>,
    http: Option<HttpSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsSection {
    chunk_seconds: Option<u32>,
    url_template: Option<String>,
    languages: Option<Vec<String>>,
    language_match: Option<String>,
    metadata_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpSection {
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            chunk_seconds: DEFAULT_CHUNK_SECONDS,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            language_match: DEFAULT_LANGUAGE_MATCH.to_string(),
            metadata_keys: DEFAULT_METADATA_KEYS.iter().map(|s| s.to_string()).collect(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `TUBECAP_CONFIG`: Path to config file
    /// - `TUBECAP_CHUNK_SECONDS`: Chunk width in seconds
    /// - `TUBECAP_LANGUAGES`: Comma-separated language preference list
    /// - `TUBECAP_URL_TEMPLATE`: Source URL template
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use tubecap_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Chunk width: {}s", config.chunk_seconds);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.or_else(|| {
            std::env::var("TUBECAP_CONFIG").ok().map(PathBuf::from)
        });

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                cf.clone()
            }
            None => PathBuf::from(".tubecap").join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
            tracing::debug!("Merged config file {:?}", config_path);
        }

        config.apply_env()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(secs) = std::env::var("TUBECAP_CHUNK_SECONDS") {
            self.chunk_seconds = secs.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "TUBECAP_CHUNK_SECONDS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
        }

        if let Ok(languages) = std::env::var("TUBECAP_LANGUAGES") {
            self.languages = split_list(&languages);
        }

        if let Ok(template) = std::env::var("TUBECAP_URL_TEMPLATE") {
            self.url_template = template;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(captions) = config_file.captions {
            if let Some(secs) = captions.chunk_seconds {
                result.chunk_seconds = secs;
            }
            if let Some(template) = captions.url_template {
                result.url_template = template;
            }
            if let Some(languages) = captions.languages {
                result.languages = languages;
            }
            if let Some(mode) = captions.language_match {
                result.language_match = mode;
            }
            if let Some(keys) = captions.metadata_keys {
                result.metadata_keys = keys;
            }
        }

        if let Some(http) = config_file.http {
            if let Some(timeout) = http.timeout_secs {
                result.http_timeout_secs = timeout;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the file and environment.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate settings that don't depend on a particular video.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_seconds == 0 {
            return Err(AppError::Config(
                "chunkSeconds must be a positive number of seconds".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config(
                "HTTP timeout must be a positive number of seconds".to_string(),
            ));
        }

        let mode = self.language_match.to_lowercase();
        if !KNOWN_LANGUAGE_MATCH.contains(&mode.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown language match mode: {}. Supported: {}",
                self.language_match,
                KNOWN_LANGUAGE_MATCH.join(", ")
            )));
        }

        Ok(())
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.chunk_seconds, 120);
        assert_eq!(config.languages.first().map(String::as_str), Some("en-us"));
        assert_eq!(config.languages.len(), 13);
        assert_eq!(config.metadata_keys, vec!["title", "author"]);
        assert_eq!(config.language_match, "exact");
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(None, true, true);
        assert!(config.verbose);
        assert!(config.no_color);
        assert_eq!(config.log_level, Some("debug".to_string()));

        let config = AppConfig::default().with_overrides(Some("trace".to_string()), true, false);
        assert_eq!(config.log_level, Some("trace".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "captions:\n  chunkSeconds: 60\n  languages: [fr, fr-ca]\n  languageMatch: prefix\nhttp:\n  timeoutSecs: 5\nlogging:\n  level: warn\n  color: false"
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(merged.chunk_seconds, 60);
        assert_eq!(merged.languages, vec!["fr", "fr-ca"]);
        assert_eq!(merged.language_match, "prefix");
        assert_eq!(merged.http_timeout_secs, 5);
        assert_eq!(merged.log_level, Some("warn".to_string()));
        assert!(merged.no_color);
        // Untouched settings keep their defaults
        assert_eq!(merged.url_template, DEFAULT_URL_TEMPLATE);
    }

    #[test]
    fn test_merge_yaml_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "captions:\n  chunkSeconds: sixty").unwrap();

        let result = AppConfig::default().merge_yaml(file.path());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = AppConfig::load(Some(PathBuf::from("/definitely/not/here.yaml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_zero_chunk_seconds() {
        let config = AppConfig {
            chunk_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_match_mode() {
        let config = AppConfig {
            language_match: "fuzzy".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" en-us, en ,,fr "), vec!["en-us", "en", "fr"]);
        assert!(split_list("").is_empty());
    }
}
