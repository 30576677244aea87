//! Command handlers for the tubecap CLI.

pub mod load;
pub mod tracks;

// Re-export command types for convenience
pub use load::LoadCommand;
pub use tracks::TracksCommand;

use std::sync::Arc;
use std::time::Duration;
use tubecap_core::{config::AppConfig, AppResult};
use tubecap_youtube::{create_source, CaptionProvider};

/// Build the caption source named on the command line.
pub(crate) fn build_source(name: &str, config: &AppConfig) -> AppResult<Arc<dyn CaptionProvider>> {
    create_source(name, Duration::from_secs(config.http_timeout_secs))
}
