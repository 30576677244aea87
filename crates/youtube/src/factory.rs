//! Source factory.
//!
//! Creates the transcript/metadata source named by configuration.

use crate::providers::{MockSource, YouTubeSource};
use crate::source::CaptionProvider;
use std::sync::Arc;
use std::time::Duration;
use tubecap_core::{AppError, AppResult};

/// Create a caption source by name.
///
/// # Arguments
/// * `provider` - Source identifier ("youtube", "mock")
/// * `timeout` - HTTP request timeout for network sources
///
/// # Errors
/// Returns `AppError::Config` if the source is unknown or its client can't
/// be built.
pub fn create_source(provider: &str, timeout: Duration) -> AppResult<Arc<dyn CaptionProvider>> {
    match provider.to_lowercase().as_str() {
        "youtube" => {
            let source = YouTubeSource::new(timeout)?;
            Ok(Arc::new(source))
        }
        "mock" => Ok(Arc::new(MockSource::new())),
        _ => Err(AppError::Config(format!(
            "Unknown caption source: '{}'. Supported sources: youtube, mock",
            provider
        ))),
    }
}
