//! Media reference handling.
//!
//! Turns the caller's media reference (a watch/embed/shorts/short-link URL
//! or a bare video id) into the 11-character YouTube video id.

use tubecap_core::{AppError, AppResult};
use url::Url;

const MEDIA_ID_LEN: usize = 11;

/// Path prefixes whose next segment is the video id.
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "v", "live", "e"];

/// Check whether a host belongs to YouTube.
pub fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com"
        || h == "youtu.be"
        || h == "youtube-nocookie.com"
        || h.ends_with(".youtube.com")
        || h.ends_with(".youtube-nocookie.com")
}

/// Check that a candidate looks like a YouTube video id.
pub fn is_media_id(candidate: &str) -> bool {
    candidate.len() == MEDIA_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video id from a media reference.
///
/// # Errors
/// Returns `AppError::Config` when the reference is empty, isn't a YouTube
/// URL, or carries no recognizable id.
pub fn extract_media_id(reference: &str) -> AppResult<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(AppError::Config("mediaUrl must be specified".to_string()));
    }

    if is_media_id(reference) {
        return Ok(reference.to_string());
    }

    let parsed = Url::parse(reference)
        .or_else(|_| Url::parse(&format!("https://{}", reference)))
        .map_err(|e| AppError::Config(format!("Invalid media URL '{}': {}", reference, e)))?;

    id_from_url(&parsed).ok_or_else(|| {
        AppError::Config(format!(
            "mediaId could not be extracted from mediaUrl '{}'",
            reference
        ))
    })
}

fn id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        tracing::debug!("Not a YouTube host: {}", host);
        return None;
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let first = segments.next();

    let candidate = if host.eq_ignore_ascii_case("youtu.be") {
        first.map(str::to_string)
    } else if first == Some("watch") {
        url.query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.trim().to_string())
    } else if first.is_some_and(|p| ID_PATH_PREFIXES.contains(&p)) {
        segments.next().map(str::to_string)
    } else {
        None
    };

    candidate.filter(|id| is_media_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let id = extract_media_id("https://www.youtube.com/watch?v=7mCE73j59Zs").unwrap();
        assert_eq!(id, "7mCE73j59Zs");

        let id = extract_media_id("https://m.youtube.com/watch?feature=share&v=qGulvsKFyvo&t=42")
            .unwrap();
        assert_eq!(id, "qGulvsKFyvo");
    }

    #[test]
    fn test_path_style_urls() {
        for url in [
            "https://www.youtube.com/embed/7mCE73j59Zs",
            "https://youtube.com/shorts/7mCE73j59Zs",
            "https://www.youtube.com/v/7mCE73j59Zs?version=3",
            "https://youtu.be/7mCE73j59Zs?t=10",
            "https://www.youtube-nocookie.com/embed/7mCE73j59Zs",
            "youtu.be/7mCE73j59Zs",
        ] {
            assert_eq!(extract_media_id(url).unwrap(), "7mCE73j59Zs", "{}", url);
        }
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(extract_media_id(" qGulvsKFyvo ").unwrap(), "qGulvsKFyvo");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(extract_media_id("  "), Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_other_hosts() {
        let result = extract_media_id("https://vimeo.com/watch?v=7mCE73j59Zs");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_missing_id() {
        assert!(extract_media_id("https://www.youtube.com/watch?list=PL123").is_err());
        assert!(extract_media_id("https://www.youtube.com/watch?v=short").is_err());
        assert!(extract_media_id("https://www.youtube.com/channel/UCabcdefghij").is_err());
    }
}
