//! Transcript track selection.
//!
//! Human-edited captions always beat auto-generated ones, but an
//! auto-generated track in a wanted language beats no captions at all.
//! Within each pass, the caller's language order decides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tubecap_core::AppError;
use tubecap_youtube::TranscriptTrack;

/// How a requested language is compared against a track's language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMatch {
    /// Case-insensitive equality of the full tag; `en` does not match `en-GB`.
    #[default]
    Exact,

    /// `en` matches `en` and every `en-*` tag, case-insensitively.
    Prefix,
}

impl LanguageMatch {
    /// Check whether an available tag satisfies a requested one.
    pub fn matches(self, requested: &str, available: &str) -> bool {
        if available.eq_ignore_ascii_case(requested) {
            return true;
        }

        match self {
            LanguageMatch::Exact => false,
            LanguageMatch::Prefix => {
                let requested = requested.to_ascii_lowercase();
                let available = available.to_ascii_lowercase();
                available
                    .strip_prefix(&requested)
                    .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageMatch::Exact => "exact",
            LanguageMatch::Prefix => "prefix",
        }
    }
}

impl FromStr for LanguageMatch {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(LanguageMatch::Exact),
            "prefix" => Ok(LanguageMatch::Prefix),
            other => Err(AppError::Config(format!(
                "Unknown language match mode: {}. Supported: exact, prefix",
                other
            ))),
        }
    }
}

impl fmt::Display for LanguageMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of track selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Found(&'a TranscriptTrack),
    NotFound,
}

impl<'a> Selection<'a> {
    /// The selected track, if any.
    pub fn track(self) -> Option<&'a TranscriptTrack> {
        match self {
            Selection::Found(track) => Some(track),
            Selection::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Selection::Found(_))
    }
}

/// Pick one track for the given language preferences.
///
/// Pass 1 looks for human-edited tracks, pass 2 for auto-generated ones.
/// Each pass walks `languages` in order and, for each language, returns the
/// first track (in listing order) that matches.
pub fn select_track<'a>(
    tracks: &'a [TranscriptTrack],
    languages: &[String],
    mode: LanguageMatch,
) -> Selection<'a> {
    let found = find_with_quality(tracks, languages, mode, false)
        .or_else(|| find_with_quality(tracks, languages, mode, true));

    match found {
        Some(track) => {
            tracing::debug!("Selected caption track {}", track);
            Selection::Found(track)
        }
        None => {
            tracing::debug!(
                "No caption track among {} matches languages {:?} ({} match)",
                tracks.len(),
                languages,
                mode
            );
            Selection::NotFound
        }
    }
}

fn find_with_quality<'a>(
    tracks: &'a [TranscriptTrack],
    languages: &[String],
    mode: LanguageMatch,
    is_generated: bool,
) -> Option<&'a TranscriptTrack> {
    languages.iter().find_map(|language| {
        tracks
            .iter()
            .find(|t| t.is_generated == is_generated && mode.matches(language, &t.language_code))
    })
}
