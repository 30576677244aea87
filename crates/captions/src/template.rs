//! Source URL templates.
//!
//! A template such as `https://www.youtube.com/watch?v={mediaId}&t={startSeconds}s`
//! is parsed once, at loader construction, so formatting can't fail later.
//! `{{` and `}}` stand for literal braces.

use std::fmt;
use tubecap_core::{AppError, AppResult};

const MEDIA_ID_FIELD: &str = "mediaId";
const START_SECONDS_FIELD: &str = "startSeconds";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    MediaId,
    StartSeconds,
}

/// A validated template for chunk `source` URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrlTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl SourceUrlTemplate {
    /// Parse and validate a template.
    ///
    /// # Errors
    /// `AppError::Config` if the template is empty, has unbalanced braces,
    /// names a field other than `mediaId`/`startSeconds`, or lacks either.
    pub fn parse(template: &str) -> AppResult<Self> {
        if template.trim().is_empty() {
            return Err(AppError::Config(format!(
                "urlTemplate must be specified, with fields for \"{{{}}}\" and \"{{{}}}\"",
                MEDIA_ID_FIELD, START_SECONDS_FIELD
            )));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(invalid(template, "unclosed '{'"));
                    }

                    let field = match name.as_str() {
                        MEDIA_ID_FIELD => Segment::MediaId,
                        START_SECONDS_FIELD => Segment::StartSeconds,
                        other => {
                            return Err(invalid(
                                template,
                                &format!(
                                    "unknown field '{{{}}}'; only {{{}}} and {{{}}} are allowed",
                                    other, MEDIA_ID_FIELD, START_SECONDS_FIELD
                                ),
                            ))
                        }
                    };

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(field);
                }
                '}' => return Err(invalid(template, "single '}' (use '}}' for a literal brace)")),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        for (segment, name) in [
            (Segment::MediaId, MEDIA_ID_FIELD),
            (Segment::StartSeconds, START_SECONDS_FIELD),
        ] {
            if !segments.contains(&segment) {
                return Err(invalid(template, &format!("missing field '{{{}}}'", name)));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// Fill in the template for one chunk.
    pub fn render(&self, media_id: &str, start_seconds: u64) -> String {
        let mut out = String::with_capacity(self.raw.len() + media_id.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::MediaId => out.push_str(media_id),
                Segment::StartSeconds => out.push_str(&start_seconds.to_string()),
            }
        }
        out
    }

    /// The template as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SourceUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn invalid(template: &str, reason: &str) -> AppError {
    AppError::Config(format!("Invalid urlTemplate '{}': {}", template, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubecap_core::config::DEFAULT_URL_TEMPLATE;

    #[test]
    fn test_default_template() {
        let template = SourceUrlTemplate::parse(DEFAULT_URL_TEMPLATE).unwrap();
        assert_eq!(
            template.render("7mCE73j59Zs", 240),
            "https://www.youtube.com/watch?v=7mCE73j59Zs&t=240s"
        );
        assert_eq!(template.to_string(), DEFAULT_URL_TEMPLATE);
    }

    #[test]
    fn test_fields_in_any_order_and_repeated() {
        let template = SourceUrlTemplate::parse("{startSeconds}/{mediaId}/{mediaId}").unwrap();
        assert_eq!(template.render("abc", 0), "0/abc/abc");
    }

    #[test]
    fn test_escaped_braces() {
        let template = SourceUrlTemplate::parse("{{x}}-{mediaId}-{startSeconds}").unwrap();
        assert_eq!(template.render("id", 5), "{x}-id-5");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(SourceUrlTemplate::parse(""), Err(AppError::Config(_))));
        assert!(SourceUrlTemplate::parse("   ").is_err());
    }

    #[test]
    fn test_rejects_missing_field() {
        let err = SourceUrlTemplate::parse("https://youtu.be/{mediaId}").unwrap_err();
        assert!(err.to_string().contains("missing field '{startSeconds}'"));
    }

    #[test]
    fn test_rejects_extra_field() {
        let err = SourceUrlTemplate::parse("{mediaId}{startSeconds}{title}").unwrap_err();
        assert!(err.to_string().contains("unknown field '{title}'"));

        // Format specs are not supported
        assert!(SourceUrlTemplate::parse("{mediaId}{startSeconds:05d}").is_err());
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        assert!(SourceUrlTemplate::parse("{mediaId}{startSeconds").is_err());
        assert!(SourceUrlTemplate::parse("{mediaId}}{startSeconds}").is_err());
    }
}
