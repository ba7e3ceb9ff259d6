//! Normalization of raw model output.
//!
//! Model output shape is best-effort: despite being instructed to emit
//! raw JSON or HTML, the model regularly wraps its answer in a fenced
//! markdown code block. The stripping lives here as a dedicated
//! function so the one tolerant spot stays independently testable.

use lectio_models::RawTopic;

use crate::error::{GeminiError, GeminiResult};

/// Strip a leading/trailing triple-backtick fence, tagged or not.
///
/// Idempotent: applying it to already-stripped text is a no-op.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(after) = body.strip_prefix("```") {
        // Drop the language tag (`json`, `html`, or nothing) with the
        // rest of the fence line.
        body = match after.split_once('\n') {
            Some((_tag, rest)) => rest,
            None => after,
        };
    }

    let trimmed = body.trim_end();
    body = trimmed.strip_suffix("```").unwrap_or(trimmed);

    body.trim()
}

/// Parse model output as an ordered topic array.
///
/// Malformed JSON is a terminal content error for the whole task;
/// there is no partial recovery of individual rows.
pub fn parse_topics(raw_text: &str) -> GeminiResult<Vec<RawTopic>> {
    let stripped = strip_code_fence(raw_text);
    let topics: Vec<RawTopic> = serde_json::from_str(stripped)?;
    Ok(topics)
}

/// Parse model output as a single HTML document body.
pub fn parse_html(raw_text: &str) -> GeminiResult<String> {
    let stripped = strip_code_fence(raw_text);
    if stripped.is_empty() {
        return Err(GeminiError::EmptyText);
    }
    Ok(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tagged_json_fence() {
        let text = "```json\n[{\"topic\":\"Intro\"}]\n```";
        assert_eq!(strip_code_fence(text), "[{\"topic\":\"Intro\"}]");
    }

    #[test]
    fn test_strip_tagged_html_fence() {
        let text = "```html\n<h3>Overview</h3>\n```";
        assert_eq!(strip_code_fence(text), "<h3>Overview</h3>");
    }

    #[test]
    fn test_strip_untagged_fence() {
        assert_eq!(strip_code_fence("```\n<p>hi</p>\n```"), "<p>hi</p>");
        assert_eq!(strip_code_fence("```[1,2]```"), "[1,2]");
    }

    #[test]
    fn test_strip_is_noop_without_fence() {
        assert_eq!(strip_code_fence("<p>plain</p>"), "<p>plain</p>");
        assert_eq!(strip_code_fence("  spaced  "), "spaced");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_code_fence("```json\n[1, 2, 3]\n```");
        assert_eq!(strip_code_fence(once), once);
    }

    #[test]
    fn test_strip_leading_fence_only() {
        assert_eq!(strip_code_fence("```json\n[1]"), "[1]");
    }

    #[test]
    fn test_parse_topics_fenced() {
        let raw = "```json\n[{\"topic\":\"Intro\",\"timestamp_seconds\":0,\"keywords\":[\"a\",\"b\"]}]\n```";
        let topics = parse_topics(raw).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_parse_topics_malformed_is_terminal() {
        let result = parse_topics("not json at all");
        assert!(matches!(result, Err(GeminiError::MalformedOutput(_))));
    }

    #[test]
    fn test_parse_html_strips_and_rejects_empty() {
        assert_eq!(parse_html("```html\n<h3>A</h3>\n```").unwrap(), "<h3>A</h3>");
        assert!(matches!(parse_html("``````"), Err(GeminiError::EmptyText)));
        assert!(matches!(parse_html("   "), Err(GeminiError::EmptyText)));
    }
}
