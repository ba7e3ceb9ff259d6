//! Topic post-processing.
//!
//! Validates model-returned topic rows against the known media
//! duration. Invalid rows are dropped, never corrected, and the stored
//! order is the model's order: the prompt asks for chronological
//! output but nothing here re-sorts it.

use tracing::warn;

use lectio_models::{normalize_keywords, parse_timestamp_value, RawTopic, Topic};

/// Title used when the model omits one.
const FALLBACK_TITLE: &str = "Unknown Topic";

/// Convert raw model rows into validated topic rows.
///
/// Clamping rule: when the true duration is known (> 0), a topic whose
/// start offset exceeds it is dropped entirely. A dropped row is a
/// per-item skip, not a pipeline failure.
pub fn build_topics(raw: Vec<RawTopic>, duration_seconds: u64) -> Vec<Topic> {
    let mut topics = Vec::with_capacity(raw.len());

    for row in raw {
        let start_seconds = row
            .timestamp_seconds
            .as_ref()
            .map(parse_timestamp_value)
            .unwrap_or(0);

        if duration_seconds > 0 && start_seconds > duration_seconds {
            warn!(
                start_seconds,
                duration_seconds,
                title = row.topic.as_deref().unwrap_or(FALLBACK_TITLE),
                "Dropping topic starting past end of media"
            );
            continue;
        }

        topics.push(Topic {
            title: row.topic.unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            start_seconds,
            keywords: normalize_keywords(row.keywords.as_ref()),
        });
    }

    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(title: &str, timestamp: serde_json::Value) -> RawTopic {
        serde_json::from_value(json!({
            "topic": title,
            "timestamp_seconds": timestamp,
            "keywords": ["a", "b"]
        }))
        .unwrap()
    }

    #[test]
    fn test_build_topics_basic() {
        let topics = build_topics(vec![raw("Intro", json!(0))], 0);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "Intro");
        assert_eq!(topics[0].start_seconds, 0);
        assert_eq!(topics[0].keywords, "a, b");
    }

    #[test]
    fn test_build_topics_drops_only_out_of_range_entry() {
        let rows = vec![
            raw("Intro", json!(0)),
            raw("Ghost", json!(500)),
            raw("Closing", json!(290)),
        ];
        let topics = build_topics(rows, 300);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].title, "Intro");
        assert_eq!(topics[1].title, "Closing");
    }

    #[test]
    fn test_build_topics_unknown_duration_keeps_everything() {
        let topics = build_topics(vec![raw("Late", json!(99999))], 0);
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn test_build_topics_clock_string_timestamp() {
        let topics = build_topics(vec![raw("Q&A", json!("02:05"))], 300);
        assert_eq!(topics[0].start_seconds, 125);
    }

    #[test]
    fn test_build_topics_preserves_model_order() {
        // Out-of-order timestamps are passed through, not re-sorted.
        let rows = vec![raw("Second", json!(120)), raw("First", json!(30))];
        let topics = build_topics(rows, 0);
        assert_eq!(topics[0].title, "Second");
        assert_eq!(topics[1].title, "First");
    }

    #[test]
    fn test_build_topics_missing_fields() {
        let row: RawTopic = serde_json::from_value(json!({})).unwrap();
        let topics = build_topics(vec![row], 300);
        assert_eq!(topics[0].title, "Unknown Topic");
        assert_eq!(topics[0].start_seconds, 0);
        assert_eq!(topics[0].keywords, "");
    }

    #[test]
    fn test_build_topics_scalar_keywords() {
        let row: RawTopic =
            serde_json::from_value(json!({"topic": "T", "keywords": "solo"})).unwrap();
        let topics = build_topics(vec![row], 0);
        assert_eq!(topics[0].keywords, "solo");
    }

    #[test]
    fn test_build_topics_boundary_is_kept() {
        // Offset equal to the duration is still in range.
        let topics = build_topics(vec![raw("End", json!(300))], 300);
        assert_eq!(topics.len(), 1);
    }
}
