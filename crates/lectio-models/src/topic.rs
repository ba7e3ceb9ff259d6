//! Topic rows for the video chronology index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated topic row, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic title shown in the index
    pub title: String,
    /// Start offset into the media, whole seconds
    pub start_seconds: u64,
    /// Comma-separated keyword string (may be empty)
    pub keywords: String,
}

/// One element of the model-returned topic array, before validation.
///
/// The schema in the prompt asks for `topic` / `timestamp_seconds` /
/// `keywords`, but the model is not guaranteed to honor the field
/// types, so the loose fields stay `Value` until post-processing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTopic {
    /// Topic title; absent titles get a placeholder downstream
    #[serde(default)]
    pub topic: Option<String>,
    /// Start offset, as a number or clock string
    #[serde(default)]
    pub timestamp_seconds: Option<Value>,
    /// Keyword list, or occasionally a scalar
    #[serde(default)]
    pub keywords: Option<Value>,
}

/// Flatten a model-returned keyword value into a single string.
///
/// Lists join with `", "`, scalars coerce to their string form, and an
/// absent value yields an empty string.
pub fn normalize_keywords(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
