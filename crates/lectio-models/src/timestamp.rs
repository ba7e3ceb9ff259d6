//! Timestamp parsing for model-returned topic offsets.
//!
//! The model is asked for whole seconds, but in practice returns either
//! a number, a numeric string, or a clock string (`SS`, `MM:SS`,
//! `HH:MM:SS`). Everything here coerces to whole seconds; values that
//! cannot be parsed coerce to zero rather than failing the row.

use serde_json::Value;

/// Parse a colon-delimited clock string into total seconds.
///
/// Segments are read right-to-left as seconds, minutes, hours. A
/// non-numeric segment counts as zero.
///
/// # Examples
/// ```
/// use lectio_models::timestamp::parse_clock;
/// assert_eq!(parse_clock("01:02:03"), 3723);
/// assert_eq!(parse_clock("02:05"), 125);
/// assert_eq!(parse_clock("45"), 45);
/// ```
pub fn parse_clock(value: &str) -> u64 {
    let mut total: i64 = 0;
    for (index, segment) in value.trim().split(':').rev().enumerate() {
        let segment: i64 = segment.trim().parse().unwrap_or(0);
        // Model output is untrusted: absurd segments or segment counts
        // saturate instead of overflowing.
        let scale = 60_i64.checked_pow(index as u32).unwrap_or(i64::MAX);
        total = total.saturating_add(segment.saturating_mul(scale));
    }
    total.max(0) as u64
}

/// Coerce a JSON value into a start offset in whole seconds.
///
/// Accepts a JSON number (fractions truncated), a numeric string, or a
/// clock string. Anything else yields zero.
pub fn parse_timestamp_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.max(0.0).trunc() as u64).unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            if s.contains(':') {
                parse_clock(s)
            } else {
                s.parse::<f64>().map(|f| f.max(0.0).trunc() as u64).unwrap_or(0)
            }
        }
        _ => 0,
    }
}
