//! Reply-shape normalization and per-record validation.

use serde_json::Value;
use stockpulse_core::{Impact, Sentiment};
use stockpulse_llm::json::{number, string_list};

use crate::types::SentimentResult;

const MAX_KEY_TOPICS: usize = 5;

/// Flatten the accepted reply shapes into a list of records: a bare array,
/// an object holding a `results` or `data` array, or any other object whose
/// values are the records.
pub(crate) fn records(reply: Value) -> Vec<Value> {
    match reply {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ["results", "data"] {
                if matches!(map.get(key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }
            map.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    }
}

/// The integer `index` a record claims, if it has one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn record_index(record: &Value) -> Option<usize> {
    let raw = number(record.get("index"))?;
    if raw < 0.0 || raw.fract().abs() > f64::EPSILON {
        return None;
    }
    Some(raw as usize)
}

/// Validate each field independently, substituting the neutral default for
/// any that are missing or malformed.
pub(crate) fn to_result(record: &Value) -> SentimentResult {
    let fallback = SentimentResult::neutral();

    let sentiment = record
        .get("sentiment")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Sentiment>().ok())
        .unwrap_or(fallback.sentiment);

    let score = record
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .map_or(fallback.score, |s| s.clamp(-1.0, 1.0));

    let impact = record
        .get("impact")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Impact>().ok())
        .unwrap_or(fallback.impact);

    SentimentResult {
        sentiment,
        score,
        impact,
        key_topics: string_list(record.get("keyTopics"), MAX_KEY_TOPICS),
    }
}
