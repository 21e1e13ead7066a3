//! Lenient readers for model-produced JSON. Models routinely return numbers
//! as strings, single strings where lists were asked for, or omit fields;
//! these helpers absorb that at the boundary.

use serde_json::Value;

/// A number, or a string that parses as one.
#[must_use]
pub fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// A non-empty trimmed string.
#[must_use]
pub fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Up to `limit` non-empty strings from a list, or a one-element list from a
/// bare string. Non-string list entries are skipped.
#[must_use]
pub fn string_list(value: Option<&Value>, limit: usize) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| text(Some(item)))
            .take(limit)
            .collect(),
        Some(single @ Value::String(_)) => text(Some(single)).into_iter().take(limit).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn number_accepts_numeric_strings() {
        assert_eq!(number(Some(&json!(0.5))), Some(0.5));
        assert_eq!(number(Some(&json!(" -0.25 "))), Some(-0.25));
        assert_eq!(number(Some(&json!("high"))), None);
        assert_eq!(number(Some(&json!(null))), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn text_rejects_blank() {
        assert_eq!(text(Some(&json!("  "))), None);
        assert_eq!(text(Some(&json!(" ok "))), Some("ok".to_string()));
        assert_eq!(text(Some(&json!(3))), None);
    }

    #[test]
    fn string_list_truncates_and_skips_junk() {
        let v = json!(["a", 1, "", "b", "c", "d", "e", "f"]);
        assert_eq!(string_list(Some(&v), 5), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn string_list_wraps_single_string() {
        assert_eq!(string_list(Some(&json!("only reason")), 5), vec!["only reason"]);
        assert!(string_list(Some(&json!({"a": 1})), 5).is_empty());
        assert!(string_list(None, 5).is_empty());
    }
}
