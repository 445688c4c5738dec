//! Placeholder detection and field equivalence
//!
//! Notes are scaffolded with example text so a fresh document shows what
//! belongs where. Those values must count as absent, otherwise every new
//! note would disagree with its empty record.

use serde_json::Value;

/// The ellipsis character marking template text.
pub const ELLIPSIS: char = '…';

/// Whether `s` is placeholder text.
///
/// After trimming, a value is a placeholder when it is empty, consists only
/// of dots and ellipsis characters, or contains an ellipsis anywhere.
pub fn is_placeholder(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty()
        || trimmed.chars().all(|c| c == '.' || c == ELLIPSIS)
        || trimmed.contains(ELLIPSIS)
}

/// Normalize a string: empty when it is a placeholder, trimmed otherwise.
pub fn normalize_str(s: &str) -> String {
    if is_placeholder(s) {
        String::new()
    } else {
        s.trim().to_string()
    }
}

/// Normalize any JSON value for comparison.
///
/// Strings normalize as in [`normalize_str`]. Arrays drop placeholder string
/// items and trim the rest; non-string items pass through untouched. All
/// other values are returned as-is.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_str(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if is_placeholder(s) => None,
                    Value::String(s) => Some(Value::String(s.trim().to_string())),
                    other => Some(other.clone()),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Whether two values agree after normalization.
///
/// An absent value is compared as JSON `null`.
pub fn equivalent(a: Option<&Value>, b: Option<&Value>) -> bool {
    let a = a.map(normalize_value).unwrap_or(Value::Null);
    let b = b.map(normalize_value).unwrap_or(Value::Null);
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_shapes() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("..."));
        assert!(is_placeholder("......"));
        assert!(is_placeholder("…"));
        assert!(is_placeholder(".…."));
        assert!(is_placeholder("claim-1: … (evidence: …)"));
        assert!(!is_placeholder("claim-1: ... (evidence: ...)"));
        assert!(!is_placeholder("nlp"));
    }

    #[test]
    fn test_normalize_list_keeps_non_strings() {
        let value = json!(["  nlp ", "...", 3, null, "a…b"]);
        assert_eq!(normalize_value(&value), json!(["nlp", 3, null]));
    }

    #[test]
    fn test_equivalent_treats_missing_as_null() {
        assert!(equivalent(None, Some(&Value::Null)));
        assert!(!equivalent(None, Some(&json!(""))));
        assert!(equivalent(Some(&json!("…")), Some(&json!(""))));
    }
}
