//! Line-level markdown helpers shared by the note parsers
//!
//! Notes are line-oriented: headings, `- **key**: value` meta bullets,
//! `- [ ] key: value` checkbox bullets and plain `- item` bullets. Nothing
//! here builds a document tree; each helper looks at one line.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Leading ordinal of a heading, e.g. `5. ` in `## 5. Problem (paper)`.
static HEADING_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("Invalid heading ordinal regex"));

/// `- **key**: value`
static META_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \*\*(?P<key>[^*]+)\*\*:\s*(?P<value>.*)$").expect("Invalid meta line regex")
});

/// `- [ ] rest` or `- [x] rest`
static CHECKBOX_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \[(?P<state>[ xX])\]\s+(?P<rest>.*)$").expect("Invalid checkbox regex")
});

/// Marker opening a second-level heading.
pub const HEADING_MARKER: &str = "## ";

/// The bucket label of a second-level heading line.
///
/// The ordinal prefix and any parenthetical suffix are dropped, so
/// `## 7. Key claims (paper)` yields `Key claims`. Returns `None` for lines
/// that are not second-level headings.
pub fn heading_label(line: &str) -> Option<String> {
    let heading = line.trim_end().strip_prefix(HEADING_MARKER)?.trim();
    let heading = HEADING_ORDINAL.replace(heading, "");
    let label = heading.split('(').next().unwrap_or_default().trim();
    Some(label.to_string())
}

/// Split a `- **key**: value` line into its trimmed key and value.
pub fn meta_line(line: &str) -> Option<(&str, &str)> {
    let caps = META_LINE.captures(line.trim())?;
    let key = caps.name("key")?.as_str().trim();
    let value = caps.name("value")?.as_str().trim();
    Some((key, value))
}

/// The payload of a `- [ ] ...` checkbox line.
pub fn checkbox_payload(line: &str) -> Option<&str> {
    let caps = CHECKBOX_LINE.captures(line.trim())?;
    Some(caps.name("rest")?.as_str().trim())
}

/// The text of a `- item` bullet line, trimmed.
pub fn bullet_item(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("- ").map(str::trim)
}

/// Split `key: value` at the first ASCII or full-width colon.
pub fn split_key_value(payload: &str) -> Option<(&str, &str)> {
    let (idx, colon) = payload.char_indices().find(|(_, c)| matches!(c, ':' | '：'))?;
    let key = payload[..idx].trim();
    let value = payload[idx + colon.len_utf8()..].trim();
    Some((key, value))
}

/// Strip one pair of surrounding backticks, after trimming.
pub fn strip_backticks(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// First stage of list parsing: a JSON array, optionally in backticks.
///
/// Returns `None` when the value does not start with `[` or is not a valid
/// JSON array.
pub fn parse_json_list(raw: &str) -> Option<Vec<Value>> {
    let candidate = strip_backticks(raw).trim();
    if !candidate.starts_with('[') {
        return None;
    }
    serde_json::from_str::<Vec<Value>>(candidate).ok()
}

/// Second stage of list parsing: comma-separated items.
pub fn split_delimited(raw: &str) -> Vec<Value> {
    strip_backticks(raw)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Value::String(item.to_string()))
        .collect()
}

/// Parse an inline list: JSON first, comma-separated otherwise.
pub fn parse_inline_list(raw: &str) -> Vec<Value> {
    parse_json_list(raw).unwrap_or_else(|| {
        tracing::trace!(value = raw, "inline list is not JSON, splitting on commas");
        split_delimited(raw)
    })
}

/// Render a list as a single-line JSON array: `["a", "b"]`.
pub fn inline_list(items: &[Value]) -> String {
    let rendered: Vec<String> = items.iter().map(Value::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// The display text of a scalar value; empty for absent, null or `false`.
pub fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("## 0. Meta", Some("Meta"))]
    #[case("## 7. Key claims (paper)", Some("Key claims"))]
    #[case("## 10. What we can reuse (our project)  ", Some("What we can reuse"))]
    #[case("## Problem", Some("Problem"))]
    #[case("# Paper Note: 260101-01", None)]
    #[case("### 1. Deeper", None)]
    fn test_heading_label(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(heading_label(line).as_deref(), expected);
    }

    #[test]
    fn test_meta_line() {
        assert_eq!(
            meta_line("- **tags**: `[\"nlp\"]`  "),
            Some(("tags", "`[\"nlp\"]`"))
        );
        assert_eq!(meta_line("- tags: x"), None);
    }

    #[rstest]
    #[case("url: `https://x.org/a:b`", Some(("url", "`https://x.org/a:b`")))]
    #[case("why_now：because", Some(("why_now", "because")))]
    #[case("why_now： a: b", Some(("why_now", "a: b")))]
    #[case("no delimiter", None)]
    fn test_split_key_value(#[case] payload: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_key_value(payload), expected);
    }

    #[test]
    fn test_checkbox_payload() {
        assert_eq!(checkbox_payload("- [x] stage: 1-validation  "), Some("stage: 1-validation"));
        assert_eq!(checkbox_payload("- [ ] hypothesis：x"), Some("hypothesis：x"));
        assert_eq!(checkbox_payload("- stage: 1"), None);
    }

    #[test]
    fn test_inline_list_two_stages() {
        assert_eq!(parse_json_list("`[\"a\", 2]`"), Some(vec![json!("a"), json!(2)]));
        assert_eq!(parse_json_list("[\"a\", "), None);
        assert_eq!(parse_json_list("a, b"), None);
        assert_eq!(parse_inline_list("[\"a\", "), vec![json!("[\"a\"")]);
        assert_eq!(parse_inline_list("`Ada, Grace , `"), vec![json!("Ada"), json!("Grace")]);
    }

    #[test]
    fn test_inline_list_rendering() {
        assert_eq!(inline_list(&[json!("a"), json!("调研")]), "[\"a\", \"调研\"]");
        assert_eq!(inline_list(&[]), "[]");
    }
}
