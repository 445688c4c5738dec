//! Paper note parsing and rendering
//!
//! A paper note is named `<paper_id>.md`. The identifier always comes from
//! the file name; a `paper_id` meta line inside the note is rendered for the
//! reader and ignored when parsing.

use serde_json::Value;

use crate::entry::{CHILDREN_KEY, ID_KEY, Record, entry_id};
use crate::error::{Error, Result};
use crate::field::{FieldDescriptor, FieldKind, PAPER_META, PAPER_SECTIONS, SectionBody, paper_fields};
use crate::markdown::{bullet_item, heading_label, meta_line};

/// Title line every paper note starts with.
pub fn paper_title(id: &str) -> String {
    format!("# Paper Note: {id}")
}

/// A fresh entry carrying every known field at its default value.
pub fn default_entry(id: &str) -> Record {
    let mut entry = Record::new();
    for field in paper_fields() {
        entry.insert(field.path.to_string(), field.kind.default_value());
    }
    entry.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    entry.insert(CHILDREN_KEY.to_string(), Value::Array(Vec::new()));
    entry
}

/// Where the parser currently is in the note.
enum Cursor {
    Outside,
    Meta,
    Bucket(&'static FieldDescriptor, Vec<String>),
}

/// Parse a paper note into an entry.
///
/// The result carries every known field except the child entries, starting
/// from the defaults and overlaid with whatever the note fills in.
/// Unrecognized headings and lines are skipped.
pub fn parse_paper_note(id: &str, text: &str) -> Record {
    let mut entry = default_entry(id);
    entry.remove(CHILDREN_KEY);

    let mut cursor = Cursor::Outside;
    for raw in text.lines() {
        let line = raw.trim_end();
        if let Some(label) = heading_label(line) {
            close_bucket(&mut entry, std::mem::replace(&mut cursor, Cursor::Outside));
            cursor = open_section(&label);
            continue;
        }

        match &mut cursor {
            Cursor::Outside => {}
            Cursor::Meta => {
                let Some((key, value)) = meta_line(line) else {
                    continue;
                };
                let Some(field) = PAPER_META.iter().find(|f| f.label == key) else {
                    tracing::trace!(key, "ignoring unknown meta key");
                    continue;
                };
                if field.kind == FieldKind::Identifier {
                    continue;
                }
                if let Some(parsed) = field.parse_inline(value) {
                    entry.insert(field.path.to_string(), parsed);
                }
            }
            Cursor::Bucket(_, items) => {
                if let Some(item) = bullet_item(line) {
                    items.push(item.to_string());
                }
            }
        }
    }
    close_bucket(&mut entry, cursor);
    entry
}

fn open_section(label: &str) -> Cursor {
    for section in PAPER_SECTIONS {
        match &section.body {
            SectionBody::Fields(_) if heading_label(section.heading).as_deref() == Some(label) => {
                return Cursor::Meta;
            }
            SectionBody::Bucket(field) if field.label == label => {
                return Cursor::Bucket(field, Vec::new());
            }
            _ => {}
        }
    }
    Cursor::Outside
}

fn close_bucket(entry: &mut Record, cursor: Cursor) {
    if let Cursor::Bucket(field, items) = cursor {
        if let Some(value) = field.collect_lines(&items) {
            entry.insert(field.path.to_string(), value);
        }
    }
}

/// Render an entry as a complete paper note.
///
/// Output is deterministic: fixed section order, fixed meta order, and
/// placeholders wherever the entry has nothing to show.
pub fn render_paper_note(entry: &Record) -> Result<String> {
    let id = entry_id(entry);
    if id.is_empty() {
        return Err(Error::MissingIdentifier {
            kind: "paper",
            key: ID_KEY,
        });
    }

    let mut md = vec![paper_title(&id), String::new()];
    for section in PAPER_SECTIONS {
        md.push(section.heading.to_string());
        match &section.body {
            SectionBody::Fields(fields) => {
                for field in fields.iter() {
                    let value = if field.kind == FieldKind::Identifier {
                        id.clone()
                    } else {
                        field.render_inline(entry.get(field.path))
                    };
                    md.push(format!("- **{}**: {value}  ", field.label));
                }
            }
            SectionBody::Bucket(field) => {
                for line in field.render_lines(entry.get(field.path)) {
                    md.push(format!("- {line}"));
                }
            }
            SectionBody::Guidance(lines) => {
                md.push(String::new());
                md.extend(lines.iter().map(|line| line.to_string()));
            }
        }
        md.push(String::new());
    }

    Ok(md.join("\n"))
}

/// Headings every paper note declares, in order.
pub fn paper_headings() -> impl Iterator<Item = &'static str> {
    PAPER_SECTIONS.iter().map(|section| section.heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::equivalent;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_entry_has_all_fields() {
        let entry = default_entry("260101-01");
        assert_eq!(entry.len(), 17);
        assert_eq!(entry["paper_id"], json!("260101-01"));
        assert_eq!(entry["year"], json!(0));
        assert_eq!(entry["followed"], json!([]));
    }

    #[test]
    fn test_parse_meta_and_buckets() {
        let text = "\
# Paper Note: 260101-01

## 0. Meta
- **paper_id**: 999999-99
- **title**: Attention Is All You Need
- **year**: `2017`
- **authors**: `[\"Vaswani\", \"Shazeer\"]`
- **tags**: nlp, transformers
- **pdf_path**: `0-survey/references/attention.pdf`
- **url**: …
- **mystery**: ignored

## 5. Problem (paper)
- Sequence models are slow.
- …
- RNNs do not parallelize.

## 7. Key claims (paper)
- claim-1: … (evidence: …)
- Self-attention alone reaches SOTA.
Some commentary that is not a bullet.

## 12. Scratchpad
- never tracked
";
        let entry = parse_paper_note("260101-01", text);

        assert_eq!(entry["paper_id"], json!("260101-01"));
        assert_eq!(entry["title"], json!("Attention Is All You Need"));
        assert_eq!(entry["year"], json!(2017));
        assert_eq!(entry["authors"], json!(["Vaswani", "Shazeer"]));
        assert_eq!(entry["tags"], json!(["nlp", "transformers"]));
        assert_eq!(entry["pdf_path"], json!("0-survey/references/attention.pdf"));
        assert_eq!(entry["url"], json!(""));
        assert_eq!(
            entry["problem"],
            json!("Sequence models are slow.\nRNNs do not parallelize.")
        );
        assert_eq!(entry["key_claims"], json!(["Self-attention alone reaches SOTA."]));
        assert_eq!(entry["hypotheses"], json!([]));
        assert!(!entry.contains_key("mystery"));
        assert!(!entry.contains_key("followed"));
    }

    #[test]
    fn test_render_requires_identifier() {
        let err = render_paper_note(&Record::new()).unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier { kind: "paper", .. }));
    }

    #[test]
    fn test_render_empty_entry_uses_placeholders() {
        let md = render_paper_note(&default_entry("260101-01")).unwrap();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "# Paper Note: 260101-01");
        assert!(lines.contains(&"- **paper_id**: 260101-01  "));
        assert!(lines.contains(&"- **pdf_path**: `…/<file>.pdf`  "));
        assert!(lines.contains(&"- **tags**: `[]`  "));
        assert!(lines.contains(&"- claim-1: … (evidence: …)"));
        for heading in paper_headings() {
            assert!(lines.contains(&heading), "missing {heading}");
        }
    }

    #[test]
    fn test_fresh_note_agrees_with_empty_entry() {
        let entry = default_entry("260101-01");
        let md = render_paper_note(&entry).unwrap();
        let parsed = parse_paper_note("260101-01", &md);
        for field in paper_fields() {
            assert!(
                equivalent(entry.get(field.path), parsed.get(field.path)),
                "{} differs",
                field.path
            );
        }
    }

    #[test]
    fn test_round_trip_keeps_content() {
        let mut entry = default_entry("260101-02");
        entry.extend(record(json!({
            "title": "A study, with commas",
            "year": 2024,
            "authors": ["Ada", "Grace"],
            "tags": ["调研"],
            "pdf_path": "refs/a.pdf",
            "url": "https://example.org/a:b",
            "method": "Step one.\nStep two.",
            "limitations": ["Small data"],
            "used_in_tasks": ["260102-task-001"]
        })));
        let md = render_paper_note(&entry).unwrap();
        let parsed = parse_paper_note("260101-02", &md);
        for field in paper_fields() {
            assert_eq!(entry.get(field.path), parsed.get(field.path), "{}", field.path);
        }
    }
}
