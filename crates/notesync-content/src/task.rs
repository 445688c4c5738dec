//! Task note parsing and rendering
//!
//! Task notes are checkbox bullets of the form `- [ ] key: value` under
//! fixed headings. Keys map to dotted record paths through the task field
//! table. Unlike paper notes, the identifier lives inside the note.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::entry::{Record, get_path, set_path};
use crate::error::{Error, Result};
use crate::field::{FieldKind, SectionBody, TASK_SECTIONS, task_field_by_label};
use crate::markdown::{checkbox_payload, scalar_text, split_key_value};

/// Key holding a task's identifier.
pub const TASK_ID_KEY: &str = "task_id";

/// `# Task: <id>.`
static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\s+Task:\s+(?P<task_id>[^.]+)\.\s*$").expect("Invalid task title regex")
});

/// Title line every task note starts with.
pub fn task_title(id: &str) -> String {
    format!("# Task: {id}.")
}

/// The trimmed task identifier of a record; empty when absent.
pub fn task_id(record: &Record) -> String {
    scalar_text(record.get(TASK_ID_KEY))
}

/// Parse a task note into a partial record.
///
/// Only fields the note actually fills in are present. The identifier may
/// come from the title line or a `task_id` bullet; a note with neither is
/// rejected.
pub fn parse_task_note(text: &str) -> Result<Record> {
    let mut record = Record::new();

    for raw in text.lines() {
        let line = raw.trim();
        if let Some(caps) = TITLE_LINE.captures(line) {
            let id = caps["task_id"].trim().to_string();
            record.insert(TASK_ID_KEY.to_string(), Value::String(id));
            continue;
        }

        let Some((key, value)) = checkbox_payload(line).and_then(split_key_value) else {
            continue;
        };
        let Some(field) = task_field_by_label(key) else {
            tracing::trace!(key, "ignoring unknown task key");
            continue;
        };
        if let Some(parsed) = field.parse_inline(value) {
            set_path(&mut record, field.path, parsed);
        }
    }

    if task_id(&record).is_empty() {
        return Err(Error::MissingIdentifier {
            kind: "task",
            key: TASK_ID_KEY,
        });
    }
    Ok(record)
}

/// Render a task record as a complete task note.
pub fn render_task_note(task: &Record) -> Result<String> {
    let id = task_id(task);
    if id.is_empty() {
        return Err(Error::MissingIdentifier {
            kind: "task",
            key: TASK_ID_KEY,
        });
    }

    let mut md = vec![task_title(&id), String::new()];
    for section in TASK_SECTIONS {
        md.push(section.heading.to_string());
        if let SectionBody::Fields(fields) = &section.body {
            for field in fields.iter() {
                let value = if field.kind == FieldKind::Identifier {
                    id.clone()
                } else {
                    field.render_inline(get_path(task, field.path))
                };
                md.push(format!("- [ ] {}: {value}  ", field.label));
            }
        }
        md.push(String::new());
    }

    Ok(md.join("\n"))
}

/// Headings every task note declares, in order.
pub fn task_headings() -> impl Iterator<Item = &'static str> {
    TASK_SECTIONS.iter().map(|section| section.heading)
}

/// Merge a parsed task into an existing record.
///
/// Top-level scalars and lists are replaced. Nested groups are merged key
/// by key so sub-keys the note does not carry survive.
pub fn merge_task_fields(existing: &mut Record, parsed: &Record) {
    for (key, value) in parsed {
        match (existing.get_mut(key), value) {
            (Some(Value::Object(group)), Value::Object(updates)) => {
                for (sub_key, sub_value) in updates {
                    group.insert(sub_key.clone(), sub_value.clone());
                }
            }
            _ => {
                existing.insert(key.clone(), value.clone());
            }
        }
    }
}
