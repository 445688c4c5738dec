//! Task directories and their audit
//!
//! Each task lives in its own directory under the tasks root, holding a
//! `task.md` note and a `task.json` record.

use notesync_content::{
    Record, TASK_ID_KEY, equivalent, get_path, normalize_value, parse_task_note, task_fields,
    task_id,
};
use notesync_fs::{JsonStore, NormalizedPath, io, list_dirs};
use serde_json::Value;

use crate::Result;
use crate::config::Layout;
use crate::issue::Issue;

/// Note file inside a task directory.
pub const TASK_NOTE: &str = "task.md";

/// Record file inside a task directory.
pub const TASK_RECORD: &str = "task.json";

/// Task directories to process.
///
/// Explicit directories are used as given. Otherwise every directory under
/// the tasks root that contains `marker` is returned, sorted by name.
pub fn task_dirs(
    layout: &Layout,
    explicit: &[NormalizedPath],
    marker: &str,
) -> Result<Vec<NormalizedPath>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    Ok(list_dirs(&layout.tasks_root)?
        .into_iter()
        .filter(|dir| dir.join(marker).is_file())
        .collect())
}

/// Audits task note/record pairs under the tasks root.
pub struct TaskAuditor<'a> {
    layout: &'a Layout,
}

impl<'a> TaskAuditor<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Check every task directory. An absent tasks root is not an issue.
    pub fn audit(&self) -> Result<Vec<Issue>> {
        if !self.layout.tasks_root.is_dir() {
            tracing::debug!(root = %self.layout.tasks_root, "No tasks root, skipping task audit");
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        for dir in list_dirs(&self.layout.tasks_root)? {
            issues.extend(self.check_dir(&dir)?);
        }
        Ok(issues)
    }

    fn check_dir(&self, dir: &NormalizedPath) -> Result<Vec<Issue>> {
        let note_path = dir.join(TASK_NOTE);
        let record_path = dir.join(TASK_RECORD);
        let location = self.layout.display(dir);

        match (note_path.is_file(), record_path.is_file()) {
            (false, false) => return Ok(Vec::new()),
            (false, true) => return Ok(vec![Issue::defect(location, "missing task.md")]),
            (true, false) => return Ok(vec![Issue::defect(location, "missing task.json")]),
            (true, true) => {}
        }

        let text = match io::read_text(&note_path) {
            Ok(text) => text,
            Err(e) => return Ok(vec![Issue::defect(location, e.to_string())]),
        };
        let parsed = match parse_task_note(&text) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(vec![Issue::defect(location, e.to_string())]),
        };
        let record = match JsonStore::new().load(&record_path) {
            Ok(Value::Object(record)) => record,
            Ok(_) => return Ok(vec![Issue::defect(location, "task json must be an object")]),
            Err(e) => return Ok(vec![Issue::defect(location, e.to_string())]),
        };

        let mut issues = Vec::new();
        let (md_id, json_id) = (task_id(&parsed), task_id(&record));
        if md_id != json_id {
            issues.push(Issue::defect(
                &location,
                format!("{TASK_ID_KEY} mismatch: md={md_id:?}, json={json_id:?}"),
            ));
        }
        issues.extend(field_mismatches(&parsed, &record).into_iter().map(|message| {
            Issue::defect(&location, message)
        }));
        Ok(issues)
    }
}

/// Fields the note fills in that disagree with the record.
fn field_mismatches(parsed: &Record, record: &Record) -> Vec<String> {
    task_fields()
        .filter(|field| field.path != TASK_ID_KEY)
        .filter_map(|field| {
            let md = get_path(parsed, field.path)?;
            let json = get_path(record, field.path);
            if equivalent(Some(md), json) {
                return None;
            }
            Some(format!(
                "md/json mismatch: key={}, md={}, json={}",
                field.path,
                normalize_value(md),
                json.map(normalize_value).unwrap_or(Value::Null)
            ))
        })
        .collect()
}
