//! [`TestWorkspace`] builder for notesync test scenarios.
//!
//! Files are written as soon as a `with_*` method is called. [`build`]
//! fills in whatever a workspace needs and was not provided: an empty
//! record store and the paper and session templates.
//!
//! [`build`]: TestWorkspace::build

use std::fs;
use std::path::{Path, PathBuf};

use notesync_content::{default_entry, render_paper_note};
use notesync_fs::{JsonStore, NormalizedPath};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Record store location in the default layout.
pub const RESEARCH_JSON: &str = "0-survey/research.json";

/// Notes directory in the default layout.
pub const NOTES_DIR: &str = "0-survey/notes";

/// First reference directory in the default layout.
pub const REFERENCES_DIR: &str = "0-survey/references";

/// Session log directory in the default layout.
pub const SESSION_DIR: &str = "session";

/// Tasks root in the default layout.
pub const TASKS_ROOT: &str = "1-validation/tasks";

/// Templates directory in the default layout.
pub const TEMPLATES_DIR: &str = ".notesync/templates";

/// A temporary workspace with helpers for setup and inspection.
///
/// # Example
///
/// ```rust,no_run
/// use notesync_test_utils::TestWorkspace;
/// use serde_json::json;
///
/// let ws = TestWorkspace::new()
///     .with_research(json!([{"paper_id": "260101-01"}]))
///     .with_reference("0-survey/references/a.pdf")
///     .build();
/// assert!(ws.read_research().len() == 1);
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
    has_research: bool,
    templates: bool,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestWorkspace::new: failed to create temp dir"),
            has_research: false,
            templates: true,
        }
    }

    /// Write the record store with `entries` as its forest.
    pub fn with_research(mut self, entries: Value) -> Self {
        self.write_json(RESEARCH_JSON, &json!({ "research": entries }));
        self.has_research = true;
        self
    }

    /// Write the record store verbatim.
    pub fn with_research_text(mut self, text: &str) -> Self {
        self.write(RESEARCH_JSON, text);
        self.has_research = true;
        self
    }

    /// Write a paper note by hand.
    pub fn with_note(self, id: &str, text: &str) -> Self {
        self.write(&format!("{NOTES_DIR}/{id}.md"), text);
        self
    }

    /// Write the note an entry renders to, so it agrees with the entry.
    pub fn with_rendered_note(self, entry: Value) -> Self {
        let record = entry
            .as_object()
            .cloned()
            .expect("with_rendered_note: entry must be an object");
        let text = render_paper_note(&record).expect("with_rendered_note: entry needs a paper_id");
        let id = record["paper_id"].as_str().unwrap_or_default().to_string();
        self.with_note(&id, &text)
    }

    /// Create a reference file at `path`, relative to the root.
    pub fn with_reference(self, path: &str) -> Self {
        self.write(path, "%PDF-1.4\n");
        self
    }

    /// Create an empty directory at `path`, relative to the root.
    pub fn with_dir(self, path: &str) -> Self {
        fs::create_dir_all(self.path(path)).expect("with_dir: failed to create directory");
        self
    }

    /// Write `.notesync/config.toml`.
    pub fn with_config(self, toml: &str) -> Self {
        self.write(".notesync/config.toml", toml);
        self
    }

    /// Write any file, relative to the root.
    pub fn with_file(self, path: &str, text: &str) -> Self {
        self.write(path, text);
        self
    }

    pub fn with_session_md(self, date: &str, text: &str) -> Self {
        self.write(&format!("{SESSION_DIR}/{date}-session.md"), text);
        self
    }

    pub fn with_session_json(self, date: &str, value: Value) -> Self {
        self.write_json(&format!("{SESSION_DIR}/{date}-session.json"), &value);
        self
    }

    pub fn with_task_md(self, dir: &str, text: &str) -> Self {
        self.write(&format!("{TASKS_ROOT}/{dir}/task.md"), text);
        self
    }

    pub fn with_task_json(self, dir: &str, value: Value) -> Self {
        self.write_json(&format!("{TASKS_ROOT}/{dir}/task.json"), &value);
        self
    }

    /// Skip writing the default templates on [`TestWorkspace::build`].
    pub fn without_templates(mut self) -> Self {
        self.templates = false;
        self
    }

    /// Fill in the record store and templates if not provided.
    pub fn build(mut self) -> Self {
        if !self.has_research {
            self = self.with_research(json!([]));
        }
        if self.templates {
            let mut entry = default_entry("");
            entry.insert("paper_id".into(), json!("260101-01"));
            self.write_json(
                &format!("{TEMPLATES_DIR}/paper_entry.json"),
                &Value::Object(entry),
            );

            let note = render_paper_note(&default_entry("<paper_id>"))
                .expect("build: template entry has a paper_id");
            self.write(&format!("{TEMPLATES_DIR}/paper_note.md"), &note);

            self.write_json(
                &format!("{TEMPLATES_DIR}/session.json"),
                &json!({"date": "", "stage": "", "entries": []}),
            );
        }
        self
    }

    /// A session log record that passes every session check.
    pub fn session_record(date: &str) -> Value {
        json!({
            "date": date,
            "stage": "0-survey",
            "entries": [{
                "timestamp": format!("{date}T10:00"),
                "mode": "survey",
                "context": "reading",
                "work_done": ["read two papers"],
                "decisions": [],
                "issues": [],
                "next_steps": ["write notes"]
            }]
        })
    }

    /// Root of the temporary workspace.
    pub fn root(&self) -> NormalizedPath {
        NormalizedPath::new(self.temp_dir.path())
    }

    /// Native path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Read a file under the root.
    ///
    /// # Panics
    /// Panics with the path if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()))
    }

    /// The entry forest of the record store.
    pub fn read_research(&self) -> Vec<Value> {
        let value: Value = serde_json::from_str(&self.read(RESEARCH_JSON))
            .expect("read_research: record store is not valid JSON");
        value["research"].as_array().cloned().unwrap_or_default()
    }

    pub fn read_note(&self, id: &str) -> String {
        self.read(&format!("{NOTES_DIR}/{id}.md"))
    }

    pub fn read_task_md(&self, dir: &str) -> String {
        self.read(&format!("{TASKS_ROOT}/{dir}/task.md"))
    }

    pub fn read_task_json(&self, dir: &str) -> Value {
        serde_json::from_str(&self.read(&format!("{TASKS_ROOT}/{dir}/task.json")))
            .expect("read_task_json: task record is not valid JSON")
    }

    fn write(&self, relative: &str, text: &str) {
        write_file(&self.path(relative), text);
    }

    fn write_json(&self, relative: &str, value: &Value) {
        let text = JsonStore::new()
            .render(value)
            .expect("write_json: value must serialize");
        self.write(relative, &text);
    }
}

fn write_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Could not create {}: {e}", parent.display()));
    }
    fs::write(path, text).unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fills_store_and_templates() {
        let ws = TestWorkspace::new().build();
        assert!(ws.read_research().is_empty());
        assert!(ws.exists(".notesync/templates/paper_entry.json"));
        assert!(
            ws.read(".notesync/templates/paper_note.md")
                .starts_with("# Paper Note: <paper_id>\n")
        );
        assert!(!ws.exists(SESSION_DIR));
        assert!(!ws.exists(REFERENCES_DIR));
    }

    #[test]
    fn test_rendered_note_lands_by_id() {
        let ws = TestWorkspace::new()
            .with_rendered_note(json!({"paper_id": "260101-01", "title": "T"}))
            .build();
        assert!(ws.read_note("260101-01").contains("- **title**: T"));
    }
}
