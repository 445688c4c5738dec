//! Task sync between `task.json` records and `task.md` notes

use notesync_content::{merge_task_fields, parse_task_note, render_task_note, task_id};
use notesync_fs::{JsonStore, NormalizedPath, io};
use serde_json::Value;

use super::{SyncAction, SyncOptions, SyncReport};
use crate::Result;
use crate::config::Layout;
use crate::tasks::{TASK_NOTE, TASK_RECORD, task_dirs};

/// Syncs task directories.
///
/// With no explicit directories every directory under the tasks root that
/// holds the source file of the requested direction is processed.
pub struct TaskSync<'a> {
    layout: &'a Layout,
    explicit: Vec<NormalizedPath>,
}

impl<'a> TaskSync<'a> {
    pub fn new(layout: &'a Layout, explicit: Vec<NormalizedPath>) -> Self {
        Self { layout, explicit }
    }

    /// Fold each `task.md` into its sibling `task.json`.
    ///
    /// Notes that fail to read or parse are reported and skipped; the run
    /// goes on.
    pub fn notes_to_records(&self, options: &SyncOptions) -> Result<SyncReport> {
        let store = JsonStore::new();
        let mut report = SyncReport::new(options.dry_run);

        for dir in task_dirs(self.layout, &self.explicit, TASK_NOTE)? {
            let note_path = dir.join(TASK_NOTE);
            if !note_path.is_file() {
                report
                    .errors
                    .push(format!("missing {TASK_NOTE}: {}", self.layout.display(&dir)));
                continue;
            }
            let parsed = io::read_text(&note_path)
                .map_err(crate::Error::from)
                .and_then(|text| Ok(parse_task_note(&text)?));
            let parsed = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(path = %note_path, error = %e, "Skipping unreadable task note");
                    report
                        .errors
                        .push(format!("{}: {e}", self.layout.display(&note_path)));
                    continue;
                }
            };
            if !options.wants(&task_id(&parsed)) {
                continue;
            }

            let record_path = dir.join(TASK_RECORD);
            let label = self.layout.display(&record_path);
            let (action, record) = if record_path.is_file() {
                if !options.update_existing {
                    report.skipped += 1;
                    continue;
                }
                let mut existing = store.load_object(&record_path)?;
                merge_task_fields(&mut existing, &parsed);
                (SyncAction::Update, existing)
            } else {
                if !options.create_missing {
                    report.skipped += 1;
                    continue;
                }
                (SyncAction::Create, parsed)
            };

            if !options.dry_run {
                store.save(&record_path, &Value::Object(record))?;
                tracing::debug!(path = %record_path, "Wrote task record");
            }
            report.record(action, label);
        }
        Ok(report)
    }

    /// Render each `task.json` over its sibling `task.md`.
    pub fn records_to_notes(&self, options: &SyncOptions) -> Result<SyncReport> {
        let store = JsonStore::new();
        let mut report = SyncReport::new(options.dry_run);

        for dir in task_dirs(self.layout, &self.explicit, TASK_RECORD)? {
            let record_path = dir.join(TASK_RECORD);
            let record = match store.load_object(&record_path) {
                Ok(record) => record,
                Err(e) => {
                    report.errors.push(e.to_string());
                    continue;
                }
            };
            if !options.wants(&task_id(&record)) {
                continue;
            }

            let note_path = dir.join(TASK_NOTE);
            let exists = note_path.is_file();
            let allowed = if exists {
                options.overwrite
            } else {
                options.create_missing || options.overwrite
            };
            if !allowed {
                report.skipped += 1;
                continue;
            }

            let content = match render_task_note(&record) {
                Ok(content) => content,
                Err(e) => {
                    report
                        .errors
                        .push(format!("{}: {e}", self.layout.display(&record_path)));
                    continue;
                }
            };
            if !options.dry_run {
                io::write_text(&note_path, &content)?;
                tracing::debug!(path = %note_path, "Wrote task note");
            }
            let action = if exists {
                SyncAction::Update
            } else {
                SyncAction::Create
            };
            report.record(action, self.layout.display(&note_path));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorkspaceExt;
    use notesync_test_utils::TestWorkspace;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_note_updates_record_and_keeps_unknown_keys() {
        let ws = TestWorkspace::new()
            .with_task_md(
                "t1",
                "# Task: t1.\n- [ ] hypothesis: warmup helps\n- [ ] metrics: F1\n",
            )
            .with_task_json(
                "t1",
                json!({"task_id": "t1", "hypothesis": "old", "owner": "kim",
                       "design": {"metrics": "acc", "seeds": 3}}),
            )
            .build();
        let layout = ws.layout();
        let options = SyncOptions {
            update_existing: true,
            ..SyncOptions::default()
        };

        let report = TaskSync::new(&layout, Vec::new())
            .notes_to_records(&options)
            .unwrap();
        assert_eq!(report.updated(), 1);

        let record = ws.read_task_json("t1");
        assert_eq!(record["hypothesis"], json!("warmup helps"));
        assert_eq!(record["owner"], json!("kim"));
        assert_eq!(record["design"]["metrics"], json!("F1"));
        assert_eq!(record["design"]["seeds"], json!(3));
    }

    #[test]
    fn test_bad_note_is_reported_not_fatal() {
        let ws = TestWorkspace::new()
            .with_task_md("a-bad", "no title here\n")
            .with_task_md("b-good", "# Task: b-good.\n")
            .build();
        let layout = ws.layout();
        let options = SyncOptions {
            create_missing: true,
            ..SyncOptions::default()
        };

        let report = TaskSync::new(&layout, Vec::new())
            .notes_to_records(&options)
            .unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("1-validation/tasks/a-bad/task.md: "));
        assert_eq!(
            report.labels(SyncAction::Create).collect::<Vec<_>>(),
            vec!["1-validation/tasks/b-good/task.json"]
        );
        assert_eq!(ws.read_task_json("b-good")["task_id"], json!("b-good"));
    }

    #[test]
    fn test_records_to_notes_respects_overwrite() {
        let ws = TestWorkspace::new()
            .with_task_json("t1", json!({"task_id": "t1", "hypothesis": "h"}))
            .with_task_md("t1", "# Task: t1.\nhand edited\n")
            .with_task_json("t2", json!({"task_id": "t2"}))
            .build();
        let layout = ws.layout();
        let sync = TaskSync::new(&layout, Vec::new());

        let create = SyncOptions {
            create_missing: true,
            ..SyncOptions::default()
        };
        let report = sync.records_to_notes(&create).unwrap();
        assert_eq!(report.created(), 1);
        assert_eq!(report.skipped, 1);
        assert!(ws.read_task_md("t1").contains("hand edited"));
        assert!(ws.read_task_md("t2").starts_with("# Task: t2.\n"));

        let overwrite = SyncOptions {
            overwrite: true,
            dry_run: true,
            ..SyncOptions::default()
        };
        let report = sync.records_to_notes(&overwrite).unwrap();
        assert_eq!(report.updated(), 2);
        assert!(ws.read_task_md("t1").contains("hand edited"));
    }
}
