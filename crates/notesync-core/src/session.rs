//! Session log audit
//!
//! Each working session leaves a pair of files named by date stamp:
//! `YYMMDD-session.md` and `YYMMDD-session.json`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use notesync_fs::{JsonStore, NormalizedPath, io, list_files};
use regex::Regex;
use serde_json::Value;

use crate::config::Layout;
use crate::issue::Issue;
use crate::template::{NoteTemplate, RecordTemplate};
use crate::Result;

static SESSION_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>\d{6})-session\.(?P<ext>md|json)$").expect("Invalid session file regex")
});

static DATE_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("Invalid date stamp regex"));

/// Keys every session log entry must carry.
pub const ENTRY_KEYS: &[&str] = &[
    "timestamp",
    "mode",
    "context",
    "work_done",
    "decisions",
    "issues",
    "next_steps",
];

/// Title line of a session note when no template supplies one.
pub fn session_title(date: &str) -> String {
    format!("# Session: {date}.")
}

#[derive(Debug, Default)]
struct SessionPair {
    md: Option<NormalizedPath>,
    json: Option<NormalizedPath>,
}

/// Audits session log pairs in the configured session directory.
pub struct SessionAuditor<'a> {
    layout: &'a Layout,
}

impl<'a> SessionAuditor<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Check every pair. A missing session directory is itself an issue.
    ///
    /// The record template is only required once a structured log exists.
    pub fn audit(&self) -> Result<Vec<Issue>> {
        let dir = &self.layout.session_dir;
        if !dir.is_dir() {
            return Ok(vec![Issue::defect(
                self.layout.display(dir),
                "missing session directory",
            )]);
        }

        let mut pairs: BTreeMap<String, SessionPair> = BTreeMap::new();
        for file in list_files(dir, None)? {
            let Some(caps) = file.file_name().and_then(|name| SESSION_FILE.captures(name)) else {
                continue;
            };
            let pair = pairs.entry(caps["date"].to_string()).or_default();
            if &caps["ext"] == "md" {
                pair.md = Some(file.clone());
            } else {
                pair.json = Some(file.clone());
            }
        }

        let note_template = self.note_template()?;
        let mut record_template = None;
        let mut issues = Vec::new();
        for (date, pair) in &pairs {
            let location = format!("{}/{date}", self.layout.display(dir));
            if pair.md.is_none() {
                issues.push(Issue::defect(&location, "missing session md"));
            }
            if pair.json.is_none() {
                issues.push(Issue::defect(&location, "missing session json"));
            }
            if let Some(md) = &pair.md {
                issues.extend(self.check_note(md, date, note_template.as_ref())?);
            }
            if let Some(json) = &pair.json {
                if record_template.is_none() {
                    record_template =
                        Some(RecordTemplate::load(&self.layout.template("session.json"))?);
                }
                if let Some(template) = &record_template {
                    issues.extend(self.check_record(json, template));
                }
            }
        }
        tracing::debug!(pairs = pairs.len(), issues = issues.len(), "Audited sessions");
        Ok(issues)
    }

    fn note_template(&self) -> Result<Option<NoteTemplate>> {
        let path = self.layout.template("session.md");
        if path.is_file() {
            Ok(Some(NoteTemplate::load(&path)?))
        } else {
            Ok(None)
        }
    }

    fn check_note(
        &self,
        path: &NormalizedPath,
        date: &str,
        template: Option<&NoteTemplate>,
    ) -> Result<Vec<Issue>> {
        let location = self.layout.display(path);
        let text = match io::read_text(path) {
            Ok(text) => text,
            Err(e) => return Ok(vec![Issue::defect(location, e.to_string())]),
        };
        if text.trim().is_empty() {
            return Ok(vec![Issue::defect(location, "empty session md")]);
        }

        let want = template
            .and_then(|t| t.title_for(date))
            .unwrap_or_else(|| session_title(date));
        let got = text.lines().next().unwrap_or_default().trim();
        let mut issues = Vec::new();
        if got != want {
            issues.push(Issue::defect(
                &location,
                format!("unexpected title line: got={got:?}, want={want:?}"),
            ));
        }
        if let Some(template) = template {
            for heading in template.headings() {
                if !text.contains(heading.as_str()) {
                    issues.push(Issue::defect(&location, format!("missing heading: {heading}")));
                }
            }
        }
        Ok(issues)
    }

    fn check_record(&self, path: &NormalizedPath, template: &RecordTemplate) -> Vec<Issue> {
        let location = self.layout.display(path);
        let data = match JsonStore::new().load(path) {
            Ok(Value::Object(data)) => data,
            Ok(_) => return vec![Issue::defect(location, "session json must be an object")],
            Err(e) => return vec![Issue::defect(location, e.to_string())],
        };

        let mut issues: Vec<Issue> = template
            .missing_keys(&data)
            .into_iter()
            .map(|key| Issue::defect(&location, format!("missing key: {key}")))
            .collect();
        issues.extend(
            template
                .type_mismatches(&data)
                .into_iter()
                .map(|message| Issue::defect(&location, message)),
        );

        let date = text_of(data.get("date"));
        if !date.is_empty() && !DATE_STAMP.is_match(&date) {
            issues.push(Issue::defect(&location, format!("invalid date: {date}")));
        }

        let stage = text_of(data.get("stage"));
        if !stage.is_empty() && !self.layout.session_stages.contains(&stage) {
            let mut allowed = self.layout.session_stages.clone();
            allowed.sort();
            issues.push(Issue::defect(
                &location,
                format!("unexpected stage: {stage} (allowed: {})", allowed.join(", ")),
            ));
        }

        if let Some(Value::Array(entries)) = data.get("entries") {
            for (i, entry) in entries.iter().enumerate() {
                let Value::Object(entry) = entry else {
                    issues.push(Issue::defect(&location, format!("entries[{i}] must be an object")));
                    continue;
                };
                for key in ENTRY_KEYS {
                    if !entry.contains_key(*key) {
                        issues.push(Issue::defect(
                            &location,
                            format!("entries[{i}] missing key: {key}"),
                        ));
                    }
                }
            }
        }
        issues
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}
