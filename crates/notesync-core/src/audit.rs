//! Consistency auditor
//!
//! Runs every check over a workspace and collects the findings into one
//! flat [`AuditReport`]. Passes are independent: a failing pass never hides
//! the findings of a later one. Only a missing or malformed record store or
//! paper template aborts the run.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use notesync_content::{
    CHILDREN_KEY, IdentifierIndex, LocatedEntry, Record, equivalent, flatten_with, normalize_value,
    paper_title, parse_paper_note,
};
use notesync_fs::{io, list_files};
use regex::Regex;
use serde_json::Value;

use crate::Result;
use crate::config::Layout;
use crate::issue::{AuditReport, Issue};
use crate::registry::audit_references;
use crate::research::{RESEARCH_KEY, ResearchStore};
use crate::session::SessionAuditor;
use crate::tasks::TaskAuditor;
use crate::template::{NoteTemplate, RecordTemplate};

/// `YYMMDD-NN`
static PAPER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}-\d{2}$").expect("Invalid paper id regex"));

/// Template file describing a paper entry.
pub const PAPER_ENTRY_TEMPLATE: &str = "paper_entry.json";

/// Template file describing a paper note.
pub const PAPER_NOTE_TEMPLATE: &str = "paper_note.md";

/// Audits a whole workspace.
pub struct Auditor<'a> {
    layout: &'a Layout,
}

impl<'a> Auditor<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Run every pass and return the combined report.
    pub fn run(&self) -> Result<AuditReport> {
        let store = ResearchStore::load(&self.layout.research_json)?;
        let entry_template = RecordTemplate::load(&self.layout.template(PAPER_ENTRY_TEMPLATE))?;
        let note_template = NoteTemplate::load(&self.layout.template(PAPER_NOTE_TEMPLATE))?;

        let mut index = IdentifierIndex::new();
        let entries = flatten_with(store.entries(), RESEARCH_KEY, &mut index);
        tracing::info!(entries = entries.len(), "Auditing workspace");

        let mut report = AuditReport::new();
        report.extend(self.check_schema(&entries, &entry_template));
        report.extend(self.check_duplicates(&index));
        let by_id = index_by_id(&entries);
        report.extend(self.check_notes(&by_id, &note_template)?);
        report.extend(self.check_orphans(&by_id)?);
        report.extend(self.check_references(&entries));
        report.extend(SessionAuditor::new(self.layout).audit()?);
        report.extend(TaskAuditor::new(self.layout).audit()?);

        tracing::info!(issues = report.len(), "Audit finished");
        Ok(report)
    }

    /// Key set, kinds, identifier format and child list shape per entry.
    fn check_schema(&self, entries: &[LocatedEntry<'_>], template: &RecordTemplate) -> Vec<Issue> {
        let mut issues = Vec::new();
        for located in entries {
            let entry = located.entry;
            let location = located.location.as_str();

            let missing = template.missing_keys(entry);
            if !missing.is_empty() {
                issues.push(Issue::defect(location, format!("missing keys: {missing:?}")));
            }
            let extra = template.extra_keys(entry);
            if !extra.is_empty() {
                issues.push(Issue::warning(
                    location,
                    format!("extra keys (allowed but review): {extra:?}"),
                ));
            }
            for message in template.type_mismatches(entry) {
                issues.push(Issue::defect(location, message));
            }

            let id = located.id();
            if !id.is_empty() && !PAPER_ID.is_match(&id) {
                issues.push(Issue::defect(
                    location,
                    format!("paper_id format unexpected: {id} (expected YYMMDD-NN)"),
                ));
            }
            match entry.get(CHILDREN_KEY) {
                None | Some(Value::Null) | Some(Value::Array(_)) => {}
                Some(_) => issues.push(Issue::defect(location, "followed should be a list")),
            }
        }
        issues
    }

    fn check_duplicates(&self, index: &IdentifierIndex) -> Vec<Issue> {
        index
            .duplicates()
            .map(|id| Issue::defect(format!("paper_id={id}"), "duplicate paper_id in research.json"))
            .collect()
    }

    /// Note presence, title line, headings and field agreement per identifier.
    fn check_notes(
        &self,
        by_id: &BTreeMap<String, &Record>,
        template: &NoteTemplate,
    ) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        for (id, entry) in by_id {
            let path = self.layout.note_path(id);
            let location = self.layout.display(&path);
            if !path.is_file() {
                issues.push(Issue::defect(&location, "missing note file for paper_id"));
                continue;
            }

            let text = match io::read_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    issues.push(Issue::defect(&location, e.to_string()));
                    continue;
                }
            };
            match text.lines().next() {
                None => issues.push(Issue::defect(&location, "empty note file")),
                Some(first) => {
                    let want = template.title_for(id).unwrap_or_else(|| paper_title(id));
                    let got = first.trim();
                    if got != want {
                        issues.push(Issue::defect(
                            &location,
                            format!("unexpected title line: got={got:?}, want={want:?}"),
                        ));
                    }
                }
            }
            for heading in template.headings() {
                if !text.contains(heading.as_str()) {
                    issues.push(Issue::defect(&location, format!("missing heading: {heading}")));
                }
            }

            let parsed = parse_paper_note(id, &text);
            for (key, value) in &parsed {
                if key == CHILDREN_KEY || equivalent(Some(value), entry.get(key)) {
                    continue;
                }
                issues.push(Issue::defect(
                    &location,
                    format!(
                        "md/json mismatch: key={key}, md={}, json={}",
                        normalize_value(value),
                        entry.get(key).map(normalize_value).unwrap_or(Value::Null)
                    ),
                ));
            }
        }
        Ok(issues)
    }

    /// Notes whose stem names no known entry.
    fn check_orphans(&self, by_id: &BTreeMap<String, &Record>) -> Result<Vec<Issue>> {
        let known: HashSet<&str> = by_id.keys().map(String::as_str).collect();
        let mut issues = Vec::new();
        for path in list_files(&self.layout.notes_dir, Some("md"))? {
            let id = path.file_stem().unwrap_or_default().trim();
            if !id.is_empty() && !known.contains(id) {
                issues.push(Issue::defect(
                    self.layout.display(&path),
                    "note exists but paper_id not found in research.json",
                ));
            }
        }
        Ok(issues)
    }

    fn check_references(&self, entries: &[LocatedEntry<'_>]) -> Vec<Issue> {
        let dirs = self.layout.existing_reference_dirs();
        if dirs.is_empty() {
            return vec![Issue::defect("references", "no references directory found")];
        }
        audit_references(self.layout, entries, &dirs).to_issues(self.layout)
    }
}

/// Entries by identifier; with duplicates the later entry wins.
fn index_by_id<'a>(entries: &[LocatedEntry<'a>]) -> BTreeMap<String, &'a Record> {
    let mut by_id = BTreeMap::new();
    for located in entries {
        let id = located.id();
        if !id.is_empty() {
            by_id.insert(id, located.entry);
        }
    }
    by_id
}
