//! Reference registry audit
//!
//! Reference files (PDFs by default) live in one or more directories and
//! are bound to entries through the entry's `pdf_path`. Paths are compared
//! after resolution against the workspace root, so `refs/a.pdf` and an
//! absolute path to the same file are one binding.

use std::collections::{BTreeMap, BTreeSet};

use notesync_content::{LocatedEntry, normalize_str};
use notesync_fs::{NormalizedPath, discover_files};
use serde_json::Value;

use crate::config::Layout;
use crate::issue::Issue;

/// Entry key holding the bound reference path.
pub const ARTIFACT_KEY: &str = "pdf_path";

/// Outcome of a registry audit, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceAudit {
    /// Files on disk no entry claims
    pub unrecognized: Vec<String>,
    /// Claimed paths with no file behind them
    pub missing_artifacts: Vec<String>,
    /// `<id> -> <note path>` for claiming entries without a note
    pub missing_notes: Vec<String>,
    /// Paths claimed by more than one distinct identifier
    pub duplicate_bindings: Vec<(String, Vec<String>)>,
}

impl ReferenceAudit {
    pub fn has_issues(&self) -> bool {
        !(self.unrecognized.is_empty()
            && self.missing_artifacts.is_empty()
            && self.missing_notes.is_empty()
            && self.duplicate_bindings.is_empty())
    }

    /// Flatten into report issues.
    pub fn to_issues(&self, layout: &Layout) -> Vec<Issue> {
        let store = layout.display(&layout.research_json);
        let notes = layout.display(&layout.notes_dir);
        let mut issues = Vec::new();
        for path in &self.unrecognized {
            issues.push(Issue::defect("references", format!("unrecognized reference: {path}")));
        }
        for path in &self.missing_artifacts {
            issues.push(Issue::defect(&store, format!("missing reference file: {path}")));
        }
        for line in &self.missing_notes {
            issues.push(Issue::defect(&notes, format!("missing note: {line}")));
        }
        for (path, ids) in &self.duplicate_bindings {
            issues.push(Issue::defect(
                &store,
                format!("duplicate {ARTIFACT_KEY}: {path} -> {}", ids.join(", ")),
            ));
        }
        issues
    }
}

/// Reconcile reference files under `dirs` against the entries' bindings.
pub fn audit_references(
    layout: &Layout,
    entries: &[LocatedEntry<'_>],
    dirs: &[NormalizedPath],
) -> ReferenceAudit {
    let mut claims: BTreeMap<NormalizedPath, BTreeSet<String>> = BTreeMap::new();
    let mut bound: BTreeMap<String, NormalizedPath> = BTreeMap::new();

    for located in entries {
        let id = located.id();
        if id.is_empty() {
            continue;
        }
        let raw = match located.entry.get(ARTIFACT_KEY) {
            Some(Value::String(raw)) => normalize_str(raw),
            _ => continue,
        };
        if raw.is_empty() {
            continue;
        }
        let path = layout.resolve(&raw);
        claims.entry(path.clone()).or_default().insert(id.clone());
        bound.insert(id, path);
    }

    let files = discover_files(dirs, &layout.reference_extensions);
    tracing::debug!(files = files.len(), claims = claims.len(), "Auditing references");

    let mut unrecognized: Vec<String> = files
        .iter()
        .filter(|file| !claims.contains_key(*file))
        .map(|file| layout.display(file))
        .collect();
    unrecognized.sort();

    let mut missing_artifacts: Vec<String> = claims
        .keys()
        .filter(|path| !path.exists())
        .map(|path| layout.display(path))
        .collect();
    missing_artifacts.sort();

    let missing_notes = bound
        .keys()
        .filter(|id| !layout.note_path(id).exists())
        .map(|id| format!("{id} -> {}", layout.display(&layout.note_path(id))))
        .collect();

    let mut duplicate_bindings: Vec<(String, Vec<String>)> = claims
        .iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(path, ids)| (layout.display(path), ids.iter().cloned().collect()))
        .collect();
    duplicate_bindings.sort();

    ReferenceAudit {
        unrecognized,
        missing_artifacts,
        missing_notes,
        duplicate_bindings,
    }
}
