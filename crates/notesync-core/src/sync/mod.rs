//! Sync engines between records and notes
//!
//! Both directions share one option set and one report shape:
//!
//! - notes to records: parse each note and fold it into its record
//! - records to notes: render each record over its note
//!
//! Nothing is ever deleted. Writes happen only when the options allow the
//! specific action, and never in dry-run mode.

mod paper;
mod task;

pub use paper::PaperSync;
pub use task::TaskSync;

/// What a sync run is allowed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Create targets that do not exist yet
    pub create_missing: bool,
    /// Fold notes into records that already exist
    pub update_existing: bool,
    /// Replace notes that already exist
    pub overwrite: bool,
    /// Plan only; write nothing
    pub dry_run: bool,
    /// Restrict the run to these identifiers; empty means all
    pub ids: Vec<String>,
}

impl SyncOptions {
    /// Whether `id` passes the identifier filter.
    pub fn wants(&self, id: &str) -> bool {
        self.ids.is_empty() || self.ids.iter().any(|wanted| wanted == id)
    }
}

/// One planned or applied change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Update,
}

impl SyncAction {
    /// Label used when printing a plan for notes.
    pub fn note_verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "overwrite",
        }
    }
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub dry_run: bool,
    /// Changes applied (or planned), in processing order, by label
    pub actions: Vec<(SyncAction, String)>,
    /// Candidates left alone
    pub skipped: usize,
    /// Candidates that could not be processed
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, action: SyncAction, label: impl Into<String>) {
        self.actions.push((action, label.into()));
    }

    /// Labels of one kind of action, in order.
    pub fn labels(&self, action: SyncAction) -> impl Iterator<Item = &str> {
        self.actions
            .iter()
            .filter(move |(kind, _)| *kind == action)
            .map(|(_, label)| label.as_str())
    }

    pub fn created(&self) -> usize {
        self.labels(SyncAction::Create).count()
    }

    pub fn updated(&self) -> usize {
        self.labels(SyncAction::Update).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter() {
        let all = SyncOptions::default();
        assert!(all.wants("260101-01"));

        let some = SyncOptions {
            ids: vec!["260101-02".into()],
            ..SyncOptions::default()
        };
        assert!(!some.wants("260101-01"));
        assert!(some.wants("260101-02"));
    }

    #[test]
    fn test_report_counts_by_action() {
        let mut report = SyncReport::new(true);
        report.record(SyncAction::Update, "a");
        report.record(SyncAction::Create, "b");
        report.record(SyncAction::Update, "c");
        assert_eq!(report.created(), 1);
        assert_eq!(report.labels(SyncAction::Update).collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
