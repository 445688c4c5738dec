//! Audit issues and reports

use std::fmt;

/// How much an issue matters for the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Worth a look, never fails a strict run
    Warning,
    /// Fails a strict run
    Defect,
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Where the problem is, e.g. `research[0].followed[1]` or a note path
    pub location: String,
    pub message: String,
    pub severity: Severity,
}

impl Issue {
    pub fn defect(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            severity: Severity::Defect,
        }
    }

    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)?;
        if self.is_warning() {
            write!(f, " (warning)")?;
        }
        Ok(())
    }
}

/// Flat, order-stable list of issues from one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    issues: Vec<Issue>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Append every issue of another report, keeping order.
    pub fn merge(&mut self, other: AuditReport) {
        self.issues.extend(other.issues);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any issue should fail a strict run.
    pub fn has_blocking(&self) -> bool {
        self.issues.iter().any(|issue| !issue.is_warning())
    }

    /// Issues whose message starts with `prefix`.
    pub fn matching<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.message.starts_with(prefix))
    }
}

impl Extend<Issue> for AuditReport {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

impl IntoIterator for AuditReport {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_block() {
        let mut report = AuditReport::new();
        report.push(Issue::warning("research[0]", "extra keys (allowed but review): [\"x\"]"));
        assert!(!report.has_blocking());

        report.push(Issue::defect("references", "no references directory found"));
        assert!(report.has_blocking());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_display_tags_warnings() {
        assert_eq!(
            Issue::warning("research[0]", "extra keys").to_string(),
            "research[0]: extra keys (warning)"
        );
        assert_eq!(Issue::defect("notes", "missing").to_string(), "notes: missing");
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = AuditReport::new();
        first.push(Issue::defect("a", "1"));
        let mut second = AuditReport::new();
        second.push(Issue::defect("b", "2"));
        first.merge(second);
        let locations: Vec<&str> = first.issues().iter().map(|i| i.location.as_str()).collect();
        assert_eq!(locations, vec!["a", "b"]);
    }
}
