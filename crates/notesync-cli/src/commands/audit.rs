//! Audit and reference audit commands
//!
//! Report text goes to stdout and is identical in strict and non-strict
//! runs; only the exit code differs.

use colored::Colorize;

use notesync_content::flatten;
use notesync_core::{
    AuditReport, Auditor, Layout, RESEARCH_KEY, ReferenceAudit, ResearchStore, audit_references,
};

use crate::error::Result;

/// Exit code of a strict run that found issues.
pub const EXIT_ISSUES: i32 = 1;

/// Exit code when no reference directory exists.
pub const EXIT_NO_REFERENCES: i32 = 2;

/// Run the full audit and print its report.
pub fn run_audit(layout: &Layout, strict: bool) -> Result<i32> {
    let report = Auditor::new(layout).run()?;
    print!("{}", format_report(&report));

    if strict && report.has_blocking() {
        return Ok(EXIT_ISSUES);
    }
    Ok(0)
}

/// Render an audit report the way it is printed.
pub fn format_report(report: &AuditReport) -> String {
    if report.is_empty() {
        return "OK: no issues found.\n".to_string();
    }
    let mut out = format!("Issues found: {}\n", report.len());
    for issue in report.issues() {
        out.push_str(&format!("- {issue}\n"));
    }
    out
}

/// Run the reference audit on its own.
pub fn run_refs(layout: &Layout, strict: bool) -> Result<i32> {
    let dirs = layout.existing_reference_dirs();
    if dirs.is_empty() {
        let looked: Vec<String> = layout
            .references_dirs
            .iter()
            .map(|dir| layout.display(dir))
            .collect();
        println!(
            "{} no references directory found (looked in: {})",
            "notice:".yellow().bold(),
            looked.join(", ")
        );
        return Ok(EXIT_NO_REFERENCES);
    }

    let store = ResearchStore::load(&layout.research_json)?;
    let entries = flatten(store.entries(), RESEARCH_KEY);
    let audit = audit_references(layout, &entries, &dirs);
    print!("{}", format_reference_audit(&audit));

    if strict && audit.has_issues() {
        return Ok(EXIT_ISSUES);
    }
    Ok(0)
}

/// Render a reference audit grouped by category.
pub fn format_reference_audit(audit: &ReferenceAudit) -> String {
    if !audit.has_issues() {
        return "OK: no issues found.\n".to_string();
    }

    let duplicates: Vec<String> = audit
        .duplicate_bindings
        .iter()
        .map(|(path, ids)| format!("{path} -> {}", ids.join(", ")))
        .collect();
    let groups: [(&str, &[String]); 4] = [
        ("Unrecognized references", audit.unrecognized.as_slice()),
        ("Missing reference files", audit.missing_artifacts.as_slice()),
        ("Missing notes", audit.missing_notes.as_slice()),
        ("Duplicate pdf_path bindings", duplicates.as_slice()),
    ];

    let mut out = String::new();
    for (title, lines) in groups {
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("{title}: {}\n", lines.len()));
        for line in lines {
            out.push_str(&format!("- {line}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesync_core::Issue;

    #[test]
    fn test_clean_report() {
        assert_eq!(format_report(&AuditReport::new()), "OK: no issues found.\n");
    }

    #[test]
    fn test_report_lists_every_issue() {
        let mut report = AuditReport::new();
        report.push(Issue::defect("research[0]", "missing keys: [\"year\"]"));
        report.push(Issue::warning("research[0]", "extra keys (allowed but review): [\"x\"]"));

        assert_eq!(
            format_report(&report),
            "Issues found: 2\n\
             - research[0]: missing keys: [\"year\"]\n\
             - research[0]: extra keys (allowed but review): [\"x\"] (warning)\n"
        );
    }

    #[test]
    fn test_reference_audit_groups_skip_empty() {
        let audit = ReferenceAudit {
            unrecognized: vec!["refs/x.pdf".into()],
            duplicate_bindings: vec![(
                "refs/a.pdf".into(),
                vec!["260101-01".into(), "260101-02".into()],
            )],
            ..ReferenceAudit::default()
        };
        assert_eq!(
            format_reference_audit(&audit),
            "Unrecognized references: 1\n\
             - refs/x.pdf\n\
             Duplicate pdf_path bindings: 1\n\
             - refs/a.pdf -> 260101-01, 260101-02\n"
        );
    }
}
