//! End-to-end audits over throwaway workspaces

use notesync_content::default_entry;
use notesync_core::{AuditReport, Auditor, Layout};
use notesync_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

const ID: &str = "260101-01";

fn paper(id: &str, overrides: Value) -> Value {
    let mut entry = default_entry(id);
    if let Value::Object(fields) = overrides {
        entry.extend(fields);
    }
    Value::Object(entry)
}

/// One entry with its note, reference file and a session pair; audits clean.
fn clean_workspace() -> TestWorkspace {
    let entry = paper(
        ID,
        json!({"title": "Warmup matters", "pdf_path": "0-survey/references/a.pdf", "tags": ["nlp"]}),
    );
    TestWorkspace::new()
        .with_research(json!([entry.clone()]))
        .with_rendered_note(entry)
        .with_reference("0-survey/references/a.pdf")
        .with_session_md("260101", "# Session: 260101.\n")
        .with_session_json("260101", TestWorkspace::session_record("260101"))
        .build()
}

fn audit(ws: &TestWorkspace) -> AuditReport {
    let layout = Layout::load(&ws.root()).unwrap();
    Auditor::new(&layout).run().unwrap()
}

fn lines(report: &AuditReport) -> Vec<String> {
    report.issues().iter().map(ToString::to_string).collect()
}

#[test]
fn test_clean_workspace_has_no_issues() {
    let report = audit(&clean_workspace());
    assert!(report.is_empty(), "{:#?}", lines(&report));
}

#[test]
fn test_wrong_title_line_is_one_defect() {
    let ws = clean_workspace();
    let text = ws
        .read_note(ID)
        .replacen("# Paper Note: 260101-01", "# Note", 1);
    let ws = ws.with_note(ID, &text);

    let report = audit(&ws);
    assert_eq!(
        lines(&report),
        vec![
            "0-survey/notes/260101-01.md: unexpected title line: got=\"# Note\", want=\"# Paper Note: 260101-01\""
        ]
    );
}

#[rstest]
#[case::ellipsis("…")]
#[case::ascii_dots("...")]
fn test_placeholder_list_items_do_not_mismatch(#[case] placeholder: &str) {
    let entry = paper(ID, json!({"tags": ["nlp", placeholder]}));
    let ws = TestWorkspace::new()
        .with_research(json!([entry.clone()]))
        .with_rendered_note(paper(ID, json!({"tags": ["nlp"]})))
        .with_dir("0-survey/references")
        .with_session_md("260101", "# Session: 260101.\n")
        .with_session_json("260101", TestWorkspace::session_record("260101"))
        .build();

    let report = audit(&ws);
    assert!(report.is_empty(), "{:#?}", lines(&report));
}

#[test]
fn test_prose_with_ellipsis_line_does_not_mismatch() {
    let entry = paper(ID, json!({"problem": "Real first line.\nTBD…"}));
    let ws = TestWorkspace::new()
        .with_research(json!([entry.clone()]))
        .with_rendered_note(entry)
        .with_dir("0-survey/references")
        .with_session_md("260101", "# Session: 260101.\n")
        .with_session_json("260101", TestWorkspace::session_record("260101"))
        .build();

    let report = audit(&ws);
    assert!(report.is_empty(), "{:#?}", lines(&report));
}

#[test]
fn test_unreadable_note_is_reported_and_audit_continues() {
    let ws = clean_workspace().with_note("260101-02", "# Paper Note: 260101-02\n");
    std::fs::write(ws.path("0-survey/notes/260101-01.md"), b"\xff\xfe").unwrap();

    let report = audit(&ws);
    let found = lines(&report);
    assert_eq!(found.len(), 2, "{found:#?}");
    assert!(
        found[0].starts_with("0-survey/notes/260101-01.md: I/O error at "),
        "{found:#?}"
    );
    assert_eq!(
        found[1],
        "0-survey/notes/260101-02.md: note exists but paper_id not found in research.json"
    );
}

#[test]
fn test_shared_reference_names_both_entries() {
    let ws = TestWorkspace::new()
        .with_config("[paths]\nreferences_dirs = [\"refs\"]\n")
        .with_research(json!([
            paper("260101-01", json!({"pdf_path": "refs/a.pdf"})),
            paper("260101-02", json!({"pdf_path": "refs/a.pdf"})),
            paper("260101-03", json!({"pdf_path": "refs/b.pdf"})),
        ]))
        .with_reference("refs/a.pdf")
        .with_reference("refs/b.pdf")
        .build();

    let report = audit(&ws);
    let duplicates: Vec<String> = report
        .matching("duplicate pdf_path")
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        duplicates,
        vec!["0-survey/research.json: duplicate pdf_path: refs/a.pdf -> 260101-01, 260101-02"]
    );
    assert_eq!(report.matching("unrecognized reference").count(), 0);
}

#[test]
fn test_unclaimed_reference_is_reported_once() {
    let ws = clean_workspace().with_reference("0-survey/references/stray.pdf");
    let report = audit(&ws);
    assert_eq!(
        lines(&report),
        vec!["references: unrecognized reference: 0-survey/references/stray.pdf"]
    );

    let ws = clean_workspace();
    assert_eq!(audit(&ws).matching("unrecognized reference").count(), 0);
}

#[test]
fn test_duplicate_ids_reported_once_across_nesting() {
    let ws = TestWorkspace::new()
        .with_research(json!([
            paper(ID, json!({"followed": [paper(ID, json!({}))]})),
            paper(ID, json!({})),
        ]))
        .build();

    let report = audit(&ws);
    let duplicates: Vec<String> = report
        .matching("duplicate paper_id")
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        duplicates,
        vec!["paper_id=260101-01: duplicate paper_id in research.json"]
    );
}

#[test]
fn test_schema_findings_and_orphans() {
    let ws = TestWorkspace::new()
        .with_research(json!([
            {"paper_id": "2601-1", "year": "2026", "followed": {}, "note": "x"}
        ]))
        .with_note("260199-99", "# Paper Note: 260199-99\n")
        .with_dir("0-survey/references")
        .with_dir("session")
        .build();

    let report = audit(&ws);
    let all = lines(&report);
    assert!(all[0].starts_with("research[0]: missing keys: ["));
    assert!(all.contains(&"research[0]: extra keys (allowed but review): [\"note\"] (warning)".to_string()));
    assert!(all.contains(&"research[0]: type mismatch: year should be int, got string".to_string()));
    assert!(all.contains(&"research[0]: paper_id format unexpected: 2601-1 (expected YYMMDD-NN)".to_string()));
    assert!(all.contains(&"research[0]: followed should be a list".to_string()));
    assert!(all.contains(&"0-survey/notes/2601-1.md: missing note file for paper_id".to_string()));
    assert!(all.contains(
        &"0-survey/notes/260199-99.md: note exists but paper_id not found in research.json".to_string()
    ));
    assert!(report.has_blocking());
}

#[test]
fn test_warnings_alone_do_not_block() {
    let ws = clean_workspace();
    let mut research = ws.read_research();
    research[0]["reviewer"] = json!("kim");
    let ws = ws.with_research(Value::Array(research));

    let report = audit(&ws);
    assert_eq!(report.len(), 1);
    assert!(report.issues()[0].is_warning());
    assert!(!report.has_blocking());
}

#[test]
fn test_missing_references_directory() {
    let ws = TestWorkspace::new()
        .with_session_md("260101", "# Session: 260101.\n")
        .with_session_json("260101", TestWorkspace::session_record("260101"))
        .build();
    assert_eq!(
        lines(&audit(&ws)),
        vec!["references: no references directory found"]
    );
}

#[test]
fn test_missing_template_is_fatal() {
    let ws = TestWorkspace::new().without_templates().build();
    let layout = Layout::load(&ws.root()).unwrap();
    let err = Auditor::new(&layout).run().unwrap_err();
    assert!(err.to_string().contains("paper_entry.json"), "{err}");
}

#[test]
fn test_malformed_store_is_fatal() {
    let ws = TestWorkspace::new().with_research_text("{ not json").build();
    let layout = Layout::load(&ws.root()).unwrap();
    let err = Auditor::new(&layout).run().unwrap_err();
    assert!(err.to_string().starts_with("invalid json:"), "{err}");
}
