//! Sync round trips through the filesystem

use notesync_core::{Auditor, Layout, PaperSync, SyncAction, SyncOptions};
use notesync_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use serde_json::json;

fn layout(ws: &TestWorkspace) -> Layout {
    Layout::load(&ws.root()).unwrap()
}

#[test]
fn test_render_edit_and_fold_back() {
    let ws = TestWorkspace::new()
        .with_research(json!([{
            "paper_id": "260101-01",
            "title": "Warmup matters",
            "year": 2026,
            "authors": ["Kim", "Lee"],
            "key_claims": ["claim-1: warmup stabilizes training"],
            "followed": [{"paper_id": "260101-02", "title": "Follow-up"}]
        }]))
        .build();
    let layout = layout(&ws);
    let sync = PaperSync::new(&layout);

    let report = sync
        .store_to_notes(&SyncOptions {
            create_missing: true,
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!(report.created(), 2);

    let edited = ws
        .read_note("260101-01")
        .replace("claim-1: warmup stabilizes training", "claim-1: warmup stabilizes training\n- claim-2: it also helps small batches");
    let ws = ws.with_note("260101-01", &edited);

    let report = sync
        .notes_to_store(&SyncOptions {
            update_existing: true,
            ..SyncOptions::default()
        })
        .unwrap();
    assert_eq!(
        report.labels(SyncAction::Update).collect::<Vec<_>>(),
        vec!["260101-01", "260101-02"]
    );

    let research = ws.read_research();
    assert_eq!(
        research[0]["key_claims"],
        json!([
            "claim-1: warmup stabilizes training",
            "claim-2: it also helps small batches"
        ])
    );
    assert_eq!(research[0]["authors"], json!(["Kim", "Lee"]));
    assert_eq!(research[0]["year"], json!(2026));
    assert_eq!(research[0]["followed"][0]["title"], json!("Follow-up"));
    assert_eq!(research.len(), 1);
}

#[test]
fn test_synced_workspace_audits_clean_notes() {
    let ws = TestWorkspace::new()
        .with_research(json!([{"paper_id": "260101-01", "title": "Warmup matters"}]))
        .with_note("260101-01", "# Paper Note: 260101-01\n\n## 0. Meta\n- **year**: 2026\n")
        .build();
    let layout = layout(&ws);
    let sync = PaperSync::new(&layout);

    sync.notes_to_store(&SyncOptions {
        update_existing: true,
        ..SyncOptions::default()
    })
    .unwrap();
    sync.store_to_notes(&SyncOptions {
        overwrite: true,
        ..SyncOptions::default()
    })
    .unwrap();

    let report = Auditor::new(&layout).run().unwrap();
    let note_issues: Vec<String> = report
        .issues()
        .iter()
        .filter(|issue| issue.location.starts_with("0-survey/notes"))
        .map(ToString::to_string)
        .collect();
    assert!(note_issues.is_empty(), "{note_issues:#?}");

    let research = ws.read_research();
    assert_eq!(research[0]["year"], json!(2026));
    assert_eq!(research[0]["title"], json!(""));
}
