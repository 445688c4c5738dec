//! Paper and task sync commands

use colored::Colorize;

use notesync_core::{Layout, PaperSync, SyncAction, SyncOptions, SyncReport, TaskSync};

use crate::cli::{Direction, NoteSyncArgs, RecordSyncArgs};
use crate::error::{CliError, Result};

/// Run `paper to-json` or `paper to-md`.
pub fn run_paper(layout: &Layout, direction: &Direction) -> Result<i32> {
    let sync = PaperSync::new(layout);
    match direction {
        Direction::ToJson(args) => {
            let report = sync.notes_to_store(&record_options(args)?)?;
            print_record_report(&report);
        }
        Direction::ToMd(args) => {
            let report = sync.store_to_notes(&note_options(args))?;
            print_note_report(&report);
        }
    }
    Ok(0)
}

/// Run `task to-json` or `task to-md`.
pub fn run_task(layout: &Layout, direction: &Direction, task_dirs: &[String]) -> Result<i32> {
    let explicit = task_dirs.iter().map(|raw| layout.resolve(raw)).collect();
    let sync = TaskSync::new(layout, explicit);
    match direction {
        Direction::ToJson(args) => {
            let report = sync.notes_to_records(&record_options(args)?)?;
            print_record_report(&report);
        }
        Direction::ToMd(args) => {
            let report = sync.records_to_notes(&note_options(args))?;
            print_note_report(&report);
        }
    }
    Ok(0)
}

fn note_options(args: &NoteSyncArgs) -> SyncOptions {
    SyncOptions {
        create_missing: args.create_missing,
        overwrite: args.overwrite,
        dry_run: args.dry_run,
        ids: args.ids.clone(),
        ..SyncOptions::default()
    }
}

/// Options for the notes-to-records direction, which must be allowed to do something.
fn record_options(args: &RecordSyncArgs) -> Result<SyncOptions> {
    if !args.update_existing && !args.create_missing {
        return Err(CliError::user(
            "need at least one of: --update-existing, --create-missing",
        ));
    }
    Ok(SyncOptions {
        create_missing: args.create_missing,
        update_existing: args.update_existing,
        dry_run: args.dry_run,
        ids: args.ids.clone(),
        ..SyncOptions::default()
    })
}

fn print_errors(report: &SyncReport) {
    for error in &report.errors {
        eprintln!("{} {}", "skip:".yellow().bold(), error);
    }
}

fn print_record_report(report: &SyncReport) {
    print_errors(report);
    if report.dry_run {
        for (action, verb) in [(SyncAction::Create, "create"), (SyncAction::Update, "update")] {
            let labels: Vec<&str> = report.labels(action).collect();
            if !labels.is_empty() {
                println!("{verb}: {}", labels.join(", "));
            }
        }
        println!("dry-run: no files written.");
        return;
    }
    println!(
        "done: created={}, updated={}",
        report.created(),
        report.updated()
    );
}

fn print_note_report(report: &SyncReport) {
    print_errors(report);
    if report.dry_run {
        for (action, label) in &report.actions {
            println!("{}: {label}", action.note_verb());
        }
        println!("dry-run: no files written.");
        return;
    }
    println!(
        "done: created={}, updated={}, skipped={}",
        report.created(),
        report.updated(),
        report.skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_needs_a_mode() {
        let err = record_options(&RecordSyncArgs::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "need at least one of: --update-existing, --create-missing"
        );

        let args = RecordSyncArgs {
            create_missing: true,
            ids: vec!["260101-01".into()],
            ..RecordSyncArgs::default()
        };
        let options = record_options(&args).unwrap();
        assert!(options.create_missing);
        assert!(!options.overwrite);
        assert_eq!(options.ids, vec!["260101-01"]);
    }

    #[test]
    fn test_to_md_never_updates_records() {
        let args = NoteSyncArgs {
            overwrite: true,
            ..NoteSyncArgs::default()
        };
        let options = note_options(&args);
        assert!(options.overwrite);
        assert!(!options.update_existing);
    }
}
