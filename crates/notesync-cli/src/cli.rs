//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// notesync - Keep a research record store and its markdown notes in step
#[derive(Parser, Debug)]
#[command(name = "notesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root
    #[arg(long, global = true, env = "NOTESYNC_ROOT", default_value = ".")]
    pub root: PathBuf,

    #[command(flatten)]
    pub paths: PathArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for configured workspace paths, relative to the root.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    /// Record store file
    #[arg(long, global = true)]
    pub research_json: Option<String>,

    /// Directory holding paper notes
    #[arg(long, global = true)]
    pub notes_dir: Option<String>,

    /// Reference directory (repeatable; replaces the configured list)
    #[arg(long = "references-dir", global = true)]
    pub references_dirs: Vec<String>,

    /// Directory holding session logs
    #[arg(long, global = true)]
    pub session_dir: Option<String>,

    /// Directory holding one sub-directory per task
    #[arg(long, global = true)]
    pub tasks_root: Option<String>,

    /// Directory holding record and note templates
    #[arg(long, global = true)]
    pub templates_dir: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Audit records, notes, references, session logs and tasks
    ///
    /// Prints every issue found. Exits 0 unless --strict is given and at
    /// least one non-warning issue exists.
    Audit {
        /// Fail with a non-zero exit code when issues are found
        #[arg(long)]
        strict: bool,
    },

    /// Audit reference files against record bindings only
    Refs {
        /// Fail with a non-zero exit code when issues are found
        #[arg(long)]
        strict: bool,
    },

    /// Sync paper entries and paper notes
    Paper {
        #[command(subcommand)]
        direction: Direction,
    },

    /// Sync task records and task notes
    Task {
        #[command(subcommand)]
        direction: Direction,

        /// Task directory to process (repeatable; replaces discovery)
        #[arg(long = "task-dir", global = true)]
        task_dirs: Vec<String>,
    },
}

/// Sync direction
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Fold notes into records
    ///
    /// Examples:
    ///   notesync paper to-json --update-existing
    ///   notesync paper to-json --create-missing --id 260101-01 --dry-run
    ToJson(RecordSyncArgs),

    /// Render records into notes
    ///
    /// Existing notes are left alone unless --overwrite is given.
    ToMd(NoteSyncArgs),
}

/// Flags for folding notes into records.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSyncArgs {
    /// Only process this identifier (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Add records for notes that have none
    #[arg(long)]
    pub create_missing: bool,

    /// Update records that already exist
    #[arg(long)]
    pub update_existing: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Flags for rendering records into notes.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSyncArgs {
    /// Only process this identifier (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Write notes that do not exist yet
    #[arg(long)]
    pub create_missing: bool,

    /// Replace notes that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
