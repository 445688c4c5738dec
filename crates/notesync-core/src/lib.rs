//! Workspace layer for notesync
//!
//! Ties the record model from `notesync-content` to files on disk:
//!
//! - **Layout**: layered configuration resolved into absolute workspace paths
//! - **Auditor**: every consistency pass over records, notes, references,
//!   session logs and task directories, collected into one [`AuditReport`]
//! - **Sync**: [`PaperSync`] and [`TaskSync`] move content between records
//!   and notes under explicit [`SyncOptions`]
//!
//! ```text
//!                 notesync-cli
//!                      |
//!                notesync-core
//!                  /        \
//!      notesync-content   notesync-fs
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod issue;
pub mod registry;
pub mod research;
pub mod session;
pub mod sync;
pub mod tasks;
pub mod template;

pub use audit::{Auditor, PAPER_ENTRY_TEMPLATE, PAPER_NOTE_TEMPLATE};
pub use config::{CONFIG_DIR, ConfigResolver, DEFAULT_STAGES, Layout, Manifest};
pub use error::{Error, Result};
pub use issue::{AuditReport, Issue, Severity};
pub use registry::{ARTIFACT_KEY, ReferenceAudit, audit_references};
pub use research::{RESEARCH_KEY, ResearchStore};
pub use session::SessionAuditor;
pub use sync::{PaperSync, SyncAction, SyncOptions, SyncReport, TaskSync};
pub use tasks::{TASK_NOTE, TASK_RECORD, TaskAuditor, task_dirs};
pub use template::{NoteTemplate, RecordTemplate, ValueKind};
