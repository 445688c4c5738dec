//! Command implementations for notesync-cli
//!
//! Each command returns the process exit code on success.

pub mod audit;
pub mod sync;

pub use audit::{run_audit, run_refs};
pub use sync::{run_paper, run_task};
