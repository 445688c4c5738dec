//! Workspace resolution from command-line arguments
//!
//! Configuration files are read first; path flags then override the
//! resolved layout one path at a time.

use std::path::Path;

use notesync_core::Layout;
use notesync_fs::NormalizedPath;

use crate::cli::PathArgs;
use crate::error::Result;

/// Resolve the layout of the workspace at `root` with flag overrides.
pub fn resolve_layout(root: &Path, paths: &PathArgs) -> Result<Layout> {
    let mut layout = Layout::load(&NormalizedPath::new(root))?;

    if let Some(raw) = &paths.research_json {
        layout.research_json = layout.resolve(raw);
    }
    if let Some(raw) = &paths.notes_dir {
        layout.notes_dir = layout.resolve(raw);
    }
    if !paths.references_dirs.is_empty() {
        layout.references_dirs = paths
            .references_dirs
            .iter()
            .map(|raw| layout.resolve(raw))
            .collect();
    }
    if let Some(raw) = &paths.session_dir {
        layout.session_dir = layout.resolve(raw);
    }
    if let Some(raw) = &paths.tasks_root {
        layout.tasks_root = layout.resolve(raw);
    }
    if let Some(raw) = &paths.templates_dir {
        layout.templates_dir = layout.resolve(raw);
    }

    tracing::debug!(root = %layout.root, research = %layout.research_json, "Resolved workspace");
    Ok(layout)
}
