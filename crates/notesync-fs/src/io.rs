//! Atomic I/O operations with file locking

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use fs2::FileExt;
use tempfile::Builder;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Content goes to a locked temp file next to the target, which is then
/// persisted over it; a reader never observes a partial write. The temp file
/// is removed on every failure path.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    let parent = match native_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;

    let prefix = format!(
        ".{}.",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );
    let mut temp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(|e| Error::io(&parent, e))?;

    temp.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    temp.write_all(content).map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| Error::io(temp.path(), e))?;
    FileExt::unlock(temp.as_file()).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp.persist(&native_path)
        .map_err(|e| Error::io(&native_path, e.error))?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote file");
    Ok(())
}

/// Read text content from a file.
///
/// A missing file maps to [`Error::MissingFile`] so callers can tell
/// absence apart from other I/O failures.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingFile { path: native_path },
        _ => Error::io(&native_path, e),
    })
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
