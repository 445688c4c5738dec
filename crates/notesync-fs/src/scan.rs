//! Directory listing and recursive discovery of artifact files

use std::collections::HashSet;
use std::fs;

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result, resolve_path};

/// Find every file under `dirs` whose extension matches one of `extensions`.
///
/// Extension matching is case-insensitive. Results are resolved to absolute
/// paths, deduplicated, and sorted case-insensitively. Directories that do
/// not exist are skipped; unreadable entries are logged and skipped.
pub fn discover_files(dirs: &[NormalizedPath], extensions: &[String]) -> Vec<NormalizedPath> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir.to_native()).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry under {}: {}", dir, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .map(|ext| ext.to_string_lossy())
                .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(&ext)));
            if !matches {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir.to_native())
                .unwrap_or(entry.path());
            let resolved = resolve_path(dir, relative);
            if seen.insert(resolved.clone()) {
                found.push(resolved);
            }
        }
    }

    found.sort_by_key(|p| p.as_str().to_lowercase());
    found
}

/// List the regular files directly inside `dir`, sorted case-insensitively
/// by file name.
///
/// `.gitkeep` markers are skipped. With `extension` set, only files with
/// that extension (case-sensitive) are returned. A missing directory yields
/// an empty list.
pub fn list_files(dir: &NormalizedPath, extension: Option<&str>) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let native = dir.to_native();
    let mut files = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file = NormalizedPath::new(&path);
        if file.file_name() == Some(".gitkeep") {
            continue;
        }
        if let Some(want) = extension {
            if file.extension() != Some(want) {
                continue;
            }
        }
        files.push(file);
    }
    files.sort_by_key(|p| p.file_name().unwrap_or_default().to_lowercase());
    Ok(files)
}

/// List the subdirectories directly inside `dir`, sorted case-insensitively.
pub fn list_dirs(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let native = dir.to_native();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        if entry.path().is_dir() {
            dirs.push(NormalizedPath::new(entry.path()));
        }
    }
    dirs.sort_by_key(|p| p.file_name().unwrap_or_default().to_lowercase());
    Ok(dirs)
}
