//! Error types for notesync-fs

use std::path::PathBuf;

/// Result type for notesync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notesync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing file: {path}")]
    MissingFile { path: PathBuf },

    #[error("invalid json: {path} ({message})")]
    JsonParse { path: PathBuf, message: String },

    #[error("failed to serialize json for {path}: {message}")]
    JsonSerialize { path: PathBuf, message: String },

    #[error("expected a JSON object at the top level of {path}")]
    NotAnObject { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
