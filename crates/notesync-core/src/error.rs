//! Error types for notesync-core

use std::path::PathBuf;

/// Result type for notesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
///
/// Everything recoverable is reported as an [`crate::Issue`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file exists but does not parse
    #[error("invalid config: {path} ({message})")]
    ConfigParse { path: PathBuf, message: String },

    /// The record store does not hold an entry list
    #[error("`research` must be a list in {path}")]
    InvalidStore { path: PathBuf },

    /// A template file has the wrong shape
    #[error("invalid template: {path} ({message})")]
    InvalidTemplate { path: PathBuf, message: String },

    /// Filesystem error from notesync-fs
    #[error(transparent)]
    Fs(#[from] notesync_fs::Error),

    /// Parse or render error from notesync-content
    #[error(transparent)]
    Content(#[from] notesync_content::Error),
}
