//! Error types for notesync-content

/// Result type for notesync-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or rendering notes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} record is missing `{key}`")]
    MissingIdentifier {
        kind: &'static str,
        key: &'static str,
    },
}
