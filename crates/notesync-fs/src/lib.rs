//! Filesystem layer for notesync
//!
//! Provides normalized path handling, atomic text I/O, the JSON record store
//! and recursive artifact discovery.

pub mod error;
pub mod io;
pub mod path;
pub mod scan;
pub mod store;

pub use error::{Error, Result};
pub use path::{NormalizedPath, display_relative, resolve_path};
pub use scan::{discover_files, list_dirs, list_files};
pub use store::JsonStore;
