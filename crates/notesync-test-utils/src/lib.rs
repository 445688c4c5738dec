//! Shared test fixtures for the notesync workspace.
//!
//! A dev-dependency only, never published.
//!
//! - [`workspace`]: [`TestWorkspace`] builder laying out a throwaway
//!   workspace in the default directory layout

pub mod workspace;

pub use workspace::TestWorkspace;
