//! The paper record store
//!
//! A JSON object whose `research` list holds the entry forest. Other
//! top-level keys are kept as they are.

use notesync_content::Record;
use notesync_fs::{JsonStore, NormalizedPath};
use serde_json::Value;

use crate::{Error, Result};

/// Top-level key of the entry forest.
pub const RESEARCH_KEY: &str = "research";

/// A loaded record store.
#[derive(Debug, Clone)]
pub struct ResearchStore {
    path: NormalizedPath,
    data: Record,
}

impl ResearchStore {
    /// Load the store. A missing or malformed file is fatal, as is a
    /// `research` value that is not a list. An absent `research` key reads
    /// as an empty forest.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let data = JsonStore::new().load_object(path)?;
        match data.get(RESEARCH_KEY) {
            None | Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(Error::InvalidStore {
                    path: path.to_native(),
                });
            }
        }
        tracing::debug!(%path, "Loaded record store");
        Ok(Self {
            path: path.clone(),
            data,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The top-level entries.
    pub fn entries(&self) -> &[Value] {
        match self.data.get(RESEARCH_KEY) {
            Some(Value::Array(entries)) => entries,
            _ => &[],
        }
    }

    /// The top-level entries, creating the list when absent.
    pub fn entries_mut(&mut self) -> &mut Vec<Value> {
        let slot = self
            .data
            .entry(RESEARCH_KEY.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        slot.as_array_mut().expect("Research slot must be an array")
    }

    /// Write the store back atomically.
    pub fn save(&self) -> Result<()> {
        JsonStore::new().save(&self.path, &Value::Object(self.data.clone()))?;
        Ok(())
    }
}
