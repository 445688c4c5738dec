//! JSON record store loading and saving

use serde_json::{Map, Value};

use crate::{Error, NormalizedPath, Result, io};

/// Loads and saves JSON record files.
///
/// Output is pretty-printed with two-space indentation, keeps non-ASCII
/// characters literal, preserves key order and ends with a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonStore;

impl JsonStore {
    /// Create a new JsonStore.
    pub fn new() -> Self {
        Self
    }

    /// Load any JSON value from a file.
    pub fn load(&self, path: &NormalizedPath) -> Result<Value> {
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::JsonParse {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Load a file whose top level must be a JSON object.
    pub fn load_object(&self, path: &NormalizedPath) -> Result<Map<String, Value>> {
        match self.load(path)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::NotAnObject {
                path: path.to_native(),
            }),
        }
    }

    /// Render a value the way [`JsonStore::save`] writes it.
    pub fn render(&self, value: &Value) -> std::result::Result<String, serde_json::Error> {
        let mut out = serde_json::to_string_pretty(value)?;
        out.push('\n');
        Ok(out)
    }

    /// Save a value atomically.
    pub fn save(&self, path: &NormalizedPath, value: &Value) -> Result<()> {
        let content = self.render(value).map_err(|e| Error::JsonSerialize {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        io::write_text(path, &content)
    }
}
