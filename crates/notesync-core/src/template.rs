//! Record and note templates
//!
//! A record template is an example JSON object; the kind of each key is
//! taken from its example value. A note template is an example markdown
//! document; its title line and `## ` headings are what every note must
//! carry.

use std::sync::LazyLock;

use notesync_content::Record;
use notesync_fs::{JsonStore, NormalizedPath, io};
use regex::Regex;
use serde_json::Value;

use crate::{Error, Result};

/// `<paper_id>`, `<YYMMDD>` and friends inside a template title line.
static TITLE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("Invalid title token regex"));

/// The JSON kind of a template value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    List,
    Object,
    Null,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::Bool(_) => Self::Bool,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Object,
            Value::Null => Self::Null,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected keys of a record and the kind of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTemplate {
    keys: Vec<(String, ValueKind)>,
}

impl RecordTemplate {
    /// Load a template from a JSON object file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let object = JsonStore::new()
            .load_object(path)
            .map_err(|e| match e {
                notesync_fs::Error::NotAnObject { path } => Error::InvalidTemplate {
                    path,
                    message: "template must be a JSON object".to_string(),
                },
                other => other.into(),
            })?;
        Ok(Self::from_example(&object))
    }

    /// Derive the key set from an example record.
    pub fn from_example(example: &Record) -> Self {
        Self {
            keys: example
                .iter()
                .map(|(key, value)| (key.clone(), ValueKind::of(value)))
                .collect(),
        }
    }

    /// Keys in template order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(key, _)| key.as_str())
    }

    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.keys.iter().find(|(k, _)| k == key).map(|(_, kind)| *kind)
    }

    /// Template keys the record lacks.
    pub fn missing_keys(&self, record: &Record) -> Vec<String> {
        self.keys()
            .filter(|key| !record.contains_key(*key))
            .map(str::to_string)
            .collect()
    }

    /// Record keys the template does not declare.
    pub fn extra_keys(&self, record: &Record) -> Vec<String> {
        record
            .keys()
            .filter(|key| self.kind_of(key).is_none())
            .cloned()
            .collect()
    }

    /// Type mismatch messages for list, int and string keys.
    ///
    /// Null values never mismatch; other kinds are not checked.
    pub fn type_mismatches(&self, record: &Record) -> Vec<String> {
        let mut out = Vec::new();
        for (key, want) in &self.keys {
            let Some(got) = record.get(key) else {
                continue;
            };
            let got = ValueKind::of(got);
            if got == ValueKind::Null {
                continue;
            }
            let checked = matches!(want, ValueKind::List | ValueKind::Int | ValueKind::String);
            if checked && got != *want {
                out.push(format!("type mismatch: {key} should be {want}, got {got}"));
            }
        }
        out
    }
}

/// Title line and headings every note of one kind must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTemplate {
    title: Option<String>,
    headings: Vec<String>,
}

impl NoteTemplate {
    /// Load a note template from a markdown file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(Self::from_text(&io::read_text(path)?))
    }

    /// Scan template text for its `# ` title line and `## ` headings.
    pub fn from_text(text: &str) -> Self {
        let mut title = None;
        let mut headings = Vec::new();
        for line in text.lines().map(str::trim) {
            if line.starts_with("## ") {
                headings.push(line.to_string());
            } else if title.is_none() && line.starts_with("# ") {
                title = Some(line.to_string());
            }
        }
        Self { title, headings }
    }

    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    /// The title line expected for `id`.
    ///
    /// The first `<...>` token of the template title is replaced by `id`.
    /// Returns `None` when the template has no usable title line.
    pub fn title_for(&self, id: &str) -> Option<String> {
        let title = self.title.as_deref()?;
        if !TITLE_TOKEN.is_match(title) {
            return None;
        }
        Some(TITLE_TOKEN.replace(title, regex::NoExpand(id)).into_owned())
    }
}
