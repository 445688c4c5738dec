//! Entry forest model
//!
//! Entries are kept as JSON objects so keys the tooling does not know about
//! survive a sync round. Each entry owns its derived entries under
//! [`CHILDREN_KEY`], recursively, so the record store holds a forest.

use std::collections::{BTreeSet, HashSet};

use serde_json::{Map, Value};

/// A single structured record.
pub type Record = Map<String, Value>;

/// Key holding an entry's derived child entries.
pub const CHILDREN_KEY: &str = "followed";

/// Key holding an entry's identifier.
pub const ID_KEY: &str = "paper_id";

/// An entry together with its structural location in the forest.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedEntry<'a> {
    /// The entry itself.
    pub entry: &'a Record,
    /// Path through the forest, e.g. `research[0].followed[2]`.
    pub location: String,
}

impl LocatedEntry<'_> {
    /// The trimmed identifier of this entry (may be empty).
    pub fn id(&self) -> String {
        entry_id(self.entry)
    }
}

/// Accumulates identifiers seen during a traversal.
///
/// Passed explicitly through [`flatten_with`] so duplicate detection needs no
/// shared state and each traversal can be checked on its own.
#[derive(Debug, Default, Clone)]
pub struct IdentifierIndex {
    seen: HashSet<String>,
    duplicates: BTreeSet<String>,
}

impl IdentifierIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier. Returns `false` when it was already seen.
    ///
    /// Empty identifiers are ignored.
    pub fn record(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return true;
        }
        if self.seen.insert(id.to_string()) {
            true
        } else {
            self.duplicates.insert(id.to_string());
            false
        }
    }

    /// Whether `id` has been recorded.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Identifiers recorded more than once, sorted, each listed once.
    pub fn duplicates(&self) -> impl Iterator<Item = &str> {
        self.duplicates.iter().map(String::as_str)
    }

    /// Number of distinct identifiers recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// The trimmed identifier of a record; empty when absent or null.
pub fn entry_id(record: &Record) -> String {
    match record.get(ID_KEY) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Flatten a forest in pre-order: each entry, then its children.
///
/// Non-object items are skipped. `prefix` names the top-level list and
/// seeds the location labels.
pub fn flatten<'a>(entries: &'a [Value], prefix: &str) -> Vec<LocatedEntry<'a>> {
    let mut index = IdentifierIndex::new();
    flatten_with(entries, prefix, &mut index)
}

/// Like [`flatten`], recording every identifier into `index` on the way.
pub fn flatten_with<'a>(
    entries: &'a [Value],
    prefix: &str,
    index: &mut IdentifierIndex,
) -> Vec<LocatedEntry<'a>> {
    let mut out = Vec::new();
    flatten_into(entries, prefix, index, &mut out);
    out
}

fn flatten_into<'a>(
    entries: &'a [Value],
    prefix: &str,
    index: &mut IdentifierIndex,
    out: &mut Vec<LocatedEntry<'a>>,
) {
    for (i, value) in entries.iter().enumerate() {
        let Value::Object(entry) = value else {
            continue;
        };
        let location = format!("{prefix}[{i}]");
        index.record(&entry_id(entry));

        let children = match entry.get(CHILDREN_KEY) {
            Some(Value::Array(children)) => Some(children),
            _ => None,
        };
        let child_prefix = format!("{location}.{CHILDREN_KEY}");
        out.push(LocatedEntry { entry, location });

        if let Some(children) = children {
            flatten_into(children, &child_prefix, index, out);
        }
    }
}

/// Visit every entry of a forest mutably, in pre-order.
pub fn for_each_entry_mut(entries: &mut [Value], f: &mut impl FnMut(&mut Record)) {
    for value in entries.iter_mut() {
        let Value::Object(entry) = value else {
            continue;
        };
        f(entry);
        if let Some(Value::Array(children)) = entry.get_mut(CHILDREN_KEY) {
            for_each_entry_mut(children, f);
        }
    }
}

/// Look up a dotted path such as `design.metrics`.
pub fn get_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Set a dotted path, creating or replacing intermediate groups as needed.
pub fn set_path(record: &mut Record, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            record.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = record
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Record::new()));
            if !slot.is_object() {
                *slot = Value::Object(Record::new());
            }
            if let Value::Object(group) = slot {
                set_path(group, rest, value);
            }
        }
    }
}
