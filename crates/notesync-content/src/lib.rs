//! Record model and document conversion for notesync
//!
//! A workspace keeps every tracked paper twice: as a structured entry in the
//! record store and as a human-edited markdown note. This crate holds the
//! pieces both sync directions share:
//!
//! - [`entry`]: the entry forest and its pre-order flattening
//! - [`normalize`]: placeholder detection and field equivalence
//! - [`field`]: descriptor tables driving both parser and renderer
//! - [`paper`] / [`task`]: note parsers and renderers

pub mod entry;
pub mod error;
pub mod field;
pub mod markdown;
pub mod normalize;
pub mod paper;
pub mod task;

pub use entry::{
    CHILDREN_KEY, ID_KEY, IdentifierIndex, LocatedEntry, Record, entry_id, flatten, flatten_with,
    for_each_entry_mut, get_path, set_path,
};
pub use error::{Error, Result};
pub use field::{FieldDescriptor, FieldKind, paper_fields, task_fields};
pub use normalize::{equivalent, is_placeholder, normalize_str, normalize_value};
pub use paper::{default_entry, paper_headings, paper_title, parse_paper_note, render_paper_note};
pub use task::{
    TASK_ID_KEY, merge_task_fields, parse_task_note, render_task_note, task_headings, task_id,
    task_title,
};
