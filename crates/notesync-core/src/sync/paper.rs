//! Paper sync between the record store and paper notes

use std::collections::{HashMap, HashSet};

use notesync_content::{
    ID_KEY, Record, default_entry, entry_id, flatten, for_each_entry_mut, parse_paper_note,
    render_paper_note,
};
use notesync_fs::{io, list_files};
use serde_json::Value;

use super::{SyncAction, SyncOptions, SyncReport};
use crate::Result;
use crate::config::Layout;
use crate::research::{RESEARCH_KEY, ResearchStore};

/// Syncs paper entries and their notes.
pub struct PaperSync<'a> {
    layout: &'a Layout,
}

impl<'a> PaperSync<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Fold notes into the record store.
    ///
    /// Entries are matched by identifier anywhere in the forest. Updating
    /// replaces every parsed field except the identifier and keeps all other
    /// keys, child entries included. New entries are appended to the
    /// top-level list.
    pub fn notes_to_store(&self, options: &SyncOptions) -> Result<SyncReport> {
        let mut store = ResearchStore::load(&self.layout.research_json)?;
        let mut known: HashSet<String> = flatten(store.entries(), RESEARCH_KEY)
            .iter()
            .map(|located| located.id())
            .filter(|id| !id.is_empty())
            .collect();

        let mut report = SyncReport::new(options.dry_run);
        let mut updates: HashMap<String, Record> = HashMap::new();
        let mut creates: Vec<Record> = Vec::new();

        for path in list_files(&self.layout.notes_dir, Some("md"))? {
            let id = path.file_stem().unwrap_or_default().trim().to_string();
            if id.is_empty() || !options.wants(&id) {
                continue;
            }
            let parsed = parse_paper_note(&id, &io::read_text(&path)?);

            if known.contains(&id) {
                if !options.update_existing {
                    report.skipped += 1;
                    continue;
                }
                tracing::debug!(%id, "Updating entry from note");
                updates.insert(id.clone(), parsed);
                report.record(SyncAction::Update, id);
            } else {
                if !options.create_missing {
                    report.skipped += 1;
                    continue;
                }
                tracing::debug!(%id, "Creating entry from note");
                let mut entry = default_entry(&id);
                entry.extend(parsed);
                creates.push(entry);
                known.insert(id.clone());
                report.record(SyncAction::Create, id);
            }
        }

        if options.dry_run || report.actions.is_empty() {
            return Ok(report);
        }

        let entries = store.entries_mut();
        for_each_entry_mut(entries, &mut |entry: &mut Record| {
            if let Some(parsed) = updates.get(&entry_id(entry)) {
                for (key, value) in parsed {
                    if key != ID_KEY {
                        entry.insert(key.clone(), value.clone());
                    }
                }
            }
        });
        entries.extend(creates.into_iter().map(Value::Object));
        store.save()?;
        tracing::info!(
            created = report.created(),
            updated = report.updated(),
            "Wrote record store"
        );
        Ok(report)
    }

    /// Render entries into notes.
    ///
    /// An existing note is only replaced with `overwrite`; a missing one is
    /// only created with `create_missing` or `overwrite`.
    pub fn store_to_notes(&self, options: &SyncOptions) -> Result<SyncReport> {
        let store = ResearchStore::load(&self.layout.research_json)?;
        let mut report = SyncReport::new(options.dry_run);

        for located in flatten(store.entries(), RESEARCH_KEY) {
            let id = located.id();
            if id.is_empty() || !options.wants(&id) {
                report.skipped += 1;
                continue;
            }

            let path = self.layout.note_path(&id);
            let exists = path.is_file();
            let allowed = if exists {
                options.overwrite
            } else {
                options.create_missing || options.overwrite
            };
            if !allowed {
                report.skipped += 1;
                continue;
            }

            let action = if exists {
                SyncAction::Update
            } else {
                SyncAction::Create
            };
            let content = render_paper_note(located.entry)?;
            if !options.dry_run {
                io::write_text(&path, &content)?;
                tracing::debug!(%id, path = %path, "Wrote note");
            }
            report.record(action, self.layout.display(&path));
        }
        Ok(report)
    }
}
