//! Workspace configuration and layout
//!
//! Configuration is read from two optional files under the workspace root,
//! later layers overriding earlier ones key by key:
//!
//! 1. `.notesync/config.toml`
//! 2. `.notesync/config.local.toml` (git-ignored overrides)
//!
//! The merged [`Manifest`] is then resolved against the root into a
//! [`Layout`] of absolute paths.

use notesync_fs::{NormalizedPath, io, resolve_path};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Directory holding configuration and templates.
pub const CONFIG_DIR: &str = ".notesync";

/// Default workflow stages accepted in session logs.
pub const DEFAULT_STAGES: &[&str] = &["project", "0-survey", "1-validation", "2-experiments"];

/// `[paths]` section. Relative values are resolved against the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub research_json: Option<String>,
    pub notes_dir: Option<String>,
    pub references_dirs: Option<Vec<String>>,
    pub session_dir: Option<String>,
    pub tasks_root: Option<String>,
    pub templates_dir: Option<String>,
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    pub session_stages: Option<Vec<String>>,
    pub reference_extensions: Option<Vec<String>>,
}

/// One parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub audit: AuditSection,
}

impl Manifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay `other` onto `self`; keys set in `other` win.
    pub fn merge(&mut self, other: &Manifest) {
        fn overlay<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        overlay(&mut self.paths.research_json, &other.paths.research_json);
        overlay(&mut self.paths.notes_dir, &other.paths.notes_dir);
        overlay(&mut self.paths.references_dirs, &other.paths.references_dirs);
        overlay(&mut self.paths.session_dir, &other.paths.session_dir);
        overlay(&mut self.paths.tasks_root, &other.paths.tasks_root);
        overlay(&mut self.paths.templates_dir, &other.paths.templates_dir);
        overlay(&mut self.audit.session_stages, &other.audit.session_stages);
        overlay(
            &mut self.audit.reference_extensions,
            &other.audit.reference_extensions,
        );
    }
}

/// Loads and merges the configuration layers of a workspace.
pub struct ConfigResolver {
    root: NormalizedPath,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    /// Path of the shared configuration file.
    pub fn config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_DIR).join("config.toml")
    }

    /// Path of the local override file.
    pub fn local_config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_DIR).join("config.local.toml")
    }

    /// Merge every layer that exists. Missing layers are skipped; a layer
    /// that fails to parse is an error.
    pub fn resolve(&self) -> Result<Manifest> {
        let mut manifest = Manifest::default();
        for path in [self.config_path(), self.local_config_path()] {
            if !path.is_file() {
                tracing::debug!(%path, "No config layer found, skipping");
                continue;
            }
            tracing::debug!(%path, "Loading config layer");
            let content = io::read_text(&path)?;
            let layer = Manifest::parse(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                message: e.to_string(),
            })?;
            manifest.merge(&layer);
        }
        Ok(manifest)
    }
}

/// Absolute locations of everything a workspace tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: NormalizedPath,
    pub research_json: NormalizedPath,
    pub notes_dir: NormalizedPath,
    /// Candidate reference directories, in priority order.
    pub references_dirs: Vec<NormalizedPath>,
    pub session_dir: NormalizedPath,
    pub tasks_root: NormalizedPath,
    pub templates_dir: NormalizedPath,
    pub session_stages: Vec<String>,
    pub reference_extensions: Vec<String>,
}

impl Layout {
    /// Resolve the configuration of the workspace at `root`.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let root = resolve_path(root, ".");
        let manifest = ConfigResolver::new(root.clone()).resolve()?;
        Ok(Self::from_manifest(&root, &manifest))
    }

    /// Build a layout from an already merged manifest, filling defaults.
    pub fn from_manifest(root: &NormalizedPath, manifest: &Manifest) -> Self {
        let paths = &manifest.paths;
        let at = |value: &Option<String>, default: &str| {
            resolve_path(root, value.as_deref().unwrap_or(default))
        };

        let references_dirs = match &paths.references_dirs {
            Some(dirs) => dirs.iter().map(|d| resolve_path(root, d)).collect(),
            None => vec![
                resolve_path(root, "0-survey/references"),
                resolve_path(root, "0-survey/reference"),
            ],
        };

        Self {
            root: root.clone(),
            research_json: at(&paths.research_json, "0-survey/research.json"),
            notes_dir: at(&paths.notes_dir, "0-survey/notes"),
            references_dirs,
            session_dir: at(&paths.session_dir, "session"),
            tasks_root: at(&paths.tasks_root, "1-validation/tasks"),
            templates_dir: at(&paths.templates_dir, ".notesync/templates"),
            session_stages: manifest
                .audit
                .session_stages
                .clone()
                .unwrap_or_else(|| DEFAULT_STAGES.iter().map(|s| s.to_string()).collect()),
            reference_extensions: manifest
                .audit
                .reference_extensions
                .clone()
                .unwrap_or_else(|| vec!["pdf".to_string()]),
        }
    }

    /// Resolve a user-supplied path against the workspace root.
    pub fn resolve(&self, raw: &str) -> NormalizedPath {
        resolve_path(&self.root, raw)
    }

    /// The note file for an entry identifier.
    pub fn note_path(&self, id: &str) -> NormalizedPath {
        self.notes_dir.join(&format!("{id}.md"))
    }

    /// A path in the templates directory.
    pub fn template(&self, name: &str) -> NormalizedPath {
        self.templates_dir.join(name)
    }

    /// Reference directories that exist on disk.
    pub fn existing_reference_dirs(&self) -> Vec<NormalizedPath> {
        self.references_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .cloned()
            .collect()
    }

    /// Render a path relative to the root for reports.
    pub fn display(&self, path: &NormalizedPath) -> String {
        notesync_fs::display_relative(path, &self.root)
    }
}
