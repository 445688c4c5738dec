//! Normalized path handling for cross-platform compatibility

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Construction cleans the path lexically: separators are unified, `.` and
/// empty components are dropped and `..` pops the previous component. An
/// absolute path never climbs above its root; a relative path keeps leading
/// `..` components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: clean(&raw) }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the file name without its final extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this path is absolute on the current platform.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || self.to_native().is_absolute()
    }
}

fn clean(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let network = raw.starts_with("//") && !raw.starts_with("///");
    let absolute = raw.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." && !(parts.len() == 1 && last.ends_with(':')) => {
                    parts.pop();
                }
                Some(&last) if last.ends_with(':') => {}
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let prefix = if network {
        "//"
    } else if absolute {
        "/"
    } else {
        ""
    };

    let body = parts.join("/");
    if body.is_empty() && prefix.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{body}")
    }
}

/// Resolve `raw` against `root` to an absolute, symlink-free path.
///
/// Relative inputs are joined onto `root`. The longest existing ancestor is
/// canonicalized and the non-existent remainder is appended lexically, so
/// two references to the same file compare equal whether or not the file
/// exists yet.
pub fn resolve_path(root: &NormalizedPath, raw: impl AsRef<Path>) -> NormalizedPath {
    let raw = raw.as_ref();
    let joined = if raw.is_absolute() {
        NormalizedPath::new(raw)
    } else {
        root.join(&raw.to_string_lossy())
    };
    canonicalize_lenient(&joined)
}

fn canonicalize_lenient(path: &NormalizedPath) -> NormalizedPath {
    let mut existing = path.to_native();
    let mut rest: Vec<OsString> = Vec::new();

    loop {
        if let Ok(canonical) = dunce::canonicalize(&existing) {
            let mut out = canonical;
            for component in rest.iter().rev() {
                out.push(component);
            }
            return NormalizedPath::new(out);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => return path.clone(),
        }
    }
}

/// Render `path` relative to `root` when it lies underneath it.
///
/// Paths outside `root` are returned unchanged.
pub fn display_relative(path: &NormalizedPath, root: &NormalizedPath) -> String {
    match path.to_native().strip_prefix(root.to_native()) {
        Ok(rel) => NormalizedPath::new(rel).inner,
        Err(_) => path.inner.clone(),
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
