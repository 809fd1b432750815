//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with in-memory implementations.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Files directly inside `dir` with the given extension, sorted.
    fn list_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;
}

/// Read-only source of raw question-tree documents, addressed by id.
pub trait ContentStore: Send + Sync {
    /// Load the raw document for `id`.
    /// Returns `Ok(None)` when nothing is stored under that id.
    fn load(&self, id: &str) -> io::Result<Option<Value>>;

    /// All ids the store can serve, sorted.
    fn list(&self) -> io::Result<Vec<String>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == extension)
            {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Content ids double as file stems, so only plain names are accepted.
pub fn is_valid_content_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !id.contains("..")
}

/// Store backed by `<content_dir>/<id>.json` files.
pub struct FileContentStore {
    fs: std::sync::Arc<dyn FileSystem>,
    content_dir: PathBuf,
}

impl FileContentStore {
    pub const EXTENSION: &'static str = "json";

    pub fn new(fs: std::sync::Arc<dyn FileSystem>, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.content_dir
            .join(format!("{}.{}", id, Self::EXTENSION))
    }
}

impl ContentStore for FileContentStore {
    fn load(&self, id: &str) -> io::Result<Option<Value>> {
        if !is_valid_content_id(id) {
            debug!("load: rejected content id {:?}", id);
            return Ok(None);
        }
        let path = self.path_for(id);
        if !self.fs.is_file(&path) {
            debug!("load: no file at {}", path.display());
            return Ok(None);
        }

        let content = self.fs.read_to_string(&path)?;
        let value = serde_json::from_str(&content).map_err(io::Error::from)?;
        Ok(Some(value))
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let files = self.fs.list_files(&self.content_dir, Self::EXTENSION)?;
        Ok(files
            .iter()
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()))
            .filter(|stem| is_valid_content_id(stem))
            .map(str::to_string)
            .collect())
    }
}

/// Store over documents already held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryContentStore {
    documents: BTreeMap<String, Value>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, document: Value) {
        self.documents.insert(id.into(), document);
    }

    pub fn with(mut self, id: impl Into<String>, document: Value) -> Self {
        self.insert(id, document);
        self
    }
}

impl ContentStore for MemoryContentStore {
    fn load(&self, id: &str) -> io::Result<Option<Value>> {
        Ok(self.documents.get(id).cloned())
    }

    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }
}
