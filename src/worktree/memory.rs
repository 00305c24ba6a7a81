use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{WorkTree, WorkTreeError};

/// Working tree held entirely in memory.
///
/// Counts `write_bytes` calls per path so callers can check that unchanged
/// files were left alone.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkTree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    writes: BTreeMap<PathBuf, usize>,
}

impl MemoryWorkTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Seed a file without counting it as a write.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    pub fn get_str(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Number of `write_bytes` calls made for `path`.
    pub fn write_count(&self, path: impl AsRef<Path>) -> usize {
        self.writes.get(path.as_ref()).copied().unwrap_or(0)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl WorkTree for MemoryWorkTree {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, WorkTreeError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| WorkTreeError::NotFound(path.to_path_buf()))
    }

    fn write_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<(), WorkTreeError> {
        *self.writes.entry(path.to_path_buf()).or_default() += 1;
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn create_empty(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        if self.exists(path) {
            return Err(WorkTreeError::AlreadyExists(path.to_path_buf()));
        }
        self.files.insert(path.to_path_buf(), Vec::new());
        Ok(())
    }

    fn delete(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| WorkTreeError::NotFound(path.to_path_buf()))
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), WorkTreeError> {
        if self.exists(to) {
            return Err(WorkTreeError::AlreadyExists(to.to_path_buf()));
        }
        let contents = self
            .files
            .remove(from)
            .ok_or_else(|| WorkTreeError::NotFound(from.to_path_buf()))?;
        self.files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}
