use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{WorkTree, WorkTreeError};

/// Read-through overlay that keeps every mutation in memory.
///
/// The inner tree is only ever read, so a patch can be checked against a
/// real directory without changing it.
pub struct DryRun<W: WorkTree> {
    inner: W,
    /// `None` marks a path deleted in the overlay
    overlay: BTreeMap<PathBuf, Option<Vec<u8>>>,
}

impl<W: WorkTree> DryRun<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            overlay: BTreeMap::new(),
        }
    }

    /// Paths changed in the overlay; `None` contents mean deleted.
    pub fn changes(&self) -> impl Iterator<Item = (&Path, Option<&[u8]>)> {
        self.overlay
            .iter()
            .map(|(path, contents)| (path.as_path(), contents.as_deref()))
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WorkTree> WorkTree for DryRun<W> {
    fn exists(&self, path: &Path) -> bool {
        match self.overlay.get(path) {
            Some(contents) => contents.is_some(),
            None => self.inner.exists(path),
        }
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, WorkTreeError> {
        match self.overlay.get(path) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(WorkTreeError::NotFound(path.to_path_buf())),
            None => self.inner.read_bytes(path),
        }
    }

    fn write_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<(), WorkTreeError> {
        self.overlay.insert(path.to_path_buf(), Some(bytes.to_vec()));
        Ok(())
    }

    fn create_empty(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        if self.exists(path) {
            return Err(WorkTreeError::AlreadyExists(path.to_path_buf()));
        }
        self.overlay.insert(path.to_path_buf(), Some(Vec::new()));
        Ok(())
    }

    fn delete(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        if !self.exists(path) {
            return Err(WorkTreeError::NotFound(path.to_path_buf()));
        }
        self.overlay.insert(path.to_path_buf(), None);
        Ok(())
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), WorkTreeError> {
        if self.exists(to) {
            return Err(WorkTreeError::AlreadyExists(to.to_path_buf()));
        }
        let contents = self.read_bytes(from)?;
        self.overlay.insert(to.to_path_buf(), Some(contents));
        self.overlay.insert(from.to_path_buf(), None);
        Ok(())
    }
}
