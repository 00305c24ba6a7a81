use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use super::{WorkTree, WorkTreeError};

/// Working tree backed by a directory on disk.
pub struct FsWorkTree {
    root: PathBuf,
}

impl FsWorkTree {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` onto the root, refusing anything that could escape it.
    fn resolve(&self, path: &Path) -> Result<PathBuf, WorkTreeError> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.as_os_str().is_empty() {
            return Err(WorkTreeError::OutsideRoot(path.to_path_buf()));
        }
        Ok(self.root.join(path))
    }

    fn create_parent(&self, path: &Path, full: &Path) -> Result<(), WorkTreeError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| WorkTreeError::from_io(path, e))?;
        }
        Ok(())
    }
}

impl WorkTree for FsWorkTree {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_ok_and(|full| full.is_file())
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, WorkTreeError> {
        let full = self.resolve(path)?;
        fs::read(&full).map_err(|e| WorkTreeError::from_io(path, e))
    }

    /// Writes go to a temporary file next to the target and are renamed into
    /// place, so the target is never observed half-written.
    fn write_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<(), WorkTreeError> {
        let full = self.resolve(path)?;
        self.create_parent(path, &full)?;
        let dir = full.parent().unwrap_or(self.root.as_path());

        let mut temp_file = tempfile::Builder::new()
            .prefix(".tree-patch-")
            .tempfile_in(dir)
            .map_err(|e| WorkTreeError::from_io(path, e))?;
        temp_file
            .write_all(bytes)
            .and_then(|()| temp_file.flush())
            .map_err(|e| WorkTreeError::from_io(path, e))?;

        // Keep the existing file's permissions (e.g. the executable bit)
        if let Ok(metadata) = fs::metadata(&full) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| WorkTreeError::from_io(path, e))?;
        }

        temp_file
            .persist(&full)
            .map_err(|e| WorkTreeError::from_io(path, e.error))?;
        Ok(())
    }

    fn create_empty(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        let full = self.resolve(path)?;
        self.create_parent(path, &full)?;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| WorkTreeError::from_io(path, e))?;
        Ok(())
    }

    fn delete(&mut self, path: &Path) -> Result<(), WorkTreeError> {
        let full = self.resolve(path)?;
        fs::remove_file(&full).map_err(|e| WorkTreeError::from_io(path, e))
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), WorkTreeError> {
        let from_full = self.resolve(from)?;
        let to_full = self.resolve(to)?;
        if !from_full.is_file() {
            return Err(WorkTreeError::NotFound(from.to_path_buf()));
        }
        if to_full.exists() {
            return Err(WorkTreeError::AlreadyExists(to.to_path_buf()));
        }
        self.create_parent(to, &to_full)?;
        fs::rename(&from_full, &to_full).map_err(|e| WorkTreeError::from_io(from, e))
    }
}
