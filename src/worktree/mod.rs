//! Working-tree storage the applier reads from and writes to.

mod dry_run;
mod fs;
mod memory;

pub use dry_run::DryRun;
pub use fs::FsWorkTree;
pub use memory::MemoryWorkTree;

use std::io;
use std::path::{Path, PathBuf};

/// Errors from working-tree operations
#[derive(Debug, thiserror::Error)]
pub enum WorkTreeError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{} is outside the working tree", .0.display())]
    OutsideRoot(PathBuf),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkTreeError {
    /// Classify an I/O error raised while operating on `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => WorkTreeError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => WorkTreeError::AlreadyExists(path.to_path_buf()),
            _ => WorkTreeError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Trait for working-tree file access - allows in-memory trees in tests.
///
/// All paths are relative to the tree's root.
pub trait WorkTree {
    /// Check whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read a file's raw bytes
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, WorkTreeError>;

    /// Create or overwrite a file
    fn write_bytes(&mut self, path: &Path, bytes: &[u8]) -> Result<(), WorkTreeError>;

    /// Create an empty file; fails if it already exists
    fn create_empty(&mut self, path: &Path) -> Result<(), WorkTreeError>;

    /// Remove a file
    fn delete(&mut self, path: &Path) -> Result<(), WorkTreeError>;

    /// Move a file; fails if `from` is missing or `to` exists
    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), WorkTreeError>;
}
