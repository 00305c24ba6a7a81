//! Applying a [`PatchDocument`](crate::models::PatchDocument) to a working tree.
//!
//! Application is fail-fast and not transactional: the first failing file
//! change stops the run, and changes processed before it stay applied. Callers
//! that need all-or-nothing semantics check first against a
//! [`DryRun`](crate::worktree::DryRun) overlay.

mod dispatch;
pub mod hunk;

pub use dispatch::PatchApplier;
pub use hunk::HunkError;

use std::path::{Path, PathBuf};

use crate::lines::LineError;
use crate::models::{ChangeType, FileChange, Hunk, HunkLine};
use crate::worktree::WorkTreeError;

/// Behaviour switches for open-ended patch shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Apply hunks carried by a rename to the moved file
    pub rename_hunks: bool,
    /// Apply hunks carried by a copy to the new file
    pub copy_hunks: bool,
}

/// The document is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchFormatError {
    #[error("{0} change has no source path")]
    MissingOldPath(ChangeType),
    #[error("{0} change has no destination path")]
    MissingNewPath(ChangeType),
    #[error("source and destination are both {}", .0.display())]
    SamePath(PathBuf),
    #[error("add carries {0} hunks; a new file takes at most one")]
    MultipleAddHunks(usize),
    #[error("add hunk #{} expects existing content", .hunk_index + 1)]
    AddWithExistingContent { hunk_index: usize },
    #[error("hunk #{} starts at line 0 but keeps or adds lines", .hunk_index + 1)]
    ZeroStart { hunk_index: usize },
    #[error("hunk #{} line {line_number} (`{expected}`) is outside the file ({len} lines)", .hunk_index + 1)]
    HunkOutOfRange {
        hunk_index: usize,
        line_number: usize,
        expected: HunkLine,
        len: usize,
    },
}

/// What went wrong with one file change.
#[derive(Debug, thiserror::Error)]
pub enum ApplyErrorKind {
    #[error("hunk #{} does not apply at line {line_number}: expected `{expected}`, found `{actual}`", .hunk_index + 1)]
    ContentMismatch {
        hunk_index: usize,
        line_number: usize,
        expected: HunkLine,
        actual: String,
    },
    #[error("hunk #{} expects the file to {}", .hunk_index + 1, newline_expectation(.expected_missing))]
    NewlineMismatch {
        hunk_index: usize,
        expected_missing: bool,
    },
    #[error(transparent)]
    Format(#[from] PatchFormatError),
    #[error("{} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("delete carries {0} unexpected hunk(s)")]
    UnexpectedHunks(usize),
    #[error(transparent)]
    NotText(#[from] LineError),
    #[error("interrupted before this change was applied")]
    Interrupted,
    #[error(transparent)]
    WorkTree(#[from] WorkTreeError),
}

impl ApplyErrorKind {
    fn from_hunk_error(hunk_index: usize, error: HunkError) -> Self {
        match error {
            HunkError::ContentMismatch {
                line_number,
                expected,
                actual,
            } => ApplyErrorKind::ContentMismatch {
                hunk_index,
                line_number,
                expected,
                actual,
            },
            HunkError::OutOfRange {
                line_number,
                expected,
                len,
            } => PatchFormatError::HunkOutOfRange {
                hunk_index,
                line_number,
                expected,
                len,
            }
            .into(),
            HunkError::NewlineMismatch { expected_missing } => ApplyErrorKind::NewlineMismatch {
                hunk_index,
                expected_missing,
            },
        }
    }

    /// Index of the failing hunk within its file change, if a hunk failed.
    pub fn hunk_index(&self) -> Option<usize> {
        match self {
            ApplyErrorKind::ContentMismatch { hunk_index, .. }
            | ApplyErrorKind::NewlineMismatch { hunk_index, .. }
            | ApplyErrorKind::Format(PatchFormatError::AddWithExistingContent { hunk_index })
            | ApplyErrorKind::Format(PatchFormatError::ZeroStart { hunk_index })
            | ApplyErrorKind::Format(PatchFormatError::HunkOutOfRange { hunk_index, .. }) => {
                Some(*hunk_index)
            }
            _ => None,
        }
    }
}

fn newline_expectation(expected_missing: &bool) -> &'static str {
    if *expected_missing {
        "lack a trailing newline"
    } else {
        "end with a newline"
    }
}

/// A file change that could not be applied.
#[derive(Debug, thiserror::Error)]
#[error("{} {} (change #{}): {kind}", .change.change_type, .change.display_path().display(), .change_index + 1)]
pub struct ApplyError {
    /// Position of the failing change in the document
    pub change_index: usize,
    pub change: Box<FileChange>,
    pub kind: ApplyErrorKind,
}

impl ApplyError {
    pub fn new(change_index: usize, change: &FileChange, kind: ApplyErrorKind) -> Self {
        Self {
            change_index,
            change: Box::new(change.clone()),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        self.change.display_path()
    }

    /// The hunk that failed, if the failure is tied to one.
    pub fn hunk(&self) -> Option<&Hunk> {
        self.kind
            .hunk_index()
            .and_then(|index| self.change.hunks.get(index))
    }

    pub fn is_content_mismatch(&self) -> bool {
        matches!(self.kind, ApplyErrorKind::ContentMismatch { .. })
    }
}
