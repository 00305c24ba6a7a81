use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of change a patch makes to one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    /// File is created from the (single) hunk's added lines
    Add,
    /// File exists and is edited in place by its hunks
    Modify,
    /// File is removed
    Delete,
    /// File is moved from `old_path` to `new_path`
    Rename,
    /// File is duplicated from `old_path` to `new_path`
    Copy,
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChangeType::Add => "add",
            ChangeType::Modify => "modify",
            ChangeType::Delete => "delete",
            ChangeType::Rename => "rename",
            ChangeType::Copy => "copy",
        };
        f.write_str(name)
    }
}

/// A single line in a hunk body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum HunkLine {
    /// Unchanged line that anchors the hunk
    #[serde(rename = "context")]
    Context(String),
    /// Line that must be present and is removed
    #[serde(rename = "remove")]
    Remove(String),
    /// Line inserted by the hunk
    #[serde(rename = "add")]
    Add(String),
    /// `\ No newline at end of file`: the preceding line has no terminator
    #[serde(rename = "no-newline")]
    NoNewlineMarker,
}

impl HunkLine {
    pub fn context(text: impl Into<String>) -> Self {
        HunkLine::Context(text.into())
    }

    pub fn remove(text: impl Into<String>) -> Self {
        HunkLine::Remove(text.into())
    }

    pub fn add(text: impl Into<String>) -> Self {
        HunkLine::Add(text.into())
    }

    /// Text of the line, `None` for the no-newline marker.
    pub fn text(&self) -> Option<&str> {
        match self {
            HunkLine::Context(s) | HunkLine::Remove(s) | HunkLine::Add(s) => Some(s),
            HunkLine::NoNewlineMarker => None,
        }
    }

    /// True for lines present in the file before the hunk applies.
    pub fn is_old_side(&self) -> bool {
        matches!(self, HunkLine::Context(_) | HunkLine::Remove(_))
    }

    /// True for lines present in the file after the hunk applies.
    pub fn is_new_side(&self) -> bool {
        matches!(self, HunkLine::Context(_) | HunkLine::Add(_))
    }
}

impl Display for HunkLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HunkLine::Context(s) => write!(f, " {}", s),
            HunkLine::Remove(s) => write!(f, "-{}", s),
            HunkLine::Add(s) => write!(f, "+{}", s),
            HunkLine::NoNewlineMarker => f.write_str("\\ No newline at end of file"),
        }
    }
}

/// A contiguous block of changes to one file.
///
/// `new_start` is the 1-based line where the hunk's first line sits, counted
/// in the file as it looks after every earlier hunk of the same
/// [`FileChange`] has been applied. That is why the applier never needs
/// `old_start`. The latter is only kept so the hunk can be inverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Starting line number in the source file (1-based)
    #[serde(default)]
    pub old_start: u32,
    /// Starting line number in the target file (1-based)
    pub new_start: u32,
    /// The body lines, in patch order
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    pub fn new(new_start: u32, lines: Vec<HunkLine>) -> Self {
        Self {
            old_start: new_start,
            new_start,
            lines,
        }
    }

    pub fn with_old_start(mut self, old_start: u32) -> Self {
        self.old_start = old_start;
        self
    }

    pub fn has_old_side_lines(&self) -> bool {
        self.lines.iter().any(HunkLine::is_old_side)
    }

    pub fn has_new_side_lines(&self) -> bool {
        self.lines.iter().any(HunkLine::is_new_side)
    }

    /// True if the source side of this hunk ends without a terminator.
    pub fn old_missing_newline(&self) -> bool {
        self.marked_lines().any(HunkLine::is_old_side)
    }

    /// True if the target side of this hunk ends without a terminator.
    pub fn new_missing_newline(&self) -> bool {
        self.marked_lines().any(HunkLine::is_new_side)
    }

    /// Lines immediately followed by a no-newline marker.
    fn marked_lines(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines
            .windows(2)
            .filter(|pair| pair[1] == HunkLine::NoNewlineMarker)
            .map(|pair| &pair[0])
    }

    /// 0-based index in the evolving file where the hunk's first line sits.
    pub fn anchor(&self) -> usize {
        (self.new_start as usize).saturating_sub(1)
    }

    /// The hunk that undoes this one: added and removed lines trade places,
    /// as do the start lines. Markers keep trailing the line they annotate.
    #[must_use]
    pub fn inverted(&self) -> Hunk {
        let lines = self
            .lines
            .iter()
            .map(|line| match line {
                HunkLine::Add(s) => HunkLine::Remove(s.clone()),
                HunkLine::Remove(s) => HunkLine::Add(s.clone()),
                other => other.clone(),
            })
            .collect();

        Hunk {
            old_start: self.new_start,
            new_start: self.old_start,
            lines,
        }
    }
}

/// One file's worth of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub change_type: ChangeType,
    #[serde(default, with = "opt_path_serde")]
    pub old_path: Option<PathBuf>,
    #[serde(default, with = "opt_path_serde")]
    pub new_path: Option<PathBuf>,
    #[serde(default)]
    pub hunks: Vec<Hunk>,
}

impl FileChange {
    pub fn add(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        let hunk = Hunk::new(1, lines.into_iter().map(HunkLine::Add).collect());
        Self {
            change_type: ChangeType::Add,
            old_path: None,
            new_path: Some(path.into()),
            hunks: vec![hunk],
        }
    }

    pub fn modify(path: impl Into<PathBuf>, hunks: Vec<Hunk>) -> Self {
        let path = path.into();
        Self {
            change_type: ChangeType::Modify,
            old_path: Some(path.clone()),
            new_path: Some(path),
            hunks,
        }
    }

    pub fn delete(path: impl Into<PathBuf>) -> Self {
        Self {
            change_type: ChangeType::Delete,
            old_path: Some(path.into()),
            new_path: None,
            hunks: Vec::new(),
        }
    }

    pub fn rename(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            change_type: ChangeType::Rename,
            old_path: Some(from.into()),
            new_path: Some(to.into()),
            hunks: Vec::new(),
        }
    }

    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            change_type: ChangeType::Copy,
            old_path: Some(from.into()),
            new_path: Some(to.into()),
            hunks: Vec::new(),
        }
    }

    pub fn with_hunks(mut self, hunks: Vec<Hunk>) -> Self {
        self.hunks = hunks;
        self
    }

    /// The path reported for this change: `new_path`, or `old_path` for deletes.
    pub fn display_path(&self) -> &Path {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_else(|| Path::new("<unnamed>"))
    }

    /// The change that undoes this one.
    ///
    /// A copy is undone by deleting its destination. Deleting and re-adding
    /// cannot be inverted without the deleted content, so the inverse of a
    /// delete is an add with no lines.
    #[must_use]
    pub fn inverted(&self) -> FileChange {
        let hunks = self.hunks.iter().map(Hunk::inverted).collect();
        match self.change_type {
            ChangeType::Add => FileChange {
                change_type: ChangeType::Delete,
                old_path: self.new_path.clone(),
                new_path: None,
                hunks: Vec::new(),
            },
            ChangeType::Delete => FileChange {
                change_type: ChangeType::Add,
                old_path: None,
                new_path: self.old_path.clone(),
                hunks: Vec::new(),
            },
            ChangeType::Modify => FileChange {
                change_type: ChangeType::Modify,
                old_path: self.new_path.clone(),
                new_path: self.old_path.clone(),
                hunks,
            },
            ChangeType::Rename => FileChange {
                change_type: ChangeType::Rename,
                old_path: self.new_path.clone(),
                new_path: self.old_path.clone(),
                hunks,
            },
            ChangeType::Copy => FileChange {
                change_type: ChangeType::Delete,
                old_path: self.new_path.clone(),
                new_path: None,
                hunks: Vec::new(),
            },
        }
    }
}

/// An ordered list of file changes, applied front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDocument {
    pub changes: Vec<FileChange>,
}

impl PatchDocument {
    pub fn new(changes: Vec<FileChange>) -> Self {
        Self { changes }
    }

    pub fn push(&mut self, change: FileChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The document that undoes this one, with changes in reverse order.
    #[must_use]
    pub fn reversed(&self) -> PatchDocument {
        PatchDocument {
            changes: self.changes.iter().rev().map(FileChange::inverted).collect(),
        }
    }
}

/// Paths touched by a successful application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    touched_paths: BTreeSet<PathBuf>,
}

impl ApplyResult {
    pub fn new(touched_paths: BTreeSet<PathBuf>) -> Self {
        Self { touched_paths }
    }

    pub fn touched_paths(&self) -> &BTreeSet<PathBuf> {
        &self.touched_paths
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.touched_paths.contains(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.touched_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touched_paths.is_empty()
    }
}

mod opt_path_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::path::PathBuf;

    pub fn serialize<S>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match path {
            Some(path) => serializer.serialize_some(&path.to_string_lossy()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(PathBuf::from))
    }
}
