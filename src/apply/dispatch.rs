use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::hunk;
use super::{ApplyError, ApplyErrorKind, ApplyOptions, PatchFormatError};
use crate::lines::{self, LineSet};
use crate::models::{ApplyResult, ChangeType, FileChange, Hunk, PatchDocument};
use crate::worktree::WorkTree;

/// Applies a patch document to a working tree, one file change at a time.
pub struct PatchApplier<'a, W: WorkTree> {
    tree: &'a mut W,
    options: ApplyOptions,
    interrupt: Option<fn() -> bool>,
}

impl<'a, W: WorkTree> PatchApplier<'a, W> {
    pub fn new(tree: &'a mut W) -> Self {
        Self {
            tree,
            options: ApplyOptions::default(),
            interrupt: None,
        }
    }

    pub fn with_options(mut self, options: ApplyOptions) -> Self {
        self.options = options;
        self
    }

    /// Poll `check` before each file change; stop when it returns true.
    pub fn with_interrupt(mut self, check: fn() -> bool) -> Self {
        self.interrupt = Some(check);
        self
    }

    /// Apply every change in document order.
    ///
    /// The document is validated before any file is touched. After that the
    /// first failure aborts the run; earlier changes are not rolled back.
    pub fn apply(&mut self, document: &PatchDocument) -> Result<ApplyResult, ApplyError> {
        document.validate()?;

        let mut touched = BTreeSet::new();
        for (index, change) in document.changes.iter().enumerate() {
            if self.interrupt.is_some_and(|check| check()) {
                return Err(ApplyError::new(index, change, ApplyErrorKind::Interrupted));
            }

            debug!(
                "Applying {} {} ({}/{})",
                change.change_type,
                change.display_path().display(),
                index + 1,
                document.len()
            );
            let path = self
                .apply_change(change)
                .map_err(|kind| ApplyError::new(index, change, kind))?;
            touched.insert(path);
        }

        info!("Applied {} file change(s)", document.len());
        Ok(ApplyResult::new(touched))
    }

    fn apply_change(&mut self, change: &FileChange) -> Result<PathBuf, ApplyErrorKind> {
        match change.change_type {
            ChangeType::Add => {
                let path = new_path(change)?;
                self.add(path, &change.hunks)?;
                Ok(path.to_path_buf())
            }
            ChangeType::Modify => {
                let path = new_path(change)?;
                self.modify(path, &change.hunks)?;
                Ok(path.to_path_buf())
            }
            ChangeType::Delete => {
                let path = old_path(change)?;
                self.delete(path, &change.hunks)?;
                Ok(path.to_path_buf())
            }
            ChangeType::Rename => {
                let (from, to) = (old_path(change)?, new_path(change)?);
                self.rename(from, to)?;
                self.follow_up_hunks(to, &change.hunks, self.options.rename_hunks)?;
                Ok(to.to_path_buf())
            }
            ChangeType::Copy => {
                let (from, to) = (old_path(change)?, new_path(change)?);
                self.copy(from, to)?;
                self.follow_up_hunks(to, &change.hunks, self.options.copy_hunks)?;
                Ok(to.to_path_buf())
            }
        }
    }

    fn add(&mut self, path: &Path, hunks: &[Hunk]) -> Result<(), ApplyErrorKind> {
        if self.tree.exists(path) {
            return Err(ApplyErrorKind::DestinationExists(path.to_path_buf()));
        }
        if hunks.is_empty() {
            self.tree.create_empty(path)?;
            return Ok(());
        }

        let mut set = LineSet::empty();
        apply_hunks(&mut set, hunks)?;
        self.tree.write_bytes(path, &lines::recompose(&set))?;
        Ok(())
    }

    fn modify(&mut self, path: &Path, hunks: &[Hunk]) -> Result<(), ApplyErrorKind> {
        if !self.tree.exists(path) {
            return Err(ApplyErrorKind::NotFound(path.to_path_buf()));
        }

        let original = lines::decompose(&self.tree.read_bytes(path)?)?;
        let mut patched = original.clone();
        apply_hunks(&mut patched, hunks)?;

        if patched.content_eq(&original) {
            debug!("{} unchanged, skipping write", path.display());
            return Ok(());
        }
        self.tree.write_bytes(path, &lines::recompose(&patched))?;
        Ok(())
    }

    fn delete(&mut self, path: &Path, hunks: &[Hunk]) -> Result<(), ApplyErrorKind> {
        if !hunks.is_empty() {
            return Err(ApplyErrorKind::UnexpectedHunks(hunks.len()));
        }
        if !self.tree.exists(path) {
            return Err(ApplyErrorKind::NotFound(path.to_path_buf()));
        }
        self.tree.delete(path)?;
        Ok(())
    }

    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), ApplyErrorKind> {
        self.check_move(from, to)?;
        self.tree.rename(from, to)?;
        Ok(())
    }

    /// Byte-for-byte: the content is never decoded on the way through.
    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), ApplyErrorKind> {
        self.check_move(from, to)?;
        let bytes = self.tree.read_bytes(from)?;
        self.tree.write_bytes(to, &bytes)?;
        Ok(())
    }

    fn check_move(&self, from: &Path, to: &Path) -> Result<(), ApplyErrorKind> {
        if !self.tree.exists(from) {
            return Err(ApplyErrorKind::NotFound(from.to_path_buf()));
        }
        if self.tree.exists(to) {
            return Err(ApplyErrorKind::DestinationExists(to.to_path_buf()));
        }
        Ok(())
    }

    /// Hunks riding along on a rename or copy.
    fn follow_up_hunks(
        &mut self,
        path: &Path,
        hunks: &[Hunk],
        enabled: bool,
    ) -> Result<(), ApplyErrorKind> {
        if hunks.is_empty() {
            return Ok(());
        }
        if !enabled {
            warn!(
                "Ignoring {} hunk(s) on {}; content is carried over unchanged",
                hunks.len(),
                path.display()
            );
            return Ok(());
        }
        self.modify(path, hunks)
    }
}

fn apply_hunks(set: &mut LineSet, hunks: &[Hunk]) -> Result<(), ApplyErrorKind> {
    for (hunk_index, h) in hunks.iter().enumerate() {
        debug!(
            "Hunk #{}: {} line(s) at line {}",
            hunk_index + 1,
            h.lines.len(),
            h.new_start
        );
        hunk::apply_to(set, h).map_err(|e| ApplyErrorKind::from_hunk_error(hunk_index, e))?;
    }
    Ok(())
}

fn old_path(change: &FileChange) -> Result<&Path, PatchFormatError> {
    change
        .old_path
        .as_deref()
        .ok_or(PatchFormatError::MissingOldPath(change.change_type))
}

fn new_path(change: &FileChange) -> Result<&Path, PatchFormatError> {
    change
        .new_path
        .as_deref()
        .ok_or(PatchFormatError::MissingNewPath(change.change_type))
}

impl PatchDocument {
    /// Structural checks that need no file access, run before anything is
    /// written.
    pub fn validate(&self) -> Result<(), ApplyError> {
        for (index, change) in self.changes.iter().enumerate() {
            validate_change(change).map_err(|kind| ApplyError::new(index, change, kind))?;
        }
        Ok(())
    }
}

fn validate_change(change: &FileChange) -> Result<(), ApplyErrorKind> {
    match change.change_type {
        ChangeType::Add => {
            new_path(change)?;
            if change.hunks.len() > 1 {
                return Err(PatchFormatError::MultipleAddHunks(change.hunks.len()).into());
            }
            if let Some(hunk_index) = change.hunks.iter().position(Hunk::has_old_side_lines) {
                return Err(PatchFormatError::AddWithExistingContent { hunk_index }.into());
            }
        }
        ChangeType::Modify => {
            new_path(change)?;
        }
        ChangeType::Delete => {
            old_path(change)?;
            if !change.hunks.is_empty() {
                return Err(ApplyErrorKind::UnexpectedHunks(change.hunks.len()));
            }
        }
        ChangeType::Rename | ChangeType::Copy => {
            let (from, to) = (old_path(change)?, new_path(change)?);
            if from == to {
                return Err(PatchFormatError::SamePath(to.to_path_buf()).into());
            }
        }
    }

    let zero_start = change
        .hunks
        .iter()
        .position(|h| h.new_start == 0 && h.has_new_side_lines());
    if let Some(hunk_index) = zero_start {
        return Err(PatchFormatError::ZeroStart { hunk_index }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HunkLine;
    use crate::test_utils::{add, ctx, make_hunk, rm, strings};
    use crate::worktree::{DryRun, MemoryWorkTree};

    fn apply(tree: &mut MemoryWorkTree, doc: &PatchDocument) -> Result<ApplyResult, ApplyError> {
        PatchApplier::new(tree).apply(doc)
    }

    #[test]
    fn test_add_new_file() {
        let mut tree = MemoryWorkTree::new();
        let doc = PatchDocument::new(vec![FileChange::add(
            "new.txt",
            strings(&["hello", "world"]),
        )]);

        let result = apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get_str("new.txt"), Some("hello\nworld\n"));
        assert_eq!(
            result.touched_paths().iter().collect::<Vec<_>>(),
            vec![Path::new("new.txt")]
        );
    }

    #[test]
    fn test_add_with_trailing_marker() {
        let mut tree = MemoryWorkTree::new();
        let change = FileChange::add("new.txt", Vec::new()).with_hunks(vec![make_hunk(
            1,
            vec![add("a"), add("b"), HunkLine::NoNewlineMarker],
        )]);
        apply(&mut tree, &PatchDocument::new(vec![change])).unwrap();
        assert_eq!(tree.get_str("new.txt"), Some("a\nb"));
    }

    #[test]
    fn test_add_without_hunks_creates_empty_file() {
        let mut tree = MemoryWorkTree::new();
        let change = FileChange::add("empty.txt", Vec::new()).with_hunks(Vec::new());
        apply(&mut tree, &PatchDocument::new(vec![change])).unwrap();
        assert_eq!(tree.get("empty.txt"), Some(&b""[..]));
    }

    #[test]
    fn test_add_existing_file_fails() {
        let mut tree = MemoryWorkTree::new().with_file("new.txt", "already\n");
        let doc = PatchDocument::new(vec![FileChange::add("new.txt", strings(&["x"]))]);

        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::DestinationExists(ref p) if p == Path::new("new.txt")));
        assert_eq!(tree.get_str("new.txt"), Some("already\n"));
    }

    #[test]
    fn test_modify_applies_hunks_in_order() {
        let mut tree = MemoryWorkTree::new().with_file("f.txt", "a\nb\nc\nd\n");
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![
                make_hunk(1, vec![ctx("a"), add("a2"), ctx("b")]),
                make_hunk(4, vec![ctx("c"), rm("d")]).with_old_start(3),
            ],
        )]);

        let result = apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get_str("f.txt"), Some("a\na2\nb\nc\n"));
        assert!(result.contains("f.txt"));
        assert_eq!(tree.write_count("f.txt"), 1);
    }

    #[test]
    fn test_modify_unchanged_content_skips_write() {
        let mut tree = MemoryWorkTree::new().with_file("f.txt", "a\nb\n");
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![make_hunk(1, vec![ctx("a"), rm("b"), add("b")])],
        )]);

        let result = apply(&mut tree, &doc).unwrap();
        assert!(result.contains("f.txt"));
        assert_eq!(tree.write_count("f.txt"), 0);
    }

    #[test]
    fn test_modify_missing_file() {
        let mut tree = MemoryWorkTree::new();
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![make_hunk(1, vec![ctx("a")])],
        )]);
        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::NotFound(_)));
    }

    #[test]
    fn test_modify_mismatch_carries_context() {
        let mut tree = MemoryWorkTree::new().with_file("f.txt", "a\nb\nc\n");
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![
                make_hunk(1, vec![ctx("a")]),
                make_hunk(2, vec![rm("B"), add("x")]),
            ],
        )]);

        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(err.is_content_mismatch());
        assert_eq!(err.change_index, 0);
        assert_eq!(err.path(), Path::new("f.txt"));
        assert_eq!(err.hunk(), Some(&doc.changes[0].hunks[1]));
        match err.kind {
            ApplyErrorKind::ContentMismatch {
                hunk_index,
                line_number,
                ref expected,
                ref actual,
            } => {
                assert_eq!(hunk_index, 1);
                assert_eq!(line_number, 2);
                assert_eq!(expected, &rm("B"));
                assert_eq!(actual, "b");
            }
            ref other => panic!("unexpected error: {}", other),
        }
        assert_eq!(tree.write_count("f.txt"), 0);
    }

    #[test]
    fn test_modify_hunk_out_of_range() {
        let mut tree = MemoryWorkTree::new().with_file("f.txt", "a\n");
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![make_hunk(3, vec![ctx("c")])],
        )]);
        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(
            err.kind,
            ApplyErrorKind::Format(PatchFormatError::HunkOutOfRange {
                hunk_index: 0,
                line_number: 3,
                len: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_modify_binary_file() {
        let mut tree = MemoryWorkTree::new().with_file("f.bin", vec![0xffu8, 0x00]);
        let doc = PatchDocument::new(vec![FileChange::modify(
            "f.bin",
            vec![make_hunk(1, vec![add("x")])],
        )]);
        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::NotText(_)));
    }

    #[test]
    fn test_delete_file() {
        let mut tree = MemoryWorkTree::new().with_file("old.txt", "bye\n");
        let doc = PatchDocument::new(vec![FileChange::delete("old.txt")]);

        let result = apply(&mut tree, &doc).unwrap();
        assert!(!tree.exists(Path::new("old.txt")));
        assert!(result.contains("old.txt"));
    }

    #[test]
    fn test_delete_with_hunks_fails_before_any_write() {
        let mut tree = MemoryWorkTree::new().with_file("old.txt", "bye\n");
        let doc = PatchDocument::new(vec![
            FileChange::add("first.txt", strings(&["x"])),
            FileChange::delete("old.txt").with_hunks(vec![make_hunk(0, vec![rm("bye")])]),
        ]);

        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::UnexpectedHunks(1)));
        assert_eq!(err.change_index, 1);
        assert!(!tree.exists(Path::new("first.txt")));
        assert!(tree.exists(Path::new("old.txt")));
    }

    #[test]
    fn test_delete_missing_file() {
        let mut tree = MemoryWorkTree::new();
        let err = apply(&mut tree, &PatchDocument::new(vec![FileChange::delete("x")])).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::NotFound(_)));
    }

    #[test]
    fn test_rename_ignores_hunks_by_default() {
        let mut tree = MemoryWorkTree::new().with_file("a.txt", "one\n");
        let doc = PatchDocument::new(vec![FileChange::rename("a.txt", "b.txt")
            .with_hunks(vec![make_hunk(1, vec![rm("one"), add("two")])])]);

        let result = apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get_str("b.txt"), Some("one\n"));
        assert!(!tree.exists(Path::new("a.txt")));
        assert!(result.contains("b.txt"));
        assert!(!result.contains("a.txt"));
    }

    #[test]
    fn test_rename_applies_hunks_when_enabled() {
        let mut tree = MemoryWorkTree::new().with_file("a.txt", "one\n");
        let doc = PatchDocument::new(vec![FileChange::rename("a.txt", "b.txt")
            .with_hunks(vec![make_hunk(1, vec![rm("one"), add("two")])])]);

        PatchApplier::new(&mut tree)
            .with_options(ApplyOptions {
                rename_hunks: true,
                ..ApplyOptions::default()
            })
            .apply(&doc)
            .unwrap();
        assert_eq!(tree.get_str("b.txt"), Some("two\n"));
    }

    #[test]
    fn test_rename_onto_existing_file() {
        let mut tree = MemoryWorkTree::new()
            .with_file("a.txt", "a\n")
            .with_file("b.txt", "b\n");
        let doc = PatchDocument::new(vec![FileChange::rename("a.txt", "b.txt")]);
        let err = apply(&mut tree, &doc).unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::DestinationExists(_)));
        assert_eq!(tree.get_str("b.txt"), Some("b\n"));
    }

    #[test]
    fn test_copy_is_byte_for_byte() {
        let bytes = vec![b'a', 0xc3, 0x28, b'\r', b'\n', 0xff];
        let mut tree = MemoryWorkTree::new().with_file("src.bin", bytes.clone());
        let doc = PatchDocument::new(vec![FileChange::copy("src.bin", "dst.bin")]);

        let result = apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get("dst.bin"), Some(bytes.as_slice()));
        assert_eq!(tree.get("src.bin"), Some(bytes.as_slice()));
        assert!(result.contains("dst.bin"));
    }

    #[test]
    fn test_copy_applies_hunks_when_enabled() {
        let mut tree = MemoryWorkTree::new().with_file("a.txt", "one\ntwo\n");
        let doc = PatchDocument::new(vec![FileChange::copy("a.txt", "b.txt")
            .with_hunks(vec![make_hunk(2, vec![rm("two"), add("2")])])]);

        PatchApplier::new(&mut tree)
            .with_options(ApplyOptions {
                copy_hunks: true,
                ..ApplyOptions::default()
            })
            .apply(&doc)
            .unwrap();
        assert_eq!(tree.get_str("a.txt"), Some("one\ntwo\n"));
        assert_eq!(tree.get_str("b.txt"), Some("one\n2\n"));
    }

    #[test]
    fn test_later_change_sees_earlier_rename() {
        let mut tree = MemoryWorkTree::new().with_file("a.txt", "x\n");
        let doc = PatchDocument::new(vec![
            FileChange::rename("a.txt", "b.txt"),
            FileChange::modify("b.txt", vec![make_hunk(1, vec![rm("x"), add("y")])]),
        ]);

        let result = apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get_str("b.txt"), Some("y\n"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_failure_leaves_earlier_changes_applied() {
        let mut tree = MemoryWorkTree::new().with_file("b.txt", "b\n");
        let doc = PatchDocument::new(vec![
            FileChange::add("a.txt", strings(&["a"])),
            FileChange::modify("b.txt", vec![make_hunk(1, vec![rm("nope")])]),
            FileChange::add("c.txt", strings(&["c"])),
        ]);

        let err = apply(&mut tree, &doc).unwrap_err();
        assert_eq!(err.change_index, 1);
        assert_eq!(tree.get_str("a.txt"), Some("a\n"));
        assert!(!tree.exists(Path::new("c.txt")));
    }

    #[test]
    fn test_reapplying_document() {
        let mut tree = MemoryWorkTree::new().with_file("f.txt", "a\nb\n");
        let context_only = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![make_hunk(1, vec![ctx("a"), ctx("b")])],
        )]);
        let editing = PatchDocument::new(vec![FileChange::modify(
            "f.txt",
            vec![make_hunk(1, vec![ctx("a"), rm("b"), add("c")])],
        )]);

        apply(&mut tree, &context_only).unwrap();
        apply(&mut tree, &context_only).unwrap();
        assert_eq!(tree.write_count("f.txt"), 0);

        apply(&mut tree, &editing).unwrap();
        let err = apply(&mut tree, &editing).unwrap_err();
        assert!(err.is_content_mismatch());
        assert_eq!(tree.get_str("f.txt"), Some("a\nc\n"));
        assert_eq!(tree.write_count("f.txt"), 1);
    }

    #[test]
    fn test_reversed_document_restores_tree() {
        let mut tree = MemoryWorkTree::new()
            .with_file("f.txt", "one\r\ntwo\r\nthree")
            .with_file("old.txt", "kept\n");
        let doc = PatchDocument::new(vec![
            FileChange::modify(
                "f.txt",
                vec![make_hunk(
                    2,
                    vec![
                        rm("two"),
                        rm("three"),
                        HunkLine::NoNewlineMarker,
                        add("2"),
                        add("3"),
                    ],
                )],
            ),
            FileChange::rename("old.txt", "new.txt"),
            FileChange::add("added.txt", strings(&["fresh"])),
        ]);

        apply(&mut tree, &doc).unwrap();
        assert_eq!(tree.get_str("f.txt"), Some("one\r\n2\r\n3\r\n"));

        apply(&mut tree, &doc.reversed()).unwrap();
        assert_eq!(tree.get_str("f.txt"), Some("one\r\ntwo\r\nthree"));
        assert_eq!(tree.get_str("old.txt"), Some("kept\n"));
        assert!(!tree.exists(Path::new("new.txt")));
        assert!(!tree.exists(Path::new("added.txt")));
    }

    #[test]
    fn test_validation_rejects_malformed_changes() {
        let cases = vec![
            (
                FileChange::add("a.txt", Vec::new())
                    .with_hunks(vec![make_hunk(1, vec![ctx("x"), add("y")])]),
                "add with context",
            ),
            (
                FileChange::add("a.txt", Vec::new()).with_hunks(vec![
                    make_hunk(1, vec![add("x")]),
                    make_hunk(2, vec![add("y")]),
                ]),
                "add with two hunks",
            ),
            (FileChange::rename("a.txt", "a.txt"), "rename onto itself"),
            (
                FileChange::modify("a.txt", vec![make_hunk(0, vec![add("x")])]),
                "zero start",
            ),
            (
                FileChange {
                    change_type: ChangeType::Modify,
                    old_path: Some(PathBuf::from("a.txt")),
                    new_path: None,
                    hunks: Vec::new(),
                },
                "modify without path",
            ),
        ];

        for (change, label) in cases {
            let mut tree = MemoryWorkTree::new().with_file("a.txt", "x\n");
            let err = apply(&mut tree, &PatchDocument::new(vec![change])).unwrap_err();
            assert!(
                matches!(err.kind, ApplyErrorKind::Format(_)),
                "{}: {}",
                label,
                err
            );
            assert_eq!(tree.write_count("a.txt"), 0, "{}", label);
        }
    }

    #[test]
    fn test_interrupt_stops_before_next_change() {
        let mut tree = MemoryWorkTree::new();
        let doc = PatchDocument::new(vec![FileChange::add("a.txt", strings(&["a"]))]);

        let err = PatchApplier::new(&mut tree)
            .with_interrupt(|| true)
            .apply(&doc)
            .unwrap_err();
        assert!(matches!(err.kind, ApplyErrorKind::Interrupted));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_dry_run_leaves_inner_tree_alone() {
        let inner = MemoryWorkTree::new().with_file("f.txt", "a\n");
        let mut dry_run = DryRun::new(inner);
        let doc = PatchDocument::new(vec![
            FileChange::modify("f.txt", vec![make_hunk(1, vec![rm("a"), add("b")])]),
            FileChange::rename("f.txt", "g.txt"),
        ]);

        let result = PatchApplier::new(&mut dry_run).apply(&doc).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(dry_run.read_bytes(Path::new("g.txt")).unwrap(), b"b\n");

        let inner = dry_run.into_inner();
        assert_eq!(inner.get_str("f.txt"), Some("a\n"));
        assert_eq!(inner.write_count("f.txt"), 0);
    }

    #[test]
    fn test_error_message_names_change_and_hunk() {
        let mut tree = MemoryWorkTree::new().with_file("src/lib.rs", "fn a() {}\n");
        let doc = PatchDocument::new(vec![FileChange::modify(
            "src/lib.rs",
            vec![make_hunk(1, vec![rm("fn b() {}"), add("fn c() {}")])],
        )]);
        let err = apply(&mut tree, &doc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "modify src/lib.rs (change #1): hunk #1 does not apply at line 1: \
             expected `-fn b() {}`, found `fn a() {}`"
        );
    }
}
