//! Unified diff parsing.

use std::path::PathBuf;

use log::debug;

use crate::lines::split_lines;
use crate::models::{ChangeType, FileChange, Hunk, HunkLine, PatchDocument};

use super::ParseError;

const DEV_NULL: &str = "/dev/null";

pub(super) struct PatchParser {
    document: PatchDocument,
    line_number: usize,
    section: Option<Section>,
    hunk: Option<HunkBuilder>,
}

impl PatchParser {
    pub fn new() -> Self {
        Self {
            document: PatchDocument::default(),
            line_number: 0,
            section: None,
            hunk: None,
        }
    }

    pub fn parse(mut self, text: &str) -> Result<PatchDocument, ParseError> {
        // A CRLF patch loses its `\r`s here; in an LF patch they stay part of
        // body lines, the same way file content is split
        let (_, lines) = split_lines(text);
        for (line, _) in lines {
            self.line_number += 1;
            self.process_line(line)?;
        }
        self.finalize()
    }

    fn process_line(&mut self, line: &str) -> Result<(), ParseError> {
        if let Some(builder) = self.hunk.as_mut() {
            if line.starts_with('\\') {
                let marked = builder.mark_no_newline();
                return marked.ok_or_else(|| self.unexpected("misplaced no-newline marker"));
            }
            if !builder.is_complete() {
                let pushed = builder.push_body_line(line);
                return pushed.ok_or_else(|| {
                    self.unexpected(&format!("hunk line `{}` does not fit its header", line))
                });
            }
            self.finalize_hunk();
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with("diff --git ") {
            return self.start_section(parse_header(line));
        }

        if line.starts_with("@@") {
            return self.start_hunk(line);
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            // A second `---` in the same section starts a plain (non-git) diff section
            let starts_new = self.section.as_ref().map_or(true, Section::has_file_lines);
            if starts_new {
                self.start_section((None, None))?;
            }
            let path = parse_file_line(rest, "a/");
            self.with_section(|s| s.minus = Some(path));
            return Ok(());
        }
        if let Some(rest) = line.strip_prefix("+++ ") {
            let path = parse_file_line(rest, "b/");
            self.with_section(|s| s.plus = Some(path));
            return Ok(());
        }

        if line.starts_with("new file mode") {
            self.with_section(|s| s.new_file = true);
            return Ok(());
        }
        if line.starts_with("deleted file mode") {
            self.with_section(|s| s.deleted = true);
            return Ok(());
        }
        if let Some(path) = line.strip_prefix("rename from ") {
            self.with_section(|s| s.rename_from = Some(PathBuf::from(path)));
            return Ok(());
        }
        if let Some(path) = line.strip_prefix("rename to ") {
            self.with_section(|s| s.rename_to = Some(PathBuf::from(path)));
            return Ok(());
        }
        if let Some(path) = line.strip_prefix("copy from ") {
            self.with_section(|s| s.copy_from = Some(PathBuf::from(path)));
            return Ok(());
        }
        if let Some(path) = line.strip_prefix("copy to ") {
            self.with_section(|s| s.copy_to = Some(PathBuf::from(path)));
            return Ok(());
        }

        if line.starts_with("Binary files ") || line == "GIT binary patch" {
            let path = self
                .section
                .as_ref()
                .and_then(Section::any_path)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| line.to_string());
            return Err(ParseError::BinaryPatch(path));
        }

        // `index`, `similarity index`, `old mode`/`new mode` and anything
        // outside a section (mail headers, commit messages) carry nothing we use
        Ok(())
    }

    fn with_section(&mut self, f: impl FnOnce(&mut Section)) {
        if let Some(ref mut section) = self.section {
            f(section);
        }
    }

    fn start_section(
        &mut self,
        (header_old, header_new): (Option<PathBuf>, Option<PathBuf>),
    ) -> Result<(), ParseError> {
        self.finalize_hunk();
        self.finalize_section()?;
        self.section = Some(Section {
            header_old,
            header_new,
            ..Section::default()
        });
        Ok(())
    }

    fn start_hunk(&mut self, line: &str) -> Result<(), ParseError> {
        if self.section.is_none() {
            return Err(self.unexpected("hunk header outside a file section"));
        }
        self.hunk = Some(HunkBuilder::new().with_header(line)?);
        Ok(())
    }

    fn finalize_hunk(&mut self) {
        if let Some(builder) = self.hunk.take() {
            self.with_section(|s| s.hunks.push(builder.build()));
        }
    }

    fn finalize_section(&mut self) -> Result<(), ParseError> {
        let Some(section) = self.section.take() else {
            return Ok(());
        };
        match section.into_change() {
            Ok(Some(change)) => self.document.push(change),
            Ok(None) => debug!("Skipping section with no content change"),
            Err(message) => return Err(self.unexpected(&message)),
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<PatchDocument, ParseError> {
        if let Some(ref builder) = self.hunk {
            if !builder.is_complete() {
                return Err(self.unexpected("patch ends in the middle of a hunk"));
            }
        }
        self.finalize_hunk();
        self.finalize_section()?;
        Ok(self.document)
    }

    fn unexpected(&self, message: &str) -> ParseError {
        ParseError::UnexpectedFormat(format!("line {}: {}", self.line_number, message))
    }
}

/// Everything seen for one file between two section headers.
#[derive(Default)]
struct Section {
    header_old: Option<PathBuf>,
    header_new: Option<PathBuf>,
    /// Path from the `---` line; `Some(None)` for `/dev/null`
    minus: Option<Option<PathBuf>>,
    /// Path from the `+++` line; `Some(None)` for `/dev/null`
    plus: Option<Option<PathBuf>>,
    new_file: bool,
    deleted: bool,
    rename_from: Option<PathBuf>,
    rename_to: Option<PathBuf>,
    copy_from: Option<PathBuf>,
    copy_to: Option<PathBuf>,
    hunks: Vec<Hunk>,
}

impl Section {
    fn has_file_lines(&self) -> bool {
        self.minus.is_some() || !self.hunks.is_empty()
    }

    fn old_path(&self) -> Option<PathBuf> {
        match &self.minus {
            Some(path) => path.clone(),
            None => self.header_old.clone(),
        }
    }

    fn new_path(&self) -> Option<PathBuf> {
        match &self.plus {
            Some(path) => path.clone(),
            None => self.header_new.clone(),
        }
    }

    fn any_path(&self) -> Option<PathBuf> {
        self.new_path().or_else(|| self.old_path())
    }

    fn into_change(self) -> Result<Option<FileChange>, String> {
        if self.copy_from.is_some() || self.copy_to.is_some() {
            let (from, to) = self.move_paths(self.copy_from.clone(), self.copy_to.clone())?;
            return Ok(Some(FileChange::copy(from, to).with_hunks(self.hunks)));
        }
        if self.rename_from.is_some() || self.rename_to.is_some() {
            let (from, to) = self.move_paths(self.rename_from.clone(), self.rename_to.clone())?;
            return Ok(Some(FileChange::rename(from, to).with_hunks(self.hunks)));
        }

        let added = self.new_file || matches!(self.minus, Some(None));
        let deleted = self.deleted || matches!(self.plus, Some(None));
        if added && deleted {
            return Err("section both creates and deletes a file".to_string());
        }

        if added {
            let path = self.new_path().ok_or("new file has no path")?;
            return Ok(Some(FileChange {
                change_type: ChangeType::Add,
                old_path: None,
                new_path: Some(path),
                hunks: self.hunks,
            }));
        }
        if deleted {
            let path = self.old_path().ok_or("deleted file has no path")?;
            if !self.hunks.is_empty() {
                debug!(
                    "Dropping {} hunk(s) of deleted file {}",
                    self.hunks.len(),
                    path.display()
                );
            }
            return Ok(Some(FileChange::delete(path)));
        }

        if self.hunks.is_empty() {
            return Ok(None);
        }
        let path = self
            .new_path()
            .or_else(|| self.old_path())
            .ok_or("hunks have no file path")?;
        Ok(Some(FileChange::modify(path, self.hunks)))
    }

    fn move_paths(
        &self,
        from: Option<PathBuf>,
        to: Option<PathBuf>,
    ) -> Result<(PathBuf, PathBuf), String> {
        let from = from
            .or_else(|| self.old_path())
            .ok_or("move has no source path")?;
        let to = to
            .or_else(|| self.new_path())
            .ok_or("move has no destination path")?;
        Ok((from, to))
    }
}

/// `diff --git a/X b/Y` -> (X, Y)
fn parse_header(line: &str) -> (Option<PathBuf>, Option<PathBuf>) {
    let Some(rest) = line.strip_prefix("diff --git ") else {
        return (None, None);
    };
    match rest.split_once(" b/") {
        Some((old, new)) => (
            Some(PathBuf::from(old.strip_prefix("a/").unwrap_or(old))),
            Some(PathBuf::from(new)),
        ),
        None => (None, None),
    }
}

/// Path from a `---`/`+++` line, minus any timestamp and the git side prefix.
fn parse_file_line(rest: &str, prefix: &str) -> Option<PathBuf> {
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    if path == DEV_NULL {
        return None;
    }
    Some(PathBuf::from(path.strip_prefix(prefix).unwrap_or(path)))
}

fn parse_range(s: &str) -> Result<(u32, u32), ParseError> {
    if let Some((start, count)) = s.split_once(',') {
        let start: u32 = start
            .parse()
            .map_err(|_| ParseError::InvalidHunkHeader(s.to_string()))?;
        let count: u32 = count
            .parse()
            .map_err(|_| ParseError::InvalidHunkHeader(s.to_string()))?;
        Ok((start, count))
    } else {
        let start: u32 = s
            .parse()
            .map_err(|_| ParseError::InvalidHunkHeader(s.to_string()))?;
        Ok((start, 1))
    }
}

/// Collects a hunk's body until both sides of its header are used up.
struct HunkBuilder {
    old_start: u32,
    old_remaining: u32,
    new_start: u32,
    new_remaining: u32,
    lines: Vec<HunkLine>,
}

impl HunkBuilder {
    fn new() -> Self {
        Self {
            old_start: 0,
            old_remaining: 0,
            new_start: 0,
            new_remaining: 0,
            lines: Vec::new(),
        }
    }

    fn with_header(mut self, line: &str) -> Result<Self, ParseError> {
        let content = line
            .strip_prefix("@@ ")
            .and_then(|s| s.split(" @@").next())
            .ok_or_else(|| ParseError::InvalidHunkHeader(line.to_string()))?;

        let parts: Vec<&str> = content.split_whitespace().collect();
        let [old, new] = parts.as_slice() else {
            return Err(ParseError::InvalidHunkHeader(line.to_string()));
        };
        let (Some(old), Some(new)) = (old.strip_prefix('-'), new.strip_prefix('+')) else {
            return Err(ParseError::InvalidHunkHeader(line.to_string()));
        };

        (self.old_start, self.old_remaining) = parse_range(old)?;
        (self.new_start, self.new_remaining) = parse_range(new)?;

        // A zero count names the line *before* the empty span; hunks store
        // the line the span starts at
        if self.old_remaining == 0 {
            self.old_start = self.old_start.saturating_add(1);
        }
        if self.new_remaining == 0 {
            self.new_start = self.new_start.saturating_add(1);
        }
        Ok(self)
    }

    fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    /// Returns `None` when the line does not fit what the header promised.
    fn push_body_line(&mut self, line: &str) -> Option<()> {
        let (tag, text) = match line.chars().next() {
            // Some tools strip the lone space of an empty context line
            None => (' ', ""),
            Some(tag) => (tag, &line[tag.len_utf8()..]),
        };

        let hunk_line = match tag {
            ' ' => {
                self.old_remaining = self.old_remaining.checked_sub(1)?;
                self.new_remaining = self.new_remaining.checked_sub(1)?;
                HunkLine::context(text)
            }
            '-' => {
                self.old_remaining = self.old_remaining.checked_sub(1)?;
                HunkLine::remove(text)
            }
            '+' => {
                self.new_remaining = self.new_remaining.checked_sub(1)?;
                HunkLine::add(text)
            }
            _ => return None,
        };
        self.lines.push(hunk_line);
        Some(())
    }

    fn mark_no_newline(&mut self) -> Option<()> {
        match self.lines.last() {
            Some(HunkLine::NoNewlineMarker) | None => None,
            Some(_) => {
                self.lines.push(HunkLine::NoNewlineMarker);
                Some(())
            }
        }
    }

    fn build(self) -> Hunk {
        Hunk::new(self.new_start, self.lines).with_old_start(self.old_start)
    }
}
