//! Splitting file content into lines and joining it back.
//!
//! The terminator style travels with each [`LineSet`], so re-serializing a
//! file only ever uses what was read from that same file.

/// Line terminator used when writing a file back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminator {
    /// No terminator was seen; writes fall back to LF
    #[default]
    None,
    Lf,
    CrLf,
}

impl Terminator {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Terminator::None | Terminator::Lf => b"\n",
            Terminator::CrLf => b"\r\n",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("content is not UTF-8 text (invalid byte at offset {0})")]
    NotText(usize),
}

/// A file's content as lines, without their terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSet {
    pub lines: Vec<String>,
    /// Terminator read after each line, parallel to `lines`
    endings: Vec<Terminator>,
    /// Style of the file's first terminator, used for inserted lines
    pub terminator: Terminator,
    pub missing_final_newline: bool,
}

impl LineSet {
    /// Lines that all share `terminator`.
    pub fn new(lines: Vec<String>, terminator: Terminator, missing_final_newline: bool) -> Self {
        Self {
            endings: vec![terminator; lines.len()],
            lines,
            terminator,
            missing_final_newline,
        }
    }

    /// The content of a zero-length file.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Terminator::None, true)
    }

    /// Terminator written after line `idx`.
    pub fn ending(&self, idx: usize) -> Terminator {
        self.endings.get(idx).copied().unwrap_or(self.terminator)
    }

    /// Compare lines and the trailing newline flag, ignoring terminator style.
    pub fn content_eq(&self, other: &LineSet) -> bool {
        self.lines == other.lines && self.missing_final_newline == other.missing_final_newline
    }
}

/// Line storage a hunk can be applied to.
pub trait LineBuffer {
    fn line_count(&self) -> usize;

    fn line_at(&self, idx: usize) -> Option<&str>;

    fn remove_line(&mut self, idx: usize);

    fn insert_line(&mut self, idx: usize, text: &str);

    /// Hunk text as it compares against this buffer's lines.
    fn hunk_text<'t>(&self, text: &'t str) -> &'t str {
        text
    }
}

impl LineBuffer for Vec<String> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, idx: usize) -> Option<&str> {
        self.get(idx).map(String::as_str)
    }

    fn remove_line(&mut self, idx: usize) {
        self.remove(idx);
    }

    fn insert_line(&mut self, idx: usize, text: &str) {
        self.insert(idx, text.to_string());
    }
}

impl LineBuffer for LineSet {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_at(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    fn remove_line(&mut self, idx: usize) {
        self.lines.remove(idx);
        if idx < self.endings.len() {
            self.endings.remove(idx);
        }
    }

    // Inserted lines take the file's style
    fn insert_line(&mut self, idx: usize, text: &str) {
        self.lines.insert(idx, text.to_string());
        if idx <= self.endings.len() {
            self.endings.insert(idx, self.terminator);
        }
    }

    // In a CRLF file the `\r` of a `\r\n` belongs to the terminator, also
    // when it comes from a patch line
    fn hunk_text<'t>(&self, text: &'t str) -> &'t str {
        match self.terminator {
            Terminator::CrLf => text.strip_suffix('\r').unwrap_or(text),
            _ => text,
        }
    }
}

/// Split text on `\n`, pairing each line with the terminator that ended it.
///
/// The first terminator decides the style. Under CRLF the `\r` of every
/// `\r\n` is stripped and a bare `\n` is recorded as LF; under LF a `\r`
/// stays part of the line. An unterminated last line is returned as is,
/// paired with the style.
pub fn split_lines(text: &str) -> (Terminator, Vec<(&str, Terminator)>) {
    let style = match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => Terminator::CrLf,
        Some(_) => Terminator::Lf,
        None => Terminator::None,
    };

    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(i) = rest.find('\n') {
        let line = &rest[..i];
        lines.push(match line.strip_suffix('\r') {
            Some(stripped) if style == Terminator::CrLf => (stripped, Terminator::CrLf),
            _ => (line, Terminator::Lf),
        });
        rest = &rest[i + 1..];
    }
    if !rest.is_empty() {
        lines.push((rest, style));
    }

    (style, lines)
}

/// Split raw bytes into a [`LineSet`].
///
/// Terminators follow [`split_lines`]. Lines that end differently from the
/// file's first terminator keep their own ending when written back.
pub fn decompose(bytes: &[u8]) -> Result<LineSet, LineError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LineError::NotText(e.valid_up_to()))?;
    if text.is_empty() {
        return Ok(LineSet::empty());
    }

    let (terminator, pieces) = split_lines(text);
    let (lines, endings) = pieces
        .into_iter()
        .map(|(line, ending)| (line.to_string(), ending))
        .unzip();

    Ok(LineSet {
        lines,
        endings,
        terminator,
        missing_final_newline: !text.ends_with('\n'),
    })
}

/// Join a [`LineSet`] back into bytes.
pub fn recompose(set: &LineSet) -> Vec<u8> {
    let size: usize = set.lines.iter().map(|line| line.len() + 2).sum();
    let mut out = Vec::with_capacity(size);

    let last = set.lines.len().saturating_sub(1);
    for (i, line) in set.lines.iter().enumerate() {
        out.extend_from_slice(line.as_bytes());
        if i < last || !set.missing_final_newline {
            out.extend_from_slice(set.ending(i).as_bytes());
        }
    }

    out
}
