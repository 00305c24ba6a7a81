//! Verifying and applying a single hunk to an in-memory line sequence.
//!
//! The cursor only advances past lines that stay in the file (context) or
//! that were just inserted. A removed line leaves the cursor where it is, so
//! the next hunk line is checked against whatever slid into that slot.

use super::newline_expectation;
use crate::lines::{LineBuffer, LineSet};
use crate::models::{Hunk, HunkLine};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HunkError {
    #[error("line {line_number}: expected `{expected}`, found `{actual}`")]
    ContentMismatch {
        line_number: usize,
        expected: HunkLine,
        actual: String,
    },
    #[error("line {line_number} (`{expected}`) is past the end of the file ({len} lines)")]
    OutOfRange {
        line_number: usize,
        expected: HunkLine,
        len: usize,
    },
    #[error("hunk expects the file to {}", newline_expectation(.expected_missing))]
    NewlineMismatch { expected_missing: bool },
}

/// Apply `hunk` to `current`, returning the new line sequence.
pub fn apply(current: &[String], hunk: &Hunk) -> Result<Vec<String>, HunkError> {
    let mut lines = current.to_vec();
    apply_in_place(&mut lines, hunk)?;
    Ok(lines)
}

/// Apply `hunk` to `lines` in place.
///
/// Returns the index just past the hunk's last line. On error `lines` may be
/// partially edited; callers work on a copy.
pub fn apply_in_place<L>(lines: &mut L, hunk: &Hunk) -> Result<usize, HunkError>
where
    L: LineBuffer + ?Sized,
{
    let anchor = hunk.anchor();
    let mut pos = 0;

    for line in &hunk.lines {
        let idx = anchor + pos;
        match line {
            HunkLine::Context(text) => {
                verify(lines, idx, line, text)?;
                pos += 1;
            }
            HunkLine::Remove(text) => {
                verify(lines, idx, line, text)?;
                lines.remove_line(idx);
            }
            HunkLine::Add(text) => {
                if idx > lines.line_count() {
                    return Err(HunkError::OutOfRange {
                        line_number: idx + 1,
                        expected: line.clone(),
                        len: lines.line_count(),
                    });
                }
                let text = lines.hunk_text(text);
                lines.insert_line(idx, text);
                pos += 1;
            }
            HunkLine::NoNewlineMarker => {}
        }
    }

    Ok(anchor + pos)
}

/// Apply `hunk` to a whole file, keeping its trailing newline flag in step.
///
/// The flag only changes when the hunk reaches the end of the file. In that
/// case the hunk's source side must agree with the file about the final
/// newline, and its target side decides the new flag.
pub fn apply_to(set: &mut LineSet, hunk: &Hunk) -> Result<(), HunkError> {
    let end = apply_in_place(set, hunk)?;
    if end < set.lines.len() {
        return Ok(());
    }

    if hunk.has_old_side_lines() && hunk.old_missing_newline() != set.missing_final_newline {
        return Err(HunkError::NewlineMismatch {
            expected_missing: hunk.old_missing_newline(),
        });
    }
    set.missing_final_newline = hunk.new_missing_newline();
    Ok(())
}

fn verify<L: LineBuffer + ?Sized>(
    lines: &L,
    idx: usize,
    line: &HunkLine,
    expected: &str,
) -> Result<(), HunkError> {
    match lines.line_at(idx) {
        None => Err(HunkError::OutOfRange {
            line_number: idx + 1,
            expected: line.clone(),
            len: lines.line_count(),
        }),
        Some(actual) if actual != lines.hunk_text(expected) => Err(HunkError::ContentMismatch {
            line_number: idx + 1,
            expected: line.clone(),
            actual: actual.to_string(),
        }),
        Some(_) => Ok(()),
    }
}
