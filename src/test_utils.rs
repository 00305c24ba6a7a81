//! Shared test utilities for creating test fixtures.
//!
//! This module provides helper functions for creating test data
//! used across multiple test modules.

use crate::models::{Hunk, HunkLine};

/// Context line
pub fn ctx(text: &str) -> HunkLine {
    HunkLine::context(text)
}

/// Removed line
pub fn rm(text: &str) -> HunkLine {
    HunkLine::remove(text)
}

/// Added line
pub fn add(text: &str) -> HunkLine {
    HunkLine::add(text)
}

/// Owned lines from string slices
pub fn strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Create a hunk whose old and new start lines coincide
pub fn make_hunk(new_start: u32, lines: Vec<HunkLine>) -> Hunk {
    Hunk::new(new_start, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_hunk() {
        let hunk = make_hunk(3, vec![ctx("a"), add("b")]);
        assert_eq!(hunk.new_start, 3);
        assert_eq!(hunk.old_start, 3);
        assert_eq!(hunk.lines.len(), 2);
    }

    #[test]
    fn test_strings() {
        assert_eq!(strings(&["a", "b"]), vec!["a".to_string(), "b".to_string()]);
    }
}
