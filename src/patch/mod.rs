//! Unified diff parsing into a [`PatchDocument`].

mod parser;

use crate::models::PatchDocument;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid hunk header: {0}")]
    InvalidHunkHeader(String),
    #[error("Unexpected diff format: {0}")]
    UnexpectedFormat(String),
    #[error("Binary patches are not supported: {0}")]
    BinaryPatch(String),
}

/// Parse `git diff`-style unified diff text.
pub fn parse(text: &str) -> Result<PatchDocument, ParseError> {
    parser::PatchParser::new().parse(text)
}
