use std::path::Path;

use crate::models::{Hunk, HunkLine};

/// Format hunk lines with standard +/- prefixes for display
pub fn format_hunk_lines(lines: &[HunkLine]) -> String {
    lines
        .iter()
        .map(HunkLine::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a hunk with its `@@` header, counting each side from its lines
pub fn format_hunk(hunk: &Hunk) -> String {
    let old_count = hunk.lines.iter().filter(|l| l.is_old_side()).count();
    let new_count = hunk.lines.iter().filter(|l| l.is_new_side()).count();
    format!(
        "@@ -{},{} +{},{} @@\n{}",
        header_start(hunk.old_start, old_count),
        old_count,
        header_start(hunk.new_start, new_count),
        new_count,
        format_hunk_lines(&hunk.lines)
    )
}

/// Diff headers name the line before an empty side.
fn header_start(start: u32, count: usize) -> u32 {
    if count == 0 {
        start.saturating_sub(1)
    } else {
        start
    }
}

/// Path as shown to users, with `/` separators on every platform
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
