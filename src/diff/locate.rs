//! Mapping a line quoted by the model back to a patch position.
//!
//! Inline review comments need two coordinates: the index of the line inside
//! the file's patch text and the absolute line number in the new file.

use super::hunk::parse_hunk_header;
use crate::change::FileChange;
use similar::TextDiff;

/// Minimum similarity for a quoted line to be snapped to a single added line.
const CLOSE_MATCH_CUTOFF: f32 = 0.93;

/// Where a quoted line was found in a file's patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLocation {
    /// Zero-based index of the line within the patch text.
    pub position: usize,
    /// One-based line number in the new version of the file.
    pub absolute_line: usize,
}

/// Find `needle` in the patch of `filename`.
///
/// Removed lines never match. If the needle is a near-exact copy of exactly
/// one added line, that line is searched for instead. When nothing matches
/// and the needle starts with `+`, the search is retried without the `+` and
/// leading whitespace.
pub fn locate_line(files: &[FileChange], filename: &str, needle: &str) -> Option<LineLocation> {
    let file = files.iter().find(|f| f.filename.trim() == filename)?;
    let patch_lines: Vec<&str> = file.raw_patch.lines().collect();
    if needle.is_empty() {
        return None;
    }

    let needle = snap_to_added_line(&patch_lines, needle).unwrap_or(needle);
    if let Some(found) = search(&patch_lines, needle) {
        return Some(found);
    }

    let stripped = needle.strip_prefix('+')?.trim_start();
    if stripped.is_empty() {
        return None;
    }
    search(&patch_lines, stripped)
}

fn snap_to_added_line<'a>(patch_lines: &[&'a str], needle: &str) -> Option<&'a str> {
    let mut close = patch_lines
        .iter()
        .filter(|line| TextDiff::from_chars(needle, **line).ratio() >= CLOSE_MATCH_CUTOFF);
    let first = close.next()?;
    if close.next().is_some() || !first.starts_with('+') {
        return None;
    }
    Some(*first)
}

fn search(patch_lines: &[&str], needle: &str) -> Option<LineLocation> {
    let mut new_start = 0;
    let mut delta = 0;

    for (position, line) in patch_lines.iter().enumerate() {
        if line.starts_with("@@") {
            new_start = parse_hunk_header(line).ok()?.new_start;
            delta = 0;
            continue;
        }
        if line.starts_with('-') || line.starts_with('\\') {
            continue;
        }
        delta += 1;
        if line.contains(needle) {
            return Some(LineLocation {
                position,
                absolute_line: new_start + delta - 1,
            });
        }
    }

    None
}
