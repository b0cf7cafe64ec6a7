//! Rebuilding a patch from both file versions when the provider sent none.

use similar::TextDiff;

/// Context radius used for reconstructed patches, matching `git diff`.
const RECONSTRUCTED_CONTEXT: usize = 3;

/// Produce unified-diff hunks for `original` → `new` using a line-based LCS diff.
///
/// Trailing whitespace at the end of each version is normalized to a single
/// newline first. Returns an empty string when both versions are empty.
pub fn reconstruct_patch(original: &str, new: &str) -> String {
    if original.is_empty() && new.is_empty() {
        return String::new();
    }

    let original = normalize_tail(original);
    let new = normalize_tail(new);

    TextDiff::from_lines(original.as_str(), new.as_str())
        .unified_diff()
        .context_radius(RECONSTRUCTED_CONTEXT)
        .to_string()
}

fn normalize_tail(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::hunk::{LineKind, parse_hunks};

    #[test]
    fn reconstructs_single_line_change() {
        let patch = reconstruct_patch("a\nb\nc\n", "a\nB\nc\n");
        let hunks = parse_hunks(&patch).unwrap();

        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert_eq!((hunk.old_start, hunk.old_count), (1, 3));
        assert_eq!((hunk.new_start, hunk.new_count), (1, 3));
        let removed: Vec<&str> = hunk
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Removed)
            .map(|l| l.text.as_str())
            .collect();
        let added: Vec<&str> = hunk
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(removed, vec!["b"]);
        assert_eq!(added, vec!["B"]);
    }

    #[test]
    fn new_file_is_all_additions() {
        let patch = reconstruct_patch("", "one\ntwo\n");
        let hunks = parse_hunks(&patch).unwrap();

        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].lines.iter().all(|l| l.kind == LineKind::Added));
        assert_eq!(hunks[0].lines.len(), 2);
    }

    #[test]
    fn identical_versions_produce_no_hunks() {
        let patch = reconstruct_patch("same\n", "same");
        assert!(parse_hunks(&patch).unwrap().is_empty());
    }

    #[test]
    fn both_empty_is_empty_patch() {
        assert_eq!(reconstruct_patch("", ""), "");
    }
}
