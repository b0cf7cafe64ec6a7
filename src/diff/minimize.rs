//! Reducing a patch to the hunks that add code.

use super::hunk::{Hunk, ParsedPatch};
use crate::change::{EditKind, FileChange};
use tracing::debug;

/// Keep only hunks with at least one added line, in their original order and
/// with their original headers.
pub fn omit_deletion_hunks(hunks: &[Hunk]) -> Vec<Hunk> {
    hunks.iter().filter(|h| h.has_additions()).cloned().collect()
}

/// Minimize a file's patch for the compressing pass.
///
/// Returns `None` when the file should be shown by name only:
/// - the file was deleted, or its new content is empty (unless it was added),
/// - every hunk of the patch only removes lines.
///
/// Headers are not renumbered after sibling hunks are dropped.
pub fn minimize(change: &FileChange, patch: &ParsedPatch) -> Option<ParsedPatch> {
    if change.edit_kind == EditKind::Deleted
        || (change.new_content_is_empty() && change.edit_kind != EditKind::Added)
    {
        debug!(file = %change.filename, "minimizing deleted file to its name");
        return None;
    }

    let kept = omit_deletion_hunks(&patch.hunks);
    if kept.is_empty() && !patch.is_empty() {
        debug!(file = %change.filename, "patch only removes lines");
        return None;
    }
    if kept.len() != patch.hunks.len() {
        debug!(
            file = %change.filename,
            dropped = patch.hunks.len() - kept.len(),
            "deletion-only hunks omitted"
        );
    }

    Some(patch.with_hunks(kept))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(patch: &str) -> (FileChange, ParsedPatch) {
        let change = FileChange::new("src/lib.rs", EditKind::Modified)
            .with_contents("old\n", "new\n")
            .with_patch(patch);
        let parsed = ParsedPatch::parse("src/lib.rs", patch).unwrap();
        (change, parsed)
    }

    #[test]
    fn keeps_only_hunks_with_additions() {
        let (change, patch) = modified(
            "@@ -1,2 +1,0 @@ fn a()\n-x\n-y\n@@ -10,1 +8,2 @@ fn b()\n ctx\n+added",
        );

        let minimized = minimize(&change, &patch).unwrap();

        assert_eq!(minimized.hunks.len(), 1);
        assert_eq!(minimized.hunks[0].header(), "@@ -10,1 +8,2 @@ fn b()");
        assert_eq!(minimized.hunks[0], patch.hunks[1]);
    }

    #[test]
    fn deletion_only_patch_is_name_only() {
        let (change, patch) = modified("@@ -3,2 +3,0 @@\n-gone\n-also gone");

        assert_eq!(minimize(&change, &patch), None);
    }

    #[test]
    fn addition_only_patch_is_unchanged() {
        let (change, patch) = modified("@@ -1,0 +1,2 @@\n+a\n+b\n@@ -5,0 +7,1 @@\n+c");

        assert_eq!(minimize(&change, &patch), Some(patch.clone()));
    }

    #[test]
    fn deleted_file_is_name_only() {
        let change = FileChange::new("old.rs", EditKind::Deleted).with_patch("@@ -1 +0,0 @@\n-x");
        let patch = ParsedPatch::parse("old.rs", &change.raw_patch).unwrap();

        assert_eq!(minimize(&change, &patch), None);
    }

    #[test]
    fn emptied_modified_file_is_name_only_regardless_of_patch() {
        let change = FileChange::new("a.rs", EditKind::Modified)
            .with_contents("x\n", "")
            .with_patch("@@ -1 +1 @@\n-x\n+y");
        let patch = ParsedPatch::parse("a.rs", &change.raw_patch).unwrap();

        assert_eq!(minimize(&change, &patch), None);
    }

    #[test]
    fn empty_added_file_keeps_its_patch() {
        let change = FileChange::new("empty.txt", EditKind::Added).with_contents("", "");
        let patch = ParsedPatch::parse("empty.txt", "").unwrap();

        let minimized = minimize(&change, &patch).unwrap();
        assert!(minimized.is_empty());
    }

    #[test]
    fn unknown_content_relies_on_edit_kind() {
        let change = FileChange::new("a.rs", EditKind::Modified).with_patch("@@ -1 +1 @@\n-x\n+y");
        let patch = ParsedPatch::parse("a.rs", &change.raw_patch).unwrap();

        assert!(minimize(&change, &patch).is_some());
    }
}
