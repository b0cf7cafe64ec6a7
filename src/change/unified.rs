//! Splitting a multi-file `git diff` stream into per-file changes.
//!
//! Only git's extended format is recognized: every file section starts with a
//! `diff --git a/<old> b/<new>` line. File contents are unknown in this mode,
//! so the resulting changes carry a patch and an edit kind only.

use super::{EditKind, FileChange};

const DIFF_GIT_PREFIX: &str = "diff --git ";

/// Split `text` into one [`FileChange`] per `diff --git` section.
///
/// The stored patch starts at the first `@@` line of the section. Sections
/// without hunks (binary files, pure renames, mode changes) get an empty
/// patch. Text before the first section is ignored.
pub fn split_unified_diff(text: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(DIFF_GIT_PREFIX) {
            if let Some(section) = current.take() {
                changes.push(section.finish());
            }
            current = Some(Section::start(rest));
            continue;
        }
        if let Some(section) = current.as_mut() {
            section.push(line);
        }
    }

    if let Some(section) = current {
        changes.push(section.finish());
    }
    changes
}

struct Section {
    old_path: Option<String>,
    new_path: Option<String>,
    kind: EditKind,
    in_hunks: bool,
    patch_lines: Vec<String>,
}

impl Section {
    fn start(rest: &str) -> Self {
        let (old_path, new_path) = parse_diff_git_paths(rest);
        Self {
            old_path,
            new_path,
            kind: EditKind::Modified,
            in_hunks: false,
            patch_lines: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        if line.starts_with("@@") {
            self.in_hunks = true;
        }
        if self.in_hunks {
            self.patch_lines.push(line.to_string());
            return;
        }

        // Extended header lines
        if line.starts_with("new file mode") {
            self.kind = EditKind::Added;
        } else if line.starts_with("deleted file mode") {
            self.kind = EditKind::Deleted;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            self.kind = EditKind::Renamed;
            self.old_path = Some(normalize_path(path));
        } else if let Some(path) = line.strip_prefix("rename to ") {
            self.kind = EditKind::Renamed;
            self.new_path = Some(normalize_path(path));
        } else if let Some(path) = line.strip_prefix("--- ") {
            if path == "/dev/null" {
                self.kind = EditKind::Added;
            } else if let Some(path) = path.strip_prefix("a/") {
                self.old_path = Some(normalize_path(path));
            }
        } else if let Some(path) = line.strip_prefix("+++ ") {
            if path == "/dev/null" {
                self.kind = EditKind::Deleted;
            } else if let Some(path) = path.strip_prefix("b/") {
                self.new_path = Some(normalize_path(path));
            }
        }
    }

    fn finish(self) -> FileChange {
        let filename = match self.kind {
            EditKind::Deleted => self.old_path.clone().or(self.new_path.clone()),
            _ => self.new_path.clone().or(self.old_path.clone()),
        }
        .unwrap_or_default();

        let mut change = FileChange::new(filename, self.kind).with_patch(self.patch_lines.join("\n"));
        if self.kind == EditKind::Renamed
            && let Some(old) = self.old_path
        {
            change = change.renamed_from(old);
        }
        change
    }
}

/// Parse the old and new paths from the rest of a `diff --git` line.
///
/// Paths may contain spaces, so the last ` b/` separates the two.
fn parse_diff_git_paths(rest: &str) -> (Option<String>, Option<String>) {
    let Some(b_pos) = rest.rfind(" b/") else {
        return (None, None);
    };
    let old = rest[..b_pos].strip_prefix("a/").map(normalize_path);
    let new = Some(normalize_path(&rest[b_pos + 3..]));
    (old, new)
}

/// Normalize a file path to use forward slashes.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI: &str = "diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,3 @@
 pub mod a;
+pub mod b;
 pub mod c;
diff --git a/docs/new.md b/docs/new.md
new file mode 100644
index 0000000..3333333
--- /dev/null
+++ b/docs/new.md
@@ -0,0 +1 @@
+hello
diff --git a/old.txt b/old.txt
deleted file mode 100644
index 4444444..0000000
--- a/old.txt
+++ /dev/null
@@ -1 +0,0 @@
-bye
";

    #[test]
    fn splits_sections_with_kinds() {
        let changes = split_unified_diff(MULTI);

        let summary: Vec<(&str, EditKind)> = changes
            .iter()
            .map(|c| (c.filename.as_str(), c.edit_kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("src/lib.rs", EditKind::Modified),
                ("docs/new.md", EditKind::Added),
                ("old.txt", EditKind::Deleted),
            ]
        );
    }

    #[test]
    fn patch_starts_at_first_hunk() {
        let changes = split_unified_diff(MULTI);

        assert_eq!(
            changes[0].raw_patch,
            "@@ -1,2 +1,3 @@\n pub mod a;\n+pub mod b;\n pub mod c;"
        );
        assert_eq!(changes[2].raw_patch, "@@ -1 +0,0 @@\n-bye");
        assert!(changes.iter().all(|c| c.original_content.is_none()));
    }

    #[test]
    fn rename_records_old_name() {
        let text = "diff --git a/src/old name.rs b/src/new name.rs
similarity index 90%
rename from src/old name.rs
rename to src/new name.rs
--- a/src/old name.rs
+++ b/src/new name.rs
@@ -3 +3 @@
-x
+y
";
        let changes = split_unified_diff(text);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].edit_kind, EditKind::Renamed);
        assert_eq!(changes[0].filename, "src/new name.rs");
        assert_eq!(changes[0].old_filename.as_deref(), Some("src/old name.rs"));
    }

    #[test]
    fn binary_section_has_empty_patch() {
        let text = "diff --git a/logo.png b/logo.png
index 5555555..6666666 100644
Binary files a/logo.png and b/logo.png differ
";
        let changes = split_unified_diff(text);

        assert_eq!(changes[0].filename, "logo.png");
        assert_eq!(changes[0].raw_patch, "");
    }

    #[test]
    fn hunk_lines_resembling_headers_stay_in_patch() {
        let text = "diff --git a/a.sql b/a.sql
--- a/a.sql
+++ b/a.sql
@@ -1,2 +1,2 @@
--- comment
+++ counter
 select 1;
";
        let changes = split_unified_diff(text);

        assert_eq!(changes[0].edit_kind, EditKind::Modified);
        assert!(changes[0].raw_patch.contains("--- comment"));
        assert!(changes[0].raw_patch.contains("+++ counter"));
    }

    #[test]
    fn text_without_sections_is_empty() {
        assert!(split_unified_diff("just some text\n").is_empty());
    }
}
