//! Collecting the changes between two revisions of a local repository.
//!
//! This stands in for a hosted git provider: it yields the same per-file
//! records (both contents, the patch, the edit kind) from plain git commands.

use super::unified::split_unified_diff;
use super::{EditKind, FileChange};
use crate::error::Result;
use crate::git::{run_git_raw, verify_revision};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// One entry of `git diff --name-status`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusEntry {
    kind: EditKind,
    old_path: Option<String>,
    path: String,
}

/// Collect every file changed between `base` and `head` in `repo`.
///
/// Renames are detected. The order follows git's path order.
pub fn collect_changes(repo: &Path, base: &str, head: &str) -> Result<Vec<FileChange>> {
    verify_revision(repo, base)?;
    verify_revision(repo, head)?;

    let status = run_git_raw(
        repo,
        &["diff", "--name-status", "-z", "-M", "--no-color", base, head],
    )?;
    let entries = parse_name_status(&String::from_utf8_lossy(&status));
    debug!(base, head, files = entries.len(), "collected changed paths");

    let diff = run_git_raw(
        repo,
        &["diff", "-M", "--no-color", "--no-ext-diff", base, head],
    )?;
    let mut patches: HashMap<String, String> = split_unified_diff(&String::from_utf8_lossy(&diff))
        .into_iter()
        .map(|c| (c.filename, c.raw_patch))
        .collect();

    let mut changes = Vec::with_capacity(entries.len());
    for entry in entries {
        let original = match entry.kind {
            EditKind::Added => Vec::new(),
            _ => {
                let old_path = entry.old_path.as_deref().unwrap_or(&entry.path);
                show_file(repo, base, old_path)?
            }
        };
        let new = match entry.kind {
            EditKind::Deleted => Vec::new(),
            _ => show_file(repo, head, &entry.path)?,
        };

        let mut change = FileChange::new(entry.path.clone(), entry.kind)
            .with_contents(original, new)
            .with_patch(patches.remove(&entry.path).unwrap_or_default());
        if let Some(old_path) = entry.old_path {
            change = change.renamed_from(old_path);
        }
        changes.push(change);
    }

    Ok(changes)
}

fn show_file(repo: &Path, rev: &str, path: &str) -> Result<Vec<u8>> {
    let object = format!("{}:{}", rev, path);
    run_git_raw(repo, &["show", "--no-color", &object])
}

/// Parse NUL-separated `--name-status -z` output.
///
/// Renames and copies carry two paths (old then new); other statuses one.
fn parse_name_status(output: &str) -> Vec<StatusEntry> {
    let mut fields = output.split('\0').filter(|f| !f.is_empty());
    let mut entries = Vec::new();

    while let Some(status) = fields.next() {
        let two_paths = status.starts_with('R') || status.starts_with('C');
        let first = fields.next();
        let second = if two_paths { fields.next() } else { None };

        let Some(first) = first else {
            break;
        };
        let Some(kind) = EditKind::from_status(status) else {
            warn!(status, path = first, "skipping change with unsupported status");
            continue;
        };

        let entry = match second {
            Some(new_path) if kind == EditKind::Renamed => StatusEntry {
                kind,
                old_path: Some(first.to_string()),
                path: new_path.to_string(),
            },
            _ => StatusEntry {
                kind,
                old_path: None,
                path: first.to_string(),
            },
        };
        entries.push(entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrdiffError;
    use crate::test_support::{commit_files, create_test_repo, head, remove_files, rename_file};

    #[test]
    fn parse_name_status_handles_renames() {
        let entries = parse_name_status("M\0src/a.rs\0R095\0old.rs\0new.rs\0A\0b c.txt\0");

        assert_eq!(
            entries,
            vec![
                StatusEntry {
                    kind: EditKind::Modified,
                    old_path: None,
                    path: "src/a.rs".to_string(),
                },
                StatusEntry {
                    kind: EditKind::Renamed,
                    old_path: Some("old.rs".to_string()),
                    path: "new.rs".to_string(),
                },
                StatusEntry {
                    kind: EditKind::Added,
                    old_path: None,
                    path: "b c.txt".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parse_name_status_skips_unknown_status() {
        let entries = parse_name_status("X\0weird\0M\0ok.rs\0");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "ok.rs");
    }

    #[test]
    fn collects_modified_added_and_deleted_files() {
        let repo = create_test_repo();
        let path = repo.path();
        let base = commit_files(
            path,
            &[("src/app.rs", "fn a() {}\nfn b() {}\n"), ("gone.txt", "bye\n")],
            "base",
        );
        commit_files(
            path,
            &[("src/app.rs", "fn a() {}\nfn b2() {}\n"), ("new.txt", "hi\n")],
            "edit",
        );
        remove_files(path, &["gone.txt"], "remove");
        let head_rev = head(path);

        let changes = collect_changes(path, &base, &head_rev).unwrap();

        let names: Vec<(&str, EditKind)> = changes
            .iter()
            .map(|c| (c.filename.as_str(), c.edit_kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("gone.txt", EditKind::Deleted),
                ("new.txt", EditKind::Added),
                ("src/app.rs", EditKind::Modified),
            ]
        );

        let app = &changes[2];
        assert_eq!(app.original_text().unwrap(), Some("fn a() {}\nfn b() {}\n"));
        assert_eq!(app.new_text().unwrap(), Some("fn a() {}\nfn b2() {}\n"));
        assert!(app.raw_patch.starts_with("@@ -1,2 +1,2 @@"));
        assert!(app.raw_patch.contains("+fn b2() {}"));

        let gone = &changes[0];
        assert!(gone.new_content_is_empty());
    }

    #[test]
    fn collects_renames_with_old_name() {
        let repo = create_test_repo();
        let path = repo.path();
        let base = commit_files(path, &[("old.rs", "one\ntwo\nthree\nfour\n")], "base");
        let head_rev = rename_file(path, "old.rs", "new.rs", "rename");

        let changes = collect_changes(path, &base, &head_rev).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].edit_kind, EditKind::Renamed);
        assert_eq!(changes[0].filename, "new.rs");
        assert_eq!(changes[0].old_filename.as_deref(), Some("old.rs"));
        assert_eq!(changes[0].original_content, changes[0].new_content);
    }

    #[test]
    fn unknown_revision_is_user_error() {
        let repo = create_test_repo();
        let err = collect_changes(repo.path(), "missing", "HEAD").unwrap_err();
        assert!(matches!(err, PrdiffError::UserError(_)));
    }
}
