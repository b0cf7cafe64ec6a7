use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A repository on branch `main` with one commit holding `README.md`.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "core.autocrlf", "false"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Write `files` (path, content) into the repo and commit them.
///
/// Returns the new commit id.
pub(crate) fn commit_files(repo_dir: &Path, files: &[(&str, &str)], message: &str) -> String {
    for (name, content) in files {
        let target = repo_dir.join(name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, content).unwrap();
    }
    git(repo_dir, &["add", "-A"]);
    git(repo_dir, &["commit", "-m", message]);
    head(repo_dir)
}

/// Remove `files` from the repo and commit. Returns the new commit id.
pub(crate) fn remove_files(repo_dir: &Path, files: &[&str], message: &str) -> String {
    let mut args = vec!["rm", "-q"];
    args.extend_from_slice(files);
    git(repo_dir, &args);
    git(repo_dir, &["commit", "-m", message]);
    head(repo_dir)
}

/// Rename `from` to `to` and commit. Returns the new commit id.
pub(crate) fn rename_file(repo_dir: &Path, from: &str, to: &str, message: &str) -> String {
    git(repo_dir, &["mv", from, to]);
    git(repo_dir, &["commit", "-m", message]);
    head(repo_dir)
}

pub(crate) fn head(repo_dir: &Path) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(["rev-parse", "HEAD"])
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}
