//! Git command runner for prdiff.
//!
//! Provides a wrapper around git commands with captured stdout/stderr and
//! structured error handling. Every git invocation goes through this module.

use crate::error::{PrdiffError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(PrdiffError::GitError)` - On non-zero exit code (mapped to exit code 3)
///
/// # Examples
///
/// ```no_run
/// use prdiff::git::run_git;
/// use std::path::Path;
///
/// let output = run_git(Path::new("."), &["diff", "--name-status", "main"])?;
/// println!("Changes: {}", output.stdout);
/// # Ok::<(), prdiff::error::PrdiffError>(())
/// ```
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = execute(cwd.as_ref(), args)?;
    Ok(GitOutput::from_output(&output))
}

/// Run a git command and return its stdout bytes untouched.
///
/// Used where trimming or lossy decoding would corrupt the result, such as
/// file contents from `git show` and patch text from `git diff`.
pub fn run_git_raw<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<Vec<u8>> {
    let output = execute(cwd.as_ref(), args)?;
    Ok(output.stdout)
}

fn execute(cwd: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            PrdiffError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    if output.status.success() {
        return Ok(output);
    }

    let captured = GitOutput::from_output(&output);
    let exit_code = output.status.code().unwrap_or(-1);
    let error_msg = if captured.stderr.is_empty() {
        captured.stdout
    } else {
        captured.stderr
    };

    Err(PrdiffError::GitError(format!(
        "git {} failed (exit code {}): {}",
        args.first().unwrap_or(&""),
        exit_code,
        error_msg
    )))
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(PrdiffError::UserError)` - If not inside a git repository (exit code 1)
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            PrdiffError::UserError(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    let captured = GitOutput::from_output(&output);
    if output.status.success() {
        return Ok(PathBuf::from(captured.stdout));
    }

    // "Not a repo" is the user's mistake (exit 1), not a git failure (exit 3)
    if captured.stderr.contains("not a git repository") || captured.stderr.contains("fatal:") {
        Err(PrdiffError::UserError(format!(
            "{} is not inside a git repository",
            cwd.display()
        )))
    } else {
        Err(PrdiffError::UserError(format!(
            "git command failed: {}",
            captured.stderr
        )))
    }
}

/// Check that `rev` names a commit, returning a user error otherwise.
pub fn verify_revision<P: AsRef<Path>>(cwd: P, rev: &str) -> Result<()> {
    let commit_rev = format!("{}^{{commit}}", rev);
    run_git(cwd, &["rev-parse", "--verify", "--quiet", &commit_rev])
        .map(|_| ())
        .map_err(|_| PrdiffError::UserError(format!("unknown revision '{}'", rev)))
}
