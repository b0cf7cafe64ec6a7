//! Dropping ignored files before assembly.
//!
//! A file is ignored when its path matches any configured glob, or when any
//! configured regex matches at the start of the path.

use crate::change::FileChange;
use crate::config::Config;
use crate::error::{PrdiffError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use tracing::debug;

/// Compiled ignore patterns. Create once per run.
pub struct FileFilter {
    globs: GlobSet,
    patterns: Vec<Regex>,
}

impl std::fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileFilter")
            .field("globs", &self.globs.len())
            .field(
                "patterns",
                &self.patterns.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FileFilter {
    /// Compile the ignore patterns of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.ignore_globs, &config.ignore_regex)
    }

    pub fn new(globs: &[String], patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            let glob = Glob::new(pattern).map_err(|e| {
                PrdiffError::ConfigError(format!(
                    "invalid glob in ignore_globs: '{}' - {}",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|e| PrdiffError::ConfigError(format!("failed to build ignore globs: {}", e)))?;

        let patterns = patterns
            .iter()
            .map(|pattern| {
                // Anchor so the pattern must match from the first character
                Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
                    PrdiffError::ConfigError(format!(
                        "invalid regex in ignore_regex: '{}' - {}",
                        pattern, e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { globs, patterns })
    }

    /// Whether `path` should be dropped.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.globs.is_match(path) || self.patterns.iter().any(|re| re.is_match(path))
    }

    /// Remove ignored files, keeping the order of the rest.
    pub fn apply(&self, files: Vec<FileChange>) -> Vec<FileChange> {
        if self.globs.is_empty() && self.patterns.is_empty() {
            return files;
        }

        files
            .into_iter()
            .filter(|file| {
                let ignored = self.is_ignored(&file.filename);
                if ignored {
                    debug!(file = %file.filename, "ignored by filter");
                }
                !ignored
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::EditKind;

    fn filter(globs: &[&str], patterns: &[&str]) -> FileFilter {
        let globs: Vec<String> = globs.iter().map(|s| s.to_string()).collect();
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        FileFilter::new(&globs, &patterns).unwrap()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let f = filter(&[], &[]);
        assert!(!f.is_ignored("anything.rs"));
    }

    #[test]
    fn glob_matches_paths() {
        let f = filter(&["vendor/**", "*.lock"], &[]);

        assert!(f.is_ignored("vendor/lib/a.js"));
        assert!(f.is_ignored("Cargo.lock"));
        assert!(!f.is_ignored("src/vendor.rs"));
    }

    #[test]
    fn regex_is_anchored_at_start() {
        let f = filter(&[], &["generated/", r".*\.pb\.go"]);

        assert!(f.is_ignored("generated/api.rs"));
        assert!(!f.is_ignored("src/generated/api.rs"));
        assert!(f.is_ignored("proto/user.pb.go"));
    }

    #[test]
    fn alternation_stays_anchored() {
        let f = filter(&[], &["docs|build"]);

        assert!(f.is_ignored("docs/readme.md"));
        assert!(f.is_ignored("build/out.txt"));
        assert!(!f.is_ignored("src/build.rs"));
    }

    #[test]
    fn apply_keeps_order_of_remaining_files() {
        let f = filter(&["*.md"], &[]);
        let files = vec![
            FileChange::new("b.rs", EditKind::Modified),
            FileChange::new("README.md", EditKind::Modified),
            FileChange::new("a.rs", EditKind::Added),
        ];

        let kept: Vec<String> = f.apply(files).into_iter().map(|c| c.filename).collect();
        assert_eq!(kept, vec!["b.rs", "a.rs"]);
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = FileFilter::new(&[], &["(".to_string()]).unwrap_err();
        assert!(matches!(err, PrdiffError::ConfigError(_)));
    }
}
