//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::CONFIG_FILE_NAME;
use crate::assemble::AssemblyOptions;
use crate::error::{PrdiffError, Result};
use crate::tokens::resolve_token_limit;
use globset::Glob;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PrdiffError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PrdiffError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Find and load the configuration for a run.
    ///
    /// An explicit path wins. Otherwise `.prdiff.yaml` at `repo_root` is used
    /// when it exists, and defaults apply when it does not.
    pub fn discover(explicit: Option<&Path>, repo_root: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        if let Some(path) = repo_root.map(Self::repo_config_path)
            && path.is_file()
        {
            debug!(path = %path.display(), "loading repository config");
            return Self::load(path);
        }

        debug!("no config file, using defaults");
        Ok(Self::default())
    }

    /// Path of the repository-level config file.
    pub fn repo_config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_FILE_NAME)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PrdiffError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PrdiffError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `model` must be non-empty
    /// - `model_token_limits` values must be positive
    /// - `no_extend_suffixes` entries must be non-empty
    /// - every `ignore_globs` and `ignore_regex` entry must compile
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PrdiffError::ConfigError("model must not be empty".to_string()));
        }

        for (model, limit) in &self.model_token_limits {
            if *limit == 0 {
                return Err(PrdiffError::ConfigError(format!(
                    "model_token_limits entry '{}' must be greater than 0",
                    model
                )));
            }
        }

        if self.no_extend_suffixes.iter().any(|s| s.is_empty()) {
            return Err(PrdiffError::ConfigError(
                "no_extend_suffixes entries must be non-empty".to_string(),
            ));
        }

        for pattern in &self.ignore_globs {
            Glob::new(pattern).map_err(|e| {
                PrdiffError::ConfigError(format!(
                    "invalid glob in ignore_globs: '{}' - {}",
                    pattern, e
                ))
            })?;
        }

        for pattern in &self.ignore_regex {
            Regex::new(pattern).map_err(|e| {
                PrdiffError::ConfigError(format!(
                    "invalid regex in ignore_regex: '{}' - {}",
                    pattern, e
                ))
            })?;
        }

        Ok(())
    }

    /// Token limit of the configured model.
    pub fn token_limit(&self) -> Result<usize> {
        resolve_token_limit(&self.model, &self.model_token_limits, self.max_model_tokens)
    }

    /// Assembler options for the configured model.
    ///
    /// Fails with a user error when the model is unknown or the reserves do
    /// not fit below its limit.
    pub fn assembly_options(&self) -> Result<AssemblyOptions> {
        let options = AssemblyOptions {
            limit: self.token_limit()?,
            context_before: self.context_lines_before,
            context_after: self.context_lines_after,
            soft_reserve: self.soft_reserve_tokens,
            hard_reserve: self.hard_reserve_tokens,
            line_numbers: self.line_numbers,
            no_extend_suffixes: self.no_extend_suffixes.clone(),
        };
        options.validate()?;
        Ok(options)
    }
}
