//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for diff assembly.
///
/// This struct represents the contents of `.prdiff.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Model settings
    // =========================================================================
    /// Model identifier used for the token limit and the token counter.
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional cap on the model's token limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_model_tokens: Option<usize>,

    /// Per-model token limits overriding or extending the built-in table.
    #[serde(default)]
    pub model_token_limits: BTreeMap<String, usize>,

    // =========================================================================
    // Rendering settings
    // =========================================================================
    /// Unchanged lines added before each hunk.
    #[serde(default = "default_context_lines")]
    pub context_lines_before: usize,

    /// Unchanged lines added after each hunk.
    #[serde(default = "default_context_lines")]
    pub context_lines_after: usize,

    /// Render hunks with absolute new-file line numbers.
    #[serde(default)]
    pub line_numbers: bool,

    /// File name suffixes that are never extended with context.
    #[serde(default)]
    pub no_extend_suffixes: Vec<String>,

    // =========================================================================
    // Budget settings
    // =========================================================================
    /// Tokens kept free below the limit when admitting a file.
    #[serde(default = "default_soft_reserve_tokens")]
    pub soft_reserve_tokens: usize,

    /// Tokens below the limit at which compression stops.
    #[serde(default = "default_hard_reserve_tokens")]
    pub hard_reserve_tokens: usize,

    // =========================================================================
    // File filter settings
    // =========================================================================
    /// Glob patterns of files dropped before assembly.
    #[serde(default)]
    pub ignore_globs: Vec<String>,

    /// Regex patterns (matched at the start of the path) of files dropped before assembly.
    #[serde(default)]
    pub ignore_regex: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_model_tokens: None,
            model_token_limits: BTreeMap::new(),
            context_lines_before: default_context_lines(),
            context_lines_after: default_context_lines(),
            line_numbers: false,
            no_extend_suffixes: Vec::new(),
            soft_reserve_tokens: default_soft_reserve_tokens(),
            hard_reserve_tokens: default_hard_reserve_tokens(),
            ignore_globs: Vec::new(),
            ignore_regex: Vec::new(),
        }
    }
}
