//! Configuration constants and default value functions.

/// File name looked up at the repository root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".prdiff.yaml";

/// Lines of unchanged context added around each hunk.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Tokens kept free for the model's answer when deciding whether a file fits.
pub const DEFAULT_SOFT_RESERVE_TOKENS: usize = 1000;

/// Tokens below the limit at which the compressing pass stops entirely.
pub const DEFAULT_HARD_RESERVE_TOKENS: usize = 600;

pub fn default_model() -> String {
    "gpt-4".to_string()
}

pub fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

pub fn default_soft_reserve_tokens() -> usize {
    DEFAULT_SOFT_RESERVE_TOKENS
}

pub fn default_hard_reserve_tokens() -> usize {
    DEFAULT_HARD_RESERVE_TOKENS
}
