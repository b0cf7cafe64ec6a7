//! Context-window sizes of known models.

use crate::error::{PrdiffError, Result};
use std::collections::BTreeMap;

/// Built-in `model -> max tokens` table.
pub const MODEL_TOKEN_LIMITS: &[(&str, usize)] = &[
    ("text-embedding-ada-002", 8_000),
    ("gpt-3.5-turbo", 16_000),
    ("gpt-3.5-turbo-0125", 16_000),
    ("gpt-3.5-turbo-0613", 4_000),
    ("gpt-3.5-turbo-1106", 16_000),
    ("gpt-3.5-turbo-16k", 16_000),
    ("gpt-4", 8_000),
    ("gpt-4-0613", 8_000),
    ("gpt-4-32k", 32_000),
    ("gpt-4-1106-preview", 128_000),
    ("gpt-4-0125-preview", 128_000),
    ("gpt-4-turbo", 128_000),
    ("gpt-4-turbo-preview", 128_000),
    ("gpt-4o", 128_000),
    ("gpt-4o-2024-05-13", 128_000),
    ("claude-instant-1", 100_000),
    ("claude-2", 100_000),
    ("anthropic/claude-3-opus-20240229", 100_000),
    ("anthropic/claude-3-5-sonnet-20240620", 100_000),
    ("bedrock/anthropic.claude-v2", 100_000),
    ("bedrock/anthropic.claude-3-sonnet-20240229-v1:0", 100_000),
    ("bedrock/anthropic.claude-3-haiku-20240307-v1:0", 100_000),
    ("bedrock/anthropic.claude-3-5-sonnet-20240620-v1:0", 100_000),
    ("vertex_ai/claude-3-5-sonnet@20240620", 100_000),
    ("vertex_ai/gemini-1.5-pro", 1_048_576),
    ("codechat-bison", 6_144),
    ("codechat-bison-32k", 32_000),
    ("command-nightly", 4_096),
    ("groq/llama3-8b-8192", 8_192),
    ("groq/llama3-70b-8192", 8_192),
    ("ollama/llama3", 4_096),
];

/// Look up a model in the built-in table.
pub fn builtin_limit(model: &str) -> Option<usize> {
    MODEL_TOKEN_LIMITS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, limit)| *limit)
}

/// Resolve the token limit for `model`.
///
/// `overrides` take precedence over the built-in table. The result is capped
/// by `cap` when one is given. An unknown model is a user error.
pub fn resolve_token_limit(
    model: &str,
    overrides: &BTreeMap<String, usize>,
    cap: Option<usize>,
) -> Result<usize> {
    let limit = overrides
        .get(model)
        .copied()
        .or_else(|| builtin_limit(model))
        .ok_or_else(|| {
            PrdiffError::UserError(format!(
                "unknown model '{}': add it to model_token_limits in the configuration",
                model
            ))
        })?;

    Ok(match cap {
        Some(cap) if cap > 0 => limit.min(cap),
        _ => limit,
    })
}
