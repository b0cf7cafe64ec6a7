//! Token counting.
//!
//! The assembler only depends on the [`TokenCounter`] trait. Counters are
//! built once per model and shared through [`TokenizerRegistry`], so many
//! assembly runs can count concurrently without rebuilding anything.
//!
//! Registry counters are `tiktoken-rs` encoders ([`BpeCounter`]). The
//! [`HeuristicCounter`] is only used when no encoding can be loaded.

pub mod bpe;
pub mod heuristic;
pub mod models;


pub use bpe::{BpeCounter, FALLBACK_ENCODING};
pub use heuristic::{HeuristicCounter, TokenProfile, profile_for_model};
pub use models::{MODEL_TOKEN_LIMITS, builtin_limit, resolve_token_limit};

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};
use tracing::{debug, warn};

/// Counts model tokens in a piece of text.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> usize {
        self(text)
    }
}

/// Cache of counters keyed by model name.
pub struct TokenizerRegistry {
    counters: RwLock<HashMap<String, Arc<dyn TokenCounter>>>,
}

impl TokenizerRegistry {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// The shared counter for `model`, building it on first use.
    ///
    /// Building happens under the write lock, so a given model's counter is
    /// constructed by exactly one thread.
    pub fn counter_for(&self, model: &str) -> Arc<dyn TokenCounter> {
        {
            let counters = self.counters.read().unwrap_or_else(|p| p.into_inner());
            if let Some(counter) = counters.get(model) {
                return Arc::clone(counter);
            }
        }

        let mut counters = self.counters.write().unwrap_or_else(|p| p.into_inner());
        let counter = counters
            .entry(model.to_string())
            .or_insert_with(|| build_counter(model));
        Arc::clone(counter)
    }

    /// Number of models with a built counter.
    pub fn len(&self) -> usize {
        self.counters.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn build_counter(model: &str) -> Arc<dyn TokenCounter> {
    match BpeCounter::for_model(model) {
        Ok(counter) => {
            debug!(model, encoding = counter.encoding(), "built token counter");
            Arc::new(counter)
        }
        Err(e) => {
            warn!(model, error = %e, "no BPE encoding available, estimating tokens");
            Arc::new(HeuristicCounter::for_model(model))
        }
    }
}

static REGISTRY: LazyLock<TokenizerRegistry> = LazyLock::new(TokenizerRegistry::new);

/// The process-wide shared counter for `model`.
pub fn counter_for_model(model: &str) -> Arc<dyn TokenCounter> {
    REGISTRY.counter_for(model)
}

/// Share of the estimated characters kept when clipping.
const CLIP_SAFETY_FACTOR: f64 = 0.9;

pub const TRUNCATION_MARKER: &str = "\n...(truncated)";

/// Shorten `text` to roughly `max_tokens` tokens.
///
/// The cut point is estimated from the text's average characters per token
/// with a 10% margin and then moved back to a line boundary. The truncation
/// marker is appended when anything was cut.
pub fn clip_tokens(counter: &dyn TokenCounter, text: &str, max_tokens: usize) -> String {
    let total = counter.count_tokens(text);
    if total <= max_tokens {
        return text.to_string();
    }

    let chars = text.chars().count();
    let chars_per_token = chars as f64 / total as f64;
    let keep = (CLIP_SAFETY_FACTOR * chars_per_token * max_tokens as f64) as usize;
    if keep == 0 {
        return String::new();
    }

    let clipped: String = text.chars().take(keep).collect();
    let clipped = match clipped.rfind('\n') {
        Some(pos) => &clipped[..pos],
        None => clipped.as_str(),
    };
    format!("{}{}", clipped, TRUNCATION_MARKER)
}
