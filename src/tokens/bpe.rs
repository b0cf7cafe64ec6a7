//! Byte-pair encoders from `tiktoken-rs`.
//!
//! GPT models use their own encoding. Every other model, and any GPT name
//! `tiktoken-rs` does not know, is counted with `cl100k_base`.

use super::TokenCounter;
use crate::error::{PrdiffError, Result};
use tiktoken_rs::{CoreBPE, cl100k_base, get_bpe_from_model};
use tracing::debug;

/// Encoding used for models without one of their own.
pub const FALLBACK_ENCODING: &str = "cl100k_base";

/// Exact token counts from a BPE encoding.
pub struct BpeCounter {
    encoding: String,
    bpe: CoreBPE,
}

impl BpeCounter {
    /// The encoder for `model`.
    ///
    /// Returns an error only when even the fallback encoding cannot be loaded.
    pub fn for_model(model: &str) -> Result<Self> {
        if model.contains("gpt") {
            match get_bpe_from_model(model) {
                Ok(bpe) => {
                    return Ok(Self {
                        encoding: model.to_string(),
                        bpe,
                    });
                }
                Err(e) => debug!(model, error = %e, "no encoding for model, using fallback"),
            }
        }

        let bpe = cl100k_base().map_err(|e| {
            PrdiffError::UserError(format!("failed to load {}: {}", FALLBACK_ENCODING, e))
        })?;
        Ok(Self {
            encoding: FALLBACK_ENCODING.to_string(),
            bpe,
        })
    }

    /// Model or encoding name the counter was built from.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl TokenCounter for BpeCounter {
    fn count_tokens(&self, text: &str) -> usize {
        // Special-token text is counted as ordinary text
        self.bpe.encode_ordinary(text).len()
    }
}
