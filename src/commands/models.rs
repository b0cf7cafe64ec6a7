//! Implementation of the `prdiff models` command.

use crate::error::Result;
use crate::tokens::MODEL_TOKEN_LIMITS;

/// Execute the `prdiff models` command.
pub fn cmd_models() -> Result<()> {
    print!("{}", models_table());
    Ok(())
}

/// One `model  limit` line per built-in model, sorted by name.
pub(super) fn models_table() -> String {
    let mut models: Vec<(&str, usize)> = MODEL_TOKEN_LIMITS.to_vec();
    models.sort_unstable_by_key(|(name, _)| *name);

    let width = models.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    models
        .iter()
        .map(|(name, limit)| format!("{:<width$}  {}\n", name, limit, width = width))
        .collect()
}
