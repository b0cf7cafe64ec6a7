//! Implementation of the `prdiff count` command.

use super::read_stdin;
use crate::cli::CountArgs;
use crate::error::Result;
use crate::tokens::{clip_tokens, counter_for_model};

/// Execute the `prdiff count` command.
pub fn cmd_count(args: CountArgs) -> Result<()> {
    let input = read_stdin()?;
    println!("{}", count_output(&args, &input));
    Ok(())
}

/// The token count of `text`, or `text` clipped when `--clip` is given.
pub(super) fn count_output(args: &CountArgs, text: &str) -> String {
    let counter = counter_for_model(&args.model);
    match args.clip {
        Some(max_tokens) => clip_tokens(counter.as_ref(), text, max_tokens),
        None => counter.count_tokens(text).to_string(),
    }
}
