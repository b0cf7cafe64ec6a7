//! prdiff: token-budgeted pull request diffs for LLM review prompts.
//!
//! The library holds the diff pipeline (hunk parsing, context extension,
//! rendering and budgeted assembly) together with the git and config
//! plumbing used by the `prdiff` binary.

pub mod assemble;
pub mod change;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod exit_codes;
pub mod filter;
pub mod git;
pub mod logging;
pub mod tokens;

#[cfg(test)]
mod test_support;
