//! CLI argument parsing for prdiff.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// prdiff: Token-budgeted pull request diffs for LLM review prompts.
///
/// Changed files are extended with context, rendered and packed into a
/// single diff that fits the model's token limit, dropping detail in a
/// fixed priority order when it does not.
#[derive(Parser, Debug)]
#[command(name = "prdiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for prdiff.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble the diff between two revisions of a local repository.
    ///
    /// Both versions of every changed file are read from git, so hunks can
    /// be extended with surrounding context.
    Assemble(AssembleArgs),

    /// Assemble a multi-file unified diff read from stdin.
    ///
    /// File contents are unknown in this mode, so hunks are not extended.
    Patch(PatchArgs),

    /// Count the tokens of text read from stdin.
    Count(CountArgs),

    /// Find a line of a diff read from stdin, as needed for inline comments.
    ///
    /// Prints the line's position in the file's patch and its line number in
    /// the new file.
    Locate(LocateArgs),

    /// List the built-in model token limits.
    Models,
}

/// Options shared by the commands that assemble a diff.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Configuration file (default: .prdiff.yaml at the repository root).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model whose token limit and tokenizer are used.
    #[arg(long)]
    pub model: Option<String>,

    /// Tokens already used by the rest of the prompt.
    #[arg(long, default_value_t = 0)]
    pub prompt_tokens: usize,

    /// Render hunks with absolute new-file line numbers.
    #[arg(long)]
    pub line_numbers: bool,

    /// Do not extend hunks with surrounding context.
    #[arg(long)]
    pub no_context: bool,

    /// Print the full result as JSON instead of the diff text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `assemble` command.
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Base revision (the pull request's target).
    #[arg(long)]
    pub base: String,

    /// Head revision (the pull request's source).
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Repository directory (default: current directory).
    #[arg(long)]
    pub repo: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Arguments for the `patch` command.
#[derive(Args, Debug)]
pub struct PatchArgs {
    #[command(flatten)]
    pub render: RenderArgs,
}

/// Arguments for the `count` command.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Model whose tokenizer is used.
    #[arg(long, default_value = "gpt-4")]
    pub model: String,

    /// Print the text clipped to this many tokens instead of the count.
    #[arg(long)]
    pub clip: Option<usize>,
}

/// Arguments for the `locate` command.
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// File whose patch is searched.
    #[arg(long)]
    pub file: String,

    /// Text of the line to find.
    #[arg(long)]
    pub line: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
