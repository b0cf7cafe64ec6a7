//! prdiff: token-budgeted pull request diffs for LLM review prompts.
//!
//! This is the main entry point for the `prdiff` CLI. It parses arguments,
//! installs logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

use prdiff::cli::Cli;
use prdiff::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_tracing(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
