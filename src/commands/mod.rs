//! Command implementations for prdiff.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the steps shared by the commands that assemble a
//! diff: config resolution, filtering, assembly and output formatting.

mod assemble;
mod count;
mod locate;
mod models;
mod patch;


use crate::assemble::{AssemblyResult, DiffAssembler};
use crate::change::FileChange;
use crate::cli::{Command, RenderArgs};
use crate::config::Config;
use crate::error::{PrdiffError, Result};
use crate::filter::FileFilter;
use crate::tokens::counter_for_model;
use std::path::Path;
use tracing::info;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Assemble(args) => assemble::cmd_assemble(args),
        Command::Patch(args) => patch::cmd_patch(args),
        Command::Count(args) => count::cmd_count(args),
        Command::Locate(args) => locate::cmd_locate(args),
        Command::Models => models::cmd_models(),
    }
}

// ============================================================================
// Shared steps
// ============================================================================

/// Resolve the configuration and apply command-line overrides.
fn load_config(render: &RenderArgs, repo_root: Option<&Path>) -> Result<Config> {
    let mut config = Config::discover(render.config.as_deref(), repo_root)?;

    if let Some(model) = &render.model {
        config.model = model.clone();
    }
    if render.line_numbers {
        config.line_numbers = true;
    }
    if render.no_context {
        config.context_lines_before = 0;
        config.context_lines_after = 0;
    }

    Ok(config)
}

/// Filter and assemble `files` under `config`.
fn assemble_files(
    config: &Config,
    files: Vec<FileChange>,
    prompt_tokens: usize,
) -> Result<AssemblyResult> {
    let filter = FileFilter::from_config(config)?;
    let total = files.len();
    let mut files = filter.apply(files);
    if files.len() != total {
        info!(ignored = total - files.len(), "files dropped by ignore patterns");
    }

    let options = config.assembly_options()?;
    let assembler = DiffAssembler::new(options, counter_for_model(&config.model))?;
    let result = assembler.assemble(&mut files, prompt_tokens);

    info!(
        model = %config.model,
        files = files.len(),
        total_tokens = result.total_tokens,
        compressed = result.compressed,
        "diff assembled"
    );
    Ok(result)
}

/// The text printed for an assembly result.
fn format_result(result: &AssemblyResult, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(result)
            .map_err(|e| PrdiffError::UserError(format!("failed to serialize result: {}", e)))
    } else {
        Ok(result.rendered_text.clone())
    }
}

fn read_stdin() -> Result<String> {
    std::io::read_to_string(std::io::stdin())
        .map_err(|e| PrdiffError::UserError(format!("failed to read stdin: {}", e)))
}
