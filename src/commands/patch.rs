//! Implementation of the `prdiff patch` command.

use super::{assemble_files, format_result, load_config, read_stdin};
use crate::assemble::AssemblyResult;
use crate::change::unified::split_unified_diff;
use crate::cli::{PatchArgs, RenderArgs};
use crate::error::Result;
use crate::git::get_repo_root;
use std::path::Path;
use tracing::warn;

/// Execute the `prdiff patch` command.
pub fn cmd_patch(args: PatchArgs) -> Result<()> {
    let input = read_stdin()?;
    // Only used to find .prdiff.yaml, so running outside a repository is fine
    let repo_root = std::env::current_dir()
        .ok()
        .and_then(|cwd| get_repo_root(cwd).ok());

    let result = assemble_patch_text(&args.render, repo_root.as_deref(), &input)?;
    println!("{}", format_result(&result, args.render.json)?);
    Ok(())
}

/// Split a multi-file diff and assemble it.
pub(super) fn assemble_patch_text(
    render: &RenderArgs,
    repo_root: Option<&Path>,
    text: &str,
) -> Result<AssemblyResult> {
    let config = load_config(render, repo_root)?;

    let changes = split_unified_diff(text);
    if changes.is_empty() {
        warn!("input contains no 'diff --git' sections");
    }

    assemble_files(&config, changes, render.prompt_tokens)
}
