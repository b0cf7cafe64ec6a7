//! Implementation of the `prdiff assemble` command.

use super::{assemble_files, format_result, load_config};
use crate::assemble::AssemblyResult;
use crate::change::git_source::collect_changes;
use crate::cli::AssembleArgs;
use crate::error::{PrdiffError, Result};
use crate::git::get_repo_root;
use tracing::info;

/// Execute the `prdiff assemble` command.
pub fn cmd_assemble(args: AssembleArgs) -> Result<()> {
    let result = assemble_repo(&args)?;
    println!("{}", format_result(&result, args.render.json)?);
    Ok(())
}

/// Collect the changes between the two revisions and assemble them.
pub(super) fn assemble_repo(args: &AssembleArgs) -> Result<AssemblyResult> {
    let cwd = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir().map_err(|e| {
            PrdiffError::UserError(format!("failed to read current directory: {}", e))
        })?,
    };
    let repo_root = get_repo_root(&cwd)?;
    let config = load_config(&args.render, Some(&repo_root))?;

    let changes = collect_changes(&repo_root, &args.base, &args.head)?;
    info!(
        base = %args.base,
        head = %args.head,
        files = changes.len(),
        "collected changes"
    );

    assemble_files(&config, changes, args.render.prompt_tokens)
}
