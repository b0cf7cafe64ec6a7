//! Implementation of the `prdiff locate` command.

use super::read_stdin;
use crate::change::unified::split_unified_diff;
use crate::cli::LocateArgs;
use crate::diff::{LineLocation, locate_line};
use crate::error::{PrdiffError, Result};

/// Execute the `prdiff locate` command.
pub fn cmd_locate(args: LocateArgs) -> Result<()> {
    let input = read_stdin()?;
    let location = locate_in_diff(&args, &input)?;
    println!("{} {}", location.position, location.absolute_line);
    Ok(())
}

pub(super) fn locate_in_diff(args: &LocateArgs, text: &str) -> Result<LineLocation> {
    let files = split_unified_diff(text);
    locate_line(&files, &args.file, &args.line).ok_or_else(|| {
        PrdiffError::UserError(format!(
            "line '{}' not found in the patch of '{}'",
            args.line, args.file
        ))
    })
}
