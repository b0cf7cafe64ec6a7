//! Error types for prdiff.
//!
//! Two layers of errors live here:
//! - Per-file errors ([`ParseError`], [`EncodingError`], [`FileError`]) raised by the
//!   diff pipeline. These are always recoverable: the assembler catches them at the
//!   file boundary and reports the file as skipped.
//! - Application errors ([`PrdiffError`]) surfaced by the CLI, each mapped to an exit code.

use crate::exit_codes;
use std::fmt;
use thiserror::Error;

/// Failure to parse a unified-diff hunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line starting with `@@` did not match `@@ -a[,b] +c[,d] @@ [section]`.
    #[error("malformed hunk header: '{line}'")]
    MalformedHeader { line: String },
}

/// Which side of a change a piece of content belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSide {
    Original,
    New,
}

impl fmt::Display for ContentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSide::Original => f.write_str("original"),
            ContentSide::New => f.write_str("new"),
        }
    }
}

/// File content could not be decoded as UTF-8.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{side} content of '{filename}' is not valid UTF-8")]
pub struct EncodingError {
    pub filename: String,
    pub side: ContentSide,
}

/// Any reason a single file drops out of assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Main error type for prdiff operations.
#[derive(Error, Debug)]
pub enum PrdiffError {
    /// User provided invalid arguments or input.
    #[error("{0}")]
    UserError(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),
}

impl PrdiffError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PrdiffError::UserError(_) => exit_codes::USER_ERROR,
            PrdiffError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            PrdiffError::GitError(_) => exit_codes::GIT_FAILURE,
        }
    }
}

/// Result type alias for prdiff operations.
pub type Result<T> = std::result::Result<T, PrdiffError>;
