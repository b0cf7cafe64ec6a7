//! Exit code constants for the prdiff CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown model, unreadable input)
//! - 2: Configuration error (invalid config file or values)
//! - 3: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown model, or unreadable input.
pub const USER_ERROR: i32 = 1;

/// Configuration error: the config file could not be read, parsed, or validated.
pub const CONFIG_ERROR: i32 = 2;

/// Git operation failure: a revision or path could not be read.
pub const GIT_FAILURE: i32 = 3;
