//! Diff patch processing.
//!
//! This module turns raw unified-diff patches into structured hunks and back
//! into prompt-ready text:
//! - [`hunk`]: parse `@@ -a,b +c,d @@` hunks into [`Hunk`] values
//! - [`extend`]: widen hunks with context from the original file
//! - [`minimize`]: drop deletion-only hunks, or reduce a file to its name
//! - [`render`]: plain and line-numbered renderings
//! - [`reconstruct`]: LCS diff for files whose patch is missing
//! - [`locate`]: map a quoted line back to its patch position
//!
//! Every absolute line number produced here must equal what replaying the
//! patch against the original content would give.

pub mod extend;
pub mod hunk;
pub mod locate;
pub mod minimize;
pub mod reconstruct;
pub mod render;


// Re-export public API
pub use extend::extend_hunks;
pub use hunk::{DiffLine, Hunk, HunkHeader, LineKind, ParsedPatch, parse_hunk_header, parse_hunks};
pub use locate::{LineLocation, locate_line};
pub use minimize::{minimize, omit_deletion_hunks};
pub use reconstruct::reconstruct_patch;
pub use render::{render_numbered, render_plain};
