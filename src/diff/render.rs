//! Rendering patches into the text handed to the model.
//!
//! Two layouts exist:
//! - plain: the file name followed by the unified-diff hunks,
//! - line-numbered: each hunk split into a `__new hunk__` section whose lines
//!   carry absolute new-file line numbers and an `__old hunk__` section with
//!   the lines of the old version.
//!
//! Example of the line-numbered layout:
//!
//! ```text
//! ## src/file.ts
//!
//! @@ -880,6 +881,7 @@ fn main()
//! __new hunk__
//! 881  line1
//! 882 +line2
//! 883  line3
//! __old hunk__
//!  line1
//! -line2 old
//!  line3
//! ```

use super::hunk::Hunk;

pub const NEW_HUNK_LABEL: &str = "__new hunk__";
pub const OLD_HUNK_LABEL: &str = "__old hunk__";

/// Render hunks as `## filename` followed by the patch text.
pub fn render_plain(hunks: &[Hunk], filename: &str) -> String {
    let mut out = format!("## {}\n", filename);
    if hunks.is_empty() {
        return out;
    }
    out.push('\n');
    for hunk in hunks {
        out.push_str(&hunk.header());
        out.push('\n');
        for line in &hunk.lines {
            out.push_str(&line.to_patch_line());
            out.push('\n');
        }
    }
    out
}

/// Render hunks with absolute new-file line numbers and separate old/new sections.
///
/// New-side numbering starts at the hunk's `new_start` and advances by one
/// per context or added line. A section is omitted when it has no lines.
pub fn render_numbered(hunks: &[Hunk], filename: &str) -> String {
    let mut out = format!("## {}\n", filename);

    for hunk in hunks {
        out.push('\n');
        out.push_str(&hunk.header());
        out.push('\n');

        let mut line_no = hunk.new_start;
        let mut new_section = Vec::new();
        let mut old_section = Vec::new();
        for line in &hunk.lines {
            if line.in_new() {
                new_section.push(format!("{} {}", line_no, line.to_patch_line()));
                line_no += 1;
            }
            if line.in_old() {
                old_section.push(line.to_patch_line());
            }
        }

        if !new_section.is_empty() {
            out.push_str(NEW_HUNK_LABEL);
            out.push('\n');
            for entry in new_section {
                out.push_str(&entry);
                out.push('\n');
            }
        }
        if !old_section.is_empty() {
            out.push_str(OLD_HUNK_LABEL);
            out.push('\n');
            for entry in old_section {
                out.push_str(&entry);
                out.push('\n');
            }
        }
    }

    out
}
