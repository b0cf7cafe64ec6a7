//! Structured representation of unified-diff hunks.
//!
//! A patch is parsed once into [`Hunk`] values and every later stage
//! (extension, minimization, rendering) works on those values instead of
//! editing patch text in place.

use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)?(?:,(\d+))? @@ ?(.*)$")
        .expect("hunk header regex is valid")
});

/// Kind of a single line inside a hunk body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    /// The unified-diff prefix character for this kind.
    pub fn prefix(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

/// One body line of a hunk, without its prefix character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    pub fn context(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Context,
            text: text.into(),
        }
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Added,
            text: text.into(),
        }
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Removed,
            text: text.into(),
        }
    }

    /// The line as it appears in a patch (prefix + text).
    pub fn to_patch_line(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.text)
    }

    /// Whether the line exists in the old file (context or removed).
    pub fn in_old(&self) -> bool {
        self.kind != LineKind::Added
    }

    /// Whether the line exists in the new file (context or added).
    pub fn in_new(&self) -> bool {
        self.kind != LineKind::Removed
    }
}

/// One `@@ ... @@` region of a unified diff.
///
/// Counts are taken from the header as written; the body is not used to
/// correct them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    /// Text after the closing `@@` (usually the enclosing function signature).
    pub header_comment: String,
    pub lines: Vec<DiffLine>,
    /// Header line exactly as parsed. Cleared when a hunk is rebuilt.
    raw_header: Option<String>,
}

impl Hunk {
    /// Build a hunk with a computed header.
    pub fn new(
        old_start: usize,
        old_count: usize,
        new_start: usize,
        new_count: usize,
        header_comment: impl Into<String>,
        lines: Vec<DiffLine>,
    ) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            header_comment: header_comment.into(),
            lines,
            raw_header: None,
        }
    }

    /// The header line: verbatim when parsed, recomputed otherwise.
    pub fn header(&self) -> String {
        match &self.raw_header {
            Some(raw) => raw.clone(),
            None => self.formatted_header(),
        }
    }

    /// The header line recomputed from the numeric fields.
    pub fn formatted_header(&self) -> String {
        let mut header = format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        );
        if !self.header_comment.is_empty() {
            header.push(' ');
            header.push_str(&self.header_comment);
        }
        header
    }

    /// Whether the hunk contains at least one added line.
    pub fn has_additions(&self) -> bool {
        self.lines.iter().any(|l| l.kind == LineKind::Added)
    }

    /// First old-file line at or after this hunk (1-based).
    ///
    /// A hunk with `old_count == 0` is positioned *after* line `old_start`.
    /// A non-empty range never starts before line 1, even when the header
    /// says `-0,N`.
    pub(crate) fn old_first(&self) -> usize {
        if self.old_count == 0 {
            self.old_start + 1
        } else {
            self.old_start.max(1)
        }
    }

    /// First old-file line after this hunk (1-based, exclusive end).
    pub(crate) fn old_end(&self) -> usize {
        self.old_first() + self.old_count
    }

    /// First new-file line at or after this hunk (1-based).
    pub(crate) fn new_first(&self) -> usize {
        if self.new_count == 0 {
            self.new_start + 1
        } else {
            self.new_start.max(1)
        }
    }

    /// Append this hunk in patch form to `out`, one line per entry.
    pub(crate) fn write_patch(&self, out: &mut Vec<String>) {
        out.push(self.header());
        out.extend(self.lines.iter().map(DiffLine::to_patch_line));
    }
}

/// Convert a 1-based start position back into header form for a given count.
pub(crate) fn header_start(first: usize, count: usize) -> usize {
    if count == 0 {
        first.saturating_sub(1)
    } else {
        first
    }
}

/// All hunks of one file's patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPatch {
    pub filename: String,
    pub hunks: Vec<Hunk>,
}

impl ParsedPatch {
    /// Parse the patch text of a single file.
    pub fn parse(filename: impl Into<String>, patch_text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            filename: filename.into(),
            hunks: parse_hunks(patch_text)?,
        })
    }

    /// A new patch for the same file with different hunks.
    pub fn with_hunks(&self, hunks: Vec<Hunk>) -> Self {
        Self {
            filename: self.filename.clone(),
            hunks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Serialize the hunks back to unified-diff text (no trailing newline).
    pub fn to_patch_text(&self) -> String {
        let mut lines = Vec::new();
        for hunk in &self.hunks {
            hunk.write_patch(&mut lines);
        }
        lines.join("\n")
    }
}

/// Numeric fields and section text of a `@@ ... @@` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub comment: String,
}

/// Parse a hunk header line.
///
/// Missing counts default to 1. A missing new start is preserved as 0 and
/// then its count defaults to 0.
pub fn parse_hunk_header(line: &str) -> Result<HunkHeader, ParseError> {
    let malformed = || ParseError::MalformedHeader {
        line: line.to_string(),
    };
    let caps = HUNK_HEADER_RE.captures(line).ok_or_else(malformed)?;

    let number = |idx: usize| -> Result<Option<usize>, ParseError> {
        caps.get(idx)
            .map(|m| m.as_str().parse::<usize>().map_err(|_| malformed()))
            .transpose()
    };

    let old_start = number(1)?.ok_or_else(malformed)?;
    let old_count = number(2)?.unwrap_or(1);
    let (new_start, new_count) = match number(3)? {
        Some(start) => (start, number(4)?.unwrap_or(1)),
        None => (0, number(4)?.unwrap_or(0)),
    };
    let comment = caps
        .get(5)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Ok(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
        comment,
    })
}

/// Parse all hunks in `patch_text`.
///
/// Lines before the first `@@` header (`diff --git`, `---`, `+++`, `index`)
/// are ignored. The `\ No newline at end of file` marker is dropped.
pub fn parse_hunks(patch_text: &str) -> Result<Vec<Hunk>, ParseError> {
    let mut hunks: Vec<Hunk> = Vec::new();

    for line in patch_text.lines() {
        if line.starts_with("@@") {
            let header = parse_hunk_header(line)?;
            let mut hunk = Hunk::new(
                header.old_start,
                header.old_count,
                header.new_start,
                header.new_count,
                header.comment,
                Vec::new(),
            );
            hunk.raw_header = Some(line.to_string());
            hunks.push(hunk);
            continue;
        }

        // Preamble before the first hunk
        let Some(current) = hunks.last_mut() else {
            continue;
        };

        if line.starts_with('\\') {
            continue;
        }

        let diff_line = if let Some(text) = line.strip_prefix('+') {
            DiffLine::added(text)
        } else if let Some(text) = line.strip_prefix('-') {
            DiffLine::removed(text)
        } else if let Some(text) = line.strip_prefix(' ') {
            DiffLine::context(text)
        } else {
            DiffLine::context(line)
        };
        current.lines.push(diff_line);
    }

    Ok(hunks)
}
