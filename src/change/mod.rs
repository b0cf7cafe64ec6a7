//! Changed-file records consumed by the diff pipeline.
//!
//! A [`FileChange`] is what a git provider hands over for one file: both
//! versions of the content (when known), the unified-diff patch (possibly
//! empty) and the kind of edit. The assembler only reads these records and
//! writes back the measured `token_count`.

pub mod git_source;
pub mod unified;

use crate::error::{ContentSide, EncodingError};
use serde::Serialize;

/// Kind of edit a file underwent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Added,
    Deleted,
    Modified,
    Renamed,
}

impl EditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditKind::Added => "added",
            EditKind::Deleted => "deleted",
            EditKind::Modified => "modified",
            EditKind::Renamed => "renamed",
        }
    }

    /// Map a `git diff --name-status` letter (`A`, `D`, `M`, `R100`, ...).
    pub fn from_status(status: &str) -> Option<Self> {
        match status.chars().next()? {
            'A' => Some(EditKind::Added),
            'D' => Some(EditKind::Deleted),
            'M' | 'T' => Some(EditKind::Modified),
            'R' => Some(EditKind::Renamed),
            _ => None,
        }
    }
}

/// One changed file of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub filename: String,
    /// Previous path, set only for renames.
    pub old_filename: Option<String>,
    /// Content before the change; `None` when the provider did not supply it.
    pub original_content: Option<Vec<u8>>,
    /// Content after the change; `None` when the provider did not supply it.
    pub new_content: Option<Vec<u8>>,
    /// Unified-diff patch for this file, possibly empty.
    pub raw_patch: String,
    pub edit_kind: EditKind,
    /// Tokens of the extended rendering, set during assembly.
    pub token_count: Option<usize>,
}

impl FileChange {
    pub fn new(filename: impl Into<String>, edit_kind: EditKind) -> Self {
        Self {
            filename: filename.into(),
            old_filename: None,
            original_content: None,
            new_content: None,
            raw_patch: String::new(),
            edit_kind,
            token_count: None,
        }
    }

    pub fn with_patch(mut self, patch: impl Into<String>) -> Self {
        self.raw_patch = patch.into();
        self
    }

    pub fn with_contents(mut self, original: impl Into<Vec<u8>>, new: impl Into<Vec<u8>>) -> Self {
        self.original_content = Some(original.into());
        self.new_content = Some(new.into());
        self
    }

    pub fn renamed_from(mut self, old_filename: impl Into<String>) -> Self {
        self.old_filename = Some(old_filename.into());
        self
    }

    /// Original content as text; `Ok(None)` when it was not supplied.
    pub fn original_text(&self) -> Result<Option<&str>, EncodingError> {
        self.decode(self.original_content.as_deref(), ContentSide::Original)
    }

    /// New content as text; `Ok(None)` when it was not supplied.
    pub fn new_text(&self) -> Result<Option<&str>, EncodingError> {
        self.decode(self.new_content.as_deref(), ContentSide::New)
    }

    /// Whether the new content is known to be empty.
    pub fn new_content_is_empty(&self) -> bool {
        self.new_content.as_ref().is_some_and(|c| c.is_empty())
    }

    fn decode<'a>(
        &self,
        bytes: Option<&'a [u8]>,
        side: ContentSide,
    ) -> Result<Option<&'a str>, EncodingError> {
        bytes
            .map(|b| {
                std::str::from_utf8(b).map_err(|_| EncodingError {
                    filename: self.filename.clone(),
                    side,
                })
            })
            .transpose()
    }
}
