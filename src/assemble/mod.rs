//! Budgeted diff assembly.
//!
//! Turns a pull request's changed files into one prompt-ready diff that fits
//! a model's token limit. Assembly runs as a small state machine:
//!
//! - `Extended`: every file is extended with context, rendered and counted.
//!   If the total leaves the soft reserve free, that rendering is the result.
//! - `Compressing`: files are revisited largest first, without context and
//!   with deletion-only hunks dropped. Files left without code are listed as
//!   deleted, files that no longer fit are listed by name, and once the hard
//!   floor is crossed the remaining renderable files are skipped.
//! - `Done`: the result is returned.
//!
//! Per-file failures (malformed hunks, undecodable content) never abort a
//! run. The file is reported in [`AssemblyResult::fully_skipped_filenames`].


use crate::change::FileChange;
use crate::diff::{
    Hunk, ParsedPatch, extend_hunks, minimize, reconstruct_patch, render_numbered, render_plain,
};
use crate::error::{FileError, PrdiffError, Result};
use crate::tokens::TokenCounter;
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Header of the list of files too large to include.
pub const MORE_MODIFIED_FILES_HEADER: &str = "More modified files:\n";

/// Header of the list of files shown by name only because they lost all code.
pub const DELETED_FILES_HEADER: &str = "Deleted files:\n";

/// Charge for the newline after each listed filename.
pub const LIST_ENTRY_SEPARATOR_TOKENS: usize = 1;

/// Per-run settings of the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Model token limit.
    pub limit: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub soft_reserve: usize,
    pub hard_reserve: usize,
    /// Use the line-numbered renderer instead of plain patches.
    pub line_numbers: bool,
    /// Files ending with one of these are never extended.
    pub no_extend_suffixes: Vec<String>,
}

impl AssemblyOptions {
    /// Options with default context and reserves for a model limit.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            context_before: crate::config::types::DEFAULT_CONTEXT_LINES,
            context_after: crate::config::types::DEFAULT_CONTEXT_LINES,
            soft_reserve: crate::config::types::DEFAULT_SOFT_RESERVE_TOKENS,
            hard_reserve: crate::config::types::DEFAULT_HARD_RESERVE_TOKENS,
            line_numbers: false,
            no_extend_suffixes: Vec::new(),
        }
    }

    /// Check that both reserves leave room below the limit.
    pub fn validate(&self) -> Result<()> {
        if self.soft_reserve >= self.limit {
            return Err(PrdiffError::UserError(format!(
                "soft reserve of {} tokens leaves no room below the model limit of {}",
                self.soft_reserve, self.limit
            )));
        }
        if self.hard_reserve >= self.limit {
            return Err(PrdiffError::UserError(format!(
                "hard reserve of {} tokens leaves no room below the model limit of {}",
                self.hard_reserve, self.limit
            )));
        }
        Ok(())
    }

    fn extends(&self, filename: &str) -> bool {
        !self
            .no_extend_suffixes
            .iter()
            .any(|suffix| filename.ends_with(suffix.as_str()))
    }
}

/// Running token account of one assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyBudget {
    pub limit: usize,
    pub soft_reserve: usize,
    pub hard_reserve: usize,
    pub running_total: usize,
}

impl AssemblyBudget {
    pub fn new(options: &AssemblyOptions, prompt_tokens: usize) -> Self {
        Self {
            limit: options.limit,
            soft_reserve: options.soft_reserve,
            hard_reserve: options.hard_reserve,
            running_total: prompt_tokens,
        }
    }

    pub fn charge(&mut self, tokens: usize) {
        self.running_total = self.running_total.saturating_add(tokens);
    }

    /// Whether the current total still leaves the soft reserve free.
    pub fn within_soft_reserve(&self) -> bool {
        self.running_total.saturating_add(self.soft_reserve) < self.limit
    }

    /// Whether `tokens` more can be added without eating into the soft reserve.
    pub fn admits(&self, tokens: usize) -> bool {
        self.running_total.saturating_add(tokens) <= self.limit.saturating_sub(self.soft_reserve)
    }

    /// Whether the total has crossed into the hard reserve.
    pub fn past_hard_floor(&self) -> bool {
        self.running_total > self.limit.saturating_sub(self.hard_reserve)
    }
}

/// Outcome of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyResult {
    pub rendered_text: String,
    /// Files left out entirely: unparseable, undecodable, or past the hard floor.
    pub fully_skipped_filenames: Vec<String>,
    /// Files listed under "More modified files" instead of being rendered.
    pub summarized_filenames: Vec<String>,
    /// Files listed under "Deleted files".
    pub deleted_filenames: Vec<String>,
    /// Final running total, prompt tokens included.
    pub total_tokens: usize,
    /// Whether the compressing pass ran.
    pub compressed: bool,
}

enum Phase {
    Extended,
    Compressing,
    Done(AssemblyResult),
}

/// A file that made it through decoding and parsing.
#[derive(Debug)]
struct PreparedFile {
    /// Index into the caller's file list.
    index: usize,
    patch: ParsedPatch,
    original: Option<String>,
}

/// Builds the prompt diff for a list of changed files.
pub struct DiffAssembler {
    options: AssemblyOptions,
    counter: Arc<dyn TokenCounter>,
}

impl DiffAssembler {
    /// Create an assembler, rejecting reserves that do not fit the limit.
    pub fn new(options: AssemblyOptions, counter: Arc<dyn TokenCounter>) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, counter })
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Assemble `files` into one diff, starting from `prompt_tokens` already spent.
    ///
    /// Each file's `token_count` is set to the cost of its extended rendering.
    pub fn assemble(&self, files: &mut [FileChange], prompt_tokens: usize) -> AssemblyResult {
        let mut skipped = Vec::new();
        let prepared = self.prepare(files, &mut skipped);

        let mut phase = Phase::Extended;
        loop {
            phase = match phase {
                Phase::Extended => self.extended_pass(files, &prepared, prompt_tokens, &skipped),
                Phase::Compressing => {
                    self.compressing_pass(files, &prepared, prompt_tokens, &skipped)
                }
                Phase::Done(result) => return result,
            };
        }
    }

    fn prepare(&self, files: &[FileChange], skipped: &mut Vec<String>) -> Vec<PreparedFile> {
        let mut prepared = Vec::with_capacity(files.len());

        for (index, file) in files.iter().enumerate() {
            match prepare_file(index, file) {
                Ok(Some(p)) => prepared.push(p),
                Ok(None) => debug!(file = %file.filename, "no patch and no content, skipping"),
                Err(e) => {
                    warn!(file = %file.filename, error = %e, "skipping file");
                    skipped.push(file.filename.clone());
                }
            }
        }

        prepared
    }

    fn extended_pass(
        &self,
        files: &mut [FileChange],
        prepared: &[PreparedFile],
        prompt_tokens: usize,
        skipped: &[String],
    ) -> Phase {
        let mut budget = AssemblyBudget::new(&self.options, prompt_tokens);
        let mut rendered = Vec::with_capacity(prepared.len());

        for file in prepared {
            let change = &files[file.index];
            let hunks = self.extended_hunks(change, file);
            let text = self.render(&hunks, &change.filename);
            let cost = self.counter.count_tokens(&text);

            files[file.index].token_count = Some(cost);
            budget.charge(cost);
            rendered.push(text);
        }

        if budget.within_soft_reserve() {
            info!(
                total = budget.running_total,
                limit = budget.limit,
                "extended diff fits"
            );
            return Phase::Done(AssemblyResult {
                rendered_text: rendered.join("\n"),
                fully_skipped_filenames: skipped.to_vec(),
                summarized_filenames: Vec::new(),
                deleted_filenames: Vec::new(),
                total_tokens: budget.running_total,
                compressed: false,
            });
        }

        info!(
            total = budget.running_total,
            limit = budget.limit,
            "extended diff over budget, compressing"
        );
        Phase::Compressing
    }

    fn compressing_pass(
        &self,
        files: &[FileChange],
        prepared: &[PreparedFile],
        prompt_tokens: usize,
        skipped: &[String],
    ) -> Phase {
        let mut budget = AssemblyBudget::new(&self.options, prompt_tokens);
        let mut fully_skipped = skipped.to_vec();
        let mut patches = Vec::new();
        let mut summarized = Vec::new();
        let mut deleted = Vec::new();

        // Stable sort keeps caller order among equal counts.
        let mut order: Vec<&PreparedFile> = prepared.iter().collect();
        order.sort_by_key(|p| Reverse(files[p.index].token_count.unwrap_or(0)));

        for file in order {
            let change = &files[file.index];

            let Some(minimized) = minimize(change, &file.patch) else {
                self.list_file(&mut budget, &mut deleted, DELETED_FILES_HEADER, &change.filename);
                continue;
            };

            if budget.past_hard_floor() {
                warn!(file = %change.filename, "no tokens left, file fully skipped");
                fully_skipped.push(change.filename.clone());
                continue;
            }

            let text = self.render(&minimized.hunks, &change.filename);
            let cost = self.counter.count_tokens(&text);
            if !budget.admits(cost) {
                debug!(file = %change.filename, cost, "patch too large, listing by name");
                self.list_file(
                    &mut budget,
                    &mut summarized,
                    MORE_MODIFIED_FILES_HEADER,
                    &change.filename,
                );
                continue;
            }

            budget.charge(cost);
            debug!(file = %change.filename, total = budget.running_total, "patch included");
            patches.push(text);
        }

        let mut rendered_text = patches.join("\n");
        append_list(&mut rendered_text, MORE_MODIFIED_FILES_HEADER, &summarized);
        append_list(&mut rendered_text, DELETED_FILES_HEADER, &deleted);

        Phase::Done(AssemblyResult {
            rendered_text,
            fully_skipped_filenames: fully_skipped,
            summarized_filenames: summarized,
            deleted_filenames: deleted,
            total_tokens: budget.running_total,
            compressed: true,
        })
    }

    fn extended_hunks(&self, change: &FileChange, file: &PreparedFile) -> Vec<Hunk> {
        match &file.original {
            Some(original) if self.options.extends(&change.filename) => {
                let lines: Vec<&str> = original.lines().collect();
                extend_hunks(
                    &lines,
                    &file.patch.hunks,
                    self.options.context_before,
                    self.options.context_after,
                )
            }
            _ => file.patch.hunks.clone(),
        }
    }

    fn render(&self, hunks: &[Hunk], filename: &str) -> String {
        if self.options.line_numbers {
            render_numbered(hunks, filename)
        } else {
            render_plain(hunks, filename)
        }
    }

    /// Add a file to a summary list, charging the list header the first time.
    fn list_file(
        &self,
        budget: &mut AssemblyBudget,
        list: &mut Vec<String>,
        header: &str,
        filename: &str,
    ) {
        if list.is_empty() {
            budget.charge(self.counter.count_tokens(header));
        }
        list.push(filename.to_string());
        budget.charge(self.counter.count_tokens(filename) + LIST_ENTRY_SEPARATOR_TOKENS);
    }
}

/// Decode a file's content and parse its patch.
///
/// Returns `Ok(None)` when there is neither a patch nor content to diff.
fn prepare_file(
    index: usize,
    change: &FileChange,
) -> std::result::Result<Option<PreparedFile>, FileError> {
    let original = change.original_text()?;
    let new = change.new_text()?;

    let patch = if change.raw_patch.trim().is_empty() {
        if original.is_none() && new.is_none() {
            return Ok(None);
        }
        let rebuilt = reconstruct_patch(original.unwrap_or(""), new.unwrap_or(""));
        debug!(file = %change.filename, "reconstructed missing patch");
        ParsedPatch::parse(&change.filename, &rebuilt)?
    } else {
        ParsedPatch::parse(&change.filename, &change.raw_patch)?
    };

    Ok(Some(PreparedFile {
        index,
        patch,
        original: original.map(str::to_string),
    }))
}

fn append_list(text: &mut String, header: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    text.push_str("\n\n");
    text.push_str(header);
    text.push_str(&names.join("\n"));
}
