//! Widening hunks with unmodified context from the original file.

use super::hunk::{DiffLine, Hunk, header_start};

/// Old-file line window `[start, end]` (1-based, inclusive) a hunk occupies
/// once extended, plus how many lines were added on each side.
#[derive(Debug, Clone, Copy)]
struct Window {
    lead: usize,
    trail: usize,
}

impl Window {
    fn for_hunk(hunk: &Hunk, file_len: usize, before: usize, after: usize) -> Self {
        let old_first = hunk.old_first();
        let old_end = hunk.old_end();

        // Lines before the hunk only exist if the hunk starts inside the file.
        let lead = if old_first.saturating_sub(1) <= file_len {
            before.min(old_first.saturating_sub(1))
        } else {
            0
        };
        let trail = after.min((file_len + 1).saturating_sub(old_end));

        Self { lead, trail }
    }

    fn start(&self, hunk: &Hunk) -> usize {
        hunk.old_first().saturating_sub(self.lead)
    }

    /// Last old line covered, or `old_first - 1` for an empty window.
    fn end(&self, hunk: &Hunk) -> usize {
        hunk.old_end().saturating_sub(1) + self.trail
    }
}

/// Extend every hunk with up to `before`/`after` lines of context taken from
/// `original_lines`.
///
/// Context is clipped to the file boundaries. Hunks whose extended windows
/// overlap are merged (transitively, in source order) into a single hunk with
/// a recomputed header. With `before == 0 && after == 0` the input is
/// returned unchanged.
pub fn extend_hunks(
    original_lines: &[&str],
    hunks: &[Hunk],
    before: usize,
    after: usize,
) -> Vec<Hunk> {
    if before == 0 && after == 0 {
        return hunks.to_vec();
    }

    let file_len = original_lines.len();
    let mut groups: Vec<Vec<&Hunk>> = Vec::new();

    for hunk in hunks {
        if let Some(group) = groups.last_mut()
            && let Some(prev) = group.last()
            && should_merge(prev, hunk, file_len, before, after)
        {
            group.push(hunk);
            continue;
        }
        groups.push(vec![hunk]);
    }

    groups
        .into_iter()
        .map(|group| build_extended(original_lines, &group, before, after))
        .collect()
}

fn should_merge(prev: &Hunk, next: &Hunk, file_len: usize, before: usize, after: usize) -> bool {
    // Out-of-order or overlapping source hunks cannot be joined with context.
    if next.old_first() < prev.old_end() || next.old_first().saturating_sub(1) > file_len {
        return false;
    }
    let prev_window = Window::for_hunk(prev, file_len, before, after);
    let next_window = Window::for_hunk(next, file_len, before, after);
    next_window.start(next) <= prev_window.end(prev)
}

fn context_lines(original_lines: &[&str], first: usize, last: usize) -> Vec<DiffLine> {
    // `first`/`last` are 1-based and inclusive; an empty range yields nothing.
    if first == 0 || first > last || first > original_lines.len() {
        return Vec::new();
    }
    original_lines[first - 1..last.min(original_lines.len())]
        .iter()
        .map(|line| DiffLine::context(*line))
        .collect()
}

fn build_extended(original_lines: &[&str], group: &[&Hunk], before: usize, after: usize) -> Hunk {
    let file_len = original_lines.len();
    let first = group[0];
    let last = group[group.len() - 1];

    let lead = Window::for_hunk(first, file_len, before, after).lead;
    let trail = Window::for_hunk(last, file_len, before, after).trail;

    if group.len() == 1 && lead == 0 && trail == 0 {
        return first.clone();
    }

    let mut lines = context_lines(
        original_lines,
        first.old_first().saturating_sub(lead),
        first.old_first().saturating_sub(1),
    );
    let mut old_count = lead;
    let mut new_count = lead;

    let mut prev: Option<&Hunk> = None;
    for hunk in group {
        if let Some(prev) = prev {
            let gap = context_lines(
                original_lines,
                prev.old_end(),
                hunk.old_first().saturating_sub(1),
            );
            old_count += gap.len();
            new_count += gap.len();
            lines.extend(gap);
        }
        lines.extend(hunk.lines.iter().cloned());
        old_count += hunk.old_count;
        new_count += hunk.new_count;
        prev = Some(hunk);
    }

    lines.extend(context_lines(
        original_lines,
        last.old_end(),
        last.old_end().saturating_sub(1) + trail,
    ));
    old_count += trail;
    new_count += trail;

    let old_first = first.old_first().saturating_sub(lead).max(1);
    let new_first = first.new_first().saturating_sub(lead).max(1);

    Hunk::new(
        header_start(old_first, old_count),
        old_count,
        header_start(new_first, new_count),
        new_count,
        first.header_comment.clone(),
        lines,
    )
}
