//! Token estimation for when no BPE encoding can be loaded.
//!
//! Text is split the way byte-pair tokenizers pre-tokenize (letter runs,
//! short digit groups, punctuation runs, whitespace), then each piece is
//! charged by length using a per-model-family profile.

use super::TokenCounter;
use regex::Regex;
use std::sync::LazyLock;

static PRE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'(?:s|t|re|ve|m|ll|d)| ?\p{L}+| ?\p{N}{1,3}| ?[^\s\p{L}\p{N}]+|\s+")
        .expect("pre-token regex is valid")
});

/// Characters per token for each kind of pre-token piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProfile {
    pub name: &'static str,
    /// Characters of a letter run covered by one token.
    pub word_chars: usize,
    /// Characters of a punctuation run covered by one token.
    pub symbol_chars: usize,
}

pub const OPENAI_PROFILE: TokenProfile = TokenProfile {
    name: "openai",
    word_chars: 4,
    symbol_chars: 2,
};

pub const CLAUDE_PROFILE: TokenProfile = TokenProfile {
    name: "claude",
    word_chars: 3,
    symbol_chars: 2,
};

/// Pick the profile for a model identifier.
///
/// Provider prefixes such as `bedrock/anthropic.` are irrelevant; any model
/// naming Claude gets the Claude profile and everything else falls back to
/// the OpenAI one.
pub fn profile_for_model(model: &str) -> TokenProfile {
    if model.to_ascii_lowercase().contains("claude") {
        CLAUDE_PROFILE
    } else {
        OPENAI_PROFILE
    }
}

/// Length-based estimator over regex pre-tokens.
#[derive(Debug, Clone)]
pub struct HeuristicCounter {
    profile: TokenProfile,
}

impl HeuristicCounter {
    pub fn new(profile: TokenProfile) -> Self {
        Self { profile }
    }

    pub fn for_model(model: &str) -> Self {
        Self::new(profile_for_model(model))
    }

    pub fn profile(&self) -> TokenProfile {
        self.profile
    }

    fn piece_cost(&self, piece: &str) -> usize {
        let body = piece.strip_prefix(' ').unwrap_or(piece);
        let Some(first) = body.chars().next() else {
            // A lone space
            return 1;
        };
        let len = body.chars().count();

        if first.is_whitespace() {
            // Each newline usually stands alone; runs of spaces merge
            body.matches('\n').count().max(1)
        } else if first.is_alphabetic() {
            len.div_ceil(self.profile.word_chars)
        } else if first.is_numeric() {
            1
        } else {
            len.div_ceil(self.profile.symbol_chars)
        }
    }
}

impl TokenCounter for HeuristicCounter {
    fn count_tokens(&self, text: &str) -> usize {
        PRE_TOKEN_RE
            .find_iter(text)
            .map(|m| self.piece_cost(m.as_str()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai() -> HeuristicCounter {
        HeuristicCounter::new(OPENAI_PROFILE)
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(openai().count_tokens(""), 0);
    }

    #[test]
    fn short_words_cost_one_each() {
        assert_eq!(openai().count_tokens("the cat sat"), 3);
    }

    #[test]
    fn long_words_are_split() {
        // "internationalization" is 20 letters
        assert_eq!(openai().count_tokens("internationalization"), 5);
        assert_eq!(
            HeuristicCounter::new(CLAUDE_PROFILE).count_tokens("internationalization"),
            7
        );
    }

    #[test]
    fn digits_group_by_three() {
        assert_eq!(openai().count_tokens("1234567"), 3);
    }

    #[test]
    fn code_line_counts_symbols_and_newlines() {
        // "fn" " main" "()" " {" "\n" "}"
        assert_eq!(openai().count_tokens("fn main() {\n}"), 6);
    }

    #[test]
    fn profile_follows_model_family() {
        assert_eq!(profile_for_model("gpt-4o"), OPENAI_PROFILE);
        assert_eq!(
            profile_for_model("bedrock/anthropic.claude-v2:1"),
            CLAUDE_PROFILE
        );
        assert_eq!(profile_for_model("ollama/llama3"), OPENAI_PROFILE);
    }

    #[test]
    fn count_grows_with_text() {
        let counter = openai();
        let short = counter.count_tokens("## src/lib.rs\n");
        let long = counter.count_tokens("## src/lib.rs\n\n@@ -1 +1 @@\n-a\n+b\n");
        assert!(long > short);
    }
}
