//! Terminal punctuation filter implementation.

use std::collections::BTreeSet;

use super::DocumentFilter;

use crate::document::document::Document;
use crate::error::{CuratorError, Result};

/// Characters a document may end with by default.
pub const DEFAULT_TERMINATING_CHARS: [char; 4] = ['.', '!', '?', '"'];

/// Drops documents whose stripped text does not end with an allowed character.
///
/// The score is `1.0` when the text ends with one of the characters and `0.0`
/// otherwise.
#[derive(Clone, Debug)]
pub struct TerminalPunctuationFilter {
    terminating_chars: BTreeSet<char>,
}

impl TerminalPunctuationFilter {
    /// Create a filter with a custom set of terminating characters.
    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Result<Self> {
        let terminating_chars: BTreeSet<char> = chars.into_iter().collect();
        if terminating_chars.is_empty() {
            return Err(CuratorError::configuration(
                "terminating_chars cannot be empty",
            ));
        }
        Ok(TerminalPunctuationFilter { terminating_chars })
    }

    /// Get the allowed terminating characters.
    pub fn terminating_chars(&self) -> &BTreeSet<char> {
        &self.terminating_chars
    }
}

impl Default for TerminalPunctuationFilter {
    fn default() -> Self {
        TerminalPunctuationFilter {
            terminating_chars: DEFAULT_TERMINATING_CHARS.into_iter().collect(),
        }
    }
}

impl DocumentFilter for TerminalPunctuationFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let ends_well = document
            .text()
            .trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| self.terminating_chars.contains(&c));
        Ok(if ends_well { 1.0 } else { 0.0 })
    }

    fn keep_score(&self, score: f64) -> bool {
        score >= 1.0
    }

    fn name(&self) -> &str {
        "terminal_punctuation"
    }
}
