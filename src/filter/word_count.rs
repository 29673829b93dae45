//! Word count filter implementation.

use super::DocumentFilter;

use crate::document::document::Document;
use crate::error::{CuratorError, Result};

/// Default minimum number of whitespace separated words.
pub const DEFAULT_MIN_WORDS: usize = 80;

/// Keeps documents whose whitespace word count lies within bounds.
#[derive(Clone, Debug)]
pub struct WordCountFilter {
    min_words: usize,
    max_words: Option<usize>,
}

impl WordCountFilter {
    /// Create a filter with a minimum word count and no maximum.
    pub fn new(min_words: usize) -> Self {
        WordCountFilter {
            min_words,
            max_words: None,
        }
    }

    /// Create a filter with both bounds.
    pub fn with_bounds(min_words: usize, max_words: usize) -> Result<Self> {
        if max_words < min_words {
            return Err(CuratorError::configuration(format!(
                "max_words ({max_words}) must not be below min_words ({min_words})"
            )));
        }
        Ok(WordCountFilter {
            min_words,
            max_words: Some(max_words),
        })
    }

    /// Get the minimum word count.
    pub fn min_words(&self) -> usize {
        self.min_words
    }
}

impl Default for WordCountFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORDS)
    }
}

impl DocumentFilter for WordCountFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        Ok(document.text().split_whitespace().count() as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score >= self.min_words as f64 && self.max_words.is_none_or(|max| score <= max as f64)
    }

    fn name(&self) -> &str {
        "word_count"
    }
}
