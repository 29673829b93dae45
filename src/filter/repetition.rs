//! Repetition filters.
//!
//! Machine generated and scraped pages often loop over the same phrases or
//! lines. These filters measure how much of a document is repeated content.

use ahash::{AHashMap, AHashSet};

use super::DocumentFilter;

use crate::document::document::Document;
use crate::error::{CuratorError, Result};

/// Default `(n, max_ratio)` pairs for the repeating n-gram filters.
pub const DEFAULT_NGRAM_THRESHOLDS: [(usize, f64); 3] = [(2, 0.20), (3, 0.18), (4, 0.16)];

/// Share of word n-grams that occur more than once.
///
/// Over whitespace tokens, the ratio is the summed count of every n-gram seen
/// more than once divided by the total number of n-grams. Texts with fewer
/// than `n` tokens have no n-grams and score `0.0`.
pub fn repeated_ngram_ratio(text: &str, n: usize) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if n == 0 || tokens.len() < n {
        return 0.0;
    }

    let mut counts: AHashMap<&[&str], usize> = AHashMap::new();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }

    let total = tokens.len() - n + 1;
    let repeated: usize = counts.values().filter(|&&count| count > 1).sum();
    repeated as f64 / total as f64
}

/// Drops documents whose repeated n-gram ratio exceeds a threshold.
#[derive(Clone, Debug)]
pub struct RepeatingNgramFilter {
    n: usize,
    max_ratio: f64,
    name: String,
}

impl RepeatingNgramFilter {
    /// Create a filter for n-grams of size `n`.
    pub fn new(n: usize, max_ratio: f64) -> Result<Self> {
        if n == 0 {
            return Err(CuratorError::configuration("n-gram size must be positive"));
        }
        if !(0.0..=1.0).contains(&max_ratio) {
            return Err(CuratorError::configuration(format!(
                "max_ratio must be within [0, 1], got {max_ratio}"
            )));
        }
        Ok(RepeatingNgramFilter {
            n,
            max_ratio,
            name: format!("repeating_{n}gram"),
        })
    }

    /// One filter per default `(n, max_ratio)` pair. Chained with AND, a
    /// document fails if any of them fails.
    pub fn defaults() -> Vec<RepeatingNgramFilter> {
        DEFAULT_NGRAM_THRESHOLDS
            .iter()
            .map(|&(n, max_ratio)| RepeatingNgramFilter {
                n,
                max_ratio,
                name: format!("repeating_{n}gram"),
            })
            .collect()
    }

    /// Get the n-gram size.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Get the maximum tolerated ratio.
    pub fn max_ratio(&self) -> f64 {
        self.max_ratio
    }
}

impl DocumentFilter for RepeatingNgramFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        Ok(repeated_ngram_ratio(document.text(), self.n))
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Drops documents where too many non-blank lines are duplicates of an
/// earlier line.
#[derive(Clone, Debug)]
pub struct RepeatedLinesFilter {
    max_ratio: f64,
}

impl RepeatedLinesFilter {
    pub fn new(max_ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&max_ratio) {
            return Err(CuratorError::configuration(format!(
                "max_ratio must be within [0, 1], got {max_ratio}"
            )));
        }
        Ok(RepeatedLinesFilter { max_ratio })
    }
}

impl Default for RepeatedLinesFilter {
    fn default() -> Self {
        RepeatedLinesFilter { max_ratio: 0.3 }
    }
}

impl DocumentFilter for RepeatedLinesFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        let lines: Vec<&str> = document
            .text()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Ok(0.0);
        }
        let unique: AHashSet<&str> = lines.iter().copied().collect();
        Ok((lines.len() - unique.len()) as f64 / lines.len() as f64)
    }

    fn keep_score(&self, score: f64) -> bool {
        score <= self.max_ratio
    }

    fn name(&self) -> &str {
        "repeated_lines"
    }
}
