//! Document quality filters.
//!
//! A [`DocumentFilter`] computes a score for a document and decides from that
//! score whether the document is kept. Filters are pure predicates over a
//! single document, so they can run on any partition in any order.
//! [`chain::FilterChain`] composes filters (AND by default) and runs them as a
//! partition stage.
//!
//! # Available Filters
//!
//! - [`word_count::WordCountFilter`] - Minimum (and optional maximum) whitespace word count
//! - [`punctuation::TerminalPunctuationFilter`] - Text must end with one of a set of characters
//! - [`repetition::RepeatingNgramFilter`] - Share of repeated word n-grams
//! - [`repetition::RepeatedLinesFilter`] - Share of duplicated lines
//! - [`heuristics::MeanWordLengthFilter`] - Mean word length bounds
//! - [`heuristics::SymbolToWordRatioFilter`] - Hash and ellipsis symbols per word
//! - [`heuristics::NonAlphaNumericFilter`] - Share of non alphanumeric characters
//! - [`heuristics::UrlRatioFilter`] - Share of text taken by URLs
//! - [`heuristics::BoilerplateStringFilter`] - Share of lines with boilerplate phrases
//! - [`score::ScoreFilter`] - Any scoring closure with a threshold and comparison
//!
//! # Examples
//!
//! ```
//! use curator::document::Document;
//! use curator::filter::DocumentFilter;
//! use curator::filter::repetition::RepeatingNgramFilter;
//!
//! let filter = RepeatingNgramFilter::new(2, 0.20).unwrap();
//! let looping = Document::new("A", "The cat sat. The cat sat. The cat sat.");
//! let unique = Document::new("B", "A unique sentence with no repeats here today.");
//!
//! assert!(!filter.keep(&looping).unwrap());
//! assert!(filter.keep(&unique).unwrap());
//! ```

use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::error::Result;

/// How a score is compared against a threshold. A document is kept when
/// `score <op> threshold` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `score >= threshold`
    Ge,
    /// `score > threshold`
    Gt,
    /// `score <= threshold`
    Le,
    /// `score < threshold`
    Lt,
}

impl Comparison {
    /// Whether a score passes against the threshold.
    pub fn keeps(self, score: f64, threshold: f64) -> bool {
        match self {
            Comparison::Ge => score >= threshold,
            Comparison::Gt => score > threshold,
            Comparison::Le => score <= threshold,
            Comparison::Lt => score < threshold,
        }
    }
}

/// Trait for scored keep/drop predicates over a single document.
pub trait DocumentFilter: Send + Sync {
    /// Compute the score for a document.
    fn score(&self, document: &Document) -> Result<f64>;

    /// Decide from a previously computed score.
    fn keep_score(&self, score: f64) -> bool;

    /// Name used in reports, logs and recorded score keys.
    fn name(&self) -> &str;

    /// Score the document and decide.
    fn keep(&self, document: &Document) -> Result<bool> {
        Ok(self.keep_score(self.score(document)?))
    }
}

pub mod chain;
pub mod config;
pub mod heuristics;
pub mod punctuation;
pub mod repetition;
pub mod score;
pub mod word_count;

pub use chain::{FilterChain, FilterMode};
pub use config::FilterConfig;
