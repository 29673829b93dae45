//! Generic score filter built from a scoring function.

use std::sync::Arc;

use super::{Comparison, DocumentFilter};

use crate::document::document::Document;
use crate::error::Result;

type ScoreFn = dyn Fn(&Document) -> Result<f64> + Send + Sync;

/// A filter that applies any scoring function and compares the score against
/// a threshold.
///
/// ```
/// use curator::document::Document;
/// use curator::filter::{Comparison, DocumentFilter};
/// use curator::filter::score::ScoreFilter;
///
/// let filter = ScoreFilter::new("char_count", Comparison::Le, 10.0, |doc: &Document| {
///     Ok(doc.text().chars().count() as f64)
/// });
/// assert!(filter.keep(&Document::new("a", "short")).unwrap());
/// assert!(!filter.keep(&Document::new("b", "much too long")).unwrap());
/// ```
#[derive(Clone)]
pub struct ScoreFilter {
    name: String,
    comparison: Comparison,
    threshold: f64,
    scorer: Arc<ScoreFn>,
}

impl ScoreFilter {
    /// Create a new score filter.
    pub fn new<S, F>(name: S, comparison: Comparison, threshold: f64, scorer: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Document) -> Result<f64> + Send + Sync + 'static,
    {
        ScoreFilter {
            name: name.into(),
            comparison,
            threshold,
            scorer: Arc::new(scorer),
        }
    }

    /// Get the threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Get the comparison.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

impl DocumentFilter for ScoreFilter {
    fn score(&self, document: &Document) -> Result<f64> {
        (self.scorer)(document)
    }

    fn keep_score(&self, score: f64) -> bool {
        self.comparison.keeps(score, self.threshold)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ScoreFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreFilter")
            .field("name", &self.name)
            .field("comparison", &self.comparison)
            .field("threshold", &self.threshold)
            .finish()
    }
}
