//! Composition of document filters.
//!
//! A [`FilterChain`] evaluates every filter on a document and combines the
//! decisions with AND ([`FilterMode::All`], the default) or OR
//! ([`FilterMode::Any`]). Each decision depends only on the document itself,
//! so a chain gives the same answer for a document whichever partition it
//! sits in and whatever order partitions are processed in.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::corpus::Partition;
use crate::document::document::Document;
use crate::error::{CuratorError, Result};
use crate::filter::DocumentFilter;
use crate::stage::{PartitionOutcome, PartitionStage};

/// How the decisions of several filters are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Keep a document only if every filter keeps it.
    #[default]
    All,
    /// Keep a document if at least one filter keeps it.
    Any,
}

/// The outcome of evaluating a chain on one document.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterVerdict {
    /// Whether the document survives.
    pub keep: bool,
    /// `(filter name, score)` for each filter, in chain order.
    pub scores: Vec<(String, f64)>,
}

/// An ordered set of filters evaluated as one keep/drop decision.
#[derive(Clone)]
pub struct FilterChain {
    filters: Vec<Arc<dyn DocumentFilter>>,
    mode: FilterMode,
    invert: bool,
    record_scores: bool,
    name: String,
}

impl FilterChain {
    /// Create an empty chain. An empty chain keeps everything.
    pub fn new() -> Self {
        FilterChain {
            filters: Vec::new(),
            mode: FilterMode::All,
            invert: false,
            record_scores: false,
            name: "filter".to_string(),
        }
    }

    /// Add a filter to the chain.
    pub fn add_filter(mut self, filter: Arc<dyn DocumentFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set how decisions are combined.
    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keep the documents the chain would drop, and drop the rest.
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Record each filter's score in the surviving documents' metadata under
    /// `{filter name}_score`.
    ///
    /// A key the document already carries, for example from an earlier run
    /// over the same data, is left as it is. Recording never changes which
    /// documents survive.
    pub fn record_scores(mut self, record: bool) -> Self {
        self.record_scores = record;
        self
    }

    /// Set a custom name for this chain.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the filters in this chain.
    pub fn filters(&self) -> &[Arc<dyn DocumentFilter>] {
        &self.filters
    }

    /// Check that no two filters share a name.
    ///
    /// Names key both the recorded scores and the failure reports, so they
    /// must be unique within a chain.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.filters.len());
        for filter in &self.filters {
            if !seen.insert(filter.name()) {
                return Err(CuratorError::configuration(format!(
                    "filter chain '{}' contains more than one filter named '{}'",
                    self.name,
                    filter.name()
                )));
            }
        }
        Ok(())
    }

    /// Evaluate every filter on the document and combine the decisions.
    pub fn evaluate(&self, document: &Document) -> Result<FilterVerdict> {
        let mut scores = Vec::with_capacity(self.filters.len());
        let mut decisions = Vec::with_capacity(self.filters.len());

        for filter in &self.filters {
            let score = filter.score(document).map_err(|e| {
                CuratorError::transform(filter.name(), document.id(), e.to_string())
            })?;
            decisions.push(filter.keep_score(score));
            scores.push((filter.name().to_string(), score));
        }

        let keep = match self.mode {
            FilterMode::All => decisions.iter().all(|&d| d),
            FilterMode::Any => decisions.is_empty() || decisions.iter().any(|&d| d),
        };

        Ok(FilterVerdict {
            keep: keep != self.invert,
            scores,
        })
    }

    /// Whether the chain keeps the document.
    pub fn keep(&self, document: &Document) -> Result<bool> {
        Ok(self.evaluate(document)?.keep)
    }

    fn annotate_scores(&self, document: &Document, scores: Vec<(String, f64)>) -> Result<Document> {
        scores
            .into_iter()
            .try_fold(document.clone(), |doc, (name, score)| {
                let key = format!("{name}_score");
                if doc.get_meta(&key).is_some() {
                    debug!(stage = %self.name, document = doc.id(), %key, "score already recorded");
                    Ok(doc)
                } else {
                    doc.annotate(key, score)
                }
            })
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionStage for FilterChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, partition_index: usize, partition: &Partition) -> Result<PartitionOutcome> {
        let mut documents = Vec::with_capacity(partition.len());
        let mut failures = Vec::new();

        for document in partition.documents() {
            let outcome = self.evaluate(document).and_then(|verdict| {
                if !verdict.keep {
                    Ok(None)
                } else if self.record_scores {
                    self.annotate_scores(document, verdict.scores).map(Some)
                } else {
                    Ok(Some(document.clone()))
                }
            });

            match outcome {
                Ok(Some(kept)) => documents.push(kept),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        stage = %self.name,
                        partition = partition_index,
                        document = document.id(),
                        %error,
                        "dropping document after filter failure"
                    );
                    failures.push(error);
                }
            }
        }

        debug!(
            stage = %self.name,
            partition = partition_index,
            kept = documents.len(),
            total = partition.len(),
            "filtered partition"
        );
        Ok(PartitionOutcome::new(Partition::new(documents)).with_failures(failures))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("invert", &self.invert)
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::punctuation::TerminalPunctuationFilter;
    use crate::filter::repetition::RepeatingNgramFilter;
    use crate::filter::word_count::WordCountFilter;

    fn corpus_partition() -> Partition {
        Partition::new(vec![
            Document::new("a", "The cat sat. The cat sat. The cat sat."),
            Document::new("b", "A unique sentence with no repeats here today."),
            Document::new("c", "short and unterminated"),
        ])
    }

    fn kept_ids(outcome: &PartitionOutcome) -> Vec<String> {
        outcome
            .partition
            .documents()
            .iter()
            .map(|d| d.id().to_string())
            .collect()
    }

    #[test]
    fn test_all_mode() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(RepeatingNgramFilter::new(2, 0.20).unwrap()))
            .add_filter(Arc::new(TerminalPunctuationFilter::default()));

        let outcome = chain.process(0, &corpus_partition()).unwrap();
        assert_eq!(kept_ids(&outcome), vec!["b"]);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_any_mode_and_inversion() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(RepeatingNgramFilter::new(2, 0.20).unwrap()))
            .add_filter(Arc::new(TerminalPunctuationFilter::default()))
            .with_mode(FilterMode::Any);
        let outcome = chain.process(0, &corpus_partition()).unwrap();
        assert_eq!(kept_ids(&outcome), vec!["a", "b", "c"]);

        let inverted = FilterChain::new()
            .add_filter(Arc::new(TerminalPunctuationFilter::default()))
            .inverted(true);
        let outcome = inverted.process(0, &corpus_partition()).unwrap();
        assert_eq!(kept_ids(&outcome), vec!["c"]);
    }

    #[test]
    fn test_record_scores() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(WordCountFilter::new(1)))
            .record_scores(true);
        let outcome = chain.process(0, &corpus_partition()).unwrap();
        let doc = &outcome.partition.documents()[2];
        assert_eq!(
            doc.get_meta("word_count_score").and_then(|v| v.as_float()),
            Some(3.0)
        );
    }

    #[test]
    fn test_recording_scores_twice_keeps_documents() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(WordCountFilter::new(1)))
            .record_scores(true);
        let first = chain.process(0, &corpus_partition()).unwrap();
        let second = chain.process(0, &first.partition).unwrap();

        assert!(second.failures.is_empty());
        assert_eq!(kept_ids(&second), vec!["a", "b", "c"]);
        assert_eq!(second.partition, first.partition);
    }

    #[test]
    fn test_existing_score_key_is_kept() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(WordCountFilter::new(1)))
            .record_scores(true);
        let partition = Partition::new(vec![
            Document::builder()
                .id("x")
                .text("two words")
                .meta("word_count_score", 99.0)
                .build(),
        ]);
        let outcome = chain.process(0, &partition).unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(
            outcome.partition.documents()[0]
                .get_meta("word_count_score")
                .and_then(|v| v.as_float()),
            Some(99.0)
        );
    }

    #[test]
    fn test_duplicate_filter_names_rejected() {
        let chain = FilterChain::new()
            .add_filter(Arc::new(WordCountFilter::new(1)))
            .add_filter(Arc::new(WordCountFilter::with_bounds(1, 100).unwrap()));
        assert!(matches!(chain.validate(), Err(CuratorError::Configuration(_))));

        let chain = FilterChain::new()
            .add_filter(Arc::new(WordCountFilter::new(1)))
            .add_filter(Arc::new(TerminalPunctuationFilter::default()));
        assert!(chain.validate().is_ok());
    }

    #[test]
    fn test_tightening_never_grows_survivors() {
        let partition = Partition::new(
            (0..30)
                .map(|i| Document::new(format!("d{i}"), vec!["w"; i].join(" ")))
                .collect(),
        );
        let mut previous = usize::MAX;
        for min in [0, 5, 10, 20, 29, 40] {
            let chain = FilterChain::new().add_filter(Arc::new(WordCountFilter::new(min)));
            let survivors = chain.process(0, &partition).unwrap().partition.len();
            assert!(survivors <= previous);
            previous = survivors;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_failing_filter_isolated() {
        let failing = crate::filter::score::ScoreFilter::new(
            "explodes_on_b",
            crate::filter::Comparison::Ge,
            0.0,
            |doc: &Document| {
                if doc.id() == "b" {
                    Err(CuratorError::other("scorer crashed"))
                } else {
                    Ok(1.0)
                }
            },
        );
        let chain = FilterChain::new().add_filter(Arc::new(failing));
        let outcome = chain.process(2, &corpus_partition()).unwrap();
        assert_eq!(kept_ids(&outcome), vec!["a", "c"]);
        assert_eq!(outcome.failures.len(), 1);
    }
}
