//! Deterministic document id assignment.
//!
//! Partitions are visited in declared order and documents in partition order;
//! the `k`-th document overall receives `{prefix}-{start + k:010}`. The same
//! ordered input always yields the same ids, and because the suffix grows
//! strictly no two documents share one.
//!
//! The counter is limited to ten digits. Within that range every suffix has
//! the same width, so ordering ids as strings orders them by counter, which is
//! what duplicate detection relies on when it keeps the smallest id.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::corpus::{Corpus, Partition};
use crate::error::{CuratorError, Result};

/// One past the largest counter value a ten digit suffix can hold.
pub const MAX_ID_COUNTER: u64 = 10_000_000_000;

/// Options for id assignment.
///
/// `start` plus the number of documents must stay within
/// [`MAX_ID_COUNTER`]; a longer suffix would break the string ordering of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdAssignmentConfig {
    /// Prefix placed before the zero-padded counter.
    pub prefix: String,
    /// Counter value for the first document.
    pub start: u64,
}

impl Default for IdAssignmentConfig {
    fn default() -> Self {
        Self {
            prefix: "doc".to_string(),
            start: 0,
        }
    }
}

impl IdAssignmentConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(CuratorError::configuration("id prefix cannot be empty"));
        }
        if self.start >= MAX_ID_COUNTER {
            return Err(CuratorError::configuration(format!(
                "id start {} does not fit in ten digits",
                self.start
            )));
        }
        Ok(())
    }
}

/// Assigns ids to every document in a corpus.
#[derive(Debug, Clone)]
pub struct IdAssigner {
    prefix: String,
    start: u64,
}

impl IdAssigner {
    /// Create a new assigner.
    pub fn new<S: Into<String>>(prefix: S, start: u64) -> Result<Self> {
        Self::from_config(&IdAssignmentConfig {
            prefix: prefix.into(),
            start,
        })
    }

    /// Create an assigner from its configuration record.
    pub fn from_config(config: &IdAssignmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            prefix: config.prefix.clone(),
            start: config.start,
        })
    }

    /// Format the id for the given global index.
    pub fn format_id(&self, global_index: u64) -> String {
        format!("{}-{:010}", self.prefix, self.start + global_index)
    }

    /// Assign ids across the corpus, replacing any existing ones.
    pub fn assign(&self, corpus: Corpus) -> Result<Corpus> {
        let total = corpus.len() as u64;
        self.start
            .checked_add(total)
            .filter(|&end| end <= MAX_ID_COUNTER)
            .ok_or_else(|| {
                CuratorError::configuration(format!(
                    "id counter exceeds ten digits: start {} + {} documents",
                    self.start, total
                ))
            })?;

        let mut global_index = 0u64;
        let partitions = corpus
            .into_partitions()
            .into_iter()
            .map(|partition| {
                let documents = partition
                    .into_documents()
                    .into_iter()
                    .map(|doc| {
                        let id = self.format_id(global_index);
                        global_index += 1;
                        doc.with_id(id)
                    })
                    .collect();
                Partition::new(documents)
            })
            .collect();

        debug!(prefix = %self.prefix, assigned = global_index, "assigned document ids");
        Ok(Corpus::new(partitions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;

    #[test]
    fn test_assign_across_partitions() {
        let corpus = Corpus::new(vec![
            Partition::new(vec![Document::from_text("a"), Document::from_text("b")]),
            Partition::new(vec![]),
            Partition::new(vec![Document::from_text("c")]),
        ]);
        let assigner = IdAssigner::new("cc", 5).unwrap();
        let assigned = assigner.assign(corpus).unwrap();

        assert_eq!(
            assigned.ids(),
            vec!["cc-0000000005", "cc-0000000006", "cc-0000000007"]
        );
        assert!(assigned.ensure_unique_ids().is_ok());
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let corpus = Corpus::from_texts(["x", "y", "z"], 2);
        let assigner = IdAssigner::new("doc", 0).unwrap();
        let once = assigner.assign(corpus).unwrap();
        let twice = assigner.assign(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_empty_prefix() {
        assert!(matches!(
            IdAssigner::new("", 0),
            Err(CuratorError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_counter_past_ten_digits() {
        assert!(IdAssigner::new("doc", u64::MAX).is_err());
        assert!(IdAssigner::new("doc", MAX_ID_COUNTER).is_err());

        let assigner = IdAssigner::new("doc", MAX_ID_COUNTER - 2).unwrap();
        let fits = assigner.assign(Corpus::from_texts(["x", "y"], 1)).unwrap();
        assert_eq!(fits.ids(), vec!["doc-9999999998", "doc-9999999999"]);

        let overflow = Corpus::from_texts(["x", "y", "z"], 1);
        assert!(matches!(
            assigner.assign(overflow),
            Err(CuratorError::Configuration(_))
        ));
    }

    #[test]
    fn test_string_order_matches_counter_order() {
        let assigner = IdAssigner::new("doc", 9).unwrap();
        let ids = assigner
            .assign(Corpus::from_texts(["a", "b", "c"], 2))
            .unwrap()
            .ids();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids[1], "doc-0000000010");
    }

    #[test]
    fn test_unknown_option_rejected() {
        let parsed: std::result::Result<IdAssignmentConfig, _> =
            serde_json::from_str(r#"{"prefix":"a","offset":3}"#);
        assert!(parsed.is_err());
    }
}
