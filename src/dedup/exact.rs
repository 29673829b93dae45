//! Exact duplicate detection by content digest.
//!
//! Each partition hashes its documents into a local [`DigestTable`]
//! (digest to ids). Tables merge by set union, so the grouping is the same
//! however the corpus is partitioned. Within a digest group the smallest id
//! survives.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use xxhash_rust::xxh3::xxh3_128;

use crate::dedup::{DuplicateCluster, duplicate_ids};
use crate::document::corpus::{Corpus, Partition};
use crate::error::Result;

/// Digest used to identify identical texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256, hex encoded.
    #[default]
    Sha256,
    /// XXH3-128, hex encoded. Faster, not collision resistant against
    /// adversarial input.
    Xxh3,
}

impl HashAlgorithm {
    /// Digest a text.
    pub fn digest(self, text: &str) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(text.as_bytes())),
            HashAlgorithm::Xxh3 => format!("{:032x}", xxh3_128(text.as_bytes())),
        }
    }
}

/// Options for exact deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExactDedupConfig {
    /// Digest algorithm.
    pub hash: HashAlgorithm,
}

/// Partial grouping of document ids by digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestTable {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl DigestTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` has content digest `digest`.
    pub fn insert<D: Into<String>, I: Into<String>>(&mut self, digest: D, id: I) {
        self.groups.entry(digest.into()).or_default().insert(id.into());
    }

    /// Union of two tables.
    pub fn merge(mut self, other: DigestTable) -> DigestTable {
        if self.groups.len() < other.groups.len() {
            return other.merge(self);
        }
        for (digest, ids) in other.groups {
            self.groups.entry(digest).or_default().extend(ids);
        }
        self
    }

    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups with more than one id, as clusters.
    pub fn clusters(&self) -> Vec<DuplicateCluster> {
        self.groups
            .values()
            .filter(|ids| ids.len() > 1)
            .filter_map(|ids| DuplicateCluster::from_members(ids.clone()))
            .collect()
    }
}

/// The outcome of exact deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactDedupResult {
    /// Groups of identical documents, ordered by representative.
    pub clusters: Vec<DuplicateCluster>,
    /// Every id marked duplicate.
    pub duplicates: BTreeSet<String>,
}

/// Finds byte-identical texts.
#[derive(Debug, Clone, Default)]
pub struct ExactDeduplicator {
    config: ExactDedupConfig,
}

impl ExactDeduplicator {
    /// Create a new exact deduplicator.
    pub fn new(config: ExactDedupConfig) -> Self {
        ExactDeduplicator { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExactDedupConfig {
        &self.config
    }

    /// Hash one partition into a local table.
    pub fn partition_table(&self, partition: &Partition) -> DigestTable {
        let mut table = DigestTable::new();
        for document in partition.documents() {
            table.insert(self.config.hash.digest(document.text()), document.id());
        }
        table
    }

    /// Find duplicate groups across the corpus.
    ///
    /// Ids must be unique; otherwise a consistency error is returned.
    pub fn find_duplicates(&self, corpus: &Corpus) -> Result<ExactDedupResult> {
        corpus.ensure_unique_ids()?;

        let table = corpus
            .partitions()
            .par_iter()
            .map(|partition| self.partition_table(partition))
            .reduce(DigestTable::new, DigestTable::merge);

        let mut clusters = table.clusters();
        clusters.sort();
        let duplicates = duplicate_ids(&clusters);

        info!(
            documents = corpus.len(),
            distinct = table.len(),
            duplicates = duplicates.len(),
            "exact deduplication finished"
        );
        Ok(ExactDedupResult {
            clusters,
            duplicates,
        })
    }

    /// Drop every duplicate from the corpus, keeping one document per group.
    pub fn remove_duplicates(&self, corpus: Corpus) -> Result<(Corpus, ExactDedupResult)> {
        let result = self.find_duplicates(&corpus)?;
        Ok((corpus.without_ids(&result.duplicates), result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;
    use crate::error::CuratorError;

    fn corpus(partitions: &[&[(&str, &str)]]) -> Corpus {
        Corpus::new(
            partitions
                .iter()
                .map(|docs| {
                    Partition::new(docs.iter().map(|(id, text)| Document::new(*id, *text)).collect())
                })
                .collect(),
        )
    }

    #[test]
    fn test_keeps_smallest_id() {
        let corpus = corpus(&[
            &[("d3", "same text"), ("d1", "other text")],
            &[("d2", "same text"), ("d4", "same text")],
        ]);
        let dedup = ExactDeduplicator::default();
        let (kept, result) = dedup.remove_duplicates(corpus).unwrap();

        assert_eq!(kept.ids(), vec!["d1", "d2"]);
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].representative, "d2");
        assert_eq!(
            result.duplicates.iter().cloned().collect::<Vec<_>>(),
            vec!["d3", "d4"]
        );
    }

    #[test]
    fn test_independent_of_partitioning() {
        let docs = [
            ("a", "x"),
            ("b", "y"),
            ("c", "x"),
            ("d", "z"),
            ("e", "y"),
            ("f", "x"),
        ];
        let one = corpus(&[&docs]);
        let split = corpus(&[&docs[4..], &docs[..2], &docs[2..4]]);
        let dedup = ExactDeduplicator::new(ExactDedupConfig {
            hash: HashAlgorithm::Xxh3,
        });
        assert_eq!(
            dedup.find_duplicates(&one).unwrap(),
            dedup.find_duplicates(&split).unwrap()
        );
    }

    #[test]
    fn test_merge_is_commutative() {
        let dedup = ExactDeduplicator::default();
        let p1 = Partition::new(vec![Document::new("a", "x"), Document::new("b", "y")]);
        let p2 = Partition::new(vec![Document::new("c", "x")]);
        let left = dedup.partition_table(&p1).merge(dedup.partition_table(&p2));
        let right = dedup.partition_table(&p2).merge(dedup.partition_table(&p1));
        assert_eq!(left, right);
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let corpus = corpus(&[&[("a", "x")], &[("a", "y")]]);
        assert!(matches!(
            ExactDeduplicator::default().find_duplicates(&corpus),
            Err(CuratorError::Consistency(_))
        ));
    }

    #[test]
    fn test_sha256_digest() {
        assert_eq!(
            HashAlgorithm::Sha256.digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(HashAlgorithm::Xxh3.digest("abc").len(), 32);
    }
}
