//! Near-duplicate detection with MinHash and LSH.
//!
//! The detection runs as a batch job over a corpus snapshot:
//!
//! 1. every document's character shingles are hashed and reduced to a
//!    [`MinHashSignature`](minhash::MinHashSignature);
//! 2. signatures are cut into bands and each partition builds a local
//!    [`LshIndex`](lsh::LshIndex), merged across partitions;
//! 3. documents sharing a bucket become candidate pairs, optionally checked
//!    against their exact Jaccard similarity;
//! 4. the surviving pairs form a [`DuplicateGraph`](graph::DuplicateGraph)
//!    whose connected components are the duplicate clusters.
//!
//! Results are approximate. Some true near-duplicates are missed, and
//! without the false positive check some dissimilar documents that happen
//! to collide are clustered.
//!
//! # Examples
//!
//! ```
//! use curator::dedup::fuzzy::{FuzzyDedupConfig, FuzzyDeduplicator};
//! use curator::document::{Corpus, Document, Partition};
//!
//! let text = "the same long paragraph of text shows up twice in this corpus";
//! let corpus = Corpus::new(vec![
//!     Partition::new(vec![Document::new("b", text)]),
//!     Partition::new(vec![Document::new("a", text), Document::new("c", "something else")]),
//! ]);
//!
//! let dedup = FuzzyDeduplicator::new(FuzzyDedupConfig::default()).unwrap();
//! let result = dedup.find_duplicates(&corpus).unwrap();
//! assert_eq!(result.clusters[0].representative, "a");
//! assert!(result.duplicates.contains("b"));
//! ```

use std::collections::{BTreeSet, HashMap};

use ahash::RandomState;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::dedup::{DuplicateCluster, duplicate_ids};
use crate::document::corpus::{Corpus, Partition};
use crate::error::Result;

pub mod config;
pub mod graph;
pub mod lsh;
pub mod minhash;
pub mod shingle;

pub use config::FuzzyDedupConfig;
pub use graph::DuplicateGraph;
pub use lsh::{LshIndex, LshParams};
pub use minhash::{MinHashSignature, MinHasher};

/// The outcome of fuzzy deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzyDedupResult {
    /// Connected components with at least two members, ordered by
    /// representative.
    pub clusters: Vec<DuplicateCluster>,
    /// Every id marked duplicate.
    pub duplicates: BTreeSet<String>,
    /// Number of distinct pairs that shared a bucket.
    pub candidate_pairs: usize,
    /// Number of pairs kept as graph edges. Equal to `candidate_pairs`
    /// unless the false positive check is enabled.
    pub verified_pairs: usize,
}

/// MinHash + LSH near-duplicate detector.
#[derive(Debug, Clone)]
pub struct FuzzyDeduplicator {
    config: FuzzyDedupConfig,
    hasher: MinHasher,
    params: LshParams,
}

impl FuzzyDeduplicator {
    /// Create a new detector. The configuration is validated here.
    pub fn new(config: FuzzyDedupConfig) -> Result<Self> {
        config.validate()?;
        let hasher = MinHasher::new(config.num_hashes(), config.seed);
        let params = config.lsh_params();
        Ok(FuzzyDeduplicator {
            config,
            hasher,
            params,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &FuzzyDedupConfig {
        &self.config
    }

    /// Get the banding parameters.
    pub fn params(&self) -> LshParams {
        self.params
    }

    /// Compute the signature of a text.
    pub fn signature(&self, text: &str) -> MinHashSignature {
        self.hasher
            .signature(&shingle::shingle_hashes(text, self.config.shingle_width))
    }

    /// Build the local bucket tables for one partition.
    pub fn partition_index(&self, partition: &Partition) -> LshIndex {
        let mut index = LshIndex::new(self.params.num_bands);
        for document in partition.documents() {
            let keys = self.params.band_keys(&self.signature(document.text()));
            index.insert(document.id(), &keys);
        }
        index
    }

    /// Find near-duplicate clusters across the corpus.
    ///
    /// Ids must be unique; otherwise a consistency error is returned.
    pub fn find_duplicates(&self, corpus: &Corpus) -> Result<FuzzyDedupResult> {
        corpus.ensure_unique_ids()?;

        let num_bands = self.params.num_bands;
        let index = corpus
            .partitions()
            .par_iter()
            .map(|partition| self.partition_index(partition))
            .reduce(|| LshIndex::new(num_bands), LshIndex::merge);

        let candidates: Vec<(String, String)> = index.candidate_pairs().into_iter().collect();
        let candidate_pairs = candidates.len();
        debug!(candidate_pairs, "collected LSH candidate pairs");

        let graph = if self.config.use_false_positive_check {
            self.verified_graph(corpus, candidates)
        } else {
            DuplicateGraph::from_edges(candidates)
        };
        let verified_pairs = graph.edge_count();

        let clusters: Vec<DuplicateCluster> = graph
            .components()
            .into_iter()
            .filter_map(DuplicateCluster::from_members)
            .collect();
        let duplicates = duplicate_ids(&clusters);

        info!(
            documents = corpus.len(),
            candidate_pairs,
            verified_pairs,
            clusters = clusters.len(),
            duplicates = duplicates.len(),
            "fuzzy deduplication finished"
        );
        Ok(FuzzyDedupResult {
            clusters,
            duplicates,
            candidate_pairs,
            verified_pairs,
        })
    }

    /// Drop every duplicate from the corpus, keeping one document per cluster.
    pub fn remove_duplicates(&self, corpus: Corpus) -> Result<(Corpus, FuzzyDedupResult)> {
        let result = self.find_duplicates(&corpus)?;
        Ok((corpus.without_ids(&result.duplicates), result))
    }

    /// Keep only candidate pairs whose exact shingle Jaccard similarity
    /// reaches the threshold.
    fn verified_graph(&self, corpus: &Corpus, candidates: Vec<(String, String)>) -> DuplicateGraph {
        let involved: BTreeSet<&str> = candidates
            .iter()
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .collect();
        let shingles: HashMap<&str, Vec<u64>, RandomState> = corpus
            .documents()
            .filter(|d| involved.contains(d.id()))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|d| {
                (
                    d.id(),
                    shingle::shingle_hashes(d.text(), self.config.shingle_width),
                )
            })
            .collect();

        let threshold = self.config.similarity_threshold;
        candidates
            .into_par_iter()
            .fold(DuplicateGraph::new, |mut graph, (a, b)| {
                let similarity = match (shingles.get(a.as_str()), shingles.get(b.as_str())) {
                    (Some(sa), Some(sb)) => shingle::jaccard(sa, sb),
                    _ => 0.0,
                };
                if similarity >= threshold {
                    graph.add_edge(a, b);
                }
                graph
            })
            .reduce(DuplicateGraph::new, DuplicateGraph::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;
    use crate::error::CuratorError;

    const BASE: &str = "Curated web text is deduplicated so that models do not memorise \
        boilerplate. Near duplicate pages differ by a date, a counter or a footer, \
        and exact hashing misses them while MinHash catches them reliably.";

    fn corpus(partitions: Vec<Vec<(&str, String)>>) -> Corpus {
        Corpus::new(
            partitions
                .into_iter()
                .map(|docs| {
                    Partition::new(
                        docs.into_iter()
                            .map(|(id, text)| Document::new(id, text))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_identical_documents_cluster() {
        let corpus = corpus(vec![
            vec![("d2", BASE.to_string()), ("d9", "unrelated short note".to_string())],
            vec![("d1", BASE.to_string())],
        ]);
        let dedup = FuzzyDeduplicator::new(FuzzyDedupConfig::default()).unwrap();
        let (kept, result) = dedup.remove_duplicates(corpus).unwrap();

        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].members, vec!["d1", "d2"]);
        assert_eq!(kept.ids(), vec!["d9", "d1"]);
    }

    #[test]
    fn test_near_duplicate_found() {
        let edited = BASE.replace("a footer", "the footer");
        let corpus = corpus(vec![vec![("a", BASE.to_string()), ("b", edited)]]);
        let config = FuzzyDedupConfig {
            shingle_width: 5,
            ..Default::default()
        };
        let result = FuzzyDeduplicator::new(config).unwrap().find_duplicates(&corpus).unwrap();
        assert_eq!(result.duplicates.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_single_band_single_row() {
        // With one row the band key is the single minimum, so texts whose
        // shingle sets are equal must collide.
        let config = FuzzyDedupConfig {
            shingle_width: 5,
            num_bands: 1,
            rows_per_band: 1,
            ..Default::default()
        };
        let corpus = corpus(vec![
            vec![("p", "hello world".to_string())],
            vec![("q", "hello world".to_string())],
        ]);
        let result = FuzzyDeduplicator::new(config).unwrap().find_duplicates(&corpus).unwrap();
        assert_eq!(result.candidate_pairs, 1);
        assert!(result.duplicates.contains("q"));
    }

    #[test]
    fn test_false_positive_check_drops_weak_pairs() {
        // A single band of a single row collides often; the check removes
        // pairs whose real similarity is low.
        let config = FuzzyDedupConfig {
            shingle_width: 3,
            num_bands: 1,
            rows_per_band: 1,
            use_false_positive_check: true,
            similarity_threshold: 0.9,
            seed: 1,
        };
        let texts = ["aaaa bbbb", "aaaa cccc", "aaaa dddd", "aaaa eeee"];
        let corpus = corpus(vec![
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| (["w", "x", "y", "z"][i], t.to_string()))
                .collect(),
        ]);
        let result = FuzzyDeduplicator::new(config).unwrap().find_duplicates(&corpus).unwrap();
        assert_eq!(result.verified_pairs, 0);
        assert!(result.duplicates.is_empty());
        assert!(result.candidate_pairs >= result.verified_pairs);
    }

    #[test]
    fn test_partition_layout_does_not_matter() {
        let docs: Vec<(&str, String)> = vec![
            ("a", BASE.to_string()),
            ("b", "completely different content about gardening tools".to_string()),
            ("c", BASE.to_string()),
            ("d", "completely different content about gardening tools".to_string()),
            ("e", "short".to_string()),
        ];
        let dedup = FuzzyDeduplicator::new(FuzzyDedupConfig::default()).unwrap();
        let whole = dedup.find_duplicates(&corpus(vec![docs.clone()])).unwrap();
        let split = dedup
            .find_duplicates(&corpus(vec![
                docs[3..].to_vec(),
                docs[..1].to_vec(),
                docs[1..3].to_vec(),
            ]))
            .unwrap();
        assert_eq!(whole, split);
        assert_eq!(whole.clusters.len(), 2);
    }

    #[test]
    fn test_short_documents_do_not_crash() {
        let corpus = corpus(vec![vec![
            ("a", String::new()),
            ("b", "hi".to_string()),
            ("c", "hi".to_string()),
        ]]);
        let result = FuzzyDeduplicator::new(FuzzyDedupConfig::default())
            .unwrap()
            .find_duplicates(&corpus)
            .unwrap();
        assert_eq!(result.duplicates.iter().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FuzzyDedupConfig {
            rows_per_band: 0,
            ..Default::default()
        };
        assert!(matches!(
            FuzzyDeduplicator::new(config),
            Err(CuratorError::Configuration(_))
        ));
    }
}
