//! Duplicate detection.
//!
//! Both detectors follow the same shape: each partition is mapped to a local
//! partial result (a digest table or an LSH index), partial results are
//! combined by a commutative, associative `merge`, and clusters are resolved
//! from the merged state. Because the merge ignores order, partitions may be
//! processed in parallel, out of order, or retried without changing the
//! outcome.
//!
//! Every cluster keeps the member with the smallest id (plain string order)
//! and marks the rest as duplicates. Ids from [`crate::document::IdAssigner`]
//! have fixed width suffixes, so for them this is also assignment order.
//!
//! - [`exact::ExactDeduplicator`] - content digests
//! - [`fuzzy::FuzzyDeduplicator`] - MinHash, LSH banding and connected components

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod exact;
pub mod fuzzy;

pub use exact::{ExactDedupConfig, ExactDedupResult, ExactDeduplicator, HashAlgorithm};
pub use fuzzy::{FuzzyDedupConfig, FuzzyDedupResult, FuzzyDeduplicator};

/// A group of documents judged to be duplicates of each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// The retained member; the smallest id in the cluster.
    pub representative: String,
    /// All members in ascending order, representative included.
    pub members: Vec<String>,
}

impl DuplicateCluster {
    /// Build a cluster from its members. Returns `None` for fewer than two
    /// members, since a singleton has nothing to remove.
    pub fn from_members(members: BTreeSet<String>) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }
        let members: Vec<String> = members.into_iter().collect();
        Some(DuplicateCluster {
            representative: members[0].clone(),
            members,
        })
    }

    /// Members other than the representative.
    pub fn duplicates(&self) -> impl Iterator<Item = &str> {
        self.members[1..].iter().map(String::as_str)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cluster has no members. Never true for a built cluster.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Collect the ids marked duplicate across clusters.
pub(crate) fn duplicate_ids(clusters: &[DuplicateCluster]) -> BTreeSet<String> {
    clusters
        .iter()
        .flat_map(|c| c.duplicates().map(str::to_string))
        .collect()
}
