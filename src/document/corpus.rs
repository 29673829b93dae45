//! Partitions and corpora.
//!
//! A [`Partition`] is an ordered run of documents processed as one unit. A
//! [`Corpus`] is the ordered list of partitions that make up a dataset
//! snapshot. Stages consume one corpus snapshot and produce the next; nothing
//! is shared between snapshots.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::error::{CuratorError, Result};

/// An ordered sequence of documents processed as a unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    documents: Vec<Document>,
}

impl Partition {
    /// Create a partition from documents, preserving their order.
    pub fn new(documents: Vec<Document>) -> Self {
        Partition { documents }
    }

    /// The documents in this partition.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Consume the partition and return its documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the partition holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Keep only documents whose id is not in `ids`, preserving order.
    pub fn without_ids(self, ids: &BTreeSet<String>) -> Partition {
        Partition {
            documents: self
                .documents
                .into_iter()
                .filter(|doc| !ids.contains(doc.id()))
                .collect(),
        }
    }
}

impl From<Vec<Document>> for Partition {
    fn from(documents: Vec<Document>) -> Self {
        Partition::new(documents)
    }
}

/// The full set of partitions making up one dataset snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    partitions: Vec<Partition>,
}

impl Corpus {
    /// Create a corpus from partitions in their declared order.
    pub fn new(partitions: Vec<Partition>) -> Self {
        Corpus { partitions }
    }

    /// Build a corpus of unidentified documents from raw texts, `per_partition`
    /// documents at a time.
    pub fn from_texts<I, T>(texts: I, per_partition: usize) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let per_partition = per_partition.max(1);
        let mut partitions = Vec::new();
        let mut current = Vec::with_capacity(per_partition);
        for text in texts {
            current.push(Document::from_text(text));
            if current.len() == per_partition {
                partitions.push(Partition::new(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            partitions.push(Partition::new(current));
        }
        Corpus { partitions }
    }

    /// The partitions in declared order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Consume the corpus and return its partitions.
    pub fn into_partitions(self) -> Vec<Partition> {
        self.partitions
    }

    /// Number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of documents across all partitions.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every document, partition by partition.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.partitions.iter().flat_map(|p| p.documents().iter())
    }

    /// Identifiers of every document, in iteration order.
    pub fn ids(&self) -> Vec<String> {
        self.documents().map(|doc| doc.id().to_string()).collect()
    }

    /// Verify every document has an identifier and no identifier repeats.
    pub fn ensure_unique_ids(&self) -> Result<()> {
        match self.find_id_violation() {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }

    /// The first missing or repeated identifier, with the index of the
    /// partition it was found in.
    pub fn find_id_violation(&self) -> Option<(usize, CuratorError)> {
        let mut seen = HashMap::with_capacity(self.len());
        for (index, partition) in self.partitions.iter().enumerate() {
            for doc in partition.documents() {
                if !doc.has_id() {
                    return Some((
                        index,
                        CuratorError::consistency(
                            "document without an id found where ids were assumed assigned",
                        ),
                    ));
                }
                if let Some(first) = seen.insert(doc.id(), index) {
                    return Some((
                        index,
                        CuratorError::consistency(format!(
                            "duplicate document id '{}' (first seen in partition {first})",
                            doc.id()
                        )),
                    ));
                }
            }
        }
        None
    }

    /// Drop every document whose id is in `ids`, keeping partition layout.
    pub fn without_ids(self, ids: &BTreeSet<String>) -> Corpus {
        if ids.is_empty() {
            return self;
        }
        Corpus {
            partitions: self
                .partitions
                .into_iter()
                .map(|p| p.without_ids(ids))
                .collect(),
        }
    }
}

impl From<Vec<Partition>> for Corpus {
    fn from(partitions: Vec<Partition>) -> Self {
        Corpus::new(partitions)
    }
}
