//! In-memory corpus store for testing and small jobs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::document::corpus::{Corpus, Partition};
use crate::error::{CuratorError, Result};
use crate::storage::{CorpusStore, STORAGE_STAGE};

/// Partitions held in memory.
///
/// Clones share the same underlying partitions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    partitions: Arc<Mutex<BTreeMap<usize, Partition>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a corpus.
    pub fn from_corpus(corpus: Corpus) -> Self {
        MemoryStore {
            partitions: Arc::new(Mutex::new(
                corpus.into_partitions().into_iter().enumerate().collect(),
            )),
        }
    }

    fn lock(&self, index: usize) -> Result<MutexGuard<'_, BTreeMap<usize, Partition>>> {
        self.partitions
            .lock()
            .map_err(|_| CuratorError::collaborator(STORAGE_STAGE, index, "memory store lock poisoned"))
    }
}

impl CorpusStore for MemoryStore {
    fn partition_count(&self) -> Result<usize> {
        Ok(self
            .lock(0)?
            .keys()
            .next_back()
            .map_or(0, |last| last + 1))
    }

    fn read_partition(&self, index: usize) -> Result<Partition> {
        self.lock(index)?.get(&index).cloned().ok_or_else(|| {
            CuratorError::collaborator(STORAGE_STAGE, index, "partition does not exist")
        })
    }

    fn write_partition(&self, index: usize, partition: &Partition) -> Result<()> {
        self.lock(index)?.insert(index, partition.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::document::Document;

    #[test]
    fn test_round_trip_and_replace() {
        let store = MemoryStore::from_corpus(Corpus::from_texts(["a", "b", "c"], 2));
        assert_eq!(store.partition_count().unwrap(), 2);

        let replacement = Partition::new(vec![Document::new("x", "new")]);
        store.write_partition(1, &replacement).unwrap();
        assert_eq!(store.read_partition(1).unwrap(), replacement);
        assert_eq!(store.read_corpus().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_partition() {
        let store = MemoryStore::new();
        store.write_partition(2, &Partition::default()).unwrap();
        assert_eq!(store.partition_count().unwrap(), 3);
        assert!(matches!(
            store.read_partition(0),
            Err(CuratorError::Collaborator { partition: 0, .. })
        ));
    }
}
