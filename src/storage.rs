//! Corpus storage collaborators.
//!
//! The curation core never assumes a file format. It only needs to read and
//! write partitions independently, which is what [`CorpusStore`] offers.
//! Writes replace a whole partition at once, so an interrupted run never
//! leaves a partially written partition behind.
//!
//! # Backends
//!
//! - [`memory::MemoryStore`] - in-memory partitions for tests and small jobs
//! - [`jsonl::JsonlStore`] - one `part-NNNNN.jsonl` file per partition
//!
//! # Example
//!
//! ```
//! use curator::document::{Corpus, Document, Partition};
//! use curator::storage::CorpusStore;
//! use curator::storage::memory::MemoryStore;
//!
//! # fn main() -> curator::error::Result<()> {
//! let store = MemoryStore::new();
//! let corpus = Corpus::new(vec![Partition::new(vec![Document::new("a", "text")])]);
//! store.write_corpus(&corpus)?;
//!
//! assert_eq!(store.read_corpus()?, corpus);
//! # Ok(())
//! # }
//! ```

use crate::document::corpus::{Corpus, Partition};
use crate::error::Result;

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

/// Stage name used in errors raised by storage backends.
pub const STORAGE_STAGE: &str = "storage";

/// A backend holding a corpus as independently readable partitions.
///
/// Backend failures surface as
/// [`CuratorError::Collaborator`](crate::error::CuratorError::Collaborator)
/// naming the partition.
pub trait CorpusStore: Send + Sync + std::fmt::Debug {
    /// Number of partitions; valid indexes are `0..partition_count()`.
    fn partition_count(&self) -> Result<usize>;

    /// Read one partition.
    fn read_partition(&self, index: usize) -> Result<Partition>;

    /// Replace one partition.
    fn write_partition(&self, index: usize, partition: &Partition) -> Result<()>;

    /// Read every partition in order.
    fn read_corpus(&self) -> Result<Corpus> {
        let partitions = (0..self.partition_count()?)
            .map(|index| self.read_partition(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Corpus::new(partitions))
    }

    /// Write every partition of a corpus.
    fn write_corpus(&self, corpus: &Corpus) -> Result<()> {
        for (index, partition) in corpus.partitions().iter().enumerate() {
            self.write_partition(index, partition)?;
        }
        Ok(())
    }
}
