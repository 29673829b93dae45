//! Per-partition stage abstraction.
//!
//! Modifiers, filters and classification collaborators all run one partition
//! at a time and never look across partitions. They share the
//! [`PartitionStage`] seam so the orchestrator can schedule them identically.
//!
//! A stage reads its input partition and builds a new one; the input is never
//! touched, so a stage that fails half way leaves nothing partially applied.

use crate::document::corpus::Partition;
use crate::error::{CuratorError, Result};

/// The result of running a stage over one partition.
#[derive(Debug, Default)]
pub struct PartitionOutcome {
    /// Surviving, possibly transformed, documents in input order.
    pub partition: Partition,
    /// Documents that failed and were dropped, one error each.
    pub failures: Vec<CuratorError>,
}

impl PartitionOutcome {
    /// Create an outcome with no per-document failures.
    pub fn new(partition: Partition) -> Self {
        PartitionOutcome {
            partition,
            failures: Vec::new(),
        }
    }

    /// Attach per-document failures.
    pub fn with_failures(mut self, failures: Vec<CuratorError>) -> Self {
        self.failures = failures;
        self
    }
}

/// A stage that transforms or filters each partition independently.
pub trait PartitionStage: Send + Sync {
    /// Stage name used in reports and logs.
    fn name(&self) -> &str;

    /// Process one partition.
    ///
    /// Per-document problems are returned in [`PartitionOutcome::failures`].
    /// An `Err` means the whole partition failed and is fatal for that
    /// partition only.
    fn process(&self, partition_index: usize, partition: &Partition) -> Result<PartitionOutcome>;
}
