//! Run reports.

use std::time::{Duration, Instant};

use crate::dedup::exact::ExactDedupResult;
use crate::dedup::fuzzy::FuzzyDedupResult;
use crate::document::corpus::Corpus;
use crate::error::CuratorError;

/// Survival counts for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Stage name.
    pub name: String,
    /// Documents entering the stage.
    pub documents_in: usize,
    /// Documents leaving the stage.
    pub documents_out: usize,
    /// Documents dropped because a modifier, filter or annotation failed.
    pub transform_failures: usize,
    /// Wall-clock time spent in the stage.
    pub elapsed: Duration,
}

impl StageReport {
    /// Documents removed by the stage, failures included.
    pub fn dropped(&self) -> usize {
        self.documents_in.saturating_sub(self.documents_out)
    }
}

/// A partition that failed as a whole and was dropped.
#[derive(Debug)]
pub struct PartitionFailure {
    /// Stage that failed.
    pub stage: String,
    /// Index of the partition in the corpus layout.
    pub partition: usize,
    /// The failure.
    pub error: CuratorError,
}

/// The outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// The surviving corpus.
    pub corpus: Corpus,
    /// Per-stage counts in execution order.
    pub stages: Vec<StageReport>,
    /// Partitions dropped after a collaborator failure.
    pub failures: Vec<PartitionFailure>,
    /// Exact deduplication details, if the stage ran.
    pub exact_dedup: Option<ExactDedupResult>,
    /// Fuzzy deduplication details, if the stage ran.
    pub fuzzy_dedup: Option<FuzzyDedupResult>,
}

impl PipelineReport {
    /// Find a stage report by name.
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Total time across stages.
    pub fn total_elapsed(&self) -> Duration {
        self.stages.iter().map(|s| s.elapsed).sum()
    }
}

/// Simple timer for stage execution.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed time.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
