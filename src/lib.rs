//! # Curator
//!
//! Corpus curation for training data: cleaning, quality filtering,
//! classification, exact and near-duplicate removal.
//!
//! ## Features
//!
//! - Deterministic text modifiers composed into pipelines
//! - Heuristic quality filters with AND/OR composition
//! - Pluggable classification and PII detection backends
//! - Exact deduplication by content digest
//! - Fuzzy deduplication with MinHash, LSH banding and connected components
//! - Partition-parallel execution with order independent merges
//! - In-memory and JSON Lines corpus stores

pub mod classify;
pub mod dedup;
pub mod document;
pub mod error;
pub mod filter;
pub mod modifier;
pub mod pipeline;
pub mod stage;
pub mod storage;

pub mod prelude {
    pub use crate::dedup::{ExactDeduplicator, FuzzyDedupConfig, FuzzyDeduplicator};
    pub use crate::document::{Corpus, Document, MetaValue, Partition};
    pub use crate::error::{CuratorError, Result};
    pub use crate::filter::{DocumentFilter, FilterChain, FilterMode};
    pub use crate::modifier::{Modifier, Sequential};
    pub use crate::pipeline::CurationPipeline;
    pub use crate::pipeline::config::PipelineConfig;
    pub use crate::stage::PartitionStage;
    pub use crate::storage::CorpusStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
