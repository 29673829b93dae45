//! Pipeline configuration.
//!
//! ```
//! use curator::pipeline::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{
//!     "modifiers": [{"type": "whitespace"}],
//!     "filters": [{"type": "word_count", "min_words": 3}],
//!     "exact_dedup": {"hash": "sha256"},
//!     "fuzzy_dedup": {"num_bands": 10, "rows_per_band": 5}
//! }"#).unwrap();
//!
//! assert_eq!(config.filters.len(), 1);
//! assert_eq!(config.fuzzy_dedup.unwrap().num_hashes(), 50);
//! ```

use serde::{Deserialize, Serialize};

use crate::dedup::exact::ExactDedupConfig;
use crate::dedup::fuzzy::FuzzyDedupConfig;
use crate::document::ids::IdAssignmentConfig;
use crate::error::{CuratorError, Result};
use crate::filter::chain::FilterMode;
use crate::filter::config::FilterConfig;
use crate::modifier::config::ModifierConfig;

/// Configuration for a complete curation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Modifiers applied in order.
    pub modifiers: Vec<ModifierConfig>,
    /// Quality filters.
    pub filters: Vec<FilterConfig>,
    /// How filter decisions combine.
    pub filter_mode: FilterMode,
    /// Store each filter score on surviving documents.
    pub record_filter_scores: bool,
    /// Id assignment. `null` keeps the ids documents arrived with.
    pub ids: Option<IdAssignmentConfig>,
    /// Exact deduplication, disabled when absent.
    pub exact_dedup: Option<ExactDedupConfig>,
    /// Fuzzy deduplication, disabled when absent.
    pub fuzzy_dedup: Option<FuzzyDedupConfig>,
    /// Worker threads. Defaults to the number of CPUs.
    pub thread_pool_size: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            modifiers: Vec::new(),
            filters: Vec::new(),
            filter_mode: FilterMode::All,
            record_filter_scores: false,
            ids: Some(IdAssignmentConfig::default()),
            exact_dedup: Some(ExactDedupConfig::default()),
            fuzzy_dedup: Some(FuzzyDedupConfig::default()),
            thread_pool_size: None,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)
            .map_err(|e| CuratorError::configuration(format!("invalid pipeline configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every stage configuration.
    pub fn validate(&self) -> Result<()> {
        for modifier in &self.modifiers {
            modifier.build()?;
        }
        FilterConfig::build_chain(&self.filters, self.filter_mode)?;
        if let Some(ids) = &self.ids {
            ids.validate()?;
        }
        if let Some(fuzzy) = &self.fuzzy_dedup {
            fuzzy.validate()?;
        }
        if self.thread_pool_size == Some(0) {
            return Err(CuratorError::configuration("thread_pool_size must be positive"));
        }
        Ok(())
    }
}
