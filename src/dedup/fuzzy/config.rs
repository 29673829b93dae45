//! Fuzzy deduplication configuration.

use serde::{Deserialize, Serialize};

use crate::dedup::fuzzy::lsh::LshParams;
use crate::error::{CuratorError, Result};

/// Options for MinHash + LSH near-duplicate detection.
///
/// With the defaults (20 bands of 13 rows) the collision probability curve
/// crosses one half near Jaccard similarity 0.79. See
/// [`LshParams::approximate_threshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzyDedupConfig {
    /// Character shingle width.
    pub shingle_width: usize,
    /// Number of LSH bands.
    pub num_bands: usize,
    /// Signature rows per band.
    pub rows_per_band: usize,
    /// Recompute exact Jaccard similarity for candidate pairs and drop the
    /// ones below `similarity_threshold`.
    pub use_false_positive_check: bool,
    /// Minimum Jaccard similarity kept by the false positive check.
    pub similarity_threshold: f64,
    /// Seed for the MinHash permutations.
    pub seed: u64,
}

impl Default for FuzzyDedupConfig {
    fn default() -> Self {
        Self {
            shingle_width: 24,
            num_bands: 20,
            rows_per_band: 13,
            use_false_positive_check: false,
            similarity_threshold: 0.8,
            seed: 42,
        }
    }
}

impl FuzzyDedupConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.shingle_width == 0 {
            return Err(CuratorError::configuration("shingle_width must be positive"));
        }
        if self.num_bands == 0 || self.rows_per_band == 0 {
            return Err(CuratorError::configuration(
                "num_bands and rows_per_band must be positive",
            ));
        }
        if self.num_bands.checked_mul(self.rows_per_band).is_none() {
            return Err(CuratorError::configuration("num_bands * rows_per_band overflows"));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CuratorError::configuration(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    /// Total number of MinHash functions.
    pub fn num_hashes(&self) -> usize {
        self.num_bands * self.rows_per_band
    }

    /// The banding parameters.
    pub fn lsh_params(&self) -> LshParams {
        LshParams::new(self.num_bands, self.rows_per_band)
    }
}
