//! Locality sensitive hashing by banding.
//!
//! A signature of `B * R` rows is cut into `B` bands of `R` rows. Each band
//! is hashed to a key, and documents sharing a key in any band become
//! candidate pairs. For two sets with Jaccard similarity `s` the chance of
//! sharing at least one band key is
//!
//! ```text
//! P(s) = 1 - (1 - s^R)^B
//! ```
//!
//! which rises steeply around `s ~ (1/B)^(1/R)`. For the default `B = 20`,
//! `R = 13` that point is about 0.794, and `P(0.8) ~ 0.68`, `P(0.9) ~ 0.997`,
//! `P(0.5) ~ 0.002`. The curve assumes independent hash functions, so treat
//! it as a guide rather than a guarantee.

use std::collections::BTreeSet;

use ahash::AHashMap;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::dedup::fuzzy::minhash::MinHashSignature;

/// Banding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LshParams {
    pub num_bands: usize,
    pub rows_per_band: usize,
}

impl LshParams {
    pub fn new(num_bands: usize, rows_per_band: usize) -> Self {
        LshParams {
            num_bands,
            rows_per_band,
        }
    }

    /// Probability that two sets with Jaccard similarity `similarity`
    /// share at least one band key.
    pub fn collision_probability(&self, similarity: f64) -> f64 {
        let s = similarity.clamp(0.0, 1.0);
        1.0 - (1.0 - s.powi(self.rows_per_band as i32)).powi(self.num_bands as i32)
    }

    /// The similarity where the collision curve is steepest, `(1/B)^(1/R)`.
    pub fn approximate_threshold(&self) -> f64 {
        (1.0 / self.num_bands as f64).powf(1.0 / self.rows_per_band as f64)
    }

    /// Hash each band of a signature to a key. Band `i` is hashed with
    /// seed `i`, so equal rows in different bands give different keys.
    pub fn band_keys(&self, signature: &MinHashSignature) -> Vec<u64> {
        signature
            .values()
            .chunks(self.rows_per_band)
            .take(self.num_bands)
            .enumerate()
            .map(|(band, rows)| {
                let bytes: Vec<u8> = rows.iter().flat_map(|v| v.to_le_bytes()).collect();
                xxh3_64_with_seed(&bytes, band as u64)
            })
            .collect()
    }
}

/// Per-band bucket tables mapping band keys to document ids.
#[derive(Debug, Clone)]
pub struct LshIndex {
    bands: Vec<AHashMap<u64, BTreeSet<String>>>,
}

impl LshIndex {
    /// Create an empty index with `num_bands` tables.
    pub fn new(num_bands: usize) -> Self {
        LshIndex {
            bands: vec![AHashMap::new(); num_bands],
        }
    }

    /// Number of bands.
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Insert a document's band keys.
    pub fn insert(&mut self, id: &str, band_keys: &[u64]) {
        for (table, key) in self.bands.iter_mut().zip(band_keys) {
            table.entry(*key).or_default().insert(id.to_string());
        }
    }

    /// Union of two indexes, bucket by bucket.
    pub fn merge(mut self, other: LshIndex) -> LshIndex {
        if self.bands.len() < other.bands.len() {
            self.bands.resize_with(other.bands.len(), AHashMap::new);
        }
        for (table, other_table) in self.bands.iter_mut().zip(other.bands) {
            for (key, ids) in other_table {
                table.entry(key).or_default().extend(ids);
            }
        }
        self
    }

    /// Buckets holding more than one id, across all bands, sorted.
    pub fn shared_buckets(&self) -> BTreeSet<Vec<String>> {
        self.bands
            .iter()
            .flat_map(|table| table.values())
            .filter(|ids| ids.len() > 1)
            .map(|ids| ids.iter().cloned().collect())
            .collect()
    }

    /// Every pair of ids sharing a bucket in some band, as `(smaller, larger)`.
    pub fn candidate_pairs(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        for bucket in self.shared_buckets() {
            for (i, left) in bucket.iter().enumerate() {
                for right in &bucket[i + 1..] {
                    pairs.insert((left.clone(), right.clone()));
                }
            }
        }
        pairs
    }
}
