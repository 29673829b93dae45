//! MinHash signatures.
//!
//! Each hash function is an affine permutation `(a * x + b) mod p` of the
//! shingle hash `x`, with `p = 2^61 - 1`. The coefficients come from a
//! seeded [`StdRng`], so the same seed always produces the same family of
//! functions and signatures are comparable across partitions and runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// The Mersenne prime `2^61 - 1`.
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// The ordered minima of every hash function over a shingle set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinHashSignature(Vec<u64>);

impl MinHashSignature {
    /// Wrap precomputed values.
    pub fn new(values: Vec<u64>) -> Self {
        MinHashSignature(values)
    }

    /// Get the signature values.
    pub fn values(&self) -> &[u64] {
        &self.0
    }

    /// Number of hash functions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the signature has no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Estimate Jaccard similarity as the fraction of equal rows.
    ///
    /// Signatures of different lengths are compared over the shorter one,
    /// divided by the longer one.
    pub fn estimate_similarity(&self, other: &MinHashSignature) -> f64 {
        let total = self.len().max(other.len());
        if total == 0 {
            return 0.0;
        }
        let equal = self.0.iter().zip(&other.0).filter(|(a, b)| a == b).count();
        equal as f64 / total as f64
    }
}

/// A seeded family of MinHash functions.
#[derive(Debug, Clone)]
pub struct MinHasher {
    coefficients: Vec<(u64, u64)>,
}

impl MinHasher {
    /// Create `num_hashes` functions from `seed`.
    pub fn new(num_hashes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let coefficients = (0..num_hashes)
            .map(|_| {
                (
                    rng.random_range(1..MERSENNE_PRIME),
                    rng.random_range(0..MERSENNE_PRIME),
                )
            })
            .collect();
        MinHasher { coefficients }
    }

    /// Number of hash functions.
    pub fn num_hashes(&self) -> usize {
        self.coefficients.len()
    }

    /// Compute the signature of a shingle hash set.
    ///
    /// An empty set yields `u64::MAX` in every row.
    pub fn signature(&self, shingles: &[u64]) -> MinHashSignature {
        let values = self
            .coefficients
            .iter()
            .map(|&(a, b)| {
                shingles
                    .iter()
                    .map(|&x| permute(a, b, x))
                    .min()
                    .unwrap_or(u64::MAX)
            })
            .collect();
        MinHashSignature(values)
    }
}

#[inline]
fn permute(a: u64, b: u64, x: u64) -> u64 {
    ((a as u128 * x as u128 + b as u128) % MERSENNE_PRIME as u128) as u64
}
