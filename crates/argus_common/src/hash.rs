//! Content hashing for cache invalidation and incremental analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit content hash computed using XXH3 for cache invalidation.
///
/// Two units with the same `ContentHash` are assumed to have identical
/// content. Used throughout the engine to detect when source units or
/// configuration have changed and results need recomputation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Reinterprets the hash as a little-endian `u128`.
    ///
    /// Fingerprint computation folds hashes with commutative arithmetic,
    /// which needs an integer view of the digest.
    pub fn as_u128(self) -> u128 {
        u128::from_le_bytes(self.0)
    }

    /// Builds a hash directly from a `u128` value.
    ///
    /// The inverse of [`ContentHash::as_u128`]; used when a combined digest
    /// is assembled from folded components rather than hashed bytes.
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
