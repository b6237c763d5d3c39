//! Dependency and configuration fingerprints keying the result cache.

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Digest of everything that can affect a unit's analysis through the
/// dependency graph.
///
/// Computed from the unit's own content hash, the content hashes of every
/// unit transitively reachable through dependency edges, and all
/// global-scope contributors. Equal fingerprints mean no transitively
/// relevant content changed (up to hash collision).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DependencyFingerprint {
    /// The closure was fully resolved and hashed.
    Cacheable(ContentHash),
    /// Some edge in the closure could not be resolved this run, so the
    /// digest would be unsound. Never matches a stored entry and is never
    /// stored itself.
    NotCacheable,
}

impl DependencyFingerprint {
    /// Whether this fingerprint may participate in cache lookups and stores.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Cacheable(_))
    }

    /// Returns the digest for cacheable fingerprints.
    pub fn digest(&self) -> Option<ContentHash> {
        match self {
            Self::Cacheable(hash) => Some(*hash),
            Self::NotCacheable => None,
        }
    }
}

impl fmt::Display for DependencyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cacheable(hash) => write!(f, "{hash}"),
            Self::NotCacheable => write!(f, "<not cacheable>"),
        }
    }
}

/// Digest of the effective configuration for one unit.
///
/// Opaque to the engine: it is produced by the configuration layer and
/// compared only for equality. Any change that could alter analysis output
/// (enabled rules, severities, rule settings) must change the digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ConfigFingerprint(ContentHash);

impl ConfigFingerprint {
    /// Hashes a canonical byte encoding of the effective configuration.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(ContentHash::from_bytes(data))
    }
}

impl fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cacheable_equality_follows_digest() {
        let a = DependencyFingerprint::Cacheable(ContentHash::from_bytes(b"x"));
        let b = DependencyFingerprint::Cacheable(ContentHash::from_bytes(b"x"));
        let c = DependencyFingerprint::Cacheable(ContentHash::from_bytes(b"y"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn not_cacheable_has_no_digest() {
        assert!(DependencyFingerprint::NotCacheable.digest().is_none());
        assert!(!DependencyFingerprint::NotCacheable.is_cacheable());
    }

    #[test]
    fn config_fingerprint_tracks_input() {
        let a = ConfigFingerprint::from_bytes(b"deny=[] warn=[]");
        let b = ConfigFingerprint::from_bytes(b"deny=[] warn=[]");
        let c = ConfigFingerprint::from_bytes(b"deny=[long-line]");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serde_roundtrip() {
        let fp = DependencyFingerprint::Cacheable(ContentHash::from_bytes(b"fp"));
        let json = serde_json::to_string(&fp).unwrap();
        let back: DependencyFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
