//! Persisted program state: the serializable form of the result cache.
//!
//! The on-disk form keys entries by normalized path string because unit ids
//! are interner indexes local to one session. The blob carries a header
//! with magic bytes, format version, engine version, and a payload checksum;
//! any mismatch reads as no state at all.

use crate::error::CacheError;
use argus_common::{ConfigFingerprint, ContentHash};
use argus_diagnostics::Finding;
use serde::{Deserialize, Serialize};

/// Magic bytes identifying an argus state blob.
const STATE_MAGIC: [u8; 4] = *b"ARGS";

/// Current state format version. Increment on breaking changes to the
/// header or payload format.
const STATE_FORMAT_VERSION: u32 = 1;

/// Header prepended to the state blob for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateHeader {
    /// Magic bytes: must be `b"ARGS"`.
    magic: [u8; 4],

    /// State format version.
    format_version: u32,

    /// Engine version that produced this state.
    engine_version: String,

    /// Content hash of the payload (for integrity checks).
    checksum: ContentHash,
}

/// One persisted cache entry.
///
/// Only cacheable dependency fingerprints are ever stored, so the digest is
/// stored directly rather than the fingerprint enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Normalized unit path (the unit's identity across sessions).
    pub path: String,
    /// Digest of the dependency fingerprint the findings were computed under.
    pub dep_digest: ContentHash,
    /// Configuration fingerprint the findings were computed under.
    pub config: ConfigFingerprint,
    /// The findings of the last complete analysis.
    pub findings: Vec<Finding>,
}

/// The complete persisted state of one project's result cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramState {
    /// Entries, sorted by path for deterministic serialization.
    pub entries: Vec<StoredEntry>,
}

impl ProgramState {
    /// Encodes the state into a self-validating binary blob.
    pub fn encode(&self, engine_version: &str) -> Result<Vec<u8>, CacheError> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(
            |e| CacheError::Serialization {
                reason: e.to_string(),
            },
        )?;

        let header = StateHeader {
            magic: STATE_MAGIC,
            format_version: STATE_FORMAT_VERSION,
            engine_version: engine_version.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);
        Ok(output)
    }

    /// Decodes a state blob, validating magic, versions, and checksum.
    ///
    /// Returns `None` if the blob is truncated, corrupt, was written by a
    /// different format or engine version, or fails the checksum. This is
    /// fail-safe: any problem is a cold cache.
    pub fn decode(raw: &[u8], engine_version: &str) -> Option<Self> {
        if raw.len() < 4 {
            return None;
        }

        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }

        let header: StateHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;

        if header.magic != STATE_MAGIC {
            return None;
        }
        if header.format_version != STATE_FORMAT_VERSION {
            return None;
        }
        if header.engine_version != engine_version {
            return None;
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .ok()
            .map(|(state, _)| state)
    }
}
