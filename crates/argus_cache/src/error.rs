//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache persistence.
///
/// Cache reads are fail-safe and never surface these: a problem on load is
/// an empty cache. The enum exists for the write side, where the caller
/// decides whether to warn or ignore.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
