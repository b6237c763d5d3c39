//! Incremental result cache keyed by unit, dependency, and configuration.
//!
//! The [`ResultCache`] maps each unit to the findings of its last complete
//! analysis together with the fingerprints that produced them; a lookup is a
//! hit only when both fingerprints match exactly. Persistence is split off
//! behind [`StatePersistence`]: the cache serializes to a versioned,
//! checksummed binary blob and treats every load problem as an empty cache
//! rather than an error.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod persistence;
pub mod state;

pub use cache::{CacheEntry, ResultCache};
pub use error::CacheError;
pub use persistence::{FsStatePersistence, StatePersistence};
pub use state::{ProgramState, StoredEntry};
