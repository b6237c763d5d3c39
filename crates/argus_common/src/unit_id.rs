//! Interned unit identifiers for cheap cloning and O(1) equality comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A unique identifier for one analyzable unit in the project.
///
/// A unit's identity is its normalized path, interned as a `u32` index into
/// a per-session string interner. This provides O(1) equality comparison and
/// O(1) cloning for graph nodes and cache keys. Ids are only meaningful
/// within the session that interned them; persisted state stores the path
/// string instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a `UnitId` from a raw `u32` index.
    ///
    /// This is primarily intended for deserialization and testing.
    /// In normal use, ids should be created through [`UnitInterner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this id.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `UnitId` wraps a `u32` which is always a valid `usize` on 32-bit
// and 64-bit platforms. `try_from_usize` rejects values that don't fit in
// `u32`.
unsafe impl lasso::Key for UnitId {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(UnitId)
    }
}

/// Thread-safe interner mapping normalized unit paths to [`UnitId`]s.
///
/// Backed by [`lasso::ThreadedRodeo`] so rayon workers can intern and
/// resolve concurrently without locking on the caller side.
pub struct UnitInterner {
    rodeo: ThreadedRodeo<UnitId>,
}

impl UnitInterner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a normalized path, returning its [`UnitId`]. If the path was
    /// already interned, returns the existing id without allocating.
    pub fn get_or_intern(&self, path: &str) -> UnitId {
        self.rodeo.get_or_intern(path)
    }

    /// Looks up the id for a path without interning it.
    pub fn get(&self, path: &str) -> Option<UnitId> {
        self.rodeo.get(path)
    }

    /// Resolves a [`UnitId`] back to its path string.
    ///
    /// # Panics
    ///
    /// Panics if the `UnitId` was not created by this interner.
    pub fn resolve(&self, unit: UnitId) -> &str {
        self.rodeo.resolve(&unit)
    }
}

impl Default for UnitInterner {
    fn default() -> Self {
        Self::new()
    }
}
