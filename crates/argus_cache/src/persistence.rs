//! Storage boundary for persisted program state.

use crate::error::CacheError;
use std::path::{Path, PathBuf};

/// Where state blobs are read from and written to.
///
/// The cache itself never touches storage directly; embedders can supply a
/// database, an object store, or nothing at all. `load` is fail-safe by
/// contract (problems are `None`), `store` reports its error and the caller
/// decides whether anyone cares.
pub trait StatePersistence: Sync {
    /// Reads the last stored blob, or `None` if there is none or it cannot
    /// be read.
    fn load(&self) -> Option<Vec<u8>>;

    /// Stores a blob, replacing any previous one.
    fn store(&self, bytes: &[u8]) -> Result<(), CacheError>;
}

/// Filesystem-backed persistence under a cache directory.
///
/// Writes go to a temp file first and are renamed into place so a crash
/// mid-write leaves the previous state intact.
pub struct FsStatePersistence {
    state_path: PathBuf,
}

impl FsStatePersistence {
    /// Creates persistence rooted at the given cache directory.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            state_path: cache_dir.join("state.bin"),
        }
    }

    /// The path of the state file.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Removes the stored state, if any. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, CacheError> {
        match std::fs::remove_file(&self.state_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::Io {
                path: self.state_path.clone(),
                source: e,
            }),
        }
    }
}

impl StatePersistence for FsStatePersistence {
    fn load(&self) -> Option<Vec<u8>> {
        std::fs::read(&self.state_path).ok()
    }

    fn store(&self, bytes: &[u8]) -> Result<(), CacheError> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let tmp = self.state_path.with_extension("bin.tmp");
        std::fs::write(&tmp, bytes).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.state_path).map_err(|e| CacheError::Io {
            path: self.state_path.clone(),
            source: e,
        })
    }
}
