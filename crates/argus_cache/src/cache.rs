//! The in-memory result cache shared by parallel analysis workers.

use crate::persistence::StatePersistence;
use crate::state::{ProgramState, StoredEntry};
use argus_common::{ConfigFingerprint, DependencyFingerprint, UnitId};
use argus_diagnostics::Finding;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Number of independently locked shards. Power of two so the shard index
/// is a mask.
const SHARD_COUNT: usize = 16;

/// One cached analysis result with the fingerprints that produced it.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Dependency fingerprint at analysis time (always cacheable).
    pub dep: DependencyFingerprint,
    /// Configuration fingerprint at analysis time.
    pub config: ConfigFingerprint,
    /// Findings of the last complete analysis of the unit.
    pub findings: Vec<Finding>,
}

/// Concurrent map from unit to its last complete analysis result.
///
/// A lookup hits only when the stored dependency and configuration
/// fingerprints both match exactly; `set` unconditionally replaces the
/// unit's entry. Sharded so rayon workers on different units rarely contend
/// on the same lock. Entries are written only for complete analyses, so an
/// interrupted run can never leave a partially-fixed result behind.
pub struct ResultCache {
    shards: Vec<RwLock<HashMap<UnitId, CacheEntry>>>,
}

impl ResultCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();
        Self { shards }
    }

    fn shard(&self, unit: UnitId) -> &RwLock<HashMap<UnitId, CacheEntry>> {
        &self.shards[(unit.as_raw() as usize) & (SHARD_COUNT - 1)]
    }

    /// Looks up the findings stored for `(unit, dep, config)`.
    ///
    /// Non-cacheable dependency fingerprints never hit. A hit returns the
    /// stored findings verbatim.
    pub fn get(
        &self,
        unit: UnitId,
        dep: DependencyFingerprint,
        config: ConfigFingerprint,
    ) -> Option<Vec<Finding>> {
        if !dep.is_cacheable() {
            return None;
        }
        let shard = self.shard(unit).read().unwrap();
        let entry = shard.get(&unit)?;
        if entry.dep == dep && entry.config == config {
            Some(entry.findings.clone())
        } else {
            None
        }
    }

    /// Stores the findings of a complete analysis, replacing any prior
    /// entry for the unit.
    ///
    /// Silently refuses non-cacheable fingerprints: an unsound key must
    /// never shadow a later sound one.
    pub fn set(
        &self,
        unit: UnitId,
        dep: DependencyFingerprint,
        config: ConfigFingerprint,
        findings: Vec<Finding>,
    ) {
        if !dep.is_cacheable() {
            debug!("not caching unit {:?}: fingerprint not cacheable", unit);
            return;
        }
        let mut shard = self.shard(unit).write().unwrap();
        shard.insert(
            unit,
            CacheEntry {
                dep,
                config,
                findings,
            },
        );
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().unwrap().len()).sum()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuilds a cache from persisted state.
    ///
    /// `resolve` maps a stored path to this session's unit id; entries for
    /// paths that no longer resolve (units removed from the project) are
    /// discarded.
    pub fn hydrate(state: ProgramState, resolve: impl Fn(&str) -> Option<UnitId>) -> Self {
        let cache = Self::new();
        let mut kept = 0usize;
        let mut dropped = 0usize;
        for entry in state.entries {
            match resolve(&entry.path) {
                Some(unit) => {
                    cache.set(
                        unit,
                        DependencyFingerprint::Cacheable(entry.dep_digest),
                        entry.config,
                        entry.findings,
                    );
                    kept += 1;
                }
                None => {
                    debug!("dropping cached entry for absent unit {}", entry.path);
                    dropped += 1;
                }
            }
        }
        debug!("cache hydrated: {kept} entries kept, {dropped} dropped");
        cache
    }

    /// Loads persisted state, or starts empty when there is none or it is
    /// unusable (corrupt, wrong version, unreadable).
    pub fn load_or_default(
        persistence: &dyn StatePersistence,
        engine_version: &str,
        resolve: impl Fn(&str) -> Option<UnitId>,
    ) -> Self {
        let Some(raw) = persistence.load() else {
            debug!("no persisted state; starting with a cold cache");
            return Self::new();
        };
        match ProgramState::decode(&raw, engine_version) {
            Some(state) => Self::hydrate(state, resolve),
            None => {
                debug!("persisted state unusable; starting with a cold cache");
                Self::new()
            }
        }
    }

    /// Snapshots the cache into its persistable form.
    ///
    /// `resolve` maps this session's unit ids back to normalized paths.
    /// Entries are sorted by path so identical caches serialize identically.
    pub fn snapshot(&self, resolve: impl Fn(UnitId) -> String) -> ProgramState {
        let mut entries: Vec<StoredEntry> = Vec::with_capacity(self.len());
        for shard in &self.shards {
            let shard = shard.read().unwrap();
            for (&unit, entry) in shard.iter() {
                // Stored entries are always cacheable; set() enforces it.
                if let Some(dep_digest) = entry.dep.digest() {
                    entries.push(StoredEntry {
                        path: resolve(unit),
                        dep_digest,
                        config: entry.config,
                        findings: entry.findings.clone(),
                    });
                }
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        ProgramState { entries }
    }

    /// Persists the cache, best-effort.
    ///
    /// All failures are logged and swallowed: losing the cache costs a cold
    /// start next run, nothing else. Saving an identical state twice is a
    /// harmless overwrite.
    pub fn save(
        &self,
        persistence: &dyn StatePersistence,
        engine_version: &str,
        resolve: impl Fn(UnitId) -> String,
    ) {
        let state = self.snapshot(resolve);
        let blob = match state.encode(engine_version) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("failed to encode cache state: {e}");
                return;
            }
        };
        if let Err(e) = persistence.store(&blob) {
            warn!("failed to persist cache state: {e}");
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
