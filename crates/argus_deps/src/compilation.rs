//! The boundary to the collaborator that understands project structure.

use argus_common::{ContentHash, UnitId};

/// The outcome of resolving one unit's outgoing dependency edges.
#[derive(Clone, Debug, Default)]
pub struct EdgeResolution {
    /// Units this unit depends on directly.
    pub targets: Vec<UnitId>,
    /// Number of edges whose target could not be resolved (broken imports).
    ///
    /// Any nonzero value makes the owning unit's fingerprint non-cacheable:
    /// an unknown target could name anything, so no digest of the known
    /// closure is sound.
    pub unresolved: usize,
}

impl EdgeResolution {
    /// An edge set with the given resolved targets and no failures.
    pub fn resolved(targets: Vec<UnitId>) -> Self {
        Self {
            targets,
            unresolved: 0,
        }
    }
}

/// A snapshot of the project's structure as seen by an external language
/// front end.
///
/// The engine never parses anything itself: unit membership, dependency
/// edges, content hashes, and global-scope contributors all come through
/// this trait. Implementations must be consistent within one snapshot
/// (every id returned anywhere appears in [`units`](Compilation::units));
/// an id that violates this is treated as unresolvable rather than as an
/// error.
pub trait Compilation: Sync {
    /// All units in the project, in any order, each listed exactly once.
    ///
    /// A duplicated id is the one violation the resolver refuses to work
    /// around; see
    /// [`DependencyResolver::from_compilation`](crate::DependencyResolver::from_compilation).
    fn units(&self) -> Vec<UnitId>;

    /// Resolves the unit's direct dependency edges.
    fn edges(&self, unit: UnitId) -> EdgeResolution;

    /// Hash of the unit's current stored content, or `None` if the unit
    /// cannot be read in this snapshot.
    fn content_hash(&self, unit: UnitId) -> Option<ContentHash>;

    /// Units that can affect any other unit's semantics without an explicit
    /// edge (ambient declaration files and the like). They join every
    /// unit's fingerprint input.
    fn global_contributors(&self) -> Vec<UnitId>;
}
