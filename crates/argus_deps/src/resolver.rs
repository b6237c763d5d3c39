//! Per-unit dependency fingerprints over a derived dependency graph.

use crate::compilation::Compilation;
use argus_common::{ArgusResult, ContentHash, DependencyFingerprint, InternalError, UnitId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Folded closure data kept per unit so the fix loop can recompute a
/// fingerprint after an in-memory content change without walking the graph
/// again.
struct ClosureSum {
    /// Commutative sum of every member's content-hash term except the
    /// unit's own.
    rest: u128,
    /// Number of members in the closure (including the unit itself).
    members: u64,
}

/// Combines a folded member sum and member count into the final digest.
///
/// The fold is a wrapping add, so the result is independent of member order
/// and of how members were discovered.
fn digest(sum: u128, members: u64) -> ContentHash {
    let mut buf = [0u8; 24];
    buf[..16].copy_from_slice(&sum.to_le_bytes());
    buf[16..].copy_from_slice(&members.to_le_bytes());
    ContentHash::from_bytes(&buf)
}

/// Derives dependency fingerprints from one [`Compilation`] snapshot.
///
/// Everything is recomputed from scratch at construction: the graph, each
/// unit's reachable closure, and each unit's fingerprint. There is no
/// incremental edge maintenance; precision over bookkeeping. Lookups after
/// construction are `&self` and safe to call from parallel workers.
///
/// A unit's fingerprint input set is
/// `{unit} ∪ reachable(unit) ∪ global_contributors`. A unit is
/// non-cacheable when any member of that set has unresolved edges or an
/// unreadable content hash; unresolved means "could depend on anything",
/// and that uncertainty is transitive.
pub struct DependencyResolver {
    fingerprints: HashMap<UnitId, DependencyFingerprint>,
    closures: HashMap<UnitId, Option<ClosureSum>>,
    globals: Vec<UnitId>,
}

impl DependencyResolver {
    /// Builds the graph and precomputes every unit's fingerprint.
    ///
    /// Returns [`InternalError`] when the snapshot lists the same unit more
    /// than once. Unknown ids merely make the units that mention them
    /// non-cacheable; a duplicated id leaves every edge touching it
    /// ambiguous, so the snapshot as a whole is rejected.
    pub fn from_compilation(comp: &dyn Compilation) -> ArgusResult<Self> {
        let units = comp.units();
        let mut graph: DiGraph<UnitId, ()> = DiGraph::with_capacity(units.len(), units.len());
        let mut index: HashMap<UnitId, NodeIndex> = HashMap::with_capacity(units.len());
        for &u in &units {
            if index.insert(u, graph.add_node(u)).is_some() {
                return Err(InternalError::new(format!(
                    "compilation lists unit {:?} more than once",
                    u
                )));
            }
        }

        let mut tainted: HashSet<UnitId> = HashSet::new();
        let mut hashes: HashMap<UnitId, ContentHash> = HashMap::with_capacity(units.len());
        for &u in &units {
            let edges = comp.edges(u);
            if edges.unresolved > 0 {
                debug!(
                    "unit {:?}: {} unresolved edge(s), fingerprint not cacheable",
                    u, edges.unresolved
                );
                tainted.insert(u);
            }
            for t in edges.targets {
                match index.get(&t) {
                    Some(&ti) => {
                        graph.add_edge(index[&u], ti, ());
                    }
                    None => {
                        // A target outside the unit set is as unknown as a
                        // broken import.
                        debug!("unit {:?}: edge target {:?} not in unit set", u, t);
                        tainted.insert(u);
                    }
                }
            }
            match comp.content_hash(u) {
                Some(h) => {
                    hashes.insert(u, h);
                }
                None => {
                    debug!("unit {:?}: content hash unavailable", u);
                    tainted.insert(u);
                }
            }
        }

        let globals = comp.global_contributors();
        let globals_known = globals.iter().all(|g| index.contains_key(g));
        if !globals_known {
            debug!("global contributor outside unit set; no fingerprint is cacheable this run");
        }

        let mut fingerprints = HashMap::with_capacity(units.len());
        let mut closures = HashMap::with_capacity(units.len());
        for &u in &units {
            let mut members: HashSet<UnitId> = HashSet::new();
            let mut dfs = Dfs::new(&graph, index[&u]);
            while let Some(nx) = dfs.next(&graph) {
                members.insert(graph[nx]);
            }
            members.extend(globals.iter().copied());
            members.insert(u);

            let usable = globals_known && members.iter().all(|m| !tainted.contains(m));
            if !usable {
                fingerprints.insert(u, DependencyFingerprint::NotCacheable);
                closures.insert(u, None);
                continue;
            }

            let mut sum: u128 = 0;
            let mut rest: u128 = 0;
            let mut count: u64 = 0;
            for &m in &members {
                let term = hashes[&m].as_u128();
                sum = sum.wrapping_add(term);
                count += 1;
                if m != u {
                    rest = rest.wrapping_add(term);
                }
            }
            fingerprints.insert(u, DependencyFingerprint::Cacheable(digest(sum, count)));
            closures.insert(
                u,
                Some(ClosureSum {
                    rest,
                    members: count,
                }),
            );
        }

        Ok(Self {
            fingerprints,
            closures,
            globals,
        })
    }

    /// Returns the precomputed fingerprint for a unit.
    ///
    /// Unknown units are non-cacheable rather than an error.
    pub fn fingerprint(&self, unit: UnitId) -> DependencyFingerprint {
        match self.fingerprints.get(&unit) {
            Some(fp) => *fp,
            None => {
                debug!("fingerprint requested for unknown unit {:?}", unit);
                DependencyFingerprint::NotCacheable
            }
        }
    }

    /// Recomputes a unit's fingerprint with its own content hash overridden.
    ///
    /// Used after fixes changed the unit's text in memory: the closure and
    /// every other member's term are reused, only the unit's own term is
    /// replaced. Edges are re-derived on the next full run, when the
    /// compilation sees the stored text again.
    pub fn fingerprint_with(&self, unit: UnitId, own: ContentHash) -> DependencyFingerprint {
        match self.closures.get(&unit) {
            Some(Some(c)) => {
                DependencyFingerprint::Cacheable(digest(c.rest.wrapping_add(own.as_u128()), c.members))
            }
            Some(None) => DependencyFingerprint::NotCacheable,
            None => {
                debug!("fingerprint_with requested for unknown unit {:?}", unit);
                DependencyFingerprint::NotCacheable
            }
        }
    }

    /// The global-scope contributors of the underlying compilation.
    pub fn global_contributors(&self) -> &[UnitId] {
        &self.globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilation::EdgeResolution;

    struct FakeCompilation {
        units: Vec<UnitId>,
        edges: HashMap<UnitId, EdgeResolution>,
        content: HashMap<UnitId, &'static str>,
        globals: Vec<UnitId>,
    }

    impl FakeCompilation {
        fn new() -> Self {
            Self {
                units: Vec::new(),
                edges: HashMap::new(),
                content: HashMap::new(),
                globals: Vec::new(),
            }
        }

        fn unit(mut self, id: u32, content: &'static str, deps: &[u32]) -> Self {
            let uid = UnitId::from_raw(id);
            self.units.push(uid);
            self.content.insert(uid, content);
            self.edges.insert(
                uid,
                EdgeResolution::resolved(deps.iter().map(|&d| UnitId::from_raw(d)).collect()),
            );
            self
        }

        fn broken(mut self, id: u32, count: usize) -> Self {
            let uid = UnitId::from_raw(id);
            self.edges
                .entry(uid)
                .or_insert_with(EdgeResolution::default)
                .unresolved = count;
            self
        }

        fn global(mut self, id: u32) -> Self {
            self.globals.push(UnitId::from_raw(id));
            self
        }
    }

    impl Compilation for FakeCompilation {
        fn units(&self) -> Vec<UnitId> {
            self.units.clone()
        }

        fn edges(&self, unit: UnitId) -> EdgeResolution {
            self.edges.get(&unit).cloned().unwrap_or_default()
        }

        fn content_hash(&self, unit: UnitId) -> Option<ContentHash> {
            self.content
                .get(&unit)
                .map(|c| ContentHash::from_bytes(c.as_bytes()))
        }

        fn global_contributors(&self) -> Vec<UnitId> {
            self.globals.clone()
        }
    }

    fn id(n: u32) -> UnitId {
        UnitId::from_raw(n)
    }

    #[test]
    fn identical_snapshots_produce_identical_fingerprints() {
        let build = || {
            DependencyResolver::from_compilation(
                &FakeCompilation::new()
                    .unit(0, "alpha", &[1])
                    .unit(1, "beta", &[]),
            )
            .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.fingerprint(id(0)), b.fingerprint(id(0)));
        assert_eq!(a.fingerprint(id(1)), b.fingerprint(id(1)));
        assert!(a.fingerprint(id(0)).is_cacheable());
    }

    #[test]
    fn edge_order_does_not_matter() {
        let forward = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "root", &[1, 2])
                .unit(1, "one", &[])
                .unit(2, "two", &[]),
        )
        .unwrap();
        let backward = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "root", &[2, 1])
                .unit(1, "one", &[])
                .unit(2, "two", &[]),
        )
        .unwrap();
        assert_eq!(forward.fingerprint(id(0)), backward.fingerprint(id(0)));
    }

    #[test]
    fn transitive_change_invalidates_dependents_only() {
        let before = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[1])
                .unit(1, "b", &[2])
                .unit(2, "c", &[])
                .unit(3, "standalone", &[]),
        )
        .unwrap();
        let after = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[1])
                .unit(1, "b", &[2])
                .unit(2, "c changed", &[])
                .unit(3, "standalone", &[]),
        )
        .unwrap();
        // every unit reaching 2 changes
        assert_ne!(before.fingerprint(id(0)), after.fingerprint(id(0)));
        assert_ne!(before.fingerprint(id(1)), after.fingerprint(id(1)));
        assert_ne!(before.fingerprint(id(2)), after.fingerprint(id(2)));
        // the standalone unit does not
        assert_eq!(before.fingerprint(id(3)), after.fingerprint(id(3)));
    }

    #[test]
    fn global_contributor_change_invalidates_everything() {
        let before = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[])
                .unit(1, "b", &[])
                .unit(2, "ambient", &[])
                .global(2),
        )
        .unwrap();
        let after = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[])
                .unit(1, "b", &[])
                .unit(2, "ambient changed", &[])
                .global(2),
        )
        .unwrap();
        assert_ne!(before.fingerprint(id(0)), after.fingerprint(id(0)));
        assert_ne!(before.fingerprint(id(1)), after.fingerprint(id(1)));
    }

    #[test]
    fn broken_import_taints_unit_and_dependents() {
        let resolver = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[1])
                .unit(1, "b", &[])
                .broken(1, 1)
                .unit(2, "clean", &[]),
        )
        .unwrap();
        assert_eq!(
            resolver.fingerprint(id(1)),
            DependencyFingerprint::NotCacheable
        );
        assert_eq!(
            resolver.fingerprint(id(0)),
            DependencyFingerprint::NotCacheable,
            "uncertainty must propagate to dependents"
        );
        assert!(resolver.fingerprint(id(2)).is_cacheable());
    }

    #[test]
    fn edge_to_unknown_unit_taints_owner() {
        let resolver = DependencyResolver::from_compilation(
            &FakeCompilation::new().unit(0, "a", &[7]).unit(1, "b", &[]),
        )
        .unwrap();
        assert_eq!(
            resolver.fingerprint(id(0)),
            DependencyFingerprint::NotCacheable
        );
        assert!(resolver.fingerprint(id(1)).is_cacheable());
    }

    #[test]
    fn duplicate_unit_id_is_rejected() {
        let result = DependencyResolver::from_compilation(
            &FakeCompilation::new().unit(0, "a", &[]).unit(0, "a again", &[]),
        );
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert!(err.message.contains("more than once"));
    }

    #[test]
    fn cycles_are_handled() {
        let before = DependencyResolver::from_compilation(
            &FakeCompilation::new().unit(0, "a", &[1]).unit(1, "b", &[0]),
        )
        .unwrap();
        assert!(before.fingerprint(id(0)).is_cacheable());
        assert!(before.fingerprint(id(1)).is_cacheable());

        let after = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "a", &[1])
                .unit(1, "b changed", &[0]),
        )
        .unwrap();
        assert_ne!(before.fingerprint(id(0)), after.fingerprint(id(0)));
        assert_ne!(before.fingerprint(id(1)), after.fingerprint(id(1)));
    }

    #[test]
    fn fingerprint_with_matches_full_computation() {
        let resolver = DependencyResolver::from_compilation(
            &FakeCompilation::new()
                .unit(0, "root", &[1])
                .unit(1, "dep", &[]),
        )
        .unwrap();
        // overriding with the actual content hash reproduces the precomputed value
        let own = ContentHash::from_bytes(b"root");
        assert_eq!(resolver.fingerprint_with(id(0), own), resolver.fingerprint(id(0)));

        // overriding with different content changes it
        let edited = ContentHash::from_bytes(b"root edited");
        assert_ne!(resolver.fingerprint_with(id(0), edited), resolver.fingerprint(id(0)));
        assert!(resolver.fingerprint_with(id(0), edited).is_cacheable());
    }

    #[test]
    fn fingerprint_with_preserves_taint() {
        let resolver = DependencyResolver::from_compilation(
            &FakeCompilation::new().unit(0, "a", &[]).broken(0, 2),
        )
        .unwrap();
        let own = ContentHash::from_bytes(b"whatever");
        assert_eq!(
            resolver.fingerprint_with(id(0), own),
            DependencyFingerprint::NotCacheable
        );
    }

    #[test]
    fn unknown_unit_is_not_cacheable() {
        let resolver = DependencyResolver::from_compilation(&FakeCompilation::new()).unwrap();
        assert_eq!(
            resolver.fingerprint(id(99)),
            DependencyFingerprint::NotCacheable
        );
    }
}
