//! Directive-scanning [`Compilation`] over loaded units.
//!
//! The engine proper treats project structure as an external concern; this
//! module is the bundled front end for plain-text projects. It recognizes
//! line-leading `import`, `include`, and `export` directives whose first
//! double-quoted string names a path relative to the referencing unit.

use crate::compilation::{Compilation, EdgeResolution};
use argus_common::{ContentHash, UnitId};
use argus_source::{normalize_path, UnitDb};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const DIRECTIVES: [&str; 3] = ["import ", "include ", "export "];

/// A compilation snapshot derived by scanning unit text for import
/// directives.
pub struct ScannedCompilation {
    units: Vec<UnitId>,
    edges: HashMap<UnitId, EdgeResolution>,
    hashes: HashMap<UnitId, ContentHash>,
    globals: Vec<UnitId>,
}

impl ScannedCompilation {
    /// Scans every unit in the database.
    ///
    /// `global_patterns` selects global-scope contributors by normalized
    /// path: a pattern matches its exact path, a basename, or (when it
    /// starts with a dot) a suffix.
    pub fn scan(db: &UnitDb, global_patterns: &[String]) -> Self {
        let units = db.unit_ids();
        let mut edges = HashMap::with_capacity(units.len());
        let mut hashes = HashMap::with_capacity(units.len());
        let mut globals = Vec::new();

        for &id in &units {
            let unit = db.get(id);
            let path = db.interner().resolve(id);

            let mut resolution = EdgeResolution::default();
            for specifier in extract_import_specifiers(&unit.content) {
                let target = resolve_specifier(path, &specifier);
                match db.interner().get(&target) {
                    Some(target_id) => resolution.targets.push(target_id),
                    None => {
                        debug!("{path}: unresolved import \"{specifier}\"");
                        resolution.unresolved += 1;
                    }
                }
            }
            edges.insert(id, resolution);
            hashes.insert(id, unit.content_hash);

            if global_patterns.iter().any(|p| pattern_matches(path, p)) {
                globals.push(id);
            }
        }

        Self {
            units,
            edges,
            hashes,
            globals,
        }
    }
}

impl Compilation for ScannedCompilation {
    fn units(&self) -> Vec<UnitId> {
        self.units.clone()
    }

    fn edges(&self, unit: UnitId) -> EdgeResolution {
        self.edges.get(&unit).cloned().unwrap_or_default()
    }

    fn content_hash(&self, unit: UnitId) -> Option<ContentHash> {
        self.hashes.get(&unit).copied()
    }

    fn global_contributors(&self) -> Vec<UnitId> {
        self.globals.clone()
    }
}

/// Extracts the quoted path of every import-like directive line.
fn extract_import_specifiers(text: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        for directive in DIRECTIVES {
            if let Some(rest) = trimmed.strip_prefix(directive) {
                if let Some(specifier) = first_quoted(rest) {
                    specifiers.push(specifier);
                }
                break;
            }
        }
    }
    specifiers
}

/// Returns the content of the first double-quoted string in `s`.
fn first_quoted(s: &str) -> Option<String> {
    let open = s.find('"')?;
    let rest = &s[open + 1..];
    let close = rest.find('"')?;
    Some(rest[..close].to_string())
}

/// Resolves an import specifier relative to the referencing unit's directory.
fn resolve_specifier(unit_path: &str, specifier: &str) -> String {
    let parent = Path::new(unit_path).parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&parent.join(specifier))
}

fn pattern_matches(path: &str, pattern: &str) -> bool {
    if path == pattern {
        return true;
    }
    if pattern.starts_with('.') && path.ends_with(pattern) {
        return true;
    }
    path.ends_with(&format!("/{pattern}"))
}
