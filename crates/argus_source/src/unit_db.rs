//! Central database of all units in an analysis session.

use crate::resolved_span::ResolvedSpan;
use crate::span::Span;
use crate::unit::Unit;
use argus_common::{UnitId, UnitInterner};
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalizes a path to the canonical string form that defines unit identity.
///
/// Normalization is lexical: `.` components are dropped, `..` pops where
/// possible, and separators become `/`. The same file referenced through
/// different relative spellings must intern to the same [`UnitId`].
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut prefix = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().into_owned(),
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().map(|p| p != "..").unwrap_or(false) {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    format!("{prefix}{}", parts.join("/"))
}

/// The unit database, owning all loaded text and resolving [`UnitId`] plus
/// byte offsets to line/column coordinates for rendering.
pub struct UnitDb {
    interner: UnitInterner,
    units: HashMap<UnitId, Unit>,
}

impl UnitDb {
    /// Creates an empty unit database.
    pub fn new() -> Self {
        Self {
            interner: UnitInterner::new(),
            units: HashMap::new(),
        }
    }

    /// Returns the interner mapping normalized paths to ids.
    pub fn interner(&self) -> &UnitInterner {
        &self.interner
    }

    /// Loads a unit from the filesystem and returns its [`UnitId`].
    ///
    /// Loading the same normalized path twice replaces the stored content
    /// under the same id.
    pub fn load_unit(&mut self, path: &Path) -> Result<UnitId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_unit(path.to_path_buf(), content))
    }

    /// Adds a unit from an in-memory string (useful for tests).
    ///
    /// The `path` parameter is normalized and used as the unit's identity.
    pub fn add_unit(&mut self, path: impl Into<PathBuf>, content: String) -> UnitId {
        let path = path.into();
        let normalized = normalize_path(&path);
        let id = self.interner.get_or_intern(&normalized);
        let unit = Unit::new(id, PathBuf::from(normalized), content);
        self.units.insert(id, unit);
        id
    }

    /// Returns the [`Unit`] for the given [`UnitId`].
    ///
    /// # Panics
    ///
    /// Panics if the `UnitId` was never loaded.
    pub fn get(&self, id: UnitId) -> &Unit {
        &self.units[&id]
    }

    /// Looks up a unit by (unnormalized) path.
    pub fn get_by_path(&self, path: &Path) -> Option<&Unit> {
        let id = self.interner.get(&normalize_path(path))?;
        self.units.get(&id)
    }

    /// Returns all loaded unit ids in path order.
    ///
    /// Path order keeps across-run iteration deterministic regardless of
    /// interning or hash-map order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.units.keys().copied().collect();
        ids.sort_by(|a, b| self.interner.resolve(*a).cmp(self.interner.resolve(*b)));
        ids
    }

    /// Returns the number of loaded units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if no units are loaded.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Resolves a span within a unit to human-readable coordinates.
    pub fn resolve_span(&self, id: UnitId, span: Span) -> ResolvedSpan {
        let unit = self.get(id);
        let (start_line, start_col) = unit.line_index.line_col(span.start);
        let (end_line, end_col) = unit
            .line_index
            .line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            path: unit.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the raw text corresponding to a span within a unit.
    pub fn snippet(&self, id: UnitId, span: Span) -> &str {
        self.get(id).snippet(span.start, span.end)
    }
}

impl Default for UnitDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut db = UnitDb::new();
        let id = db.add_unit("test.txt", "hello world".to_string());
        let unit = db.get(id);
        assert_eq!(unit.content, "hello world");
    }

    #[test]
    fn normalization_unifies_spellings() {
        assert_eq!(normalize_path(Path::new("src/./a.txt")), "src/a.txt");
        assert_eq!(normalize_path(Path::new("src/sub/../a.txt")), "src/a.txt");
        assert_eq!(normalize_path(Path::new("./a.txt")), "a.txt");

        let mut db = UnitDb::new();
        let a = db.add_unit("src/./a.txt", "one".to_string());
        let b = db.add_unit("src/sub/../a.txt", "two".to_string());
        assert_eq!(a, b, "same normalized path must intern to the same id");
        assert_eq!(db.get(a).content, "two");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn resolve_span() {
        let mut db = UnitDb::new();
        let id = db.add_unit("test.txt", "abc\ndef\nghi".to_string());
        let span = Span::new(4, 7); // "def"
        let resolved = db.resolve_span(id, span);
        assert_eq!(resolved.path, PathBuf::from("test.txt"));
        assert_eq!(resolved.start_line, 2);
        assert_eq!(resolved.start_col, 1);
        assert_eq!(resolved.end_line, 2);
        assert_eq!(resolved.end_col, 3);
    }

    #[test]
    fn snippet() {
        let mut db = UnitDb::new();
        let id = db.add_unit("test.txt", "hello world".to_string());
        assert_eq!(db.snippet(id, Span::new(0, 5)), "hello");
    }

    #[test]
    fn unit_ids_sorted_by_path() {
        let mut db = UnitDb::new();
        let b = db.add_unit("b.txt", String::new());
        let a = db.add_unit("a.txt", String::new());
        assert_eq!(db.unit_ids(), vec![a, b]);
    }

    #[test]
    fn load_unit_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("loaded.txt");
        std::fs::write(&file_path, "on disk").unwrap();

        let mut db = UnitDb::new();
        let id = db.load_unit(&file_path).unwrap();
        assert_eq!(db.get(id).content, "on disk");
    }
}
