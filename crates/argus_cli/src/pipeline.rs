//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, unit discovery under the configured include
//! directories, and loading discovered files into a [`UnitDb`]. Used by
//! `check` and `cache`.

use std::path::{Path, PathBuf};

use argus_config::AnalysisConfig;
use argus_source::UnitDb;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `argus.toml`.
///
/// Returns the directory containing `argus.toml`, or an error if none is
/// found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("argus.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find argus.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file -> parent dir, dir ->
/// itself). Otherwise walks up from the current directory looking for
/// `argus.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Discovers unit files under the configured include directories.
///
/// A file is a unit when its name ends with one of the configured suffixes
/// and its path contains none of the exclude substrings. The returned list
/// is sorted and deduplicated so discovery order is deterministic.
pub fn discover_units(
    project_dir: &Path,
    analysis: &AnalysisConfig,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for include in &analysis.include {
        let dir = project_dir.join(include);
        if dir.is_dir() {
            walk_dir(&dir, analysis, &mut files)?;
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Recursively walks a directory collecting unit files.
fn walk_dir(
    dir: &Path,
    analysis: &AnalysisConfig,
    files: &mut Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_excluded(&path, &analysis.exclude) {
            continue;
        }
        if path.is_dir() {
            walk_dir(&path, analysis, files)?;
        } else if has_unit_suffix(&path, &analysis.suffixes) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns `true` if the file name ends with one of the unit suffixes.
pub fn has_unit_suffix(path: &Path, suffixes: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    suffixes.iter().any(|s| name.ends_with(s.as_str()))
}

/// Returns `true` if any exclude substring occurs in the path.
fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let text = path.to_string_lossy();
    exclude.iter().any(|e| text.contains(e.as_str()))
}

/// Loads discovered files into a fresh unit database.
///
/// Unit identity is the path relative to the project directory, so imports
/// between project files resolve and persisted cache state stays valid
/// regardless of where the tool runs from.
pub fn load_units(
    project_dir: &Path,
    files: &[PathBuf],
) -> Result<UnitDb, Box<dyn std::error::Error>> {
    let root = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    let mut db = UnitDb::new();
    for path in files {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let canon = path.canonicalize().unwrap_or_else(|_| path.clone());
        let rel = canon.strip_prefix(&root).unwrap_or(&canon);
        db.add_unit(rel, content);
    }
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // -- find_project_root tests --

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("argus.toml"), "[project]\nname=\"t\"").unwrap();
        let root = find_project_root(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("argus.toml"), "[project]\nname=\"t\"").unwrap();
        let sub = tmp.path().join("src");
        fs::create_dir_all(&sub).unwrap();
        let root = find_project_root(&sub).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = find_project_root(tmp.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("could not find argus.toml"));
    }

    // -- resolve_project_root tests --

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("argus.toml");
        fs::write(&config_path, "[project]\nname=\"t\"").unwrap();

        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: Some(config_path.to_str().unwrap().to_string()),
        };
        let root = resolve_project_root(&global).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        let root = resolve_project_root(&global).unwrap();
        assert_eq!(root, tmp.path());
    }

    // -- discovery tests --

    fn analysis(include: &[&str], suffixes: &[&str], exclude: &[&str]) -> AnalysisConfig {
        AnalysisConfig {
            include: include.iter().map(|s| s.to_string()).collect(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn discover_matches_suffixes() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("notes.txt"), "a\n").unwrap();
        fs::write(src.join("readme.md"), "b\n").unwrap();
        fs::write(src.join("image.png"), "c\n").unwrap();

        let files =
            discover_units(tmp.path(), &analysis(&["src"], &[".txt", ".md"], &[])).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| {
            let name = f.file_name().unwrap().to_str().unwrap();
            name.ends_with(".txt") || name.ends_with(".md")
        }));
    }

    #[test]
    fn discover_recurses_into_subdirs() {
        let tmp = TempDir::new().unwrap();
        let deep = tmp.path().join("docs").join("sub");
        fs::create_dir_all(&deep).unwrap();
        fs::write(tmp.path().join("docs").join("top.txt"), "a\n").unwrap();
        fs::write(deep.join("inner.txt"), "b\n").unwrap();

        let files = discover_units(tmp.path(), &analysis(&["docs"], &[".txt"], &[])).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn discover_skips_excluded_paths() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let vendored = src.join("vendor");
        fs::create_dir_all(&vendored).unwrap();
        fs::write(src.join("keep.txt"), "a\n").unwrap();
        fs::write(vendored.join("skip.txt"), "b\n").unwrap();

        let files =
            discover_units(tmp.path(), &analysis(&["src"], &[".txt"], &["vendor"])).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.txt"));
    }

    #[test]
    fn discover_missing_include_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let files = discover_units(tmp.path(), &analysis(&["nope"], &[".txt"], &[])).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn discover_is_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b\n").unwrap();
        fs::write(tmp.path().join("a.txt"), "a\n").unwrap();
        fs::write(tmp.path().join("c.txt"), "c\n").unwrap();

        let files = discover_units(tmp.path(), &analysis(&["."], &[".txt"], &[])).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn suffix_matching() {
        let suffixes = vec![".txt".to_string(), ".md".to_string()];
        assert!(has_unit_suffix(Path::new("a/b.txt"), &suffixes));
        assert!(has_unit_suffix(Path::new("README.md"), &suffixes));
        assert!(!has_unit_suffix(Path::new("a/b.rs"), &suffixes));
        assert!(!has_unit_suffix(Path::new("Makefile"), &suffixes));
    }

    // -- load_units tests --

    #[test]
    fn load_units_stores_project_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "content a\n").unwrap();

        let files = vec![src.join("a.txt")];
        let db = load_units(tmp.path(), &files).unwrap();
        assert_eq!(db.len(), 1);
        let unit = db.get_by_path(Path::new("src/a.txt")).unwrap();
        assert_eq!(unit.content, "content a\n");
    }

    #[test]
    fn load_units_makes_imports_resolvable() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "import \"./b.txt\"\n").unwrap();
        fs::write(src.join("b.txt"), "body\n").unwrap();

        let files = vec![src.join("a.txt"), src.join("b.txt")];
        let db = load_units(tmp.path(), &files).unwrap();

        let comp = argus_deps::ScannedCompilation::scan(&db, &[]);
        let a = db.get_by_path(Path::new("src/a.txt")).unwrap().id;
        let b = db.get_by_path(Path::new("src/b.txt")).unwrap().id;
        use argus_deps::Compilation;
        assert_eq!(comp.edges(a).targets, vec![b]);
        assert_eq!(comp.edges(a).unresolved, 0);
    }

    #[test]
    fn load_units_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let files = vec![tmp.path().join("absent.txt")];
        let result = load_units(tmp.path(), &files);
        assert!(result.is_err());
    }
}
