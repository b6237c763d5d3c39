//! `argus cache` — persistent result-state inspection and maintenance.

use argus_cache::{FsStatePersistence, ProgramState, StatePersistence};

use crate::pipeline::resolve_project_root;
use crate::{CacheAction, GlobalArgs, ENGINE_VERSION};

/// Runs the `argus cache` command.
pub fn run(action: &CacheAction, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = argus_config::load_config(&project_dir)?;
    let persistence = FsStatePersistence::new(&project_dir.join(&config.cache.dir));

    match action {
        CacheAction::Stats => stats(&persistence),
        CacheAction::Clear => clear(&persistence),
    }
}

/// Prints entry and finding counts for the persisted state.
fn stats(persistence: &FsStatePersistence) -> Result<i32, Box<dyn std::error::Error>> {
    eprintln!("   State file: {}", persistence.state_path().display());
    match persistence.load() {
        Some(raw) => match ProgramState::decode(&raw, ENGINE_VERSION) {
            Some(state) => {
                let findings: usize = state.entries.iter().map(|e| e.findings.len()).sum();
                eprintln!("   Entries: {}", state.entries.len());
                eprintln!("   Findings: {findings}");
            }
            None => {
                eprintln!("   State unusable (stale version or corrupt); next run starts cold")
            }
        },
        None => eprintln!("   No persisted state"),
    }
    Ok(0)
}

/// Deletes the persisted state file.
fn clear(persistence: &FsStatePersistence) -> Result<i32, Box<dyn std::error::Error>> {
    if persistence.clear()? {
        eprintln!("   Removed {}", persistence.state_path().display());
    } else {
        eprintln!("   Nothing to remove");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_common::{ConfigFingerprint, ContentHash, DependencyFingerprint, UnitId};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn mk_global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(dir.to_str().unwrap().to_string()),
        }
    }

    fn init_project(tmp: &TempDir) {
        fs::write(tmp.path().join("argus.toml"), "[project]\nname = \"t\"\n").unwrap();
    }

    fn persist_one_entry(tmp: &TempDir) -> FsStatePersistence {
        let persistence = FsStatePersistence::new(&tmp.path().join(".argus-cache"));
        let cache = argus_cache::ResultCache::new();
        cache.set(
            UnitId::from_raw(0),
            DependencyFingerprint::Cacheable(ContentHash::from_bytes(b"d")),
            ConfigFingerprint::from_bytes(b"c"),
            vec![],
        );
        cache.save(&persistence, ENGINE_VERSION, |_| "a.txt".to_string());
        persistence
    }

    #[test]
    fn stats_with_no_state_succeeds() {
        let tmp = TempDir::new().unwrap();
        init_project(&tmp);
        assert_eq!(run(&CacheAction::Stats, &mk_global(tmp.path())).unwrap(), 0);
    }

    #[test]
    fn stats_reads_persisted_entries() {
        let tmp = TempDir::new().unwrap();
        init_project(&tmp);
        let persistence = persist_one_entry(&tmp);

        assert_eq!(run(&CacheAction::Stats, &mk_global(tmp.path())).unwrap(), 0);

        // the state this command reported on is decodable and has our entry
        let raw = persistence.load().unwrap();
        let state = ProgramState::decode(&raw, ENGINE_VERSION).unwrap();
        assert_eq!(state.entries.len(), 1);
    }

    #[test]
    fn clear_removes_state_file() {
        let tmp = TempDir::new().unwrap();
        init_project(&tmp);
        let persistence = persist_one_entry(&tmp);
        assert!(persistence.state_path().exists());

        assert_eq!(run(&CacheAction::Clear, &mk_global(tmp.path())).unwrap(), 0);
        assert!(!persistence.state_path().exists());
    }

    #[test]
    fn clear_with_nothing_to_remove_succeeds() {
        let tmp = TempDir::new().unwrap();
        init_project(&tmp);
        assert_eq!(run(&CacheAction::Clear, &mk_global(tmp.path())).unwrap(), 0);
    }

    #[test]
    fn cache_outside_a_project_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(run(&CacheAction::Stats, &mk_global(tmp.path())).is_err());
    }
}
