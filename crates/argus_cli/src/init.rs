//! `argus init` — project scaffolding command.
//!
//! Creates a new Argus project directory with an `argus.toml` config file
//! and a sample source tree that passes the default rules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Runs the `argus init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{}' already exists", n).into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project");

    eprintln!("  Creating new Argus project `{project_name}`");

    fs::create_dir_all(project_dir.join("src"))?;
    write_argus_toml(&project_dir, project_name)?;
    write_sample_file(&project_dir)?;

    eprintln!("     Created {}", project_dir.join("argus.toml").display());
    eprintln!(
        "     Created {}",
        project_dir.join("src").join("notes.txt").display()
    );

    Ok(0)
}

/// Writes the `argus.toml` configuration file.
fn write_argus_toml(root: &Path, name: &str) -> io::Result<()> {
    let content = format!(
        r#"[project]
name = "{name}"

[analysis]
include = ["src"]
suffixes = [".txt", ".md"]
exclude = []

[rules]
deny = []
warn = []
allow = []

[fix]
max_passes = 10

[cache]
enabled = true
dir = ".argus-cache"
"#
    );
    fs::write(root.join("argus.toml"), content)
}

/// Writes a sample unit that is clean under the default rules.
fn write_sample_file(root: &Path) -> io::Result<()> {
    let content = "Project notes\n\nKeep lines short and end every file with a newline.\n";
    fs::write(root.join("src").join("notes.txt"), content)
}
