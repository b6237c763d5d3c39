//! `argus check` — the incremental analysis pipeline.
//!
//! The full pipeline:
//!
//! 1. Find the project root (walk up looking for `argus.toml`)
//! 2. Load config and merge CLI rule overrides into it
//! 3. Discover units under the include dirs (or expand explicit paths)
//! 4. Scan import directives and build the dependency resolver
//! 5. Load persisted cache state
//! 6. Run the analysis session (parallel, cache-aware, optional fix loop)
//! 7. Write fixed files, render findings, save cache state

use std::fs;
use std::path::{Path, PathBuf};

use argus_cache::{FsStatePersistence, ResultCache};
use argus_config::{effective_fingerprint, AnalysisConfig, ProjectConfig, RulesConfig};
use argus_deps::{DependencyResolver, ScannedCompilation};
use argus_diagnostics::{FindingRenderer, Severity, TerminalRenderer};
use argus_engine::{Session, SessionOptions, TransformRegistry, UnitOutcome};
use argus_rules::RuleRunner;
use argus_source::{LineIndex, UnitDb};
use tracing::info;

use crate::pipeline::{discover_units, load_units, resolve_project_root};
use crate::{CheckArgs, GlobalArgs, ReportFormat, ENGINE_VERSION};

/// Runs the `argus check` command.
///
/// Returns exit code 0 when no error-severity findings remain, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let mut config = argus_config::load_config(&project_dir)?;
    merge_rule_overrides(&mut config.rules, args);

    if !global.quiet {
        eprintln!("   Checking {}", config.project.name);
    }

    let files = if args.paths.is_empty() {
        discover_units(&project_dir, &config.analysis)?
    } else {
        explicit_paths(&args.paths, &config)?
    };

    if files.is_empty() {
        if !global.quiet {
            eprintln!("warning: no units found to analyze");
        }
        return Ok(0);
    }

    let db = load_units(&project_dir, &files)?;

    let compilation = ScannedCompilation::scan(&db, &config.deps.globals);
    let resolver = DependencyResolver::from_compilation(&compilation)?;

    let use_cache = config.cache.enabled && !args.no_cache;
    let persistence = FsStatePersistence::new(&project_dir.join(&config.cache.dir));
    let cache = if use_cache {
        Some(ResultCache::load_or_default(
            &persistence,
            ENGINE_VERSION,
            |path| db.interner().get(path),
        ))
    } else {
        None
    };

    let runner = RuleRunner::new(&config.rules);
    let transforms = TransformRegistry::with_builtins();
    // Computed after the merge so CLI overrides change the fingerprint; a
    // result cached under --deny must not be served to a plain run.
    let config_fp = effective_fingerprint(&config, ENGINE_VERSION);

    let options = SessionOptions {
        apply_fixes: args.fix,
        max_passes: config.fix.max_passes,
        // Stored findings describe unfixed text, so fix runs skip lookups;
        // writes still happen and warm the cache for the next plain check.
        read_cache: !args.fix,
    };

    let mut session = Session::new(
        &db,
        &resolver,
        &runner,
        &transforms,
        &config.rules.settings,
        config_fp,
        options,
    );
    if let Some(ref cache) = cache {
        session = session.with_cache(cache);
    }

    let outcomes = session.run();

    let files_fixed = if args.fix {
        write_fixed_files(&project_dir, &db, &outcomes)?
    } else {
        0
    };

    render_outcomes(&outcomes, &db, args, global);

    if let Some(ref cache) = cache {
        cache.save(&persistence, ENGINE_VERSION, |unit| {
            db.interner().resolve(unit).to_string()
        });
    }

    let error_count = count_severity(&outcomes, Severity::Error);
    let warning_count = count_severity(&outcomes, Severity::Warning);
    let cached = outcomes.iter().filter(|o| o.from_cache).count();
    info!(
        units = outcomes.len(),
        cached,
        files_fixed,
        "check complete"
    );

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Result: {error_count} error(s), {warning_count} warning(s)");
        if args.fix && files_fixed > 0 {
            eprintln!("   Fixed {files_fixed} file(s)");
        }
    }

    if error_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Merges CLI rule overrides into the config's rule lists.
///
/// CLI flags take precedence over the config file: a rule passed with
/// `--allow` is removed from the config's deny and warn lists, and so on.
/// Within the CLI flags themselves, later lists win (deny, warn, allow).
fn merge_rule_overrides(rules: &mut RulesConfig, args: &CheckArgs) {
    for rule in &args.deny {
        rules.allow.retain(|r| r != rule);
        rules.warn.retain(|r| r != rule);
        if !rules.deny.contains(rule) {
            rules.deny.push(rule.clone());
        }
    }
    for rule in &args.warn {
        rules.deny.retain(|r| r != rule);
        rules.allow.retain(|r| r != rule);
        if !rules.warn.contains(rule) {
            rules.warn.push(rule.clone());
        }
    }
    for rule in &args.allow {
        rules.deny.retain(|r| r != rule);
        rules.warn.retain(|r| r != rule);
        if !rules.allow.contains(rule) {
            rules.allow.push(rule.clone());
        }
    }
}

/// Expands explicit command-line paths into unit files.
///
/// Files are taken as-is; directories are searched with the configured
/// suffixes and excludes. A path that does not exist is an error.
fn explicit_paths(
    paths: &[String],
    config: &ProjectConfig,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for raw in paths {
        let path = PathBuf::from(raw);
        if path.is_dir() {
            let scoped = AnalysisConfig {
                include: vec![".".to_string()],
                suffixes: config.analysis.suffixes.clone(),
                exclude: config.analysis.exclude.clone(),
            };
            files.extend(discover_units(&path, &scoped)?);
        } else if path.is_file() {
            files.push(path);
        } else {
            return Err(format!("path '{raw}' does not exist").into());
        }
    }
    Ok(files)
}

/// Writes rewritten unit text back to disk. Returns the file count.
fn write_fixed_files(
    project_dir: &Path,
    db: &UnitDb,
    outcomes: &[UnitOutcome],
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut written = 0usize;
    for outcome in outcomes {
        if let Some(ref fixed) = outcome.fixed_text {
            let unit = db.get(outcome.unit);
            let target = project_dir.join(&unit.path);
            fs::write(&target, fixed)
                .map_err(|e| format!("failed to write {}: {e}", target.display()))?;
            written += 1;
        }
    }
    Ok(written)
}

/// Renders findings as rustc-style text on stderr or a JSON array on stdout.
///
/// Spans refer to the final text revision, so rendering uses the fixed text
/// whenever fixes were applied.
fn render_outcomes(outcomes: &[UnitOutcome], db: &UnitDb, args: &CheckArgs, global: &GlobalArgs) {
    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for outcome in outcomes {
                let unit = db.get(outcome.unit);
                let text = outcome.fixed_text.as_deref().unwrap_or(&unit.content);
                let index = LineIndex::new(text);
                for finding in &outcome.findings {
                    eprintln!("{}", renderer.render(finding, &unit.path, text, &index));
                }
                if outcome.fix_budget_exhausted && !global.quiet {
                    eprintln!(
                        "note: {}: fix pass limit reached with fixes still pending",
                        unit.path.display()
                    );
                }
            }
        }
        ReportFormat::Json => {
            let mut entries = Vec::new();
            for outcome in outcomes {
                let unit = db.get(outcome.unit);
                for finding in &outcome.findings {
                    entries.push(serde_json::json!({
                        "path": unit.path,
                        "finding": finding,
                    }));
                }
            }
            let json = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Counts findings of one severity across all outcomes.
fn count_severity(outcomes: &[UnitOutcome], severity: Severity) -> usize {
    outcomes
        .iter()
        .flat_map(|o| o.findings.iter())
        .filter(|f| f.severity == severity)
        .count()
}
