//! Argus CLI — entry point and argument parsing.
//!
//! Subcommands:
//!
//! - `argus check` — analyze project units and report findings
//! - `argus rules` — list the built-in rules
//! - `argus cache` — inspect or clear the persistent result cache
//! - `argus init` — scaffold a new project
//!
//! Exit codes: 0 for a clean run, 1 when findings at error severity were
//! reported, 2 for usage, configuration, or internal errors.

use clap::{Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::EnvFilter;

mod cache;
mod check;
mod init;
mod pipeline;
mod rules;

/// Engine version stamped into persisted state and config fingerprints.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Argus: an incremental static-analysis engine for text projects.
#[derive(Parser)]
#[command(name = "argus", version, about = "Incremental static analysis with auto-fixes")]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Suppress informational output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to use colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Path to the project config file or directory.
    #[arg(long, global = true)]
    config: Option<String>,
}

impl Cli {
    /// Resolves the raw flags into the settings commands consume.
    fn global_args(&self) -> GlobalArgs {
        let color = match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty_is_terminal(),
        };
        GlobalArgs {
            quiet: self.quiet,
            verbose: self.verbose,
            color,
            config: self.config.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Create a new Argus project.
    Init {
        /// Project directory name (defaults to the current directory).
        name: Option<String>,
    },
    /// Analyze project units and report findings.
    Check(CheckArgs),
    /// List the built-in rules.
    Rules,
    /// Inspect or clear the persistent result cache.
    Cache {
        /// What to do with the cache.
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Arguments for `argus check`.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Specific files or directories to check (defaults to the configured
    /// include dirs).
    pub paths: Vec<String>,

    /// Apply auto-fixes and re-analyze until stable.
    #[arg(long)]
    pub fix: bool,

    /// Output format for findings.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Skip the persistent result cache entirely.
    #[arg(long)]
    pub no_cache: bool,

    /// Rules (by name or code) to promote to errors.
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Rules (by name or code) to demote to warnings.
    #[arg(long, num_args = 1..)]
    pub warn: Vec<String>,

    /// Rules (by name or code) to suppress.
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,
}

/// Cache maintenance actions.
#[derive(Subcommand)]
pub enum CacheAction {
    /// Print entry counts and the state file location.
    Stats,
    /// Delete the persisted state file.
    Clear,
}

/// When to use ANSI colors in output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Color when stderr looks like a terminal.
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// Output format for findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON array on stdout.
    Json,
}

/// Resolved global arguments passed down to command implementations.
pub struct GlobalArgs {
    /// Suppress informational output.
    pub quiet: bool,
    /// Enable verbose output.
    pub verbose: bool,
    /// Whether to emit ANSI colors.
    pub color: bool,
    /// Path to the project config file or directory.
    pub config: Option<String>,
}

/// Best-effort terminal detection without an external crate.
///
/// Checks the `TERM` environment variable; "dumb" or unset means no colors.
fn atty_is_terminal() -> bool {
    match std::env::var("TERM") {
        Ok(term) => term != "dumb" && !term.is_empty(),
        Err(_) => false,
    }
}

/// Initializes the global tracing subscriber.
///
/// The verbosity flags pick the default level; the `ARGUS_LOG` environment
/// variable overrides them with a full filter expression.
fn init_tracing(quiet: bool, verbose: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_env("ARGUS_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let global = cli.global_args();

    init_tracing(global.quiet, global.verbose);

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Check(args) => check::run(&args, &global),
        Command::Rules => rules::run(),
        Command::Cache { action } => cache::run(&action, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}
