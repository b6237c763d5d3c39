//! Rules and rule runner for text-level static analysis.
//!
//! This crate implements the builtin rules that operate on a unit's analyzed
//! text, plus the runner that executes them with severity overrides and
//! per-rule failure containment.
//!
//! # Rule Categories
//!
//! - **E-series (errors):** Conflict markers and other definite problems
//! - **W-series (warnings):** Whitespace, line length, and layout issues
//! - **C-series (conventions):** Markers and style habits worth reviewing
//! - **X-series (engine):** Synthetic findings about the analysis itself

#![warn(missing_docs)]

mod context;
mod registry;
mod runner;
mod rules;

pub use context::RuleContext;
pub use registry::{builtin_rules, Applicability, RuleDescriptor};
pub use runner::{RuleRunner, RULE_FAILURE_NUMBER};
pub use rules::{
    ConflictMarker, ConsecutiveBlankLines, LongLine, MissingFinalNewline, TabIndentation,
    TodoMarker, TrailingWhitespace,
};

use argus_diagnostics::Finding;

/// A single rule that checks one unit's analyzed text.
///
/// Rules are pure functions of the context: they must not mutate shared
/// state, must not assume any invocation order, and must not depend on
/// another rule's findings. That purity is what makes caching results by
/// fingerprint sound. Metadata (code, name, severity, applicability) lives
/// in the rule's [`RuleDescriptor`], not on the trait.
pub trait Rule: Send + Sync {
    /// Checks one unit and returns its findings, in any order.
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding>;
}
