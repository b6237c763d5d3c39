//! Static registry of rule descriptors and applicability predicates.

use crate::context::RuleContext;
use crate::rules;
use crate::Rule;
use argus_diagnostics::{Category, RuleCode, Severity};

/// A composable predicate deciding whether a rule runs against a unit.
///
/// Applicability is evaluated before a rule is invoked, from unit metadata
/// alone. Predicates combine with [`all_of`](Applicability::all_of); there
/// is no other combinator because none has been needed.
#[derive(Clone, Debug)]
pub struct Applicability(Predicate);

#[derive(Clone, Debug)]
enum Predicate {
    Always,
    SuffixIn(&'static [&'static str]),
    NotGenerated,
    AllOf(Vec<Applicability>),
}

impl Applicability {
    /// The rule runs against every unit.
    pub fn always() -> Self {
        Self(Predicate::Always)
    }

    /// The rule runs only against units whose filename suffix is listed.
    ///
    /// Suffixes include the dot, e.g. `&[".md", ".txt"]`.
    pub fn suffix_in(suffixes: &'static [&'static str]) -> Self {
        Self(Predicate::SuffixIn(suffixes))
    }

    /// The rule is skipped for machine-generated units.
    pub fn not_generated() -> Self {
        Self(Predicate::NotGenerated)
    }

    /// The rule runs only when every listed predicate holds.
    pub fn all_of(parts: Vec<Applicability>) -> Self {
        Self(Predicate::AllOf(parts))
    }

    /// Evaluates the predicate against one unit's metadata.
    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        match &self.0 {
            Predicate::Always => true,
            Predicate::SuffixIn(suffixes) => match ctx.suffix() {
                Some(suffix) => suffixes.contains(&suffix.as_str()),
                None => false,
            },
            Predicate::NotGenerated => !ctx.generated,
            Predicate::AllOf(parts) => parts.iter().all(|p| p.matches(ctx)),
        }
    }
}

/// A registry entry describing one rule.
///
/// The descriptor carries everything needed to list, filter, and construct
/// a rule without running it. `build` is a plain constructor so the table
/// itself stays `'static`-friendly and side-effect free.
pub struct RuleDescriptor {
    /// The rule's code (e.g. `W101`).
    pub code: RuleCode,
    /// Short kebab-case name (e.g. `trailing-whitespace`).
    pub name: &'static str,
    /// One-line description of what the rule checks.
    pub summary: &'static str,
    /// Severity used when no override applies.
    pub default_severity: Severity,
    /// When the rule runs.
    pub applies: Applicability,
    /// Constructs a fresh instance of the rule.
    pub build: fn() -> Box<dyn Rule>,
}

/// Returns descriptors for all built-in rules, in code order.
pub fn builtin_rules() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor {
            code: RuleCode::new(Category::Error, 101),
            name: "conflict-marker",
            summary: "unresolved merge conflict marker",
            default_severity: Severity::Error,
            applies: Applicability::always(),
            build: || Box::new(rules::ConflictMarker),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 101),
            name: "trailing-whitespace",
            summary: "whitespace at end of line (auto-fixable)",
            default_severity: Severity::Warning,
            applies: Applicability::not_generated(),
            build: || Box::new(rules::TrailingWhitespace),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 102),
            name: "tab-indentation",
            summary: "tab character in indentation (auto-fixable)",
            default_severity: Severity::Warning,
            applies: Applicability::not_generated(),
            build: || Box::new(rules::TabIndentation),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 103),
            name: "long-line",
            summary: "line exceeds the configured length limit",
            default_severity: Severity::Warning,
            applies: Applicability::always(),
            build: || Box::new(rules::LongLine),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 104),
            name: "consecutive-blank-lines",
            summary: "more blank lines in a row than allowed (auto-fixable)",
            default_severity: Severity::Warning,
            applies: Applicability::not_generated(),
            build: || Box::new(rules::ConsecutiveBlankLines),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 105),
            name: "missing-final-newline",
            summary: "file does not end with a newline (auto-fixable)",
            default_severity: Severity::Warning,
            applies: Applicability::not_generated(),
            build: || Box::new(rules::MissingFinalNewline),
        },
        RuleDescriptor {
            code: RuleCode::new(Category::Convention, 201),
            name: "todo-marker",
            summary: "TODO or FIXME marker left in text",
            default_severity: Severity::Note,
            applies: Applicability::always(),
            build: || Box::new(rules::TodoMarker),
        },
    ]
}
