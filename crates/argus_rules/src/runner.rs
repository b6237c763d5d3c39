//! Rule runner that manages registration, severity overrides, and execution.
//!
//! The `RuleRunner` accepts a `RulesConfig` to control which rules are
//! denied, allowed, or warned, then runs each applicable rule against one
//! unit and returns the sorted findings.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use argus_config::{FailureMode, RulesConfig};
use argus_diagnostics::{Category, Finding, RuleCode, Severity};
use argus_source::Span;
use tracing::warn;

use crate::context::RuleContext;
use crate::registry::{builtin_rules, RuleDescriptor};
use crate::Rule;

/// Code attached to the synthetic finding emitted when a rule fails.
pub const RULE_FAILURE_NUMBER: u16 = 1;

struct RegisteredRule {
    descriptor: RuleDescriptor,
    rule: Box<dyn Rule>,
}

/// The runner that executes rules against one unit at a time.
///
/// Rules are registered at construction time. The runner respects the
/// `RulesConfig` to suppress rules (allow), promote rules to errors (deny),
/// or demote them to warnings (warn). Override lists match either the
/// rule's kebab-case name or its code string (e.g. `W101`).
///
/// Output order never depends on registration or execution order: findings
/// are sorted by `(span, code, message)` before they are returned.
pub struct RuleRunner {
    rules: Vec<RegisteredRule>,
    denied: HashSet<String>,
    allowed: HashSet<String>,
    warned: HashSet<String>,
    policy: FailureMode,
}

impl RuleRunner {
    /// Creates a runner configured by the given `RulesConfig`.
    ///
    /// All builtin rules are registered automatically.
    pub fn new(config: &RulesConfig) -> Self {
        let mut runner = Self {
            rules: Vec::new(),
            denied: config.deny.iter().cloned().collect(),
            allowed: config.allow.iter().cloned().collect(),
            warned: config.warn.iter().cloned().collect(),
            policy: config.on_failure,
        };

        for descriptor in builtin_rules() {
            runner.register(descriptor);
        }
        runner
    }

    /// Creates a runner with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&RulesConfig::default())
    }

    /// Registers a rule described by `descriptor`.
    pub fn register(&mut self, descriptor: RuleDescriptor) {
        let rule = (descriptor.build)();
        self.rules.push(RegisteredRule { descriptor, rule });
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.descriptor.name).collect()
    }

    /// Runs every applicable enabled rule against one unit.
    ///
    /// A rule that panics never aborts the pass: under
    /// [`FailureMode::Report`] the failure becomes a synthetic `X001`
    /// finding naming the rule, under [`FailureMode::Discard`] it is
    /// logged and dropped. Partial findings from a failed rule are
    /// discarded either way.
    pub fn run(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for registered in &self.rules {
            let descriptor = &registered.descriptor;
            if self.is_listed(&self.allowed, descriptor) {
                continue;
            }
            if !descriptor.applies.matches(ctx) {
                continue;
            }

            match catch_unwind(AssertUnwindSafe(|| registered.rule.check(ctx))) {
                Ok(batch) => {
                    for mut finding in batch {
                        if self.is_listed(&self.denied, descriptor) {
                            finding.severity = Severity::Error;
                        } else if self.is_listed(&self.warned, descriptor) {
                            finding.severity = Severity::Warning;
                        }
                        findings.push(finding);
                    }
                }
                Err(_) => match self.policy {
                    FailureMode::Report => {
                        findings.push(rule_failure_finding(descriptor.name));
                    }
                    FailureMode::Discard => {
                        warn!(rule = descriptor.name, "rule failed; findings discarded");
                    }
                },
            }
        }

        findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        findings
    }

    fn is_listed(&self, list: &HashSet<String>, descriptor: &RuleDescriptor) -> bool {
        list.contains(descriptor.name) || list.contains(&descriptor.code.to_string())
    }
}

/// Builds the synthetic finding that reports a failed rule.
fn rule_failure_finding(rule_name: &str) -> Finding {
    Finding::error(
        RuleCode::new(Category::Engine, RULE_FAILURE_NUMBER),
        format!("rule '{rule_name}' failed during analysis"),
        Span::empty_at(0),
    )
    .with_note("this is an engine fault, not a problem in the analyzed text")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Applicability;
    use argus_common::UnitId;
    use argus_config::RuleSettings;
    use argus_source::LineIndex;
    use std::path::Path;

    struct DummyRule;
    impl Rule for DummyRule {
        fn check(&self, _ctx: &RuleContext<'_>) -> Vec<Finding> {
            vec![Finding::warning(
                RuleCode::new(Category::Warning, 999),
                "dummy warning",
                Span::new(0, 1),
            )]
        }
    }

    struct PanickingRule;
    impl Rule for PanickingRule {
        fn check(&self, _ctx: &RuleContext<'_>) -> Vec<Finding> {
            panic!("boom");
        }
    }

    fn dummy_descriptor() -> RuleDescriptor {
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 999),
            name: "dummy-rule",
            summary: "a test rule",
            default_severity: Severity::Warning,
            applies: Applicability::always(),
            build: || Box::new(DummyRule),
        }
    }

    fn panicking_descriptor() -> RuleDescriptor {
        RuleDescriptor {
            code: RuleCode::new(Category::Warning, 998),
            name: "panicking-rule",
            summary: "a rule that always fails",
            default_severity: Severity::Warning,
            applies: Applicability::always(),
            build: || Box::new(PanickingRule),
        }
    }

    fn run_on(runner: &RuleRunner, text: &str) -> Vec<Finding> {
        let index = LineIndex::new(text);
        let settings = RuleSettings::default();
        let ctx = RuleContext::new(
            UnitId::from_raw(0),
            Path::new("clean.txt"),
            text,
            &index,
            false,
            &settings,
        );
        runner.run(&ctx)
    }

    #[test]
    fn runner_registers_builtin_rules() {
        let runner = RuleRunner::with_defaults();
        assert_eq!(runner.rule_count(), 7);
    }

    #[test]
    fn runner_custom_rule() {
        let mut runner = RuleRunner::with_defaults();
        let initial = runner.rule_count();
        runner.register(dummy_descriptor());
        assert_eq!(runner.rule_count(), initial + 1);
    }

    #[test]
    fn runner_run_emits_findings() {
        let mut runner = RuleRunner::with_defaults();
        runner.register(dummy_descriptor());
        let findings = run_on(&runner, "clean\n");
        assert!(findings.iter().any(|f| f.message == "dummy warning"));
    }

    #[test]
    fn runner_allow_suppresses_rule() {
        let config = RulesConfig {
            allow: vec!["dummy-rule".to_string()],
            ..RulesConfig::default()
        };
        let mut runner = RuleRunner::new(&config);
        runner.register(dummy_descriptor());
        let findings = run_on(&runner, "clean\n");
        assert!(
            !findings.iter().any(|f| f.message == "dummy warning"),
            "allowed rule should be suppressed"
        );
    }

    #[test]
    fn runner_allow_matches_code_string() {
        let config = RulesConfig {
            allow: vec!["W999".to_string()],
            ..RulesConfig::default()
        };
        let mut runner = RuleRunner::new(&config);
        runner.register(dummy_descriptor());
        let findings = run_on(&runner, "clean\n");
        assert!(!findings.iter().any(|f| f.message == "dummy warning"));
    }

    #[test]
    fn runner_deny_promotes_severity() {
        let config = RulesConfig {
            deny: vec!["dummy-rule".to_string()],
            ..RulesConfig::default()
        };
        let mut runner = RuleRunner::new(&config);
        runner.register(dummy_descriptor());
        let findings = run_on(&runner, "clean\n");
        let dummy: Vec<_> = findings
            .iter()
            .filter(|f| f.message == "dummy warning")
            .collect();
        assert!(!dummy.is_empty());
        assert_eq!(dummy[0].severity, Severity::Error);
    }

    #[test]
    fn runner_warn_demotes_severity() {
        let config = RulesConfig {
            warn: vec!["conflict-marker".to_string()],
            ..RulesConfig::default()
        };
        let runner = RuleRunner::new(&config);
        let findings = run_on(&runner, "<<<<<<< HEAD\n");
        let conflict: Vec<_> = findings
            .iter()
            .filter(|f| f.code == RuleCode::new(Category::Error, 101))
            .collect();
        assert!(!conflict.is_empty());
        assert_eq!(conflict[0].severity, Severity::Warning);
    }

    #[test]
    fn panicking_rule_becomes_synthetic_finding() {
        let mut runner = RuleRunner::with_defaults();
        runner.register(panicking_descriptor());
        let findings = run_on(&runner, "clean\n");
        let synthetic: Vec<_> = findings
            .iter()
            .filter(|f| f.code == RuleCode::new(Category::Engine, 1))
            .collect();
        assert_eq!(synthetic.len(), 1);
        assert!(synthetic[0].message.contains("panicking-rule"));
        assert_eq!(synthetic[0].severity, Severity::Error);
    }

    #[test]
    fn panicking_rule_discarded_under_discard_policy() {
        let config = RulesConfig {
            on_failure: FailureMode::Discard,
            ..RulesConfig::default()
        };
        let mut runner = RuleRunner::new(&config);
        runner.register(panicking_descriptor());
        let findings = run_on(&runner, "clean\n");
        assert!(!findings
            .iter()
            .any(|f| f.code == RuleCode::new(Category::Engine, 1)));
    }

    #[test]
    fn panicking_rule_does_not_abort_others() {
        let mut runner = RuleRunner::with_defaults();
        runner.register(panicking_descriptor());
        runner.register(dummy_descriptor());
        let findings = run_on(&runner, "clean\n");
        assert!(findings.iter().any(|f| f.message == "dummy warning"));
    }

    #[test]
    fn findings_are_sorted_by_span_then_code() {
        struct ReversedRule;
        impl Rule for ReversedRule {
            fn check(&self, _ctx: &RuleContext<'_>) -> Vec<Finding> {
                vec![
                    Finding::warning(
                        RuleCode::new(Category::Warning, 902),
                        "later",
                        Span::new(5, 6),
                    ),
                    Finding::warning(
                        RuleCode::new(Category::Warning, 901),
                        "earlier",
                        Span::new(1, 2),
                    ),
                ]
            }
        }
        let mut runner = RuleRunner::new(&RulesConfig::default());
        runner.rules.clear();
        runner.register(RuleDescriptor {
            code: RuleCode::new(Category::Warning, 901),
            name: "reversed-rule",
            summary: "emits findings out of order",
            default_severity: Severity::Warning,
            applies: Applicability::always(),
            build: || Box::new(ReversedRule),
        });
        let findings = run_on(&runner, "some text\n");
        assert_eq!(findings[0].message, "earlier");
        assert_eq!(findings[1].message, "later");
    }

    #[test]
    fn generated_unit_skips_fix_rules() {
        let runner = RuleRunner::with_defaults();
        let text = "trailing  \n";
        let index = LineIndex::new(text);
        let settings = RuleSettings::default();
        let ctx = RuleContext::new(
            UnitId::from_raw(0),
            Path::new("gen.txt"),
            text,
            &index,
            true,
            &settings,
        );
        let findings = runner.run(&ctx);
        assert!(!findings
            .iter()
            .any(|f| f.code == RuleCode::new(Category::Warning, 101)));
    }
}
