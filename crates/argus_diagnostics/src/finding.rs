//! Structured findings with severity, codes, and attached fixes.

use crate::code::RuleCode;
use crate::fix::Fix;
use crate::severity::Severity;
use argus_source::Span;
use serde::{Deserialize, Serialize};

/// A structured finding reported by one rule against one unit.
///
/// Findings are the primary mechanism for reporting problems to the user.
/// Each finding includes:
/// - A severity level and the code of the rule that produced it
/// - A primary message and text span
/// - Optional notes, an auto-applicable fix, and alternative fixes that are
///   suggested but never applied automatically
///
/// Findings are value types: they serialize losslessly, and two findings
/// compare equal exactly when a cached result is indistinguishable from a
/// fresh one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The severity level of this finding.
    pub severity: Severity,
    /// The code of the rule that produced this finding.
    pub code: RuleCode,
    /// The main message.
    pub message: String,
    /// The text range where the issue was detected.
    pub span: Span,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
    /// An auto-applicable fix, if available.
    pub fix: Option<Fix>,
    /// Alternative fixes offered to the user but never applied automatically.
    pub alternatives: Vec<Fix>,
}

impl Finding {
    /// Creates a new finding with the given severity, code, message, and span.
    pub fn new(
        severity: Severity,
        code: RuleCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            span,
            notes: Vec::new(),
            fix: None,
            alternatives: Vec::new(),
        }
    }

    /// Creates a new error-severity finding.
    pub fn error(code: RuleCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    /// Creates a new warning-severity finding.
    pub fn warning(code: RuleCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, code, message, span)
    }

    /// Adds a note to this finding.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the auto-applicable fix for this finding.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Adds an alternative fix that will not be applied automatically.
    pub fn with_alternative(mut self, fix: Fix) -> Self {
        self.alternatives.push(fix);
        self
    }

    /// The key findings are ordered by: `(start, end, rule code, message)`.
    ///
    /// Total over any finding list, so sorted output never depends on rule
    /// registration or execution order.
    pub fn sort_key(&self) -> (Span, RuleCode, &str) {
        (self.span, self.code, self.message.as_str())
    }
}
