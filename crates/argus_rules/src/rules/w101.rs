//! W101: trailing whitespace, spaces or tabs at the end of a line.

use argus_diagnostics::{Category, Finding, Fix, Replacement, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects spaces or tabs between the last visible character of a line and
/// its terminator. The attached fix deletes the trailing run.
pub struct TrailingWhitespace;

impl Rule for TrailingWhitespace {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Warning, 101);
        let mut findings = Vec::new();

        for (start, line) in ctx.lines() {
            let trimmed = line.trim_end_matches([' ', '\t']);
            if trimmed.len() == line.len() {
                continue;
            }
            let span = Span::new(start + trimmed.len() as u32, start + line.len() as u32);
            findings.push(
                Finding::warning(code, "trailing whitespace", span).with_fix(Fix::new(
                    "remove trailing whitespace",
                    vec![Replacement::delete(span)],
                )),
            );
        }
        findings
    }
}
