//! C201: todo marker, a TODO or FIXME left in the text.

use argus_diagnostics::{Category, Finding, RuleCode, Severity};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

const MARKERS: [&str; 2] = ["TODO", "FIXME"];

/// Reports `TODO` and `FIXME` markers so they can be tracked rather than
/// forgotten. Default severity is note; projects that want a clean tree
/// can deny the rule to turn markers into errors.
pub struct TodoMarker;

impl Rule for TodoMarker {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Convention, 201);
        let mut findings = Vec::new();

        for (start, line) in ctx.lines() {
            for marker in MARKERS {
                for (idx, _) in line.match_indices(marker) {
                    let from = start + idx as u32;
                    let span = Span::new(from, from + marker.len() as u32);
                    findings.push(Finding::new(
                        Severity::Note,
                        code,
                        format!("{marker} marker"),
                        span,
                    ));
                }
            }
        }
        findings
    }
}
