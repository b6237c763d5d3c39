//! E101: conflict marker, an unresolved merge conflict left in the text.

use argus_diagnostics::{Category, Finding, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects unresolved merge conflict markers (`<<<<<<<`, `=======`,
/// `>>>>>>>`, `|||||||`) at the start of a line.
///
/// The separator forms (`=======` and `|||||||`) are only reported between
/// an opening and a closing marker, so a line of equals signs used as a
/// plain horizontal rule is not flagged.
pub struct ConflictMarker;

const MARKER_LEN: u32 = 7;

enum Marker {
    Open,
    Separator,
    Close,
}

fn marker_kind(line: &str) -> Option<Marker> {
    let classify = |prefix: &str, kind: fn() -> Marker| -> Option<Marker> {
        let rest = line.strip_prefix(prefix)?;
        if rest.is_empty() || rest.starts_with(' ') {
            Some(kind())
        } else {
            None
        }
    };
    classify("<<<<<<<", || Marker::Open)
        .or_else(|| classify(">>>>>>>", || Marker::Close))
        .or_else(|| classify("=======", || Marker::Separator))
        .or_else(|| classify("|||||||", || Marker::Separator))
}

impl Rule for ConflictMarker {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Error, 101);
        let mut findings = Vec::new();
        let mut in_conflict = false;

        for (start, line) in ctx.lines() {
            let Some(kind) = marker_kind(line) else {
                continue;
            };
            let span = Span::new(start, start + MARKER_LEN);
            match kind {
                Marker::Open => {
                    in_conflict = true;
                    findings.push(
                        Finding::error(code, "unresolved merge conflict marker", span)
                            .with_note("resolve the conflict and remove all markers"),
                    );
                }
                Marker::Close => {
                    in_conflict = false;
                    findings.push(
                        Finding::error(code, "unresolved merge conflict marker", span)
                            .with_note("resolve the conflict and remove all markers"),
                    );
                }
                Marker::Separator if in_conflict => {
                    findings.push(Finding::error(
                        code,
                        "unresolved merge conflict marker",
                        span,
                    ));
                }
                Marker::Separator => {}
            }
        }
        findings
    }
}
