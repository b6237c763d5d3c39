//! W104: consecutive blank lines, more blank lines in a row than allowed.

use argus_diagnostics::{Category, Finding, Fix, Replacement, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects runs of blank lines longer than `max_blank_lines`.
///
/// A line is blank when it contains only spaces and tabs. The finding spans
/// the excess lines and the attached fix deletes them, keeping exactly the
/// allowed number.
pub struct ConsecutiveBlankLines;

struct BlankRun {
    /// Offsets where each blank line of the run starts.
    line_starts: Vec<u32>,
    /// End of the run's last blank line, terminator included.
    end: u32,
}

fn blank_runs(text: &str) -> Vec<BlankRun> {
    let mut runs = Vec::new();
    let mut current: Option<BlankRun> = None;
    let mut offset = 0u32;

    for raw in text.split_inclusive('\n') {
        let start = offset;
        offset += raw.len() as u32;
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        let blank = content.chars().all(|c| c == ' ' || c == '\t');

        if blank {
            let run = current.get_or_insert(BlankRun {
                line_starts: Vec::new(),
                end: start,
            });
            run.line_starts.push(start);
            run.end = offset;
        } else if let Some(run) = current.take() {
            runs.push(run);
        }
    }
    if let Some(run) = current.take() {
        runs.push(run);
    }
    runs
}

impl Rule for ConsecutiveBlankLines {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Warning, 104);
        let max = ctx.settings.max_blank_lines as usize;
        let mut findings = Vec::new();

        for run in blank_runs(ctx.text) {
            let count = run.line_starts.len();
            if count <= max {
                continue;
            }
            let span = Span::new(run.line_starts[max], run.end);
            findings.push(
                Finding::warning(
                    code,
                    format!("{count} consecutive blank lines (limit {max})"),
                    span,
                )
                .with_fix(Fix::new(
                    "remove extra blank lines",
                    vec![Replacement::delete(span)],
                )),
            );
        }
        findings
    }
}
