//! Deterministic application of possibly-conflicting fixes to one text.
//!
//! Rules propose fixes independently, so two fixes may edit overlapping
//! ranges. The applier resolves conflicts with a fixed, platform-independent
//! policy: replacements are sorted by `(start, end)`, walked once, and a
//! replacement that overlaps an already-accepted one loses. Earlier-starting
//! replacements win ties; among equal starts the shorter span wins. A fix
//! either applies in full or not at all.

use argus_diagnostics::Fix;
use tracing::debug;

/// The net range rewritten by one application pass.
///
/// `start..old_end` is the affected range in the input text, `start..new_end`
/// the corresponding range in the output. Transforms use it to shift
/// trailing coordinates without rescanning the whole text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChange {
    /// First byte affected by any accepted replacement.
    pub start: u32,
    /// End of the affected range in the input text.
    pub old_end: u32,
    /// End of the affected range in the output text.
    pub new_end: u32,
}

/// Result of applying a set of fixes to one text.
#[derive(Debug)]
pub struct FixOutcome {
    /// The rewritten text.
    pub text: String,
    /// Number of fixes applied in full.
    pub applied: usize,
    /// Number of fixes dropped because of a conflict or an invalid span.
    pub rejected: usize,
    /// Net change range; `None` when nothing was applied.
    pub change: Option<TextChange>,
}

struct Candidate {
    fix_idx: usize,
    start: u32,
    end: u32,
    text_idx: usize,
}

/// Applies `fixes` to `text`, resolving conflicts deterministically.
///
/// Conflicts are expected, not errors: every rule proposes its fix against
/// the same input text without knowing about the others. Rejected fixes
/// reappear as findings on the next analysis pass and get another chance
/// then. Correctness outranks the applied count, so two overlapping edits
/// are never both taken.
pub fn apply(text: &str, fixes: &[Fix]) -> FixOutcome {
    let mut rejected_fix = vec![false; fixes.len()];
    let mut candidates = Vec::new();

    for (fix_idx, fix) in fixes.iter().enumerate() {
        if fix.replacements.is_empty() {
            debug!(fix = %fix.message, "ignoring fix with no replacements");
            rejected_fix[fix_idx] = true;
            continue;
        }
        for (text_idx, replacement) in fix.replacements.iter().enumerate() {
            let (start, end) = (replacement.span.start, replacement.span.end);
            if !valid_span(text, start, end) {
                debug!(fix = %fix.message, start, end, "rejecting fix with invalid span");
                rejected_fix[fix_idx] = true;
                break;
            }
            candidates.push(Candidate {
                fix_idx,
                start,
                end,
                text_idx,
            });
        }
    }

    // Total order: position first, then original fix order for identical
    // spans, so the outcome is independent of sort stability.
    candidates.sort_by_key(|c| (c.start, c.end, c.fix_idx, c.text_idx));

    let mut accepted: Vec<&Candidate> = Vec::new();
    let mut last_end = 0u32;
    for candidate in &candidates {
        if rejected_fix[candidate.fix_idx] {
            continue;
        }
        if candidate.start >= last_end {
            last_end = candidate.end;
            accepted.push(candidate);
        } else {
            rejected_fix[candidate.fix_idx] = true;
        }
    }
    // A fix whose later replacement conflicted may already have earlier
    // replacements in the accepted list; atomicity removes them again.
    // Removal only relaxes constraints, so the survivors stay disjoint.
    accepted.retain(|c| !rejected_fix[c.fix_idx]);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for candidate in &accepted {
        let fix = &fixes[candidate.fix_idx];
        let replacement = &fix.replacements[candidate.text_idx];
        out.push_str(&text[cursor..candidate.start as usize]);
        out.push_str(&replacement.new_text);
        cursor = candidate.end as usize;
    }
    out.push_str(&text[cursor..]);

    let mut applied = 0usize;
    let mut rejected = 0usize;
    for (fix, was_rejected) in fixes.iter().zip(&rejected_fix) {
        if fix.replacements.is_empty() {
            continue;
        }
        if *was_rejected {
            rejected += 1;
        } else {
            applied += 1;
        }
    }

    let change = if accepted.is_empty() {
        None
    } else {
        let start = accepted[0].start;
        let old_end = accepted.last().map(|c| c.end).unwrap_or(start);
        let delta: i64 = accepted
            .iter()
            .map(|c| {
                let fix = &fixes[c.fix_idx];
                fix.replacements[c.text_idx].new_text.len() as i64 - (c.end - c.start) as i64
            })
            .sum();
        Some(TextChange {
            start,
            old_end,
            new_end: (old_end as i64 + delta) as u32,
        })
    };

    FixOutcome {
        text: out,
        applied,
        rejected,
        change,
    }
}

fn valid_span(text: &str, start: u32, end: u32) -> bool {
    let (start, end) = (start as usize, end as usize);
    start <= end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end)
}
