//! W105: missing final newline at the end of the unit.

use argus_diagnostics::{Category, Finding, Fix, Replacement, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects non-empty text that does not end with a newline. The attached
/// fix inserts one. Empty units are left alone.
pub struct MissingFinalNewline;

impl Rule for MissingFinalNewline {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        if ctx.text.is_empty() || ctx.text.ends_with('\n') {
            return Vec::new();
        }
        let code = RuleCode::new(Category::Warning, 105);
        let end = ctx.text.len() as u32;
        vec![
            Finding::warning(code, "no newline at end of file", Span::empty_at(end)).with_fix(
                Fix::new(
                    "add a final newline",
                    vec![Replacement::insert_at(end, "\n")],
                ),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_common::UnitId;
    use argus_config::RuleSettings;
    use argus_source::LineIndex;
    use std::path::Path;

    fn check(text: &str) -> Vec<Finding> {
        let index = LineIndex::new(text);
        let settings = RuleSettings::default();
        let ctx = RuleContext::new(
            UnitId::from_raw(0),
            Path::new("a.txt"),
            text,
            &index,
            false,
            &settings,
        );
        MissingFinalNewline.check(&ctx)
    }

    #[test]
    fn missing_newline_fires() {
        let findings = check("hello");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::empty_at(5));
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacements[0].new_text, "\n");
        assert_eq!(fix.replacements[0].span, Span::empty_at(5));
    }

    #[test]
    fn terminated_text_is_silent() {
        assert!(check("hello\n").is_empty());
    }

    #[test]
    fn empty_text_is_silent() {
        assert!(check("").is_empty());
    }
}
