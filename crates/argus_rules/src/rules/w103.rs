//! W103: long line, a line exceeding the configured character limit.

use argus_diagnostics::{Category, Finding, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects lines longer than `max_line_length` characters.
///
/// Length is counted in `char`s, not bytes, so multi-byte text is not
/// penalized. The finding's span covers the overflowing tail. There is no
/// fix; breaking a line needs judgement.
pub struct LongLine;

impl Rule for LongLine {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Warning, 103);
        let limit = ctx.settings.max_line_length as usize;
        let mut findings = Vec::new();

        for (start, line) in ctx.lines() {
            let length = line.chars().count();
            if length <= limit {
                continue;
            }
            // Byte offset of the first character past the limit.
            let overflow_at = line
                .char_indices()
                .nth(limit)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            let span = Span::new(start + overflow_at as u32, start + line.len() as u32);
            findings.push(Finding::warning(
                code,
                format!("line is {length} characters (limit {limit})"),
                span,
            ));
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_common::UnitId;
    use argus_config::RuleSettings;
    use argus_source::LineIndex;
    use std::path::Path;

    fn check_with(text: &str, settings: &RuleSettings) -> Vec<Finding> {
        let index = LineIndex::new(text);
        let ctx = RuleContext::new(
            UnitId::from_raw(0),
            Path::new("a.txt"),
            text,
            &index,
            false,
            settings,
        );
        LongLine.check(&ctx)
    }

    fn limit(max: u32) -> RuleSettings {
        RuleSettings {
            max_line_length: max,
            ..RuleSettings::default()
        }
    }

    #[test]
    fn long_line_fires() {
        let findings = check_with("abcdefgh\n", &limit(5));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(5, 8));
        assert!(findings[0].message.contains("8 characters"));
    }

    #[test]
    fn line_at_limit_is_silent() {
        assert!(check_with("abcde\n", &limit(5)).is_empty());
    }

    #[test]
    fn multibyte_counts_chars_not_bytes() {
        // Five three-byte characters; limit five means no finding.
        assert!(check_with("あいうえお\n", &limit(5)).is_empty());
        let findings = check_with("あいうえおか\n", &limit(5));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(15, 18));
    }

    #[test]
    fn each_long_line_reported() {
        let findings = check_with("abcdef\nabcdefg\n", &limit(5));
        assert_eq!(findings.len(), 2);
    }
}
