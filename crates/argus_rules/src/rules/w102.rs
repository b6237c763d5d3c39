//! W102: tab indentation, a tab character used to indent a line.

use argus_diagnostics::{Category, Finding, Fix, Replacement, RuleCode};
use argus_source::Span;

use crate::context::RuleContext;
use crate::Rule;

/// Detects tab characters in a line's leading whitespace.
///
/// The attached fix rewrites the whole indentation run, replacing each tab
/// with `tab_width` spaces. Tabs after the first visible character are left
/// alone; inside a line they may be intentional alignment.
pub struct TabIndentation;

impl Rule for TabIndentation {
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let code = RuleCode::new(Category::Warning, 102);
        let tab_width = ctx.settings.tab_width as usize;
        let mut findings = Vec::new();

        for (start, line) in ctx.lines() {
            let indent_len = line
                .len()
                .saturating_sub(line.trim_start_matches([' ', '\t']).len());
            let indent = &line[..indent_len];
            if !indent.contains('\t') {
                continue;
            }
            let span = Span::new(start, start + indent_len as u32);
            let expanded: String = indent
                .chars()
                .map(|c| {
                    if c == '\t' {
                        " ".repeat(tab_width)
                    } else {
                        c.to_string()
                    }
                })
                .collect();
            findings.push(
                Finding::warning(code, "tab character in indentation", span).with_fix(Fix::new(
                    "replace tabs with spaces",
                    vec![Replacement::new(span, expanded)],
                )),
            );
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
        TabIndentation.check(&ctx)
    }

    fn check(text: &str) -> Vec<Finding> {
        check_with(text, &RuleSettings::default())
    }

    #[test]
    fn tab_indent_fires() {
        let findings = check("\tindented\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(0, 1));
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacements[0].new_text, "    ");
    }

    #[test]
    fn mixed_indent_rewrites_whole_run() {
        let findings = check("  \tx\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].span, Span::new(0, 3));
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacements[0].new_text, "      ");
    }

    #[test]
    fn tab_width_setting_is_used() {
        let settings = RuleSettings {
            tab_width: 2,
            ..RuleSettings::default()
        };
        let findings = check_with("\tx\n", &settings);
        let fix = findings[0].fix.as_ref().unwrap();
        assert_eq!(fix.replacements[0].new_text, "  ");
    }

    #[test]
    fn space_indent_is_silent() {
        assert!(check("    indented\n").is_empty());
    }

    #[test]
    fn interior_tab_is_silent() {
        assert!(check("a\tb\n").is_empty());
    }
}
