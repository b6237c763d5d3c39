//! Finding rendering for human-readable terminal output.

use crate::finding::Finding;
use argus_source::LineIndex;
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Trait for rendering findings into formatted output strings.
///
/// The text and line index passed in describe the revision the finding's
/// span refers to. After fixes, that is the fixed text, not the text the
/// unit was originally loaded with.
pub trait FindingRenderer {
    /// Renders a single finding into a formatted string.
    fn render(&self, finding: &Finding, path: &Path, text: &str, index: &LineIndex) -> String;
}

/// Renders findings in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W101]: trailing whitespace
///   --> src/notes.txt:10:21
///    |
/// 10 | the end of this line
///    |                     ^^^
///    |
///    = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_color(&self, finding: &Finding) -> &'static str {
        if !self.color {
            return "";
        }
        match finding.severity {
            crate::Severity::Error => "\x1b[31m",
            crate::Severity::Warning => "\x1b[33m",
            crate::Severity::Note | crate::Severity::Help => "\x1b[36m",
        }
    }
}

impl FindingRenderer for TerminalRenderer {
    fn render(&self, finding: &Finding, path: &Path, text: &str, index: &LineIndex) -> String {
        let mut out = String::new();

        let (color, reset, bold) = if self.color {
            (self.severity_color(finding), RESET, BOLD)
        } else {
            ("", "", "")
        };

        // Header line: severity[CODE]: message
        out.push_str(&format!(
            "{bold}{color}{}[{}]{reset}{bold}: {}{reset}\n",
            finding.severity, finding.code, finding.message
        ));

        // Location line
        let (line, col) = index.line_col(finding.span.start);
        out.push_str(&format!("  --> {}:{line}:{col}\n", path.display()));

        // Source line with underline
        let line_num = format!("{line}");
        let padding = " ".repeat(line_num.len());
        let line_content = get_source_line(text, finding.span.start);

        out.push_str(&format!("{padding} |\n"));
        out.push_str(&format!("{line_num} | {line_content}\n"));

        // Underline; empty spans (insertion points) still get one caret
        let span_len = (finding.span.end - finding.span.start).max(1) as usize;
        let carets = "^".repeat(span_len);
        let col_padding = " ".repeat((col as usize).saturating_sub(1));
        out.push_str(&format!("{padding} | {col_padding}{color}{carets}{reset}\n"));

        // Notes
        for note in &finding.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        // Fix availability
        if let Some(fix) = &finding.fix {
            out.push_str(&format!("   = fix: {}\n", fix.message));
        }

        out
    }
}

/// Extracts the line of text containing the given byte offset.
fn get_source_line(content: &str, byte_offset: u32) -> &str {
    let offset = (byte_offset as usize).min(content.len());
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, RuleCode};
    use crate::fix::Fix;
    use argus_source::Span;
    use std::path::PathBuf;

    fn render_plain(finding: &Finding, text: &str) -> String {
        let index = LineIndex::new(text);
        TerminalRenderer::new(false).render(finding, &PathBuf::from("test.txt"), text, &index)
    }

    #[test]
    fn render_warning_with_span() {
        let text = "some text   \nnext line\n";
        let code = RuleCode::new(Category::Warning, 101);
        let finding = Finding::warning(code, "trailing whitespace", Span::new(9, 12));

        let output = render_plain(&finding, text);

        assert!(output.contains("warning[W101]: trailing whitespace"));
        assert!(output.contains("--> test.txt:1:10"));
        assert!(output.contains("some text"));
        assert!(output.contains("^^^"));
    }

    #[test]
    fn render_notes_and_fix() {
        let text = "line\n";
        let code = RuleCode::new(Category::Warning, 105);
        let finding = Finding::warning(code, "no final newline", Span::empty_at(4))
            .with_note("files should end with a newline")
            .with_fix(Fix::replace("insert a newline", Span::empty_at(4), "\n"));

        let output = render_plain(&finding, text);

        assert!(output.contains("= note: files should end with a newline"));
        assert!(output.contains("= fix: insert a newline"));
        // Insertion point renders a single caret
        assert!(output.contains("^"));
    }

    #[test]
    fn render_offset_at_end_of_text() {
        let text = "abc";
        let code = RuleCode::new(Category::Warning, 105);
        let finding = Finding::warning(code, "no final newline", Span::empty_at(3));

        let output = render_plain(&finding, text);
        assert!(output.contains("--> test.txt:1:4"));
        assert!(output.contains("abc"));
    }

    #[test]
    fn color_codes_only_when_enabled() {
        let text = "x\n";
        let code = RuleCode::new(Category::Error, 101);
        let finding = Finding::error(code, "bad", Span::new(0, 1));
        let index = LineIndex::new(text);

        let plain =
            TerminalRenderer::new(false).render(&finding, &PathBuf::from("t.txt"), text, &index);
        let colored =
            TerminalRenderer::new(true).render(&finding, &PathBuf::from("t.txt"), text, &index);

        assert!(!plain.contains("\x1b["));
        assert!(colored.contains("\x1b[31m"));
    }
}
