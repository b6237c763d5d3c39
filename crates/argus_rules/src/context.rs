//! Per-unit context handed to rules.

use argus_common::UnitId;
use argus_config::RuleSettings;
use argus_source::LineIndex;
use std::path::Path;

/// Everything a rule may look at when checking one unit.
///
/// The context is read-only. Rules receive the analyzed text (after any
/// transform has run), never the raw on-disk bytes, together with the
/// precomputed line index for that text.
pub struct RuleContext<'a> {
    /// The unit being checked.
    pub unit: UnitId,
    /// Path of the unit, for applicability decisions and messages.
    pub path: &'a Path,
    /// The analyzed text.
    pub text: &'a str,
    /// Line index for [`text`](Self::text).
    pub line_index: &'a LineIndex,
    /// Whether the unit was detected as machine-generated.
    pub generated: bool,
    /// Thresholds from `[rules.settings]`.
    pub settings: &'a RuleSettings,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one unit.
    pub fn new(
        unit: UnitId,
        path: &'a Path,
        text: &'a str,
        line_index: &'a LineIndex,
        generated: bool,
        settings: &'a RuleSettings,
    ) -> Self {
        Self {
            unit,
            path,
            text,
            line_index,
            generated,
            settings,
        }
    }

    /// Returns the unit's filename suffix including the dot (e.g., `.md`).
    pub fn suffix(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
    }

    /// Iterates over lines as `(byte_offset, content)` pairs.
    ///
    /// Content excludes the line terminator; a trailing `\r` is treated as
    /// part of a `\r\n` terminator and stripped as well. The final line is
    /// yielded even without a terminator; empty text yields nothing.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &'a str)> + 'a {
        let mut offset = 0u32;
        self.text.split_inclusive('\n').map(move |raw| {
            let start = offset;
            offset += raw.len() as u32;
            let content = raw.strip_suffix('\n').unwrap_or(raw);
            let content = content.strip_suffix('\r').unwrap_or(content);
            (start, content)
        })
    }
}
