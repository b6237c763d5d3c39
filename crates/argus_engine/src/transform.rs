//! Mapping between raw unit text and the text rules actually analyze.
//!
//! Some units embed the analyzable fragment inside a host document. A
//! transform extracts the fragment for analysis and maps every resulting
//! coordinate back to the raw document, so findings and fixes always point
//! at real file offsets. Transforms are stateful per unit: the fix loop
//! rewrites the analyzed text, and the transform must track how that shifts
//! its mapping.

use crate::fix_applier::TextChange;
use argus_diagnostics::Finding;
use std::collections::HashMap;
use tracing::debug;

/// Per-unit mapping between raw and analyzed coordinate spaces.
///
/// The orchestrator drives one instance through the per-unit loop:
/// `preprocess` once, then after each fix application `on_text_changed`,
/// and finally `map_findings_back` on the findings it reports. An identity
/// transform must be indistinguishable from no transform at all.
pub trait Transform: Send {
    /// Produces the analyzed text from the raw text, capturing whatever
    /// state the reverse mapping needs.
    fn preprocess(&mut self, raw: &str) -> String;

    /// Translates findings from analyzed to raw coordinates.
    ///
    /// Findings outside any mapped region are dropped. A fix with any
    /// unmappable replacement is stripped from its finding rather than
    /// pointing at the wrong bytes.
    fn map_findings_back(&self, findings: Vec<Finding>) -> Vec<Finding>;

    /// Updates mapping state after a fix pass rewrote the analyzed text.
    fn on_text_changed(&mut self, new_analyzed: &str, change: &TextChange);

    /// Current raw rendering of the unit with all applied fixes folded in.
    ///
    /// `None` means the analyzed text is the raw text itself.
    fn raw_text(&self) -> Option<String>;
}

/// The no-op transform: analyzed text is the raw text.
#[derive(Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn preprocess(&mut self, raw: &str) -> String {
        raw.to_string()
    }

    fn map_findings_back(&self, findings: Vec<Finding>) -> Vec<Finding> {
        findings
    }

    fn on_text_changed(&mut self, _new_analyzed: &str, _change: &TextChange) {}

    fn raw_text(&self) -> Option<String> {
        None
    }
}

/// Analyzes the body of the first fenced code block of a host document.
///
/// The mapping is a single region at a constant offset: every analyzed
/// coordinate maps to `offset + coordinate` in the raw document. When no
/// fenced block is present the transform degrades to the identity.
pub struct FencedBlockTransform {
    /// Raw text up to and including the opening fence line. Empty until
    /// `preprocess` runs or when no block was found.
    prefix: String,
    /// Raw text from the closing fence line to the end.
    suffix: String,
    /// Current fragment text (the block body, possibly fixed).
    fragment: String,
    /// Byte offset of the fragment within the original raw text.
    offset: u32,
    active: bool,
}

impl FencedBlockTransform {
    /// Creates a transform with no captured state; `preprocess` arms it.
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            fragment: String::new(),
            offset: 0,
            active: false,
        }
    }

    /// Locates the first fenced block, returning the byte range of its body.
    fn find_block(raw: &str) -> Option<(usize, usize)> {
        let mut offset = 0usize;
        let mut body_start: Option<usize> = None;
        for line in raw.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            let is_fence = content.trim_end().starts_with("```");
            match body_start {
                None if is_fence => {
                    // Body starts after the opening fence line; an opener
                    // without a terminator opens nothing.
                    if line.ends_with('\n') {
                        body_start = Some(offset + line.len());
                    } else {
                        return None;
                    }
                }
                Some(start) if is_fence => {
                    return Some((start, offset));
                }
                _ => {}
            }
            offset += line.len();
        }
        None
    }
}

impl Default for FencedBlockTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for FencedBlockTransform {
    fn preprocess(&mut self, raw: &str) -> String {
        match Self::find_block(raw) {
            Some((start, end)) => {
                self.prefix = raw[..start].to_string();
                self.suffix = raw[end..].to_string();
                self.fragment = raw[start..end].to_string();
                self.offset = start as u32;
                self.active = true;
                self.fragment.clone()
            }
            None => {
                self.active = false;
                raw.to_string()
            }
        }
    }

    fn map_findings_back(&self, findings: Vec<Finding>) -> Vec<Finding> {
        if !self.active {
            return findings;
        }
        let limit = self.fragment.len() as u32;
        let mut mapped = Vec::with_capacity(findings.len());
        for mut finding in findings {
            if finding.span.end > limit {
                debug!(span = ?finding.span, "dropping finding outside the mapped region");
                continue;
            }
            finding.span.start += self.offset;
            finding.span.end += self.offset;
            finding.fix = finding.fix.take().and_then(|mut fix| {
                for replacement in &mut fix.replacements {
                    if replacement.span.end > limit {
                        debug!(fix = %fix.message, "stripping fix with unmappable replacement");
                        return None;
                    }
                    replacement.span.start += self.offset;
                    replacement.span.end += self.offset;
                }
                Some(fix)
            });
            finding.alternatives.retain_mut(|fix| {
                for replacement in &mut fix.replacements {
                    if replacement.span.end > limit {
                        return false;
                    }
                    replacement.span.start += self.offset;
                    replacement.span.end += self.offset;
                }
                true
            });
            mapped.push(finding);
        }
        mapped
    }

    fn on_text_changed(&mut self, new_analyzed: &str, _change: &TextChange) {
        if self.active {
            // Single region: the new analyzed text is the new fragment,
            // and the region offset never moves.
            self.fragment = new_analyzed.to_string();
        }
    }

    fn raw_text(&self) -> Option<String> {
        if !self.active {
            return None;
        }
        let mut raw =
            String::with_capacity(self.prefix.len() + self.fragment.len() + self.suffix.len());
        raw.push_str(&self.prefix);
        raw.push_str(&self.fragment);
        raw.push_str(&self.suffix);
        Some(raw)
    }
}

/// Constructs a fresh transform instance.
pub type TransformFactory = fn() -> Box<dyn Transform>;

/// Suffix-keyed selection of transforms, defaulting to the identity.
///
/// This is the plugin boundary: embedders register a factory for a suffix
/// and every unit with that suffix gets its own instance.
pub struct TransformRegistry {
    by_suffix: HashMap<String, TransformFactory>,
}

impl TransformRegistry {
    /// Creates an empty registry; every unit gets the identity transform.
    pub fn new() -> Self {
        Self {
            by_suffix: HashMap::new(),
        }
    }

    /// Creates a registry with the builtin transforms registered.
    ///
    /// `.md` hosts get [`FencedBlockTransform`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(".md", || Box::new(FencedBlockTransform::new()));
        registry
    }

    /// Registers `factory` for units with the given suffix (including the
    /// dot), replacing any prior registration.
    pub fn register(&mut self, suffix: &str, factory: TransformFactory) {
        self.by_suffix.insert(suffix.to_string(), factory);
    }

    /// Creates the transform for a unit with the given suffix.
    pub fn create_for(&self, suffix: Option<&str>) -> Box<dyn Transform> {
        suffix
            .and_then(|s| self.by_suffix.get(s))
            .map(|factory| factory())
            .unwrap_or_else(|| Box::new(IdentityTransform))
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}
