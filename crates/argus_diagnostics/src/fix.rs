//! Auto-applicable fixes attached to findings.

use argus_source::Span;
use serde::{Deserialize, Serialize};

/// A text replacement to apply to a unit's text as part of a fix.
///
/// The span is a range in the analyzed text of the unit the owning finding
/// was produced for. An empty span is an insertion point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// The text range to replace.
    pub span: Span,
    /// The new text to insert in place of the span.
    pub new_text: String,
}

impl Replacement {
    /// Creates a new replacement.
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// Creates a replacement that deletes the span.
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            new_text: String::new(),
        }
    }

    /// Creates a replacement that inserts text at an offset.
    pub fn insert_at(offset: u32, new_text: impl Into<String>) -> Self {
        Self {
            span: Span::empty_at(offset),
            new_text: new_text.into(),
        }
    }
}

/// A fix that can be automatically applied to a unit's text.
///
/// A fix consists of a human-readable message describing the change and one
/// or more [`Replacement`]s that together implement it. Application is
/// atomic: either every replacement of the fix is accepted or the whole fix
/// is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// A description of what this fix does.
    pub message: String,
    /// The set of text replacements that implement this fix.
    pub replacements: Vec<Replacement>,
}

impl Fix {
    /// Creates a fix from a message and its replacements.
    pub fn new(message: impl Into<String>, replacements: Vec<Replacement>) -> Self {
        Self {
            message: message.into(),
            replacements,
        }
    }

    /// Creates a single-replacement fix.
    pub fn replace(message: impl Into<String>, span: Span, new_text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacements: vec![Replacement::new(span, new_text)],
        }
    }
}
