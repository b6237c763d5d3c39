//! Byte-offset ranges within a unit's text.

use serde::{Deserialize, Serialize};

/// A byte offset range within one unit's text.
///
/// Spans track the location of findings and fix replacements. The `start`
/// is inclusive and `end` is exclusive. The owning unit is implicit: a
/// finding's span is a range within the text of the unit the finding was
/// produced for, which keeps spans stable across serialization (unit ids
/// are session-local but offsets are not).
///
/// The derived ordering is `(start, end)` lexicographic, which is the order
/// replacements are applied in and the primary key for finding output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: u32,
    /// Byte offset of the end of the span (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span with the given byte range.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a zero-length span at the given offset (an insertion point).
    pub fn empty_at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Merges two spans in the same unit, producing a span that covers both.
    ///
    /// Takes the minimum start and maximum end of the two spans.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns `true` if `offset` falls within this span.
    ///
    /// For empty spans this is true only at the insertion point itself.
    pub fn contains(&self, offset: u32) -> bool {
        if self.is_empty() {
            offset == self.start
        } else {
            offset >= self.start && offset < self.end
        }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if this span has zero length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
