//! Unit representation: one analyzable text with identity and metadata.

use crate::line_index::LineIndex;
use argus_common::{ContentHash, UnitId};
use std::path::PathBuf;

/// How many leading lines are scanned for generated-content markers.
const GENERATED_MARKER_LINES: usize = 5;

/// One analyzable unit loaded into the session.
///
/// Stores the unit's raw text along with a precomputed line index and the
/// content hash that feeds dependency fingerprints. The text here is the
/// stored (raw) form; analyzed text is derived from it by a transform and
/// lives in the analysis loop.
pub struct Unit {
    /// The session-local identifier for this unit.
    pub id: UnitId,
    /// The filesystem path of this unit (or a synthetic name for in-memory units).
    pub path: PathBuf,
    /// The raw text content as stored.
    pub content: String,
    /// Line index over the raw content.
    pub line_index: LineIndex,
    /// Hash of the raw content for fingerprinting.
    pub content_hash: ContentHash,
    /// Whether the content carries a machine-generated marker.
    pub generated: bool,
}

impl Unit {
    /// Creates a new `Unit` with precomputed line index, content hash, and
    /// generated-marker detection.
    pub fn new(id: UnitId, path: PathBuf, content: String) -> Self {
        let line_index = LineIndex::new(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        let generated = detect_generated(&content);
        Self {
            id,
            path,
            content,
            line_index,
            content_hash,
            generated,
        }
    }

    /// Returns a substring of the raw content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }

    /// Returns the unit's file suffix (extension with leading dot), if any.
    pub fn suffix(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
    }
}

/// Scans the first few lines for a generated-content marker.
fn detect_generated(content: &str) -> bool {
    content
        .lines()
        .take(GENERATED_MARKER_LINES)
        .any(|line| line.contains("@generated") || line.contains("DO NOT EDIT"))
}
