//! Line-start indexing for fast byte-offset to line/column conversion.

/// Precomputed line-start offsets for one revision of a text.
///
/// Built once per text and queried many times during rule execution and
/// rendering. Because the fix loop produces new text revisions, the index
/// is a standalone value rather than part of the unit: each revision gets
/// its own index.
pub struct LineIndex {
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Builds the index for the given text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Uses binary search on the precomputed line-start offsets.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the byte offset where the given 1-indexed line starts.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get((line as usize).checked_sub(1)?).copied()
    }

    /// Returns the number of lines in the indexed text.
    ///
    /// An empty text has one (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}
