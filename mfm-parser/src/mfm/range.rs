//! Position tracking for diagnostics
//!
//! The parser works on raw byte offsets and never tracks lines while scanning.
//! When an error has to be shown to a person, [`SourceLocation`] converts the
//! byte offset into a line:column [`Position`] with a binary search over the
//! line starts.
//!
//! - Lines and columns are 0-based here; rendering adds one.
//! - Columns count bytes, not characters, matching the offsets the parser reports.

use std::fmt;

/// A line:column position in the source (both 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .iter()
                .enumerate()
                .filter(|(_, byte)| **byte == b'\n')
                .map(|(pos, _)| pos + 1),
        );
        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(line, byte_offset - self.line_starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
