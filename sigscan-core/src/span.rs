//! Language-agnostic source span representation

use serde::{Deserialize, Serialize};

/// A contiguous region of source code, independent of the parser used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the start of the span (inclusive)
    pub start: usize,
    /// Byte offset of the end of the span (exclusive)
    pub end: usize,
    /// Line number of the start (1-indexed)
    pub start_line: u32,
    /// Line number of the end (1-indexed)
    pub end_line: u32,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize, start_line: u32, end_line: u32) -> Self {
        SourceSpan {
            start,
            end,
            start_line,
            end_line,
        }
    }

    /// Get the length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl From<tree_sitter::Node<'_>> for SourceSpan {
    fn from(node: tree_sitter::Node<'_>) -> Self {
        SourceSpan {
            start: node.start_byte(),
            end: node.end_byte(),
            // tree-sitter uses 0-indexed rows
            start_line: node.start_position().row as u32 + 1,
            end_line: node.end_position().row as u32 + 1,
        }
    }
}
