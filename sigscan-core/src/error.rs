//! Error types for script introspection
//!
//! Message text is part of the public contract: the editor-side caller
//! matches on the exact strings rendered by `Display`, so the wording of
//! every variant below must stay stable.

use thiserror::Error;

/// Failures surfaced by signature extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Source text is not syntactically valid Python
    #[error("invalid syntax at line {line}")]
    Syntax { line: usize },

    /// The Python grammar could not be loaded or produced no tree
    #[error("parser failure: {0}")]
    Parser(String),

    /// No function definition named `execute` anywhere in the module
    #[error("Function execute not found.")]
    ExecuteNotFound,

    /// The selected `execute` definition has no return statement
    #[error("No return statement found.")]
    ReturnNotFound,

    /// The given path does not resolve to an existing file
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Coarse re-wrap applied by file-based extraction: every failure other
    /// than a missing file is reduced to the original error's message.
    /// Callers cannot distinguish bad syntax from a missing `execute` once
    /// wrapped.
    #[error("Error when parsing: {0}")]
    Wrapped(String),
}

/// Failures surfaced by metadata header parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// `def execute` is missing or has fewer than two lines above it
    #[error("Comment not found before def execute")]
    CommentNotFound,

    /// The header lines are present but name/params/nexts are incomplete
    #[error("Invalid comment format")]
    InvalidFormat,
}
