//! Error handling and diagnostics for scopecheck
//!
//! This module provides the source position types shared by every stage,
//! the operational error type, and the `Diagnostic` records the analyzer
//! reports.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Fix, FixKind, Severity};

/// Result type alias for scopecheck operations
pub type CheckResult<T> = Result<T, CheckError>;

/// A 1-based line/column position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open byte range `[start_offset, end_offset)` into the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpan {
    pub start_offset: usize,
    pub end_offset: usize,
}

impl SourceSpan {
    pub fn new(start_offset: usize, end_offset: usize) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_offset, self.end_offset)
    }
}

/// Where a token or AST node sits in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub span: SourceSpan,
}

impl SourceLocation {
    pub fn new(start: SourcePosition, end: SourcePosition, span: SourceSpan) -> Self {
        Self { start, end, span }
    }

    /// Location covering everything from `self` through `other`
    pub fn to(&self, other: &SourceLocation) -> Self {
        Self {
            start: self.start,
            end: other.end,
            span: SourceSpan::new(self.span.start_offset, other.span.end_offset),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// Main error type for scopecheck
///
/// Analysis findings are never errors; they are `Diagnostic` values. This
/// type covers the operational failures around them.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Lexical analysis error
    #[error("Lexer Error: {message} at {position}")]
    Lexer {
        message: String,
        position: SourcePosition,
    },
    /// Parsing error
    #[error("Parse Error: {message} at {position}")]
    Parse {
        message: String,
        position: SourcePosition,
    },
    /// A fix span that cannot be applied to the given text
    #[error("Fix Error: span {span} does not fit a source of {len} bytes")]
    InvalidFix { span: SourceSpan, len: usize },
    /// Failure reading an input file
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Create a new lexer error
    pub fn lexer_error(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::Lexer {
            message: message.into(),
            position,
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, position: SourcePosition) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    /// Create a new I/O error for `path`
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::Lexer { .. } => "Lexer Error",
            Self::Parse { .. } => "Parse Error",
            Self::InvalidFix { .. } => "Fix Error",
            Self::Io { .. } => "I/O Error",
        }
    }

    /// Get the error message without kind or position
    pub fn message(&self) -> String {
        match self {
            Self::Lexer { message, .. } | Self::Parse { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Get the source position if the error has one
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            Self::Lexer { position, .. } | Self::Parse { position, .. } => Some(*position),
            Self::InvalidFix { .. } | Self::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_position_display() {
        let pos = SourcePosition::new(10, 5);
        assert_eq!(pos.to_string(), "10:5");
        assert_eq!(SourcePosition::default(), SourcePosition::new(1, 1));
    }

    #[test]
    fn test_location_join() {
        let a = SourceLocation::new(
            SourcePosition::new(1, 1),
            SourcePosition::new(1, 4),
            SourceSpan::new(0, 3),
        );
        let b = SourceLocation::new(
            SourcePosition::new(2, 3),
            SourcePosition::new(2, 8),
            SourceSpan::new(10, 15),
        );
        let joined = a.to(&b);
        assert_eq!(joined.start, SourcePosition::new(1, 1));
        assert_eq!(joined.end, SourcePosition::new(2, 8));
        assert_eq!(joined.span, SourceSpan::new(0, 15));
    }

    #[test]
    fn test_error_creation() {
        let pos = SourcePosition::new(1, 1);
        let err = CheckError::lexer_error("unexpected character", pos);

        assert_eq!(err.kind(), "Lexer Error");
        assert_eq!(err.message(), "unexpected character");
        assert_eq!(err.position(), Some(pos));
    }

    #[test]
    fn test_error_display() {
        let err = CheckError::parse_error("expected ';'", SourcePosition::new(5, 10));
        assert_eq!(err.to_string(), "Parse Error: expected ';' at 5:10");

        let err = CheckError::InvalidFix {
            span: SourceSpan::new(4, 9),
            len: 6,
        };
        assert_eq!(err.position(), None);
        assert_eq!(
            err.to_string(),
            "Fix Error: span 4..9 does not fit a source of 6 bytes"
        );
    }
}
