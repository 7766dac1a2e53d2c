//! Diagnostic records and their terminal rendering
//!
//! A `Diagnostic` is the only thing the analyzer produces. This module also
//! knows how to print one with source context and how to apply its fix.

use std::fmt;

use colored::Colorize;
use serde::Serialize;

use super::{CheckError, CheckResult, SourcePosition, SourceSpan};

/// Rule id for names that resolve nowhere
pub const RULE_UNDEFINED: &str = "no-undef";
/// Rule id for temporal-dead-zone violations
pub const RULE_TDZ: &str = "no-use-before-define";
/// Rule id for declarations that are never referenced
pub const RULE_UNUSED: &str = "no-unused-vars";
/// Rule id for the synthetic diagnostic that replaces a failed parse
pub const RULE_SYNTAX: &str = "syntax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    Remove,
}

/// A machine-applicable edit attached to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fix {
    pub kind: FixKind,
    pub span: SourceSpan,
}

impl Fix {
    pub fn remove(span: SourceSpan) -> Self {
        Self {
            kind: FixKind::Remove,
            span,
        }
    }

    /// Apply this fix to `source`, returning the edited text.
    ///
    /// Offsets are only valid against the text the diagnostic was computed
    /// from; re-lint before applying another fix.
    pub fn apply(&self, source: &str) -> CheckResult<String> {
        let SourceSpan {
            start_offset,
            end_offset,
        } = self.span;

        let fits = start_offset <= end_offset
            && end_offset <= source.len()
            && source.is_char_boundary(start_offset)
            && source.is_char_boundary(end_offset);
        if !fits {
            return Err(CheckError::InvalidFix {
                span: self.span,
                len: source.len(),
            });
        }

        match self.kind {
            FixKind::Remove => {
                let mut edited = String::with_capacity(source.len() - self.span.len());
                edited.push_str(&source[..start_offset]);
                edited.push_str(&source[end_offset..]);
                Ok(edited)
            }
        }
    }
}

/// A single finding reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub message: String,
    pub position: SourcePosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_position: Option<SourcePosition>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic
    pub fn error(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            message: message.into(),
            position,
            end_position: None,
            severity: Severity::Error,
            rule_id: None,
            fix: None,
        }
    }

    /// Create a warning-severity diagnostic
    pub fn warning(message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message, position)
        }
    }

    /// The synthetic diagnostic that stands in for a failed parse
    pub fn syntax(error: &CheckError) -> Self {
        Self::error(error.message(), error.position().unwrap_or_default()).with_rule(RULE_SYNTAX)
    }

    pub fn with_rule(mut self, rule_id: &str) -> Self {
        self.rule_id = Some(rule_id.to_string());
        self
    }

    pub fn with_end(mut self, end: SourcePosition) -> Self {
        self.end_position = Some(end);
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the diagnostic with color and the surrounding source lines
    pub fn render(&self, source: &str, filename: Option<&str>) -> String {
        let mut output = String::new();

        let label = match &self.rule_id {
            Some(rule) => format!("{}[{}]", self.severity, rule),
            None => self.severity.to_string(),
        };
        let label = match self.severity {
            Severity::Error => label.red().bold(),
            Severity::Warning => label.yellow().bold(),
        };
        output.push_str(&format!("{}: {}\n", label, self.message.bold()));

        let location = match filename {
            Some(name) => format!("{}:{}", name, self.position),
            None => self.position.to_string(),
        };
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));
        output.push_str(&self.format_source_context(source));

        output
    }

    /// Format source code context around the diagnostic position
    fn format_source_context(&self, source: &str) -> String {
        let mut output = String::new();
        let lines = source_lines(source);
        let position = self.position;

        if position.line == 0 || position.line > lines.len() {
            return output;
        }

        let line_idx = position.line - 1;
        let line_num_width = (position.line + 1).to_string().len();

        if line_idx > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx, width = line_num_width).blue(),
                lines[line_idx - 1]
            ));
        }

        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", position.line, width = line_num_width)
                .blue()
                .bold(),
            lines[line_idx]
        ));

        // Underline up to the end position when it sits on the same line
        let width = match self.end_position {
            Some(end) if end.line == position.line && end.column > position.column => {
                end.column - position.column
            }
            _ => 1,
        };
        let indicator_padding = " ".repeat(line_num_width + 3 + position.column.saturating_sub(1));
        let marker = "^".repeat(width);
        let marker = match self.severity {
            Severity::Error => marker.red().bold(),
            Severity::Warning => marker.yellow().bold(),
        };
        output.push_str(&format!("{}{}\n", indicator_padding, marker));

        if line_idx + 1 < lines.len() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx + 2, width = line_num_width).blue(),
                lines[line_idx + 1]
            ));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.message)
    }
}

/// Split `source` at the same line terminators the lexer counts
fn source_lines(source: &str) -> Vec<&str> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            continue;
        }
        lines.push(&source[start..index]);
        start = index + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            start += 1;
        }
    }
    if start < source.len() {
        lines.push(&source[start..]);
    }

    lines
}
