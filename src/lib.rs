//! # scopecheck
//!
//! A scope analyzer for JavaScript-style scripts. It reports:
//! - references to names that are declared nowhere and are not host globals
//! - `let`/`const`/parameter bindings used on a line before their declaration
//! - declarations nothing references, with a fix that removes them
//!
//! ## Architecture
//!
//! The implementation is organized into several modules:
//! - `lexer`: Tokenization of source code
//! - `parser`: Parsing tokens into an Abstract Syntax Tree (AST)
//! - `semantic`: Scope analysis producing diagnostics
//! - `error`: Error handling, diagnostics and their rendering
//! - `config`: Command-line configuration
//! - `async_runtime`: Parallel checking of many files (`async-runtime` feature)

pub mod async_runtime;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

// Re-export commonly used types
pub use error::{CheckError, CheckResult, Diagnostic, Fix, Severity, SourceLocation, SourcePosition, SourceSpan};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Parser, Program};
pub use semantic::analyze;

/// Version of scopecheck
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check a script from source code
///
/// A source that fails to lex or parse yields exactly one `syntax`
/// diagnostic at the failure position; otherwise the program is analyzed.
pub fn lint(source: &str) -> Vec<Diagnostic> {
    match parser::parse(source) {
        Ok(program) => analyze(&program),
        Err(err) => {
            debug!(error = %err, "parse failed");
            vec![Diagnostic::syntax(&err)]
        }
    }
}

/// Read and check a file
///
/// Only failing to read the file is an error.
pub fn lint_file(path: impl AsRef<Path>) -> CheckResult<Report> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| CheckError::io_error(path, err))?;
    debug!(path = %path.display(), bytes = source.len(), "checking file");
    Ok(Report::new(path.display().to_string(), source))
}

/// Diagnostics for one input together with the text they point into
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    #[serde(skip)]
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Check `source` and keep it for rendering
    pub fn new(name: impl Into<String>, source: String) -> Self {
        let diagnostics = lint(&source);
        Self {
            name: name.into(),
            source,
            diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}
