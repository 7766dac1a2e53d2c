//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST).

pub mod ast;
pub mod parser;

pub use ast::{Expr, Identifier, Pattern, Program, Stmt};
pub use parser::Parser;

use crate::error::CheckResult;
use crate::lexer::Lexer;

/// Lex and parse `source` into a program
pub fn parse(source: &str) -> CheckResult<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse()
}
