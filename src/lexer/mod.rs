//! Lexical analysis module
//!
//! This module handles tokenization of script source code.

pub mod token;
pub mod scanner;

pub use token::{Token, TokenType, Keyword, Literal, TemplateToken};
pub use scanner::Lexer;
