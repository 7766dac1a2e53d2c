//! Semantic analysis module
//!
//! This module resolves names against lexical scopes and reports what
//! does not resolve, what resolves too early and what is never used.

pub mod analyzer;
pub mod globals;
pub mod scope;
pub mod suggest;

pub use analyzer::{analyze, Analyzer};
pub use scope::{Declaration, DeclarationKind};
