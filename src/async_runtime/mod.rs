//! Async runtime module
//!
//! This module checks many files concurrently. It is only built with the
//! `async-runtime` feature; without it the CLI checks files one by one.

#[cfg(feature = "async-runtime")]
pub mod executor;

#[cfg(feature = "async-runtime")]
pub use executor::lint_files;
