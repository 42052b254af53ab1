#![forbid(unsafe_code)]
//! Hovermark: static hover analysis for Dart documentation snippets
//!
//! Given a snippet of Dart source, hovermark tokenizes it, parses it into a concrete syntax tree, builds a scope
//! model and produces one hover record (range, signature, documentation) per resolvable identifier, type
//! reference, member access, call and literal. There is no runtime, file system or network behavior in the
//! library.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Analysis**: [`analyze`] is total. Malformed input is recorded as syntax errors and skipped, never panicked
//!   on.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod custom_types;
pub mod frontend;

pub use frontend::cst;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::symbols;

pub use analysis::{Analysis, analyze, analyze_with_config, analyze_with_diagnostics};
pub use config::HoverConfig;
pub use custom_types::CustomTypeDecl;
pub use frontend::hover::{Hover, HoverRange};
