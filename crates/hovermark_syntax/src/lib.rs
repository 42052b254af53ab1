//! Syntax frontend for Dart snippets: lexer, concrete syntax tree, parser, diagnostics.
//!
//! This crate is dependency-light and knows nothing about scopes or types; the `hovermark` crate builds its symbol
//! model and hovers on top of the tree produced here.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution or type inference.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `hovermark_core::lang` registries.
//! - Nothing here fails as a whole: lexing yields error tokens and parsing yields a partial tree plus errors.
//!
//! ## Examples
//! ```rust
//! use hovermark_syntax::{lexer, parser};
//!
//! let tokens = lexer::tokenize("final answer = 42;");
//! let outcome = parser::parse(&tokens);
//! assert!(outcome.is_clean());
//! assert_eq!(outcome.unit.declarations.len(), 1);
//! ```
//!
//! ## See also
//! - `hovermark_core::lang` for registry-backed language vocabulary (keywords/operators/punctuation).

pub mod cst;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
