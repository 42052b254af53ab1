//! Parser for Dart snippets
//!
//! Converts a token stream into a [`CompilationUnit`]. The parser is a backtracking recursive-descent parser with
//! precedence climbing for binary operators. It works over the significant tokens only (trivia is skipped, but kept
//! reachable for doc comments and exact source slices).
//!
//! ## Examples
//!
//! ```rust
//! use hovermark_syntax::{lexer, parser};
//!
//! let tokens = lexer::tokenize("class Point { final int x; }");
//! let outcome = parser::parse(&tokens);
//! assert!(outcome.errors.is_empty());
//! assert_eq!(outcome.unit.declarations.len(), 1);
//! ```

use crate::cst::*;
use crate::diagnostics::SyntaxError;
use crate::lexer::{CommentKind, Interpolation, LexErrorKind, Token, TokenKind};
use hovermark_core::lang::keywords::KeywordId;
use hovermark_core::lang::operators::{self, OperatorId};
use hovermark_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
