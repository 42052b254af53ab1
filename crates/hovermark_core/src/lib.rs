//! Provide the pure, shared vocabulary for hovermark: Dart keywords, operators, punctuation and the
//! core-library type tables that seed every analysis.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no syntax-tree types.
//! - The lexer, parser and symbol collector all read these tables so spellings never drift between stages.

pub mod lang;
