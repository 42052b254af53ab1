//! Dart vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved and built-in keywords,
//! operators (with precedence), punctuation, and the core library (`dart:core` / `dart:async` subset).
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via
//! registry tables instead of comparing strings across the codebase.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no CST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries only provide spellings and metadata.
//!
//! ## Examples
//! ```rust
//! use hovermark_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("class"), Some(KeywordId::Class));
//! assert_eq!(keywords::as_str(KeywordId::Class), "class");
//! ```

pub mod keywords;
pub mod library;
pub mod operators;
pub mod punctuation;
pub mod registry;
