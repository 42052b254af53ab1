//! Hovermark analysis frontend
//!
//! This module contains the semantic half of the pipeline:
//! - `collector`: CST to scope tree and semantic nodes
//! - `symbols`: scope tree and node storage
//! - `builtins`: the core library seeded into the file scope
//! - `resolver`: expression types, member lookup and generic substitution
//! - `render`: hover signatures
//! - `hover`: the document-order hover walk
//! - `type_text`: helpers over rendered type text

// Syntax components are provided by the shared hovermark_syntax crate.
pub use hovermark_syntax::{cst, diagnostics, lexer, parser};

pub mod builtins;
pub mod collector;
pub mod hover;
pub mod render;
pub mod resolver;
pub mod symbols;
pub mod type_text;
