//! Token types for the Dart snippet lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved, built-in and contextual words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Every token keeps its exact source text and byte range; trivia (whitespace, comments) is tokenized too.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::cst::Span;
use hovermark_core::lang::keywords::{self, KeywordId};
use hovermark_core::lang::operators::OperatorId;
use hovermark_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    /// `/// ...`
    DocLine,
    /// `/** ... */`
    DocBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedChar,
    UnterminatedString,
    UnterminatedComment,
}

impl LexErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            LexErrorKind::UnexpectedChar => "unexpected character",
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
        }
    }
}

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident,
    Number,
    String,

    // ========== Trivia ==========
    Comment(CommentKind),
    Whitespace,

    // ========== Special ==========
    Error(LexErrorKind),
    Eof,
}

/// One `$name` or `${expr}` site inside a string literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    /// Range of the embedded expression (without `$`, `{` and `}`).
    pub span: Span,
    /// Tokens of the embedded expression, terminated by `Eof`. Spans are absolute.
    pub tokens: Vec<Token>,
}

/// A token with its kind, text and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
    /// Non-empty only for string tokens.
    pub interpolations: Vec<Interpolation>,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
            column,
            interpolations: Vec::new(),
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if it is one.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
