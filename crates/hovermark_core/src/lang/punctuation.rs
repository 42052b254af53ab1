//! Punctuation vocabulary.
//!
//! This module defines the non-operator punctuation used by the lexer/parser: delimiters, separators, member
//! access markers (including the null-aware and cascade forms), spreads and a few structural markers.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`PUNCTUATION`] is ordered exactly like [`PunctuationId`].
//!
//! ## Examples
//! ```rust
//! use hovermark_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("?.."), Some(PunctuationId::NullCascade));
//! assert_eq!(punctuation::as_str(PunctuationId::FatArrow), "=>");
//! ```

use super::registry::{DART_1, DART_2_3, DART_2_12, Since, Stability};

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,`, `;` and `:`.
    Separator,
    /// Member access markers like `.`, `?.` and the cascades.
    Access,
    /// Spread markers inside collection literals.
    Spread,
    /// Misc markers like `?`, `@`, `#`, `=>`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Separators
    Comma,
    Semicolon,
    Colon,

    // Access
    Dot,
    QuestionDot,
    Cascade,
    NullCascade,

    // Spreads
    Spread,
    NullSpread,

    // Markers
    FatArrow,
    At,
    Hash,
    Question,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all punctuation tokens, in [`PunctuationId`] order.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter, DART_1),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator, DART_1),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator, DART_1),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator, DART_1),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access, DART_1),
    info(PunctuationId::QuestionDot, "?.", PunctuationCategory::Access, DART_1),
    info(PunctuationId::Cascade, "..", PunctuationCategory::Access, DART_1),
    info(PunctuationId::NullCascade, "?..", PunctuationCategory::Access, DART_2_12),
    info(PunctuationId::Spread, "...", PunctuationCategory::Spread, DART_2_3),
    info(PunctuationId::NullSpread, "...?", PunctuationCategory::Spread, DART_2_3),
    info(PunctuationId::FatArrow, "=>", PunctuationCategory::Marker, DART_1),
    info(PunctuationId::At, "@", PunctuationCategory::Marker, DART_1),
    info(PunctuationId::Hash, "#", PunctuationCategory::Marker, DART_1),
    info(PunctuationId::Question, "?", PunctuationCategory::Marker, DART_1),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Full metadata.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    &PUNCTUATION[id as usize]
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// All spellings, longest first, for maximal-munch scanning.
pub fn lexable_spellings() -> Vec<(&'static str, PunctuationId)> {
    let mut spellings: Vec<_> = PUNCTUATION.iter().map(|p| (p.canonical, p.id)).collect();
    spellings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    spellings
}

// --- helpers -----------------------------------------------------------------

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory, since: Since) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        since,
        stability: Stability::Stable,
    }
}
