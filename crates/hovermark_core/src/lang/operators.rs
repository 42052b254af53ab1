//! Operator vocabulary.
//!
//! This module defines Dart's operator set along with its precedence table, associativity and fixity. The parser's
//! precedence climbing reads [`OperatorInfo::precedence`] directly, so this table *is* the expression grammar's
//! operator ordering.
//!
//! ## Notes
//! - Higher precedence binds tighter. Assignment is lowest (1), postfix is highest (15).
//! - The conditional `?:` and the type tests `as`/`is` are not token operators here (they are punctuation and
//!   keywords), but they take part in the same scale via [`CONDITIONAL_PRECEDENCE`] and [`TYPE_TEST_PRECEDENCE`].
//! - Operators spelled with a leading `<` or `>` and more than one character are **composite**: the lexer always
//!   emits `<` and `>` as single tokens, and the parser reassembles composites from adjacent tokens once it knows it
//!   is not looking at a type-argument list.
//!
//! ## Examples
//! ```rust
//! use hovermark_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("??"), Some(OperatorId::IfNull));
//! assert_eq!(operators::info_for(OperatorId::Star).precedence, 13);
//! assert!(operators::info_for(OperatorId::ShrEq).composite);
//! ```

use super::registry::{DART_1, DART_2_12, Since, Stability};

/// Precedence of `?:`.
pub const CONDITIONAL_PRECEDENCE: u8 = 2;
/// Precedence shared by relational operators and the `as` / `is` type tests.
pub const TYPE_TEST_PRECEDENCE: u8 = 7;
/// Precedence of prefix operators (`-x`, `!x`, `~x`, `++x`, `await x`).
pub const PREFIX_PRECEDENCE: u8 = 14;
/// Precedence of postfix operators and selectors (`x++`, `x!`, `x.y`, `x()`).
pub const POSTFIX_PRECEDENCE: u8 = 15;

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    /// Chaining is a syntax error (`a == b == c`, `a < b < c`).
    None,
}

/// Position an operator may take relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
    Assignment,
}

/// Stable identifier for every operator. [`OPERATORS`] follows this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Assignment
    Eq,
    StarEq,
    SlashEq,
    TildeSlashEq,
    PercentEq,
    PlusEq,
    MinusEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AmpEq,
    CaretEq,
    PipeEq,
    IfNullEq,

    // Logical
    IfNull,
    OrOr,
    AndAnd,

    // Equality / relational
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Bitwise
    Pipe,
    Caret,
    Amp,
    Shl,
    Shr,
    UShr,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    TildeSlash,
    Percent,

    // Unary
    Bang,
    Tilde,
    PlusPlus,
    MinusMinus,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: &'static [Fixity],
    /// Assembled by the parser from adjacent `<`/`>` tokens rather than lexed.
    pub composite: bool,
    pub since: Since,
    pub stability: Stability,
}

const INFIX: &[Fixity] = &[Fixity::Infix];
const ASSIGN: &[Fixity] = &[Fixity::Assignment];
const PREFIX: &[Fixity] = &[Fixity::Prefix];
const INFIX_OR_PREFIX: &[Fixity] = &[Fixity::Infix, Fixity::Prefix];
const AFFIX: &[Fixity] = &[Fixity::Prefix, Fixity::Postfix];

/// Registry of all operators, in [`OperatorId`] order.
pub const OPERATORS: &[OperatorInfo] = &[
    // Assignment
    op(OperatorId::Eq, "=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::StarEq, "*=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::SlashEq, "/=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::TildeSlashEq, "~/=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::PercentEq, "%=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::PlusEq, "+=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::MinusEq, "-=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::ShlEq, "<<=", 1, Associativity::Right, ASSIGN, true),
    op(OperatorId::ShrEq, ">>=", 1, Associativity::Right, ASSIGN, true),
    op(OperatorId::UShrEq, ">>>=", 1, Associativity::Right, ASSIGN, true),
    op(OperatorId::AmpEq, "&=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::CaretEq, "^=", 1, Associativity::Right, ASSIGN, false),
    op(OperatorId::PipeEq, "|=", 1, Associativity::Right, ASSIGN, false),
    since(
        op(OperatorId::IfNullEq, "??=", 1, Associativity::Right, ASSIGN, false),
        DART_2_12,
    ),
    // Logical
    op(OperatorId::IfNull, "??", 3, Associativity::Left, INFIX, false),
    op(OperatorId::OrOr, "||", 4, Associativity::Left, INFIX, false),
    op(OperatorId::AndAnd, "&&", 5, Associativity::Left, INFIX, false),
    // Equality / relational
    op(OperatorId::EqEq, "==", 6, Associativity::None, INFIX, false),
    op(OperatorId::NotEq, "!=", 6, Associativity::None, INFIX, false),
    op(OperatorId::Lt, "<", 7, Associativity::None, INFIX, false),
    op(OperatorId::LtEq, "<=", 7, Associativity::None, INFIX, true),
    op(OperatorId::Gt, ">", 7, Associativity::None, INFIX, false),
    op(OperatorId::GtEq, ">=", 7, Associativity::None, INFIX, true),
    // Bitwise
    op(OperatorId::Pipe, "|", 8, Associativity::Left, INFIX, false),
    op(OperatorId::Caret, "^", 9, Associativity::Left, INFIX, false),
    op(OperatorId::Amp, "&", 10, Associativity::Left, INFIX, false),
    op(OperatorId::Shl, "<<", 11, Associativity::Left, INFIX, true),
    op(OperatorId::Shr, ">>", 11, Associativity::Left, INFIX, true),
    op(OperatorId::UShr, ">>>", 11, Associativity::Left, INFIX, true),
    // Arithmetic
    op(OperatorId::Plus, "+", 12, Associativity::Left, INFIX, false),
    op(OperatorId::Minus, "-", 12, Associativity::Left, INFIX_OR_PREFIX, false),
    op(OperatorId::Star, "*", 13, Associativity::Left, INFIX, false),
    op(OperatorId::Slash, "/", 13, Associativity::Left, INFIX, false),
    op(OperatorId::TildeSlash, "~/", 13, Associativity::Left, INFIX, false),
    op(OperatorId::Percent, "%", 13, Associativity::Left, INFIX, false),
    // Unary
    op(OperatorId::Bang, "!", PREFIX_PRECEDENCE, Associativity::Right, AFFIX, false),
    op(OperatorId::Tilde, "~", PREFIX_PRECEDENCE, Associativity::Right, PREFIX, false),
    op(OperatorId::PlusPlus, "++", PREFIX_PRECEDENCE, Associativity::Right, AFFIX, false),
    op(OperatorId::MinusMinus, "--", PREFIX_PRECEDENCE, Associativity::Right, AFFIX, false),
];

/// Full metadata.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Resolve an operator spelling to its identifier.
///
/// ## Notes
/// - Composite spellings (`>=`, `>>`, ...) resolve too; it is only the lexer that never produces them.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Return `true` if `id` is one of the (compound) assignment operators.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).fixity.contains(&Fixity::Assignment)
}

/// Binding power of `id` used as an infix operator, or `None` if it is not infix.
pub fn infix_precedence(id: OperatorId) -> Option<u8> {
    let info = info_for(id);
    info.fixity.contains(&Fixity::Infix).then_some(info.precedence)
}

/// Return `true` if `id` may appear before its operand.
pub fn is_prefix(id: OperatorId) -> bool {
    info_for(id).fixity.contains(&Fixity::Prefix)
}

/// Return `true` if `id` may appear after its operand.
pub fn is_postfix(id: OperatorId) -> bool {
    info_for(id).fixity.contains(&Fixity::Postfix)
}

/// Spellings the lexer may emit as a single token (everything except composites), longest first.
///
/// ## Notes
/// - Longest-first ordering is what makes a first-match scan maximal munch (`??=` before `??` before `?`).
pub fn lexable_spellings() -> Vec<(&'static str, OperatorId)> {
    let mut spellings: Vec<_> = OPERATORS
        .iter()
        .filter(|o| !o.composite)
        .map(|o| (o.spelling, o.id))
        .collect();
    spellings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    spellings
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: &'static [Fixity],
    composite: bool,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        fixity,
        composite,
        since: DART_1,
        stability: Stability::Stable,
    }
}

const fn since(mut info: OperatorInfo, since: Since) -> OperatorInfo {
    info.since = since;
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites_start_with_angle_brackets() {
        for info in OPERATORS.iter().filter(|o| o.composite) {
            assert!(info.spelling.len() > 1);
            assert!(info.spelling.starts_with('<') || info.spelling.starts_with('>'));
        }
    }

    #[test]
    fn test_lexable_spellings_exclude_composites() {
        let spellings = lexable_spellings();
        assert!(spellings.iter().any(|(s, _)| *s == "<"));
        assert!(spellings.iter().all(|(s, _)| *s != ">>"));
        assert_eq!(spellings.first().map(|(s, _)| s.len()), Some(3));
    }

    #[test]
    fn test_minus_is_both_infix_and_prefix() {
        assert_eq!(infix_precedence(OperatorId::Minus), Some(12));
        assert!(is_prefix(OperatorId::Minus));
        assert!(!is_postfix(OperatorId::Minus));
        assert!(is_postfix(OperatorId::Bang));
    }
}
