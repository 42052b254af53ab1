//! Shareable metadata for `hovermark_core::lang` registries.
//!
//! The vocabularies in [`crate::lang`] all carry the same small provenance fields. These types are `Copy` so the
//! registries can live in `const` tables.
//!
//! ## See also
//! - [`crate::lang::keywords`]
//! - [`crate::lang::operators`]
//! - [`crate::lang::punctuation`]

/// Dart language version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use hovermark_core::lang::registry::Since;
///
/// assert!(Since(3, 0) > Since(2, 12));
/// assert_eq!(Since(3, 0).to_string(), "3.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u8, pub u8);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Dart 1.0: the original grammar.
pub const DART_1: Since = Since(1, 0);
/// Dart 2.0: sound types and optional `new`/`const`.
pub const DART_2: Since = Since(2, 0);
/// Dart 2.3: collection `if`/`for` and spreads.
pub const DART_2_3: Since = Since(2, 3);
/// Dart 2.6: extension methods.
pub const DART_2_6: Since = Since(2, 6);
/// Dart 2.12: null safety (`late`, `required`, `?.`-family and `!`).
pub const DART_2_12: Since = Since(2, 12);
/// Dart 3.0: records, patterns and class modifiers.
pub const DART_3: Since = Since(3, 0);

/// Describe the lifecycle status of a vocabulary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}

/// A small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use hovermark_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "final xs = <int>[1, 2];",
///     note: Some("Typed list literal."),
/// };
/// assert!(ex.code.contains("<int>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
