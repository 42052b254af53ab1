//! Define the keyword vocabulary for Dart snippets.
//!
//! This module is the single source of truth for keyword spellings: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) recording canonical spellings, categories and provenance.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Dart distinguishes *reserved* words from *built-in* and *contextual* identifiers. Only reserved words are
//!   forbidden as identifiers; the parser accepts the other two categories wherever a name is expected (see
//!   [`KeywordCategory::usable_as_identifier`]).
//! - `dynamic` and `Function` are deliberately absent: they are ordinary type names to the lexer.
//! - [`KEYWORDS`] is ordered exactly like [`KeywordId`]; [`info_for`] relies on that.
//!
//! ## Examples
//! ```rust
//! use hovermark_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("extends"), Some(KeywordId::Extends));
//! assert_eq!(keywords::category(KeywordId::Get), KeywordCategory::BuiltIn);
//! assert!(keywords::from_str("dynamic").is_none());
//! ```
//!
//! ## See also
//! - [`crate::lang::operators`] for `as`/`is` precedence.

use super::registry::{DART_1, DART_2, DART_2_6, DART_2_12, DART_3, Since, Stability};

/// Stable identifier for every keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Reserved words
    Assert,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Else,
    Enum,
    Extends,
    False,
    Final,
    Finally,
    For,
    If,
    In,
    Is,
    New,
    Null,
    Rethrow,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Var,
    Void,
    While,
    With,

    // Built-in identifiers
    Abstract,
    As,
    Covariant,
    Deferred,
    Export,
    Extension,
    External,
    Factory,
    Get,
    Implements,
    Import,
    Interface,
    Late,
    Library,
    Mixin,
    Operator,
    Part,
    Required,
    Set,
    Static,
    Typedef,

    // Contextual keywords
    Async,
    Await,
    Base,
    Hide,
    Of,
    On,
    Sealed,
    Show,
    Sync,
    When,
    Yield,
}

/// Grammatical category of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Never usable as an identifier.
    Reserved,
    /// Usable as an identifier, but not as a type name.
    BuiltIn,
    /// Only meaningful in specific positions; otherwise an ordinary identifier.
    Contextual,
}

impl KeywordCategory {
    /// Return `true` if words of this category may name variables, members and parameters.
    pub fn usable_as_identifier(self) -> bool {
        !matches!(self, KeywordCategory::Reserved)
    }
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all keywords, in [`KeywordId`] order.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Reserved words
    info(
        KeywordId::Assert,
        "assert",
        KeywordCategory::Reserved,
        DART_1,
        "Debug-mode assertion statement or initializer.",
    ),
    info(KeywordId::Break, "break", KeywordCategory::Reserved, DART_1, "Exit the innermost loop or switch."),
    info(KeywordId::Case, "case", KeywordCategory::Reserved, DART_1, "Introduce a switch case."),
    info(KeywordId::Catch, "catch", KeywordCategory::Reserved, DART_1, "Bind a thrown exception in a `try` statement."),
    info(KeywordId::Class, "class", KeywordCategory::Reserved, DART_1, "Declare a class."),
    info(
        KeywordId::Const,
        "const",
        KeywordCategory::Reserved,
        DART_1,
        "Compile-time constant variable, constructor or literal.",
    ),
    info(KeywordId::Continue, "continue", KeywordCategory::Reserved, DART_1, "Skip to the next loop iteration."),
    info(KeywordId::Default, "default", KeywordCategory::Reserved, DART_1, "Fallback switch case."),
    info(KeywordId::Do, "do", KeywordCategory::Reserved, DART_1, "Start a `do`/`while` loop."),
    info(KeywordId::Else, "else", KeywordCategory::Reserved, DART_1, "Alternative branch of `if`."),
    info(KeywordId::Enum, "enum", KeywordCategory::Reserved, DART_1, "Declare an enumeration."),
    info(
        KeywordId::Extends,
        "extends",
        KeywordCategory::Reserved,
        DART_1,
        "Superclass clause or type-parameter bound.",
    ),
    info(KeywordId::False, "false", KeywordCategory::Reserved, DART_1, "Boolean literal."),
    info(
        KeywordId::Final,
        "final",
        KeywordCategory::Reserved,
        DART_1,
        "Single-assignment variable, or a class modifier.",
    ),
    info(KeywordId::Finally, "finally", KeywordCategory::Reserved, DART_1, "Cleanup clause of a `try` statement."),
    info(KeywordId::For, "for", KeywordCategory::Reserved, DART_1, "Loop statement or collection element."),
    info(KeywordId::If, "if", KeywordCategory::Reserved, DART_1, "Conditional statement or collection element."),
    info(KeywordId::In, "in", KeywordCategory::Reserved, DART_1, "Iterable separator in `for`-`in` loops."),
    info(KeywordId::Is, "is", KeywordCategory::Reserved, DART_1, "Runtime type test."),
    info(KeywordId::New, "new", KeywordCategory::Reserved, DART_1, "Optional instance-creation keyword."),
    info(KeywordId::Null, "null", KeywordCategory::Reserved, DART_1, "The null literal."),
    info(
        KeywordId::Rethrow,
        "rethrow",
        KeywordCategory::Reserved,
        DART_1,
        "Rethrow the exception bound by the enclosing `catch`.",
    ),
    info(KeywordId::Return, "return", KeywordCategory::Reserved, DART_1, "Return from the enclosing function."),
    info(
        KeywordId::Super,
        "super",
        KeywordCategory::Reserved,
        DART_1,
        "Superclass receiver or super-parameter prefix.",
    ),
    info(KeywordId::Switch, "switch", KeywordCategory::Reserved, DART_1, "Multi-way branch statement."),
    info(
        KeywordId::This,
        "this",
        KeywordCategory::Reserved,
        DART_1,
        "Current instance receiver or field-parameter prefix.",
    ),
    info(KeywordId::Throw, "throw", KeywordCategory::Reserved, DART_1, "Throw an exception."),
    info(KeywordId::True, "true", KeywordCategory::Reserved, DART_1, "Boolean literal."),
    info(KeywordId::Try, "try", KeywordCategory::Reserved, DART_1, "Start a guarded block."),
    info(KeywordId::Var, "var", KeywordCategory::Reserved, DART_1, "Inferred variable declaration."),
    info(KeywordId::Void, "void", KeywordCategory::Reserved, DART_1, "The empty return type."),
    info(KeywordId::While, "while", KeywordCategory::Reserved, DART_1, "Loop while a condition holds."),
    info(KeywordId::With, "with", KeywordCategory::Reserved, DART_1, "Mixin application clause."),
    // Built-in identifiers
    info(
        KeywordId::Abstract,
        "abstract",
        KeywordCategory::BuiltIn,
        DART_1,
        "Class or member without an implementation.",
    ),
    info(KeywordId::As, "as", KeywordCategory::BuiltIn, DART_1, "Type cast, or an import prefix."),
    info(
        KeywordId::Covariant,
        "covariant",
        KeywordCategory::BuiltIn,
        DART_2,
        "Parameter that may be tightened in overrides.",
    ),
    info(KeywordId::Deferred, "deferred", KeywordCategory::BuiltIn, DART_1, "Lazily loaded import."),
    info(KeywordId::Export, "export", KeywordCategory::BuiltIn, DART_1, "Re-export a library."),
    info(
        KeywordId::Extension,
        "extension",
        KeywordCategory::BuiltIn,
        DART_2_6,
        "Declare extension members on an existing type.",
    ),
    info(KeywordId::External, "external", KeywordCategory::BuiltIn, DART_1, "Declaration implemented outside Dart."),
    info(
        KeywordId::Factory,
        "factory",
        KeywordCategory::BuiltIn,
        DART_1,
        "Constructor that may return an existing instance.",
    ),
    info(KeywordId::Get, "get", KeywordCategory::BuiltIn, DART_1, "Getter declaration."),
    info(KeywordId::Implements, "implements", KeywordCategory::BuiltIn, DART_1, "Interface clause."),
    info(KeywordId::Import, "import", KeywordCategory::BuiltIn, DART_1, "Import a library."),
    info(KeywordId::Interface, "interface", KeywordCategory::BuiltIn, DART_3, "Class modifier restricting extension."),
    info(KeywordId::Late, "late", KeywordCategory::BuiltIn, DART_2_12, "Lazily initialized non-nullable variable."),
    info(KeywordId::Library, "library", KeywordCategory::BuiltIn, DART_1, "Library directive."),
    info(KeywordId::Mixin, "mixin", KeywordCategory::BuiltIn, DART_2, "Declare a mixin."),
    info(KeywordId::Operator, "operator", KeywordCategory::BuiltIn, DART_1, "User-defined operator member."),
    info(KeywordId::Part, "part", KeywordCategory::BuiltIn, DART_1, "Part directive."),
    info(KeywordId::Required, "required", KeywordCategory::BuiltIn, DART_2_12, "Required named parameter."),
    info(KeywordId::Set, "set", KeywordCategory::BuiltIn, DART_1, "Setter declaration."),
    info(KeywordId::Static, "static", KeywordCategory::BuiltIn, DART_1, "Class-level member."),
    info(KeywordId::Typedef, "typedef", KeywordCategory::BuiltIn, DART_1, "Declare a type alias."),
    // Contextual keywords
    info(KeywordId::Async, "async", KeywordCategory::Contextual, DART_1, "Asynchronous function body marker."),
    info(KeywordId::Await, "await", KeywordCategory::Contextual, DART_1, "Wait for a future inside an async body."),
    info(
        KeywordId::Base,
        "base",
        KeywordCategory::Contextual,
        DART_3,
        "Class modifier requiring implementation inheritance.",
    ),
    info(KeywordId::Hide, "hide", KeywordCategory::Contextual, DART_1, "Import combinator hiding names."),
    info(KeywordId::Of, "of", KeywordCategory::Contextual, DART_1, "`part of` directive."),
    info(
        KeywordId::On,
        "on",
        KeywordCategory::Contextual,
        DART_1,
        "Exception type of a catch clause, or a mixin/extension target.",
    ),
    info(
        KeywordId::Sealed,
        "sealed",
        KeywordCategory::Contextual,
        DART_3,
        "Class modifier enabling exhaustiveness checks.",
    ),
    info(KeywordId::Show, "show", KeywordCategory::Contextual, DART_1, "Import combinator showing names."),
    info(KeywordId::Sync, "sync", KeywordCategory::Contextual, DART_1, "Synchronous generator body marker."),
    info(KeywordId::When, "when", KeywordCategory::Contextual, DART_3, "Guard clause of a switch case."),
    info(KeywordId::Yield, "yield", KeywordCategory::Contextual, DART_1, "Emit a value from a generator."),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Returns
/// - The associated [`KeywordInfo`] from [`KEYWORDS`].
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Parameters
/// - `s`: Candidate keyword spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    since: Since,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        description,
        since,
        stability: Stability::Stable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_identifiers_are_usable_as_names() {
        assert!(category(KeywordId::Get).usable_as_identifier());
        assert!(category(KeywordId::On).usable_as_identifier());
        assert!(!category(KeywordId::Class).usable_as_identifier());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("Class"), None);
        assert_eq!(from_str("class"), Some(KeywordId::Class));
    }
}
