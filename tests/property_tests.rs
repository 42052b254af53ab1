//! Property-based tests for the hover pipeline
//!
//! These tests use proptest to check the guarantees every `analyze` call makes, whatever the input: it returns,
//! it is deterministic, and its hovers are sorted, unique and inside the source.

use hovermark::{Hover, analyze, lexer};
use hovermark_core::lang::keywords;
use proptest::prelude::*;

/// Well-formed snippets that mutations start from.
const SEEDS: &[&str] = &[
    "final xs = [1, 2, 3];\nfinal ys = xs.map((x) => x * 2).where((x) => x > 2);",
    "class Box<T> {\n  Box(this.value);\n  final T value;\n  T get item => value;\n}\nfinal b = Box('a');",
    "enum Color { red, green }\nvoid main() {\n  for (final c in Color.values) {\n    print('${c.name}: ${c.index}');\n  }\n}",
    "typedef Pair = (int, {String label});\nPair make() => (1, label: 'x');\nfinal p = make().label;",
    "extension on String {\n  bool get shouty => this == toUpperCase();\n}\nfinal s = StringBuffer()..write('a')..write(1);",
    "T first<T>(List<T> items) => items.first;\nfinal m = {'a': 1};\nfinal f = first(<num>[1, 2.5]);",
];

fn check_invariants(source: &str, hovers: &[Hover]) -> Result<(), TestCaseError> {
    for hover in hovers {
        prop_assert!(hover.range.start < hover.range.end, "empty range {:?}", hover.range);
        prop_assert!(hover.range.end <= source.len(), "range {:?} past end", hover.range);
        prop_assert!(hover.markdown.starts_with("```dart\n"), "unfenced {:?}", hover.markdown);
    }
    for pair in hovers.windows(2) {
        prop_assert!(pair[0].range < pair[1].range, "{:?} before {:?}", pair[0].range, pair[1].range);
    }
    Ok(())
}

// =============================================================================
// Totality
// =============================================================================

#[cfg(test)]
mod totality {
    use super::*;

    #[test]
    fn handles_degenerate_input() {
        for source in ["", " ", "\n\n", "{", "}", "<", "'", "\"\"\"", "/*", "${", "class", "final", "(", "=>"] {
            let hovers = analyze(source, &[]);
            check_invariants(source, &hovers).unwrap();
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Property: arbitrary text never panics and yields well-formed hovers
        #[test]
        fn arbitrary_text_is_analyzed(source in "\\PC{0,200}") {
            let hovers = analyze(&source, &[]);
            check_invariants(&source, &hovers)?;
        }

        /// Property: Dart-flavored noise never panics
        #[test]
        fn dart_like_noise_is_analyzed(source in "[a-z<>(){}\\[\\];,.:=?!'\"$ \n]{0,120}") {
            let hovers = analyze(&source, &[]);
            check_invariants(&source, &hovers)?;
        }

        /// Property: truncating a valid snippet at any character keeps the pipeline total
        #[test]
        fn truncated_snippets_are_analyzed(seed in 0..SEEDS.len(), cut in any::<prop::sample::Index>()) {
            let full = SEEDS[seed];
            let boundaries: Vec<usize> = full.char_indices().map(|(i, _)| i).chain([full.len()]).collect();
            let source = &full[..boundaries[cut.index(boundaries.len())]];
            let hovers = analyze(source, &[]);
            check_invariants(source, &hovers)?;
        }

        /// Property: deleting one character from a valid snippet keeps the pipeline total
        #[test]
        fn mutated_snippets_are_analyzed(seed in 0..SEEDS.len(), at in any::<prop::sample::Index>()) {
            let full = SEEDS[seed];
            let chars: Vec<char> = full.chars().collect();
            let skip = at.index(chars.len());
            let source: String = chars.iter().enumerate().filter(|&(i, _)| i != skip).map(|(_, c)| c).collect();
            let hovers = analyze(&source, &[]);
            check_invariants(&source, &hovers)?;
        }
    }
}

// =============================================================================
// Determinism and lexing
// =============================================================================

#[cfg(test)]
mod stability {
    use super::*;

    #[test]
    fn seed_snippets_produce_hovers() {
        for seed in SEEDS {
            let hovers = analyze(seed, &[]);
            assert!(!hovers.is_empty(), "no hovers for {seed:?}");
            check_invariants(seed, &hovers).unwrap();
        }
    }

    fn ident_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9_]{0,8}".prop_filter("Not a keyword", |s| keywords::from_str(s).is_none())
    }

    proptest! {
        /// Property: the same input always yields the same hovers
        #[test]
        fn analysis_is_deterministic(seed in 0..SEEDS.len(), suffix in "[a-z =;0-9]{0,20}") {
            let source = format!("{}\n{}", SEEDS[seed], suffix);
            prop_assert_eq!(analyze(&source, &[]), analyze(&source, &[]));
        }

        /// Property: a declared variable hovers with its inferred type
        #[test]
        fn declared_variables_hover(name in ident_strategy(), value in 0u32..10_000) {
            let source = format!("final {name} = {value};");
            let hovers = analyze(&source, &[]);
            let start = "final ".len();
            let hover = hovers.iter().find(|h| h.range.start == start && h.range.end == start + name.len());
            prop_assert_eq!(hover.map(|h| h.markdown.clone()), Some(format!("```dart\nfinal int {name}\n```")));
        }

        /// Property: token spans tile the source in order
        #[test]
        fn token_spans_are_ordered(source in "\\PC{0,120}") {
            let tokens = lexer::tokenize(&source);
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].span.end <= pair[1].span.start);
            }
            for token in &tokens {
                prop_assert!(token.span.end <= source.len());
                prop_assert!(source.is_char_boundary(token.span.start) && source.is_char_boundary(token.span.end));
            }
        }
    }
}
