//! Snapshot tests for rendered hover signatures
//!
//! Each test analyzes a small snippet and snapshots the signature shown for one name, so changes to rendering or
//! inference show up as reviewable diffs.
//!
//! Run with: `cargo test --test signature_snapshots`
//! Review changes: `cargo insta review`

use hovermark::analyze;

/// The signature (without the code fence) hovered at the `nth` occurrence of `needle`.
fn signature(source: &str, needle: &str, nth: usize) -> String {
    let start = source
        .match_indices(needle)
        .nth(nth)
        .unwrap_or_else(|| panic!("`{needle}` #{nth} not in source"))
        .0;
    let hover = analyze(source, &[])
        .into_iter()
        .find(|h| h.range.start == start && h.range.end == start + needle.len())
        .unwrap_or_else(|| panic!("no hover for `{needle}` #{nth}"));
    hover
        .markdown
        .trim_start_matches("```dart\n")
        .trim_end_matches("\n```")
        .to_string()
}

#[test]
fn test_generic_method_on_list() {
    let source = "final xs = [1, 2];\nfinal ys = xs.map((x) => '$x');";
    insta::assert_snapshot!(
        signature(source, "map", 0),
        @"Iterable<String> map<String>(String Function(int e) toElement)"
    );
}

#[test]
fn test_non_generic_method_on_list() {
    let source = "final xs = [1, 2];\nfinal ys = xs.where((x) => x > 1);";
    insta::assert_snapshot!(signature(source, "where", 0), @"Iterable<int> where(bool Function(int element) test)");
}

#[test]
fn test_parameter_groups() {
    let source = "String greet(String name, [int times = 1], {required bool loud, String? suffix}) => name;";
    insta::assert_snapshot!(
        signature(source, "greet", 0),
        @"String greet(String name, [int times = 1], {required bool loud, String? suffix})"
    );
}

#[test]
fn test_accessors() {
    let source = "class Temp {\n  double _c = 0;\n  double get celsius => _c;\n  set celsius(double value) {}\n}";
    insta::assert_snapshot!(signature(source, "celsius", 0), @"double get celsius");
    insta::assert_snapshot!(signature(source, "celsius", 1), @"set celsius(double value)");
}

#[test]
fn test_class_header() {
    let source = "abstract class Shape implements Comparable<Shape> {}\nclass Square extends Shape {}";
    insta::assert_snapshot!(signature(source, "Shape", 0), @"abstract class Shape implements Comparable<Shape>");
    insta::assert_snapshot!(signature(source, "Square", 0), @"class Square extends Shape");
}

#[test]
fn test_generic_function_with_explicit_arguments() {
    let source = "T first<T>(List<T> items) => items.first;\nfinal f = first<num>([1, 2]);";
    insta::assert_snapshot!(signature(source, "first", 2), @"num first<num>(List<num> items)");
}
