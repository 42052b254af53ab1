//! End-to-end hover behavior through the public `analyze` API.

use hovermark::cst::{Declaration, Expr};
use hovermark::{Hover, analyze, custom_types, parser};
use hovermark_core::lang::operators::OperatorId;

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Start offset of the `nth` whole-word occurrence of `word`.
fn word_offset(source: &str, word: &str, nth: usize) -> Option<usize> {
    source
        .match_indices(word)
        .map(|(start, _)| start)
        .filter(|&start| {
            let before = source[..start].chars().next_back();
            let after = source[start + word.len()..].chars().next();
            !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
        })
        .nth(nth)
}

/// The hover whose range is exactly the `nth` whole-word occurrence of `needle`.
fn hover_at<'h>(hovers: &'h [Hover], source: &str, needle: &str, nth: usize) -> Option<&'h Hover> {
    let start = word_offset(source, needle, nth)?;
    hovers
        .iter()
        .find(|h| h.range.start == start && h.range.end == start + needle.len())
}

fn markdown_at(source: &str, needle: &str, nth: usize) -> String {
    let hovers = analyze(source, &[]);
    hover_at(&hovers, source, needle, nth)
        .unwrap_or_else(|| panic!("no hover for `{needle}` #{nth} in {source:?}"))
        .markdown
        .clone()
}

// =============================================================================
// Generics
// =============================================================================

#[test]
fn map_on_a_typed_list_substitutes_the_element_type() {
    let source = "class X {}\nfinal xs = <X>[];\nfinal ys = xs.map((e) => e);";
    let markdown = markdown_at(source, "map", 0);
    assert!(markdown.contains("X Function(X e)"), "{markdown}");
    assert!(!markdown.contains("E e"), "{markdown}");
}

#[test]
fn inherited_members_see_the_subclass_arguments() {
    let source = "class Base<T> { T get item => throw 0; }\n\
                  class Child extends Base<String> {}\n\
                  final c = Child();\n\
                  final i = c.item;";
    assert_eq!(markdown_at(source, "item", 1), "```dart\nString get item\n```");
    assert_eq!(markdown_at(source, "i", 0), "```dart\nfinal String i\n```");
}

#[test]
fn constructor_arguments_infer_class_parameters() {
    let source = "class Box<T> { Box(this.value); final T value; }\nfinal b = Box(3);";
    assert_eq!(markdown_at(source, "Box", 2), "```dart\nBox(int value)\n```");
    assert_eq!(markdown_at(source, "b", 0), "```dart\nfinal Box<int> b\n```");
}

#[test]
fn explicit_type_arguments_win() {
    let source = "class Box<T> { Box(this.value); final T value; }\nfinal n = Box<num>(3);";
    assert_eq!(markdown_at(source, "Box", 2), "```dart\nBox(num value)\n```");
    assert_eq!(markdown_at(source, "n", 0), "```dart\nfinal Box<num> n\n```");
}

#[test]
fn conflicting_inferences_collapse_to_dynamic() {
    let source = "T pick<T>(T a, T b) => a;\nfinal p = pick(1, 'x');";
    assert_eq!(
        markdown_at(source, "pick", 1),
        "```dart\ndynamic pick<dynamic>(dynamic a, dynamic b)\n```"
    );
}

#[test]
fn untyped_lambda_parameters_take_the_expected_type() {
    let source = "final xs = [1, 2];\nfinal ys = xs.map((n) => n);";
    assert_eq!(markdown_at(source, "n", 1), "```dart\nint n\n```");
    assert_eq!(markdown_at(source, "ys", 0), "```dart\nfinal Iterable<int> ys\n```");
}

#[test]
fn typedefs_expand_for_member_lookup() {
    let source = "typedef IntList = List<int>;\nIntList xs = [1];\nfinal f = xs.first;";
    assert_eq!(markdown_at(source, "first", 0), "```dart\nint get first\n```");
}

// =============================================================================
// Collection elements
// =============================================================================

#[test]
fn list_for_elements_infer_the_element_type() {
    let source = "final s = [for (final i in [1]) i];\nvoid main() { final t = [for (final w in ['a']) w]; }";
    assert_eq!(markdown_at(source, "s", 0), "```dart\nfinal List<int> s\n```");
    assert_eq!(markdown_at(source, "i", 0), "```dart\nfinal int i\n```");
    assert_eq!(markdown_at(source, "t", 0), "```dart\nfinal List<String> t\n```");
}

#[test]
fn control_flow_elements_make_a_set() {
    let source = "final c = true;\nfinal a = {if (c) 1};\nfinal b = {for (final i in [1]) i};\nfinal m = {if (c) 'k': 1};";
    assert_eq!(markdown_at(source, "a", 0), "```dart\nfinal Set<int> a\n```");
    assert_eq!(markdown_at(source, "b", 0), "```dart\nfinal Set<int> b\n```");
    assert_eq!(markdown_at(source, "m", 0), "```dart\nfinal Map<String, int> m\n```");
}

#[test]
fn mixed_numbers_widen_to_num() {
    let source = "final xs = [1, 2.0];\nfinal ys = [1, null];\nfinal zs = [1, 'a'];";
    assert_eq!(markdown_at(source, "xs", 0), "```dart\nfinal List<num> xs\n```");
    assert_eq!(markdown_at(source, "ys", 0), "```dart\nfinal List<int?> ys\n```");
    assert_eq!(markdown_at(source, "zs", 0), "```dart\nfinal List<dynamic> zs\n```");
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn record_literals_infer_structural_types() {
    let source = "final details = [(title: 'a', content: 'b')];";
    let markdown = markdown_at(source, "details", 0);
    assert!(markdown.contains("List<({String title, String content})>"), "{markdown}");
}

#[test]
fn record_fields_resolve_as_members() {
    let source = "final pair = (1, name: 'x');\nfinal a = pair.$1;\nfinal b = pair.name;";
    assert_eq!(markdown_at(source, "$1", 0), "```dart\nint $1\n```");
    assert_eq!(markdown_at(source, "name", 1), "```dart\nString name\n```");
}

// =============================================================================
// Parsing ambiguity
// =============================================================================

#[test]
fn comparisons_and_type_parameters_do_not_mix() {
    let source = "final a = 1; final b = 2; final c = 3;\n\
                  final r = a < b > c;\n\
                  class Bar<T> {}\n\
                  class Foo<T> extends Bar<T> {}";
    let outcome = parser::parse_source(source);
    let declarations = &outcome.unit.declarations;

    let Declaration::Variable(r) = &declarations[3].node else {
        panic!("expected a variable: {:?}", declarations[3].node);
    };
    let init = r.variables[0].init.as_ref().expect("initializer");
    let Expr::Binary { op, left, .. } = &init.node else {
        panic!("expected a comparison: {:?}", init.node);
    };
    assert_eq!(*op, OperatorId::Gt);
    assert!(matches!(left.node, Expr::Binary { op: OperatorId::Lt, .. }));

    let Declaration::Class(foo) = &declarations[5].node else {
        panic!("expected a class: {:?}", declarations[5].node);
    };
    assert_eq!(foo.type_params.len(), 1);
    assert_eq!(foo.extends.as_ref().map(|t| t.node.to_string()).as_deref(), Some("Bar<T>"));

    let hovers = analyze(source, &[]);
    assert_eq!(
        hover_at(&hovers, source, "Foo", 0).map(|h| h.markdown.as_str()),
        Some("```dart\nclass Foo<T> extends Bar<T>\n```")
    );
}

// =============================================================================
// Strings, recovery and documentation
// =============================================================================

#[test]
fn interpolated_names_get_their_own_hover() {
    let source = "final x = 1; final y = '${x}';";
    let hovers = analyze(source, &[]);
    let string_start = source.find('\'').unwrap();
    let string_end = source.rfind('\'').unwrap() + 1;

    let declared = hover_at(&hovers, source, "x", 0).expect("declaration hover");
    let embedded = hover_at(&hovers, source, "x", 1).expect("interpolation hover");
    assert!(embedded.range.start > string_start && embedded.range.end < string_end);
    assert_eq!(embedded.markdown, declared.markdown);
}

#[test]
fn truncated_snippets_still_produce_hovers() {
    let source = "final a = 1;\nclass Broken {\n  int value = 2;\n  void f() {";
    let hovers = analyze(source, &[]);
    assert_eq!(
        hover_at(&hovers, source, "a", 0).map(|h| h.markdown.as_str()),
        Some("```dart\nfinal int a\n```")
    );
    assert!(hover_at(&hovers, source, "Broken", 0).is_some());
    assert_eq!(
        hover_at(&hovers, source, "value", 0).map(|h| h.markdown.as_str()),
        Some("```dart\nint value\n```")
    );
}

#[test]
fn doc_comments_flow_into_documentation() {
    let source = "/// Adds one.\nint inc(int x) => x + 1;\nfinal two = inc(1);";
    let hovers = analyze(source, &[]);
    let call = hover_at(&hovers, source, "inc", 1).expect("call hover");
    assert_eq!(call.markdown, "```dart\nint inc(int x)\n```");
    assert_eq!(call.documentation.as_deref(), Some("Adds one."));
}

// =============================================================================
// Language features
// =============================================================================

#[test]
fn enums_expose_constants_and_implicit_members() {
    let source = "enum Color { red, green }\nfinal c = Color.red;\nfinal i = c.index;\nfinal all = Color.values;";
    assert_eq!(markdown_at(source, "red", 1), "```dart\nstatic const Color red\n```");
    assert_eq!(markdown_at(source, "index", 0), "```dart\nint get index\n```");
    assert_eq!(markdown_at(source, "values", 0), "```dart\nstatic const List<Color> values\n```");
}

#[test]
fn extension_members_resolve_on_the_extended_type() {
    let source = "extension Shout on String { String shout() => this; }\nfinal s = 'a'.shout();";
    assert_eq!(markdown_at(source, "shout", 1), "```dart\nString shout()\n```");
}

#[test]
fn cascade_sections_resolve_on_the_target() {
    let source = "final sb = StringBuffer()..write('a');";
    assert_eq!(markdown_at(source, "write", 0), "```dart\nvoid write(Object? object)\n```");
}

#[test]
fn named_argument_labels_show_their_parameter() {
    let source = "void greet({required String name}) {}\nfinal r = greet(name: 'x');";
    assert_eq!(markdown_at(source, "name", 1), "```dart\nrequired String name\n```");
}

#[test]
fn special_type_references_show_their_bare_name() {
    let source = "void f(dynamic x) {}\nint g() => 1;";
    assert_eq!(markdown_at(source, "void", 0), "```dart\nvoid\n```");
    assert_eq!(markdown_at(source, "dynamic", 0), "```dart\ndynamic\n```");
    assert!(markdown_at(source, "int", 0).starts_with("```dart\nclass int"));
}

#[test]
fn custom_types_are_visible_to_snippets() {
    let custom = custom_types::from_json(
        r#"[{ "name": "Greeter", "description": "Says hello.",
              "members": { "greet": { "type": "String", "description": "Greets.", "parameters": [] } } }]"#,
    )
    .unwrap();
    let source = "Greeter g = Greeter();\nfinal s = g.greet();";
    let hovers = analyze(source, &custom);

    let greeter = hover_at(&hovers, source, "Greeter", 0).expect("type hover");
    assert_eq!(greeter.markdown, "```dart\nclass Greeter\n```");
    assert_eq!(greeter.documentation.as_deref(), Some("Says hello."));

    let greet = hover_at(&hovers, source, "greet", 0).expect("method hover");
    assert_eq!(greet.markdown, "```dart\nString greet()\n```");
    assert_eq!(greet.documentation.as_deref(), Some("Greets."));
}

// =============================================================================
// Output invariants
// =============================================================================

#[test]
fn hovers_are_sorted_unique_and_in_bounds() {
    let source = "class A<T> { T? value; A(this.value); }\n\
                  final a = A(1);\n\
                  void main() { for (final x in [1, 2]) { print(x + a.value!); } }";
    let hovers = analyze(source, &[]);
    assert!(!hovers.is_empty());
    for pair in hovers.windows(2) {
        assert!(pair[0].range < pair[1].range, "{:?} then {:?}", pair[0].range, pair[1].range);
    }
    assert!(hovers.iter().all(|h| h.range.start < h.range.end && h.range.end <= source.len()));
    assert_eq!(hovers, analyze(source, &[]));
}
