#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the disambiguation rules (generics vs comparisons, sets vs maps, records vs parentheses)
/// and on recovery over truncated snippets.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> ParseOutcome {
        let tokens = lexer::tokenize(source);
        parse(&tokens)
    }

    fn clean(source: &str) -> CompilationUnit {
        let outcome = parse_str(source);
        assert!(outcome.errors.is_empty(), "unexpected errors: {:?}", outcome.errors);
        outcome.unit
    }

    /// Initializer of the first declarator of the only top-level variable.
    fn initializer(source: &str) -> Expr {
        let unit = clean(source);
        match &unit.declarations[0].node {
            Declaration::Variable(v) => v.variables[0].init.clone().expect("initializer").node,
            other => panic!("Expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_chained_comparison_is_not_generic() {
        match initializer("final r = a < b > c;") {
            Expr::Binary { op, left, right } => {
                assert_eq!(op, OperatorId::Gt);
                assert!(matches!(left.node, Expr::Binary { op: OperatorId::Lt, .. }));
                assert_eq!(right.node, Expr::Identifier("c".to_string()));
            }
            other => panic!("Expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_class_type_parameters_and_generic_supertype() {
        let unit = clean("class Foo<T> extends Bar<T> {}");
        match &unit.declarations[0].node {
            Declaration::Class(c) => {
                assert_eq!(c.name.node, "Foo");
                assert_eq!(c.type_params.len(), 1);
                assert_eq!(c.type_params[0].name.node, "T");
                let extends = c.extends.as_ref().expect("extends clause");
                assert_eq!(extends.node.to_string(), "Bar<T>");
            }
            other => panic!("Expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_generic_call_is_accepted() {
        match initializer("final r = f<int>(1);") {
            Expr::MethodInvocation { name, type_args, .. } => {
                assert_eq!(name.node, "f");
                assert_eq!(type_args.len(), 1);
            }
            other => panic!("Expected invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_generics_close_with_adjacent_angles() {
        let unit = clean("Map<String, List<int>> m = {};");
        match &unit.declarations[0].node {
            Declaration::Variable(v) => {
                assert_eq!(v.ty.as_ref().expect("type").node.to_string(), "Map<String, List<int>>");
                assert!(matches!(
                    v.variables[0].init.as_ref().map(|e| &e.node),
                    Some(Expr::SetOrMap(_))
                ));
            }
            other => panic!("Expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_composite_shift_assignment() {
        let unit = clean("x >>= 2;");
        match &unit.declarations[0].node {
            Declaration::Statement(Stmt::Expr(e)) => {
                assert!(matches!(e.node, Expr::Assignment { op: OperatorId::ShrEq, .. }));
            }
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_set_and_map_shapes() {
        let shape = |source: &str| match initializer(source) {
            Expr::SetOrMap(lit) => lit.syntactic_shape(),
            other => panic!("Expected set-or-map, got {other:?}"),
        };
        assert_eq!(shape("final s = {1, 2};"), LiteralShape::Set);
        assert_eq!(shape("final m = {'a': 1};"), LiteralShape::Map);
        assert_eq!(shape("final e = <String, int>{};"), LiteralShape::Map);
        assert_eq!(shape("final e = <int>{};"), LiteralShape::Set);
        assert_eq!(shape("final e = {};"), LiteralShape::Ambiguous);
        assert_eq!(shape("final e = {if (c) 'k': 1};"), LiteralShape::Map);
        assert_eq!(shape("final e = {if (c) 1};"), LiteralShape::Set);
        assert_eq!(shape("final e = {for (final i in xs) i};"), LiteralShape::Set);
        assert_eq!(shape("final e = {if (c) ...xs};"), LiteralShape::Ambiguous);
    }

    #[test]
    fn test_record_versus_parenthesized() {
        assert!(matches!(initializer("final p = (1);"), Expr::Paren(_)));
        match initializer("final r = (1, 2);") {
            Expr::Record { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("Expected record, got {other:?}"),
        }
        match initializer("final r = (title: 'a', content: 'b');") {
            Expr::Record { fields, .. } => {
                let names: Vec<_> = fields.iter().filter_map(|f| f.name.as_ref()).map(|n| n.node.as_str()).collect();
                assert_eq!(names, vec!["title", "content"]);
            }
            other => panic!("Expected record, got {other:?}"),
        }
        match initializer("final r = (1,);") {
            Expr::Record { fields, .. } => assert_eq!(fields.len(), 1),
            other => panic!("Expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_function_expressions() {
        match initializer("final f = (a, b) => a + b;") {
            Expr::Function(f) => {
                assert_eq!(f.params.len(), 2);
                assert!(matches!(f.body.kind, BodyKind::Expression(_)));
            }
            other => panic!("Expected function expression, got {other:?}"),
        }
        match initializer("final f = (int x) async { return x; };") {
            Expr::Function(f) => {
                assert_eq!(f.body.marker, AsyncMarker::Async);
                assert!(f.params[0].node.ty.is_some());
            }
            other => panic!("Expected function expression, got {other:?}"),
        }
        match initializer("final add = (a) => (b) => a + b;") {
            Expr::Function(outer) => match &outer.body.kind {
                BodyKind::Expression(inner) => {
                    let Expr::Function(inner) = &inner.node else {
                        panic!("Expected nested function expression, got {:?}", inner.node);
                    };
                    assert_eq!(inner.params[0].node.name.node, "b");
                    assert!(matches!(inner.body.kind, BodyKind::Expression(_)));
                }
                other => panic!("Expected expression body, got {other:?}"),
            },
            other => panic!("Expected function expression, got {other:?}"),
        }
    }

    #[test]
    fn test_cascade_sections() {
        match initializer("final b = StringBuffer()..write('a')..length;") {
            Expr::Cascade { target, sections } => {
                assert!(matches!(target.node, Expr::MethodInvocation { target: None, .. }));
                assert_eq!(sections.len(), 2);
                match &sections[0].node {
                    Expr::MethodInvocation { target: Some(receiver), name, .. } => {
                        assert_eq!(name.node, "write");
                        assert!(matches!(receiver.node, Expr::CascadeReceiver { null_aware: false }));
                    }
                    other => panic!("Expected invocation section, got {other:?}"),
                }
                assert!(matches!(sections[1].node, Expr::PropertyAccess { .. }));
            }
            other => panic!("Expected cascade, got {other:?}"),
        }
    }

    #[test]
    fn test_cascade_section_assignment() {
        match initializer("final p = Point()..x = 1..y = 2;") {
            Expr::Cascade { sections, .. } => {
                assert_eq!(sections.len(), 2);
                assert!(sections.iter().all(|s| matches!(s.node, Expr::Assignment { .. })));
            }
            other => panic!("Expected cascade, got {other:?}"),
        }
    }

    #[test]
    fn test_interpolation_spans_are_absolute() {
        let source = "final y = 'v: ${x + 1}';";
        match initializer(source) {
            Expr::String(lit) => {
                assert_eq!(lit.interpolations.len(), 1);
                let span = lit.interpolations[0].span;
                assert_eq!(&source[span.start..span.end], "x + 1");
            }
            other => panic!("Expected string, got {other:?}"),
        }
    }

    #[test]
    fn test_instance_creation_with_named_constructor() {
        match initializer("final d = new Duration.zero();") {
            Expr::InstanceCreation {
                keyword,
                ty,
                constructor,
                ..
            } => {
                assert_eq!(keyword, KeywordId::New);
                assert_eq!(ty.node.to_string(), "Duration");
                assert_eq!(constructor.map(|c| c.node).as_deref(), Some("zero"));
            }
            other => panic!("Expected instance creation, got {other:?}"),
        }
    }

    #[test]
    fn test_nullable_type_in_type_test() {
        match initializer("final r = x is int? ? 1 : 2;") {
            Expr::Conditional { condition, .. } => match condition.node {
                Expr::TypeTest { ty, .. } => assert!(ty.node.is_nullable()),
                other => panic!("Expected type test, got {other:?}"),
            },
            other => panic!("Expected conditional, got {other:?}"),
        }
        match initializer("final r = x is int ? 1 : 2;") {
            Expr::Conditional { condition, .. } => match condition.node {
                Expr::TypeTest { ty, .. } => assert!(!ty.node.is_nullable()),
                other => panic!("Expected type test, got {other:?}"),
            },
            other => panic!("Expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_doc_comment_attaches_to_declaration() {
        let unit = clean("/// Adds two numbers.\n/// Returns the sum.\nint add(int a, int b) => a + b;");
        match &unit.declarations[0].node {
            Declaration::Function(f) => {
                assert_eq!(f.doc.as_deref(), Some("Adds two numbers.\nReturns the sum."));
                assert_eq!(f.return_type.as_ref().expect("return type").node.to_string(), "int");
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_doc_block_comment_and_separated_comment() {
        let unit = clean("/**\n * A point.\n */\nclass P {}\n/// Detached.\n\nclass Q {}");
        let docs: Vec<_> = unit
            .declarations
            .iter()
            .map(|d| match &d.node {
                Declaration::Class(c) => c.doc.clone(),
                other => panic!("Expected class, got {other:?}"),
            })
            .collect();
        assert_eq!(docs, vec![Some("A point.".to_string()), None]);
    }

    #[test]
    fn test_class_members_and_constructors() {
        let unit = clean(
            r#"
class Point {
  final int x;
  final int y;
  const Point(this.x, this.y);
  Point.origin() : x = 0, y = 0;
  int get sum => x + y;
  set label(String value) {}
  Point operator +(Point other) => Point(x + other.x, y + other.y);
  static double distance(Point a, [Point? b]) => 0.0;
}
"#,
        );
        match &unit.declarations[0].node {
            Declaration::Class(c) => {
                let names: Vec<_> = c
                    .members
                    .iter()
                    .map(|m| match &m.node {
                        ClassMember::Field(f) => f.variables[0].name.node.clone(),
                        ClassMember::Method(f) => f.name.node.clone(),
                    })
                    .collect();
                assert_eq!(
                    names,
                    vec!["x", "y", "Point", "Point.origin", "sum", "label", "+", "distance"]
                );
                match &c.members[3].node {
                    ClassMember::Method(f) => assert_eq!(f.initializers.len(), 2),
                    other => panic!("Expected constructor, got {other:?}"),
                }
                match &c.members[7].node {
                    ClassMember::Method(f) => {
                        assert_eq!(f.params[1].node.kind, ParameterKind::OptionalPositional);
                        assert!(f.has_modifier(KeywordId::Static));
                    }
                    other => panic!("Expected method, got {other:?}"),
                }
            }
            other => panic!("Expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_named_parameters_with_defaults() {
        let unit = clean("void greet(String name, {int times = 2, required bool loud}) {}");
        match &unit.declarations[0].node {
            Declaration::Function(f) => {
                let times = &f.params[1].node;
                assert_eq!(times.kind, ParameterKind::Named);
                assert_eq!(times.default.as_ref().map(|d| d.text.as_str()), Some("2"));
                assert!(f.params[2].node.required);
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parameter_groups_followed_by_more_groups() {
        let unit = clean("void f(int a, [int b = 2], {required String c, int? d}) {}\nvoid g([int x = 1,],) {}");
        match &unit.declarations[0].node {
            Declaration::Function(f) => {
                let kinds: Vec<_> = f.params.iter().map(|p| p.node.kind).collect();
                assert_eq!(
                    kinds,
                    [
                        ParameterKind::Positional,
                        ParameterKind::OptionalPositional,
                        ParameterKind::Named,
                        ParameterKind::Named
                    ]
                );
                assert!(f.params[2].node.required);
            }
            other => panic!("Expected function, got {other:?}"),
        }
        match &unit.declarations[1].node {
            Declaration::Function(g) => assert_eq!(g.params.len(), 1),
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_extension_typedef_mixin() {
        let unit = clean(
            r#"
enum Color { red, green, blue }
extension Shout on String { String shout() => toUpperCase(); }
typedef Predicate<E> = bool Function(E element);
mixin Walker on Animal { void walk() {} }
"#,
        );
        assert!(matches!(&unit.declarations[0].node, Declaration::Enum(e) if e.constants.len() == 3));
        assert!(matches!(&unit.declarations[1].node, Declaration::Extension(e) if e.members.len() == 1));
        match &unit.declarations[2].node {
            Declaration::Typedef(t) => {
                assert_eq!(t.type_params.len(), 1);
                assert_eq!(t.aliased.node.to_string(), "bool Function(E element)");
            }
            other => panic!("Expected typedef, got {other:?}"),
        }
        assert!(matches!(&unit.declarations[3].node, Declaration::Mixin(m) if m.on.len() == 1));
    }

    #[test]
    fn test_directives() {
        let unit = clean("import 'package:a/a.dart' as a show B, C;\nexport 'b.dart';\nvoid main() {}");
        assert_eq!(unit.directives.len(), 2);
        let import = &unit.directives[0].node;
        assert_eq!(import.kind, DirectiveKind::Import);
        assert_eq!(import.uri.as_deref(), Some("package:a/a.dart"));
        assert_eq!(import.prefix.as_ref().map(|p| p.node.as_str()), Some("a"));
        assert_eq!(import.combinators[0].names.len(), 2);
        assert_eq!(unit.directives[1].node.kind, DirectiveKind::Export);
    }

    #[test]
    fn test_statements_in_function_body() {
        let unit = clean(
            r#"
void main() {
  var total = 0;
  for (final n in [1, 2, 3]) { total += n; }
  for (var i = 0; i < 3; i++) {}
  if (total > 3) print(total); else print(0);
  while (false) {}
  switch (total) { case 1: break; default: return; }
  try { throw Exception('x'); } on Exception catch (e) { print(e); } finally {}
}
"#,
        );
        match &unit.declarations[0].node {
            Declaration::Function(f) => match &f.body.kind {
                BodyKind::Block(block) => {
                    let kinds: Vec<_> = block
                        .node
                        .statements
                        .iter()
                        .map(|s| match &s.node {
                            Stmt::VarDecl(_) => "var",
                            Stmt::ForIn { .. } => "for-in",
                            Stmt::For { .. } => "for",
                            Stmt::If { .. } => "if",
                            Stmt::While { .. } => "while",
                            Stmt::Switch { .. } => "switch",
                            Stmt::Try { .. } => "try",
                            _ => "other",
                        })
                        .collect();
                    assert_eq!(kinds, vec!["var", "for-in", "for", "if", "while", "switch", "try"]);
                }
                other => panic!("Expected block body, got {other:?}"),
            },
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_collection_for_and_spread() {
        match initializer("final xs = [...a, ...?b, for (var i in c) i * 2, if (d) 1 else 2];") {
            Expr::List(lit) => {
                assert_eq!(lit.elements.len(), 4);
                assert!(matches!(lit.elements[1].node, CollectionElement::Spread { null_aware: true, .. }));
                assert!(matches!(lit.elements[2].node, CollectionElement::For { .. }));
                assert!(matches!(lit.elements[3].node, CollectionElement::If { .. }));
            }
            other => panic!("Expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_class_keeps_members() {
        let outcome = parse_str("class A {\n  int x = 1;\n  void f() {\n");
        assert!(!outcome.errors.is_empty());
        match &outcome.unit.declarations[0].node {
            Declaration::Class(c) => {
                assert_eq!(c.name.node, "A");
                assert_eq!(c.members.len(), 2);
            }
            other => panic!("Expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_recovery_resumes_at_next_declaration() {
        let outcome = parse_str("final a = ;\nclass B {}");
        assert!(!outcome.errors.is_empty());
        assert!(
            outcome
                .unit
                .declarations
                .iter()
                .any(|d| matches!(&d.node, Declaration::Class(c) if c.name.node == "B"))
        );
    }

    #[test]
    fn test_garbage_input_terminates() {
        for source in [
            ")))]]]}}}",
            "class { { {",
            "<<<<>>>>",
            "final x = ((((((",
            "a.b.c.(d",
            "@@@ ;;; ... ?..",
            "'unterminated",
            "for (;;",
        ] {
            let outcome = parse_str(source);
            assert!(outcome.unit.declarations.len() <= source.len());
        }
    }

    #[test]
    fn test_deep_nesting_is_reported_not_overflowed() {
        let source = format!("final x = {}1{};", "(".repeat(500), ")".repeat(500));
        let outcome = parse_str(&source);
        assert!(outcome.errors.iter().any(|e| e.message.contains("nesting is too deep")));
    }

    #[test]
    fn test_parse_source_merges_lexical_errors() {
        let outcome = parse_source("final s = 'abc\nfinal t = 1;");
        assert!(outcome.errors.iter().any(|e| e.kind == crate::diagnostics::ErrorKind::Lexical));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_type_annotations_render_back() {
        let unit = clean(
            "Map<String, List<int>>? lookup = null;\nvoid Function(int a, {required String b}) callback = f;\n(int, {String name}) pair = p;",
        );
        let types: Vec<String> = unit
            .declarations
            .iter()
            .filter_map(|d| match &d.node {
                Declaration::Variable(v) => v.ty.as_ref().map(|t| t.node.to_string()),
                _ => None,
            })
            .collect();
        insta::assert_snapshot!(types.join("\n"), @r"
        Map<String, List<int>>?
        void Function(int a, {required String b})
        (int, {String name})
        ");
    }
}
