//! Hover signatures.
//!
//! Renders a [`Node`] as the one-line declaration shown in a hover, with a type-parameter substitution applied to
//! every type it mentions:
//!
//! - classes: `abstract class Box<T extends num> extends Base<T> implements Comparable<Box<T>> with Mixin`
//! - callables: `static Iterable<T> map<T>(T Function(E e) toElement, [int n = 0], {required bool flag})`
//! - accessors and operators: `int get length`, `set length(int value)`, `bool operator ==(Object other)`
//! - values: `final List<String> names`, parameters as `String name`
//!
//! ## Notes
//! - Parameter types that were inferred for untyped function-literal parameters come from the resolver.
//! - A `var` modifier is dropped once the variable has a type.

use std::collections::HashMap;

use crate::frontend::cst::ParameterKind;
use crate::frontend::resolver::TypeResolver;
use crate::frontend::symbols::{Node, NodeId, NodeKind};
use crate::frontend::type_text::{self, DYNAMIC};

/// Render the signature of `id` with `substitution` applied.
pub fn signature(resolver: &TypeResolver<'_>, id: NodeId, substitution: &HashMap<String, String>) -> String {
    let node = resolver.model().node(id);
    let subst = |text: &str| type_text::substitute(text, substitution);
    match node.kind {
        NodeKind::Class | NodeKind::Mixin | NodeKind::Enum => type_declaration(node, &subst),
        NodeKind::Extension => {
            let on = node.ty.as_deref().map(&subst).unwrap_or_else(|| DYNAMIC.to_string());
            let name = if node.name.is_empty() {
                String::new()
            } else {
                format!(" {}{}", node.name, type_parameters(node, &subst))
            };
            format!("extension{name} on {on}")
        }
        NodeKind::Typedef => {
            let aliased = node.ty.as_deref().map(&subst).unwrap_or_else(|| DYNAMIC.to_string());
            format!("typedef {}{} = {}", node.name, type_parameters(node, &subst), aliased)
        }
        NodeKind::Function | NodeKind::Method => {
            let ret = subst(&resolver.return_type(id));
            let head = prefixed(&node.modifiers, &format!("{ret} {}", node.name));
            format!(
                "{head}{}({})",
                type_parameters(node, &subst),
                parameter_block(resolver, node, &subst)
            )
        }
        NodeKind::Operator => {
            let ret = subst(&resolver.return_type(id));
            format!("{ret} operator {}({})", node.name, parameter_block(resolver, node, &subst))
        }
        NodeKind::Constructor => {
            let head = prefixed(&node.modifiers, &node.name);
            format!(
                "{head}{}({})",
                type_parameters(node, &subst),
                parameter_block(resolver, node, &subst)
            )
        }
        NodeKind::Getter => {
            let ty = node.ty.as_deref().map(&subst).unwrap_or_else(|| DYNAMIC.to_string());
            prefixed(&node.modifiers, &format!("{ty} get {}", node.name))
        }
        NodeKind::Setter => prefixed(
            &node.modifiers,
            &format!("set {}({})", node.name, parameter_block(resolver, node, &subst)),
        ),
        NodeKind::Field | NodeKind::Variable | NodeKind::EnumConstant => {
            let ty = resolver
                .node_value_type(id)
                .map(|t| subst(&t))
                .unwrap_or_else(|| DYNAMIC.to_string());
            let modifiers: Vec<String> = node
                .modifiers
                .iter()
                .filter(|m| !(m.as_str() == "var" && node.ty.is_some()))
                .cloned()
                .collect();
            prefixed(&modifiers, &format!("{ty} {}", node.name))
        }
        NodeKind::Parameter => parameter(resolver, id, &subst),
        NodeKind::TypeParameter => match &node.ty {
            Some(bound) => format!("{} extends {}", node.name, subst(bound)),
            None => node.name.clone(),
        },
    }
}

/// Built-in types that are not declared as classes; they render as their bare name.
const BARE_TYPES: &[&str] = &["void", "dynamic", "Never", "Null"];

fn type_declaration(node: &Node, subst: &impl Fn(&str) -> String) -> String {
    if BARE_TYPES.contains(&node.name.as_str()) && node.type_parameters.is_empty() {
        return node.name.clone();
    }
    let keyword = match node.kind {
        NodeKind::Mixin => "mixin",
        NodeKind::Enum => "enum",
        _ => "class",
    };
    let mut out = prefixed(&node.modifiers, &format!("{keyword} {}", node.name));
    out.push_str(&type_parameters(node, subst));
    let join = |types: &[String]| types.iter().map(|t| subst(t.as_str())).collect::<Vec<_>>().join(", ");
    if !node.extends_types.is_empty() {
        let word = if node.kind == NodeKind::Mixin { "on" } else { "extends" };
        out.push_str(&format!(" {word} {}", join(&node.extends_types)));
    }
    if !node.implements_types.is_empty() {
        out.push_str(&format!(" implements {}", join(&node.implements_types)));
    }
    if !node.mixins.is_empty() {
        out.push_str(&format!(" with {}", join(&node.mixins)));
    }
    out
}

/// `<T, U extends num>` with each parameter substituted, or nothing.
fn type_parameters(node: &Node, subst: &impl Fn(&str) -> String) -> String {
    if node.type_parameters.is_empty() {
        return String::new();
    }
    let params: Vec<String> = node
        .type_parameters
        .iter()
        .map(|p| match p.split_once(" extends ") {
            Some((name, bound)) => {
                // a bound type parameter shows the type it stands for
                let bound_to = subst(name);
                if bound_to == name {
                    format!("{name} extends {}", subst(bound))
                } else {
                    bound_to
                }
            }
            None => subst(p),
        })
        .collect();
    format!("<{}>", params.join(", "))
}

/// Positional parameters, then `[optional positional]`, then `{named}`.
fn parameter_block(resolver: &TypeResolver<'_>, node: &Node, subst: &impl Fn(&str) -> String) -> String {
    let mut positional = Vec::new();
    let mut optional = Vec::new();
    let mut named = Vec::new();
    for &param in &node.parameters {
        let text = parameter(resolver, param, subst);
        match resolver.model().node(param).parameter_kind {
            Some(ParameterKind::OptionalPositional) => optional.push(text),
            Some(ParameterKind::Named) => named.push(text),
            _ => positional.push(text),
        }
    }
    if !optional.is_empty() {
        positional.push(format!("[{}]", optional.join(", ")));
    }
    if !named.is_empty() {
        positional.push(format!("{{{}}}", named.join(", ")));
    }
    positional.join(", ")
}

/// `required Type name = default`.
fn parameter(resolver: &TypeResolver<'_>, id: NodeId, subst: &impl Fn(&str) -> String) -> String {
    let node = resolver.model().node(id);
    let ty = resolver
        .node_value_type(id)
        .map(|t| subst(&t))
        .unwrap_or_else(|| DYNAMIC.to_string());
    let mut out = String::new();
    if node.required && node.parameter_kind == Some(ParameterKind::Named) {
        out.push_str("required ");
    }
    out.push_str(&ty);
    out.push(' ');
    out.push_str(&node.name);
    if let Some(default) = &node.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    out
}

fn prefixed(modifiers: &[String], rest: &str) -> String {
    if modifiers.is_empty() {
        rest.to_string()
    } else {
        format!("{} {rest}", modifiers.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::collector;
    use crate::frontend::parser;
    use crate::frontend::symbols::{ROOT_SCOPE, SemanticModel};

    fn model_of(source: &str) -> SemanticModel {
        collector::collect(&parser::parse_source(source).unit, &[])
    }

    fn render(model: &SemanticModel, scope: usize, name: &str) -> String {
        let resolver = TypeResolver::new(model);
        let id = model.lookup(scope, name).expect("name not bound").node;
        signature(&resolver, id, &HashMap::new())
    }

    #[test]
    fn test_class_signature() {
        let model = model_of("abstract class Box<T extends num> extends Base<T> implements Comparable<T> with M {}");
        insta::assert_snapshot!(
            render(&model, ROOT_SCOPE, "Box"),
            @"abstract class Box<T extends num> extends Base<T> implements Comparable<T> with M"
        );
    }

    #[test]
    fn test_builtin_special_types_have_no_keyword() {
        let model = model_of("");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "void"), @"void");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "dynamic"), @"dynamic");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "Null"), @"Null");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "Object"), @"class Object");
    }

    #[test]
    fn test_function_signature_groups_parameters() {
        let model = model_of("String greet(String name, [int times = 1], {required bool loud, String? suffix}) => name;");
        insta::assert_snapshot!(
            render(&model, ROOT_SCOPE, "greet"),
            @"String greet(String name, [int times = 1], {required bool loud, String? suffix})"
        );
    }

    #[test]
    fn test_accessors_and_operators() {
        let model = model_of(
            "class P { int _x = 0; int get x => _x; set x(int value) {} bool operator ==(Object other) => true; }",
        );
        let class = model.class_named("P").unwrap();
        let scope = model.node(class).scope;
        insta::assert_snapshot!(render(&model, scope, "x"), @"int get x");
        insta::assert_snapshot!(render(&model, scope, "x="), @"set x(int value)");
        insta::assert_snapshot!(render(&model, scope, "=="), @"bool operator ==(Object other)");
    }

    #[test]
    fn test_substitution_reaches_type_parameters() {
        let model = model_of("");
        let resolver = TypeResolver::new(&model);
        let iterable = model.class_named("Iterable").unwrap();
        let map = model.lookup_local(model.node(iterable).scope, "map").unwrap().node;
        let substitution = HashMap::from([("E".to_string(), "X".to_string())]);
        insta::assert_snapshot!(
            signature(&resolver, map, &substitution),
            @"Iterable<T> map<T>(T Function(X e) toElement)"
        );
    }

    #[test]
    fn test_inferred_variable_drops_var() {
        let model = model_of("var count = 3; final names = <String>['a'];");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "count"), @"int count");
        insta::assert_snapshot!(render(&model, ROOT_SCOPE, "names"), @"final List<String> names");
    }
}
