//! Hovers inside expressions: references, member accesses, calls and literals.

use std::collections::HashMap;

use crate::frontend::cst::*;
use crate::frontend::resolver::{Cx, ResolvedMember};
use crate::frontend::symbols::{NodeId, NodeKind, ScopeKind};
use crate::frontend::type_text;

use super::HoverGenerator;

impl<'m, 'c> HoverGenerator<'m, 'c> {
    pub(super) fn expression(&mut self, expr: &Spanned<Expr>, cx: &Cx) {
        match &expr.node {
            Expr::Identifier(name) => self.identifier(name, expr.span, cx),
            Expr::Null => self.emit_literal(expr.span, "Null", "null"),
            Expr::Bool(value) => self.emit_literal(expr.span, "bool", if *value { "true" } else { "false" }),
            Expr::Number(text) => {
                let ty = self.resolver.infer(expr, cx);
                self.emit_literal(expr.span, &ty, text);
            }
            Expr::String(literal) => {
                self.emit_literal(expr.span, "String", &literal.raw);
                let inner = cx.with_expected(None);
                for part in &literal.interpolations {
                    self.expression(part, &inner);
                }
            }
            Expr::This | Expr::Super | Expr::Symbol(_) | Expr::CascadeReceiver { .. } => {}
            Expr::List(literal) | Expr::SetOrMap(literal) => self.collection(literal, cx),
            Expr::Record { fields, .. } => {
                let expected = cx
                    .expected
                    .as_deref()
                    .map(type_text::non_nullable)
                    .and_then(|ty| type_text::record_parts(&ty));
                let mut position = 0;
                for field in fields {
                    let field_type = match (&field.name, &expected) {
                        (Some(name), Some(record)) => record.field(&name.node).map(str::to_string),
                        (None, Some(record)) => {
                            position += 1;
                            record.positional.get(position - 1).cloned()
                        }
                        (_, None) => None,
                    };
                    self.expression(&field.value, &cx.with_expected(field_type));
                }
            }
            Expr::Function(function) => self.function_expr(function, expr.span, cx),
            Expr::Binary { left, right, .. } => {
                let inner = cx.with_expected(None);
                self.expression(left, &inner);
                self.expression(right, &inner);
            }
            Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => {
                self.expression(operand, &cx.with_expected(None));
            }
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                self.expression(condition, &cx.with_expected(None));
                self.expression(then_expr, cx);
                self.expression(else_expr, cx);
            }
            Expr::Cascade { target, sections } => {
                self.expression(target, cx);
                let receiver = self.resolver.infer(target, cx);
                let inner = cx.with_receiver(Some(receiver)).with_expected(None);
                for section in sections {
                    self.expression(section, &inner);
                }
            }
            Expr::TypeTest { expr: inner, ty, .. } | Expr::AsCast { expr: inner, ty } => {
                self.expression(inner, &cx.with_expected(None));
                self.type_annotation(ty, cx);
            }
            Expr::PropertyAccess { target, name, .. } => {
                let inner = cx.with_expected(None);
                self.expression(target, &inner);
                let member = self
                    .resolver
                    .receiver(target, &inner)
                    .and_then(|receiver| self.resolver.resolve_on(&receiver, &name.node, cx.scope));
                match member {
                    Some(member) => self.emit_member(name.span, &member),
                    None => tracing::trace!(name = %name.node, "unresolved member"),
                }
            }
            Expr::MethodInvocation {
                target,
                name,
                type_args,
                args,
                ..
            } => {
                let inner = cx.with_expected(None);
                if let Some(target) = target {
                    self.expression(target, &inner);
                }
                for ty in type_args {
                    self.type_annotation(ty, cx);
                }
                let member = self.resolver.resolve_callee(target.as_deref(), name, &inner);
                self.call(name.span, member, type_args, args, &inner);
            }
            Expr::FunctionCall {
                callee,
                type_args,
                args,
            } => {
                let inner = cx.with_expected(None);
                self.expression(callee, &inner);
                for ty in type_args {
                    self.type_annotation(ty, cx);
                }
                self.arguments(args, None, &inner);
            }
            Expr::Index { target, index, .. } => {
                let inner = cx.with_expected(None);
                self.expression(target, &inner);
                self.expression(index, &inner);
            }
            Expr::Assignment { target, value, .. } => {
                let inner = cx.with_expected(None);
                self.expression(target, &inner);
                let target_type = self.resolver.infer_opt(target, &inner);
                self.expression(value, &cx.with_expected(target_type));
            }
            Expr::InstanceCreation {
                ty,
                constructor,
                args,
                ..
            } => self.instance_creation(ty, constructor.as_ref(), args, cx),
            Expr::TypeInstantiation { name, type_args } => {
                if let Some(id) = self.model().lookup_type(cx.scope, &name.node) {
                    self.emit_node(name.span, id, &HashMap::new());
                }
                for ty in type_args {
                    self.type_annotation(ty, cx);
                }
            }
            Expr::Throw(inner) | Expr::Await(inner) => self.expression(inner, &cx.with_expected(None)),
            Expr::Paren(inner) => self.expression(inner, cx),
        }
    }

    fn identifier(&mut self, name: &str, span: Span, cx: &Cx) {
        let Some(member) = self.resolver.resolve_name(name, cx) else {
            tracing::trace!(name, "unresolved identifier");
            return;
        };
        // Outside a call, a class name shadowed by its own constructor still means the class.
        let class = member
            .node_id()
            .filter(|&id| self.model().node(id).kind == NodeKind::Constructor)
            .and_then(|_| self.resolver.class_reference(name, cx.scope));
        match class {
            Some(class) => self.emit_node(span, class, &HashMap::new()),
            None => self.emit_member(span, &member),
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Hover the callee of a call and walk its arguments with the call's substitution.
    fn call(
        &mut self,
        name: Span,
        member: Option<ResolvedMember>,
        type_args: &[Spanned<TypeAnnotation>],
        args: &Arguments,
        cx: &Cx,
    ) {
        let Some(member) = member else {
            self.arguments(args, None, cx);
            return;
        };
        let callable = member
            .node_id()
            .filter(|&id| self.model().node(id).kind.is_callable());
        match callable {
            Some(id) => {
                let substitution = self
                    .resolver
                    .call_bindings(id, &member.substitution, type_args, args, cx);
                self.emit_node(name, id, &substitution);
                self.arguments(args, Some((id, &substitution)), cx);
            }
            None => {
                self.emit_member(name, &member);
                self.arguments(args, None, cx);
            }
        }
    }

    fn instance_creation(
        &mut self,
        ty: &Spanned<TypeAnnotation>,
        constructor: Option<&Name>,
        args: &Arguments,
        cx: &Cx,
    ) {
        let inner = cx.with_expected(None);
        let Some((_, member)) = self.resolver.creation_target(ty, constructor, cx.scope) else {
            self.type_annotation(ty, cx);
            self.arguments(args, None, &inner);
            return;
        };
        let Some(ctor) = member.node_id() else {
            return;
        };
        let substitution = self
            .resolver
            .call_bindings(ctor, &member.substitution, &[], args, &inner);
        if let Some(class_name) = ty.node.simple_name() {
            self.emit_node(class_name.span, ctor, &substitution);
        }
        if let Some(name) = constructor {
            self.emit_node(name.span, ctor, &substitution);
        }
        // The type arguments; the class name itself is taken by the constructor.
        if let TypeAnnotation::Named { args: type_args, .. } = &ty.node {
            for arg in type_args {
                self.type_annotation(arg, cx);
            }
        }
        self.arguments(args, Some((ctor, &substitution)), &inner);
    }

    /// Walk call arguments, hovering named-argument labels and passing each parameter's type as expected.
    pub(super) fn arguments(
        &mut self,
        args: &Arguments,
        callable: Option<(NodeId, &HashMap<String, String>)>,
        cx: &Cx,
    ) {
        let model = self.model();
        let params: Vec<NodeId> = callable
            .map(|(id, _)| model.node(id).parameters.clone())
            .unwrap_or_default();
        let positional: Vec<NodeId> = params
            .iter()
            .copied()
            .filter(|&p| model.node(p).parameter_kind != Some(ParameterKind::Named))
            .collect();
        let empty = HashMap::new();
        let substitution = callable.map(|(_, s)| s).unwrap_or(&empty);

        let mut index = 0;
        for arg in &args.args {
            let param = match &arg.node.name {
                Some(label) => {
                    let param = params.iter().copied().find(|&p| {
                        let node = model.node(p);
                        node.parameter_kind == Some(ParameterKind::Named) && node.name == label.node
                    });
                    if let Some(param) = param {
                        self.emit_node(label.span, param, substitution);
                    }
                    param
                }
                None => {
                    index += 1;
                    positional.get(index - 1).copied()
                }
            };
            let expected = param
                .and_then(|p| self.resolver.node_value_type(p))
                .map(|ty| type_text::substitute(&ty, substitution));
            self.expression(&arg.node.value, &cx.with_expected(expected));
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn collection(&mut self, literal: &CollectionLiteral, cx: &Cx) {
        for ty in &literal.type_args {
            self.type_annotation(ty, cx);
        }
        // Element context: explicit type arguments, else the arguments of the expected `List<E>` / `Map<K, V>`.
        let element_types: Vec<String> = if literal.type_args.is_empty() {
            cx.expected
                .as_deref()
                .map(type_text::non_nullable)
                .and_then(|ty| type_text::split_generic(&ty).map(|(_, args)| args))
                .unwrap_or_default()
        } else {
            literal.type_args.iter().map(|t| t.node.to_string()).collect()
        };
        let inner = cx.with_expected(None);
        for element in &literal.elements {
            self.collection_element(element, &element_types, &inner);
        }
    }

    /// `element_types` holds the element type, or the key and value types of a map.
    fn collection_element(&mut self, element: &Spanned<CollectionElement>, element_types: &[String], cx: &Cx) {
        match &element.node {
            CollectionElement::Expr(expr) => {
                let expected = match element_types {
                    [single] => Some(single.clone()),
                    _ => None,
                };
                self.expression(expr, &cx.with_expected(expected));
            }
            CollectionElement::Spread { expr, .. } => self.expression(expr, cx),
            CollectionElement::MapEntry { key, value } => {
                let (key_type, value_type) = match element_types {
                    [k, v] => (Some(k.clone()), Some(v.clone())),
                    _ => (None, None),
                };
                self.expression(key, &cx.with_expected(key_type));
                self.expression(value, &cx.with_expected(value_type));
            }
            CollectionElement::If {
                condition,
                then_element,
                else_element,
            } => {
                self.expression(condition, cx);
                self.collection_element(then_element, element_types, cx);
                if let Some(else_element) = else_element {
                    self.collection_element(else_element, element_types, cx);
                }
            }
            CollectionElement::For { parts, body, .. } => {
                let inner = match self.model().scope_at(element.span, ScopeKind::Block) {
                    Some(scope) => cx.with_scope(scope),
                    None => cx.clone(),
                };
                match parts {
                    ForLoopParts::Classic(classic) => self.classic_for(classic, &inner),
                    ForLoopParts::Each(each) => self.for_each(each, &inner),
                }
                self.collection_element(body, element_types, &inner);
            }
        }
    }

    // ========================================================================
    // Function literals
    // ========================================================================

    fn function_expr(&mut self, function: &FunctionExpr, span: Span, cx: &Cx) {
        let scope = self
            .model()
            .scope_at(span, ScopeKind::Function)
            .unwrap_or(cx.scope);
        if let Some(expected) = self.resolver.expected_function(cx.expected.as_deref(), cx.scope) {
            self.resolver.bind_lambda_params(function, scope, &expected);
        }
        let inner = cx.with_scope(scope).with_expected(None);
        self.type_parameters(&function.type_params, &inner);
        self.parameters(&function.params, &inner);
        self.function_body(&function.body, &inner);
    }
}
