//! Hovers for declarations, type annotations and parameter lists.

use std::collections::HashMap;

use hovermark_core::lang::keywords::KeywordId;

use crate::frontend::cst::*;
use crate::frontend::resolver::{Cx, ResolvedMember};
use crate::frontend::symbols::ScopeKind;

use super::HoverGenerator;

impl<'m, 'c> HoverGenerator<'m, 'c> {
    // ========================================================================
    // Top level
    // ========================================================================

    pub(super) fn declaration(&mut self, decl: &Spanned<Declaration>) {
        let root = Self::root_cx();
        match &decl.node {
            Declaration::Class(c) => {
                self.emit_declared(c.name.span);
                let cx = self.type_cx(decl.span);
                self.type_parameters(&c.type_params, &cx);
                for ty in c.extends.iter().chain(&c.with).chain(&c.implements) {
                    self.type_annotation(ty, &cx);
                }
                self.members(&c.members, &cx);
            }
            Declaration::Mixin(m) => {
                self.emit_declared(m.name.span);
                let cx = self.type_cx(decl.span);
                self.type_parameters(&m.type_params, &cx);
                for ty in m.on.iter().chain(&m.implements) {
                    self.type_annotation(ty, &cx);
                }
                self.members(&m.members, &cx);
            }
            Declaration::Extension(e) => {
                if let Some(name) = &e.name {
                    self.emit_declared(name.span);
                }
                let cx = self.type_cx(decl.span);
                self.type_parameters(&e.type_params, &cx);
                self.type_annotation(&e.on, &cx);
                self.members(&e.members, &cx);
            }
            Declaration::Enum(e) => self.enum_decl(e, decl.span),
            Declaration::Typedef(t) => {
                self.emit_declared(t.name.span);
                let scope = self
                    .model()
                    .scope_at(decl.span, ScopeKind::Function)
                    .unwrap_or(root.scope);
                let cx = root.with_scope(scope);
                self.type_parameters(&t.type_params, &cx);
                self.type_annotation(&t.aliased, &cx);
            }
            Declaration::Function(f) | Declaration::Getter(f) | Declaration::Setter(f) => {
                self.function_decl(f, decl.span, &root);
            }
            Declaration::Variable(v) => self.variable_decl(v, &root),
            Declaration::Statement(stmt) => self.statement(stmt, decl.span, &root),
        }
    }

    /// Context inside the member scope of the class-like declaration at `span`.
    fn type_cx(&self, span: Span) -> Cx {
        let root = Self::root_cx();
        match self.model().scope_at(span, ScopeKind::Class) {
            Some(scope) => root.with_scope(scope),
            None => root,
        }
    }

    fn enum_decl(&mut self, e: &EnumDecl, span: Span) {
        self.emit_declared(e.name.span);
        let cx = self.type_cx(span);
        self.type_parameters(&e.type_params, &cx);
        for ty in e.with.iter().chain(&e.implements) {
            self.type_annotation(ty, &cx);
        }
        let model = self.model();
        let enum_id = model.enclosing_type(cx.scope);
        for constant in &e.constants {
            let constant = &constant.node;
            self.emit_declared(constant.name.span);
            let ctor_name = constant.constructor.as_ref().map(|c| c.node.as_str());
            let ctor = enum_id.and_then(|id| model.constructor(id, ctor_name));
            if let (Some(ctor), Some(name)) = (ctor, &constant.constructor) {
                self.emit_node(name.span, ctor, &HashMap::new());
            }
            if let Some(args) = &constant.args {
                let empty = HashMap::new();
                self.arguments(args, ctor.map(|id| (id, &empty)), &cx.with_static(true));
            }
        }
        self.members(&e.members, &cx);
    }

    fn members(&mut self, members: &[Spanned<ClassMember>], cx: &Cx) {
        for member in members {
            match &member.node {
                ClassMember::Field(v) => {
                    let cx = cx.with_static(v.has_modifier(KeywordId::Static));
                    self.variable_decl(v, &cx);
                }
                ClassMember::Method(f) => self.function_decl(f, member.span, cx),
            }
        }
    }

    // ========================================================================
    // Callables
    // ========================================================================

    /// A function, method, accessor, operator or constructor declared at `span`.
    pub(super) fn function_decl(&mut self, f: &FunctionDecl, span: Span, cx: &Cx) {
        let model = self.model();
        let scope = [ScopeKind::Constructor, ScopeKind::Method, ScopeKind::Function]
            .into_iter()
            .find_map(|kind| model.scope_at(span, kind))
            .unwrap_or(cx.scope);
        let inner = cx
            .with_scope(scope)
            .with_static(cx.in_static || f.has_modifier(KeywordId::Static))
            .with_expected(None);

        if let Some(ret) = &f.return_type {
            self.type_annotation(ret, &inner);
        }
        self.emit_declared(f.name.span);
        self.type_parameters(&f.type_params, &inner);
        self.parameters(&f.params, &inner);
        for init in &f.initializers {
            self.initializer(&init.node, &inner);
        }
        if let Some(redirect) = &f.redirect {
            self.type_annotation(redirect, &inner);
        }
        self.function_body(&f.body, &inner);
    }

    fn initializer(&mut self, init: &Initializer, cx: &Cx) {
        match init {
            Initializer::Field { name, value } => {
                let model = self.model();
                let field = model
                    .enclosing_type(cx.scope)
                    .and_then(|class| model.lookup_local(model.node(class).scope, &name.node))
                    .map(|entry| entry.node);
                let expected = field.and_then(|id| self.resolver.node_value_type(id));
                if let Some(field) = field {
                    self.emit_node(name.span, field, &HashMap::new());
                }
                self.expression(value, &cx.with_expected(expected));
            }
            Initializer::Super { name, args } => {
                let target = self.resolver.super_type(cx);
                self.redirecting_call(target, name.as_ref(), args, cx);
            }
            Initializer::This { name, args } => {
                let target = self.resolver.this_type(&cx.with_static(false));
                self.redirecting_call(target, name.as_ref(), args, cx);
            }
            Initializer::Assert(args) => self.arguments(args, None, cx),
        }
    }

    /// `super(...)`, `super.named(...)`, `this(...)` and `this.named(...)` in an initializer list.
    fn redirecting_call(&mut self, target: Option<String>, name: Option<&Name>, args: &Arguments, cx: &Cx) {
        let member = target
            .and_then(|ty| self.resolver.class_of(&ty, cx.scope))
            .and_then(|(class, type_args)| {
                let ctor = self.model().constructor(class, name.map(|n| n.node.as_str()))?;
                Some(ResolvedMember::node(ctor, self.resolver.class_substitution(class, &type_args)))
            });
        let Some(member) = member else {
            self.arguments(args, None, cx);
            return;
        };
        if let Some(name) = name {
            self.emit_member(name.span, &member);
        }
        let ctor = member.node_id();
        self.arguments(args, ctor.map(|id| (id, &member.substitution)), cx);
    }

    /// Parameter declarations with their types and default values.
    pub(super) fn parameters(&mut self, params: &[Spanned<FormalParameter>], cx: &Cx) {
        for param in params {
            let p = &param.node;
            if let Some(ty) = &p.ty {
                self.type_annotation(ty, cx);
            }
            self.emit_declared(p.name.span);
            if let Some(default) = &p.default {
                let expected = self
                    .model()
                    .node_at(p.name.span)
                    .and_then(|id| self.resolver.node_value_type(id));
                self.expression(&default.value, &cx.with_expected(expected));
            }
        }
    }

    pub(super) fn type_parameters(&mut self, params: &[TypeParameter], cx: &Cx) {
        for param in params {
            self.emit_declared(param.name.span);
            if let Some(bound) = &param.bound {
                self.type_annotation(bound, cx);
            }
        }
    }

    pub(super) fn function_body(&mut self, body: &FunctionBody, cx: &Cx) {
        match &body.kind {
            // The body block shares the callable's scope.
            BodyKind::Block(block) => {
                for stmt in &block.node.statements {
                    self.statement(&stmt.node, stmt.span, cx);
                }
            }
            BodyKind::Expression(expr) => self.expression(expr, cx),
            BodyKind::Empty => {}
        }
    }

    // ========================================================================
    // Variables and types
    // ========================================================================

    pub(super) fn variable_decl(&mut self, v: &VariableDecl, cx: &Cx) {
        if let Some(ty) = &v.ty {
            self.type_annotation(ty, cx);
        }
        for declarator in &v.variables {
            self.emit_declared(declarator.name.span);
            if let Some(init) = &declarator.init {
                let expected = self
                    .model()
                    .node_at(declarator.name.span)
                    .and_then(|id| self.resolver.node_value_type(id));
                self.expression(init, &cx.with_expected(expected));
            }
        }
    }

    /// Hovers on the type names an annotation mentions.
    pub(super) fn type_annotation(&mut self, ty: &Spanned<TypeAnnotation>, cx: &Cx) {
        match &ty.node {
            TypeAnnotation::Named { name, args, .. } => {
                if let Some(last) = name.last() {
                    match self.model().lookup_type(cx.scope, &last.node) {
                        Some(id) => self.emit_node(last.span, id, &HashMap::new()),
                        None => tracing::trace!(name = %last.node, "unresolved type name"),
                    }
                }
                for arg in args {
                    self.type_annotation(arg, cx);
                }
            }
            TypeAnnotation::Function {
                return_type,
                type_params,
                params,
                ..
            } => {
                if let Some(ret) = return_type {
                    self.type_annotation(ret, cx);
                }
                for param in type_params {
                    if let Some(bound) = &param.bound {
                        self.type_annotation(bound, cx);
                    }
                }
                for param in params {
                    self.type_annotation(&param.ty, cx);
                }
            }
            TypeAnnotation::Record { positional, named, .. } => {
                for field in positional.iter().chain(named) {
                    self.type_annotation(&field.ty, cx);
                }
            }
        }
    }
}
