//! Symbol collection: CST to scope tree and semantic nodes.
//!
//! The collector walks a [`CompilationUnit`] once and fills a [`SemanticModel`]:
//!
//! - the file scope is seeded with the core library, then with host custom types, then with the snippet's own
//!   declarations (later definitions of a name replace earlier ones);
//! - classes, mixins, enums, extensions, typedefs and every callable introduce a child scope for their members,
//!   type parameters, parameters and locals; blocks, loops, catch clauses and switch cases introduce block scopes;
//! - scopes introduced by CST constructs are keyed by the construct's range so the hover pass can re-enter them.
//!
//! ## Notes
//! - Types that depend on other declarations are filled in after the walk, in document order: initializers of
//!   untyped variables, loop variables, expression-bodied functions without a return type, and `this.x` /
//!   `super.x` formals without a type. Snippets routinely use a class before declaring it, and constructors
//!   routinely come before the fields they initialize.
//! - Record literals and record type annotations get an anonymous [`ScopeKind::Record`] scope whose members are
//!   `$1`, `$2`, ... and the named fields.
//!
//! ## See also
//! - [`crate::frontend::resolver`] for the inference used by the deferred pass.

use std::collections::HashMap;

use hovermark_core::lang::keywords::{self, KeywordId};

use crate::custom_types::{
    self, CustomConstructor, CustomFunction, CustomType, CustomTypeDecl, MemberKind, MemberSpec, Parameter,
};
use crate::frontend::builtins;
use crate::frontend::cst::*;
use crate::frontend::resolver::{Cx, TypeResolver, wrap_async};
use crate::frontend::symbols::*;
use crate::frontend::type_text::{self, DYNAMIC};

/// Collect symbols with the core library seeded.
pub fn collect(unit: &CompilationUnit, custom: &[CustomTypeDecl]) -> SemanticModel {
    collect_with(unit, custom, true)
}

/// Collect symbols, optionally without the core library.
#[tracing::instrument(skip_all, fields(declarations = unit.declarations.len(), custom = custom.len()))]
pub fn collect_with(unit: &CompilationUnit, custom: &[CustomTypeDecl], seed_core: bool) -> SemanticModel {
    let mut collector = Collector::new();
    if seed_core {
        for decl in builtins::core_declarations() {
            collector.inject(&decl);
        }
    }
    for decl in custom {
        collector.inject(decl);
    }
    for decl in &unit.declarations {
        collector.declaration(decl);
    }
    let model = collector.finish();
    tracing::debug!(
        nodes = model.nodes().len(),
        scopes = model.scope_count(),
        "collected symbols"
    );
    model
}

/// Work whose result depends on declarations that may come later in the snippet.
enum Deferred<'a> {
    Initializer {
        node: NodeId,
        scope: ScopeId,
        expr: &'a Spanned<Expr>,
    },
    LoopVariable {
        node: NodeId,
        scope: ScopeId,
        iterable: &'a Spanned<Expr>,
        is_await: bool,
    },
    ReturnType {
        node: NodeId,
        scope: ScopeId,
        body: &'a Spanned<Expr>,
        marker: AsyncMarker,
    },
    RecordLiteral {
        scope: ScopeId,
        expr: &'a Spanned<Expr>,
    },
}

impl<'a> Deferred<'a> {
    /// The expression whose type the item is computed from.
    fn source(&self) -> &'a Spanned<Expr> {
        match *self {
            Deferred::Initializer { expr, .. } | Deferred::RecordLiteral { expr, .. } => expr,
            Deferred::LoopVariable { iterable, .. } => iterable,
            Deferred::ReturnType { body, .. } => body,
        }
    }
}

/// A `this.x` / `super.x` formal without a type.
struct PendingFormal {
    node: NodeId,
    class: NodeId,
    prefix: ParameterPrefix,
}

struct Collector<'a> {
    model: SemanticModel,
    scope: ScopeId,
    deferred: Vec<Deferred<'a>>,
    formals: Vec<PendingFormal>,
}

impl<'a> Collector<'a> {
    fn new() -> Self {
        Self {
            model: SemanticModel::new(),
            scope: ROOT_SCOPE,
            deferred: Vec::new(),
            formals: Vec::new(),
        }
    }

    /// Run `f` with `scope` as the current scope.
    fn within<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }

    // ========================================================================
    // Custom and core declarations
    // ========================================================================

    fn inject(&mut self, decl: &CustomTypeDecl) {
        match decl {
            CustomTypeDecl::Type(t) => self.inject_type(t),
            CustomTypeDecl::Function(f) => self.inject_function(f),
        }
    }

    fn inject_type(&mut self, t: &CustomType) {
        let scope = self.model.add_scope(ROOT_SCOPE, ScopeKind::Class, Span::default());
        let mut node = Node::new(NodeKind::Class, &t.name, Span::default(), scope);
        node.type_parameters = t.type_parameters.clone();
        node.extends_types = t.extends.iter().cloned().collect();
        node.implements_types = t.implements.clone();
        node.documentation = t.description.clone();
        node.package = t.package.clone();
        let class = self.model.define(ROOT_SCOPE, node);
        self.model.set_owner(scope, class);

        for param in &t.type_parameters {
            self.define_type_parameter(scope, param, Span::default());
        }
        for (name, spec) in &t.members {
            self.inject_member(scope, t, name, spec, false);
        }
        for (name, spec) in &t.static_members {
            self.inject_member(scope, t, name, spec, true);
        }
        for ctor in &t.constructors {
            self.inject_constructor(scope, t, ctor);
        }
    }

    fn inject_member(&mut self, class_scope: ScopeId, t: &CustomType, name: &str, spec: &MemberSpec, is_static: bool) {
        let kind = match spec.kind() {
            MemberKind::Method => NodeKind::Method,
            MemberKind::Getter => NodeKind::Getter,
            MemberKind::Field => NodeKind::Field,
            MemberKind::Operator => NodeKind::Operator,
        };
        let mut node = Node::new(kind, name, Span::default(), class_scope);
        node.ty = Some(spec.ty().to_string());
        node.nullable = spec.ty().ends_with('?');
        node.parent_class = Some(t.name.clone());
        node.documentation = spec.description().map(str::to_string);
        node.package = t.package.clone();
        if is_static {
            node.modifiers.push("static".to_string());
        }
        if kind.is_callable() {
            let scope = self.model.add_scope(class_scope, ScopeKind::Method, Span::default());
            node.scope = scope;
            node.type_parameters = spec.type_parameters().to_vec();
            for param in spec.type_parameters() {
                self.define_type_parameter(scope, param, Span::default());
            }
            node.parameters = self.inject_parameters(scope, spec.parameters());
            let id = self.model.define(class_scope, node);
            self.model.set_owner(scope, id);
        } else {
            self.model.define(class_scope, node);
        }
    }

    fn inject_constructor(&mut self, class_scope: ScopeId, t: &CustomType, ctor: &CustomConstructor) {
        let scope = self.model.add_scope(class_scope, ScopeKind::Constructor, Span::default());
        let name = match &ctor.name {
            Some(named) => format!("{}.{}", t.name, named),
            None => t.name.clone(),
        };
        let mut node = Node::new(NodeKind::Constructor, name, Span::default(), scope);
        node.ty = Some(type_text::parameterized(
            &t.name,
            t.type_parameters.iter().map(|p| p.split_whitespace().next().unwrap_or(p.as_str())),
        ));
        node.parent_class = Some(t.name.clone());
        node.documentation = ctor.description.clone();
        node.package = t.package.clone();
        node.type_parameters = ctor.type_parameters.clone();
        for param in &ctor.type_parameters {
            self.define_type_parameter(scope, param, Span::default());
        }
        node.parameters = self.inject_parameters(scope, &ctor.parameters);
        let id = self.model.define(class_scope, node);
        self.model.set_owner(scope, id);
    }

    fn inject_function(&mut self, f: &CustomFunction) {
        let scope = self.model.add_scope(ROOT_SCOPE, ScopeKind::Function, Span::default());
        let mut node = Node::new(NodeKind::Function, &f.name, Span::default(), scope);
        node.ty = Some(f.return_type.clone());
        node.documentation = f.description.clone();
        node.package = f.package.clone();
        node.type_parameters = f.type_parameters.clone();
        for param in &f.type_parameters {
            self.define_type_parameter(scope, param, Span::default());
        }
        node.parameters = self.inject_parameters(scope, &f.parameters);
        let id = self.model.define(ROOT_SCOPE, node);
        self.model.set_owner(scope, id);
    }

    fn inject_parameters(&mut self, scope: ScopeId, params: &[Parameter]) -> Vec<NodeId> {
        params
            .iter()
            .map(|p| {
                let mut node = Node::new(NodeKind::Parameter, &p.name, Span::default(), scope);
                node.ty = Some(p.ty.clone());
                node.nullable = p.ty.ends_with('?');
                node.parameter_kind = Some(match p.kind {
                    custom_types::ParameterKind::Positional => ParameterKind::Positional,
                    custom_types::ParameterKind::OptionalPositional => ParameterKind::OptionalPositional,
                    custom_types::ParameterKind::Named => ParameterKind::Named,
                });
                node.required = p.is_required();
                node.default_value = p.default_value.clone();
                node.documentation = p.description.clone();
                self.model.define(scope, node)
            })
            .collect()
    }

    /// Define `T` or `T extends Bound` in `scope`.
    fn define_type_parameter(&mut self, scope: ScopeId, text: &str, range: Span) -> NodeId {
        let (name, bound) = match text.split_once(" extends ") {
            Some((name, bound)) => (name.trim(), Some(bound.trim().to_string())),
            None => (text.trim(), None),
        };
        let mut node = Node::new(NodeKind::TypeParameter, name, range, scope);
        node.ty = bound;
        self.model.define(scope, node)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self, decl: &'a Spanned<Declaration>) {
        let span = decl.span;
        match &decl.node {
            Declaration::Class(c) => self.class_decl(c, span),
            Declaration::Mixin(m) => self.mixin_decl(m, span),
            Declaration::Extension(e) => self.extension_decl(e, span),
            Declaration::Enum(e) => self.enum_decl(e, span),
            Declaration::Typedef(t) => self.typedef_decl(t, span),
            Declaration::Function(f) | Declaration::Getter(f) | Declaration::Setter(f) => {
                self.function_decl(f, span, None);
            }
            Declaration::Variable(v) => self.variable_decl(v, NodeKind::Variable, None),
            Declaration::Statement(stmt) => self.statement(stmt, span),
        }
    }

    /// Define a class-like node and its member scope; returns `(node, scope)`.
    fn open_type(&mut self, mut node: Node, span: Span, type_params: &'a [TypeParameter]) -> (NodeId, ScopeId) {
        let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Class, span);
        node.scope = scope;
        node.type_parameters = type_parameter_texts(type_params);
        let id = self.model.define(self.scope, node);
        self.model.set_owner(scope, id);
        self.within(scope, |this| this.type_parameters(type_params));
        (id, scope)
    }

    fn class_decl(&mut self, c: &'a ClassDecl, span: Span) {
        let mut node = Node::new(NodeKind::Class, &c.name.node, c.name.span, ROOT_SCOPE);
        node.modifiers = modifier_texts(&c.modifiers);
        node.extends_types = c.extends.iter().map(|t| self.annotation(t)).collect();
        node.implements_types = c.implements.iter().map(|t| self.annotation(t)).collect();
        node.mixins = c.with.iter().map(|t| self.annotation(t)).collect();
        node.documentation = c.doc.clone();
        let (id, scope) = self.open_type(node, span, &c.type_params);
        self.within(scope, |this| this.members(&c.members, id));
    }

    fn mixin_decl(&mut self, m: &'a MixinDecl, span: Span) {
        let mut node = Node::new(NodeKind::Mixin, &m.name.node, m.name.span, ROOT_SCOPE);
        node.modifiers = modifier_texts(&m.modifiers);
        node.extends_types = m.on.iter().map(|t| self.annotation(t)).collect();
        node.implements_types = m.implements.iter().map(|t| self.annotation(t)).collect();
        node.documentation = m.doc.clone();
        let (id, scope) = self.open_type(node, span, &m.type_params);
        self.within(scope, |this| this.members(&m.members, id));
    }

    fn extension_decl(&mut self, e: &'a ExtensionDecl, span: Span) {
        let (name, range) = match &e.name {
            Some(name) => (name.node.clone(), name.span),
            None => (String::new(), Span::default()),
        };
        let mut node = Node::new(NodeKind::Extension, name, range, ROOT_SCOPE);
        node.ty = Some(self.annotation(&e.on));
        node.documentation = e.doc.clone();
        let (id, scope) = self.open_type(node, span, &e.type_params);
        self.within(scope, |this| this.members(&e.members, id));
    }

    fn enum_decl(&mut self, e: &'a EnumDecl, span: Span) {
        let mut node = Node::new(NodeKind::Enum, &e.name.node, e.name.span, ROOT_SCOPE);
        node.implements_types = e.implements.iter().map(|t| self.annotation(t)).collect();
        node.mixins = e.with.iter().map(|t| self.annotation(t)).collect();
        node.documentation = e.doc.clone();
        let (id, scope) = self.open_type(node, span, &e.type_params);
        let enum_type = self.model.node(id).self_type();

        // Implicit members; user members declared below replace them.
        let synthetic = [
            (NodeKind::Field, "values", format!("List<{enum_type}>"), true),
            (NodeKind::Getter, "index", "int".to_string(), false),
            (NodeKind::Getter, "name", "String".to_string(), false),
        ];
        for (kind, name, ty, is_static) in synthetic {
            let mut member = Node::new(kind, name, Span::default(), scope);
            member.ty = Some(ty);
            member.parent_class = Some(e.name.node.clone());
            if is_static {
                member.modifiers = vec!["static".to_string(), "const".to_string()];
            }
            self.model.define(scope, member);
        }

        for constant in &e.constants {
            let mut member = Node::new(NodeKind::EnumConstant, &constant.node.name.node, constant.node.name.span, scope);
            member.ty = Some(enum_type.clone());
            member.parent_class = Some(e.name.node.clone());
            member.modifiers = vec!["static".to_string(), "const".to_string()];
            member.documentation = constant.node.doc.clone();
            self.model.define(scope, member);
            if let Some(args) = &constant.node.args {
                self.within(scope, |this| this.arguments(args));
            }
        }
        self.within(scope, |this| this.members(&e.members, id));
    }

    fn typedef_decl(&mut self, t: &'a TypedefDecl, span: Span) {
        let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Function, span);
        let mut node = Node::new(NodeKind::Typedef, &t.name.node, t.name.span, scope);
        node.ty = Some(self.annotation(&t.aliased));
        node.type_parameters = type_parameter_texts(&t.type_params);
        node.documentation = t.doc.clone();
        let id = self.model.define(self.scope, node);
        self.model.set_owner(scope, id);
        self.within(scope, |this| this.type_parameters(&t.type_params));
    }

    fn type_parameters(&mut self, params: &'a [TypeParameter]) {
        for param in params {
            let text = type_parameter_text(param);
            if let Some(bound) = &param.bound {
                self.annotation(bound);
            }
            self.define_type_parameter(self.scope, &text, param.name.span);
        }
    }

    fn members(&mut self, members: &'a [Spanned<ClassMember>], owner: NodeId) {
        for member in members {
            match &member.node {
                ClassMember::Field(v) => self.variable_decl(v, NodeKind::Field, Some(owner)),
                ClassMember::Method(f) => self.function_decl(f, member.span, Some(owner)),
            }
        }
    }

    /// Collect a function, method, accessor, operator or constructor declared at `span`.
    fn function_decl(&mut self, f: &'a FunctionDecl, span: Span, owner: Option<NodeId>) {
        let owner_node = owner.map(|id| self.model.node(id).clone());
        let class_name = owner_node
            .as_ref()
            .filter(|n| n.kind.is_class_like())
            .map(|n| n.name.clone());
        let is_constructor = class_name.as_ref().is_some_and(|class| {
            matches!(f.kind, FunctionKind::Method | FunctionKind::Function)
                && (f.name.node == *class || f.name.node.starts_with(&format!("{class}.")))
        });
        let kind = match f.kind {
            _ if is_constructor => NodeKind::Constructor,
            FunctionKind::Getter => NodeKind::Getter,
            FunctionKind::Setter => NodeKind::Setter,
            FunctionKind::Operator => NodeKind::Operator,
            FunctionKind::Method if owner.is_some() => NodeKind::Method,
            FunctionKind::Method | FunctionKind::Function => NodeKind::Function,
        };
        let scope_kind = match kind {
            NodeKind::Constructor => ScopeKind::Constructor,
            NodeKind::Function => ScopeKind::Function,
            _ => ScopeKind::Method,
        };
        let scope = self.model.add_keyed_scope(self.scope, scope_kind, span);

        let mut node = Node::new(kind, &f.name.node, f.name.span, scope);
        node.modifiers = modifier_texts(&f.modifiers);
        node.documentation = f.doc.clone();
        node.type_parameters = type_parameter_texts(&f.type_params);
        node.parent_class = owner_node.as_ref().map(|n| match n.kind {
            NodeKind::Extension if n.name.is_empty() => n.ty.clone().unwrap_or_default(),
            _ => n.name.clone(),
        });
        node.ty = match (kind, &f.return_type) {
            (NodeKind::Constructor, _) => owner_node
                .as_ref()
                .map(Node::self_type),
            (NodeKind::Setter, None) => Some("void".to_string()),
            (_, Some(ret)) => Some(self.annotation(ret)),
            (_, None) => None,
        };
        let id = self.model.define(self.scope, node);
        self.model.set_owner(scope, id);

        self.within(scope, |this| {
            this.type_parameters(&f.type_params);
            let class = owner.filter(|_| kind == NodeKind::Constructor);
            let params = this.parameters(&f.params, class);
            this.model.node_mut(id).parameters = params;
            for init in &f.initializers {
                match &init.node {
                    Initializer::Field { value, .. } => this.expression(value),
                    Initializer::Super { args, .. } | Initializer::This { args, .. } | Initializer::Assert(args) => {
                        this.arguments(args)
                    }
                }
            }
            if let Some(redirect) = &f.redirect {
                this.annotation(redirect);
            }
            this.function_body(&f.body);
        });

        let infers_return = f.return_type.is_none()
            && matches!(kind, NodeKind::Function | NodeKind::Method | NodeKind::Getter | NodeKind::Operator);
        if let (true, BodyKind::Expression(body)) = (infers_return, &f.body.kind) {
            self.deferred.push(Deferred::ReturnType {
                node: id,
                scope,
                body,
                marker: f.body.marker,
            });
        }
    }

    /// Collect formal parameters into the current scope, in order.
    ///
    /// `class` is the enclosing class of a constructor; untyped `this.x` / `super.x` formals are queued for type
    /// back-fill against it.
    fn parameters(&mut self, params: &'a [Spanned<FormalParameter>], class: Option<NodeId>) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(params.len());
        for param in params {
            let p = &param.node;
            let mut node = Node::new(NodeKind::Parameter, &p.name.node, p.name.span, self.scope);
            node.ty = p.ty.as_ref().map(|t| self.annotation(t));
            node.nullable = p.ty.as_ref().is_some_and(|t| t.node.is_nullable());
            node.modifiers = modifier_texts(&p.modifiers);
            node.parameter_kind = Some(p.kind);
            node.required = p.required || p.kind == ParameterKind::Positional;
            if let Some(default) = &p.default {
                node.default_value = Some(default.text.clone());
                node.default_range = Some(default.value.span);
                self.expression(&default.value);
            }
            let id = self.model.define(self.scope, node);
            match class {
                Some(class) if p.ty.is_none() && p.prefix != ParameterPrefix::None => {
                    self.formals.push(PendingFormal {
                        node: id,
                        class,
                        prefix: p.prefix,
                    });
                }
                _ => {}
            }
            ids.push(id);
        }
        ids
    }

    fn variable_decl(&mut self, v: &'a VariableDecl, kind: NodeKind, owner: Option<NodeId>) {
        let declared = v.ty.as_ref().map(|t| self.annotation(t));
        let parent_class = owner.map(|id| self.model.node(id).name.clone());
        for declarator in &v.variables {
            let mut node = Node::new(kind, &declarator.name.node, declarator.name.span, self.scope);
            node.ty = declared.clone();
            node.nullable = v.ty.as_ref().is_some_and(|t| t.node.is_nullable());
            node.modifiers = modifier_texts(&v.modifiers);
            node.documentation = v.doc.clone();
            node.parent_class = parent_class.clone();
            let id = self.model.define(self.scope, node);
            if let Some(init) = &declarator.init {
                if declared.is_none() {
                    self.deferred.push(Deferred::Initializer {
                        node: id,
                        scope: self.scope,
                        expr: init,
                    });
                }
                self.expression(init);
            }
        }
    }

    /// Render a type annotation, registering any record types it mentions.
    fn annotation(&mut self, ty: &Spanned<TypeAnnotation>) -> String {
        self.register_records(&ty.node);
        ty.node.to_string()
    }

    fn register_records(&mut self, ty: &TypeAnnotation) {
        match ty {
            TypeAnnotation::Named { args, .. } => {
                for arg in args {
                    self.register_records(&arg.node);
                }
            }
            TypeAnnotation::Function {
                return_type, params, ..
            } => {
                if let Some(ret) = return_type {
                    self.register_records(&ret.node);
                }
                for param in params {
                    self.register_records(&param.ty.node);
                }
            }
            TypeAnnotation::Record { positional, named, .. } => {
                for field in positional.iter().chain(named) {
                    self.register_records(&field.ty.node);
                }
                self.record_scope(&type_text::non_nullable(&ty.to_string()));
            }
        }
    }

    /// The anonymous scope of a record type, created on first use.
    fn record_scope(&mut self, type_text: &str) -> Option<ScopeId> {
        if let Some(scope) = self.model.record_scope(type_text) {
            return Some(scope);
        }
        let record = type_text::record_parts(type_text)?;
        let scope = self.model.add_scope(ROOT_SCOPE, ScopeKind::Record, Span::default());
        let fields = record
            .positional
            .iter()
            .enumerate()
            .map(|(i, ty)| (format!("${}", i + 1), ty.clone()))
            .chain(record.named.iter().map(|(ty, name)| (name.clone(), ty.clone())));
        for (name, ty) in fields {
            let mut field = Node::new(NodeKind::Field, name, Span::default(), scope);
            field.nullable = ty.ends_with('?');
            field.ty = Some(ty);
            field.parent_class = Some(type_text.to_string());
            self.model.define(scope, field);
        }
        self.model.register_record(type_text.to_string(), scope);
        tracing::trace!(record = type_text, "registered record scope");
        Some(scope)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn function_body(&mut self, body: &'a FunctionBody) {
        match &body.kind {
            // The body block shares the callable's scope.
            BodyKind::Block(block) => {
                for stmt in &block.node.statements {
                    self.statement(&stmt.node, stmt.span);
                }
            }
            BodyKind::Expression(expr) => self.expression(expr),
            BodyKind::Empty => {}
        }
    }

    fn block(&mut self, block: &'a Spanned<Block>) {
        let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, block.span);
        self.within(scope, |this| {
            for stmt in &block.node.statements {
                this.statement(&stmt.node, stmt.span);
            }
        });
    }

    fn statement(&mut self, stmt: &'a Stmt, span: Span) {
        match stmt {
            Stmt::VarDecl(v) => self.variable_decl(v, NodeKind::Variable, None),
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.expression(expr),
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.expression(expr);
                }
            }
            Stmt::Yield { value, .. } => self.expression(value),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expression(condition);
                self.statement(&then_branch.node, then_branch.span);
                if let Some(else_branch) = else_branch {
                    self.statement(&else_branch.node, else_branch.span);
                }
            }
            Stmt::For { parts, body } => {
                let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, span);
                self.within(scope, |this| {
                    this.classic_for(parts);
                    this.statement(&body.node, body.span);
                });
            }
            Stmt::ForIn { is_await, parts, body } => {
                let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, span);
                self.within(scope, |this| {
                    this.for_each(parts, *is_await);
                    this.statement(&body.node, body.span);
                });
            }
            Stmt::While { condition, body } | Stmt::DoWhile { body, condition } => {
                self.expression(condition);
                self.statement(&body.node, body.span);
            }
            Stmt::Switch { subject, cases } => {
                self.expression(subject);
                for case in cases {
                    let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, case.span);
                    self.within(scope, |this| {
                        for pattern in &case.node.patterns {
                            this.expression(pattern);
                        }
                        if let Some(guard) = &case.node.guard {
                            this.expression(guard);
                        }
                        for stmt in &case.node.body {
                            this.statement(&stmt.node, stmt.span);
                        }
                    });
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.block(body);
                for clause in catches {
                    let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, clause.span);
                    self.within(scope, |this| this.catch_clause(&clause.node));
                }
                if let Some(finally) = finally {
                    self.block(finally);
                }
            }
            Stmt::Block(block) => {
                let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, span);
                self.within(scope, |this| {
                    for stmt in &block.statements {
                        this.statement(&stmt.node, stmt.span);
                    }
                });
            }
            Stmt::LocalFunction(f) => self.function_decl(f, span, None),
            Stmt::Assert(args) => self.arguments(args),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Rethrow | Stmt::Empty => {}
        }
    }

    fn catch_clause(&mut self, clause: &'a CatchClause) {
        let on = clause.on.as_ref().map(|t| self.annotation(t));
        if let Some(name) = &clause.exception {
            let mut node = Node::new(NodeKind::Variable, &name.node, name.span, self.scope);
            node.ty = Some(on.unwrap_or_else(|| "Object".to_string()));
            node.modifiers = vec!["final".to_string()];
            self.model.define(self.scope, node);
        }
        if let Some(name) = &clause.stack_trace {
            let mut node = Node::new(NodeKind::Variable, &name.node, name.span, self.scope);
            node.ty = Some("StackTrace".to_string());
            node.modifiers = vec!["final".to_string()];
            self.model.define(self.scope, node);
        }
        self.block(&clause.body);
    }

    fn classic_for(&mut self, parts: &'a ClassicFor) {
        match &parts.init {
            Some(ForInit::Declaration(v)) => self.variable_decl(v, NodeKind::Variable, None),
            Some(ForInit::Expressions(exprs)) => {
                for expr in exprs {
                    self.expression(expr);
                }
            }
            None => {}
        }
        if let Some(condition) = &parts.condition {
            self.expression(condition);
        }
        for update in &parts.updates {
            self.expression(update);
        }
    }

    fn for_each(&mut self, parts: &'a ForEachParts, is_await: bool) {
        self.expression(&parts.iterable);
        let Some((modifiers, ty)) = &parts.declaration else {
            return;
        };
        let mut node = Node::new(NodeKind::Variable, &parts.name.node, parts.name.span, self.scope);
        node.modifiers = modifier_texts(modifiers);
        node.ty = ty.as_ref().map(|t| self.annotation(t));
        node.nullable = ty.as_ref().is_some_and(|t| t.node.is_nullable());
        let untyped = node.ty.is_none();
        let id = self.model.define(self.scope, node);
        if untyped {
            self.deferred.push(Deferred::LoopVariable {
                node: id,
                scope: self.scope,
                iterable: &parts.iterable,
                is_await,
            });
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn arguments(&mut self, args: &'a Arguments) {
        for arg in &args.args {
            self.expression(&arg.node.value);
        }
    }

    /// Walk an expression for the scopes and records it introduces.
    fn expression(&mut self, expr: &'a Spanned<Expr>) {
        match &expr.node {
            Expr::Function(function) => {
                let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Function, expr.span);
                self.within(scope, |this| {
                    this.type_parameters(&function.type_params);
                    this.parameters(&function.params, None);
                    this.function_body(&function.body);
                });
            }
            Expr::Record { fields, .. } => {
                for field in fields {
                    self.expression(&field.value);
                }
                self.deferred.push(Deferred::RecordLiteral { scope: self.scope, expr });
            }
            Expr::String(literal) => {
                for part in &literal.interpolations {
                    self.expression(part);
                }
            }
            Expr::List(collection) | Expr::SetOrMap(collection) => {
                for ty in &collection.type_args {
                    self.annotation(ty);
                }
                for element in &collection.elements {
                    self.collection_element(element);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expression(left);
                self.expression(right);
            }
            Expr::Unary { operand, .. } | Expr::Postfix { operand, .. } => self.expression(operand),
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                self.expression(condition);
                self.expression(then_expr);
                self.expression(else_expr);
            }
            Expr::Cascade { target, sections } => {
                self.expression(target);
                for section in sections {
                    self.expression(section);
                }
            }
            Expr::TypeTest { expr, ty, .. } | Expr::AsCast { expr, ty } => {
                self.expression(expr);
                self.annotation(ty);
            }
            Expr::PropertyAccess { target, .. } => self.expression(target),
            Expr::MethodInvocation {
                target,
                type_args,
                args,
                ..
            } => {
                if let Some(target) = target {
                    self.expression(target);
                }
                for ty in type_args {
                    self.annotation(ty);
                }
                self.arguments(args);
            }
            Expr::FunctionCall {
                callee,
                type_args,
                args,
            } => {
                self.expression(callee);
                for ty in type_args {
                    self.annotation(ty);
                }
                self.arguments(args);
            }
            Expr::Index { target, index, .. } => {
                self.expression(target);
                self.expression(index);
            }
            Expr::Assignment { target, value, .. } => {
                self.expression(target);
                self.expression(value);
            }
            Expr::InstanceCreation { ty, args, .. } => {
                self.annotation(ty);
                self.arguments(args);
            }
            Expr::TypeInstantiation { type_args, .. } => {
                for ty in type_args {
                    self.annotation(ty);
                }
            }
            Expr::Throw(inner) | Expr::Await(inner) | Expr::Paren(inner) => self.expression(inner),
            Expr::Identifier(_)
            | Expr::This
            | Expr::Super
            | Expr::Null
            | Expr::Bool(_)
            | Expr::Number(_)
            | Expr::Symbol(_)
            | Expr::CascadeReceiver { .. } => {}
        }
    }

    fn collection_element(&mut self, element: &'a Spanned<CollectionElement>) {
        match &element.node {
            CollectionElement::Expr(expr) | CollectionElement::Spread { expr, .. } => self.expression(expr),
            CollectionElement::MapEntry { key, value } => {
                self.expression(key);
                self.expression(value);
            }
            CollectionElement::If {
                condition,
                then_element,
                else_element,
            } => {
                self.expression(condition);
                self.collection_element(then_element);
                if let Some(else_element) = else_element {
                    self.collection_element(else_element);
                }
            }
            CollectionElement::For { is_await, parts, body } => {
                let scope = self.model.add_keyed_scope(self.scope, ScopeKind::Block, element.span);
                self.within(scope, |this| {
                    match parts {
                        ForLoopParts::Classic(classic) => this.classic_for(classic),
                        ForLoopParts::Each(each) => this.for_each(each, *is_await),
                    }
                    this.collection_element(body);
                });
            }
        }
    }

    // ========================================================================
    // Deferred types
    // ========================================================================

    fn finish(mut self) -> SemanticModel {
        // Formals whose field carries an explicit type are known now; the rest may depend on initializers.
        let mut formals = std::mem::take(&mut self.formals);
        formals.retain(|formal| !self.back_fill_formal(formal));

        // Items nested inside another item's expression end first, so they are typed before their container.
        let mut deferred = std::mem::take(&mut self.deferred);
        deferred.sort_by_key(|item| item.source().span.end);

        for item in deferred {
            match item {
                Deferred::Initializer { node, scope, expr } => {
                    let ty = TypeResolver::new(&self.model).infer(expr, &Cx::new(scope));
                    let node = self.model.node_mut(node);
                    node.nullable = ty.ends_with('?');
                    node.ty = Some(ty);
                }
                Deferred::LoopVariable {
                    node,
                    scope,
                    iterable,
                    is_await,
                } => {
                    let ty = {
                        let mut resolver = TypeResolver::new(&self.model);
                        let iterable_type = resolver.infer(iterable, &Cx::new(scope));
                        resolver.element_type(&iterable_type, is_await)
                    };
                    self.model.node_mut(node).ty = Some(ty.unwrap_or_else(|| DYNAMIC.to_string()));
                }
                Deferred::ReturnType {
                    node,
                    scope,
                    body,
                    marker,
                } => {
                    let ty = TypeResolver::new(&self.model).infer(body, &Cx::new(scope));
                    self.model.node_mut(node).ty = Some(wrap_async(ty, marker));
                }
                Deferred::RecordLiteral { scope, expr } => {
                    let ty = TypeResolver::new(&self.model).infer(expr, &Cx::new(scope));
                    self.record_scope(&type_text::non_nullable(&ty));
                }
            }
        }

        for formal in &formals {
            self.back_fill_formal(formal);
        }
        self.model
    }

    /// Type an untyped `this.x` / `super.x` formal from the field (or super constructor parameter) it forwards to.
    ///
    /// ## Returns
    /// `true` if a type was found.
    fn back_fill_formal(&mut self, formal: &PendingFormal) -> bool {
        let name = self.model.node(formal.node).name.clone();
        let class = self.model.node(formal.class);
        let ty = match formal.prefix {
            ParameterPrefix::This => field_type(&self.model, formal.class, &name),
            ParameterPrefix::Super => {
                let Some(super_type) = class.extends_types.first() else {
                    return false;
                };
                let Some((base, args)) = type_text::split_generic(super_type) else {
                    return false;
                };
                let Some(super_class) = self.model.lookup_type(ROOT_SCOPE, base) else {
                    return false;
                };
                let from_constructor = self.model.constructor(super_class, None).and_then(|ctor| {
                    self.model
                        .parameters(ctor)
                        .find(|p| p.name == name)
                        .and_then(|p| p.ty.clone())
                });
                let declared = from_constructor.or_else(|| field_type(&self.model, super_class, &name));
                let params: Vec<String> = self
                    .model
                    .node(super_class)
                    .type_parameter_names()
                    .map(str::to_string)
                    .collect();
                let map: HashMap<String, String> = params.into_iter().zip(args).collect();
                declared.map(|ty| type_text::substitute(&ty, &map))
            }
            ParameterPrefix::None => None,
        };
        match ty {
            Some(ty) => {
                let node = self.model.node_mut(formal.node);
                node.nullable = ty.ends_with('?');
                node.ty = Some(ty);
                true
            }
            None => false,
        }
    }
}

/// Declared type of a field or getter in `class`.
fn field_type(model: &SemanticModel, class: NodeId, name: &str) -> Option<String> {
    let scope = model.node(class).scope;
    let entry = model.lookup_local(scope, name)?;
    let node = model.node(entry.node);
    match node.kind {
        NodeKind::Field | NodeKind::Getter => node.ty.clone(),
        _ => None,
    }
}

fn modifier_texts(modifiers: &[KeywordId]) -> Vec<String> {
    modifiers.iter().map(|m| keywords::as_str(*m).to_string()).collect()
}

fn type_parameter_text(param: &TypeParameter) -> String {
    match &param.bound {
        Some(bound) => format!("{} extends {}", param.name.node, bound.node),
        None => param.name.node.clone(),
    }
}

fn type_parameter_texts(params: &[TypeParameter]) -> Vec<String> {
    params.iter().map(type_parameter_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser;

    fn collect_str(source: &str) -> SemanticModel {
        let outcome = parser::parse_source(source);
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        collect(&outcome.unit, &[])
    }

    fn ty_of(model: &SemanticModel, scope: ScopeId, name: &str) -> Option<String> {
        let entry = model.lookup(scope, name).unwrap();
        model.node(entry.node).ty.clone()
    }

    #[test]
    fn test_core_library_is_seeded() {
        let model = collect_str("");
        let list = model.class_named("List").unwrap();
        assert_eq!(model.node(list).type_parameters, vec!["E"]);
        assert!(model.lookup(ROOT_SCOPE, "print").is_some());
    }

    #[test]
    fn test_class_members_and_constructor_detection() {
        let model = collect_str(
            "class Point { final int x; Point(this.x); Point.origin() : x = 0; int get doubled => x * 2; void move() {} }",
        );
        let point = model.class_named("Point").unwrap();
        let scope = model.node(point).scope;
        assert_eq!(model.lookup_local(scope, "Point").unwrap().kind, SymbolKind::Constructor);
        assert_eq!(model.lookup_local(scope, "Point.origin").unwrap().kind, SymbolKind::Constructor);
        assert_eq!(model.lookup_local(scope, "doubled").unwrap().kind, SymbolKind::Accessor);
        assert_eq!(model.lookup_local(scope, "move").unwrap().kind, SymbolKind::Method);
        assert_eq!(model.lookup_local(scope, "x").unwrap().kind, SymbolKind::Field);
    }

    #[test]
    fn test_this_formal_takes_field_type_declared_later() {
        let model = collect_str("class Box { Box(this.value, {this.label}); final List<int> value; String? label; }");
        let ctor = model.constructor(model.class_named("Box").unwrap(), None).unwrap();
        let params: Vec<_> = model.parameters(ctor).collect();
        assert_eq!(params[0].ty.as_deref(), Some("List<int>"));
        assert_eq!(params[1].ty.as_deref(), Some("String?"));
        assert_eq!(params[1].parameter_kind, Some(ParameterKind::Named));
        assert!(params[1].nullable);
    }

    #[test]
    fn test_super_formal_uses_superclass_constructor() {
        let model = collect_str(
            "class Base<T> { Base(this.item); final T item; } class Child extends Base<String> { Child(super.item); }",
        );
        let ctor = model.constructor(model.class_named("Child").unwrap(), None).unwrap();
        let param = model.parameters(ctor).next().unwrap();
        assert_eq!(param.ty.as_deref(), Some("String"));
    }

    #[test]
    fn test_initializer_inference() {
        let model = collect_str(
            "final p = Point(1, 2); final n = 3; final d = 1.5; final s = 'a'; final xs = [1, 2]; \
             final r = (1, name: 'x'); final q = p; class Point { Point(int x, int y); }",
        );
        assert_eq!(ty_of(&model, ROOT_SCOPE, "p").as_deref(), Some("Point"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "n").as_deref(), Some("int"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "d").as_deref(), Some("double"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "s").as_deref(), Some("String"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "xs").as_deref(), Some("List<int>"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "r").as_deref(), Some("(int, {String name})"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "q").as_deref(), Some("Point"));
        assert!(model.record_scope("(int, {String name})").is_some());
    }

    #[test]
    fn test_parameters_keep_kind_and_default() {
        let model = collect_str("void f(int a, [int b = 2], {required String c, bool d = false}) {}");
        let f = model.lookup(ROOT_SCOPE, "f").unwrap().node;
        let params: Vec<_> = model.parameters(f).collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params[1].parameter_kind, Some(ParameterKind::OptionalPositional));
        assert_eq!(params[1].default_value.as_deref(), Some("2"));
        assert!(params[2].required);
        assert!(!params[3].required);
        assert_eq!(params[3].default_value.as_deref(), Some("false"));
        assert!(params[3].default_range.is_some());
    }

    #[test]
    fn test_enum_members() {
        let model = collect_str("/// Colors.\nenum Color { red, green }");
        let color = model.class_named("Color").unwrap();
        let scope = model.node(color).scope;
        assert_eq!(model.node(color).documentation.as_deref(), Some("Colors."));
        assert_eq!(ty_of(&model, scope, "red").as_deref(), Some("Color"));
        assert_eq!(ty_of(&model, scope, "values").as_deref(), Some("List<Color>"));
        assert_eq!(ty_of(&model, scope, "index").as_deref(), Some("int"));
    }

    #[test]
    fn test_loop_and_local_scopes() {
        let model = collect_str("void main() { final names = ['a']; for (final name in names) { print(name); } }");
        let loop_var = model.nodes().iter().rev().find(|n| n.name == "name").unwrap();
        assert_eq!(loop_var.ty.as_deref(), Some("String"));
        assert_ne!(loop_var.scope, ROOT_SCOPE);
        assert!(model.lookup(ROOT_SCOPE, "names").is_none());
    }

    #[test]
    fn test_collection_for_elements_type_their_container() {
        let model = collect_str(
            "final s = [for (final i in [1]) i];\n\
             final nested = [for (final i in [1]) [for (final j in [i]) j]];\n\
             void main() { final local = [for (final c in ['a']) c]; }",
        );
        assert_eq!(ty_of(&model, ROOT_SCOPE, "s").as_deref(), Some("List<int>"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "nested").as_deref(), Some("List<List<int>>"));
        let local = model.nodes().iter().find(|n| n.name == "local").unwrap();
        assert_eq!(local.ty.as_deref(), Some("List<String>"));
    }

    #[test]
    fn test_custom_types_follow_core_library() {
        let custom = custom_types::from_json(
            r#"[{ "name": "Greeter", "members": { "greet": { "type": "String", "parameters": [] } } },
                { "name": "List", "description": "Shadowed." }]"#,
        )
        .unwrap();
        let outcome = parser::parse_source("");
        let model = collect(&outcome.unit, &custom);
        let greeter = model.class_named("Greeter").unwrap();
        let greet = model.lookup_local(model.node(greeter).scope, "greet").unwrap();
        assert_eq!(greet.kind, SymbolKind::Method);
        let list = model.class_named("List").unwrap();
        assert_eq!(model.node(list).documentation.as_deref(), Some("Shadowed."));
    }

    #[test]
    fn test_expression_bodied_function_return_type() {
        let model = collect_str("twice(int x) => x * 2; Future<int> later() async => 1; lazy() async => 'a';");
        assert_eq!(ty_of(&model, ROOT_SCOPE, "twice").as_deref(), Some("int"));
        assert_eq!(ty_of(&model, ROOT_SCOPE, "lazy").as_deref(), Some("Future<String>"));
    }
}
