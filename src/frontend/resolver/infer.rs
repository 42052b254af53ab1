//! Expression types.

use hovermark_core::lang::operators::{self, OperatorId};

use crate::frontend::cst::*;
use crate::frontend::symbols::{NodeId, NodeKind, ScopeId, ScopeKind};
use crate::frontend::type_text::{self, DYNAMIC};

use super::{Cx, MemberTarget, ResolvedMember, TypeResolver};

/// Wrap a body's value type for its async marker (`async` gives `Future<T>`, `sync*` gives `Iterable<T>`).
pub(crate) fn wrap_async(ty: String, marker: AsyncMarker) -> String {
    match marker {
        AsyncMarker::None => ty,
        AsyncMarker::Async => format!("Future<{ty}>"),
        AsyncMarker::AsyncStar => format!("Stream<{ty}>"),
        AsyncMarker::SyncStar => format!("Iterable<{ty}>"),
    }
}

/// Type of a numeric literal from its source text.
pub(crate) fn number_type(text: &str) -> &'static str {
    let is_hex = text.starts_with("0x") || text.starts_with("0X");
    if !is_hex && text.contains(['.', 'e', 'E']) {
        "double"
    } else {
        "int"
    }
}

/// Least upper bound of a set of types, as far as text can tell.
///
/// `Null` only makes the result nullable, `int` with `double` is `num`, anything else mixed is `dynamic`.
pub(crate) fn least_upper_bound(types: impl IntoIterator<Item = String>) -> Option<String> {
    let mut nullable = false;
    let mut seen: Vec<String> = Vec::new();
    for ty in types {
        match ty.as_str() {
            "Null" => nullable = true,
            "Never" => {}
            _ => {
                let (inner, is_nullable) = type_text::strip_nullable(&ty);
                nullable |= is_nullable;
                if !seen.iter().any(|s| s == inner) {
                    seen.push(inner.to_string());
                }
            }
        }
    }
    let joined = match seen.as_slice() {
        [] if nullable => return Some("Null".to_string()),
        [] => return None,
        [only] => only.clone(),
        many if many.iter().all(|t| matches!(t.as_str(), "int" | "double" | "num")) => "num".to_string(),
        _ => return Some(DYNAMIC.to_string()),
    };
    Some(if nullable {
        type_text::make_nullable(&joined)
    } else {
        joined
    })
}

/// A returned (or yielded) expression and the scope it is evaluated in.
struct Exit<'e> {
    scope: ScopeId,
    expr: &'e Spanned<Expr>,
    /// `yield*`: the value is a whole sequence.
    spread: bool,
}

impl<'m> TypeResolver<'m> {
    // ========================================================================
    // Entry points
    // ========================================================================

    /// Type of `expr`, `dynamic` when unknown.
    pub fn infer(&mut self, expr: &Spanned<Expr>, cx: &Cx) -> String {
        self.infer_opt(expr, cx).unwrap_or_else(|| DYNAMIC.to_string())
    }

    /// Type of `expr`, if it can be determined.
    pub fn infer_opt(&mut self, expr: &Spanned<Expr>, cx: &Cx) -> Option<String> {
        if self.depth >= super::MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let ty = self.infer_expr(expr, cx);
        self.depth -= 1;
        ty
    }

    fn infer_expr(&mut self, expr: &Spanned<Expr>, cx: &Cx) -> Option<String> {
        match &expr.node {
            Expr::Identifier(name) => {
                let member = self.resolve_name(name, cx)?;
                self.member_type(&member)
            }
            Expr::This => self.this_type(cx),
            Expr::Super => self.super_type(cx),
            Expr::Null => Some("Null".to_string()),
            Expr::Bool(_) => Some("bool".to_string()),
            Expr::Number(text) => {
                let ty = number_type(text);
                let wants_double = cx
                    .expected
                    .as_deref()
                    .is_some_and(|e| type_text::non_nullable(e) == "double");
                Some(if wants_double { "double" } else { ty }.to_string())
            }
            Expr::String(_) => Some("String".to_string()),
            Expr::Symbol(_) => Some("Symbol".to_string()),
            Expr::List(literal) => Some(self.list_type(literal, cx)),
            Expr::SetOrMap(literal) => Some(self.set_or_map_type(literal, cx)),
            Expr::Record { fields, .. } => Some(self.record_literal_type(fields, cx)),
            Expr::Function(function) => Some(self.function_expr_type(function, expr.span, cx)),
            Expr::Binary { op, left, right } => self.binary_type(*op, left, right, cx),
            Expr::Unary { op, operand } => match op {
                OperatorId::Bang => Some("bool".to_string()),
                _ => self.infer_opt(operand, cx),
            },
            Expr::Postfix { op, operand } => {
                let ty = self.infer_opt(operand, cx)?;
                Some(match op {
                    OperatorId::Bang => type_text::non_nullable(&ty),
                    _ => ty,
                })
            }
            Expr::Conditional {
                then_expr, else_expr, ..
            } => {
                let then_ty = self.infer(then_expr, cx);
                let else_ty = self.infer(else_expr, cx);
                least_upper_bound([then_ty, else_ty])
            }
            Expr::Cascade { target, .. } => self.infer_opt(target, cx),
            Expr::CascadeReceiver { .. } => cx.receiver.clone(),
            Expr::TypeTest { .. } => Some("bool".to_string()),
            Expr::AsCast { ty, .. } => Some(ty.node.to_string()),
            Expr::PropertyAccess {
                target,
                name,
                null_aware,
            } => {
                let receiver = self.receiver(target, cx)?;
                let member = self.resolve_on(&receiver, &name.node, cx.scope)?;
                let ty = self.member_type(&member)?;
                Some(if *null_aware { type_text::make_nullable(&ty) } else { ty })
            }
            Expr::MethodInvocation {
                target,
                null_aware,
                name,
                type_args,
                args,
            } => {
                let member = self.resolve_callee(target.as_deref(), name, cx)?;
                let ty = self.call_result(&member, type_args, args, cx)?;
                Some(if *null_aware { type_text::make_nullable(&ty) } else { ty })
            }
            Expr::FunctionCall { callee, .. } => {
                let callee_ty = self.infer_opt(callee, cx)?;
                let callee_ty = self.expand_aliases(&callee_ty, cx.scope);
                type_text::function_parts(&callee_ty).map(|f| f.return_type)
            }
            Expr::Index {
                target, null_aware, ..
            } => {
                let target_ty = self.infer_opt(target, cx)?;
                let member = self.resolve_type_member(&target_ty, "[]", cx.scope)?;
                let ty = self.member_return_type(&member)?;
                Some(if *null_aware { type_text::make_nullable(&ty) } else { ty })
            }
            Expr::Assignment { op, target, value } => match op {
                OperatorId::Eq => self.infer_opt(value, cx),
                OperatorId::IfNullEq => {
                    let target_ty = self.infer(target, cx);
                    let value_ty = self.infer(value, cx);
                    least_upper_bound([type_text::non_nullable(&target_ty), value_ty])
                }
                _ => self.infer_opt(target, cx),
            },
            Expr::InstanceCreation {
                ty, constructor, args, ..
            } => self.instance_creation_type(ty, constructor.as_ref(), args, cx),
            Expr::TypeInstantiation { .. } => Some("Type".to_string()),
            Expr::Throw(_) => Some("Never".to_string()),
            Expr::Await(inner) => {
                let ty = self.infer_opt(inner, cx)?;
                Some(await_type(&ty))
            }
            Expr::Paren(inner) => self.infer_opt(inner, cx),
        }
    }

    // ========================================================================
    // Declarations as values
    // ========================================================================

    /// The type a resolved member has when read, with its substitution applied.
    pub fn member_type(&mut self, member: &ResolvedMember) -> Option<String> {
        match &member.target {
            MemberTarget::RecordField { ty, .. } => Some(ty.clone()),
            MemberTarget::Node(id) => {
                let raw = self.node_value_type(*id)?;
                Some(type_text::substitute(&raw, &member.substitution))
            }
        }
    }

    /// The type a declaration has when read as a value: a field's type, a method's function type, `Type` for a
    /// class name.
    pub fn node_value_type(&self, id: NodeId) -> Option<String> {
        if let Some(ty) = self.param_types.get(&id) {
            return Some(ty.clone());
        }
        let model = self.model;
        let node = model.node(id);
        match node.kind {
            NodeKind::Field | NodeKind::EnumConstant | NodeKind::Variable | NodeKind::Getter => node.ty.clone(),
            NodeKind::Parameter => Some(node.ty.clone().unwrap_or_else(|| DYNAMIC.to_string())),
            NodeKind::Function | NodeKind::Method | NodeKind::Operator | NodeKind::Constructor => {
                Some(self.function_type_of(id))
            }
            NodeKind::Setter => model.parameters(id).next().and_then(|p| p.ty.clone()),
            NodeKind::Class | NodeKind::Mixin | NodeKind::Enum | NodeKind::Typedef | NodeKind::TypeParameter => {
                Some("Type".to_string())
            }
            NodeKind::Extension => None,
        }
    }

    /// Declared return type of a callable.
    pub fn return_type(&self, id: NodeId) -> String {
        self.model.node(id).ty.clone().unwrap_or_else(|| DYNAMIC.to_string())
    }

    /// Return type of the operator or method a member resolved to.
    fn member_return_type(&mut self, member: &ResolvedMember) -> Option<String> {
        match &member.target {
            MemberTarget::RecordField { ty, .. } => type_text::function_parts(ty).map(|f| f.return_type),
            MemberTarget::Node(id) => Some(type_text::substitute(&self.return_type(*id), &member.substitution)),
        }
    }

    /// `R Function<T>(A a, [B b], {C c})` for a callable node.
    pub fn function_type_of(&self, id: NodeId) -> String {
        let model = self.model;
        let node = model.node(id);
        let params: Vec<(ParameterKind, bool, String, String)> = node
            .parameters
            .iter()
            .map(|&param| {
                let p = model.node(param);
                let ty = self.node_value_type(param).unwrap_or_else(|| DYNAMIC.to_string());
                (
                    p.parameter_kind.unwrap_or(ParameterKind::Positional),
                    p.required,
                    ty,
                    p.name.clone(),
                )
            })
            .collect();
        render_function_type(&self.return_type(id), &node.type_parameters, &params)
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Result type of calling what `member` resolved to.
    pub fn call_result(
        &mut self,
        member: &ResolvedMember,
        type_args: &[Spanned<TypeAnnotation>],
        args: &Arguments,
        cx: &Cx,
    ) -> Option<String> {
        let id = match &member.target {
            MemberTarget::RecordField { ty, .. } => {
                return type_text::function_parts(ty).map(|f| f.return_type);
            }
            MemberTarget::Node(id) => *id,
        };
        let model = self.model;
        let node = model.node(id);
        match node.kind {
            kind if kind.is_callable() => {
                let substitution = self.call_bindings(id, &member.substitution, type_args, args, cx);
                Some(type_text::substitute(&self.return_type(id), &substitution))
            }
            // A class without a declared unnamed constructor.
            kind if kind.is_class_like() => {
                let explicit: Vec<String> = type_args.iter().map(|t| t.node.to_string()).collect();
                let params: Vec<String> = node
                    .type_parameter_names()
                    .enumerate()
                    .map(|(i, _)| explicit.get(i).cloned().unwrap_or_else(|| DYNAMIC.to_string()))
                    .collect();
                Some(type_text::parameterized(&node.name, params.iter().map(String::as_str)))
            }
            _ => {
                let ty = self.member_type(member)?;
                let ty = self.expand_aliases(&ty, cx.scope);
                type_text::function_parts(&ty).map(|f| f.return_type)
            }
        }
    }

    /// The constructor an instance creation calls, with the explicit class arguments as its substitution.
    pub fn creation_target(
        &self,
        ty: &Spanned<TypeAnnotation>,
        constructor: Option<&Name>,
        scope: ScopeId,
    ) -> Option<(NodeId, ResolvedMember)> {
        let text = ty.node.to_string();
        let (class, args) = self.class_of(&text, scope)?;
        let substitution = self.class_substitution(class, &args);
        let ctor = self
            .model
            .constructor(class, constructor.map(|c| c.node.as_str()))?;
        Some((class, ResolvedMember::node(ctor, substitution)))
    }

    fn instance_creation_type(
        &mut self,
        ty: &Spanned<TypeAnnotation>,
        constructor: Option<&Name>,
        args: &Arguments,
        cx: &Cx,
    ) -> Option<String> {
        if let Some((_, member)) = self.creation_target(ty, constructor, cx.scope) {
            return self.call_result(&member, &[], args, cx);
        }
        let text = ty.node.to_string();
        let (class, explicit) = self.class_of(&text, cx.scope)?;
        let node = self.model.node(class);
        let params: Vec<String> = node
            .type_parameter_names()
            .enumerate()
            .map(|(i, _)| explicit.get(i).cloned().unwrap_or_else(|| DYNAMIC.to_string()))
            .collect();
        Some(type_text::parameterized(&node.name, params.iter().map(String::as_str)))
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn binary_type(
        &mut self,
        op: OperatorId,
        left: &Spanned<Expr>,
        right: &Spanned<Expr>,
        cx: &Cx,
    ) -> Option<String> {
        use OperatorId::*;
        match op {
            EqEq | NotEq | Lt | LtEq | Gt | GtEq | AndAnd | OrOr => return Some("bool".to_string()),
            IfNull => {
                let left_ty = self.infer(left, cx);
                let right_ty = self.infer(right, cx);
                return least_upper_bound([type_text::non_nullable(&left_ty), right_ty]);
            }
            _ => {}
        }
        let left_ty = self.infer_opt(left, cx)?;
        let right_ty = self.infer(right, cx);
        let numeric = |t: &str| matches!(t, "int" | "double" | "num");
        if numeric(&left_ty) && numeric(&right_ty) {
            let ty = match op {
                Slash => "double",
                TildeSlash | Pipe | Caret | Amp | Shl | Shr | UShr => "int",
                _ if left_ty == "int" && right_ty == "int" => "int",
                _ if left_ty == "double" || right_ty == "double" => "double",
                _ => "num",
            };
            return Some(ty.to_string());
        }
        let member = self.resolve_type_member(&left_ty, operators::as_str(op), cx.scope)?;
        self.member_return_type(&member)
    }

    // ========================================================================
    // Collection literals
    // ========================================================================

    fn list_type(&mut self, literal: &CollectionLiteral, cx: &Cx) -> String {
        if let Some(arg) = literal.type_args.first() {
            return format!("List<{}>", arg.node);
        }
        let expected = self.expected_element(cx, "Iterable");
        let element_cx = cx.with_expected(expected.clone());
        let mut types = Vec::new();
        self.element_types(&literal.elements, &element_cx, &mut types);
        let element = least_upper_bound(types)
            .or(expected)
            .unwrap_or_else(|| DYNAMIC.to_string());
        format!("List<{element}>")
    }

    fn set_or_map_type(&mut self, literal: &CollectionLiteral, cx: &Cx) -> String {
        match literal.syntactic_shape() {
            LiteralShape::Set => self.set_type(literal, cx),
            LiteralShape::Map => self.map_type(literal, cx),
            LiteralShape::Ambiguous => {
                match self.spread_shape(&literal.elements, cx) {
                    Some(LiteralShape::Set) => return self.set_type(literal, cx),
                    Some(_) => return self.map_type(literal, cx),
                    None => {}
                }
                let expects_set = cx.expected.as_deref().is_some_and(|e| {
                    let base = type_text::base_name(e);
                    base == "Set" || base == "Iterable"
                });
                if expects_set {
                    self.set_type(literal, cx)
                } else {
                    self.map_type(literal, cx)
                }
            }
        }
    }

    /// Decide an ambiguous `{...}` from the first spread whose type is known.
    fn spread_shape(&mut self, elements: &[Spanned<CollectionElement>], cx: &Cx) -> Option<LiteralShape> {
        for element in elements {
            let CollectionElement::Spread { expr, .. } = &element.node else {
                continue;
            };
            let ty = self.infer(expr, cx);
            if self.instance_of(&ty, "Map", cx.scope).is_some() {
                return Some(LiteralShape::Map);
            }
            if self.instance_of(&ty, "Iterable", cx.scope).is_some() {
                return Some(LiteralShape::Set);
            }
        }
        None
    }

    fn set_type(&mut self, literal: &CollectionLiteral, cx: &Cx) -> String {
        if let Some(arg) = literal.type_args.first() {
            return format!("Set<{}>", arg.node);
        }
        let expected = self.expected_element(cx, "Iterable");
        let mut types = Vec::new();
        self.element_types(&literal.elements, &cx.with_expected(expected.clone()), &mut types);
        let element = least_upper_bound(types)
            .or(expected)
            .unwrap_or_else(|| DYNAMIC.to_string());
        format!("Set<{element}>")
    }

    fn map_type(&mut self, literal: &CollectionLiteral, cx: &Cx) -> String {
        if let [key, value] = literal.type_args.as_slice() {
            return format!("Map<{}, {}>", key.node, value.node);
        }
        let expected = cx
            .expected
            .clone()
            .and_then(|e| self.instance_of(&e, "Map", cx.scope))
            .and_then(|m| type_text::split_generic(&m).map(|(_, args)| args));
        let (expected_key, expected_value) = match expected.as_deref() {
            Some([k, v]) => (Some(k.clone()), Some(v.clone())),
            _ => (None, None),
        };
        let mut keys = Vec::new();
        let mut values = Vec::new();
        self.entry_types(&literal.elements, cx, &mut keys, &mut values);
        let key = least_upper_bound(keys)
            .or(expected_key)
            .unwrap_or_else(|| DYNAMIC.to_string());
        let value = least_upper_bound(values)
            .or(expected_value)
            .unwrap_or_else(|| DYNAMIC.to_string());
        format!("Map<{key}, {value}>")
    }

    /// The element type `cx.expected` asks for, viewed as `target` (`Iterable`).
    fn expected_element(&mut self, cx: &Cx, target: &str) -> Option<String> {
        let expected = cx.expected.clone()?;
        let instance = self.instance_of(&expected, target, cx.scope)?;
        type_text::split_generic(&instance).and_then(|(_, args)| args.into_iter().next())
    }

    /// Element types of a list or set literal, in order.
    fn element_types(&mut self, elements: &[Spanned<CollectionElement>], cx: &Cx, out: &mut Vec<String>) {
        for element in elements {
            match &element.node {
                CollectionElement::Expr(expr) => out.push(self.infer(expr, cx)),
                CollectionElement::Spread { expr, .. } => {
                    let ty = self.infer(expr, cx);
                    out.push(self.element_type(&ty, false).unwrap_or_else(|| DYNAMIC.to_string()));
                }
                CollectionElement::If {
                    then_element,
                    else_element,
                    ..
                } => {
                    self.element_types(std::slice::from_ref(then_element.as_ref()), cx, out);
                    if let Some(else_element) = else_element {
                        self.element_types(std::slice::from_ref(else_element.as_ref()), cx, out);
                    }
                }
                CollectionElement::For { body, .. } => {
                    let scope = self.model.scope_at(element.span, ScopeKind::Block).unwrap_or(cx.scope);
                    self.element_types(std::slice::from_ref(body.as_ref()), &cx.with_scope(scope), out);
                }
                CollectionElement::MapEntry { .. } => {}
            }
        }
    }

    /// Key and value types of a map literal, in order.
    fn entry_types(
        &mut self,
        elements: &[Spanned<CollectionElement>],
        cx: &Cx,
        keys: &mut Vec<String>,
        values: &mut Vec<String>,
    ) {
        for element in elements {
            match &element.node {
                CollectionElement::MapEntry { key, value } => {
                    keys.push(self.infer(key, cx));
                    values.push(self.infer(value, cx));
                }
                CollectionElement::Spread { expr, .. } => {
                    let ty = self.infer(expr, cx);
                    let args = self
                        .instance_of(&ty, "Map", cx.scope)
                        .and_then(|m| type_text::split_generic(&m).map(|(_, args)| args));
                    if let Some([k, v]) = args.as_deref() {
                        keys.push(k.clone());
                        values.push(v.clone());
                    }
                }
                CollectionElement::If {
                    then_element,
                    else_element,
                    ..
                } => {
                    self.entry_types(std::slice::from_ref(then_element.as_ref()), cx, keys, values);
                    if let Some(else_element) = else_element {
                        self.entry_types(std::slice::from_ref(else_element.as_ref()), cx, keys, values);
                    }
                }
                CollectionElement::For { body, .. } => {
                    let scope = self.model.scope_at(element.span, ScopeKind::Block).unwrap_or(cx.scope);
                    let inner = cx.with_scope(scope);
                    self.entry_types(std::slice::from_ref(body.as_ref()), &inner, keys, values);
                }
                CollectionElement::Expr(_) => {}
            }
        }
    }

    fn record_literal_type(&mut self, fields: &[RecordField], cx: &Cx) -> String {
        let expected = cx
            .expected
            .as_deref()
            .and_then(type_text::record_parts)
            .unwrap_or_default();
        let mut positional = Vec::new();
        let mut named = Vec::new();
        for field in fields {
            match &field.name {
                Some(name) => {
                    let hint = expected.field(&name.node).map(str::to_string);
                    let ty = self.infer(&field.value, &cx.with_expected(hint));
                    named.push((ty, name.node.clone()));
                }
                None => {
                    let hint = expected.positional.get(positional.len()).cloned();
                    positional.push(self.infer(&field.value, &cx.with_expected(hint)));
                }
            }
        }
        type_text::render_record(&positional, &named)
    }

    // ========================================================================
    // Function literals
    // ========================================================================

    /// `R Function(A a)` for a function literal, taking untyped parameter types from the expected function type.
    fn function_expr_type(&mut self, function: &FunctionExpr, span: Span, cx: &Cx) -> String {
        let model = self.model;
        let scope = model.scope_at(span, ScopeKind::Function).unwrap_or(cx.scope);
        if let Some(expected) = self.expected_function(cx.expected.as_deref(), cx.scope) {
            self.bind_lambda_params(function, scope, &expected);
        }

        let params: Vec<(ParameterKind, bool, String, String)> = function
            .params
            .iter()
            .map(|param| {
                let p = &param.node;
                let ty = match &p.ty {
                    Some(ty) => ty.node.to_string(),
                    None => model
                        .lookup_local(scope, &p.name.node)
                        .and_then(|entry| self.node_value_type(entry.node))
                        .unwrap_or_else(|| DYNAMIC.to_string()),
                };
                (p.kind, p.required, ty, p.name.node.clone())
            })
            .collect();

        let inner = cx.with_scope(scope).with_expected(None);
        let value = self.body_type(&function.body, scope, &inner);
        let type_parameters: Vec<String> = function.type_params.iter().map(|t| t.name.node.clone()).collect();
        render_function_type(&wrap_async(value, function.body.marker), &type_parameters, &params)
    }

    /// Value type of a body before async wrapping: the expression, or what its `return`s (or `yield`s) produce.
    pub fn body_type(&mut self, body: &FunctionBody, scope: ScopeId, cx: &Cx) -> String {
        match &body.kind {
            BodyKind::Expression(expr) => self.infer(expr, cx),
            BodyKind::Block(block) => {
                let generator = matches!(body.marker, AsyncMarker::SyncStar | AsyncMarker::AsyncStar);
                let mut exits = Vec::new();
                self.exits(&block.node.statements, scope, generator, &mut exits);
                let types: Vec<String> = exits
                    .into_iter()
                    .map(|exit| {
                        let ty = self.infer(exit.expr, &cx.with_scope(exit.scope));
                        if exit.spread {
                            let is_await = body.marker == AsyncMarker::AsyncStar;
                            self.element_type(&ty, is_await).unwrap_or_else(|| DYNAMIC.to_string())
                        } else {
                            ty
                        }
                    })
                    .collect();
                match least_upper_bound(types) {
                    Some(ty) => ty,
                    None if generator => DYNAMIC.to_string(),
                    None => "void".to_string(),
                }
            }
            BodyKind::Empty => "void".to_string(),
        }
    }

    /// Collect `return` (or, for generators, `yield`) expressions, skipping nested functions.
    fn exits<'e>(&self, stmts: &'e [Spanned<Stmt>], scope: ScopeId, generator: bool, out: &mut Vec<Exit<'e>>) {
        for stmt in stmts {
            self.stmt_exits(stmt, scope, generator, out);
        }
    }

    fn stmt_exits<'e>(&self, stmt: &'e Spanned<Stmt>, scope: ScopeId, generator: bool, out: &mut Vec<Exit<'e>>) {
        let model = self.model;
        let block_scope = |span: Span| model.scope_at(span, ScopeKind::Block).unwrap_or(scope);
        match &stmt.node {
            Stmt::Return(Some(expr)) if !generator => out.push(Exit {
                scope,
                expr,
                spread: false,
            }),
            Stmt::Yield { star, value } if generator => out.push(Exit {
                scope,
                expr: value,
                spread: *star,
            }),
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.stmt_exits(then_branch, scope, generator, out);
                if let Some(else_branch) = else_branch {
                    self.stmt_exits(else_branch, scope, generator, out);
                }
            }
            Stmt::For { body, .. } | Stmt::ForIn { body, .. } => {
                self.stmt_exits(body, block_scope(stmt.span), generator, out);
            }
            Stmt::While { body, .. } | Stmt::DoWhile { body, .. } => self.stmt_exits(body, scope, generator, out),
            Stmt::Switch { cases, .. } => {
                for case in cases {
                    self.exits(&case.node.body, block_scope(case.span), generator, out);
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.exits(&body.node.statements, block_scope(body.span), generator, out);
                for clause in catches {
                    let clause_scope = block_scope(clause.span);
                    let body_scope = model
                        .scope_at(clause.node.body.span, ScopeKind::Block)
                        .unwrap_or(clause_scope);
                    self.exits(&clause.node.body.node.statements, body_scope, generator, out);
                }
                if let Some(finally) = finally {
                    self.exits(&finally.node.statements, block_scope(finally.span), generator, out);
                }
            }
            Stmt::Block(block) => self.exits(&block.statements, block_scope(stmt.span), generator, out),
            _ => {}
        }
    }
}

/// Unwrap `Future<T>` / `FutureOr<T>` for `await`.
pub(crate) fn await_type(ty: &str) -> String {
    match type_text::split_generic(ty) {
        Some((base, args)) if matches!(type_text::base_name(base), "Future" | "FutureOr") => {
            args.into_iter().next().unwrap_or_else(|| DYNAMIC.to_string())
        }
        _ => ty.to_string(),
    }
}

/// Render a function type from `(kind, required, type, name)` parameters.
pub(crate) fn render_function_type(
    return_type: &str,
    type_parameters: &[String],
    params: &[(ParameterKind, bool, String, String)],
) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut optional: Vec<String> = Vec::new();
    let mut named: Vec<String> = Vec::new();
    for (kind, required, ty, name) in params {
        match kind {
            ParameterKind::Positional => pieces.push(format!("{ty} {name}")),
            ParameterKind::OptionalPositional => optional.push(format!("{ty} {name}")),
            ParameterKind::Named if *required => named.push(format!("required {ty} {name}")),
            ParameterKind::Named => named.push(format!("{ty} {name}")),
        }
    }
    if !optional.is_empty() {
        pieces.push(format!("[{}]", optional.join(", ")));
    }
    if !named.is_empty() {
        pieces.push(format!("{{{}}}", named.join(", ")));
    }
    let type_parameters = if type_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", type_parameters.join(", "))
    };
    format!("{return_type} Function{type_parameters}({})", pieces.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::collector;
    use crate::frontend::parser;
    use crate::frontend::symbols::ROOT_SCOPE;

    /// Infer the initializer of the last top-level variable.
    fn infer_last(source: &str) -> String {
        let unit = parser::parse_source(source).unit;
        let model = collector::collect(&unit, &[]);
        let init = unit
            .declarations
            .iter()
            .rev()
            .find_map(|d| match &d.node {
                Declaration::Variable(v) => v.variables.last().and_then(|v| v.init.as_ref()),
                _ => None,
            })
            .expect("no initializer");
        TypeResolver::new(&model).infer(init, &Cx::new(ROOT_SCOPE))
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(number_type("0x1F"), "int");
        assert_eq!(number_type("1e3"), "double");
        assert_eq!(number_type("12"), "int");
        assert_eq!(infer_last("final s = 'a${1}b';"), "String");
        assert_eq!(infer_last("final b = !true;"), "bool");
    }

    #[test]
    fn test_least_upper_bound() {
        let lub = |types: &[&str]| least_upper_bound(types.iter().map(|t| t.to_string()));
        assert_eq!(lub(&["int", "double"]).as_deref(), Some("num"));
        assert_eq!(lub(&["int", "Null"]).as_deref(), Some("int?"));
        assert_eq!(lub(&["int", "String"]).as_deref(), Some(DYNAMIC));
        assert_eq!(lub(&[]), None);
    }

    #[test]
    fn test_collection_literals() {
        assert_eq!(infer_last("final xs = [1, 2.5];"), "List<num>");
        assert_eq!(infer_last("final xs = <String>[];"), "List<String>");
        assert_eq!(infer_last("final m = {'a': 1};"), "Map<String, int>");
        assert_eq!(infer_last("final s = {1, 2};"), "Set<int>");
        assert_eq!(infer_last("final e = {};"), "Map<dynamic, dynamic>");
        assert_eq!(infer_last("final xs = [for (var i = 0; i < 3; i++) i];"), "List<int>");
        assert_eq!(infer_last("final a = [1]; final s = {...a};"), "Set<int>");
    }

    #[test]
    fn test_generic_method_inference() {
        assert_eq!(infer_last("final xs = [1, 2]; final ys = xs.map((e) => e.toString());"), "Iterable<String>");
        assert_eq!(infer_last("final m = {'a': 1}; final v = m['a'];"), "int?");
        assert_eq!(infer_last("final xs = <String>[]; final f = xs.first;"), "String");
    }

    #[test]
    fn test_constructor_inference() {
        let source = "class Box<T> { final T value; Box(this.value); } final b = Box(3);";
        assert_eq!(infer_last(source), "Box<int>");
        let source = "class Box<T> { final T value; Box(this.value); } final b = Box<String>('x').value;";
        assert_eq!(infer_last(source), "String");
        assert_eq!(infer_last("final xs = List<int>.filled(3, 0);"), "List<int>");
    }

    #[test]
    fn test_function_literal_and_await() {
        assert_eq!(infer_last("final f = (int x) => x * 2;"), "int Function(int x)");
        assert_eq!(infer_last("final f = () async { return 'a'; };"), "Future<String> Function()");
        assert_eq!(infer_last("final f = () { };"), "void Function()");
        assert_eq!(await_type("Future<int>"), "int");
        assert_eq!(await_type("int"), "int");
    }

    #[test]
    fn test_operators() {
        assert_eq!(infer_last("final a = 1 + 2;"), "int");
        assert_eq!(infer_last("final a = 1 / 2;"), "double");
        assert_eq!(infer_last("final a = 'x' + 'y';"), "String");
        assert_eq!(infer_last("int? n; final a = n ?? 0;"), "int");
        assert_eq!(infer_last("final a = 1 < 2;"), "bool");
    }
}
