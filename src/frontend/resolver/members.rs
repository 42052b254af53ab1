//! Receivers and member lookup.

use std::collections::{HashMap, HashSet};

use crate::frontend::cst::{Expr, Name, Spanned};
use crate::frontend::symbols::{NodeId, NodeKind, ROOT_SCOPE, ScopeId};
use crate::frontend::type_text::{self, DYNAMIC};

use super::{Cx, TypeResolver};

/// What a member access reached.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberTarget {
    Node(NodeId),
    /// A record field with no declaration behind it.
    RecordField { name: String, ty: String },
}

/// A resolved member plus the type-parameter substitution in effect at the access.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMember {
    pub target: MemberTarget,
    pub substitution: HashMap<String, String>,
}

impl ResolvedMember {
    pub fn node(node: NodeId, substitution: HashMap<String, String>) -> Self {
        Self {
            target: MemberTarget::Node(node),
            substitution,
        }
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self.target {
            MemberTarget::Node(id) => Some(id),
            MemberTarget::RecordField { .. } => None,
        }
    }
}

/// The left-hand side of `.name`.
#[derive(Debug, Clone, PartialEq)]
pub enum Receiver {
    /// A value of this type.
    Instance(String),
    /// A class used by name (`Point.origin`, `List<int>.filled`), with explicit type arguments if given.
    Static { class: NodeId, args: Vec<String> },
}

impl<'m> TypeResolver<'m> {
    // ========================================================================
    // Receivers
    // ========================================================================

    /// Classify the target of a member access.
    pub fn receiver(&mut self, target: &Spanned<Expr>, cx: &Cx) -> Option<Receiver> {
        match &target.node {
            Expr::Identifier(name) => {
                if let Some(class) = self.class_reference(name, cx.scope) {
                    return Some(Receiver::Static {
                        class,
                        args: Vec::new(),
                    });
                }
            }
            Expr::TypeInstantiation { name, type_args } => {
                if let Some(class) = self.class_reference(&name.node, cx.scope) {
                    return Some(Receiver::Static {
                        class,
                        args: type_args.iter().map(|t| t.node.to_string()).collect(),
                    });
                }
            }
            _ => {}
        }
        let ty = self.infer(target, cx);
        (ty != DYNAMIC).then_some(Receiver::Instance(ty))
    }

    /// A class-like declaration `name` refers to from `scope`, unless a value shadows it.
    pub fn class_reference(&self, name: &str, scope: ScopeId) -> Option<NodeId> {
        let model = self.model;
        let entry = model.lookup(scope, name)?;
        let node = model.node(entry.node);
        match node.kind {
            kind if kind.is_class_like() => Some(entry.node),
            // Inside a class its unnamed constructor shadows the class name.
            NodeKind::Constructor => model.lookup_type(scope, name),
            _ => None,
        }
    }

    /// Resolve `name` on a receiver.
    pub fn resolve_on(&mut self, receiver: &Receiver, name: &str, scope: ScopeId) -> Option<ResolvedMember> {
        match receiver {
            Receiver::Instance(ty) => self.resolve_type_member(ty, name, scope),
            Receiver::Static { class, args } => self.static_member(*class, name, args),
        }
    }

    /// A named constructor (`Class.name`) or a static member of `class`.
    pub fn static_member(&self, class: NodeId, name: &str, args: &[String]) -> Option<ResolvedMember> {
        let model = self.model;
        let substitution = self.class_substitution(class, args);
        if let Some(ctor) = model.constructor(class, Some(name)) {
            return Some(ResolvedMember::node(ctor, substitution));
        }
        let entry = model.lookup_local(model.node(class).scope, name)?;
        match model.node(entry.node).kind {
            NodeKind::TypeParameter | NodeKind::Constructor => None,
            _ => Some(ResolvedMember::node(entry.node, substitution)),
        }
    }

    // ========================================================================
    // Member lookup
    // ========================================================================

    /// Find `name` as a member of `receiver_type`.
    ///
    /// Walks the type's own members, then each supertype (`extends`, `implements`) recursively, then each mixin,
    /// then extensions on the type, and finally `Object`. Type names resolve from `scope` for the receiver itself and
    /// from the file scope for supertypes.
    pub fn resolve_type_member(&mut self, receiver_type: &str, name: &str, scope: ScopeId) -> Option<ResolvedMember> {
        let expanded = self.expand_aliases(receiver_type, scope);
        let ty = type_text::non_nullable(&expanded);

        if type_text::is_record_type(&ty) {
            return self.record_member(&ty, name);
        }

        let mut visited = HashSet::new();
        let found = self
            .member_in_type(&ty, name, scope, &mut visited)
            .or_else(|| self.member_in_extensions(&ty, name, scope))
            .or_else(|| {
                if visited.contains("Object") {
                    None
                } else {
                    self.member_in_type("Object", name, ROOT_SCOPE, &mut visited)
                }
            });
        if found.is_none() {
            tracing::trace!(receiver = %ty, member = name, "member not resolved");
        }
        found
    }

    fn record_member(&self, ty: &str, name: &str) -> Option<ResolvedMember> {
        let model = self.model;
        if let Some(scope) = model.record_scope(ty) {
            let entry = model.lookup_local(scope, name)?;
            return Some(ResolvedMember::node(entry.node, HashMap::new()));
        }
        let record = type_text::record_parts(ty)?;
        let field_ty = record.field(name)?.to_string();
        Some(ResolvedMember {
            target: MemberTarget::RecordField {
                name: name.to_string(),
                ty: field_ty,
            },
            substitution: HashMap::new(),
        })
    }

    /// Resolve the class-like node a type text names, following type-parameter bounds.
    pub fn class_of(&self, ty: &str, scope: ScopeId) -> Option<(NodeId, Vec<String>)> {
        let model = self.model;
        let (base, args) = type_text::split_generic(ty)
            .map(|(base, args)| (base.rsplit('.').next().unwrap_or(base).to_string(), args))
            .unwrap_or_else(|| (type_text::base_name(ty).to_string(), Vec::new()));
        let id = model.lookup_type(scope, &base)?;
        let node = model.node(id);
        match node.kind {
            NodeKind::TypeParameter => {
                let bound = node.ty.clone().unwrap_or_else(|| "Object".to_string());
                self.class_of(&bound, ROOT_SCOPE)
            }
            kind if kind.is_class_like() => Some((id, args)),
            _ => None,
        }
    }

    /// Map `class`'s type parameters to `args`; missing arguments leave the parameter unmapped.
    pub fn class_substitution(&self, class: NodeId, args: &[String]) -> HashMap<String, String> {
        self.model
            .node(class)
            .type_parameter_names()
            .zip(args)
            .map(|(param, arg)| (param.to_string(), arg.clone()))
            .collect()
    }

    fn member_in_type(
        &mut self,
        ty: &str,
        name: &str,
        scope: ScopeId,
        visited: &mut HashSet<String>,
    ) -> Option<ResolvedMember> {
        if self.depth >= super::MAX_DEPTH {
            return None;
        }
        let model = self.model;
        let (class, args) = self.class_of(ty, scope)?;
        let node = model.node(class);
        if !visited.insert(node.name.clone()) {
            return None;
        }
        let substitution = self.class_substitution(class, &args);

        if let Some(entry) = model.lookup_local(node.scope, name) {
            let member = model.node(entry.node);
            if !matches!(member.kind, NodeKind::TypeParameter | NodeKind::Constructor) {
                return Some(ResolvedMember::node(entry.node, substitution));
            }
        }

        self.depth += 1;
        let supertypes = node.extends_types.iter().chain(&node.implements_types).chain(&node.mixins);
        let mut found = None;
        for supertype in supertypes {
            let concrete = type_text::substitute(supertype, &substitution);
            found = self.member_in_type(&concrete, name, ROOT_SCOPE, visited);
            if found.is_some() {
                break;
            }
        }
        self.depth -= 1;
        found
    }

    /// Look `name` up in every extension whose `on` type the receiver satisfies.
    fn member_in_extensions(&mut self, ty: &str, name: &str, scope: ScopeId) -> Option<ResolvedMember> {
        let model = self.model;
        for &extension in model.extensions() {
            let node = model.node(extension);
            let Some(entry) = model.lookup_local(node.scope, name) else {
                continue;
            };
            let Some(on) = node.ty.as_deref() else {
                continue;
            };
            let on_base = type_text::base_name(on);
            let Some(instance) = self.instance_of(ty, on_base, scope) else {
                continue;
            };
            let vars: Vec<String> = node.type_parameter_names().map(str::to_string).collect();
            let mut bindings = super::Bindings::default();
            self.unify(on, &instance, &vars, &mut bindings);
            return Some(ResolvedMember::node(entry.node, bindings.into_map()));
        }
        None
    }

    /// View `ty` as an instance of the class named `target` (`List<int>` as `Iterable` is `Iterable<int>`).
    pub fn instance_of(&mut self, ty: &str, target: &str, scope: ScopeId) -> Option<String> {
        let mut visited = HashSet::new();
        self.instance_of_inner(&type_text::non_nullable(ty), target, scope, &mut visited)
    }

    fn instance_of_inner(
        &mut self,
        ty: &str,
        target: &str,
        scope: ScopeId,
        visited: &mut HashSet<String>,
    ) -> Option<String> {
        if type_text::base_name(ty) == target {
            return Some(ty.to_string());
        }
        let model = self.model;
        let (class, args) = self.class_of(ty, scope)?;
        let node = model.node(class);
        if !visited.insert(node.name.clone()) {
            return None;
        }
        let substitution = self.class_substitution(class, &args);
        node.extends_types
            .iter()
            .chain(&node.implements_types)
            .chain(&node.mixins)
            .find_map(|supertype| {
                let concrete = type_text::substitute(supertype, &substitution);
                self.instance_of_inner(&concrete, target, ROOT_SCOPE, visited)
            })
    }

    /// Element type of something iterated by `for (... in ...)` or `await for`.
    pub fn element_type(&mut self, iterable: &str, is_await: bool) -> Option<String> {
        let target = if is_await { "Stream" } else { "Iterable" };
        let instance = self.instance_of(iterable, target, ROOT_SCOPE)?;
        let (_, args) = type_text::split_generic(&instance)?;
        args.into_iter().next()
    }

    // ========================================================================
    // Name references
    // ========================================================================

    /// Resolve an unqualified name used as a value or callee.
    ///
    /// Scope bindings win; otherwise the name is looked up as an (inherited) member of the enclosing type.
    pub fn resolve_name(&mut self, name: &str, cx: &Cx) -> Option<ResolvedMember> {
        let model = self.model;
        if let Some(entry) = model.lookup(cx.scope, name) {
            return Some(ResolvedMember::node(entry.node, HashMap::new()));
        }
        let this_type = self.this_type(cx)?;
        self.resolve_type_member(&this_type, name, cx.scope)
    }

    /// The member a call `target.name(...)` or `name(...)` reaches.
    pub fn resolve_callee(&mut self, target: Option<&Spanned<Expr>>, name: &Name, cx: &Cx) -> Option<ResolvedMember> {
        match target {
            None => {
                let found = self.resolve_name(&name.node, cx)?;
                // `Point(...)` calls the unnamed constructor when there is one.
                let ctor = found
                    .node_id()
                    .filter(|&id| self.model.node(id).kind.is_class_like())
                    .and_then(|class| self.model.constructor(class, None));
                Some(match ctor {
                    Some(ctor) => ResolvedMember::node(ctor, found.substitution),
                    None => found,
                })
            }
            Some(target) => {
                let receiver = self.receiver(target, cx)?;
                self.resolve_on(&receiver, &name.node, cx.scope)
            }
        }
    }

    /// The type of `this` at `cx`.
    pub fn this_type(&self, cx: &Cx) -> Option<String> {
        if cx.in_static {
            return None;
        }
        let model = self.model;
        let owner = model.node(model.enclosing_type(cx.scope)?);
        match owner.kind {
            NodeKind::Extension => owner.ty.clone(),
            _ => Some(owner.self_type()),
        }
    }

    /// The type of `super` at `cx`.
    pub fn super_type(&self, cx: &Cx) -> Option<String> {
        let model = self.model;
        let owner = model.node(model.enclosing_type(cx.scope)?);
        Some(
            owner
                .extends_types
                .first()
                .cloned()
                .unwrap_or_else(|| "Object".to_string()),
        )
    }
}
