//! Scope tree and semantic nodes for a snippet
//!
//! The collector fills a [`SemanticModel`]: a flat arena of [`Node`]s (classes, functions, fields, parameters, ...)
//! and a tree of [`Scope`]s mapping names to [`SymbolEntry`]s. Scopes never own nodes; entries refer to them by
//! [`NodeId`], so the tree has no cycles.
//!
//! ## Notes
//! - Within one scope the last definition of a name wins.
//! - Setters are entered under `name=` so they do not shadow the getter of the same name.
//! - Constructors are entered in their class scope under their written name (`Point`, `Point.origin`); type lookups
//!   skip them through [`SemanticModel::lookup_type`].

use std::collections::HashMap;

use crate::frontend::cst::{ParameterKind, Span};
use crate::frontend::type_text;

/// Index of a node in [`SemanticModel::nodes`].
pub type NodeId = usize;
/// Index of a scope in the model's scope arena.
pub type ScopeId = usize;

/// The file scope every other scope descends from.
pub const ROOT_SCOPE: ScopeId = 0;

/// Scope and node arena produced by symbol collection.
#[derive(Debug, Clone)]
pub struct SemanticModel {
    nodes: Vec<Node>,
    scopes: Vec<Scope>,
    /// Scopes introduced by CST constructs, keyed by the construct's range and kind.
    by_range: HashMap<(usize, usize, ScopeKind), ScopeId>,
    /// Declaration nodes keyed by the range of their name.
    by_name_range: HashMap<(usize, usize), NodeId>,
    /// Anonymous record scopes keyed by record type text.
    records: HashMap<String, ScopeId>,
    /// Extensions in declaration order.
    extensions: Vec<NodeId>,
}

impl Default for SemanticModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticModel {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            scopes: vec![Scope::new(None, ScopeKind::File, Span::default())],
            by_range: HashMap::new(),
            by_name_range: HashMap::new(),
            records: HashMap::new(),
            extensions: Vec::new(),
        }
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Add a child scope of `parent`.
    pub fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind, range: Span) -> ScopeId {
        self.scopes.push(Scope::new(Some(parent), kind, range));
        self.scopes.len() - 1
    }

    /// Add a scope for the CST construct at `range`, so later passes can find it again.
    pub fn add_keyed_scope(&mut self, parent: ScopeId, kind: ScopeKind, range: Span) -> ScopeId {
        let id = self.add_scope(parent, kind, range);
        self.by_range.entry((range.start, range.end, kind)).or_insert(id);
        id
    }

    /// Push a node into the arena without binding it to a name.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        if !node.range.is_empty() {
            self.by_name_range.entry((node.range.start, node.range.end)).or_insert(id);
        }
        if node.kind == NodeKind::Extension {
            self.extensions.push(id);
        }
        self.nodes.push(node);
        id
    }

    /// Bind `node` in `scope` under `key`. A previous binding of the same key is replaced.
    pub fn bind(&mut self, scope: ScopeId, key: impl Into<String>, node: NodeId) {
        let key = key.into();
        let kind = self.nodes[node].kind.symbol_kind();
        self.scopes[scope].symbols.insert(
            key.clone(),
            SymbolEntry {
                name: key,
                kind,
                node,
            },
        );
    }

    /// Add a node and bind it in the scope it belongs to, under its natural key.
    pub fn define(&mut self, scope: ScopeId, node: Node) -> NodeId {
        let key = node.binding_key();
        let id = self.add_node(node);
        if !key.is_empty() {
            self.bind(scope, key, id);
        }
        id
    }

    pub fn set_owner(&mut self, scope: ScopeId, owner: NodeId) {
        self.scopes[scope].owner = Some(owner);
    }

    pub fn register_record(&mut self, type_text: String, scope: ScopeId) {
        self.records.entry(type_text).or_insert(scope);
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// The scope a CST construct introduced, if the collector saw it.
    pub fn scope_at(&self, range: Span, kind: ScopeKind) -> Option<ScopeId> {
        self.by_range.get(&(range.start, range.end, kind)).copied()
    }

    /// The node declared with its name at exactly `range`.
    pub fn node_at(&self, range: Span) -> Option<NodeId> {
        self.by_name_range.get(&(range.start, range.end)).copied()
    }

    pub fn record_scope(&self, type_text: &str) -> Option<ScopeId> {
        self.records.get(type_text).copied()
    }

    pub fn extensions(&self) -> &[NodeId] {
        &self.extensions
    }

    /// Iterate `scope` and its ancestors, innermost first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&id| self.scopes[id].parent)
    }

    /// Resolve `name` from `scope` outwards; the nearest binding shadows outer ones.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&SymbolEntry> {
        self.ancestors(scope).find_map(|id| self.scopes[id].symbols.get(name))
    }

    /// Resolve `name` in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&SymbolEntry> {
        self.scopes[scope].symbols.get(name)
    }

    /// Resolve `name` as a type: constructors, members and variables are skipped.
    pub fn lookup_type(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        self.ancestors(scope)
            .filter_map(|id| self.scopes[id].symbols.get(name))
            .find(|entry| self.nodes[entry.node].kind.is_type())
            .map(|entry| entry.node)
    }

    /// Resolve a class-like declaration (class, mixin, enum) by name from the file scope.
    pub fn class_named(&self, name: &str) -> Option<NodeId> {
        self.lookup_local(ROOT_SCOPE, name)
            .map(|entry| entry.node)
            .filter(|&id| self.nodes[id].kind.is_class_like())
    }

    /// The class-like or extension node whose member scope encloses `scope`.
    pub fn enclosing_type(&self, scope: ScopeId) -> Option<NodeId> {
        self.ancestors(scope).find_map(|id| {
            let s = &self.scopes[id];
            match (s.kind, s.owner) {
                (ScopeKind::Class, Some(owner)) => Some(owner),
                _ => None,
            }
        })
    }

    /// The callable whose scope encloses `scope`.
    pub fn enclosing_callable(&self, scope: ScopeId) -> Option<NodeId> {
        self.ancestors(scope).find_map(|id| {
            let s = &self.scopes[id];
            match s.kind {
                ScopeKind::Method | ScopeKind::Constructor | ScopeKind::Function => s.owner,
                _ => None,
            }
        })
    }

    /// The unnamed constructor, or `Class.name`, declared in a class scope.
    pub fn constructor(&self, class: NodeId, name: Option<&str>) -> Option<NodeId> {
        let class_node = &self.nodes[class];
        let key = match name {
            Some(name) => format!("{}.{}", class_node.name, name),
            None => class_node.name.clone(),
        };
        self.lookup_local(class_node.scope, &key)
            .map(|entry| entry.node)
            .filter(|&id| self.nodes[id].kind == NodeKind::Constructor)
    }

    /// Parameter nodes of a callable, in declaration order.
    pub fn parameters(&self, callable: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[callable].parameters.iter().map(move |&id| &self.nodes[id])
    }
}

/// A lexical scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    /// The declaration that introduced this scope.
    pub owner: Option<NodeId>,
    pub range: Span,
    symbols: HashMap<String, SymbolEntry>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>, kind: ScopeKind, range: Span) -> Self {
        Self {
            parent,
            kind,
            owner: None,
            range,
            symbols: HashMap::new(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    File,
    Class,
    Method,
    Constructor,
    Function,
    Block,
    Record,
}

/// A name bound in a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Method,
    Field,
    Variable,
    Parameter,
    Function,
    Constructor,
    Accessor,
    Extension,
    Typedef,
    TypeLiteral,
}

/// What a [`Node`] declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Class,
    Mixin,
    Enum,
    Extension,
    Typedef,
    Function,
    Method,
    Constructor,
    Getter,
    Setter,
    Operator,
    Field,
    EnumConstant,
    Variable,
    Parameter,
    TypeParameter,
}

impl NodeKind {
    pub fn symbol_kind(self) -> SymbolKind {
        match self {
            NodeKind::Class | NodeKind::Mixin | NodeKind::Enum => SymbolKind::Class,
            NodeKind::Extension => SymbolKind::Extension,
            NodeKind::Typedef => SymbolKind::Typedef,
            NodeKind::Function => SymbolKind::Function,
            NodeKind::Method | NodeKind::Operator => SymbolKind::Method,
            NodeKind::Constructor => SymbolKind::Constructor,
            NodeKind::Getter | NodeKind::Setter => SymbolKind::Accessor,
            NodeKind::Field | NodeKind::EnumConstant => SymbolKind::Field,
            NodeKind::Variable => SymbolKind::Variable,
            NodeKind::Parameter => SymbolKind::Parameter,
            NodeKind::TypeParameter => SymbolKind::TypeLiteral,
        }
    }

    /// Class, mixin or enum: declarations with a member scope and supertypes.
    pub fn is_class_like(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Mixin | NodeKind::Enum)
    }

    /// Anything usable in a type position.
    pub fn is_type(self) -> bool {
        self.is_class_like() || matches!(self, NodeKind::Typedef | NodeKind::TypeParameter)
    }

    /// Declarations rendered with a parameter list.
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            NodeKind::Function | NodeKind::Method | NodeKind::Constructor | NodeKind::Operator | NodeKind::Setter
        )
    }

    /// Declarations whose `ty` is the type of the value they hold.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            NodeKind::Field | NodeKind::EnumConstant | NodeKind::Variable | NodeKind::Parameter | NodeKind::Getter
        )
    }
}

/// A declared entity.
///
/// `scope` is the scope the node *introduces* for class-likes, extensions, typedefs and callables, and the scope it
/// is declared *in* for everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    /// Range of the declaring name; empty for seeded and synthetic nodes.
    pub range: Span,
    pub scope: ScopeId,
    /// Type text: value type, return type for callables, aliased type for typedefs, `on` type for extensions, bound
    /// for type parameters.
    pub ty: Option<String>,
    /// Type parameter declarations as written (`T`, `T extends num`).
    pub type_parameters: Vec<String>,
    /// Name of the declaring class-like for members.
    pub parent_class: Option<String>,
    pub modifiers: Vec<String>,
    pub extends_types: Vec<String>,
    pub implements_types: Vec<String>,
    pub mixins: Vec<String>,
    /// Parameter nodes of a callable, in order.
    pub parameters: Vec<NodeId>,
    pub parameter_kind: Option<ParameterKind>,
    pub required: bool,
    pub default_value: Option<String>,
    pub default_range: Option<Span>,
    pub nullable: bool,
    pub documentation: Option<String>,
    pub package: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>, range: Span, scope: ScopeId) -> Self {
        Self {
            kind,
            name: name.into(),
            range,
            scope,
            ty: None,
            type_parameters: Vec::new(),
            parent_class: None,
            modifiers: Vec::new(),
            extends_types: Vec::new(),
            implements_types: Vec::new(),
            mixins: Vec::new(),
            parameters: Vec::new(),
            parameter_kind: None,
            required: false,
            default_value: None,
            default_range: None,
            nullable: false,
            documentation: None,
            package: None,
        }
    }

    /// The key the node is bound under in its scope.
    pub fn binding_key(&self) -> String {
        match self.kind {
            NodeKind::Setter => format!("{}=", self.name),
            _ => self.name.clone(),
        }
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static") || self.kind == NodeKind::EnumConstant
    }

    /// Names of the type parameters without their bounds.
    pub fn type_parameter_names(&self) -> impl Iterator<Item = &str> {
        self.type_parameters
            .iter()
            .map(|p| p.split_whitespace().next().unwrap_or(p.as_str()))
    }

    /// The type a class-like declares for its own instances: `Box<T>` for `class Box<T extends num>`.
    pub fn self_type(&self) -> String {
        type_text::parameterized(&self.name, self.type_parameter_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, model: &mut SemanticModel) -> NodeId {
        let scope = model.add_scope(ROOT_SCOPE, ScopeKind::Class, Span::default());
        let id = model.define(ROOT_SCOPE, Node::new(NodeKind::Class, name, Span::default(), scope));
        model.set_owner(scope, id);
        id
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let mut model = SemanticModel::new();
        let outer = model.add_scope(ROOT_SCOPE, ScopeKind::Function, Span::new(0, 50));
        let inner = model.add_scope(outer, ScopeKind::Block, Span::new(10, 40));
        model.define(outer, Node::new(NodeKind::Variable, "x", Span::new(12, 13), outer));

        let entry = model.lookup(inner, "x").unwrap();
        assert_eq!(entry.kind, SymbolKind::Variable);
        assert!(model.lookup_local(inner, "x").is_none());
        assert!(model.lookup(ROOT_SCOPE, "x").is_none());
    }

    #[test]
    fn test_nearest_binding_shadows_and_last_write_wins() {
        let mut model = SemanticModel::new();
        let block = model.add_scope(ROOT_SCOPE, ScopeKind::Block, Span::new(0, 20));
        model.define(ROOT_SCOPE, Node::new(NodeKind::Variable, "x", Span::new(0, 1), ROOT_SCOPE));
        let first = model.define(block, Node::new(NodeKind::Variable, "x", Span::new(5, 6), block));
        let second = model.define(block, Node::new(NodeKind::Variable, "x", Span::new(9, 10), block));

        assert_ne!(first, second);
        assert_eq!(model.lookup(block, "x").unwrap().node, second);
        assert_eq!(model.node_at(Span::new(5, 6)), Some(first));
    }

    #[test]
    fn test_setter_does_not_shadow_getter() {
        let mut model = SemanticModel::new();
        let point = class("Point", &mut model);
        let scope = model.node(point).scope;
        model.define(scope, Node::new(NodeKind::Getter, "x", Span::new(1, 2), scope));
        model.define(scope, Node::new(NodeKind::Setter, "x", Span::new(3, 4), scope));

        assert_eq!(model.lookup_local(scope, "x").unwrap().kind, SymbolKind::Accessor);
        assert!(model.lookup_local(scope, "x=").is_some());
    }

    #[test]
    fn test_type_lookup_skips_constructors() {
        let mut model = SemanticModel::new();
        let point = class("Point", &mut model);
        let scope = model.node(point).scope;
        let ctor = model.define(scope, Node::new(NodeKind::Constructor, "Point", Span::new(8, 13), scope));

        assert_eq!(model.lookup(scope, "Point").unwrap().node, ctor);
        assert_eq!(model.lookup_type(scope, "Point"), Some(point));
        assert_eq!(model.constructor(point, None), Some(ctor));
        assert_eq!(model.enclosing_type(scope), Some(point));
    }
}
