//! Concrete syntax tree definitions for Dart snippets.
//!
//! The tree is a closed family of tagged variants: every consumer matches exhaustively, so a new node kind is a
//! compile error everywhere it is not yet handled. Every node carries a half-open `[start, end)` byte range through
//! [`Spanned`]; child ranges are always contained in the parent's.
//!
//! ## Notes
//! - Names keep their own span ([`Name`]) so hover ranges can point at the identifier rather than the whole node.
//! - Collection literals opened with `{` stay an ambiguous [`Expr::SetOrMap`] until resolution; see
//!   [`CollectionLiteral::syntactic_shape`].
//! - Types are kept as syntax ([`TypeAnnotation`]) and rendered to type text with `Display`.

use std::fmt;

use hovermark_core::lang::keywords::{self, KeywordId};
use hovermark_core::lang::operators::OperatorId;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return `true` if `other` lies within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// An identifier together with the range of its spelling.
pub type Name = Spanned<String>;

/// A parsed snippet: directives first, then declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub directives: Vec<Spanned<Directive>>,
    pub declarations: Vec<Spanned<Declaration>>,
}

// ============================================================================
// Directives
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Library,
    Import,
    Export,
    Part,
    PartOf,
}

/// `show` / `hide` clause of an import or export.
#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    pub show: bool,
    pub names: Vec<Name>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The URI without its quotes, or the dotted library name.
    pub uri: Option<String>,
    pub prefix: Option<Name>,
    pub deferred: bool,
    pub combinators: Vec<Combinator>,
}

// ============================================================================
// Declarations
// ============================================================================

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Mixin(MixinDecl),
    Extension(ExtensionDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
    Getter(FunctionDecl),
    Setter(FunctionDecl),
    Variable(VariableDecl),
    /// Snippets are fragments: a bare statement at the top level is kept as-is.
    Statement(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: Name,
    pub bound: Option<Spanned<TypeAnnotation>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// `abstract`, `base`, `interface`, `final`, `sealed`, `mixin`.
    pub modifiers: Vec<KeywordId>,
    pub name: Name,
    pub type_params: Vec<TypeParameter>,
    pub extends: Option<Spanned<TypeAnnotation>>,
    pub with: Vec<Spanned<TypeAnnotation>>,
    pub implements: Vec<Spanned<TypeAnnotation>>,
    pub members: Vec<Spanned<ClassMember>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixinDecl {
    pub modifiers: Vec<KeywordId>,
    pub name: Name,
    pub type_params: Vec<TypeParameter>,
    pub on: Vec<Spanned<TypeAnnotation>>,
    pub implements: Vec<Spanned<TypeAnnotation>>,
    pub members: Vec<Spanned<ClassMember>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionDecl {
    pub name: Option<Name>,
    pub type_params: Vec<TypeParameter>,
    pub on: Spanned<TypeAnnotation>,
    pub members: Vec<Spanned<ClassMember>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: Name,
    pub constructor: Option<Name>,
    pub args: Option<Arguments>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Name,
    pub type_params: Vec<TypeParameter>,
    pub with: Vec<Spanned<TypeAnnotation>>,
    pub implements: Vec<Spanned<TypeAnnotation>>,
    pub constants: Vec<Spanned<EnumConstant>>,
    pub members: Vec<Spanned<ClassMember>>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: Name,
    pub type_params: Vec<TypeParameter>,
    pub aliased: Spanned<TypeAnnotation>,
    pub doc: Option<String>,
}

/// Members of classes, mixins, extensions and enums.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(VariableDecl),
    /// Methods, getters, setters, operators and constructors. Constructors are recognised by name.
    Method(FunctionDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Function,
    Method,
    Getter,
    Setter,
    Operator,
}

/// Entries of a constructor initializer list.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// `this.x = value` or `x = value`.
    Field { name: Name, value: Spanned<Expr> },
    /// `super(...)` or `super.named(...)`.
    Super { name: Option<Name>, args: Arguments },
    /// `this(...)` or `this.named(...)` (redirecting generative constructor).
    This { name: Option<Name>, args: Arguments },
    Assert(Arguments),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub kind: FunctionKind,
    /// `static`, `external`, `factory`, `const`, `abstract`, `covariant`.
    pub modifiers: Vec<KeywordId>,
    /// For constructors this is the written name (`Point` or `Point.origin`).
    pub name: Name,
    pub return_type: Option<Spanned<TypeAnnotation>>,
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<Spanned<FormalParameter>>,
    pub initializers: Vec<Spanned<Initializer>>,
    /// `factory A() = B.named;`
    pub redirect: Option<Spanned<TypeAnnotation>>,
    pub body: FunctionBody,
    pub doc: Option<String>,
}

impl FunctionDecl {
    pub fn has_modifier(&self, id: KeywordId) -> bool {
        self.modifiers.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Positional,
    OptionalPositional,
    Named,
}

/// `this.x` / `super.x` formal prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterPrefix {
    None,
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub value: Spanned<Expr>,
    /// Exact source text of the default expression.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub kind: ParameterKind,
    pub required: bool,
    pub modifiers: Vec<KeywordId>,
    pub ty: Option<Spanned<TypeAnnotation>>,
    pub prefix: ParameterPrefix,
    pub name: Name,
    pub default: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncMarker {
    None,
    Async,
    AsyncStar,
    SyncStar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    Block(Spanned<Block>),
    Expression(Spanned<Expr>),
    /// `;` (abstract or external declarations).
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub marker: AsyncMarker,
    pub kind: BodyKind,
}

impl FunctionBody {
    pub fn empty() -> Self {
        Self {
            marker: AsyncMarker::None,
            kind: BodyKind::Empty,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RecordTypeField {
    pub ty: Spanned<TypeAnnotation>,
    pub name: Option<Name>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeParam {
    pub kind: ParameterKind,
    pub required: bool,
    pub ty: Spanned<TypeAnnotation>,
    pub name: Option<Name>,
}

/// Type syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// `prefix.Name<Args>?`; `name` holds one entry per dotted segment.
    Named {
        name: Vec<Name>,
        args: Vec<Spanned<TypeAnnotation>>,
        nullable: bool,
    },
    /// `Ret Function<T>(params)?`
    Function {
        return_type: Option<Box<Spanned<TypeAnnotation>>>,
        type_params: Vec<TypeParameter>,
        params: Vec<FunctionTypeParam>,
        nullable: bool,
    },
    /// `(int, String, {bool flag})?`
    Record {
        positional: Vec<RecordTypeField>,
        named: Vec<RecordTypeField>,
        nullable: bool,
    },
}

impl TypeAnnotation {
    /// The last dotted segment of a named type (`async.Future` -> `Future`).
    pub fn simple_name(&self) -> Option<&Name> {
        match self {
            TypeAnnotation::Named { name, .. } => name.last(),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeAnnotation::Named { nullable, .. }
            | TypeAnnotation::Function { nullable, .. }
            | TypeAnnotation::Record { nullable, .. } => *nullable,
        }
    }
}

fn write_type_params(f: &mut fmt::Formatter<'_>, params: &[TypeParameter]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", p.name.node)?;
        if let Some(bound) = &p.bound {
            write!(f, " extends {}", bound.node)?;
        }
    }
    write!(f, ">")
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Named { name, args, nullable } => {
                // Import prefixes are dropped; hovers talk about the type itself.
                if let Some(last) = name.last() {
                    write!(f, "{}", last.node)?;
                }
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg.node)?;
                    }
                    write!(f, ">")?;
                }
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            TypeAnnotation::Function {
                return_type,
                type_params,
                params,
                nullable,
            } => {
                if let Some(ret) = return_type {
                    write!(f, "{} ", ret.node)?;
                }
                write!(f, "Function")?;
                write_type_params(f, type_params)?;
                write!(f, "(")?;
                let mut group: Option<ParameterKind> = None;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if group != Some(p.kind) && p.kind != ParameterKind::Positional {
                        write!(f, "{}", if p.kind == ParameterKind::Named { "{" } else { "[" })?;
                        group = Some(p.kind);
                    }
                    if p.required && p.kind == ParameterKind::Named {
                        write!(f, "required ")?;
                    }
                    write!(f, "{}", p.ty.node)?;
                    if let Some(name) = &p.name {
                        write!(f, " {}", name.node)?;
                    }
                }
                match group {
                    Some(ParameterKind::Named) => write!(f, "}}")?,
                    Some(ParameterKind::OptionalPositional) => write!(f, "]")?,
                    _ => {}
                }
                write!(f, ")")?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            TypeAnnotation::Record {
                positional,
                named,
                nullable,
            } => {
                write!(f, "(")?;
                for (i, field) in positional.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field.ty.node)?;
                    if let Some(name) = &field.name {
                        write!(f, " {}", name.node)?;
                    }
                }
                if !named.is_empty() {
                    if !positional.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "{{")?;
                    for (i, field) in named.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", field.ty.node)?;
                        if let Some(name) = &field.name {
                            write!(f, " {}", name.node)?;
                        }
                    }
                    write!(f, "}}")?;
                } else if positional.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Name,
    pub init: Option<Spanned<Expr>>,
}

/// `final`/`const`/`var`/`late`/`static` variable or field declaration with one or more declarators.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub modifiers: Vec<KeywordId>,
    pub ty: Option<Spanned<TypeAnnotation>>,
    pub variables: Vec<VariableDeclarator>,
    pub doc: Option<String>,
}

impl VariableDecl {
    pub fn has_modifier(&self, id: KeywordId) -> bool {
        self.modifiers.contains(&id)
    }
}

/// Initializer clause of a C-style `for`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(VariableDecl),
    Expressions(Vec<Spanned<Expr>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassicFor {
    pub init: Option<ForInit>,
    pub condition: Option<Spanned<Expr>>,
    pub updates: Vec<Spanned<Expr>>,
}

/// Loop variable and iterable of a `for (... in ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachParts {
    /// `None` when the loop assigns to an existing variable (`for (x in xs)`).
    pub declaration: Option<(Vec<KeywordId>, Option<Spanned<TypeAnnotation>>)>,
    pub name: Name,
    pub iterable: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForLoopParts {
    Classic(ClassicFor),
    Each(ForEachParts),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Empty for `default:`.
    pub patterns: Vec<Spanned<Expr>>,
    pub guard: Option<Spanned<Expr>>,
    pub is_default: bool,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub on: Option<Spanned<TypeAnnotation>>,
    pub exception: Option<Name>,
    pub stack_trace: Option<Name>,
    pub body: Spanned<Block>,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VariableDecl),
    Expr(Spanned<Expr>),
    If {
        condition: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    For {
        parts: ClassicFor,
        body: Box<Spanned<Stmt>>,
    },
    ForIn {
        is_await: bool,
        parts: ForEachParts,
        body: Box<Spanned<Stmt>>,
    },
    While {
        condition: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    DoWhile {
        body: Box<Spanned<Stmt>>,
        condition: Spanned<Expr>,
    },
    Switch {
        subject: Spanned<Expr>,
        cases: Vec<Spanned<SwitchCase>>,
    },
    Return(Option<Spanned<Expr>>),
    Break(Option<Name>),
    Continue(Option<Name>),
    Try {
        body: Spanned<Block>,
        catches: Vec<Spanned<CatchClause>>,
        finally: Option<Spanned<Block>>,
    },
    Throw(Spanned<Expr>),
    Rethrow,
    Block(Block),
    LocalFunction(FunctionDecl),
    Yield {
        star: bool,
        value: Spanned<Expr>,
    },
    Assert(Arguments),
    Empty,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Name>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub args: Vec<Spanned<Argument>>,
}

impl Arguments {
    pub fn positional(&self) -> impl Iterator<Item = &Spanned<Argument>> {
        self.args.iter().filter(|a| a.node.name.is_none())
    }

    pub fn named(&self, name: &str) -> Option<&Spanned<Argument>> {
        self.args
            .iter()
            .find(|a| a.node.name.as_ref().is_some_and(|n| n.node == name))
    }
}

/// A string literal, possibly several adjacent pieces (`'a' 'b'`).
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Source text including quotes.
    pub raw: String,
    pub interpolations: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionElement {
    Expr(Spanned<Expr>),
    Spread {
        null_aware: bool,
        expr: Spanned<Expr>,
    },
    If {
        condition: Spanned<Expr>,
        then_element: Box<Spanned<CollectionElement>>,
        else_element: Option<Box<Spanned<CollectionElement>>>,
    },
    For {
        is_await: bool,
        parts: ForLoopParts,
        body: Box<Spanned<CollectionElement>>,
    },
    MapEntry {
        key: Spanned<Expr>,
        value: Spanned<Expr>,
    },
}

impl CollectionElement {
    /// Return `true` if this element (or a nested `if`/`for` body) is a `key: value` entry.
    pub fn contains_map_entry(&self) -> bool {
        match self {
            CollectionElement::MapEntry { .. } => true,
            CollectionElement::If {
                then_element,
                else_element,
                ..
            } => {
                then_element.node.contains_map_entry()
                    || else_element.as_ref().is_some_and(|e| e.node.contains_map_entry())
            }
            CollectionElement::For { body, .. } => body.node.contains_map_entry(),
            CollectionElement::Expr(_) | CollectionElement::Spread { .. } => false,
        }
    }

    /// Return `true` if this element (or a nested `if`/`for` body) is a plain expression.
    pub fn contains_set_element(&self) -> bool {
        match self {
            CollectionElement::Expr(_) => true,
            CollectionElement::If {
                then_element,
                else_element,
                ..
            } => {
                then_element.node.contains_set_element()
                    || else_element.as_ref().is_some_and(|e| e.node.contains_set_element())
            }
            CollectionElement::For { body, .. } => body.node.contains_set_element(),
            CollectionElement::MapEntry { .. } | CollectionElement::Spread { .. } => false,
        }
    }
}

/// Shape a `{...}` literal has from syntax alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralShape {
    Set,
    Map,
    /// Needs spread types or context to decide.
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionLiteral {
    pub is_const: bool,
    pub type_args: Vec<Spanned<TypeAnnotation>>,
    pub elements: Vec<Spanned<CollectionElement>>,
}

impl CollectionLiteral {
    /// Decide set-vs-map from type-argument arity and `key: value` entries.
    pub fn syntactic_shape(&self) -> LiteralShape {
        match self.type_args.len() {
            1 => return LiteralShape::Set,
            2 => return LiteralShape::Map,
            _ => {}
        }
        if self.elements.iter().any(|e| e.node.contains_map_entry()) {
            return LiteralShape::Map;
        }
        if self.elements.iter().any(|e| e.node.contains_set_element()) {
            return LiteralShape::Set;
        }
        LiteralShape::Ambiguous
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: Option<Name>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<Spanned<FormalParameter>>,
    pub body: FunctionBody,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    This,
    Super,
    Null,
    Bool(bool),
    /// Numeric literal source text.
    Number(String),
    String(StringLiteral),
    Symbol(String),
    List(CollectionLiteral),
    SetOrMap(CollectionLiteral),
    Record {
        is_const: bool,
        fields: Vec<RecordField>,
    },
    Function(Box<FunctionExpr>),
    Binary {
        op: OperatorId,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    Unary {
        op: OperatorId,
        operand: Box<Spanned<Expr>>,
    },
    Postfix {
        op: OperatorId,
        operand: Box<Spanned<Expr>>,
    },
    Conditional {
        condition: Box<Spanned<Expr>>,
        then_expr: Box<Spanned<Expr>>,
        else_expr: Box<Spanned<Expr>>,
    },
    Cascade {
        target: Box<Spanned<Expr>>,
        sections: Vec<Spanned<Expr>>,
    },
    /// The implicit receiver a cascade section starts from; its span is the `..`/`?..` token.
    CascadeReceiver {
        null_aware: bool,
    },
    TypeTest {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeAnnotation>,
        negated: bool,
    },
    AsCast {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeAnnotation>,
    },
    PropertyAccess {
        target: Box<Spanned<Expr>>,
        name: Name,
        null_aware: bool,
    },
    MethodInvocation {
        target: Option<Box<Spanned<Expr>>>,
        null_aware: bool,
        name: Name,
        type_args: Vec<Spanned<TypeAnnotation>>,
        args: Arguments,
    },
    FunctionCall {
        callee: Box<Spanned<Expr>>,
        type_args: Vec<Spanned<TypeAnnotation>>,
        args: Arguments,
    },
    Index {
        target: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
        null_aware: bool,
    },
    Assignment {
        op: OperatorId,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    /// `new T(...)`, `const T.named(...)`.
    InstanceCreation {
        keyword: KeywordId,
        ty: Spanned<TypeAnnotation>,
        constructor: Option<Name>,
        args: Arguments,
    },
    /// A generic type used as an expression (`List<int>` in `List<int>.filled(...)`).
    TypeInstantiation {
        name: Name,
        type_args: Vec<Spanned<TypeAnnotation>>,
    },
    Throw(Box<Spanned<Expr>>),
    Await(Box<Spanned<Expr>>),
    Paren(Box<Spanned<Expr>>),
}

/// Render modifier keywords as written (`static final`).
pub fn modifiers_text(modifiers: &[KeywordId]) -> String {
    modifiers
        .iter()
        .map(|m| keywords::as_str(*m))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, args: Vec<TypeAnnotation>, nullable: bool) -> TypeAnnotation {
        TypeAnnotation::Named {
            name: vec![Spanned::new(name.to_string(), Span::default())],
            args: args.into_iter().map(|a| Spanned::new(a, Span::default())).collect(),
            nullable,
        }
    }

    #[test]
    fn test_named_type_display() {
        let ty = named("Map", vec![named("String", vec![], false), named("int", vec![], true)], true);
        assert_eq!(ty.to_string(), "Map<String, int?>?");
    }

    #[test]
    fn test_record_type_display() {
        let field = |ty: &str, name: &str| RecordTypeField {
            ty: Spanned::new(named(ty, vec![], false), Span::default()),
            name: Some(Spanned::new(name.to_string(), Span::default())),
        };
        let ty = TypeAnnotation::Record {
            positional: vec![],
            named: vec![field("String", "title"), field("String", "content")],
            nullable: false,
        };
        assert_eq!(ty.to_string(), "({String title, String content})");
    }

    #[test]
    fn test_function_type_display() {
        let ty = TypeAnnotation::Function {
            return_type: Some(Box::new(Spanned::new(named("bool", vec![], false), Span::default()))),
            type_params: vec![],
            params: vec![FunctionTypeParam {
                kind: ParameterKind::Positional,
                required: true,
                ty: Spanned::new(named("E", vec![], false), Span::default()),
                name: Some(Spanned::new("element".to_string(), Span::default())),
            }],
            nullable: true,
        };
        assert_eq!(ty.to_string(), "bool Function(E element)?");
    }

    #[test]
    fn test_span_contains_and_merge() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(3, 10)));
        assert!(!outer.contains(Span::new(1, 4)));
        assert_eq!(Span::new(4, 6).merge(Span::new(1, 5)), Span::new(1, 6));
    }
}
