//! Type resolution over the scope tree
//!
//! The [`TypeResolver`] answers the questions the hover pass (and the collector's deferred pass) asks about a
//! snippet: what is the type of this expression, which declaration does this member access reach, and what do the
//! type parameters of a generic member stand for at this use site.
//!
//! Types are type text (see [`crate::frontend::type_text`]); unknown types come back as `dynamic`. Resolution never
//! fails: a miss just yields `None` or `dynamic` and the caller skips the hover.
//!
//! ## Notes
//! - Generic substitution composes three sources: type arguments on the receiver's own type (`List<X>`), supertype
//!   arguments collected while walking `extends` / `implements` / `with` (`class Names extends Base<String>`), and
//!   call-site inference from argument types. Explicit type arguments at the call site win over inference;
//!   conflicting inferences collapse to `dynamic`.
//! - Member lookup records every type it visits: the first visit of a type wins and a cycle in the supertype graph
//!   ends the walk.
//! - Untyped parameters of a function literal get types from the function type expected at its call site. Those
//!   are remembered in the resolver so later references to the parameter see them.
//!
//! ## Examples
//! ```ignore
//! let mut resolver = TypeResolver::new(&model);
//! let ty = resolver.infer(&initializer, &Cx::new(scope));
//! let member = resolver.resolve_type_member(&ty, "map", scope);
//! ```
//!
//! ## See also
//! - [`infer`]: expression types
//! - [`members`]: receivers and member lookup
//! - [`generics`]: substitution, call-site inference and typedef expansion

mod generics;
mod infer;
mod members;

use std::collections::HashMap;

use crate::frontend::symbols::{NodeId, SemanticModel, ScopeId};

pub use generics::Bindings;
pub(crate) use infer::wrap_async;
pub use members::{MemberTarget, Receiver, ResolvedMember};

/// Threaded resolution context.
#[derive(Debug, Clone, PartialEq)]
pub struct Cx {
    pub scope: ScopeId,
    /// Type of the implicit receiver of cascade sections.
    pub receiver: Option<String>,
    /// Type the surrounding construct expects (declared variable type, parameter type, ...).
    pub expected: Option<String>,
    /// Inside a static member: there is no `this`.
    pub in_static: bool,
}

impl Cx {
    pub fn new(scope: ScopeId) -> Self {
        Self {
            scope,
            receiver: None,
            expected: None,
            in_static: false,
        }
    }

    pub fn with_scope(&self, scope: ScopeId) -> Self {
        Self { scope, ..self.clone() }
    }

    pub fn with_expected(&self, expected: Option<String>) -> Self {
        Self {
            expected,
            ..self.clone()
        }
    }

    pub fn with_receiver(&self, receiver: Option<String>) -> Self {
        Self {
            receiver,
            ..self.clone()
        }
    }

    pub fn with_static(&self, in_static: bool) -> Self {
        Self {
            in_static,
            ..self.clone()
        }
    }
}

/// Resolves expression types and members against a [`SemanticModel`].
#[derive(Debug)]
pub struct TypeResolver<'m> {
    model: &'m SemanticModel,
    /// Types of untyped function-literal parameters, taken from the expected function type.
    param_types: HashMap<NodeId, String>,
    /// Current inference depth.
    depth: usize,
}

/// Expression nesting is bounded by the parser, but member and typedef chains are not.
const MAX_DEPTH: usize = 128;

impl<'m> TypeResolver<'m> {
    pub fn new(model: &'m SemanticModel) -> Self {
        Self {
            model,
            param_types: HashMap::new(),
            depth: 0,
        }
    }

    pub fn model(&self) -> &'m SemanticModel {
        self.model
    }

    /// Type recorded for an untyped function-literal parameter, if one was inferred.
    pub fn inferred_parameter_type(&self, node: NodeId) -> Option<&str> {
        self.param_types.get(&node).map(String::as_str)
    }
}
