//! Type-parameter bindings, call-site inference and typedef expansion.

use std::collections::HashMap;

use crate::frontend::cst::{Arguments, Expr, FunctionExpr, ParameterKind, Spanned, TypeAnnotation};
use crate::frontend::symbols::{NodeId, NodeKind, ROOT_SCOPE, ScopeId};
use crate::frontend::type_text::{self, DYNAMIC, FunctionType};

use super::{Cx, TypeResolver};

/// Inferred types for type variables. A variable bound to two different types is `dynamic`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    map: HashMap<String, String>,
}

impl Bindings {
    pub fn bind(&mut self, var: &str, ty: &str) {
        match self.map.get(var) {
            Some(existing) if existing != ty => {
                self.map.insert(var.to_string(), DYNAMIC.to_string());
            }
            Some(_) => {}
            None => {
                self.map.insert(var.to_string(), ty.to_string());
            }
        }
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.map.get(var).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.map
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.map
    }
}

impl<'m> TypeResolver<'m> {
    // ========================================================================
    // Unification
    // ========================================================================

    /// Match the declared type `param` against the actual type `arg`, binding any of `vars` that `param` mentions.
    ///
    /// `Null` and `dynamic` arguments carry no information and bind nothing.
    pub fn unify(&mut self, param: &str, arg: &str, vars: &[String], bindings: &mut Bindings) {
        if arg == "Null" || arg == DYNAMIC || !vars.iter().any(|v| type_text::mentions(param, v)) {
            return;
        }
        let (inner, nullable) = type_text::strip_nullable(param);
        if vars.iter().any(|v| v == inner) {
            let ty = if nullable {
                type_text::non_nullable(arg)
            } else {
                arg.to_string()
            };
            bindings.bind(inner, &ty);
            return;
        }

        if type_text::is_function_type(inner) {
            let (Some(declared), Some(actual)) = (type_text::function_parts(inner), type_text::function_parts(arg))
            else {
                return;
            };
            self.unify(&declared.return_type, &actual.return_type, vars, bindings);
            for (d, a) in declared.positional().zip(actual.positional()) {
                self.unify(&d.ty, &a.ty, vars, bindings);
            }
            return;
        }

        if type_text::is_record_type(inner) {
            let (Some(declared), Some(actual)) = (type_text::record_parts(inner), type_text::record_parts(arg)) else {
                return;
            };
            for (d, a) in declared.positional.iter().zip(&actual.positional) {
                self.unify(d, a, vars, bindings);
            }
            for (ty, name) in &declared.named {
                if let Some(a) = actual.field(name) {
                    self.unify(ty, a, vars, bindings);
                }
            }
            return;
        }

        let Some((base, params)) = type_text::split_generic(inner) else {
            return;
        };
        let base = type_text::base_name(base);
        let Some(instance) = self.instance_of(arg, base, ROOT_SCOPE) else {
            return;
        };
        let Some((_, args)) = type_text::split_generic(&instance) else {
            return;
        };
        for (p, a) in params.iter().zip(&args) {
            self.unify(p, a, vars, bindings);
        }
    }

    // ========================================================================
    // Call sites
    // ========================================================================

    /// The substitution in effect for a call to `callable`.
    ///
    /// Starts from `base` (receiver and supertype arguments), then binds the callable's own type parameters (and a
    /// constructor's unbound class parameters): explicit `type_args` win; otherwise each argument is matched to its
    /// parameter, by position among the non-named parameters or by name, and unified with the declared type.
    /// Variables nothing binds become `dynamic`.
    pub fn call_bindings(
        &mut self,
        callable: NodeId,
        base: &HashMap<String, String>,
        type_args: &[Spanned<TypeAnnotation>],
        args: &Arguments,
        cx: &Cx,
    ) -> HashMap<String, String> {
        let model = self.model;
        let node = model.node(callable);
        let mut vars: Vec<String> = node.type_parameter_names().map(str::to_string).collect();
        if node.kind == NodeKind::Constructor {
            if let Some(class) = model.enclosing_type(node.scope) {
                vars.extend(
                    model
                        .node(class)
                        .type_parameter_names()
                        .filter(|name| !base.contains_key(*name))
                        .map(str::to_string),
                );
            }
        }
        let mut substitution = base.clone();
        if vars.is_empty() {
            return substitution;
        }

        if !type_args.is_empty() {
            for (var, arg) in vars.iter().zip(type_args) {
                substitution.insert(var.clone(), arg.node.to_string());
            }
            for var in &vars {
                substitution.entry(var.clone()).or_insert_with(|| DYNAMIC.to_string());
            }
            return substitution;
        }

        let params: Vec<(ParameterKind, String, String)> = model
            .parameters(callable)
            .map(|p| {
                let ty = p.ty.clone().unwrap_or_else(|| DYNAMIC.to_string());
                (p.parameter_kind.unwrap_or(ParameterKind::Positional), p.name.clone(), ty)
            })
            .collect();
        let positional: Vec<&String> = params
            .iter()
            .filter(|(kind, _, _)| *kind != ParameterKind::Named)
            .map(|(_, _, ty)| ty)
            .collect();

        let mut matched = Vec::with_capacity(args.args.len());
        let mut index = 0;
        for arg in &args.args {
            let declared = match &arg.node.name {
                Some(name) => params
                    .iter()
                    .find(|(kind, n, _)| *kind == ParameterKind::Named && *n == name.node)
                    .map(|(_, _, ty)| ty),
                None => {
                    index += 1;
                    positional.get(index - 1).copied()
                }
            };
            if let Some(declared) = declared {
                matched.push((&arg.node.value, type_text::substitute(declared, base)));
            }
        }

        // Function literals last: their parameter types may depend on what the other arguments bound.
        let mut bindings = Bindings::default();
        let (literals, values): (Vec<_>, Vec<_>) = matched
            .into_iter()
            .partition(|(value, _)| Self::is_function_literal(value));
        for (value, expected) in values {
            let actual = self.infer(value, &cx.with_expected(Some(expected.clone())));
            self.unify(&expected, &actual, &vars, &mut bindings);
        }
        for (value, declared) in literals {
            let expected = type_text::substitute(&declared, bindings.as_map());
            let actual = self.infer(value, &cx.with_expected(Some(expected.clone())));
            self.unify(&expected, &actual, &vars, &mut bindings);
        }

        let bound = bindings.into_map();
        for var in vars {
            let ty = bound.get(&var).cloned().unwrap_or_else(|| DYNAMIC.to_string());
            substitution.insert(var, ty);
        }
        substitution
    }

    /// Give the untyped parameters of a function literal the types `expected` declares for them.
    pub fn bind_lambda_params(&mut self, function: &FunctionExpr, scope: ScopeId, expected: &FunctionType) {
        let model = self.model;
        let mut positional = expected.positional();
        for param in &function.params {
            let p = &param.node;
            let expected_ty = match p.kind {
                ParameterKind::Named => expected.named(&p.name.node).map(|e| e.ty.clone()),
                _ => positional.next().map(|e| e.ty.clone()),
            };
            if p.ty.is_some() {
                continue;
            }
            let (Some(ty), Some(entry)) = (expected_ty, model.lookup_local(scope, &p.name.node)) else {
                continue;
            };
            if model.node(entry.node).kind == NodeKind::Parameter {
                self.param_types.insert(entry.node, ty);
            }
        }
    }

    /// The expected function type for a literal passed where `expected` is wanted, with aliases expanded.
    pub fn expected_function(&mut self, expected: Option<&str>, scope: ScopeId) -> Option<FunctionType> {
        let expanded = self.expand_aliases(expected?, scope);
        type_text::function_parts(&expanded)
    }

    /// Whether an argument expression is a function literal; those are inferred after the other arguments.
    pub(super) fn is_function_literal(expr: &Spanned<Expr>) -> bool {
        matches!(expr.node, Expr::Function(_))
    }

    // ========================================================================
    // Typedefs
    // ========================================================================

    /// Replace a typedef name at the top of `ty` by its aliased type.
    ///
    /// The alias's type parameters are bound to the use-site arguments; a `?` on the use is kept whatever the
    /// aliased type's own nullability.
    pub fn expand_aliases(&mut self, ty: &str, scope: ScopeId) -> String {
        let mut current = ty.to_string();
        for _ in 0..super::MAX_DEPTH {
            match self.expand_once(&current, scope) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    fn expand_once(&self, ty: &str, scope: ScopeId) -> Option<String> {
        let model = self.model;
        let (base, args) = type_text::split_generic(ty)?;
        let id = model.lookup_type(scope, type_text::base_name(base))?;
        let node = model.node(id);
        if node.kind != NodeKind::Typedef {
            return None;
        }
        let aliased = node.ty.as_deref()?;
        let substitution: HashMap<String, String> = node
            .type_parameter_names()
            .map(str::to_string)
            .zip(args.into_iter().chain(std::iter::repeat(DYNAMIC.to_string())))
            .collect();
        let expanded = type_text::substitute(aliased, &substitution);
        let (_, nullable) = type_text::strip_nullable(ty);
        Some(if nullable {
            type_text::make_nullable(&expanded)
        } else {
            expanded
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::SemanticModel;

    #[test]
    fn test_conflicting_bindings_collapse_to_dynamic() {
        let mut bindings = Bindings::default();
        bindings.bind("T", "int");
        bindings.bind("T", "int");
        assert_eq!(bindings.get("T"), Some("int"));
        bindings.bind("T", "String");
        assert_eq!(bindings.get("T"), Some(DYNAMIC));
    }

    #[test]
    fn test_unify_through_function_and_generic_types() {
        let model = SemanticModel::new();
        let mut resolver = TypeResolver::new(&model);
        let vars = vec!["T".to_string(), "R".to_string()];
        let mut bindings = Bindings::default();
        resolver.unify("R Function(T value)", "String Function(int v)", &vars, &mut bindings);
        resolver.unify("T?", "int?", &vars, &mut bindings);
        assert_eq!(bindings.get("T"), Some("int"));
        assert_eq!(bindings.get("R"), Some("String"));
    }

    #[test]
    fn test_null_arguments_bind_nothing() {
        let model = SemanticModel::new();
        let mut resolver = TypeResolver::new(&model);
        let mut bindings = Bindings::default();
        resolver.unify("T", "Null", &["T".to_string()], &mut bindings);
        assert!(bindings.is_empty());
    }
}
