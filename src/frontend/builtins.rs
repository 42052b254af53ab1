//! Core-library seeds.
//!
//! The `dart:core` / `dart:async` registry in `hovermark_core` is converted into the same [`CustomTypeDecl`] shape
//! hosts use, so built-ins and host APIs enter the file scope through one path.

use hovermark_core::lang::library::{self, LibraryFunction, LibraryMember, LibraryParam, LibraryType, ParamKind};

use crate::custom_types::{
    CustomConstructor, CustomFunction, CustomType, CustomTypeDecl, MemberDetail, MemberKind, MemberSpec, Parameter,
    ParameterKind,
};

/// Every core type and function as a custom declaration, types first.
pub fn core_declarations() -> Vec<CustomTypeDecl> {
    library::CORE_TYPES
        .iter()
        .map(|t| CustomTypeDecl::Type(core_type(t)))
        .chain(library::CORE_FUNCTIONS.iter().map(|f| CustomTypeDecl::Function(core_function(f))))
        .collect()
}

fn core_type(t: &LibraryType) -> CustomType {
    CustomType {
        name: t.name.to_string(),
        description: Some(t.description.to_string()),
        extends: t.extends.map(str::to_string),
        implements: t.implements.iter().map(|s| s.to_string()).collect(),
        type_parameters: t.type_parameters.iter().map(|s| s.to_string()).collect(),
        members: t.members.iter().map(|m| (m.name.to_string(), member(m))).collect(),
        static_members: t.static_members.iter().map(|m| (m.name.to_string(), member(m))).collect(),
        constructors: t
            .constructors
            .iter()
            .map(|c| CustomConstructor {
                name: c.name.map(str::to_string),
                description: Some(c.description.to_string()),
                parameters: c.parameters.iter().map(parameter).collect(),
                type_parameters: Vec::new(),
            })
            .collect(),
        package: Some(t.library.to_string()),
    }
}

fn core_function(f: &LibraryFunction) -> CustomFunction {
    CustomFunction {
        name: f.name.to_string(),
        description: Some(f.description.to_string()),
        return_type: f.return_type.to_string(),
        parameters: f.parameters.iter().map(parameter).collect(),
        type_parameters: f.type_parameters.iter().map(|s| s.to_string()).collect(),
        package: Some(f.library.to_string()),
    }
}

fn member(m: &LibraryMember) -> MemberSpec {
    let kind = match m.kind {
        library::MemberKind::Method => MemberKind::Method,
        library::MemberKind::Getter => MemberKind::Getter,
        library::MemberKind::Field => MemberKind::Field,
        library::MemberKind::Operator => MemberKind::Operator,
    };
    let callable = matches!(kind, MemberKind::Method | MemberKind::Operator);
    MemberSpec::Detailed(MemberDetail {
        ty: m.ty.to_string(),
        description: Some(m.description.to_string()),
        parameters: callable.then(|| m.parameters.iter().map(parameter).collect()),
        type_parameters: m.type_parameters.iter().map(|s| s.to_string()).collect(),
        kind: Some(kind),
    })
}

fn parameter(p: &LibraryParam) -> Parameter {
    Parameter {
        name: p.name.to_string(),
        ty: p.ty.to_string(),
        kind: match p.kind {
            ParamKind::Positional => ParameterKind::Positional,
            ParamKind::OptionalPositional => ParameterKind::OptionalPositional,
            ParamKind::Named => ParameterKind::Named,
        },
        default_value: p.default_value.map(str::to_string),
        required: Some(p.required),
        description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_declarations_cover_registry() {
        let decls = core_declarations();
        assert_eq!(decls.len(), library::CORE_TYPES.len() + library::CORE_FUNCTIONS.len());
        let list = decls
            .iter()
            .find_map(|d| match d {
                CustomTypeDecl::Type(t) if t.name == "List" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(list.type_parameters, vec!["E"]);
        assert_eq!(list.members["[]"].kind(), MemberKind::Operator);
        assert_eq!(list.package.as_deref(), Some(library::DART_CORE));
    }

    #[test]
    fn test_getters_have_no_parameter_list() {
        let decls = core_declarations();
        let Some(CustomTypeDecl::Type(iterable)) = decls.iter().find(|d| d.name() == "Iterable") else {
            panic!("Iterable missing");
        };
        assert_eq!(iterable.members["first"].kind(), MemberKind::Getter);
        assert!(iterable.members["first"].parameters().is_empty());
        assert_eq!(iterable.members["map"].type_parameters(), ["T".to_string()]);
    }
}
