//! Host-supplied custom type and function declarations.
//!
//! A documentation tool registers the APIs its snippets use without declaring them inline. Declarations are plain
//! JSON (camelCase keys) and are injected into the file scope before the snippet's own declarations, after the core
//! library.
//!
//! ## Examples
//! ```rust
//! use hovermark::custom_types::{self, CustomTypeDecl};
//!
//! let decls = custom_types::from_json(r#"[
//!     { "name": "Greeter", "members": { "greet": { "type": "String", "parameters": [] } } },
//!     { "name": "greet", "returnType": "String", "parameters": [{ "name": "who", "type": "String" }] }
//! ]"#).unwrap();
//! assert!(matches!(decls[0], CustomTypeDecl::Type(_)));
//! assert!(matches!(decls[1], CustomTypeDecl::Function(_)));
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading custom declarations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read custom types from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid custom type declarations: {0}")]
    Json(#[from] serde_json::Error),
}

/// A custom function or type. Functions are recognised by their `returnType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomTypeDecl {
    Function(CustomFunction),
    Type(CustomType),
}

impl CustomTypeDecl {
    pub fn name(&self) -> &str {
        match self {
            CustomTypeDecl::Function(f) => &f.name,
            CustomTypeDecl::Type(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub members: BTreeMap<String, MemberSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub static_members: BTreeMap<String, MemberSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<CustomConstructor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFunction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomConstructor {
    /// `None` for the unnamed constructor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
}

/// A member: bare type text for a field, or a detailed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberSpec {
    Text(String),
    Detailed(MemberDetail),
}

/// A detailed member. With `parameters` it is a method returning `type`, without it a field of type `type`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    /// Overrides the method/field guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MemberKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Method,
    Getter,
    Field,
    Operator,
}

impl MemberSpec {
    pub fn ty(&self) -> &str {
        match self {
            MemberSpec::Text(ty) => ty,
            MemberSpec::Detailed(detail) => &detail.ty,
        }
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            MemberSpec::Text(_) => MemberKind::Field,
            MemberSpec::Detailed(detail) => detail.kind.unwrap_or(if detail.parameters.is_some() {
                MemberKind::Method
            } else {
                MemberKind::Field
            }),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            MemberSpec::Text(_) => None,
            MemberSpec::Detailed(detail) => detail.description.as_deref(),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        match self {
            MemberSpec::Detailed(MemberDetail {
                parameters: Some(params),
                ..
            }) => params,
            _ => &[],
        }
    }

    pub fn type_parameters(&self) -> &[String] {
        match self {
            MemberSpec::Text(_) => &[],
            MemberSpec::Detailed(detail) => &detail.type_parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub kind: ParameterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Defaults to `true` for positional parameters and `false` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(self.kind == ParameterKind::Positional)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKind {
    #[default]
    Positional,
    OptionalPositional,
    Named,
}

/// Parse a JSON array of declarations (a single object is accepted too).
pub fn from_json(json: &str) -> Result<Vec<CustomTypeDecl>, ConfigError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<CustomTypeDecl>),
        One(CustomTypeDecl),
    }

    let decls = match serde_json::from_str::<OneOrMany>(json) {
        Ok(OneOrMany::Many(decls)) => decls,
        Ok(OneOrMany::One(decl)) => vec![decl],
        // Re-parse strictly so the error points at the offending field.
        Err(_) => serde_json::from_str::<Vec<CustomTypeDecl>>(json)?,
    };
    tracing::debug!(count = decls.len(), "loaded custom type declarations");
    Ok(decls)
}

/// Read and parse a JSON declarations file.
pub fn load(path: &Path) -> Result<Vec<CustomTypeDecl>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_specs_accept_text_and_objects() {
        let decls = from_json(
            r#"[{
                "name": "Widget",
                "typeParameters": ["T"],
                "extends": "Base<T>",
                "members": {
                    "label": "String",
                    "build": { "type": "T", "description": "Builds it.", "parameters": [
                        { "name": "context", "type": "Context" },
                        { "name": "scale", "type": "double", "kind": "named", "defaultValue": "1.0" }
                    ] }
                },
                "constructors": [{ "name": "empty" }],
                "package": "package:widgets/widgets.dart"
            }]"#,
        )
        .unwrap();
        let CustomTypeDecl::Type(widget) = &decls[0] else {
            panic!("expected a type: {decls:?}");
        };
        assert_eq!(widget.members["label"].kind(), MemberKind::Field);
        let build = &widget.members["build"];
        assert_eq!(build.kind(), MemberKind::Method);
        assert_eq!(build.parameters()[1].kind, ParameterKind::Named);
        assert!(!build.parameters()[1].is_required());
        assert!(build.parameters()[0].is_required());
        assert_eq!(widget.constructors[0].name.as_deref(), Some("empty"));
    }

    #[test]
    fn test_single_object_and_errors() {
        let decls = from_json(r#"{ "name": "now", "returnType": "DateTime" }"#).unwrap();
        assert!(matches!(&decls[0], CustomTypeDecl::Function(f) if f.return_type == "DateTime"));

        let err = from_json(r#"[{ "description": "no name" }]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
