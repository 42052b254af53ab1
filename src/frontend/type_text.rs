//! Type text algebra.
//!
//! Types flow through the resolver as rendered text (`List<T>`, `T Function(E element)`, `({String title})`), the
//! same spelling hovers display. Everything here splits at top-level separators only: commas inside `<...>`,
//! `(...)`, `[...]` and `{...}` never split an argument list.

use std::collections::HashMap;

use crate::frontend::cst::ParameterKind;

/// The placeholder for unknown or conflicting types.
pub const DYNAMIC: &str = "dynamic";

/// Split `text` on `sep` at nesting depth zero, trimming each piece and dropping empty ones.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c == sep && depth == 0 {
            let piece = current.trim();
            if !piece.is_empty() {
                parts.push(piece.to_string());
            }
            current.clear();
        } else {
            current.push(c);
        }
    }
    let piece = current.trim();
    if !piece.is_empty() {
        parts.push(piece.to_string());
    }
    parts
}

/// Byte offset of the bracket closing the one at `open`, at the same depth.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip a top-level trailing `?`.
pub fn strip_nullable(text: &str) -> (&str, bool) {
    let text = text.trim();
    match text.strip_suffix('?') {
        Some(inner) => (inner.trim_end(), true),
        None => (text, false),
    }
}

pub fn make_nullable(text: &str) -> String {
    let (inner, nullable) = strip_nullable(text);
    if nullable || inner == DYNAMIC || inner == "Null" || inner == "void" {
        text.trim().to_string()
    } else {
        format!("{inner}?")
    }
}

pub fn non_nullable(text: &str) -> String {
    strip_nullable(text).0.to_string()
}

/// `name<A, B>` for the given arguments, or `name` when there are none.
pub fn parameterized<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    let args: Vec<&str> = args.into_iter().collect();
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{}<{}>", name, args.join(", "))
    }
}

/// Split a named type into its base name and top-level type arguments (`Map<K, List<V>>?` gives `Map` and
/// `["K", "List<V>"]`).
///
/// ## Returns
/// `None` for function and record types.
pub fn split_generic(text: &str) -> Option<(&str, Vec<String>)> {
    let (text, _) = strip_nullable(text);
    if is_function_type(text) || is_record_type(text) {
        return None;
    }
    match text.find('<') {
        Some(open) => {
            let close = matching_close(text, open)?;
            Some((text[..open].trim(), split_top_level(&text[open + 1..close], ',')))
        }
        None => Some((text, Vec::new())),
    }
}

/// The name a type text refers to: the class name of a named type, `Function` for function types and `Record` for
/// record types.
pub fn base_name(text: &str) -> &str {
    let (inner, _) = strip_nullable(text);
    if is_function_type(inner) {
        return "Function";
    }
    if is_record_type(inner) {
        return "Record";
    }
    let end = inner.find('<').unwrap_or(inner.len());
    let base = inner[..end].trim();
    // drop an import prefix
    base.rsplit('.').next().unwrap_or(base)
}

/// Return `true` if `text` is a parenthesized record type (`(int, String)`, `({bool flag})?`).
pub fn is_record_type(text: &str) -> bool {
    let (inner, _) = strip_nullable(text);
    inner.starts_with('(') && matching_close(inner, 0) == Some(inner.len() - 1)
}

/// Return `true` if `text` is a function type at the top level.
pub fn is_function_type(text: &str) -> bool {
    function_keyword(text).is_some()
}

/// Byte offset of the outermost `Function` keyword of a function type.
fn function_keyword(text: &str) -> Option<usize> {
    let (text, _) = strip_nullable(text);
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'F' if depth == 0 && text[i..].starts_with("Function") => {
                let before_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
                let after = text[i + "Function".len()..].trim_start();
                if before_ok && (after.starts_with('(') || after.starts_with('<')) {
                    found = Some(i);
                }
                i += "Function".len();
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    found
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// One parameter of a function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub ty: String,
    pub name: Option<String>,
    pub kind: ParameterKind,
    pub required: bool,
}

/// A function type split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub return_type: String,
    pub type_parameters: Vec<String>,
    pub params: Vec<FnParam>,
}

impl FunctionType {
    pub fn positional(&self) -> impl Iterator<Item = &FnParam> {
        self.params.iter().filter(|p| p.kind != ParameterKind::Named)
    }

    pub fn named(&self, name: &str) -> Option<&FnParam> {
        self.params
            .iter()
            .find(|p| p.kind == ParameterKind::Named && p.name.as_deref() == Some(name))
    }
}

/// Parse a function type (`bool Function<T>(T a, [int b], {String c})?`).
pub fn function_parts(text: &str) -> Option<FunctionType> {
    let (text, _) = strip_nullable(text);
    let at = function_keyword(text)?;
    let return_type = match text[..at].trim() {
        "" => DYNAMIC.to_string(),
        ret => ret.to_string(),
    };
    let mut rest = &text[at + "Function".len()..];
    let mut type_parameters = Vec::new();
    let trimmed = rest.trim_start();
    if trimmed.starts_with('<') {
        let close = matching_close(trimmed, 0)?;
        type_parameters = split_top_level(&trimmed[1..close], ',');
        rest = &trimmed[close + 1..];
    }
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return None;
    }
    let close = matching_close(rest, 0)?;
    Some(FunctionType {
        return_type,
        type_parameters,
        params: parse_param_list(&rest[1..close]),
    })
}

/// Parse the inside of a parameter list; an optional or named group (`[int a, int b]`) arrives as one piece.
fn parse_param_list(text: &str) -> Vec<FnParam> {
    let mut params = Vec::new();
    for piece in split_top_level(text, ',') {
        let (kind, body) = if let Some(inner) = piece.strip_prefix('[') {
            (ParameterKind::OptionalPositional, inner.trim_end_matches(']'))
        } else if let Some(inner) = piece.strip_prefix('{') {
            (ParameterKind::Named, inner.trim_end_matches('}'))
        } else {
            (ParameterKind::Positional, piece.as_str())
        };
        for item in split_top_level(body, ',') {
            params.push(parse_param(&item, kind));
        }
    }
    params
}

fn parse_param(item: &str, kind: ParameterKind) -> FnParam {
    let (required, item) = match item.strip_prefix("required ") {
        Some(rest) => (true, rest.trim()),
        None => (kind == ParameterKind::Positional, item),
    };
    let (ty, name) = split_type_and_name(item);
    FnParam {
        ty,
        name,
        kind,
        required,
    }
}

/// Split `Map<String, int> counts` into the type and the trailing name, if any.
pub fn split_type_and_name(item: &str) -> (String, Option<String>) {
    let item = item.trim();
    let mut depth = 0usize;
    let mut split_at = None;
    for (i, c) in item.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => split_at = Some(i),
            _ => {}
        }
    }
    if let Some(at) = split_at {
        let (ty, name) = (item[..at].trim(), item[at..].trim());
        let is_name = name.bytes().all(is_ident_byte) && !name.is_empty();
        if is_name && !ty.is_empty() && !ty.ends_with("Function") {
            return (ty.to_string(), Some(name.to_string()));
        }
    }
    (item.to_string(), None)
}

/// The fields of a record type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordType {
    pub positional: Vec<String>,
    /// `(type, name)` pairs.
    pub named: Vec<(String, String)>,
}

impl RecordType {
    /// Type of the field `$1`, `$2`, ... or of a named field.
    pub fn field(&self, name: &str) -> Option<&str> {
        if let Some(index) = name.strip_prefix('$').and_then(|n| n.parse::<usize>().ok()) {
            return index.checked_sub(1).and_then(|i| self.positional.get(i)).map(String::as_str);
        }
        self.named.iter().find(|(_, n)| n == name).map(|(ty, _)| ty.as_str())
    }

    /// Field names: `$1..$n` then named fields.
    pub fn field_names(&self) -> Vec<String> {
        (1..=self.positional.len())
            .map(|i| format!("${i}"))
            .chain(self.named.iter().map(|(_, n)| n.clone()))
            .collect()
    }
}

/// Parse a record type (`(int, String name, {bool flag})`).
pub fn record_parts(text: &str) -> Option<RecordType> {
    let (inner, _) = strip_nullable(text);
    if !is_record_type(inner) {
        return None;
    }
    let mut record = RecordType::default();
    for piece in split_top_level(&inner[1..inner.len() - 1], ',') {
        if let Some(named) = piece.strip_prefix('{') {
            for field in split_top_level(named.trim_end_matches('}'), ',') {
                if let (ty, Some(name)) = split_type_and_name(&field) {
                    record.named.push((ty, name));
                }
            }
        } else {
            record.positional.push(split_type_and_name(&piece).0);
        }
    }
    Some(record)
}

/// Render a record type the way the parser's type display does.
pub fn render_record(positional: &[String], named: &[(String, String)]) -> String {
    let mut out = String::from("(");
    out.push_str(&positional.join(", "));
    if !named.is_empty() {
        if !positional.is_empty() {
            out.push_str(", ");
        }
        let fields: Vec<String> = named.iter().map(|(ty, name)| format!("{ty} {name}")).collect();
        out.push('{');
        out.push_str(&fields.join(", "));
        out.push('}');
    } else if positional.len() == 1 {
        out.push(',');
    }
    out.push(')');
    out
}

/// Replace every identifier of `text` found in `map` by its mapped type.
///
/// Nullability composes: `T?` with `T = int?` is `int?`, and `dynamic` absorbs a `?`.
pub fn substitute(text: &str, map: &HashMap<String, String>) -> String {
    if map.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut ident = String::new();
    let flush = |ident: &mut String, out: &mut String| {
        if ident.is_empty() {
            return;
        }
        match map.get(ident.as_str()) {
            Some(replacement) => out.push_str(replacement),
            None => out.push_str(ident),
        }
        ident.clear();
    };
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            ident.push(c);
        } else {
            flush(&mut ident, &mut out);
            if c == '?' && (out.ends_with('?') || out.ends_with(DYNAMIC)) {
                continue;
            }
            out.push(c);
        }
    }
    flush(&mut ident, &mut out);
    out
}

/// Return `true` if `text` mentions the identifier `name`.
pub fn mentions(text: &str, name: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|word| word == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(
            split_top_level("Map<String, List<int>>, (int, {bool b}), int Function(a, b)", ','),
            vec!["Map<String, List<int>>", "(int, {bool b})", "int Function(a, b)"]
        );
    }

    #[test]
    fn test_split_generic() {
        let (base, args) = split_generic("Map<String, List<int>>?").unwrap();
        assert_eq!(base, "Map");
        assert_eq!(args, vec!["String", "List<int>"]);
        assert_eq!(split_generic("int").unwrap(), ("int", vec![]));
        assert!(split_generic("(int, String)").is_none());
        assert_eq!(base_name("async.Future<int>?"), "Future");
        assert_eq!(base_name("void Function()"), "Function");
    }

    #[test]
    fn test_function_parts() {
        let f = function_parts("Iterable<T> Function<T>(T Function(E e) toElement, [int? n], {required bool flag})")
            .unwrap();
        assert_eq!(f.return_type, "Iterable<T>");
        assert_eq!(f.type_parameters, vec!["T"]);
        assert_eq!(f.params.len(), 3);
        assert_eq!(f.params[0].ty, "T Function(E e)");
        assert_eq!(f.params[0].name.as_deref(), Some("toElement"));
        assert_eq!(f.params[1].kind, ParameterKind::OptionalPositional);
        assert_eq!(f.params[1].ty, "int?");
        assert!(f.named("flag").unwrap().required);
    }

    #[test]
    fn test_outermost_function_keyword() {
        let f = function_parts("int Function(int) Function(String)").unwrap();
        assert_eq!(f.return_type, "int Function(int)");
        assert_eq!(f.params[0].ty, "String");
        assert!(!is_function_type("FunctionRegistry"));
    }

    #[test]
    fn test_record_parts() {
        let r = record_parts("(int, String name, {bool flag, List<int> xs})").unwrap();
        assert_eq!(r.positional, vec!["int", "String"]);
        assert_eq!(r.field("$2"), Some("String"));
        assert_eq!(r.field("xs"), Some("List<int>"));
        assert_eq!(r.field("$3"), None);
        assert_eq!(render_record(&r.positional, &r.named), "(int, String, {bool flag, List<int> xs})");
        assert_eq!(render_record(&["int".into()], &[]), "(int,)");
    }

    #[test]
    fn test_substitute_is_token_wise() {
        let map = HashMap::from([("T".to_string(), "int?".to_string()), ("E".to_string(), "dynamic".to_string())]);
        assert_eq!(substitute("List<T?>", &map), "List<int?>");
        assert_eq!(substitute("Type Function(E? e)", &map), "Type Function(dynamic e)");
        assert!(mentions("Map<K, T>", "T"));
        assert!(!mentions("Type", "T"));
    }
}
