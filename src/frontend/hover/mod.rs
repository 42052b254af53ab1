//! Hover generation
//!
//! The [`HoverGenerator`] re-walks the CST in document order with the [`SemanticModel`] the collector built, and
//! records one [`Hover`] per resolvable site: declared names, type references, identifiers, member accesses,
//! calls, named-argument labels and (optionally) literals.
//!
//! ## Notes
//! - Scopes are re-entered by the range of the construct that introduced them, with the same keys the collector
//!   used.
//! - The first hover recorded for a range wins; the list is sorted by range at the end.
//! - Top-level variables the walk did not reach (for example after a parse error inside their initializer) get
//!   a hover from their node.
//! - A site that cannot be resolved is skipped; generation never fails.
//!
//! ## See also
//! - [`crate::frontend::render`]: signature text
//! - [`crate::frontend::resolver`]: types and member lookup

mod decls;
mod exprs;
mod stmts;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::HoverConfig;
use crate::frontend::cst::{CompilationUnit, Span};
use crate::frontend::render;
use crate::frontend::resolver::{Cx, MemberTarget, ResolvedMember, TypeResolver};
use crate::frontend::symbols::{NodeId, NodeKind, ROOT_SCOPE, SemanticModel};

/// Half-open byte range `[start, end)` into the analyzed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HoverRange {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for HoverRange {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// One hover popup: where it applies and what it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hover {
    pub range: HoverRange,
    /// The signature in a fenced code block.
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Source text of a literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
}

/// Generate hovers for `unit`.
#[tracing::instrument(skip_all, fields(declarations = unit.declarations.len(), source_len = source_len))]
pub fn generate(unit: &CompilationUnit, model: &SemanticModel, config: &HoverConfig, source_len: usize) -> Vec<Hover> {
    let mut generator = HoverGenerator::new(model, config, source_len);
    for decl in &unit.declarations {
        generator.declaration(decl);
    }
    let hovers = generator.finish();
    tracing::debug!(hovers = hovers.len(), "generated hovers");
    hovers
}

/// Document-order hover walk.
pub struct HoverGenerator<'m, 'c> {
    resolver: TypeResolver<'m>,
    config: &'c HoverConfig,
    source_len: usize,
    hovers: Vec<Hover>,
    seen: HashSet<HoverRange>,
}

impl<'m, 'c> HoverGenerator<'m, 'c> {
    pub fn new(model: &'m SemanticModel, config: &'c HoverConfig, source_len: usize) -> Self {
        Self {
            resolver: TypeResolver::new(model),
            config,
            source_len,
            hovers: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn model(&self) -> &'m SemanticModel {
        self.resolver.model()
    }

    /// Add the fallback hovers and return the hovers in range order.
    pub fn finish(mut self) -> Vec<Hover> {
        let model = self.model();
        let missing: Vec<NodeId> = model
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind == NodeKind::Variable && node.scope == ROOT_SCOPE && !node.range.is_empty())
            .filter(|(_, node)| !self.seen.contains(&HoverRange::from(node.range)))
            .map(|(id, _)| id)
            .collect();
        for id in missing {
            let range = model.node(id).range;
            self.emit_node(range, id, &HashMap::new());
        }
        self.hovers.sort_by_key(|hover| hover.range);
        self.hovers
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record a hover unless its range is empty, out of bounds or already taken.
    fn emit(&mut self, span: Span, signature: &str, documentation: Option<String>, expected_value: Option<String>) {
        let range = HoverRange::from(span);
        if span.is_empty() || span.end > self.source_len || !self.seen.insert(range) {
            return;
        }
        let documentation = documentation.filter(|_| self.config.include_documentation);
        self.hovers.push(Hover {
            range,
            markdown: self.config.fence(signature),
            documentation,
            expected_value,
        });
    }

    fn emit_node(&mut self, span: Span, id: NodeId, substitution: &HashMap<String, String>) {
        let signature = render::signature(&self.resolver, id, substitution);
        let documentation = self.model().node(id).documentation.clone();
        self.emit(span, &signature, documentation, None);
    }

    fn emit_member(&mut self, span: Span, member: &ResolvedMember) {
        match &member.target {
            MemberTarget::Node(id) => self.emit_node(span, *id, &member.substitution),
            MemberTarget::RecordField { name, ty } => {
                let signature = format!("{ty} {name}");
                self.emit(span, &signature, None, None);
            }
        }
    }

    /// Hover for the declaration whose name is at `name`.
    fn emit_declared(&mut self, name: Span) {
        if let Some(id) = self.model().node_at(name) {
            self.emit_node(name, id, &HashMap::new());
        }
    }

    fn emit_literal(&mut self, span: Span, ty: &str, text: &str) {
        if self.config.include_literals {
            self.emit(span, ty, None, Some(text.to_string()));
        }
    }

    fn root_cx() -> Cx {
        Cx::new(ROOT_SCOPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::collector;
    use crate::frontend::parser;

    fn hovers(source: &str) -> Vec<Hover> {
        let unit = parser::parse_source(source).unit;
        let model = collector::collect(&unit, &[]);
        generate(&unit, &model, &HoverConfig::default(), source.len())
    }

    fn hover_at<'h>(hovers: &'h [Hover], source: &str, needle: &str, nth: usize) -> &'h Hover {
        let start = source.match_indices(needle).nth(nth).expect("needle missing").0;
        hovers
            .iter()
            .find(|h| h.range.start == start && h.range.end == start + needle.len())
            .unwrap_or_else(|| panic!("no hover for `{needle}` #{nth}"))
    }

    #[test]
    fn test_declarations_and_references() {
        let source = "class Point { final int x; Point(this.x); }\nfinal p = Point(1);\nfinal y = p.x;";
        let hovers = hovers(source);
        assert_eq!(hover_at(&hovers, source, "Point", 0).markdown, "```dart\nclass Point\n```");
        assert_eq!(hover_at(&hovers, source, "Point", 2).markdown, "```dart\nPoint(int x)\n```");
        assert_eq!(hover_at(&hovers, source, "x", 2).markdown, "```dart\nfinal int x\n```");
        assert_eq!(hover_at(&hovers, source, "p", 1).markdown, "```dart\nfinal Point p\n```");
    }

    #[test]
    fn test_literals_carry_expected_value() {
        let source = "final n = 42;";
        let hovers = hovers(source);
        let literal = hover_at(&hovers, source, "42", 0);
        assert_eq!(literal.markdown, "```dart\nint\n```");
        assert_eq!(literal.expected_value.as_deref(), Some("42"));
    }

    #[test]
    fn test_literals_can_be_disabled() {
        let source = "final n = 42;";
        let unit = parser::parse_source(source).unit;
        let model = collector::collect(&unit, &[]);
        let config = HoverConfig::default().with_literals(false);
        let hovers = generate(&unit, &model, &config, source.len());
        assert!(hovers.iter().all(|h| h.expected_value.is_none()));
    }

    #[test]
    fn test_ranges_are_unique_and_sorted() {
        let source = "final a = 1; final b = a + a; void f(int a) { print(a); }";
        let hovers = hovers(source);
        let ranges: Vec<HoverRange> = hovers.iter().map(|h| h.range).collect();
        let mut sorted = ranges.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ranges, sorted);
    }

    #[test]
    fn test_serializes_camel_case_without_nulls() {
        let hover = Hover {
            range: HoverRange { start: 0, end: 1 },
            markdown: "m".to_string(),
            documentation: None,
            expected_value: Some("1".to_string()),
        };
        let json = serde_json::to_string(&hover).unwrap();
        assert_eq!(json, r#"{"range":{"start":0,"end":1},"markdown":"m","expectedValue":"1"}"#);
    }
}
