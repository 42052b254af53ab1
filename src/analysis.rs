//! The `analyze` pipeline: tokenize, parse, collect symbols, generate hovers.
//!
//! ## Notes
//! - Every stage recovers instead of failing, so the pipeline is total over UTF-8 input: a snippet that does not
//!   parse still yields hovers for whatever parsed before the error.
//! - Nothing is cached between calls; each call builds and drops its own tokens, tree and scope model.
//!
//! ## Examples
//! ```rust
//! use hovermark::analyze;
//!
//! let hovers = analyze("final answer = 42;", &[]);
//! assert!(hovers.iter().any(|h| h.markdown.contains("final int answer")));
//! ```

use crate::config::HoverConfig;
use crate::custom_types::CustomTypeDecl;
use crate::frontend::diagnostics::SyntaxError;
use crate::frontend::hover::{self, Hover};
use crate::frontend::{collector, parser};

/// Hovers plus the lexical and syntax errors recorded while producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub hovers: Vec<Hover>,
    pub errors: Vec<SyntaxError>,
}

/// Hovers for `source` with the default [`HoverConfig`].
pub fn analyze(source: &str, custom: &[CustomTypeDecl]) -> Vec<Hover> {
    analyze_with_config(source, custom, &HoverConfig::default())
}

/// Hovers for `source` with explicit output options.
pub fn analyze_with_config(source: &str, custom: &[CustomTypeDecl], config: &HoverConfig) -> Vec<Hover> {
    run(source, custom, config).hovers
}

/// Hovers and syntax errors for `source`.
pub fn analyze_with_diagnostics(source: &str, custom: &[CustomTypeDecl]) -> Analysis {
    run(source, custom, &HoverConfig::default())
}

#[tracing::instrument(skip_all, fields(source_len = source.len(), custom = custom.len()))]
fn run(source: &str, custom: &[CustomTypeDecl], config: &HoverConfig) -> Analysis {
    let outcome = parser::parse_source(source);
    let model = collector::collect_with(&outcome.unit, custom, config.seed_core_library);
    let hovers = hover::generate(&outcome.unit, &model, config, source.len());
    Analysis {
        hovers,
        errors: outcome.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_come_with_hovers() {
        let analysis = analyze_with_diagnostics("final a = 1;\nclass Broken {", &[]);
        assert!(!analysis.errors.is_empty());
        assert!(analysis.hovers.iter().any(|h| h.markdown.contains("int a")));
    }

    #[test]
    fn test_core_library_can_be_left_out() {
        let config = HoverConfig::default().with_core_library(false);
        let hovers = analyze_with_config("final s = 'x'; final n = s.length;", &[], &config);
        assert!(hovers.iter().all(|h| !h.markdown.contains("get length")));
    }

    #[test]
    fn test_empty_source() {
        assert!(analyze("", &[]).is_empty());
    }
}
