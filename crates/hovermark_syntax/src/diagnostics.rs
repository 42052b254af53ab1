//! Syntax diagnostics: lexical and parse errors as plain values.
//!
//! Errors never abort analysis. The lexer encodes them as error tokens (see [`crate::lexer::errors`]) and the parser
//! collects them beside the partial tree it recovers. [`SourceDiagnostic`] attaches source text so the errors can be
//! rendered with `miette`.

use std::fmt;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::cst::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A recorded lex or parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl SyntaxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical, message, span)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn to_source_span(&self) -> SourceSpan {
        (self.span.start, self.span.len()).into()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}..{}", self.kind, self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for SyntaxError {}

/// A [`SyntaxError`] bound to the snippet it came from, renderable through `miette::Report`.
#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
pub struct SourceDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl SourceDiagnostic {
    pub fn from_error(src: NamedSource<String>, err: &SyntaxError) -> Self {
        let mut help: Vec<&str> = err.notes.iter().map(String::as_str).collect();
        help.extend(err.hints.iter().map(String::as_str));
        Self {
            src,
            span: err.to_source_span(),
            help: if help.is_empty() { None } else { Some(help.join("\n")) },
            message: format!("{}: {}", err.kind, err.message),
            label: err.message.clone(),
        }
    }
}

/// Bind every error to a named copy of `source`.
pub fn with_source(name: &str, source: &str, errors: &[SyntaxError]) -> Vec<SourceDiagnostic> {
    let src = NamedSource::new(name, source.to_string());
    errors
        .iter()
        .map(|err| SourceDiagnostic::from_error(src.clone(), err))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_collect_notes_and_hints() {
        let err = SyntaxError::syntax("expected `;`", Span::new(3, 4))
            .with_note("statement started here")
            .with_hint("add a semicolon");
        assert_eq!(err.notes.len(), 1);
        assert_eq!(err.hints, vec!["add a semicolon".to_string()]);
        assert_eq!(err.to_string(), "syntax error: expected `;` at 3..4");
    }

    #[test]
    fn test_source_diagnostic_joins_help() {
        let err = SyntaxError::lexical("unterminated string literal", Span::new(0, 2)).with_hint("close the quote");
        let diags = with_source("snippet.dart", "'a", &[err]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].to_string(), "lexical error: unterminated string literal");
    }
}
