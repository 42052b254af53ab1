/// Result of parsing: the recovered tree plus every error recorded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub unit: CompilationUnit,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    /// Return `true` if no error was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert into a strict result, discarding the partial tree when there were errors.
    pub fn into_result(self) -> Result<CompilationUnit, Vec<SyntaxError>> {
        if self.errors.is_empty() {
            Ok(self.unit)
        } else {
            Err(self.errors)
        }
    }
}

/// Parse a token stream into a [`CompilationUnit`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by [`crate::lexer::tokenize`].
///
/// ## Returns
/// A [`ParseOutcome`]; parsing never fails as a whole; see [`ParseOutcome::into_result`] for a strict view.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> ParseOutcome {
    let outcome = Parser::new(tokens).parse();
    tracing::debug!(
        declarations = outcome.unit.declarations.len(),
        errors = outcome.errors.len(),
        "parsed snippet"
    );
    outcome
}

/// Tokenize and parse `source`, merging lexical and syntax errors in source order.
pub fn parse_source(source: &str) -> ParseOutcome {
    let tokens = crate::lexer::tokenize(source);
    let mut outcome = parse(&tokens);
    outcome.errors.extend(crate::lexer::errors(&tokens));
    outcome.errors.sort_by_key(|e| (e.span.start, e.span.end));
    outcome
}
