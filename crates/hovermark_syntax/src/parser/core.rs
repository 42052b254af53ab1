/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse()` loop, plus the small internal helper types
/// shared across the other parser chunks.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a single module while avoiding a
///   single “god file”.

/// Nesting beyond this depth is reported as an error instead of recursing further.
const MAX_NESTING: usize = 64;

/// Where a speculative `<...>` appears; decides which tokens may follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AngleContext {
    /// Type arguments after an identifier or member name inside an expression.
    Expression,
    /// Type parameters after a declared name.
    Declaration,
}

/// Cursor position plus error count, restored when a speculative parse fails.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    pos: usize,
    errors: usize,
}

/// Parser state.
///
/// ## Notes
/// - `pos` indexes `significant`, the positions of non-trivia tokens. Speculation is "snapshot, try, restore".
/// - The parser never fails as a whole: errors are recorded and parsing resumes at a synchronization point.
pub struct Parser<'a> {
    tokens: &'a [Token],
    significant: Vec<usize>,
    eof: Token,
    pos: usize,
    depth: usize,
    /// Set while parsing the type operand of `is` / `as`.
    in_type_test: bool,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by [`crate::lexer::tokenize`]. A missing trailing `Eof` is tolerated.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_depth(tokens, 0)
    }

    fn with_depth(tokens: &'a [Token], depth: usize) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
            .map(|(i, _)| i)
            .collect();
        let eof = match tokens.last() {
            Some(last) => Token::new(
                TokenKind::Eof,
                "",
                Span::new(last.span.end, last.span.end),
                last.line,
                last.column,
            ),
            None => Token::new(TokenKind::Eof, "", Span::default(), 1, 1),
        };
        Self {
            tokens,
            significant,
            eof,
            pos: 0,
            depth,
            in_type_test: false,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream.
    ///
    /// ## Returns
    /// A [`ParseOutcome`] holding the (possibly partial) compilation unit and every recorded error.
    pub fn parse(mut self) -> ParseOutcome {
        let mut unit = CompilationUnit::default();

        while !self.is_at_end() {
            let start = self.pos;
            if let Err(e) = self.top_level(&mut unit) {
                self.report(e);
                self.synchronize(start);
            }
            if self.pos == start {
                self.advance();
            }
        }

        ParseOutcome {
            unit,
            errors: self.errors,
        }
    }
}
