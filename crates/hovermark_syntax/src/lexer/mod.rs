//! Lexer for Dart snippets
//!
//! Handles tokenization including:
//! - Keywords, identifiers and numeric literals
//! - Strings in all quote styles, with `$name` / `${expr}` interpolation lexed into nested token runs
//! - Operators and punctuation by maximal munch over the registry spellings
//! - Whitespace and comments, kept as trivia tokens so offsets stay exact
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Interpolation)
//! - `strings` - String literal scanning and interpolation
//! - `numbers` - Numeric literal scanning
//!
//! ## Notes
//! - `<` and `>` are always single tokens. Whether they bracket type arguments or compare values is decided by the
//!   parser, which also reassembles `>=`, `>>`, `<<=` and friends from adjacent tokens.
//! - Lexing is total: anything unrecognised becomes an `Error` token and scanning continues.

mod numbers;
mod strings;
pub mod tokens;

use std::sync::OnceLock;

pub use tokens::{CommentKind, Interpolation, LexErrorKind, Token, TokenKind, keyword_id};

use crate::cst::Span;
use crate::diagnostics::SyntaxError;
use hovermark_core::lang::operators;
use hovermark_core::lang::punctuation::{self, PunctuationId};

/// Interpolations nested deeper than this are kept as plain string text.
const MAX_INTERPOLATION_DEPTH: usize = 32;

/// Operator and punctuation spellings, longest first.
fn munch_table() -> &'static [(&'static str, TokenKind)] {
    static TABLE: OnceLock<Vec<(&'static str, TokenKind)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: Vec<(&'static str, TokenKind)> = operators::lexable_spellings()
            .into_iter()
            .map(|(s, id)| (s, TokenKind::Operator(id)))
            .chain(
                punctuation::lexable_spellings()
                    .into_iter()
                    .map(|(s, id)| (s, TokenKind::Punctuation(id))),
            )
            .collect();
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    })
}

/// Tokenize a snippet.
///
/// ## Returns
/// The full token stream, trivia included, always terminated by an `Eof` token.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    lexer.run();
    tracing::debug!(token_count = lexer.tokens.len(), "lexed snippet");
    lexer.tokens
}

/// Collect the lexical errors encoded in a token stream, interpolations included.
pub fn errors(tokens: &[Token]) -> Vec<SyntaxError> {
    let mut out = Vec::new();
    collect_errors(tokens, &mut out);
    out.sort_by_key(|e| (e.span.start, e.span.end));
    out
}

fn collect_errors(tokens: &[Token], out: &mut Vec<SyntaxError>) {
    for token in tokens {
        if let TokenKind::Error(kind) = token.kind {
            let err = SyntaxError::lexical(kind.message(), token.span);
            let err = match kind {
                LexErrorKind::UnterminatedString => err.with_hint("close the literal with its opening quote"),
                LexErrorKind::UnterminatedComment => err.with_hint("add a closing `*/`"),
                LexErrorKind::UnexpectedChar => err,
            };
            out.push(err);
        }
        for interpolation in &token.interpolations {
            collect_errors(&interpolation.tokens, out);
        }
    }
}

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for snippet source code.
///
/// A lexer either covers the whole snippet or, when `nested`, a single `${...}` interpolation. A nested lexer stops
/// in front of the first `}` that closes no brace it opened itself.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    nested: bool,
    depth: usize,
    brace_depth: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            nested: false,
            depth: 0,
            brace_depth: 0,
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            if self.nested && c == '}' && self.brace_depth == 0 {
                break;
            }
            self.scan_token();
        }
        let eof = Token::new(TokenKind::Eof, "", Span::new(self.pos, self.pos), self.line, self.column);
        self.tokens.push(eof);
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Push a token spanning `start..self.pos`.
    fn push(&mut self, kind: TokenKind, start: usize, line: u32, column: u32) -> &mut Token {
        let text = &self.source[start..self.pos];
        self.tokens
            .push(Token::new(kind, text, Span::new(start, self.pos), line, column));
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return;
        };

        if c.is_whitespace() {
            self.advance_while(char::is_whitespace);
            self.push(TokenKind::Whitespace, start, line, column);
            return;
        }

        if c == '/' {
            match self.peek_nth(1) {
                Some('/') => return self.scan_line_comment(start, line, column),
                Some('*') => return self.scan_block_comment(start, line, column),
                _ => {}
            }
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) {
            self.scan_number();
            self.push(TokenKind::Number, start, line, column);
            return;
        }

        if c == 'r' && matches!(self.peek_nth(1), Some('\'' | '"')) {
            self.advance();
            self.scan_string(start, line, column, true);
            return;
        }

        if c == '\'' || c == '"' {
            self.scan_string(start, line, column, false);
            return;
        }

        if is_ident_start(c) {
            self.advance_while(is_ident_continue);
            let kind = match keyword_id(&self.source[start..self.pos]) {
                Some(id) => TokenKind::Keyword(id),
                None => TokenKind::Ident,
            };
            self.push(kind, start, line, column);
            return;
        }

        let rest = self.rest();
        if let Some((spelling, kind)) = munch_table().iter().find(|(s, _)| rest.starts_with(s)) {
            for _ in 0..spelling.chars().count() {
                self.advance();
            }
            self.track_braces(*kind);
            self.push(*kind, start, line, column);
            return;
        }

        self.advance();
        self.push(TokenKind::Error(LexErrorKind::UnexpectedChar), start, line, column);
    }

    fn track_braces(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::Punctuation(PunctuationId::LBrace) => self.brace_depth += 1,
            TokenKind::Punctuation(PunctuationId::RBrace) => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn scan_line_comment(&mut self, start: usize, line: u32, column: u32) {
        let doc = self.rest().starts_with("///") && !self.rest().starts_with("////");
        self.advance_while(|c| c != '\n');
        let kind = if doc { CommentKind::DocLine } else { CommentKind::Line };
        self.push(TokenKind::Comment(kind), start, line, column);
    }

    /// Block comments nest.
    fn scan_block_comment(&mut self, start: usize, line: u32, column: u32) {
        let doc = self.rest().starts_with("/**") && !self.rest().starts_with("/**/");
        self.advance();
        self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            let rest = self.rest();
            if rest.is_empty() {
                self.push(TokenKind::Error(LexErrorKind::UnterminatedComment), start, line, column);
                return;
            }
            if rest.starts_with("/*") {
                depth += 1;
                self.advance();
                self.advance();
            } else if rest.starts_with("*/") {
                depth -= 1;
                self.advance();
                self.advance();
            } else {
                self.advance();
            }
        }
        let kind = if doc { CommentKind::DocBlock } else { CommentKind::Block };
        self.push(TokenKind::Comment(kind), start, line, column);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovermark_core::lang::keywords::KeywordId;
    use hovermark_core::lang::operators::OperatorId;

    fn significant(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Comment(_)))
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = significant("final name = value;");
        assert_eq!(tokens[0].0, TokenKind::Keyword(KeywordId::Final));
        assert_eq!(tokens[1], (TokenKind::Ident, "name".to_string()));
        assert_eq!(tokens[2].0, TokenKind::Operator(OperatorId::Eq));
        assert_eq!(tokens.last().map(|t| t.0), Some(TokenKind::Eof));
    }

    #[test]
    fn test_angle_brackets_are_never_fused() {
        let kinds: Vec<TokenKind> = significant("a >>= b >= c << d").into_iter().map(|t| t.0).collect();
        let gt = TokenKind::Operator(OperatorId::Gt);
        let lt = TokenKind::Operator(OperatorId::Lt);
        let eq = TokenKind::Operator(OperatorId::Eq);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                gt,
                gt,
                eq,
                TokenKind::Ident,
                gt,
                eq,
                TokenKind::Ident,
                lt,
                lt,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_maximal_munch_for_other_operators() {
        let tokens = significant("a ??= b?.c?..d");
        assert_eq!(tokens[1].0, TokenKind::Operator(OperatorId::IfNullEq));
        assert_eq!(tokens[3].0, TokenKind::Punctuation(PunctuationId::QuestionDot));
        assert_eq!(tokens[5].0, TokenKind::Punctuation(PunctuationId::NullCascade));
    }

    #[test]
    fn test_whitespace_and_comments_are_tokens() {
        let tokens = tokenize("/// doc\n/* a /* nested */ b */ x");
        assert_eq!(tokens[0].kind, TokenKind::Comment(CommentKind::DocLine));
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].kind, TokenKind::Comment(CommentKind::Block));
        assert_eq!(tokens[2].text, "/* a /* nested */ b */");
        assert_eq!(tokens[4].text, "x");
        assert_eq!((tokens[4].line, tokens[4].column), (2, 24));
    }

    #[test]
    fn test_unexpected_character_is_an_error_token() {
        let tokens = tokenize("a ` b");
        assert_eq!(tokens[2].kind, TokenKind::Error(LexErrorKind::UnexpectedChar));
        let errs = errors(&tokens);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].span, Span::new(2, 3));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = tokenize("x /* open");
        assert_eq!(tokens[2].kind, TokenKind::Error(LexErrorKind::UnterminatedComment));
        assert_eq!(tokens[2].span, Span::new(2, 9));
    }

    #[test]
    fn test_token_spans_cover_source() {
        let source = "class A<T> { final x = '${1 + 2}'; }";
        let tokens = tokenize(source);
        let mut cursor = 0;
        for token in &tokens {
            assert_eq!(token.span.start, cursor);
            assert_eq!(&source[token.span.start..token.span.end], token.text);
            cursor = token.span.end;
        }
        assert_eq!(cursor, source.len());
    }
}
