//! String literal scanning.
//!
//! Single, double and triple quoted strings, raw strings (`r'...'`), escapes, and interpolation. Each `${...}` is
//! lexed by a nested [`Lexer`] that stops at the matching `}`; each `$name` yields a one-token run.

use super::{Interpolation, LexErrorKind, Lexer, MAX_INTERPOLATION_DEPTH, Token, TokenKind, keyword_id};
use crate::cst::Span;

impl<'a> Lexer<'a> {
    /// Scan a string literal whose opening quote is at the cursor. `start` includes any `r` prefix.
    pub(super) fn scan_string(&mut self, start: usize, line: u32, column: u32, raw: bool) {
        let Some(quote) = self.peek() else {
            return;
        };
        let triple: String = std::iter::repeat_n(quote, 3).collect();
        let is_triple = self.rest().starts_with(&triple);
        let open_len = if is_triple { 3 } else { 1 };
        for _ in 0..open_len {
            self.advance();
        }

        let mut interpolations = Vec::new();
        let terminated = loop {
            let Some(c) = self.peek() else {
                break false;
            };
            if is_triple {
                if self.rest().starts_with(&triple) {
                    for _ in 0..3 {
                        self.advance();
                    }
                    break true;
                }
            } else if c == quote {
                self.advance();
                break true;
            } else if c == '\n' {
                break false;
            }

            match c {
                '\\' if !raw => {
                    self.advance();
                    self.advance();
                }
                '$' if !raw => {
                    self.advance();
                    if let Some(interpolation) = self.scan_interpolation() {
                        interpolations.push(interpolation);
                    }
                }
                _ => {
                    self.advance();
                }
            }
        };

        let kind = if terminated {
            TokenKind::String
        } else {
            TokenKind::Error(LexErrorKind::UnterminatedString)
        };
        let token = self.push(kind, start, line, column);
        token.interpolations = interpolations;
    }

    /// Scan what follows a `$` inside a string.
    fn scan_interpolation(&mut self) -> Option<Interpolation> {
        match self.peek()? {
            '{' => {
                self.advance();
                let inner_start = self.pos;
                if self.depth >= MAX_INTERPOLATION_DEPTH {
                    return None;
                }
                let tokens = self.lex_nested();
                let span = Span::new(inner_start, self.pos);
                if self.peek() == Some('}') {
                    self.advance();
                }
                Some(Interpolation { span, tokens })
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.pos;
                let (line, column) = (self.line, self.column);
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let text = &self.source[start..self.pos];
                let kind = match keyword_id(text) {
                    Some(id) => TokenKind::Keyword(id),
                    None => TokenKind::Ident,
                };
                let span = Span::new(start, self.pos);
                let tokens = vec![
                    Token::new(kind, text, span, line, column),
                    Token::new(TokenKind::Eof, "", Span::new(self.pos, self.pos), self.line, self.column),
                ];
                Some(Interpolation { span, tokens })
            }
            _ => None,
        }
    }

    /// Lex an interpolated expression from the cursor up to (not including) its closing `}`.
    fn lex_nested(&mut self) -> Vec<Token> {
        let mut inner = Lexer {
            source: self.source,
            pos: self.pos,
            line: self.line,
            column: self.column,
            nested: true,
            depth: self.depth + 1,
            brace_depth: 0,
            tokens: Vec::new(),
        };
        inner.run();
        self.pos = inner.pos;
        self.line = inner.line;
        self.column = inner.column;
        inner.tokens
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{LexErrorKind, TokenKind, tokenize};

    #[test]
    fn test_quote_styles() {
        for source in ["'a'", "\"a\"", "'''a\n'b'''", "\"\"\"a\"\"\"", "r'\\d+'", "'it\\'s'"] {
            let tokens = tokenize(source);
            assert_eq!(tokens[0].kind, TokenKind::String, "{source}");
            assert_eq!(tokens[0].text, source);
        }
    }

    #[test]
    fn test_braced_interpolation_is_lexed() {
        let source = "'sum: ${a + b}!'";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::String);
        let interpolation = &tokens[0].interpolations[0];
        assert_eq!(&source[interpolation.span.start..interpolation.span.end], "a + b");
        let texts: Vec<&str> = interpolation.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", " ", "+", " ", "b", ""]);
        assert_eq!(interpolation.tokens[0].span.start, 8);
    }

    #[test]
    fn test_nested_braces_and_strings_inside_interpolation() {
        let source = "'${{1: '${x}'}[1]} tail'";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, source);
        let inner = &tokens[0].interpolations[0].tokens;
        let nested = inner.iter().find(|t| t.kind == TokenKind::String);
        assert_eq!(nested.map(|t| t.interpolations.len()), Some(1));
    }

    #[test]
    fn test_simple_interpolation() {
        let tokens = tokenize("'hi $name, \\$literal'");
        assert_eq!(tokens[0].interpolations.len(), 1);
        assert_eq!(tokens[0].interpolations[0].tokens[0].text, "name");
    }

    #[test]
    fn test_raw_strings_do_not_interpolate() {
        let tokens = tokenize("r'$x ${y}'");
        assert!(tokens[0].interpolations.is_empty());
    }

    #[test]
    fn test_unterminated_strings() {
        let tokens = tokenize("'abc\nx");
        assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::UnterminatedString));
        assert_eq!(tokens[0].text, "'abc");
        let tokens = tokenize("'''abc");
        assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::UnterminatedString));
        let tokens = tokenize("'${a");
        assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::UnterminatedString));
    }
}
