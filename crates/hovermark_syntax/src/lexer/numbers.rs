//! Numeric literal scanning: decimal, `0x` hex, fractional and exponent forms.

use super::Lexer;

impl<'a> Lexer<'a> {
    /// Consume a numeric literal starting at the cursor (a digit, or `.` followed by a digit).
    pub(super) fn scan_number(&mut self) {
        if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X'))
            && self.peek_nth(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            return;
        }

        self.scan_digits();
        // `1.toString()` is a method call, so a fraction needs a digit after the dot.
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.scan_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_nth(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.scan_digits();
            }
        }
    }

    /// Digits with `_` separators between them.
    fn scan_digits(&mut self) {
        while let Some(c) = self.peek() {
            let separator = c == '_' && {
                let rest = self.rest().trim_start_matches('_');
                rest.starts_with(|d: char| d.is_ascii_digit())
            };
            if c.is_ascii_digit() || separator {
                self.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::{TokenKind, tokenize};

    fn first(source: &str) -> (TokenKind, String) {
        let tokens = tokenize(source);
        (tokens[0].kind, tokens[0].text.clone())
    }

    #[test]
    fn test_number_forms() {
        for source in ["42", "0x1F", "3.14", "1e10", "2.5E-3", ".5", "1_000_000"] {
            assert_eq!(first(source), (TokenKind::Number, source.to_string()));
        }
    }

    #[test]
    fn test_method_call_on_integer_literal() {
        let tokens = tokenize("1.isEven");
        assert_eq!(tokens[0].text, "1");
        assert_eq!(tokens[1].text, ".");
    }

    #[test]
    fn test_dangling_exponent_is_not_consumed() {
        let tokens = tokenize("1e");
        assert_eq!(tokens[0].text, "1");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }
}
