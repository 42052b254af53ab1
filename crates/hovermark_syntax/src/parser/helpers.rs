/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming significant tokens (`peek`, `peek_at`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Reassembling composite `<`/`>` operators from adjacent tokens
/// - Speculation (`snapshot` / `restore`) and nesting guards
/// - Error recovery (`synchronize`, `synchronize_in_block`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` once every significant token has been consumed.
    fn is_at_end(&self) -> bool {
        self.pos >= self.significant.len()
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Return the significant token `n` positions ahead of the cursor (or `Eof`).
    fn peek_at(&self, n: usize) -> &Token {
        self.significant
            .get(self.pos + n)
            .map(|&i| &self.tokens[i])
            .unwrap_or(&self.eof)
    }

    /// Return the current token with the lifetime of the token slice, if not at the end.
    fn current(&self) -> Option<&'a Token> {
        let tokens = self.tokens;
        self.significant.get(self.pos).map(|&i| &tokens[i])
    }

    /// Consume the current token and return its span.
    fn advance(&mut self) -> Span {
        let span = self.peek().span;
        if !self.is_at_end() {
            self.pos += 1;
        }
        span
    }

    fn advance_n(&mut self, n: usize) -> Span {
        let start = self.peek().span;
        let mut end = start;
        for _ in 0..n {
            end = self.advance();
        }
        start.merge(end)
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|p| self.significant.get(p)) {
            Some(&i) => self.tokens[i].span.end,
            None => self.peek().span.start,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn start_offset(&self) -> usize {
        self.peek().span.start
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    /// Return `true` if the current token is an identifier spelled `text`.
    fn check_ident_text(&self, text: &str) -> bool {
        self.peek().kind == TokenKind::Ident && self.peek().text == text
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn expect_op(&mut self, id: OperatorId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Consume a statement-terminating `;`.
    ///
    /// ## Notes
    /// - Snippets are often cut short: a missing `;` right before `}` or the end of input is recorded but does not
    ///   abort the enclosing construct.
    fn expect_semicolon(&mut self) -> Result<(), SyntaxError> {
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(());
        }
        if self.is_at_end() || self.check_punct(PunctuationId::RBrace) {
            let err = SyntaxError::syntax("expected `;`", Span::new(self.prev_end(), self.prev_end()));
            self.report(err);
            return Ok(());
        }
        Err(self.unexpected("expected `;`"))
    }

    /// Build an "expected X, found Y" error at the current token.
    fn unexpected(&self, msg: &str) -> SyntaxError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", token.text),
        };
        SyntaxError::syntax(format!("{msg}, found {found}"), token.span)
    }

    /// Record an error without aborting the current construct.
    fn report(&mut self, err: SyntaxError) {
        tracing::debug!(start = err.span.start, end = err.span.end, message = %err.message, "recovering from parse error");
        self.errors.push(err);
    }

    // ========================================================================
    // Speculation and nesting
    // ========================================================================

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            errors: self.errors.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.errors.truncate(snapshot.errors);
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::syntax("nesting is too deep", self.peek().span)
                .with_note(format!("at most {MAX_NESTING} levels are parsed")));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ========================================================================
    // Composite operators
    // ========================================================================

    /// Read the operator at the cursor, joining adjacent `<`/`>`/`=` tokens into `<=`, `<<`, `<<=`, `>=`, `>>`,
    /// `>>=`, `>>>` and `>>>=`.
    ///
    /// ## Returns
    /// The operator and the number of tokens it spans.
    fn peek_operator(&self) -> Option<(OperatorId, usize)> {
        let first = self.peek().operator_id()?;
        let adjacent = |i: usize| self.peek_at(i).span.end == self.peek_at(i + 1).span.start;
        let op_at = |i: usize| self.peek_at(i).operator_id();
        let joined = |i: usize, id: OperatorId| adjacent(i - 1) && op_at(i) == Some(id);

        let result = match first {
            OperatorId::Gt if joined(1, OperatorId::Gt) => {
                if joined(2, OperatorId::Gt) {
                    if joined(3, OperatorId::Eq) {
                        (OperatorId::UShrEq, 4)
                    } else {
                        (OperatorId::UShr, 3)
                    }
                } else if joined(2, OperatorId::Eq) {
                    (OperatorId::ShrEq, 3)
                } else {
                    (OperatorId::Shr, 2)
                }
            }
            OperatorId::Gt if joined(1, OperatorId::Eq) => (OperatorId::GtEq, 2),
            OperatorId::Lt if joined(1, OperatorId::Lt) => {
                if joined(2, OperatorId::Eq) {
                    (OperatorId::ShlEq, 3)
                } else {
                    (OperatorId::Shl, 2)
                }
            }
            OperatorId::Lt if joined(1, OperatorId::Eq) => (OperatorId::LtEq, 2),
            other => (other, 1),
        };
        Some(result)
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Return `true` if the current token can begin a new top-level construct.
    fn at_top_level_start(&self) -> bool {
        matches!(
            self.peek().keyword_id(),
            Some(
                KeywordId::Class
                    | KeywordId::Enum
                    | KeywordId::Mixin
                    | KeywordId::Extension
                    | KeywordId::Typedef
                    | KeywordId::Abstract
                    | KeywordId::Sealed
                    | KeywordId::Import
                    | KeywordId::Export
                    | KeywordId::Library
                    | KeywordId::Part
                    | KeywordId::If
                    | KeywordId::For
                    | KeywordId::While
                    | KeywordId::Do
                    | KeywordId::Switch
                    | KeywordId::Try
                    | KeywordId::Return
                    | KeywordId::Var
                    | KeywordId::Final
                    | KeywordId::Const
                    | KeywordId::Late
                    | KeywordId::Void
            )
        )
    }

    /// Skip to the next top-level synchronization point.
    ///
    /// Always consumes at least one token when the failed construct consumed none, then stops right after a `;` or
    /// in front of a keyword that starts a top-level construct.
    fn synchronize(&mut self, start: usize) {
        if self.pos == start {
            self.advance();
        }
        while !self.is_at_end() {
            if self.previous_is(PunctuationId::Semicolon) || self.at_top_level_start() {
                return;
            }
            self.advance();
        }
    }

    /// Skip to the end of the current statement or member inside a `{ ... }` body.
    ///
    /// Balanced braces are skipped as a unit; a `}` closing the enclosing body is left in place.
    fn synchronize_in_block(&mut self, start: usize) {
        if self.pos == start && !self.check_punct(PunctuationId::RBrace) {
            if self.check_punct(PunctuationId::Semicolon) {
                self.advance();
                return;
            }
            self.advance();
        }
        if self.previous_is(PunctuationId::Semicolon) {
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            if self.check_punct(PunctuationId::LBrace) {
                depth += 1;
            } else if self.check_punct(PunctuationId::RBrace) {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                self.advance();
                if depth == 0 {
                    return;
                }
                continue;
            } else if depth == 0 && self.check_punct(PunctuationId::Semicolon) {
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn previous_is(&self, id: PunctuationId) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.significant.get(p))
            .is_some_and(|&i| self.tokens[i].kind.is_punctuation(id))
    }

    /// Check if `token` can start an expression.
    fn token_starts_expr(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Ident | TokenKind::Number | TokenKind::String => true,
            TokenKind::Keyword(id) => {
                token.kind.is_identifier_like()
                    || matches!(
                        id,
                        KeywordId::True
                            | KeywordId::False
                            | KeywordId::Null
                            | KeywordId::This
                            | KeywordId::Super
                            | KeywordId::New
                            | KeywordId::Const
                            | KeywordId::Throw
                            | KeywordId::Switch
                    )
            }
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace | PunctuationId::Hash
            ),
            TokenKind::Operator(op) => op == OperatorId::Lt || operators::is_prefix(op),
            _ => false,
        }
    }
}
