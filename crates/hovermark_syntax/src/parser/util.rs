/// Lookahead scanners, doc comment lookup and small conversions.
///
/// The scanners (`scan_type`, `skip_balanced`, `skip_angles`) walk significant tokens without consuming them and
/// are used to decide between declarations and expressions before committing to either.
impl<'a> Parser<'a> {
    // ========================================================================
    // Names and source text
    // ========================================================================

    /// Consume an identifier (or a keyword usable as one).
    fn identifier(&mut self, msg: &str) -> Result<Name, SyntaxError> {
        match self.current() {
            Some(token) if token.is_identifier_like() => {
                let span = self.advance();
                Ok(Spanned::new(token.text.clone(), span))
            }
            _ => Err(self.unexpected(msg)),
        }
    }

    /// Raw text of the significant tokens `from..to`, joined by their original spacing.
    fn source_text(&self, from: usize, to: usize) -> String {
        let mut text = String::new();
        let mut last_end = None;
        for &i in self.significant.get(from..to).unwrap_or_default() {
            let token = &self.tokens[i];
            if last_end.is_some_and(|end| end < token.span.start) {
                text.push(' ');
            }
            text.push_str(&token.text);
            last_end = Some(token.span.end);
        }
        text
    }

    /// Find the doc comment attached to the significant token at `sig_pos`.
    ///
    /// ## Notes
    /// - Only `///` runs and `/** */` blocks count. A plain comment, code, or a blank line ends the search, so a doc
    ///   comment separated from the declaration by an empty line is not attached.
    fn doc_comment_at(&self, sig_pos: usize) -> Option<String> {
        let first = *self.significant.get(sig_pos)?;
        let mut lines: Vec<&str> = Vec::new();
        let mut block: Option<&str> = None;
        let mut i = first;
        while i > 0 {
            i -= 1;
            let token = &self.tokens[i];
            match token.kind {
                TokenKind::Whitespace => {
                    if token.text.matches('\n').count() > 1 {
                        break;
                    }
                }
                TokenKind::Comment(CommentKind::DocLine) => lines.push(token.text.as_str()),
                TokenKind::Comment(CommentKind::DocBlock) if lines.is_empty() => {
                    block = Some(token.text.as_str());
                    break;
                }
                _ => break,
            }
        }

        let text = if let Some(block) = block {
            render_doc_block(block)
        } else {
            if lines.is_empty() {
                return None;
            }
            lines
                .iter()
                .rev()
                .map(|line| {
                    let body = line.trim_start_matches('/');
                    body.strip_prefix(' ').unwrap_or(body).trim_end()
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        let text = text.trim_matches('\n').to_string();
        (!text.is_empty()).then_some(text)
    }

    // ========================================================================
    // Lookahead scanners
    // ========================================================================

    /// Scan a type starting `offset` significant tokens ahead.
    ///
    /// ## Returns
    /// The offset just past the type, or `None` if no type starts there.
    fn scan_type(&self, offset: usize) -> Option<usize> {
        let mut i = offset;
        let token = self.peek_at(i);
        let at_function = |i: usize| {
            self.peek_at(i).kind == TokenKind::Ident
                && self.peek_at(i).text == "Function"
                && matches!(
                    self.peek_at(i + 1).kind,
                    TokenKind::Punctuation(PunctuationId::LParen) | TokenKind::Operator(OperatorId::Lt)
                )
        };

        if token.kind.is_punctuation(PunctuationId::LParen) {
            i = self.skip_balanced(i)?;
            if self.peek_at(i).kind.is_punctuation(PunctuationId::Question) {
                i += 1;
            }
        } else if !at_function(i) {
            let starts_type = token.kind.is_keyword(KeywordId::Void)
                || (token.is_identifier_like()
                    && !matches!(token.keyword_id(), Some(KeywordId::Await | KeywordId::Yield)));
            if !starts_type {
                return None;
            }
            i += 1;
            while self.peek_at(i).kind.is_punctuation(PunctuationId::Dot) && self.peek_at(i + 1).is_identifier_like() {
                i += 2;
            }
            if self.peek_at(i).kind.is_operator(OperatorId::Lt) {
                i = self.skip_angles(i)?;
            }
            if self.peek_at(i).kind.is_punctuation(PunctuationId::Question) {
                i += 1;
            }
        }

        while at_function(i) {
            i += 1;
            if self.peek_at(i).kind.is_operator(OperatorId::Lt) {
                i = self.skip_angles(i)?;
            }
            if !self.peek_at(i).kind.is_punctuation(PunctuationId::LParen) {
                return None;
            }
            i = self.skip_balanced(i)?;
            if self.peek_at(i).kind.is_punctuation(PunctuationId::Question) {
                i += 1;
            }
        }
        Some(i)
    }

    /// Skip a balanced `(...)`, `[...]` or `{...}` group starting at `offset`.
    fn skip_balanced(&self, offset: usize) -> Option<usize> {
        let mut stack = Vec::new();
        let mut i = offset;
        loop {
            let token = self.peek_at(i);
            match token.kind {
                TokenKind::Eof => return None,
                TokenKind::Punctuation(p @ (PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace)) => {
                    stack.push(p);
                }
                TokenKind::Punctuation(p @ (PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)) => {
                    let open = stack.pop()?;
                    let matches = matches!(
                        (open, p),
                        (PunctuationId::LParen, PunctuationId::RParen)
                            | (PunctuationId::LBracket, PunctuationId::RBracket)
                            | (PunctuationId::LBrace, PunctuationId::RBrace)
                    );
                    if !matches {
                        return None;
                    }
                }
                _ if stack.is_empty() => return None,
                _ => {}
            }
            i += 1;
            if stack.is_empty() {
                return Some(i);
            }
        }
    }

    /// Skip a `<...>` region made only of tokens that can appear in type arguments.
    fn skip_angles(&self, offset: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = offset;
        loop {
            let token = self.peek_at(i);
            match token.kind {
                TokenKind::Operator(OperatorId::Lt) => depth += 1,
                TokenKind::Operator(OperatorId::Gt) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket) => {
                    i = self.skip_balanced(i)?;
                    continue;
                }
                TokenKind::Punctuation(PunctuationId::Comma | PunctuationId::Dot | PunctuationId::Question) => {}
                TokenKind::Punctuation(PunctuationId::LBrace) if depth > 0 => {
                    // named record fields inside a type argument
                    i = self.skip_balanced(i)?;
                    continue;
                }
                TokenKind::Keyword(KeywordId::Void | KeywordId::Extends) => {}
                _ if token.is_identifier_like() => {}
                _ => return None,
            }
            i += 1;
        }
    }

    fn looks_like_type_then_name(&self) -> bool {
        self.looks_like_type_then(|t| t.is_identifier_like())
    }

    /// Return `true` if a type starts at the cursor and the token after it satisfies `pred`.
    fn looks_like_type_then(&self, pred: impl Fn(&Token) -> bool) -> bool {
        self.scan_type(0).is_some_and(|end| pred(self.peek_at(end)))
    }

    /// Return `true` if the cursor is at `Type name` followed by something a declaration allows.
    fn looks_like_declaration(&self) -> bool {
        let Some(end) = self.scan_type(0) else {
            return false;
        };
        let name = self.peek_at(end);
        if !name.is_identifier_like() {
            return false;
        }
        if matches!(name.keyword_id(), Some(KeywordId::Get | KeywordId::Set | KeywordId::Operator))
            && (self.peek_at(end + 1).is_identifier_like() || self.peek_at(end + 1).kind.is_operator(OperatorId::Eq))
        {
            return true;
        }
        match self.peek_at(end + 1).kind {
            TokenKind::Eof => true,
            TokenKind::Operator(op) => matches!(op, OperatorId::Eq | OperatorId::Lt),
            TokenKind::Keyword(KeywordId::In) => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::Semicolon
                    | PunctuationId::Comma
                    | PunctuationId::LParen
                    | PunctuationId::RParen
                    | PunctuationId::RBrace
            ),
            _ => false,
        }
    }

    /// Return `true` at `name(params) {` / `name<T>(params) =>`: a function without a return type.
    fn looks_like_untyped_function(&self) -> bool {
        if self.peek().kind != TokenKind::Ident {
            return false;
        }
        let mut i = 1;
        if self.peek_at(i).kind.is_operator(OperatorId::Lt) {
            match self.skip_angles(i) {
                Some(end) => i = end,
                None => return false,
            }
        }
        if !self.peek_at(i).kind.is_punctuation(PunctuationId::LParen) {
            return false;
        }
        let Some(end) = self.skip_balanced(i) else {
            return false;
        };
        let next = self.peek_at(end);
        next.kind.is_punctuation(PunctuationId::LBrace)
            || next.kind.is_punctuation(PunctuationId::FatArrow)
            || next.kind.is_keyword(KeywordId::Async)
            || (next.kind.is_keyword(KeywordId::Sync) && self.peek_at(end + 1).kind.is_operator(OperatorId::Star))
    }
}

/// Strip the quotes (and a raw `r` prefix) from a simple string literal.
fn unquote(text: &str) -> &str {
    let text = text.strip_prefix('r').unwrap_or(text);
    for quote in ["'''", "\"\"\"", "'", "\""] {
        if let Some(inner) = text.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    text
}

fn render_doc_block(text: &str) -> String {
    let body = text.strip_prefix("/**").unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a function type from a parameter list, for function-typed parameters and legacy typedefs.
///
/// Untyped parameters are typed `dynamic`.
fn function_type_from_params(
    return_type: Option<Spanned<TypeAnnotation>>,
    type_params: Vec<TypeParameter>,
    params: &[Spanned<FormalParameter>],
    nullable: bool,
    span: Span,
) -> Spanned<TypeAnnotation> {
    let params = params
        .iter()
        .map(|p| {
            let p = &p.node;
            let ty = p.ty.clone().unwrap_or_else(|| {
                Spanned::new(
                    TypeAnnotation::Named {
                        name: vec![Spanned::new("dynamic".to_string(), p.name.span)],
                        args: Vec::new(),
                        nullable: false,
                    },
                    p.name.span,
                )
            });
            FunctionTypeParam {
                kind: p.kind,
                required: p.required,
                ty,
                name: Some(p.name.clone()),
            }
        })
        .collect();
    Spanned::new(
        TypeAnnotation::Function {
            return_type: return_type.map(Box::new),
            type_params,
            params,
            nullable,
        },
        span,
    )
}
