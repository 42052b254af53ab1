/// Expression parsing methods.
///
/// Precedence climbing over the operator registry's table: assignment is lowest, then the conditional `?:`, the
/// binary levels from `??` up to multiplicative, prefix operators, and finally postfix selectors (member access,
/// calls, indexing, `!`, `++`, `--`).
///
/// ## Notes
/// - `is` / `as` sit at the relational level and do not chain with each other's operands.
/// - Cascade sections start from a [`Expr::CascadeReceiver`] whose span is the `..` / `?..` token.
/// - `(` starts a function expression only when the balanced group is followed by `=>`, `{`, `async` or `sync*`;
///   otherwise it is a record literal (a named field or a comma inside) or a parenthesized expression.
impl<'a> Parser<'a> {
    // ========================================================================
    // Entry points
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        self.enter()?;
        let result = self.expression_inner(true);
        self.leave();
        result
    }

    /// Parse an expression in a position where a cascade would be ambiguous (conditional branches, initializers).
    fn expression_no_cascade(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        self.enter()?;
        let result = self.expression_inner(false);
        self.leave();
        result
    }

    fn expression_inner(&mut self, allow_cascade: bool) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        if self.match_keyword(KeywordId::Throw) {
            let value = self.nested_expression(allow_cascade)?;
            return Ok(Spanned::new(Expr::Throw(Box::new(value)), self.span_from(start)));
        }
        if self.at_function_expression() {
            return self.function_expression(allow_cascade);
        }

        let mut target = self.conditional()?;
        if allow_cascade && self.at_cascade() {
            let mut sections = Vec::new();
            while self.at_cascade() {
                sections.push(self.cascade_section()?);
            }
            target = Spanned::new(
                Expr::Cascade {
                    target: Box::new(target),
                    sections,
                },
                self.span_from(start),
            );
        }

        if let Some((op, count)) = self.peek_operator() {
            if operators::is_assignment(op) {
                self.advance_n(count);
                let value = self.nested_expression(allow_cascade)?;
                return Ok(Spanned::new(
                    Expr::Assignment {
                        op,
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ));
            }
        }
        Ok(target)
    }

    fn nested_expression(&mut self, allow_cascade: bool) -> Result<Spanned<Expr>, SyntaxError> {
        if allow_cascade {
            self.expression()
        } else {
            self.expression_no_cascade()
        }
    }

    fn at_cascade(&self) -> bool {
        self.check_punct(PunctuationId::Cascade) || self.check_punct(PunctuationId::NullCascade)
    }

    /// Parse one `..name(args)` / `?..[i] = v` section.
    fn cascade_section(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let null_aware = self.check_punct(PunctuationId::NullCascade);
        let receiver_span = self.advance();
        let receiver = Spanned::new(Expr::CascadeReceiver { null_aware }, receiver_span);

        let mut section = if self.check_punct(PunctuationId::LBracket) {
            self.index_selector(receiver, start)?
        } else {
            let name = self.identifier("expected a member name after `..`")?;
            self.member_selector(receiver, name, false, start)?
        };
        section = self.selectors(section, start)?;

        if let Some((op, count)) = self.peek_operator() {
            if operators::is_assignment(op) {
                self.advance_n(count);
                let value = self.expression_no_cascade()?;
                section = Spanned::new(
                    Expr::Assignment {
                        op,
                        target: Box::new(section),
                        value: Box::new(value),
                    },
                    self.span_from(start),
                );
            }
        }
        Ok(section)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn conditional(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let condition = self.binary(operators::CONDITIONAL_PRECEDENCE + 1)?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(condition);
        }
        let then_expr = self.expression_no_cascade()?;
        self.expect_punct(PunctuationId::Colon, "expected `:` in conditional expression")?;
        let else_expr = self.expression_no_cascade()?;
        Ok(Spanned::new(
            Expr::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            self.span_from(start),
        ))
    }

    /// Precedence climbing for infix operators at or above `min_prec`, plus `is` / `as`.
    fn binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let mut left = self.unary()?;
        loop {
            if min_prec <= operators::TYPE_TEST_PRECEDENCE {
                if self.match_keyword(KeywordId::Is) {
                    let negated = self.match_op(OperatorId::Bang);
                    let ty = self.type_test_operand()?;
                    left = Spanned::new(
                        Expr::TypeTest {
                            expr: Box::new(left),
                            ty,
                            negated,
                        },
                        self.span_from(start),
                    );
                    continue;
                }
                if self.match_keyword(KeywordId::As) {
                    let ty = self.type_test_operand()?;
                    left = Spanned::new(
                        Expr::AsCast {
                            expr: Box::new(left),
                            ty,
                        },
                        self.span_from(start),
                    );
                    continue;
                }
            }

            let Some((op, count)) = self.peek_operator() else {
                break;
            };
            let Some(prec) = operators::infix_precedence(op) else {
                break;
            };
            if prec < min_prec || operators::is_assignment(op) {
                break;
            }
            self.advance_n(count);
            let right = self.binary(prec + 1)?;
            left = Spanned::new(
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        if let Some(op) = self.peek().operator_id().filter(|op| operators::is_prefix(*op)) {
            self.advance();
            let operand = self.guarded_unary()?;
            return Ok(Spanned::new(
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                },
                self.span_from(start),
            ));
        }
        if self.check_keyword(KeywordId::Await) && self.token_starts_expr(self.peek_at(1)) {
            self.advance();
            let operand = self.guarded_unary()?;
            return Ok(Spanned::new(Expr::Await(Box::new(operand)), self.span_from(start)));
        }
        let expr = self.primary()?;
        self.selectors(expr, start)
    }

    fn guarded_unary(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        self.enter()?;
        let result = self.unary();
        self.leave();
        result
    }

    /// Apply member access, calls, indexing and postfix operators to `expr`.
    fn selectors(&mut self, mut expr: Spanned<Expr>, start: usize) -> Result<Spanned<Expr>, SyntaxError> {
        loop {
            if self.check_punct(PunctuationId::Dot) || self.check_punct(PunctuationId::QuestionDot) {
                let null_aware = self.check_punct(PunctuationId::QuestionDot);
                self.advance();
                let name = self.member_name()?;
                expr = self.member_selector(expr, name, null_aware, start)?;
            } else if self.check_punct(PunctuationId::LParen) {
                let args = self.arguments()?;
                expr = Spanned::new(
                    Expr::FunctionCall {
                        callee: Box::new(expr),
                        type_args: Vec::new(),
                        args,
                    },
                    self.span_from(start),
                );
            } else if self.check_punct(PunctuationId::LBracket) {
                expr = self.index_selector(expr, start)?;
            } else if let Some(op) = self.peek().operator_id().filter(|op| operators::is_postfix(*op)) {
                self.advance();
                expr = Spanned::new(
                    Expr::Postfix {
                        op,
                        operand: Box::new(expr),
                    },
                    self.span_from(start),
                );
            } else {
                return Ok(expr);
            }
        }
    }

    /// Name after `.` / `?.`; `new` is accepted for constructor tear-offs.
    fn member_name(&mut self) -> Result<Name, SyntaxError> {
        if self.check_keyword(KeywordId::New) {
            let span = self.advance();
            return Ok(Spanned::new("new".to_string(), span));
        }
        self.identifier("expected a member name")
    }

    fn member_selector(
        &mut self,
        target: Spanned<Expr>,
        name: Name,
        null_aware: bool,
        start: usize,
    ) -> Result<Spanned<Expr>, SyntaxError> {
        let type_args = self.try_type_arguments().unwrap_or_default();
        if self.check_punct(PunctuationId::LParen) {
            let args = self.arguments()?;
            return Ok(Spanned::new(
                Expr::MethodInvocation {
                    target: Some(Box::new(target)),
                    null_aware,
                    name,
                    type_args,
                    args,
                },
                self.span_from(start),
            ));
        }
        Ok(Spanned::new(
            Expr::PropertyAccess {
                target: Box::new(target),
                name,
                null_aware,
            },
            self.span_from(start),
        ))
    }

    fn index_selector(&mut self, target: Spanned<Expr>, start: usize) -> Result<Spanned<Expr>, SyntaxError> {
        self.expect_punct(PunctuationId::LBracket, "expected `[`")?;
        let index = self.expression()?;
        self.expect_punct(PunctuationId::RBracket, "expected `]` after the index")?;
        Ok(Spanned::new(
            Expr::Index {
                target: Box::new(target),
                index: Box::new(index),
                null_aware: false,
            },
            self.span_from(start),
        ))
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn primary(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("expected an expression"));
        };
        let simple = |expr: Expr| Spanned::new(expr, token.span);
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(simple(Expr::Number(token.text.clone())))
            }
            TokenKind::String | TokenKind::Error(LexErrorKind::UnterminatedString) => Ok(self.string_literal()),
            TokenKind::Ident => self.identifier_expression(),
            TokenKind::Keyword(id) => match id {
                KeywordId::True | KeywordId::False => {
                    self.advance();
                    Ok(simple(Expr::Bool(id == KeywordId::True)))
                }
                KeywordId::Null => {
                    self.advance();
                    Ok(simple(Expr::Null))
                }
                KeywordId::This => {
                    self.advance();
                    Ok(simple(Expr::This))
                }
                KeywordId::Super => {
                    self.advance();
                    Ok(simple(Expr::Super))
                }
                KeywordId::New | KeywordId::Const => self.creation_or_const(),
                _ if token.is_identifier_like() => self.identifier_expression(),
                _ => Err(self.unexpected("expected an expression")),
            },
            TokenKind::Punctuation(PunctuationId::LParen) => self.paren_or_record(false),
            TokenKind::Punctuation(PunctuationId::LBracket) => self.list_literal(false, Vec::new()),
            TokenKind::Punctuation(PunctuationId::LBrace) => self.set_or_map_literal(false, Vec::new()),
            TokenKind::Punctuation(PunctuationId::Hash) => self.symbol_literal(),
            TokenKind::Operator(OperatorId::Lt) => self.typed_collection(false),
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    fn identifier_expression(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let name = self.identifier("expected an expression")?;
        let start = name.span.start;
        let type_args = self.try_type_arguments().unwrap_or_default();
        if self.check_punct(PunctuationId::LParen) {
            let args = self.arguments()?;
            return Ok(Spanned::new(
                Expr::MethodInvocation {
                    target: None,
                    null_aware: false,
                    name,
                    type_args,
                    args,
                },
                self.span_from(start),
            ));
        }
        if !type_args.is_empty() {
            return Ok(Spanned::new(
                Expr::TypeInstantiation { name, type_args },
                self.span_from(start),
            ));
        }
        Ok(Spanned::new(Expr::Identifier(name.node), name.span))
    }

    /// Parse adjacent string tokens as one literal, with their interpolations parsed as expressions.
    fn string_literal(&mut self) -> Spanned<Expr> {
        let start = self.start_offset();
        let mut raw = String::new();
        let mut interpolations = Vec::new();
        while let Some(token) = self.current() {
            if !matches!(
                token.kind,
                TokenKind::String | TokenKind::Error(LexErrorKind::UnterminatedString)
            ) {
                break;
            }
            self.advance();
            if !raw.is_empty() {
                raw.push(' ');
            }
            raw.push_str(&token.text);
            for interpolation in &token.interpolations {
                if let Some(expr) = self.interpolation(interpolation) {
                    interpolations.push(expr);
                }
            }
        }
        Spanned::new(
            Expr::String(StringLiteral { raw, interpolations }),
            self.span_from(start),
        )
    }

    /// Parse the token run of one `${...}` / `$name` site with a sub-parser sharing the nesting budget.
    fn interpolation(&mut self, interpolation: &Interpolation) -> Option<Spanned<Expr>> {
        let mut sub = Parser::with_depth(&interpolation.tokens, self.depth);
        if sub.is_at_end() {
            return None;
        }
        let result = sub.expression();
        if result.is_ok() && !sub.is_at_end() {
            let err = sub.unexpected("unexpected token in string interpolation");
            sub.report(err);
        }
        self.errors.append(&mut sub.errors);
        match result {
            Ok(expr) => Some(expr),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    /// Parse `new T(...)`, `const T.named(...)` or a `const` collection/record literal.
    fn creation_or_const(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let keyword = self.peek().keyword_id().unwrap_or(KeywordId::New);
        self.advance();

        if keyword == KeywordId::Const {
            match self.peek().kind {
                TokenKind::Punctuation(PunctuationId::LBracket) => {
                    return self.with_start(start, |p| p.list_literal(true, Vec::new()));
                }
                TokenKind::Punctuation(PunctuationId::LBrace) => {
                    return self.with_start(start, |p| p.set_or_map_literal(true, Vec::new()));
                }
                TokenKind::Punctuation(PunctuationId::LParen) => {
                    return self.with_start(start, |p| p.paren_or_record(true));
                }
                TokenKind::Operator(OperatorId::Lt) => {
                    return self.with_start(start, |p| p.typed_collection(true));
                }
                _ => {}
            }
        }

        let mut ty = self.parse_type()?;
        let mut constructor = None;
        if let TypeAnnotation::Named { name, args, .. } = &mut ty.node {
            let lowercase_tail = name.len() >= 2
                && args.is_empty()
                && name.last().is_some_and(|n| n.node.starts_with(|c: char| c.is_lowercase()));
            if lowercase_tail {
                constructor = name.pop();
                if let Some(last) = name.last() {
                    ty.span = Span::new(ty.span.start, last.span.end);
                }
            }
        }
        if constructor.is_none() && self.match_punct(PunctuationId::Dot) {
            constructor = Some(self.member_name()?);
        }
        let args = self.arguments()?;
        Ok(Spanned::new(
            Expr::InstanceCreation {
                keyword,
                ty,
                constructor,
                args,
            },
            self.span_from(start),
        ))
    }

    /// Run `parse` and widen the resulting span to begin at `start` (a leading `const`).
    fn with_start(
        &mut self,
        start: usize,
        parse: impl FnOnce(&mut Self) -> Result<Spanned<Expr>, SyntaxError>,
    ) -> Result<Spanned<Expr>, SyntaxError> {
        let mut expr = parse(self)?;
        expr.span = Span::new(start, expr.span.end);
        Ok(expr)
    }

    /// Parse `(expr)`, `(a, b)`, `(name: v)` or `()`.
    fn paren_or_record(&mut self, is_const: bool) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::LParen, "expected `(`")?;
        let mut fields = Vec::new();
        let mut is_record = is_const;
        loop {
            if self.check_punct(PunctuationId::RParen) {
                if fields.is_empty() {
                    is_record = true;
                }
                break;
            }
            let name = if self.peek().is_identifier_like() && self.peek_at(1).kind.is_punctuation(PunctuationId::Colon)
            {
                is_record = true;
                let name = self.identifier("expected a field name")?;
                self.advance();
                Some(name)
            } else {
                None
            };
            let value = self.expression()?;
            fields.push(RecordField { name, value });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            is_record = true;
        }
        self.expect_punct(PunctuationId::RParen, "expected `)`")?;

        if !is_record {
            if let Some(field) = fields.pop() {
                return Ok(Spanned::new(Expr::Paren(Box::new(field.value)), self.span_from(start)));
            }
        }
        Ok(Spanned::new(Expr::Record { is_const, fields }, self.span_from(start)))
    }

    /// Parse `<T>[...]` or `<K, V>{...}`.
    fn typed_collection(&mut self, is_const: bool) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let type_args = self.type_arguments()?;
        let mut expr = if self.check_punct(PunctuationId::LBracket) {
            self.list_literal(is_const, type_args)?
        } else if self.check_punct(PunctuationId::LBrace) {
            self.set_or_map_literal(is_const, type_args)?
        } else {
            return Err(self.unexpected("expected `[` or `{` after type arguments"));
        };
        expr.span = Span::new(start, expr.span.end);
        Ok(expr)
    }

    fn list_literal(
        &mut self,
        is_const: bool,
        type_args: Vec<Spanned<TypeAnnotation>>,
    ) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::LBracket, "expected `[`")?;
        let elements = self.collection_elements(PunctuationId::RBracket, false)?;
        Ok(Spanned::new(
            Expr::List(CollectionLiteral {
                is_const,
                type_args,
                elements,
            }),
            self.span_from(start),
        ))
    }

    fn set_or_map_literal(
        &mut self,
        is_const: bool,
        type_args: Vec<Spanned<TypeAnnotation>>,
    ) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::LBrace, "expected `{`")?;
        let elements = self.collection_elements(PunctuationId::RBrace, true)?;
        Ok(Spanned::new(
            Expr::SetOrMap(CollectionLiteral {
                is_const,
                type_args,
                elements,
            }),
            self.span_from(start),
        ))
    }

    fn collection_elements(
        &mut self,
        close: PunctuationId,
        allow_entries: bool,
    ) -> Result<Vec<Spanned<CollectionElement>>, SyntaxError> {
        let mut elements = Vec::new();
        loop {
            if self.match_punct(close) {
                break;
            }
            elements.push(self.collection_element(allow_entries)?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(close, "expected the collection literal to close")?;
                break;
            }
        }
        Ok(elements)
    }

    fn collection_element(&mut self, allow_entries: bool) -> Result<Spanned<CollectionElement>, SyntaxError> {
        self.enter()?;
        let result = self.collection_element_inner(allow_entries);
        self.leave();
        result
    }

    fn collection_element_inner(&mut self, allow_entries: bool) -> Result<Spanned<CollectionElement>, SyntaxError> {
        let start = self.start_offset();

        if self.check_punct(PunctuationId::Spread) || self.check_punct(PunctuationId::NullSpread) {
            let null_aware = self.check_punct(PunctuationId::NullSpread);
            self.advance();
            let expr = self.expression()?;
            return Ok(Spanned::new(
                CollectionElement::Spread { null_aware, expr },
                self.span_from(start),
            ));
        }

        if self.match_keyword(KeywordId::If) {
            let condition = self.parenthesized_condition()?;
            let then_element = Box::new(self.collection_element(allow_entries)?);
            let else_element = if self.match_keyword(KeywordId::Else) {
                Some(Box::new(self.collection_element(allow_entries)?))
            } else {
                None
            };
            return Ok(Spanned::new(
                CollectionElement::If {
                    condition,
                    then_element,
                    else_element,
                },
                self.span_from(start),
            ));
        }

        let is_await = self.check_keyword(KeywordId::Await) && self.peek_at(1).kind.is_keyword(KeywordId::For);
        if is_await || self.check_keyword(KeywordId::For) {
            if is_await {
                self.advance();
            }
            self.expect_keyword(KeywordId::For, "expected `for`")?;
            let parts = self.for_loop_parts()?;
            let body = Box::new(self.collection_element(allow_entries)?);
            return Ok(Spanned::new(
                CollectionElement::For { is_await, parts, body },
                self.span_from(start),
            ));
        }

        let expr = self.expression()?;
        if allow_entries && self.match_punct(PunctuationId::Colon) {
            let value = self.expression()?;
            return Ok(Spanned::new(
                CollectionElement::MapEntry { key: expr, value },
                self.span_from(start),
            ));
        }
        Ok(Spanned::new(CollectionElement::Expr(expr), self.span_from(start)))
    }

    /// Parse `#name`, `#a.b` or `#+`.
    fn symbol_literal(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::Hash, "expected `#`")?;
        let text = if let Some((op, count)) = self.peek_operator() {
            self.advance_n(count);
            operators::as_str(op).to_string()
        } else {
            let mut text = self.identifier("expected a symbol name")?.node;
            while self.check_punct(PunctuationId::Dot) && self.peek_at(1).is_identifier_like() {
                self.advance();
                text.push('.');
                text.push_str(&self.identifier("expected a symbol name")?.node);
            }
            text
        };
        Ok(Spanned::new(Expr::Symbol(text), self.span_from(start)))
    }

    // ========================================================================
    // Arguments and function expressions
    // ========================================================================

    /// Parse `(a, b, name: c)`; a trailing comma is allowed.
    fn arguments(&mut self) -> Result<Arguments, SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "expected `(`")?;
        let mut args = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            let start = self.start_offset();
            let name = if self.peek().is_identifier_like() && self.peek_at(1).kind.is_punctuation(PunctuationId::Colon)
            {
                let name = self.identifier("expected an argument name")?;
                self.advance();
                Some(name)
            } else {
                None
            };
            let value = self.expression()?;
            args.push(Spanned::new(Argument { name, value }, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "expected `)` after arguments")?;
                break;
            }
        }
        Ok(Arguments { args })
    }

    /// Return `true` at `(params) =>`, `(params) {`, `(params) async` or `<T>(params) ...`.
    fn at_function_expression(&self) -> bool {
        let mut i = 0;
        if self.check_op(OperatorId::Lt) {
            match self.skip_angles(0) {
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
        next.kind.is_punctuation(PunctuationId::FatArrow)
            || next.kind.is_punctuation(PunctuationId::LBrace)
            || next.kind.is_keyword(KeywordId::Async)
            || (next.kind.is_keyword(KeywordId::Sync) && self.peek_at(end + 1).kind.is_operator(OperatorId::Star))
    }

    fn function_expression(&mut self, allow_cascade: bool) -> Result<Spanned<Expr>, SyntaxError> {
        let start = self.start_offset();
        let type_params = self.type_parameters_opt()?;
        let params = self.formal_parameters()?;
        let marker = self.async_marker();
        let kind = if self.match_punct(PunctuationId::FatArrow) {
            BodyKind::Expression(self.nested_expression(allow_cascade)?)
        } else {
            BodyKind::Block(self.block()?)
        };
        Ok(Spanned::new(
            Expr::Function(Box::new(FunctionExpr {
                type_params,
                params,
                body: FunctionBody { marker, kind },
            })),
            self.span_from(start),
        ))
    }
}
