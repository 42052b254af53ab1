/// Type parsing methods.
///
/// Named types (`prefix.Name<Args>?`), function types (`Ret Function<T>(params)?`), record types
/// (`(int, {String name})?`), type argument lists and declaration type parameter lists.
///
/// ## Notes
/// - `<` after a declared name is only taken as a type parameter list when the token after the matching `>` fits a
///   declaration (`(`, `{`, `extends`, `implements`, `with`, `on`, `=`); otherwise the cursor is restored.
/// - Inside `is` / `as` operands a trailing `?` is a nullable marker only if what follows cannot start an
///   expression, so `x is int ? a : b` stays a conditional.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        self.enter()?;
        let result = self.parse_type_inner();
        self.leave();
        result
    }

    fn parse_type_inner(&mut self) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        let mut ty = if self.check_punct(PunctuationId::LParen) {
            self.record_type()?
        } else if self.at_function_keyword() {
            self.function_type(None)?
        } else {
            self.named_type()?
        };
        while self.at_function_keyword() {
            ty = self.function_type(Some(ty))?;
        }
        Ok(ty)
    }

    /// Return `true` at `Function(` or `Function<`.
    fn at_function_keyword(&self) -> bool {
        self.check_ident_text("Function")
            && matches!(
                self.peek_at(1).kind,
                TokenKind::Punctuation(PunctuationId::LParen) | TokenKind::Operator(OperatorId::Lt)
            )
    }

    fn named_type(&mut self) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        let start = self.start_offset();
        let first = if self.check_keyword(KeywordId::Void) {
            let span = self.advance();
            Spanned::new("void".to_string(), span)
        } else {
            self.identifier("expected a type")?
        };
        let mut name = vec![first];
        while self.check_punct(PunctuationId::Dot) && self.peek_at(1).is_identifier_like() {
            self.advance();
            name.push(self.identifier("expected a type name")?);
        }
        let args = if self.check_op(OperatorId::Lt) {
            self.type_arguments()?
        } else {
            Vec::new()
        };
        let nullable = self.match_nullable();
        Ok(Spanned::new(
            TypeAnnotation::Named { name, args, nullable },
            self.span_from(start),
        ))
    }

    /// Parse `Function<T>(params)?`, with `return_type` already parsed (if any).
    fn function_type(
        &mut self,
        return_type: Option<Spanned<TypeAnnotation>>,
    ) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        let start = return_type.as_ref().map_or(self.start_offset(), |r| r.span.start);
        self.advance(); // `Function`
        let type_params = if self.check_op(OperatorId::Lt) {
            self.type_parameter_list()?
        } else {
            Vec::new()
        };
        self.expect_punct(PunctuationId::LParen, "expected `(` in function type")?;
        let mut params = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            let group = if self.match_punct(PunctuationId::LBracket) {
                Some((ParameterKind::OptionalPositional, PunctuationId::RBracket))
            } else if self.match_punct(PunctuationId::LBrace) {
                Some((ParameterKind::Named, PunctuationId::RBrace))
            } else {
                None
            };
            if let Some((kind, close)) = group {
                loop {
                    if self.match_punct(close) {
                        break;
                    }
                    params.push(self.function_type_param(kind)?);
                    if !self.match_punct(PunctuationId::Comma) {
                        self.expect_punct(close, "expected the parameter group to close")?;
                        break;
                    }
                }
                continue;
            }
            params.push(self.function_type_param(ParameterKind::Positional)?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "expected `)` in function type")?;
                break;
            }
        }
        let nullable = self.match_nullable();
        Ok(Spanned::new(
            TypeAnnotation::Function {
                return_type: return_type.map(Box::new),
                type_params,
                params,
                nullable,
            },
            self.span_from(start),
        ))
    }

    fn function_type_param(&mut self, kind: ParameterKind) -> Result<FunctionTypeParam, SyntaxError> {
        let required = self.match_keyword(KeywordId::Required);
        let ty = self.parse_type()?;
        let name = if self.peek().is_identifier_like() {
            Some(self.identifier("expected a parameter name")?)
        } else {
            None
        };
        Ok(FunctionTypeParam {
            kind,
            required,
            ty,
            name,
        })
    }

    /// Parse `(int, String label, {bool flag})?`.
    fn record_type(&mut self) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::LParen, "expected `(`")?;
        let mut positional = Vec::new();
        let mut named = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            if self.match_punct(PunctuationId::LBrace) {
                loop {
                    if self.match_punct(PunctuationId::RBrace) {
                        break;
                    }
                    named.push(self.record_type_field()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        self.expect_punct(PunctuationId::RBrace, "expected `}` in record type")?;
                        break;
                    }
                }
                continue;
            }
            positional.push(self.record_type_field()?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "expected `)` in record type")?;
                break;
            }
        }
        let nullable = self.match_nullable();
        Ok(Spanned::new(
            TypeAnnotation::Record {
                positional,
                named,
                nullable,
            },
            self.span_from(start),
        ))
    }

    fn record_type_field(&mut self) -> Result<RecordTypeField, SyntaxError> {
        let ty = self.parse_type()?;
        let name = if self.peek().is_identifier_like() {
            Some(self.identifier("expected a field name")?)
        } else {
            None
        };
        Ok(RecordTypeField { ty, name })
    }

    /// Consume a nullable `?` suffix if there is one.
    fn match_nullable(&mut self) -> bool {
        if !self.check_punct(PunctuationId::Question) {
            return false;
        }
        if self.in_type_test && self.token_starts_expr(self.peek_at(1)) {
            return false;
        }
        self.advance();
        true
    }

    /// Parse the type operand of `is` / `as`.
    fn type_test_operand(&mut self) -> Result<Spanned<TypeAnnotation>, SyntaxError> {
        let outer = self.in_type_test;
        self.in_type_test = true;
        let result = self.parse_type();
        self.in_type_test = outer;
        result
    }

    fn type_list(&mut self) -> Result<Vec<Spanned<TypeAnnotation>>, SyntaxError> {
        let mut types = vec![self.parse_type()?];
        while self.match_punct(PunctuationId::Comma) {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }

    // ========================================================================
    // Type arguments and parameters
    // ========================================================================

    /// Parse `<T, U>` in a position where it can only be a type argument list.
    fn type_arguments(&mut self) -> Result<Vec<Spanned<TypeAnnotation>>, SyntaxError> {
        self.expect_op(OperatorId::Lt, "expected `<`")?;
        let mut args = vec![self.parse_type()?];
        while self.match_punct(PunctuationId::Comma) {
            args.push(self.parse_type()?);
        }
        self.expect_op(OperatorId::Gt, "expected `>` to close the type arguments")?;
        Ok(args)
    }

    /// Speculatively parse `<...>` as type arguments inside an expression.
    ///
    /// ## Returns
    /// `Some(args)` if the region parses as types and the next token fits; otherwise `None` with the cursor and error
    /// list exactly as before the call.
    fn try_type_arguments(&mut self) -> Option<Vec<Spanned<TypeAnnotation>>> {
        if !self.check_op(OperatorId::Lt) {
            return None;
        }
        let snapshot = self.snapshot();
        match self.type_arguments() {
            Ok(args) if self.follows_angle_region(AngleContext::Expression) => Some(args),
            _ => {
                self.restore(snapshot);
                None
            }
        }
    }

    /// Parse declaration type parameters (`<T extends Comparable<T>, U>`) if present.
    fn type_parameters_opt(&mut self) -> Result<Vec<TypeParameter>, SyntaxError> {
        if !self.check_op(OperatorId::Lt) {
            return Ok(Vec::new());
        }
        let snapshot = self.snapshot();
        match self.type_parameter_list() {
            Ok(params) if self.follows_angle_region(AngleContext::Declaration) => Ok(params),
            _ => {
                self.restore(snapshot);
                Ok(Vec::new())
            }
        }
    }

    fn type_parameter_list(&mut self) -> Result<Vec<TypeParameter>, SyntaxError> {
        self.expect_op(OperatorId::Lt, "expected `<`")?;
        let mut params = Vec::new();
        loop {
            self.skip_annotations()?;
            let name = self.identifier("expected a type parameter name")?;
            let bound = if self.match_keyword(KeywordId::Extends) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParameter { name, bound });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_op(OperatorId::Gt, "expected `>` to close the type parameters")?;
        Ok(params)
    }

    /// Decide whether the token after a `<...>` region confirms it as generic syntax.
    fn follows_angle_region(&self, context: AngleContext) -> bool {
        let next = self.peek();
        match context {
            AngleContext::Expression => match next.kind {
                TokenKind::Punctuation(p) => matches!(
                    p,
                    PunctuationId::LParen
                        | PunctuationId::Dot
                        | PunctuationId::QuestionDot
                        | PunctuationId::Semicolon
                        | PunctuationId::Comma
                        | PunctuationId::RParen
                        | PunctuationId::RBracket
                        | PunctuationId::RBrace
                ),
                TokenKind::Operator(op) => matches!(op, OperatorId::EqEq | OperatorId::NotEq),
                TokenKind::Eof => true,
                _ => false,
            },
            AngleContext::Declaration => match next.kind {
                TokenKind::Punctuation(p) => matches!(p, PunctuationId::LParen | PunctuationId::LBrace),
                TokenKind::Operator(op) => op == OperatorId::Eq,
                TokenKind::Keyword(k) => matches!(
                    k,
                    KeywordId::Extends | KeywordId::Implements | KeywordId::With | KeywordId::On
                ),
                _ => false,
            },
        }
    }
}
