/// Statement parsing methods.
///
/// This chunk handles blocks and every statement form: local variables and functions, control flow (`if`, `for`,
/// `for-in`, `while`, `do`, `switch`, `try`), jumps, `throw`/`rethrow`, `yield`, `assert`, and expression statements.
///
/// ## Notes
/// - Blocks recover statement by statement; a block left open at the end of input is closed implicitly (and reported),
///   so everything parsed before the truncation survives.
impl<'a> Parser<'a> {
    // ========================================================================
    // Blocks
    // ========================================================================

    fn block(&mut self) -> Result<Spanned<Block>, SyntaxError> {
        self.enter()?;
        let result = self.block_inner();
        self.leave();
        result
    }

    fn block_inner(&mut self) -> Result<Spanned<Block>, SyntaxError> {
        let open = self.expect_punct(PunctuationId::LBrace, "expected `{`")?;
        let mut statements = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() {
                self.report(self.unexpected("expected `}` to close the block").with_note(format!(
                    "the block opened at offset {}",
                    open.start
                )));
                break;
            }
            let start = self.pos;
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.report(e);
                    self.synchronize_in_block(start);
                }
            }
            if self.pos == start && !self.check_punct(PunctuationId::RBrace) {
                self.advance();
            }
        }
        Ok(Spanned::new(Block { statements }, self.span_from(open.start)))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Spanned<Stmt>, SyntaxError> {
        self.enter()?;
        let start = self.start_offset();
        let result = self.statement_inner();
        self.leave();
        result.map(|stmt| Spanned::new(stmt, self.span_from(start)))
    }

    fn statement_inner(&mut self) -> Result<Stmt, SyntaxError> {
        if self.check_punct(PunctuationId::LBrace) {
            return Ok(Stmt::Block(self.block()?.node));
        }
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(Stmt::Empty);
        }

        match self.peek().keyword_id() {
            Some(KeywordId::If) => return self.if_statement(),
            Some(KeywordId::For) => return self.for_statement(false),
            Some(KeywordId::Await) if self.peek_at(1).kind.is_keyword(KeywordId::For) => {
                self.advance();
                return self.for_statement(true);
            }
            Some(KeywordId::While) => return self.while_statement(),
            Some(KeywordId::Do) => return self.do_statement(),
            Some(KeywordId::Switch) => return self.switch_statement(),
            Some(KeywordId::Try) => return self.try_statement(),
            Some(KeywordId::Return) => {
                self.advance();
                let value = if self.check_punct(PunctuationId::Semicolon)
                    || self.check_punct(PunctuationId::RBrace)
                    || self.is_at_end()
                {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect_semicolon()?;
                return Ok(Stmt::Return(value));
            }
            Some(id @ (KeywordId::Break | KeywordId::Continue)) => {
                self.advance();
                let label = if self.peek().is_identifier_like() {
                    Some(self.identifier("expected a label")?)
                } else {
                    None
                };
                self.expect_semicolon()?;
                return Ok(if id == KeywordId::Break {
                    Stmt::Break(label)
                } else {
                    Stmt::Continue(label)
                });
            }
            Some(KeywordId::Throw) => {
                self.advance();
                let value = self.expression()?;
                self.expect_semicolon()?;
                return Ok(Stmt::Throw(value));
            }
            Some(KeywordId::Rethrow) => {
                self.advance();
                self.expect_semicolon()?;
                return Ok(Stmt::Rethrow);
            }
            Some(KeywordId::Assert) => {
                self.advance();
                let args = self.arguments()?;
                self.expect_semicolon()?;
                return Ok(Stmt::Assert(args));
            }
            Some(KeywordId::Yield)
                if self.peek_at(1).kind.is_operator(OperatorId::Star) || self.token_starts_expr(self.peek_at(1)) =>
            {
                self.advance();
                let star = self.match_op(OperatorId::Star);
                let value = self.expression()?;
                self.expect_semicolon()?;
                return Ok(Stmt::Yield { star, value });
            }
            Some(KeywordId::Var | KeywordId::Final | KeywordId::Const | KeywordId::Late)
                if !self.peek_at(1).kind.is_punctuation(PunctuationId::LBracket)
                    && !self.peek_at(1).kind.is_punctuation(PunctuationId::LBrace)
                    && !self.peek_at(1).kind.is_punctuation(PunctuationId::LParen)
                    && !self.peek_at(1).kind.is_operator(OperatorId::Lt) =>
            {
                let decl = self.local_variable()?;
                self.expect_semicolon()?;
                return Ok(Stmt::VarDecl(decl));
            }
            _ => {}
        }

        // Labeled statement: `outer: for (...)`.
        if self.peek().is_identifier_like() && self.peek_at(1).kind.is_punctuation(PunctuationId::Colon) {
            self.advance_n(2);
            return self.statement_inner();
        }

        if self.looks_like_untyped_function() {
            return Ok(Stmt::LocalFunction(self.local_function(None)?));
        }
        if self.looks_like_declaration() {
            let ty = self.parse_type()?;
            if self.peek_at(1).kind.is_punctuation(PunctuationId::LParen) || self.peek_at(1).kind.is_operator(OperatorId::Lt)
            {
                return Ok(Stmt::LocalFunction(self.local_function(Some(ty))?));
            }
            let name = self.identifier("expected a variable name")?;
            let variables = self.variable_declarators(name)?;
            self.expect_semicolon()?;
            return Ok(Stmt::VarDecl(VariableDecl {
                modifiers: Vec::new(),
                ty: Some(ty),
                variables,
                doc: None,
            }));
        }

        let expr = self.expression()?;
        self.expect_semicolon()?;
        Ok(Stmt::Expr(expr))
    }

    /// Parse `var x = 1`, `final int x`, `late final y = ...` without the trailing `;`.
    fn local_variable(&mut self) -> Result<VariableDecl, SyntaxError> {
        let modifiers = self.modifiers(&[KeywordId::Var, KeywordId::Final, KeywordId::Const, KeywordId::Late]);
        let ty = if self.looks_like_type_then_name() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let name = self.identifier("expected a variable name")?;
        let variables = self.variable_declarators(name)?;
        Ok(VariableDecl {
            modifiers,
            ty,
            variables,
            doc: None,
        })
    }

    fn local_function(&mut self, return_type: Option<Spanned<TypeAnnotation>>) -> Result<FunctionDecl, SyntaxError> {
        let name = self.identifier("expected a function name")?;
        let type_params = self.type_parameters_opt()?;
        let params = self.formal_parameters()?;
        let body = self.function_body()?;
        Ok(FunctionDecl {
            kind: FunctionKind::Function,
            modifiers: Vec::new(),
            name,
            return_type,
            type_params,
            params,
            initializers: Vec::new(),
            redirect: None,
            body,
            doc: None,
        })
    }

    fn parenthesized_condition(&mut self) -> Result<Spanned<Expr>, SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "expected `(`")?;
        let condition = self.expression()?;
        self.expect_punct(PunctuationId::RParen, "expected `)`")?;
        Ok(condition)
    }

    fn if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::If, "expected `if`")?;
        let condition = self.parenthesized_condition()?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_keyword(KeywordId::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn for_statement(&mut self, is_await: bool) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::For, "expected `for`")?;
        let parts = self.for_loop_parts()?;
        let body = Box::new(self.statement()?);
        Ok(match parts {
            ForLoopParts::Each(parts) => Stmt::ForIn { is_await, parts, body },
            ForLoopParts::Classic(parts) => Stmt::For { parts, body },
        })
    }

    /// Parse the parenthesized header of a `for` statement or collection element.
    fn for_loop_parts(&mut self) -> Result<ForLoopParts, SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "expected `(` after `for`")?;

        // for-in: `for (final T x in xs)` / `for (x in xs)`
        let snapshot = self.snapshot();
        if let Some(parts) = self.try_for_each_header()? {
            return Ok(ForLoopParts::Each(parts));
        }
        self.restore(snapshot);

        let init = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else if matches!(
            self.peek().keyword_id(),
            Some(KeywordId::Var | KeywordId::Final | KeywordId::Const | KeywordId::Late)
        ) || self.looks_like_declaration()
        {
            Some(ForInit::Declaration(self.local_variable()?))
        } else {
            Some(ForInit::Expressions(self.expression_list()?))
        };
        self.expect_punct(PunctuationId::Semicolon, "expected `;` in for loop")?;
        let condition = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(PunctuationId::Semicolon, "expected `;` in for loop")?;
        let updates = if self.check_punct(PunctuationId::RParen) {
            Vec::new()
        } else {
            self.expression_list()?
        };
        self.expect_punct(PunctuationId::RParen, "expected `)` after for loop header")?;
        Ok(ForLoopParts::Classic(ClassicFor {
            init,
            condition,
            updates,
        }))
    }

    /// Try the `for (... in ...)` shape; returns `Ok(None)` when the header is not a for-in.
    fn try_for_each_header(&mut self) -> Result<Option<ForEachParts>, SyntaxError> {
        let modifiers = self.modifiers(&[KeywordId::Var, KeywordId::Final, KeywordId::Const]);
        let ty = if self.looks_like_type_then_name() {
            match self.parse_type() {
                Ok(ty) => Some(ty),
                Err(_) => return Ok(None),
            }
        } else {
            None
        };
        if !self.peek().is_identifier_like() || !self.peek_at(1).kind.is_keyword(KeywordId::In) {
            return Ok(None);
        }
        let name = self.identifier("expected a loop variable")?;
        self.expect_keyword(KeywordId::In, "expected `in`")?;
        let iterable = self.expression()?;
        self.expect_punct(PunctuationId::RParen, "expected `)` after for-in header")?;
        let declaration = if modifiers.is_empty() && ty.is_none() {
            None
        } else {
            Some((modifiers, ty))
        };
        Ok(Some(ForEachParts {
            declaration,
            name,
            iterable,
        }))
    }

    fn expression_list(&mut self) -> Result<Vec<Spanned<Expr>>, SyntaxError> {
        let mut exprs = vec![self.expression()?];
        while self.match_punct(PunctuationId::Comma) {
            exprs.push(self.expression()?);
        }
        Ok(exprs)
    }

    fn while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::While, "expected `while`")?;
        let condition = self.parenthesized_condition()?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn do_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::Do, "expected `do`")?;
        let body = Box::new(self.statement()?);
        self.expect_keyword(KeywordId::While, "expected `while` after do body")?;
        let condition = self.parenthesized_condition()?;
        self.expect_semicolon()?;
        Ok(Stmt::DoWhile { body, condition })
    }

    fn switch_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::Switch, "expected `switch`")?;
        let subject = self.parenthesized_condition()?;
        self.expect_punct(PunctuationId::LBrace, "expected `{` to open the switch body")?;
        let mut cases = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() {
                self.report(self.unexpected("expected `}` to close the switch body"));
                break;
            }
            let start = self.start_offset();
            let mut case = SwitchCase {
                patterns: Vec::new(),
                guard: None,
                is_default: false,
                body: Vec::new(),
            };
            if self.match_keyword(KeywordId::Default) {
                case.is_default = true;
            } else {
                self.expect_keyword(KeywordId::Case, "expected `case` or `default`")?;
                case.patterns.push(self.expression()?);
                if self.match_keyword(KeywordId::When) {
                    case.guard = Some(self.expression()?);
                }
            }
            self.expect_punct(PunctuationId::Colon, "expected `:` after case")?;
            while !self.check_keyword(KeywordId::Case)
                && !self.check_keyword(KeywordId::Default)
                && !self.check_punct(PunctuationId::RBrace)
                && !self.is_at_end()
            {
                let before = self.pos;
                match self.statement() {
                    Ok(stmt) => case.body.push(stmt),
                    Err(e) => {
                        self.report(e);
                        self.synchronize_in_block(before);
                    }
                }
                if self.pos == before && !self.check_punct(PunctuationId::RBrace) {
                    self.advance();
                }
            }
            cases.push(Spanned::new(case, self.span_from(start)));
        }
        Ok(Stmt::Switch { subject, cases })
    }

    fn try_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_keyword(KeywordId::Try, "expected `try`")?;
        let body = self.block()?;
        let mut catches = Vec::new();
        loop {
            let start = self.start_offset();
            let on = if self.match_keyword(KeywordId::On) {
                Some(self.parse_type()?)
            } else if self.check_keyword(KeywordId::Catch) {
                None
            } else {
                break;
            };
            let mut exception = None;
            let mut stack_trace = None;
            if self.match_keyword(KeywordId::Catch) {
                self.expect_punct(PunctuationId::LParen, "expected `(` after `catch`")?;
                exception = Some(self.identifier("expected an exception name")?);
                if self.match_punct(PunctuationId::Comma) {
                    stack_trace = Some(self.identifier("expected a stack trace name")?);
                }
                self.expect_punct(PunctuationId::RParen, "expected `)`")?;
            }
            let body = self.block()?;
            catches.push(Spanned::new(
                CatchClause {
                    on,
                    exception,
                    stack_trace,
                    body,
                },
                self.span_from(start),
            ));
        }
        let finally = if self.match_keyword(KeywordId::Finally) {
            Some(self.block()?)
        } else {
            None
        };
        Ok(Stmt::Try {
            body,
            catches,
            finally,
        })
    }
}
