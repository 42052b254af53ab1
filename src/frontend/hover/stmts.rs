//! Hovers inside statements.

use crate::frontend::cst::*;
use crate::frontend::resolver::Cx;
use crate::frontend::symbols::ScopeKind;

use super::HoverGenerator;

impl<'m, 'c> HoverGenerator<'m, 'c> {
    /// Context for the block scope the collector keyed at `span`.
    fn block_cx(&self, span: Span, cx: &Cx) -> Cx {
        match self.model().scope_at(span, ScopeKind::Block) {
            Some(scope) => cx.with_scope(scope),
            None => cx.clone(),
        }
    }

    pub(super) fn statement(&mut self, stmt: &Stmt, span: Span, cx: &Cx) {
        let cx = &cx.with_expected(None);
        match stmt {
            Stmt::VarDecl(v) => self.variable_decl(v, cx),
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.expression(expr, cx),
            Stmt::Return(value) => {
                if let Some(value) = value {
                    let expected = self.declared_return(cx);
                    self.expression(value, &cx.with_expected(expected));
                }
            }
            Stmt::Yield { value, .. } => self.expression(value, cx),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.expression(condition, cx);
                self.statement(&then_branch.node, then_branch.span, cx);
                if let Some(else_branch) = else_branch {
                    self.statement(&else_branch.node, else_branch.span, cx);
                }
            }
            Stmt::For { parts, body } => {
                let inner = self.block_cx(span, cx);
                self.classic_for(parts, &inner);
                self.statement(&body.node, body.span, &inner);
            }
            Stmt::ForIn { parts, body, .. } => {
                let inner = self.block_cx(span, cx);
                self.for_each(parts, &inner);
                self.statement(&body.node, body.span, &inner);
            }
            Stmt::While { condition, body } => {
                self.expression(condition, cx);
                self.statement(&body.node, body.span, cx);
            }
            Stmt::DoWhile { body, condition } => {
                self.statement(&body.node, body.span, cx);
                self.expression(condition, cx);
            }
            Stmt::Switch { subject, cases } => {
                self.expression(subject, cx);
                let subject_type = self.resolver.infer(subject, cx);
                for case in cases {
                    let inner = self.block_cx(case.span, cx);
                    let patterns = inner.with_expected(Some(subject_type.clone()));
                    for pattern in &case.node.patterns {
                        self.expression(pattern, &patterns);
                    }
                    if let Some(guard) = &case.node.guard {
                        self.expression(guard, &inner);
                    }
                    for stmt in &case.node.body {
                        self.statement(&stmt.node, stmt.span, &inner);
                    }
                }
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.block(body, cx);
                for clause in catches {
                    let inner = self.block_cx(clause.span, cx);
                    self.catch_clause(&clause.node, &inner);
                }
                if let Some(finally) = finally {
                    self.block(finally, cx);
                }
            }
            Stmt::Block(block) => {
                let inner = self.block_cx(span, cx);
                for stmt in &block.statements {
                    self.statement(&stmt.node, stmt.span, &inner);
                }
            }
            Stmt::LocalFunction(f) => self.function_decl(f, span, cx),
            Stmt::Assert(args) => self.arguments(args, None, cx),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Rethrow | Stmt::Empty => {}
        }
    }

    /// Declared return type of the nearest enclosing callable; function literals have none.
    fn declared_return(&self, cx: &Cx) -> Option<String> {
        let model = self.model();
        let owner = model
            .ancestors(cx.scope)
            .map(|id| model.scope(id))
            .find(|scope| {
                matches!(
                    scope.kind,
                    ScopeKind::Method | ScopeKind::Constructor | ScopeKind::Function
                )
            })?
            .owner?;
        model.node(owner).ty.clone()
    }

    fn block(&mut self, block: &Spanned<Block>, cx: &Cx) {
        let inner = self.block_cx(block.span, cx);
        for stmt in &block.node.statements {
            self.statement(&stmt.node, stmt.span, &inner);
        }
    }

    fn catch_clause(&mut self, clause: &CatchClause, cx: &Cx) {
        if let Some(on) = &clause.on {
            self.type_annotation(on, cx);
        }
        for name in clause.exception.iter().chain(&clause.stack_trace) {
            self.emit_declared(name.span);
        }
        self.block(&clause.body, cx);
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// `for (init; condition; updates)`; `cx` is the loop's own scope.
    pub(super) fn classic_for(&mut self, parts: &ClassicFor, cx: &Cx) {
        match &parts.init {
            Some(ForInit::Declaration(v)) => self.variable_decl(v, cx),
            Some(ForInit::Expressions(exprs)) => {
                for expr in exprs {
                    self.expression(expr, cx);
                }
            }
            None => {}
        }
        if let Some(condition) = &parts.condition {
            self.expression(condition, cx);
        }
        for update in &parts.updates {
            self.expression(update, cx);
        }
    }

    /// `for (var x in xs)` or `for (x in xs)`; `cx` is the loop's own scope.
    pub(super) fn for_each(&mut self, parts: &ForEachParts, cx: &Cx) {
        match &parts.declaration {
            Some((_, ty)) => {
                if let Some(ty) = ty {
                    self.type_annotation(ty, cx);
                }
                self.emit_declared(parts.name.span);
            }
            None => {
                if let Some(member) = self.resolver.resolve_name(&parts.name.node, cx) {
                    self.emit_member(parts.name.span, &member);
                }
            }
        }
        self.expression(&parts.iterable, cx);
    }
}
