/// Declaration parsing methods.
///
/// This chunk handles directives, top-level declarations (classes, mixins, extensions, enums, typedefs, functions,
/// accessors, variables), class bodies, constructors with initializer lists, and formal parameter lists.
///
/// ## Notes
/// - Anything at the top level that is not a declaration is parsed as a statement: snippets are fragments.
/// - Doc comments are looked up in the trivia in front of the first token of a declaration (annotations included).

/// Modifiers accepted in front of top-level functions and variables.
const TOP_LEVEL_MODIFIERS: &[KeywordId] = &[
    KeywordId::External,
    KeywordId::Late,
    KeywordId::Final,
    KeywordId::Const,
    KeywordId::Var,
];

/// Modifiers accepted in front of class members.
const MEMBER_MODIFIERS: &[KeywordId] = &[
    KeywordId::Static,
    KeywordId::External,
    KeywordId::Abstract,
    KeywordId::Covariant,
    KeywordId::Late,
    KeywordId::Final,
    KeywordId::Const,
    KeywordId::Var,
    KeywordId::Factory,
];

/// Modifiers accepted in front of formal parameters.
const PARAMETER_MODIFIERS: &[KeywordId] = &[KeywordId::Covariant, KeywordId::Final, KeywordId::Var, KeywordId::Const];

/// A function-like or variable declaration, before it is placed at the top level or in a class.
enum MemberShape {
    Function(FunctionDecl),
    Variable(VariableDecl),
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Top level
    // ========================================================================

    fn top_level(&mut self, unit: &mut CompilationUnit) -> Result<(), SyntaxError> {
        if self.at_directive() {
            let directive = self.directive()?;
            unit.directives.push(directive);
        } else {
            let declaration = self.declaration()?;
            unit.declarations.push(declaration);
        }
        Ok(())
    }

    fn at_directive(&self) -> bool {
        let next = self.peek_at(1).kind;
        match self.peek().keyword_id() {
            Some(KeywordId::Import | KeywordId::Export) => next == TokenKind::String,
            Some(KeywordId::Part) => next == TokenKind::String || next.is_keyword(KeywordId::Of),
            Some(KeywordId::Library) => next.is_identifier_like() || next.is_punctuation(PunctuationId::Semicolon),
            _ => false,
        }
    }

    fn directive(&mut self) -> Result<Spanned<Directive>, SyntaxError> {
        let start = self.start_offset();
        let keyword = self.peek().keyword_id();
        self.advance();
        let mut directive = Directive {
            kind: DirectiveKind::Import,
            uri: None,
            prefix: None,
            deferred: false,
            combinators: Vec::new(),
        };
        match keyword {
            Some(KeywordId::Library) => {
                directive.kind = DirectiveKind::Library;
                if !self.check_punct(PunctuationId::Semicolon) {
                    directive.uri = Some(self.dotted_name()?);
                }
            }
            Some(KeywordId::Part) => {
                if self.match_keyword(KeywordId::Of) {
                    directive.kind = DirectiveKind::PartOf;
                    directive.uri = Some(if self.peek().kind == TokenKind::String {
                        self.uri()?
                    } else {
                        self.dotted_name()?
                    });
                } else {
                    directive.kind = DirectiveKind::Part;
                    directive.uri = Some(self.uri()?);
                }
            }
            Some(KeywordId::Export) => {
                directive.kind = DirectiveKind::Export;
                directive.uri = Some(self.uri()?);
                directive.combinators = self.combinators()?;
            }
            _ => {
                directive.uri = Some(self.uri()?);
                directive.deferred = self.match_keyword(KeywordId::Deferred);
                if self.match_keyword(KeywordId::As) {
                    directive.prefix = Some(self.identifier("expected an import prefix")?);
                }
                directive.combinators = self.combinators()?;
            }
        }
        self.expect_semicolon()?;
        Ok(Spanned::new(directive, self.span_from(start)))
    }

    fn uri(&mut self) -> Result<String, SyntaxError> {
        if self.peek().kind != TokenKind::String {
            return Err(self.unexpected("expected a URI string"));
        }
        let uri = unquote(&self.peek().text).to_string();
        self.advance();
        Ok(uri)
    }

    fn combinators(&mut self) -> Result<Vec<Combinator>, SyntaxError> {
        let mut combinators = Vec::new();
        loop {
            let show = if self.match_keyword(KeywordId::Show) {
                true
            } else if self.match_keyword(KeywordId::Hide) {
                false
            } else {
                break;
            };
            let mut names = vec![self.identifier("expected a name")?];
            while self.match_punct(PunctuationId::Comma) {
                names.push(self.identifier("expected a name")?);
            }
            combinators.push(Combinator { show, names });
        }
        Ok(combinators)
    }

    fn dotted_name(&mut self) -> Result<String, SyntaxError> {
        let mut name = self.identifier("expected a name")?.node;
        while self.match_punct(PunctuationId::Dot) {
            name.push('.');
            name.push_str(&self.identifier("expected a name")?.node);
        }
        Ok(name)
    }

    fn declaration(&mut self) -> Result<Spanned<Declaration>, SyntaxError> {
        let anchor = self.pos;
        let start = self.start_offset();
        let doc = self.doc_comment_at(anchor);
        self.skip_annotations()?;

        if let Some(decl) = self.type_declaration(&doc)? {
            return Ok(Spanned::new(decl, self.span_from(start)));
        }

        let modifiers = self.modifiers(TOP_LEVEL_MODIFIERS);
        let is_declaration = !modifiers.is_empty()
            || self.at_getter()
            || self.at_setter()
            || self.looks_like_declaration()
            || self.looks_like_untyped_function();
        if !is_declaration {
            let stmt = self.statement()?;
            return Ok(Spanned::new(Declaration::Statement(stmt.node), stmt.span));
        }

        let decl = match self.function_or_variable(modifiers, doc, false)? {
            MemberShape::Function(f) => match f.kind {
                FunctionKind::Getter => Declaration::Getter(f),
                FunctionKind::Setter => Declaration::Setter(f),
                _ => Declaration::Function(f),
            },
            MemberShape::Variable(v) => Declaration::Variable(v),
        };
        Ok(Spanned::new(decl, self.span_from(start)))
    }

    /// Parse a class, mixin, enum, extension or typedef if one starts at the cursor.
    fn type_declaration(&mut self, doc: &Option<String>) -> Result<Option<Declaration>, SyntaxError> {
        if let Some((modifier_count, is_mixin)) = self.class_header_ahead() {
            let decl = if is_mixin {
                Declaration::Mixin(self.mixin_decl(modifier_count, doc.clone())?)
            } else {
                Declaration::Class(self.class_decl(modifier_count, doc.clone())?)
            };
            return Ok(Some(decl));
        }
        let decl = match self.peek().keyword_id() {
            Some(KeywordId::Enum) if self.peek_at(1).is_identifier_like() => {
                Declaration::Enum(self.enum_decl(doc.clone())?)
            }
            Some(KeywordId::Extension)
                if self.peek_at(1).is_identifier_like() || self.peek_at(1).kind.is_operator(OperatorId::Lt) =>
            {
                Declaration::Extension(self.extension_decl(doc.clone())?)
            }
            Some(KeywordId::Typedef) if self.peek_at(1).is_identifier_like() => {
                Declaration::Typedef(self.typedef_decl(doc.clone())?)
            }
            _ => return Ok(None),
        };
        Ok(Some(decl))
    }

    /// Look for `abstract base class`, `sealed class`, `mixin class`, `base mixin`, ...
    ///
    /// ## Returns
    /// The number of class modifiers and whether the declaration is a mixin (the `mixin` keyword is then not counted).
    fn class_header_ahead(&self) -> Option<(usize, bool)> {
        let mut i = 0;
        while matches!(
            self.peek_at(i).keyword_id(),
            Some(
                KeywordId::Abstract
                    | KeywordId::Base
                    | KeywordId::Interface
                    | KeywordId::Final
                    | KeywordId::Sealed
                    | KeywordId::Mixin
            )
        ) {
            i += 1;
        }
        if self.peek_at(i).kind.is_keyword(KeywordId::Class) {
            return Some((i, false));
        }
        if i > 0 && self.peek_at(i - 1).kind.is_keyword(KeywordId::Mixin) && self.peek_at(i).is_identifier_like() {
            return Some((i - 1, true));
        }
        None
    }

    fn take_modifiers(&mut self, count: usize) -> Vec<KeywordId> {
        let mut modifiers = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(id) = self.peek().keyword_id() {
                modifiers.push(id);
            }
            self.advance();
        }
        modifiers
    }

    // ========================================================================
    // Classes, mixins, enums, extensions, typedefs
    // ========================================================================

    fn class_decl(&mut self, modifier_count: usize, doc: Option<String>) -> Result<ClassDecl, SyntaxError> {
        let modifiers = self.take_modifiers(modifier_count);
        self.expect_keyword(KeywordId::Class, "expected `class`")?;
        let name = self.identifier("expected a class name")?;
        let type_params = self.type_parameters_opt()?;
        let mut decl = ClassDecl {
            modifiers,
            name,
            type_params,
            extends: None,
            with: Vec::new(),
            implements: Vec::new(),
            members: Vec::new(),
            doc,
        };

        // Mixin application: `class A = B with C;`
        if self.match_op(OperatorId::Eq) {
            decl.extends = Some(self.parse_type()?);
            if self.match_keyword(KeywordId::With) {
                decl.with = self.type_list()?;
            }
            if self.match_keyword(KeywordId::Implements) {
                decl.implements = self.type_list()?;
            }
            self.expect_semicolon()?;
            return Ok(decl);
        }

        loop {
            if self.match_keyword(KeywordId::Extends) {
                decl.extends = Some(self.parse_type()?);
            } else if self.match_keyword(KeywordId::With) {
                decl.with.extend(self.type_list()?);
            } else if self.match_keyword(KeywordId::Implements) {
                decl.implements.extend(self.type_list()?);
            } else {
                break;
            }
        }
        let class_name = decl.name.node.clone();
        decl.members = self.class_body(&class_name)?;
        Ok(decl)
    }

    fn mixin_decl(&mut self, modifier_count: usize, doc: Option<String>) -> Result<MixinDecl, SyntaxError> {
        let modifiers = self.take_modifiers(modifier_count);
        self.expect_keyword(KeywordId::Mixin, "expected `mixin`")?;
        let name = self.identifier("expected a mixin name")?;
        let type_params = self.type_parameters_opt()?;
        let mut on = Vec::new();
        let mut implements = Vec::new();
        loop {
            if self.match_keyword(KeywordId::On) {
                on.extend(self.type_list()?);
            } else if self.match_keyword(KeywordId::Implements) {
                implements.extend(self.type_list()?);
            } else {
                break;
            }
        }
        let members = self.class_body("")?;
        Ok(MixinDecl {
            modifiers,
            name,
            type_params,
            on,
            implements,
            members,
            doc,
        })
    }

    fn enum_decl(&mut self, doc: Option<String>) -> Result<EnumDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Enum, "expected `enum`")?;
        let name = self.identifier("expected an enum name")?;
        let type_params = self.type_parameters_opt()?;
        let mut with = Vec::new();
        let mut implements = Vec::new();
        loop {
            if self.match_keyword(KeywordId::With) {
                with.extend(self.type_list()?);
            } else if self.match_keyword(KeywordId::Implements) {
                implements.extend(self.type_list()?);
            } else {
                break;
            }
        }
        self.expect_punct(PunctuationId::LBrace, "expected `{` to open the enum body")?;

        let mut constants = Vec::new();
        while !self.check_punct(PunctuationId::RBrace)
            && !self.check_punct(PunctuationId::Semicolon)
            && !self.is_at_end()
        {
            let anchor = self.pos;
            let start = self.start_offset();
            let constant_doc = self.doc_comment_at(anchor);
            self.skip_annotations()?;
            let constant_name = self.identifier("expected an enum value")?;
            if self.check_op(OperatorId::Lt) {
                self.type_arguments()?;
            }
            let constructor = if self.match_punct(PunctuationId::Dot) {
                Some(self.identifier("expected a constructor name")?)
            } else {
                None
            };
            let args = if self.check_punct(PunctuationId::LParen) {
                Some(self.arguments()?)
            } else {
                None
            };
            constants.push(Spanned::new(
                EnumConstant {
                    name: constant_name,
                    constructor,
                    args,
                    doc: constant_doc,
                },
                self.span_from(start),
            ));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }

        let class_name = name.node.clone();
        let members = if self.match_punct(PunctuationId::Semicolon) {
            self.class_members(&class_name)
        } else if self.is_at_end() {
            self.report(self.unexpected("expected `}` to close the enum body"));
            Vec::new()
        } else {
            self.expect_punct(PunctuationId::RBrace, "expected `}` after the enum values")?;
            Vec::new()
        };

        Ok(EnumDecl {
            name,
            type_params,
            with,
            implements,
            constants,
            members,
            doc,
        })
    }

    fn extension_decl(&mut self, doc: Option<String>) -> Result<ExtensionDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Extension, "expected `extension`")?;
        let name = if self.peek().is_identifier_like() && !self.check_keyword(KeywordId::On) {
            Some(self.identifier("expected an extension name")?)
        } else {
            None
        };
        let type_params = self.type_parameters_opt()?;
        self.expect_keyword(KeywordId::On, "expected `on`")?;
        let on = self.parse_type()?;
        let members = self.class_body("")?;
        Ok(ExtensionDecl {
            name,
            type_params,
            on,
            members,
            doc,
        })
    }

    fn typedef_decl(&mut self, doc: Option<String>) -> Result<TypedefDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Typedef, "expected `typedef`")?;
        let modern = matches!(
            self.peek_at(1).kind,
            TokenKind::Operator(OperatorId::Eq | OperatorId::Lt)
        );
        if modern {
            let name = self.identifier("expected a typedef name")?;
            let type_params = self.type_parameters_opt()?;
            self.expect_op(OperatorId::Eq, "expected `=` in typedef")?;
            let aliased = self.parse_type()?;
            self.expect_semicolon()?;
            return Ok(TypedefDecl {
                name,
                type_params,
                aliased,
                doc,
            });
        }

        // Legacy form: `typedef int Compare<T>(T a, T b);`
        let start = self.start_offset();
        let return_type = if self.looks_like_type_then_name() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let name = self.identifier("expected a typedef name")?;
        let type_params = self.type_parameters_opt()?;
        let params = self.formal_parameters()?;
        let aliased = function_type_from_params(return_type, Vec::new(), &params, false, self.span_from(start));
        self.expect_semicolon()?;
        Ok(TypedefDecl {
            name,
            type_params,
            aliased,
            doc,
        })
    }

    // ========================================================================
    // Class bodies and members
    // ========================================================================

    /// Parse `{ members }`. `class_name` is used to recognise constructors; pass `""` when there are none.
    fn class_body(&mut self, class_name: &str) -> Result<Vec<Spanned<ClassMember>>, SyntaxError> {
        self.expect_punct(PunctuationId::LBrace, "expected `{` to open the body")?;
        Ok(self.class_members(class_name))
    }

    /// Parse members up to and including the closing `}`. An unclosed body ends at the end of input.
    fn class_members(&mut self, class_name: &str) -> Vec<Spanned<ClassMember>> {
        let mut members = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            if self.is_at_end() {
                self.report(self.unexpected("expected `}` to close the body"));
                break;
            }
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            let start = self.pos;
            match self.class_member(class_name) {
                Ok(member) => members.push(member),
                Err(e) => {
                    self.report(e);
                    self.synchronize_in_block(start);
                }
            }
            if self.pos == start && !self.check_punct(PunctuationId::RBrace) {
                self.advance();
            }
        }
        members
    }

    fn class_member(&mut self, class_name: &str) -> Result<Spanned<ClassMember>, SyntaxError> {
        let anchor = self.pos;
        let start = self.start_offset();
        let doc = self.doc_comment_at(anchor);
        self.skip_annotations()?;
        let modifiers = self.modifiers(MEMBER_MODIFIERS);

        let names_constructor = !class_name.is_empty()
            && self.peek().is_identifier_like()
            && self.peek().text == class_name
            && matches!(
                self.peek_at(1).kind,
                TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::Dot)
            );
        if names_constructor {
            let ctor = self.constructor(modifiers, doc)?;
            return Ok(Spanned::new(ClassMember::Method(ctor), self.span_from(start)));
        }

        let member = match self.function_or_variable(modifiers, doc, true)? {
            MemberShape::Function(f) => ClassMember::Method(f),
            MemberShape::Variable(v) => ClassMember::Field(v),
        };
        Ok(Spanned::new(member, self.span_from(start)))
    }

    fn constructor(&mut self, modifiers: Vec<KeywordId>, doc: Option<String>) -> Result<FunctionDecl, SyntaxError> {
        let first = self.identifier("expected a constructor name")?;
        let name = if self.match_punct(PunctuationId::Dot) {
            let second = self.identifier("expected a constructor name")?;
            Spanned::new(format!("{}.{}", first.node, second.node), first.span.merge(second.span))
        } else {
            first
        };
        let params = self.formal_parameters()?;

        let mut initializers = Vec::new();
        let mut redirect = None;
        if self.match_punct(PunctuationId::Colon) {
            initializers = self.initializers()?;
        } else if self.match_op(OperatorId::Eq) {
            redirect = Some(self.parse_type()?);
        }

        let body = self.function_body()?;
        Ok(FunctionDecl {
            kind: FunctionKind::Method,
            modifiers,
            name,
            return_type: None,
            type_params: Vec::new(),
            params,
            initializers,
            redirect,
            body,
            doc,
        })
    }

    fn initializers(&mut self) -> Result<Vec<Spanned<Initializer>>, SyntaxError> {
        let mut initializers = Vec::new();
        loop {
            let start = self.start_offset();
            let initializer = if self.match_keyword(KeywordId::Super) {
                let name = if self.match_punct(PunctuationId::Dot) {
                    Some(self.identifier("expected a constructor name")?)
                } else {
                    None
                };
                Initializer::Super {
                    name,
                    args: self.arguments()?,
                }
            } else if self.match_keyword(KeywordId::This) {
                if self.match_punct(PunctuationId::Dot) {
                    let name = self.identifier("expected a field name")?;
                    if self.check_punct(PunctuationId::LParen) {
                        Initializer::This {
                            name: Some(name),
                            args: self.arguments()?,
                        }
                    } else {
                        self.expect_op(OperatorId::Eq, "expected `=` in field initializer")?;
                        Initializer::Field {
                            name,
                            value: self.expression_no_cascade()?,
                        }
                    }
                } else {
                    Initializer::This {
                        name: None,
                        args: self.arguments()?,
                    }
                }
            } else if self.match_keyword(KeywordId::Assert) {
                Initializer::Assert(self.arguments()?)
            } else {
                let name = self.identifier("expected an initializer")?;
                self.expect_op(OperatorId::Eq, "expected `=` in field initializer")?;
                Initializer::Field {
                    name,
                    value: self.expression_no_cascade()?,
                }
            };
            initializers.push(Spanned::new(initializer, self.span_from(start)));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(initializers)
    }

    // ========================================================================
    // Functions, accessors, variables
    // ========================================================================

    fn at_getter(&self) -> bool {
        self.check_keyword(KeywordId::Get)
            && self.peek_at(1).is_identifier_like()
            && !self.peek_at(2).kind.is_punctuation(PunctuationId::LParen)
    }

    fn at_setter(&self) -> bool {
        self.check_keyword(KeywordId::Set)
            && self.peek_at(1).is_identifier_like()
            && self.peek_at(2).kind.is_punctuation(PunctuationId::LParen)
    }

    fn at_operator_method(&self) -> bool {
        self.check_keyword(KeywordId::Operator)
            && matches!(
                self.peek_at(1).kind,
                TokenKind::Operator(_) | TokenKind::Punctuation(PunctuationId::LBracket)
            )
    }

    /// Parse a function, method, getter, setter, operator or variable after its modifiers.
    fn function_or_variable(
        &mut self,
        modifiers: Vec<KeywordId>,
        doc: Option<String>,
        in_class: bool,
    ) -> Result<MemberShape, SyntaxError> {
        let mut return_type = None;
        if !self.at_getter() && !self.at_setter() && !self.at_operator_method() && self.looks_like_type_then_name() {
            return_type = Some(self.parse_type()?);
        }

        if self.at_getter() {
            return Ok(MemberShape::Function(self.getter(modifiers, return_type, doc)?));
        }
        if self.at_setter() {
            return Ok(MemberShape::Function(self.setter(modifiers, return_type, doc)?));
        }
        if self.at_operator_method() {
            return Ok(MemberShape::Function(self.operator_method(modifiers, return_type, doc)?));
        }

        let name = self.identifier("expected a declaration name")?;
        if self.check_punct(PunctuationId::LParen) || self.check_op(OperatorId::Lt) {
            let kind = if in_class {
                FunctionKind::Method
            } else {
                FunctionKind::Function
            };
            let type_params = self.type_parameters_opt()?;
            let params = self.formal_parameters()?;
            let body = self.function_body()?;
            return Ok(MemberShape::Function(FunctionDecl {
                kind,
                modifiers,
                name,
                return_type,
                type_params,
                params,
                initializers: Vec::new(),
                redirect: None,
                body,
                doc,
            }));
        }

        let variables = self.variable_declarators(name)?;
        self.expect_semicolon()?;
        Ok(MemberShape::Variable(VariableDecl {
            modifiers,
            ty: return_type,
            variables,
            doc,
        }))
    }

    fn getter(
        &mut self,
        modifiers: Vec<KeywordId>,
        return_type: Option<Spanned<TypeAnnotation>>,
        doc: Option<String>,
    ) -> Result<FunctionDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Get, "expected `get`")?;
        let name = self.identifier("expected a getter name")?;
        let body = self.function_body()?;
        Ok(FunctionDecl {
            kind: FunctionKind::Getter,
            modifiers,
            name,
            return_type,
            type_params: Vec::new(),
            params: Vec::new(),
            initializers: Vec::new(),
            redirect: None,
            body,
            doc,
        })
    }

    fn setter(
        &mut self,
        modifiers: Vec<KeywordId>,
        return_type: Option<Spanned<TypeAnnotation>>,
        doc: Option<String>,
    ) -> Result<FunctionDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Set, "expected `set`")?;
        let name = self.identifier("expected a setter name")?;
        let params = self.formal_parameters()?;
        let body = self.function_body()?;
        Ok(FunctionDecl {
            kind: FunctionKind::Setter,
            modifiers,
            name,
            return_type,
            type_params: Vec::new(),
            params,
            initializers: Vec::new(),
            redirect: None,
            body,
            doc,
        })
    }

    fn operator_method(
        &mut self,
        modifiers: Vec<KeywordId>,
        return_type: Option<Spanned<TypeAnnotation>>,
        doc: Option<String>,
    ) -> Result<FunctionDecl, SyntaxError> {
        self.expect_keyword(KeywordId::Operator, "expected `operator`")?;
        let start = self.start_offset();
        let spelling = if self.match_punct(PunctuationId::LBracket) {
            self.expect_punct(PunctuationId::RBracket, "expected `]`")?;
            let spelling = if self.match_op(OperatorId::Eq) { "[]=" } else { "[]" };
            spelling.to_string()
        } else if let Some((op, count)) = self.peek_operator() {
            self.advance_n(count);
            operators::as_str(op).to_string()
        } else {
            return Err(self.unexpected("expected an operator"));
        };
        let name = Spanned::new(spelling, self.span_from(start));
        let params = self.formal_parameters()?;
        let body = self.function_body()?;
        Ok(FunctionDecl {
            kind: FunctionKind::Operator,
            modifiers,
            name,
            return_type,
            type_params: Vec::new(),
            params,
            initializers: Vec::new(),
            redirect: None,
            body,
            doc,
        })
    }

    /// Parse `name [= init] (, name [= init])*` starting after the first name.
    fn variable_declarators(&mut self, first: Name) -> Result<Vec<VariableDeclarator>, SyntaxError> {
        let mut variables = Vec::new();
        let mut name = first;
        loop {
            let init = if self.match_op(OperatorId::Eq) {
                Some(self.expression()?)
            } else {
                None
            };
            variables.push(VariableDeclarator { name, init });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            name = self.identifier("expected a variable name")?;
        }
        Ok(variables)
    }

    /// Consume modifier keywords from `allowed`, stopping at one that is used as a name (`int late;`).
    fn modifiers(&mut self, allowed: &[KeywordId]) -> Vec<KeywordId> {
        let mut modifiers = Vec::new();
        while let Some(id) = self.peek().keyword_id() {
            if !allowed.contains(&id) {
                break;
            }
            let used_as_name = matches!(
                self.peek_at(1).kind,
                TokenKind::Punctuation(PunctuationId::Semicolon | PunctuationId::Comma | PunctuationId::LParen)
                    | TokenKind::Operator(OperatorId::Eq)
            );
            if used_as_name {
                break;
            }
            modifiers.push(id);
            self.advance();
        }
        modifiers
    }

    /// Parse `async`, `async*` or `sync*`.
    fn async_marker(&mut self) -> AsyncMarker {
        if self.match_keyword(KeywordId::Async) {
            if self.match_op(OperatorId::Star) {
                AsyncMarker::AsyncStar
            } else {
                AsyncMarker::Async
            }
        } else if self.check_keyword(KeywordId::Sync) && self.peek_at(1).kind.is_operator(OperatorId::Star) {
            self.advance_n(2);
            AsyncMarker::SyncStar
        } else {
            AsyncMarker::None
        }
    }

    /// Parse a declaration body: `=> expr;`, `{ ... }` or `;`.
    fn function_body(&mut self) -> Result<FunctionBody, SyntaxError> {
        let marker = self.async_marker();
        if self.match_punct(PunctuationId::FatArrow) {
            let expr = self.expression()?;
            self.expect_semicolon()?;
            return Ok(FunctionBody {
                marker,
                kind: BodyKind::Expression(expr),
            });
        }
        if self.check_punct(PunctuationId::LBrace) {
            let block = self.block()?;
            return Ok(FunctionBody {
                marker,
                kind: BodyKind::Block(block),
            });
        }
        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(FunctionBody {
                marker,
                kind: BodyKind::Empty,
            });
        }
        Err(self.unexpected("expected a function body"))
    }

    // ========================================================================
    // Formal parameters
    // ========================================================================

    /// Parse `(a, [b = 1], {required c})`.
    fn formal_parameters(&mut self) -> Result<Vec<Spanned<FormalParameter>>, SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "expected `(`")?;
        let mut params = Vec::new();
        loop {
            if self.match_punct(PunctuationId::RParen) {
                break;
            }
            let group = if self.check_punct(PunctuationId::LBracket) {
                Some((ParameterKind::OptionalPositional, PunctuationId::RBracket))
            } else if self.check_punct(PunctuationId::LBrace) {
                Some((ParameterKind::Named, PunctuationId::RBrace))
            } else {
                None
            };
            if let Some((kind, close)) = group {
                self.advance();
                loop {
                    if self.match_punct(close) {
                        break;
                    }
                    params.push(self.formal_parameter(kind)?);
                    if !self.match_punct(PunctuationId::Comma) {
                        self.expect_punct(close, "expected the parameter group to close")?;
                        break;
                    }
                }
                // A trailing comma after the group is tolerated.
                self.match_punct(PunctuationId::Comma);
                continue;
            }
            params.push(self.formal_parameter(ParameterKind::Positional)?);
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RParen, "expected `)` after parameters")?;
                break;
            }
        }
        Ok(params)
    }

    fn formal_parameter(&mut self, kind: ParameterKind) -> Result<Spanned<FormalParameter>, SyntaxError> {
        let start = self.start_offset();
        self.skip_annotations()?;
        let required = self.match_keyword(KeywordId::Required);
        let modifiers = self.modifiers(PARAMETER_MODIFIERS);

        let type_start = self.start_offset();
        let mut ty = None;
        if !self.at_field_prefix()
            && self.looks_like_type_then(|t| {
                t.is_identifier_like() || t.kind.is_keyword(KeywordId::This) || t.kind.is_keyword(KeywordId::Super)
            })
        {
            ty = Some(self.parse_type()?);
        }

        let prefix = if self.at_field_prefix() {
            let prefix = if self.check_keyword(KeywordId::This) {
                ParameterPrefix::This
            } else {
                ParameterPrefix::Super
            };
            self.advance_n(2);
            prefix
        } else {
            ParameterPrefix::None
        };
        let name = self.identifier("expected a parameter name")?;

        // Function-typed parameter: `bool test(E element)`.
        if self.check_punct(PunctuationId::LParen) || self.check_op(OperatorId::Lt) {
            let type_params = self.type_parameters_opt()?;
            let params = self.formal_parameters()?;
            let nullable = self.match_punct(PunctuationId::Question);
            ty = Some(function_type_from_params(
                ty,
                type_params,
                &params,
                nullable,
                self.span_from(type_start),
            ));
        }

        let has_default = self.check_op(OperatorId::Eq)
            || (kind == ParameterKind::Named && self.check_punct(PunctuationId::Colon));
        let default = if has_default {
            self.advance();
            let first = self.pos;
            let value = self.expression_no_cascade()?;
            let text = self.source_text(first, self.pos);
            Some(DefaultValue { value, text })
        } else {
            None
        };

        Ok(Spanned::new(
            FormalParameter {
                kind,
                required,
                modifiers,
                ty,
                prefix,
                name,
                default,
            },
            self.span_from(start),
        ))
    }

    fn at_field_prefix(&self) -> bool {
        (self.check_keyword(KeywordId::This) || self.check_keyword(KeywordId::Super))
            && self.peek_at(1).kind.is_punctuation(PunctuationId::Dot)
    }

    /// Skip `@name`, `@prefix.name` and `@Name(args)` annotations.
    fn skip_annotations(&mut self) -> Result<(), SyntaxError> {
        while self.match_punct(PunctuationId::At) {
            self.identifier("expected an annotation name")?;
            while self.check_punct(PunctuationId::Dot) && self.peek_at(1).is_identifier_like() {
                self.advance_n(2);
            }
            if self.check_punct(PunctuationId::LParen) {
                self.arguments()?;
            }
        }
        Ok(())
    }
}
