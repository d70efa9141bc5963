//! Parser for .bzl modules
//!
//! A recursive-descent parser over the lexer's token stream. It fully
//! parses the statements documentation extraction cares about (function
//! definitions, their parameter lists, and standalone string literals)
//! and records every other statement as an opaque [`StmtKind::Other`]
//! covering its source extent, including any indented block it opens.
//!
//! Errors never abort the parse. Each one is recorded and the parser
//! resynchronizes at the next statement boundary, so a single malformed
//! definition does not hide the rest of the file.

mod error;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};

use crate::ast::{DefStmt, Ident, Module, Param, ParamKind, Stmt, StmtKind, StrLit};
use crate::lexer::{unquote_string, Lexer, Span, SpannedError, Token, TokenKind};

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<ParseError>,
    lex_errors: Vec<SpannedError>,
}

impl<'src> Parser<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let (tokens, lex_errors) = Lexer::new(source).tokenize();
        Self {
            source,
            tokens,
            position: 0,
            errors: Vec::new(),
            lex_errors,
        }
    }

    /// Parses a complete module.
    ///
    /// On failure the returned list holds every error found in the file,
    /// lexical errors first.
    pub fn parse_module(source: &'src str) -> Result<Module, Vec<ParseError>> {
        let mut parser = Self::new(source);
        let module = parser.module();
        let errors = parser.all_errors();
        if errors.is_empty() {
            Ok(module)
        } else {
            Err(errors)
        }
    }

    fn all_errors(&self) -> Vec<ParseError> {
        let mut errors: Vec<ParseError> = self
            .lex_errors
            .iter()
            .map(|lex| {
                ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        found: TokenKind::Error,
                        expected: ExpectedToken::Description(lex.error.to_string()),
                    },
                    lex.span,
                )
            })
            .collect();
        errors.extend(self.errors.iter().cloned());
        errors
    }

    // ========== Cursor helpers ==========

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len().saturating_sub(1))]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.position + 1)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn is_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_eof() {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(ParseErrorKind::UnexpectedToken {
                found: self.current_kind(),
                expected: ExpectedToken::Token(kind),
            }))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        if self.check(TokenKind::Ident) {
            let token = self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(self.error_here(ParseErrorKind::ExpectedIdentifier))
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.current().span)
    }

    // ========== Grammar ==========

    fn module(&mut self) -> Module {
        let mut stmts = Vec::new();
        while !self.is_eof() {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }
        Module::new(stmts, Span::from_range(0..self.source.len()))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.current_kind() {
            TokenKind::Def => self.def_stmt(),
            TokenKind::Str => Ok(self.string_stmt()),
            _ => Ok(self.other_stmt()),
        }
    }

    /// Parses a string literal at statement position. Only a string that
    /// stands alone on its line counts; a string that starts a larger
    /// expression is handled as an opaque statement instead.
    fn string_stmt(&mut self) -> Stmt {
        if !self.next_ends_statement() {
            return self.other_stmt();
        }
        let token = self.advance();
        let lit = StrLit::new(unquote_string(&token.lexeme), token.span);
        let stmt = Stmt::new(StmtKind::Str(lit), token.span);
        self.finish_line();
        stmt
    }

    fn next_ends_statement(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Semi | TokenKind::Eof
        )
    }

    /// Consumes a statement terminator. A semicolon may be followed by
    /// further statements on the same line, which stay for the caller.
    fn finish_line(&mut self) {
        self.eat(TokenKind::Semi);
        self.eat(TokenKind::Newline);
    }

    fn def_stmt(&mut self) -> ParseResult<Stmt> {
        let def_token = self.expect(TokenKind::Def)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.params()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let body = self.suite()?;
        let end = body.last().map_or(name.span, |stmt| stmt.span);
        let span = def_token.span.merge(end);
        let def = DefStmt {
            name,
            params,
            body,
            span,
        };
        Ok(Stmt::new(StmtKind::Def(def), span))
    }

    fn params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params: Vec<Param> = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_eof() {
            if let Some(param) = self.param()? {
                let duplicate = params
                    .iter()
                    .any(|existing| existing.name.name == param.name.name);
                if duplicate {
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateParameter(param.name.name.clone()),
                        param.name.span,
                    ));
                }
                params.push(param);
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn param(&mut self) -> ParseResult<Option<Param>> {
        let start = self.current().span;
        if self.eat(TokenKind::Star) {
            if self.check(TokenKind::Comma) || self.check(TokenKind::RParen) {
                // A bare `*` only marks later parameters as keyword-only.
                return Ok(None);
            }
            let name = self.expect_ident()?;
            let span = start.merge(name.span);
            return Ok(Some(Param {
                name,
                kind: ParamKind::Args,
                default: None,
                span,
            }));
        }
        if self.eat(TokenKind::StarStar) {
            let name = self.expect_ident()?;
            let span = start.merge(name.span);
            return Ok(Some(Param {
                name,
                kind: ParamKind::KwArgs,
                default: None,
                span,
            }));
        }
        let name = self.expect_ident()?;
        let mut span = name.span;
        let mut default = None;
        if self.eat(TokenKind::Eq) {
            let (snippet, end) = self.default_expr()?;
            default = Some(snippet);
            span = span.merge(end);
        }
        Ok(Some(Param {
            name,
            kind: ParamKind::Normal,
            default,
            span,
        }))
    }

    /// Consumes a default value expression and returns its source text.
    /// The expression runs to the next comma or closing parenthesis that
    /// is not nested inside brackets.
    fn default_expr(&mut self) -> ParseResult<(String, Span)> {
        let mut depth = 0u32;
        let mut first: Option<Span> = None;
        let mut last = self.current().span;
        loop {
            if self.is_eof() {
                return Err(self.error_here(ParseErrorKind::UnexpectedEof));
            }
            let kind = self.current_kind();
            if depth == 0 && matches!(kind, TokenKind::Comma | TokenKind::RParen) {
                break;
            }
            if kind.opens_bracket() {
                depth += 1;
            } else if kind.closes_bracket() {
                depth = depth.saturating_sub(1);
            }
            let token = self.advance();
            if first.is_none() {
                first = Some(token.span);
            }
            last = token.span;
        }
        let Some(start) = first else {
            return Err(self.error_here(ParseErrorKind::ExpectedExpression));
        };
        let span = start.merge(last);
        let snippet = self.source[span.as_range()].to_string();
        Ok((snippet, span))
    }

    /// Parses the body of a definition: either an indented block on the
    /// following lines or statements inline after the colon.
    fn suite(&mut self) -> ParseResult<Vec<Stmt>> {
        if self.eat(TokenKind::Newline) {
            if !self.check(TokenKind::Indent) {
                return Err(self.error_here(ParseErrorKind::ExpectedIndentedBlock));
            }
            self.advance();
            let mut stmts = Vec::new();
            while !self.check(TokenKind::Dedent) && !self.is_eof() {
                match self.statement() {
                    Ok(stmt) => stmts.push(stmt),
                    Err(error) => {
                        self.errors.push(error);
                        self.synchronize();
                    }
                }
            }
            self.eat(TokenKind::Dedent);
            return Ok(stmts);
        }
        self.inline_suite()
    }

    /// Parses statements sharing the def's line, e.g. `def f(): pass`.
    fn inline_suite(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Newline => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Semi => {
                    self.advance();
                }
                TokenKind::Str if self.next_ends_statement() => {
                    let token = self.advance();
                    let lit = StrLit::new(unquote_string(&token.lexeme), token.span);
                    stmts.push(Stmt::new(StmtKind::Str(lit), token.span));
                    if !self.eat(TokenKind::Semi) {
                        self.eat(TokenKind::Newline);
                        break;
                    }
                }
                _ => {
                    stmts.push(self.other_stmt());
                    break;
                }
            }
        }
        Ok(stmts)
    }

    /// Consumes a statement the AST does not model, tracking only its
    /// extent. If the line opens an indented block the whole block is
    /// consumed with it.
    fn other_stmt(&mut self) -> Stmt {
        let start = self.current().span;
        let mut end = start;
        while !matches!(self.current_kind(), TokenKind::Newline | TokenKind::Eof) {
            end = self.advance().span;
        }
        self.eat(TokenKind::Newline);
        if self.check(TokenKind::Indent) {
            end = self.skip_block();
        }
        Stmt::new(StmtKind::Other, start.merge(end))
    }

    /// Consumes a balanced indent/dedent block. The current token must be
    /// an indent. Returns the span of the last token consumed.
    fn skip_block(&mut self) -> Span {
        let mut end = self.current().span;
        let mut depth = 0u32;
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Indent => {
                    depth += 1;
                    end = self.advance().span;
                }
                TokenKind::Dedent => {
                    depth = depth.saturating_sub(1);
                    end = self.advance().span;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {
                    end = self.advance().span;
                }
            }
        }
        end
    }

    /// Skips ahead to the next statement boundary after an error.
    fn synchronize(&mut self) {
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Newline => {
                    self.advance();
                    if self.check(TokenKind::Indent) {
                        self.skip_block();
                    }
                    return;
                }
                // A def can only start a statement, so it is a boundary
                // even when unbalanced brackets swallowed the newlines.
                TokenKind::Def => return,
                TokenKind::Dedent => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Module {
        Parser::parse_module(source).expect("source should parse")
    }

    fn only_def(module: &Module) -> &DefStmt {
        match &module.stmts[0].kind {
            StmtKind::Def(def) => def,
            other => panic!("expected a def, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_parses() {
        let module = parse("");
        assert!(module.stmts.is_empty());
    }

    #[test]
    fn simple_def() {
        let module = parse("def foo():\n    pass\n");
        assert_eq!(module.stmts.len(), 1);
        let def = only_def(&module);
        assert_eq!(def.name.name, "foo");
        assert!(def.params.is_empty());
        assert_eq!(def.body.len(), 1);
        assert_eq!(def.body[0].kind, StmtKind::Other);
    }

    #[test]
    fn params_with_defaults_keep_source_text() {
        let module = parse("def f(a, b = 1, c = \"x\"):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params.len(), 3);
        assert_eq!(def.params[0].name.name, "a");
        assert_eq!(def.params[0].default, None);
        assert_eq!(def.params[1].default.as_deref(), Some("1"));
        assert_eq!(def.params[2].default.as_deref(), Some("\"x\""));
    }

    #[test]
    fn structured_defaults_span_brackets() {
        let module = parse("def f(deps = [1, 2], m = {\"k\": \"v\"}):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params[0].default.as_deref(), Some("[1, 2]"));
        assert_eq!(def.params[1].default.as_deref(), Some("{\"k\": \"v\"}"));
    }

    #[test]
    fn call_defaults_span_nested_parens() {
        let module = parse("def f(x = select({\"a\": 1})):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params[0].default.as_deref(), Some("select({\"a\": 1})"));
    }

    #[test]
    fn star_parameters() {
        let module = parse("def f(a, *args, **kwargs):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params.len(), 3);
        assert_eq!(def.params[0].kind, ParamKind::Normal);
        assert_eq!(def.params[1].kind, ParamKind::Args);
        assert_eq!(def.params[1].name.name, "args");
        assert_eq!(def.params[2].kind, ParamKind::KwArgs);
        assert_eq!(def.params[2].name.name, "kwargs");
    }

    #[test]
    fn bare_star_is_not_a_parameter() {
        let module = parse("def f(a, *, b = 1):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.params[0].name.name, "a");
        assert_eq!(def.params[1].name.name, "b");
        assert_eq!(def.params[1].kind, ParamKind::Normal);
    }

    #[test]
    fn duplicate_parameter_is_an_error() {
        let errors = Parser::parse_module("def f(a, a):\n    pass\n").unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::DuplicateParameter("a".to_string())));
    }

    #[test]
    fn def_docstring_is_first_body_statement() {
        let module = parse("def f():\n    \"doc\"\n    pass\n");
        let def = only_def(&module);
        let doc = def.docstring().expect("docstring");
        assert_eq!(doc.value, "doc");
    }

    #[test]
    fn triple_quoted_docstring_keeps_newlines() {
        let module = parse("def f():\n    \"\"\"Line one.\n\n    More.\n    \"\"\"\n");
        let def = only_def(&module);
        let doc = def.docstring().expect("docstring");
        assert!(doc.value.starts_with("Line one.\n"));
        assert!(doc.value.contains("More."));
    }

    #[test]
    fn module_docstring() {
        let module = parse("\"\"\"Module doc.\"\"\"\nx = 1\n");
        let doc = module.docstring().expect("module docstring");
        assert_eq!(doc.value, "Module doc.");
        assert_eq!(module.stmts.len(), 2);
    }

    #[test]
    fn assignment_string_is_not_a_docstring() {
        let module = parse("x = \"not a doc\"\ndef f():\n    pass\n");
        assert!(module.docstring().is_none());
        assert_eq!(module.stmts[0].kind, StmtKind::Other);
    }

    #[test]
    fn trailing_string_is_a_plain_statement() {
        let module = parse("example = rule(impl)\n\"\"\"Docs.\"\"\"\n");
        assert!(module.docstring().is_none());
        assert!(matches!(module.stmts[1].kind, StmtKind::Str(_)));
    }

    #[test]
    fn inline_suite_with_docstring() {
        let module = parse("def f(): \"doc\"\n");
        let def = only_def(&module);
        assert_eq!(def.docstring().map(|d| d.value.as_str()), Some("doc"));
    }

    #[test]
    fn inline_suite_with_statement() {
        let module = parse("def f(): pass\n");
        let def = only_def(&module);
        assert_eq!(def.body.len(), 1);
        assert_eq!(def.body[0].kind, StmtKind::Other);
    }

    #[test]
    fn nested_defs_stay_nested() {
        let module = parse("def outer():\n    def inner():\n        pass\n    pass\n");
        assert_eq!(module.stmts.len(), 1);
        let outer = only_def(&module);
        assert_eq!(outer.body.len(), 2);
        assert!(matches!(&outer.body[0].kind, StmtKind::Def(d) if d.name.name == "inner"));
    }

    #[test]
    fn control_flow_blocks_are_opaque() {
        let module = parse("if x:\n    y = 1\n    z = 2\nw = 3\n");
        assert_eq!(module.stmts.len(), 2);
        assert_eq!(module.stmts[0].kind, StmtKind::Other);
        assert_eq!(module.stmts[1].kind, StmtKind::Other);
    }

    #[test]
    fn missing_block_is_an_error() {
        let errors = Parser::parse_module("def f():\n").unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::ExpectedIndentedBlock));
    }

    #[test]
    fn recovery_reports_every_broken_def() {
        let errors = Parser::parse_module("def a(:\n    pass\ndef b(:\n    pass\n").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ParseErrorKind::ExpectedIdentifier));
    }

    #[test]
    fn lex_errors_surface_as_parse_errors() {
        let errors = Parser::parse_module("x = $\n").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Error,
                ..
            }
        ));
    }

    #[test]
    fn semicolon_separates_string_and_statement() {
        let module = parse("\"\"\"doc\"\"\"; x = 1\n");
        assert_eq!(module.stmts.len(), 2);
        assert!(matches!(module.stmts[0].kind, StmtKind::Str(_)));
        assert_eq!(module.stmts[1].kind, StmtKind::Other);
    }

    #[test]
    fn multiline_params_parse() {
        let module = parse("def f(\n    a,\n    b = 2,\n):\n    pass\n");
        let def = only_def(&module);
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.params[1].default.as_deref(), Some("2"));
    }
}
