//! Abstract syntax tree for .bzl modules
//!
//! The tree is deliberately shallow. Documentation extraction only needs
//! function definitions, their parameter lists, and the string literals
//! that serve as docstrings, so every other statement is kept as an
//! opaque [`StmtKind::Other`] with nothing but a span.

use crate::lexer::Span;

/// Trait for AST nodes that carry a source span
pub trait Spanned {
    fn span(&self) -> Span;
}

/// An identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A string literal with its decoded value
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub span: Span,
}

impl StrLit {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

/// How a parameter binds its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Ordinary named parameter
    Normal,
    /// `*args` variadic parameter
    Args,
    /// `**kwargs` keyword parameter
    KwArgs,
}

/// A single parameter in a function definition
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub kind: ParamKind,
    /// Default value as it appeared in the source, if any
    pub default: Option<String>,
    pub span: Span,
}

/// A function definition
#[derive(Debug, Clone, PartialEq)]
pub struct DefStmt {
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl DefStmt {
    /// Returns the docstring if the first body statement is a string literal.
    #[must_use]
    pub fn docstring(&self) -> Option<&StrLit> {
        match self.body.first() {
            Some(Stmt {
                kind: StmtKind::Str(lit),
                ..
            }) => Some(lit),
            _ => None,
        }
    }
}

/// The kinds of statement the parser distinguishes
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A function definition
    Def(DefStmt),
    /// A bare string literal standing alone as a statement
    Str(StrLit),
    /// Any other statement, kept only for its extent
    Other,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[must_use]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A parsed .bzl module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Module {
    #[must_use]
    pub const fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    /// Returns the module docstring if the first statement is a string literal.
    #[must_use]
    pub fn docstring(&self) -> Option<&StrLit> {
        match self.stmts.first() {
            Some(Stmt {
                kind: StmtKind::Str(lit),
                ..
            }) => Some(lit),
            _ => None,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for StrLit {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Param {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for DefStmt {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Module {
    fn span(&self) -> Span {
        self.span
    }
}
