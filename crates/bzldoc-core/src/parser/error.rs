//! Parse error types

use thiserror::Error;

use crate::lexer::{Span, TokenKind};

/// What the parser was looking for when it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedToken {
    /// A specific token kind
    Token(TokenKind),
    /// A free-form description
    Description(String),
}

impl std::fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(kind) => write!(f, "{kind}"),
            Self::Description(text) => write!(f, "{text}"),
        }
    }
}

/// The kinds of error the parser reports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token: found {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: ExpectedToken,
    },
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("expected an identifier")]
    ExpectedIdentifier,
    #[error("expected an expression")]
    ExpectedExpression,
    #[error("expected an indented block")]
    ExpectedIndentedBlock,
    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),
}

/// A parse error with its source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for ParseError {}
