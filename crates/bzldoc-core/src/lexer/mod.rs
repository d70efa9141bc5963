//! Lexer for .bzl source files
//!
//! Converts source text into a flat token stream. Beyond the usual
//! keyword/operator/literal tokens, the lexer synthesizes the layout
//! tokens a Python-shaped grammar needs:
//!
//! - [`TokenKind::Newline`] at the end of each logical line
//! - [`TokenKind::Indent`] and [`TokenKind::Dedent`] when the leading
//!   whitespace of a line grows or shrinks relative to an indent stack
//!
//! Newlines inside parentheses, brackets, and braces are suppressed, as
//! are blank lines and comment-only lines. A backslash at the end of a
//! physical line joins it with the next one. String literals (including
//! raw and triple-quoted forms) are scanned by hand so that quotes and
//! escapes never confuse the token-level rules.

mod span;
mod token;

use std::collections::VecDeque;

use logos::Logos;
use thiserror::Error;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

/// A lexical error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Character that starts no token
    #[error("unexpected character")]
    UnexpectedChar,
    /// String literal with no closing quote before end of line or file
    #[error("unterminated string literal")]
    UnterminatedString,
    /// Dedent to a column that matches no enclosing indentation level
    #[error("inconsistent indentation")]
    InconsistentIndentation,
}

/// A lexical error with its source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub const fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// A token with its kind, location, and source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }
}

/// Tokenizer with indentation tracking
pub struct Lexer<'source> {
    source: &'source str,
    position: usize,
    /// Indent/dedent tokens waiting to be handed out
    pending: VecDeque<Token>,
    /// Stack of active indentation columns, always starting at 0
    indents: Vec<u32>,
    /// Nesting depth of parentheses, brackets, and braces
    bracket_depth: u32,
    at_line_start: bool,
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            pending: VecDeque::new(),
            indents: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            errors: Vec::new(),
        }
    }

    /// Tokenizes the entire source.
    ///
    /// The stream always ends with a single [`TokenKind::Eof`], preceded
    /// by a synthetic newline and any dedents the source still owes.
    /// Errors do not stop tokenization; each one leaves a
    /// [`TokenKind::Error`] token behind and lexing continues.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<SpannedError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.position >= self.source.len() {
                return self.finish();
            }
            if self.at_line_start && self.bracket_depth == 0 {
                self.start_of_line();
                continue;
            }
            if let Some(token) = self.scan_token() {
                return token;
            }
        }
    }

    /// Measures the indentation of the line at the current position and
    /// queues indent or dedent tokens. Blank lines and comment-only lines
    /// are consumed whole; they never affect the indent stack.
    fn start_of_line(&mut self) {
        let bytes = self.source.as_bytes();
        loop {
            let line_start = self.position;
            let mut pos = self.position;
            let mut column = 0u32;
            while pos < bytes.len() {
                match bytes[pos] {
                    b' ' => column += 1,
                    // Tabs advance to the next multiple of eight.
                    b'\t' => column = column - column % 8 + 8,
                    b'\r' => {}
                    _ => break,
                }
                pos += 1;
            }
            if pos >= bytes.len() {
                self.position = pos;
                return;
            }
            match bytes[pos] {
                b'\n' => {
                    self.position = pos + 1;
                }
                b'#' => {
                    while pos < bytes.len() && bytes[pos] != b'\n' {
                        pos += 1;
                    }
                    self.position = if pos < bytes.len() { pos + 1 } else { pos };
                }
                _ => {
                    self.position = pos;
                    self.at_line_start = false;
                    self.apply_indentation(column, line_start);
                    return;
                }
            }
        }
    }

    fn apply_indentation(&mut self, column: u32, line_start: usize) {
        let current = self.indents.last().copied().unwrap_or(0);
        if column > current {
            self.indents.push(column);
            let span = Span::from_range(line_start..self.position);
            let lexeme = &self.source[line_start..self.position];
            self.pending
                .push_back(Token::new(TokenKind::Indent, span, lexeme));
            return;
        }
        let here = Span::from_range(self.position..self.position);
        while self.indents.last().copied().unwrap_or(0) > column {
            self.indents.pop();
            self.pending
                .push_back(Token::new(TokenKind::Dedent, here, ""));
        }
        if self.indents.last().copied().unwrap_or(0) != column {
            self.errors.push(SpannedError::new(
                LexError::InconsistentIndentation,
                Span::from_range(line_start..self.position),
            ));
        }
    }

    /// Scans one token from within a line. Returns `None` when the input
    /// consumed produces no token (comments, newlines inside brackets).
    fn scan_token(&mut self) -> Option<Token> {
        self.skip_spaces();
        let bytes = self.source.as_bytes();
        if self.position >= bytes.len() {
            return None;
        }
        match bytes[self.position] {
            b'\n' => {
                let span = Span::from_range(self.position..self.position + 1);
                self.position += 1;
                self.at_line_start = true;
                if self.bracket_depth == 0 {
                    Some(Token::new(TokenKind::Newline, span, "\n"))
                } else {
                    None
                }
            }
            b'#' => {
                while self.position < bytes.len() && bytes[self.position] != b'\n' {
                    self.position += 1;
                }
                None
            }
            b'"' | b'\'' => Some(self.scan_string()),
            b'r' | b'R'
                if matches!(bytes.get(self.position + 1).copied(), Some(b'"' | b'\'')) =>
            {
                Some(self.scan_string())
            }
            _ => self.lex_with_logos(),
        }
    }

    /// Skips spaces, tabs, carriage returns, and backslash-newline pairs.
    fn skip_spaces(&mut self) {
        let bytes = self.source.as_bytes();
        loop {
            match bytes.get(self.position).copied() {
                Some(b' ' | b'\t' | b'\r') => self.position += 1,
                Some(b'\\') => match bytes.get(self.position + 1).copied() {
                    Some(b'\n') => self.position += 2,
                    Some(b'\r') if bytes.get(self.position + 2).copied() == Some(b'\n') => {
                        self.position += 3;
                    }
                    _ => return,
                },
                _ => return,
            }
        }
    }

    /// Runs the derived token rules on the remaining source and adopts
    /// the first match, offsetting its span to absolute positions.
    fn lex_with_logos(&mut self) -> Option<Token> {
        let mut inner = TokenKind::lexer(&self.source[self.position..]);
        let Some(result) = inner.next() else {
            self.position = self.source.len();
            return None;
        };
        let inner_span = inner.span();
        let span =
            Span::from_range(self.position + inner_span.start..self.position + inner_span.end);
        let lexeme = &self.source[span.as_range()];
        self.position += inner_span.end;
        self.at_line_start = false;
        match result {
            Ok(kind) => {
                if kind.opens_bracket() {
                    self.bracket_depth += 1;
                } else if kind.closes_bracket() {
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                }
                Some(Token::new(kind, span, lexeme))
            }
            Err(()) => {
                self.errors
                    .push(SpannedError::new(LexError::UnexpectedChar, span));
                Some(Token::new(TokenKind::Error, span, lexeme))
            }
        }
    }

    /// Scans a string literal starting at the current position, which must
    /// sit on a quote or on an `r`/`R` prefix directly before one. Handles
    /// single- and triple-quoted forms with either quote character. A
    /// backslash always skips the next character, so escaped quotes never
    /// close the literal.
    fn scan_string(&mut self) -> Token {
        let bytes = self.source.as_bytes();
        let start = self.position;
        let mut pos = start;
        if matches!(bytes[pos], b'r' | b'R') {
            pos += 1;
        }
        let quote = bytes[pos];
        let triple = bytes.get(pos + 1).copied() == Some(quote)
            && bytes.get(pos + 2).copied() == Some(quote);
        pos += if triple { 3 } else { 1 };
        let mut terminated = false;
        if triple {
            while pos < bytes.len() {
                if bytes[pos] == quote
                    && bytes.get(pos + 1).copied() == Some(quote)
                    && bytes.get(pos + 2).copied() == Some(quote)
                {
                    pos += 3;
                    terminated = true;
                    break;
                }
                if bytes[pos] == b'\\' {
                    pos = (pos + 2).min(bytes.len());
                } else {
                    pos += 1;
                }
            }
        } else {
            while pos < bytes.len() {
                let b = bytes[pos];
                if b == quote {
                    pos += 1;
                    terminated = true;
                    break;
                }
                match b {
                    // Leave the newline for the line machinery.
                    b'\n' => break,
                    b'\\' => pos = (pos + 2).min(bytes.len()),
                    _ => pos += 1,
                }
            }
        }
        let span = Span::from_range(start..pos);
        let lexeme = &self.source[start..pos];
        self.position = pos;
        self.at_line_start = false;
        if terminated {
            Token::new(TokenKind::Str, span, lexeme)
        } else {
            self.errors
                .push(SpannedError::new(LexError::UnterminatedString, span));
            Token::new(TokenKind::Error, span, lexeme)
        }
    }

    /// Produces the tokens owed at end of input: a final newline if the
    /// last line lacks one, then one dedent per open indentation level,
    /// then `Eof`.
    fn finish(&mut self) -> Token {
        let end = Span::from_range(self.source.len()..self.source.len());
        if !self.at_line_start {
            self.at_line_start = true;
            return Token::new(TokenKind::Newline, end, "");
        }
        if self.indents.len() > 1 {
            self.indents.pop();
            return Token::new(TokenKind::Dedent, end, "");
        }
        Token::new(TokenKind::Eof, end, "")
    }
}

/// Decodes a string literal lexeme into its value.
///
/// Strips an `r`/`R` prefix and the surrounding quotes (single or triple),
/// then resolves backslash escapes unless the literal was raw. Unknown
/// escapes keep the backslash, matching how Starlark treats them.
#[must_use]
pub fn unquote_string(lexeme: &str) -> String {
    let mut rest = lexeme;
    let mut raw = false;
    if rest.starts_with('r') || rest.starts_with('R') {
        raw = true;
        rest = &rest[1..];
    }
    let body = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
        let quote = &rest[..3];
        let inner = &rest[3..];
        inner.strip_suffix(quote).unwrap_or(inner)
    } else if rest.starts_with('"') || rest.starts_with('\'') {
        let quote = rest.chars().next().unwrap_or('"');
        let inner = &rest[1..];
        inner.strip_suffix(quote).unwrap_or(inner)
    } else {
        rest
    };
    if raw {
        return body.to_string();
    }
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('\\') => value.push('\\'),
            Some('\'') => value.push('\''),
            Some('"') => value.push('"'),
            Some('a') => value.push('\x07'),
            Some('b') => value.push('\x08'),
            Some('f') => value.push('\x0c'),
            Some('v') => value.push('\x0b'),
            Some('0') => value.push('\0'),
            // A backslash at the end of a line joins it with the next.
            Some('\n') => {}
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}
