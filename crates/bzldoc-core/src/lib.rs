//! bzldoc core - documentation extraction engine for Bazel .bzl files
//!
//! This crate provides the core functionality:
//! - Lexer: tokenization of .bzl source with Python-style layout tokens
//! - AST: statement-level syntax tree definitions
//! - Parser: AST construction from the token stream
//! - Doc: docstring parsing, documentation extraction, and rendering

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of .bzl source code
pub mod lexer;

/// Abstract syntax tree - parsed representation of .bzl source code
pub mod ast;

/// Parser module - converts tokens into AST
pub mod parser;

/// Documentation module - docstring parsing, extraction, and rendering
pub mod doc;

/// Convenience re-export of lexer
pub use lexer::Lexer;

/// Convenience re-export of parser
pub use parser::Parser;

/// Convenience re-export of the extraction pipeline types
pub use doc::{DocExtractor, FileDoc, MarkdownGenerator};
