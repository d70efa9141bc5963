//! Documentation extraction for .bzl files
//!
//! This module provides tools for turning parsed .bzl modules into
//! structured documentation records and rendering those records as
//! Markdown. JSON output comes from the records' `Serialize` impls.

mod docstring;
mod extractor;
mod markdown;
mod types;

pub use docstring::DocString;
pub use extractor::DocExtractor;
pub use markdown::MarkdownGenerator;
pub use types::{AttrType, Attribute, FileDoc, RuleDoc};
