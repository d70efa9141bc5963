//! Documentation data model
//!
//! These types hold everything extracted from a .bzl file and define the
//! JSON schema the CLI emits. Empty fields are omitted from the output,
//! so a macro with no documentation serializes to just its name and
//! attribute list.

use serde::Serialize;

/// The type reported for extracted attributes.
///
/// Macro parameters carry no declared type, so every attribute reports
/// the unknown sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AttrType {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Documentation for one attribute of a macro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttrType,
    /// True when the parameter has no default value
    pub mandatory: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documentation: String,
    /// Default value source text, kept for rendering only
    #[serde(skip)]
    pub default: Option<String>,
}

/// Documentation for one macro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleDoc {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documentation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl RuleDoc {
    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// Documentation extracted from one .bzl file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileDoc {
    /// First paragraph of the module docstring
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Remaining paragraphs of the module docstring
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDoc>,
}

impl FileDoc {
    /// Looks up a macro by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&RuleDoc> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}
