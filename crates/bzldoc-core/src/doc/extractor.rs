//! Documentation extraction from parsed modules
//!
//! Walks the top level of a module, pairs each public function
//! definition with its parsed docstring, and assembles the file's
//! documentation record. Extraction is total: missing or sparse
//! documentation produces empty fields, never an error.

use std::collections::HashMap;

use crate::ast::{Module, ParamKind, StmtKind};
use crate::doc::docstring::DocString;
use crate::doc::types::{AttrType, Attribute, FileDoc, RuleDoc};

/// One documentable definition found at the top level
struct SourceUnit {
    name: String,
    params: Vec<ParamInfo>,
    docstring: Option<String>,
    is_private: bool,
}

struct ParamInfo {
    name: String,
    default: Option<String>,
}

/// Extracts documentation from parsed .bzl modules
#[derive(Debug, Clone, Copy, Default)]
pub struct DocExtractor;

impl DocExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the documentation for every public macro in the module,
    /// along with the file-level title and description.
    ///
    /// Definitions whose names start with `_` are skipped. When two
    /// public definitions share a name, the later one replaces the
    /// earlier one but keeps its place in the output order.
    #[must_use]
    pub fn extract(&self, module: &Module) -> FileDoc {
        let mut file = FileDoc::default();
        if let Some(doc) = module.docstring() {
            let parsed = DocString::parse_file(&doc.value);
            file.title = parsed.summary;
            file.description = parsed.description;
        }
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for unit in scan(module) {
            if unit.is_private {
                continue;
            }
            let rule = resolve(&unit);
            match by_name.get(&rule.name) {
                Some(&index) => file.rules[index] = rule,
                None => {
                    by_name.insert(rule.name.clone(), file.rules.len());
                    file.rules.push(rule);
                }
            }
        }
        file
    }
}

/// Collects the top-level function definitions in source order.
/// `*args` and `**kwargs` parameters never become attributes.
fn scan(module: &Module) -> Vec<SourceUnit> {
    let mut units = Vec::new();
    for stmt in &module.stmts {
        let StmtKind::Def(def) = &stmt.kind else {
            continue;
        };
        let params = def
            .params
            .iter()
            .filter(|param| param.kind == ParamKind::Normal)
            .map(|param| ParamInfo {
                name: param.name.name.clone(),
                default: param.default.clone(),
            })
            .collect();
        units.push(SourceUnit {
            name: def.name.name.clone(),
            params,
            docstring: def.docstring().map(|lit| lit.value.clone()),
            is_private: def.name.name.starts_with('_'),
        });
    }
    units
}

/// Builds the documentation record for one definition, pairing each
/// parameter with its entry from the docstring's argument section.
fn resolve(unit: &SourceUnit) -> RuleDoc {
    let doc = unit
        .docstring
        .as_deref()
        .map(DocString::parse)
        .unwrap_or_default();
    let attributes = unit
        .params
        .iter()
        .map(|param| Attribute {
            name: param.name.clone(),
            ty: AttrType::Unknown,
            mandatory: param.default.is_none(),
            documentation: doc.arg_doc(&param.name).unwrap_or("").to_string(),
            default: param.default.clone(),
        })
        .collect();
    RuleDoc {
        name: unit.name.clone(),
        documentation: doc.documentation(),
        attributes,
    }
}
