//! Markdown documentation generator

use std::fmt::Write;

use super::types::{Attribute, FileDoc, RuleDoc};

/// Generates Markdown documentation from extracted file documentation
pub struct MarkdownGenerator;

impl MarkdownGenerator {
    /// Generate a Markdown page for one documented .bzl file
    #[must_use]
    pub fn generate(file: &FileDoc, module_name: &str) -> String {
        let mut output = String::new();

        // Page header
        writeln!(output, "# {}", module_name).unwrap();
        writeln!(output).unwrap();

        // File-level documentation
        if !file.title.is_empty() {
            writeln!(output, "{}", file.title).unwrap();
            writeln!(output).unwrap();
        }
        if !file.description.is_empty() {
            writeln!(output, "{}", file.description).unwrap();
            writeln!(output).unwrap();
        }

        // Macros
        if !file.rules.is_empty() {
            writeln!(output, "## Macros").unwrap();
            writeln!(output).unwrap();

            for (index, rule) in file.rules.iter().enumerate() {
                if index > 0 {
                    writeln!(output, "---").unwrap();
                    writeln!(output).unwrap();
                }
                Self::write_rule(&mut output, rule);
            }
        }

        output
    }

    fn write_rule(output: &mut String, rule: &RuleDoc) {
        writeln!(output, "### {}", rule.name).unwrap();
        writeln!(output).unwrap();

        // Signature
        writeln!(output, "```starlark").unwrap();
        writeln!(output, "{}", signature(rule)).unwrap();
        writeln!(output, "```").unwrap();
        writeln!(output).unwrap();

        // Documentation
        if !rule.documentation.is_empty() {
            writeln!(output, "{}", rule.documentation).unwrap();
            writeln!(output).unwrap();
        }

        // Attributes
        if !rule.attributes.is_empty() {
            writeln!(output, "**Attributes:**").unwrap();
            writeln!(output).unwrap();
            for attr in &rule.attributes {
                Self::write_attribute(output, attr);
            }
            writeln!(output).unwrap();
        }
    }

    fn write_attribute(output: &mut String, attr: &Attribute) {
        let requirement = if attr.mandatory { "required" } else { "optional" };
        let mut paragraphs = attr.documentation.split("\n\n");
        let lead = paragraphs.next().unwrap_or("");
        if lead.is_empty() {
            writeln!(output, "- `{}` ({})", attr.name, requirement).unwrap();
        } else {
            writeln!(output, "- `{}` ({}): {}", attr.name, requirement, lead).unwrap();
        }
        // Continuation paragraphs indent under the list item.
        for paragraph in paragraphs {
            writeln!(output).unwrap();
            for line in paragraph.lines() {
                writeln!(output, "  {}", line).unwrap();
            }
        }
    }
}

/// Renders a call signature, collapsing multi-line defaults onto one line.
fn signature(rule: &RuleDoc) -> String {
    let params: Vec<String> = rule
        .attributes
        .iter()
        .map(|attr| match &attr.default {
            Some(default) => {
                let collapsed = default.split_whitespace().collect::<Vec<_>>().join(" ");
                format!("{} = {}", attr.name, collapsed)
            }
            None => attr.name.clone(),
        })
        .collect();
    format!("{}({})", rule.name, params.join(", "))
}
