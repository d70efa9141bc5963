//! End-to-end extraction tests over complete .bzl sources

use bzldoc_core::doc::AttrType;
use bzldoc_core::{DocExtractor, FileDoc, MarkdownGenerator, Parser};

fn src(lines: &[&str]) -> String {
    let mut source = lines.join("\n");
    source.push('\n');
    source
}

fn extract(source: &str) -> FileDoc {
    let module = Parser::parse_module(source).expect("source should parse");
    DocExtractor::new().extract(&module)
}

#[test]
fn multiline_documentation_with_continuations() {
    let source = src(&[
        "def multiline(name, foo=False, visibility=None):",
        "  \"\"\"A rule with multiline documentation.",
        "",
        "  Some more documentation about this rule here.",
        "",
        "  Args:",
        "    name: A unique name for this rule.",
        "    foo: A test argument.",
        "",
        "      Documentation for foo continued here.",
        "    visibility: The visibility of this rule.",
        "",
        "      Documentation for visibility continued here.",
        "  \"\"\"",
        "  native.genrule(",
        "      name = name,",
        "      out = [\"foo\"],",
        "      cmd = \"touch $@\",",
        "      visibility = visibility,",
        "  )",
    ]);
    let file = extract(&source);
    assert_eq!(file.rules.len(), 1);

    let rule = &file.rules[0];
    assert_eq!(rule.name, "multiline");
    assert_eq!(
        rule.documentation,
        "A rule with multiline documentation.\n\nSome more documentation about this rule here."
    );

    let name = rule.attribute("name").unwrap();
    assert!(name.mandatory);
    assert_eq!(name.documentation, "A unique name for this rule.");

    let foo = rule.attribute("foo").unwrap();
    assert!(!foo.mandatory);
    assert_eq!(
        foo.documentation,
        "A test argument.\n\nDocumentation for foo continued here."
    );

    let visibility = rule.attribute("visibility").unwrap();
    assert!(!visibility.mandatory);
    assert_eq!(
        visibility.documentation,
        "The visibility of this rule.\n\nDocumentation for visibility continued here."
    );
}

#[test]
fn undocumented_macro_still_lists_parameters() {
    let source = src(&[
        "def undocumented(name, visibility=None):",
        "  native.genrule(",
        "      name = name,",
        "      out = [\"foo\"],",
        "      cmd = \"touch $@\",",
        "      visibility = visibility,",
        "  )",
    ]);
    let file = extract(&source);
    let rule = &file.rules[0];
    assert_eq!(rule.name, "undocumented");
    assert_eq!(rule.documentation, "");
    assert_eq!(rule.attributes.len(), 2);
    assert!(rule.attributes[0].mandatory);
    assert!(!rule.attributes[1].mandatory);
    assert_eq!(rule.attributes[0].documentation, "");
    assert_eq!(rule.attributes[1].documentation, "");
}

#[test]
fn private_macros_are_skipped() {
    let source = src(&[
        "def _private(name, visibility=None):",
        "  \"\"\"A private macro that should not appear in docs.\"\"\"",
        "  pass",
        "",
        "def public(name, visibility=None):",
        "  \"\"\"A public macro that should appear in docs.\"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let names: Vec<_> = file.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["public"]);
}

#[test]
fn rule_invocations_are_not_extracted() {
    let source = src(&[
        "def _impl(ctx):",
        "  return struct()",
        "",
        "example_rule = rule(",
        "    implementation = _impl,",
        "    attrs = {",
        "        \"arg_label\": attr.label(),",
        "        \"arg_string\": attr.string(),",
        "    },",
        ")",
        "\"\"\"An example rule.",
        "",
        "Args:",
        "  name: A unique name for this rule.",
        "  arg_label: A label argument.",
        "  arg_string: A string argument.",
        "\"\"\"",
        "",
        "def example_macro(name, foo, visibility=None):",
        "  \"\"\"An example macro.",
        "",
        "  Args:",
        "    name: A unique name for this rule.",
        "    foo: A test argument.",
        "    visibility: The visibility of this rule.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let names: Vec<_> = file.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["example_macro"]);

    let rule = &file.rules[0];
    assert_eq!(rule.documentation, "An example macro.");
    assert!(rule.attribute("name").unwrap().mandatory);
    assert!(rule.attribute("foo").unwrap().mandatory);
    assert!(!rule.attribute("visibility").unwrap().mandatory);
}

#[test]
fn file_docstring_title_only() {
    let file = extract(&src(&["\"\"\"Example rules\"\"\""]));
    assert_eq!(file.title, "Example rules");
    assert_eq!(file.description, "");
    assert!(file.rules.is_empty());
}

#[test]
fn file_docstring_title_and_description() {
    let source = src(&[
        "\"\"\"Example rules",
        "",
        "This file contains example Bazel rules.",
        "",
        "Documentation continued here.",
        "\"\"\"",
    ]);
    let file = extract(&source);
    assert_eq!(file.title, "Example rules");
    assert_eq!(
        file.description,
        "This file contains example Bazel rules.\n\nDocumentation continued here."
    );
}

#[test]
fn file_docstring_multiline_title() {
    let source = src(&[
        "\"\"\"Example rules",
        "for Bazel",
        "",
        "This file contains example Bazel rules.",
        "",
        "Documentation continued here.",
        "\"\"\"",
    ]);
    let file = extract(&source);
    assert_eq!(file.title, "Example rules for Bazel");
    assert_eq!(
        file.description,
        "This file contains example Bazel rules.\n\nDocumentation continued here."
    );
}

#[test]
fn attributes_follow_declaration_order() {
    let source = src(&[
        "def ordered(charlie, alpha, bravo=None):",
        "  \"\"\"Ordered.",
        "",
        "  Args:",
        "    alpha: Second parameter.",
        "    bravo: Third parameter.",
        "    charlie: First parameter.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let names: Vec<_> = file.rules[0]
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["charlie", "alpha", "bravo"]);
    assert_eq!(
        file.rules[0].attribute("charlie").unwrap().documentation,
        "First parameter."
    );
}

#[test]
fn documented_names_without_parameters_are_dropped() {
    let source = src(&[
        "def m(name):",
        "  \"\"\"Macro.",
        "",
        "  Args:",
        "    name: A unique name.",
        "    phantom: Documented but not a parameter.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let rule = &file.rules[0];
    assert_eq!(rule.attributes.len(), 1);
    assert!(rule.attribute("phantom").is_none());
}

#[test]
fn variadic_parameters_never_appear() {
    let source = src(&[
        "def m(name, *args, **kwargs):",
        "  \"\"\"Macro.",
        "",
        "  Args:",
        "    name: A unique name.",
        "    args: Extra positional arguments.",
        "    kwargs: Extra keyword arguments.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let names: Vec<_> = file.rules[0]
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["name"]);
}

#[test]
fn later_definition_replaces_earlier_in_place() {
    let source = src(&[
        "def target(a):",
        "  \"\"\"First version.\"\"\"",
        "  pass",
        "",
        "def other(b):",
        "  pass",
        "",
        "def target(x, y=None):",
        "  \"\"\"Second version.\"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let names: Vec<_> = file.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["target", "other"]);
    assert_eq!(file.rules[0].documentation, "Second version.");
    assert_eq!(file.rules[0].attributes.len(), 2);
}

#[test]
fn extraction_is_deterministic() {
    let source = src(&[
        "\"\"\"Helpers\"\"\"",
        "",
        "def a(x):",
        "  pass",
        "",
        "def b(y=1):",
        "  pass",
    ]);
    assert_eq!(extract(&source), extract(&source));
}

#[test]
fn json_output_matches_the_schema() {
    let source = src(&[
        "def m(name, srcs=[]):",
        "  \"\"\"Macro.",
        "",
        "  Args:",
        "    name: A unique name.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let value = serde_json::to_value(&file).unwrap();

    assert!(value.get("title").is_none());
    assert!(value.get("description").is_none());

    let rule = &value["rules"][0];
    assert_eq!(rule["name"], "m");
    assert_eq!(rule["documentation"], "Macro.");

    let name = &rule["attributes"][0];
    assert_eq!(name["name"], "name");
    assert_eq!(name["type"], "UNKNOWN");
    assert_eq!(name["mandatory"], true);
    assert_eq!(name["documentation"], "A unique name.");

    let srcs = &rule["attributes"][1];
    assert_eq!(srcs["mandatory"], false);
    assert!(srcs.get("documentation").is_none());
    assert!(srcs.get("default").is_none());

    let empty = serde_json::to_value(extract("x = 1\n")).unwrap();
    assert_eq!(empty, serde_json::json!({}));
}

#[test]
fn attribute_type_is_always_unknown() {
    let file = extract("def m(a, b=2):\n  pass\n");
    for attr in &file.rules[0].attributes {
        assert_eq!(attr.ty, AttrType::Unknown);
    }
}

#[test]
fn markdown_covers_extracted_documentation() {
    let source = src(&[
        "def multiline(name, foo=False):",
        "  \"\"\"A rule with multiline documentation.",
        "",
        "  Args:",
        "    name: A unique name for this rule.",
        "    foo: A test argument.",
        "",
        "      Documentation for foo continued here.",
        "  \"\"\"",
        "  pass",
    ]);
    let file = extract(&source);
    let markdown = MarkdownGenerator::generate(&file, "example.bzl");
    assert!(markdown.contains("# example.bzl"));
    assert!(markdown.contains("### multiline"));
    assert!(markdown.contains("multiline(name, foo = False)"));
    assert!(markdown.contains("- `name` (required): A unique name for this rule."));
    assert!(markdown.contains("- `foo` (optional): A test argument.\n\n  Documentation for foo continued here."));
}

#[test]
fn malformed_sources_report_errors() {
    let errors = Parser::parse_module("def broken(:\n    pass\n").unwrap_err();
    assert!(!errors.is_empty());
}
