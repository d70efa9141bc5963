//! bzldoc - generate documentation from Bazel .bzl macro files.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `bzldoc < rules.bzl` writes rendered docs to stdout
//! - **file mode**: `bzldoc -o docs rules/` writes one output file per module

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use bzldoc_core::lexer::LineIndex;
use bzldoc_core::parser::ParseError;
use bzldoc_core::{DocExtractor, FileDoc, MarkdownGenerator};

#[derive(Parser)]
#[command(name = "bzldoc")]
#[command(version = bzldoc_core::VERSION)]
#[command(about = "Generate documentation from Bazel .bzl macro files", long_about = None)]
struct Cli {
    /// Input .bzl files or directories (searched recursively). If omitted, reads from stdin.
    inputs: Vec<PathBuf>,

    /// Output directory (required when inputs are given)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default) or json
    #[arg(short, long, default_value = "markdown")]
    format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markdown,
    Json,
}

impl Format {
    fn from_arg(arg: &str) -> Result<Self> {
        match arg {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown format: {other}"),
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::from_arg(&cli.format)?;

    if cli.inputs.is_empty() {
        return stdin_mode(format);
    }

    file_mode(&cli.inputs, cli.output.as_deref(), format)
}

/// stdin mode: read one module from stdin, write rendered docs to stdout.
fn stdin_mode(format: Format) -> Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;

    let module = bzldoc_core::Parser::parse_module(&source).map_err(|errors| {
        report_parse_errors("stdin", &source, &errors);
        anyhow::anyhow!("stdin did not parse")
    })?;

    let doc = DocExtractor::new().extract(&module);
    print!("{}", render(&doc, "stdin", format)?);
    Ok(())
}

/// file mode: document every input file, writing `<stem>.md` or `<stem>.json`
/// into the output directory. Files that fail to parse are reported and
/// skipped so one broken module does not block the rest.
fn file_mode(inputs: &[PathBuf], output: Option<&Path>, format: Format) -> Result<()> {
    let output_dir = output.context("--output is required when files are given")?;

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        anyhow::bail!("no .bzl files found");
    }

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let mut generated = 0_usize;
    for path in &files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let module = match bzldoc_core::Parser::parse_module(&source) {
            Ok(module) => module,
            Err(errors) => {
                report_parse_errors(&path.display().to_string(), &source, &errors);
                continue;
            }
        };

        let doc = DocExtractor::new().extract(&module);
        let module_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown");
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unknown");

        let content = render(&doc, module_name, format)?;
        let out_path = output_dir.join(format!("{}.{}", stem, format.extension()));
        fs::write(&out_path, &content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;

        println!("Generated: {}", out_path.display());
        generated += 1;
    }

    if generated == 0 {
        anyhow::bail!("no documentation was generated");
    }
    Ok(())
}

/// Resolve the positional inputs to a sorted list of .bzl files.
fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            collect_bzl_files(input, &mut files)?;
        } else {
            anyhow::bail!("path '{}' does not exist", input.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Collect all .bzl files under a directory.
fn collect_bzl_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            if path.extension().is_some_and(|ext| ext == "bzl") {
                files.push(path);
            }
        } else if path.is_dir() {
            // Skip hidden directories and Bazel output trees (bazel-bin, bazel-out, ...)
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                if !name.starts_with('.') && !name.starts_with("bazel-") {
                    collect_bzl_files(&path, files)?;
                }
            }
        }
    }
    Ok(())
}

/// Print each parse error as `file:line:col: message` on stderr.
fn report_parse_errors(name: &str, source: &str, errors: &[ParseError]) {
    let index = LineIndex::new(source);
    for error in errors {
        let location = index.location(error.span.start);
        eprintln!("{}:{}: {}", name, location, error.kind);
    }
}

fn render(doc: &FileDoc, module_name: &str, format: Format) -> Result<String> {
    match format {
        Format::Markdown => Ok(MarkdownGenerator::generate(doc, module_name)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(doc)
                .context("failed to serialize documentation")?;
            json.push('\n');
            Ok(json)
        }
    }
}
