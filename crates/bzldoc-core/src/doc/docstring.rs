//! Docstring text parsing
//!
//! Turns the free-form text of a docstring into a structured record:
//! a one-line summary, description paragraphs, and the per-argument
//! documentation from an `Args:` section. The text is normalized first
//! the way Python's `inspect.cleandoc` does it, so docstrings written
//! at any nesting depth parse the same.

/// A docstring broken into its documented parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocString {
    /// First paragraph collapsed to a single line
    pub summary: String,
    /// Paragraphs between the summary and the `Args:` section
    pub description: String,
    /// Argument documentation in order of appearance
    pub arg_docs: Vec<(String, String)>,
}

impl DocString {
    /// Parses a function docstring.
    ///
    /// The summary is the first paragraph with its lines trimmed and
    /// joined by single spaces. The description covers every paragraph
    /// up to an `Args:` heading, joined with blank lines and dedented
    /// per paragraph. Paragraphs after the argument block are dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return Self::default();
        }
        let lines: Vec<&str> = cleaned.split('\n').collect();
        let summary_end = lines
            .iter()
            .position(|line| line.trim().is_empty())
            .unwrap_or(lines.len());
        let summary = collapse(&lines[..summary_end]);
        let heading = find_args_heading(&lines, summary_end);
        let description_end = heading.unwrap_or(lines.len());
        let description = join_paragraphs(&lines[summary_end..description_end]);
        let mut arg_docs = Vec::new();
        if let Some(heading_index) = heading {
            let heading_indent = indent_of(lines[heading_index]);
            let mut block_end = lines.len();
            for (index, line) in lines.iter().enumerate().skip(heading_index + 1) {
                if !line.trim().is_empty() && indent_of(line) <= heading_indent {
                    block_end = index;
                    break;
                }
            }
            arg_docs = parse_args_block(&lines[heading_index + 1..block_end]);
        }
        Self {
            summary,
            description,
            arg_docs,
        }
    }

    /// Parses a module-level docstring.
    ///
    /// The first paragraph becomes the title and everything after the
    /// first blank line becomes the description. File docstrings have no
    /// argument section, so an `Args:` heading is ordinary text here.
    #[must_use]
    pub fn parse_file(raw: &str) -> Self {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return Self::default();
        }
        let lines: Vec<&str> = cleaned.split('\n').collect();
        let summary_end = lines
            .iter()
            .position(|line| line.trim().is_empty())
            .unwrap_or(lines.len());
        Self {
            summary: collapse(&lines[..summary_end]),
            description: join_paragraphs(&lines[summary_end..]),
            arg_docs: Vec::new(),
        }
    }

    /// Returns the summary and description joined by a blank line,
    /// skipping whichever parts are empty.
    #[must_use]
    pub fn documentation(&self) -> String {
        match (self.summary.is_empty(), self.description.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.summary.clone(),
            (true, false) => self.description.clone(),
            (false, false) => format!("{}\n\n{}", self.summary, self.description),
        }
    }

    /// Looks up the documentation for one argument.
    #[must_use]
    pub fn arg_doc(&self, name: &str) -> Option<&str> {
        self.arg_docs
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, doc)| doc.as_str())
    }
}

/// Normalizes docstring indentation following `inspect.cleandoc`: tabs
/// expand to multiples of eight, the first line loses its leading
/// whitespace, later lines lose the margin common to every non-blank
/// line among them, and blank lines are removed from both ends.
fn clean(raw: &str) -> String {
    let expanded = expand_tabs(raw);
    let lines: Vec<&str> = expanded.split('\n').collect();
    let mut margin = usize::MAX;
    for &line in lines.iter().skip(1) {
        let content = line.trim_start();
        if !content.is_empty() {
            let indent = line.chars().count() - content.chars().count();
            margin = margin.min(indent);
        }
    }
    let mut cleaned: Vec<&str> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start());
    }
    for &line in lines.iter().skip(1) {
        if margin == usize::MAX {
            cleaned.push(line);
        } else {
            cleaned.push(strip_margin(line, margin));
        }
    }
    while cleaned.last().is_some_and(|line| line.is_empty()) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|line| line.is_empty()).count();
    cleaned.drain(..leading);
    cleaned.join("\n")
}

fn expand_tabs(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut column = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let width = 8 - column % 8;
                for _ in 0..width {
                    expanded.push(' ');
                }
                column += width;
            }
            '\n' | '\r' => {
                expanded.push(c);
                column = 0;
            }
            _ => {
                expanded.push(c);
                column += 1;
            }
        }
    }
    expanded
}

/// Drops the first `margin` characters of a line, or the whole line if
/// it is shorter, mirroring Python's slice semantics.
fn strip_margin(line: &str, margin: usize) -> &str {
    match line.char_indices().nth(margin) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Collapses the lines of one paragraph into a single trimmed line.
fn collapse(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds the line starting the `Args:` section: an exact `Args:` line
/// sitting at the start of a paragraph.
fn find_args_heading(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&index| {
        lines[index].trim() == "Args:" && (index == 0 || lines[index - 1].trim().is_empty())
    })
}

/// Joins lines into blank-line-separated paragraphs. Each paragraph is
/// dedented by its own common indentation and its lines keep their
/// internal line breaks.
fn join_paragraphs(lines: &[&str]) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for &line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(dedent_paragraph(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(dedent_paragraph(&current));
    }
    paragraphs.join("\n\n")
}

fn dedent_paragraph(lines: &[&str]) -> String {
    let margin = lines.iter().map(|line| indent_of(line)).min().unwrap_or(0);
    lines
        .iter()
        .map(|line| strip_margin(line, margin).trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the lines of an `Args:` block into `(name, documentation)`
/// entries.
///
/// The indentation of the first entry fixes where entries may start:
/// a line at that depth or shallower matching `name: text` (with an
/// optional `*` or `**` prefix) opens a new entry, and anything deeper
/// continues the current one. Continuation lines join with a space, or
/// with a paragraph break when a blank line separates them. Text before
/// the first entry is dropped.
fn parse_args_block(lines: &[&str]) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut entry_indent: Option<usize> = None;
    let mut pending_break = false;
    for &line in lines {
        if line.trim().is_empty() {
            if current.is_some() {
                pending_break = true;
            }
            continue;
        }
        let indent = indent_of(line);
        let at_entry_depth = entry_indent.map_or(true, |fixed| indent <= fixed);
        if at_entry_depth {
            if let Some(entry) = split_entry(line) {
                if let Some(done) = current.take() {
                    flush(&mut entries, done);
                }
                entry_indent.get_or_insert(indent);
                current = Some(entry);
                pending_break = false;
                continue;
            }
        }
        if let Some((_, doc)) = current.as_mut() {
            let text = line.trim();
            if doc.is_empty() {
                doc.push_str(text);
            } else if pending_break {
                doc.push_str("\n\n");
                doc.push_str(text);
            } else {
                doc.push(' ');
                doc.push_str(text);
            }
        }
        pending_break = false;
    }
    if let Some(done) = current.take() {
        flush(&mut entries, done);
    }
    entries
}

/// Records a finished entry. A repeated name updates the earlier entry
/// in place, keeping its original position.
fn flush(entries: &mut Vec<(String, String)>, entry: (String, String)) {
    if let Some(existing) = entries.iter_mut().find(|(name, _)| *name == entry.0) {
        existing.1 = entry.1;
    } else {
        entries.push(entry);
    }
}

/// Splits an argument entry line into its name and leading text.
/// Accepts `name: text`, `*name: text`, and `**name: text`; the stars
/// are not part of the returned name.
fn split_entry(line: &str) -> Option<(String, String)> {
    let text = line.trim_start();
    let text = text
        .strip_prefix("**")
        .or_else(|| text.strip_prefix('*'))
        .unwrap_or(text);
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let mut name_end = first.len_utf8();
    for (offset, c) in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            name_end = offset + c.len_utf8();
        } else {
            break;
        }
    }
    let name = &text[..name_end];
    let rest = text[name_end..].trim_start_matches(' ');
    let rest = rest.strip_prefix(':')?;
    Some((name.to_string(), rest.trim().to_string()))
}
