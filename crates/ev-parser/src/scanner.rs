use std::sync::OnceLock;

use ev_core::{char_column, ColumnSpan};
use regex::Regex;

use crate::arguments::opens_quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Comment,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLabel {
    pub name: String,
    /// Covers `name:` including the colon.
    pub span: ColumnSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCommand<'a> {
    pub name: String,
    pub name_span: ColumnSpan,
    /// From the name start to the close paren inclusive, or end of line when unterminated.
    pub span: ColumnSpan,
    pub args_text: &'a str,
    pub args_column: usize,
    pub terminated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    pub class: LineClass,
    pub label: Option<ScannedLabel>,
    pub command: Option<ScannedCommand<'a>>,
}

impl ScannedLine<'_> {
    fn non_code(class: LineClass) -> Self {
        Self {
            class,
            label: None,
            command: None,
        }
    }
}

pub fn scan_line(line: &str) -> ScannedLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ScannedLine::non_code(LineClass::Blank);
    }
    if trimmed.starts_with(';') || trimmed.starts_with("//") {
        return ScannedLine::non_code(LineClass::Comment);
    }

    ScannedLine {
        class: LineClass::Code,
        label: scan_label(line),
        command: scan_command(line),
    }
}

fn scan_label(line: &str) -> Option<ScannedLabel> {
    let caps = label_regex().captures(line)?;
    let name = caps.get(1)?;
    Some(ScannedLabel {
        name: name.as_str().to_string(),
        span: ColumnSpan::new(
            char_column(line, name.start()),
            char_column(line, name.end() + 1),
        ),
    })
}

fn scan_command(line: &str) -> Option<ScannedCommand<'_>> {
    let caps = command_regex().captures(line)?;
    let whole = caps.get(0)?;
    let name = caps.get(1)?;
    let open = whole.end() - 1;
    let args_start = whole.end();

    let (args_end, span_end, terminated) = match find_matching_paren(line, open) {
        Some(close) => (close, close + 1, true),
        None => (line.len(), line.len(), false),
    };

    Some(ScannedCommand {
        name: name.as_str().to_string(),
        name_span: ColumnSpan::new(
            char_column(line, name.start()),
            char_column(line, name.end()),
        ),
        span: ColumnSpan::new(char_column(line, name.start()), char_column(line, span_end)),
        args_text: &line[args_start..args_end],
        args_column: char_column(line, args_start),
        terminated,
    })
}

/// Byte offset of the `)` matching the `(` at `open`. Parens inside a closed quote
/// pair do not count.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let rest = text.get(open..)?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (offset, ch) in rest.char_indices() {
        if let Some(active) = quote {
            if ch == active {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if opens_quote(rest, offset, ch) => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn label_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*):").expect("label regex must compile")
    })
}

/// Whole-token uppercase identifier followed by an open paren.
pub fn command_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b([A-Z_][A-Z0-9_]*)\s*\(").expect("command regex must compile")
    })
}
