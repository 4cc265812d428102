use std::sync::OnceLock;

use ev_core::{char_column, ArgumentKind, ParsedArgument, SourceRange};
use regex::Regex;

pub const COMPARATORS: [&str; 6] = ["GE", "GT", "LE", "LT", "EQ", "NE"];

/// Whether the quote character at byte `offset` starts a quoted run, i.e. the same
/// character appears again later in `text`. A stray quote such as the apostrophe in
/// `it's` is plain text.
pub fn opens_quote(text: &str, offset: usize, quote: char) -> bool {
    text.get(offset + quote.len_utf8()..)
        .is_some_and(|rest| rest.contains(quote))
}

/// Byte offsets of commas that sit outside quotes and nested parens.
pub fn top_level_comma_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (offset, ch) in text.char_indices() {
        if let Some(active) = quote {
            if ch == active {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if opens_quote(text, offset, ch) => quote = Some(ch),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => offsets.push(offset),
            _ => {}
        }
    }
    offsets
}

/// Splits the text between a command's parens into classified arguments.
///
/// `base_column` is the character column of `text`'s first character on `line`.
/// Each argument's range starts at its first non-blank character and ends at the
/// following separator (or the end of `text`).
pub fn split_arguments(text: &str, line: usize, base_column: usize) -> Vec<ParsedArgument> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut bounds = Vec::new();
    let mut start = 0;
    for comma in top_level_comma_offsets(text) {
        bounds.push((start, comma));
        start = comma + 1;
    }
    bounds.push((start, text.len()));

    bounds
        .into_iter()
        .map(|(start, end)| {
            let raw = &text[start..end];
            let leading = raw.len() - raw.trim_start().len();
            let token = raw.trim();
            ParsedArgument {
                text: token.to_string(),
                kind: classify_argument(token),
                range: SourceRange::on_line(
                    line,
                    base_column + char_column(text, start + leading),
                    base_column + char_column(text, end),
                ),
            }
        })
        .collect()
}

pub fn classify_argument(token: &str) -> ArgumentKind {
    let token = token.trim();
    if token.starts_with('@') {
        ArgumentKind::Work
    } else if token.starts_with('#') {
        ArgumentKind::Flag
    } else if token.starts_with('$') {
        ArgumentKind::SysFlag
    } else if token.starts_with('"') || token.starts_with('\'') {
        ArgumentKind::String
    } else if number_regex().is_match(token) {
        ArgumentKind::Number
    } else if COMPARATORS.contains(&token) {
        ArgumentKind::Comparator
    } else {
        ArgumentKind::Unclassified
    }
}

fn number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").expect("number regex must compile")
    })
}
