use std::sync::OnceLock;

use ev_core::{byte_offset, char_column, ColumnSpan};
use ev_parser::opens_quote;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolToken {
    pub text: String,
    pub span: ColumnSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContext {
    pub command_name: String,
    pub arg_index: usize,
    /// Column of the call's open paren.
    pub open_paren_column: usize,
}

/// Token under `column`: sigil-prefixed symbol first, then an uppercase command
/// name, then any identifier. The end column counts as inside the token, but a
/// token starting at `column` wins over one ending there.
pub fn symbol_at(line_text: &str, column: usize) -> Option<SymbolToken> {
    [sigil_token_regex(), command_token_regex(), identifier_regex()]
        .into_iter()
        .find_map(|regex| token_at(regex, line_text, column))
}

fn token_at(regex: &Regex, line_text: &str, column: usize) -> Option<SymbolToken> {
    let touching = regex
        .find_iter(line_text)
        .map(|found| SymbolToken {
            text: found.as_str().to_string(),
            span: ColumnSpan::new(
                char_column(line_text, found.start()),
                char_column(line_text, found.end()),
            ),
        })
        .skip_while(|token| token.span.end < column)
        .take_while(|token| token.span.start <= column)
        .collect::<Vec<_>>();

    let starting = touching
        .iter()
        .position(|token| token.span.start == column)
        .unwrap_or(0);
    touching.into_iter().nth(starting)
}

/// Innermost `COMMAND(` left open before the cursor, with the number of top-level
/// commas between its paren and the cursor. Bare parens nested inside the call are
/// skipped over; a quote only hides commas and parens when it is closed somewhere
/// on the line.
pub fn active_call_context(line_text: &str, cursor_column: usize) -> Option<CallContext> {
    let prefix = &line_text[..byte_offset(line_text, cursor_column)];

    // (open paren byte offset, commas seen at that depth)
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut quote: Option<char> = None;
    for (offset, ch) in prefix.char_indices() {
        if let Some(active) = quote {
            if ch == active {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if opens_quote(line_text, offset, ch) => quote = Some(ch),
            '(' => open.push((offset, 0)),
            ')' => {
                open.pop();
            }
            ',' => {
                if let Some((_, commas)) = open.last_mut() {
                    *commas += 1;
                }
            }
            _ => {}
        }
    }

    open.iter().rev().find_map(|(paren, commas)| {
        let name = call_name_regex().captures(&prefix[..*paren])?.get(1)?;
        Some(CallContext {
            command_name: name.as_str().to_string(),
            arg_index: *commas,
            open_paren_column: char_column(prefix, *paren),
        })
    })
}

fn sigil_token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[@#$][A-Za-z0-9_]+").expect("sigil regex must compile"))
}

fn command_token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b[A-Z_][A-Z0-9_]*\b").expect("command token regex must compile")
    })
}

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier regex must compile")
    })
}

fn call_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b([A-Z_][A-Z0-9_]*)\s*$").expect("call name regex must compile")
    })
}
