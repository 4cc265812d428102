use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based line/column position. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceRange {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: SourcePosition::new(line, start_column),
            end: SourcePosition::new(line, end_column),
        }
    }

    /// Inclusive of the end column, so a cursor placed right after a token still hits it.
    pub fn touches(&self, position: SourcePosition) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Column span inside a single line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn on_line(&self, line: usize) -> SourceRange {
        SourceRange::on_line(line, self.start, self.end)
    }
}

/// Character column of a byte offset within `line`.
pub fn char_column(line: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(line.len());
    line.get(..clamped)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| line.char_indices().take_while(|(i, _)| *i < clamped).count())
}

/// Byte offset of a character column within `line`, clamped to the line length.
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgumentKind {
    Number,
    Work,
    Flag,
    SysFlag,
    String,
    Comparator,
    Unclassified,
}

impl ArgumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Work => "work",
            Self::Flag => "flag",
            Self::SysFlag => "sysflag",
            Self::String => "string",
            Self::Comparator => "comparator",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedArgument {
    pub text: String,
    pub kind: ArgumentKind,
    pub range: SourceRange,
}

impl ParsedArgument {
    /// Text with one pair of matching surrounding quotes removed.
    pub fn unquoted(&self) -> &str {
        strip_quotes(&self.text)
    }
}

pub fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommand {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub range: SourceRange,
    pub name_range: SourceRange,
    pub args: Vec<ParsedArgument>,
    pub terminated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDecl {
    pub name: String,
    pub line: usize,
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelReference {
    pub name: String,
    pub range: SourceRange,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub labels: BTreeMap<String, LabelDecl>,
    pub duplicate_labels: Vec<LabelDecl>,
    pub commands: Vec<ParsedCommand>,
    pub label_references: Vec<LabelReference>,
}

impl DocumentModel {
    pub fn label(&self, name: &str) -> Option<&LabelDecl> {
        self.labels.get(name)
    }

    pub fn command_at_line(&self, line: usize) -> Option<&ParsedCommand> {
        self.commands.iter().find(|command| command.line == line)
    }

    pub fn references_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a LabelReference> {
        self.label_references
            .iter()
            .filter(move |reference| reference.name == name)
    }
}
