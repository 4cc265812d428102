//! Host-independent editor helpers built on the document model and query surface.
//!
//! Results are plain data; translating them into a particular editor protocol is
//! left to the host.

use std::sync::OnceLock;

use ev_core::{
    byte_offset, ArgType, ArgumentKind, CommandDefinition, DocumentModel, LabelDecl,
    SchemaRegistry, SourcePosition, SourceRange, SymbolEntry, SymbolKind,
};
use ev_parser::{is_comparator_command, COMPARATORS, COMPARATOR_ARGUMENT_INDEX};
use regex::Regex;
use serde::Serialize;

use crate::query::{active_call_context, symbol_at};

/// Result of a hover request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    /// Markdown body.
    pub contents: String,
    pub range: SourceRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionKind {
    Command,
    Work,
    Flag,
    SysFlag,
    Label,
    Comparator,
}

impl From<SymbolKind> for CompletionKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Work => Self::Work,
            SymbolKind::Flag => Self::Flag,
            SymbolKind::SysFlag => Self::SysFlag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    /// Text to insert when it differs from `label`.
    pub insert_text: Option<String>,
}

impl CompletionItem {
    fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub label: String,
    pub documentation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureHelp {
    pub signature: String,
    pub documentation: String,
    pub parameters: Vec<ParameterInfo>,
    /// `None` when the cursor sits past the last declared slot.
    pub active_parameter: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutlineKind {
    Label,
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineItem {
    pub name: String,
    pub kind: OutlineKind,
    pub range: SourceRange,
    pub children: Vec<OutlineItem>,
}

pub fn hover(
    model: &DocumentModel,
    schema: &SchemaRegistry,
    line: usize,
    line_text: &str,
    column: usize,
) -> Option<HoverInfo> {
    if let Some(info) = numeric_symbol_hover(model, schema, line, column) {
        return Some(info);
    }

    let token = symbol_at(line_text, column)?;
    let range = token.span.on_line(line);
    let text = token.text.as_str();

    let contents = if let Some(kind) = text.chars().next().and_then(SymbolKind::from_sigil) {
        match schema.resolve_symbol(kind, text) {
            Some(entry) => symbol_markdown(kind, entry),
            None => format!("**{}**\n\nNot defined in the {} table.", text, kind.table_name()),
        }
    } else if let Some(definition) = schema.command(text) {
        command_markdown(definition)
    } else if let Some(label) = model.label(text) {
        format!("**label** `{}`\n\nDeclared on line {}.", label.name, label.line + 1)
    } else if let Some(meaning) = comparator_meaning(text) {
        format!("**{}**\n\n{}", text, meaning)
    } else {
        return None;
    };

    Some(HoverInfo { contents, range })
}

/// Bare numbers in a work/flag/sysflag slot resolve through the table's id index.
fn numeric_symbol_hover(
    model: &DocumentModel,
    schema: &SchemaRegistry,
    line: usize,
    column: usize,
) -> Option<HoverInfo> {
    let command = model.command_at_line(line)?;
    let position = SourcePosition::new(line, column);
    let (index, arg) = command
        .args
        .iter()
        .enumerate()
        .find(|(_, arg)| arg.kind == ArgumentKind::Number && arg.range.touches(position))?;
    let slot = schema.command(&command.name)?.args.get(index)?;

    slot.r#type.iter().find_map(|ty| {
        let kind = ty.symbol_kind()?;
        let entry = schema.resolve_symbol(kind, &arg.text)?;
        Some(HoverInfo {
            contents: symbol_markdown(kind, entry),
            range: arg.range,
        })
    })
}

fn symbol_markdown(kind: SymbolKind, entry: &SymbolEntry) -> String {
    let mut out = format!(
        "**{}{}** ({} {})",
        kind.sigil(),
        entry.name,
        kind.table_name(),
        entry.id
    );
    if !entry.description.is_empty() {
        out.push_str("\n\n");
        out.push_str(&entry.description);
    }
    out
}

fn command_markdown(definition: &CommandDefinition) -> String {
    let mut out = format!("```\n{}\n```", definition.signature());
    if !definition.description.is_empty() {
        out.push_str("\n\n");
        out.push_str(&definition.description);
    }
    if !definition.args.is_empty() {
        out.push('\n');
        for slot in &definition.args {
            out.push_str(&format!("\n- `{}`", slot.tentative_name));
            if !slot.r#type.is_empty() {
                out.push_str(&format!(" ({})", slot.type_list()));
            }
            if slot.optional {
                out.push_str(" optional");
            }
            if !slot.description.is_empty() {
                out.push_str(&format!(": {}", slot.description));
            }
        }
    }
    out
}

fn comparator_meaning(text: &str) -> Option<&'static str> {
    match text {
        "EQ" => Some("equal to"),
        "NE" => Some("not equal to"),
        "LT" => Some("less than"),
        "LE" => Some("less than or equal to"),
        "GT" => Some("greater than"),
        "GE" => Some("greater than or equal to"),
        _ => None,
    }
}

pub fn completions(
    model: &DocumentModel,
    schema: &SchemaRegistry,
    line_text: &str,
    column: usize,
) -> Vec<CompletionItem> {
    let prefix = &line_text[..byte_offset(line_text, column)];
    let word = typed_word_regex()
        .find(prefix)
        .map(|found| found.as_str().trim_start_matches(['"', '\'']))
        .unwrap_or("");

    if let Some(kind) = word.chars().next().and_then(SymbolKind::from_sigil) {
        return symbol_completions(schema, kind, &word[1..]);
    }

    if let Some(context) = active_call_context(line_text, column) {
        return argument_completions(model, schema, &context.command_name, context.arg_index, word);
    }

    schema
        .commands()
        .definitions()
        .filter(|definition| !definition.dummy && starts_with_ignore_case(&definition.name, word))
        .map(|definition| CompletionItem {
            detail: Some(definition.signature()),
            documentation: non_empty(&definition.description),
            insert_text: Some(format!("{}(", definition.name)),
            ..CompletionItem::new(definition.name.clone(), CompletionKind::Command)
        })
        .collect()
}

fn argument_completions(
    model: &DocumentModel,
    schema: &SchemaRegistry,
    command_name: &str,
    arg_index: usize,
    word: &str,
) -> Vec<CompletionItem> {
    let mut items = Vec::new();

    if is_comparator_command(command_name) && arg_index == COMPARATOR_ARGUMENT_INDEX {
        items.extend(
            COMPARATORS
                .iter()
                .filter(|comparator| starts_with_ignore_case(comparator, word))
                .map(|comparator| CompletionItem {
                    detail: comparator_meaning(comparator).map(str::to_string),
                    ..CompletionItem::new(*comparator, CompletionKind::Comparator)
                }),
        );
    }

    let Some(slot) = schema
        .command(command_name)
        .and_then(|definition| definition.args.get(arg_index))
    else {
        return items;
    };

    for ty in &slot.r#type {
        match ty {
            ArgType::Label => items.extend(label_completions(model, word)),
            other => {
                if let Some(kind) = other.symbol_kind() {
                    items.extend(symbol_completions(schema, kind, word));
                }
            }
        }
    }
    items
}

fn symbol_completions(schema: &SchemaRegistry, kind: SymbolKind, word: &str) -> Vec<CompletionItem> {
    schema
        .table(kind)
        .entries()
        .filter(|entry| starts_with_ignore_case(&entry.name, word))
        .map(|entry| CompletionItem {
            detail: Some(format!("{} {}", kind.table_name(), entry.id)),
            documentation: non_empty(&entry.description),
            insert_text: Some(format!("{}{}", kind.sigil(), entry.name)),
            ..CompletionItem::new(entry.name.clone(), kind.into())
        })
        .collect()
}

fn label_completions(model: &DocumentModel, word: &str) -> Vec<CompletionItem> {
    let mut labels = model.labels.values().collect::<Vec<_>>();
    labels.sort_by_key(|label| label.line);
    labels
        .into_iter()
        .filter(|label| starts_with_ignore_case(&label.name, word))
        .map(|label| CompletionItem {
            detail: Some(format!("line {}", label.line + 1)),
            insert_text: Some(format!("\"{}\"", label.name)),
            ..CompletionItem::new(label.name.clone(), CompletionKind::Label)
        })
        .collect()
}

pub fn signature_help(
    schema: &SchemaRegistry,
    line_text: &str,
    column: usize,
) -> Option<SignatureHelp> {
    let context = active_call_context(line_text, column)?;
    let definition = schema.command(&context.command_name)?;

    let parameters = definition
        .args
        .iter()
        .map(|slot| ParameterInfo {
            label: slot.tentative_name.clone(),
            documentation: if slot.r#type.is_empty() {
                slot.description.clone()
            } else {
                format!("{} {}", slot.type_list(), slot.description)
                    .trim_end()
                    .to_string()
            },
        })
        .collect::<Vec<_>>();
    let active_parameter = (context.arg_index < parameters.len()).then_some(context.arg_index);

    Some(SignatureHelp {
        signature: definition.signature(),
        documentation: definition.description.clone(),
        parameters,
        active_parameter,
    })
}

/// Label declaration for a label name under the cursor, whether written as a
/// jump target or as the declaration itself.
pub fn goto_definition<'a>(
    model: &'a DocumentModel,
    line: usize,
    line_text: &str,
    column: usize,
) -> Option<&'a LabelDecl> {
    let position = SourcePosition::new(line, column);
    if let Some(reference) = model
        .label_references
        .iter()
        .find(|reference| reference.range.touches(position))
    {
        return model.label(&reference.name);
    }

    let token = symbol_at(line_text, column)?;
    model.label(&token.text)
}

pub fn find_references(
    model: &DocumentModel,
    name: &str,
    include_declaration: bool,
) -> Vec<SourceRange> {
    let mut ranges = Vec::new();
    if include_declaration {
        if let Some(label) = model.label(name) {
            ranges.push(label.range);
        }
    }
    ranges.extend(model.references_to(name).map(|reference| reference.range));
    ranges
}

/// Labels in line order, each holding the commands up to the next label.
/// Commands above the first label are returned at the top level.
pub fn document_outline(model: &DocumentModel) -> Vec<OutlineItem> {
    let mut labels = model
        .labels
        .values()
        .chain(&model.duplicate_labels)
        .collect::<Vec<_>>();
    labels.sort_by_key(|label| label.range.start);

    let mut top_level = Vec::new();
    let mut sections = labels
        .into_iter()
        .map(|label| OutlineItem {
            name: label.name.clone(),
            kind: OutlineKind::Label,
            range: label.range,
            children: Vec::new(),
        })
        .collect::<Vec<_>>();

    for command in &model.commands {
        let item = OutlineItem {
            name: command.name.clone(),
            kind: OutlineKind::Command,
            range: command.range,
            children: Vec::new(),
        };
        match sections
            .iter_mut()
            .rev()
            .find(|section| section.range.start.line <= command.line)
        {
            Some(section) => section.children.push(item),
            None => top_level.push(item),
        }
    }

    top_level.extend(sections);
    top_level
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    candidate
        .to_ascii_lowercase()
        .starts_with(&prefix.to_ascii_lowercase())
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn typed_word_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"["']?[@#$]?[A-Za-z0-9_]*$"#).expect("typed word regex must compile")
    })
}
