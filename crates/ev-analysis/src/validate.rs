use ev_core::{
    strip_quotes, ArgumentKind, CommandDefinition, Diagnostic, DocumentModel, ParsedCommand,
    SchemaRegistry, DIAG_ARG_TYPE_MISMATCH, DIAG_ARITY_TOO_FEW, DIAG_ARITY_TOO_MANY,
    DIAG_DUPLICATE_LABEL, DIAG_INVALID_COMPARATOR, DIAG_UNDEFINED_LABEL, DIAG_UNKNOWN_COMMAND,
};
use ev_parser::{
    analyze, is_comparator_command, label_argument_index, COMPARATORS, COMPARATOR_ARGUMENT_INDEX,
};

/// Parses `text` and checks it against `schema`.
pub fn validate(text: &str, schema: &SchemaRegistry) -> Vec<Diagnostic> {
    validate_document(&analyze(text), schema)
}

/// Diagnostics come back ordered by start position; same-position entries keep
/// check order (arity, types, label, comparator).
pub fn validate_document(model: &DocumentModel, schema: &SchemaRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for duplicate in &model.duplicate_labels {
        let first_line = model
            .label(&duplicate.name)
            .map(|decl| decl.line + 1)
            .unwrap_or(duplicate.line + 1);
        diagnostics.push(Diagnostic::warning(
            DIAG_DUPLICATE_LABEL,
            format!(
                "Duplicate label: {} (first declared on line {})",
                duplicate.name, first_line
            ),
            duplicate.range,
        ));
    }

    for command in &model.commands {
        validate_command(command, model, schema, &mut diagnostics);
    }

    diagnostics.sort_by_key(|diagnostic| diagnostic.range.start);
    diagnostics
}

fn validate_command(
    command: &ParsedCommand,
    model: &DocumentModel,
    schema: &SchemaRegistry,
    out: &mut Vec<Diagnostic>,
) {
    let Some(definition) = schema.command(&command.name) else {
        out.push(Diagnostic::error(
            DIAG_UNKNOWN_COMMAND,
            format!("Unknown command: {}", command.name),
            command.range,
        ));
        return;
    };

    check_arity(command, definition, out);
    check_argument_types(command, definition, out);
    check_label_reference(command, model, out);
    check_comparator(command, out);
}

fn check_arity(command: &ParsedCommand, definition: &CommandDefinition, out: &mut Vec<Diagnostic>) {
    let actual = command.args.len();
    let required = definition.required_count();
    let max = definition.max_count();

    if actual < required {
        out.push(Diagnostic::error(
            DIAG_ARITY_TOO_FEW,
            format!(
                "{} requires at least {} argument(s), got {}",
                command.name, required, actual
            ),
            command.range,
        ));
    }
    if actual > max {
        out.push(Diagnostic::warning(
            DIAG_ARITY_TOO_MANY,
            format!(
                "{} accepts at most {} argument(s), got {}",
                command.name, max, actual
            ),
            command.range,
        ));
    }
}

fn check_argument_types(
    command: &ParsedCommand,
    definition: &CommandDefinition,
    out: &mut Vec<Diagnostic>,
) {
    for (index, (arg, slot)) in command.args.iter().zip(&definition.args).enumerate() {
        if slot.accepts(arg.kind) {
            continue;
        }
        out.push(Diagnostic::warning(
            DIAG_ARG_TYPE_MISMATCH,
            format!(
                "Argument {} ({}) of {} expects {}, got {}",
                index + 1,
                slot.tentative_name,
                command.name,
                slot.type_list(),
                arg.kind
            ),
            arg.range,
        ));
    }
}

fn check_label_reference(command: &ParsedCommand, model: &DocumentModel, out: &mut Vec<Diagnostic>) {
    let Some(arg) = label_argument_index(&command.name).and_then(|index| command.args.get(index))
    else {
        return;
    };
    if arg.kind != ArgumentKind::String {
        return;
    }

    let name = arg.unquoted();
    if model.label(name).is_none() {
        out.push(Diagnostic::error(
            DIAG_UNDEFINED_LABEL,
            format!("Undefined label: {}", name),
            arg.range,
        ));
    }
}

fn check_comparator(command: &ParsedCommand, out: &mut Vec<Diagnostic>) {
    if !is_comparator_command(&command.name) {
        return;
    }
    let Some(arg) = command.args.get(COMPARATOR_ARGUMENT_INDEX) else {
        return;
    };

    let value = strip_quotes(&arg.text);
    if !COMPARATORS.contains(&value) {
        out.push(Diagnostic::error(
            DIAG_INVALID_COMPARATOR,
            format!(
                "Invalid comparator: {} (expected one of {})",
                value,
                COMPARATORS.join(", ")
            ),
            arg.range,
        ));
    }
}
