use std::collections::btree_map::Entry;

use ev_core::{ArgumentKind, DocumentModel, LabelDecl, LabelReference, ParsedCommand};

use crate::arguments::split_arguments;
use crate::scanner::scan_line;

/// Argument slot carrying the target label for each jump/call command.
pub const LABEL_ARGUMENT_INDEX: [(&str, usize); 9] = [
    ("_JUMP", 0),
    ("_CALL", 0),
    ("_IF_FLAGON_JUMP", 1),
    ("_IF_FLAGOFF_JUMP", 1),
    ("_IF_FLAGON_CALL", 1),
    ("_IF_FLAGOFF_CALL", 1),
    ("_IFVAL_JUMP", 3),
    ("_IFVAL_CALL", 3),
    ("_OBJ_ANIME", 1),
];

pub const COMPARATOR_ARGUMENT_INDEX: usize = 1;

pub fn label_argument_index(command: &str) -> Option<usize> {
    LABEL_ARGUMENT_INDEX
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, index)| *index)
}

pub fn is_comparator_command(command: &str) -> bool {
    matches!(command, "_IFVAL_JUMP" | "_IFVAL_CALL")
}

/// Builds the structural model of a whole document in one pass.
///
/// The first declaration of a label name owns it; later declarations with the same
/// name land in `duplicate_labels`.
pub fn analyze(text: &str) -> DocumentModel {
    let mut model = DocumentModel::default();

    for (line_no, line) in text.lines().enumerate() {
        let scanned = scan_line(line);

        if let Some(label) = scanned.label {
            let decl = LabelDecl {
                name: label.name,
                line: line_no,
                range: label.span.on_line(line_no),
            };
            match model.labels.entry(decl.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(decl);
                }
                Entry::Occupied(_) => model.duplicate_labels.push(decl),
            }
        }

        let Some(command) = scanned.command else {
            continue;
        };

        let args = split_arguments(command.args_text, line_no, command.args_column);

        if let Some(index) = label_argument_index(&command.name) {
            if let Some(arg) = args.get(index) {
                if arg.kind == ArgumentKind::String {
                    model.label_references.push(LabelReference {
                        name: arg.unquoted().to_string(),
                        range: arg.range,
                        line: line_no,
                    });
                }
            }
        }

        model.commands.push(ParsedCommand {
            name: command.name,
            line: line_no,
            column: command.name_span.start,
            range: command.span.on_line(line_no),
            name_range: command.name_span.on_line(line_no),
            args,
            terminated: command.terminated,
        });
    }

    model
}
