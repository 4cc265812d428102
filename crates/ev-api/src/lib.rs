//! Public entry points for hosts: schema loading plus the four pure analysis calls.

mod schema_loader;

pub use schema_loader::{
    load_schema, load_schema_from_sources, parse_command_table, parse_symbol_table, SchemaPaths,
    SchemaSources, COMMANDS_FILE, FLAGS_FILE, SYS_FLAGS_FILE, WORKS_FILE,
};

pub use ev_analysis::{
    active_call_context, completions, document_outline, find_references, goto_definition, hover,
    signature_help, symbol_at, validate, validate_document, CallContext, CompletionItem,
    CompletionKind, HoverInfo, OutlineItem, OutlineKind, ParameterInfo, SignatureHelp,
    SymbolToken,
};
pub use ev_core::{
    Diagnostic, DocumentModel, EvScriptError, SchemaRegistry, Severity, SourcePosition,
    SourceRange,
};
pub use ev_parser::analyze;

/// Structural model and diagnostics for one document, from a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub model: DocumentModel,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

pub fn check_document(text: &str, schema: &SchemaRegistry) -> DocumentReport {
    let model = analyze(text);
    let diagnostics = validate_document(&model, schema);
    DocumentReport { model, diagnostics }
}
