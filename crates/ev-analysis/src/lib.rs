mod ide;
mod query;
mod validate;

pub use ide::{
    completions, document_outline, find_references, goto_definition, hover, signature_help,
    CompletionItem, CompletionKind, HoverInfo, OutlineItem, OutlineKind, ParameterInfo,
    SignatureHelp,
};
pub use query::{active_call_context, symbol_at, CallContext, SymbolToken};
pub use validate::{validate, validate_document};

#[cfg(test)]
mod analysis_test_support;
