use crate::types::SourceRange;
use thiserror::Error;

/// Operational failure (I/O, malformed schema, bad CLI input). Script problems are
/// reported as `Diagnostic`s instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}{}: {}", .code, location_suffix(.span), .message)]
pub struct EvScriptError {
    pub code: String,
    pub message: String,
    pub span: Option<SourceRange>,
}

impl EvScriptError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    /// Pins the error to a range of its input.
    pub fn at(self, span: SourceRange) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }
}

/// ` at L:C`, one-based, when a span is present.
fn location_suffix(span: &Option<SourceRange>) -> String {
    span.map(|span| format!(" at {}:{}", span.start.line + 1, span.start.column + 1))
        .unwrap_or_default()
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn display_without_span_is_code_and_message() {
        let error = EvScriptError::new("SCHEMA_READ", "missing file");
        assert_eq!(error.to_string(), "SCHEMA_READ: missing file");
        assert!(error.span.is_none());
    }

    #[test]
    fn at_records_span_and_shows_one_based_location() {
        let range = SourceRange::on_line(2, 4, 9);
        let error = EvScriptError::new("SCHEMA_PARSE", "expected array").at(range);
        assert_eq!(error.span, Some(range));
        assert_eq!(error.to_string(), "SCHEMA_PARSE at 3:5: expected array");
    }
}
