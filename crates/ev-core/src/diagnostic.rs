use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::SourceRange;

pub const DIAG_UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
pub const DIAG_ARITY_TOO_FEW: &str = "ARITY_TOO_FEW";
pub const DIAG_ARITY_TOO_MANY: &str = "ARITY_TOO_MANY";
pub const DIAG_ARG_TYPE_MISMATCH: &str = "ARG_TYPE_MISMATCH";
pub const DIAG_UNDEFINED_LABEL: &str = "UNDEFINED_LABEL";
pub const DIAG_INVALID_COMPARATOR: &str = "INVALID_COMPARATOR";
pub const DIAG_DUPLICATE_LABEL: &str = "DUPLICATE_LABEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub range: SourceRange,
    pub message: String,
    pub severity: Severity,
    pub code: String,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>, range: SourceRange) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Error,
            code: code.into(),
        }
    }

    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        range: SourceRange,
    ) -> Self {
        Self {
            range,
            message: message.into(),
            severity: Severity::Warning,
            code: code.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod diagnostic_tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        let range = SourceRange::on_line(0, 0, 3);
        assert!(Diagnostic::error(DIAG_UNKNOWN_COMMAND, "x", range).is_error());
        assert!(!Diagnostic::warning(DIAG_ARITY_TOO_MANY, "x", range).is_error());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).expect("severity json");
        assert_eq!(json, "\"warning\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
