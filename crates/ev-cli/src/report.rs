use ev_api::{Diagnostic, DocumentReport, OutlineItem, OutlineKind};
use ev_core::EvScriptError;
use serde::Serialize;

use crate::{CliResultExt, CLI_JSON_OUTPUT};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileReport {
    pub(crate) path: String,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckSummary {
    pub(crate) files: Vec<FileReport>,
    pub(crate) errors: usize,
    pub(crate) warnings: usize,
}

impl CheckSummary {
    pub(crate) fn new() -> Self {
        Self {
            files: Vec::new(),
            errors: 0,
            warnings: 0,
        }
    }

    pub(crate) fn push(&mut self, path: &str, report: DocumentReport) {
        self.errors += report.error_count();
        self.warnings += report.warning_count();
        self.files.push(FileReport {
            path: path.to_string(),
            diagnostics: report.diagnostics,
        });
    }

    pub(crate) fn exit_code(&self) -> i32 {
        i32::from(self.errors > 0)
    }

    pub(crate) fn result_line(&self) -> String {
        if self.errors == 0 && self.warnings == 0 {
            "RESULT:OK".to_string()
        } else {
            format!(
                "RESULT:DIAGNOSTICS errors={} warnings={}",
                self.errors, self.warnings
            )
        }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = self
            .files
            .iter()
            .flat_map(|file| {
                file.diagnostics
                    .iter()
                    .map(|diagnostic| format_diagnostic(&file.path, diagnostic))
            })
            .collect::<Vec<_>>();
        lines.push(self.result_line());
        lines
    }
}

/// `path:line:col: severity[CODE]: message`, one-based.
pub(crate) fn format_diagnostic(path: &str, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}: {}[{}]: {}",
        path,
        diagnostic.range.start.line + 1,
        diagnostic.range.start.column + 1,
        diagnostic.severity,
        diagnostic.code,
        diagnostic.message
    )
}

/// `KEY:<compact json>` stdout line.
pub(crate) fn json_line(key: &str, value: &impl Serialize) -> Result<String, EvScriptError> {
    let json = serde_json::to_string(value).cli_code(CLI_JSON_OUTPUT)?;
    Ok(format!("{}:{}", key, json))
}

pub(crate) fn outline_lines(items: &[OutlineItem]) -> Vec<String> {
    let mut lines = Vec::new();
    push_outline(items, 0, &mut lines);
    lines
}

fn push_outline(items: &[OutlineItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        let kind = match item.kind {
            OutlineKind::Label => "label",
            OutlineKind::Command => "command",
        };
        lines.push(format!(
            "{}{} {} {}:{}",
            "  ".repeat(depth),
            kind,
            item.name,
            item.range.start.line + 1,
            item.range.start.column + 1
        ));
        push_outline(&item.children, depth + 1, lines);
    }
}
