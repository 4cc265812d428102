use std::fmt::Display;
use std::path::Path;

use ev_core::EvScriptError;

pub(crate) const CLI_SOURCE_PATH: &str = "CLI_SOURCE_PATH";
pub(crate) const CLI_SOURCE_SCAN: &str = "CLI_SOURCE_SCAN";
pub(crate) const CLI_SOURCE_READ: &str = "CLI_SOURCE_READ";
pub(crate) const CLI_JSON_OUTPUT: &str = "CLI_JSON_OUTPUT";

/// Tags a foreign failure with a CLI error code.
pub(crate) trait CliResultExt<T> {
    fn cli_code(self, code: &'static str) -> Result<T, EvScriptError>;

    /// Same as `cli_code`, with the offending path prefixed to the message.
    fn cli_code_for(self, code: &'static str, path: &Path) -> Result<T, EvScriptError>;
}

impl<T, E: Display> CliResultExt<T> for Result<T, E> {
    fn cli_code(self, code: &'static str) -> Result<T, EvScriptError> {
        self.map_err(|error| EvScriptError::new(code, error.to_string()))
    }

    fn cli_code_for(self, code: &'static str, path: &Path) -> Result<T, EvScriptError> {
        self.map_err(|error| EvScriptError::new(code, format!("{}: {}", path.display(), error)))
    }
}

/// The `RESULT:ERROR` block; the message is a JSON string so it stays on one line.
pub(crate) fn error_lines(error: &EvScriptError) -> Vec<String> {
    vec![
        "RESULT:ERROR".to_string(),
        format!("ERROR_CODE:{}", error.code),
        format!(
            "ERROR_MSG_JSON:{}",
            serde_json::Value::from(error.message.as_str())
        ),
    ]
}

pub(crate) fn emit_error(error: EvScriptError) -> i32 {
    for line in error_lines(&error) {
        println!("{}", line);
    }
    1
}
