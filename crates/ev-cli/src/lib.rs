use std::ffi::OsString;

use clap::Parser;
use ev_api::{
    active_call_context, analyze, check_document, document_outline, goto_definition, hover,
    load_schema, symbol_at, SchemaPaths, SchemaRegistry,
};
use ev_core::EvScriptError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli_args;
mod error_map;
mod report;
mod source_loader;

pub(crate) use cli_args::{CheckArgs, Cli, Mode, OutlineArgs, QueryArgs};
pub(crate) use error_map::{
    emit_error, CliResultExt, CLI_JSON_OUTPUT, CLI_SOURCE_PATH, CLI_SOURCE_READ, CLI_SOURCE_SCAN,
};
pub(crate) use report::{json_line, outline_lines, CheckSummary};
pub(crate) use source_loader::{collect_scripts, read_script_file, resolve_schema_dir};

/// Overrides the default `warn` log filter, e.g. `EVSCRIPT_LOG=debug`.
pub const LOG_ENV: &str = "EVSCRIPT_LOG";

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when running in-process (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, EvScriptError> {
    match cli.command {
        Mode::Check(args) => run_check(args),
        Mode::Outline(args) => run_outline(args),
        Mode::Query(args) => run_query(args),
    }
}

fn load_schema_dir(schema_dir: &str) -> Result<SchemaRegistry, EvScriptError> {
    let dir = resolve_schema_dir(schema_dir)?;
    debug!(dir = %dir.display(), "loading schema");
    Ok(load_schema(&SchemaPaths::in_dir(dir)))
}

fn run_check(args: CheckArgs) -> Result<i32, EvScriptError> {
    let schema = load_schema_dir(&args.schema_dir)?;
    let scripts = collect_scripts(args.scripts_dir.as_deref(), &args.files, &args.ext)?;

    let mut summary = CheckSummary::new();
    for (path, text) in &scripts {
        debug!(path = %path, "checking script");
        summary.push(path, check_document(text, &schema));
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).cli_code(CLI_JSON_OUTPUT)?
        );
    } else {
        for line in summary.lines() {
            println!("{}", line);
        }
    }
    Ok(summary.exit_code())
}

fn run_outline(args: OutlineArgs) -> Result<i32, EvScriptError> {
    let text = read_script_file(&args.file)?;
    let outline = document_outline(&analyze(&text));

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outline).cli_code(CLI_JSON_OUTPUT)?
        );
    } else {
        for line in outline_lines(&outline) {
            println!("{}", line);
        }
    }
    Ok(0)
}

fn run_query(args: QueryArgs) -> Result<i32, EvScriptError> {
    if args.line == 0 || args.column == 0 {
        return Err(EvScriptError::new(
            "CLI_QUERY_POSITION",
            "--line and --column are 1-based",
        ));
    }
    let schema = load_schema_dir(&args.schema_dir)?;
    let text = read_script_file(&args.file)?;

    let line = args.line - 1;
    let column = args.column - 1;
    let Some(line_text) = text.lines().nth(line) else {
        return Err(EvScriptError::new(
            "CLI_QUERY_POSITION",
            format!("{} has no line {}", args.file, args.line),
        ));
    };
    if column > line_text.chars().count() {
        return Err(EvScriptError::new(
            "CLI_QUERY_POSITION",
            format!("line {} has no column {}", args.line, args.column),
        ));
    }

    let model = analyze(&text);
    println!("RESULT:OK");
    if let Some(token) = symbol_at(line_text, column) {
        println!("SYMBOL:{}", token.text);
    }
    if let Some(context) = active_call_context(line_text, column) {
        println!("CALL:{}:{}", context.command_name, context.arg_index);
    }
    if let Some(info) = hover(&model, &schema, line, line_text, column) {
        println!("{}", json_line("HOVER_JSON", &info.contents)?);
    }
    if let Some(label) = goto_definition(&model, line, line_text, column) {
        println!(
            "DEFINITION:{}:{}",
            label.range.start.line + 1,
            label.range.start.column + 1
        );
    }
    Ok(0)
}

#[cfg(test)]
mod cli_test_support;
#[cfg(test)]
mod tests;
