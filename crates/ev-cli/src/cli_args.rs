use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "evscript")]
#[command(about = "Static checker for event scripts")]
pub(crate) struct Cli {
    /// Log schema loading details to stderr.
    #[arg(long = "verbose", short = 'v', global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Check(CheckArgs),
    Outline(OutlineArgs),
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "schema-dir")]
    pub(crate) schema_dir: String,
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: Option<String>,
    /// Script file extension used when walking --scripts-dir.
    #[arg(long = "ext", default_value = "ev")]
    pub(crate) ext: String,
    #[arg(long = "json")]
    pub(crate) json: bool,
    pub(crate) files: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct OutlineArgs {
    #[arg(long = "json")]
    pub(crate) json: bool,
    pub(crate) file: String,
}

#[derive(Debug, Args)]
pub(crate) struct QueryArgs {
    #[arg(long = "schema-dir")]
    pub(crate) schema_dir: String,
    /// 1-based line number.
    #[arg(long = "line")]
    pub(crate) line: usize,
    /// 1-based column number.
    #[arg(long = "column")]
    pub(crate) column: usize,
    pub(crate) file: String,
}
