use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ev_core::EvScriptError;
use walkdir::WalkDir;

use crate::{CliResultExt, CLI_SOURCE_PATH, CLI_SOURCE_READ, CLI_SOURCE_SCAN};

/// Script text keyed by the path shown in diagnostics.
pub(crate) type ScriptSources = BTreeMap<String, String>;

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, EvScriptError> {
    resolve_dir("scripts-dir", scripts_dir)
}

pub(crate) fn resolve_schema_dir(schema_dir: &str) -> Result<PathBuf, EvScriptError> {
    resolve_dir("schema-dir", schema_dir)
}

fn resolve_dir(flag: &str, raw: &str) -> Result<PathBuf, EvScriptError> {
    let path = PathBuf::from(raw);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .cli_code(CLI_SOURCE_PATH)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(EvScriptError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("{} does not exist: {}", flag, absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(EvScriptError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("{} is not a directory: {}", flag, absolute.display()),
        ));
    }

    Ok(absolute)
}

/// Every `*.{ext}` file under `scripts_dir`, keyed by its `/`-separated relative path.
pub(crate) fn read_scripts_from_dir(
    scripts_dir: &Path,
    ext: &str,
) -> Result<ScriptSources, EvScriptError> {
    let ext = ext.trim_start_matches('.');
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|value| value.to_str()) != Some(ext) {
            continue;
        }

        let relative = path
            .strip_prefix(scripts_dir)
            .cli_code(CLI_SOURCE_SCAN)?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).cli_code_for(CLI_SOURCE_READ, path)?;
        scripts.insert(relative, content);
    }

    if scripts.is_empty() {
        return Err(EvScriptError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .{} files under {}", ext, scripts_dir.display()),
        ));
    }

    Ok(scripts)
}

pub(crate) fn read_script_file(path: &str) -> Result<String, EvScriptError> {
    fs::read_to_string(path).cli_code_for(CLI_SOURCE_READ, Path::new(path))
}

/// Scripts named on the command line plus everything under `--scripts-dir`.
pub(crate) fn collect_scripts(
    scripts_dir: Option<&str>,
    files: &[String],
    ext: &str,
) -> Result<ScriptSources, EvScriptError> {
    let mut scripts = match scripts_dir {
        Some(dir) => read_scripts_from_dir(&resolve_scripts_dir(dir)?, ext)?,
        None => BTreeMap::new(),
    };
    for file in files {
        scripts.insert(file.clone(), read_script_file(file)?);
    }

    if scripts.is_empty() {
        return Err(EvScriptError::new(
            "CLI_SOURCE_EMPTY",
            "No scripts given; pass files or --scripts-dir",
        ));
    }
    Ok(scripts)
}
