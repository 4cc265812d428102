use std::fs;
use std::path::{Path, PathBuf};

use ev_core::{
    CommandCatalog, CommandDefinition, EvScriptError, SchemaRegistry, SourceRange, SymbolEntry,
    SymbolTable,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const COMMANDS_FILE: &str = "commands.json";
pub const WORKS_FILE: &str = "works.json";
pub const FLAGS_FILE: &str = "flags.json";
pub const SYS_FLAGS_FILE: &str = "sysflags.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPaths {
    pub commands: PathBuf,
    pub works: PathBuf,
    pub flags: PathBuf,
    pub sys_flags: PathBuf,
}

impl SchemaPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            commands: dir.join(COMMANDS_FILE),
            works: dir.join(WORKS_FILE),
            flags: dir.join(FLAGS_FILE),
            sys_flags: dir.join(SYS_FLAGS_FILE),
        }
    }
}

/// Raw JSON text per table. `None` means the table is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSources {
    pub commands: Option<String>,
    pub works: Option<String>,
    pub flags: Option<String>,
    pub sys_flags: Option<String>,
}

/// Loads all four tables. A table that cannot be read or parsed is logged and left
/// empty; the others still load.
pub fn load_schema(paths: &SchemaPaths) -> SchemaRegistry {
    load_schema_from_sources(&SchemaSources {
        commands: read_table("commands", &paths.commands),
        works: read_table("works", &paths.works),
        flags: read_table("flags", &paths.flags),
        sys_flags: read_table("sysflags", &paths.sys_flags),
    })
}

pub fn load_schema_from_sources(sources: &SchemaSources) -> SchemaRegistry {
    let commands = sources
        .commands
        .as_deref()
        .map(|json| degrade("commands", parse_command_table(json)))
        .unwrap_or_default();
    let works = symbol_table("works", sources.works.as_deref());
    let flags = symbol_table("flags", sources.flags.as_deref());
    let sys_flags = symbol_table("sysflags", sources.sys_flags.as_deref());

    debug!(
        commands = commands.len(),
        works = works.len(),
        flags = flags.len(),
        sys_flags = sys_flags.len(),
        "schema registry loaded"
    );
    SchemaRegistry::from_tables(commands, works, flags, sys_flags)
}

pub fn parse_command_table(json: &str) -> Result<CommandCatalog, EvScriptError> {
    let mut catalog = CommandCatalog::default();
    for definition in parse_table::<CommandDefinition>("commands", json)? {
        let name = definition.name.clone();
        if !catalog.insert(definition) {
            debug!(command = %name, "duplicate command definition ignored");
        }
    }
    Ok(catalog)
}

pub fn parse_symbol_table(table: &str, json: &str) -> Result<SymbolTable, EvScriptError> {
    let mut symbols = SymbolTable::default();
    for entry in parse_table::<SymbolEntry>(table, json)? {
        let name = entry.name.clone();
        if !symbols.insert(entry) {
            debug!(table, symbol = %name, "duplicate symbol entry ignored");
        }
    }
    Ok(symbols)
}

fn parse_table<T: DeserializeOwned>(table: &str, json: &str) -> Result<Vec<T>, EvScriptError> {
    serde_json::from_str::<Vec<T>>(json).map_err(|error| {
        let line = error.line().saturating_sub(1);
        let column = error.column().saturating_sub(1);
        EvScriptError::new(
            "SCHEMA_PARSE",
            format!("Failed to parse {} table: {}", table, error),
        )
        .at(SourceRange::on_line(line, column, column + 1))
    })
}

fn symbol_table(table: &str, json: Option<&str>) -> SymbolTable {
    json.map(|json| degrade(table, parse_symbol_table(table, json)))
        .unwrap_or_default()
}

fn read_table(table: &str, path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(error) => {
            let error = EvScriptError::new(
                "SCHEMA_READ",
                format!("Failed to read {}: {}", path.display(), error),
            );
            warn!(table, code = %error.code, "{}; table left empty", error.message);
            None
        }
    }
}

fn degrade<T: Default>(table: &str, result: Result<T, EvScriptError>) -> T {
    result.unwrap_or_else(|error| {
        warn!(table, "{}; table left empty", error);
        T::default()
    })
}

#[cfg(test)]
mod schema_loader_tests {
    use super::*;
    use ev_core::SymbolKind;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("evscript-rs-{}-{}", name, nanos));
        fs::create_dir_all(&dir).expect("temp dir should be created");
        dir
    }

    const COMMANDS: &str = r#"[
        { "Id": 1, "Name": "_END", "Description": "end", "Dummy": false, "Animation": false, "Args": [] },
        { "Id": 2, "Name": "_END", "Description": "shadowed", "Dummy": false, "Animation": false, "Args": [] }
    ]"#;
    const WORKS: &str = r#"[ { "Id": 16384, "Name": "LOCALWORK1", "Description": "w" } ]"#;

    #[test]
    fn schema_paths_use_fixed_file_names() {
        let paths = SchemaPaths::in_dir("/data");
        assert_eq!(paths.commands, PathBuf::from("/data/commands.json"));
        assert_eq!(paths.sys_flags, PathBuf::from("/data/sysflags.json"));
    }

    #[test]
    fn load_schema_reads_present_tables_and_skips_missing_ones() {
        let dir = temp_dir("schema");
        fs::write(dir.join(COMMANDS_FILE), COMMANDS).expect("commands written");
        fs::write(dir.join(WORKS_FILE), WORKS).expect("works written");
        fs::write(dir.join(FLAGS_FILE), "{ not json").expect("flags written");

        let registry = load_schema(&SchemaPaths::in_dir(&dir));
        assert_eq!(registry.commands().len(), 1);
        assert_eq!(
            registry.command("_END").expect("_END").description,
            "end"
        );
        assert!(registry
            .resolve_symbol(SymbolKind::Work, "@LOCALWORK1")
            .is_some());
        assert!(registry.table(SymbolKind::Flag).is_empty());
        assert!(registry.table(SymbolKind::SysFlag).is_empty());
    }

    #[test]
    fn load_schema_from_missing_dir_is_empty() {
        let registry = load_schema(&SchemaPaths::in_dir(temp_dir("empty").join("nope")));
        assert_eq!(registry, SchemaRegistry::empty());
    }

    #[test]
    fn parse_errors_carry_schema_parse_code() {
        let error = parse_command_table("[{\"Name\": 3}]").expect_err("bad command table");
        assert_eq!(error.code, "SCHEMA_PARSE");
        assert!(error.message.contains("commands"));
        let error = parse_symbol_table("flags", "{}").expect_err("not an array");
        assert!(error.message.contains("flags"));

        let error = parse_symbol_table("works", "[\n  { \"Id\": 1, }\n]").expect_err("bad entry");
        let span = error.span.expect("parse errors carry a position");
        assert_eq!(span.start.line, 1);
        assert!(error.to_string().starts_with("SCHEMA_PARSE at 2:"));
    }

    #[test]
    fn load_schema_from_sources_degrades_per_table() {
        let registry = load_schema_from_sources(&SchemaSources {
            commands: Some("oops".to_string()),
            works: Some(WORKS.to_string()),
            flags: None,
            sys_flags: Some("[]".to_string()),
        });
        assert!(registry.commands().is_empty());
        assert_eq!(registry.table(SymbolKind::Work).len(), 1);
    }
}
