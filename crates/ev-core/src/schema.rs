use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ArgumentKind;

/// Declared type of an argument slot. `System` in the source tables is read as `SysFlag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArgType {
    Number,
    Work,
    Flag,
    SysFlag,
    Label,
    String,
    Other(String),
}

impl ArgType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "Number",
            Self::Work => "Work",
            Self::Flag => "Flag",
            Self::SysFlag => "SysFlag",
            Self::Label => "Label",
            Self::String => "String",
            Self::Other(name) => name,
        }
    }

    /// Unrecognized declared types accept any argument.
    pub fn accepts(&self, kind: ArgumentKind) -> bool {
        match self {
            Self::Number => kind == ArgumentKind::Number,
            Self::Work => matches!(kind, ArgumentKind::Work | ArgumentKind::Number),
            Self::Flag => matches!(kind, ArgumentKind::Flag | ArgumentKind::Number),
            Self::SysFlag => matches!(kind, ArgumentKind::SysFlag | ArgumentKind::Number),
            Self::Label | Self::String => kind == ArgumentKind::String,
            Self::Other(_) => true,
        }
    }

    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        match self {
            Self::Work => Some(SymbolKind::Work),
            Self::Flag => Some(SymbolKind::Flag),
            Self::SysFlag => Some(SymbolKind::SysFlag),
            _ => None,
        }
    }
}

impl From<String> for ArgType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Number" => Self::Number,
            "Work" => Self::Work,
            "Flag" => Self::Flag,
            "SysFlag" | "System" => Self::SysFlag,
            "Label" => Self::Label,
            "String" => Self::String,
            _ => Self::Other(value),
        }
    }
}

impl From<ArgType> for String {
    fn from(value: ArgType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArgumentSlot {
    #[serde(default)]
    pub tentative_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub r#type: Vec<ArgType>,
    #[serde(default)]
    pub optional: bool,
}

impl ArgumentSlot {
    pub fn accepts(&self, kind: ArgumentKind) -> bool {
        kind == ArgumentKind::Unclassified
            || self.r#type.is_empty()
            || self.r#type.iter().any(|ty| ty.accepts(kind))
    }

    pub fn type_list(&self) -> String {
        self.r#type
            .iter()
            .map(ArgType::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandDefinition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dummy: bool,
    #[serde(default)]
    pub animation: bool,
    #[serde(default)]
    pub args: Vec<ArgumentSlot>,
}

impl CommandDefinition {
    pub fn required_count(&self) -> usize {
        self.args.iter().filter(|slot| !slot.optional).count()
    }

    pub fn max_count(&self) -> usize {
        self.args.len()
    }

    /// `NAME(first, second, [optional])`
    pub fn signature(&self) -> String {
        let params = self
            .args
            .iter()
            .map(|slot| {
                if slot.optional {
                    format!("[{}]", slot.tentative_name)
                } else {
                    slot.tentative_name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SymbolEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Work,
    Flag,
    SysFlag,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 3] = [Self::Work, Self::Flag, Self::SysFlag];

    pub fn sigil(&self) -> char {
        match self {
            Self::Work => '@',
            Self::Flag => '#',
            Self::SysFlag => '$',
        }
    }

    pub fn from_sigil(sigil: char) -> Option<Self> {
        match sigil {
            '@' => Some(Self::Work),
            '#' => Some(Self::Flag),
            '$' => Some(Self::SysFlag),
            _ => None,
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Flag => "flag",
            Self::SysFlag => "sysflag",
        }
    }

    pub fn argument_kind(&self) -> ArgumentKind {
        match self {
            Self::Work => ArgumentKind::Work,
            Self::Flag => ArgumentKind::Flag,
            Self::SysFlag => ArgumentKind::SysFlag,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    by_name: BTreeMap<String, SymbolEntry>,
    name_by_id: BTreeMap<i64, String>,
}

impl SymbolTable {
    /// Returns `false` and keeps the existing entry when the name is already present.
    pub fn insert(&mut self, entry: SymbolEntry) -> bool {
        if self.by_name.contains_key(&entry.name) {
            return false;
        }
        self.name_by_id
            .entry(entry.id)
            .or_insert_with(|| entry.name.clone());
        self.by_name.insert(entry.name.clone(), entry);
        true
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.by_name.get(name)
    }

    pub fn get_by_id(&self, id: i64) -> Option<&SymbolEntry> {
        self.name_by_id
            .get(&id)
            .and_then(|name| self.by_name.get(name))
    }

    pub fn entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandCatalog {
    by_name: BTreeMap<String, CommandDefinition>,
}

impl CommandCatalog {
    /// Returns `false` and keeps the existing definition when the name is already present.
    pub fn insert(&mut self, definition: CommandDefinition) -> bool {
        if self.by_name.contains_key(&definition.name) {
            return false;
        }
        self.by_name.insert(definition.name.clone(), definition);
        true
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.by_name.get(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Read-only command and symbol catalog shared by every analysis call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    commands: CommandCatalog,
    works: SymbolTable,
    flags: SymbolTable,
    sys_flags: SymbolTable,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tables(
        commands: CommandCatalog,
        works: SymbolTable,
        flags: SymbolTable,
        sys_flags: SymbolTable,
    ) -> Self {
        Self {
            commands,
            works,
            flags,
            sys_flags,
        }
    }

    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn commands(&self) -> &CommandCatalog {
        &self.commands
    }

    pub fn table(&self, kind: SymbolKind) -> &SymbolTable {
        match kind {
            SymbolKind::Work => &self.works,
            SymbolKind::Flag => &self.flags,
            SymbolKind::SysFlag => &self.sys_flags,
        }
    }

    /// Resolves `@NAME`, `NAME`, or a bare numeric id against one table.
    pub fn resolve_symbol(&self, kind: SymbolKind, token: &str) -> Option<&SymbolEntry> {
        let table = self.table(kind);
        let name = token.strip_prefix(kind.sigil()).unwrap_or(token);
        table
            .get(name)
            .or_else(|| name.parse::<i64>().ok().and_then(|id| table.get_by_id(id)))
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;

    fn entry(id: i64, name: &str) -> SymbolEntry {
        SymbolEntry {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
        }
    }

    #[test]
    fn command_definition_deserializes_from_pascal_case_table() {
        let json = r#"{
            "Id": 7,
            "Name": "_TALKMSG",
            "Description": "Show a message",
            "Dummy": false,
            "Animation": false,
            "Args": [
                { "TentativeName": "msg", "Description": "", "Type": ["String"], "Optional": false },
                { "TentativeName": "wait", "Description": "", "Type": ["Number", "Work"], "Optional": true },
                { "TentativeName": "who", "Type": ["System", "Sprite"] }
            ]
        }"#;
        let definition: CommandDefinition = serde_json::from_str(json).expect("command json");
        assert_eq!(definition.required_count(), 2);
        assert_eq!(definition.max_count(), 3);
        assert_eq!(definition.args[1].r#type, vec![ArgType::Number, ArgType::Work]);
        assert_eq!(
            definition.args[2].r#type,
            vec![ArgType::SysFlag, ArgType::Other("Sprite".to_string())]
        );
        assert_eq!(definition.signature(), "_TALKMSG(msg, [wait], who)");
    }

    #[test]
    fn arg_type_compatibility_table() {
        assert!(ArgType::Number.accepts(ArgumentKind::Number));
        assert!(!ArgType::Number.accepts(ArgumentKind::Work));
        assert!(ArgType::Work.accepts(ArgumentKind::Number));
        assert!(ArgType::Flag.accepts(ArgumentKind::Flag));
        assert!(!ArgType::Flag.accepts(ArgumentKind::SysFlag));
        assert!(ArgType::SysFlag.accepts(ArgumentKind::SysFlag));
        assert!(ArgType::Label.accepts(ArgumentKind::String));
        assert!(!ArgType::String.accepts(ArgumentKind::Comparator));
        assert!(ArgType::Other("X".to_string()).accepts(ArgumentKind::Comparator));
    }

    #[test]
    fn slot_accepts_unclassified_and_untyped() {
        let slot = ArgumentSlot {
            tentative_name: "n".to_string(),
            description: String::new(),
            r#type: vec![ArgType::Number],
            optional: false,
        };
        assert!(slot.accepts(ArgumentKind::Unclassified));
        assert!(!slot.accepts(ArgumentKind::String));

        let untyped = ArgumentSlot {
            r#type: Vec::new(),
            ..slot
        };
        assert!(untyped.accepts(ArgumentKind::String));
    }

    #[test]
    fn symbol_table_keeps_first_entry_and_resolves_ids() {
        let mut works = SymbolTable::default();
        assert!(works.insert(entry(10, "LOCALWORK1")));
        assert!(!works.insert(entry(11, "LOCALWORK1")));
        assert_eq!(works.len(), 1);

        let registry = SchemaRegistry::from_tables(
            CommandCatalog::default(),
            works,
            SymbolTable::default(),
            SymbolTable::default(),
        );
        let by_name = registry
            .resolve_symbol(SymbolKind::Work, "@LOCALWORK1")
            .expect("by name");
        assert_eq!(by_name.id, 10);
        let by_id = registry
            .resolve_symbol(SymbolKind::Work, "10")
            .expect("by id");
        assert_eq!(by_id.name, "LOCALWORK1");
        assert!(registry.resolve_symbol(SymbolKind::Work, "11").is_none());
        assert!(registry.resolve_symbol(SymbolKind::Flag, "10").is_none());
    }

    #[test]
    fn empty_registry_misses_everything() {
        let registry = SchemaRegistry::empty();
        assert!(registry.command("_JUMP").is_none());
        assert!(registry.commands().is_empty());
        for kind in SymbolKind::ALL {
            assert!(registry.table(kind).is_empty());
        }
    }
}
