use ev_core::{CommandCatalog, CommandDefinition, SchemaRegistry, SymbolEntry, SymbolTable};

pub(crate) const COMMANDS_JSON: &str = r#"[
  { "Id": 1, "Name": "_TALKMSG", "Description": "Show a message window", "Dummy": false, "Animation": false,
    "Args": [
      { "TentativeName": "msg", "Description": "message id", "Type": ["String"], "Optional": false },
      { "TentativeName": "wait", "Description": "", "Type": ["Number", "Work"], "Optional": true }
    ] },
  { "Id": 2, "Name": "_JUMP", "Description": "Jump to a label", "Dummy": false, "Animation": false,
    "Args": [ { "TentativeName": "label", "Description": "", "Type": ["Label"], "Optional": false } ] },
  { "Id": 3, "Name": "_CALL", "Description": "Call a label", "Dummy": false, "Animation": false,
    "Args": [ { "TentativeName": "label", "Description": "", "Type": ["Label"], "Optional": false } ] },
  { "Id": 4, "Name": "_IFVAL_JUMP", "Description": "Compare and jump", "Dummy": false, "Animation": false,
    "Args": [
      { "TentativeName": "value1", "Description": "", "Type": ["Work"], "Optional": false },
      { "TentativeName": "cond", "Description": "", "Type": [], "Optional": false },
      { "TentativeName": "value2", "Description": "", "Type": ["Number", "Work"], "Optional": false },
      { "TentativeName": "label", "Description": "", "Type": ["Label"], "Optional": false }
    ] },
  { "Id": 5, "Name": "_IF_FLAGON_JUMP", "Description": "Jump when flag is set", "Dummy": false, "Animation": false,
    "Args": [
      { "TentativeName": "flag", "Description": "", "Type": ["Flag", "SysFlag"], "Optional": false },
      { "TentativeName": "label", "Description": "", "Type": ["Label"], "Optional": false }
    ] },
  { "Id": 6, "Name": "_FLAG_SET", "Description": "Set a flag", "Dummy": false, "Animation": false,
    "Args": [ { "TentativeName": "flag", "Description": "", "Type": ["Flag"], "Optional": false } ] },
  { "Id": 7, "Name": "_OBJ_POS", "Description": "Place an object", "Dummy": false, "Animation": false,
    "Args": [
      { "TentativeName": "obj", "Description": "", "Type": ["Number", "Work"], "Optional": false },
      { "TentativeName": "x", "Description": "", "Type": ["Number"], "Optional": false },
      { "TentativeName": "z", "Description": "", "Type": ["Number"], "Optional": true }
    ] },
  { "Id": 8, "Name": "_END", "Description": "End the event", "Dummy": false, "Animation": false, "Args": [] },
  { "Id": 9, "Name": "_DUMMY_SLOT", "Description": "", "Dummy": true, "Animation": false, "Args": [] }
]"#;

pub(crate) fn symbol(id: i64, name: &str, description: &str) -> SymbolEntry {
    SymbolEntry {
        id,
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub(crate) fn sample_schema() -> SchemaRegistry {
    let definitions: Vec<CommandDefinition> =
        serde_json::from_str(COMMANDS_JSON).expect("test commands json");
    let mut commands = CommandCatalog::default();
    for definition in definitions {
        commands.insert(definition);
    }

    let mut works = SymbolTable::default();
    works.insert(symbol(16384, "LOCALWORK1", "scratch work 1"));
    works.insert(symbol(16385, "LOCALWORK2", "scratch work 2"));

    let mut flags = SymbolTable::default();
    flags.insert(symbol(100, "FE_DONE", "event finished"));

    let mut sys_flags = SymbolTable::default();
    sys_flags.insert(symbol(1, "SYS_FLAG_BAG_GET", "bag obtained"));

    SchemaRegistry::from_tables(commands, works, flags, sys_flags)
}
