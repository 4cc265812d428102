use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("evscript-rs-{}-{}", name, nanos))
}

pub(crate) fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

pub(crate) const COMMANDS_JSON: &str = r#"[
  { "Id": 1, "Name": "_JUMP", "Description": "Jump to a label", "Dummy": false, "Animation": false,
    "Args": [ { "TentativeName": "label", "Description": "", "Type": ["Label"], "Optional": false } ] },
  { "Id": 2, "Name": "_FLAG_SET", "Description": "Set a flag", "Dummy": false, "Animation": false,
    "Args": [ { "TentativeName": "flag", "Description": "", "Type": ["Flag"], "Optional": false } ] },
  { "Id": 3, "Name": "_END", "Description": "End the event", "Dummy": false, "Animation": false, "Args": [] }
]"#;

pub(crate) const FLAGS_JSON: &str = r#"[ { "Id": 100, "Name": "FE_DONE", "Description": "event finished" } ]"#;

/// Schema directory with commands and flags; works and sysflags are left missing.
pub(crate) fn write_schema_dir(name: &str) -> PathBuf {
    let dir = temp_path(name);
    write_file(&dir.join("commands.json"), COMMANDS_JSON);
    write_file(&dir.join("flags.json"), FLAGS_JSON);
    dir
}
