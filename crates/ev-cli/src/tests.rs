use super::*;
use crate::cli_test_support::*;

fn run_args(args: &[&str]) -> i32 {
    let mut full = vec!["evscript"];
    full.extend_from_slice(args);
    run_cli_from_args(full)
}

#[test]
fn cli_parses_check_arguments() {
    let cli = Cli::try_parse_from([
        "evscript",
        "check",
        "--schema-dir",
        "schema",
        "--scripts-dir",
        "scripts",
        "a.ev",
        "b.ev",
        "--json",
    ])
    .expect("check args should parse");
    let Mode::Check(args) = cli.command else {
        panic!("expected check mode");
    };
    assert_eq!(args.schema_dir, "schema");
    assert_eq!(args.scripts_dir.as_deref(), Some("scripts"));
    assert_eq!(args.files, vec!["a.ev".to_string(), "b.ev".to_string()]);
    assert_eq!(args.ext, "ev");
    assert!(args.json);
    assert!(!cli.verbose);
}

#[test]
fn cli_parses_query_and_global_verbose() {
    let cli = Cli::try_parse_from([
        "evscript",
        "query",
        "--schema-dir",
        "s",
        "main.ev",
        "--line",
        "3",
        "--column",
        "7",
        "-v",
    ])
    .expect("query args should parse");
    assert!(cli.verbose);
    let Mode::Query(args) = cli.command else {
        panic!("expected query mode");
    };
    assert_eq!((args.line, args.column), (3, 7));
    assert_eq!(args.file, "main.ev");
}

#[test]
fn cli_rejects_missing_subcommand() {
    assert_ne!(run_args(&[]), 0);
    assert!(Cli::try_parse_from(["evscript", "check"]).is_err());
}

#[test]
fn check_exit_code_follows_error_diagnostics() {
    let schema = write_schema_dir("check-schema");
    let scripts = temp_path("check-scripts");
    write_file(&scripts.join("clean.ev"), "start:\n_FLAG_SET(#FE_DONE)\n_JUMP(\"start\")");
    let schema_arg = schema.to_string_lossy().to_string();
    let scripts_arg = scripts.to_string_lossy().to_string();

    assert_eq!(
        run_args(&["check", "--schema-dir", &schema_arg, "--scripts-dir", &scripts_arg]),
        0
    );

    write_file(&scripts.join("broken.ev"), "_JUMP(\"nowhere\")");
    assert_eq!(
        run_args(&["check", "--schema-dir", &schema_arg, "--scripts-dir", &scripts_arg]),
        1
    );
}

#[test]
fn check_reports_missing_schema_dir_as_error() {
    let missing = temp_path("no-schema").to_string_lossy().to_string();
    let script = temp_path("lonely.ev");
    write_file(&script, "_END()");
    let script = script.to_string_lossy().to_string();
    assert_eq!(run_args(&["check", "--schema-dir", &missing, &script]), 1);
}

#[test]
fn outline_and_query_succeed_on_readable_files() {
    let schema = write_schema_dir("query-schema");
    let script = temp_path("query.ev");
    write_file(&script, "start:\n_JUMP(\"start\")");
    let schema_arg = schema.to_string_lossy().to_string();
    let script_arg = script.to_string_lossy().to_string();

    assert_eq!(run_args(&["outline", &script_arg]), 0);
    assert_eq!(run_args(&["outline", "--json", &script_arg]), 0);
    assert_eq!(
        run_args(&[
            "query",
            "--schema-dir",
            &schema_arg,
            &script_arg,
            "--line",
            "2",
            "--column",
            "9",
        ]),
        0
    );
}

#[test]
fn query_rejects_positions_outside_the_file() {
    let schema = write_schema_dir("query-bounds-schema");
    let script = temp_path("bounds.ev");
    write_file(&script, "_END()");
    let schema_arg = schema.to_string_lossy().to_string();
    let script_arg = script.to_string_lossy().to_string();

    for (line, column) in [("0", "1"), ("2", "1"), ("1", "9")] {
        assert_eq!(
            run_args(&[
                "query",
                "--schema-dir",
                &schema_arg,
                &script_arg,
                "--line",
                line,
                "--column",
                column,
            ]),
            1,
            "line {} column {}",
            line,
            column
        );
    }
}
