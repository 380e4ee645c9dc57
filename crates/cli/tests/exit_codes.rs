//! End-to-end runs of the `tsql-lint` binary.

use std::fs;
use std::process::{Command, Output};

fn tsql_lint(args: &[&str], dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsql-lint"))
        .args(args)
        .current_dir(dir)
        .env_remove("tsqllintrc")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tsql-lint")
}

#[test]
fn error_diagnostics_exit_with_one() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("lint.json"),
        r#"{"rules":{"missing-nolock":"error"}}"#,
    )?;
    fs::write(dir.path().join("report.sql"), "SELECT *\nFROM\tOrders o\n")?;

    let output = tsql_lint(&["--config", "lint.json", "report.sql"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "report.sql:2:6: error Missing nolock found in a select statement (missing-nolock)\n"
    );
    assert!(output.stderr.is_empty());
    Ok(())
}

#[test]
fn hinted_script_exits_with_zero() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("lint.json"),
        r#"{"rules":{"missing-nolock":"error"}}"#,
    )?;
    fs::write(dir.path().join("ok.sql"), "SELECT * FROM Orders WITH (NOLOCK)")?;

    let output = tsql_lint(&["--config", "lint.json", "ok.sql"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn unreadable_file_exits_with_two() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = tsql_lint(&["nope.sql"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stdout)?.contains("nope.sql: could not read file"));
    Ok(())
}

#[test]
fn unknown_flag_is_a_usage_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = tsql_lint(&["--frobnicate"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
