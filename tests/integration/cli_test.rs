use anyhow::Result;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

#[path = "../common/mod.rs"]
mod common;

fn sqlkit() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sqlkit"))
}

/// DDL file in, table JSON out
#[test]
fn test_cli_ddl_command() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(common::SHOP_DDL.as_bytes())?;

    let output = sqlkit().args(["ddl", &file.path().to_string_lossy()]).output()?;
    assert!(output.status.success(), "CLI ddl command failed");

    let tables: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = tables
        .as_array()
        .expect("table array")
        .iter()
        .filter_map(|t| t["tableName"].as_str())
        .collect();
    assert_eq!(names, vec!["lead", "order_item", "user"]);
    Ok(())
}

#[test]
fn test_cli_enums_command() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(common::SHOP_DDL.as_bytes())?;

    let output = sqlkit().args(["enums", &file.path().to_string_lossy()]).output()?;
    assert!(output.status.success(), "CLI enums command failed");

    let output_str = String::from_utf8(output.stdout)?;
    assert!(output_str.contains("USER_STATUS_1"), "Expected enum key not found");
    assert!(output_str.contains("Inactive"), "Expected enum title not found");
    Ok(())
}

#[test]
fn test_cli_tpl_and_bind() -> Result<()> {
    let output = sqlkit()
        .args(["tpl", "DELETE FROM user WHERE id = 3"])
        .output()?;
    assert!(output.status.success(), "CLI tpl command failed");
    let tpl: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(tpl["tpl"], "DELETE FROM user WHERE whereColumn = 'whereValue'");

    let output = sqlkit()
        .args(["bind", "SELECT * FROM user WHERE id = :id", "--data", r#"{"id": 3}"#])
        .output()?;
    assert!(output.status.success(), "CLI bind command failed");
    assert_eq!(String::from_utf8(output.stdout)?.trim(), "SELECT * FROM user WHERE id = 3");

    let output = sqlkit().args(["bind", "SELECT * FROM user WHERE id = :id"]).output()?;
    assert!(!output.status.success(), "missing binding should fail");
    Ok(())
}

/// Shell fed from stdin: DDL registers tables, DML prints templates
#[test]
fn test_cli_shell_interaction() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut child = sqlkit()
        .arg("shell")
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(b"CREATE TABLE shop.user (id int PRIMARY KEY)\n")?;
        stdin.write_all(b"tables shop\n")?;
        stdin.write_all(b"SELECT * FROM user WHERE id = 1\n")?;
        stdin.write_all(b"CREATE DATABASE crm\n")?;
        stdin.write_all(b"USE crm\n")?;
        stdin.write_all(b"CREATE TABLE lead (id int PRIMARY KEY)\n")?;
        stdin.write_all(b"DROP TABLE shop.user\n")?;
        stdin.write_all(b"help\n")?;
        stdin.write_all(b"exit\n")?;
    }

    let output = child.wait_with_output()?;
    assert!(output.status.success(), "CLI shell failed");

    let output_str = String::from_utf8(output.stdout)?;
    assert!(output_str.contains("1 tables registered"), "DDL was not registered");
    assert!(output_str.contains("(1 rows)"), "Table listing not found");
    assert!(output_str.contains("whereColumn"), "Template not printed");
    assert!(output_str.contains("2 tables registered"), "USE did not carry over");
    assert!(!output_str.contains("Error"), "Shell reported an error");
    assert!(output_str.contains("Available commands"), "Help not printed");
    Ok(())
}
