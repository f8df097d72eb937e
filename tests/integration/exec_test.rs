use anyhow::Result;

use sqlkit::exec::{create_database_sql, exec_or_query, get_ddl, DbConfig, DdlCache, ExecResult};
use sqlkit::{parse_ddl, DbName, SqlKitError};

#[path = "../common/mod.rs"]
mod common;

use common::{row, FakeConnection};

#[test]
fn test_query_result_shapes() -> Result<()> {
    let conn = FakeConnection::new()
        .with_rows("SELECT name FROM user WHERE id = 1", vec![row(&[("name", Some("bob"))])])
        .with_rows("SELECT id FROM user WHERE id = 0", vec![])
        .with_rows(
            "SELECT id, name FROM user",
            vec![
                row(&[("id", Some("1")), ("name", Some("bob"))]),
                row(&[("id", Some("2")), ("name", None)]),
            ],
        )
        .with_sets(
            "SELECT id FROM user; SELECT id FROM tag",
            vec![vec![row(&[("id", Some("1"))])], vec![row(&[("id", Some("7"))])]],
        );

    assert_eq!(exec_or_query(&conn, "SELECT name FROM user WHERE id = 1")?, "bob");
    assert_eq!(exec_or_query(&conn, "SELECT id FROM user WHERE id = 0")?, "");
    assert_eq!(
        exec_or_query(&conn, "SELECT id, name FROM user")?,
        r#"[{"id":"1","name":"bob"},{"id":"2","name":null}]"#
    );
    assert_eq!(
        exec_or_query(&conn, "SELECT id FROM user; SELECT id FROM tag")?,
        r#"[[{"id":"1"}],[{"id":"7"}]]"#
    );
    Ok(())
}

#[test]
fn test_exec_result_shapes() -> Result<()> {
    let conn = FakeConnection {
        exec_result: ExecResult {
            last_insert_id: 41,
            rows_affected: 2,
        },
        ..FakeConnection::new()
    };

    assert_eq!(
        exec_or_query(&conn, "INSERT INTO user (name) VALUES ('a'), ('b')")?,
        r#"["41","42"]"#
    );
    assert_eq!(exec_or_query(&conn, "UPDATE user SET name = 'c' WHERE id = 41")?, "2");
    assert_eq!(exec_or_query(&conn, "DELETE FROM user WHERE id > 40")?, "2");
    assert_eq!(exec_or_query(&conn, "CREATE TABLE t (id int)")?, "");
    assert_eq!(conn.statements().len(), 4);
    Ok(())
}

#[test]
fn test_connection_errors_propagate() {
    let conn = FakeConnection::new();
    let err = exec_or_query(&conn, "SELECT 1").unwrap_err();
    assert!(matches!(err, SqlKitError::Connection(_)));
}

#[test]
fn test_get_ddl_round_trips_through_parser() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = DdlCache::new(dir.path());
    let conn = common::shop_connection();

    let ddl = get_ddl(&conn, Some(&cache))?;
    assert!(ddl.starts_with(&create_database_sql("shop")));
    assert!(ddl.ends_with(";\n"));
    assert_eq!(cache.load("shop")?.as_deref(), Some(ddl.as_str()));

    let tables = parse_ddl(&ddl)?;
    let names: Vec<String> = tables.iter().map(|t| t.full_name()).collect();
    assert_eq!(names, vec!["`shop`.`tag`", "`shop`.`user`"]);
    Ok(())
}

#[test]
fn test_get_ddl_without_cache() -> Result<()> {
    let conn = common::shop_connection();
    get_ddl(&conn, None)?;
    get_ddl(&conn, None)?;
    // 4 introspection queries per call
    assert_eq!(conn.statements().len(), 8);
    Ok(())
}

#[test]
fn test_config_database_name() -> Result<()> {
    let config = DbConfig::from_json(r#"{"dsn":"app:pw@tcp(db.local:3306)/shop?parseTime=true"}"#)?;
    assert_eq!(config.db_name()?, DbName::from("shop"));

    let bad = DbConfig {
        dsn: "app:pw@tcp(db.local:3306)".to_string(),
        ..DbConfig::default()
    };
    assert!(matches!(bad.db_name(), Err(SqlKitError::InvalidDsn(_))));
    Ok(())
}
