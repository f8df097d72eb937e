use anyhow::Result;
use std::collections::BTreeSet;

use sqlkit::schema::{parse_enums, Column, ColumnName, Columns, ConstraintKind, GeneralType, Table};
use sqlkit::{parse_ddl, split_statements, try_exec_ddls, DbName, SqlKitError, TableName};

#[path = "../common/mod.rs"]
mod common;

fn names(columns: &Columns) -> Vec<String> {
    columns.iter().map(|c| c.column_name.to_string()).collect()
}

fn column<'a>(table: &'a Table, name: &str) -> &'a Column {
    table
        .columns
        .get_by_name(&ColumnName::from(name))
        .unwrap_or_else(|| panic!("missing column {}", name))
}

#[test]
fn test_tables_grouped_by_database() -> Result<()> {
    let tables = parse_ddl(common::SHOP_DDL)?;

    let parsed: BTreeSet<(String, String)> = tables
        .group_by_db_name()
        .into_iter()
        .flat_map(|(db, group)| {
            group
                .iter()
                .map(|t| (db.to_string(), t.table_name.to_string()))
                .collect::<Vec<_>>()
        })
        .collect();
    let expected: BTreeSet<(String, String)> = [
        ("crm", "lead"),
        ("shop", "order_item"),
        ("shop", "user"),
    ]
    .iter()
    .map(|(d, t)| (d.to_string(), t.to_string()))
    .collect();
    assert_eq!(parsed, expected);

    // sorted by `db`.`table`
    let order: Vec<String> = tables.iter().map(|t| t.full_name()).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
    Ok(())
}

#[test]
fn test_column_attributes() -> Result<()> {
    let tables = parse_ddl(common::SHOP_DDL)?;
    let user = tables
        .get(&DbName::from("shop"), &TableName::from("user"))
        .expect("user table");
    assert_eq!(user.comment, "users");

    let id = column(user, "id");
    assert!(id.auto_increment);
    assert!(id.primary_key);
    assert!(id.unsigned);
    assert!(!id.nullable);
    assert_eq!(id.general_type, GeneralType::Int);

    let name = column(user, "name");
    assert!(name.unique_key);
    assert_eq!(name.size, 64);
    assert_eq!(name.default_value, "");
    assert_eq!(name.comment, "user name");

    let status = column(user, "status");
    assert_eq!(status.enums, vec!["1", "2"]);
    assert_eq!(status.default_value, "1");

    assert!(column(user, "created_at").is_default_current_timestamp());
    assert!(column(user, "updated_at").on_update);
    assert_eq!(column(user, "updated_at").general_type, GeneralType::Time);
    Ok(())
}

/// Column types as `SHOW CREATE TABLE` prints them
#[test]
fn test_server_type_modifiers() -> Result<()> {
    let ddl = "CREATE DATABASE `inv`;
        CREATE TABLE `inv`.`stock` (
          `id` int(10) unsigned zerofill NOT NULL AUTO_INCREMENT,
          `qty` decimal(12,4) unsigned NOT NULL DEFAULT '0.0000',
          `path` varchar(64) NOT NULL DEFAULT 'c:\\\\tmp' COMMENT 'dir\\'s path',
          PRIMARY KEY (`id`)
        ) ENGINE=InnoDB AUTO_INCREMENT=7 DEFAULT CHARSET=utf8mb4;";
    let tables = parse_ddl(ddl)?;
    let stock = tables
        .get(&DbName::from("inv"), &TableName::from("stock"))
        .expect("stock table");

    let id = column(stock, "id");
    assert!(id.unsigned && id.primary_key && id.auto_increment);
    assert_eq!(id.db_type, "int(10) unsigned zerofill");
    assert_eq!(id.size, 10);

    let qty = column(stock, "qty");
    assert!(qty.unsigned);
    assert_eq!(qty.general_type, GeneralType::Float);
    assert_eq!(qty.size, 12);

    let path = column(stock, "path");
    assert_eq!(path.default_value, "c:\\tmp");
    assert_eq!(path.comment, "dir's path");
    Ok(())
}

#[test]
fn test_composite_primary_key() -> Result<()> {
    let tables = parse_ddl(common::SHOP_DDL)?;
    let item = tables
        .get(&DbName::from("shop"), &TableName::from("order_item"))
        .expect("order_item table");

    let pk = item.primary_key()?;
    assert_eq!(names(&pk), vec!["order_id", "item_id"]);
    assert!(pk.iter().all(|c| c.primary_key));

    // no unique constraint: empty, not an error
    assert!(item.unique_key()?.is_empty());

    // ALTER TABLE ADD COLUMN landed at the end
    assert_eq!(item.columns.iter().last().map(|c| c.column_name.to_string()), Some("qty".to_string()));
    assert!(column(item, "note").nullable);
    assert_eq!(column(item, "price").general_type, GeneralType::Float);
    Ok(())
}

#[test]
fn test_constraint_on_missing_column() -> Result<()> {
    let mut table = parse_ddl("CREATE TABLE shop.t (id int, PRIMARY KEY (id))")?
        .into_iter()
        .next()
        .expect("one table");
    table
        .constraints
        .add(ConstraintKind::Unique, &[ColumnName::from("ghost")]);

    match table.unique_key() {
        Err(SqlKitError::NotFoundColumn { table, column }) => {
            assert_eq!(table, "t");
            assert_eq!(column, "ghost");
        }
        other => panic!("expected NotFoundColumn, got {:?}", other),
    }
    assert!(table.columns.get_by_names(&[ColumnName::from("ghost")]).is_err());
    Ok(())
}

#[test]
fn test_enum_extraction() -> Result<()> {
    let tables = parse_ddl(common::SHOP_DDL)?;
    let user = tables
        .get(&DbName::from("shop"), &TableName::from("user"))
        .expect("user table");

    let enums = parse_enums(column(user, "status"))?;
    let items: Vec<(&str, &str)> = enums
        .iter()
        .map(|e| (e.key.as_str(), e.title.as_str()))
        .collect();
    assert_eq!(
        items,
        vec![("USER_STATUS_1", "Active"), ("USER_STATUS_2", "Inactive")]
    );
    Ok(())
}

#[test]
fn test_semicolon_inside_literal() {
    let statements = split_statements("INSERT INTO t VALUES ('a;b')");
    assert_eq!(statements, vec!["INSERT INTO t VALUES ('a;b')"]);
}

#[test]
fn test_replay_error_carries_code() {
    let err = parse_ddl("CREATE DATABASE a; USE a; ALTER TABLE missing ADD COLUMN x int").unwrap_err();
    match err {
        SqlKitError::Replay { database, source, .. } => {
            assert_eq!(database, "a");
            assert_eq!(source.code(), 1051);
        }
        other => panic!("expected replay error, got {:?}", other),
    }
}

#[test]
fn test_catalog_after_replay() -> Result<()> {
    let catalog = try_exec_ddls(common::SHOP_DDL)?;
    let names: Vec<&str> = catalog.databases().map(|db| db.name()).collect();
    assert_eq!(names, vec!["shop", "crm"]);
    assert_eq!(catalog.current_database(), Some("crm"));
    Ok(())
}
