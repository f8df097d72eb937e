use anyhow::Result;
use std::sync::{Arc, Barrier};
use std::thread;

use sqlkit::exec::DdlCache;
use sqlkit::{DbName, SqlKitError, Table, TableName, TableRegistry};

#[path = "../common/mod.rs"]
mod common;

#[test]
fn test_register_ddl_groups_by_database() -> Result<()> {
    let registry = TableRegistry::new();
    registry.register_ddl(common::SHOP_DDL)?;

    assert_eq!(registry.len(), 3);
    let shop: Vec<String> = registry
        .tables(&DbName::from("shop"))
        .iter()
        .map(|t| t.table_name.to_string())
        .collect();
    assert_eq!(shop, vec!["order_item", "user"]);

    let lead = registry.get(&DbName::from("`CRM`"), &TableName::from("lead"))?;
    assert_eq!(lead.primary_key()?.len(), 1);
    Ok(())
}

#[test]
fn test_snapshots_survive_replacement() -> Result<()> {
    let registry = TableRegistry::new();
    registry.register_ddl("CREATE TABLE shop.user (id int, PRIMARY KEY (id))")?;
    let before = registry.get(&DbName::from("shop"), &TableName::from("user"))?;

    registry.register_ddl("CREATE TABLE shop.user (id int, name varchar(8), PRIMARY KEY (id))")?;
    let after = registry.get(&DbName::from("shop"), &TableName::from("user"))?;

    assert_eq!(before.columns.len(), 1);
    assert_eq!(after.columns.len(), 2);
    Ok(())
}

#[test]
fn test_concurrent_register_and_get() -> Result<()> {
    let registry = Arc::new(TableRegistry::new());
    let keys = [("shop", "user"), ("crm", "lead")];
    let barrier = Arc::new(Barrier::new(keys.len()));

    let writers: Vec<_> = keys
        .iter()
        .map(|&(db, name)| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.register(&DbName::from(db), Table::new(DbName::from(db), TableName::from(name)));
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer thread panicked");
    }

    let readers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let (db, name) = keys[i % keys.len()];
            thread::spawn(move || registry.get(&DbName::from(db), &TableName::from(name)).map(|t| t.full_name()))
        })
        .collect();
    for reader in readers {
        let found = reader.join().expect("reader thread panicked")?;
        assert!(found == "`shop`.`user`" || found == "`crm`.`lead`", "unexpected {}", found);
    }
    Ok(())
}

#[test]
fn test_missing_table() {
    let registry = TableRegistry::new();
    let err = registry
        .get(&DbName::from("shop"), &TableName::from("ghost"))
        .unwrap_err();
    assert!(matches!(err, SqlKitError::NotFoundTable(_)));
}

#[test]
fn test_register_from_connection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = DdlCache::new(dir.path());
    let conn = common::shop_connection();

    let registry = TableRegistry::new();
    registry.register_from_connection(&conn, Some(&cache))?;

    let tag = registry.get(&DbName::from("shop"), &TableName::from("tag"))?;
    let unique: Vec<String> = tag.unique_key()?.iter().map(|c| c.column_name.to_string()).collect();
    assert_eq!(unique, vec!["label"]);
    assert_eq!(registry.len(), 2);

    // second registry reads the cache: only SELECT DATABASE() goes out
    let seen = conn.statements().len();
    TableRegistry::new().register_from_connection(&conn, Some(&cache))?;
    assert_eq!(conn.statements().len(), seen + 1);
    Ok(())
}
