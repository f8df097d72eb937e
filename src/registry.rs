// Schema Registry
//
// Thread-safe store of table snapshots keyed by (database, table). Callers
// construct one registry and share it, usually behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::ddl::parse_ddl;
use crate::error::{Result, SqlKitError};
use crate::exec::{get_ddl, Connection, DdlCache};
use crate::schema::{DbName, Table, TableName, Tables};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    db: String,
    table: String,
}

impl TableKey {
    fn new(db: &DbName, table: &TableName) -> Self {
        TableKey {
            db: db.base().to_lowercase(),
            table: table.base().to_lowercase(),
        }
    }

    fn display(&self) -> String {
        format!("{}.{}", self.db, self.table)
    }
}

/// Registry of table snapshots. Registering a key again replaces the stored
/// table; readers holding the previous `Arc<Table>` keep their copy.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<TableKey, Arc<Table>>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        TableRegistry::default()
    }

    /// Store `table` under `db`, replacing any previous entry
    pub fn register(&self, db: &DbName, table: Table) {
        let key = TableKey::new(db, &table.table_name);
        self.tables.write().insert(key, Arc::new(table));
    }

    pub fn register_all(&self, db: &DbName, tables: Tables) {
        let mut guard = self.tables.write();
        for table in tables {
            guard.insert(TableKey::new(db, &table.table_name), Arc::new(table));
        }
    }

    /// Swap the whole content for `tables`, each under its own database.
    /// Tables missing from `tables` are gone afterwards.
    pub fn replace_all(&self, tables: Tables) {
        let fresh: HashMap<TableKey, Arc<Table>> = tables
            .into_iter()
            .map(|table| (TableKey::new(&table.db_name, &table.table_name), Arc::new(table)))
            .collect();
        debug!("replacing registry content with {} tables", fresh.len());
        *self.tables.write() = fresh;
    }

    /// Parse `ddl` and register every table under its own database
    pub fn register_ddl(&self, ddl: &str) -> Result<()> {
        let tables = parse_ddl(ddl)?;
        for (db, group) in tables.group_by_db_name() {
            debug!("registering {} tables of database {}", group.len(), db);
            self.register_all(&db, group);
        }
        Ok(())
    }

    /// Populate the registry from the DDL of the database `conn` is bound to,
    /// reading through `cache` when given.
    pub fn register_from_connection(&self, conn: &dyn Connection, cache: Option<&DdlCache>) -> Result<()> {
        let ddl = get_ddl(conn, cache)?;
        self.register_ddl(&ddl)
    }

    pub fn get(&self, db: &DbName, table: &TableName) -> Result<Arc<Table>> {
        let key = TableKey::new(db, table);
        self.tables
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| SqlKitError::NotFoundTable(key.display()))
    }

    /// All tables registered under `db`, sorted by name
    pub fn tables(&self, db: &DbName) -> Vec<Arc<Table>> {
        let db_key = db.base().to_lowercase();
        let mut tables: Vec<Arc<Table>> = self
            .tables
            .read()
            .iter()
            .filter(|(key, _)| key.db == db_key)
            .map(|(_, table)| Arc::clone(table))
            .collect();
        tables.sort_by_key(|t| t.full_name());
        tables
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
