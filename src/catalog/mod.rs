//! Replay Catalog Module
//!
//! An in-memory catalog that DDL statements are replayed into. It tracks
//! databases, their tables and the current database the way a MySQL server
//! would, and reports failures with MySQL error codes so callers can react
//! to specific classes (unknown database, no database selected).

pub mod column;
pub mod table;
mod alter_table;
mod error;
mod replay;

pub use self::column::ColumnDef;
pub use self::error::{CatalogError, CatalogResult};
pub use self::table::{IndexDef, IndexKind, TableDef};

use linked_hash_map::LinkedHashMap;

/// A database and its tables, in creation order
#[derive(Debug, Clone, Default)]
pub struct Database {
    name: String,
    tables: LinkedHashMap<String, TableDef>,
}

impl Database {
    fn new(name: &str) -> Self {
        Database {
            name: name.to_string(),
            tables: LinkedHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

/// The replay catalog. Not meant to be shared: build one per replay run.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Databases keyed by lower-cased name
    databases: LinkedHashMap<String, Database>,
    /// Key of the current database
    current: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn has_databases(&self) -> bool {
        !self.databases.is_empty()
    }

    /// Name of the database selected by the last `USE`
    pub fn current_database(&self) -> Option<&str> {
        self.current
            .as_ref()
            .and_then(|k| self.databases.get(k))
            .map(|db| db.name.as_str())
    }

    /// The first database created in this catalog
    pub fn first_database(&self) -> Option<&str> {
        self.databases.values().next().map(|db| db.name.as_str())
    }

    pub fn databases(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }

    pub fn database(&self, name: &str) -> Option<&Database> {
        self.databases.get(&key(name))
    }

    pub fn table(&self, db: &str, table: &str) -> Option<&TableDef> {
        self.database(db).and_then(|d| d.tables.get(&key(table)))
    }

    pub fn create_database(&mut self, name: &str, if_not_exists: bool) -> CatalogResult<()> {
        let k = key(name);
        if self.databases.contains_key(&k) {
            if if_not_exists {
                return Ok(());
            }
            return Err(CatalogError::DatabaseExists {
                name: name.to_string(),
            });
        }
        self.databases.insert(k, Database::new(name));
        Ok(())
    }

    pub fn drop_database(&mut self, name: &str, if_exists: bool) -> CatalogResult<()> {
        let k = key(name);
        if self.databases.remove(&k).is_none() {
            if if_exists {
                return Ok(());
            }
            return Err(CatalogError::UnknownDatabase {
                name: name.to_string(),
            });
        }
        if self.current.as_deref() == Some(k.as_str()) {
            self.current = None;
        }
        Ok(())
    }

    pub fn use_database(&mut self, name: &str) -> CatalogResult<()> {
        let k = key(name);
        if !self.databases.contains_key(&k) {
            return Err(CatalogError::UnknownDatabase {
                name: name.to_string(),
            });
        }
        self.current = Some(k);
        Ok(())
    }

    /// Resolve the database a table name refers to. Unqualified names use
    /// the current database.
    pub(crate) fn resolve_database(&self, db: Option<&str>) -> CatalogResult<String> {
        match db {
            Some(name) => {
                let k = key(name);
                if self.databases.contains_key(&k) {
                    Ok(k)
                } else {
                    Err(CatalogError::UnknownDatabase {
                        name: name.to_string(),
                    })
                }
            }
            None => self.current.clone().ok_or(CatalogError::NoDatabaseSelected),
        }
    }

    fn database_mut(&mut self, db_key: &str) -> CatalogResult<&mut Database> {
        self.databases
            .get_mut(db_key)
            .ok_or_else(|| CatalogError::UnknownDatabase {
                name: db_key.to_string(),
            })
    }

    pub(crate) fn create_table(
        &mut self,
        db_key: &str,
        table: TableDef,
        if_not_exists: bool,
    ) -> CatalogResult<()> {
        let database = self.database_mut(db_key)?;
        let k = key(&table.name);
        if database.tables.contains_key(&k) {
            if if_not_exists {
                return Ok(());
            }
            return Err(CatalogError::TableExists { name: table.name });
        }
        database.tables.insert(k, table);
        Ok(())
    }

    pub(crate) fn drop_table(&mut self, db_key: &str, name: &str, if_exists: bool) -> CatalogResult<()> {
        let database = self.database_mut(db_key)?;
        if database.tables.remove(&key(name)).is_none() && !if_exists {
            return Err(CatalogError::UnknownTable {
                name: format!("{}.{}", database.name, name),
            });
        }
        Ok(())
    }

    pub(crate) fn table_mut(&mut self, db_key: &str, name: &str) -> CatalogResult<&mut TableDef> {
        let database = self.database_mut(db_key)?;
        let db_name = database.name.clone();
        database
            .tables
            .get_mut(&key(name))
            .ok_or_else(|| CatalogError::UnknownTable {
                name: format!("{}.{}", db_name, name),
            })
    }

    /// Move a table under a new name, possibly into another database
    pub(crate) fn rename_table(
        &mut self,
        from: (&str, &str),
        to: (&str, &str),
    ) -> CatalogResult<()> {
        if self
            .database_mut(to.0)?
            .tables
            .contains_key(&key(to.1))
        {
            return Err(CatalogError::TableExists {
                name: to.1.to_string(),
            });
        }
        let mut table = {
            let database = self.database_mut(from.0)?;
            let db_name = database.name.clone();
            database
                .tables
                .remove(&key(from.1))
                .ok_or_else(|| CatalogError::UnknownTable {
                    name: format!("{}.{}", db_name, from.1),
                })?
        };
        table.name = to.1.to_string();
        self.database_mut(to.0)?.tables.insert(key(to.1), table);
        Ok(())
    }
}
