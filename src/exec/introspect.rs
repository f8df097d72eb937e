// Schema Introspection
//
// Reads the DDL of the database a connection is bound to, optionally
// through an on-disk cache so repeated startups skip the round trips.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{Connection, Row};
use crate::error::{Result, SqlKitError};

pub fn create_database_sql(db: &str) -> String {
    format!(
        "CREATE DATABASE `{}` CHARACTER SET utf8mb4 COLLATE utf8mb4_general_ci",
        db
    )
}

/// DDL cache rooted at `dir`; one file per database at `<dir>/ddl/<db>.sql`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlCache {
    dir: PathBuf,
}

impl DdlCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DdlCache { dir: dir.into() }
    }

    pub fn path(&self, db: &str) -> PathBuf {
        self.dir.join("ddl").join(format!("{}.sql", db))
    }

    /// Cached DDL of `db`. A missing or empty file is a miss.
    pub fn load(&self, db: &str) -> Result<Option<String>> {
        let path = self.path(db);
        if !path.exists() {
            return Ok(None);
        }
        let ddl = fs::read_to_string(&path)?;
        Ok(if ddl.trim().is_empty() { None } else { Some(ddl) })
    }

    pub fn store(&self, db: &str, ddl: &str) -> Result<()> {
        let path = self.path(db);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, ddl)?;
        debug!("stored ddl cache {}", path.display());
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// DDL of the current database: a create-database statement followed by
/// `SHOW CREATE TABLE` output for every table, each ended by `;\n`.
pub fn get_ddl(conn: &dyn Connection, cache: Option<&DdlCache>) -> Result<String> {
    let db = current_database(conn)?;

    if let Some(cache) = cache {
        if let Some(ddl) = cache.load(&db)? {
            debug!("using cached ddl for database {}", db);
            return Ok(ddl);
        }
    }

    let mut statements = vec![create_database_sql(&db)];
    for table in table_names(conn)? {
        let sql = format!("SHOW CREATE TABLE `{}`.`{}`", db, table);
        let create = first_row(conn, &sql)?
            .and_then(|row| row.values().nth(1).cloned().flatten())
            .ok_or_else(|| SqlKitError::Connection(format!("no result for {}", sql)))?;
        statements.push(create);
    }
    info!("loaded {} tables of database {}", statements.len() - 1, db);

    let ddl = format!("{};\n", statements.join(";\n"));
    if let Some(cache) = cache {
        cache.store(&db, &ddl)?;
    }
    Ok(ddl)
}

fn current_database(conn: &dyn Connection) -> Result<String> {
    first_row(conn, "SELECT DATABASE()")?
        .and_then(|row| row.values().next().cloned().flatten())
        .filter(|db| !db.is_empty())
        .ok_or_else(|| SqlKitError::Connection("no database selected".to_string()))
}

fn table_names(conn: &dyn Connection) -> Result<Vec<String>> {
    let sets = conn.query("SHOW TABLES")?;
    Ok(sets
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|row| row.values().next().cloned().flatten())
        .collect())
}

fn first_row(conn: &dyn Connection, sql: &str) -> Result<Option<Row>> {
    Ok(conn
        .query(sql)?
        .into_iter()
        .next()
        .and_then(|rows| rows.into_iter().next()))
}
