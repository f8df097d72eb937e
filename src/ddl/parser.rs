// DDL Parser
//
// Replays a DDL batch into a fresh catalog and converts the result into the
// schema model. A statement that fails because its database does not exist,
// or because no database is selected yet, is repaired once and retried.

use log::{debug, warn};

use super::convert::convert_table;
use super::splitter::split_statements;
use crate::catalog::{Catalog, CatalogError};
use crate::error::{Result, SqlKitError};
use crate::schema::Tables;

/// Parse a DDL batch into tables sorted by `` `db`.`table` ``
pub fn parse_ddl(ddls: &str) -> Result<Tables> {
    let catalog = try_exec_ddls(ddls)?;
    let tables = catalog_tables(&catalog)?;
    debug!("parsed {} tables from ddl", tables.len());
    Ok(tables)
}

/// Replay every statement of `ddls` into a new catalog
pub fn try_exec_ddls(ddls: &str) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    replay_ddls(&mut catalog, ddls)?;
    Ok(catalog)
}

/// Replay every statement of `ddls` into an existing catalog. Statements
/// before a failing one stay applied.
pub fn replay_ddls(catalog: &mut Catalog, ddls: &str) -> Result<()> {
    for sql in split_statements(ddls) {
        replay(catalog, &sql)?;
    }
    Ok(())
}

/// Every table of `catalog`, sorted by `` `db`.`table` ``
pub fn catalog_tables(catalog: &Catalog) -> Result<Tables> {
    let mut tables = Tables::new();
    for database in catalog.databases() {
        for def in database.tables() {
            tables.push(convert_table(database.name(), def)?);
        }
    }
    tables.sort();
    Ok(tables)
}

fn replay(catalog: &mut Catalog, sql: &str) -> Result<()> {
    let err = match catalog.exec(sql) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    let retried = match &err {
        CatalogError::UnknownDatabase { name } => {
            debug!("replay: creating missing database `{}`", name);
            catalog
                .create_database(name, true)
                .and_then(|_| catalog.use_database(name))
                .and_then(|_| catalog.exec(sql))
        }
        CatalogError::NoDatabaseSelected => match catalog.first_database().map(str::to_string) {
            Some(first) => {
                debug!("replay: no database selected, using `{}`", first);
                catalog.use_database(&first).and_then(|_| catalog.exec(sql))
            }
            None => Err(err.clone()),
        },
        _ => Err(err.clone()),
    };

    retried.map_err(|source| {
        let database = catalog.current_database().unwrap_or_default().to_string();
        warn!("replay failed, db: {}, ddl: {}: {}", database, sql, source);
        SqlKitError::Replay {
            database,
            sql: sql.to_string(),
            source,
        }
    })
}
