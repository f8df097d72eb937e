//! Execution Module
//!
//! Runs statements through a caller-provided [`Connection`] and shapes the
//! results as text, plus schema introspection of a live database.

pub mod config;
pub mod introspect;

use std::time::Instant;

use linked_hash_map::LinkedHashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use sqlparser::ast::Statement;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use crate::error::{Result, SqlKitError};

pub use config::{db_name_from_dsn, DbConfig};
pub use introspect::{create_database_sql, get_ddl, DdlCache};

/// One result row, column name to value in select-list order
pub type Row = LinkedHashMap<String, Option<String>>;

/// Rows of one result set
pub type ResultSet = Vec<Row>;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// A live database handle. Implementations map driver failures to
/// [`SqlKitError::Connection`].
pub trait Connection {
    /// Run a query and return every result set it produced
    fn query(&self, sql: &str) -> Result<Vec<ResultSet>>;

    fn exec(&self, sql: &str) -> Result<ExecResult>;
}

/// Run `sql` and render the outcome as text:
///
/// * SELECT: `""` when there are no rows, the bare value for a single
///   row with a single column, otherwise JSON (an array of row objects, or
///   an array of such arrays when several result sets came back)
/// * UPDATE/DELETE: the affected row count
/// * INSERT: JSON array of the generated ids
/// * anything else: executed, empty output
pub fn exec_or_query(conn: &dyn Connection, sql: &str) -> Result<String> {
    let dialect = MySqlDialect {};
    let statement = Parser::parse_sql(&dialect, sql)
        .map_err(|source| SqlKitError::parse(sql, source))?
        .into_iter()
        .next()
        .ok_or_else(|| SqlKitError::UnsupportedStatement("empty statement".to_string()))?;

    let start = Instant::now();
    let out = match statement {
        Statement::Query(_) => shape_result_sets(conn.query(sql)?)?,
        Statement::Update { .. } | Statement::Delete(_) => conn.exec(sql)?.rows_affected.to_string(),
        Statement::Insert(_) => {
            let result = conn.exec(sql)?;
            let ids: Vec<String> = (0..result.rows_affected)
                .map(|i| (result.last_insert_id + i).to_string())
                .collect();
            serde_json::to_string(&ids)?
        }
        _ => {
            conn.exec(sql)?;
            String::new()
        }
    };
    debug!("sql: {} elapsed: {:?} result: {}", sql, start.elapsed(), out);
    Ok(out)
}

fn shape_result_sets(mut sets: Vec<ResultSet>) -> Result<String> {
    if sets.len() > 1 {
        let all: Vec<Vec<JsonValue>> = sets
            .iter()
            .map(|set| set.iter().map(row_json).collect())
            .collect();
        return Ok(serde_json::to_string(&all)?);
    }

    let Some(rows) = sets.pop() else {
        return Ok(String::new());
    };
    match rows.as_slice() {
        [] => Ok(String::new()),
        [row] if row.len() == 1 => Ok(row
            .values()
            .next()
            .cloned()
            .flatten()
            .unwrap_or_default()),
        _ => {
            let json: Vec<JsonValue> = rows.iter().map(row_json).collect();
            Ok(serde_json::to_string(&json)?)
        }
    }
}

fn row_json(row: &Row) -> JsonValue {
    let object: Map<String, JsonValue> = row
        .iter()
        .map(|(column, value)| {
            let value = value.clone().map(JsonValue::String).unwrap_or(JsonValue::Null);
            (column.clone(), value)
        })
        .collect();
    JsonValue::Object(object)
}
