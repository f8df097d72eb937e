// Error Types
//
// Every fallible operation in the crate returns `SqlKitError`. Variants carry
// the identifying context (table, column, database, offending SQL) needed to
// locate the problem in the input.

use sqlparser::parser::ParserError;
use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Error, Debug)]
pub enum SqlKitError {
    #[error("parse error: {source}; sql: {sql}")]
    Parse {
        sql: String,
        #[source]
        source: ParserError,
    },

    #[error("replay failed, db: {database}, ddl: {sql}: {source}")]
    Replay {
        database: String,
        sql: String,
        #[source]
        source: CatalogError,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("not found primary key, table: {table}")]
    NotFoundPrimaryKey { table: String },

    #[error("not found column {column} in table {table}")]
    NotFoundColumn { table: String, column: String },

    #[error("not found table: {0}")]
    NotFoundTable(String),

    #[error("mysql type {db_type} has no general type mapping")]
    UnmappedType { db_type: String },

    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("empty list value for column {0}")]
    EmptyList(String),

    #[error("bind variable not found: {0}")]
    BindVariableNotFound(String),

    #[error("column {column}(enum) comment expects {value}-xxx, got: {comment}")]
    EnumComment {
        column: String,
        value: String,
        comment: String,
    },

    #[error("unable to extract database name from DSN: {0}")]
    InvalidDsn(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SqlKitError {
    pub(crate) fn parse(sql: &str, source: ParserError) -> Self {
        SqlKitError::Parse {
            sql: sql.to_string(),
            source,
        }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SqlKitError>;
