use sqlparser::parser::ParserError;
use thiserror::Error;

/// Errors raised while replaying DDL into the catalog. Each carries the
/// MySQL server error code it mirrors, see [`CatalogError::code`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Error 1049: Unknown database '{name}'")]
    UnknownDatabase { name: String },
    #[error("Error 1046: No database selected")]
    NoDatabaseSelected,
    #[error("Error 1007: Can't create database '{name}'; database exists")]
    DatabaseExists { name: String },
    #[error("Error 1050: Table '{name}' already exists")]
    TableExists { name: String },
    #[error("Error 1051: Unknown table '{name}'")]
    UnknownTable { name: String },
    #[error("Error 1054: Unknown column '{column}' in '{table}'")]
    UnknownColumn { table: String, column: String },
    #[error("Error 1060: Duplicate column name '{name}'")]
    DuplicateColumn { name: String },
    #[error("Error 1068: Multiple primary key defined")]
    MultiplePrimaryKey,
    #[error("Error 1064: {source}")]
    Parse {
        sql: String,
        #[source]
        source: ParserError,
    },
}

impl CatalogError {
    /// MySQL error number of this error
    pub fn code(&self) -> u16 {
        match self {
            CatalogError::UnknownDatabase { .. } => 1049,
            CatalogError::NoDatabaseSelected => 1046,
            CatalogError::DatabaseExists { .. } => 1007,
            CatalogError::TableExists { .. } => 1050,
            CatalogError::UnknownTable { .. } => 1051,
            CatalogError::UnknownColumn { .. } => 1054,
            CatalogError::DuplicateColumn { .. } => 1060,
            CatalogError::MultiplePrimaryKey => 1068,
            CatalogError::Parse { .. } => 1064,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
