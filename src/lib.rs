// SqlKit: MySQL schema model and DML templating

pub mod catalog;
pub mod ddl;
pub mod dml;
pub mod error;
pub mod exec;
pub mod registry;
pub mod schema;

// Re-export key items for convenient access
pub use catalog::{Catalog, CatalogError};
pub use ddl::{parse_ddl, split_statements, try_exec_ddls};
pub use dml::{explain_named_sql, parse_sql, ColumnValue, ColumnValues, Operator, SqlTemplate, Value};
pub use error::{Result, SqlKitError};
pub use exec::{exec_or_query, get_ddl, Connection, DbConfig, DdlCache};
pub use registry::TableRegistry;
pub use schema::{parse_enums, Column, ColumnName, DbName, Enums, Table, TableName, Tables};
