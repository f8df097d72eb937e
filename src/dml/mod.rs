//! DML Module
//!
//! Templating of SELECT/INSERT/UPDATE/DELETE statements, WHERE rendering from
//! column values, comment annotations and named parameter binding.

pub mod column_value;
pub mod comments;
pub mod named;
pub mod template;
pub mod value;

pub use column_value::{ColumnValue, ColumnValues};
pub use comments::{extract_comments, parse_metas, Meta, META_ATTRIBUTE_REQUIRED};
pub use named::{explain_named_sql, mysql_real_escape_string};
pub use template::{
    default_placeholders, parse_sql, Placeholder, PlaceholderKind, SqlTemplate,
    PLACEHOLDER_SET_COLUMN, PLACEHOLDER_SET_VALUE, PLACEHOLDER_VALUES_COLUMN,
    PLACEHOLDER_VALUES_VALUE, PLACEHOLDER_WHERE_COLUMN, PLACEHOLDER_WHERE_VALUE,
};
pub use value::{Operator, Value};
