//! Schema Model Module
//!
//! Tables, columns and key constraints as produced by DDL parsing, plus the
//! identifier newtypes and helpers derived from them.

pub mod column;
pub mod constraint;
pub mod data_type;
pub mod enums;
pub mod ident;
pub mod table;

pub use self::column::{Column, Columns};
pub use self::constraint::{Constraint, ConstraintKind, Constraints};
pub use self::data_type::{map_mysql_type, GeneralType};
pub use self::enums::{parse_enums, Enum, Enums};
pub use self::ident::{to_column_names, ColumnName, DbName, TableName};
pub use self::table::{Table, Tables};
