// Column Model
//
// A column as it comes out of DDL parsing. Columns are owned by their table
// and keep DDL declaration order.

use serde::{Deserialize, Serialize};

use super::data_type::GeneralType;
use super::ident::{ColumnName, DbName, TableName};
use crate::error::{Result, SqlKitError};

const DEFAULT_VALUE_CURRENT_TIMESTAMP: &str = "current_timestamp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub db_name: DbName,
    pub table_name: TableName,
    pub column_name: ColumnName,
    /// Native type as declared, lower-cased (`varchar(64)`)
    pub db_type: String,
    pub general_type: GeneralType,
    pub comment: String,
    pub size: usize,
    pub nullable: bool,
    /// Literal list of enum/set types; empty otherwise
    pub enums: Vec<String>,
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique_key: bool,
    pub default_value: String,
    pub on_update: bool,
    pub unsigned: bool,
}

impl Column {
    /// `db.table.column`, skipping empty qualifiers
    pub fn full_name(&self) -> String {
        let name = format!("{}.{}.{}", self.db_name, self.table_name, self.column_name);
        name.trim_matches('.').to_string()
    }

    /// `db.table`, skipping an empty database
    pub fn table_full_name(&self) -> String {
        let name = format!("{}.{}", self.db_name, self.table_name);
        name.trim_matches('.').to_string()
    }

    /// Whether the default is filled in by the server with the current time.
    /// `CURRENT_TIMESTAMP` and `current_timestamp()` both count.
    pub fn is_default_current_timestamp(&self) -> bool {
        self.default_value
            .to_lowercase()
            .contains(DEFAULT_VALUE_CURRENT_TIMESTAMP)
    }
}

/// Ordered column list of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Columns(Vec<Column>);

impl Columns {
    pub fn new() -> Self {
        Columns(Vec::new())
    }

    pub fn push(&mut self, column: Column) {
        self.0.push(column);
    }

    pub fn first(&self) -> Option<&Column> {
        self.0.first()
    }

    pub fn get_by_name(&self, name: &ColumnName) -> Option<&Column> {
        self.0.iter().find(|c| c.column_name.eq_fold(name))
    }

    /// Resolve `names` in the order given. Fails on the first name that is
    /// not a column of this list.
    pub fn get_by_names(&self, names: &[ColumnName]) -> Result<Columns> {
        let mut columns = Columns::new();
        for name in names {
            match self.get_by_name(name) {
                Some(column) => columns.push(column.clone()),
                None => {
                    let table = self
                        .first()
                        .map(|c| c.table_name.to_string())
                        .unwrap_or_default();
                    return Err(SqlKitError::NotFoundColumn {
                        table,
                        column: name.to_string(),
                    });
                }
            }
        }
        Ok(columns)
    }

    pub fn names(&self) -> Vec<ColumnName> {
        self.0.iter().map(|c| c.column_name.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Column>> for Columns {
    fn from(columns: Vec<Column>) -> Self {
        Columns(columns)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
pub(crate) fn test_column(table: &str, name: &str, db_type: &str) -> Column {
    let (general_type, size) = super::data_type::map_mysql_type(db_type).unwrap();
    Column {
        db_name: DbName::from("test"),
        table_name: TableName::from(table),
        column_name: ColumnName::from(name),
        db_type: db_type.to_string(),
        general_type,
        comment: String::new(),
        size,
        nullable: true,
        enums: Vec::new(),
        auto_increment: false,
        primary_key: false,
        unique_key: false,
        default_value: String::new(),
        on_update: false,
        unsigned: false,
    }
}
