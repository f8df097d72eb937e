// Table Model
//
// A table snapshot produced by DDL parsing: its columns in declaration order
// plus primary/unique constraints.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::Columns;
use super::constraint::{ConstraintKind, Constraints};
use super::ident::{DbName, TableName};
use crate::error::{Result, SqlKitError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub db_name: DbName,
    pub table_name: TableName,
    pub columns: Columns,
    pub comment: String,
    pub constraints: Constraints,
}

impl Table {
    pub fn new(db_name: DbName, table_name: TableName) -> Self {
        Table {
            db_name,
            table_name,
            columns: Columns::new(),
            comment: String::new(),
            constraints: Constraints::new(),
        }
    }

    /// `` `db`.`table` ``
    pub fn full_name(&self) -> String {
        format!("`{}`.`{}`", self.db_name.base(), self.table_name.base())
    }

    /// Columns of the primary key, in constraint order. Every table is
    /// expected to declare one.
    pub fn primary_key(&self) -> Result<Columns> {
        let constraint = self
            .constraints
            .get_by_kind(ConstraintKind::Primary)
            .ok_or_else(|| SqlKitError::NotFoundPrimaryKey {
                table: self.table_name.to_string(),
            })?;
        self.resolve(&constraint.column_names)
    }

    /// Columns of the unique key in constraint order, empty when the table
    /// declares none.
    pub fn unique_key(&self) -> Result<Columns> {
        match self.constraints.get_by_kind(ConstraintKind::Unique) {
            Some(constraint) => self.resolve(&constraint.column_names),
            None => Ok(Columns::new()),
        }
    }

    fn resolve(&self, names: &[super::ident::ColumnName]) -> Result<Columns> {
        self.columns.get_by_names(names).map_err(|err| match err {
            SqlKitError::NotFoundColumn { column, .. } => SqlKitError::NotFoundColumn {
                table: self.table_name.to_string(),
                column,
            },
            other => other,
        })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A list of tables, usually sorted by full name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tables(Vec<Table>);

impl Tables {
    pub fn new() -> Self {
        Tables(Vec::new())
    }

    pub fn push(&mut self, table: Table) {
        self.0.push(table);
    }

    pub fn sort(&mut self) {
        self.0.sort_by_key(|t| t.full_name());
    }

    /// Group the tables by their database, keeping list order inside a group
    pub fn group_by_db_name(&self) -> BTreeMap<DbName, Tables> {
        let mut groups: BTreeMap<DbName, Tables> = BTreeMap::new();
        for table in &self.0 {
            groups
                .entry(table.db_name.clone())
                .or_default()
                .push(table.clone());
        }
        groups
    }

    pub fn get(&self, db: &DbName, name: &TableName) -> Option<&Table> {
        self.0
            .iter()
            .find(|t| t.db_name.eq_fold(db) && t.table_name.eq_fold(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Tables {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tables {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
