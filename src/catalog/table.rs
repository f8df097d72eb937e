//! Table Definition Module
//!
//! Catalog-side table definition: ordered columns plus key indices, with the
//! mutations ALTER TABLE can apply.

use super::column::ColumnDef;
use super::error::{CatalogError, CatalogResult};

/// Key class of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDef {
    pub kind: IndexKind,
    /// Indexed column names in key order
    pub columns: Vec<String>,
}

/// A table as tracked by the replay catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub indices: Vec<IndexDef>,
    pub comment: String,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        TableDef {
            name: name.into(),
            columns: Vec::new(),
            indices: Vec::new(),
            comment: String::new(),
        }
    }

    /// Get a column by name, ignoring case
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn primary_key(&self) -> Option<&IndexDef> {
        self.indices.iter().find(|i| i.kind == IndexKind::Primary)
    }

    pub(crate) fn add_column(&mut self, column: ColumnDef) -> CatalogResult<()> {
        if self.column(&column.name).is_some() {
            return Err(CatalogError::DuplicateColumn { name: column.name });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Drop a column and remove it from every index; indices left without
    /// columns are dropped too.
    pub(crate) fn drop_column(&mut self, name: &str) -> CatalogResult<()> {
        let pos = self.column_position(name).ok_or_else(|| self.unknown_column(name))?;
        self.columns.remove(pos);
        for index in &mut self.indices {
            index.columns.retain(|c| !c.eq_ignore_ascii_case(name));
        }
        self.indices.retain(|i| !i.columns.is_empty());
        Ok(())
    }

    pub(crate) fn rename_column(&mut self, old: &str, new: &str) -> CatalogResult<()> {
        let pos = self.column_position(old).ok_or_else(|| self.unknown_column(old))?;
        if !old.eq_ignore_ascii_case(new) && self.column(new).is_some() {
            return Err(CatalogError::DuplicateColumn {
                name: new.to_string(),
            });
        }
        self.columns[pos].name = new.to_string();
        for index in &mut self.indices {
            for column in &mut index.columns {
                if column.eq_ignore_ascii_case(old) {
                    *column = new.to_string();
                }
            }
        }
        Ok(())
    }

    /// Replace the definition of `old` in place, keeping its position.
    /// Used by `CHANGE COLUMN` and `MODIFY COLUMN`.
    pub(crate) fn replace_column(&mut self, old: &str, column: ColumnDef) -> CatalogResult<()> {
        let new_name = column.name.clone();
        self.rename_column(old, &new_name)?;
        if let Some(pos) = self.column_position(&new_name) {
            self.columns[pos] = column;
        }
        Ok(())
    }

    /// Register an index over existing columns. A primary key makes its
    /// columns NOT NULL and may only be declared once.
    pub(crate) fn add_index(&mut self, kind: IndexKind, columns: Vec<String>) -> CatalogResult<()> {
        for name in &columns {
            if self.column(name).is_none() {
                return Err(self.unknown_column(name));
            }
        }
        if kind == IndexKind::Primary {
            if self.primary_key().is_some() {
                return Err(CatalogError::MultiplePrimaryKey);
            }
            for column in &mut self.columns {
                if columns.iter().any(|c| c.eq_ignore_ascii_case(&column.name)) {
                    column.nullable = false;
                }
            }
        }
        self.indices.push(IndexDef { kind, columns });
        Ok(())
    }

    pub(crate) fn drop_primary_key(&mut self) {
        self.indices.retain(|i| i.kind != IndexKind::Primary);
    }

    fn unknown_column(&self, column: &str) -> CatalogError {
        CatalogError::UnknownColumn {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }
}
