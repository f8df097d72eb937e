// Alter Table
//
// Applies the operations of an `ALTER TABLE` statement to a catalog table:
// column add/drop/rename/change/modify, index changes and table renames.

use log::debug;
use sqlparser::ast::{AlterTableOperation, ObjectName};

use super::column::ColumnDef;
use super::error::CatalogResult;
use super::replay::{constraint_index, split_object_name};
use super::Catalog;

impl Catalog {
    /// Apply the operations of one `ALTER TABLE` statement in order
    pub(crate) fn alter_table(
        &mut self,
        name: &ObjectName,
        operations: &[AlterTableOperation],
    ) -> CatalogResult<()> {
        let (db, table_name) = split_object_name(name);
        let mut db_key = self.resolve_database(db.as_deref())?;
        let mut table_name = table_name;

        for operation in operations {
            match operation {
                AlterTableOperation::AddColumn { column_def, .. } => {
                    let (column, keys) = ColumnDef::from_ast(column_def);
                    let column_name = column.name.clone();
                    let table = self.table_mut(&db_key, &table_name)?;
                    table.add_column(column)?;
                    for kind in keys {
                        table.add_index(kind, vec![column_name.clone()])?;
                    }
                }
                AlterTableOperation::DropColumn { column_name, .. } => {
                    self.table_mut(&db_key, &table_name)?
                        .drop_column(&column_name.value)?;
                }
                AlterTableOperation::RenameColumn {
                    old_column_name,
                    new_column_name,
                } => {
                    self.table_mut(&db_key, &table_name)?
                        .rename_column(&old_column_name.value, &new_column_name.value)?;
                }
                AlterTableOperation::ChangeColumn {
                    old_name,
                    new_name,
                    data_type,
                    options,
                    ..
                } => {
                    let (column, keys) = ColumnDef::from_parts(new_name, data_type, options);
                    let table = self.table_mut(&db_key, &table_name)?;
                    table.replace_column(&old_name.value, column)?;
                    for kind in keys {
                        table.add_index(kind, vec![new_name.value.clone()])?;
                    }
                }
                AlterTableOperation::ModifyColumn {
                    col_name,
                    data_type,
                    options,
                    ..
                } => {
                    let (column, keys) = ColumnDef::from_parts(col_name, data_type, options);
                    let table = self.table_mut(&db_key, &table_name)?;
                    table.replace_column(&col_name.value, column)?;
                    for kind in keys {
                        table.add_index(kind, vec![col_name.value.clone()])?;
                    }
                }
                AlterTableOperation::AddConstraint(constraint) => {
                    if let Some((kind, columns)) = constraint_index(constraint) {
                        self.table_mut(&db_key, &table_name)?
                            .add_index(kind, columns)?;
                    }
                }
                AlterTableOperation::DropPrimaryKey => {
                    self.table_mut(&db_key, &table_name)?.drop_primary_key();
                }
                AlterTableOperation::RenameTable { table_name: new_name } => {
                    let (new_db, new_table) = split_object_name(new_name);
                    let new_db_key = match new_db {
                        Some(_) => self.resolve_database(new_db.as_deref())?,
                        None => db_key.clone(),
                    };
                    self.rename_table((&db_key, &table_name), (&new_db_key, &new_table))?;
                    db_key = new_db_key;
                    table_name = new_table;
                }
                other => {
                    debug!("alter table {}: skipping operation {}", table_name, other);
                }
            }
        }
        Ok(())
    }
}
