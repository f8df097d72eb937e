// Catalog to Schema Conversion
//
// Turns replayed catalog definitions into the schema model.

use crate::catalog::{IndexKind, TableDef};
use crate::error::Result;
use crate::schema::{
    map_mysql_type, to_column_names, Column, ColumnName, ConstraintKind, DbName, Table, TableName,
};

/// Convert one catalog table of database `db`. Primary and unique indices
/// become constraints and mark their columns; plain indices are ignored.
pub fn convert_table(db: &str, def: &TableDef) -> Result<Table> {
    let db_name = DbName::from(db);
    let table_name = TableName::from(def.name.as_str());
    let mut table = Table::new(db_name.clone(), table_name.clone());
    table.comment = def.comment.clone();

    for index in &def.indices {
        let kind = match index.kind {
            IndexKind::Primary => ConstraintKind::Primary,
            IndexKind::Unique => ConstraintKind::Unique,
            IndexKind::Index => continue,
        };
        table.constraints.add(kind, &to_column_names(&index.columns));
    }

    for column_def in &def.columns {
        let (general_type, size) = map_mysql_type(&column_def.data_type)?;
        let column_name = ColumnName::from(column_def.name.as_str());
        let single = [column_name.clone()];

        table.columns.push(Column {
            db_name: db_name.clone(),
            table_name: table_name.clone(),
            primary_key: table.constraints.is_primary_key_part(&single),
            unique_key: table.constraints.is_unique_key_part(&single),
            column_name,
            db_type: column_def.data_type.clone(),
            general_type,
            comment: column_def.comment.clone(),
            size,
            nullable: column_def.nullable,
            enums: column_def.enums.clone(),
            auto_increment: column_def.auto_increment,
            default_value: column_def.default.clone().unwrap_or_default(),
            on_update: column_def.on_update,
            unsigned: column_def.unsigned,
        });
    }

    Ok(table)
}
