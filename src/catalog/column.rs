// Column Definition Module
//
// Catalog-side column definition. Built from a parsed column declaration and
// kept close to what `SHOW CREATE TABLE` would report for the column.

use sqlparser::ast::{self, ColumnOption, DataType, Expr, Ident, Value};

use super::table::IndexKind;

/// A column as tracked by the replay catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name without quoting
    pub name: String,
    /// Declared type, lower-cased (`int(11) unsigned`)
    pub data_type: String,
    /// Literals of an enum/set type, in declaration order
    pub enums: Vec<String>,
    pub nullable: bool,
    /// Default value text; string literals are unquoted
    pub default: Option<String>,
    pub auto_increment: bool,
    pub on_update: bool,
    pub unsigned: bool,
    pub comment: String,
}

impl ColumnDef {
    /// Build a definition from a parsed column declaration. Inline
    /// `PRIMARY KEY`/`UNIQUE` options are returned as index kinds for the
    /// owning table to register.
    pub(crate) fn from_ast(def: &ast::ColumnDef) -> (ColumnDef, Vec<IndexKind>) {
        Self::from_parts(&def.name, &def.data_type, def.options.iter().map(|o| &o.option))
    }

    pub(crate) fn from_parts<'a>(
        name: &Ident,
        data_type: &DataType,
        options: impl IntoIterator<Item = &'a ColumnOption>,
    ) -> (ColumnDef, Vec<IndexKind>) {
        let declared = data_type.to_string();
        let lowered = declared.to_lowercase();

        let mut column = ColumnDef {
            name: name.value.clone(),
            unsigned: lowered.contains(" unsigned"),
            enums: enum_literals(&declared),
            data_type: lowered,
            nullable: true,
            default: None,
            auto_increment: false,
            on_update: false,
            comment: String::new(),
        };
        let mut keys = Vec::new();

        for option in options {
            match option {
                ColumnOption::Null => column.nullable = true,
                ColumnOption::NotNull => column.nullable = false,
                ColumnOption::Default(expr) => column.default = default_text(expr),
                ColumnOption::Unique { is_primary, .. } => {
                    keys.push(if *is_primary {
                        IndexKind::Primary
                    } else {
                        IndexKind::Unique
                    });
                }
                ColumnOption::Comment(text) => column.comment = text.clone(),
                ColumnOption::OnUpdate(_) => column.on_update = true,
                // AUTO_INCREMENT is a dialect-specific option
                other => {
                    if other.to_string().to_uppercase().contains("AUTO_INCREMENT") {
                        column.auto_increment = true;
                    }
                }
            }
        }

        (column, keys)
    }
}

fn default_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Value(Value::Null) => None,
        Expr::Value(Value::SingleQuotedString(s)) | Expr::Value(Value::DoubleQuotedString(s)) => {
            Some(s.clone())
        }
        other => Some(other.to_string()),
    }
}

/// Quoted literals of `ENUM('a', 'b')` or `SET(...)`; empty for other types
fn enum_literals(declared: &str) -> Vec<String> {
    let lowered = declared.trim_start().to_lowercase();
    if !(lowered.starts_with("enum") || lowered.starts_with("set")) {
        return Vec::new();
    }
    let Some(open) = declared.find('(') else {
        return Vec::new();
    };

    let mut literals = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = declared[open + 1..].chars().peekable();
    while let Some(ch) = chars.next() {
        let Some(lit) = current.as_mut() else {
            match ch {
                '\'' => current = Some(String::new()),
                ')' => break,
                _ => {}
            }
            continue;
        };
        match ch {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    lit.push(escaped);
                }
            }
            // '' inside a literal is an escaped quote
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                lit.push('\'');
            }
            '\'' => {
                literals.push(std::mem::take(lit));
                current = None;
            }
            other => lit.push(other),
        }
    }
    literals
}
