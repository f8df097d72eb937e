// Identifier Model
//
// Newtypes for database, table and column names. Names may arrive quoted
// with backticks and qualified with dots (`db`.`table`.`column`); comparison
// and decomposition always work on the unquoted form and ignore case.

use std::fmt;

use serde::{Deserialize, Serialize};

const QUOTE: char = '`';

fn unquote(name: &str) -> String {
    name.replace(QUOTE, "")
}

fn fold_eq(a: &str, b: &str) -> bool {
    unquote(a).eq_ignore_ascii_case(&unquote(b))
}

/// Database name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbName(String);

impl DbName {
    pub fn new(name: impl Into<String>) -> Self {
        DbName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name without quoting
    pub fn base(&self) -> String {
        unquote(&self.0)
    }

    /// Case-insensitive comparison ignoring backtick quoting
    pub fn eq_fold(&self, other: &DbName) -> bool {
        fold_eq(&self.0, &other.0)
    }
}

/// Table name, optionally qualified as `db.table`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        TableName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(db, table)`. A name without a qualifier leaves `db` empty.
    pub fn explain(&self) -> (String, String) {
        let plain = unquote(&self.0);
        let parts: Vec<&str> = plain.split('.').collect();
        match parts.as_slice() {
            [db, table] => (db.to_string(), table.to_string()),
            _ => (String::new(), plain),
        }
    }

    pub fn base(&self) -> String {
        self.explain().1
    }

    pub fn eq_fold(&self, other: &TableName) -> bool {
        fold_eq(&self.0, &other.0)
    }
}

/// Column name, optionally qualified as `table.column` or `db.table.column`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(db, table, column)`; missing outer parts are empty.
    ///
    /// Names with more than three dot-separated parts are not qualified
    /// names, the whole unquoted text is returned as the column.
    pub fn explain(&self) -> (String, String, String) {
        let plain = unquote(&self.0);
        let parts: Vec<&str> = plain.split('.').collect();
        match parts.as_slice() {
            [column] => (String::new(), String::new(), column.to_string()),
            [table, column] => (String::new(), table.to_string(), column.to_string()),
            [db, table, column] => (db.to_string(), table.to_string(), column.to_string()),
            _ => (String::new(), String::new(), plain),
        }
    }

    pub fn base(&self) -> String {
        self.explain().2
    }

    pub fn eq_fold(&self, other: &ColumnName) -> bool {
        fold_eq(&self.0, &other.0)
    }
}

macro_rules! impl_name_conversions {
    ($($name:ident),*) => {
        $(
            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    $name(s.to_string())
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    $name(s)
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

impl_name_conversions!(DbName, TableName, ColumnName);

/// Convert plain strings into column names
pub fn to_column_names<S: AsRef<str>>(names: &[S]) -> Vec<ColumnName> {
    names.iter().map(|n| ColumnName::new(n.as_ref())).collect()
}
