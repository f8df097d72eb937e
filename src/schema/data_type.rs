// General Type Mapping
//
// MySQL native column types are folded into a small set of general-purpose
// categories through a fixed lookup table.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlKitError};

/// General-purpose type category of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneralType {
    Int,
    Bool,
    String,
    Time,
    Float,
}

impl GeneralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneralType::Int => "int",
            GeneralType::Bool => "bool",
            GeneralType::String => "string",
            GeneralType::Time => "time",
            GeneralType::Float => "float",
        }
    }
}

impl fmt::Display for GeneralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MYSQL_TYPES: Lazy<HashMap<&'static str, GeneralType>> = Lazy::new(|| {
    use GeneralType::*;
    HashMap::from([
        ("int", Int),
        ("integer", Int),
        ("tinyint", Int),
        ("smallint", Int),
        ("mediumint", Int),
        ("bigint", Int),
        ("bit", Int),
        ("year", Int),
        ("bool", Bool),
        ("boolean", Bool),
        ("enum", String),
        ("set", String),
        ("varchar", String),
        ("char", String),
        ("tinytext", String),
        ("mediumtext", String),
        ("text", String),
        ("longtext", String),
        ("blob", String),
        ("tinyblob", String),
        ("mediumblob", String),
        ("longblob", String),
        ("binary", String),
        ("varbinary", String),
        ("json", String),
        ("date", Time),
        ("datetime", Time),
        ("timestamp", Time),
        ("time", Time),
        ("float", Float),
        ("double", Float),
        ("real", Float),
        ("decimal", Float),
        ("numeric", Float),
    ])
});

const TYPE_MODIFIERS: [&str; 3] = ["unsigned", "signed", "zerofill"];

/// Map a native MySQL type string (e.g. `varchar(255)`, `int(11) unsigned`)
/// to its general type and declared size.
///
/// Size is the first integer inside the parentheses; no parentheses or a
/// non-numeric argument list gives zero.
pub fn map_mysql_type(db_type: &str) -> Result<(GeneralType, usize)> {
    let lowered = db_type.trim().to_lowercase();
    let (head, size) = match lowered.find('(') {
        Some(open) => {
            let args = match lowered[open..].find(')') {
                Some(close) => &lowered[open + 1..open + close],
                None => "",
            };
            let size = args
                .split(',')
                .next()
                .and_then(|n| n.trim().parse::<usize>().ok())
                .unwrap_or(0);
            (&lowered[..open], size)
        }
        None => (lowered.as_str(), 0),
    };

    let base = head
        .split_whitespace()
        .filter(|word| !TYPE_MODIFIERS.contains(word))
        .collect::<Vec<_>>()
        .join(" ");

    match MYSQL_TYPES.get(base.as_str()) {
        Some(general) => Ok((*general, size)),
        None => Err(SqlKitError::UnmappedType {
            db_type: db_type.to_string(),
        }),
    }
}
