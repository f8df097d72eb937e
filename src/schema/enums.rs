// Enum Extractor
//
// Derives named constants for enum/set columns from the column comment.
// The comment lists `value-title` pairs separated by commas or spaces, e.g.
// `status enum('1','2') comment '1-Active,2-Inactive'`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::column::Column;
use crate::error::{Result, SqlKitError};

const ENUM_KIND_STRING: &str = "string";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    /// Constant name, `TABLE_COLUMN_VALUE`
    pub key: String,
    pub value: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enums(Vec<Enum>);

impl Enums {
    pub fn new() -> Self {
        Enums(Vec::new())
    }

    pub fn push(&mut self, item: Enum) {
        self.0.push(item);
    }

    pub fn extend(&mut self, other: Enums) {
        self.0.extend(other.0);
    }

    /// Deduplicate by key (last one wins), sorted by key
    pub fn unique_items(&self) -> Enums {
        let mut by_key: BTreeMap<&str, &Enum> = BTreeMap::new();
        for item in &self.0 {
            by_key.insert(item.key.as_str(), item);
        }
        Enums(by_key.into_values().cloned().collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Enum> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Enums {
    type Item = &'a Enum;
    type IntoIter = std::slice::Iter<'a, Enum>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

static KEY_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z]+").expect("key gap pattern"));

/// Upper-case and collapse every run of non-alphanumeric characters into `_`
fn constant_key(raw: &str) -> String {
    KEY_GAP.replace_all(raw, "_").to_ascii_uppercase()
}

/// Build the enum constants of `column`. A column without enum literals
/// yields an empty list.
///
/// Every literal must have a `value-` anchor in the comment, a missing one
/// is reported as [`SqlKitError::EnumComment`].
pub fn parse_enums(column: &Column) -> Result<Enums> {
    let prefix = format!("{}_{}", column.table_name.base(), column.column_name.base());
    let comment = column.comment.replace(' ', ",");

    let mut enums = Enums::new();
    for value in &column.enums {
        let anchor = format!("{}-", value);
        let start = comment
            .find(&anchor)
            .ok_or_else(|| SqlKitError::EnumComment {
                column: column.column_name.to_string(),
                value: value.clone(),
                comment: comment.clone(),
            })?;

        let rest = &comment[start + anchor.len()..];
        let title = match rest.find(',') {
            Some(end) => &rest[..end],
            None => rest.trim_end_matches([' ', ')']),
        };

        enums.push(Enum {
            key: constant_key(&format!("{}_{}", prefix, value)),
            value: value.clone(),
            title: title.to_string(),
            kind: ENUM_KIND_STRING.to_string(),
        });
    }
    Ok(enums)
}
