// Constraint Model
//
// A table keeps at most one constraint per kind. Column names are references
// into the owning table's columns and are resolved on demand.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ident::ColumnName;

/// Kind of key constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Primary,
    Unique,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Primary => write!(f, "primary"),
            ConstraintKind::Unique => write!(f, "unique"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub column_names: Vec<ColumnName>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Constraint {
            kind,
            column_names: Vec::new(),
        }
    }

    /// Append column names not yet present (case-insensitive)
    pub fn add_column_names(&mut self, names: &[ColumnName]) {
        for name in names {
            if !self.contains(name) {
                self.column_names.push(name.clone());
            }
        }
    }

    pub fn contains(&self, name: &ColumnName) -> bool {
        self.column_names.iter().any(|n| n.eq_fold(name))
    }

    /// Whether every name in `names` belongs to this constraint. With `exact`
    /// the name set must also have the same size as the constraint.
    pub fn is_subset(&self, exact: bool, names: &[ColumnName]) -> bool {
        if exact && names.len() != self.column_names.len() {
            return false;
        }
        names.iter().all(|name| self.contains(name))
    }
}

/// The constraints declared on one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(Vec<Constraint>);

impl Constraints {
    pub fn new() -> Self {
        Constraints(Vec::new())
    }

    /// Merge the names into the constraint of `kind`, creating it if absent
    pub fn add(&mut self, kind: ConstraintKind, names: &[ColumnName]) {
        match self.0.iter_mut().find(|c| c.kind == kind) {
            Some(existing) => existing.add_column_names(names),
            None => {
                let mut constraint = Constraint::new(kind);
                constraint.add_column_names(names);
                self.0.push(constraint);
            }
        }
    }

    pub fn get_by_kind(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.0.iter().find(|c| c.kind == kind)
    }

    pub fn is_primary_key_part(&self, names: &[ColumnName]) -> bool {
        self.check(ConstraintKind::Primary, false, names)
    }

    pub fn is_primary_key(&self, names: &[ColumnName]) -> bool {
        self.check(ConstraintKind::Primary, true, names)
    }

    pub fn is_unique_key_part(&self, names: &[ColumnName]) -> bool {
        self.check(ConstraintKind::Unique, false, names)
    }

    pub fn is_unique_key(&self, names: &[ColumnName]) -> bool {
        self.check(ConstraintKind::Unique, true, names)
    }

    fn check(&self, kind: ConstraintKind, exact: bool, names: &[ColumnName]) -> bool {
        self.get_by_kind(kind)
            .map(|c| c.is_subset(exact, names))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
