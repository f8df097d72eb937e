// Column Values
//
// Ordered (column, value, operator) triples collected from DML statements,
// and the reverse direction: rendering a list back into a WHERE expression.

use serde::Serialize;
use sqlparser::ast::{BinaryOperator, Expr, Ident, Value as SqlValue};

use super::value::{parse_expr, Operator, Value};
use crate::error::{Result, SqlKitError};
use crate::schema::ColumnName;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub column: ColumnName,
    pub value: Value,
    pub operator: Operator,
}

impl ColumnValue {
    pub fn new(column: impl Into<ColumnName>, value: impl Into<Value>, operator: Operator) -> Self {
        ColumnValue {
            column: column.into(),
            value: value.into(),
            operator,
        }
    }

    /// Comparison expression `column <op> value`. A list value turns the
    /// comparison into `IN`/`NOT IN`, a NULL value into `IS [NOT] NULL`.
    pub fn comparison_expr(&self) -> Result<Expr> {
        let left = column_expr(&self.column);

        if let Value::List(_) = self.value {
            let negated = match self.operator {
                Operator::Eq | Operator::In => false,
                Operator::NotEq | Operator::NotIn => true,
                other => return Err(self.unsupported(other)),
            };
            let list = self
                .value
                .list_items(self.column.as_str())?
                .iter()
                .map(Value::to_expr)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Expr::InList {
                expr: Box::new(left),
                list,
                negated,
            });
        }

        if let Value::Null = self.value {
            return match self.operator {
                Operator::Eq => Ok(Expr::IsNull(Box::new(left))),
                Operator::NotEq => Ok(Expr::IsNotNull(Box::new(left))),
                Operator::NullSafeEq => Ok(binary(left, BinaryOperator::Spaceship, Expr::Value(SqlValue::Null))),
                other => Err(self.unsupported(other)),
            };
        }

        let right = self.value.to_expr()?;
        match self.operator {
            Operator::Like | Operator::NotLike => {
                // LIKE is rebuilt from text so the node matches what the parser produces
                let text = format!("{} {} {}", left, self.operator.as_str().to_uppercase(), right);
                parse_expr(&text)
            }
            Operator::In | Operator::NotIn => Ok(Expr::InList {
                expr: Box::new(left),
                list: vec![right],
                negated: self.operator == Operator::NotIn,
            }),
            op => match op.to_binary() {
                Some(bin) => Ok(binary(left, bin, right)),
                None => Err(self.unsupported(op)),
            },
        }
    }

    fn unsupported(&self, operator: Operator) -> SqlKitError {
        SqlKitError::UnsupportedValue(format!(
            "{} value with operator {} for column {}",
            self.value.kind(),
            operator,
            self.column
        ))
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// Identifier expression for a possibly qualified column. Quoting given by
/// the caller is kept; names that are not plain identifiers get quoted.
pub(crate) fn column_expr(column: &ColumnName) -> Expr {
    let (db, table, name) = column.explain();
    let quoted = column.as_str().contains('`');
    let mut idents: Vec<Ident> = [db, table, name]
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| {
            let plain = !part.is_empty()
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !part.starts_with(|c: char| c.is_ascii_digit());
            if quoted || !plain {
                Ident::with_quote('`', part)
            } else {
                Ident::new(part)
            }
        })
        .collect();

    if idents.len() == 1 {
        Expr::Identifier(idents.remove(0))
    } else {
        Expr::CompoundIdentifier(idents)
    }
}

/// Column/value triples in insertion order, unique per (column, operator)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnValues(Vec<ColumnValue>);

impl ColumnValues {
    pub fn new() -> Self {
        ColumnValues(Vec::new())
    }

    /// Append `value` unless the same column/operator pair is already
    /// present; the first occurrence wins.
    pub fn add_ignore(&mut self, value: ColumnValue) {
        if self.get_by_column(&value.column, value.operator).is_none() {
            self.0.push(value);
        }
    }

    pub fn get_by_column(&self, column: &ColumnName, operator: Operator) -> Option<&ColumnValue> {
        self.0
            .iter()
            .find(|cv| cv.column.eq_fold(column) && cv.operator == operator)
    }

    /// Values of the given columns, in the order the columns are listed
    pub fn filter_by_columns(&self, columns: &[ColumnName]) -> ColumnValues {
        let mut filtered = ColumnValues::new();
        for column in columns {
            for cv in self.0.iter().filter(|cv| cv.column.eq_fold(column)) {
                filtered.add_ignore(cv.clone());
            }
        }
        filtered
    }

    /// Split into parallel column and value lists
    pub fn split(&self) -> (Vec<ColumnName>, Vec<Value>) {
        self.0
            .iter()
            .map(|cv| (cv.column.clone(), cv.value.clone()))
            .unzip()
    }

    /// AND together the comparison of every entry, left-associative in list
    /// order. An empty list gives the always-true `1 = 1`.
    pub fn where_and_expr(&self) -> Result<Expr> {
        let mut exprs = self.0.iter().map(ColumnValue::comparison_expr);
        let Some(first) = exprs.next() else {
            let one = || Expr::Value(SqlValue::Number("1".to_string(), false));
            return Ok(binary(one(), BinaryOperator::Eq, one()));
        };
        exprs.try_fold(first?, |acc, next| -> Result<Expr> {
            Ok(binary(acc, BinaryOperator::And, next?))
        })
    }

    /// [`where_and_expr`](Self::where_and_expr) rendered as SQL text
    pub fn where_clause(&self) -> Result<String> {
        Ok(self.where_and_expr()?.to_string())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ColumnValue>> for ColumnValues {
    fn from(values: Vec<ColumnValue>) -> Self {
        let mut cvs = ColumnValues::new();
        for value in values {
            cvs.add_ignore(value);
        }
        cvs
    }
}

impl<'a> IntoIterator for &'a ColumnValues {
    type Item = &'a ColumnValue;
    type IntoIter = std::slice::Iter<'a, ColumnValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
