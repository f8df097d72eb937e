// Bind Values
//
// Values bound to columns in DML templates and named SQL, and the comparison
// operators they are combined with.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlparser::ast::{BinaryOperator, Expr, Statement, Value as SqlValue};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::{Parser, ParserOptions};

use super::named::mysql_real_escape_string;
use crate::error::{Result, SqlKitError};

/// A value bound to a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// SQL expression text used as is
    Raw(String),
    List(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Raw(_) => "raw",
            Value::List(_) => "list",
        }
    }

    /// Expression for a scalar value. Lists have no scalar form.
    pub(crate) fn to_expr(&self) -> Result<Expr> {
        let value = match self {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Boolean(*b),
            Value::Int(i) => SqlValue::Number(i.to_string(), false),
            Value::Float(f) => SqlValue::Number(float_literal(*f)?, false),
            Value::Text(s) => SqlValue::SingleQuotedString(mysql_real_escape_string(s)),
            Value::Bytes(b) => SqlValue::SingleQuotedString(mysql_real_escape_string(&String::from_utf8_lossy(b))),
            Value::Raw(text) => return parse_expr(text),
            Value::List(_) => {
                return Err(SqlKitError::UnsupportedValue(
                    "list where a single value is expected".to_string(),
                ))
            }
        };
        Ok(Expr::Value(value))
    }

    /// Literal SQL text of a scalar value; text is escaped and quoted
    pub(crate) fn to_literal(&self) -> Result<String> {
        match self {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => float_literal(*f),
            Value::Text(s) => Ok(format!("'{}'", mysql_real_escape_string(s))),
            Value::Bytes(b) => Ok(format!(
                "'{}'",
                mysql_real_escape_string(&String::from_utf8_lossy(b))
            )),
            Value::Raw(text) => Ok(text.clone()),
            Value::List(_) => Err(SqlKitError::UnsupportedValue(
                "list where a single value is expected".to_string(),
            )),
        }
    }

    /// Elements of a list value checked for use inside `IN (...)`
    pub(crate) fn list_items(&self, column: &str) -> Result<&[Value]> {
        let Value::List(items) = self else {
            return Err(SqlKitError::UnsupportedValue(format!(
                "{} value for column {} is not a list",
                self.kind(),
                column
            )));
        };
        if items.is_empty() {
            return Err(SqlKitError::EmptyList(column.to_string()));
        }
        if let Some(bad) = items
            .iter()
            .find(|v| matches!(v, Value::List(_) | Value::Bytes(_)))
        {
            return Err(SqlKitError::UnsupportedValue(format!(
                "{} element in list for column {}",
                bad.kind(),
                column
            )));
        }
        Ok(items)
    }
}

fn float_literal(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(SqlKitError::UnsupportedValue(format!("float {}", f)));
    }
    Ok(format!("{:.6}", f))
}

// String literals stay in their escaped source form so that rendering the
// AST writes them back as valid MySQL. Literals built from bind values must
// be escaped with `mysql_real_escape_string` before they enter the tree.
fn literal_options() -> ParserOptions {
    ParserOptions::new().with_unescape(false)
}

pub(crate) fn parse_expr(text: &str) -> Result<Expr> {
    let dialect = MySqlDialect {};
    Parser::new(&dialect)
        .with_options(literal_options())
        .try_with_sql(text)
        .and_then(|mut parser| parser.parse_expr())
        .map_err(|source| SqlKitError::parse(text, source))
}

pub(crate) fn parse_statements(sql: &str) -> Result<Vec<Statement>> {
    let dialect = MySqlDialect {};
    Parser::new(&dialect)
        .with_options(literal_options())
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_statements())
        .map_err(|source| SqlKitError::parse(sql, source))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            other => match other.to_literal() {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{:?}", other),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::Raw(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            object @ serde_json::Value::Object(_) => Value::Text(object.to_string()),
        }
    }
}

/// Comparison operator of a column/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=>")]
    NullSafeEq,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "not like")]
    NotLike,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::NullSafeEq => "<=>",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }

    pub(crate) fn from_binary(op: &BinaryOperator) -> Option<Self> {
        match op {
            BinaryOperator::Eq => Some(Operator::Eq),
            BinaryOperator::NotEq => Some(Operator::NotEq),
            BinaryOperator::Lt => Some(Operator::Lt),
            BinaryOperator::LtEq => Some(Operator::LtEq),
            BinaryOperator::Gt => Some(Operator::Gt),
            BinaryOperator::GtEq => Some(Operator::GtEq),
            BinaryOperator::Spaceship => Some(Operator::NullSafeEq),
            _ => None,
        }
    }

    pub(crate) fn to_binary(self) -> Option<BinaryOperator> {
        match self {
            Operator::Eq => Some(BinaryOperator::Eq),
            Operator::NotEq => Some(BinaryOperator::NotEq),
            Operator::Lt => Some(BinaryOperator::Lt),
            Operator::LtEq => Some(BinaryOperator::LtEq),
            Operator::Gt => Some(BinaryOperator::Gt),
            Operator::GtEq => Some(BinaryOperator::GtEq),
            Operator::NullSafeEq => Some(BinaryOperator::Spaceship),
            Operator::Like | Operator::NotLike | Operator::In | Operator::NotIn => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(Value::Int(7).to_literal().unwrap(), "7");
        assert_eq!(Value::Float(1.5).to_literal().unwrap(), "1.500000");
        assert_eq!(Value::from("it's").to_literal().unwrap(), r"'it\'s'");
        assert_eq!(Value::Null.to_literal().unwrap(), "NULL");
    }

    #[test]
    fn test_list_items() {
        let list = Value::from(vec![1, 2]);
        assert_eq!(list.list_items("id").unwrap().len(), 2);

        let empty = Value::List(Vec::new());
        assert!(matches!(empty.list_items("id"), Err(SqlKitError::EmptyList(_))));

        let nested = Value::List(vec![Value::from(vec![1])]);
        assert!(matches!(nested.list_items("id"), Err(SqlKitError::UnsupportedValue(_))));
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::json!({"a": [1, "x", 2.5, null]});
        let value = Value::from(json["a"].clone());
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Text("x".to_string()),
                Value::Float(2.5),
                Value::Null
            ])
        );
    }

    #[test]
    fn test_raw_expression() {
        let expr = Value::Raw("NOW()".to_string()).to_expr().unwrap();
        assert_eq!(expr.to_string(), "NOW()");
        assert!(Value::Raw("1 +".to_string()).to_expr().is_err());
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(Value::Float(f).to_literal(), Err(SqlKitError::UnsupportedValue(_))));
            assert!(matches!(Value::Float(f).to_expr(), Err(SqlKitError::UnsupportedValue(_))));
        }
        assert_eq!(Value::Float(f64::NAN).to_string(), "Float(NaN)");
    }

    #[test]
    fn test_text_expr_keeps_backslashes() {
        let expr = Value::from(r"a\").to_expr().unwrap();
        assert_eq!(expr.to_string(), r"'a\\'");
        let expr = Value::from(r"it\'s").to_expr().unwrap();
        assert_eq!(expr.to_string(), r"'it\\\'s'");
    }
}
