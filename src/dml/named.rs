// Named SQL Binding
//
// Expands `:name` placeholders in SQL text with literal values. Lists expand
// to comma-separated literals so `IN (:ids)` works with a list binding.

use std::collections::BTreeMap;

use log::debug;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::ParserError;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::value::{parse_statements, Value};
use crate::error::{Result, SqlKitError};

/// Bind `data` into `sql` and return the resulting statements re-rendered.
/// Every `:name` must have a binding.
pub fn explain_named_sql(sql: &str, data: &BTreeMap<String, Value>) -> Result<String> {
    let dialect = MySqlDialect {};
    // literals keep their source escaping; bound text is escaped on the way in
    let tokens = Tokenizer::new(&dialect, sql)
        .with_unescape(false)
        .tokenize()
        .map_err(|e| SqlKitError::parse(sql, ParserError::TokenizerError(e.to_string())))?;

    let mut bound = String::with_capacity(sql.len());
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            Token::Colon => match iter.peek() {
                Some(Token::Word(word)) if word.quote_style.is_none() => {
                    let value = data
                        .get(&word.value)
                        .ok_or_else(|| SqlKitError::BindVariableNotFound(format!(":{}", word.value)))?;
                    bound.push_str(&bind_literal(&word.value, value)?);
                    iter.next();
                }
                _ => bound.push(':'),
            },
            other => bound.push_str(&other.to_string()),
        }
    }

    let statements = parse_statements(&bound)?;
    let rendered: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
    debug!("bound named sql: {}", rendered.join("; "));
    Ok(rendered.join("; "))
}

fn bind_literal(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::List(_) => {
            let items = value
                .list_items(name)?
                .iter()
                .map(Value::to_literal)
                .collect::<Result<Vec<_>>>()?;
            Ok(items.join(","))
        }
        scalar => scalar.to_literal(),
    }
}

/// Backslash-escape characters that would end or corrupt a quoted MySQL
/// string literal.
pub fn mysql_real_escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\0' | '\n' | '\r' | '\'' | '"' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\x1a' => escaped.push_str("\\Z"),
            _ => escaped.push(c),
        }
    }
    escaped
}
