// DML Templates
//
// Parses one SELECT/INSERT/UPDATE/DELETE statement into the column values it
// mentions, and rewrites it into a skeleton where the SET list, the VALUES
// list and the WHERE clause are each replaced by one fixed placeholder.
// Callers substitute the placeholder text to build statements dynamically.

use std::fmt;

use log::debug;
use serde::Serialize;
use sqlparser::ast::{
    Assignment, AssignmentTarget, BinaryOperator, Expr, Ident, ObjectName, Query, SetExpr,
    Statement, UnaryOperator, Value as SqlValue,
};

use super::column_value::{ColumnValue, ColumnValues};
use super::comments::{extract_comments, parse_metas, Meta};
use super::value::{parse_statements, Operator, Value};
use crate::error::{Result, SqlKitError};

pub const PLACEHOLDER_SET_COLUMN: &str = "setColumn";
pub const PLACEHOLDER_SET_VALUE: &str = "setValue";
pub const PLACEHOLDER_WHERE_COLUMN: &str = "whereColumn";
pub const PLACEHOLDER_WHERE_VALUE: &str = "whereValue";
pub const PLACEHOLDER_VALUES_COLUMN: &str = "valueColumn";
pub const PLACEHOLDER_VALUES_VALUE: &str = "valueValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    Where,
    Set,
    Value,
}

/// Placeholder text as it appears in a rendered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    #[serde(rename = "type")]
    pub kind: PlaceholderKind,
    pub text: String,
}

pub fn default_placeholders() -> Vec<Placeholder> {
    vec![
        Placeholder {
            kind: PlaceholderKind::Where,
            text: format!("{} = '{}'", PLACEHOLDER_WHERE_COLUMN, PLACEHOLDER_WHERE_VALUE),
        },
        Placeholder {
            kind: PlaceholderKind::Set,
            text: format!("{} = '{}'", PLACEHOLDER_SET_COLUMN, PLACEHOLDER_SET_VALUE),
        },
        Placeholder {
            kind: PlaceholderKind::Value,
            text: format!("({}) VALUES ('{}')", PLACEHOLDER_VALUES_COLUMN, PLACEHOLDER_VALUES_VALUE),
        },
    ]
}

/// Result of [`parse_sql`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlTemplate {
    pub comments: Vec<String>,
    /// Placeholder template; `None` for statement shapes that are not templated
    pub tpl: Option<String>,
    /// The statement as parsed, re-rendered
    pub example: String,
    pub update: ColumnValues,
    pub r#where: ColumnValues,
    pub insert: ColumnValues,
    pub placeholders: Vec<Placeholder>,
    pub metas: Vec<Meta>,
}

impl SqlTemplate {
    pub fn placeholder(&self, kind: PlaceholderKind) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.kind == kind)
    }
}

impl fmt::Display for SqlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Parse a single DML statement into a template
pub fn parse_sql(sql: &str) -> Result<SqlTemplate> {
    let mut statement = parse_statements(sql)?
        .into_iter()
        .next()
        .ok_or_else(|| SqlKitError::UnsupportedStatement("empty statement".to_string()))?;

    let comments = extract_comments(sql);
    let mut template = SqlTemplate {
        metas: parse_metas(&comments),
        comments,
        tpl: None,
        example: statement.to_string(),
        update: ColumnValues::new(),
        r#where: ColumnValues::new(),
        insert: ColumnValues::new(),
        placeholders: default_placeholders(),
    };

    let templated = match &mut statement {
        Statement::Update {
            assignments,
            selection,
            ..
        } => {
            for assignment in assignments.iter() {
                template.update.add_ignore(ColumnValue::new(
                    assignment.target.to_string(),
                    Value::Raw(assignment.value.to_string()),
                    Operator::Eq,
                ));
            }
            *assignments = vec![Assignment {
                target: AssignmentTarget::ColumnName(ObjectName(vec![Ident::new(PLACEHOLDER_SET_COLUMN)])),
                value: Expr::Value(SqlValue::SingleQuotedString(PLACEHOLDER_SET_VALUE.to_string())),
            }];
            replace_where(selection, &mut template.r#where, false);
            true
        }
        Statement::Insert(insert) => {
            for column in &insert.columns {
                template
                    .insert
                    .add_ignore(ColumnValue::new(column.to_string(), Value::Null, Operator::Eq));
            }
            insert.columns = vec![Ident::new(PLACEHOLDER_VALUES_COLUMN)];
            insert.source = Some(placeholder_values()?);
            true
        }
        Statement::Query(query) => match query.body.as_mut() {
            SetExpr::Select(select) => {
                replace_where(&mut select.selection, &mut template.r#where, true);
                true
            }
            other => {
                debug!("no template for query body: {}", other);
                false
            }
        },
        Statement::Delete(delete) => {
            replace_where(&mut delete.selection, &mut template.r#where, false);
            true
        }
        other => return Err(SqlKitError::UnsupportedStatement(other.to_string())),
    };

    if templated {
        template.tpl = Some(statement.to_string());
    }
    Ok(template)
}

/// Collect the predicates of `selection` and swap it for the where
/// placeholder. Without `always` a missing WHERE stays missing.
fn replace_where(selection: &mut Option<Expr>, values: &mut ColumnValues, always: bool) {
    match selection {
        Some(expr) => collect_where(expr, values),
        None if !always => return,
        None => {}
    }
    *selection = Some(placeholder_where());
}

fn placeholder_where() -> Expr {
    Expr::BinaryOp {
        left: Box::new(Expr::Identifier(Ident::new(PLACEHOLDER_WHERE_COLUMN))),
        op: BinaryOperator::Eq,
        right: Box::new(Expr::Value(SqlValue::SingleQuotedString(
            PLACEHOLDER_WHERE_VALUE.to_string(),
        ))),
    }
}

fn placeholder_values() -> Result<Box<Query>> {
    let sql = format!(
        "INSERT INTO t ({}) VALUES ('{}')",
        PLACEHOLDER_VALUES_COLUMN, PLACEHOLDER_VALUES_VALUE
    );
    let statement = parse_statements(&sql)?.into_iter().next();
    match statement {
        Some(Statement::Insert(insert)) => insert
            .source
            .ok_or_else(|| SqlKitError::UnsupportedStatement(sql.clone())),
        _ => Err(SqlKitError::UnsupportedStatement(sql)),
    }
}

/// Walk a WHERE expression and record every comparison found under
/// AND/OR/NOT and parentheses. Operands are kept as SQL text.
pub(crate) fn collect_where(expr: &Expr, values: &mut ColumnValues) {
    match expr {
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor => {
                collect_where(left, values);
                collect_where(right, values);
            }
            op => {
                if let Some(operator) = Operator::from_binary(op) {
                    values.add_ignore(ColumnValue::new(
                        left.to_string(),
                        Value::Raw(right.to_string()),
                        operator,
                    ));
                }
            }
        },
        Expr::Nested(inner) => collect_where(inner, values),
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => collect_where(expr, values),
        Expr::InList {
            expr,
            list,
            negated,
        } => {
            let items: Vec<String> = list.iter().map(|e| e.to_string()).collect();
            let operator = if *negated { Operator::NotIn } else { Operator::In };
            values.add_ignore(ColumnValue::new(
                expr.to_string(),
                Value::Raw(format!("({})", items.join(", "))),
                operator,
            ));
        }
        Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => {
            let operator = if *negated { Operator::NotLike } else { Operator::Like };
            values.add_ignore(ColumnValue::new(
                expr.to_string(),
                Value::Raw(pattern.to_string()),
                operator,
            ));
        }
        _ => {}
    }
}
