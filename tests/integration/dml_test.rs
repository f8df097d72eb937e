use anyhow::Result;
use std::collections::BTreeMap;

use sqlkit::dml::{
    explain_named_sql, parse_sql, ColumnValue, ColumnValues, Operator, PlaceholderKind, Value,
    META_ATTRIBUTE_REQUIRED,
};
use sqlkit::schema::ColumnName;

#[test]
fn test_update_values() -> Result<()> {
    let tpl = parse_sql("update user set name='x' where id=1")?;

    let update: Vec<&ColumnValue> = tpl.update.iter().collect();
    assert_eq!(update.len(), 1);
    assert_eq!(update[0].column, ColumnName::from("name"));
    assert_eq!(update[0].value, Value::Raw("'x'".to_string()));
    assert_eq!(update[0].operator, Operator::Eq);

    let cond: Vec<&ColumnValue> = tpl.r#where.iter().collect();
    assert_eq!(cond.len(), 1);
    assert_eq!(cond[0].column, ColumnName::from("id"));
    assert_eq!(cond[0].value, Value::Raw("1".to_string()));
    assert_eq!(cond[0].operator, Operator::Eq);
    Ok(())
}

#[test]
fn test_placeholder_substitution() -> Result<()> {
    let tpl = parse_sql("UPDATE user SET name = 'x' WHERE id = 1")?;
    let text = tpl.tpl.clone().expect("update is templated");

    let set = tpl.placeholder(PlaceholderKind::Set).expect("set placeholder");
    let cond = tpl.placeholder(PlaceholderKind::Where).expect("where placeholder");
    assert!(text.contains(&set.text));
    assert!(text.contains(&cond.text));

    let filled = text
        .replace(&set.text, "status = '2'")
        .replace(&cond.text, &tpl.r#where.where_clause()?);
    assert_eq!(filled, "UPDATE user SET status = '2' WHERE id = 1");
    Ok(())
}

#[test]
fn test_where_round_trip() -> Result<()> {
    let original = ColumnValue::new("id", 1, Operator::Eq);
    let clause = ColumnValues::from(vec![original.clone()]).where_clause()?;

    let tpl = parse_sql(&format!("SELECT * FROM t WHERE {}", clause))?;
    let parsed: Vec<&ColumnValue> = tpl.r#where.iter().collect();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].column, original.column);
    assert_eq!(parsed[0].operator, original.operator);
    assert_eq!(parsed[0].value.to_string(), original.value.to_string());
    Ok(())
}

#[test]
fn test_empty_where_is_valid_sql() -> Result<()> {
    let clause = ColumnValues::new().where_clause()?;
    assert_eq!(clause, "1 = 1");
    parse_sql(&format!("DELETE FROM t WHERE {}", clause))?;
    Ok(())
}

#[test]
fn test_where_from_values() -> Result<()> {
    let values = ColumnValues::from(vec![
        ColumnValue::new("status", vec!["1", "2"], Operator::In),
        ColumnValue::new("deleted_at", Value::Null, Operator::Eq),
        ColumnValue::new("score", 60, Operator::GtEq),
    ]);
    assert_eq!(
        values.where_clause()?,
        "status IN ('1', '2') AND deleted_at IS NULL AND score >= 60"
    );
    Ok(())
}

#[test]
fn test_insert_and_metas() -> Result<()> {
    let sql = "-- name required\n-- status required\nINSERT INTO user (name, status) VALUES ('a', '1')";
    let tpl = parse_sql(sql)?;

    let (columns, _) = tpl.insert.split();
    assert_eq!(columns, vec![ColumnName::from("name"), ColumnName::from("status")]);
    assert_eq!(
        tpl.tpl.as_deref(),
        Some("INSERT INTO user (valueColumn) VALUES ('valueValue')")
    );

    let required: Vec<&str> = tpl
        .metas
        .iter()
        .filter(|m| m.attributes.iter().any(|a| a == META_ATTRIBUTE_REQUIRED))
        .map(|m| m.column.as_str())
        .collect();
    assert_eq!(required, vec!["name", "status"]);
    Ok(())
}

#[test]
fn test_union_is_not_templated() -> Result<()> {
    let tpl = parse_sql("SELECT id FROM a UNION SELECT id FROM b")?;
    assert!(tpl.tpl.is_none());
    assert!(tpl.r#where.is_empty());
    Ok(())
}

#[test]
fn test_named_binding() -> Result<()> {
    let mut data = BTreeMap::new();
    data.insert("ids".to_string(), Value::from(vec![3, 4]));
    data.insert("status".to_string(), Value::from("1"));
    data.insert("score".to_string(), Value::from(1.5));

    let sql = explain_named_sql(
        "SELECT * FROM user WHERE id IN (:ids) AND status = :status AND score > :score",
        &data,
    )?;
    assert_eq!(
        sql,
        "SELECT * FROM user WHERE id IN (3, 4) AND status = '1' AND score > 1.500000"
    );
    Ok(())
}
