use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// SQL bindable value
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// Dynamic UPDATE statement plus its bind values, in order
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// `None` for arrays and objects, which have no column mapping.
fn to_sql_value(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(SqlValue::Date)
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                        .map(SqlValue::DateTime)
                })
                .unwrap_or_else(|_| SqlValue::String(s.clone())),
        ),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::I64)
            .or_else(|| n.as_f64().map(SqlValue::F64)),
        Value::Bool(b) => Some(SqlValue::Bool(*b)),
        Value::Null => Some(SqlValue::Null),
        _ => None,
    }
}

/// Build a partial `UPDATE` from a JSON object.
///
/// Only keys listed in `allowed_columns` may be set; anything else is a 400.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed_columns: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !allowed_columns.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Field '{}' cannot be updated", unknown)));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);
    for value in obj.values() {
        values.push(to_sql_value(value).ok_or_else(|| ErrorBadRequest("Unsupported JSON value type"))?);
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

/// Execute the update, returning affected rows
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: [&str; 3] = ["name", "salary", "role"];

    #[test]
    fn builds_set_clause_with_trailing_id() {
        let update =
            build_update_sql("employees", &json!({"salary": 5000000}), &COLUMNS, "id", 7).unwrap();

        assert_eq!(update.sql, "UPDATE employees SET salary = ? WHERE id = ?");
        assert_eq!(update.values, vec![SqlValue::I64(5_000_000), SqlValue::I64(7)]);
    }

    #[test]
    fn converts_json_types() {
        let update = build_update_sql(
            "kondites",
            &json!({"description": "late", "end_date": "2026-02-01", "min_point": 0.5}),
            &["description", "end_date", "min_point"],
            "id",
            1,
        )
        .unwrap();

        assert!(update.values.contains(&SqlValue::String("late".into())));
        assert!(
            update
                .values
                .contains(&SqlValue::Date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()))
        );
        assert!(update.values.contains(&SqlValue::F64(0.5)));
    }

    #[test]
    fn rejects_columns_outside_whitelist() {
        let err = build_update_sql("employees", &json!({"id": 1}), &COLUMNS, "id", 7);
        assert!(err.is_err());

        let err = build_update_sql(
            "employees",
            &json!({"name = 'x', role": "admin"}),
            &COLUMNS,
            "id",
            7,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("employees", &json!({}), &COLUMNS, "id", 1).is_err());
        assert!(build_update_sql("employees", &json!([1, 2]), &COLUMNS, "id", 1).is_err());
        assert!(build_update_sql("employees", &json!({"name": ["a"]}), &COLUMNS, "id", 1).is_err());
    }
}
