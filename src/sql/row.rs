//! Converts untyped rows (raw SQL results) into JSON objects keyed by column name.

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

pub fn row_to_json(row: &PgRow) -> Value {
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, col.ordinal()));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => raw.type_info().name().to_string(),
        _ => return Value::Null,
    };
    let decoded = match type_name.as_str() {
        "INT2" => row.try_get::<i16, _>(idx).map(Value::from),
        "INT4" => row.try_get::<i32, _>(idx).map(Value::from),
        "INT8" => row.try_get::<i64, _>(idx).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(idx).map(|n| Value::from(n as f64)),
        "FLOAT8" => row.try_get::<f64, _>(idx).map(Value::from),
        "BOOL" => row.try_get::<bool, _>(idx).map(Value::Bool),
        "UUID" => row.try_get::<uuid::Uuid, _>(idx).map(|u| Value::String(u.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
            .map(|d| Value::String(d.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx),
        _ => row.try_get::<String, _>(idx).map(Value::String),
    };
    decoded.unwrap_or_else(|e| {
        tracing::warn!(column = idx, type_name = %type_name, error = %e, "undecodable column");
        Value::Null
    })
}
