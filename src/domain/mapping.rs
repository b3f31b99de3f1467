//! # Payload Mapping
//!
//! Turns a source `Record` into the JSON text that goes on the stream.
//! Every column of the row is kept, in source column order.
//!
//! Value rendering:
//! 1. **Numbers**: integers and floats stay JSON numbers. Non-finite floats
//!    become `null` since JSON has no representation for them.
//! 2. **Decimals**: kept as strings so no precision is lost.
//! 3. **Binary**: Base64 (standard alphabet).
//! 4. **Temporal**: `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS.FF6`.

use crate::domain::entities::{Record, Value};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value as Json};

/// Converts a whole record into a JSON object preserving column order.
pub fn record_to_json(record: &Record) -> Json {
    let mut map = Map::with_capacity(record.len());
    for (name, value) in record.fields() {
        map.insert(name.clone(), value_to_json(value));
    }
    Json::Object(map)
}

/// Converts a single column value.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Int(i) => Json::from(*i),
        Value::UInt(u) => Json::from(*u),
        Value::Float(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::Decimal(d) => Json::String(d.clone()),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::String(general_purpose::STANDARD.encode(b)),
        Value::Date(d) => Json::String(d.format("%Y-%m-%d").to_string()),
        Value::DateTime(dt) => Json::String(format_datetime(dt)),
    }
}

/// Formats a datetime with microsecond precision.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
