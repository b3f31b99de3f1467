//! # MySQL Value Conversion
//!
//! Over the text protocol MySQL sends nearly every value as bytes, so the
//! column type decides how those bytes are read back. The binary protocol
//! variants (`Int`, `Double`, `Date`, ...) are handled too.

use crate::domain::entities::Value;
use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::ColumnType as T;
use mysql_async::consts::{ColumnFlags, ColumnType};
use mysql_async::Column;

/// MySQL's `binary` character set id.
const BINARY_CHARSET: u16 = 63;

/// How values of a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Decimal,
    Date,
    DateTime,
    Binary,
    Text,
}

impl ColumnKind {
    pub fn of(column: &Column) -> Self {
        column_kind(column.column_type(), column.flags(), column.character_set())
    }
}

/// Classifies a column from its wire type, flags and character set.
pub fn column_kind(column_type: ColumnType, flags: ColumnFlags, charset: u16) -> ColumnKind {
    let unsigned = flags.contains(ColumnFlags::UNSIGNED_FLAG);
    match column_type {
        T::MYSQL_TYPE_TINY | T::MYSQL_TYPE_SHORT | T::MYSQL_TYPE_INT24 | T::MYSQL_TYPE_LONG
        | T::MYSQL_TYPE_LONGLONG => {
            if unsigned {
                ColumnKind::Unsigned
            } else {
                ColumnKind::Signed
            }
        }
        T::MYSQL_TYPE_YEAR => ColumnKind::Unsigned,
        T::MYSQL_TYPE_FLOAT | T::MYSQL_TYPE_DOUBLE => ColumnKind::Float,
        T::MYSQL_TYPE_DECIMAL | T::MYSQL_TYPE_NEWDECIMAL => ColumnKind::Decimal,
        T::MYSQL_TYPE_DATE | T::MYSQL_TYPE_NEWDATE => ColumnKind::Date,
        T::MYSQL_TYPE_DATETIME | T::MYSQL_TYPE_DATETIME2 | T::MYSQL_TYPE_TIMESTAMP
        | T::MYSQL_TYPE_TIMESTAMP2 => ColumnKind::DateTime,
        T::MYSQL_TYPE_BIT | T::MYSQL_TYPE_GEOMETRY => ColumnKind::Binary,
        T::MYSQL_TYPE_TINY_BLOB
        | T::MYSQL_TYPE_MEDIUM_BLOB
        | T::MYSQL_TYPE_LONG_BLOB
        | T::MYSQL_TYPE_BLOB
        | T::MYSQL_TYPE_VAR_STRING | T::MYSQL_TYPE_STRING | T::MYSQL_TYPE_VARCHAR
            if charset == BINARY_CHARSET =>
        {
            ColumnKind::Binary
        }
        _ => ColumnKind::Text,
    }
}

/// Converts one wire value into a domain value.
pub fn convert_value(kind: ColumnKind, value: mysql_async::Value) -> Value {
    match value {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Int(i) => Value::Int(i),
        mysql_async::Value::UInt(u) => Value::UInt(u),
        mysql_async::Value::Float(f) => Value::Float(f as f64),
        mysql_async::Value::Double(d) => Value::Float(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            convert_date(kind, year, month, day, hour, min, sec, micro)
        }
        mysql_async::Value::Time(neg, days, hour, min, sec, micro) => {
            Value::Text(format_time(neg, days, hour, min, sec, micro))
        }
        mysql_async::Value::Bytes(bytes) => convert_bytes(kind, bytes),
    }
}

fn convert_bytes(kind: ColumnKind, bytes: Vec<u8>) -> Value {
    if kind == ColumnKind::Binary {
        return Value::Bytes(bytes);
    }
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => return Value::Bytes(e.into_bytes()),
    };

    match kind {
        ColumnKind::Signed => text.parse().map(Value::Int).unwrap_or(Value::Text(text)),
        ColumnKind::Unsigned => text.parse().map(Value::UInt).unwrap_or(Value::Text(text)),
        ColumnKind::Float => text.parse().map(Value::Float).unwrap_or(Value::Text(text)),
        ColumnKind::Decimal => Value::Decimal(text),
        ColumnKind::Date => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map(Value::Date)
            .unwrap_or(Value::Text(text)),
        ColumnKind::DateTime => NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
            .map(Value::DateTime)
            .unwrap_or(Value::Text(text)),
        ColumnKind::Binary | ColumnKind::Text => Value::Text(text),
    }
}

#[allow(clippy::too_many_arguments)]
fn convert_date(
    kind: ColumnKind,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    min: u8,
    sec: u8,
    micro: u32,
) -> Value {
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32);
    match (kind, date) {
        (ColumnKind::Date, Some(d)) => Value::Date(d),
        (_, Some(d)) => d
            .and_hms_micro_opt(hour as u32, min as u32, sec as u32, micro)
            .map(Value::DateTime)
            .unwrap_or(Value::Null),
        // Zero dates (0000-00-00) have no calendar value; keep their text form.
        (_, None) => Value::Text(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, min, sec
        )),
    }
}

fn format_time(neg: bool, days: u32, hour: u8, min: u8, sec: u8, micro: u32) -> String {
    let hours = days * 24 + hour as u32;
    let sign = if neg { "-" } else { "" };
    if micro > 0 {
        format!("{}{:02}:{:02}:{:02}.{:06}", sign, hours, min, sec, micro)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, min, sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> mysql_async::Value {
        mysql_async::Value::Bytes(s.as_bytes().to_vec())
    }

    #[test]
    fn test_column_kind_classification() {
        let none = ColumnFlags::empty();
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_LONG, none, 33),
            ColumnKind::Signed
        );
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_LONGLONG, ColumnFlags::UNSIGNED_FLAG, 63),
            ColumnKind::Unsigned
        );
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_NEWDECIMAL, none, 63),
            ColumnKind::Decimal
        );
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_BLOB, none, BINARY_CHARSET),
            ColumnKind::Binary
        );
        // TEXT columns share the BLOB wire type but carry a real charset.
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_BLOB, none, 255),
            ColumnKind::Text
        );
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_VAR_STRING, none, 255),
            ColumnKind::Text
        );
        assert_eq!(
            column_kind(ColumnType::MYSQL_TYPE_TIMESTAMP, none, 63),
            ColumnKind::DateTime
        );
    }

    #[test]
    fn test_text_protocol_values() {
        assert_eq!(convert_value(ColumnKind::Signed, bytes("-42")), Value::Int(-42));
        assert_eq!(
            convert_value(ColumnKind::Unsigned, bytes("18446744073709551615")),
            Value::UInt(u64::MAX)
        );
        assert_eq!(convert_value(ColumnKind::Float, bytes("1.25")), Value::Float(1.25));
        assert_eq!(
            convert_value(ColumnKind::Decimal, bytes("10.50")),
            Value::Decimal("10.50".into())
        );
        assert_eq!(
            convert_value(ColumnKind::Text, bytes("Randy")),
            Value::Text("Randy".into())
        );
        assert_eq!(
            convert_value(ColumnKind::Binary, bytes("ab")),
            Value::Bytes(b"ab".to_vec())
        );
        assert_eq!(convert_value(ColumnKind::Text, mysql_async::Value::NULL), Value::Null);
    }

    #[test]
    fn test_text_protocol_temporal_values() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(convert_value(ColumnKind::Date, bytes("2024-02-29")), Value::Date(d));
        assert_eq!(
            convert_value(ColumnKind::DateTime, bytes("2024-02-29 13:14:15.250000")),
            Value::DateTime(d.and_hms_micro_opt(13, 14, 15, 250000).unwrap())
        );
        assert_eq!(
            convert_value(ColumnKind::DateTime, bytes("0000-00-00 00:00:00")),
            Value::Text("0000-00-00 00:00:00".into())
        );
    }

    #[test]
    fn test_binary_protocol_values() {
        let d = NaiveDate::from_ymd_opt(2023, 10, 27).unwrap();
        assert_eq!(
            convert_value(ColumnKind::Date, mysql_async::Value::Date(2023, 10, 27, 0, 0, 0, 0)),
            Value::Date(d)
        );
        assert_eq!(
            convert_value(
                ColumnKind::DateTime,
                mysql_async::Value::Date(2023, 10, 27, 1, 2, 3, 4)
            ),
            Value::DateTime(d.and_hms_micro_opt(1, 2, 3, 4).unwrap())
        );
        assert_eq!(
            convert_value(ColumnKind::Text, mysql_async::Value::Time(true, 1, 2, 3, 4, 0)),
            Value::Text("-26:03:04".into())
        );
        assert_eq!(
            convert_value(ColumnKind::Float, mysql_async::Value::Double(2.5)),
            Value::Float(2.5)
        );
    }

    #[test]
    fn test_unparseable_numeric_text_falls_back_to_text() {
        assert_eq!(
            convert_value(ColumnKind::Signed, bytes("n/a")),
            Value::Text("n/a".into())
        );
    }
}
