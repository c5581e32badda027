//! Cell-value serialization into protocol-safe JSON.
//!
//! The invariant that matters: values that already have a native JSON
//! representation (null, booleans, numbers, strings) pass through with
//! their type intact and are never stringified. Only non-JSON-native
//! cells (temporal, decimal, binary, nested composites) are converted,
//! each to a fixed textual or recursive encoding.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat};
use duckdb::types::{TimeUnit, Value};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value as JsonValue};

/// Days between 0001-01-01 (CE) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts one backend cell into a JSON value. Total over DuckDB's
/// value space; anything without a dedicated mapping degrades to its
/// string form.
#[must_use]
pub fn serialize_cell(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::TinyInt(v) => JsonValue::from(*v),
        Value::SmallInt(v) => JsonValue::from(*v),
        Value::Int(v) => JsonValue::from(*v),
        Value::BigInt(v) => JsonValue::from(*v),
        Value::UTinyInt(v) => JsonValue::from(*v),
        Value::USmallInt(v) => JsonValue::from(*v),
        Value::UInt(v) => JsonValue::from(*v),
        Value::UBigInt(v) => JsonValue::from(*v),
        // HUGEINT exceeds JSON's interoperable integer range; keep the
        // value exact as a string once it no longer fits in an i64.
        Value::HugeInt(v) => i64::try_from(*v)
            .map_or_else(|_| JsonValue::String(v.to_string()), JsonValue::from),
        Value::UHugeInt(v) => u64::try_from(*v)
            .map_or_else(|_| JsonValue::String(v.to_string()), JsonValue::from),
        Value::Float(v) => float_cell(f64::from(*v)),
        Value::Double(v) => float_cell(*v),
        // The binding's decimal is a width/scale/mantissa struct; go
        // through rust_decimal for the float conversion.
        Value::Decimal(v) => rust_decimal::Decimal::try_from(*v)
            .ok()
            .and_then(|decimal| decimal.to_f64())
            .map_or_else(|| JsonValue::String(v.to_string()), float_cell),
        Value::Text(s) | Value::Enum(s) => JsonValue::String(s.clone()),
        Value::Blob(bytes) => JsonValue::String(hex_string(bytes)),
        Value::Timestamp(unit, raw) => timestamp_cell(*unit, *raw),
        Value::Date32(days) => date_cell(*days),
        Value::Time64(unit, raw) => time_cell(*unit, *raw),
        Value::List(items) => JsonValue::Array(items.iter().map(serialize_cell).collect()),
        Value::Struct(fields) => {
            let mut object = Map::new();
            for (name, field) in fields.iter() {
                object.insert(name.clone(), serialize_cell(field));
            }
            JsonValue::Object(object)
        }
        Value::Map(entries) => {
            let mut object = Map::new();
            for (key, entry) in entries.iter() {
                object.insert(map_key(key), serialize_cell(entry));
            }
            JsonValue::Object(object)
        }
        other => {
            tracing::warn!(cell = ?other, "no native JSON mapping for cell type, using string form");
            JsonValue::String(format!("{other:?}"))
        }
    }
}

/// Renders a cell for the human-readable transcript.
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match serialize_cell(value) {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::String(text) => text,
        other => other.to_string(),
    }
}

fn float_cell(value: f64) -> JsonValue {
    // JSON has no encoding for NaN or infinities.
    Number::from_f64(value).map_or_else(|| JsonValue::String(value.to_string()), JsonValue::Number)
}

fn hex_string(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

fn to_micros(unit: TimeUnit, raw: i64) -> Option<i64> {
    match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000),
        TimeUnit::Millisecond => raw.checked_mul(1_000),
        TimeUnit::Microsecond => Some(raw),
        TimeUnit::Nanosecond => Some(raw / 1_000),
    }
}

fn timestamp_cell(unit: TimeUnit, raw: i64) -> JsonValue {
    to_micros(unit, raw)
        .and_then(DateTime::from_timestamp_micros)
        .map_or_else(
            || JsonValue::String(format!("{raw} ({unit:?})")),
            |ts| JsonValue::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        )
}

fn date_cell(days: i32) -> JsonValue {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map_or_else(
            || JsonValue::String(format!("{days} days since epoch")),
            |date| JsonValue::String(date.format("%Y-%m-%d").to_string()),
        )
}

fn time_cell(unit: TimeUnit, raw: i64) -> JsonValue {
    let time = to_micros(unit, raw).and_then(|micros| {
        let seconds = u32::try_from(micros / 1_000_000).ok()?;
        let nanos = u32::try_from((micros % 1_000_000) * 1_000).ok()?;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
    });
    time.map_or_else(
        || JsonValue::String(format!("{raw} ({unit:?})")),
        |t| JsonValue::String(t.format("%H:%M:%S%.6f").to_string()),
    )
}

fn map_key(key: &Value) -> String {
    match serialize_cell(key) {
        JsonValue::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use duckdb::types::OrderedMap;
    use serde_json::json;

    use super::*;

    #[test]
    fn json_native_values_pass_through_unchanged() {
        let row = [
            Value::Int(1),
            Value::Text("alpha".to_string()),
            Value::Null,
            Value::Boolean(true),
        ];
        let serialized: Vec<JsonValue> = row.iter().map(serialize_cell).collect();
        assert_eq!(serialized, vec![json!(1), json!("alpha"), json!(null), json!(true)]);
    }

    #[test]
    fn floats_keep_numeric_type() {
        assert_eq!(serialize_cell(&Value::Double(2.5)), json!(2.5));
        assert_eq!(serialize_cell(&Value::Float(0.5)), json!(0.5));
    }

    #[test]
    fn non_finite_floats_degrade_to_strings() {
        assert_eq!(serialize_cell(&Value::Double(f64::NAN)), json!("NaN"));
        assert_eq!(serialize_cell(&Value::Double(f64::INFINITY)), json!("inf"));
    }

    #[test]
    fn blobs_become_lowercase_hex() {
        assert_eq!(serialize_cell(&Value::Blob(vec![0xA1, 0xB2])), json!("a1b2"));
    }

    #[test]
    fn hugeint_within_i64_range_stays_numeric() {
        assert_eq!(serialize_cell(&Value::HugeInt(42)), json!(42));
        let big = i128::from(i64::MAX) + 1;
        assert_eq!(serialize_cell(&Value::HugeInt(big)), json!(big.to_string()));
    }

    #[test]
    fn uhugeint_within_u64_range_stays_numeric() {
        assert_eq!(serialize_cell(&Value::UHugeInt(42)), json!(42));
        let big = u128::from(u64::MAX) + 1;
        assert_eq!(serialize_cell(&Value::UHugeInt(big)), json!(big.to_string()));
    }

    #[test]
    fn timestamps_use_rfc3339_with_offset() {
        // 2024-01-15T10:30:00Z in microseconds.
        let micros = 1_705_314_600_000_000;
        assert_eq!(
            serialize_cell(&Value::Timestamp(TimeUnit::Microsecond, micros)),
            json!("2024-01-15T10:30:00Z")
        );
        assert_eq!(
            serialize_cell(&Value::Timestamp(TimeUnit::Second, micros / 1_000_000)),
            json!("2024-01-15T10:30:00Z")
        );
    }

    #[test]
    fn dates_use_calendar_form() {
        // 2024-01-15 is 19737 days after the Unix epoch.
        assert_eq!(serialize_cell(&Value::Date32(19_737)), json!("2024-01-15"));
        assert_eq!(serialize_cell(&Value::Date32(0)), json!("1970-01-01"));
    }

    #[test]
    fn times_use_clock_form() {
        let micros = (10 * 3600 + 30 * 60) * 1_000_000;
        assert_eq!(
            serialize_cell(&Value::Time64(TimeUnit::Microsecond, micros)),
            json!("10:30:00.000000")
        );
    }

    #[test]
    fn nested_composites_serialize_recursively() {
        let cell = Value::Struct(OrderedMap::from(vec![(
            "k".to_string(),
            Value::List(vec![Value::Int(1), Value::Int(2)]),
        )]));
        assert_eq!(serialize_cell(&cell), json!({ "k": [1, 2] }));
    }

    #[test]
    fn json_native_serialization_is_identity() {
        // Serializing a cell that is already JSON-native must be the
        // identity, so a second pass could never change the value.
        for (cell, expected) in [
            (Value::Null, json!(null)),
            (Value::Boolean(false), json!(false)),
            (Value::BigInt(7), json!(7)),
            (Value::Text("x".to_string()), json!("x")),
        ] {
            assert_eq!(serialize_cell(&cell), expected);
        }
    }

    #[test]
    fn transcript_text_unquotes_strings_and_names_null() {
        assert_eq!(cell_text(&Value::Text("alpha".to_string())), "alpha");
        assert_eq!(cell_text(&Value::Null), "NULL");
        assert_eq!(cell_text(&Value::Int(3)), "3");
    }
}
