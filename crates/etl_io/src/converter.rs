//! Type conversion between database types and row-set values.

use etl_core::DataValue;

#[cfg(any(feature = "postgres", test))]
use crate::IoError;

/// Picks the SQL column type covering every non-null value of a column.
///
/// Ints mixed with floats widen to `DOUBLE`; any other mix of kinds, and an
/// all-null column, becomes `VARCHAR`.
pub fn column_sql_type<'a>(values: impl Iterator<Item = &'a DataValue>) -> &'static str {
    let mut sql_type = None;
    for value in values {
        let kind = match value {
            DataValue::Null => continue,
            DataValue::Int(_) => "BIGINT",
            DataValue::Float(_) => "DOUBLE",
            DataValue::Bool(_) => "BOOLEAN",
            DataValue::String(_) => return "VARCHAR",
        };
        sql_type = match (sql_type, kind) {
            (None, kind) => Some(kind),
            (Some(seen), kind) if seen == kind => Some(seen),
            (Some("BIGINT"), "DOUBLE") | (Some("DOUBLE"), "BIGINT") => Some("DOUBLE"),
            _ => return "VARCHAR",
        };
    }
    sql_type.unwrap_or("VARCHAR")
}

/// Quotes an SQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// How a Postgres column's text values are decoded.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextDecoding {
    Int,
    Float,
    Bool,
    Text,
}

/// Maps a Postgres type name to the decoding of its text representation.
///
/// `numeric` decodes as float: the pipeline works with 64-bit floats.
#[cfg_attr(not(feature = "postgres"), allow(dead_code))]
pub(crate) fn decoding_for(type_name: &str) -> TextDecoding {
    match type_name {
        "int2" | "int4" | "int8" | "oid" => TextDecoding::Int,
        "float4" | "float8" | "numeric" => TextDecoding::Float,
        "bool" => TextDecoding::Bool,
        _ => TextDecoding::Text,
    }
}

/// Decodes one cell as returned by the simple-query protocol.
#[cfg(any(feature = "postgres", test))]
pub(crate) fn decode_text(
    column: &str,
    type_name: &str,
    text: Option<&str>,
) -> Result<DataValue, IoError> {
    let Some(text) = text else {
        return Ok(DataValue::Null);
    };

    let invalid = || IoError::ConversionError {
        column: column.to_string(),
        value: text.to_string(),
        expected: type_name.to_string(),
    };

    match decoding_for(type_name) {
        TextDecoding::Int => text.parse().map(DataValue::Int).map_err(|_| invalid()),
        TextDecoding::Float => text.parse().map(DataValue::Float).map_err(|_| invalid()),
        TextDecoding::Bool => match text {
            "t" | "true" => Ok(DataValue::Bool(true)),
            "f" | "false" => Ok(DataValue::Bool(false)),
            _ => Err(invalid()),
        },
        TextDecoding::Text => Ok(DataValue::String(text.to_string())),
    }
}

/// Converts a value for insertion into a column of the given SQL type.
///
/// `VARCHAR` columns receive every value as text and `DOUBLE` columns
/// receive ints as floats.
#[cfg(feature = "duckdb")]
pub(crate) fn to_duckdb_value(value: &DataValue, sql_type: &str) -> duckdb::types::Value {
    use duckdb::types::Value;

    match value {
        DataValue::Null => Value::Null,
        DataValue::String(s) => Value::Text(s.clone()),
        other if sql_type == "VARCHAR" => Value::Text(match other {
            DataValue::Float(f) => format!("{f:?}"),
            v => v.to_string(),
        }),
        DataValue::Int(i) if sql_type == "DOUBLE" => Value::Double(*i as f64),
        DataValue::Int(i) => Value::BigInt(*i),
        DataValue::Float(f) => Value::Double(*f),
        DataValue::Bool(b) => Value::Boolean(*b),
    }
}

/// Converts a value read back from DuckDB.
#[cfg(feature = "duckdb")]
pub(crate) fn from_duckdb_value(value: duckdb::types::Value) -> DataValue {
    use duckdb::types::Value;

    match value {
        Value::Null => DataValue::Null,
        Value::Boolean(b) => DataValue::Bool(b),
        Value::TinyInt(i) => DataValue::Int(i64::from(i)),
        Value::SmallInt(i) => DataValue::Int(i64::from(i)),
        Value::Int(i) => DataValue::Int(i64::from(i)),
        Value::BigInt(i) => DataValue::Int(i),
        Value::UTinyInt(i) => DataValue::Int(i64::from(i)),
        Value::USmallInt(i) => DataValue::Int(i64::from(i)),
        Value::UInt(i) => DataValue::Int(i64::from(i)),
        Value::Float(f) => DataValue::Float(f64::from(f)),
        Value::Double(f) => DataValue::Float(f),
        Value::Text(s) => DataValue::String(s),
        other => DataValue::String(format!("{other:?}")),
    }
}
