//! Typing of Athena cells.
//!
//! Athena returns every cell as `VarCharValue` text; the declared column
//! type decides how it is surfaced to the host.

use quarry_core::Value;

/// Convert a raw Athena cell into a [`Value`] using the column's declared type.
///
/// A missing cell is SQL NULL. Numeric and boolean types fall back to
/// `Text` when the value does not parse.
pub fn parse_value(raw: Option<&str>, data_type: &str) -> Value {
    let Some(value) = raw else {
        return Value::Null;
    };

    let normalized_type = data_type.to_lowercase();
    let base_type = normalized_type
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match base_type {
        "bigint" | "int" | "integer" | "smallint" | "tinyint" => value
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(value.to_string())),
        "double" | "float" | "real" => value
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::Text(value.to_string())),
        "boolean" => match value.to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(value.to_string()),
        },
        // decimal stays text to keep its precision.
        _ => Value::Text(value.to_string()),
    }
}
