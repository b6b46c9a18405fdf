//! Request field checks. All of them run before the ledger is touched.

use serde_json::Value;

use super::error::ApiError;

/// Loose truthiness: `null`, `false`, `0`, `0.0`,
/// `""`, `[]` and `{}` count as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A JSON integer (floats, strings and booleans are rejected).
fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    }
}

pub fn difficulty(raw: Option<Value>) -> Result<u32, ApiError> {
    raw.as_ref()
        .and_then(as_integer)
        .filter(|d| *d >= 1)
        .and_then(|d| u32::try_from(d).ok())
        .ok_or(ApiError::InvalidDifficulty)
}

pub fn transaction(raw: Option<Value>) -> Result<Value, ApiError> {
    raw.filter(is_present).ok_or(ApiError::MissingTransaction)
}

/// Checks shape, then data, then range, in that order.
pub fn tamper(
    index: Option<Value>,
    new_data: Option<Value>,
    chain_len: usize,
) -> Result<(usize, Value), ApiError> {
    let index = index
        .as_ref()
        .and_then(as_integer)
        .filter(|i| *i >= 0)
        .ok_or(ApiError::InvalidIndex)?;
    let new_data = new_data.filter(is_present).ok_or(ApiError::MissingData)?;
    let index = usize::try_from(index)
        .ok()
        .filter(|i| *i < chain_len)
        .ok_or(ApiError::IndexOutOfRange)?;
    Ok((index, new_data))
}
