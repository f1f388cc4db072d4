//! Conversions between primitive types.

use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};

fn invalid(value: &Value, target: &str) -> Error {
    Error::runtime(RuntimeErrorKind::InvalidConversion {
        value: value.to_string(),
        target: target.to_string(),
    })
}

/// Floats truncate toward zero, saturating at the `int` bounds.
#[allow(clippy::cast_possible_truncation)]
pub(super) fn to_int(value: &Value) -> Result<Value, Error> {
    let result = match value {
        Value::Int(v) => *v,
        Value::Float(v) => *v as i64,
        Value::Str(text) => text.trim().parse().map_err(|_| invalid(value, "int"))?,
        Value::Char(ch) => i64::from(u32::from(*ch)),
        Value::Bool(v) => i64::from(*v),
        other => return Err(invalid(other, "int")),
    };
    Ok(Value::Int(result))
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn to_float(value: &Value) -> Result<Value, Error> {
    let result = match value {
        Value::Float(v) => *v,
        Value::Int(v) => *v as f64,
        Value::Str(text) => text.trim().parse().map_err(|_| invalid(value, "float"))?,
        other => return Err(invalid(other, "float")),
    };
    Ok(Value::Float(result))
}

/// Zero, the empty string, `"0"` and `"false"` are false.
pub(super) fn to_bool(value: &Value) -> Result<Value, Error> {
    let result = match value {
        Value::Bool(v) => *v,
        Value::Int(v) => *v != 0,
        Value::Str(text) => !matches!(text.as_str(), "" | "0" | "false"),
        other => return Err(invalid(other, "bool")),
    };
    Ok(Value::Bool(result))
}

pub(super) fn to_char(value: &Value) -> Result<Value, Error> {
    match value {
        Value::Char(ch) => Ok(Value::Char(*ch)),
        Value::Int(code) => u32::try_from(*code)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char)
            .ok_or_else(|| invalid(value, "char")),
        other => Err(invalid(other, "char")),
    }
}
