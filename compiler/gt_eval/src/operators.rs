//! Operator natives.
//!
//! Overload resolution happened at compile time, so operand types are
//! already known to match one of the stdlib signatures. A mismatch here
//! means a malformed command tree and is reported as a custom error.

use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::Builtin;
use std::cmp::Ordering;

/// Apply a binary operator native.
pub(crate) fn binary(op: Builtin, left: &Value, right: &Value) -> Result<Value, Error> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_binary(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_binary(op, *a, *b),
        (Value::Str(a), Value::Str(b)) => match op {
            Builtin::Add => Ok(Value::Str(format!("{a}{b}"))),
            _ => compare(op, a.cmp(b)),
        },
        (Value::Char(a), Value::Char(b)) => compare(op, a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) if op == Builtin::Equal => Ok(Value::Bool(a == b)),
        (Value::Map(map), Value::Str(key)) if op == Builtin::IsKey => {
            Ok(Value::Bool(map.contains(key)))
        }
        _ => Err(unsupported(op, left)),
    }
}

fn int_binary(op: Builtin, a: i64, b: i64) -> Result<Value, Error> {
    let value = match op {
        Builtin::Add => a.wrapping_add(b),
        Builtin::Sub => a.wrapping_sub(b),
        Builtin::Mul => a.wrapping_mul(b),
        Builtin::Div | Builtin::Mod if b == 0 => {
            return Err(Error::runtime(RuntimeErrorKind::DivisionByZero));
        }
        Builtin::Div => a.wrapping_div(b),
        Builtin::Mod => a.wrapping_rem(b),
        Builtin::BitAnd => a & b,
        Builtin::BitOr => a | b,
        Builtin::BitXor => a ^ b,
        Builtin::Shl | Builtin::Shr if b < 0 => {
            return Err(Error::runtime(RuntimeErrorKind::NegativeShift { amount: b }));
        }
        Builtin::Shl => u32::try_from(b)
            .ok()
            .and_then(|amount| a.checked_shl(amount))
            .unwrap_or(0),
        // Shifting a negative number right by 64 or more leaves only sign bits.
        Builtin::Shr => u32::try_from(b)
            .ok()
            .and_then(|amount| a.checked_shr(amount))
            .unwrap_or(if a < 0 { -1 } else { 0 }),
        Builtin::NewRange => return Ok(Value::Range { from: a, to: b }),
        _ => return compare(op, a.cmp(&b)),
    };
    Ok(Value::Int(value))
}

fn float_binary(op: Builtin, a: f64, b: f64) -> Result<Value, Error> {
    let value = match op {
        Builtin::Add => a + b,
        Builtin::Sub => a - b,
        Builtin::Mul => a * b,
        Builtin::Div if b == 0.0 => {
            return Err(Error::runtime(RuntimeErrorKind::DivisionByZero));
        }
        Builtin::Div => a / b,
        #[allow(clippy::float_cmp)]
        Builtin::Equal => return Ok(Value::Bool(a == b)),
        Builtin::Less => return Ok(Value::Bool(a < b)),
        Builtin::Greater => return Ok(Value::Bool(a > b)),
        _ => return Err(unsupported(op, &Value::Float(a))),
    };
    Ok(Value::Float(value))
}

fn compare(op: Builtin, ordering: Ordering) -> Result<Value, Error> {
    match op {
        Builtin::Equal => Ok(Value::Bool(ordering == Ordering::Equal)),
        Builtin::Less => Ok(Value::Bool(ordering == Ordering::Less)),
        Builtin::Greater => Ok(Value::Bool(ordering == Ordering::Greater)),
        _ => Err(Error::runtime(RuntimeErrorKind::Custom {
            message: format!("{op:?} is not a comparison"),
        })),
    }
}

/// Apply a unary operator native.
pub(crate) fn unary(op: Builtin, operand: &Value) -> Result<Value, Error> {
    match (op, operand) {
        (Builtin::Not, Value::Bool(v)) => Ok(Value::Bool(!v)),
        (Builtin::Sign, Value::Int(v)) => Ok(Value::Int(v.wrapping_neg())),
        (Builtin::Sign, Value::Float(v)) => Ok(Value::Float(-v)),
        (Builtin::BitNot, Value::Int(v)) => Ok(Value::Int(!v)),
        (Builtin::Len, value) => {
            let len = match value {
                Value::Str(text) => text.chars().count(),
                Value::Array(items) => items.len(),
                Value::Map(map) => map.len(),
                other => return Err(unsupported(op, other)),
            };
            Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
        }
        (_, other) => Err(unsupported(op, other)),
    }
}

fn unsupported(op: Builtin, operand: &Value) -> Error {
    Error::runtime(RuntimeErrorKind::Custom {
        message: format!("{op:?} is not defined for {}", operand.type_name()),
    })
}

#[cfg(test)]
mod tests;
