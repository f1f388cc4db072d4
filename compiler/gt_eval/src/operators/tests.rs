#![allow(clippy::unwrap_used)]

use super::*;
use crate::value::MapRef;
use pretty_assertions::assert_eq;

fn int(op: Builtin, a: i64, b: i64) -> Value {
    binary(op, &Value::Int(a), &Value::Int(b)).unwrap()
}

fn kind(result: Result<Value, Error>) -> RuntimeErrorKind {
    result.unwrap_err().runtime_kind().cloned().unwrap()
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(int(Builtin::Add, i64::MAX, 1), Value::Int(i64::MIN));
    assert_eq!(int(Builtin::Sub, i64::MIN, 1), Value::Int(i64::MAX));
    assert_eq!(int(Builtin::Mul, i64::MAX, 2), Value::Int(-2));
    assert_eq!(int(Builtin::Div, i64::MIN, -1), Value::Int(i64::MIN));
    assert_eq!(int(Builtin::Mod, -7, 3), Value::Int(-1));
}

#[test]
fn division_by_zero() {
    for op in [Builtin::Div, Builtin::Mod] {
        let result = binary(op, &Value::Int(1), &Value::Int(0));
        assert_eq!(kind(result), RuntimeErrorKind::DivisionByZero);
    }
    let result = binary(Builtin::Div, &Value::Float(1.0), &Value::Float(0.0));
    assert_eq!(kind(result), RuntimeErrorKind::DivisionByZero);
}

#[test]
fn shifts() {
    assert_eq!(int(Builtin::Shl, 1, 4), Value::Int(16));
    assert_eq!(int(Builtin::Shr, -16, 2), Value::Int(-4));
    assert_eq!(int(Builtin::Shl, 1, 64), Value::Int(0));
    assert_eq!(int(Builtin::Shr, -1, 100), Value::Int(-1));
    assert_eq!(int(Builtin::Shr, 5, 100), Value::Int(0));

    let result = binary(Builtin::Shl, &Value::Int(1), &Value::Int(-1));
    assert_eq!(kind(result), RuntimeErrorKind::NegativeShift { amount: -1 });
}

#[test]
fn bitwise() {
    assert_eq!(int(Builtin::BitAnd, 0b1100, 0b1010), Value::Int(0b1000));
    assert_eq!(int(Builtin::BitOr, 0b1100, 0b1010), Value::Int(0b1110));
    assert_eq!(int(Builtin::BitXor, 0b1100, 0b1010), Value::Int(0b0110));
    assert_eq!(unary(Builtin::BitNot, &Value::Int(0)).unwrap(), Value::Int(-1));
}

#[test]
fn comparisons_cover_every_ordered_type() {
    assert_eq!(int(Builtin::Less, 1, 2), Value::Bool(true));
    assert_eq!(int(Builtin::Greater, 1, 2), Value::Bool(false));
    let s = |v: &str| Value::Str(v.to_string());
    assert_eq!(binary(Builtin::Less, &s("abc"), &s("abd")).unwrap(), Value::Bool(true));
    assert_eq!(binary(Builtin::Equal, &s("x"), &s("x")).unwrap(), Value::Bool(true));
    assert_eq!(
        binary(Builtin::Greater, &Value::Char('b'), &Value::Char('a')).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        binary(Builtin::Equal, &Value::Bool(true), &Value::Bool(false)).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        binary(Builtin::Less, &Value::Float(0.5), &Value::Float(1.5)).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn string_concatenation() {
    let result = binary(Builtin::Add, &Value::from("ab"), &Value::from("cd")).unwrap();
    assert_eq!(result, Value::from("abcd"));
}

#[test]
fn unary_operators() {
    assert_eq!(unary(Builtin::Not, &Value::Bool(true)).unwrap(), Value::Bool(false));
    assert_eq!(unary(Builtin::Sign, &Value::Int(i64::MIN)).unwrap(), Value::Int(i64::MIN));
    assert_eq!(unary(Builtin::Sign, &Value::Float(1.5)).unwrap(), Value::Float(-1.5));
}

#[test]
fn length_counts_chars_and_items() {
    assert_eq!(unary(Builtin::Len, &Value::from("héllo")).unwrap(), Value::Int(5));
    let items = Value::array(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(unary(Builtin::Len, &items).unwrap(), Value::Int(2));
    let map = MapRef::default();
    map.insert("k".to_string(), Value::Int(1));
    assert_eq!(unary(Builtin::Len, &Value::Map(map)).unwrap(), Value::Int(1));
}

#[test]
fn ranges_and_keys() {
    assert_eq!(int(Builtin::NewRange, 3, 1), Value::Range { from: 3, to: 1 });
    let map = MapRef::default();
    map.insert("k".to_string(), Value::Int(1));
    let map = Value::Map(map);
    assert_eq!(binary(Builtin::IsKey, &map, &Value::from("k")).unwrap(), Value::Bool(true));
    assert_eq!(binary(Builtin::IsKey, &map, &Value::from("z")).unwrap(), Value::Bool(false));
}

#[test]
fn mismatched_operands_are_reported() {
    let result = binary(Builtin::Add, &Value::Bool(true), &Value::Bool(true));
    assert!(matches!(kind(result), RuntimeErrorKind::Custom { .. }));
}
