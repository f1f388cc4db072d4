//! User functions: recursion, parameters, function values and depth limits.

use super::{kind_of, run_with, value_of};
use crate::value::Value;
use gt_diagnostic::RuntimeErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn recursion() {
    let source = "func fib(int n) int {\n\
                  \x20if n < 2 { return n }\n\
                  \x20return fib(n - 1) + fib(n - 2)\n\
                  }\n\
                  run int { return fib(15) }";
    assert_eq!(value_of(source), Value::Int(610));
}

#[test]
fn optional_parameters_take_their_defaults() {
    let source = "func f(int a, optional int b = 2) int { return a + b }\n\
                  run int { return f(1) + f(1, 5) }";
    assert_eq!(value_of(source), Value::Int(9));
}

#[test]
fn variadic_arguments_arrive_as_an_array() {
    let source = "func sum(int xs...) int {\n int s\n for x in xs { s += x }\n return s\n}\n\
                  run int { return sum(1, 2, 3) + sum() }";
    assert_eq!(value_of(source), Value::Int(6));
}

#[test]
fn arguments_are_copied_for_scalars() {
    let source = "func bump(int n) int {\n n++\n return n\n}\n\
                  run int {\n int a = 1\n int b = bump(a)\n return a * 10 + b\n}";
    assert_eq!(value_of(source), Value::Int(12));
}

#[test]
fn missing_return_yields_the_zero_value() {
    let source = "func pick(int n) str {\n if n > 0 { return \"pos\" }\n}\n\
                  run str { return pick(1) + \"|\" + pick(0) + \"|\" }";
    assert_eq!(value_of(source), Value::from("pos||"));
}

#[test]
fn function_values_call_through() {
    let source = "fn conv(int) str\n\
                  func show(int i) str { return str(i) }\n\
                  run str {\n conv c = &show\n return c(5)\n}";
    assert_eq!(value_of(source), Value::from("5"));
}

#[test]
fn unassigned_function_value_fails() {
    let source = "fn conv(int) str\nrun str {\n conv c\n return c(5)\n}";
    let err = run_with(source, &[], 100).result.unwrap_err();
    assert_eq!(kind_of(&err), RuntimeErrorKind::NullFunction);
}

#[test]
fn call_depth_is_limited() {
    let source = "func down(int n) int { return down(n + 1) }\nrun int { return down(0) }";
    let err = run_with(source, &[], 50).result.unwrap_err();
    assert_eq!(kind_of(&err), RuntimeErrorKind::StackOverflow { depth: 50 });
    assert_eq!(err.position().map(|pos| pos.line), Some(1));
}

#[test]
fn deep_recursion_within_the_limit_succeeds() {
    let source = "func count(int n) int {\n if n == 0 { return 0 }\n return 1 + count(n - 1)\n}\n\
                  run int { return count(5000) }";
    let outcome = run_with(source, &[], 10_000);
    assert_eq!(outcome.result.unwrap(), Some(Value::Int(5000)));
}

#[test]
fn command_line_flags() {
    let source = "run str {\n\
                  \x20return Arg(\"name\") + str(Arg(\"n\", 1)) + str(ArgCount()) + str(IsArg(\"q\"))\n\
                  }";
    let outcome = run_with(source, &["-name=ann", "-n", "4"], 100);
    assert_eq!(outcome.result.unwrap(), Some(Value::from("ann43false")));
}
