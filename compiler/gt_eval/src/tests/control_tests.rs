//! Branches, loops, `switch` and runtime error positions.

use super::{kind_of, output_of, runtime_error, value_of};
use crate::value::Value;
use gt_diagnostic::RuntimeErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn if_elif_else_chain() {
    let source = "func grade(int n) str {\n\
                  \x20str out\n\
                  \x20if n > 90 { out = \"A\" } elif n > 50 { out = \"B\" }\n\
                  \x20else { out = \"C\" }\n\
                  \x20return out\n\
                  }\n\
                  run str { return grade(95) + grade(60) + grade(1) }";
    assert_eq!(value_of(source), Value::from("ABC"));
}

#[test]
fn while_with_break_and_continue() {
    let source = "run int {\n\
                  \x20int i\n\
                  \x20int sum\n\
                  \x20while i < 10 {\n\
                  \x20 i++\n\
                  \x20 if i % 2 == 0 { continue }\n\
                  \x20 if i > 7 { break }\n\
                  \x20 sum += i\n\
                  \x20}\n\
                  \x20return sum\n\
                  }";
    assert_eq!(value_of(source), Value::Int(16));
}

#[test]
fn ranges_are_inclusive_in_both_directions() {
    let source = "run {\n\
                  \x20for v in (1..3) { print(v) }\n\
                  \x20for v, i in (3..1) { print(v, i) }\n\
                  }";
    assert_eq!(output_of(source), "123302112");
}

#[test]
fn strings_iterate_by_char() {
    let source = "run {\n for ch, i in \"héllo\" { if ch == 'l' { print(i) } }\n}";
    assert_eq!(output_of(source), "23");
}

#[test]
fn switch_picks_the_first_matching_case() {
    let source = "func name(int n) str {\n\
                  \x20str out\n\
                  \x20switch n {\n\
                  \x20 case 1, 2 { out = \"small\" }\n\
                  \x20 case 3 { out = \"three\" }\n\
                  \x20 default { out = \"other\" }\n\
                  \x20}\n\
                  \x20return out\n\
                  }\n\
                  run str { return name(2) + name(3) + name(9) }";
    assert_eq!(value_of(source), Value::from("smallthreeother"));
}

#[test]
fn break_in_a_case_leaves_only_the_switch() {
    let source = "run int {\n\
                  \x20int n\n\
                  \x20for v in (1..3) {\n\
                  \x20 switch v {\n\
                  \x20  case 2 { break }\n\
                  \x20 }\n\
                  \x20 n += v\n\
                  \x20}\n\
                  \x20return n\n\
                  }";
    assert_eq!(value_of(source), Value::Int(6));
}

#[test]
fn logical_operators_short_circuit() {
    let source = "func noisy() bool {\n print(\"called\")\n return true\n}\n\
                  run {\n\
                  \x20bool b = false && noisy()\n\
                  \x20b = true || noisy()\n\
                  \x20print(b)\n\
                  }";
    assert_eq!(output_of(source), "true");
}

#[test]
fn ternary_evaluates_one_branch() {
    let source = "run str {\n int a = 5\n return ?(a > 1, \"big\", \"small\")\n}";
    assert_eq!(value_of(source), Value::from("big"));
}

#[test]
fn integer_overflow_wraps() {
    let source = "run int {\n int a = 9223372036854775807\n return a + 1\n}";
    assert_eq!(value_of(source), Value::Int(i64::MIN));
}

#[test]
fn constants_evaluate_once_per_run() {
    let source = "const LIMIT = 2 * 5\nrun int { return LIMIT + LIMIT }";
    assert_eq!(value_of(source), Value::Int(20));
}

#[test]
fn conversions_and_printing() {
    let source = "run {\n println(str(12) + str(true))\n print(int(\"7\") * 2, ' ', float(1))\n}";
    assert_eq!(output_of(source), "12true\n14 1");
}

#[test]
fn runtime_errors_carry_the_position() {
    let err = runtime_error("run {\n int a\n print(1 / a)\n}");
    assert_eq!(kind_of(&err), RuntimeErrorKind::DivisionByZero);
    let pos = err.position().unwrap();
    assert_eq!((pos.path.as_str(), pos.line), ("main.g", 3));
    assert!(err.to_string().starts_with("main.g:3:"));
}

#[test]
fn error_raises_a_custom_failure() {
    let err = runtime_error("run {\n error(\"boom\")\n}");
    assert_eq!(
        kind_of(&err),
        RuntimeErrorKind::Custom {
            message: "boom".to_string()
        }
    );
}

#[test]
fn failed_conversion_is_reported() {
    let err = runtime_error("run {\n print(int(\"x1\"))\n}");
    assert!(matches!(
        kind_of(&err),
        RuntimeErrorKind::InvalidConversion { .. }
    ));
}

fn long_sum(terms: usize) -> String {
    format!("0{}", "+1".repeat(terms))
}

#[test]
fn long_operand_chain_in_the_entry() {
    let source = format!("run int {{ return {} }}", long_sum(20_000));
    assert_eq!(value_of(&source), Value::Int(20_000));
}
