//! Whole programs through compile and run.

use crate::common::{printed, returned, run_captured};
use gentee::{RuntimeErrorKind, Value};
use pretty_assertions::assert_eq;

#[test]
fn hello_world() {
    assert_eq!(printed("run {\n println(\"Hello, World!\")\n}"), "Hello, World!\n");
}

#[test]
fn precedence_in_a_one_line_entry() {
    assert_eq!(printed("run { print(1+2*3) }"), "7");
}

#[test]
fn semicolons_separate_statements() {
    let source = "run { int a; a = 5; if a > 3 { return 1 } return 0 }";
    assert_eq!(returned(source), Value::Int(1));
}

#[test]
fn division_by_zero_fails_at_run_time() {
    let err = run_captured("run { return 1/0 }", &[]).result.unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeErrorKind::DivisionByZero));
}

#[test]
fn word_frequencies() {
    let source = "func bump(map.int seen, str word) {\n\
                  \x20if *word == 0 { return }\n\
                  \x20if IsKey(seen, word) { seen[word] += 1 } else { seen[word] = 1 }\n\
                  }\n\
                  func count(str text) map.int {\n\
                  \x20map.int seen\n\
                  \x20str word\n\
                  \x20for c in text {\n\
                  \x20 if c == ' ' {\n\
                  \x20  bump(seen, word)\n\
                  \x20  word = \"\"\n\
                  \x20 } else { word += str(c) }\n\
                  \x20}\n\
                  \x20bump(seen, word)\n\
                  \x20return seen\n\
                  }\n\
                  run {\n\
                  \x20map.int seen = count(\"to be or not to be\")\n\
                  \x20for n, w in seen { print(w, \"=\", n, \" \") }\n\
                  }";
    assert_eq!(printed(source), "to=2 be=2 or=1 not=1 ");
}

#[test]
fn result_value_is_returned() {
    let source = "func fact(int n) int {\n\
                  \x20if n <= 1 { return 1 }\n\
                  \x20return n * fact(n - 1)\n\
                  }\n\
                  run int { return fact(10) }";
    assert_eq!(returned(source), Value::Int(3_628_800));
}

#[test]
fn script_arguments_reach_the_program() {
    let source = "run str {\n\
                  \x20arr.str rest = ArgsTail()\n\
                  \x20return Arg(\"out\", \"a.txt\") + \"|\" + str(*rest) + rest[0]\n\
                  }";
    let captured = run_captured(source, &["x", "-out=b.txt", "y", "z"]);
    assert_eq!(captured.result.unwrap(), Some(Value::from("b.txt|2y")));
}

#[test]
fn runtime_errors_carry_source_positions() {
    let source = "run {\n int a = 10\n int b\n print(a / b)\n}";
    let err = run_captured(source, &[]).result.unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeErrorKind::DivisionByZero));
    let pos = err.position().unwrap();
    assert_eq!((pos.path.as_str(), pos.line), ("main.g", 4));
}

#[test]
fn output_before_a_failure_is_kept() {
    let source = "run {\n print(\"partial\")\n error(\"stop\")\n print(\"never\")\n}";
    let captured = run_captured(source, &[]);
    assert!(captured.result.is_err());
    assert_eq!(captured.output, "partial");
}

#[test]
fn threads_and_paths() {
    let source = "run str {\n\
                  \x20arr.str parts\n\
                  \x20thread t = go { parts += BaseName(\"/tmp/data/report.txt\") }\n\
                  \x20wait(t)\n\
                  \x20return parts[0] + \" \" + Ext(parts[0])\n\
                  }";
    assert_eq!(returned(source), Value::from("report.txt txt"));
}
