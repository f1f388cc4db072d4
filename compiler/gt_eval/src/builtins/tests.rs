#![allow(clippy::unwrap_used)]

use super::convert::{to_bool, to_char, to_float, to_int};
use super::path::{base_name, clean, dir, ext, join, matches};
use super::process::{command_line, flag_values};
use super::*;
use pretty_assertions::assert_eq;

fn cmd(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn values(line: &str, flag: &str) -> Option<Vec<String>> {
    let cmd_line = cmd(line);
    flag_values(&cmd_line, flag).map(|list| list.into_iter().map(str::to_string).collect())
}

fn list(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|item| (*item).to_string()).collect())
}

// Conversions

#[test]
fn int_conversions() {
    assert_eq!(to_int(&Value::Float(-2.9)).unwrap(), Value::Int(-2));
    assert_eq!(to_int(&Value::from(" 42 ")).unwrap(), Value::Int(42));
    assert_eq!(to_int(&Value::Char('A')).unwrap(), Value::Int(65));
    assert_eq!(to_int(&Value::Bool(true)).unwrap(), Value::Int(1));
    let err = to_int(&Value::from("4x")).unwrap_err();
    assert!(matches!(
        err.runtime_kind(),
        Some(RuntimeErrorKind::InvalidConversion { target, .. }) if target == "int"
    ));
}

#[test]
fn float_bool_and_char_conversions() {
    assert_eq!(to_float(&Value::Int(3)).unwrap(), Value::Float(3.0));
    assert_eq!(to_float(&Value::from("2.5")).unwrap(), Value::Float(2.5));
    assert!(to_float(&Value::from("x")).is_err());

    assert_eq!(to_bool(&Value::Int(0)).unwrap(), Value::Bool(false));
    assert_eq!(to_bool(&Value::Int(-3)).unwrap(), Value::Bool(true));
    for falsy in ["", "0", "false"] {
        assert_eq!(to_bool(&Value::from(falsy)).unwrap(), Value::Bool(false));
    }
    assert_eq!(to_bool(&Value::from("yes")).unwrap(), Value::Bool(true));

    assert_eq!(to_char(&Value::Int(0x263A)).unwrap(), Value::Char('☺'));
    assert!(to_char(&Value::Int(-1)).is_err());
    assert!(to_char(&Value::Int(0xD800)).is_err());
}

// Command line

#[test]
fn flag_with_following_values() {
    assert_eq!(values("-in a.txt b.txt -out c", "in"), list(&["a.txt", "b.txt"]));
    assert_eq!(values("-in a.txt -out c", "-out"), list(&["c"]));
    assert_eq!(values("-v", "v"), list(&[]));
}

#[test]
fn flag_with_inline_value() {
    assert_eq!(values("-n=5", "n"), list(&["5"]));
    assert_eq!(values("-name:\"big\"", "name"), list(&["big"]));
    assert_eq!(values("-name='x'", "name"), list(&["x"]));
    assert_eq!(values("-name=", "name"), list(&[]));
}

#[test]
fn flag_prefix_needs_a_separator() {
    assert_eq!(values("-verbose", "v"), None);
    assert_eq!(values("a b", "v"), None);
}

#[test]
fn bare_dash_stops_flag_scanning() {
    assert_eq!(values("- -v 1", "v"), None);
}

#[test]
fn tail_after_last_flag() {
    assert_eq!(values("-a 1 -b x y", ""), list(&["x", "y"]));
    assert_eq!(values("x y", "-"), list(&["x", "y"]));
    assert_eq!(values("-a 1 -- z", ""), list(&["z"]));
    assert_eq!(values("-a", ""), None);
}

#[test]
fn command_line_natives() {
    let line = cmd("-n 7 -name=bob rest");
    let call = |builtin, args: &[Value]| {
        command_line(builtin, &line, &args.iter().cloned().collect::<Args>()).unwrap()
    };
    assert_eq!(call(Builtin::ArgCount, &[]), Value::Int(4));
    assert_eq!(call(Builtin::Arg, &[Value::from("name")]), Value::from("bob"));
    assert_eq!(call(Builtin::Arg, &[Value::from("missing")]), Value::from(""));
    assert_eq!(
        call(Builtin::ArgOr, &[Value::from("missing"), Value::from("dflt")]),
        Value::from("dflt")
    );
    assert_eq!(call(Builtin::ArgInt, &[Value::from("n"), Value::Int(1)]), Value::Int(7));
    assert_eq!(call(Builtin::ArgInt, &[Value::from("k"), Value::Int(1)]), Value::Int(1));
    assert_eq!(call(Builtin::IsArg, &[Value::from("name")]), Value::Bool(true));
    assert_eq!(call(Builtin::IsArg, &[Value::from("x")]), Value::Bool(false));
    assert_eq!(call(Builtin::Args, &[]).to_string(), "[-n 7 -name=bob rest]");
}

#[test]
fn non_numeric_int_flag_fails() {
    let line = cmd("-n seven");
    let args: Args = [Value::from("n"), Value::Int(0)].into_iter().collect();
    let err = command_line(Builtin::ArgInt, &line, &args).unwrap_err();
    assert!(matches!(
        err.runtime_kind(),
        Some(RuntimeErrorKind::InvalidConversion { .. })
    ));
}

// Paths

#[test]
fn cleaning() {
    assert_eq!(clean(""), ".");
    assert_eq!(clean("a//b/./c/.."), "a/b");
    assert_eq!(clean("/../x"), "/x");
    assert_eq!(clean("../../a"), "../../a");
    assert_eq!(clean("a/.."), ".");
}

#[test]
fn path_elements() {
    assert_eq!(base_name("/usr/lib/"), "lib");
    assert_eq!(base_name(""), ".");
    assert_eq!(base_name("///"), "/");
    assert_eq!(dir("/usr/lib/x.so"), "/usr/lib");
    assert_eq!(dir("x.so"), ".");
    assert_eq!(dir("/x"), "/");
    assert_eq!(ext("a/b.tar.gz"), "gz");
    assert_eq!(ext("a.b/c"), "");
    assert_eq!(join(&["a".into(), String::new(), "b/../c".into()]), "a/c");
    assert_eq!(join(&[]), "");
}

#[test]
fn glob_matching() {
    assert!(matches("*.txt", "notes.txt").unwrap());
    assert!(!matches("*.txt", "dir/notes.txt").unwrap());
    assert!(matches("*/*.txt", "dir/notes.txt").unwrap());
    assert!(matches("a?c", "abc").unwrap());
    assert!(!matches("a?c", "a/c").unwrap());
    assert!(matches("[a-c]x", "bx").unwrap());
    assert!(!matches("[^a-c]x", "bx").unwrap());
    assert!(matches("\\*", "*").unwrap());
    assert!(matches("", "").unwrap());
}

#[test]
fn malformed_globs_are_errors() {
    assert!(matches("[", "a").is_err());
    assert!(matches("a[z-a]", "ab").is_err());
    assert!(matches("x\\", "x").is_err());
}
