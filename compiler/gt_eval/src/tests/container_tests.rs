//! Arrays, maps and strings at run time.

use super::{kind_of, output_of, runtime_error, value_of};
use crate::value::Value;
use gt_diagnostic::RuntimeErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn arrays_are_shared_by_reference() {
    let source = "func fill(arr.int xs) { xs += 7 }\n\
                  run int {\n\
                  \x20arr.int a\n\
                  \x20arr.int b = a\n\
                  \x20fill(b)\n\
                  \x20return *a + a[0]\n\
                  }";
    assert_eq!(value_of(source), Value::Int(8));
}

#[test]
fn element_assignment_and_increment() {
    let source = "run {\n\
                  \x20arr.int a = {1, 2, 3}\n\
                  \x20a[1] = 20\n\
                  \x20a[2]++\n\
                  \x20a[0] += 5\n\
                  \x20println(a)\n\
                  }";
    assert_eq!(output_of(source), "[6 20 4]\n");
}

#[test]
fn index_past_the_end_fails() {
    let err = runtime_error("run {\n arr.int a = {1, 2}\n print(a[5])\n}");
    assert_eq!(kind_of(&err), RuntimeErrorKind::IndexOutOfRange { index: 5 });
    let err = runtime_error("run {\n arr.int a\n a[0] = 1\n}");
    assert_eq!(kind_of(&err), RuntimeErrorKind::IndexOutOfRange { index: 0 });
}

#[test]
fn loop_sees_elements_appended_by_its_body() {
    let source = "run int {\n\
                  \x20arr.int a = {1}\n\
                  \x20int n\n\
                  \x20for v in a {\n\
                  \x20 if *a < 3 { a += v + 1 }\n\
                  \x20 n++\n\
                  \x20}\n\
                  \x20return n\n\
                  }";
    assert_eq!(value_of(source), Value::Int(3));
}

#[test]
fn maps_keep_insertion_order() {
    let source = "run str {\n\
                  \x20map.int m\n\
                  \x20m[\"b\"] = 2\n\
                  \x20m[\"a\"] = 1\n\
                  \x20m[\"b\"] = 3\n\
                  \x20str keys\n\
                  \x20for v, k in m { keys += k + str(v) }\n\
                  \x20if IsKey(m, \"a\") { keys += \"!\" }\n\
                  \x20return keys\n\
                  }";
    assert_eq!(value_of(source), Value::from("b3a1!"));
}

#[test]
fn missing_map_key_fails() {
    let err = runtime_error("run {\n map.int m\n print(m[\"zz\"])\n}");
    assert_eq!(
        kind_of(&err),
        RuntimeErrorKind::KeyNotFound {
            key: "zz".to_string()
        }
    );
}

#[test]
fn strings_count_and_index_chars() {
    let source = "run str {\n str s = \"héllo\"\n return str(*s) + str(s[1])\n}";
    assert_eq!(value_of(source), Value::from("5é"));
}

#[test]
fn nested_containers_print() {
    let source = "run {\n\
                  \x20arr.arr.int grid = {{1, 2}, {3}}\n\
                  \x20map.str m\n\
                  \x20m[\"k\"] = \"v\"\n\
                  \x20print(grid, m)\n\
                  }";
    assert_eq!(output_of(source), "[[1 2] [3]]map[k:v]");
}
