//! Compile-only checks and multi-unit workspaces.

use gentee::{
    check_source, compile, compile_with, new_workspace, CompileErrorKind, CompileOptions, Error,
    ErrorCode, LinkErrorKind, RuntimeErrorKind, Runner, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn check_registers_the_unit_after_the_stdlib() {
    let (ws, unit) = check_source("run {\n print(1)\n}", "hello.g").unwrap();
    assert_eq!(unit, 1);
    assert_eq!(ws.unit_index("hello.g"), Some(1));
}

#[test]
fn compile_errors_render_with_their_position() {
    let err = check_source("run {\n  x = 1\n}", "main.g").unwrap_err();
    assert_eq!(
        err.compile_kind(),
        Some(&CompileErrorKind::UnknownIdent { name: "x".into() })
    );
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(
        err.to_string(),
        "main.g:2:3: [E2002] unknown identifier `x`"
    );
}

#[test]
fn empty_source_is_rejected() {
    let err = check_source("\n\n", "empty.g").unwrap_err();
    assert_eq!(err.compile_kind(), Some(&CompileErrorKind::EmptySource));
}

#[test]
fn library_units_are_imported_by_name() {
    let mut ws = new_workspace();
    let options = CompileOptions {
        name: Some("mathlib".into()),
    };
    compile_with(
        &mut ws,
        "pub func square(int x) int { return x * x }\npub\nconst BASE = 3",
        "lib/math.g",
        &options,
    )
    .unwrap();
    let main = compile(
        &mut ws,
        "import \"mathlib\"\nrun int { return square(BASE) + 1 }",
        "main.g",
    )
    .unwrap();
    let value = Runner::new(&ws, main).run().unwrap();
    assert_eq!(value, Some(Value::Int(10)));
}

#[test]
fn failed_compile_keeps_earlier_units_runnable() {
    let mut ws = new_workspace();
    let good = compile(&mut ws, "run int { return 7 }", "good.g").unwrap();
    let units = ws.unit_count();

    let err = compile(&mut ws, "run {\n int a = \"text\"\n}", "bad.g").unwrap_err();
    assert!(matches!(
        err.compile_kind(),
        Some(CompileErrorKind::TypeMismatch { .. })
    ));
    assert_eq!(ws.unit_count(), units);
    assert_eq!(Runner::new(&ws, good).run().unwrap(), Some(Value::Int(7)));
}

#[test]
fn unknown_import_is_a_link_error() {
    let err = check_source("import \"missing\"\nrun {}", "main.g").unwrap_err();
    assert!(matches!(
        err,
        Error::Link {
            kind: LinkErrorKind::UnknownUnit { .. },
            ..
        }
    ));
}

#[test]
fn library_without_run_cannot_be_run() {
    let (ws, unit) = check_source("func helper() {}", "lib.g").unwrap();
    let err = Runner::new(&ws, unit).run().unwrap_err();
    assert_eq!(err.runtime_kind(), Some(&RuntimeErrorKind::NoRun));
}
