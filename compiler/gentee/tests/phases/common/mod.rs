//! Shared helpers for phase tests.

use std::sync::Arc;

use gentee::{buffer_handler, run_source, Error, RunOptions, Value};

/// Result and captured output of one run.
pub struct Captured {
    pub result: Result<Option<Value>, Error>,
    pub output: String,
}

/// Compile and run `source` as `main.g` with `args`, capturing printed text.
pub fn run_captured(source: &str, args: &[&str]) -> Captured {
    let print = buffer_handler();
    let options = RunOptions {
        args: args.iter().map(ToString::to_string).collect(),
        print: Arc::clone(&print),
        ..RunOptions::default()
    };
    let result = run_source(source, "main.g", options);
    Captured {
        result,
        output: print.output(),
    }
}

/// Value returned by a program that must succeed and return something.
pub fn returned(source: &str) -> Value {
    match run_captured(source, &[]).result {
        Ok(Some(value)) => value,
        Ok(None) => panic!("program returned nothing"),
        Err(err) => panic!("program failed: {err}"),
    }
}

/// Printed output of a program that must succeed.
pub fn printed(source: &str) -> String {
    let captured = run_captured(source, &[]);
    if let Err(err) = captured.result {
        panic!("program failed: {err}");
    }
    captured.output
}
