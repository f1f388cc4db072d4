//! End-to-end runtime tests: compile a source, run it, check the value and
//! what it printed.

#![allow(clippy::unwrap_used)]

mod container_tests;
mod control_tests;
mod function_tests;
mod thread_tests;

use crate::print_handler::buffer_handler;
use crate::runner::{execute, RunOptions, Shared};
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use std::sync::Arc;

pub(crate) struct Outcome {
    pub(crate) result: Result<Option<Value>, Error>,
    pub(crate) output: String,
    pub(crate) shared: Option<Arc<Shared>>,
}

pub(crate) fn run_with(source: &str, args: &[&str], max_depth: usize) -> Outcome {
    let mut ws = gt_types::new_workspace();
    let unit = gt_parse::compile(&mut ws, source, "main.g")
        .unwrap_or_else(|err| panic!("compile failed: {err}\n{source}"));
    let print = buffer_handler();
    let options = RunOptions {
        args: args.iter().map(|arg| (*arg).to_string()).collect(),
        print: Arc::clone(&print),
        max_depth,
    };
    let (result, shared) = execute(&ws, unit, options);
    Outcome {
        result,
        output: print.output(),
        shared,
    }
}

pub(crate) fn run_src(source: &str) -> Outcome {
    run_with(source, &[], crate::DEFAULT_MAX_DEPTH)
}

/// Value returned by the entry function.
pub(crate) fn value_of(source: &str) -> Value {
    match run_src(source).result {
        Ok(Some(value)) => value,
        Ok(None) => panic!("run returned no value\n{source}"),
        Err(err) => panic!("run failed: {err}\n{source}"),
    }
}

/// Everything the program printed; the run must succeed.
pub(crate) fn output_of(source: &str) -> String {
    let outcome = run_src(source);
    if let Err(err) = outcome.result {
        panic!("run failed: {err}\n{source}");
    }
    outcome.output
}

pub(crate) fn runtime_error(source: &str) -> Error {
    match run_src(source).result {
        Ok(value) => panic!("expected a runtime error, got {value:?}\n{source}"),
        Err(err) => err,
    }
}

pub(crate) fn kind_of(err: &Error) -> RuntimeErrorKind {
    err.runtime_kind()
        .cloned()
        .unwrap_or_else(|| panic!("not a runtime error: {err}"))
}
