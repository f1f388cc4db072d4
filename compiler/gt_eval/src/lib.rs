//! Gentee Eval - tree-walking runtime for compiled units.
//!
//! # Architecture
//!
//! The runtime executes the command tree the compiler produced; there is
//! no separate bytecode. It uses:
//! - `Interpreter`: one evaluation context per thread, holding the frame
//!   stack of variable slots laid out exactly as the compiler assigned them
//! - `exec`: block evaluation, calls and `go` threads
//! - `operators` / `builtins`: the standard library natives, dispatched on
//!   the `Builtin` chosen at compile time
//! - `ThreadHub`: the live-thread counter, close flags and error channel
//!
//! Control flow (`break`, `continue`, `return`) travels up through block
//! evaluation as the `Err` side of a result, next to runtime errors.
//!
//! # Re-exports
//!
//! - [`Value`], [`ArrayRef`], [`MapRef`]
//! - [`Runner`], [`RunOptions`], [`run`]
//! - the print handlers

mod builtins;
mod exec;
mod interpreter;
mod operators;
mod print_handler;
mod runner;
mod stack;
mod threads;
mod value;

pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use runner::{run, RunOptions, Runner, DEFAULT_MAX_DEPTH};
pub use value::{ArrayRef, MapRef, Value};

#[cfg(test)]
mod tests;
