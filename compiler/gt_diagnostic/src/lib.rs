//! Diagnostics for the Gentee compiler and runtime.
//!
//! - Error codes for searchability ([`ErrorCode`])
//! - One error enum per phase kind, joined in [`Error`]
//! - `path:line:column` positions resolved through the unit's line table
//!
//! Compile errors abort the compile and roll the workspace back; runtime
//! errors unwind to the caller of `run`; thread errors surface only when the
//! run drains its error queue.

mod error_code;
mod errors;

pub use error_code::ErrorCode;
pub use errors::{
    CompileErrorKind, Error, LexErrorKind, LinkErrorKind, Position, RuntimeErrorKind,
};

#[cfg(test)]
mod tests;
