//! Gentee - compile and run Gentee scripts.
//!
//! # Architecture
//!
//! ```text
//! source
//!     │
//!     ▼
//! gt_lexer::lex ──► tokens + line table
//!     │
//!     ▼
//! gt_parse::compile ──► unit registered in the Workspace
//!     │
//!     ▼
//! gt_eval::run ──► value | error
//! ```
//!
//! The [`Workspace`] starts with the standard library unit
//! ([`new_workspace`]); every compiled unit is appended to it. This crate
//! re-exports the public surface of the phase crates and adds the helpers
//! the `gentee` binary is built on.

use std::sync::Once;

pub use gt_diagnostic::{
    CompileErrorKind, Error, ErrorCode, LexErrorKind, LinkErrorKind, Position, RuntimeErrorKind,
};
pub use gt_eval::{
    buffer_handler, run, stdout_handler, ArrayRef, MapRef, RunOptions, Runner, SharedPrintHandler,
    Value, DEFAULT_MAX_DEPTH,
};
pub use gt_ir::{Token, TokenKind, Workspace};
pub use gt_parse::{compile, compile_with, CompileOptions};
pub use gt_types::new_workspace;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `GENTEE_LOG`, falling back to `RUST_LOG`.
///
/// Safe to call multiple times; without either variable nothing is installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env("GENTEE_LOG").or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Compile `source` into a fresh workspace.
pub fn check_source(source: &str, path: &str) -> Result<(Workspace, usize), Error> {
    let mut ws = new_workspace();
    let unit = compile(&mut ws, source, path)?;
    Ok((ws, unit))
}

/// Compile `source` into a fresh workspace and run it.
#[tracing::instrument(level = "debug", skip(source, options), fields(args = options.args.len()))]
pub fn run_source(source: &str, path: &str, options: RunOptions) -> Result<Option<Value>, Error> {
    let (ws, unit) = check_source(source, path)?;
    Runner::new(&ws, unit).options(options).run()
}

/// The token stream of `source`, one `line:column Kind` entry per token.
pub fn token_listing(source: &str, path: &str) -> Result<Vec<String>, Error> {
    let tokens = gt_lexer::lex(source).map_err(|failure| Error::Lex {
        kind: failure.kind,
        pos: Position::of_offset(path, source, failure.span.start),
    })?;
    let lines = gt_ir::LineOffsetTable::build(source);
    Ok(tokens
        .iter()
        .map(|token| {
            let (line, column) = lines.offset_to_line_col(source, token.span.start);
            format!("{line}:{column} {:?}", token.kind)
        })
        .collect())
}
