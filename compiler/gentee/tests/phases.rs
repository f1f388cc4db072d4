// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Phase-based tests for the public `gentee` surface.
//!
//! # Organization
//!
//! - `lex` - token listings and lexical failures
//! - `compile` - compile-only checks, multi-unit workspaces and imports
//! - `run` - whole programs through compile and run
//! - `common/` - shared helpers
//!
//! # Running Phase Tests
//!
//! ```bash
//! cargo test -p gentee --test phases
//! cargo test -p gentee --test phases run
//! ```

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/lex.rs"]
mod lex;

#[path = "phases/compile.rs"]
mod compile;

#[path = "phases/run.rs"]
mod run;
