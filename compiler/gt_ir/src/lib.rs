//! Gentee IR - shared program representation
//!
//! This crate contains the data structures every phase agrees on:
//! - Spans and tokens produced by the lexer
//! - The command tree, an arena of directly executable nodes per unit
//! - Objects: type descriptors, functions, embedded natives and constants
//! - Units and the process-wide [`Workspace`] registry
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: nodes refer to each other through `NodeId(u32)`,
//!   objects through `ObjectId(u32)`. Blocks keep their enclosing block as a
//!   plain index, so tearing a unit down is dropping its arena.
//! - **Append Only**: units and objects are only ever appended by a
//!   successful compile. A failed compile truncates back to a [`Snapshot`].
//! - **Immutable After Compile**: committed units are shared through `Arc`
//!   and never mutated; the runtime only owns stack and variable storage.

mod builtin;
mod line_table;
mod object;
mod span;
mod token;
mod tree;
mod unit;
mod workspace;

pub use builtin::Builtin;
pub use line_table::LineOffsetTable;
pub use object::{
    ConstObject, EmbedObject, FuncObject, Object, ObjectId, Primitive, Primitives, TypeDesc,
    TypeKind,
};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use tree::{
    AssignOp, Block, BlockKind, CallTarget, Cmd, CommandTree, Literal, Node, NodeId,
};
pub use unit::{Namespace, Unit};
pub use workspace::{Snapshot, Workspace, STDLIB_UNIT};
