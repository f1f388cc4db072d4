//! Gentee compiler: tokens to command tree.
//!
//! Compiling is one pass of a table-driven state machine over the token
//! stream. There is no AST: callbacks attached to table actions build the
//! executable command tree directly, resolving names, types and overloads
//! as they go.
//!
//! - `table`: the (state, token category) dispatch table
//! - `parser`: the driver loop, frame stack and tree-building helpers
//! - `expr`: the operator-precedence expression sub-parser
//! - `stmt` / `decl`: callbacks for statements and declarations
//! - `scope`: variable declaration and lookup
//! - `colon`: the `:` block sugar, expanded before the main loop
//!
//! [`compile`] is transactional: on any error the workspace is rolled back
//! to the state it had before the call.

mod colon;
mod decl;
mod expr;
mod parser;
mod scope;
mod stmt;
mod table;

use gt_diagnostic::{CompileErrorKind, Error, LinkErrorKind, Position};
use gt_ir::{LineOffsetTable, Span, Token, TokenKind, Unit, Workspace, STDLIB_UNIT};
use parser::Parser;

/// Options for [`compile_with`].
#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    /// Registration name; defaults to the path.
    pub name: Option<String>,
}

/// Compile `source` into a new unit registered under `path`.
pub fn compile(ws: &mut Workspace, source: &str, path: &str) -> Result<usize, Error> {
    compile_with(ws, source, path, &CompileOptions::default())
}

/// Compile `source` into a new unit and return its index.
///
/// Either the unit and every object it declares are committed, or the
/// workspace is left exactly as it was.
#[tracing::instrument(level = "debug", skip(ws, source, options), fields(len = source.len()))]
pub fn compile_with(
    ws: &mut Workspace,
    source: &str,
    path: &str,
    options: &CompileOptions,
) -> Result<usize, Error> {
    let snapshot = ws.snapshot();
    match compile_unit(ws, source, path, options) {
        Ok(index) => {
            tracing::debug!(index, objects = ws.object_count(), "unit committed");
            Ok(index)
        }
        Err(err) => {
            ws.rollback(snapshot);
            tracing::debug!(error = %err, "compile rolled back");
            Err(err)
        }
    }
}

fn compile_unit(
    ws: &mut Workspace,
    source: &str,
    path: &str,
    options: &CompileOptions,
) -> Result<usize, Error> {
    let mut tokens = gt_lexer::lex(source).map_err(|failure| Error::Lex {
        kind: failure.kind,
        pos: Position::of_offset(path, source, failure.span.start),
    })?;
    if tokens.iter().all(|t| t.kind == TokenKind::Line) {
        return Err(Error::Compile {
            kind: CompileErrorKind::EmptySource,
            pos: Position::of_offset(path, source, 0),
        });
    }
    colon::expand(&mut tokens, source).map_err(|offset| Error::Compile {
        kind: CompileErrorKind::DoubleColon,
        pos: Position::of_offset(path, source, offset),
    })?;
    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Line, Span::point(end)));

    let (Some(prims), Some(stdlib)) = (ws.primitives().copied(), ws.unit(STDLIB_UNIT).cloned())
    else {
        return Err(Error::link(LinkErrorKind::MissingStdlib));
    };
    let mut unit = Unit {
        name: options.name.clone().unwrap_or_else(|| path.to_string()),
        path: path.to_string(),
        source: source.to_string(),
        lines: LineOffsetTable::build(source),
        tokens,
        ..Unit::default()
    };
    unit.namespace.import_public(&stdlib.namespace, &stdlib.public);

    let index = ws.next_unit_index();
    let unit = Parser::new(ws, unit, index, prims).run()?;
    tracing::debug!(name = %unit.name, funcs = unit.namespace.funcs.len(), "unit compiled");
    Ok(ws.register_unit(unit))
}
