//! Statement callbacks: blocks, declarations and control flow.

use crate::expr::{self, expect_type};
use crate::parser::Parser;
use crate::table::{Action, ActionFlags, Redirect, State};
use gt_diagnostic::{CompileErrorKind, Error};
use gt_ir::{BlockKind, Cmd, NodeId, Object, Primitive, TokenKind, TypeKind};
use gt_types::type_name;

pub(crate) fn scope_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::Scope);
    Ok(None)
}

pub(crate) fn block_close(p: &mut Parser<'_>) -> Result<(), Error> {
    p.close_block();
    Ok(())
}

/// Expression statement.
pub(crate) fn expr_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let node = expr::finish(p)?;
    let scope = p.scope()?;
    p.append(scope, node);
    Ok(())
}

/// An identifier at statement start declares variables when it names a
/// type and no call follows; otherwise it starts an expression.
pub(crate) fn statement_ident(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let TokenKind::Ident(name) = p.token().clone() else {
        return Err(p.unexpected());
    };
    if *p.peek(1) != TokenKind::LParen && p.lookup_var(&name).is_none() {
        if let Some(ty) = p.resolve(&name) {
            p.var_types.push(ty);
            let action = Action::enter(State::VarDecl)
                .on_close(var_decl_close)
                .with(ActionFlags::STOP_BACK);
            return Ok(Some(Redirect::Enter(action)));
        }
    }
    Ok(Some(Redirect::Enter(Action::expression_here(expr_close))))
}

pub(crate) fn var_name(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let (Some(&ty), TokenKind::Ident(name)) = (p.var_types.last(), p.token().clone()) else {
        return Err(p.unexpected());
    };
    let var = p.declare_here(&name, ty)?;
    p.last_var = Some(var);
    Ok(None)
}

/// `= expr` after a declared name: an assignment to the new variable.
pub(crate) fn var_init(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let Some((block, slot)) = p.last_var.take() else {
        return Err(p.unexpected());
    };
    let ty = p
        .block(block)
        .and_then(|b| b.vars.get(slot as usize).copied())
        .ok_or_else(|| p.unexpected())?;
    let token = p.token_index().saturating_sub(1);
    let target = p.push_node(Cmd::Var { block, slot }, token, Some(ty));
    expr::begin_assign(p, target)?;
    Ok(None)
}

fn var_decl_close(p: &mut Parser<'_>) -> Result<(), Error> {
    p.var_types.pop();
    p.last_var = None;
    Ok(())
}

// if / elif / else / while

pub(crate) fn if_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::If);
    Ok(None)
}

pub(crate) fn elif_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    reopen_if(p, "elif")?;
    Ok(None)
}

pub(crate) fn else_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    reopen_if(p, "else")?;
    Ok(None)
}

/// Make the `if` just before this statement current again, provided it has
/// no `else` yet.
fn reopen_if(p: &mut Parser<'_>, keyword: &str) -> Result<(), Error> {
    let scope = p.scope()?;
    let last = p.block(scope).and_then(|b| b.children.last().copied());
    let open = last.filter(|&id| {
        p.block(id)
            .is_some_and(|b| b.kind == BlockKind::If && b.children.len() % 2 == 0)
    });
    let Some(if_block) = open else {
        return Err(p.error(CompileErrorKind::ElseWithoutIf {
            keyword: keyword.to_string(),
        }));
    };
    p.current = Some(if_block);
    Ok(())
}

pub(crate) fn while_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::While);
    Ok(None)
}

/// Condition of `if`, `elif` or `while`.
pub(crate) fn cond_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let cond = expr::finish(p)?;
    let block = p.scope()?;
    if p.children_len(block) % 2 == 1 {
        return Err(p.unexpected());
    }
    let token = p.unit.tree.node(cond).token;
    expect_type(p, cond, p.prims.bool, token)?;
    p.append(block, cond);
    Ok(())
}

pub(crate) fn cond_body_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let block = p.scope()?;
    if p.children_len(block) % 2 == 0 {
        return Err(p.expected_expression());
    }
    p.open_block(BlockKind::Scope);
    Ok(None)
}

/// Body of `else` or `default`.
pub(crate) fn body_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::Scope);
    Ok(None)
}

// for

pub(crate) fn for_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::For {
        item: 0,
        index: None,
    });
    p.for_names.clear();
    Ok(None)
}

pub(crate) fn for_name(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let TokenKind::Ident(name) = p.token().clone() else {
        return Err(p.unexpected());
    };
    if p.for_names.len() == 2 {
        return Err(p.unexpected());
    }
    p.check_ident(&name)?;
    let pos = p.pos;
    p.for_names.push((name, pos));
    Ok(None)
}

pub(crate) fn for_in(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    if p.for_names.is_empty() {
        return Err(p.unexpected());
    }
    Ok(None)
}

/// The iterated value fixes the loop variables' types: element and index
/// for arrays, element and key for maps, char and index for strings,
/// value and step number for ranges.
pub(crate) fn for_source_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let source = expr::finish(p)?;
    let for_block = p.scope()?;
    if p.children_len(for_block) != 0 {
        return Err(p.unexpected());
    }
    let ty = p.result_of(source);
    let kind = ty.and_then(|t| p.ws.type_desc(t)).map(|d| d.kind.clone());
    let prims = p.prims;
    let (item_ty, index_ty) = match kind {
        Some(TypeKind::Array(Some(elem))) => (elem, prims.int),
        Some(TypeKind::Map(Some(elem))) => (elem, prims.str),
        Some(TypeKind::Primitive(Primitive::Str)) => (prims.char, prims.int),
        Some(TypeKind::Primitive(Primitive::Range)) => (prims.int, prims.int),
        _ => {
            let token = p.unit.tree.node(source).token as usize;
            return Err(p.error_at(
                CompileErrorKind::TypeMismatch {
                    expected: "arr, map, str or range".to_string(),
                    found: ty.map_or_else(|| "void".to_string(), |t| type_name(p.ws, t)),
                },
                token,
            ));
        }
    };
    p.append(for_block, source);

    let names = std::mem::take(&mut p.for_names);
    let mut slots = Vec::with_capacity(names.len());
    for (i, (name, at)) in names.iter().enumerate() {
        let ty = if i == 0 { item_ty } else { index_ty };
        let slot = p.declare(for_block, name, ty).map_err(|err| match err {
            Error::Compile { kind, .. } => p.error_at(kind, *at),
            other => other,
        })?;
        slots.push(slot);
    }
    if let Some(block) = p.block_mut(for_block) {
        block.kind = BlockKind::For {
            item: slots.first().copied().unwrap_or(0),
            index: slots.get(1).copied(),
        };
    }
    Ok(())
}

pub(crate) fn for_body_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let block = p.scope()?;
    if p.children_len(block) != 1 {
        return Err(p.expected_expression());
    }
    p.open_block(BlockKind::Scope);
    Ok(None)
}

// switch

pub(crate) fn switch_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    p.scope()?;
    p.open_block(BlockKind::Switch);
    Ok(None)
}

pub(crate) fn switch_value_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let value = expr::finish(p)?;
    let block = p.scope()?;
    if p.children_len(block) != 0 {
        return Err(p.unexpected());
    }
    if p.result_of(value).is_none() {
        return Err(p.expected_expression());
    }
    p.append(block, value);
    Ok(())
}

pub(crate) fn switch_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let block = p.scope()?;
    if p.children_len(block) == 0 {
        return Err(p.expected_expression());
    }
    Ok(None)
}

fn has_default(p: &Parser<'_>, switch: NodeId) -> bool {
    p.block(switch).is_some_and(|b| {
        b.children
            .iter()
            .any(|c| p.block(*c).is_some_and(|c| c.kind == BlockKind::Default))
    })
}

pub(crate) fn case_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let switch = p.scope()?;
    if has_default(p, switch) {
        return Err(p.unexpected());
    }
    p.open_block(BlockKind::Case);
    Ok(None)
}

pub(crate) fn default_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let switch = p.scope()?;
    if has_default(p, switch) {
        return Err(p.unexpected());
    }
    p.open_block(BlockKind::Default);
    Ok(None)
}

/// Case values must fit the switch value's type.
pub(crate) fn case_value_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let value = expr::finish(p)?;
    let case = p.scope()?;
    let expected = p
        .block(case)
        .and_then(|c| c.parent)
        .and_then(|s| p.block(s))
        .and_then(|s| s.children.first().copied())
        .and_then(|v| p.result_of(v))
        .ok_or_else(|| p.unexpected())?;
    let token = p.unit.tree.node(value).token;
    expect_type(p, value, expected, token)?;
    p.append(case, value);
    Ok(())
}

pub(crate) fn case_body_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let case = p.scope()?;
    if p.children_len(case) == 0 {
        return Err(p.expected_expression());
    }
    p.open_block(BlockKind::Scope);
    Ok(None)
}

// return / break / continue

pub(crate) fn return_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    if p.funcs.is_empty() {
        return Err(p.unexpected());
    }
    p.scope()?;
    p.open_block(BlockKind::Return);
    Ok(None)
}

pub(crate) fn return_value_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let value = expr::finish(p)?;
    let block = p.scope()?;
    if p.children_len(block) != 0 {
        return Err(p.unexpected());
    }
    p.append(block, value);
    Ok(())
}

/// Check the returned value against the enclosing function. A `run`
/// without a declared result takes the type of its first `return`.
pub(crate) fn return_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let block = p.scope()?;
    let at = p.unit.tree.node(block).token;
    let value = p.block(block).and_then(|b| b.children.first().copied());
    p.close_block();

    let Some(ctx) = p.funcs.last() else {
        return Err(p.unexpected());
    };
    let (object, declared, infer) = (ctx.object, ctx.result, ctx.infer);
    let invalid = |p: &Parser<'_>, message: &str| {
        p.error_at(
            CompileErrorKind::InvalidReturn {
                message: message.to_string(),
            },
            at as usize,
        )
    };

    match (value, declared) {
        (Some(_), _) if object.is_none() => {
            Err(invalid(p, "a go block cannot return a value"))
        }
        (Some(value), None) if infer => {
            let Some(ty) = p.result_of(value) else {
                return Err(invalid(p, "cannot return a void value"));
            };
            if let Some(ctx) = p.funcs.last_mut() {
                ctx.result = Some(ty);
                ctx.infer = false;
            }
            if let Some(Object::Func(func)) = object.map(|id| p.ws.object_mut(id)) {
                func.result = Some(ty);
            }
            tracing::trace!(result = %type_name(p.ws, ty), "run result inferred");
            Ok(())
        }
        (Some(_), None) => Err(invalid(p, "function does not return a value")),
        (Some(value), Some(result)) => expect_type(p, value, result, at),
        (None, Some(_)) => Err(invalid(p, "missing return value")),
        (None, None) => {
            if let Some(ctx) = p.funcs.last_mut() {
                ctx.infer = false;
            }
            Ok(())
        }
    }
}

pub(crate) fn break_stmt(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    jump(p, BlockKind::Break)
}

pub(crate) fn continue_stmt(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    jump(p, BlockKind::Continue)
}

/// `break` needs an enclosing loop or case; `continue` an enclosing loop.
/// Neither crosses a function or `go` boundary.
fn jump(p: &mut Parser<'_>, kind: BlockKind) -> Result<Option<Redirect>, Error> {
    let is_break = kind == BlockKind::Break;
    let mut cursor = p.current;
    let mut found = false;
    while let Some(id) = cursor {
        let Some(block) = p.block(id) else { break };
        match block.kind {
            BlockKind::While | BlockKind::For { .. } => {
                found = true;
                break;
            }
            BlockKind::Case | BlockKind::Default if is_break => {
                found = true;
                break;
            }
            BlockKind::Function | BlockKind::Go | BlockKind::Const => break,
            _ => cursor = block.parent,
        }
    }
    if !found {
        let kind = if is_break {
            CompileErrorKind::BreakOutsideLoop
        } else {
            CompileErrorKind::ContinueOutsideLoop
        };
        return Err(p.error(kind));
    }
    let scope = p.scope()?;
    let token = p.token_index();
    let node = p.push_block(kind, Vec::new(), token, None);
    p.append(scope, node);
    Ok(None)
}
