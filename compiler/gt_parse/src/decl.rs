//! Top-level declarations: `run`, `func`, `fn`, `const`, `import`, `pub`.

use crate::expr::{self, expect_type};
use crate::parser::{ConstDecl, FnDecl, FuncCtx, FuncDecl, Parser};
use crate::table::Redirect;
use gt_diagnostic::{CompileErrorKind, Error, LinkErrorKind, Position};
use gt_ir::{BlockKind, ConstObject, FuncObject, NodeId, Object, TokenKind};
use gt_types::{func_type, type_name};

/// `pub` before a declaration exports it; `pub` alone on a line exports
/// everything after it.
pub(crate) fn pub_marker(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    match p.peek(1).clone() {
        TokenKind::Line => p.unit.pub_mode = true,
        TokenKind::Func | TokenKind::Fn | TokenKind::Const => p.pending_pub = true,
        _ => return Err(p.unexpected()),
    }
    Ok(None)
}

fn take_public(p: &mut Parser<'_>) -> bool {
    std::mem::take(&mut p.pending_pub) || p.unit.pub_mode
}

fn ident(p: &Parser<'_>) -> Result<String, Error> {
    match p.token() {
        TokenKind::Ident(name) => Ok(name.clone()),
        _ => Err(p.unexpected()),
    }
}

fn header<'a>(p: &'a mut Parser<'_>) -> Result<&'a mut FuncDecl, Error> {
    match p.decl {
        Some(ref mut decl) => Ok(decl),
        None => Err(p.unexpected()),
    }
}

fn new_decl(block: NodeId, name: Option<String>, is_run: bool, public: bool) -> FuncDecl {
    FuncDecl {
        name,
        is_run,
        block,
        params: Vec::new(),
        first_optional: None,
        variadic: false,
        result: None,
        params_done: is_run,
        public,
        group_type: None,
        group_optional: false,
        last_slot: None,
    }
}

// run / func

pub(crate) fn run_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    if p.unit.run.is_some() {
        return Err(p.error(CompileErrorKind::DuplicateRun));
    }
    p.pending_pub = false;
    let block = p.open_block(BlockKind::Function);
    p.decl = Some(new_decl(block, Some("run".to_string()), true, false));
    Ok(None)
}

pub(crate) fn func_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let public = take_public(p);
    let block = p.open_block(BlockKind::Function);
    p.decl = Some(new_decl(block, None, false, public));
    Ok(None)
}

pub(crate) fn func_close(p: &mut Parser<'_>) -> Result<(), Error> {
    p.decl = None;
    p.current = None;
    Ok(())
}

/// The name right after `func`, or the result type after the parameters.
pub(crate) fn func_ident(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    if header(p)?.name.is_some() {
        return result_type(p);
    }
    if name.contains('.') {
        return Err(p.error(CompileErrorKind::QualifiedIdent { name }));
    }
    header(p)?.name = Some(name);
    Ok(None)
}

pub(crate) fn result_type(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    let decl = header(p)?;
    if !decl.params_done || decl.result.is_some() {
        return Err(p.unexpected());
    }
    let ty = p.require_type(&name)?;
    header(p)?.result = Some(ty);
    Ok(None)
}

pub(crate) fn params_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = header(p)?;
    if decl.name.is_none() || decl.params_done {
        return Err(p.unexpected());
    }
    Ok(None)
}

pub(crate) fn params_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let decl = header(p)?;
    decl.params_done = true;
    decl.group_type = None;
    decl.group_optional = false;
    Ok(())
}

pub(crate) fn param_comma(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = header(p)?;
    if decl.last_slot.is_none() {
        return Err(p.unexpected());
    }
    decl.group_type = None;
    decl.group_optional = false;
    decl.last_slot = None;
    Ok(None)
}

pub(crate) fn param_optional(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = header(p)?;
    if decl.group_type.is_some() || decl.group_optional {
        return Err(p.unexpected());
    }
    decl.group_optional = true;
    Ok(None)
}

/// `type name {name}`: the first identifier of a group is its type.
pub(crate) fn param_ident(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    let decl = header(p)?;
    let Some(ty) = decl.group_type else {
        let ty = p.require_type(&name)?;
        header(p)?.group_type = Some(ty);
        return Ok(None);
    };
    if decl.variadic {
        return Err(p.error(CompileErrorKind::VariadicNotLast));
    }
    let optional = decl.group_optional;
    if !optional && decl.first_optional.is_some() {
        return Err(p.error(CompileErrorKind::IllegalOptional));
    }
    let block = decl.block;
    let slot = p.declare(block, &name, ty)?;

    let decl = header(p)?;
    if optional && decl.first_optional.is_none() {
        decl.first_optional = Some(decl.params.len());
    }
    decl.params.push(ty);
    decl.last_slot = Some(slot);
    if let Some(b) = p.block_mut(block) {
        b.params += 1;
        if optional {
            b.optional.insert(slot);
        }
    }
    Ok(None)
}

/// `T name...` collects the remaining arguments into an `arr.T`.
pub(crate) fn param_variadic(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = header(p)?;
    let (Some(slot), Some(&elem)) = (decl.last_slot, decl.params.last()) else {
        return Err(p.unexpected());
    };
    if decl.variadic {
        return Err(p.error(CompileErrorKind::VariadicNotLast));
    }
    let block = decl.block;
    let name = format!("arr.{}", type_name(p.ws, elem));
    let arr = p.require_type(&name)?;
    header(p)?.variadic = true;
    if let Some(b) = p.block_mut(block) {
        if let Some(var) = b.vars.get_mut(slot as usize) {
            *var = arr;
        }
        b.variadic = true;
    }
    Ok(None)
}

/// `= expr` after an optional parameter.
pub(crate) fn param_default_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = header(p)?;
    let (block, slot) = (decl.block, decl.last_slot);
    let optional = slot.is_some_and(|slot| {
        p.block(block)
            .is_some_and(|b| b.optional.contains(&slot))
    });
    if !optional {
        return Err(p.error(CompileErrorKind::IllegalOptional));
    }
    expr::begin(p)
}

/// Guard assigning the default when the caller omitted the argument.
pub(crate) fn param_default_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let value = expr::finish(p)?;
    let decl = header(p)?;
    let block = decl.block;
    let Some(slot) = decl.last_slot else {
        return Err(p.unexpected());
    };
    let ty = p
        .block(block)
        .and_then(|b| b.vars.get(slot as usize).copied())
        .ok_or_else(|| p.unexpected())?;
    let token = p.unit.tree.node(value).token;
    expect_type(p, value, ty, token)?;
    let guard = p.push_block(BlockKind::OptionalInit { slot }, vec![value], token, None);
    p.append(block, guard);
    Ok(())
}

/// Register the function once its header is complete.
pub(crate) fn func_body_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let unit = p.index;
    let decl = header(p)?;
    let Some(name) = decl.name.clone() else {
        return Err(p.unexpected());
    };
    if !decl.params_done {
        return Err(p.unexpected());
    }
    let func = FuncObject {
        name: name.clone(),
        params: decl.params.clone(),
        first_optional: decl.first_optional,
        variadic: decl.variadic,
        result: decl.result,
        unit,
        block: decl.block,
    };
    let (is_run, public, result) = (decl.is_run, decl.public, decl.result);

    if !is_run && has_same_signature(p, &func) {
        return Err(p.error(CompileErrorKind::NameCollision { name }));
    }
    let id = p.ws.push_object(Object::Func(func));
    if is_run {
        p.unit.run = Some(id);
    } else {
        p.unit.namespace.add_func(&name, id);
        if public {
            p.unit.public.insert(id);
        }
    }
    p.funcs.push(FuncCtx {
        object: Some(id),
        result,
        infer: is_run && result.is_none(),
    });
    tracing::trace!(name, ?id, public, "function declared");
    Ok(None)
}

/// Another function of this unit with the same name and parameters.
fn has_same_signature(p: &Parser<'_>, func: &FuncObject) -> bool {
    p.unit
        .namespace
        .func_overloads(&func.name)
        .iter()
        .filter_map(|id| p.ws.object(*id).as_func())
        .any(|other| {
            other.unit == func.unit
                && other.variadic == func.variadic
                && other.params.len() == func.params.len()
                && other
                    .params
                    .iter()
                    .zip(&func.params)
                    .all(|(a, b)| type_name(p.ws, *a) == type_name(p.ws, *b))
        })
}

pub(crate) fn func_body_close(p: &mut Parser<'_>) -> Result<(), Error> {
    p.funcs.pop();
    Ok(())
}

// fn

pub(crate) fn fn_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let public = take_public(p);
    p.fn_decl = Some(FnDecl {
        name: None,
        params: Vec::new(),
        params_done: false,
        result: None,
        public,
    });
    Ok(None)
}

fn fn_header<'a>(p: &'a mut Parser<'_>) -> Result<&'a mut FnDecl, Error> {
    match p.fn_decl {
        Some(ref mut decl) => Ok(decl),
        None => Err(p.unexpected()),
    }
}

pub(crate) fn fn_ident(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    let decl = fn_header(p)?;
    if decl.name.is_none() {
        if name.contains('.') {
            return Err(p.error(CompileErrorKind::QualifiedIdent { name }));
        }
        if p.unit.namespace.types.contains_key(&name) {
            return Err(p.error(CompileErrorKind::NameCollision { name }));
        }
        fn_header(p)?.name = Some(name);
        return Ok(None);
    }
    if !decl.params_done || decl.result.is_some() {
        return Err(p.unexpected());
    }
    let ty = p.require_type(&name)?;
    fn_header(p)?.result = Some(ty);
    Ok(None)
}

pub(crate) fn fn_params_open(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let decl = fn_header(p)?;
    if decl.name.is_none() || decl.params_done {
        return Err(p.unexpected());
    }
    Ok(None)
}

pub(crate) fn fn_param(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    let ty = p.require_type(&name)?;
    fn_header(p)?.params.push(ty);
    Ok(None)
}

pub(crate) fn fn_params_close(p: &mut Parser<'_>) -> Result<(), Error> {
    fn_header(p)?.params_done = true;
    Ok(())
}

/// Declare the named function-signature type.
pub(crate) fn fn_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let Some(decl) = p.fn_decl.take() else {
        return Err(p.unexpected());
    };
    let (Some(name), true) = (decl.name, decl.params_done) else {
        return Err(p.unexpected());
    };
    let id = func_type(
        p.ws,
        &mut p.unit.namespace,
        &decl.params,
        decl.result,
        Some(&name),
    );
    if decl.public {
        p.unit.public.insert(id);
    }
    tracing::trace!(name, ?id, "function type declared");
    Ok(())
}

// const

pub(crate) fn const_begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let public = take_public(p);
    let token = p.token_index();
    let root = p.push_block(BlockKind::Const, Vec::new(), token, None);
    p.current = Some(root);
    p.constant = Some(ConstDecl {
        name: None,
        root,
        public,
        defined: false,
    });
    Ok(None)
}

fn is_const_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

pub(crate) fn const_name(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let name = ident(p)?;
    let named = p.constant.as_ref().map(|c| c.name.is_some());
    if named != Some(false) {
        return Err(p.unexpected());
    }
    if name.contains('.') {
        return Err(p.error(CompileErrorKind::QualifiedIdent { name }));
    }
    if !is_const_name(&name) {
        return Err(p.error(CompileErrorKind::ConstCase { name }));
    }
    if p.unit.namespace.consts.contains_key(&name) {
        return Err(p.error(CompileErrorKind::NameCollision { name }));
    }
    if let Some(constant) = p.constant.as_mut() {
        constant.name = Some(name);
    }
    Ok(None)
}

pub(crate) fn const_value_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let value = expr::finish(p)?;
    let pending = p.constant.as_ref().and_then(|c| match (&c.name, c.defined) {
        (Some(name), false) => Some((name.clone(), c.root, c.public)),
        _ => None,
    });
    let Some((name, root, public)) = pending else {
        return Err(p.unexpected());
    };
    let Some(result) = p.result_of(value) else {
        return Err(p.expected_expression());
    };
    p.append(root, value);
    let id = p.ws.push_object(Object::Const(ConstObject {
        name: name.clone(),
        result,
        unit: p.index,
        root,
    }));
    p.unit.namespace.consts.insert(name.clone(), id);
    if public {
        p.unit.public.insert(id);
    }
    if let Some(constant) = p.constant.as_mut() {
        constant.defined = true;
    }
    tracing::trace!(name, ?id, "constant declared");
    Ok(())
}

pub(crate) fn const_close(p: &mut Parser<'_>) -> Result<(), Error> {
    p.current = None;
    let defined = p.constant.take().is_some_and(|c| c.defined);
    if !defined {
        return Err(p.expected_expression());
    }
    Ok(())
}

// import

/// `import "name"` brings the public names of a compiled unit into scope.
pub(crate) fn import_unit(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let TokenKind::Str(name) = p.token().clone() else {
        return Err(p.unexpected());
    };
    if !p.imported.insert(name.clone()) {
        return Ok(None);
    }
    let other = p.ws.unit_index(&name).and_then(|index| p.ws.unit(index)).cloned();
    let Some(other) = other else {
        return Err(Error::Link {
            kind: LinkErrorKind::UnknownUnit { name },
            pos: Some(Position::of_token(&p.unit, p.token_index())),
        });
    };
    p.unit.namespace.import_public(&other.namespace, &other.public);
    p.ws.mark_linked(&name);
    tracing::debug!(unit = %name, "imported");
    Ok(None)
}
