//! Reductions from the operator buffer to command nodes.

use super::{pop_operand, push_operand, Arith, Binary, Callee, Fence, Op, OpEntry, Prefix};
use crate::parser::Parser;
use gt_diagnostic::{CompileErrorKind, Error};
use gt_ir::{
    AssignOp, BlockKind, CallTarget, Cmd, NodeId, Object, ObjectId, Primitive, TypeKind,
};
use gt_types::{describe_types, is_equal_types, select_overload, type_name};
use smallvec::SmallVec;

/// Reduce the operator on top of the buffer.
pub(crate) fn reduce_top(p: &mut Parser<'_>) -> Result<(), Error> {
    let Some(entry) = p.expr.ops.pop() else {
        return Err(p.expected_expression());
    };
    let node = match entry.op {
        Op::Fence(fence) => {
            return Err(p.error_at(
                CompileErrorKind::UnclosedDelimiter {
                    delimiter: opener(&fence).to_string(),
                },
                entry.token as usize,
            ));
        }
        Op::Prefix(prefix) => {
            let operand = pop_operand(p)?;
            prefix_node(p, prefix, operand, entry.token)?
        }
        Op::Binary(op) => {
            let right = pop_operand(p)?;
            let left = pop_operand(p)?;
            binary_node(p, op, left, right, entry.token)?
        }
    };
    p.expr.operands.push(node);
    Ok(())
}

/// Reduce non-fence operators of the current expression while `pred`
/// accepts the top one's priority.
pub(crate) fn reduce_while(p: &mut Parser<'_>, pred: impl Fn(u8) -> bool) -> Result<(), Error> {
    loop {
        let priority = match p.expr.top().map(|entry| &entry.op) {
            Some(Op::Binary(op)) => op.priority(),
            Some(Op::Prefix(prefix)) => prefix.priority(),
            Some(Op::Fence(_)) | None => return Ok(()),
        };
        if !pred(priority) {
            return Ok(());
        }
        reduce_top(p)?;
    }
}

/// Close the innermost fence and push what it produces.
pub(crate) fn close_fence(p: &mut Parser<'_>) -> Result<(), Error> {
    reduce_while(p, |_| true)?;
    let fenced = matches!(p.expr.top().map(|entry| &entry.op), Some(Op::Fence(_)));
    let entry = if fenced { p.expr.ops.pop() } else { None };
    let Some(OpEntry {
        op: Op::Fence(fence),
        token,
    }) = entry
    else {
        return Err(p.unexpected());
    };
    let node = match fence {
        Fence::Paren { base } => {
            if p.expr.operands.len() != base + 1 {
                return Err(p.expected_expression());
            }
            pop_operand(p)?
        }
        Fence::Call { callee, base, .. } => {
            let args = p.expr.operands.split_off(base);
            call(p, callee, args, token)?
        }
        Fence::Index { base } => {
            let args = p.expr.operands.split_off(base);
            let [container, key] = args[..] else {
                return Err(p.expected_expression());
            };
            index(p, container, key, token)?
        }
        Fence::Ternary { base } => {
            let args = p.expr.operands.split_off(base);
            ternary(p, args, token)?
        }
        Fence::InitList { base } => {
            let elems = p.expr.operands.split_off(base);
            init_list(p, elems, token)?
        }
    };
    push_operand(p, node);
    Ok(())
}

fn opener(fence: &Fence) -> &'static str {
    match fence {
        Fence::Paren { .. } | Fence::Call { .. } => "(",
        Fence::Index { .. } => "[",
        Fence::Ternary { .. } => "?(",
        Fence::InitList { .. } => "{",
    }
}

fn prefix_node(
    p: &mut Parser<'_>,
    prefix: Prefix,
    operand: NodeId,
    token: u32,
) -> Result<NodeId, Error> {
    let name = match prefix {
        Prefix::Inc => return inc_dec(p, operand, true, 1, token),
        Prefix::Dec => return inc_dec(p, operand, true, -1, token),
        Prefix::Not => "Not",
        Prefix::Sign => "Sign",
        Prefix::BitNot => "BitNot",
        Prefix::Len => "Len",
    };
    make_call(p, name, vec![operand], token)
}

fn binary_node(
    p: &mut Parser<'_>,
    op: Binary,
    left: NodeId,
    right: NodeId,
    token: u32,
) -> Result<NodeId, Error> {
    match op {
        Binary::Assign => {
            let target = lvalue(p, left, token)?;
            expect_type(p, right, target, token)?;
            Ok(p.push_block(
                BlockKind::Assign(AssignOp::Set),
                vec![left, right],
                token,
                Some(target),
            ))
        }
        Binary::Compound(arith) => compound(p, arith, left, right, token),
        Binary::And | Binary::Or => {
            let bool_ty = p.prims.bool;
            expect_type(p, left, bool_ty, token)?;
            expect_type(p, right, bool_ty, token)?;
            let kind = if op == Binary::And {
                BlockKind::And
            } else {
                BlockKind::Or
            };
            Ok(p.push_block(kind, vec![left, right], token, Some(bool_ty)))
        }
        Binary::Range => make_call(p, "NewRange", vec![left, right], token),
        Binary::Compare(cmp) => {
            let (name, negate) = cmp.func();
            let node = make_call(p, name, vec![left, right], token)?;
            if negate {
                make_call(p, "Not", vec![node], token)
            } else {
                Ok(node)
            }
        }
        Binary::Arith(arith) => make_call(p, arith.func_name(), vec![left, right], token),
    }
}

/// `a op= b`. Appends to an array when `+=` gets a matching element.
fn compound(
    p: &mut Parser<'_>,
    arith: Arith,
    left: NodeId,
    right: NodeId,
    token: u32,
) -> Result<NodeId, Error> {
    let target = lvalue(p, left, token)?;
    let value = p.result_of(right);
    if arith == Arith::Add {
        let elem = match p.ws.type_desc(target).map(|d| &d.kind) {
            Some(TypeKind::Array(Some(elem))) => Some(*elem),
            _ => None,
        };
        if let (Some(elem), Some(value)) = (elem, value) {
            if is_equal_types(p.ws, elem, value) {
                return Ok(p.push_block(BlockKind::Append, vec![left, right], token, Some(target)));
            }
        }
    }
    let name = arith.func_name();
    let types = [Some(target), value];
    let id = overload(p, name, &types, token)?;
    let (call_target, result) = match p.ws.object(id) {
        Object::Embed(embed) => (CallTarget::Embed(id, embed.builtin), embed.result),
        Object::Func(func) => (CallTarget::Func(id), func.result),
        _ => return Err(unknown_function(p, name, &types, token)),
    };
    match result {
        Some(result) if is_equal_types(p.ws, target, result) => {}
        other => {
            return Err(mismatch(p, target, other, token));
        }
    }
    Ok(p.push_block(
        BlockKind::Assign(AssignOp::Compound(call_target)),
        vec![left, right],
        token,
        Some(target),
    ))
}

/// `++x`, `x--`: integer variables and elements only.
pub(crate) fn inc_dec(
    p: &mut Parser<'_>,
    target: NodeId,
    pre: bool,
    delta: i64,
    token: u32,
) -> Result<NodeId, Error> {
    let ty = lvalue(p, target, token)?;
    let int = p.prims.int;
    if !is_equal_types(p.ws, int, ty) {
        return Err(mismatch(p, int, Some(ty), token));
    }
    Ok(p.push_block(BlockKind::IncDec { pre, delta }, vec![target], token, Some(int)))
}

/// Type of an assignable node: a variable, or an element of an array or map.
fn lvalue(p: &Parser<'_>, node: NodeId, token: u32) -> Result<ObjectId, Error> {
    let n = p.unit.tree.node(node);
    let assignable = match &n.cmd {
        Cmd::Var { .. } => true,
        Cmd::Block(block) if block.kind == BlockKind::Index => block
            .children
            .first()
            .and_then(|c| p.result_of(*c))
            .and_then(|ty| p.ws.type_desc(ty))
            .is_some_and(|desc| matches!(desc.kind, TypeKind::Array(_) | TypeKind::Map(_))),
        _ => false,
    };
    match n.result() {
        Some(ty) if assignable => Ok(ty),
        _ => Err(p.error_at(CompileErrorKind::NotAssignable, token as usize)),
    }
}

/// Fail unless `node` yields a value assignable to `expected`.
pub(crate) fn expect_type(
    p: &Parser<'_>,
    node: NodeId,
    expected: ObjectId,
    token: u32,
) -> Result<(), Error> {
    match p.result_of(node) {
        Some(actual) if is_equal_types(p.ws, expected, actual) => Ok(()),
        actual => Err(mismatch(p, expected, actual, token)),
    }
}

fn mismatch(p: &Parser<'_>, expected: ObjectId, found: Option<ObjectId>, token: u32) -> Error {
    p.error_at(
        CompileErrorKind::TypeMismatch {
            expected: type_name(p.ws, expected),
            found: found.map_or_else(|| "void".to_string(), |ty| type_name(p.ws, ty)),
        },
        token as usize,
    )
}

fn unknown_function(p: &Parser<'_>, name: &str, types: &[Option<ObjectId>], token: u32) -> Error {
    p.error_at(
        CompileErrorKind::UnknownFunction {
            name: name.to_string(),
            args: describe_types(p.ws, types),
        },
        token as usize,
    )
}

fn overload(
    p: &Parser<'_>,
    name: &str,
    types: &[Option<ObjectId>],
    token: u32,
) -> Result<ObjectId, Error> {
    let candidates: SmallVec<[ObjectId; 4]> =
        p.unit.namespace.func_overloads(name).iter().copied().collect();
    select_overload(p.ws, &candidates, types, p.index)
        .ok_or_else(|| unknown_function(p, name, types, token))
}

/// Call `name` with `args`, choosing among its visible overloads.
pub(crate) fn make_call(
    p: &mut Parser<'_>,
    name: &str,
    args: Vec<NodeId>,
    token: u32,
) -> Result<NodeId, Error> {
    let types: Vec<Option<ObjectId>> = args.iter().map(|a| p.result_of(*a)).collect();
    let id = overload(p, name, &types, token)?;
    let (cmd, result) = match p.ws.object(id) {
        Object::Embed(embed) => {
            let builtin = embed.builtin;
            let cmd = match args.len() {
                1 if !embed.variadic => Cmd::Unary {
                    func: id,
                    builtin,
                    operand: args[0],
                },
                2 if !embed.variadic => Cmd::Binary {
                    func: id,
                    builtin,
                    left: args[0],
                    right: args[1],
                },
                _ => Cmd::Call {
                    target: CallTarget::Embed(id, builtin),
                    args,
                },
            };
            (cmd, embed.result)
        }
        Object::Func(func) => (
            Cmd::Call {
                target: CallTarget::Func(id),
                args,
            },
            func.result,
        ),
        _ => return Err(unknown_function(p, name, &types, token)),
    };
    tracing::trace!(name, ?id, "call resolved");
    Ok(p.push_node(cmd, token, result))
}

fn call(p: &mut Parser<'_>, callee: Callee, args: Vec<NodeId>, token: u32) -> Result<NodeId, Error> {
    let var = match callee {
        Callee::Named(name) => return make_call(p, &name, args, token),
        Callee::Dynamic(var) => var,
    };
    let ty = p.result_of(var);
    let signature = match ty.and_then(|t| p.ws.type_desc(t)).map(|d| &d.kind) {
        Some(TypeKind::Func { params, result }) => Some((params.clone(), *result)),
        _ => None,
    };
    let types: Vec<Option<ObjectId>> = args.iter().map(|a| p.result_of(*a)).collect();
    let name = ty.map_or_else(String::new, |t| type_name(p.ws, t));
    let Some((params, result)) = signature else {
        return Err(unknown_function(p, &name, &types, token));
    };
    let fits = params.len() == types.len()
        && params.iter().zip(&types).all(|(param, arg)| {
            arg.is_some_and(|arg| is_equal_types(p.ws, *param, arg))
        });
    if !fits {
        return Err(unknown_function(p, &name, &types, token));
    }
    Ok(p.push_node(
        Cmd::Call {
            target: CallTarget::Dynamic(var),
            args,
        },
        token,
        result,
    ))
}

/// `container[key]`: arrays by int, maps by str, strings by int to char.
fn index(p: &mut Parser<'_>, container: NodeId, key: NodeId, token: u32) -> Result<NodeId, Error> {
    let ty = p.result_of(container);
    let kind = ty.and_then(|t| p.ws.type_desc(t)).map(|d| d.kind.clone());
    let (key_ty, elem) = match kind {
        Some(TypeKind::Array(Some(elem))) => (p.prims.int, elem),
        Some(TypeKind::Map(Some(elem))) => (p.prims.str, elem),
        Some(TypeKind::Primitive(Primitive::Str)) => (p.prims.int, p.prims.char),
        _ => {
            return Err(p.error_at(
                CompileErrorKind::TypeMismatch {
                    expected: "arr, map or str".to_string(),
                    found: ty.map_or_else(|| "void".to_string(), |t| type_name(p.ws, t)),
                },
                token as usize,
            ));
        }
    };
    expect_type(p, key, key_ty, token)?;
    Ok(p.push_block(BlockKind::Index, vec![container, key], token, Some(elem)))
}

/// `?(cond, then, else)`
fn ternary(p: &mut Parser<'_>, args: Vec<NodeId>, token: u32) -> Result<NodeId, Error> {
    let [cond, then, other] = args[..] else {
        return Err(p.error_at(
            CompileErrorKind::UnknownFunction {
                name: "?".to_string(),
                args: describe_types(
                    p.ws,
                    &args.iter().map(|a| p.result_of(*a)).collect::<Vec<_>>(),
                ),
            },
            token as usize,
        ));
    };
    expect_type(p, cond, p.prims.bool, token)?;
    let Some(ty) = p.result_of(then) else {
        return Err(p.error_at(
            CompileErrorKind::ExpectedExpression {
                found: "void".to_string(),
            },
            token as usize,
        ));
    };
    expect_type(p, other, ty, token)?;
    Ok(p.push_block(BlockKind::Ternary, args, token, Some(ty)))
}

/// `{a, b, c}`: an `arr.<T>` of the first element's type. `{}` is an open
/// array that fits any array target.
fn init_list(p: &mut Parser<'_>, elems: Vec<NodeId>, token: u32) -> Result<NodeId, Error> {
    let name = match elems.first() {
        None => "arr*".to_string(),
        Some(first) => {
            let Some(elem) = p.result_of(*first) else {
                return Err(p.error_at(
                    CompileErrorKind::ExpectedExpression {
                        found: "void".to_string(),
                    },
                    token as usize,
                ));
            };
            for &e in &elems[1..] {
                expect_type(p, e, elem, token)?;
            }
            format!("arr.{}", type_name(p.ws, elem))
        }
    };
    let Some(ty) = p.resolve(&name) else {
        return Err(p.error_at(CompileErrorKind::UnknownType { name }, token as usize));
    };
    Ok(p.push_block(BlockKind::InitList, elems, token, Some(ty)))
}
