//! Overload selection.

use crate::{compare_types, TypeMatch};
use gt_ir::{Object, ObjectId, Workspace, STDLIB_UNIT};

/// Element type a variadic parameter collects.
///
/// Signatures store the declared element type, so this is the identity; it
/// exists so callers do not depend on that layout.
pub fn variadic_elem(params: &[ObjectId]) -> Option<ObjectId> {
    params.last().copied()
}

/// Pick the candidate that best fits `args`.
///
/// A candidate is admissible when the argument count fits its parameters
/// (respecting optional and variadic ones) and every argument is assignable.
/// Exact matches score 2 per argument and wildcard matches 1. The highest
/// score wins; ties go to the unit being compiled, then imports, then the
/// standard library, then registration order.
pub fn select_overload(
    ws: &Workspace,
    candidates: &[ObjectId],
    args: &[Option<ObjectId>],
    unit: usize,
) -> Option<ObjectId> {
    let mut best: Option<(u32, u8, ObjectId)> = None;
    for &id in candidates {
        let Some(score) = score(ws, id, args) else {
            continue;
        };
        let rank = rank(ws.object(id), unit);
        let better = match best {
            None => true,
            Some((best_score, best_rank, _)) => {
                score > best_score || (score == best_score && rank < best_rank)
            }
        };
        if better {
            best = Some((score, rank, id));
        }
    }
    best.map(|(_, _, id)| id)
}

fn rank(object: &Object, unit: usize) -> u8 {
    match object {
        Object::Func(func) if func.unit == unit => 0,
        Object::Func(func) if func.unit != STDLIB_UNIT => 1,
        _ => 2,
    }
}

fn score(ws: &Workspace, id: ObjectId, args: &[Option<ObjectId>]) -> Option<u32> {
    let object = ws.object(id);
    let (params, variadic, _) = object.signature()?;
    let fixed = if variadic {
        params.len().saturating_sub(1)
    } else {
        params.len()
    };
    let min = match object {
        Object::Func(func) => func.min_args(),
        _ => fixed,
    };
    if args.len() < min || (!variadic && args.len() > params.len()) {
        return None;
    }
    let mut total = 0;
    for (i, arg) in args.iter().enumerate() {
        let expected = if variadic && i >= fixed {
            variadic_elem(params)?
        } else {
            params[i]
        };
        total += match compare_types(ws, expected, (*arg)?) {
            TypeMatch::Exact => 2,
            TypeMatch::Wildcard => 1,
            TypeMatch::None => return None,
        };
    }
    Some(total)
}
