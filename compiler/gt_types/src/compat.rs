//! Type comparison.

use gt_ir::{ObjectId, TypeKind, Workspace};

/// How well an actual type fits an expected one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeMatch {
    None,
    /// Fits through `any` or an open container.
    Wildcard,
    Exact,
}

/// Compare `actual` against `expected`.
///
/// Identical descriptors match exactly. Containers of the same kind compare
/// their elements, and an absent element on either side matches anything.
/// Function signatures compare structurally. Everything else compares by
/// identity.
pub fn compare_types(ws: &Workspace, expected: ObjectId, actual: ObjectId) -> TypeMatch {
    if expected == actual {
        return TypeMatch::Exact;
    }
    let (Some(exp), Some(act)) = (ws.type_desc(expected), ws.type_desc(actual)) else {
        return TypeMatch::None;
    };
    match (&exp.kind, &act.kind) {
        (TypeKind::Any, _) => TypeMatch::Wildcard,
        (TypeKind::Array(e), TypeKind::Array(a)) | (TypeKind::Map(e), TypeKind::Map(a)) => {
            match (e, a) {
                (Some(e), Some(a)) => compare_types(ws, *e, *a),
                _ => TypeMatch::Wildcard,
            }
        }
        (
            TypeKind::Func {
                params: exp_params,
                result: exp_result,
            },
            TypeKind::Func {
                params: act_params,
                result: act_result,
            },
        ) => {
            if exp_params.len() != act_params.len() {
                return TypeMatch::None;
            }
            let results = match (exp_result, act_result) {
                (None, None) => TypeMatch::Exact,
                (Some(e), Some(a)) => compare_types(ws, *e, *a),
                _ => TypeMatch::None,
            };
            exp_params
                .iter()
                .zip(act_params)
                .map(|(e, a)| compare_types(ws, *e, *a))
                .fold(results, std::cmp::Ord::min)
        }
        _ => TypeMatch::None,
    }
}

/// Whether a value of type `actual` may be used where `expected` is required.
pub fn is_equal_types(ws: &Workspace, expected: ObjectId, actual: ObjectId) -> bool {
    compare_types(ws, expected, actual) != TypeMatch::None
}

/// Display name of a type; non-types render as `?`.
pub fn type_name(ws: &Workspace, id: ObjectId) -> String {
    ws.type_desc(id)
        .map_or_else(|| "?".to_string(), |desc| desc.name.clone())
}

/// Comma-separated type names for diagnostics; void values render as `void`.
pub fn describe_types(ws: &Workspace, types: &[Option<ObjectId>]) -> String {
    types
        .iter()
        .map(|ty| ty.map_or_else(|| "void".to_string(), |id| type_name(ws, id)))
        .collect::<Vec<_>>()
        .join(", ")
}
