//! Type name resolution.

use crate::type_name;
use gt_ir::{Namespace, Object, ObjectId, TypeDesc, TypeKind, Workspace};

/// Generic container kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Container {
    Array,
    Map,
}

impl Container {
    fn prefix(self) -> &'static str {
        match self {
            Container::Array => "arr",
            Container::Map => "map",
        }
    }

    fn kind(self, elem: Option<ObjectId>) -> TypeKind {
        match self {
            Container::Array => TypeKind::Array(elem),
            Container::Map => TypeKind::Map(elem),
        }
    }
}

/// Resolve a dotted type name in `ns`.
///
/// Plain names are looked up directly. `arr.<rest>` and `map.<rest>` resolve
/// `<rest>` recursively and fetch or create the generic descriptor keyed by
/// its composed name; bare `arr` and `map` hold strings. `arr*` and `map*`
/// are the open containers used by native signatures.
pub fn resolve_type(ws: &mut Workspace, ns: &mut Namespace, name: &str) -> Option<ObjectId> {
    if let Some(&id) = ns.types.get(name) {
        return Some(id);
    }
    let (container, elem) = match name {
        "arr" => (Container::Array, Some("str")),
        "map" => (Container::Map, Some("str")),
        "arr*" => (Container::Array, None),
        "map*" => (Container::Map, None),
        _ => {
            if let Some(rest) = name.strip_prefix("arr.") {
                (Container::Array, Some(rest))
            } else if let Some(rest) = name.strip_prefix("map.") {
                (Container::Map, Some(rest))
            } else {
                return None;
            }
        }
    };
    let elem = match elem {
        Some(elem_name) => Some(resolve_type(ws, ns, elem_name)?),
        None => None,
    };
    Some(generic(ws, ns, container, elem, name))
}

fn generic(
    ws: &mut Workspace,
    ns: &mut Namespace,
    container: Container,
    elem: Option<ObjectId>,
    alias: &str,
) -> ObjectId {
    let canonical = match elem {
        Some(elem) => format!("{}.{}", container.prefix(), type_name(ws, elem)),
        None => format!("{}*", container.prefix()),
    };
    let id = match ns.types.get(&canonical) {
        Some(&id) => id,
        None => {
            let id = ws.push_object(Object::Type(TypeDesc {
                name: canonical.clone(),
                kind: container.kind(elem),
            }));
            tracing::trace!(name = %canonical, "generic type created");
            ns.types.insert(canonical.clone(), id);
            id
        }
    };
    if alias != canonical {
        ns.types.insert(alias.to_string(), id);
    }
    id
}

/// Function-signature descriptor.
///
/// With `name`, declares a new named type (`fn name(int) str`). Without it,
/// returns the unit's anonymous descriptor for the signature, creating it on
/// first use.
pub fn func_type(
    ws: &mut Workspace,
    ns: &mut Namespace,
    params: &[ObjectId],
    result: Option<ObjectId>,
    name: Option<&str>,
) -> ObjectId {
    let kind = TypeKind::Func {
        params: params.to_vec(),
        result,
    };
    if let Some(name) = name {
        let id = ws.push_object(Object::Type(TypeDesc {
            name: name.to_string(),
            kind,
        }));
        ns.types.insert(name.to_string(), id);
        return id;
    }
    let list: Vec<String> = params.iter().map(|p| type_name(ws, *p)).collect();
    let result_name = result.map(|r| type_name(ws, r)).unwrap_or_default();
    let anonymous = format!("fn({}){result_name}", list.join(","));
    if let Some(&id) = ns.types.get(&anonymous) {
        return id;
    }
    let id = ws.push_object(Object::Type(TypeDesc {
        name: anonymous.clone(),
        kind,
    }));
    ns.types.insert(anonymous, id);
    id
}
