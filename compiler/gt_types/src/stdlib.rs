//! The standard library unit.
//!
//! Unit 0 of every workspace. It declares the primitive types, the string
//! containers `arr`/`map`, and one embedded object per native overload in
//! [`EMBEDDED`]. Everything except the wildcard `any` and the open
//! containers is public, so every compiled unit sees it.

use crate::resolve_type;
use gt_ir::{
    Builtin, EmbedObject, Namespace, Object, ObjectId, Primitive, Primitives, TypeDesc, TypeKind,
    Unit, Workspace, STDLIB_UNIT,
};
use rustc_hash::FxHashSet;

/// `(name, native, parameters, result)`.
///
/// Parameters are comma-separated type names; a trailing `...` marks the
/// last one variadic. An empty result means the function returns nothing.
pub const EMBEDDED: &[(&str, Builtin, &str, &str)] = &[
    // Arithmetic
    ("Add", Builtin::Add, "int,int", "int"),
    ("Add", Builtin::Add, "float,float", "float"),
    ("Add", Builtin::Add, "str,str", "str"),
    ("Sub", Builtin::Sub, "int,int", "int"),
    ("Sub", Builtin::Sub, "float,float", "float"),
    ("Mul", Builtin::Mul, "int,int", "int"),
    ("Mul", Builtin::Mul, "float,float", "float"),
    ("Div", Builtin::Div, "int,int", "int"),
    ("Div", Builtin::Div, "float,float", "float"),
    ("Mod", Builtin::Mod, "int,int", "int"),
    ("BitAnd", Builtin::BitAnd, "int,int", "int"),
    ("BitOr", Builtin::BitOr, "int,int", "int"),
    ("BitXor", Builtin::BitXor, "int,int", "int"),
    ("LShift", Builtin::Shl, "int,int", "int"),
    ("RShift", Builtin::Shr, "int,int", "int"),
    // Comparison
    ("Equal", Builtin::Equal, "int,int", "bool"),
    ("Equal", Builtin::Equal, "float,float", "bool"),
    ("Equal", Builtin::Equal, "str,str", "bool"),
    ("Equal", Builtin::Equal, "bool,bool", "bool"),
    ("Equal", Builtin::Equal, "char,char", "bool"),
    ("Less", Builtin::Less, "int,int", "bool"),
    ("Less", Builtin::Less, "float,float", "bool"),
    ("Less", Builtin::Less, "str,str", "bool"),
    ("Less", Builtin::Less, "char,char", "bool"),
    ("Greater", Builtin::Greater, "int,int", "bool"),
    ("Greater", Builtin::Greater, "float,float", "bool"),
    ("Greater", Builtin::Greater, "str,str", "bool"),
    ("Greater", Builtin::Greater, "char,char", "bool"),
    // Unary
    ("Not", Builtin::Not, "bool", "bool"),
    ("Sign", Builtin::Sign, "int", "int"),
    ("Sign", Builtin::Sign, "float", "float"),
    ("BitNot", Builtin::BitNot, "int", "int"),
    ("Len", Builtin::Len, "str", "int"),
    ("Len", Builtin::Len, "arr*", "int"),
    ("Len", Builtin::Len, "map*", "int"),
    ("NewRange", Builtin::NewRange, "int,int", "range"),
    // Conversions
    ("int", Builtin::ToInt, "float", "int"),
    ("int", Builtin::ToInt, "str", "int"),
    ("int", Builtin::ToInt, "char", "int"),
    ("int", Builtin::ToInt, "bool", "int"),
    ("float", Builtin::ToFloat, "int", "float"),
    ("float", Builtin::ToFloat, "str", "float"),
    ("str", Builtin::ToStr, "int", "str"),
    ("str", Builtin::ToStr, "float", "str"),
    ("str", Builtin::ToStr, "bool", "str"),
    ("str", Builtin::ToStr, "char", "str"),
    ("bool", Builtin::ToBool, "int", "bool"),
    ("bool", Builtin::ToBool, "str", "bool"),
    ("char", Builtin::ToChar, "int", "char"),
    // Containers
    ("IsKey", Builtin::IsKey, "map*,str", "bool"),
    // Console and control
    ("print", Builtin::Print, "any...", ""),
    ("println", Builtin::Println, "any...", ""),
    ("error", Builtin::Error, "str", ""),
    ("sleep", Builtin::Sleep, "int", ""),
    ("wait", Builtin::Wait, "thread", ""),
    // Command line
    ("Args", Builtin::Args, "", "arr.str"),
    ("ArgCount", Builtin::ArgCount, "", "int"),
    ("Arg", Builtin::Arg, "str", "str"),
    ("Arg", Builtin::ArgOr, "str,str", "str"),
    ("Arg", Builtin::ArgInt, "str,int", "int"),
    ("Args", Builtin::ArgsOf, "str", "arr.str"),
    ("ArgsTail", Builtin::ArgsTail, "", "arr.str"),
    ("IsArg", Builtin::IsArg, "str", "bool"),
    // Process
    ("Open", Builtin::Open, "str", ""),
    ("OpenWith", Builtin::OpenWith, "str,str", ""),
    // Paths
    ("AbsPath", Builtin::AbsPath, "str", "str"),
    ("BaseName", Builtin::BaseName, "str", "str"),
    ("Dir", Builtin::Dir, "str", "str"),
    ("Ext", Builtin::Ext, "str", "str"),
    ("JoinPath", Builtin::JoinPath, "str...", "str"),
    ("MatchPath", Builtin::MatchPath, "str,str", "bool"),
];

/// A workspace holding only the standard library unit.
#[tracing::instrument(level = "debug")]
pub fn new_workspace() -> Workspace {
    let mut ws = Workspace::new();
    let mut ns = Namespace::default();
    let mut public = FxHashSet::default();

    let mut primitive = |ws: &mut Workspace, ns: &mut Namespace, p: Primitive| {
        let id = ws.push_object(Object::Type(TypeDesc {
            name: p.name().to_string(),
            kind: TypeKind::Primitive(p),
        }));
        ns.types.insert(p.name().to_string(), id);
        public.insert(id);
        id
    };
    let int_ty = primitive(&mut ws, &mut ns, Primitive::Int);
    let float_ty = primitive(&mut ws, &mut ns, Primitive::Float);
    let bool_ty = primitive(&mut ws, &mut ns, Primitive::Bool);
    let str_ty = primitive(&mut ws, &mut ns, Primitive::Str);
    let char_ty = primitive(&mut ws, &mut ns, Primitive::Char);
    let range_ty = primitive(&mut ws, &mut ns, Primitive::Range);
    let thread_ty = primitive(&mut ws, &mut ns, Primitive::Thread);

    let any = ws.push_object(Object::Type(TypeDesc {
        name: "any".to_string(),
        kind: TypeKind::Any,
    }));
    ns.types.insert("any".to_string(), any);

    ws.set_primitives(Primitives {
        int: int_ty,
        float: float_ty,
        bool: bool_ty,
        str: str_ty,
        char: char_ty,
        range: range_ty,
        thread: thread_ty,
        any,
    });

    for name in ["arr", "map"] {
        if let Some(id) = resolve_type(&mut ws, &mut ns, name) {
            public.insert(id);
        }
    }

    for &(name, builtin, params, result) in EMBEDDED {
        let Some(object) = embed(&mut ws, &mut ns, name, builtin, params, result) else {
            tracing::warn!(name, params, "standard library signature does not resolve");
            continue;
        };
        let id = ws.push_object(Object::Embed(object));
        ns.add_func(name, id);
        public.insert(id);
    }

    let unit = Unit {
        name: "stdlib".to_string(),
        path: "stdlib".to_string(),
        namespace: ns,
        public,
        ..Unit::default()
    };
    let index = ws.register_unit(unit);
    debug_assert_eq!(index, STDLIB_UNIT);
    tracing::debug!(objects = ws.object_count(), "standard library registered");
    ws
}

fn embed(
    ws: &mut Workspace,
    ns: &mut Namespace,
    name: &str,
    builtin: Builtin,
    params: &str,
    result: &str,
) -> Option<EmbedObject> {
    let (params, variadic) = match params.strip_suffix("...") {
        Some(rest) => (rest, true),
        None => (params, false),
    };
    let params = params
        .split(',')
        .filter(|p| !p.is_empty())
        .map(|p| resolve_type(ws, ns, p))
        .collect::<Option<Vec<ObjectId>>>()?;
    let result = if result.is_empty() {
        None
    } else {
        Some(resolve_type(ws, ns, result)?)
    };
    Some(EmbedObject {
        name: name.to_string(),
        params,
        variadic,
        result,
        builtin,
    })
}
