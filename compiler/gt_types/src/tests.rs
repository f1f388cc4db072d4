#![allow(clippy::unwrap_used)]

use super::*;
use gt_ir::{Builtin, Namespace, Object, ObjectId, Workspace, STDLIB_UNIT};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn stdlib_namespace(ws: &Workspace) -> Namespace {
    let unit = ws.unit(STDLIB_UNIT).unwrap();
    let mut ns = Namespace::default();
    ns.import_public(&unit.namespace, &unit.public);
    ns
}

fn embed_overloads(ws: &Workspace, ns: &Namespace, name: &str) -> Vec<(Builtin, ObjectId)> {
    ns.func_overloads(name)
        .iter()
        .filter_map(|id| match ws.object(*id) {
            Object::Embed(embed) => Some((embed.builtin, *id)),
            _ => None,
        })
        .collect()
}

#[test]
fn stdlib_is_unit_zero_and_registers_every_signature() {
    let ws = new_workspace();
    assert_eq!(ws.unit_count(), 1);
    assert_eq!(ws.unit_index("stdlib"), Some(STDLIB_UNIT));
    let embeds = ws
        .objects()
        .iter()
        .filter(|o| matches!(o, Object::Embed(_)))
        .count();
    assert_eq!(embeds, EMBEDDED.len());
    assert!(ws.primitives().is_some());
}

#[test]
fn any_and_open_containers_stay_private() {
    let ws = new_workspace();
    let ns = stdlib_namespace(&ws);
    assert!(ns.types.contains_key("int"));
    assert!(ns.types.contains_key("arr"));
    assert!(ns.types.contains_key("map"));
    assert!(!ns.types.contains_key("any"));
    assert!(!ns.types.contains_key("arr*"));
}

#[test]
fn bare_containers_hold_strings() {
    let mut ws = new_workspace();
    let mut ns = stdlib_namespace(&ws);
    let arr = resolve_type(&mut ws, &mut ns, "arr").unwrap();
    let arr_str = resolve_type(&mut ws, &mut ns, "arr.str").unwrap();
    assert_eq!(arr, arr_str);
    assert_eq!(type_name(&ws, arr), "arr.str");
}

#[test]
fn nested_generics_resolve_recursively() {
    let mut ws = new_workspace();
    let mut ns = stdlib_namespace(&ws);
    let nested = resolve_type(&mut ws, &mut ns, "map.arr.int").unwrap();
    assert_eq!(type_name(&ws, nested), "map.arr.int");
    let inner = resolve_type(&mut ws, &mut ns, "arr.int").unwrap();
    match &ws.type_desc(nested).unwrap().kind {
        gt_ir::TypeKind::Map(Some(elem)) => assert_eq!(*elem, inner),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn unknown_names_do_not_resolve() {
    let mut ws = new_workspace();
    let mut ns = stdlib_namespace(&ws);
    let before = ws.object_count();
    assert_eq!(resolve_type(&mut ws, &mut ns, "point"), None);
    assert_eq!(resolve_type(&mut ws, &mut ns, "arr.point"), None);
    assert_eq!(ws.object_count(), before);
}

#[test]
fn open_containers_match_as_wildcards() {
    let mut ws = new_workspace();
    let mut ns = Namespace::default();
    let std_ns = &ws.unit(STDLIB_UNIT).unwrap().namespace.clone();
    ns.types = std_ns.types.clone();
    let open = resolve_type(&mut ws, &mut ns, "arr*").unwrap();
    let ints = resolve_type(&mut ws, &mut ns, "arr.int").unwrap();
    let maps = resolve_type(&mut ws, &mut ns, "map.int").unwrap();
    assert_eq!(compare_types(&ws, open, ints), TypeMatch::Wildcard);
    assert_eq!(compare_types(&ws, ints, ints), TypeMatch::Exact);
    assert_eq!(compare_types(&ws, open, maps), TypeMatch::None);
}

#[test]
fn same_generic_in_two_units_compares_exact() {
    let mut ws = new_workspace();
    let mut first = stdlib_namespace(&ws);
    let mut second = stdlib_namespace(&ws);
    let a = resolve_type(&mut ws, &mut first, "arr.int").unwrap();
    let b = resolve_type(&mut ws, &mut second, "arr.int").unwrap();
    assert_ne!(a, b);
    assert_eq!(compare_types(&ws, a, b), TypeMatch::Exact);
}

#[test]
fn func_types_compare_structurally() {
    let mut ws = new_workspace();
    let mut ns = stdlib_namespace(&ws);
    let prims = *ws.primitives().unwrap();
    let named = func_type(&mut ws, &mut ns, &[prims.int], Some(prims.str), Some("conv"));
    let anon = func_type(&mut ws, &mut ns, &[prims.int], Some(prims.str), None);
    let again = func_type(&mut ws, &mut ns, &[prims.int], Some(prims.str), None);
    let other = func_type(&mut ws, &mut ns, &[prims.int], Some(prims.int), None);
    assert_eq!(anon, again);
    assert_eq!(compare_types(&ws, named, anon), TypeMatch::Exact);
    assert_eq!(compare_types(&ws, named, other), TypeMatch::None);
}

#[test]
fn overloads_pick_the_exact_signature() {
    let ws = new_workspace();
    let ns = stdlib_namespace(&ws);
    let prims = *ws.primitives().unwrap();
    let adds = ns.func_overloads("Add");
    let chosen = select_overload(&ws, adds, &[Some(prims.float), Some(prims.float)], 1).unwrap();
    let (params, _, result) = ws.object(chosen).signature().unwrap();
    assert_eq!(params, &[prims.float, prims.float]);
    assert_eq!(result, Some(prims.float));
    assert_eq!(
        select_overload(&ws, adds, &[Some(prims.int), Some(prims.float)], 1),
        None
    );
}

#[test]
fn arg_overloads_dispatch_on_default_type() {
    let ws = new_workspace();
    let ns = stdlib_namespace(&ws);
    let prims = *ws.primitives().unwrap();
    let args = embed_overloads(&ws, &ns, "Arg");
    assert_eq!(args.len(), 3);
    let ids: Vec<ObjectId> = args.iter().map(|(_, id)| *id).collect();
    let pick = |types: &[Option<ObjectId>]| {
        let id = select_overload(&ws, &ids, types, 1).unwrap();
        args.iter().find(|(_, a)| *a == id).unwrap().0
    };
    assert_eq!(pick(&[Some(prims.str)]), Builtin::Arg);
    assert_eq!(pick(&[Some(prims.str), Some(prims.str)]), Builtin::ArgOr);
    assert_eq!(pick(&[Some(prims.str), Some(prims.int)]), Builtin::ArgInt);
}

#[test]
fn variadic_accepts_any_count_and_rejects_void() {
    let ws = new_workspace();
    let ns = stdlib_namespace(&ws);
    let prims = *ws.primitives().unwrap();
    let print = ns.func_overloads("print");
    assert!(select_overload(&ws, print, &[], 1).is_some());
    assert!(select_overload(&ws, print, &[Some(prims.int), Some(prims.str)], 1).is_some());
    assert_eq!(select_overload(&ws, print, &[None], 1), None);
}

#[test]
fn describe_types_names_void() {
    let ws = new_workspace();
    let prims = *ws.primitives().unwrap();
    assert_eq!(
        describe_types(&ws, &[Some(prims.int), None, Some(prims.str)]),
        "int, void, str"
    );
}

proptest! {
    #[test]
    fn generic_descriptors_are_memoized(depth in 1usize..5, leaf in prop::sample::select(vec!["int", "str", "bool", "float"])) {
        let mut ws = new_workspace();
        let mut ns = stdlib_namespace(&ws);
        let name = format!("{}{leaf}", "arr.".repeat(depth));
        let first = resolve_type(&mut ws, &mut ns, &name).unwrap();
        let count = ws.object_count();
        let second = resolve_type(&mut ws, &mut ns, &name).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(ws.object_count(), count);
        prop_assert_eq!(type_name(&ws, first), name);
    }
}
