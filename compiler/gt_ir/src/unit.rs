//! Compiled units and their namespaces.

use crate::{CommandTree, LineOffsetTable, ObjectId, Token};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Names visible inside a unit.
///
/// Types, functions and constants live in separate tables, so the `str`
/// type and the `str(...)` conversions coexist. Function names map to every
/// overload in registration order: standard library first, then imports,
/// then the unit's own declarations.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    pub types: FxHashMap<String, ObjectId>,
    pub funcs: FxHashMap<String, SmallVec<[ObjectId; 4]>>,
    pub consts: FxHashMap<String, ObjectId>,
}

impl Namespace {
    pub fn add_func(&mut self, name: &str, id: ObjectId) {
        let overloads = self.funcs.entry(name.to_string()).or_default();
        if !overloads.contains(&id) {
            overloads.push(id);
        }
    }

    pub fn func_overloads(&self, name: &str) -> &[ObjectId] {
        self.funcs.get(name).map_or(&[], |list| list.as_slice())
    }

    /// Copy the entries of `other` whose object is in `public`.
    pub fn import_public(&mut self, other: &Namespace, public: &FxHashSet<ObjectId>) {
        for (name, id) in &other.types {
            if public.contains(id) {
                self.types.entry(name.clone()).or_insert(*id);
            }
        }
        for (name, ids) in &other.funcs {
            for id in ids.iter().filter(|id| public.contains(id)) {
                self.add_func(name, *id);
            }
        }
        for (name, id) in &other.consts {
            if public.contains(id) {
                self.consts.entry(name.clone()).or_insert(*id);
            }
        }
    }
}

/// One compiled module.
#[derive(Clone, Debug, Default)]
pub struct Unit {
    /// Registration name; defaults to the path.
    pub name: String,
    pub path: String,
    pub source: String,
    pub tokens: Vec<Token>,
    pub lines: LineOffsetTable,
    pub tree: CommandTree,
    pub namespace: Namespace,
    /// Objects other units see on import.
    pub public: FxHashSet<ObjectId>,
    /// Entry function declared with `run`.
    pub run: Option<ObjectId>,
    /// Set by a bare `pub`: every later declaration is public.
    pub pub_mode: bool,
}

impl Unit {
    /// Byte offset of token `index`; one past the source for the end position.
    pub fn token_offset(&self, index: u32) -> u32 {
        self.tokens
            .get(index as usize)
            .map_or_else(|| u32::try_from(self.source.len()).unwrap_or(u32::MAX), |t| t.span.start)
    }

    /// 1-based `(line, column)` of token `index`.
    pub fn line_col(&self, index: u32) -> (u32, u32) {
        self.lines
            .offset_to_line_col(&self.source, self.token_offset(index))
    }
}
