//! Top-level program objects: types, functions, natives and constants.

use crate::{Builtin, NodeId};
use std::fmt;

/// Index of an object in the workspace object table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ObjectId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// A registered object.
#[derive(Clone, Debug)]
pub enum Object {
    Type(TypeDesc),
    Func(FuncObject),
    Embed(EmbedObject),
    Const(ConstObject),
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::Type(ty) => &ty.name,
            Object::Func(func) => &func.name,
            Object::Embed(embed) => &embed.name,
            Object::Const(constant) => &constant.name,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDesc> {
        match self {
            Object::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncObject> {
        match self {
            Object::Func(func) => Some(func),
            _ => None,
        }
    }

    /// Parameter types, variadic flag and result, for anything callable.
    pub fn signature(&self) -> Option<(&[ObjectId], bool, Option<ObjectId>)> {
        match self {
            Object::Func(func) => Some((&func.params, func.variadic, func.result)),
            Object::Embed(embed) => Some((&embed.params, embed.variadic, embed.result)),
            Object::Type(_) | Object::Const(_) => None,
        }
    }
}

/// Type descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDesc {
    pub name: String,
    pub kind: TypeKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    /// `arr.<elem>`; `None` is the open `arr*` used by native signatures.
    Array(Option<ObjectId>),
    /// `map.<elem>` with string keys; `None` is the open `map*`.
    Map(Option<ObjectId>),
    /// Function signature declared with `fn`.
    Func {
        params: Vec<ObjectId>,
        result: Option<ObjectId>,
    },
    /// Hidden wildcard accepted by `print(...)` and friends.
    Any,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Str,
    Char,
    Range,
    Thread,
}

impl Primitive {
    pub const ALL: [Primitive; 7] = [
        Primitive::Int,
        Primitive::Float,
        Primitive::Bool,
        Primitive::Str,
        Primitive::Char,
        Primitive::Range,
        Primitive::Thread,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Str => "str",
            Primitive::Char => "char",
            Primitive::Range => "range",
            Primitive::Thread => "thread",
        }
    }
}

/// Well-known standard library types, cached for literal typing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Primitives {
    pub int: ObjectId,
    pub float: ObjectId,
    pub bool: ObjectId,
    pub str: ObjectId,
    pub char: ObjectId,
    pub range: ObjectId,
    pub thread: ObjectId,
    pub any: ObjectId,
}

impl Primitives {
    pub fn get(&self, primitive: Primitive) -> ObjectId {
        match primitive {
            Primitive::Int => self.int,
            Primitive::Float => self.float,
            Primitive::Bool => self.bool,
            Primitive::Str => self.str,
            Primitive::Char => self.char,
            Primitive::Range => self.range,
            Primitive::Thread => self.thread,
        }
    }
}

/// A function written in Gentee.
#[derive(Clone, Debug)]
pub struct FuncObject {
    pub name: String,
    pub params: Vec<ObjectId>,
    /// Index of the first optional parameter.
    pub first_optional: Option<usize>,
    /// Last parameter collects the remaining arguments as an array.
    pub variadic: bool,
    pub result: Option<ObjectId>,
    pub unit: usize,
    /// Function block in the unit's command tree.
    pub block: NodeId,
}

impl FuncObject {
    /// Smallest accepted argument count.
    pub fn min_args(&self) -> usize {
        let required = self.first_optional.unwrap_or(self.params.len());
        if self.variadic {
            required.min(self.params.len().saturating_sub(1))
        } else {
            required
        }
    }
}

/// A standard library function implemented natively.
#[derive(Clone, Debug)]
pub struct EmbedObject {
    pub name: String,
    pub params: Vec<ObjectId>,
    pub variadic: bool,
    pub result: Option<ObjectId>,
    pub builtin: Builtin,
}

/// A named constant, evaluated lazily once per run.
#[derive(Clone, Debug)]
pub struct ConstObject {
    pub name: String,
    pub result: ObjectId,
    pub unit: usize,
    /// Root of the initializer expression in the unit's command tree.
    pub root: NodeId,
}
