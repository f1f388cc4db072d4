//! Runtime values.
//!
//! Scalars are copied on assignment. Arrays and maps are reference types:
//! assigning one, passing it to a function or capturing it in a `go` block
//! shares the same storage, guarded by a per-container lock.

use gt_ir::{ObjectId, Primitive, TypeKind, Workspace};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Char(char),
    /// Inclusive integer range.
    Range { from: i64, to: i64 },
    Array(ArrayRef),
    Map(MapRef),
    /// A user function; `None` until a variable of a `fn` type is assigned.
    Func(Option<ObjectId>),
    /// Handle of a spawned thread; `None` for an unassigned variable.
    Thread(Option<usize>),
    /// Result of calls that return nothing.
    Void,
}

impl Value {
    /// Zero value of type `ty`.
    pub fn zero(program: &Workspace, ty: ObjectId) -> Value {
        let Some(desc) = program.type_desc(ty) else {
            return Value::Void;
        };
        match &desc.kind {
            TypeKind::Primitive(primitive) => match primitive {
                Primitive::Int => Value::Int(0),
                Primitive::Float => Value::Float(0.0),
                Primitive::Bool => Value::Bool(false),
                Primitive::Str => Value::Str(String::new()),
                Primitive::Char => Value::Char('\0'),
                Primitive::Range => Value::Range { from: 0, to: 0 },
                Primitive::Thread => Value::Thread(None),
            },
            TypeKind::Array(_) => Value::Array(ArrayRef::default()),
            TypeKind::Map(_) => Value::Map(MapRef::default()),
            TypeKind::Func { .. } => Value::Func(None),
            TypeKind::Any => Value::Void,
        }
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(ArrayRef::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Char(_) => "char",
            Value::Range { .. } => "range",
            Value::Array(_) => "arr",
            Value::Map(_) => "map",
            Value::Func(_) => "fn",
            Value::Thread(_) => "thread",
            Value::Void => "void",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// Scalars compare by value, containers by contents.
impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Range { from: a, to: b }, Value::Range { from: c, to: d }) => a == c && b == d,
            (Value::Array(a), Value::Array(b)) => a.same(b) || *a.0.lock() == *b.0.lock(),
            (Value::Map(a), Value::Map(b)) => a.same(b) || *a.0.lock() == *b.0.lock(),
            (Value::Func(a), Value::Func(b)) => a == b,
            (Value::Thread(a), Value::Thread(b)) => a == b,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Printed form, also used by `str(...)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Char(v) => write!(f, "{v}"),
            Value::Range { from, to } => write!(f, "{from}..{to}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.snapshot().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("map[")?;
                for (i, (key, item)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{item}")?;
                }
                f.write_str("]")
            }
            Value::Func(_) => f.write_str("fn"),
            Value::Thread(_) => f.write_str("thread"),
            Value::Void => Ok(()),
        }
    }
}

/// Shared array storage.
#[derive(Clone, Debug, Default)]
pub struct ArrayRef(Arc<Mutex<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        ArrayRef(Arc::new(Mutex::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.lock().get(index).cloned()
    }

    /// Replace an existing element; `false` when `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.lock().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn push(&self, value: Value) {
        self.0.lock().push(value);
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.lock().clone()
    }

    /// Whether both handles point at the same storage.
    pub fn same(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared map storage with string keys, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MapRef(Arc<Mutex<IndexMap<String, Value>>>);

impl MapRef {
    pub fn new(entries: IndexMap<String, Value>) -> Self {
        MapRef(Arc::new(Mutex::new(entries)))
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.lock().contains_key(key)
    }

    pub fn insert(&self, key: String, value: Value) {
        self.0.lock().insert(key, value);
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn same(&self, other: &MapRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn containers_share_storage() {
        let items = ArrayRef::new(vec![Value::Int(1)]);
        let alias = items.clone();
        alias.push(Value::Int(2));
        assert_eq!(items.len(), 2);
        assert!(items.same(&alias));
        assert!(!items.same(&ArrayRef::new(items.snapshot())));
    }

    #[test]
    fn display_matches_print_output() {
        let map = MapRef::default();
        map.insert("b".into(), Value::Int(2));
        map.insert("a".into(), Value::Int(1));
        assert_eq!(Value::Map(map).to_string(), "map[b:2 a:1]");
        assert_eq!(
            Value::array(vec![Value::Int(1), Value::from("x")]).to_string(),
            "[1 x]"
        );
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Range { from: 1, to: 3 }.to_string(), "1..3");
        assert_eq!(Value::Void.to_string(), "");
    }

    #[test]
    fn out_of_range_set_is_rejected() {
        let items = ArrayRef::new(vec![Value::Int(1)]);
        assert!(items.set(0, Value::Int(5)));
        assert!(!items.set(3, Value::Int(5)));
        assert_eq!(items.get(0), Some(Value::Int(5)));
    }
}
