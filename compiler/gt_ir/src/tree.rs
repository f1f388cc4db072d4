//! The command tree.
//!
//! Each unit owns one [`CommandTree`], an arena of [`Node`]s addressed by
//! [`NodeId`]. Nodes are appended while compiling and never removed; blocks
//! point back at their enclosing block by index, so the arena has no
//! ownership cycles and is dropped as a whole.

use crate::{Builtin, ObjectId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Index of a node in its unit's command tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One executable command.
#[derive(Clone, Debug)]
pub struct Node {
    pub cmd: Cmd,
    /// Index of the originating token, for diagnostics.
    pub token: u32,
    result: Option<ObjectId>,
}

impl Node {
    pub fn new(cmd: Cmd, token: u32) -> Self {
        Node {
            cmd,
            token,
            result: None,
        }
    }

    /// Resolved result type; `None` for statements and void calls.
    #[inline]
    pub fn result(&self) -> Option<ObjectId> {
        self.result
    }

    /// Record the result type. The type is write-once: a second call with a
    /// different type is rejected and returns the type already stored.
    pub fn set_result(&mut self, ty: ObjectId) -> Result<(), ObjectId> {
        match self.result {
            Some(existing) if existing != ty => Err(existing),
            _ => {
                self.result = Some(ty);
                Ok(())
            }
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.cmd {
            Cmd::Block(block) => Some(block),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Cmd {
    Value(Literal),
    /// Local variable: owning block and slot index in it.
    Var { block: NodeId, slot: u32 },
    Const(ObjectId),
    Block(Box<Block>),
    Unary {
        func: ObjectId,
        builtin: Builtin,
        operand: NodeId,
    },
    Binary {
        func: ObjectId,
        builtin: Builtin,
        left: NodeId,
        right: NodeId,
    },
    Call {
        target: CallTarget,
        args: Vec<NodeId>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Char(char),
    /// `&name` reference to a user function.
    Func(ObjectId),
}

/// What an n-ary call invokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallTarget {
    Func(ObjectId),
    Embed(ObjectId, Builtin),
    /// A value of a function-signature type computed by this node.
    Dynamic(NodeId),
}

/// Scope-and-control node.
#[derive(Clone, Debug)]
pub struct Block {
    pub kind: BlockKind,
    /// Lexically enclosing block; `None` for function and constant roots.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Local variable name to slot index.
    pub var_names: FxHashMap<String, u32>,
    /// Slot types, in declaration order.
    pub vars: Vec<ObjectId>,
    /// Slots of optional parameters.
    pub optional: FxHashSet<u32>,
    /// Leading slots that are parameters.
    pub params: u32,
    pub variadic: bool,
}

impl Block {
    pub fn new(kind: BlockKind, parent: Option<NodeId>) -> Self {
        Block {
            kind,
            parent,
            children: Vec::new(),
            var_names: FxHashMap::default(),
            vars: Vec::new(),
            optional: FxHashSet::default(),
            params: 0,
            variadic: false,
        }
    }

    /// Append a slot; returns its index.
    pub fn add_var(&mut self, name: &str, ty: ObjectId) -> u32 {
        let slot = u32::try_from(self.vars.len()).unwrap_or(u32::MAX);
        self.vars.push(ty);
        self.var_names.insert(name.to_string(), slot);
        slot
    }

    /// Blocks that carry variable storage at runtime.
    pub fn has_vars(&self) -> bool {
        !self.vars.is_empty()
    }
}

/// The control construct a block implements.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Function body; parameters occupy the first slots.
    Function,
    /// Plain `{ }` scope and branch bodies.
    Scope,
    /// `[cond, body]*` pairs, optionally followed by an else body.
    If,
    /// `[cond, body]`
    While,
    /// `[source, body]`; the loop variables live in this block.
    For { item: u32, index: Option<u32> },
    /// `[value, case*, default?]`
    Switch,
    /// `[value+, body]`
    Case,
    /// `[body]`
    Default,
    /// `[value?]`
    Return,
    Break,
    Continue,
    /// `[target, value]`
    Assign(AssignOp),
    /// `[array, element]`
    Append,
    And,
    Or,
    /// `[cond, then, else]`
    Ternary,
    /// `[target]`
    IncDec { pre: bool, delta: i64 },
    /// `[default]`, evaluated when the caller omitted `slot`.
    OptionalInit { slot: u32 },
    /// `[container, key]`
    Index,
    /// Array initializer elements.
    InitList,
    /// Body of a spawned thread.
    Go,
    /// Root of a constant initializer, `[expr]`.
    Const,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    /// `target = op(target, value)`; the target is evaluated once.
    Compound(CallTarget),
}

/// Arena of nodes for one unit.
#[derive(Clone, Debug, Default)]
pub struct CommandTree {
    nodes: Vec<Node>,
}

impl CommandTree {
    pub fn new() -> Self {
        CommandTree::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Block data of `id`, if it is a block.
    pub fn block(&self, id: NodeId) -> Option<&Block> {
        self.nodes.get(id.index()).and_then(Node::as_block)
    }

    pub fn block_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        match self.nodes.get_mut(id.index()).map(|node| &mut node.cmd) {
            Some(Cmd::Block(block)) => Some(block),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
