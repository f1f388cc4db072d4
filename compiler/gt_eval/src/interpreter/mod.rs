//! The evaluation context of one thread of a run.
//!
//! An [`Interpreter`] walks command nodes of the program snapshot it
//! borrows. Local variables live in a stack of [`Frame`]s, one per active
//! block that declares variables; `base` marks the first frame of the
//! function being executed, so variable lookup never sees a caller's
//! locals. A thread spawned by `go` starts with a copy of the frames of
//! the function that spawned it.

use crate::runner::Shared;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;
use gt_diagnostic::{Error, Position, RuntimeErrorKind};
use gt_ir::{Block, BlockKind, Cmd, Literal, Node, NodeId, Object, ObjectId, Unit, Workspace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-local exits threaded up through block evaluation.
#[derive(Debug)]
pub(crate) enum Unwind {
    Break,
    Continue,
    Return(Value),
    Fail(Error),
}

impl From<Error> for Unwind {
    fn from(err: Error) -> Self {
        Unwind::Fail(err)
    }
}

impl Unwind {
    /// Attach the position of `token` to a runtime error that has none yet.
    fn locate(self, unit: &Unit, token: u32) -> Unwind {
        match self {
            Unwind::Fail(Error::Runtime { kind, pos: None }) => Unwind::Fail(Error::Runtime {
                kind,
                pos: Some(Position::of_token(unit, token)),
            }),
            other => other,
        }
    }
}

pub(crate) type Flow<T = Value> = Result<T, Unwind>;

/// Variable storage of one active block.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub(crate) block: NodeId,
    pub(crate) vars: Vec<Value>,
    /// Optional parameter slots the caller left out.
    pub(crate) omitted: Vec<u32>,
}

/// An assignable location.
pub(crate) enum Place {
    Slot { frame: usize, slot: usize },
    Item { container: Value, key: Value },
}

pub(crate) struct Interpreter<'p> {
    pub(crate) program: &'p Workspace,
    pub(crate) shared: Arc<Shared>,
    /// Unit whose command tree is being executed.
    pub(crate) unit: usize,
    pub(crate) frames: Vec<Frame>,
    pub(crate) base: usize,
    pub(crate) depth: usize,
    pub(crate) close: Arc<AtomicBool>,
}

impl<'p> Interpreter<'p> {
    pub(crate) fn new(program: &'p Workspace, shared: Arc<Shared>, unit: usize) -> Self {
        Interpreter {
            program,
            shared,
            unit,
            frames: Vec::new(),
            base: 0,
            depth: 0,
            close: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn unit(&self) -> &'p Unit {
        let units: &'p [Arc<Unit>] = self.program.units();
        &units[self.unit]
    }

    pub(crate) fn node(&self, id: NodeId) -> &'p Node {
        self.unit().tree.node(id)
    }

    pub(crate) fn block(&self, id: NodeId) -> Option<&'p Block> {
        self.unit().tree.block(id)
    }

    /// Fail with `Interrupted` once this thread has been told to close.
    pub(crate) fn check_close(&self) -> Result<(), Error> {
        if self.close.load(Ordering::Relaxed) {
            return Err(Error::runtime(RuntimeErrorKind::Interrupted));
        }
        Ok(())
    }

    /// Evaluate a node. Runtime errors get the node's position.
    ///
    /// Nested operands recurse through here, so the native stack grows on
    /// demand instead of at call boundaries only.
    pub(crate) fn eval(&mut self, id: NodeId) -> Flow {
        let node = self.node(id);
        ensure_sufficient_stack(|| self.eval_cmd(id, node))
            .map_err(|unwind| unwind.locate(self.unit(), node.token))
    }

    fn eval_cmd(&mut self, id: NodeId, node: &'p Node) -> Flow {
        match &node.cmd {
            Cmd::Value(literal) => Ok(match literal {
                Literal::Int(v) => Value::Int(*v),
                Literal::Float(v) => Value::Float(*v),
                Literal::Bool(v) => Value::Bool(*v),
                Literal::Str(v) => Value::Str(v.clone()),
                Literal::Char(v) => Value::Char(*v),
                Literal::Func(f) => Value::Func(Some(*f)),
            }),
            Cmd::Var { block, slot } => {
                let frame = self.frame_of(*block)?;
                Ok(self.frames[frame].vars[*slot as usize].clone())
            }
            Cmd::Const(constant) => Ok(self.constant(*constant)?),
            Cmd::Block(block) => self.exec_block(id, block),
            Cmd::Unary {
                builtin, operand, ..
            } => {
                let value = self.eval(*operand)?;
                Ok(self.embed(*builtin, smallvec::smallvec![value])?)
            }
            Cmd::Binary {
                builtin,
                left,
                right,
                ..
            } => {
                let left = self.eval(*left)?;
                let right = self.eval(*right)?;
                Ok(self.embed(*builtin, smallvec::smallvec![left, right])?)
            }
            Cmd::Call { target, args } => self.call(*target, args),
        }
    }

    /// Evaluate a condition.
    pub(crate) fn truth(&mut self, id: NodeId) -> Flow<bool> {
        Ok(self.eval(id)?.as_bool().unwrap_or(false))
    }

    /// Index of the innermost frame of `block` in the current function.
    pub(crate) fn frame_of(&self, block: NodeId) -> Result<usize, Error> {
        self.frames[self.base..]
            .iter()
            .rposition(|frame| frame.block == block)
            .map(|i| i + self.base)
            .ok_or_else(|| {
                Error::runtime(RuntimeErrorKind::Custom {
                    message: "variable is not in scope".to_string(),
                })
            })
    }

    /// Push zero-initialized storage for `block`; returns the frame index.
    pub(crate) fn push_frame(&mut self, id: NodeId, block: &Block) -> usize {
        let vars = block
            .vars
            .iter()
            .map(|ty| Value::zero(self.program, *ty))
            .collect();
        self.frames.push(Frame {
            block: id,
            vars,
            omitted: Vec::new(),
        });
        self.frames.len() - 1
    }

    pub(crate) fn place(&mut self, id: NodeId) -> Flow<Place> {
        let node = self.node(id);
        match &node.cmd {
            Cmd::Var { block, slot } => Ok(Place::Slot {
                frame: self.frame_of(*block)?,
                slot: *slot as usize,
            }),
            Cmd::Block(block) if block.kind == BlockKind::Index => {
                let [container, key] = block.children[..] else {
                    return Err(not_assignable().into());
                };
                let container = self.eval(container)?;
                let key = self.eval(key)?;
                Ok(Place::Item { container, key })
            }
            _ => Err(not_assignable().into()),
        }
    }

    pub(crate) fn read(&self, place: &Place) -> Result<Value, Error> {
        match place {
            Place::Slot { frame, slot } => Ok(self.frames[*frame].vars[*slot].clone()),
            Place::Item { container, key } => crate::exec::index_get(container, key),
        }
    }

    pub(crate) fn write(&mut self, place: &Place, value: Value) -> Result<(), Error> {
        match place {
            Place::Slot { frame, slot } => {
                self.frames[*frame].vars[*slot] = value;
                Ok(())
            }
            Place::Item { container, key } => crate::exec::index_set(container, key, value),
        }
    }

    /// Value of a constant, computed on first use and cached for the run.
    fn constant(&mut self, id: ObjectId) -> Result<Value, Error> {
        let cached = self.shared.consts.lock().get(&id).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }
        let program = self.program;
        let Object::Const(constant) = program.object(id) else {
            return Ok(Value::Void);
        };
        let root = program
            .unit(constant.unit)
            .and_then(|unit| unit.tree.block(constant.root))
            .and_then(|root| root.children.first().copied());
        let Some(expr) = root else {
            return Ok(Value::Void);
        };

        let saved = (self.unit, self.base);
        self.unit = constant.unit;
        self.base = self.frames.len();
        let value = self.eval(expr);
        (self.unit, self.base) = saved;

        let value = match value {
            Ok(value) | Err(Unwind::Return(value)) => value,
            Err(Unwind::Fail(err)) => return Err(err),
            Err(Unwind::Break | Unwind::Continue) => Value::Void,
        };
        tracing::trace!(name = %constant.name, "constant evaluated");
        Ok(self
            .shared
            .consts
            .lock()
            .entry(id)
            .or_insert(value)
            .clone())
    }
}

fn not_assignable() -> Error {
    Error::runtime(RuntimeErrorKind::Custom {
        message: "expression is not assignable".to_string(),
    })
}
