//! Block evaluation: scopes, control flow, assignments and containers.

mod call;
mod control;

use crate::interpreter::{Flow, Interpreter, Unwind};
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::{AssignOp, Block, BlockKind, CallTarget, NodeId};

impl<'p> Interpreter<'p> {
    pub(crate) fn exec_block(&mut self, id: NodeId, block: &'p Block) -> Flow {
        match block.kind {
            BlockKind::Function | BlockKind::Scope | BlockKind::Const => {
                self.check_close()?;
                self.scope(id, block)?;
                Ok(Value::Void)
            }
            BlockKind::If => self.if_chain(block).map(|()| Value::Void),
            BlockKind::While => self.while_loop(block).map(|()| Value::Void),
            BlockKind::For { item, index } => {
                self.for_loop(id, block, item, index).map(|()| Value::Void)
            }
            BlockKind::Switch => self.switch(block).map(|()| Value::Void),
            // Arms run only through their switch.
            BlockKind::Case | BlockKind::Default => Ok(Value::Void),
            BlockKind::Return => {
                let value = match block.children.first() {
                    Some(&value) => self.eval(value)?,
                    None => Value::Void,
                };
                Err(Unwind::Return(value))
            }
            BlockKind::Break => Err(Unwind::Break),
            BlockKind::Continue => Err(Unwind::Continue),
            BlockKind::Assign(op) => self.assign(block, op),
            BlockKind::Append => {
                let [array, item] = block.children[..] else {
                    return Ok(Value::Void);
                };
                let array = self.eval(array)?;
                let item = self.eval(item)?;
                if let Value::Array(items) = &array {
                    items.push(item);
                }
                Ok(array)
            }
            BlockKind::And | BlockKind::Or => {
                let [left, right] = block.children[..] else {
                    return Ok(Value::Void);
                };
                let left = self.truth(left)?;
                let value = match (block.kind, left) {
                    (BlockKind::And, false) => false,
                    (BlockKind::Or, true) => true,
                    _ => self.truth(right)?,
                };
                Ok(Value::Bool(value))
            }
            BlockKind::Ternary => {
                let [cond, then, other] = block.children[..] else {
                    return Ok(Value::Void);
                };
                if self.truth(cond)? {
                    self.eval(then)
                } else {
                    self.eval(other)
                }
            }
            BlockKind::IncDec { pre, delta } => {
                let Some(&target) = block.children.first() else {
                    return Ok(Value::Void);
                };
                let place = self.place(target)?;
                let old = self.read(&place)?.as_int().unwrap_or(0);
                let new = old.wrapping_add(delta);
                self.write(&place, Value::Int(new))?;
                Ok(Value::Int(if pre { new } else { old }))
            }
            BlockKind::OptionalInit { slot } => {
                let omitted = self
                    .frames
                    .get(self.base)
                    .is_some_and(|frame| frame.omitted.contains(&slot));
                if let (true, Some(&default)) = (omitted, block.children.first()) {
                    let value = self.eval(default)?;
                    self.frames[self.base].vars[slot as usize] = value;
                }
                Ok(Value::Void)
            }
            BlockKind::Index => {
                let [container, key] = block.children[..] else {
                    return Ok(Value::Void);
                };
                let container = self.eval(container)?;
                let key = self.eval(key)?;
                Ok(index_get(&container, &key)?)
            }
            BlockKind::InitList => {
                let mut items = Vec::with_capacity(block.children.len());
                for &child in &block.children {
                    items.push(self.eval(child)?);
                }
                Ok(Value::array(items))
            }
            BlockKind::Go => Ok(self.spawn(id)?),
        }
    }

    /// Run a block's children in a fresh frame when it declares variables.
    pub(crate) fn scope(&mut self, id: NodeId, block: &'p Block) -> Flow<()> {
        if !block.has_vars() {
            return self.run_children(block);
        }
        let frame = self.push_frame(id, block);
        let result = self.run_children(block);
        self.frames.truncate(frame);
        result
    }

    pub(crate) fn run_children(&mut self, block: &'p Block) -> Flow<()> {
        for &child in &block.children {
            self.eval(child)?;
        }
        Ok(())
    }

    fn assign(&mut self, block: &'p Block, op: AssignOp) -> Flow {
        let [target, value] = block.children[..] else {
            return Ok(Value::Void);
        };
        let place = self.place(target)?;
        let value = match op {
            AssignOp::Set => self.eval(value)?,
            AssignOp::Compound(func) => {
                let current = self.read(&place)?;
                let operand = self.eval(value)?;
                self.apply(func, current, operand)?
            }
        };
        self.write(&place, value.clone())?;
        Ok(value)
    }

    /// `op(current, operand)` for a compound assignment.
    fn apply(&mut self, func: CallTarget, current: Value, operand: Value) -> Result<Value, Error> {
        match func {
            CallTarget::Embed(_, builtin) => {
                self.embed(builtin, smallvec::smallvec![current, operand])
            }
            CallTarget::Func(id) => self.call_func(id, vec![current, operand]),
            CallTarget::Dynamic(_) => Err(Error::runtime(RuntimeErrorKind::NullFunction)),
        }
    }
}

/// `container[key]`
pub(crate) fn index_get(container: &Value, key: &Value) -> Result<Value, Error> {
    match (container, key) {
        (Value::Array(items), Value::Int(index)) => usize::try_from(*index)
            .ok()
            .and_then(|i| items.get(i))
            .ok_or_else(|| out_of_range(*index)),
        (Value::Map(map), Value::Str(key)) => map.get(key).ok_or_else(|| {
            Error::runtime(RuntimeErrorKind::KeyNotFound { key: key.clone() })
        }),
        (Value::Str(text), Value::Int(index)) => usize::try_from(*index)
            .ok()
            .and_then(|i| text.chars().nth(i))
            .map(Value::Char)
            .ok_or_else(|| out_of_range(*index)),
        _ => Err(mismatch(container)),
    }
}

/// `container[key] = value`. Maps grow; arrays only replace.
pub(crate) fn index_set(container: &Value, key: &Value, value: Value) -> Result<(), Error> {
    match (container, key) {
        (Value::Array(items), Value::Int(index)) => {
            let stored = usize::try_from(*index).ok().is_some_and(|i| items.set(i, value));
            if stored {
                Ok(())
            } else {
                Err(out_of_range(*index))
            }
        }
        (Value::Map(map), Value::Str(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        _ => Err(mismatch(container)),
    }
}

fn out_of_range(index: i64) -> Error {
    Error::runtime(RuntimeErrorKind::IndexOutOfRange { index })
}

fn mismatch(container: &Value) -> Error {
    Error::runtime(RuntimeErrorKind::Custom {
        message: format!("cannot index {}", container.type_name()),
    })
}
