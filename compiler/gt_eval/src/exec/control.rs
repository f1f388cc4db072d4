//! Branches, loops and `switch`.

use crate::interpreter::{Flow, Interpreter, Unwind};
use crate::value::Value;
use gt_ir::{Block, BlockKind, NodeId};

/// What a loop does after one pass of its body.
enum Step {
    Next,
    Stop,
}

impl<'p> Interpreter<'p> {
    /// `[cond, body]*` pairs with an optional trailing else body.
    pub(super) fn if_chain(&mut self, block: &'p Block) -> Flow<()> {
        for pair in block.children.chunks(2) {
            match *pair {
                [cond, body] => {
                    if self.truth(cond)? {
                        self.eval(body)?;
                        return Ok(());
                    }
                }
                [otherwise] => {
                    self.eval(otherwise)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(super) fn while_loop(&mut self, block: &'p Block) -> Flow<()> {
        let [cond, body] = block.children[..] else {
            return Ok(());
        };
        while self.truth(cond)? {
            if let Step::Stop = self.pass(body)? {
                break;
            }
        }
        Ok(())
    }

    /// One pass of a loop body; absorbs `break` and `continue`.
    fn pass(&mut self, body: NodeId) -> Flow<Step> {
        self.check_close()?;
        match self.eval(body) {
            Ok(_) | Err(Unwind::Continue) => Ok(Step::Next),
            Err(Unwind::Break) => Ok(Step::Stop),
            Err(other) => Err(other),
        }
    }

    /// `for item[, index] in source`. The source is evaluated once; the
    /// loop variables live in the `for` block's own frame.
    pub(super) fn for_loop(
        &mut self,
        id: NodeId,
        block: &'p Block,
        item: u32,
        index: Option<u32>,
    ) -> Flow<()> {
        let [source, body] = block.children[..] else {
            return Ok(());
        };
        let source = self.eval(source)?;
        let frame = self.push_frame(id, block);
        let result = self.iterate(frame, &source, item, index, body);
        self.frames.truncate(frame);
        result
    }

    fn iterate(
        &mut self,
        frame: usize,
        source: &Value,
        item: u32,
        index: Option<u32>,
        body: NodeId,
    ) -> Flow<()> {
        let bind = |this: &mut Self, value: Value, key: Value| -> Flow<Step> {
            let vars = &mut this.frames[frame].vars;
            vars[item as usize] = value;
            if let Some(slot) = index {
                vars[slot as usize] = key;
            }
            this.pass(body)
        };
        match source {
            Value::Array(items) => {
                // Re-read each element: the body may grow the array.
                let mut i = 0;
                while let Some(value) = items.get(i) {
                    let key = Value::Int(i64::try_from(i).unwrap_or(i64::MAX));
                    if let Step::Stop = bind(self, value, key)? {
                        break;
                    }
                    i += 1;
                }
            }
            Value::Map(map) => {
                for (key, value) in map.entries() {
                    if let Step::Stop = bind(self, value, Value::Str(key))? {
                        break;
                    }
                }
            }
            Value::Str(text) => {
                for (i, ch) in (0_i64..).zip(text.chars()) {
                    if let Step::Stop = bind(self, Value::Char(ch), Value::Int(i))? {
                        break;
                    }
                }
            }
            &Value::Range { from, to } => {
                let values: Box<dyn Iterator<Item = i64>> = if from <= to {
                    Box::new(from..=to)
                } else {
                    Box::new((to..=from).rev())
                };
                for (i, value) in (0_i64..).zip(values) {
                    if let Step::Stop = bind(self, Value::Int(value), Value::Int(i))? {
                        break;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `[value, case*, default?]`: the first matching case runs; `break`
    /// leaves the switch.
    pub(super) fn switch(&mut self, block: &'p Block) -> Flow<()> {
        let Some((&value, arms)) = block.children.split_first() else {
            return Ok(());
        };
        let value = self.eval(value)?;
        for &arm in arms {
            let Some(arm) = self.block(arm) else {
                continue;
            };
            let body = match arm.kind {
                BlockKind::Case => {
                    let Some((&body, values)) = arm.children.split_last() else {
                        continue;
                    };
                    if !self.matches_any(values, &value)? {
                        continue;
                    }
                    body
                }
                BlockKind::Default => match arm.children.first() {
                    Some(&body) => body,
                    None => return Ok(()),
                },
                _ => continue,
            };
            return match self.eval(body) {
                Ok(_) | Err(Unwind::Break) => Ok(()),
                Err(other) => Err(other),
            };
        }
        Ok(())
    }

    fn matches_any(&mut self, values: &[NodeId], value: &Value) -> Flow<bool> {
        for &candidate in values {
            if self.eval(candidate)? == *value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
