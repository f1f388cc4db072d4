//! Calls to user functions and natives, and `go` threads.

use crate::interpreter::{Flow, Frame, Interpreter, Unwind};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::{CallTarget, NodeId, ObjectId};
use smallvec::SmallVec;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

impl<'p> Interpreter<'p> {
    pub(crate) fn call(&mut self, target: CallTarget, args: &'p [NodeId]) -> Flow {
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.eval(arg)?);
        }
        let value = match target {
            CallTarget::Embed(_, builtin) => self.embed(builtin, SmallVec::from_vec(values))?,
            CallTarget::Func(id) => self.call_func(id, values)?,
            CallTarget::Dynamic(callee) => match self.eval(callee)? {
                Value::Func(Some(id)) => self.call_func(id, values)?,
                _ => return Err(Error::runtime(RuntimeErrorKind::NullFunction).into()),
            },
        };
        Ok(value)
    }

    /// Run user function `id` with already evaluated arguments.
    ///
    /// Missing optional parameters keep their zero value until the
    /// function's `OptionalInit` guards fill in the defaults. Arguments past
    /// the fixed parameters of a variadic function are collected into an
    /// array in the last slot.
    pub(crate) fn call_func(&mut self, id: ObjectId, args: Vec<Value>) -> Result<Value, Error> {
        let program = self.program;
        let Some(func) = program.object(id).as_func() else {
            return Err(Error::runtime(RuntimeErrorKind::NullFunction));
        };
        self.check_close()?;
        let limit = self.shared.max_depth;
        if self.depth >= limit {
            return Err(Error::runtime(RuntimeErrorKind::StackOverflow { depth: limit }));
        }
        let Some(block) = program
            .unit(func.unit)
            .and_then(|unit| unit.tree.block(func.block))
        else {
            return Err(Error::runtime(RuntimeErrorKind::NullFunction));
        };

        let mut vars: Vec<Value> = block
            .vars
            .iter()
            .map(|ty| Value::zero(program, *ty))
            .collect();
        let fixed = if func.variadic {
            func.params.len().saturating_sub(1)
        } else {
            func.params.len()
        };
        let mut omitted = Vec::new();
        let mut args = args.into_iter();
        for slot in 0..fixed {
            match args.next() {
                Some(value) => vars[slot] = value,
                None => omitted.push(u32::try_from(slot).unwrap_or(u32::MAX)),
            }
        }
        if func.variadic && fixed < vars.len() {
            vars[fixed] = Value::array(args.collect());
        }

        let saved = (self.unit, self.base);
        self.unit = func.unit;
        self.base = self.frames.len();
        self.depth += 1;
        self.frames.push(Frame {
            block: func.block,
            vars,
            omitted,
        });
        let outcome = ensure_sufficient_stack(|| self.run_children(block));
        self.frames.truncate(self.base);
        (self.unit, self.base) = saved;
        self.depth -= 1;

        tracing::trace!(func = %func.name, depth = self.depth, "call finished");
        match outcome {
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Fail(err)) => Err(err),
            Ok(()) | Err(Unwind::Break | Unwind::Continue) => Ok(func
                .result
                .map_or(Value::Void, |ty| Value::zero(program, ty))),
        }
    }

    /// Start a thread for `go` block `id`.
    ///
    /// The thread runs against a copy of the current function's frames, so
    /// it reads scalars as they were at the `go` and shares containers.
    pub(super) fn spawn(&mut self, id: NodeId) -> Result<Value, Error> {
        let shared = Arc::clone(&self.shared);
        let close = Arc::new(AtomicBool::new(false));
        let thread = shared.hub.register(Arc::clone(&close));
        let frames = self.frames[self.base..].to_vec();
        let (unit, depth) = (self.unit, self.depth);

        let worker = Arc::clone(&shared);
        let spawned = std::thread::Builder::new()
            .name(format!("gentee-{thread}"))
            .spawn(move || {
                let program = Arc::clone(&worker.program);
                let mut interp = Interpreter::new(&program, Arc::clone(&worker), unit);
                interp.frames = frames;
                interp.depth = depth;
                interp.close = close;
                let error = match interp.block(id) {
                    Some(block) => match interp.scope(id, block) {
                        Err(Unwind::Fail(err)) => Some(err),
                        _ => None,
                    },
                    None => None,
                };
                worker.hub.finish(thread, error);
            });

        match spawned {
            Ok(handle) => {
                shared.hub.attach(thread, handle);
                tracing::debug!(thread, "thread spawned");
                Ok(Value::Thread(Some(thread)))
            }
            Err(err) => {
                shared.hub.finish(thread, None);
                Err(Error::runtime(RuntimeErrorKind::Io {
                    message: format!("cannot start thread: {err}"),
                }))
            }
        }
    }
}
