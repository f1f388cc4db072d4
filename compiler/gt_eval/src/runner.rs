//! Running compiled units.
//!
//! A run works on its own snapshot of the workspace: units are shared
//! through `Arc`, the object table is cloned. Threads left running by the
//! program keep that snapshot alive, so the caller may go on compiling
//! while they wind down.

use crate::interpreter::Interpreter;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::threads::ThreadHub;
use crate::value::Value;
use gt_diagnostic::{Error, RuntimeErrorKind};
use gt_ir::{ObjectId, Workspace};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Call depth allowed unless [`RunOptions::max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// State shared by every thread of one run.
pub(crate) struct Shared {
    pub(crate) program: Arc<Workspace>,
    pub(crate) args: Vec<String>,
    pub(crate) print: SharedPrintHandler,
    pub(crate) max_depth: usize,
    pub(crate) hub: ThreadHub,
    /// Constants evaluated so far.
    pub(crate) consts: Mutex<FxHashMap<ObjectId, Value>>,
}

#[derive(Clone)]
pub struct RunOptions {
    /// Command-line arguments seen by `Args`, `Arg` and friends.
    pub args: Vec<String>,
    pub print: SharedPrintHandler,
    /// Deepest allowed chain of user function calls.
    pub max_depth: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            args: Vec::new(),
            print: stdout_handler(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Builder for a run of one unit.
///
/// ```text
/// let value = Runner::new(&ws, unit).args(argv).print_handler(buffer).run()?;
/// ```
pub struct Runner<'ws> {
    workspace: &'ws Workspace,
    unit: usize,
    options: RunOptions,
}

impl<'ws> Runner<'ws> {
    pub fn new(workspace: &'ws Workspace, unit: usize) -> Self {
        Runner {
            workspace,
            unit,
            options: RunOptions::default(),
        }
    }

    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.options.args = args;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, print: SharedPrintHandler) -> Self {
        self.options.print = print;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the unit's entry function.
    ///
    /// Returns its value, or `None` when it declares no result. Blocks only
    /// until the entry function returns; threads it spawned and never
    /// waited for are told to close when the run fails.
    pub fn run(self) -> Result<Option<Value>, Error> {
        execute(self.workspace, self.unit, self.options).0
    }
}

/// Run `unit` with `args` as the command line, printing to stdout.
pub fn run(workspace: &Workspace, unit: usize, args: &[String]) -> Result<Option<Value>, Error> {
    Runner::new(workspace, unit).args(args.to_vec()).run()
}

/// The run itself; also hands back the shared state so callers can watch
/// threads that outlive the entry function.
#[tracing::instrument(level = "debug", skip(workspace, options))]
pub(crate) fn execute(
    workspace: &Workspace,
    unit: usize,
    options: RunOptions,
) -> (Result<Option<Value>, Error>, Option<Arc<Shared>>) {
    let Some(entry) = workspace.unit(unit) else {
        return (Err(Error::runtime(RuntimeErrorKind::RunIndex { index: unit })), None);
    };
    let Some(run) = entry.run else {
        return (Err(Error::runtime(RuntimeErrorKind::NoRun)), None);
    };
    let declared = workspace.object(run).as_func().and_then(|func| func.result);

    let shared = Arc::new(Shared {
        program: Arc::new(workspace.clone()),
        args: options.args,
        print: options.print,
        max_depth: options.max_depth,
        hub: ThreadHub::new(),
        consts: Mutex::new(FxHashMap::default()),
    });
    let program = Arc::clone(&shared.program);
    let mut interp = Interpreter::new(&program, Arc::clone(&shared), unit);
    let result = interp.call_func(run, Vec::new());
    let result = shared.hub.settle(result);
    tracing::debug!(ok = result.is_ok(), live = shared.hub.live(), "run finished");
    (result.map(|value| declared.map(|_| value)), Some(shared))
}
