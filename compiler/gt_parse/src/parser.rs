//! The compile session and its driver loop.

use crate::expr::ExprStack;
use crate::table::{Action, ActionFlags, Category, Fail, Next, Redirect, State, Table};
use gt_diagnostic::{CompileErrorKind, Error, Position};
use gt_ir::{
    Block, BlockKind, Cmd, Node, NodeId, ObjectId, Primitives, TokenKind, Unit, Workspace,
};
use rustc_hash::FxHashSet;

/// Resumption point pushed by `Next::Enter`.
struct Frame {
    action: Action,
    resume: State,
}

/// Function or `go` body being compiled.
pub(crate) struct FuncCtx {
    /// `None` for a `go` block.
    pub(crate) object: Option<ObjectId>,
    pub(crate) result: Option<ObjectId>,
    /// A `run` without a declared result takes the type of its first return.
    pub(crate) infer: bool,
}

/// Function header collected before its body opens.
pub(crate) struct FuncDecl {
    pub(crate) name: Option<String>,
    pub(crate) is_run: bool,
    pub(crate) block: NodeId,
    pub(crate) params: Vec<ObjectId>,
    pub(crate) first_optional: Option<usize>,
    pub(crate) variadic: bool,
    pub(crate) result: Option<ObjectId>,
    pub(crate) params_done: bool,
    pub(crate) public: bool,
    /// Type of the parameter group being declared.
    pub(crate) group_type: Option<ObjectId>,
    pub(crate) group_optional: bool,
    /// Slot of the most recently declared parameter.
    pub(crate) last_slot: Option<u32>,
}

/// `fn name(types) result` being collected.
pub(crate) struct FnDecl {
    pub(crate) name: Option<String>,
    pub(crate) params: Vec<ObjectId>,
    pub(crate) params_done: bool,
    pub(crate) result: Option<ObjectId>,
    pub(crate) public: bool,
}

pub(crate) struct ConstDecl {
    pub(crate) name: Option<String>,
    pub(crate) root: NodeId,
    pub(crate) public: bool,
    pub(crate) defined: bool,
}

static END: TokenKind = TokenKind::Line;

/// One compile call.
///
/// Owns the unit under construction and borrows the workspace mutably; the
/// caller rolls the workspace back if [`Parser::run`] fails.
pub(crate) struct Parser<'ws> {
    pub(crate) ws: &'ws mut Workspace,
    pub(crate) unit: Unit,
    /// Index the unit gets once committed.
    pub(crate) index: usize,
    pub(crate) prims: Primitives,
    pub(crate) pos: usize,
    state: State,
    stack: Vec<Frame>,
    /// Innermost open block.
    pub(crate) current: Option<NodeId>,
    pub(crate) funcs: Vec<FuncCtx>,
    pub(crate) decl: Option<FuncDecl>,
    pub(crate) fn_decl: Option<FnDecl>,
    pub(crate) constant: Option<ConstDecl>,
    /// Types of the variable declarations in progress, innermost last.
    pub(crate) var_types: Vec<ObjectId>,
    pub(crate) last_var: Option<(NodeId, u32)>,
    pub(crate) for_names: Vec<(String, usize)>,
    /// `pub` seen directly before a declaration.
    pub(crate) pending_pub: bool,
    pub(crate) imported: FxHashSet<String>,
    pub(crate) expr: ExprStack,
}

impl<'ws> Parser<'ws> {
    pub(crate) fn new(ws: &'ws mut Workspace, unit: Unit, index: usize, prims: Primitives) -> Self {
        Parser {
            ws,
            unit,
            index,
            prims,
            pos: 0,
            state: State::Main,
            stack: Vec::new(),
            current: None,
            funcs: Vec::new(),
            decl: None,
            fn_decl: None,
            constant: None,
            var_types: Vec::new(),
            last_var: None,
            for_names: Vec::new(),
            pending_pub: false,
            imported: FxHashSet::default(),
            expr: ExprStack::default(),
        }
    }

    /// Drive the table over the whole token stream.
    pub(crate) fn run(mut self) -> Result<Unit, Error> {
        let table = Table::get();
        while self.pos < self.unit.tokens.len() {
            let category = Category::of(&self.unit.tokens[self.pos].kind);
            let action = table.action(self.state, category);
            tracing::trace!(state = ?self.state, ?category, pos = self.pos, "dispatch");
            self.apply(action)?;
        }
        if !self.stack.is_empty() {
            return Err(self.error_at(CompileErrorKind::UnexpectedEnd, self.unit.tokens.len()));
        }
        debug_assert_eq!(self.expr.depth(), 0);
        Ok(self.unit)
    }

    fn apply(&mut self, mut action: Action) -> Result<(), Error> {
        loop {
            if action.flags.contains(ActionFlags::ERROR) {
                return Err(self.fail(action.fail));
            }
            let Some(enter) = action.enter else {
                break;
            };
            match enter(self)? {
                None => break,
                Some(Redirect::Enter(redirected)) => action = redirected,
                Some(Redirect::Back { stay }) => {
                    self.back()?;
                    if !stay {
                        self.pos += 1;
                    }
                    return Ok(());
                }
            }
        }
        match action.next {
            Next::Keep => {}
            Next::Back => self.back()?,
            Next::Enter(state) => {
                self.stack.push(Frame {
                    action,
                    resume: self.state,
                });
                self.state = state;
            }
        }
        if !action.flags.contains(ActionFlags::STAY) {
            self.pos += 1;
        }
        Ok(())
    }

    /// Pop frames, closing each, through the first one marked `STOP_BACK`.
    fn back(&mut self) -> Result<(), Error> {
        loop {
            let Some(frame) = self.stack.pop() else {
                return Err(self.fail(Fail::Unexpected));
            };
            self.state = frame.resume;
            if let Some(close) = frame.action.close {
                close(self)?;
            }
            if frame.action.flags.contains(ActionFlags::STOP_BACK) || self.stack.is_empty() {
                return Ok(());
            }
        }
    }

    // Tokens

    /// Current token; the trailing line for positions past the end.
    pub(crate) fn token(&self) -> &TokenKind {
        self.peek(0)
    }

    pub(crate) fn peek(&self, offset: usize) -> &TokenKind {
        self.unit
            .tokens
            .get(self.pos + offset)
            .map_or(&END, |t| &t.kind)
    }

    pub(crate) fn token_index(&self) -> u32 {
        u32::try_from(self.pos).unwrap_or(u32::MAX)
    }

    // Errors

    pub(crate) fn error(&self, kind: CompileErrorKind) -> Error {
        self.error_at(kind, self.pos)
    }

    pub(crate) fn error_at(&self, kind: CompileErrorKind, at: usize) -> Error {
        Error::Compile {
            kind,
            pos: Position::of_token(&self.unit, u32::try_from(at).unwrap_or(u32::MAX)),
        }
    }

    pub(crate) fn unexpected(&self) -> Error {
        self.error(CompileErrorKind::UnexpectedToken {
            found: self.token().display_name(),
        })
    }

    pub(crate) fn expected_expression(&self) -> Error {
        self.error(CompileErrorKind::ExpectedExpression {
            found: self.token().display_name(),
        })
    }

    fn fail(&self, fail: Fail) -> Error {
        match fail {
            Fail::Unexpected => self.unexpected(),
            Fail::IllegalOptional => self.error(CompileErrorKind::IllegalOptional),
            Fail::ExpectedExpression => self.expected_expression(),
        }
    }

    // Command tree

    pub(crate) fn push_node(&mut self, cmd: Cmd, token: u32, ty: Option<ObjectId>) -> NodeId {
        let mut node = Node::new(cmd, token);
        if let Some(ty) = ty {
            // A fresh node has no result yet.
            let _ = node.set_result(ty);
        }
        self.unit.tree.push(node)
    }

    /// A detached block under the current scope, used by expressions.
    pub(crate) fn push_block(
        &mut self,
        kind: BlockKind,
        children: Vec<NodeId>,
        token: u32,
        ty: Option<ObjectId>,
    ) -> NodeId {
        let mut block = Block::new(kind, self.current);
        block.children = children;
        self.push_node(Cmd::Block(Box::new(block)), token, ty)
    }

    /// Open a statement block: appended to the current block, then made
    /// current.
    pub(crate) fn open_block(&mut self, kind: BlockKind) -> NodeId {
        let id = self.push_block(kind, Vec::new(), self.token_index(), None);
        if let Some(parent) = self.current {
            self.append(parent, id);
        }
        self.current = Some(id);
        id
    }

    /// Make the current block's parent current again.
    pub(crate) fn close_block(&mut self) {
        self.current = self
            .current
            .and_then(|id| self.unit.tree.block(id))
            .and_then(|block| block.parent);
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(block) = self.unit.tree.block_mut(parent) {
            block.children.push(child);
        }
    }

    pub(crate) fn block(&self, id: NodeId) -> Option<&Block> {
        self.unit.tree.block(id)
    }

    pub(crate) fn block_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        self.unit.tree.block_mut(id)
    }

    /// The current block; fails outside any block.
    pub(crate) fn scope(&self) -> Result<NodeId, Error> {
        self.current.ok_or_else(|| self.unexpected())
    }

    pub(crate) fn result_of(&self, node: NodeId) -> Option<ObjectId> {
        self.unit.tree.node(node).result()
    }

    pub(crate) fn children_len(&self, id: NodeId) -> usize {
        self.block(id).map_or(0, |b| b.children.len())
    }
}
