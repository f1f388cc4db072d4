//! Operator-precedence expression parser.
//!
//! A shunting-yard machine over two stacks shared by every nested
//! expression: operands (command nodes) and an operator buffer. Fences
//! (parentheses, calls, indexes, ternaries, initializer lists) sit in the
//! operator buffer and stop reductions. Each active expression owns a
//! [`Mark`] recording where its part of both stacks begins, so an
//! expression nested inside a `go` block never reduces into the enclosing
//! one.
//!
//! The state machine feeds every token of an expression to [`token`]. The
//! expression ends at the first token that cannot continue it outside any
//! fence; [`token`] then backtracks without consuming it and the frame's
//! close callback collects the result with [`finish`].

mod reduce;

use crate::parser::{FuncCtx, Parser};
use crate::table::{Action, ActionFlags, Redirect, State};
use gt_diagnostic::{CompileErrorKind, Error};
use gt_ir::{BlockKind, Cmd, Literal, NodeId, Object, TokenKind, TypeKind};
use gt_types::func_type;

pub(crate) use reduce::{expect_type, make_call};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl Arith {
    pub(crate) fn func_name(self) -> &'static str {
        match self {
            Arith::Add => "Add",
            Arith::Sub => "Sub",
            Arith::Mul => "Mul",
            Arith::Div => "Div",
            Arith::Mod => "Mod",
            Arith::BitAnd => "BitAnd",
            Arith::BitOr => "BitOr",
            Arith::BitXor => "BitXor",
            Arith::Shl => "LShift",
            Arith::Shr => "RShift",
        }
    }

    fn priority(self) -> u8 {
        match self {
            Arith::BitOr => 11,
            Arith::BitXor => 12,
            Arith::BitAnd => 13,
            Arith::Shl | Arith::Shr => 14,
            Arith::Add | Arith::Sub => 15,
            Arith::Mul | Arith::Div | Arith::Mod => 20,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Compare {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Compare {
    /// Function called and whether its result is negated.
    pub(crate) fn func(self) -> (&'static str, bool) {
        match self {
            Compare::Equal => ("Equal", false),
            Compare::NotEqual => ("Equal", true),
            Compare::Less => ("Less", false),
            Compare::LessEqual => ("Greater", true),
            Compare::Greater => ("Greater", false),
            Compare::GreaterEqual => ("Less", true),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Binary {
    Range,
    Assign,
    Compound(Arith),
    And,
    Or,
    Compare(Compare),
    Arith(Arith),
}

impl Binary {
    fn priority(self) -> u8 {
        match self {
            Binary::Range => 3,
            Binary::Assign | Binary::Compound(_) => 5,
            Binary::And => 7,
            Binary::Or => 8,
            Binary::Compare(_) => 10,
            Binary::Arith(op) => op.priority(),
        }
    }

    fn right_to_left(self) -> bool {
        matches!(self, Binary::Range | Binary::Assign | Binary::Compound(_))
    }

    fn from_token(kind: &TokenKind) -> Option<Binary> {
        let op = match kind {
            TokenKind::DotDot => Binary::Range,
            TokenKind::Assign => Binary::Assign,
            TokenKind::PlusEq => Binary::Compound(Arith::Add),
            TokenKind::MinusEq => Binary::Compound(Arith::Sub),
            TokenKind::StarEq => Binary::Compound(Arith::Mul),
            TokenKind::SlashEq => Binary::Compound(Arith::Div),
            TokenKind::PercentEq => Binary::Compound(Arith::Mod),
            TokenKind::ShlEq => Binary::Compound(Arith::Shl),
            TokenKind::ShrEq => Binary::Compound(Arith::Shr),
            TokenKind::AmpEq => Binary::Compound(Arith::BitAnd),
            TokenKind::PipeEq => Binary::Compound(Arith::BitOr),
            TokenKind::CaretEq => Binary::Compound(Arith::BitXor),
            TokenKind::AndAnd => Binary::And,
            TokenKind::OrOr => Binary::Or,
            TokenKind::EqEq => Binary::Compare(Compare::Equal),
            TokenKind::NotEq => Binary::Compare(Compare::NotEqual),
            TokenKind::Lt => Binary::Compare(Compare::Less),
            TokenKind::LtEq => Binary::Compare(Compare::LessEqual),
            TokenKind::Gt => Binary::Compare(Compare::Greater),
            TokenKind::GtEq => Binary::Compare(Compare::GreaterEqual),
            TokenKind::Pipe => Binary::Arith(Arith::BitOr),
            TokenKind::Caret => Binary::Arith(Arith::BitXor),
            TokenKind::Amp => Binary::Arith(Arith::BitAnd),
            TokenKind::Shl => Binary::Arith(Arith::Shl),
            TokenKind::Shr => Binary::Arith(Arith::Shr),
            TokenKind::Plus => Binary::Arith(Arith::Add),
            TokenKind::Minus => Binary::Arith(Arith::Sub),
            TokenKind::Star => Binary::Arith(Arith::Mul),
            TokenKind::Slash => Binary::Arith(Arith::Div),
            TokenKind::Percent => Binary::Arith(Arith::Mod),
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Prefix {
    Not,
    Sign,
    BitNot,
    Len,
    Inc,
    Dec,
}

impl Prefix {
    fn priority(self) -> u8 {
        match self {
            Prefix::Not => 28,
            _ => 30,
        }
    }

    fn from_token(kind: &TokenKind) -> Option<Prefix> {
        let op = match kind {
            TokenKind::Bang => Prefix::Not,
            TokenKind::Minus => Prefix::Sign,
            TokenKind::Caret => Prefix::BitNot,
            TokenKind::Star => Prefix::Len,
            TokenKind::PlusPlus => Prefix::Inc,
            TokenKind::MinusMinus => Prefix::Dec,
            _ => return None,
        };
        Some(op)
    }
}

/// Postfix `++`/`--` reduce everything at or above this priority first.
const POSTFIX_PRIORITY: u8 = 25;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Callee {
    Named(String),
    /// A variable of a function-signature type.
    Dynamic(NodeId),
}

/// Bracketing entries of the operator buffer.
///
/// `base` is where the fence's operands begin; `start` is the operand count
/// when the fence opened, which differs from `base` for a method call whose
/// receiver is already on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fence {
    Paren { base: usize },
    Call { callee: Callee, base: usize, start: usize },
    Index { base: usize },
    Ternary { base: usize },
    InitList { base: usize },
}

#[derive(Clone, Debug)]
pub(crate) enum Op {
    Binary(Binary),
    Prefix(Prefix),
    Fence(Fence),
}

#[derive(Clone, Debug)]
pub(crate) struct OpEntry {
    pub(crate) op: Op,
    pub(crate) token: u32,
}

/// Where one expression's share of the stacks begins.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Mark {
    operands: usize,
    ops: usize,
    expect_operand: bool,
}

#[derive(Default)]
pub(crate) struct ExprStack {
    pub(crate) operands: Vec<NodeId>,
    pub(crate) ops: Vec<OpEntry>,
    marks: Vec<Mark>,
}

impl ExprStack {
    fn mark(&self) -> Option<Mark> {
        self.marks.last().copied()
    }

    fn set_expect_operand(&mut self, expect: bool) {
        if let Some(mark) = self.marks.last_mut() {
            mark.expect_operand = expect;
        }
    }

    /// Innermost fence of the current expression.
    fn fence(&self) -> Option<&Fence> {
        let floor = self.mark().map_or(0, |m| m.ops);
        self.ops[floor..].iter().rev().find_map(|entry| match &entry.op {
            Op::Fence(fence) => Some(fence),
            _ => None,
        })
    }

    /// Operator on top of the buffer, if it belongs to the current expression.
    fn top(&self) -> Option<&OpEntry> {
        let floor = self.mark().map_or(0, |m| m.ops);
        if self.ops.len() > floor {
            self.ops.last()
        } else {
            None
        }
    }

    fn started(&self) -> bool {
        self.mark()
            .is_some_and(|m| self.operands.len() > m.operands || self.ops.len() > m.ops)
    }

    pub(crate) fn depth(&self) -> usize {
        self.marks.len()
    }
}

/// Start a nested expression.
pub(crate) fn begin(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let mark = Mark {
        operands: p.expr.operands.len(),
        ops: p.expr.ops.len(),
        expect_operand: true,
    };
    p.expr.marks.push(mark);
    Ok(None)
}

/// Start an expression that continues `target = ...`.
pub(crate) fn begin_assign(p: &mut Parser<'_>, target: NodeId) -> Result<(), Error> {
    begin(p)?;
    let token = p.token_index();
    p.expr.operands.push(target);
    p.expr.ops.push(OpEntry {
        op: Op::Binary(Binary::Assign),
        token,
    });
    Ok(())
}

/// Reduce the current expression and return its root.
pub(crate) fn finish(p: &mut Parser<'_>) -> Result<NodeId, Error> {
    let mark = p.expr.mark().ok_or_else(|| p.unexpected())?;
    if mark.expect_operand {
        return Err(p.expected_expression());
    }
    while p.expr.ops.len() > mark.ops {
        reduce::reduce_top(p)?;
    }
    if p.expr.operands.len() != mark.operands + 1 {
        return Err(p.expected_expression());
    }
    let root = p.expr.operands.pop().ok_or_else(|| p.expected_expression())?;
    p.expr.marks.pop();
    Ok(root)
}

/// Handle one token in expression context.
pub(crate) fn token(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    let kind = p.token().clone();
    let expect_operand = p.expr.mark().map_or(true, |m| m.expect_operand);
    if expect_operand {
        operand(p, &kind)
    } else {
        operator(p, &kind)
    }
}

const END: Option<Redirect> = Some(Redirect::Back { stay: true });

fn operand(p: &mut Parser<'_>, kind: &TokenKind) -> Result<Option<Redirect>, Error> {
    let token = p.token_index();
    let literal = match kind {
        TokenKind::Int(v) => Some((Literal::Int(*v), p.prims.int)),
        TokenKind::Float(v) => Some((Literal::Float(*v), p.prims.float)),
        TokenKind::Str(s) => Some((Literal::Str(s.clone()), p.prims.str)),
        TokenKind::Char(c) => Some((Literal::Char(*c), p.prims.char)),
        TokenKind::True => Some((Literal::Bool(true), p.prims.bool)),
        TokenKind::False => Some((Literal::Bool(false), p.prims.bool)),
        _ => None,
    };
    if let Some((literal, ty)) = literal {
        let node = p.push_node(Cmd::Value(literal), token, Some(ty));
        push_operand(p, node);
        return Ok(None);
    }

    match kind {
        TokenKind::Ident(name) => ident(p, name)?,
        TokenKind::LParen => {
            let base = p.expr.operands.len();
            push_fence(p, Fence::Paren { base });
        }
        TokenKind::LBrace => {
            let base = p.expr.operands.len();
            push_fence(p, Fence::InitList { base });
        }
        TokenKind::Question => {
            if *p.peek(1) != TokenKind::LParen {
                return Err(p.unexpected());
            }
            let base = p.expr.operands.len();
            push_fence(p, Fence::Ternary { base });
            p.pos += 1;
        }
        TokenKind::Go => return go_block(p),
        TokenKind::Amp => func_ref(p)?,
        TokenKind::RParen | TokenKind::RBrace => {
            let len = p.expr.operands.len();
            let empty = match (kind, p.expr.fence()) {
                (TokenKind::RParen, Some(Fence::Call { start, .. })) => *start == len,
                (TokenKind::RBrace, Some(Fence::InitList { base })) => *base == len,
                _ => false,
            };
            if !empty {
                return Err(p.expected_expression());
            }
            reduce::close_fence(p)?;
        }
        TokenKind::Line if p.expr.started() => {}
        other => match Prefix::from_token(other) {
            Some(prefix) => p.expr.ops.push(OpEntry {
                op: Op::Prefix(prefix),
                token,
            }),
            None => return Err(p.expected_expression()),
        },
    }
    Ok(None)
}

fn operator(p: &mut Parser<'_>, kind: &TokenKind) -> Result<Option<Redirect>, Error> {
    if let Some(op) = Binary::from_token(kind) {
        push_binary(p, op)?;
        return Ok(None);
    }
    let fence = p.expr.fence().cloned();
    match kind {
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            reduce::reduce_while(p, |priority| priority >= POSTFIX_PRIORITY)?;
            let token = p.token_index();
            let target = pop_operand(p)?;
            let delta = if *kind == TokenKind::PlusPlus { 1 } else { -1 };
            let node = reduce::inc_dec(p, target, false, delta, token)?;
            push_operand(p, node);
        }
        TokenKind::Dot => method(p)?,
        TokenKind::LBracket => {
            let base = p.expr.operands.len().saturating_sub(1);
            push_fence(p, Fence::Index { base });
        }
        TokenKind::Comma => match fence {
            None => return Ok(END),
            Some(Fence::Call { .. } | Fence::Ternary { .. } | Fence::InitList { .. }) => {
                reduce::reduce_while(p, |_| true)?;
                p.expr.set_expect_operand(true);
            }
            Some(_) => return Err(p.unexpected()),
        },
        TokenKind::RParen => match fence {
            None => return Ok(END),
            Some(Fence::Paren { .. } | Fence::Call { .. } | Fence::Ternary { .. }) => {
                reduce::close_fence(p)?;
            }
            Some(_) => return Err(p.unexpected()),
        },
        TokenKind::RBracket => match fence {
            Some(Fence::Index { .. }) => reduce::close_fence(p)?,
            _ => return Err(p.unexpected()),
        },
        TokenKind::RBrace => match fence {
            None => return Ok(END),
            Some(Fence::InitList { .. }) => reduce::close_fence(p)?,
            Some(_) => return Err(p.unexpected()),
        },
        TokenKind::Line if fence.is_some() => {}
        _ if fence.is_none() => return Ok(END),
        _ => return Err(p.unexpected()),
    }
    Ok(None)
}

fn push_operand(p: &mut Parser<'_>, node: NodeId) {
    p.expr.operands.push(node);
    p.expr.set_expect_operand(false);
}

pub(crate) fn pop_operand(p: &mut Parser<'_>) -> Result<NodeId, Error> {
    let floor = p.expr.mark().map_or(0, |m| m.operands);
    if p.expr.operands.len() <= floor {
        return Err(p.expected_expression());
    }
    p.expr.operands.pop().ok_or_else(|| p.expected_expression())
}

fn push_fence(p: &mut Parser<'_>, fence: Fence) {
    let token = p.token_index();
    p.expr.ops.push(OpEntry {
        op: Op::Fence(fence),
        token,
    });
    p.expr.set_expect_operand(true);
}

fn push_binary(p: &mut Parser<'_>, op: Binary) -> Result<(), Error> {
    let priority = op.priority();
    let token = p.token_index();
    if op.right_to_left() {
        reduce::reduce_while(p, |top| top > priority)?;
    } else {
        reduce::reduce_while(p, |top| top >= priority)?;
    }
    p.expr.ops.push(OpEntry {
        op: Op::Binary(op),
        token,
    });
    p.expr.set_expect_operand(true);
    Ok(())
}

/// Identifier in operand position: variable, constant, call or method chain.
fn ident(p: &mut Parser<'_>, name: &str) -> Result<(), Error> {
    let token = p.token_index();
    let call = *p.peek(1) == TokenKind::LParen;
    let mut segments = name.split('.');
    let first = segments.next().unwrap_or(name);
    let rest: Vec<&str> = segments.collect();

    if rest.is_empty() && call {
        let callee = match p.lookup_var(name) {
            Some((block, slot, ty)) if is_func_type(p, ty) => {
                Callee::Dynamic(p.push_node(Cmd::Var { block, slot }, token, Some(ty)))
            }
            _ => Callee::Named(name.to_string()),
        };
        let base = p.expr.operands.len();
        push_fence(p, Fence::Call { callee, base, start: base });
        p.pos += 1;
        return Ok(());
    }

    let value = value_ref(p, first, token)?;
    push_operand(p, value);
    chain(p, &rest, call, token)
}

/// Apply `.a.b.c` to the operand on top; the last segment takes the
/// argument list that follows when `call` is set.
fn chain(p: &mut Parser<'_>, segments: &[&str], call: bool, token: u32) -> Result<(), Error> {
    let Some((last, middle)) = segments.split_last() else {
        return Ok(());
    };
    for name in middle {
        apply_method(p, name, token)?;
    }
    if call {
        let start = p.expr.operands.len();
        let base = start.saturating_sub(1);
        push_fence(p, Fence::Call {
            callee: Callee::Named((*last).to_string()),
            base,
            start,
        });
        p.pos += 1;
        Ok(())
    } else {
        apply_method(p, last, token)
    }
}

/// `x.f` without arguments: `f(x)`.
fn apply_method(p: &mut Parser<'_>, name: &str, token: u32) -> Result<(), Error> {
    let receiver = pop_operand(p)?;
    let node = make_call(p, name, vec![receiver], token)?;
    push_operand(p, node);
    Ok(())
}

/// `.name` after a complete operand.
fn method(p: &mut Parser<'_>) -> Result<(), Error> {
    let token = p.token_index();
    let TokenKind::Ident(name) = p.peek(1).clone() else {
        return Err(p.unexpected());
    };
    p.pos += 1;
    let segments: Vec<&str> = name.split('.').collect();
    let call = *p.peek(1) == TokenKind::LParen;
    chain(p, &segments, call, token)
}

fn value_ref(p: &mut Parser<'_>, name: &str, token: u32) -> Result<NodeId, Error> {
    if let Some((block, slot, ty)) = p.lookup_var(name) {
        return Ok(p.push_node(Cmd::Var { block, slot }, token, Some(ty)));
    }
    if let Some(&id) = p.unit.namespace.consts.get(name) {
        let ty = match p.ws.object(id) {
            Object::Const(constant) => Some(constant.result),
            _ => None,
        };
        return Ok(p.push_node(Cmd::Const(id), token, ty));
    }
    Err(p.error(CompileErrorKind::UnknownIdent {
        name: name.to_string(),
    }))
}

fn is_func_type(p: &Parser<'_>, ty: gt_ir::ObjectId) -> bool {
    p.ws
        .type_desc(ty)
        .is_some_and(|desc| matches!(desc.kind, TypeKind::Func { .. }))
}

/// `&name`: reference to a user function.
fn func_ref(p: &mut Parser<'_>) -> Result<(), Error> {
    let token = p.token_index();
    let TokenKind::Ident(name) = p.peek(1).clone() else {
        return Err(p.unexpected());
    };
    let found = p
        .unit
        .namespace
        .func_overloads(&name)
        .iter()
        .find_map(|id| p.ws.object(*id).as_func().map(|f| (*id, f.params.clone(), f.result)));
    let Some((id, params, result)) = found else {
        return Err(p.error(CompileErrorKind::UnknownFunction {
            name,
            args: String::new(),
        }));
    };
    let ty = func_type(p.ws, &mut p.unit.namespace, &params, result, None);
    let node = p.push_node(Cmd::Value(Literal::Func(id)), token, Some(ty));
    push_operand(p, node);
    p.pos += 1;
    Ok(())
}

/// `go { ... }` in operand position: compile the body as a nested block
/// and push the thread value when it closes.
fn go_block(p: &mut Parser<'_>) -> Result<Option<Redirect>, Error> {
    if *p.peek(1) != TokenKind::LBrace {
        return Err(p.unexpected());
    }
    let token = p.token_index();
    let thread = p.prims.thread;
    let id = p.push_block(BlockKind::Go, Vec::new(), token, Some(thread));
    p.current = Some(id);
    p.funcs.push(FuncCtx {
        object: None,
        result: None,
        infer: false,
    });
    p.pos += 1;
    let action = Action::enter(State::Body)
        .on_close(go_close)
        .with(ActionFlags::STOP_BACK);
    Ok(Some(Redirect::Enter(action)))
}

fn go_close(p: &mut Parser<'_>) -> Result<(), Error> {
    let id = p.scope()?;
    p.close_block();
    p.funcs.pop();
    push_operand(p, id);
    Ok(())
}
