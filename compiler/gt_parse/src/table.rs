//! The state x token-category dispatch table.
//!
//! Every step of the compiler is a lookup `table[state][category]` yielding
//! an [`Action`]. Actions either keep the state, backtrack, or push a frame
//! and enter a new state. Callbacks attached to an action run when the
//! action fires (`enter`) and when its frame is popped (`close`); an enter
//! callback may override the table through a [`Redirect`].

use crate::parser::Parser;
use crate::{decl, expr, stmt};
use bitflags::bitflags;
use gt_diagnostic::Error;
use gt_ir::TokenKind;
use std::sync::OnceLock;

/// Parser states. Each row of the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Main,
    Run,
    Func,
    FuncParams,
    FnDecl,
    FnParams,
    ConstDecl,
    Import,
    Body,
    VarDecl,
    Cond,
    ForVars,
    ForIn,
    SwitchExpr,
    SwitchBody,
    CaseValues,
    BlockOpen,
    Return,
    Expr,
}

impl State {
    const COUNT: usize = State::Expr as usize + 1;
}

/// Token categories. Each column of the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Line,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Ellipsis,
    Assign,
    Operator,
    Ident,
    Literal,
    Run,
    Func,
    Fn,
    Const,
    Import,
    Pub,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    Go,
    Optional,
}

impl Category {
    const COUNT: usize = Category::Optional as usize + 1;

    pub(crate) fn of(kind: &TokenKind) -> Category {
        match kind {
            TokenKind::Line => Category::Line,
            TokenKind::LBrace => Category::LBrace,
            TokenKind::RBrace => Category::RBrace,
            TokenKind::LParen => Category::LParen,
            TokenKind::RParen => Category::RParen,
            TokenKind::LBracket => Category::LBracket,
            TokenKind::RBracket => Category::RBracket,
            TokenKind::Comma => Category::Comma,
            TokenKind::Colon => Category::Colon,
            TokenKind::Ellipsis => Category::Ellipsis,
            TokenKind::Assign => Category::Assign,
            TokenKind::Ident(_) => Category::Ident,
            TokenKind::Run => Category::Run,
            TokenKind::Func => Category::Func,
            TokenKind::Fn => Category::Fn,
            TokenKind::Const => Category::Const,
            TokenKind::Import => Category::Import,
            TokenKind::Pub => Category::Pub,
            TokenKind::If => Category::If,
            TokenKind::Elif => Category::Elif,
            TokenKind::Else => Category::Else,
            TokenKind::While => Category::While,
            TokenKind::For => Category::For,
            TokenKind::In => Category::In,
            TokenKind::Switch => Category::Switch,
            TokenKind::Case => Category::Case,
            TokenKind::Default => Category::Default,
            TokenKind::Return => Category::Return,
            TokenKind::Break => Category::Break,
            TokenKind::Continue => Category::Continue,
            TokenKind::Go => Category::Go,
            TokenKind::Optional => Category::Optional,
            kind if kind.is_literal() => Category::Literal,
            _ => Category::Operator,
        }
    }
}

pub(crate) type EnterFn = fn(&mut Parser<'_>) -> Result<Option<Redirect>, Error>;
pub(crate) type CloseFn = fn(&mut Parser<'_>) -> Result<(), Error>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Next {
    /// Consume the token, stay in the current state.
    Keep,
    /// Pop frames up to and including one marked `STOP_BACK`.
    Back,
    /// Push a resumption frame and switch to the state.
    Enter(State),
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct ActionFlags: u8 {
        /// Reprocess the current token after the transition.
        const STAY = 1;
        /// Backtracking stops after popping this action's frame.
        const STOP_BACK = 1 << 1;
        /// The token is not accepted here.
        const ERROR = 1 << 2;
    }
}

/// Error reported by an `ERROR` action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fail {
    Unexpected,
    IllegalOptional,
    ExpectedExpression,
}

#[derive(Copy, Clone)]
pub(crate) struct Action {
    pub(crate) next: Next,
    pub(crate) enter: Option<EnterFn>,
    pub(crate) close: Option<CloseFn>,
    pub(crate) flags: ActionFlags,
    pub(crate) fail: Fail,
}

impl Action {
    fn new(next: Next) -> Self {
        Action {
            next,
            enter: None,
            close: None,
            flags: ActionFlags::empty(),
            fail: Fail::Unexpected,
        }
    }

    pub(crate) fn keep() -> Self {
        Action::new(Next::Keep)
    }

    pub(crate) fn back() -> Self {
        Action::new(Next::Back)
    }

    pub(crate) fn enter(state: State) -> Self {
        Action::new(Next::Enter(state))
    }

    pub(crate) fn error(fail: Fail) -> Self {
        Action {
            flags: ActionFlags::ERROR,
            fail,
            ..Action::keep()
        }
    }

    pub(crate) fn on_enter(mut self, f: EnterFn) -> Self {
        self.enter = Some(f);
        self
    }

    pub(crate) fn on_close(mut self, f: CloseFn) -> Self {
        self.close = Some(f);
        self
    }

    pub(crate) fn with(mut self, flags: ActionFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// A nested expression whose result goes to `close`.
    pub(crate) fn expression(close: CloseFn) -> Self {
        Action::enter(State::Expr)
            .on_enter(expr::begin)
            .on_close(close)
            .with(ActionFlags::STOP_BACK)
    }

    /// An expression starting at the current token.
    pub(crate) fn expression_here(close: CloseFn) -> Self {
        Action::expression(close).with(ActionFlags::STAY)
    }
}

/// Override of the table's decision, returned by enter callbacks.
#[derive(Copy, Clone)]
pub(crate) enum Redirect {
    /// Behave as if the table held this action.
    Enter(Action),
    /// Backtrack, optionally reprocessing the token in the resumed state.
    Back { stay: bool },
}

pub(crate) struct Table {
    rows: Vec<[Action; Category::COUNT]>,
}

impl Table {
    pub(crate) fn get() -> &'static Table {
        static TABLE: OnceLock<Table> = OnceLock::new();
        TABLE.get_or_init(build)
    }

    #[inline]
    pub(crate) fn action(&self, state: State, category: Category) -> Action {
        self.rows[state as usize][category as usize]
    }

    fn set(&mut self, state: State, categories: &[Category], action: Action) {
        for &category in categories {
            self.rows[state as usize][category as usize] = action;
        }
    }

    fn fill(&mut self, state: State, action: Action) {
        self.rows[state as usize] = [action; Category::COUNT];
    }
}

/// Tokens that may start an expression when no statement keyword applies.
const EXPR_START: &[Category] = &[
    Category::Ident,
    Category::Literal,
    Category::Operator,
    Category::LParen,
    Category::Go,
];

/// A compound statement: its frame closes the construct's block.
fn construct(state: State, enter: EnterFn) -> Action {
    Action::enter(state)
        .on_enter(enter)
        .on_close(stmt::block_close)
        .with(ActionFlags::STOP_BACK)
}

/// The body of a branch; backtracking continues into the construct frame.
fn branch(enter: EnterFn) -> Action {
    Action::enter(State::Body)
        .on_enter(enter)
        .on_close(stmt::block_close)
}

fn build() -> Table {
    use Category as C;

    let mut t = Table {
        rows: vec![[Action::error(Fail::Unexpected); Category::COUNT]; State::COUNT],
    };
    let stop = ActionFlags::STOP_BACK;
    let stay = ActionFlags::STAY;

    // Top level.
    t.set(State::Main, &[C::Line], Action::keep());
    t.set(State::Main, &[C::Pub], Action::keep().on_enter(decl::pub_marker));
    t.set(
        State::Main,
        &[C::Run],
        Action::enter(State::Run)
            .on_enter(decl::run_begin)
            .on_close(decl::func_close)
            .with(stop),
    );
    t.set(
        State::Main,
        &[C::Func],
        Action::enter(State::Func)
            .on_enter(decl::func_begin)
            .on_close(decl::func_close)
            .with(stop),
    );
    t.set(
        State::Main,
        &[C::Fn],
        Action::enter(State::FnDecl)
            .on_enter(decl::fn_begin)
            .on_close(decl::fn_close)
            .with(stop),
    );
    t.set(
        State::Main,
        &[C::Const],
        Action::enter(State::ConstDecl)
            .on_enter(decl::const_begin)
            .on_close(decl::const_close)
            .with(stop),
    );
    t.set(
        State::Main,
        &[C::Import],
        Action::enter(State::Import).with(stop),
    );

    // Function headers.
    let body = Action::enter(State::Body)
        .on_enter(decl::func_body_open)
        .on_close(decl::func_body_close);
    t.set(State::Run, &[C::Line], Action::keep());
    t.set(State::Run, &[C::Ident], Action::keep().on_enter(decl::result_type));
    t.set(State::Run, &[C::LBrace], body);
    t.set(State::Run, &[C::Optional], Action::error(Fail::IllegalOptional));

    t.set(State::Func, &[C::Line], Action::keep());
    t.set(State::Func, &[C::Ident], Action::keep().on_enter(decl::func_ident));
    t.set(
        State::Func,
        &[C::LParen],
        Action::enter(State::FuncParams)
            .on_enter(decl::params_open)
            .on_close(decl::params_close)
            .with(stop),
    );
    t.set(State::Func, &[C::LBrace], body);

    t.set(State::FuncParams, &[C::Line], Action::keep());
    t.set(State::FuncParams, &[C::RParen], Action::back());
    t.set(State::FuncParams, &[C::Comma], Action::keep().on_enter(decl::param_comma));
    t.set(State::FuncParams, &[C::Optional], Action::keep().on_enter(decl::param_optional));
    t.set(State::FuncParams, &[C::Ident], Action::keep().on_enter(decl::param_ident));
    t.set(State::FuncParams, &[C::Ellipsis], Action::keep().on_enter(decl::param_variadic));
    t.set(
        State::FuncParams,
        &[C::Assign],
        Action::expression(decl::param_default_close).on_enter(decl::param_default_begin),
    );

    // `fn name(types) result`
    t.set(State::FnDecl, &[C::Ident], Action::keep().on_enter(decl::fn_ident));
    t.set(
        State::FnDecl,
        &[C::LParen],
        Action::enter(State::FnParams)
            .on_enter(decl::fn_params_open)
            .on_close(decl::fn_params_close)
            .with(stop),
    );
    t.set(State::FnDecl, &[C::Line], Action::back());
    t.set(State::FnParams, &[C::Line, C::Comma], Action::keep());
    t.set(State::FnParams, &[C::Ident], Action::keep().on_enter(decl::fn_param));
    t.set(State::FnParams, &[C::RParen], Action::back());

    // `const NAME = expr`
    t.set(State::ConstDecl, &[C::Ident], Action::keep().on_enter(decl::const_name));
    t.set(
        State::ConstDecl,
        &[C::Assign],
        Action::expression(decl::const_value_close),
    );
    t.set(State::ConstDecl, &[C::Line], Action::back());

    t.set(State::Import, &[C::Literal], Action::keep().on_enter(decl::import_unit));
    t.set(State::Import, &[C::Line], Action::back());

    // Statements.
    t.set(State::Body, &[C::Line], Action::keep());
    t.set(State::Body, &[C::RBrace], Action::back());
    t.set(
        State::Body,
        &[C::LBrace],
        Action::enter(State::Body)
            .on_enter(stmt::scope_open)
            .on_close(stmt::block_close)
            .with(stop),
    );
    t.set(
        State::Body,
        &[C::Literal, C::Operator, C::LParen, C::Go],
        Action::expression_here(stmt::expr_close),
    );
    t.set(State::Body, &[C::Ident], Action::keep().on_enter(stmt::statement_ident));
    t.set(State::Body, &[C::Optional], Action::error(Fail::IllegalOptional));
    t.set(State::Body, &[C::If], construct(State::Cond, stmt::if_begin));
    t.set(State::Body, &[C::Elif], construct(State::Cond, stmt::elif_begin));
    t.set(State::Body, &[C::Else], construct(State::BlockOpen, stmt::else_begin));
    t.set(State::Body, &[C::While], construct(State::Cond, stmt::while_begin));
    t.set(State::Body, &[C::For], construct(State::ForVars, stmt::for_begin));
    t.set(State::Body, &[C::Switch], construct(State::SwitchExpr, stmt::switch_begin));
    t.set(
        State::Body,
        &[C::Return],
        Action::enter(State::Return)
            .on_enter(stmt::return_begin)
            .on_close(stmt::return_close)
            .with(stop),
    );
    t.set(State::Body, &[C::Break], Action::keep().on_enter(stmt::break_stmt));
    t.set(State::Body, &[C::Continue], Action::keep().on_enter(stmt::continue_stmt));

    // `type name [= expr] {, name [= expr]}`
    t.set(State::VarDecl, &[C::Ident], Action::keep().on_enter(stmt::var_name));
    t.set(State::VarDecl, &[C::Comma], Action::keep());
    t.set(
        State::VarDecl,
        &[C::Assign],
        Action::expression(stmt::expr_close).on_enter(stmt::var_init),
    );
    t.set(State::VarDecl, &[C::Line], Action::back());
    t.set(State::VarDecl, &[C::RBrace], Action::back().with(stay));

    // Branch bodies.
    t.set(State::Cond, EXPR_START, Action::expression_here(stmt::cond_close));
    t.set(State::Cond, &[C::LBrace], branch(stmt::cond_body_open));
    t.set(State::Cond, &[C::Line], Action::error(Fail::ExpectedExpression));
    t.set(State::BlockOpen, &[C::LBrace], branch(stmt::body_open));

    t.set(State::ForVars, &[C::Ident], Action::keep().on_enter(stmt::for_name));
    t.set(State::ForVars, &[C::Comma], Action::keep());
    t.set(
        State::ForVars,
        &[C::In],
        Action::enter(State::ForIn).on_enter(stmt::for_in),
    );
    t.set(State::ForIn, EXPR_START, Action::expression_here(stmt::for_source_close));
    t.set(State::ForIn, &[C::LBrace], branch(stmt::for_body_open));

    t.set(State::SwitchExpr, EXPR_START, Action::expression_here(stmt::switch_value_close));
    t.set(
        State::SwitchExpr,
        &[C::LBrace],
        Action::enter(State::SwitchBody).on_enter(stmt::switch_open),
    );
    t.set(State::SwitchBody, &[C::Line], Action::keep());
    t.set(State::SwitchBody, &[C::RBrace], Action::back());
    t.set(State::SwitchBody, &[C::Case], construct(State::CaseValues, stmt::case_begin));
    t.set(State::SwitchBody, &[C::Default], construct(State::BlockOpen, stmt::default_begin));
    t.set(State::CaseValues, EXPR_START, Action::expression_here(stmt::case_value_close));
    t.set(State::CaseValues, &[C::Comma], Action::keep());
    t.set(State::CaseValues, &[C::LBrace], branch(stmt::case_body_open));

    // `return [expr]`
    t.set(State::Return, EXPR_START, Action::expression_here(stmt::return_value_close));
    t.set(State::Return, &[C::LBrace], Action::expression_here(stmt::return_value_close));
    t.set(State::Return, &[C::Line], Action::back());
    t.set(State::Return, &[C::RBrace], Action::back().with(stay));

    // The expression sub-parser sees every token.
    t.fill(State::Expr, Action::keep().on_enter(expr::token));

    t
}
